//! Index from imported identifier to the statement that binds it.

use crate::document::{Document, ImportId};
use std::collections::HashMap;

/// Maps every identifier bound by an import statement to that statement.
///
/// When two statements bind the same name the later one wins.
#[derive(Debug, Clone, Default)]
pub struct ImportIndex {
    bindings: HashMap<String, ImportId>,
}

impl ImportIndex {
    pub fn build(document: &Document) -> Self {
        let mut bindings = HashMap::new();
        for import in &document.imports {
            for name in import.bindings() {
                bindings.insert(name.to_string(), import.id);
            }
        }
        let index = Self { bindings };
        tracing::debug!(
            statements = document.imports.len(),
            names = index.len(),
            "built import index"
        );
        index
    }

    pub fn get(&self, name: &str) -> Option<ImportId> {
        self.bindings.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
