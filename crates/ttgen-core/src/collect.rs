//! Copy still-referenced top-level type declarations into the output.
//!
//! The generator excludes just the root interface; addition source
//! interfaces are copied like any other declaration when referenced.
//!
//! Only type aliases, interfaces and enums are copied. Whether a declaration
//! is referenced is decided against the whole source document, not against
//! what the output ends up needing, and references out of copied
//! declarations are not followed.

use crate::document::{DeclId, Document};
use crate::output::{CollectedDeclaration, OutputDocument};

/// Append every referenced, collectable declaration not in `excluded`.
pub fn collect_referenced(document: &Document, output: &mut OutputDocument, excluded: &[DeclId]) {
    for decl in &document.declarations {
        if excluded.contains(&decl.id) {
            continue;
        }
        let Some(name) = &decl.name else {
            continue;
        };
        if document.reference_count(name) == 0 {
            tracing::debug!(name = %name, "skipping unreferenced declaration");
            continue;
        }
        if !decl.kind.is_collectable() {
            continue;
        }

        tracing::debug!(name = %name, kind = ?decl.kind, "collected declaration");
        output.declarations.push(CollectedDeclaration {
            name: name.clone(),
            kind: decl.kind,
            docs: decl.docs.clone(),
            text: decl.text.clone(),
        });
    }
}
