//! Structural type to module tree transformation.
//!
//! Each level of a structural type becomes one `declare module` block.
//! Inline object-typed properties and matching additions recurse into child
//! modules that the parent re-exports by name; other properties become
//! constants and method signatures become function declarations. Every
//! module finally re-exports itself as `default`.

use crate::addition::Addition;
use crate::document::{Document, ImportStatement, ObjectType, TypeExpr};
use crate::error::{Error, Result};
use crate::imports::ImportIndex;
use crate::output::{Module, ModuleItem};
use std::collections::HashSet;

/// Default ceiling on module path length (root counts as one).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// An addition whose source interface has been looked up.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAddition<'a> {
    pub addition: &'a Addition,
    pub body: &'a ObjectType,
}

/// Walks a structural type and emits its module tree in preorder.
pub struct Transformer<'a> {
    document: &'a Document,
    imports: &'a ImportIndex,
    additions: &'a [ResolvedAddition<'a>],
    max_depth: usize,
    modules: Vec<Module>,
    seen: HashSet<String>,
}

impl<'a> Transformer<'a> {
    pub fn new(
        document: &'a Document,
        imports: &'a ImportIndex,
        additions: &'a [ResolvedAddition<'a>],
    ) -> Self {
        Self {
            document,
            imports,
            additions,
            max_depth: DEFAULT_MAX_DEPTH,
            modules: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Generate the tree rooted at `root_name`; the root module comes first.
    pub fn run(mut self, root: &ObjectType, root_name: &str) -> Result<Vec<Module>> {
        let mut path = vec![root_name.to_string()];
        self.walk(root, &mut path)?;
        Ok(self.modules)
    }

    fn walk(&mut self, node: &ObjectType, path: &mut Vec<String>) -> Result<()> {
        let name = path.join("/");
        if path.len() > self.max_depth {
            return Err(Error::RecursionLimit {
                path: name,
                limit: self.max_depth,
            });
        }
        if !self.seen.insert(name.clone()) {
            tracing::warn!(module = %name, "module path generated more than once");
        }

        // Reserve the slot so the parent precedes its children.
        let slot = self.modules.len();
        self.modules.push(Module::new(name.clone()));
        let mut items = Vec::new();

        for property in &node.properties {
            check_name(&name, &property.name)?;
            match &property.ty {
                Some(TypeExpr::Object(object)) => {
                    let target = self.nest(object, path, &property.name)?;
                    items.push(ModuleItem::NamespaceExport {
                        name: property.name.clone(),
                        target,
                    });
                }
                Some(TypeExpr::Other(ty)) => items.push(ModuleItem::Const {
                    name: property.name.clone(),
                    ty: ty.clone(),
                    docs: property.docs.clone(),
                }),
                None => {
                    return Err(Error::UntypedProperty {
                        path: name,
                        property: property.name.clone(),
                    });
                }
            }
        }

        let additions = self.additions;
        for resolved in additions.iter().filter(|a| a.addition.path == name) {
            let property = &resolved.addition.property;
            check_name(&name, property)?;
            let target = self.nest(resolved.body, path, property)?;
            items.push(ModuleItem::NamespaceExport {
                name: property.clone(),
                target,
            });
        }

        for method in &node.methods {
            check_name(&name, &method.name)?;
            items.push(ModuleItem::Function {
                name: method.name.clone(),
                type_parameters: method.type_parameters.clone(),
                parameters: method.parameters.clone(),
                return_type: method.return_type.clone(),
                local_names: method.type_parameter_names.clone(),
                docs: method.docs.clone(),
            });
        }

        let imports = self.attribute_imports(&name, &items);

        items.push(ModuleItem::NamespaceExport {
            name: "default".to_string(),
            target: name.clone(),
        });

        tracing::debug!(
            module = %name,
            items = items.len(),
            imports = imports.len(),
            "generated module"
        );

        let module = &mut self.modules[slot];
        module.imports = imports;
        module.items = items;
        Ok(())
    }

    /// Walk `object` one segment deeper and return the child module path.
    fn nest(
        &mut self,
        object: &ObjectType,
        path: &mut Vec<String>,
        segment: &str,
    ) -> Result<String> {
        path.push(segment.to_string());
        let result = self.walk(object, path);
        let target = path.join("/");
        path.pop();
        result.map(|()| target)
    }

    /// Imports needed by the free names in `items`, each once, in first-use order.
    fn attribute_imports(&self, module: &str, items: &[ModuleItem]) -> Vec<ImportStatement> {
        if self.imports.is_empty() {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        let mut imports = Vec::new();
        for item in items {
            for reference in item.references() {
                if let Some(id) = self.imports.get(reference)
                    && seen.insert(id)
                {
                    tracing::trace!(module, name = reference, import = id.0, "attached import");
                    imports.push(self.document.import(id).clone());
                }
            }
        }
        imports
    }
}

/// Names become `export const`/`export function` bindings and path segments.
fn check_name(module: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidPropertyName {
            path: module.to_string(),
            property: name.to_string(),
        })
    }
}
