//! Read-only model of a parsed TypeScript source document.
//!
//! Produced by [`crate::input::parse_document`]. Only the parts the
//! generator needs are modelled structurally: import statements, top-level
//! declarations and interface bodies. Type expressions other than inline
//! object literals are kept as verbatim text.

use std::collections::HashMap;

/// Identity of an import statement within its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportId(pub usize);

/// Identity of a top-level declaration within its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// A parsed source document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub imports: Vec<ImportStatement>,
    pub declarations: Vec<Declaration>,
    /// Number of identifier occurrences per name, declaration name sites excluded.
    pub(crate) references: HashMap<String, usize>,
}

impl Document {
    pub fn import(&self, id: ImportId) -> &ImportStatement {
        &self.imports[id.0]
    }

    /// First interface declared under `name`.
    pub fn interface(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.kind == DeclarationKind::Interface && d.name.as_deref() == Some(name))
    }

    /// How many times `name` is referenced anywhere in the document.
    pub fn reference_count(&self, name: &str) -> usize {
        self.references.get(name).copied().unwrap_or(0)
    }
}

/// An `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub id: ImportId,
    /// `import type ...`
    pub type_only: bool,
    pub form: ImportForm,
    /// Module specifier without quotes.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportForm {
    /// `import "x";`
    SideEffect,
    /// `import a, * as b, { c, d as e } from "x";`
    Clause {
        default: Option<String>,
        namespace: Option<String>,
        named: Vec<ImportSpecifier>,
    },
    /// `import a = require("x");`
    Require { binding: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    pub name: String,
    pub alias: Option<String>,
    pub type_only: bool,
}

impl ImportSpecifier {
    /// Name the specifier binds in the importing module.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl ImportStatement {
    /// Every identifier this statement binds, in source order.
    pub fn bindings(&self) -> Vec<&str> {
        match &self.form {
            ImportForm::SideEffect => Vec::new(),
            ImportForm::Require { binding } => vec![binding.as_str()],
            ImportForm::Clause {
                default,
                namespace,
                named,
            } => default
                .iter()
                .chain(namespace.iter())
                .map(String::as_str)
                .chain(named.iter().map(ImportSpecifier::local_name))
                .collect(),
        }
    }
}

/// Kind of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Enum,
    Class,
    Function,
    Variable,
    Namespace,
}

impl DeclarationKind {
    /// Whether reference collection copies declarations of this kind.
    pub fn is_collectable(self) -> bool {
        matches!(
            self,
            DeclarationKind::Interface | DeclarationKind::TypeAlias | DeclarationKind::Enum
        )
    }
}

/// A top-level declaration statement.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub name: Option<String>,
    pub kind: DeclarationKind,
    /// Verbatim statement text, including any `export` or `declare` keyword.
    pub text: String,
    /// Verbatim JSDoc comment directly preceding the statement.
    pub docs: Option<String>,
    /// Structural body, for interfaces.
    pub body: Option<ObjectType>,
}

/// Members of an interface body or inline object-type literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectType {
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    /// `None` when the property has no type annotation.
    pub ty: Option<TypeExpr>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// Including the angle brackets.
    pub type_parameters: Option<TypeText>,
    /// Names declared by `type_parameters`.
    pub type_parameter_names: Vec<String>,
    /// Including the parentheses.
    pub parameters: TypeText,
    pub return_type: Option<TypeText>,
    pub docs: Option<String>,
}

/// A type expression: either an inline object literal, or opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Object(ObjectType),
    Other(TypeText),
}

/// Verbatim source text together with the free identifiers it references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeText {
    pub text: String,
    /// Referenced names in source order; may repeat.
    pub references: Vec<String>,
}

impl TypeText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            references: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_follow_source_order() {
        let stmt = ImportStatement {
            id: ImportId(0),
            type_only: false,
            form: ImportForm::Clause {
                default: Some("React".into()),
                namespace: None,
                named: vec![
                    ImportSpecifier {
                        name: "useState".into(),
                        alias: None,
                        type_only: false,
                    },
                    ImportSpecifier {
                        name: "FC".into(),
                        alias: Some("Component".into()),
                        type_only: true,
                    },
                ],
            },
            source: "react".into(),
        };
        assert_eq!(stmt.bindings(), vec!["React", "useState", "Component"]);
    }

    #[test]
    fn test_side_effect_import_binds_nothing() {
        let stmt = ImportStatement {
            id: ImportId(0),
            type_only: false,
            form: ImportForm::SideEffect,
            source: "./polyfill".into(),
        };
        assert!(stmt.bindings().is_empty());
    }

    #[test]
    fn test_only_type_like_kinds_are_collectable() {
        assert!(DeclarationKind::Interface.is_collectable());
        assert!(DeclarationKind::TypeAlias.is_collectable());
        assert!(DeclarationKind::Enum.is_collectable());
        assert!(!DeclarationKind::Class.is_collectable());
        assert!(!DeclarationKind::Function.is_collectable());
        assert!(!DeclarationKind::Variable.is_collectable());
    }
}
