//! Errors raised while generating module declarations.

use std::fmt;

/// What a looked-up declaration was needed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationRole {
    /// The interface the whole module tree is generated from.
    Root,
    /// The source interface of an addition directive.
    Addition,
}

impl fmt::Display for DeclarationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationRole::Root => f.write_str("interface"),
            DeclarationRole::Addition => f.write_str("addition interface"),
        }
    }
}

/// Error that aborts a generation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid addition '{input}': expected <path>:<property>:<name>")]
    MalformedAddition { input: String },

    #[error("{role} '{name}' not found in source document")]
    UnresolvedDeclaration { name: String, role: DeclarationRole },

    #[error("recursion limit of {limit} exceeded at \"{path}\"")]
    RecursionLimit { path: String, limit: usize },

    #[error("property '{property}' of module \"{path}\" has no type annotation")]
    UntypedProperty { path: String, property: String },

    #[error("property '{property}' of module \"{path}\" is not a valid identifier")]
    InvalidPropertyName { path: String, property: String },

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
