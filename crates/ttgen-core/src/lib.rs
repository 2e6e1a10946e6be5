//! Ambient module tree generation from a structural TypeScript interface.
//!
//! `ttgen-core` takes one interface and turns every nesting level into its
//! own `declare module "<path>"` block, so consumers can import any part of
//! the object as a module:
//!
//! ```text
//! interface Foo {              declare module "@foo" {
//!     a: string;          ─>       export const a: string;
//!     b: { c: number };            export * as b from "@foo/b";
//! }                                export * as default from "@foo";
//!                              }
//!                              declare module "@foo/b" { ... }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! source ─> Document ─> ImportIndex ─┐
//!              │                     ├─> Transformer ─> modules ─┐
//!              │          Additions ─┘                           ├─> OutputDocument
//!              └──────────────────────> collect_referenced ──────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ttgen_core::{Options, generate};
//!
//! let source = "interface Foo { a: string; b: { c: number } }";
//! let output = generate(source, &Options::new("Foo")).unwrap();
//!
//! assert_eq!(output.modules[0].name, "@foo");
//! assert!(output.render().contains("export * as b from \"@foo/b\";"));
//! ```

pub mod addition;
pub mod collect;
pub mod document;
pub mod error;
pub mod imports;
pub mod input;
pub mod output;
pub mod transform;

pub use addition::{Addition, default_root, kebab_case, parse_additions};
pub use collect::collect_referenced;
pub use document::{DeclId, Declaration, DeclarationKind, Document, ImportId, ObjectType};
pub use error::{DeclarationRole, Error, Result};
pub use imports::ImportIndex;
pub use input::{parse_document, parse_document_with_max_depth};
pub use output::{CollectedDeclaration, Module, ModuleItem, OutputDocument};
pub use transform::{DEFAULT_MAX_DEPTH, ResolvedAddition, Transformer};

/// What to generate and how.
#[derive(Debug, Clone)]
pub struct Options {
    /// Interface the module tree is generated from.
    pub interface: String,
    /// Root module name.
    pub root: String,
    /// Additions with paths already normalized against `root`.
    pub additions: Vec<Addition>,
    /// Comment placed at the top of the output.
    pub notice: Option<String>,
    /// Maximum module path length.
    pub max_depth: usize,
}

impl Options {
    /// Options for `interface` with the default root name and no additions.
    pub fn new(interface: impl Into<String>) -> Self {
        let interface = interface.into();
        Self {
            root: default_root(&interface),
            interface,
            additions: Vec::new(),
            notice: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_additions(mut self, additions: Vec<Addition>) -> Self {
        self.additions = additions;
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse `source` and generate its module tree.
pub fn generate(source: &str, options: &Options) -> Result<OutputDocument> {
    let document = parse_document_with_max_depth(source, options.max_depth)?;
    generate_from_document(&document, options)
}

/// Generate the module tree for an already parsed document.
///
/// All lookups are resolved before any module is generated, so an unknown
/// interface fails without producing output.
pub fn generate_from_document(document: &Document, options: &Options) -> Result<OutputDocument> {
    let root = document
        .interface(&options.interface)
        .ok_or_else(|| Error::UnresolvedDeclaration {
            name: options.interface.clone(),
            role: DeclarationRole::Root,
        })?;

    let mut resolved = Vec::with_capacity(options.additions.len());
    for addition in &options.additions {
        let decl =
            document
                .interface(&addition.interface)
                .ok_or_else(|| Error::UnresolvedDeclaration {
                    name: addition.interface.clone(),
                    role: DeclarationRole::Addition,
                })?;
        resolved.push(ResolvedAddition {
            addition,
            body: body_of(decl),
        });
    }

    let index = ImportIndex::build(document);
    let mut output = OutputDocument::new(options.notice.clone());
    output.modules = Transformer::new(document, &index, &resolved)
        .with_max_depth(options.max_depth)
        .run(body_of(root), &options.root)?;

    collect_referenced(document, &mut output, &[root.id]);

    tracing::debug!(
        modules = output.modules.len(),
        declarations = output.declarations.len(),
        "generation complete"
    );
    Ok(output)
}

fn body_of(decl: &Declaration) -> &ObjectType {
    static EMPTY: ObjectType = ObjectType {
        properties: Vec::new(),
        methods: Vec::new(),
    };
    decl.body.as_ref().unwrap_or(&EMPTY)
}
