//! Generated output document and its declaration-file writer.

use crate::document::{DeclarationKind, ImportForm, ImportStatement, TypeText};
use std::fmt;

/// The generated `.d.ts` document.
#[derive(Debug, Clone, Default)]
pub struct OutputDocument {
    /// Emitted as a single `//` comment line at the top.
    pub notice: Option<String>,
    /// Generated modules, root first, children in encounter order.
    pub modules: Vec<Module>,
    /// Top-level declarations copied from the source document.
    pub declarations: Vec<CollectedDeclaration>,
}

impl OutputDocument {
    pub fn new(notice: Option<String>) -> Self {
        Self {
            notice,
            ..Default::default()
        }
    }

    /// Look up a generated module by its joined path.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Render the document as declaration-file source.
    pub fn render(&self) -> String {
        DeclarationWriter::emit(self)
    }
}

impl fmt::Display for OutputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// One `declare module "<name>" { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Path segments joined with `/`.
    pub name: String,
    /// Import statements carried into the module, in first-use order.
    pub imports: Vec<ImportStatement>,
    pub items: Vec<ModuleItem>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Names re-exported as `export * as <name> from "<target>"`, with their targets.
    pub fn namespace_exports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::NamespaceExport { name, target } => Some((name.as_str(), target.as_str())),
            _ => None,
        })
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Const { name, ty, .. } => Some((name.as_str(), ty.text.as_str())),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Function { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

/// A statement inside a generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleItem {
    /// `export * as <name> from "<target>";`
    NamespaceExport { name: String, target: String },
    /// `export const <name>: <ty>;`
    Const {
        name: String,
        ty: TypeText,
        docs: Option<String>,
    },
    /// `export function <name><type_parameters><parameters>: <return_type>;`
    Function {
        name: String,
        type_parameters: Option<TypeText>,
        parameters: TypeText,
        return_type: Option<TypeText>,
        /// Type parameters the function declares itself.
        local_names: Vec<String>,
        docs: Option<String>,
    },
}

impl ModuleItem {
    /// Free names referenced by the item's carried type text, in source order.
    pub fn references(&self) -> Vec<&str> {
        match self {
            ModuleItem::NamespaceExport { .. } => Vec::new(),
            ModuleItem::Const { ty, .. } => ty.references.iter().map(String::as_str).collect(),
            ModuleItem::Function {
                type_parameters,
                parameters,
                return_type,
                local_names,
                ..
            } => type_parameters
                .iter()
                .chain(std::iter::once(parameters))
                .chain(return_type.iter())
                .flat_map(|t| t.references.iter())
                .map(String::as_str)
                .filter(|name| !local_names.iter().any(|local| local.as_str() == *name))
                .collect(),
        }
    }
}

/// A top-level declaration copied verbatim from the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedDeclaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub docs: Option<String>,
    pub text: String,
}

/// Emits an [`OutputDocument`] as declaration-file source.
pub struct DeclarationWriter {
    output: String,
    indent: usize,
}

impl Default for DeclarationWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    pub fn emit(document: &OutputDocument) -> String {
        let mut writer = Self::new();
        writer.write_document(document);
        writer.output
    }

    fn write_document(&mut self, document: &OutputDocument) {
        if let Some(notice) = &document.notice {
            self.output.push_str("// ");
            self.output.push_str(notice);
            self.output.push('\n');
        }

        let mut first = true;
        for module in &document.modules {
            if !first {
                self.output.push('\n');
            }
            first = false;
            self.write_module(module);
        }

        for decl in &document.declarations {
            if !first {
                self.output.push('\n');
            }
            first = false;
            if let Some(docs) = &decl.docs {
                self.output.push_str(docs);
                self.output.push('\n');
            }
            self.output.push_str(&decl.text);
            self.output.push('\n');
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn write_line(&mut self, line: &str) {
        self.write_indent();
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn write_docs(&mut self, docs: &Option<String>) {
        if let Some(docs) = docs {
            for line in docs.lines() {
                self.write_line(line);
            }
        }
    }

    fn write_module(&mut self, module: &Module) {
        self.write_line(&format!("declare module \"{}\" {{", module.name));
        self.indent += 1;

        for import in &module.imports {
            let line = format_import(import);
            self.write_line(&line);
        }

        for item in &module.items {
            self.write_item(item);
        }

        self.indent -= 1;
        self.write_line("}");
    }

    fn write_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::NamespaceExport { name, target } => {
                self.write_line(&format!("export * as {} from \"{}\";", name, target));
            }
            ModuleItem::Const { name, ty, docs } => {
                self.write_docs(docs);
                self.write_line(&format!("export const {}: {};", name, ty.text));
            }
            ModuleItem::Function {
                name,
                type_parameters,
                parameters,
                return_type,
                docs,
                ..
            } => {
                self.write_docs(docs);
                let mut line = format!("export function {}", name);
                if let Some(tp) = type_parameters {
                    line.push_str(&tp.text);
                }
                line.push_str(&parameters.text);
                if let Some(ret) = return_type {
                    line.push_str(": ");
                    line.push_str(&ret.text);
                }
                line.push(';');
                self.write_line(&line);
            }
        }
    }
}

/// Format an import statement from its parsed structure.
pub fn format_import(import: &ImportStatement) -> String {
    let keyword = if import.type_only {
        "import type"
    } else {
        "import"
    };
    match &import.form {
        ImportForm::SideEffect => format!("import \"{}\";", import.source),
        ImportForm::Require { binding } => {
            format!("{} {} = require(\"{}\");", keyword, binding, import.source)
        }
        ImportForm::Clause {
            default,
            namespace,
            named,
        } => {
            let mut parts = Vec::new();
            if let Some(default) = default {
                parts.push(default.clone());
            }
            if let Some(namespace) = namespace {
                parts.push(format!("* as {}", namespace));
            }
            if !named.is_empty() {
                let specifiers: Vec<String> = named
                    .iter()
                    .map(|s| {
                        let mut spec = String::new();
                        if s.type_only {
                            spec.push_str("type ");
                        }
                        spec.push_str(&s.name);
                        if let Some(alias) = &s.alias {
                            spec.push_str(" as ");
                            spec.push_str(alias);
                        }
                        spec
                    })
                    .collect();
                parts.push(format!("{{ {} }}", specifiers.join(", ")));
            }
            format!("{} {} from \"{}\";", keyword, parts.join(", "), import.source)
        }
    }
}
