//! TypeScript document reader.
//!
//! Walks the tree-sitter syntax tree of a `.ts`/`.d.ts` source and builds a
//! [`Document`]: import statements, top-level declarations with their
//! verbatim text, interface bodies, and a per-name reference count.

use crate::document::{
    DeclId, Declaration, DeclarationKind, Document, ImportForm, ImportId, ImportSpecifier,
    ImportStatement, Method, ObjectType, Property, TypeExpr, TypeText,
};
use crate::error::{Error, Result};
use crate::transform::DEFAULT_MAX_DEPTH;
use std::collections::HashMap;
use tree_sitter::{Node, Parser, Tree};

/// Node kinds whose `name` field declares a binding rather than referencing one.
const DECLARATION_NAME_PARENTS: &[&str] = &[
    "interface_declaration",
    "type_alias_declaration",
    "enum_declaration",
    "class_declaration",
    "abstract_class_declaration",
    "function_declaration",
    "function_signature",
    "generator_function_declaration",
    "internal_module",
    "module",
    "variable_declarator",
    "type_parameter",
];

/// Node kinds whose `pattern` field binds a parameter name.
const PARAMETER_PARENTS: &[&str] = &["required_parameter", "optional_parameter"];

/// Parse TypeScript source into a [`Document`].
pub fn parse_document(source: &str) -> Result<Document> {
    parse_document_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse TypeScript source, failing with [`Error::RecursionLimit`] when an
/// interface nests inline object types more than `max_depth` levels deep.
pub fn parse_document_with_max_depth(source: &str, max_depth: usize) -> Result<Document> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|e| Error::Parse(format!("tree-sitter init: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse("failed to parse TypeScript".into()))?;

    if tree.root_node().has_error() {
        tracing::warn!("source contains syntax errors, continuing with the recovered tree");
    }

    let ctx = ExtractContext::new(source, max_depth);
    ctx.extract_document(&tree)
}

struct ExtractContext<'a> {
    source: &'a str,
    max_depth: usize,
}

impl<'a> ExtractContext<'a> {
    fn new(source: &'a str, max_depth: usize) -> Self {
        Self { source, max_depth }
    }

    fn node_text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn extract_document(&self, tree: &Tree) -> Result<Document> {
        let root = tree.root_node();
        let mut document = Document::default();
        let mut pending_comment: Option<String> = None;

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    pending_comment = self.extract_doc_comment(child);
                }
                "import_statement" => {
                    let id = ImportId(document.imports.len());
                    if let Some(import) = self.extract_import(child, id) {
                        document.imports.push(import);
                    }
                    pending_comment = None;
                }
                _ => {
                    let id = DeclId(document.declarations.len());
                    if let Some(decl) =
                        self.extract_declaration(child, id, pending_comment.take())?
                    {
                        document.declarations.push(decl);
                    }
                    pending_comment = None;
                }
            }
        }

        document.references = self.count_references(root);
        Ok(document)
    }

    /// JSDoc text with the comment's own indentation removed from every
    /// continuation line, so ` * ` alignment survives re-indenting.
    fn extract_doc_comment(&self, node: Node) -> Option<String> {
        let text = self.node_text(node);
        if !text.starts_with("/**") {
            return None;
        }
        let column = node.start_position().column;
        let mut lines = text.lines();
        let mut docs = lines.next().unwrap_or_default().to_string();
        for line in lines {
            let indent = line
                .bytes()
                .take(column)
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            docs.push('\n');
            docs.push_str(&line[indent..]);
        }
        Some(docs)
    }

    fn first_named_child<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|child| child.kind() != "comment")
    }

    /// Strip `export`, `declare` and statement wrappers down to the declaration node.
    fn unwrap_statement<'t>(&self, node: Node<'t>) -> Node<'t> {
        match node.kind() {
            "export_statement" => node
                .child_by_field_name("declaration")
                .map(|decl| self.unwrap_statement(decl))
                .unwrap_or(node),
            "ambient_declaration" => self
                .first_named_child(node)
                .map(|decl| self.unwrap_statement(decl))
                .unwrap_or(node),
            // `namespace X {}` parses as an expression statement
            "expression_statement" => match self.first_named_child(node) {
                Some(inner) if inner.kind() == "internal_module" => inner,
                _ => node,
            },
            _ => node,
        }
    }

    fn declaration_kind(kind: &str) -> Option<DeclarationKind> {
        Some(match kind {
            "interface_declaration" => DeclarationKind::Interface,
            "type_alias_declaration" => DeclarationKind::TypeAlias,
            "enum_declaration" => DeclarationKind::Enum,
            "class_declaration" | "abstract_class_declaration" => DeclarationKind::Class,
            "function_declaration" | "function_signature" | "generator_function_declaration" => {
                DeclarationKind::Function
            }
            "lexical_declaration" | "variable_declaration" => DeclarationKind::Variable,
            "module" | "internal_module" => DeclarationKind::Namespace,
            _ => return None,
        })
    }

    fn extract_declaration(
        &self,
        statement: Node,
        id: DeclId,
        docs: Option<String>,
    ) -> Result<Option<Declaration>> {
        let node = self.unwrap_statement(statement);
        let Some(kind) = Self::declaration_kind(node.kind()) else {
            return Ok(None);
        };

        let name = match kind {
            DeclarationKind::Variable => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name"))
            }
            _ => node.child_by_field_name("name"),
        }
        .map(|n| self.node_text(n).to_string());

        let body = match (kind, node.child_by_field_name("body")) {
            (DeclarationKind::Interface, Some(body)) => {
                let mut path = vec![name.clone().unwrap_or_default()];
                Some(self.extract_object_type(body, &mut path)?)
            }
            _ => None,
        };

        Ok(Some(Declaration {
            id,
            name,
            kind,
            text: self.node_text(statement).to_string(),
            docs,
            body,
        }))
    }

    /// Members of an interface body or type literal. `path` holds the
    /// interface name and the property names leading here.
    fn extract_object_type(&self, body: Node, path: &mut Vec<String>) -> Result<ObjectType> {
        if path.len() > self.max_depth {
            return Err(Error::RecursionLimit {
                path: path.join("/"),
                limit: self.max_depth,
            });
        }

        let mut object = ObjectType::default();
        let mut pending_comment: Option<String> = None;
        let mut cursor = body.walk();

        for child in body.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    pending_comment = self.extract_doc_comment(child);
                }
                "property_signature" => {
                    if let Some(property) =
                        self.extract_property(child, pending_comment.take(), path)?
                    {
                        object.properties.push(property);
                    }
                    pending_comment = None;
                }
                "method_signature" => {
                    if let Some(method) = self.extract_method(child, pending_comment.take()) {
                        object.methods.push(method);
                    }
                    pending_comment = None;
                }
                _ if child.is_named() => {
                    pending_comment = None;
                }
                _ => {}
            }
        }

        Ok(object)
    }

    fn property_name(&self, node: Node) -> String {
        let text = self.node_text(node);
        match node.kind() {
            "string" => text.trim_matches(|c| c == '"' || c == '\'').to_string(),
            _ => text.to_string(),
        }
    }

    fn extract_property(
        &self,
        node: Node,
        docs: Option<String>,
        path: &mut Vec<String>,
    ) -> Result<Option<Property>> {
        let Some(name_node) = node.child_by_field_name("name") else {
            return Ok(None);
        };
        let name = self.property_name(name_node);

        let annotated = node
            .child_by_field_name("type")
            .and_then(|annotation| self.first_named_child(annotation));
        let ty = match annotated {
            Some(ty) if Self::is_type_literal(ty) => {
                path.push(name.clone());
                let object = self.extract_object_type(ty, path);
                path.pop();
                Some(TypeExpr::Object(object?))
            }
            Some(ty) => Some(TypeExpr::Other(self.type_text(ty))),
            None => None,
        };

        Ok(Some(Property { name, ty, docs }))
    }

    /// Inline object literal type. Mapped types (`{ [K in Keys]: V }`) share
    /// the `object_type` node kind but are kept as text.
    fn is_type_literal(node: Node) -> bool {
        if node.kind() != "object_type" {
            return false;
        }
        let mut cursor = node.walk();
        let mapped = node.named_children(&mut cursor).any(|member| {
            let mut inner = member.walk();
            member.kind() == "index_signature"
                && member
                    .named_children(&mut inner)
                    .any(|c| c.kind() == "mapped_type_clause")
        });
        !mapped
    }

    fn extract_method(&self, node: Node, docs: Option<String>) -> Option<Method> {
        let name = self.property_name(node.child_by_field_name("name")?);

        let type_parameters_node = node.child_by_field_name("type_parameters");
        let type_parameters = type_parameters_node.map(|tp| self.type_text(tp));
        let type_parameter_names = type_parameters_node
            .map(|tp| self.type_parameter_names(tp))
            .unwrap_or_default();

        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.type_text(p))
            .unwrap_or_else(|| TypeText::new("()"));

        let return_type = node
            .child_by_field_name("return_type")
            .map(|r| self.annotation_text(r));

        Some(Method {
            name,
            type_parameters,
            type_parameter_names,
            parameters,
            return_type,
            docs,
        })
    }

    fn type_parameter_names(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() == "type_parameter")
            .filter_map(|c| c.child_by_field_name("name"))
            .map(|n| self.node_text(n).to_string())
            .collect()
    }

    fn type_text(&self, node: Node) -> TypeText {
        let mut references = Vec::new();
        self.collect_references(node, &mut references);
        TypeText {
            text: self.node_text(node).to_string(),
            references,
        }
    }

    /// Text of a return type annotation without its leading colon.
    fn annotation_text(&self, node: Node) -> TypeText {
        if node.kind() == "type_annotation"
            && let Some(inner) = self.first_named_child(node)
        {
            return self.type_text(inner);
        }
        // type predicates and `asserts` annotations
        let text = self.node_text(node);
        let mut references = Vec::new();
        self.collect_references(node, &mut references);
        TypeText {
            text: text.strip_prefix(':').unwrap_or(text).trim().to_string(),
            references,
        }
    }

    /// Free names referenced from type position within `node`.
    ///
    /// Plain `identifier` nodes inside types are parameter or predicate
    /// names and are skipped, except under `typeof` where they name values.
    fn collect_references(&self, node: Node, out: &mut Vec<String>) {
        // (node, direct child of a type query)
        let mut stack = vec![(node, false)];
        while let Some((node, in_query)) = stack.pop() {
            match node.kind() {
                "identifier" if in_query => out.push(self.node_text(node).to_string()),
                "type_identifier" => out.push(self.node_text(node).to_string()),
                "nested_type_identifier" | "nested_identifier" | "member_expression" => {
                    if let Some(head) = self.leading_segment(node) {
                        out.push(head);
                    }
                }
                kind => {
                    let query = kind == "type_query";
                    let mut cursor = node.walk();
                    let children: Vec<Node> = node.named_children(&mut cursor).collect();
                    stack.extend(children.into_iter().rev().map(|child| (child, query)));
                }
            }
        }
    }

    fn leading_segment(&self, node: Node) -> Option<String> {
        let head = self.node_text(node).split('.').next()?.trim();
        (!head.is_empty()).then(|| head.to_string())
    }

    fn extract_import(&self, node: Node, id: ImportId) -> Option<ImportStatement> {
        let mut type_only = false;
        let mut form = ImportForm::SideEffect;
        let mut source = node.child_by_field_name("source");

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type" if !child.is_named() => type_only = true,
                "import_clause" => form = self.extract_import_clause(child),
                "import_require_clause" => {
                    let binding = self.first_named_child(child)?;
                    form = ImportForm::Require {
                        binding: self.node_text(binding).to_string(),
                    };
                    source = source.or_else(|| child.child_by_field_name("source"));
                }
                _ => {}
            }
        }

        let source = self
            .node_text(source?)
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();

        Some(ImportStatement {
            id,
            type_only,
            form,
            source,
        })
    }

    fn extract_import_clause(&self, clause: Node) -> ImportForm {
        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();

        let mut cursor = clause.walk();
        for child in clause.children(&mut cursor) {
            match child.kind() {
                "identifier" => {
                    default = Some(self.node_text(child).to_string());
                }
                "namespace_import" => {
                    namespace = self
                        .first_named_child(child)
                        .map(|n| self.node_text(n).to_string());
                }
                "named_imports" => {
                    let mut inner_cursor = child.walk();
                    for inner in child.children(&mut inner_cursor) {
                        if inner.kind() == "import_specifier"
                            && let Some(specifier) = self.extract_import_specifier(inner)
                        {
                            named.push(specifier);
                        }
                    }
                }
                _ => {}
            }
        }

        ImportForm::Clause {
            default,
            namespace,
            named,
        }
    }

    fn extract_import_specifier(&self, node: Node) -> Option<ImportSpecifier> {
        let name = self.node_text(node.child_by_field_name("name")?).to_string();
        let alias = node
            .child_by_field_name("alias")
            .map(|a| self.node_text(a).to_string());
        let mut cursor = node.walk();
        let type_only = node
            .children(&mut cursor)
            .any(|c| !c.is_named() && c.kind() == "type");
        Some(ImportSpecifier {
            name,
            alias,
            type_only,
        })
    }

    /// Whether the node held in `field` of a `parent` node binds a name.
    fn is_binding_site(parent: Option<&str>, field: Option<&str>) -> bool {
        let parents = match field {
            Some("name") => DECLARATION_NAME_PARENTS,
            Some("pattern") => PARAMETER_PARENTS,
            _ => return false,
        };
        parent.is_some_and(|kind| parents.contains(&kind))
    }

    /// Count identifier occurrences by name across the whole tree.
    ///
    /// Declaration names and parameter patterns are binding sites, not
    /// references; parameter patterns are skipped with their whole subtree.
    fn count_references(&self, root: Node) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        let mut ancestors: Vec<&'static str> = Vec::new();
        let mut cursor = root.walk();
        loop {
            let node = cursor.node();
            let field = cursor.field_name();
            let binding = Self::is_binding_site(ancestors.last().copied(), field);
            if !binding && matches!(node.kind(), "identifier" | "type_identifier") {
                *counts.entry(self.node_text(node).to_string()).or_insert(0) += 1;
            }
            if !(binding && field == Some("pattern")) && cursor.goto_first_child() {
                ancestors.push(node.kind());
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return counts;
                }
                ancestors.pop();
            }
        }
    }
}
