//! End-to-end generation tests.
//!
//! Run `cargo insta review` to update snapshots after intentional changes.

use ttgen_core::{DeclarationRole, Error, Options, generate, parse_additions};

const API_SOURCE: &str = r#"
import { Component } from "react";
import type { Logger } from "./logger";

/** Plugin identifier. */
export type PluginId = string;

type Unused = number;

enum Level { Debug, Info }

interface PluginApi {
    id: PluginId;
    unload(): void;
}

interface Api {
    version: string;
    ui: {
        Button: Component;
        render<P>(props: P): Component;
    };
    log(level: Level, message: string): void;
    logger: Logger;
}
"#;

#[test]
fn test_foo_end_to_end() {
    let source = r#"
interface Foo {
    a: string;
    b: { c: number };
}
"#;
    let output = generate(source, &Options::new("Foo")).unwrap();
    insta::assert_snapshot!("foo_end_to_end", output.render());
}

#[test]
fn test_api_with_addition_and_notice() {
    let options = Options::new("Api")
        .with_notice("Generated by ttgen")
        .with_additions(parse_additions(["/:plugin:PluginApi"], "@api").unwrap());
    let output = generate(API_SOURCE, &options).unwrap();
    insta::assert_snapshot!("api_with_addition_and_notice", output.render());
}

#[test]
fn test_root_addition_targets_root_module() {
    let source = "interface Foo { a: string } interface Bar { b: number }";
    let options =
        Options::new("Foo").with_additions(parse_additions(["/:extra:Bar"], "@foo").unwrap());
    let output = generate(source, &options).unwrap();

    let root = output.module("@foo").unwrap();
    let exports: Vec<_> = root.namespace_exports().collect();
    assert_eq!(exports, vec![("extra", "@foo/extra"), ("default", "@foo")]);

    let extra = output.module("@foo/extra").unwrap();
    assert_eq!(extra.constants().collect::<Vec<_>>(), vec![("b", "number")]);
}

#[test]
fn test_custom_root_name() {
    let output = generate(
        "interface VendettaObject { version: string }",
        &Options::new("VendettaObject"),
    )
    .unwrap();
    assert_eq!(output.modules[0].name, "@vendetta-object");

    let output = generate(
        "interface VendettaObject { version: string }",
        &Options::new("VendettaObject").with_root("vendetta"),
    )
    .unwrap();
    assert_eq!(output.modules[0].name, "vendetta");
}

#[test]
fn test_root_interface_is_not_collected() {
    let options = Options::new("Api")
        .with_additions(parse_additions(["/:plugin:PluginApi"], "@api").unwrap());
    let output = generate(API_SOURCE, &options).unwrap();
    let names: Vec<_> = output.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["PluginId", "Level"]);
}

#[test]
fn test_unknown_root_interface() {
    let err = generate("interface Foo { a: string }", &Options::new("Missing")).unwrap_err();
    match err {
        Error::UnresolvedDeclaration { name, role } => {
            assert_eq!(name, "Missing");
            assert_eq!(role, DeclarationRole::Root);
        }
        other => panic!("expected UnresolvedDeclaration, got {:?}", other),
    }
}

#[test]
fn test_unknown_addition_interface() {
    let options =
        Options::new("Foo").with_additions(parse_additions(["/:x:Nope"], "@foo").unwrap());
    let err = generate("interface Foo { a: string }", &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "addition interface 'Nope' not found in source document"
    );
}

#[test]
fn test_type_alias_is_not_an_interface() {
    let err = generate("type Foo = { a: string };", &Options::new("Foo")).unwrap_err();
    assert!(matches!(err, Error::UnresolvedDeclaration { .. }));
}

#[test]
fn test_exported_root_interface() {
    let output = generate(
        "export interface Foo { a: string }",
        &Options::new("Foo"),
    )
    .unwrap();
    assert_eq!(output.modules.len(), 1);
    assert!(output.declarations.is_empty());
}

#[test]
fn test_referenced_addition_interface_is_collected() {
    let source = "interface Bar { x: number } interface Foo { bar: Bar }";
    let options =
        Options::new("Foo").with_additions(parse_additions(["/:extra:Bar"], "@foo").unwrap());
    let output = generate(source, &options).unwrap();

    let root = output.module("@foo").unwrap();
    assert_eq!(root.constants().collect::<Vec<_>>(), vec![("bar", "Bar")]);
    assert!(output.module("@foo/extra").is_some());

    let names: Vec<_> = output.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Bar"]);
    assert!(output.render().contains("interface Bar { x: number }"));
}

#[test]
fn test_mapped_type_property() {
    let output = generate(
        "type Keys = 'a' | 'b'; interface Foo { m: { [K in Keys]: string } }",
        &Options::new("Foo"),
    )
    .unwrap();
    assert_eq!(output.modules.len(), 1);
    let rendered = output.render();
    assert!(rendered.contains("    export const m: { [K in Keys]: string };"));
    assert!(rendered.contains("type Keys = 'a' | 'b';"));
}

#[test]
fn test_deep_nesting_fails_with_recursion_limit() {
    let levels = 20_000;
    let source = format!(
        "interface Foo {{ a: {}string{} }}",
        "{ a: ".repeat(levels),
        " }".repeat(levels)
    );
    let err = generate(&source, &Options::new("Foo").with_max_depth(16)).unwrap_err();
    match err {
        Error::RecursionLimit { limit, .. } => assert_eq!(limit, 16),
        other => panic!("expected RecursionLimit, got {:?}", other),
    }
}

#[test]
fn test_parameter_name_does_not_collect_type() {
    let output = generate(
        "type Id = number; interface Foo { f(Id: string): void }",
        &Options::new("Foo"),
    )
    .unwrap();
    assert!(output.declarations.is_empty());
}

#[test]
fn test_quoted_property_names() {
    let output = generate(r#"interface Foo { "plain": string }"#, &Options::new("Foo")).unwrap();
    assert!(output.render().contains("export const plain: string;"));

    let err = generate(r#"interface Foo { "foo-bar": string }"#, &Options::new("Foo")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "property 'foo-bar' of module \"@foo\" is not a valid identifier"
    );
}
