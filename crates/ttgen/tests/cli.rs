//! CLI tests - run the ttgen binary against files in a temp directory.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

const API: &str = r#"
import type { Logger } from "./logger";

type Mode = "dev" | "prod";

interface Plugin {
    load(): void;
}

interface Api {
    mode: Mode;
    logger: Logger;
    ui: { theme: string };
}
"#;

/// Binary isolated from the user's global config.
fn ttgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ttgen").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("api.ts"), API).unwrap();
    dir
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to execute ttgen");
    assert!(
        output.status.success(),
        "ttgen failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_generates_to_stdout() {
    let dir = workspace();
    let out = stdout_of(ttgen(dir.path()).args(["api.ts", "Api"]));

    assert!(out.contains("declare module \"@api\" {"));
    assert!(out.contains("    import type { Logger } from \"./logger\";"));
    assert!(out.contains("    export * as ui from \"@api/ui\";"));
    assert!(out.contains("declare module \"@api/ui\" {"));
    assert!(out.contains("type Mode = \"dev\" | \"prod\";"));
    assert!(!out.contains("interface Plugin"));
}

#[test]
fn test_addition_and_options() {
    let dir = workspace();
    let out = stdout_of(ttgen(dir.path()).args([
        "api.ts",
        "Api",
        "/:plugin:Plugin",
        "--root",
        "@my/api",
        "--notice",
        "Generated file",
    ]));

    assert!(out.starts_with("// Generated file\n"));
    assert!(out.contains("    export * as plugin from \"@my/api/plugin\";"));
    assert!(out.contains("declare module \"@my/api/plugin\" {"));
    assert!(out.contains("    export function load(): void;"));
}

#[test]
fn test_output_file() {
    let dir = workspace();
    let out = stdout_of(ttgen(dir.path()).args(["api.ts", "Api", "-o", "types/api.d.ts"]));
    assert!(out.is_empty());

    let written = std::fs::read_to_string(dir.path().join("types/api.d.ts")).unwrap();
    assert!(written.contains("declare module \"@api\" {"));
}

#[test]
fn test_project_config() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("ttgen.toml"),
        "root = \"@configured\"\nnotice = \"From config\"\nadditions = [\"/:plugin:Plugin\"]\n",
    )
    .unwrap();

    let out = stdout_of(ttgen(dir.path()).args(["api.ts", "Api"]));
    assert!(out.starts_with("// From config\n"));
    assert!(out.contains("declare module \"@configured/plugin\" {"));

    let out = stdout_of(ttgen(dir.path()).args(["api.ts", "Api", "-r", "@flag"]));
    assert!(out.contains("declare module \"@flag/plugin\" {"));
}

#[test]
fn test_malformed_addition_fails_before_reading() {
    let dir = workspace();
    let output = ttgen(dir.path())
        .args(["missing.ts", "Api", "a:b", "-o", "out.d.ts"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid addition 'a:b'"), "stderr: {}", stderr);
    assert!(!dir.path().join("out.d.ts").exists());
}

#[test]
fn test_unknown_interface_writes_nothing() {
    let dir = workspace();
    let output = ttgen(dir.path())
        .args(["api.ts", "Nope", "-o", "out.d.ts"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("interface 'Nope' not found"), "stderr: {}", stderr);
    assert!(!dir.path().join("out.d.ts").exists());
}

#[test]
fn test_missing_input_file() {
    let dir = workspace();
    let output = ttgen(dir.path()).args(["missing.ts", "Api"]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read missing.ts"), "stderr: {}", stderr);
}

#[test]
fn test_missing_explicit_config() {
    let dir = workspace();
    let output = ttgen(dir.path())
        .args(["api.ts", "Api", "--config", "nope.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config nope.toml"), "stderr: {}", stderr);
}

#[test]
fn test_deep_input_reports_recursion_limit() {
    let dir = workspace();
    let levels = 100_000;
    let source = format!(
        "interface Deep {{ a: {}string{} }}",
        "{ a: ".repeat(levels),
        " }".repeat(levels)
    );
    std::fs::write(dir.path().join("deep.ts"), source).unwrap();

    let output = ttgen(dir.path()).args(["deep.ts", "Deep"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("recursion limit of 64 exceeded"), "stderr: {}", stderr);
}
