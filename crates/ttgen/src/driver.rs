//! One generation run: config, arguments, input file and output target.

use crate::config::TtgenConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use ttgen_core::{Options, default_root, parse_additions};

/// Everything given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub input: PathBuf,
    pub interface: String,
    pub additions: Vec<String>,
    pub notice: Option<String>,
    pub output: Option<PathBuf>,
    pub root: Option<String>,
    pub max_depth: Option<usize>,
    /// Explicit config file replacing the project `ttgen.toml`.
    pub config: Option<PathBuf>,
    /// Directory searched for the project config.
    pub working_dir: PathBuf,
}

impl Invocation {
    /// Load the config layers this invocation asks for.
    pub fn load_config(&self) -> Result<TtgenConfig> {
        match &self.config {
            Some(path) => TtgenConfig::load_explicit(path),
            None => Ok(TtgenConfig::load(&self.working_dir)),
        }
    }
}

/// A validated run, ready to read its input.
#[derive(Debug, Clone)]
pub struct Plan {
    pub input: PathBuf,
    pub options: Options,
    pub output: Option<PathBuf>,
}

impl Plan {
    /// Combine arguments with config. Arguments win; additions from config
    /// come first. Malformed additions fail here, before any file is read.
    pub fn resolve(invocation: &Invocation, config: TtgenConfig) -> Result<Self> {
        let root = invocation
            .root
            .clone()
            .or(config.root)
            .unwrap_or_else(|| default_root(&invocation.interface));

        let directives = config.additions.iter().chain(&invocation.additions);
        let additions = parse_additions(directives, &root)?;

        let mut options = Options::new(&invocation.interface)
            .with_root(root)
            .with_additions(additions);
        if let Some(notice) = invocation.notice.clone().or(config.notice) {
            options = options.with_notice(notice);
        }
        if let Some(max_depth) = invocation.max_depth.or(config.max_depth) {
            options = options.with_max_depth(max_depth);
        }

        Ok(Self {
            input: invocation.input.clone(),
            options,
            output: invocation.output.clone().or(config.output),
        })
    }

    /// Read the input file and render the generated declarations.
    pub fn render(&self) -> Result<String> {
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let output = ttgen_core::generate(&source, &self.options)
            .with_context(|| format!("failed to generate from {}", self.input.display()))?;
        Ok(output.to_string())
    }

    /// Write rendered output to the configured file, or standard output.
    pub fn write(&self, rendered: &str) -> Result<()> {
        match &self.output {
            Some(path) => write_file(path, rendered),
            None => {
                print!("{}", rendered);
                Ok(())
            }
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote declarations");
    Ok(())
}

/// Run a full generation.
pub fn run(invocation: &Invocation) -> Result<()> {
    let config = invocation.load_config()?;
    let plan = Plan::resolve(invocation, config)?;
    let rendered = plan.render()?;
    plan.write(&rendered)
}
