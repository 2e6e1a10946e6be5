use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ttgen::Invocation;

const AFTER_HELP: &str = "\
Additions:
  Each addition grafts another interface into the tree as <path>:<property>:<name>.
  <path> is the module the property is added to. A leading '/' stands for the
  root module, so '/' alone is the root and '/ui' is '<root>/ui'.

Examples:
  ttgen src/api.ts Api
  ttgen src/api.ts Api /:plugin:PluginApi -o types/api.d.ts
  ttgen src/api.ts Api --root @my/api --notice 'Generated file, do not edit'";

/// Generate ambient module declarations from a TypeScript interface.
#[derive(Parser, Debug)]
#[command(name = "ttgen", version, about, after_help = AFTER_HELP)]
struct Args {
    /// TypeScript file containing the interface
    input: PathBuf,

    /// Name of the root interface
    interface: String,

    /// Interfaces to graft into the tree (<path>:<property>:<name>)
    additions: Vec<String>,

    /// Comment placed at the top of the output
    #[arg(short, long)]
    notice: Option<String>,

    /// Write to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Root module name (default: @ followed by the kebab-cased interface name)
    #[arg(short, long)]
    root: Option<String>,

    /// Maximum module nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Config file to use instead of ./ttgen.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log generation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn install_subscriber(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    install_subscriber(args.verbose);

    let invocation = Invocation {
        input: args.input,
        interface: args.interface,
        additions: args.additions,
        notice: args.notice,
        output: args.output,
        root: args.root,
        max_depth: args.max_depth,
        config: args.config,
        working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    if let Err(e) = ttgen::run(&invocation) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
