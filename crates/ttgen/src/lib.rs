//! Command-line front end for `ttgen-core`.
//!
//! Layers `ttgen.toml` configuration under command-line arguments, reads the
//! input file and writes the generated declarations. See [`driver::run`].

pub mod config;
pub mod driver;

pub use config::TtgenConfig;
pub use driver::{Invocation, Plan, run};
