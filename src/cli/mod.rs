//! CLI argument parsing for Mimica.

mod args;

pub use args::{parse_args, CliConfig, VERSION};
