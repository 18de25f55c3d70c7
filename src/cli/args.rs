//! CLI argument parsing and configuration.

use std::io;
use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration from CLI arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// SQLite database holding the saved game
    pub db_path: Option<PathBuf>,
    /// JSON deck replacing the bundled one
    pub deck_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    /// Seed for deterministic shuffles
    pub seed: Option<u64>,
    /// Start without the saved game
    pub fresh: bool,
    /// Print deck analytics as JSON and exit
    pub stats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Parsed {
    Run(CliConfig),
    Help,
    Version,
}

/// Print usage information
pub fn print_usage() {
    eprintln!("Mimica - Charades party game for the terminal");
    eprintln!();
    eprintln!("Usage: mimica [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <PATH>      Database for the saved game (default: data dir/mimica/mimica.db)");
    eprintln!("  --deck <PATH>    Load cards from a JSON deck instead of the bundled one");
    eprintln!("  --log <PATH>     Log file (default: data dir/mimica/mimica.log)");
    eprintln!("  --seed <N>       Seed the shuffler for a reproducible card order");
    eprintln!("  --fresh          Ignore the saved game and start over");
    eprintln!("  --stats          Print deck analytics as JSON and exit");
    eprintln!("  -h, --help       Show this help message");
    eprintln!("  -V, --version    Show version");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MIMICA_GEMINI_API_KEY   Gemini key used for AI-generated cards");
    eprintln!("  RUST_LOG                Log filter (default: info)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  mimica                          # Resume the saved game");
    eprintln!("  mimica --fresh --seed 7         # New game with a fixed shuffle");
    eprintln!("  mimica --deck my-cards.json     # Play with a custom deck");
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> io::Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| invalid(format!("Missing value for {}", flag)))
}

fn parse_from(args: &[String]) -> io::Result<Parsed> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-V" | "--version" => return Ok(Parsed::Version),
            "--fresh" => config.fresh = true,
            "--stats" => config.stats = true,
            "--db" => {
                i += 1;
                config.db_path = Some(PathBuf::from(value(args, i, arg)?));
            }
            "--deck" => {
                i += 1;
                config.deck_path = Some(PathBuf::from(value(args, i, arg)?));
            }
            "--log" => {
                i += 1;
                config.log_path = Some(PathBuf::from(value(args, i, arg)?));
            }
            "--seed" => {
                i += 1;
                let raw = value(args, i, arg)?;
                config.seed = Some(
                    raw.parse()
                        .map_err(|_| invalid(format!("Invalid seed value: {}", raw)))?,
                );
            }
            _ => return Err(invalid(format!("Unknown argument: {}", arg))),
        }
        i += 1;
    }

    Ok(Parsed::Run(config))
}

/// Parse CLI arguments and return configuration
pub fn parse_args() -> io::Result<CliConfig> {
    let args: Vec<String> = std::env::args().collect();
    match parse_from(&args) {
        Ok(Parsed::Run(config)) => Ok(config),
        Ok(Parsed::Help) => {
            print_usage();
            std::process::exit(0);
        }
        Ok(Parsed::Version) => {
            println!("mimica {}", VERSION);
            std::process::exit(0);
        }
        Err(e) => {
            print_usage();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("mimica")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse_from(&args(&[])).unwrap(), Parsed::Run(CliConfig::default()));
    }

    #[test]
    fn test_all_options() {
        let parsed = parse_from(&args(&[
            "--db", "/tmp/m.db", "--deck", "deck.json", "--log", "m.log", "--seed", "7", "--fresh",
            "--stats",
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            Parsed::Run(CliConfig {
                db_path: Some(PathBuf::from("/tmp/m.db")),
                deck_path: Some(PathBuf::from("deck.json")),
                log_path: Some(PathBuf::from("m.log")),
                seed: Some(7),
                fresh: true,
                stats: true,
            })
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_from(&args(&["--fresh", "-h"])).unwrap(), Parsed::Help);
        assert_eq!(parse_from(&args(&["-V"])).unwrap(), Parsed::Version);
    }

    #[test]
    fn test_missing_value() {
        let err = parse_from(&args(&["--seed"])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("--seed"));
    }

    #[test]
    fn test_invalid_seed_and_unknown_flag() {
        assert!(parse_from(&args(&["--seed", "abc"])).is_err());
        let err = parse_from(&args(&["--turbo"])).unwrap_err();
        assert_eq!(err.to_string(), "Unknown argument: --turbo");
    }
}
