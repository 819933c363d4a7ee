mod generate;
mod host;
mod watch;

use clap::{Parser, Subcommand};
use layoutgen_core::UserOptions;
use std::path::{Path, PathBuf};

/// Looked up in the project root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "layouts.config.json";

#[derive(Parser)]
#[command(
    name = "layoutgen",
    version,
    about = "Generate the virtual layouts module for a single-page application",
    long_about = "Layoutgen scans layout components, maps them onto application routes and emits \
                  the `virtual:generated-layouts` module. In watch mode it keeps the module up to \
                  date as layouts and pages change."
)]
pub struct Cli {
    /// Also print logs to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the layouts module once
    Generate {
        /// Project root. Defaults to the current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
        /// JSON options file. Defaults to `layouts.config.json` in the project root.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Write the module to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Module specifier to resolve
        #[arg(long, default_value = "virtual:generated-layouts")]
        id: String,
    },
    /// Regenerate the layouts module whenever layouts or pages change
    #[command(
        long_about = "Runs a standalone dev host: layout and page directories are watched, and every \
                      relevant change invalidates and regenerates the module."
    )]
    Watch {
        /// Project root. Defaults to the current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
        /// JSON options file. Defaults to `layouts.config.json` in the project root.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Write the module to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Generate { .. } => "generate",
        Commands::Watch { .. } => "watch",
    };
    let _guard = layoutgen_core::logging::init_logging(component, cli.verbose);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Generate {
            path,
            config,
            out,
            id,
        } => rt.block_on(generate::run(project_root(path)?, config, out, id)),
        Commands::Watch { path, config, out } => {
            rt.block_on(watch::run(project_root(path)?, config, out))
        }
    }
}

fn project_root(path: Option<PathBuf>) -> std::io::Result<PathBuf> {
    match path {
        Some(path) => std::path::absolute(path),
        None => std::env::current_dir(),
    }
}

/// An explicit config file must exist; the default one is optional.
pub fn load_options(
    root: &Path,
    config: Option<&Path>,
) -> Result<UserOptions, Box<dyn std::error::Error>> {
    match config {
        Some(path) => Ok(UserOptions::from_file(path)?),
        None => {
            let default_path = root.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                tracing::info!("Using options from {}", default_path.display());
                Ok(UserOptions::from_file(&default_path)?)
            } else {
                Ok(UserOptions::default())
            }
        }
    }
}

/// Unchanged output is not rewritten, so a watched output file cannot retrigger itself.
pub(crate) fn write_module(code: &str, out: Option<&Path>) -> std::io::Result<()> {
    match out {
        Some(path) => {
            if std::fs::read_to_string(path).is_ok_and(|existing| existing == code) {
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, code)
        }
        None => {
            print!("{}", code);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_options_defaults_without_file() {
        let dir = tempdir().unwrap();
        let options = load_options(dir.path(), None).unwrap();
        assert!(options.is_client_side_compatible());
    }

    #[test]
    fn test_load_options_reads_default_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "layoutsDirs": ["src/layouts", "src/admin/layouts"] }"#,
        )
        .unwrap();
        let options = load_options(dir.path(), None).unwrap();
        assert!(!options.is_client_side_compatible());
    }

    #[test]
    fn test_load_options_explicit_file_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_options(dir.path(), Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_write_module_to_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("gen/layouts.js");
        write_module("export const layouts = {\n};\n", Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "export const layouts = {\n};\n");
    }

    #[test]
    fn test_cli_parses_watch() {
        let cli = Cli::try_parse_from(["layoutgen", "watch", "app", "--out", "gen.js"]).unwrap();
        match cli.command {
            Commands::Watch { path, out, .. } => {
                assert_eq!(path, Some(PathBuf::from("app")));
                assert_eq!(out, Some(PathBuf::from("gen.js")));
            }
            _ => panic!("expected watch"),
        }
    }
}
