use bunsenite_core::Result;
use bunsenite_ffi_bridge::{LibraryLocator, NickelBridge};
use clap::Subcommand;
use std::path::PathBuf;

pub mod info;
pub mod locate;
pub mod parse;
pub mod schema;
pub mod validate;
pub mod watch;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Evaluate a Nickel file and print the result as JSON
    #[command(visible_alias = "p")]
    Parse {
        /// Path to the Nickel configuration file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the output JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Check that a Nickel file is valid
    #[command(visible_alias = "v")]
    Validate {
        /// Path to the Nickel configuration file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Evaluate a Nickel file and check the result against a JSON Schema
    Schema {
        /// Path to the Nickel configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Path to the JSON Schema document
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },

    /// Re-evaluate a Nickel file every time it changes
    #[command(visible_alias = "w")]
    Watch {
        /// Path to the Nickel configuration file to watch
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the output JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show version and compliance information for the native engine
    Info {
        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the path of the native library that would be loaded
    Locate,
}

impl Commands {
    pub fn execute(self, library_dir: Option<PathBuf>) -> Result<()> {
        let locator = build_locator(library_dir);
        match self {
            Commands::Locate => locate::execute(&locator),
            Commands::Parse { file, pretty } => {
                let bridge = NickelBridge::load(&locator)?;
                parse::execute(&bridge, &file, pretty)
            }
            Commands::Validate { file } => {
                let bridge = NickelBridge::load(&locator)?;
                validate::execute(&bridge, &file)
            }
            Commands::Schema {
                config,
                schema: schema_file,
            } => {
                let bridge = NickelBridge::load(&locator)?;
                schema::execute(&bridge, &config, &schema_file)
            }
            Commands::Watch { file, pretty } => {
                let bridge = NickelBridge::load(&locator)?;
                watch::execute(&bridge, &file, pretty)
            }
            Commands::Info { json } => {
                let bridge = NickelBridge::load(&locator)?;
                info::execute(&bridge, json)
            }
        }
    }
}

fn build_locator(library_dir: Option<PathBuf>) -> LibraryLocator {
    match library_dir {
        Some(dir) => LibraryLocator::new().base_dir(dir),
        None => LibraryLocator::new(),
    }
}

/// Read a source file and derive the name the engine reports it under
pub(crate) fn read_source(file: &std::path::Path) -> Result<(String, String)> {
    let source = std::fs::read_to_string(file)
        .map_err(|e| bunsenite_core::Error::file_system(file, "read", e))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    Ok((source, name))
}
