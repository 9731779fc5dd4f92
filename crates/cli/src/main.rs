use bunsenite_cli::{logging, Commands};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bunsenite")]
#[command(about = "Parse and validate Nickel configuration through the native engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory the native library search starts from (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    library_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    cli.command.execute(cli.library_dir)?;
    Ok(())
}
