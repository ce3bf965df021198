//! Point d'entrée CLI pour gml2geojson

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// `.env` du répertoire courant, pour `GML2GEOJSON_DEFAULT_CRS` et `RUST_LOG`
fn load_env() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env: {}", e);
        }
    }
}

mod cli;

use cli::Commands;

/// Convertir des fichiers GML en GeoJSON WGS84
#[derive(Parser)]
#[command(name = "gml2geojson")]
#[command(author, version)]
#[command(about = "Convertir des collections de features GML (FKB, N50, WFS) en GeoJSON WGS84")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    load_env();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert(args) => {
            info!(input = %args.input.display(), output = %args.output.display(), "Convert to GeoJSON");
            cli::cmd_convert(args)?;
        }
        Commands::Inspect {
            input,
            default_crs,
            config,
        } => {
            info!(input = %input.display(), "Inspect");
            cli::cmd_inspect(&input, default_crs, config.as_deref())?;
        }
    }

    Ok(())
}

/// Logs sur stderr ; `RUST_LOG` prime sur `-v` / `-q`
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gml={level},gml2geojson={level}")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 0)
        .init();
}
