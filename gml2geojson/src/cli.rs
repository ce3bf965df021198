//! Définition et implémentation des commandes CLI
//!
//! - `convert`: GML → GeoJSON (fichier ou dossier)
//! - `inspect`: résumé de conversion sans écriture

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use gml::ConvertOptions;
use gml2geojson::export::{self, ExportOptions};
use gml2geojson::{BatchReport, Config, ConversionStatus};

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a GML file or directory to GeoJSON (WGS84)
    Convert(ConvertArgs),

    /// Print the conversion summary of a GML file without writing anything
    Inspect {
        /// Path to the GML file
        #[arg(short, long)]
        input: PathBuf,

        /// CRS assumed when the document declares none (e.g. EPSG:25833)
        #[arg(long)]
        default_crs: Option<String>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to a GML file or a directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output GeoJSON file, or output directory when the input is a directory
    #[arg(short, long)]
    pub output: PathBuf,

    /// CRS assumed when the document declares none (e.g. EPSG:25833)
    #[arg(long)]
    pub default_crs: Option<String>,

    /// Glob pattern for input files in directory mode (default: *.gml)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Maximum number of files converted concurrently
    #[arg(long, alias = "threads")]
    pub jobs: Option<usize>,

    /// Indent the GeoJSON output
    #[arg(long)]
    pub pretty: bool,

    /// Save a JSON conversion report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Exécute la commande convert
pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.default_crs)?;
    let options = ExportOptions {
        convert: ConvertOptions::with_default_crs(config.default_crs()?),
        pretty: args.pretty || config.pretty,
    };
    let report_path = args.report.or(config.report);

    let report = if args.input.is_dir() {
        let pattern = args.pattern.unwrap_or(config.pattern);
        let jobs = args.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        });

        println!("=== Convert {} ===", args.input.display());
        println!("Output: {}", args.output.display());
        println!("Pattern: {}", pattern);
        println!("Default CRS: {}", options.convert.default_crs);
        println!("Jobs: {}", jobs);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("Failed to build thread pool")?;
        let report = pool.install(|| {
            export::convert_directory(&args.input, &args.output, &pattern, &options)
        })?;
        report.display();
        report
    } else {
        let start = Instant::now();
        let output = if args.output.is_dir() {
            export::output_path(&args.input, &args.output)
        } else {
            args.output
        };

        let file = export::convert_file(&args.input, &output, &options)?;
        println!("{}", file.summary());
        println!("Output: {}", output.display());

        let mut report = BatchReport::new();
        report.record_success(file);
        report.set_duration(start.elapsed());
        report.finalize();
        report
    };

    if let Some(path) = report_path {
        report
            .save_to_file(&path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    if report.status == ConversionStatus::Failed {
        anyhow::bail!("Conversion failed: {}", report.summary());
    }

    Ok(())
}

/// Exécute la commande inspect
pub fn cmd_inspect(input: &Path, default_crs: Option<String>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config, default_crs)?;
    let options = ConvertOptions::with_default_crs(config.default_crs()?);

    let file = export::inspect_file(input, &options)?;
    println!("File: {}", file.input);
    println!("Checksum (blake3): {}", file.checksum);
    println!("Source CRS: {}", file.crs);
    println!("Features found: {}", file.found);
    println!("Features emitted: {}", file.emitted);
    println!("Features skipped: {}", file.skipped);

    Ok(())
}

/// Configuration fichier/env, puis surcharge du CRS par l'argument CLI
fn load_config(path: Option<&Path>, default_crs: Option<String>) -> Result<Config> {
    let mut config = Config::resolve(path)?;
    if let Some(crs) = default_crs {
        config.default_crs = crs;
    }
    Ok(config)
}
