//! lancube CLI: command-line interface for streetlight inventories.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use lancube::{InventoryConfig, Recording, SpectralCatalog, Surveyor};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "lancube")]
#[command(about = "Build a geolocated streetlight inventory from three-sensor light-meter traces")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the inventory pipeline on a segmented recording.
    Inventory(CliInventoryArgs),

    /// Print the entries of a spectral catalog.
    CatalogInfo {
        /// Path to the spectral catalog (JSON).
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliInventoryArgs {
    /// Path to the segmented recording (JSON, lancube.recording.v1).
    #[arg(long)]
    recording: PathBuf,

    /// Path to the spectral catalog (JSON).
    #[arg(long)]
    catalog: PathBuf,

    /// Optional configuration file (JSON); missing keys take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Instrument mounting height above ground (m).
    #[arg(long)]
    instrument_height: Option<f64>,

    /// Flux calibration constant K.
    #[arg(long)]
    flux_calibration: Option<f64>,

    /// Radius (m) within which two records are the same fixture.
    #[arg(long)]
    prec_localisation: Option<f64>,

    /// Disable the second, side-agnostic dedup pass.
    #[arg(long)]
    no_relaxed_dedup: bool,

    /// Path to write the inventory (JSON).
    #[arg(long)]
    out: PathBuf,
}

impl CliInventoryArgs {
    fn to_config(&self) -> CliResult<InventoryConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                InventoryConfig::from_json_file(path)?
            }
            None => InventoryConfig::default(),
        };
        if let Some(h) = self.instrument_height {
            config.instrument_height_m = h;
        }
        if let Some(k) = self.flux_calibration {
            config.flux_calibration = k;
        }
        if let Some(prec) = self.prec_localisation {
            config.prec_localisation_m = prec;
        }
        if self.no_relaxed_dedup {
            config.dedup.relaxed_radius_m = None;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inventory(args) => run_inventory(&args),
        Commands::CatalogInfo { catalog } => run_catalog_info(&catalog),
        Commands::DefaultConfig => run_default_config(),
    }
}

fn run_catalog_info(path: &std::path::Path) -> CliResult<()> {
    let catalog = SpectralCatalog::from_json_file(path)?;

    println!("spectral catalog {}", path.display());
    println!("  entries: {}", catalog.len());
    println!(
        "  {:<16} {:>8} {:>8} {:>8} {:>6}",
        "tech", "r/g", "b/g", "ir/g", "ulor"
    );
    for e in catalog.entries() {
        println!(
            "  {:<16} {:>8.3} {:>8.3} {:>8.3} {:>6.3}",
            e.tech, e.red_green, e.blue_green, e.ir_green, e.ulor
        );
    }
    Ok(())
}

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&InventoryConfig::default())?);
    Ok(())
}

fn run_inventory(args: &CliInventoryArgs) -> CliResult<()> {
    let config = args.to_config()?;

    tracing::info!("Loading recording: {}", args.recording.display());
    let recording = Recording::from_json_file(&args.recording)?;
    tracing::info!("Recording: {} aligned samples per sensor", recording.len());

    tracing::info!("Loading catalog: {}", args.catalog.display());
    let catalog = SpectralCatalog::from_json_file(&args.catalog)?;

    let surveyor = Surveyor::with_config(catalog, config);
    let result = surveyor.survey(&recording);

    let stats = &result.stats;
    tracing::info!(
        "Inventory: {} fixtures ({} built, {} heights re-estimated, {} low-flux, {} duplicates)",
        result.fixtures.len(),
        stats.fixtures_built,
        stats.heights_reestimated,
        stats.low_flux_dropped,
        stats.duplicates_dropped + stats.relaxed_duplicates_dropped,
    );

    let json = result.to_json_string()?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    Ok(())
}
