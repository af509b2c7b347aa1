use clap::{Parser, Subcommand};
use std::path::PathBuf;
use volcano_map::{config, data, extent, leaflet, processing, render};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the interactive map to a single HTML file
    Generate {
        /// TOML configuration; built-in defaults when omitted
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Overrides output.html_path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Report record counts, the initial view and cities dropped by the cap
    Inspect {
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config, output } => {
            let mut app_config = config::AppConfig::load(config.as_deref())?;
            if let Some(path) = output {
                app_config.output.html_path = path.clone();
            }

            // 1. Load Data
            let store = data::load_data(&app_config)?;

            // 2. Classify, group, assemble, render and write
            let path = render::generate_map(&app_config, &store, &leaflet::LeafletRenderer)?;

            println!("Map written to {}", path.display());
        }
        Commands::Inspect { config } => {
            let app_config = config::AppConfig::load(config.as_deref())?;
            let store = data::load_data(&app_config)?;

            println!("Volcanoes:  {}", store.volcanoes.len());
            println!("Cities:     {}", store.cities.len());
            println!("Boundaries: {}", store.boundaries.len());

            let window = &app_config.processing.display_window;
            let bounds = extent::display_extent(&store.coordinates(), window)?;
            println!(
                "Initial view: lat [{}, {}], lon [{}, {}]",
                bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
            );

            let cap = app_config.processing.city_cap_per_country;
            let truncated = processing::truncated_cities(&store, cap);
            if truncated.is_empty() {
                println!("No country exceeds the cap of {} cities", cap);
            } else {
                println!("Cities hidden by the cap of {} per country:", cap);
                for (country, hidden) in &truncated {
                    println!("  {}: {}", country, hidden);
                }
            }
        }
    }

    Ok(())
}
