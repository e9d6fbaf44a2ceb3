pub mod config;
pub mod data;
pub mod page;
pub mod processing;
pub mod render;
pub mod scale;
pub mod server;
pub mod topology;
pub mod types;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the datasets and render the choropleth page
    Generate {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Serve the generated page and the county lookup API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config } => {
            println!("Generating map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // 1. Fetch both datasets concurrently
            let (education, us) = data::fetch_datasets(&app_config).await?;

            // 2. Decode geometry
            let county_shapes = topology::counties(&us)?;
            println!("Decoded {} county shapes", county_shapes.len());
            let borders = topology::state_mesh(&us)?;

            // 3. Join and classify
            let index = processing::EducationIndex::build(&education)?;
            let counties = processing::join_counties(county_shapes, &index)?;
            let (min, max) = processing::value_range(&education)
                .ok_or_else(|| anyhow!("Education dataset is empty"))?;
            let ticks = scale::LegendTicks::from_range(min, max);

            // 4. Render the page
            let svg = render::render_svg(&app_config.map, &counties, &borders, &ticks);
            let html = page::render_page(&svg);

            fs::create_dir_all(&app_config.output.site_dir).with_context(|| {
                format!(
                    "Failed to create site directory: {:?}",
                    app_config.output.site_dir
                )
            })?;
            let out_path = app_config.output.site_dir.join("index.html");
            fs::write(&out_path, html)
                .with_context(|| format!("Failed to write page: {:?}", out_path))?;

            println!("Wrote {:?}", out_path);
            println!("Generation complete!");
        }
        Commands::Serve { config } => {
            println!("Serving map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // Load data for API interactivity
            println!("Loading data for API...");
            let education = data::fetch_education_data(&app_config).await?;

            server::start_server(app_config, education).await?;
        }
    }

    Ok(())
}
