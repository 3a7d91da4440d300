use anyhow::Context;
use clap::{Parser, Subcommand};
use dining_map::config::Config;
use dining_map::dataset::Dataset;
use dining_map::grouping::{CategoryGroups, LayerId};
use dining_map::infra::leaflet::render_page;
use dining_map::infra::scene::SceneRenderer;
use dining_map::presentation::legend;
use dining_map::view::MapView;
use dining_map::{constants, logging, server};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dining_map")]
#[command(about = "Salzburg dining guide restaurant map")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $DINING_MAP_CONFIG or dining_map.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON restaurant dataset overriding the configured one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the standalone HTML map page
    Render {
        #[arg(long, default_value = "dining_map.html")]
        out: PathBuf,
    },
    /// Print the restaurants currently visible
    List {
        /// Cuisine substring filter ("all" clears it)
        #[arg(long)]
        cuisine: Option<String>,
        /// Layers to show in addition to the defaults (e.g. veg)
        #[arg(long = "show-layer")]
        show: Vec<String>,
        /// Layers to hide (e.g. Asian)
        #[arg(long = "hide-layer")]
        hide: Vec<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the layer grouping and legend
    Layers,
    /// Validate a restaurant dataset
    Validate,
    /// Serve the map and JSON API over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        metrics_port: Option<u16>,
    },
}

fn parse_layer_args(names: &[String]) -> anyhow::Result<Vec<LayerId>> {
    names
        .iter()
        .map(|name| name.parse::<LayerId>().map_err(anyhow::Error::from))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    let _log_guard = logging::init_logging(&config.logging);

    let data_path = cli.data.clone().or_else(|| config.data.path.clone());

    match cli.command {
        Commands::Render { out } => {
            let dataset = Arc::new(Dataset::load_or_builtin(data_path.as_deref())?);
            let html = render_page(dataset, &config.map)?;
            fs::write(&out, html)
                .with_context(|| format!("Failed to write map page to {}", out.display()))?;
            info!(path = %out.display(), "Map page written");
            println!("✅ Map page written to {}", out.display());
        }
        Commands::List {
            cuisine,
            show,
            hide,
            json,
        } => {
            let dataset = Arc::new(Dataset::load_or_builtin(data_path.as_deref())?);
            let mut view = MapView::init(dataset, SceneRenderer::new())?;
            for layer in parse_layer_args(&show)? {
                view.set_layer_visible(layer, true)?;
            }
            for layer in parse_layer_args(&hide)? {
                view.set_layer_visible(layer, false)?;
            }
            if let Some(tag) = cuisine.as_deref() {
                view.apply_filter(tag);
            }

            if json {
                let records: Vec<_> = view.visible_records().collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!(
                    "🍽️  {} restaurant(s) visible (filter: {})",
                    view.visible().len(),
                    view.filter_state().selection()
                );
                for record in view.visible_records() {
                    println!(
                        "   {:<20} {:<24} {:<28} {}",
                        record.name,
                        record.category,
                        record.cuisine,
                        if record.is_vegetarian { "V" } else { "" }
                    );
                }
            }
        }
        Commands::Layers => {
            let dataset = Dataset::load_or_builtin(data_path.as_deref())?;
            let groups = CategoryGroups::build(&dataset);

            println!("🗺️  Layers");
            for layer in LayerId::all() {
                let names: Vec<&str> = groups
                    .layer(layer)
                    .iter()
                    .filter_map(|id| dataset.get(*id))
                    .map(|r| r.name.as_str())
                    .collect();
                println!(
                    "   {} [{}] {} ({}): {}",
                    layer.name(),
                    layer.color(),
                    if layer.shown_by_default() { "shown" } else { "hidden" },
                    names.len(),
                    names.join(", ")
                );
            }

            println!("\n📋 Legend");
            for entry in legend() {
                println!(
                    "   {} {} {}",
                    entry.color,
                    entry.glyph.unwrap_or(" "),
                    entry.name
                );
            }

            println!("\n🔎 Filter options: {}", constants::get_filter_tags().join(", "));
        }
        Commands::Validate => match Dataset::load_or_builtin(data_path.as_deref()) {
            Ok(dataset) => {
                let groups = CategoryGroups::build(&dataset);
                println!("✅ {} restaurant(s) valid", dataset.len());
                for (category, ids) in groups.iter() {
                    println!("   {}: {}", category, ids.len());
                }
                println!("   vegetarian-friendly: {}", groups.vegetarian().len());
            }
            Err(e) => {
                error!("Dataset validation failed: {}", e);
                println!("❌ Dataset validation failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Serve { port, metrics_port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if metrics_port.is_some() {
                config.server.metrics_port = metrics_port;
            }
            let dataset = Arc::new(Dataset::load_or_builtin(data_path.as_deref())?);
            server::run_server(&config, dataset).await?;
        }
    }

    Ok(())
}
