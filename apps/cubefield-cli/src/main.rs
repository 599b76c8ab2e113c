use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cubefield_kernel::{CubeField, FieldConfig};
use cubefield_render::{DebugTextRenderer, RenderView, Renderer};
use cubefield_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubefield-cli", about = "Headless cube field runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default configuration
    Info,
    /// Simulate frames and print the scene listing
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// RNG seed, overrides the config file
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// YAML field configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Box rows to print
        #[arg(short, long, default_value = "10")]
        rows: usize,
    },
    /// Simulate frames and print a scene summary
    Inspect {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "1")]
        frames: u64,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print the summary and object list as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>, seed: u64) -> anyhow::Result<FieldConfig> {
    let mut config = match path {
        Some(p) => FieldConfig::load(p).with_context(|| format!("loading config {}", p.display()))?,
        None => FieldConfig::default(),
    };
    config.seed = Some(seed);
    Ok(config)
}

fn simulate(config: FieldConfig, frames: u64) -> CubeField {
    let mut field = CubeField::new(config);
    for _ in 0..frames {
        let report = field.tick();
        tracing::debug!(?report, "tick");
        for event in field.scene.drain_events() {
            tracing::debug!(?event, "scene event");
        }
    }
    field
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubefield-cli v{}", env!("CARGO_PKG_VERSION"));
            let config = FieldConfig::default();
            println!(
                "plane: {}x{}  ceiling: {}  batch: {}  batches/frame: {}",
                config.plane.width,
                config.plane.height,
                config.spawn.ceiling,
                config.spawn.batch_size,
                config.spawn.batches_per_frame
            );
            println!("scale mode: {:?}", config.scale_mode);
        }
        Commands::Run {
            frames,
            seed,
            config,
            rows,
        } => {
            let field = simulate(load_config(config.as_ref(), seed)?, frames);
            let view = RenderView::from(&field.camera);
            print!("{}", DebugTextRenderer::with_max_rows(rows).render(&field.scene, &view));
            println!("state hash: {:#018x}", field.scene.state_hash());
        }
        Commands::Inspect { frames, seed, json } => {
            let field = simulate(load_config(None, seed)?, frames);
            let summary = SceneInspector::summary(&field.scene);
            if json {
                let doc = serde_json::json!({
                    "summary": summary,
                    "objects": SceneInspector::list_objects(&field.scene),
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{summary}");
            }
        }
    }

    Ok(())
}
