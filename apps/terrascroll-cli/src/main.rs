use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use terrascroll_render::{DebugTextRenderer, RenderView, Renderer};
use terrascroll_scene::{SceneConfig, SceneContext};
use terrascroll_terrain::TerrainConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "terrascroll-cli", about = "Headless terrascroll tool")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default configuration summary
    Info,
    /// Step a headless scene and print the debug render
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Seconds per tick
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Noise seed; overrides the config file
        #[arg(short, long)]
        seed: Option<u32>,
        /// Scene configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print tile 0's baked height grid as JSON
    Heights {
        /// Noise seed; overrides the config file
        #[arg(short, long)]
        seed: Option<u32>,
        /// Scene configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default scene configuration as YAML
    Config,
}

#[derive(Serialize)]
struct HeightDump<'a> {
    seed: u32,
    segments: u32,
    tile_length: f32,
    tile_width: f32,
    /// Rows from the back edge (-Z) to the front edge (+Z).
    rows: Vec<&'a [f32]>,
}

fn load_config(path: Option<&Path>, seed: Option<u32>) -> anyhow::Result<SceneConfig> {
    let config = match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SceneConfig::default(),
    };
    Ok(config.with_seed(seed))
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
            let defaults = TerrainConfig::default();
            println!("terrascroll-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", terrascroll_render::crate_info());
            println!(
                "terrain: segments={} tile={}x{} tiles={} speed={}/s cross_fade={} seam={:?}",
                defaults.segments,
                defaults.tile_width,
                defaults.tile_length,
                defaults.tile_count,
                defaults.scroll_speed,
                defaults.cross_fade,
                defaults.seam
            );
            println!(
                "boundary=+{:.1} move_back={:.1} octaves={} max_amplitude={}",
                defaults.half_extent(),
                defaults.move_back_offset(),
                defaults.octaves.octaves().len(),
                defaults.octaves.max_amplitude()
            );
        }
        Commands::Simulate {
            ticks,
            dt,
            seed,
            config,
        } => {
            let mut scene = SceneContext::new(load_config(config.as_deref(), seed)?)?;
            tracing::info!(ticks, dt, seed = scene.noise().seed(), "simulating");
            for _ in 0..ticks {
                scene.step(dt);
            }
            let view = RenderView::from_camera(&scene.camera);
            print!("{}", DebugTextRenderer::new().render(&scene, &view));
            println!("fingerprint: {:#018x}", scene.terrain().fingerprint());
        }
        Commands::Heights { seed, config } => {
            let scene = SceneContext::new(load_config(config.as_deref(), seed)?)?;
            let terrain = scene.terrain();
            let tile = terrain
                .tiles()
                .first()
                .context("scene has no terrain tiles")?;
            let mesh = tile.mesh();
            let dump = HeightDump {
                seed: scene.noise().seed(),
                segments: mesh.segments(),
                tile_length: terrain.config().tile_length,
                tile_width: terrain.config().tile_width,
                rows: (0..mesh.vertices_per_side())
                    .filter_map(|r| mesh.row(r))
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        Commands::Config => {
            print!("{}", SceneConfig::default().to_yaml()?);
        }
    }

    Ok(())
}
