use scenesim::{setup, Scene, SceneConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Run a course scene headless and log the transforms it produces")]
struct Args {
    /// Scene file, looked up under `scenarios/` unless it is a path that exists
    #[arg(short, long = "file", default_value = "solar_system.yaml")]
    file_name: String,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Real time between frames, in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_time: f64,

    /// Log every n-th frame's transforms
    #[arg(long, default_value_t = 60)]
    report_every: usize,
}

// load here to keep main clean
fn load_scene_config(file_name: &str) -> Result<SceneConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("reading scene file {}", config_path.display()))?;
    let cfg = SceneConfig::from_yaml(&text)
        .with_context(|| format!("parsing scene file {}", config_path.display()))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = load_scene_config(&args.file_name)?;
    let mut scene: Box<dyn Scene> = setup(&cfg).context("scene refused to start")?;
    info!("running {} scene for {} frames", scene.name(), args.frames);

    let report_every = args.report_every.max(1);
    for frame_index in 0..args.frames {
        let frame = scene
            .advance_and_get_transforms(args.frame_time)
            .with_context(|| format!("frame {frame_index}"))?;

        if frame_index % report_every == 0 {
            info!("frame {frame_index}, t = {:.4}", frame.time);
            for node in &frame.transforms {
                info!(
                    "  {:<16} at ({:9.4}, {:9.4}, {:9.4}) scale {:.4}",
                    node.name, node.translation.x, node.translation.y, node.translation.z, node.scale
                );
            }
        }
    }

    Ok(())
}
