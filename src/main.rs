use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use raycaster::consts::OUT_FILE;
use raycaster::scene::Scene;

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON file containing the scene description
    #[clap(value_parser)]
    scene: PathBuf,

    /// File name to write the PPM image to
    #[clap(short, long, value_parser, default_value = OUT_FILE)]
    output: PathBuf,

    /// Maximum reflection/refraction recursion depth
    #[clap(long, value_parser)]
    depth: Option<usize>,

    /// Offset used to lift shading points off surfaces
    #[clap(long, value_parser)]
    epsilon: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut scene = Scene::load(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    if let Some(depth) = args.depth {
        scene.config.recursion_depth = depth;
    }

    if let Some(epsilon) = args.epsilon {
        scene.config.epsilon = epsilon;
    }

    info!("rendering {} at {}x{}", args.scene.display(),
        scene.camera.hsize(), scene.camera.vsize());

    let canvas = scene.camera.render(&scene.world, &scene.config)
        .context("failed to render scene")?;
    canvas.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
