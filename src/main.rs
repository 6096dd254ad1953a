use anyhow::{bail, Context};
use log::info;
use scene_loader::Scene;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!("usage: {} <scene.json>", args[0]);
    }
    let scene = Scene::load(&args[1]).with_context(|| format!("loading {}", args[1]))?;

    let camera = scene.camera();
    info!(
        "fov {:.3}x{:.3}, pixel length {:?}, {} iterations, depth {}, output `{}`",
        camera.fov.x,
        camera.fov.y,
        camera.pixel_length,
        scene.state.iterations,
        scene.state.trace_depth,
        scene.state.image_name
    );
    info!(
        "{} triangles, {} BVH nodes, {} images",
        scene.triangle_buffer().map_or(0, |triangles| triangles.len()),
        scene.bvh_nodes().len(),
        scene.images().len()
    );
    Ok(())
}
