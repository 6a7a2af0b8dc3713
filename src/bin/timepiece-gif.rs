//! Offline GIF export
//!
//! Usage: `timepiece-gif <scene.json> <out.gif>`
//!
//! Renders the timeline forward and back at 4x supersampling and writes a
//! looping 1024x1024 GIF.

use std::sync::Arc;

use anyhow::Context;
use timepiece::driver::PingPong;
use timepiece::{ExportSettings, FrameRenderer, GpuContext, RenderSettings, Scene, export_gif_file};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(scene_path), Some(out_path), None) = (args.next(), args.next(), args.next()) else {
        eprintln!("usage: timepiece-gif <scene.json> <out.gif>");
        std::process::exit(1);
    };

    let scene = Scene::load(&scene_path)
        .with_context(|| format!("failed to load scene {scene_path}"))?;

    let settings = ExportSettings::default();
    let (width, height) = settings.render_size();
    let ctx = pollster::block_on(GpuContext::new_headless(
        width,
        height,
        &RenderSettings::default(),
    ))
    .context("failed to create offscreen GPU context")?;

    let mut renderer = FrameRenderer::new(Arc::new(scene), ctx)?;
    log::info!(
        "Exporting {} frames of {}x{} to {out_path}",
        PingPong::total(settings.frames()),
        settings.width,
        settings.height
    );
    export_gif_file(&mut renderer, &settings, &out_path)?;
    Ok(())
}
