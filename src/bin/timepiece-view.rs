//! Interactive viewer
//!
//! Usage: `timepiece-view <scene.json>`
//!
//! Move the cursor across the window to scrub the timeline (vertical) and
//! tilt the camera (both axes).

use std::sync::Arc;

use anyhow::Context;
use timepiece::{Scene, Viewer};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("usage: timepiece-view <scene.json>");
        std::process::exit(1);
    };

    let scene = Scene::load(&path).with_context(|| format!("failed to load scene {path}"))?;
    Viewer::new(Arc::new(scene)).run()?;
    Ok(())
}
