//! Offline rendering and GIF export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, Frame};

use crate::config::ExportSettings;
use crate::driver::schedule::PingPong;
use crate::errors::{Result, TimepieceError};
use crate::render::{FramePixels, FrameRenderer};

/// Input `x` held for the whole offline sweep.
pub const OFFLINE_X: f32 = 0.5;

/// Renders the ping-pong schedule over `frames` and hands every captured frame
/// to `sink` as `(index, total, pixels)`.
///
/// Each frame is fully captured before the next is rendered. The first error
/// from capture or from `sink` aborts the sequence.
pub fn render_sequence<F>(renderer: &mut FrameRenderer, frames: usize, mut sink: F) -> Result<()>
where
    F: FnMut(usize, usize, FramePixels) -> Result<()>,
{
    let schedule = PingPong::new(frames);
    let total = schedule.len();
    for (index, y) in schedule.enumerate() {
        renderer.render_frame(OFFLINE_X, y);
        let pixels = renderer.capture()?;
        sink(index, total, pixels)?;
    }
    Ok(())
}

/// Renders the export schedule and writes it as a looping GIF.
///
/// The renderer must target an offscreen texture, ideally of
/// [`ExportSettings::render_size`]; frames are resized to the output size.
///
/// The GIF is encoded in memory and written to `writer` in one piece once the
/// trailer is in place, so every write and flush error reaches the caller.
pub fn export_gif<W: Write>(
    renderer: &mut FrameRenderer,
    settings: &ExportSettings,
    mut writer: W,
) -> Result<()> {
    let bytes = encode_gif(renderer, settings)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn encode_gif(renderer: &mut FrameRenderer, settings: &ExportSettings) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite)?;

        let frame_delay = settings.frame_delay_ms();
        render_sequence(renderer, settings.frames(), |index, total, pixels| {
            let image = pixels.into_image().ok_or_else(|| {
                TimepieceError::CaptureFailed("pixel buffer does not match frame size".to_string())
            })?;
            let image = if image.dimensions() == (settings.width, settings.height) {
                image
            } else {
                imageops::resize(&image, settings.width, settings.height, FilterType::Lanczos3)
            };

            let delay_ms = if index == 0 { settings.pause_ms } else { frame_delay };
            encoder.encode_frame(Frame::from_parts(
                image,
                0,
                0,
                Delay::from_numer_denom_ms(delay_ms, 1),
            ))?;

            log::info!("Rendered frame {} / {}", index + 1, total);
            Ok(())
        })?;
        // Dropping the encoder writes the trailer
    }
    Ok(bytes)
}

/// [`export_gif`] into a file at `path`.
pub fn export_gif_file(
    renderer: &mut FrameRenderer,
    settings: &ExportSettings,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    export_gif(renderer, settings, &mut file)?;
    file.into_inner().map_err(|e| e.into_error())?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}
