//! Offline Export Tests
//!
//! Tests for:
//! - Sequence rendering order and early abort
//! - GIF frame count and per-frame delays
//! - Write and flush errors reaching the caller
//!
//! Each test returns early when no GPU adapter is available.

use std::io::{self, Cursor, Write};
use std::sync::Arc;

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use timepiece::driver::render_sequence;
use timepiece::{
    ExportSettings, FrameRenderer, GpuContext, RenderSettings, Scene, TimepieceError, export_gif,
};

const SIZE: u32 = 8;

const SCENE: &str = r#"{
    "start": 1, "end": 10,
    "bg": { "color": [0.2, 0.4, 0.6] },
    "camera": "cam",
    "objs": [
        { "id": "pivot" },
        { "id": "cam", "parent": "pivot", "type": "camera",
          "perspective": [1,0,0,0, 0,1,0,0, 0,0,-1.002002,-1, 0,0,-0.2002002,0],
          "anim": { "loc": { "type": "static", "data": [0, 0, 10] } } },
        { "id": "tri", "type": "mesh",
          "positions": [[-1,-1,0],[1,-1,0],[0,1,0]], "cells": [[0,1,2]],
          "anim": { "loc": { "type": "anim", "data": [
              { "points": [ { "interpolation": "LINEAR", "co": [1, 0] }, { "interpolation": "LINEAR", "co": [10, 2] } ] },
              { "points": [ { "interpolation": "LINEAR", "co": [1, 0] } ] },
              { "points": [ { "interpolation": "LINEAR", "co": [1, 0] } ] }
          ] } } }
    ]
}"#;

/// 4 forward frames of 250 ms each, first frame held for 500 ms.
fn settings() -> ExportSettings {
    ExportSettings::default()
        .with_size(SIZE, SIZE)
        .with_supersample(1)
        .with_timing(4, 1000, 500)
}

fn renderer() -> Option<FrameRenderer> {
    let scene = Arc::new(Scene::from_json(SCENE).unwrap());
    let ctx = match pollster::block_on(GpuContext::new_headless(SIZE, SIZE, &RenderSettings::default())) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Skipping GPU test: {e}");
            return None;
        }
    };
    Some(FrameRenderer::new(scene, ctx).unwrap())
}

/// Accepts nothing.
struct RejectingWriter;

impl Write for RejectingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Takes every byte but cannot flush.
struct FailingFlush(Vec<u8>);

impl Write for FailingFlush {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("flush failed"))
    }
}

// ============================================================================
// Sequence
// ============================================================================

#[test]
fn sequence_visits_every_scheduled_frame() {
    let Some(mut renderer) = renderer() else { return };
    let mut seen = Vec::new();

    render_sequence(&mut renderer, 4, |index, total, pixels| {
        assert_eq!((pixels.width, pixels.height), (SIZE, SIZE));
        seen.push((index, total));
        Ok(())
    })
    .unwrap();

    let expected: Vec<_> = (0..7).map(|index| (index, 7)).collect();
    assert_eq!(seen, expected);
    // Schedule ends back at the start of the range
    assert_eq!(renderer.last_input().1, 0.0);
}

#[test]
fn sink_error_stops_the_sequence() {
    let Some(mut renderer) = renderer() else { return };
    let mut calls = 0;

    let result = render_sequence(&mut renderer, 4, |index, _, _| {
        calls += 1;
        if index == 2 {
            return Err(TimepieceError::CaptureFailed("sink refused".to_string()));
        }
        Ok(())
    });

    assert!(matches!(result, Err(TimepieceError::CaptureFailed(_))));
    assert_eq!(calls, 3);
}

// ============================================================================
// GIF
// ============================================================================

#[test]
fn gif_has_ping_pong_frames_and_delays() {
    let Some(mut renderer) = renderer() else { return };
    let settings = settings();
    let mut bytes = Vec::new();
    export_gif(&mut renderer, &settings, &mut bytes).unwrap();

    let frames = GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap();
    assert_eq!(frames.len(), 2 * settings.frames() - 1);

    let delays: Vec<u32> = frames
        .iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            numer / denom
        })
        .collect();
    assert_eq!(delays[0], 500);
    assert!(delays[1..].iter().all(|&d| d == 250), "delays {delays:?}");
    assert!(frames.iter().all(|f| f.buffer().dimensions() == (SIZE, SIZE)));
}

#[test]
fn write_error_is_returned() {
    let Some(mut renderer) = renderer() else { return };
    let result = export_gif(&mut renderer, &settings(), RejectingWriter);
    assert!(matches!(result, Err(TimepieceError::IoError(_))));
}

#[test]
fn flush_error_is_returned() {
    let Some(mut renderer) = renderer() else { return };
    let mut writer = FailingFlush(Vec::new());
    let result = export_gif(&mut renderer, &settings(), &mut writer);

    assert!(matches!(result, Err(TimepieceError::IoError(_))));
    // Everything was written before the flush
    assert!(writer.0.starts_with(b"GIF89a"));
    assert_eq!(writer.0.last(), Some(&0x3b));
}

#[cfg(target_os = "linux")]
#[test]
fn file_export_to_full_device_fails() {
    let Some(mut renderer) = renderer() else { return };
    let result = timepiece::export_gif_file(&mut renderer, &settings(), "/dev/full");
    assert!(matches!(result, Err(TimepieceError::IoError(_))));
}
