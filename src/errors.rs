//! Error Types
//!
//! This module defines the error type used throughout the crate.
//!
//! # Overview
//!
//! [`TimepieceError`] covers every failure mode:
//! - Scene loading and validation (all fatal at load time)
//! - Mesh construction (invalid topology, subdivision failures)
//! - GPU initialization and surface failures
//! - Frame capture and GIF export
//!
//! Curve sampling has no error path: out-of-range times hold the boundary value.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, TimepieceError>`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimepieceError {
    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// The scene JSON could not be parsed.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The scene's camera reference does not name any node.
    #[error("Camera node '{0}' not found in scene")]
    MissingCamera(String),

    /// The camera node carries no perspective matrix.
    #[error("Camera node '{0}' has no perspective matrix")]
    MissingPerspective(String),

    /// Two nodes share the same identifier.
    #[error("Duplicate node id '{0}'")]
    DuplicateNode(String),

    /// A node references a parent that does not exist.
    #[error("Node '{node}' references unknown parent '{parent}'")]
    DanglingParent {
        /// The child node
        node: String,
        /// The missing parent id
        parent: String,
    },

    /// A node appears before its parent in scene order.
    #[error("Node '{node}' precedes its parent '{parent}' in scene order")]
    ParentOrder {
        /// The child node
        node: String,
        /// The parent that appears later
        parent: String,
    },

    /// A mesh node has no positions or no cells.
    #[error("Mesh node '{0}' has empty geometry")]
    EmptyGeometry(String),

    /// An animated or static property has the wrong number of components.
    #[error("Node '{node}': property '{property}' expects {expected} components, got {actual}")]
    PropertyArity {
        /// The node carrying the property
        node: String,
        /// Property name as written in the scene file
        property: &'static str,
        /// Expected component count
        expected: usize,
        /// Actual component count
        actual: usize,
    },

    /// An animation curve has no keyframes.
    #[error("Node '{node}': curve {index} of property '{property}' has no keyframes")]
    EmptyCurve {
        /// The node carrying the curve
        node: String,
        /// Property name as written in the scene file
        property: &'static str,
        /// Component index of the curve
        index: usize,
    },

    /// A color does not have at least three channels.
    #[error("Invalid color: expected at least 3 channels, got {0}")]
    InvalidColor(usize),

    // ========================================================================
    // Geometry Errors
    // ========================================================================
    /// Mesh topology is not usable (bad index, degenerate cell, mismatched shape).
    #[error("Invalid topology in mesh '{mesh}': {reason}")]
    InvalidTopology {
        /// The mesh node id
        mesh: String,
        /// Human-readable description
        reason: String,
    },

    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create the window surface.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The operation needs an offscreen target but the renderer draws to a window.
    #[error("Render target does not support pixel capture")]
    CaptureUnsupported,

    /// Reading pixels back from the GPU failed.
    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// The viewer window could not be created.
    #[cfg(feature = "winit")]
    #[error("Failed to create window: {0}")]
    WindowCreateFailed(#[from] winit::error::OsError),

    // ========================================================================
    // I/O & Encoding Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image resize or GIF encoding error.
    #[error("Image encode error: {0}")]
    ImageEncodeError(String),
}

impl From<image::ImageError> for TimepieceError {
    fn from(err: image::ImageError) -> Self {
        TimepieceError::ImageEncodeError(err.to_string())
    }
}

impl From<wgpu::BufferAsyncError> for TimepieceError {
    fn from(err: wgpu::BufferAsyncError) -> Self {
        TimepieceError::CaptureFailed(err.to_string())
    }
}

/// Alias for `Result<T, TimepieceError>`.
pub type Result<T> = std::result::Result<T, TimepieceError>;
