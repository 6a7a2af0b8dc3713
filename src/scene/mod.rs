//! Scene registry
//!
//! Loads the exporter's scene description and validates it into an immutable
//! [`Scene`]:
//! - `description`: serde mirror of the JSON format (both camera layouts)
//! - `node`: validated nodes (empty / camera / mesh)
//! - `scene`: the registry itself, with id lookup and frame range

pub mod description;
pub mod node;
pub mod scene;

pub use description::SceneDescription;
pub use node::{CameraData, DEFAULT_MESH_COLOR, MeshData, Node, NodeKind};
pub use scene::Scene;
