//! Serialized scene format.
//!
//! These types mirror the exporter's JSON one-to-one and do no validation; see
//! [`Scene::from_description`](crate::scene::Scene::from_description) for the
//! checks that turn a description into a renderable scene.
//!
//! Two camera layouts exist in the wild:
//! - the current one, where `camera` is the id of a node in `objs`
//!   (its parent, if any, is the pivot);
//! - an older one, where `camera` is an embedded object carrying its own
//!   `pivot` and every entry of `objs` is a mesh.

use serde::Deserialize;

/// Node identifiers are written either as strings or as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    pub start: f32,
    pub end: f32,
    #[serde(default)]
    pub title: Option<String>,
    pub bg: RawBackground,
    pub camera: RawCamera,
    #[serde(default)]
    pub objs: Vec<RawNode>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Whether the description uses the embedded-camera layout.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self.camera, RawCamera::Embedded(_))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBackground {
    pub color: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCamera {
    Reference(RawId),
    Embedded(RawLegacyCamera),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLegacyCamera {
    pub id: RawId,
    pub perspective: Vec<f32>,
    #[serde(default)]
    pub anim: RawAnimation,
    pub pivot: RawLegacyPivot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLegacyPivot {
    pub id: RawId,
    #[serde(default)]
    pub anim: RawAnimation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: RawId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub parent: Option<RawId>,
    #[serde(default)]
    pub positions: Option<Vec<[f32; 3]>>,
    #[serde(default)]
    pub cells: Option<Vec<Vec<u32>>>,
    #[serde(default)]
    pub mat: Option<RawMaterial>,
    #[serde(default)]
    pub subsurf: Option<u32>,
    #[serde(default)]
    pub shapes: Option<Vec<Vec<[f32; 3]>>>,
    #[serde(default)]
    pub perspective: Option<Vec<f32>>,
    #[serde(default)]
    pub anim: RawAnimation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMaterial {
    pub color: Vec<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnimation {
    #[serde(default)]
    pub loc: Option<RawProperty>,
    #[serde(default)]
    pub rot: Option<RawProperty>,
    #[serde(default)]
    pub scale: Option<RawProperty>,
    #[serde(default)]
    pub shapes: Option<RawProperty>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum RawProperty {
    Static(Vec<f32>),
    Anim(Vec<RawCurve>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurve {
    pub points: Vec<RawKeyframe>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawKeyframe {
    pub interpolation: String,
    pub co: [f32; 2],
    #[serde(default)]
    pub left: Option<[f32; 2]>,
    #[serde(default)]
    pub right: Option<[f32; 2]>,
}
