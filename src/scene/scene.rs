use std::path::Path;

use glam::{Mat4, Vec2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::animation::{
    AnimatedProperty, Curve, Interpolation, Keyframe, NodeAnimation, PropertyKind,
};
use crate::errors::{Result, TimepieceError};
use crate::scene::description::{
    RawAnimation, RawCamera, RawCurve, RawId, RawNode, RawProperty, SceneDescription,
};
use crate::scene::node::{CameraData, DEFAULT_MESH_COLOR, MeshData, Node, NodeKind};

/// A validated, read-only scene.
///
/// Built once from the exporter's description and never mutated afterwards:
/// the type has no mutable accessors, so sharing it (`&Scene` or `Arc<Scene>`)
/// between the evaluator, the mesh builder and the renderer is always safe.
///
/// Invariants established at load time:
/// - node ids are unique;
/// - every parent exists and precedes its children in `nodes()`;
/// - the camera exists and carries a perspective matrix;
/// - every mesh has non-empty positions and cells;
/// - every property has the component count its kind requires.
#[derive(Debug, Clone)]
pub struct Scene {
    title: Option<String>,
    start: f32,
    end: f32,
    background: [f32; 3],

    nodes: Vec<Node>,
    index: FxHashMap<String, usize>,

    camera: usize,
    pivot: Option<usize>,
    /// Loaded from the embedded-camera layout.
    legacy_layout: bool,
}

impl Scene {
    /// Parses and validates a scene from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let description = SceneDescription::from_json(json)?;
        Self::from_description(description)
    }

    /// Reads, parses and validates a scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&text)?;
        log::info!(
            "Loaded scene '{}' from {}: {} nodes, frames {}..{}",
            scene.title().unwrap_or("untitled"),
            path.display(),
            scene.nodes.len(),
            scene.start,
            scene.end
        );
        Ok(scene)
    }

    pub fn from_description(description: SceneDescription) -> Result<Self> {
        let legacy_layout = description.is_legacy();
        let SceneDescription {
            start,
            end,
            title,
            bg,
            camera,
            objs,
        } = description;

        let background = parse_color(&bg.color)?;

        // Normalize both camera layouts into a flat, parent-referencing node list
        let (camera_id, raw_nodes) = match camera {
            RawCamera::Reference(id) => (id.into_string(), objs),
            RawCamera::Embedded(legacy) => {
                let pivot_id = legacy.pivot.id.clone();
                let camera_id = legacy.id.clone().into_string();

                let mut nodes = Vec::with_capacity(objs.len() + 2);
                nodes.push(RawNode {
                    anim: legacy.pivot.anim,
                    ..bare_node(legacy.pivot.id)
                });
                nodes.push(RawNode {
                    kind: Some("camera".to_string()),
                    parent: Some(pivot_id),
                    perspective: Some(legacy.perspective),
                    anim: legacy.anim,
                    ..bare_node(legacy.id)
                });
                nodes.extend(objs.into_iter().map(|mut obj| {
                    obj.kind.get_or_insert_with(|| "mesh".to_string());
                    obj
                }));
                (camera_id, nodes)
            }
        };

        let mut index = FxHashMap::default();
        let mut pending = Vec::with_capacity(raw_nodes.len());
        for (i, raw) in raw_nodes.into_iter().enumerate() {
            let id = raw.id.clone().into_string();
            if index.insert(id.clone(), i).is_some() {
                return Err(TimepieceError::DuplicateNode(id));
            }
            pending.push((id, raw));
        }

        let mut nodes = Vec::with_capacity(pending.len());
        for (i, (id, mut raw)) in pending.into_iter().enumerate() {
            let parent = match raw.parent.take() {
                Some(parent_id) => {
                    let parent_id = parent_id.into_string();
                    match index.get(&parent_id) {
                        None => {
                            return Err(TimepieceError::DanglingParent {
                                node: id,
                                parent: parent_id,
                            });
                        }
                        Some(&p) if p >= i => {
                            return Err(TimepieceError::ParentOrder {
                                node: id,
                                parent: parent_id,
                            });
                        }
                        Some(&p) => Some(p),
                    }
                }
                None => None,
            };

            let animation = convert_animation(&id, std::mem::take(&mut raw.anim))?;
            let kind = convert_kind(&id, raw)?;

            nodes.push(Node {
                id,
                parent,
                kind,
                animation,
            });
        }

        let camera = *index
            .get(&camera_id)
            .ok_or_else(|| TimepieceError::MissingCamera(camera_id.clone()))?;
        if nodes[camera].camera().is_none() {
            return Err(TimepieceError::MissingPerspective(camera_id));
        }
        let pivot = nodes[camera].parent;

        Ok(Self {
            title,
            start,
            end,
            background,
            nodes,
            index,
            camera,
            pivot,
            legacy_layout,
        })
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> f32 {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Background color (linear RGB, 0..1).
    #[inline]
    #[must_use]
    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    /// All nodes, parents before children.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Scene index of the active camera.
    #[inline]
    #[must_use]
    pub fn camera_index(&self) -> usize {
        self.camera
    }

    #[must_use]
    pub fn camera(&self) -> &CameraData {
        match &self.nodes[self.camera].kind {
            NodeKind::Camera(camera) => camera,
            _ => unreachable!("camera kind is checked at load time"),
        }
    }

    /// Scene index of the camera pivot (the camera's parent), if any.
    #[inline]
    #[must_use]
    pub fn pivot_index(&self) -> Option<usize> {
        self.pivot
    }

    /// Whether the scene came from the embedded-camera layout.
    ///
    /// In that layout the input tilt is applied on top of the pivot's own
    /// transform instead of inside it.
    #[inline]
    #[must_use]
    pub fn is_legacy_layout(&self) -> bool {
        self.legacy_layout
    }

    /// Mesh nodes in scene order, with their scene index.
    pub fn meshes(&self) -> impl Iterator<Item = (usize, &Node, &MeshData)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.mesh().map(|mesh| (i, node, mesh)))
    }

    /// Maps a normalized position `y ∈ [0, 1]` onto the frame range.
    #[inline]
    #[must_use]
    pub fn frame_at(&self, y: f32) -> f32 {
        self.start + y * (self.end - self.start)
    }
}

fn bare_node(id: RawId) -> RawNode {
    RawNode {
        id,
        kind: None,
        parent: None,
        positions: None,
        cells: None,
        mat: None,
        subsurf: None,
        shapes: None,
        perspective: None,
        anim: RawAnimation::default(),
    }
}

fn parse_color(channels: &[f32]) -> Result<[f32; 3]> {
    match channels {
        [r, g, b, ..] => Ok([*r, *g, *b]),
        _ => Err(TimepieceError::InvalidColor(channels.len())),
    }
}

fn convert_kind(id: &str, raw: RawNode) -> Result<NodeKind> {
    match raw.kind.as_deref() {
        Some("mesh") => {
            let positions = raw.positions.unwrap_or_default();
            let cells = raw.cells.unwrap_or_default();
            if positions.is_empty() || cells.is_empty() {
                return Err(TimepieceError::EmptyGeometry(id.to_string()));
            }
            let color = match raw.mat {
                Some(mat) => parse_color(&mat.color)?,
                None => DEFAULT_MESH_COLOR,
            };
            Ok(NodeKind::Mesh(MeshData {
                positions,
                cells,
                color,
                subdivision_level: raw.subsurf.filter(|&level| level > 0),
                morph_shapes: raw.shapes.unwrap_or_default(),
            }))
        }
        Some("camera") => {
            let perspective = raw
                .perspective
                .ok_or_else(|| TimepieceError::MissingPerspective(id.to_string()))?;
            let values: [f32; 16] =
                perspective
                    .as_slice()
                    .try_into()
                    .map_err(|_| TimepieceError::PropertyArity {
                        node: id.to_string(),
                        property: "perspective",
                        expected: 16,
                        actual: perspective.len(),
                    })?;
            Ok(NodeKind::Camera(CameraData {
                perspective: Mat4::from_cols_array(&values),
            }))
        }
        Some(other) => {
            log::debug!("Node '{id}' has type '{other}', treating it as an empty");
            Ok(NodeKind::Empty)
        }
        None => Ok(NodeKind::Empty),
    }
}

fn convert_curve(raw: RawCurve) -> Option<Curve> {
    let keyframes = raw
        .points
        .into_iter()
        .map(|point| {
            let co = Vec2::from_array(point.co);
            let left = point.left.map_or(co, Vec2::from_array);
            let right = point.right.map_or(co, Vec2::from_array);
            Keyframe::new(co.x, co.y, Interpolation::from_name(&point.interpolation))
                .with_handles(left, right)
        })
        .collect();
    Curve::new(keyframes)
}

fn convert_property(
    node: &str,
    kind: PropertyKind,
    raw: RawProperty,
) -> Result<AnimatedProperty> {
    let property = match raw {
        RawProperty::Static(values) => AnimatedProperty::Static(SmallVec::from_vec(values)),
        RawProperty::Anim(curves) => {
            let mut converted = Vec::with_capacity(curves.len());
            for (index, curve) in curves.into_iter().enumerate() {
                let curve = convert_curve(curve).ok_or_else(|| TimepieceError::EmptyCurve {
                    node: node.to_string(),
                    property: kind.key(),
                    index,
                })?;
                converted.push(curve);
            }
            AnimatedProperty::Animated(converted)
        }
    };

    if let Some(expected) = kind.arity()
        && property.len() != expected
    {
        return Err(TimepieceError::PropertyArity {
            node: node.to_string(),
            property: kind.key(),
            expected,
            actual: property.len(),
        });
    }

    Ok(property)
}

fn convert_animation(node: &str, raw: RawAnimation) -> Result<NodeAnimation> {
    let convert = |kind, raw: Option<RawProperty>| {
        raw.map(|raw| convert_property(node, kind, raw)).transpose()
    };

    Ok(NodeAnimation {
        location: convert(PropertyKind::Location, raw.loc)?,
        rotation: convert(PropertyKind::RotationQuaternion, raw.rot)?,
        scale: convert(PropertyKind::Scale, raw.scale)?,
        morph_weights: convert(PropertyKind::MorphWeights, raw.shapes)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_accepts_rgba() {
        assert_eq!(parse_color(&[0.1, 0.2, 0.3, 1.0]).unwrap(), [0.1, 0.2, 0.3]);
        assert!(parse_color(&[0.1, 0.2]).is_err());
    }
}
