use smallvec::SmallVec;

use crate::animation::curve::Curve;

/// The animatable properties a node can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Location,
    RotationQuaternion,
    Scale,
    MorphWeights,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 4] = [
        PropertyKind::Location,
        PropertyKind::RotationQuaternion,
        PropertyKind::Scale,
        PropertyKind::MorphWeights,
    ];

    /// Key used for this property in the scene file.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            PropertyKind::Location => "loc",
            PropertyKind::RotationQuaternion => "rot",
            PropertyKind::Scale => "scale",
            PropertyKind::MorphWeights => "shapes",
        }
    }

    /// Fixed component count, if the property has one.
    #[must_use]
    pub fn arity(self) -> Option<usize> {
        match self {
            PropertyKind::Location | PropertyKind::Scale => Some(3),
            PropertyKind::RotationQuaternion => Some(4),
            PropertyKind::MorphWeights => None,
        }
    }
}

/// A property value that is either fixed or driven by one curve per component.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatedProperty {
    Static(SmallVec<[f32; 4]>),
    Animated(Vec<Curve>),
}

impl AnimatedProperty {
    /// Number of scalar components.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            AnimatedProperty::Static(values) => values.len(),
            AnimatedProperty::Animated(curves) => curves.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        matches!(self, AnimatedProperty::Animated(_))
    }

    /// Component `index` at `frame`.
    #[must_use]
    pub fn component(&self, index: usize, frame: f32) -> f32 {
        match self {
            AnimatedProperty::Static(values) => values[index],
            AnimatedProperty::Animated(curves) => curves[index].sample(frame),
        }
    }

    /// Writes every component at `frame` into `out`, which must hold `len()` slots.
    pub fn resolve_into(&self, frame: f32, out: &mut [f32]) {
        match self {
            AnimatedProperty::Static(values) => out.copy_from_slice(values),
            AnimatedProperty::Animated(curves) => {
                for (slot, curve) in out.iter_mut().zip(curves) {
                    *slot = curve.sample(frame);
                }
            }
        }
    }
}

/// Per-node animation data, one optional entry per [`PropertyKind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAnimation {
    pub location: Option<AnimatedProperty>,
    pub rotation: Option<AnimatedProperty>,
    pub scale: Option<AnimatedProperty>,
    pub morph_weights: Option<AnimatedProperty>,
}

impl NodeAnimation {
    #[must_use]
    pub fn get(&self, kind: PropertyKind) -> Option<&AnimatedProperty> {
        match kind {
            PropertyKind::Location => self.location.as_ref(),
            PropertyKind::RotationQuaternion => self.rotation.as_ref(),
            PropertyKind::Scale => self.scale.as_ref(),
            PropertyKind::MorphWeights => self.morph_weights.as_ref(),
        }
    }

    /// Whether any of location / rotation / scale is declared.
    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.location.is_some() || self.rotation.is_some() || self.scale.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_transform() && self.morph_weights.is_none()
    }
}
