pub mod curve;
pub mod property;
pub mod state;
pub mod evaluator;

pub use curve::{Curve, Interpolation, Keyframe, sample};
pub use property::{AnimatedProperty, NodeAnimation, PropertyKind};
pub use state::{AnimationState, NodeState};
pub use evaluator::{External, ExternalOrder, ExternalTransforms, evaluate, evaluate_local, evaluate_scene, normalize_rotation};
