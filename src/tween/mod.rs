//! Curve interpolation for keyframe channels.
//!
//! Vector channels (translation, scale) and rotation channels each carry a
//! selectable technique. The default pairing — linear vectors with shortest-
//! arc slerp — reproduces stored samples exactly at keyframe times; the
//! spline techniques trade that bit-exactness only *between* keyframes,
//! never at them.

mod rotations;
mod transforms;
mod vectors;

pub use rotations::TweenRotations;
pub use transforms::TweenTransforms;
pub use vectors::{TweenVectors, VectorCurve};
