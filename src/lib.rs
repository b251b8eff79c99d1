#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod edit;
pub mod errors;
pub mod mapping;
pub mod pose;
pub mod retarget;
pub mod skeleton;
pub mod track;
pub mod transform;
pub mod tween;

pub use animation::Animation;
pub use errors::{MarrowError, Result};
pub use mapping::{BoneMapping, SkeletonMapping};
pub use pose::Pose;
pub use retarget::retarget_animation;
pub use skeleton::{Bone, Skeleton};
pub use track::BoneTrack;
pub use transform::Transform;
pub use tween::{TweenRotations, TweenTransforms, TweenVectors, VectorCurve};
