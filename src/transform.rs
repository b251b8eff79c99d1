use glam::{Quat, Vec3};

/// A translation/rotation/scale triple.
///
/// Used both for bind-pose transforms in a [`crate::Skeleton`] and for the
/// per-keyframe samples of a [`crate::BoneTrack`]. Scale is componentwise;
/// a missing scale channel is equivalent to [`Vec3::ONE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: zero translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Exact comparison against [`Self::IDENTITY`].
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.translation == Vec3::ZERO
            && self.rotation == Quat::IDENTITY
            && self.scale == Vec3::ONE
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
