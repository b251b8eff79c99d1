//! Per-skeleton poses.
//!
//! A [`Pose`] stores one *user* transform per bone: the animation-authored
//! offset relative to the bone's bind transform. Identity user transforms
//! everywhere therefore mean bind pose. Local transforms apply the user
//! offset to the bind transform; model transforms chain local transforms
//! from the roots down.

use std::cell::RefCell;
use std::sync::Arc;

use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::animation::Animation;
use crate::errors::Result;
use crate::mapping::SkeletonMapping;
use crate::skeleton::Skeleton;
use crate::track::BoneTrack;
use crate::transform::Transform;
use crate::tween::TweenTransforms;

/// A transient snapshot of per-bone transforms for one skeleton.
///
/// Poses are created on demand, mutated freely, and discarded; they are
/// never persisted inside animations. Model-space transforms are computed
/// lazily and cached until any user transform changes.
#[derive(Debug, Clone)]
pub struct Pose {
    skeleton: Arc<Skeleton>,
    transforms: Vec<Transform>,
    model_cache: RefCell<Vec<Option<Transform>>>,
}

impl Pose {
    /// The bind pose of a skeleton: every user transform is identity.
    #[must_use]
    pub fn bind(skeleton: &Arc<Skeleton>) -> Self {
        let count = skeleton.bone_count();
        Self {
            skeleton: Arc::clone(skeleton),
            transforms: vec![Transform::IDENTITY; count],
            model_cache: RefCell::new(vec![None; count]),
        }
    }

    #[must_use]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.transforms.len()
    }

    /// The bind transform of the indexed bone (straight from the skeleton).
    #[must_use]
    pub fn bind_transform(&self, bone_index: usize) -> Transform {
        self.skeleton.bind_transform(bone_index)
    }

    // ========================================================================
    // User (bind-relative) transforms
    // ========================================================================

    #[must_use]
    pub fn user_transform(&self, bone_index: usize) -> Transform {
        self.transforms[bone_index]
    }

    #[must_use]
    pub fn user_translation(&self, bone_index: usize) -> Vec3 {
        self.transforms[bone_index].translation
    }

    #[must_use]
    pub fn user_rotation(&self, bone_index: usize) -> Quat {
        self.transforms[bone_index].rotation
    }

    #[must_use]
    pub fn user_scale(&self, bone_index: usize) -> Vec3 {
        self.transforms[bone_index].scale
    }

    pub fn set_user_transform(&mut self, bone_index: usize, transform: Transform) {
        self.transforms[bone_index] = transform;
        self.invalidate();
    }

    pub fn set_user_translation(&mut self, bone_index: usize, translation: Vec3) {
        self.transforms[bone_index].translation = translation;
        self.invalidate();
    }

    pub fn set_user_rotation(&mut self, bone_index: usize, rotation: Quat) {
        self.transforms[bone_index].rotation = rotation;
        self.invalidate();
    }

    pub fn set_user_scale(&mut self, bone_index: usize, scale: Vec3) {
        self.transforms[bone_index].scale = scale;
        self.invalidate();
    }

    pub fn reset_translation(&mut self, bone_index: usize) {
        self.set_user_translation(bone_index, Vec3::ZERO);
    }

    pub fn reset_rotation(&mut self, bone_index: usize) {
        self.set_user_rotation(bone_index, Quat::IDENTITY);
    }

    pub fn reset_scale(&mut self, bone_index: usize) {
        self.set_user_scale(bone_index, Vec3::ONE);
    }

    // ========================================================================
    // Whole-pose configuration
    // ========================================================================

    /// Resets every bone to bind pose.
    pub fn set_to_bind(&mut self) {
        for transform in &mut self.transforms {
            *transform = Transform::IDENTITY;
        }
        self.invalidate();
    }

    /// Configures this pose from an animation at the given time. Bones
    /// without a track stay in bind pose.
    pub fn set_to_animation(
        &mut self,
        animation: &Animation,
        time: f32,
        techniques: &TweenTransforms,
    ) {
        for index in 0..self.transforms.len() {
            self.transforms[index] = animation.find_track(index).map_or(
                Transform::IDENTITY,
                |track| techniques.transform(track, time, animation.duration()),
            );
        }
        self.invalidate();
    }

    /// Configures this pose by retargeting a pose of a different skeleton
    /// through a bone mapping.
    ///
    /// Bones are visited parents-first so each mapped bone sees its
    /// ancestors' already-retargeted orientations. Unmapped bones reset to
    /// bind pose; a mapping entry naming a source bone the source skeleton
    /// lacks contributes nothing (logged).
    pub fn set_to_retarget(&mut self, source_pose: &Pose, mapping: &SkeletonMapping) {
        let skeleton = Arc::clone(&self.skeleton);
        for &index in skeleton.pre_order_indices() {
            self.transforms[index] = Transform::IDENTITY;

            let Some(entry) = mapping.get(skeleton.bone(index).name()) else {
                continue;
            };
            let Some(source_index) = source_pose.skeleton().find_bone(&entry.source) else {
                log::warn!(
                    "mapping for target bone {:?} names unknown source bone {:?}",
                    entry.target,
                    entry.source
                );
                continue;
            };

            let model_orientation = source_pose.model_orientation(source_index);
            let user_rotation = self.user_for_model(index, model_orientation);
            self.transforms[index].rotation = (user_rotation * entry.twist).normalize();
        }
        self.invalidate();
    }

    // ========================================================================
    // Derived transforms
    // ========================================================================

    /// The local rotation of the indexed bone: bind rotation composed with
    /// the user rotation.
    #[must_use]
    pub fn local_rotation(&self, bone_index: usize) -> Quat {
        let bind = self.skeleton.bind_transform(bone_index);
        bind.rotation * self.transforms[bone_index].rotation
    }

    /// The local transform of the indexed bone: the bind transform with the
    /// user transform applied on top (translations added, rotations
    /// composed, scales multiplied componentwise).
    #[must_use]
    pub fn local_transform(&self, bone_index: usize) -> Transform {
        let bind = self.skeleton.bind_transform(bone_index);
        let user = self.transforms[bone_index];
        Transform {
            translation: bind.translation + user.translation,
            rotation: bind.rotation * user.rotation,
            scale: bind.scale * user.scale,
        }
    }

    /// The model-space transform of the indexed bone: local transforms
    /// composed along the ancestor chain. A root bone's model transform is
    /// its local transform.
    ///
    /// Results are cached until the pose is next mutated.
    #[must_use]
    pub fn model_transform(&self, bone_index: usize) -> Transform {
        if let Some(cached) = self.model_cache.borrow()[bone_index] {
            return cached;
        }

        // Walk up to the nearest cached ancestor, then fill downward.
        let mut chain: SmallVec<[usize; 16]> = SmallVec::new();
        let mut model: Option<Transform> = None;
        let mut current = Some(bone_index);
        while let Some(index) = current {
            if let Some(cached) = self.model_cache.borrow()[index] {
                model = Some(cached);
                break;
            }
            chain.push(index);
            current = self.skeleton.parent(index);
        }

        let mut cache = self.model_cache.borrow_mut();
        for &index in chain.iter().rev() {
            let local = self.local_transform(index);
            let combined = match model {
                Some(parent) => combine(&parent, &local),
                None => local,
            };
            cache[index] = Some(combined);
            model = Some(combined);
        }
        model.expect("ancestor chain is non-empty")
    }

    /// The model-space orientation of the indexed bone (rotation chain only).
    #[must_use]
    pub fn model_orientation(&self, bone_index: usize) -> Quat {
        let mut chain: SmallVec<[usize; 16]> = SmallVec::new();
        let mut current = Some(bone_index);
        while let Some(index) = current {
            chain.push(index);
            current = self.skeleton.parent(index);
        }

        let mut rotation = Quat::IDENTITY;
        for &index in chain.iter().rev() {
            rotation *= self.local_rotation(index);
        }
        rotation
    }

    /// The user rotation that would give the indexed bone the requested
    /// model-space orientation, accounting for its ancestors' current
    /// orientations and its own bind rotation.
    #[must_use]
    pub fn user_for_model(&self, bone_index: usize, model_rotation: Quat) -> Quat {
        let local = match self.skeleton.parent(bone_index) {
            None => model_rotation,
            Some(parent) => self.model_orientation(parent).inverse() * model_rotation,
        };
        let bind = self.skeleton.bind_transform(bone_index).rotation;
        bind.inverse() * local
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Converts this pose to a zero-duration animation with a single
    /// keyframe at t=0 for every bone not in bind pose.
    pub fn capture(&self, animation_name: &str) -> Result<Animation> {
        let mut tracks = Vec::new();
        for (index, user) in self.transforms.iter().enumerate() {
            if !user.is_identity() {
                tracks.push(BoneTrack::from_transform(index, user)?);
            }
        }
        Animation::new(animation_name, 0.0, tracks)
    }

    fn invalidate(&self) {
        for entry in self.model_cache.borrow_mut().iter_mut() {
            *entry = None;
        }
    }
}

/// Composes a parent model transform with a child's local transform: the
/// child's translation is rotated by the parent rotation, then scaled
/// componentwise, then offset.
fn combine(parent: &Transform, local: &Transform) -> Transform {
    Transform {
        rotation: parent.rotation * local.rotation,
        scale: parent.scale * local.scale,
        translation: (parent.rotation * local.translation) * parent.scale + parent.translation,
    }
}
