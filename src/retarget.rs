//! Cross-skeleton animation retargeting.
//!
//! Transfers an animation authored for one skeleton onto a differently
//! structured skeleton through an explicit [`SkeletonMapping`]. Each mapped
//! target bone receives one new track sampled at the source track's own
//! keyframe times (or at t=0 when the source bone has no track, i.e. sits in
//! bind pose). Target bones without a mapping entry receive no track at all,
//! and source tracks without a mapping entry are ignored — neither is an
//! error.

use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::animation::Animation;
use crate::errors::{MarrowError, Result};
use crate::mapping::SkeletonMapping;
use crate::pose::Pose;
use crate::skeleton::Skeleton;
use crate::track::BoneTrack;
use crate::tween::TweenTransforms;

/// Retargets an animation from a source skeleton onto a target skeleton.
///
/// The result has the source animation's duration and the given
/// (non-reserved) name. One full source pose is composed per distinct
/// sample time; the resulting target poses are memoized across tracks, so
/// tracks sharing keyframe times share the composition work.
pub fn retarget_animation(
    source_animation: &Animation,
    source_skeleton: &Arc<Skeleton>,
    target_skeleton: &Arc<Skeleton>,
    mapping: &SkeletonMapping,
    techniques: &TweenTransforms,
    animation_name: &str,
) -> Result<Animation> {
    if Animation::is_reserved(animation_name) {
        return Err(MarrowError::ReservedName(animation_name.to_string()));
    }

    // Keyed by the bit pattern of the sample time: collision-free because
    // every key either comes from one of the source tracks' time arrays or
    // is the literal 0.0 bind-pose sample.
    let mut cache: FxHashMap<u32, Pose> = FxHashMap::default();
    let mut source_pose = Pose::bind(source_skeleton);

    let mut tracks = Vec::new();
    for target_index in 0..target_skeleton.bone_count() {
        let target_name = target_skeleton.bone(target_index).name();
        let Some(entry) = mapping.get(target_name) else {
            continue;
        };
        let Some(source_index) = source_skeleton.find_bone(&entry.source) else {
            log::warn!(
                "skipping target bone {target_name:?}: source skeleton {:?} has no bone {:?}",
                source_skeleton.name(),
                entry.source
            );
            continue;
        };

        let source_track = source_animation.find_track(source_index);
        let track = retarget_track(
            source_animation,
            source_track,
            &mut source_pose,
            target_skeleton,
            target_index,
            mapping,
            techniques,
            &mut cache,
        )?;
        tracks.push(track);
    }

    Animation::new(animation_name, source_animation.duration(), tracks)
}

/// Builds the retargeted track for one mapped target bone.
fn retarget_track(
    source_animation: &Animation,
    source_track: Option<&BoneTrack>,
    source_pose: &mut Pose,
    target_skeleton: &Arc<Skeleton>,
    target_bone_index: usize,
    mapping: &SkeletonMapping,
    techniques: &TweenTransforms,
    cache: &mut FxHashMap<u32, Pose>,
) -> Result<BoneTrack> {
    let times: Vec<f32> = match source_track {
        Some(track) => track.times().to_vec(),
        None => vec![0.0],
    };

    let count = times.len();
    let mut translations = Vec::with_capacity(count);
    let mut rotations = Vec::with_capacity(count);
    let mut scales: Vec<Vec3> = Vec::with_capacity(count);

    for &time in &times {
        let target_pose = cache.entry(time.to_bits()).or_insert_with(|| {
            source_pose.set_to_animation(source_animation, time, techniques);
            let mut pose = Pose::bind(target_skeleton);
            pose.set_to_retarget(source_pose, mapping);
            pose
        });

        let user = target_pose.user_transform(target_bone_index);
        translations.push(user.translation);
        rotations.push(user.rotation);
        scales.push(user.scale);
    }

    BoneTrack::new(
        target_bone_index,
        times,
        translations,
        rotations,
        Some(scales),
    )
}
