//! Retargeting Tests
//!
//! Tests for:
//! - Mapping bijectivity and inversion
//! - Track scope: only mapped target bones receive tracks
//! - Identity-twist retargeting copies model-space rotation
//! - Twist correction composition
//! - Bind-pose sampling for mapped bones without a source track
//! - The two-bone elbow→joint transfer end to end

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::Arc;

use glam::{Quat, Vec3};

use marrow::animation::Animation;
use marrow::pose::Pose;
use marrow::retarget::retarget_animation;
use marrow::skeleton::{Bone, Skeleton};
use marrow::track::BoneTrack;
use marrow::transform::Transform;
use marrow::tween::TweenTransforms;
use marrow::{BoneMapping, SkeletonMapping};

fn approx_quat(a: Quat, b: Quat) -> bool {
    a.angle_between(b) < 1e-4
}

fn rotation_track(bone_index: usize, times: Vec<f32>, rotations: Vec<Quat>) -> BoneTrack {
    let count = times.len();
    BoneTrack::new(
        bone_index,
        times,
        vec![Vec3::ZERO; count],
        rotations,
        None,
    )
    .unwrap()
}

// ============================================================================
// SkeletonMapping
// ============================================================================

#[test]
fn mapping_rejects_reused_names_on_either_side() {
    let mut mapping = SkeletonMapping::new();
    mapping.map("hip", "pelvis").unwrap();

    assert!(mapping.map("hip", "other").is_err(), "target reuse");
    assert!(mapping.map("other", "pelvis").is_err(), "source reuse");
    assert_eq!(mapping.len(), 1);

    assert_eq!(mapping.get("hip").unwrap().source, "pelvis");
    assert_eq!(mapping.get_for_source("pelvis").unwrap().target, "hip");
    assert!(mapping.get("pelvis").is_none());
}

#[test]
fn mapping_inverse_swaps_sides_and_twists() {
    let twist = Quat::from_rotation_z(0.5);
    let mut mapping = SkeletonMapping::new();
    mapping.map_with_twist("hip", "pelvis", twist).unwrap();
    mapping.add(BoneMapping::new("chest", "spine2")).unwrap();

    let inverse = mapping.inverse();
    assert_eq!(inverse.len(), 2);
    let entry = inverse.get("pelvis").expect("sides swapped");
    assert_eq!(entry.source, "hip");
    assert!(approx_quat(entry.twist, twist.inverse()));
}

// ============================================================================
// Fixtures
// ============================================================================

/// Source rig: root with three children X, Y, Z.
fn source_skeleton() -> Arc<Skeleton> {
    Arc::new(
        Skeleton::new(
            "source",
            vec![
                Bone::root("root"),
                Bone::new("X", Some(0), Transform::IDENTITY),
                Bone::new("Y", Some(0), Transform::IDENTITY),
                Bone::new("Z", Some(0), Transform::IDENTITY),
            ],
        )
        .unwrap(),
    )
}

/// Target rig: root with three children A, B, C.
fn target_skeleton() -> Arc<Skeleton> {
    Arc::new(
        Skeleton::new(
            "target",
            vec![
                Bone::root("root"),
                Bone::new("A", Some(0), Transform::IDENTITY),
                Bone::new("B", Some(0), Transform::IDENTITY),
                Bone::new("C", Some(0), Transform::IDENTITY),
            ],
        )
        .unwrap(),
    )
}

// ============================================================================
// Track Scope
// ============================================================================

#[test]
fn only_mapped_target_bones_receive_tracks() {
    let source = source_skeleton();
    let target = target_skeleton();
    let techniques = TweenTransforms::default();

    let animation = Animation::new(
        "gesture",
        1.0,
        vec![
            rotation_track(1, vec![0.0, 1.0], vec![Quat::IDENTITY, Quat::from_rotation_x(1.0)]),
            rotation_track(2, vec![0.0, 1.0], vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)]),
            rotation_track(3, vec![0.0, 1.0], vec![Quat::IDENTITY, Quat::from_rotation_z(1.0)]),
        ],
    )
    .unwrap();

    let mut mapping = SkeletonMapping::new();
    mapping.map("A", "X").unwrap();
    mapping.map("B", "Y").unwrap();

    let retargeted =
        retarget_animation(&animation, &source, &target, &mapping, &techniques, "gesture")
            .unwrap();

    assert_eq!(retargeted.duration(), 1.0);
    assert_eq!(retargeted.track_count(), 2);
    let a = target.find_bone("A").unwrap();
    let b = target.find_bone("B").unwrap();
    let c = target.find_bone("C").unwrap();
    assert!(retargeted.find_track(a).is_some());
    assert!(retargeted.find_track(b).is_some());
    assert!(retargeted.find_track(c).is_none(), "unmapped target bone");
    assert!(
        retargeted.find_track(target.find_bone("root").unwrap()).is_none(),
        "source track Z has no mapping and must not leak through"
    );
}

#[test]
fn mapped_bone_without_source_track_samples_bind_pose() {
    let source = source_skeleton();
    let target = target_skeleton();
    let techniques = TweenTransforms::default();

    // No track for Y.
    let animation = Animation::new(
        "still",
        1.0,
        vec![rotation_track(1, vec![0.0, 1.0], vec![Quat::IDENTITY; 2])],
    )
    .unwrap();

    let mut mapping = SkeletonMapping::new();
    mapping.map("B", "Y").unwrap();

    let retargeted =
        retarget_animation(&animation, &source, &target, &mapping, &techniques, "still").unwrap();

    let track = retargeted.find_track(2).expect("track for B");
    assert_eq!(track.keyframe_count(), 1, "single bind-pose sample at t=0");
    assert_eq!(track.times(), &[0.0]);
    assert!(approx_quat(track.rotations()[0], Quat::IDENTITY));
}

#[test]
fn mapping_to_unknown_source_bone_is_skipped() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = source_skeleton();
    let target = target_skeleton();
    let techniques = TweenTransforms::default();

    let animation = Animation::new(
        "noop",
        1.0,
        vec![rotation_track(1, vec![0.0, 1.0], vec![Quat::IDENTITY; 2])],
    )
    .unwrap();

    let mut mapping = SkeletonMapping::new();
    mapping.map("A", "no such bone").unwrap();

    let retargeted =
        retarget_animation(&animation, &source, &target, &mapping, &techniques, "noop").unwrap();
    assert_eq!(retargeted.track_count(), 0);
}

#[test]
fn retarget_rejects_reserved_names() {
    let source = source_skeleton();
    let target = target_skeleton();
    let techniques = TweenTransforms::default();
    let animation = Animation::new(
        "ok",
        1.0,
        vec![rotation_track(1, vec![0.0, 1.0], vec![Quat::IDENTITY; 2])],
    )
    .unwrap();
    let mapping = SkeletonMapping::new();

    for name in ["", Animation::BIND_POSE_NAME, Animation::RETARGETED_POSE_NAME] {
        assert!(
            retarget_animation(&animation, &source, &target, &mapping, &techniques, name)
                .is_err()
        );
    }
}

// ============================================================================
// Rotation Transfer
// ============================================================================

#[test]
fn identity_twist_copies_model_space_rotation() {
    let source = source_skeleton();
    let target = target_skeleton();

    let mut mapping = SkeletonMapping::new();
    mapping.map("A", "X").unwrap();

    let mut source_pose = Pose::bind(&source);
    source_pose.set_user_rotation(1, Quat::from_rotation_y(0.8));

    let mut target_pose = Pose::bind(&target);
    target_pose.set_to_retarget(&source_pose, &mapping);

    let a = target.find_bone("A").unwrap();
    assert!(
        approx_quat(
            target_pose.model_orientation(a),
            source_pose.model_orientation(1)
        ),
        "identity twist must reproduce the source model-space orientation"
    );
    // Unmapped bones stay in bind pose.
    assert_eq!(target_pose.user_transform(2), Transform::IDENTITY);
}

#[test]
fn twist_composes_with_the_transferred_rotation() {
    let source = source_skeleton();
    let target = target_skeleton();

    let twist = Quat::from_rotation_z(FRAC_PI_2);
    let mut mapping = SkeletonMapping::new();
    mapping.map_with_twist("A", "X", twist).unwrap();

    let source_rotation = Quat::from_rotation_y(0.8);
    let mut source_pose = Pose::bind(&source);
    source_pose.set_user_rotation(1, source_rotation);

    let mut target_pose = Pose::bind(&target);
    target_pose.set_to_retarget(&source_pose, &mapping);

    let a = target.find_bone("A").unwrap();
    let expected = (source_rotation * twist).normalize();
    assert!(
        approx_quat(target_pose.user_rotation(a), expected),
        "twist must right-compose with the mapped rotation"
    );
}

#[test]
fn retarget_accounts_for_target_bind_rotation() {
    let source = source_skeleton();
    // The target's mapped bone is bind-rotated; its user rotation must
    // compensate so the model-space orientation still matches.
    let bind = Quat::from_rotation_z(0.6);
    let target = Arc::new(
        Skeleton::new(
            "bent",
            vec![
                Bone::root("root"),
                Bone::new("A", Some(0), Transform::from_rotation(bind)),
            ],
        )
        .unwrap(),
    );

    let mut mapping = SkeletonMapping::new();
    mapping.map("A", "X").unwrap();

    let mut source_pose = Pose::bind(&source);
    source_pose.set_user_rotation(1, Quat::from_rotation_x(0.9));

    let mut target_pose = Pose::bind(&target);
    target_pose.set_to_retarget(&source_pose, &mapping);

    assert!(approx_quat(
        target_pose.model_orientation(1),
        source_pose.model_orientation(1)
    ));
}

// ============================================================================
// End-to-End Transfer
// ============================================================================

#[test]
fn two_bone_elbow_to_joint_transfer() {
    let source = Arc::new(
        Skeleton::new(
            "arm",
            vec![Bone::root("root"), Bone::new("elbow", Some(0), Transform::IDENTITY)],
        )
        .unwrap(),
    );
    let target = Arc::new(
        Skeleton::new(
            "arm2",
            vec![Bone::root("root2"), Bone::new("joint", Some(0), Transform::IDENTITY)],
        )
        .unwrap(),
    );
    let techniques = TweenTransforms::default();

    let animation = Animation::new(
        "bend",
        1.0,
        vec![rotation_track(
            1,
            vec![0.0, 1.0],
            vec![Quat::IDENTITY, Quat::from_rotation_x(FRAC_PI_2)],
        )],
    )
    .unwrap();

    let mut mapping = SkeletonMapping::new();
    mapping.map("joint", "elbow").unwrap();

    let retargeted =
        retarget_animation(&animation, &source, &target, &mapping, &techniques, "bend").unwrap();

    assert_eq!(retargeted.duration(), 1.0);
    assert_eq!(retargeted.track_count(), 1);

    let joint = target.find_bone("joint").unwrap();
    let track = retargeted.find_track(joint).expect("track for joint");
    assert_eq!(track.times(), &[0.0, 1.0]);
    assert!(approx_quat(track.rotations()[0], Quat::IDENTITY));
    assert!(approx_quat(track.rotations()[1], Quat::from_rotation_x(FRAC_PI_2)));

    // Halfway through, the slerp midpoint: a 45-degree X rotation.
    let halfway = techniques.transform(track, 0.5, retargeted.duration());
    assert!(
        approx_quat(halfway.rotation, Quat::from_rotation_x(FRAC_PI_4)),
        "expected the 45-degree slerp midpoint, got {:?}",
        halfway.rotation
    );
}

#[test]
fn shared_sample_times_reuse_cached_poses() {
    // Two mapped bones whose source tracks share keyframe times; the
    // retargeted values must agree with retargeting each pose directly.
    let source = source_skeleton();
    let target = target_skeleton();
    let techniques = TweenTransforms::default();

    let rx = Quat::from_rotation_x(0.7);
    let ry = Quat::from_rotation_y(-0.4);
    let animation = Animation::new(
        "pair",
        2.0,
        vec![
            rotation_track(1, vec![0.0, 2.0], vec![Quat::IDENTITY, rx]),
            rotation_track(2, vec![0.0, 2.0], vec![Quat::IDENTITY, ry]),
        ],
    )
    .unwrap();

    let mut mapping = SkeletonMapping::new();
    mapping.map("A", "X").unwrap();
    mapping.map("B", "Y").unwrap();

    let retargeted =
        retarget_animation(&animation, &source, &target, &mapping, &techniques, "pair").unwrap();

    let mut source_pose = Pose::bind(&source);
    source_pose.set_to_animation(&animation, 2.0, &techniques);
    let mut expected_pose = Pose::bind(&target);
    expected_pose.set_to_retarget(&source_pose, &mapping);

    for bone in [1usize, 2] {
        let track = retargeted.find_track(bone).unwrap();
        assert!(
            approx_quat(track.rotations()[1], expected_pose.user_rotation(bone)),
            "cached pose diverged for bone {bone}"
        );
    }
}
