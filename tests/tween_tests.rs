//! Tween Interpolator Tests
//!
//! Tests for:
//! - Keyframe exactness of the default lerp/slerp techniques
//! - Clamping before the first and past the last keyframe
//! - Spline techniques (Catmull-Rom, centripetal, finite-difference)
//! - VectorCurve precomputation vs one-shot evaluation
//! - Track resampling (by rate, by count, at explicit times)

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Quat, Vec3};

use marrow::track::BoneTrack;
use marrow::tween::{TweenRotations, TweenTransforms, TweenVectors};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < EPSILON
}

fn approx_quat(a: Quat, b: Quat) -> bool {
    a.angle_between(b) < 1e-4
}

fn sample_track() -> BoneTrack {
    BoneTrack::new(
        0,
        vec![0.0, 1.0, 2.0],
        vec![
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
        ],
        vec![
            Quat::IDENTITY,
            Quat::from_rotation_x(FRAC_PI_2),
            Quat::from_rotation_y(FRAC_PI_2),
        ],
        Some(vec![Vec3::ONE, Vec3::splat(2.0), Vec3::splat(3.0)]),
    )
    .unwrap()
}

// ============================================================================
// Keyframe Exactness (default techniques)
// ============================================================================

#[test]
fn transform_exact_at_every_keyframe() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    for index in 0..track.keyframe_count() {
        let time = track.times()[index];
        let result = techniques.transform(&track, time, 2.0);
        let stored = track.transform_at(index);
        assert_eq!(
            result.translation, stored.translation,
            "translation drifted at keyframe {index}"
        );
        assert_eq!(
            result.rotation, stored.rotation,
            "rotation drifted at keyframe {index}"
        );
        assert_eq!(result.scale, stored.scale, "scale drifted at keyframe {index}");
    }
}

#[test]
fn transform_clamps_to_first_keyframe() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let at_zero = techniques.transform(&track, 0.0, 2.0);
    let before = techniques.transform(&track, -1.0, 2.0);
    assert_eq!(at_zero.translation, Vec3::ZERO);
    assert_eq!(before.translation, Vec3::ZERO);
    assert_eq!(before.rotation, Quat::IDENTITY);
}

#[test]
fn transform_clamps_to_duration() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let past = techniques.transform(&track, 99.0, 2.0);
    assert!(approx_vec3(past.translation, Vec3::new(4.0, 5.0, 6.0)));
}

#[test]
fn transform_single_keyframe_track() {
    let track = BoneTrack::new(
        3,
        vec![0.0],
        vec![Vec3::X],
        vec![Quat::from_rotation_z(1.0)],
        None,
    )
    .unwrap();
    let techniques = TweenTransforms::default();

    let result = techniques.transform(&track, 0.7, 2.0);
    assert_eq!(result.translation, Vec3::X);
    assert_eq!(result.scale, Vec3::ONE, "missing scale channel means unit scale");
}

// ============================================================================
// Midpoints
// ============================================================================

#[test]
fn lerp_midpoint() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let mid = techniques.transform(&track, 0.5, 2.0);
    assert!(approx_vec3(mid.translation, Vec3::new(0.5, 1.0, 1.5)));
    assert!(approx_vec3(mid.scale, Vec3::splat(1.5)));
}

#[test]
fn slerp_midpoint_is_half_rotation() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let mid = techniques.transform(&track, 0.5, 2.0);
    let expected = Quat::from_rotation_x(FRAC_PI_4);
    assert!(
        approx_quat(mid.rotation, expected),
        "expected 45-degree X rotation, got {:?}",
        mid.rotation
    );
}

#[test]
fn nlerp_matches_slerp_at_endpoints() {
    let times = [0.0, 1.0];
    let rotations = [Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)];

    for technique in [TweenRotations::Nlerp, TweenRotations::Slerp] {
        let start = technique.interpolate(0.0, &times, &rotations);
        let end = technique.interpolate(1.0, &times, &rotations);
        assert_eq!(start, rotations[0]);
        assert_eq!(end, rotations[1]);
    }
}

// ============================================================================
// Spline Techniques
// ============================================================================

const SPLINES: [TweenVectors; 3] = [
    TweenVectors::CatmullRomSpline,
    TweenVectors::CentripetalSpline,
    TweenVectors::FdcSpline,
];

#[test]
fn splines_exact_at_nodes() {
    let times = [0.0, 0.5, 1.25, 2.0];
    let values = [
        Vec3::ZERO,
        Vec3::new(1.0, 0.5, 0.0),
        Vec3::new(2.0, -1.0, 1.0),
        Vec3::new(0.0, 0.0, 3.0),
    ];

    for technique in SPLINES {
        for (index, &time) in times.iter().enumerate() {
            let result = technique.interpolate(time, &times, &values);
            assert_eq!(
                result, values[index],
                "{technique:?} drifted at node {index}"
            );
        }
    }
}

#[test]
fn hermite_splines_have_linear_precision() {
    // Collinear, evenly spaced samples: slope-based splines reproduce the
    // line exactly.
    let times = [0.0, 1.0, 2.0, 3.0];
    let values: Vec<Vec3> = times.iter().map(|&t| Vec3::new(t, 2.0 * t, -t)).collect();

    for technique in [TweenVectors::CatmullRomSpline, TweenVectors::FdcSpline] {
        for i in 0..=30 {
            let time = i as f32 * 0.1;
            let result = technique.interpolate(time, &times, &values);
            let expected = Vec3::new(time, 2.0 * time, -time);
            assert!(
                approx_vec3(result, expected),
                "{technique:?} at t={time}: expected {expected:?}, got {result:?}"
            );
        }
    }
}

#[test]
fn centripetal_stays_on_collinear_segment() {
    let times = [0.0, 1.0, 2.0, 3.0];
    let values: Vec<Vec3> = times.iter().map(|&t| Vec3::new(t, t, 0.0)).collect();

    let technique = TweenVectors::CentripetalSpline;
    for i in 0..=30 {
        let time = i as f32 * 0.1;
        let result = technique.interpolate(time, &times, &values);
        // Affine combinations of collinear points stay on the line y=x, z=0.
        assert!(approx(result.x, result.y), "left the line at t={time}: {result:?}");
        assert!(approx(result.z, 0.0));
    }
}

#[test]
fn centripetal_tolerates_repeated_samples() {
    let times = [0.0, 1.0, 2.0, 3.0];
    let values = [Vec3::ZERO, Vec3::X, Vec3::X, Vec3::new(2.0, 1.0, 0.0)];

    let technique = TweenVectors::CentripetalSpline;
    // The degenerate middle interval holds its start value.
    let result = technique.interpolate(1.5, &times, &values);
    assert!(approx_vec3(result, Vec3::X));
    // And the surrounding intervals still hit their nodes.
    assert_eq!(technique.interpolate(3.0, &times, &values), values[3]);
}

// ============================================================================
// VectorCurve
// ============================================================================

#[test]
fn curve_matches_one_shot_evaluation() {
    let times = [0.0, 0.5, 1.0, 1.5, 2.0];
    let values = [
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 1.0),
        Vec3::new(-1.0, 0.0, 2.0),
    ];

    for technique in [
        TweenVectors::Lerp,
        TweenVectors::CatmullRomSpline,
        TweenVectors::CentripetalSpline,
        TweenVectors::FdcSpline,
    ] {
        let curve = technique.precompute(&times, &values);
        for i in 0..=40 {
            let time = i as f32 * 0.05;
            let one_shot = technique.interpolate(time, &times, &values);
            let sampled = curve.sample(time);
            assert!(
                approx_vec3(one_shot, sampled),
                "{technique:?} at t={time}: one-shot {one_shot:?} != curve {sampled:?}"
            );
        }
    }
}

// ============================================================================
// Resampling
// ============================================================================

#[test]
fn resample_at_keyframe_subset_reproduces_keyframes() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let resampled = techniques.resample(&track, &[0.0, 1.0], 2.0).unwrap();
    assert_eq!(resampled.keyframe_count(), 2);
    for index in 0..2 {
        assert_eq!(resampled.times()[index], track.times()[index]);
        assert_eq!(resampled.translations()[index], track.translations()[index]);
        assert_eq!(resampled.rotations()[index], track.rotations()[index]);
    }
}

#[test]
fn resample_at_rate_spacing() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let resampled = techniques.resample_at_rate(&track, 2.0, 2.0).unwrap();
    assert_eq!(resampled.keyframe_count(), 5);
    let expected = [0.0, 0.5, 1.0, 1.5, 2.0];
    for (time, want) in resampled.times().iter().zip(expected) {
        assert!(approx(*time, want));
    }
}

#[test]
fn resample_to_number_hits_duration_exactly() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    let resampled = techniques.resample_to_number(&track, 7, 2.0).unwrap();
    assert_eq!(resampled.keyframe_count(), 7);
    assert_eq!(resampled.times()[0], 0.0);
    assert_eq!(resampled.times()[6], 2.0, "last sample must be exactly the duration");
}

#[test]
fn resample_keeps_scale_channel_presence() {
    let techniques = TweenTransforms::default();

    let with_scales = sample_track();
    let resampled = techniques.resample_at_rate(&with_scales, 4.0, 2.0).unwrap();
    assert!(resampled.scales().is_some());

    let without_scales = BoneTrack::new(
        0,
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::X],
        vec![Quat::IDENTITY, Quat::IDENTITY],
        None,
    )
    .unwrap();
    let resampled = techniques.resample_at_rate(&without_scales, 4.0, 1.0).unwrap();
    assert!(resampled.scales().is_none());
}

#[test]
fn resample_rejects_bad_arguments() {
    let track = sample_track();
    let techniques = TweenTransforms::default();

    assert!(techniques.resample_at_rate(&track, 0.0, 2.0).is_err());
    assert!(techniques.resample_at_rate(&track, -1.0, 2.0).is_err());
    assert!(techniques.resample_to_number(&track, 1, 2.0).is_err());
    assert!(techniques.resample_to_number(&track, 5, 0.0).is_err());
}
