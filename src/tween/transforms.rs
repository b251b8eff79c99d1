use glam::Vec3;

use crate::errors::{MarrowError, Result};
use crate::track::BoneTrack;
use crate::transform::Transform;
use crate::tween::{TweenRotations, TweenVectors};

/// The bundle of techniques used to evaluate a whole track: one for
/// translations, one for rotations, one for scales.
///
/// The default bundle (lerp / slerp / lerp) is what playback uses; editors
/// swap in spline techniques for smoother resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TweenTransforms {
    pub translations: TweenVectors,
    pub rotations: TweenRotations,
    pub scales: TweenVectors,
}

impl TweenTransforms {
    /// Evaluates a track at the given animation time.
    ///
    /// The time is clamped to [0, duration]. At or before 0, and for
    /// single-keyframe tracks, the first keyframe is returned exactly.
    /// A track without a scale channel evaluates to unit scale.
    #[must_use]
    pub fn transform(&self, track: &BoneTrack, time: f32, duration: f32) -> Transform {
        let time = time.min(duration);
        if time <= 0.0 || track.keyframe_count() == 1 {
            return track.transform_at(0);
        }

        Transform {
            translation: self.translations.interpolate(
                time,
                track.times(),
                track.translations(),
            ),
            rotation: self
                .rotations
                .interpolate(time, track.times(), track.rotations()),
            scale: track.scales().map_or(Vec3::ONE, |scales| {
                self.scales.interpolate(time, track.times(), scales)
            }),
        }
    }

    /// Copies a track, sampling it at each of the given times.
    ///
    /// The scale channel is carried over only when the input has one.
    pub fn resample(&self, track: &BoneTrack, times: &[f32], duration: f32) -> Result<BoneTrack> {
        let count = times.len();
        let mut translations = Vec::with_capacity(count);
        let mut rotations = Vec::with_capacity(count);
        let mut scales: Option<Vec<Vec3>> =
            track.scales().map(|_| Vec::with_capacity(count));

        for &time in times {
            let transform = self.transform(track, time, duration);
            translations.push(transform.translation);
            rotations.push(transform.rotation);
            if let Some(scales) = &mut scales {
                scales.push(transform.scale);
            }
        }

        BoneTrack::new(
            track.bone_index(),
            times.to_vec(),
            translations,
            rotations,
            scales,
        )
    }

    /// Copies a track, resampling it at the given rate (frames per second).
    ///
    /// Produces `1 + ⌊duration · rate⌋` keyframes starting at 0.
    pub fn resample_at_rate(
        &self,
        track: &BoneTrack,
        sample_rate: f32,
        duration: f32,
    ) -> Result<BoneTrack> {
        if sample_rate <= 0.0 || !sample_rate.is_finite() {
            return Err(MarrowError::InvalidSampling(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        if duration < 0.0 {
            return Err(MarrowError::InvalidDuration(duration));
        }

        let count = 1 + (duration * sample_rate).floor() as usize;
        let times: Vec<f32> = (0..count).map(|index| index as f32 / sample_rate).collect();

        self.resample(track, &times, duration)
    }

    /// Copies a track, resampling it to a fixed number of evenly spaced
    /// keyframes from 0 to `duration` inclusive.
    pub fn resample_to_number(
        &self,
        track: &BoneTrack,
        sample_count: usize,
        duration: f32,
    ) -> Result<BoneTrack> {
        if sample_count < 2 {
            return Err(MarrowError::InvalidSampling(format!(
                "sample count must be at least 2, got {sample_count}"
            )));
        }
        if duration <= 0.0 || !duration.is_finite() {
            return Err(MarrowError::InvalidDuration(duration));
        }

        let times: Vec<f32> = (0..sample_count)
            .map(|index| {
                if index == sample_count - 1 {
                    duration // last sample lands exactly on the duration
                } else {
                    duration * index as f32 / (sample_count - 1) as f32
                }
            })
            .collect();

        self.resample(track, &times, duration)
    }
}
