use glam::{Quat, Vec3};

use crate::errors::{MarrowError, Result};
use crate::transform::Transform;

/// A single bone's time series of keyframed transforms within one animation.
///
/// All channel arrays share the keyframe count (at least 1). Times are
/// non-decreasing and non-negative; a well-formed track has strictly
/// increasing times starting at 0 — repairs for sloppy imports live in
/// [`crate::edit::remove_repeats`]. The scale channel is optional; absent
/// means unit scale everywhere.
///
/// Tracks are immutable after construction: every editing operation consumes
/// a reference and returns a new track.
#[derive(Debug, Clone)]
pub struct BoneTrack {
    bone_index: usize,
    times: Vec<f32>,
    translations: Vec<Vec3>,
    rotations: Vec<Quat>,
    scales: Option<Vec<Vec3>>,
}

impl BoneTrack {
    /// Validates channel lengths and time ordering.
    pub fn new(
        bone_index: usize,
        times: Vec<f32>,
        translations: Vec<Vec3>,
        rotations: Vec<Quat>,
        scales: Option<Vec<Vec3>>,
    ) -> Result<Self> {
        let count = times.len();
        if count == 0 {
            return Err(MarrowError::EmptyTrack(bone_index));
        }
        if translations.len() != count {
            return Err(MarrowError::MismatchedChannels {
                bone: bone_index,
                channel: "translations",
                got: translations.len(),
                expected: count,
            });
        }
        if rotations.len() != count {
            return Err(MarrowError::MismatchedChannels {
                bone: bone_index,
                channel: "rotations",
                got: rotations.len(),
                expected: count,
            });
        }
        if let Some(scales) = &scales {
            if scales.len() != count {
                return Err(MarrowError::MismatchedChannels {
                    bone: bone_index,
                    channel: "scales",
                    got: scales.len(),
                    expected: count,
                });
            }
        }
        if times[0] < 0.0 {
            return Err(MarrowError::UnorderedTimes {
                bone: bone_index,
                index: 0,
            });
        }
        for index in 1..count {
            if times[index] < times[index - 1] {
                return Err(MarrowError::UnorderedTimes {
                    bone: bone_index,
                    index,
                });
            }
        }

        Ok(Self {
            bone_index,
            times,
            translations,
            rotations,
            scales,
        })
    }

    /// A single-keyframe track holding one transform at t=0.
    pub fn from_transform(bone_index: usize, transform: &Transform) -> Result<Self> {
        Self::new(
            bone_index,
            vec![0.0],
            vec![transform.translation],
            vec![transform.rotation],
            Some(vec![transform.scale]),
        )
    }

    /// Index of the bone this track animates.
    #[must_use]
    pub fn bone_index(&self) -> usize {
        self.bone_index
    }

    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[must_use]
    pub fn translations(&self) -> &[Vec3] {
        &self.translations
    }

    #[must_use]
    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    /// The scale channel, or `None` for implicit unit scale.
    #[must_use]
    pub fn scales(&self) -> Option<&[Vec3]> {
        self.scales.as_deref()
    }

    /// Time of the final keyframe.
    #[must_use]
    pub fn last_time(&self) -> f32 {
        *self.times.last().expect("track has at least one keyframe")
    }

    /// The stored transform of the indexed keyframe (unit scale when the
    /// track has no scale channel).
    #[must_use]
    pub fn transform_at(&self, index: usize) -> Transform {
        Transform {
            translation: self.translations[index],
            rotation: self.rotations[index],
            scale: self
                .scales
                .as_ref()
                .map_or(Vec3::ONE, |scales| scales[index]),
        }
    }

    /// Finds the keyframe whose time equals `time` exactly.
    #[must_use]
    pub fn find_keyframe_index(&self, time: f32) -> Option<usize> {
        self.times.iter().position(|&t| t == time)
    }

    /// Index of the last keyframe at or before `time` (0 when `time`
    /// precedes the first keyframe).
    #[must_use]
    pub fn find_previous_keyframe_index(&self, time: f32) -> usize {
        let next = self.times.partition_point(|&t| t <= time);
        next.saturating_sub(1)
    }
}
