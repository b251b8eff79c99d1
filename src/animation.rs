//! Named sets of bone tracks.
//!
//! An [`Animation`] is immutable after construction: every editing method
//! builds and returns a new `Animation`, leaving the receiver untouched.
//! Replacing an animation in a collection is therefore a plain value swap,
//! and an undo history can hold the old value without any deep cloning.

use rustc_hash::FxHashSet;

use crate::edit;
use crate::errors::{MarrowError, Result};
use crate::pose::Pose;
use crate::track::BoneTrack;
use crate::tween::TweenTransforms;

/// A named, fixed-duration set of bone tracks, at most one per bone.
#[derive(Debug, Clone)]
pub struct Animation {
    name: String,
    duration: f32,
    tracks: Vec<BoneTrack>,
}

impl Animation {
    /// Pseudo-animation name denoting the bind pose (no animation loaded).
    pub const BIND_POSE_NAME: &'static str = "( bind pose )";
    /// Pseudo-animation name denoting a retargeted pose (no animation loaded).
    pub const RETARGETED_POSE_NAME: &'static str = "( retargeted pose )";

    /// Tests whether a name is unusable for a real animation: empty or one
    /// of the reserved pseudo-animation names.
    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        name.is_empty() || name == Self::BIND_POSE_NAME || name == Self::RETARGETED_POSE_NAME
    }

    /// Validates the name, duration, and track set.
    pub fn new(name: &str, duration: f32, tracks: Vec<BoneTrack>) -> Result<Self> {
        if Self::is_reserved(name) {
            return Err(MarrowError::ReservedName(name.to_string()));
        }
        if duration < 0.0 || !duration.is_finite() {
            return Err(MarrowError::InvalidDuration(duration));
        }

        let mut targets = FxHashSet::default();
        for track in &tracks {
            if !targets.insert(track.bone_index()) {
                return Err(MarrowError::DuplicateTrack {
                    name: name.to_string(),
                    bone: track.bone_index(),
                });
            }
            if track.last_time() > duration {
                return Err(MarrowError::InvalidTime {
                    time: track.last_time(),
                    min: 0.0,
                    max: duration,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            duration,
            tracks,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub fn tracks(&self) -> &[BoneTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The track animating the indexed bone, if any.
    #[must_use]
    pub fn find_track(&self, bone_index: usize) -> Option<&BoneTrack> {
        self.tracks
            .iter()
            .find(|track| track.bone_index() == bone_index)
    }

    /// A copy of this animation under a different (non-reserved) name.
    pub fn renamed(&self, new_name: &str) -> Result<Self> {
        Self::new(new_name, self.duration, self.tracks.clone())
    }

    /// A copy with one more track appended.
    pub fn with_track(&self, track: BoneTrack) -> Result<Self> {
        let mut tracks = self.tracks.clone();
        tracks.push(track);
        Self::new(&self.name, self.duration, tracks)
    }

    /// A copy with the track for one bone swapped out.
    pub fn with_replaced_track(&self, new_track: BoneTrack) -> Result<Self> {
        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                if track.bone_index() == new_track.bone_index() {
                    new_track.clone()
                } else {
                    track.clone()
                }
            })
            .collect();
        Self::new(&self.name, self.duration, tracks)
    }

    /// A copy without the track for the given bone.
    pub fn without_track(&self, bone_index: usize) -> Result<Self> {
        let tracks = self
            .tracks
            .iter()
            .filter(|track| track.bone_index() != bone_index)
            .cloned()
            .collect();
        Self::new(&self.name, self.duration, tracks)
    }

    /// Deletes everything before `neck_time` from every track and makes that
    /// instant the new start; the duration shrinks accordingly.
    pub fn behead(&self, neck_time: f32, techniques: &TweenTransforms) -> Result<Self> {
        if neck_time < 0.0 || neck_time > self.duration {
            return Err(MarrowError::InvalidTime {
                time: neck_time,
                min: 0.0,
                max: self.duration,
            });
        }

        let new_duration = self.duration - neck_time;
        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                let neck = techniques.transform(track, neck_time, self.duration);
                edit::behead(track, neck_time, &neck, self.duration)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, new_duration, tracks)
    }

    /// Truncates every track at `end_time`, synthesizing exact end keyframes,
    /// and makes that the new duration.
    pub fn truncate(&self, end_time: f32, techniques: &TweenTransforms) -> Result<Self> {
        if end_time < 0.0 || end_time > self.duration {
            return Err(MarrowError::InvalidTime {
                time: end_time,
                min: 0.0,
                max: self.duration,
            });
        }

        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                let end = techniques.transform(track, end_time, self.duration);
                edit::truncate(track, end_time, &end)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, end_time, tracks)
    }

    /// Changes the duration by rescaling every keyframe time proportionally
    /// (playback speeds up or slows down; keyframe counts are unchanged).
    pub fn set_duration_proportional(&self, new_duration: f32) -> Result<Self> {
        if new_duration < 0.0 || !new_duration.is_finite() {
            return Err(MarrowError::InvalidDuration(new_duration));
        }
        if new_duration == self.duration {
            return Ok(self.clone());
        }

        let tracks = self
            .tracks
            .iter()
            .map(|track| edit::set_duration(track, new_duration, self.duration))
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, new_duration, tracks)
    }

    /// Changes the duration without altering keyframe spacing: shrinking
    /// truncates the tracks, extending leaves them be (the last pose holds
    /// past the old end).
    pub fn set_duration_same(&self, new_duration: f32, techniques: &TweenTransforms) -> Result<Self> {
        if new_duration < 0.0 || !new_duration.is_finite() {
            return Err(MarrowError::InvalidDuration(new_duration));
        }
        if new_duration == self.duration {
            return Ok(self.clone());
        }

        if new_duration < self.duration {
            let truncated = self.truncate(new_duration, techniques)?;
            return Ok(truncated);
        }
        Self::new(&self.name, new_duration, self.tracks.clone())
    }

    /// Applies [`edit::wrap`] to every track so the whole animation loops
    /// seamlessly.
    pub fn wrap_all(&self, end_weight: f32) -> Result<Self> {
        let tracks = self
            .tracks
            .iter()
            .map(|track| edit::wrap(track, self.duration, end_weight))
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, self.duration, tracks)
    }

    /// Resamples every track at a fixed rate (frames per second).
    pub fn resample_at_rate(&self, sample_rate: f32, techniques: &TweenTransforms) -> Result<Self> {
        let tracks = self
            .tracks
            .iter()
            .map(|track| techniques.resample_at_rate(track, sample_rate, self.duration))
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, self.duration, tracks)
    }

    /// Resamples every track to a fixed number of evenly spaced keyframes.
    pub fn resample_to_number(
        &self,
        sample_count: usize,
        techniques: &TweenTransforms,
    ) -> Result<Self> {
        let tracks = self
            .tracks
            .iter()
            .map(|track| techniques.resample_to_number(track, sample_count, self.duration))
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, self.duration, tracks)
    }

    /// Reverses the keyframe sequence of every track.
    pub fn reverse(&self) -> Result<Self> {
        let tracks = self
            .tracks
            .iter()
            .map(edit::reverse)
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, self.duration, tracks)
    }

    /// Drops repeated-time keyframes from every track that has them.
    pub fn remove_repeats(&self) -> Result<Self> {
        let mut edited = 0usize;
        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                edit::remove_repeats(track).map_or_else(
                    || track.clone(),
                    |repaired| {
                        edited += 1;
                        repaired
                    },
                )
            })
            .collect();

        if edited > 0 {
            log::debug!(
                "removed repeated keyframes from {edited} track(s) of {:?}",
                self.name
            );
        }
        Self::new(&self.name, self.duration, tracks)
    }

    /// Inserts (or replaces) a keyframe in every track at the given time,
    /// capturing the pose's per-bone user transforms.
    pub fn insert_keyframes(&self, pose: &Pose, time: f32) -> Result<Self> {
        if time < 0.0 || time > self.duration {
            return Err(MarrowError::InvalidTime {
                time,
                min: 0.0,
                max: self.duration,
            });
        }

        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                let user = pose.user_transform(track.bone_index());
                match track.find_keyframe_index(time) {
                    Some(frame_index) => edit::replace_keyframe(track, frame_index, &user),
                    None => edit::insert_keyframe(track, time, &user),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, self.duration, tracks)
    }

    /// Deletes the keyframe at the given time (which must be > 0) from every
    /// track that has one there. Tracks without such a keyframe are carried
    /// over unchanged.
    pub fn delete_keyframes(&self, time: f32) -> Result<Self> {
        if time <= 0.0 || time > self.duration {
            return Err(MarrowError::InvalidTime {
                time,
                min: 0.0,
                max: self.duration,
            });
        }

        let tracks = self
            .tracks
            .iter()
            .map(|track| match track.find_keyframe_index(time) {
                Some(frame_index) if frame_index >= 1 => {
                    edit::delete_range(track, frame_index, 1)
                }
                _ => Ok(track.clone()),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(&self.name, self.duration, tracks)
    }

    /// Tests whether any track ends with a keyframe at exactly the duration.
    #[must_use]
    pub fn any_track_ends_with_keyframe(&self) -> bool {
        self.tracks
            .iter()
            .any(|track| track.find_keyframe_index(self.duration).is_some())
    }
}
