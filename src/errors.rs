//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`MarrowError`] covers all failure modes, which are
//! precondition violations rather than runtime faults:
//! - malformed skeletons (bad parent links, duplicate bone names)
//! - malformed tracks and animations (channel mismatches, unordered times)
//! - out-of-range arguments to editing operations
//! - naming conflicts in animations and bone mappings
//!
//! Every editing operation validates its arguments before allocating or
//! copying anything: it either returns a fully formed new value or an error
//! with no partial state left behind. Missing data — a bone without a track,
//! a bone without a mapping entry — is never an error; it simply contributes
//! nothing.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MarrowError>`.

use thiserror::Error;

/// The main error type for the crate.
///
/// Each variant names the argument or invariant that was violated.
#[derive(Error, Debug)]
pub enum MarrowError {
    // ========================================================================
    // Skeleton Errors
    // ========================================================================
    /// A bone has an empty name.
    #[error("Bone {0} has an empty name")]
    EmptyBoneName(usize),

    /// Two bones share the same name.
    #[error("Duplicate bone name: {0:?}")]
    DuplicateBoneName(String),

    /// A bone's parent index does not refer to an existing bone.
    #[error("Bone {bone} has an out-of-range parent index {parent}")]
    InvalidParent {
        /// Index of the offending bone
        bone: usize,
        /// The out-of-range parent index
        parent: usize,
    },

    /// The parent links contain a cycle.
    #[error("Bone hierarchy contains a cycle involving bone {0}")]
    CyclicHierarchy(usize),

    // ========================================================================
    // Track & Animation Errors
    // ========================================================================
    /// A track was constructed with no keyframes.
    #[error("Track for bone {0} has no keyframes")]
    EmptyTrack(usize),

    /// A track's channel arrays disagree in length.
    #[error("Track for bone {bone}: {channel} has {got} entries, expected {expected}")]
    MismatchedChannels {
        /// Index of the target bone
        bone: usize,
        /// Name of the offending channel
        channel: &'static str,
        /// Actual entry count
        got: usize,
        /// Expected entry count (= keyframe count)
        expected: usize,
    },

    /// Keyframe times are negative or decreasing.
    #[error("Track for bone {bone}: keyframe times out of order at index {index}")]
    UnorderedTimes {
        /// Index of the target bone
        bone: usize,
        /// Index of the first offending keyframe
        index: usize,
    },

    /// A keyframe already exists at the requested time.
    #[error("A keyframe already exists at time {0}")]
    KeyframeExists(f32),

    /// Two tracks target the same bone within one animation.
    #[error("Animation {name:?} has more than one track for bone {bone}")]
    DuplicateTrack {
        /// Animation name
        name: String,
        /// Index of the doubly-targeted bone
        bone: usize,
    },

    /// An animation name is empty or one of the reserved pseudo-names.
    #[error("Animation name {0:?} is reserved")]
    ReservedName(String),

    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// A time argument lies outside its permitted range.
    #[error("Time {time} out of range [{min}, {max}]")]
    InvalidTime {
        /// The offending time
        time: f32,
        /// Lower bound (inclusive)
        min: f32,
        /// Upper bound (inclusive)
        max: f32,
    },

    /// A keyframe index argument lies outside its permitted range.
    #[error("Keyframe index {index} out of range [{min}, {max}]")]
    InvalidIndex {
        /// The offending index
        index: usize,
        /// Lower bound (inclusive)
        min: usize,
        /// Upper bound (inclusive)
        max: usize,
    },

    /// A duration argument is negative or otherwise unusable.
    #[error("Invalid duration: {0}")]
    InvalidDuration(f32),

    /// A keyframe reduction factor below 2.
    #[error("Reduction factor must be at least 2, got {0}")]
    InvalidFactor(usize),

    /// A sample rate or sample count too small to resample with.
    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),

    /// A blend weight outside [0, 1].
    #[error("Weight {0} out of range [0, 1]")]
    InvalidWeight(f32),

    // ========================================================================
    // Mapping Errors
    // ========================================================================
    /// A bone mapping would reuse a target or source bone name.
    #[error("Bone mapping conflict: {side} bone {name:?} is already mapped")]
    DuplicateMapping {
        /// Which side of the mapping collided ("target" or "source")
        side: &'static str,
        /// The colliding bone name
        name: String,
    },
}

/// Alias for `Result<T, MarrowError>`.
pub type Result<T> = std::result::Result<T, MarrowError>;
