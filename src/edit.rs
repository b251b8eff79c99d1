//! Pure editing primitives for single tracks.
//!
//! Every operation consumes a track by reference and returns a new one;
//! inputs are never mutated, so an edit either fully succeeds or fails
//! validation with nothing changed. Keyframe 0 defines the start pose and is
//! protected from [`delete_range`] and [`reduce`]; only [`behead`] replaces
//! it, because beheading moves the timeline origin itself.

use glam::Vec3;

use crate::errors::{MarrowError, Result};
use crate::track::BoneTrack;
use crate::transform::Transform;

/// Copies a track, deleting everything before `neck_time` and re-basing the
/// remaining keyframes so the track starts at 0.
///
/// `neck_transform` is the track value at the original `neck_time` (normally
/// interpolated via [`crate::TweenTransforms::transform`]); it becomes the
/// new keyframe 0. Beheading at 0 reproduces the input.
pub fn behead(
    track: &BoneTrack,
    neck_time: f32,
    neck_transform: &Transform,
    old_duration: f32,
) -> Result<BoneTrack> {
    if neck_time < 0.0 || neck_time > old_duration {
        return Err(MarrowError::InvalidTime {
            time: neck_time,
            min: 0.0,
            max: old_duration,
        });
    }

    let neck_index = track.find_previous_keyframe_index(neck_time);
    let old_count = track.keyframe_count();
    let new_count = old_count - neck_index;

    let mut times = Vec::with_capacity(new_count);
    let mut translations = Vec::with_capacity(new_count);
    let mut rotations = Vec::with_capacity(new_count);
    let mut scales = track.scales().map(|_| Vec::with_capacity(new_count));

    times.push(0.0);
    translations.push(neck_transform.translation);
    rotations.push(neck_transform.rotation);
    if let Some(scales) = &mut scales {
        scales.push(neck_transform.scale);
    }

    for new_index in 1..new_count {
        let old_index = new_index + neck_index;
        times.push(track.times()[old_index] - neck_time);
        translations.push(track.translations()[old_index]);
        rotations.push(track.rotations()[old_index]);
        if let Some(scales) = &mut scales {
            scales.push(track.scales().expect("channel present")[old_index]);
        }
    }

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track, dropping all keyframes after `end_time`.
///
/// When no keyframe sits at exactly `end_time`, one is appended from
/// `end_transform` (normally interpolated at that time) so the truncated
/// track still ends with a defined pose.
pub fn truncate(track: &BoneTrack, end_time: f32, end_transform: &Transform) -> Result<BoneTrack> {
    if end_time < 0.0 {
        return Err(MarrowError::InvalidTime {
            time: end_time,
            min: 0.0,
            max: f32::INFINITY,
        });
    }

    let keep = 1 + track.find_previous_keyframe_index(end_time);
    let ends_exactly = track.times()[keep - 1] == end_time;
    let new_count = if ends_exactly { keep } else { keep + 1 };

    let mut times = track.times()[..keep].to_vec();
    let mut translations = track.translations()[..keep].to_vec();
    let mut rotations = track.rotations()[..keep].to_vec();
    let mut scales = track.scales().map(|channel| channel[..keep].to_vec());

    if !ends_exactly {
        times.push(end_time);
        translations.push(end_transform.translation);
        rotations.push(end_transform.rotation);
        if let Some(scales) = &mut scales {
            scales.push(end_transform.scale);
        }
    }
    debug_assert_eq!(times.len(), new_count);

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track, deleting a contiguous range of keyframes.
///
/// The range must lie within [1, last]; keyframe 0 can never be deleted.
pub fn delete_range(track: &BoneTrack, start_index: usize, count: usize) -> Result<BoneTrack> {
    let last_index = track.keyframe_count() - 1;
    if start_index < 1 || start_index > last_index {
        return Err(MarrowError::InvalidIndex {
            index: start_index,
            min: 1,
            max: last_index,
        });
    }
    if count < 1 || start_index + count - 1 > last_index {
        return Err(MarrowError::InvalidIndex {
            index: start_index + count.saturating_sub(1),
            min: 1,
            max: last_index,
        });
    }

    let keep = |index: &usize| *index < start_index || *index >= start_index + count;
    let indices: Vec<usize> = (0..=last_index).filter(keep).collect();

    let times = indices.iter().map(|&i| track.times()[i]).collect();
    let translations = indices.iter().map(|&i| track.translations()[i]).collect();
    let rotations = indices.iter().map(|&i| track.rotations()[i]).collect();
    let scales = track
        .scales()
        .map(|channel| indices.iter().map(|&i| channel[i]).collect());

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track, inserting a keyframe at a time that doesn't already have
/// one, keeping times sorted.
///
/// The result always carries a scale channel; a track that had none gets
/// unit scale at every pre-existing keyframe.
pub fn insert_keyframe(track: &BoneTrack, time: f32, transform: &Transform) -> Result<BoneTrack> {
    if time <= 0.0 {
        return Err(MarrowError::InvalidTime {
            time,
            min: 0.0,
            max: f32::INFINITY,
        });
    }
    if track.find_keyframe_index(time).is_some() {
        return Err(MarrowError::KeyframeExists(time));
    }

    let old_count = track.keyframe_count();
    let new_count = old_count + 1;
    let mut times = Vec::with_capacity(new_count);
    let mut translations = Vec::with_capacity(new_count);
    let mut rotations = Vec::with_capacity(new_count);
    let mut scales = Vec::with_capacity(new_count);

    let mut added = false;
    for old_index in 0..old_count {
        if !added && track.times()[old_index] > time {
            times.push(time);
            translations.push(transform.translation);
            rotations.push(transform.rotation);
            scales.push(transform.scale);
            added = true;
        }
        times.push(track.times()[old_index]);
        translations.push(track.translations()[old_index]);
        rotations.push(track.rotations()[old_index]);
        scales.push(track.scales().map_or(Vec3::ONE, |channel| channel[old_index]));
    }
    if !added {
        times.push(time);
        translations.push(transform.translation);
        rotations.push(transform.rotation);
        scales.push(transform.scale);
    }

    BoneTrack::new(
        track.bone_index(),
        times,
        translations,
        rotations,
        Some(scales),
    )
}

/// Copies a track, overwriting the indexed keyframe's transform.
///
/// Like [`insert_keyframe`], the result always carries a scale channel.
pub fn replace_keyframe(
    track: &BoneTrack,
    frame_index: usize,
    transform: &Transform,
) -> Result<BoneTrack> {
    let count = track.keyframe_count();
    if frame_index >= count {
        return Err(MarrowError::InvalidIndex {
            index: frame_index,
            min: 0,
            max: count - 1,
        });
    }

    let times = track.times().to_vec();
    let mut translations = Vec::with_capacity(count);
    let mut rotations = Vec::with_capacity(count);
    let mut scales = Vec::with_capacity(count);

    for index in 0..count {
        if index == frame_index {
            translations.push(transform.translation);
            rotations.push(transform.rotation);
            scales.push(transform.scale);
        } else {
            translations.push(track.translations()[index]);
            rotations.push(track.rotations()[index]);
            scales.push(track.scales().map_or(Vec3::ONE, |channel| channel[index]));
        }
    }

    BoneTrack::new(
        track.bone_index(),
        times,
        translations,
        rotations,
        Some(scales),
    )
}

/// Copies a track, keeping only every `factor`-th keyframe (decimation, not
/// interpolation). Keyframe 0 is always retained.
pub fn reduce(track: &BoneTrack, factor: usize) -> Result<BoneTrack> {
    if factor < 2 {
        return Err(MarrowError::InvalidFactor(factor));
    }

    let old_count = track.keyframe_count();
    let new_count = 1 + (old_count - 1) / factor;
    let indices: Vec<usize> = (0..new_count).map(|i| i * factor).collect();

    let times = indices.iter().map(|&i| track.times()[i]).collect();
    let translations = indices.iter().map(|&i| track.translations()[i]).collect();
    let rotations = indices.iter().map(|&i| track.rotations()[i]).collect();
    let scales = track
        .scales()
        .map(|channel| indices.iter().map(|&i| channel[i]).collect());

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track, rescaling every keyframe time by
/// `new_duration / old_duration`. Keyframe count is unchanged; only playback
/// speed differs.
pub fn set_duration(track: &BoneTrack, new_duration: f32, old_duration: f32) -> Result<BoneTrack> {
    if new_duration < 0.0 {
        return Err(MarrowError::InvalidDuration(new_duration));
    }
    if old_duration <= 0.0 {
        if track.last_time() > 0.0 {
            return Err(MarrowError::InvalidDuration(old_duration));
        }
        // Single keyframe at t=0: nothing to rescale.
        return Ok(track.clone());
    }

    let times = track
        .times()
        .iter()
        .map(|&t| (t * new_duration / old_duration).clamp(0.0, new_duration))
        .collect();

    BoneTrack::new(
        track.bone_index(),
        times,
        track.translations().to_vec(),
        track.rotations().to_vec(),
        track.scales().map(<[Vec3]>::to_vec),
    )
}

/// Copies a track, forcing its first keyframe and its end-time keyframe to
/// precisely match so playback loops seamlessly.
///
/// When the track already ends with a keyframe at `duration`, both ends are
/// set to the blend of keyframe 0 and the end keyframe weighted by
/// `end_weight`; otherwise a copy of keyframe 0 is appended at `duration`.
/// Either way the value at 0 equals the value at `duration` exactly.
pub fn wrap(track: &BoneTrack, duration: f32, end_weight: f32) -> Result<BoneTrack> {
    if duration <= 0.0 {
        return Err(MarrowError::InvalidDuration(duration));
    }
    if !(0.0..=1.0).contains(&end_weight) {
        return Err(MarrowError::InvalidWeight(end_weight));
    }

    let old_count = track.keyframe_count();
    let (end_index, new_count, wrap_transform) = match track.find_keyframe_index(duration) {
        None => (old_count, old_count + 1, track.transform_at(0)),
        Some(end_index) => {
            let start = track.transform_at(0);
            let end = track.transform_at(end_index);
            let blended = Transform {
                translation: start.translation.lerp(end.translation, end_weight),
                rotation: start.rotation.slerp(end.rotation, end_weight),
                scale: start.scale.lerp(end.scale, end_weight),
            };
            (end_index, old_count, blended)
        }
    };
    debug_assert_eq!(end_index, new_count - 1);

    let mut times = Vec::with_capacity(new_count);
    let mut translations = Vec::with_capacity(new_count);
    let mut rotations = Vec::with_capacity(new_count);
    let mut scales = track.scales().map(|_| Vec::with_capacity(new_count));

    for index in 0..new_count {
        if index == 0 || index == end_index {
            times.push(if index == 0 { 0.0 } else { duration });
            translations.push(wrap_transform.translation);
            rotations.push(wrap_transform.rotation);
            if let Some(scales) = &mut scales {
                scales.push(wrap_transform.scale);
            }
        } else {
            times.push(track.times()[index]);
            translations.push(track.translations()[index]);
            rotations.push(track.rotations()[index]);
            if let Some(scales) = &mut scales {
                scales.push(track.scales().expect("channel present")[index]);
            }
        }
    }

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track, reversing the sequence of its keyframes in time.
pub fn reverse(track: &BoneTrack) -> Result<BoneTrack> {
    let count = track.keyframe_count();
    let last_time = track.last_time();
    let indices: Vec<usize> = (0..count).rev().collect();

    let times = indices.iter().map(|&i| last_time - track.times()[i]).collect();
    let translations = indices.iter().map(|&i| track.translations()[i]).collect();
    let rotations = indices.iter().map(|&i| track.rotations()[i]).collect();
    let scales = track
        .scales()
        .map(|channel| indices.iter().map(|&i| channel[i]).collect());

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track, delaying all keyframes by `delay` and inserting an
/// identity keyframe at 0. Keyframes that would land past `new_duration`
/// are dropped.
pub fn delay_all(track: &BoneTrack, delay: f32, new_duration: f32) -> Result<BoneTrack> {
    if delay < 0.0 || delay > new_duration {
        return Err(MarrowError::InvalidTime {
            time: delay,
            min: 0.0,
            max: new_duration,
        });
    }

    let kept_duration = new_duration - delay;
    let last_index = track.find_previous_keyframe_index(kept_duration);
    let add_frames = usize::from(delay > 0.0);
    let new_count = add_frames + last_index + 1;

    let mut times = Vec::with_capacity(new_count);
    let mut translations = Vec::with_capacity(new_count);
    let mut rotations = Vec::with_capacity(new_count);
    let mut scales = track.scales().map(|_| Vec::with_capacity(new_count));

    if add_frames == 1 {
        times.push(0.0);
        translations.push(Vec3::ZERO);
        rotations.push(glam::Quat::IDENTITY);
        if let Some(scales) = &mut scales {
            scales.push(Vec3::ONE);
        }
    }
    for old_index in 0..=last_index {
        times.push(track.times()[old_index] + delay);
        translations.push(track.translations()[old_index]);
        rotations.push(track.rotations()[old_index]);
        if let Some(scales) = &mut scales {
            scales.push(track.scales().expect("channel present")[old_index]);
        }
    }

    BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
}

/// Copies a track with repeated keyframe times removed (the first keyframe
/// of each run survives). Returns `None` when there is nothing to remove.
#[must_use]
pub fn remove_repeats(track: &BoneTrack) -> Option<BoneTrack> {
    let count = track.keyframe_count();
    let mut indices = Vec::with_capacity(count);
    let mut prev_time = f32::NEG_INFINITY;
    for (index, &time) in track.times().iter().enumerate() {
        if time != prev_time {
            indices.push(index);
        }
        prev_time = time;
    }
    if indices.len() == count {
        return None;
    }

    let times = indices.iter().map(|&i| track.times()[i]).collect();
    let translations = indices.iter().map(|&i| track.translations()[i]).collect();
    let rotations = indices.iter().map(|&i| track.rotations()[i]).collect();
    let scales = track
        .scales()
        .map(|channel| indices.iter().map(|&i| channel[i]).collect());

    let repaired =
        BoneTrack::new(track.bone_index(), times, translations, rotations, scales)
            .expect("repaired track is well-formed");
    Some(repaired)
}

/// Copies a track, moving one interior keyframe to a new time.
///
/// Returns `Ok(None)` when the new time would break strict ordering with the
/// neighboring keyframes or overrun `duration`.
pub fn set_frame_time(
    track: &BoneTrack,
    frame_index: usize,
    new_time: f32,
    duration: f32,
) -> Result<Option<BoneTrack>> {
    let count = track.keyframe_count();
    if frame_index < 1 || frame_index >= count {
        return Err(MarrowError::InvalidIndex {
            index: frame_index,
            min: 1,
            max: count.saturating_sub(1),
        });
    }
    if new_time <= 0.0 {
        return Err(MarrowError::InvalidTime {
            time: new_time,
            min: 0.0,
            max: duration,
        });
    }

    if new_time <= track.times()[frame_index - 1] {
        return Ok(None);
    }
    if frame_index < count - 1 {
        if new_time >= track.times()[frame_index + 1] {
            return Ok(None);
        }
    } else if new_time > duration {
        return Ok(None);
    }

    let mut times = track.times().to_vec();
    times[frame_index] = new_time;
    let moved = BoneTrack::new(
        track.bone_index(),
        times,
        track.translations().to_vec(),
        track.rotations().to_vec(),
        track.scales().map(<[Vec3]>::to_vec),
    )?;

    Ok(Some(moved))
}
