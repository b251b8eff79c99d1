use glam::Quat;

/// Interpolation techniques for time sequences of unit quaternions.
///
/// Both techniques take the shortest arc between neighboring samples and
/// always return a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenRotations {
    /// Normalized linear interpolation: cheap, commutative, but not
    /// constant-velocity across an interval.
    Nlerp,
    /// Spherical linear interpolation.
    #[default]
    Slerp,
}

impl TweenRotations {
    /// Interpolates among samples at the given time.
    ///
    /// Same sampling contract as [`crate::TweenVectors::interpolate`]:
    /// clamped at both ends, exact at stored sample times.
    #[must_use]
    pub fn interpolate(self, time: f32, times: &[f32], rotations: &[Quat]) -> Quat {
        assert_eq!(times.len(), rotations.len(), "channel length mismatch");
        assert!(!times.is_empty(), "no samples");

        let last = times.len() - 1;
        if last == 0 || time <= times[0] {
            return rotations[0];
        }
        let index1 = times.partition_point(|&t| t <= time).saturating_sub(1);
        if index1 >= last {
            return rotations[last];
        }

        let index2 = index1 + 1;
        let interval = times[index2] - times[index1];
        if interval <= 0.0 {
            return rotations[index1];
        }
        let t = (time - times[index1]) / interval;
        if t <= 0.0 {
            return rotations[index1];
        }

        let q1 = rotations[index1];
        let q2 = rotations[index2];
        match self {
            Self::Nlerp => q1.lerp(q2, t),
            Self::Slerp => q1.slerp(q2, t),
        }
    }
}
