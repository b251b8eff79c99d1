use glam::Vec3;

/// Interpolation techniques for time sequences of `Vec3` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenVectors {
    /// Uniform Catmull-Rom cubic spline.
    CatmullRomSpline,
    /// Centripetal Catmull-Rom cubic spline (no cusps or self-intersections).
    CentripetalSpline,
    /// Finite-difference cubic spline.
    FdcSpline,
    /// Linear interpolation.
    #[default]
    Lerp,
}

/// Per-interval data a spline needs beyond the endpoint samples.
#[derive(Debug, Clone, Copy)]
enum SegmentAux {
    /// Hermite end slopes.
    Slopes { m1: Vec3, m2: Vec3 },
    /// Neighbor points and chord parameters for the centripetal form.
    /// `dt12 == 0` marks a degenerate interval that holds its start value.
    Neighbors {
        v0: Vec3,
        v3: Vec3,
        dt01: f32,
        dt12: f32,
        dt23: f32,
    },
    /// Nothing to precompute.
    None,
}

/// A precomputed curve for repeated evaluation of one vector channel.
#[derive(Debug, Clone)]
pub struct VectorCurve {
    technique: TweenVectors,
    times: Vec<f32>,
    values: Vec<Vec3>,
    intervals: Vec<f32>,
    aux: Vec<SegmentAux>,
}

impl TweenVectors {
    /// Interpolates among samples at the given time.
    ///
    /// Times must be ascending and match `values` in length (≥ 1). Queries at
    /// or before the first sample return it exactly; queries at or beyond the
    /// last sample return it exactly; queries at any sample time return the
    /// stored value.
    #[must_use]
    pub fn interpolate(self, time: f32, times: &[f32], values: &[Vec3]) -> Vec3 {
        assert_eq!(times.len(), values.len(), "channel length mismatch");
        assert!(!times.is_empty(), "no samples");

        let last = times.len() - 1;
        if last == 0 || time <= times[0] {
            return values[0];
        }
        let index1 = previous_index(time, times);
        if index1 >= last {
            return values[last];
        }

        let index2 = index1 + 1;
        let interval = times[index2] - times[index1];
        if interval <= 0.0 {
            return values[index1];
        }
        let t = (time - times[index1]) / interval;
        if t <= 0.0 {
            return values[index1];
        }

        match self {
            Self::Lerp => values[index1].lerp(values[index2], t),
            _ => {
                let aux = self.segment_aux(index1, times, values);
                eval_segment(t, interval, values[index1], values[index2], aux)
            }
        }
    }

    /// Precomputes per-interval spline parameters for repeated evaluation.
    #[must_use]
    pub fn precompute(self, times: &[f32], values: &[Vec3]) -> VectorCurve {
        assert_eq!(times.len(), values.len(), "channel length mismatch");
        assert!(!times.is_empty(), "no samples");

        let last = times.len() - 1;
        let mut intervals = Vec::with_capacity(last);
        let mut aux = Vec::with_capacity(last);
        for index1 in 0..last {
            intervals.push(times[index1 + 1] - times[index1]);
            aux.push(match self {
                Self::Lerp => SegmentAux::None,
                _ => self.segment_aux(index1, times, values),
            });
        }

        VectorCurve {
            technique: self,
            times: times.to_vec(),
            values: values.to_vec(),
            intervals,
            aux,
        }
    }

    /// The per-interval parameters for the interval starting at `index1`.
    fn segment_aux(self, index1: usize, times: &[f32], values: &[Vec3]) -> SegmentAux {
        let last = times.len() - 1;
        let index2 = index1 + 1;
        let v1 = values[index1];
        let v2 = values[index2];
        let inter12 = times[index2] - times[index1];

        match self {
            Self::Lerp => SegmentAux::None,

            Self::CatmullRomSpline | Self::FdcSpline => {
                let m1 = if index1 == 0 {
                    slope2(inter12, v1, v2)
                } else {
                    let v0 = values[index1 - 1];
                    let inter01 = times[index1] - times[index1 - 1];
                    self.slope3(inter01, inter12, v0, v1, v2)
                };
                let m2 = if index2 == last {
                    slope2(inter12, v1, v2)
                } else {
                    let v3 = values[index2 + 1];
                    let inter23 = times[index2 + 1] - times[index2];
                    self.slope3(inter12, inter23, v1, v2, v3)
                };
                SegmentAux::Slopes { m1, m2 }
            }

            Self::CentripetalSpline => {
                // Scan outward past any repeated samples so the chord
                // parameterization stays non-degenerate.
                let v0 = values[..index1]
                    .iter()
                    .rev()
                    .copied()
                    .find(|v| *v != v1)
                    .unwrap_or(v1 * 2.0 - v2);
                let v3 = values[index2 + 1..]
                    .iter()
                    .copied()
                    .find(|v| *v != v2)
                    .unwrap_or(v2 * 2.0 - v1);

                let dt12 = v1.distance(v2).sqrt();
                if dt12 == 0.0 {
                    SegmentAux::Neighbors {
                        v0,
                        v3,
                        dt01: 0.0,
                        dt12: 0.0,
                        dt23: 0.0,
                    }
                } else {
                    SegmentAux::Neighbors {
                        v0,
                        v3,
                        dt01: v0.distance(v1).sqrt(),
                        dt12,
                        dt23: v2.distance(v3).sqrt(),
                    }
                }
            }
        }
    }

    /// Slope estimate at the middle of 3 samples.
    fn slope3(self, dt01: f32, dt12: f32, v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
        match self {
            Self::CatmullRomSpline => (v2 - v0) / (dt01 + dt12),
            Self::FdcSpline => ((v1 - v0) / dt01 + (v2 - v1) / dt12) / 2.0,
            _ => unreachable!("slope estimation is spline-only"),
        }
    }
}

impl VectorCurve {
    /// Evaluates the curve at the given time.
    #[must_use]
    pub fn sample(&self, time: f32) -> Vec3 {
        let last = self.times.len() - 1;
        if last == 0 || time <= self.times[0] {
            return self.values[0];
        }
        let index1 = previous_index(time, &self.times);
        if index1 >= last {
            return self.values[last];
        }

        let interval = self.intervals[index1];
        if interval <= 0.0 {
            return self.values[index1];
        }
        let t = (time - self.times[index1]) / interval;
        if t <= 0.0 {
            return self.values[index1];
        }

        match self.technique {
            TweenVectors::Lerp => self.values[index1].lerp(self.values[index1 + 1], t),
            _ => eval_segment(
                t,
                interval,
                self.values[index1],
                self.values[index1 + 1],
                self.aux[index1],
            ),
        }
    }

    #[must_use]
    pub fn technique(&self) -> TweenVectors {
        self.technique
    }

    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[must_use]
    pub fn values(&self) -> &[Vec3] {
        &self.values
    }
}

/// Index of the last sample at or before `time` (0 when `time` precedes the
/// first sample).
fn previous_index(time: f32, times: &[f32]) -> usize {
    times.partition_point(|&t| t <= time).saturating_sub(1)
}

fn eval_segment(t: f32, interval: f32, v1: Vec3, v2: Vec3, aux: SegmentAux) -> Vec3 {
    match aux {
        SegmentAux::Slopes { m1, m2 } => hermite(t, interval, v1, v2, m1, m2),
        SegmentAux::Neighbors {
            v0,
            v3,
            dt01,
            dt12,
            dt23,
        } => {
            if dt12 == 0.0 {
                v1
            } else {
                centripetal(t, v0, v1, v2, v3, dt01, dt12, dt23)
            }
        }
        SegmentAux::None => v1.lerp(v2, t),
    }
}

/// Slope estimate between 2 samples.
fn slope2(dt: f32, v1: Vec3, v2: Vec3) -> Vec3 {
    (v2 - v1) / dt
}

/// Cubic spline in Hermite form over one interval; `t` in [0, 1].
fn hermite(t: f32, interval: f32, v1: Vec3, v2: Vec3, m1: Vec3, m2: Vec3) -> Vec3 {
    let u = 1.0 - t;
    let u2 = u * u;
    let h00 = (1.0 + 2.0 * t) * u2;
    let h01 = 1.0 - h00;
    let h10 = t * u2;
    let h11 = t * t * (t - 1.0);

    v1 * h00 + v2 * h01 + m1 * (interval * h10) + m2 * (interval * h11)
}

/// Centripetal Catmull-Rom over one interval via the pyramid of lerps;
/// `tt` in [0, 1], chord parameters all positive.
fn centripetal(
    tt: f32,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    v3: Vec3,
    dt01: f32,
    dt12: f32,
    dt23: f32,
) -> Vec3 {
    let t = tt * dt12;

    let a1 = v0.lerp(v1, (t + dt01) / dt01);
    let a2 = v1.lerp(v2, t / dt12);
    let a3 = v2.lerp(v3, (t - dt12) / dt23);

    let b1 = a1.lerp(a2, (t + dt01) / (dt01 + dt12));
    let b2 = a2.lerp(a3, t / (dt12 + dt23));

    b1.lerp(b2, t)
}
