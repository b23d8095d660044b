//! Smoothed-random-walk motion for the cube.
//!
//! Six independent one-dimensional axes (three rotation, three wander) each
//! run a randomized velocity walk: every so often a new velocity target is
//! drawn within `[-max_velocity, max_velocity]`, and the live velocity moves
//! toward it by at most `acceleration_limit` per tick. Smoothing in velocity
//! space keeps the first derivative of position continuous, which matters on
//! a display with no motion blur. Positions wrap into [0, 1) rather than
//! clamping, so rotation axes can spin forever while wander axes stay bounded
//! once the caller re-centers and scales them.

use std::ops::RangeInclusive;

use rand_core::SeedableRng;

use crate::constants::{
    RETARGET_TICKS_MAX, RETARGET_TICKS_MIN, ROTATION_ACCELERATION, ROTATION_MAX_VELOCITY,
    WANDER_ACCELERATION, WANDER_AMPLITUDE, WANDER_CENTER, WANDER_MAX_VELOCITY,
};
use crate::random::PseudoRandomSource;

/// Tuning for one group of random-walk axes.
#[derive(Clone, Debug)]
pub struct AxisParams {
    /// Hard bound on |velocity|, in position units per tick.
    pub max_velocity: f64,
    /// Largest velocity change applied in a single tick.
    pub acceleration_limit: f64,
    /// Ticks between velocity retargets, drawn uniformly from this range.
    pub retarget_ticks: RangeInclusive<u32>,
}

/// Tuning for the whole six-axis generator.
#[derive(Clone, Debug)]
pub struct MotionParams {
    pub rotation: AxisParams,
    pub wander: AxisParams,
    /// Scale applied per wander axis when deriving the world-space offset.
    pub wander_amplitude: [f64; 3],
    /// Raw-position value treated as the center of wander. Whether the
    /// original intended the geometric origin or the walk's steady-state mean
    /// is unknowable from the source, so it is tunable here.
    pub wander_center: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            rotation: AxisParams {
                max_velocity: ROTATION_MAX_VELOCITY,
                acceleration_limit: ROTATION_ACCELERATION,
                retarget_ticks: RETARGET_TICKS_MIN..=RETARGET_TICKS_MAX,
            },
            wander: AxisParams {
                max_velocity: WANDER_MAX_VELOCITY,
                acceleration_limit: WANDER_ACCELERATION,
                retarget_ticks: RETARGET_TICKS_MIN..=RETARGET_TICKS_MAX,
            },
            wander_amplitude: WANDER_AMPLITUDE,
            wander_center: WANDER_CENTER,
        }
    }
}

/// One scalar degree of freedom under smoothed random acceleration.
#[derive(Clone, Debug)]
pub struct RandomWalkAxis {
    position: f64,
    velocity: f64,
    velocity_target: f64,
    change_counter: u32,
    max_velocity: f64,
    acceleration_limit: f64,
    retarget_ticks: RangeInclusive<u32>,
    rng: PseudoRandomSource,
}

impl RandomWalkAxis {
    pub fn new(params: &AxisParams, mut rng: PseudoRandomSource) -> Self {
        // Randomized initial counter so axes created together don't retarget
        // in lockstep.
        let change_counter = draw_counter(&mut rng, &params.retarget_ticks);
        Self {
            position: 0.0,
            velocity: 0.0,
            velocity_target: 0.0,
            change_counter,
            max_velocity: params.max_velocity,
            acceleration_limit: params.acceleration_limit,
            retarget_ticks: params.retarget_ticks.clone(),
            rng,
        }
    }

    /// Advance the axis by one discrete simulation tick.
    pub fn tick(&mut self) {
        if self.change_counter == 0 {
            let r = self.rng.next_f64();
            self.velocity_target = (r * 2.0 - 1.0) * self.max_velocity;
            self.change_counter = draw_counter(&mut self.rng, &self.retarget_ticks);
        } else {
            self.change_counter -= 1;
        }

        // One-sided clamp toward the target: reach it exactly when within one
        // step, never overshoot.
        let dv = self.velocity_target - self.velocity;
        if dv.abs() <= self.acceleration_limit {
            self.velocity = self.velocity_target;
        } else {
            self.velocity += self.acceleration_limit * dv.signum();
        }

        self.position = wrap_unit(self.position + self.velocity);
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

/// Wrap into [0, 1). Handles negative inputs, and the rounding edge where a
/// tiny negative remainder plus 1.0 lands exactly on 1.0.
#[inline]
fn wrap_unit(x: f64) -> f64 {
    let r = x.rem_euclid(1.0);
    if r >= 1.0 {
        0.0
    } else {
        r
    }
}

fn draw_counter(rng: &mut PseudoRandomSource, range: &RangeInclusive<u32>) -> u32 {
    let (lo, hi) = (*range.start(), *range.end());
    let span = (hi - lo + 1) as f64;
    lo + (rng.next_f64() * span) as u32
}

/// Snapshot of all six axes, each value in [0, 1). Derived on demand, never
/// stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub rotation: [f64; 3],
    pub wander: [f64; 3],
}

/// Aggregate of six independent random-walk axes.
///
/// Advancement is driven explicitly by the caller's tick count, not by wall
/// time, so a given seed plus a given tick sequence always replays the same
/// pose sequence bit for bit.
pub struct MotionGenerator {
    rotation: [RandomWalkAxis; 3],
    wander: [RandomWalkAxis; 3],
    wander_amplitude: [f64; 3],
    wander_center: f64,
}

impl MotionGenerator {
    pub fn new(params: MotionParams, seed: u64) -> Self {
        // Derive per-axis generators from the base seed so the axes evolve
        // independently while the whole assembly stays reproducible.
        let mut axis_rng = |index: u64| {
            let mix = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
            PseudoRandomSource::seed_from_u64(mix)
        };
        let rotation = [
            RandomWalkAxis::new(&params.rotation, axis_rng(0)),
            RandomWalkAxis::new(&params.rotation, axis_rng(1)),
            RandomWalkAxis::new(&params.rotation, axis_rng(2)),
        ];
        let wander = [
            RandomWalkAxis::new(&params.wander, axis_rng(3)),
            RandomWalkAxis::new(&params.wander, axis_rng(4)),
            RandomWalkAxis::new(&params.wander, axis_rng(5)),
        ];
        Self {
            rotation,
            wander,
            wander_amplitude: params.wander_amplitude,
            wander_center: params.wander_center,
        }
    }

    /// Advance all six axes by `delta_ticks` discrete steps.
    pub fn advance(&mut self, delta_ticks: u32) {
        for _ in 0..delta_ticks {
            for axis in &mut self.rotation {
                axis.tick();
            }
            for axis in &mut self.wander {
                axis.tick();
            }
        }
    }

    /// Rotation fraction for the given axis, in [0, 1). The presenter maps
    /// this to degrees via ×360.
    #[inline]
    pub fn rotation(&self, axis: usize) -> f64 {
        self.rotation[axis].position()
    }

    /// Raw wander fraction for the given axis, in [0, 1).
    #[inline]
    pub fn position(&self, axis: usize) -> f64 {
        self.wander[axis].position()
    }

    pub fn pose(&self) -> Pose {
        Pose {
            rotation: [self.rotation(0), self.rotation(1), self.rotation(2)],
            wander: [self.position(0), self.position(1), self.position(2)],
        }
    }

    /// World-space translation offset: raw wander re-centered and scaled per
    /// axis.
    pub fn wander_offset(&self) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (self.position(i) - self.wander_center) * self.wander_amplitude[i];
        }
        out
    }
}
