/// Eased keyframe animation of a single mesh
use nalgebra::Vector3;

use crate::config::{AnimationConfig, KeyframeConfig};
use crate::scene::MeshId;
use crate::transform::Transform;

/// A position and yaw pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub position: Vector3<f32>,
    pub rotation: f32,
}

impl Keyframe {
    pub fn new(position: Vector3<f32>, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Linear interpolation; `t = 0` returns `self` exactly.
    pub fn lerp(&self, other: &Keyframe, t: f32) -> Keyframe {
        Keyframe {
            position: self.position + (other.position - self.position) * t,
            rotation: self.rotation + (other.rotation - self.rotation) * t,
        }
    }

    fn apply(&self, transform: &mut Transform) {
        transform.position = self.position;
        transform.rotation = self.rotation;
    }
}

impl From<&KeyframeConfig> for Keyframe {
    fn from(config: &KeyframeConfig) -> Self {
        Self::new(Vector3::from(config.position), config.rotation)
    }
}

/// `1 - (1 - t)^3`: fast start, slow finish.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationPhase {
    Idle,
    /// Timestamps are milliseconds on the host's monotonic clock.
    Running { started_at: f64 },
    Done,
}

/// Moves one mesh from a start keyframe to an end keyframe over a fixed
/// duration.
///
/// The controller owns no clock: the host passes `now` into `trigger` and
/// `tick`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationController {
    target: MeshId,
    start: Keyframe,
    end: Keyframe,
    duration_ms: f64,
    phase: AnimationPhase,
}

impl AnimationController {
    pub fn new(target: MeshId, start: Keyframe, end: Keyframe, duration_ms: f64) -> Self {
        Self {
            target,
            start,
            end,
            duration_ms,
            phase: AnimationPhase::Idle,
        }
    }

    pub fn from_config(target: MeshId, config: &AnimationConfig) -> Self {
        Self::new(
            target,
            Keyframe::from(&config.start),
            Keyframe::from(&config.end),
            config.duration_ms,
        )
    }

    pub fn target(&self) -> MeshId {
        self.target
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, AnimationPhase::Running { .. })
    }

    /// Start from the first keyframe at `now`. Restarts if already running.
    pub fn trigger(&mut self, now: f64) {
        log::info!("Animation of mesh {} started", self.target.index());
        self.phase = AnimationPhase::Running { started_at: now };
    }

    /// Halt a running animation where it is.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Animation of mesh {} stopped", self.target.index());
            self.phase = AnimationPhase::Idle;
        }
    }

    /// Stop if running, otherwise trigger. Returns whether the animation is
    /// running afterwards.
    pub fn toggle(&mut self, now: f64) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.trigger(now);
        }
        self.is_running()
    }

    /// Fraction of the duration elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: f64) -> Option<f64> {
        match self.phase {
            AnimationPhase::Running { started_at } => {
                let progress = if self.duration_ms > 0.0 {
                    (now - started_at) / self.duration_ms
                } else {
                    1.0
                };
                Some(progress.clamp(0.0, 1.0))
            }
            _ => None,
        }
    }

    /// Advance to `now`, writing the eased keyframe into `transform`.
    ///
    /// On completion the end keyframe is written exactly and the phase becomes
    /// `Done`. Outside `Running` the transform is left untouched.
    pub fn tick(&mut self, now: f64, transform: &mut Transform) -> AnimationPhase {
        let Some(progress) = self.progress(now) else {
            return self.phase;
        };

        if progress >= 1.0 {
            self.end.apply(transform);
            self.phase = AnimationPhase::Done;
            log::info!("Animation of mesh {} finished", self.target.index());
        } else {
            let eased = ease_out_cubic(progress as f32);
            self.start.lerp(&self.end, eased).apply(transform);
        }

        self.phase
    }
}
