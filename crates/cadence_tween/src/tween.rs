//! Leaf tweens
//!
//! A [`ValueTween`] moves a single value from `from` to `to` over a duration
//! and pushes every sample through its `on_update` callback. That callback
//! is the only place values leave the engine; hosts use it to write into
//! their own transforms, materials or UI properties.
//!
//! # Example
//!
//! ```rust
//! use cadence_tween::{Easing, FloatTween, LoopMode, NodeStatus, TweenNode};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let alpha = Rc::new(Cell::new(0.0f32));
//! let sink = alpha.clone();
//!
//! let mut fade = FloatTween::new(1.0, 0.0, 1.0)
//!     .unwrap()
//!     .ease(Easing::EaseOutCubic)
//!     .looping(LoopMode::PingPong, 1)
//!     .on_update(move |v| sink.set(v));
//!
//! assert_eq!(fade.advance(1.0), NodeStatus::Running);
//! assert_eq!(alpha.get(), 1.0);
//! assert_eq!(fade.advance(1.0), NodeStatus::Finished);
//! assert_eq!(alpha.get(), 0.0);
//! ```

use cadence_core::{Color, Vec2, Vec3};

use crate::easing::Easing;
use crate::error::{check_duration, Result};
use crate::node::{NodeStatus, TweenNode, TIME_EPSILON};
use crate::values::Interpolate;

type LerpFn<T> = Box<dyn Fn(&T, &T, f64) -> T>;
type UpdateFn<T> = Box<dyn FnMut(T)>;
type Callback = Box<dyn FnMut()>;

/// What happens when a tween reaches the end of its duration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once
    #[default]
    None,
    /// Jump back to `from` and play again
    Restart,
    /// Alternate between forward and reverse each cycle
    PingPong,
}

/// A single timed value transition
pub struct ValueTween<T> {
    duration: f64,
    from: T,
    to: T,
    lerp: LerpFn<T>,
    easing: Easing,
    loop_mode: LoopMode,
    /// Extra cycles after the first (-1 for infinite)
    loop_count: i32,
    loops_left: i32,
    elapsed: f64,
    /// Whether the current cycle runs `to -> from`
    reversed: bool,
    begun: bool,
    finished: bool,
    leftover: f64,
    on_begin: Option<Callback>,
    on_update: Option<UpdateFn<T>>,
    on_complete: Option<Callback>,
}

/// Tween over a scalar
pub type FloatTween = ValueTween<f32>;
/// Tween over a 2D vector
pub type Vec2Tween = ValueTween<Vec2>;
/// Tween over a 3D vector
pub type Vec3Tween = ValueTween<Vec3>;
/// Tween over an RGBA color
pub type ColorTween = ValueTween<Color>;

impl<T: Interpolate + 'static> ValueTween<T> {
    /// Create a tween using the value kind's own interpolation
    pub fn new(duration: f64, from: T, to: T) -> Result<Self> {
        Self::with_lerp(duration, from, to, |a: &T, b: &T, t| a.interpolate(b, t))
    }
}

impl<T: Clone + 'static> ValueTween<T> {
    /// Create a tween for any value type with a caller-supplied interpolation
    pub fn with_lerp<F>(duration: f64, from: T, to: T, lerp: F) -> Result<Self>
    where
        F: Fn(&T, &T, f64) -> T + 'static,
    {
        let duration = check_duration(duration)?;
        Ok(Self {
            duration,
            from,
            to,
            lerp: Box::new(lerp),
            easing: Easing::Linear,
            loop_mode: LoopMode::None,
            loop_count: 0,
            loops_left: 0,
            elapsed: 0.0,
            reversed: false,
            begun: false,
            finished: false,
            leftover: 0.0,
            on_begin: None,
            on_update: None,
            on_complete: None,
        })
    }

    /// Replace the interpolation (e.g. to follow a curved path)
    pub fn lerp<F>(mut self, lerp: F) -> Self
    where
        F: Fn(&T, &T, f64) -> T + 'static,
    {
        self.lerp = Box::new(lerp);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the loop policy; `count` is the number of extra cycles, -1 for infinite
    pub fn looping(mut self, mode: LoopMode, count: i32) -> Self {
        self.loop_mode = mode;
        self.loop_count = count;
        self.loops_left = count;
        self
    }

    /// Called at the start of every cycle
    pub fn on_begin<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.on_begin = Some(Box::new(f));
        self
    }

    /// Receives every interpolated value
    pub fn on_update<F: FnMut(T) + 'static>(mut self, f: F) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Called once when the last cycle ends
    pub fn on_complete<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Linear progress through the current cycle (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return if self.begun { 1.0 } else { 0.0 };
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// The value at the current position
    pub fn value(&self) -> T {
        self.sample(self.progress())
    }

    fn sample(&self, progress: f64) -> T {
        let eased = self.easing.apply(progress.clamp(0.0, 1.0));
        if self.reversed {
            (self.lerp)(&self.to, &self.from, eased)
        } else {
            (self.lerp)(&self.from, &self.to, eased)
        }
    }

    fn emit(&mut self, progress: f64) {
        if self.on_update.is_none() {
            return;
        }
        let value = self.sample(progress);
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(value);
        }
    }

    fn fire_begin(&mut self) {
        if let Some(on_begin) = self.on_begin.as_mut() {
            on_begin();
        }
    }

    fn complete(&mut self, overflow: f64) -> NodeStatus {
        self.finished = true;
        self.leftover = overflow;
        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete();
        }
        NodeStatus::Finished
    }

    /// Jump over the whole cycles a large overflow spans, leaving the last
    /// boundary to the regular path. Skipped cycles fire no callbacks.
    fn skip_cycles(&mut self) {
        let whole = (self.elapsed / self.duration).floor();
        if whole < 2.0 {
            return;
        }
        let mut skip = whole - 1.0;
        if self.loops_left >= 0 {
            skip = skip.min(f64::from(self.loops_left));
            self.loops_left -= skip as i32;
        }
        if skip < 1.0 {
            return;
        }

        if skip == whole - 1.0 {
            // `elapsed - skip * duration` would round away at large magnitudes.
            self.elapsed = self.elapsed % self.duration + self.duration;
        } else {
            self.elapsed -= skip * self.duration;
        }
        if self.loop_mode == LoopMode::PingPong && skip % 2.0 == 1.0 {
            self.reversed = !self.reversed;
        }
    }

    /// Consume one loop if any are left; negative counts never run out
    fn take_loop(&mut self) -> bool {
        if self.loop_mode == LoopMode::None || self.loops_left == 0 {
            return false;
        }
        if self.loops_left > 0 {
            self.loops_left -= 1;
        }
        true
    }
}

impl<T: Clone + 'static> TweenNode for ValueTween<T> {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        if self.finished {
            self.leftover = dt;
            return NodeStatus::Finished;
        }
        self.leftover = 0.0;

        if !self.begun {
            self.begun = true;
            self.fire_begin();
        }

        if self.duration <= 0.0 {
            self.emit(1.0);
            return self.complete(dt);
        }

        self.elapsed += dt;
        loop {
            if self.elapsed < self.duration - TIME_EPSILON {
                let progress = self.elapsed / self.duration;
                self.emit(progress);
                return NodeStatus::Running;
            }

            // Cycle boundary: always land exactly on the endpoint first.
            self.emit(1.0);
            let overflow = (self.elapsed - self.duration).max(0.0);

            if !self.take_loop() {
                self.elapsed = self.duration;
                return self.complete(overflow);
            }

            self.elapsed = overflow;
            if self.loop_mode == LoopMode::PingPong {
                self.reversed = !self.reversed;
            }
            self.fire_begin();

            if overflow <= TIME_EPSILON {
                return NodeStatus::Running;
            }
            self.skip_cycles();
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.loops_left = self.loop_count;
        self.reversed = false;
        self.begun = false;
        self.finished = false;
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }
}
