//! Control-flow nodes
//!
//! - [`DelayNode`]: waits for a duration
//! - [`ExecuteNode`]: runs a side effect once, costing no time
//! - [`RepeatNode`]: fires a trigger on every interval boundary inside a window
//! - [`UntilNode`]: suspends until a predicate holds, costing no time

use crate::error::{check_duration, Result, TweenError};
use crate::node::{NodeStatus, TweenNode, TIME_EPSILON};

/// A timer with no value output
#[derive(Clone, Debug)]
pub struct DelayNode {
    duration: f64,
    elapsed: f64,
    finished: bool,
    leftover: f64,
}

impl DelayNode {
    pub fn new(duration: f64) -> Result<Self> {
        Ok(Self {
            duration: check_duration(duration)?,
            elapsed: 0.0,
            finished: false,
            leftover: 0.0,
        })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl TweenNode for DelayNode {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        if self.finished {
            self.leftover = dt;
            return NodeStatus::Finished;
        }

        self.elapsed += dt;
        if self.elapsed < self.duration - TIME_EPSILON {
            self.leftover = 0.0;
            return NodeStatus::Running;
        }

        self.leftover = (self.elapsed - self.duration).max(0.0);
        self.elapsed = self.duration;
        self.finished = true;
        NodeStatus::Finished
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.finished = false;
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }
}

/// Runs an action exactly once on its first advance
pub struct ExecuteNode {
    action: Box<dyn FnMut()>,
    done: bool,
    leftover: f64,
}

impl ExecuteNode {
    pub fn new<F: FnMut() + 'static>(action: F) -> Self {
        Self {
            action: Box::new(action),
            done: false,
            leftover: 0.0,
        }
    }
}

impl TweenNode for ExecuteNode {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        if !self.done {
            self.done = true;
            (self.action)();
        }
        self.leftover = dt;
        NodeStatus::Finished
    }

    fn reset(&mut self) {
        self.done = false;
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }
}

/// Periodic trigger inside the window `[delay, delay + duration]`
///
/// Triggers land on `delay + k * interval` for `k = 1, 2, ...`, including the
/// window end. The number fired is derived from accumulated time, so one large
/// delta fires every boundary it crossed. Time past the window end is dropped
/// rather than handed on.
pub struct RepeatNode {
    delay: f64,
    interval: f64,
    /// Window length; infinite for [`RepeatNode::forever`]
    duration: f64,
    trigger: Box<dyn FnMut()>,
    elapsed: f64,
    fired: u64,
    finished: bool,
    leftover: f64,
}

impl RepeatNode {
    pub fn new<F: FnMut() + 'static>(
        delay: f64,
        interval: f64,
        duration: f64,
        trigger: F,
    ) -> Result<Self> {
        let duration = check_duration(duration)?;
        Self::build(delay, interval, duration, trigger)
    }

    /// A repeat whose window never closes
    pub fn forever<F: FnMut() + 'static>(delay: f64, interval: f64, trigger: F) -> Result<Self> {
        Self::build(delay, interval, f64::INFINITY, trigger)
    }

    fn build<F: FnMut() + 'static>(
        delay: f64,
        interval: f64,
        duration: f64,
        trigger: F,
    ) -> Result<Self> {
        let delay = check_duration(delay)?;
        if !(interval.is_finite() && interval > 0.0) {
            return Err(TweenError::InvalidInterval(interval));
        }
        Ok(Self {
            delay,
            interval,
            duration,
            trigger: Box::new(trigger),
            elapsed: 0.0,
            fired: 0,
            finished: false,
            leftover: 0.0,
        })
    }

    /// Number of triggers fired so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn window_end(&self) -> f64 {
        self.delay + self.duration
    }
}

impl TweenNode for RepeatNode {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        if self.finished {
            self.leftover = dt;
            return NodeStatus::Finished;
        }
        self.leftover = 0.0;

        let end = self.window_end();
        self.elapsed += dt;

        let in_window = self.elapsed.min(end) - self.delay;
        if in_window >= -TIME_EPSILON {
            let due = ((in_window + TIME_EPSILON) / self.interval).floor() as u64;
            while self.fired < due {
                self.fired += 1;
                (self.trigger)();
            }
        }

        if self.elapsed >= end - TIME_EPSILON {
            self.elapsed = end;
            self.finished = true;
            return NodeStatus::Finished;
        }
        NodeStatus::Running
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.fired = 0;
        self.finished = false;
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }
}

/// Suspends until its predicate returns true
///
/// Time does not accumulate while waiting; the whole delta of the resolving
/// advance is handed on.
pub struct UntilNode {
    predicate: Box<dyn FnMut() -> bool>,
    done: bool,
    leftover: f64,
}

impl UntilNode {
    pub fn new<F: FnMut() -> bool + 'static>(predicate: F) -> Self {
        Self {
            predicate: Box::new(predicate),
            done: false,
            leftover: 0.0,
        }
    }
}

impl TweenNode for UntilNode {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        if !self.done && (self.predicate)() {
            self.done = true;
        }
        if self.done {
            self.leftover = dt;
            NodeStatus::Finished
        } else {
            self.leftover = 0.0;
            NodeStatus::Running
        }
    }

    fn reset(&mut self) {
        self.done = false;
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }
}
