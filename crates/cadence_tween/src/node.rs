//! The node abstraction every tween tree is built from

/// Slack used when comparing accumulated time against durations and
/// interval boundaries, so `0.1 + 0.2` style sums still land on the boundary.
pub const TIME_EPSILON: f64 = 1e-9;

/// Result of advancing a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Running,
    Finished,
}

impl NodeStatus {
    pub fn is_finished(self) -> bool {
        self == NodeStatus::Finished
    }
}

/// A unit of time-driven behavior
pub trait TweenNode {
    /// Advance by `dt` seconds
    fn advance(&mut self, dt: f64) -> NodeStatus;

    /// Rewind to the state the node was built in
    fn reset(&mut self);

    /// Seconds of the last `advance` call the node did not use.
    ///
    /// Only meaningful right after `advance` returned `Finished`; a sequence
    /// hands this to its next child within the same tick.
    fn leftover(&self) -> f64 {
        0.0
    }

    /// Composites with no children have nothing to run
    fn is_empty(&self) -> bool {
        false
    }

    fn boxed(self) -> BoxedNode
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Owned, type-erased node
pub type BoxedNode = Box<dyn TweenNode>;

impl<N: TweenNode + ?Sized> TweenNode for Box<N> {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        (**self).advance(dt)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn leftover(&self) -> f64 {
        (**self).leftover()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}
