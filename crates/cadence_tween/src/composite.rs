//! Composite nodes
//!
//! [`SequenceNode`] runs children one after another, spilling unused time
//! from a finished child into the next one within the same advance.
//! [`ParallelNode`] runs every child on every advance until all are done.

use crate::node::{BoxedNode, NodeStatus, TweenNode};

/// Runs children in order
#[derive(Default)]
pub struct SequenceNode {
    children: Vec<BoxedNode>,
    /// Children before this index are finished; children after it have not started
    current: usize,
    leftover: f64,
}

impl SequenceNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child (builder pattern)
    pub fn with<N: TweenNode + 'static>(mut self, node: N) -> Self {
        self.push(node);
        self
    }

    pub fn push<N: TweenNode + 'static>(&mut self, node: N) {
        self.children.push(Box::new(node));
    }

    pub fn push_boxed(&mut self, node: BoxedNode) {
        self.children.push(node);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Index of the child currently being advanced
    pub fn current_index(&self) -> usize {
        self.current
    }
}

impl FromIterator<BoxedNode> for SequenceNode {
    fn from_iter<I: IntoIterator<Item = BoxedNode>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl TweenNode for SequenceNode {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        let mut remaining = dt;
        while let Some(child) = self.children.get_mut(self.current) {
            match child.advance(remaining) {
                NodeStatus::Running => {
                    self.leftover = 0.0;
                    return NodeStatus::Running;
                }
                NodeStatus::Finished => {
                    remaining = child.leftover();
                    self.current += 1;
                }
            }
        }
        self.leftover = remaining;
        NodeStatus::Finished
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
        self.current = 0;
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }

    fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

struct Track {
    node: BoxedNode,
    finished: bool,
}

/// Runs all children side by side
#[derive(Default)]
pub struct ParallelNode {
    tracks: Vec<Track>,
    leftover: f64,
}

impl ParallelNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child (builder pattern)
    pub fn with<N: TweenNode + 'static>(mut self, node: N) -> Self {
        self.push(node);
        self
    }

    pub fn push<N: TweenNode + 'static>(&mut self, node: N) {
        self.push_boxed(Box::new(node));
    }

    pub fn push_boxed(&mut self, node: BoxedNode) {
        self.tracks.push(Track {
            node,
            finished: false,
        });
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Number of children that have not finished yet
    pub fn running(&self) -> usize {
        self.tracks.iter().filter(|t| !t.finished).count()
    }
}

impl FromIterator<BoxedNode> for ParallelNode {
    fn from_iter<I: IntoIterator<Item = BoxedNode>>(iter: I) -> Self {
        let mut node = Self::default();
        for child in iter {
            node.push_boxed(child);
        }
        node
    }
}

impl TweenNode for ParallelNode {
    fn advance(&mut self, dt: f64) -> NodeStatus {
        let mut all_finished = true;
        // Time left after the slowest child that finished during this call.
        let mut leftover = dt;

        for track in &mut self.tracks {
            if track.finished {
                continue;
            }
            match track.node.advance(dt) {
                NodeStatus::Running => all_finished = false,
                NodeStatus::Finished => {
                    track.finished = true;
                    leftover = leftover.min(track.node.leftover());
                }
            }
        }

        if all_finished {
            self.leftover = leftover;
            NodeStatus::Finished
        } else {
            self.leftover = 0.0;
            NodeStatus::Running
        }
    }

    fn reset(&mut self) {
        for track in &mut self.tracks {
            track.node.reset();
            track.finished = false;
        }
        self.leftover = 0.0;
    }

    fn leftover(&self) -> f64 {
        self.leftover
    }

    fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
