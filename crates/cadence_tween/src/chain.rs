//! Fluent tree construction
//!
//! [`TweenChain`] is consumed and handed back by every call. It keeps a stack
//! of open composites: `switch_to_sequence` / `switch_to_parallel` open a
//! nested one that later calls append into, `end` closes it, and `build`
//! closes everything that is still open.
//!
//! Construction errors (bad durations, bad intervals) are held until
//! [`TweenChain::build`], which reports the first one.
//!
//! # Example
//!
//! ```rust
//! use cadence_tween::{FloatTween, TweenChain, TweenNode};
//!
//! let root = TweenChain::sequence()
//!     .execute(|| println!("begin"))
//!     .delay(0.5)
//!     .append_parallel([
//!         FloatTween::new(1.0, 0.0, 3.0).unwrap().boxed(),
//!         FloatTween::new(1.0, 1.0, 2.0).unwrap().boxed(),
//!     ])
//!     .switch_to_sequence([FloatTween::new(0.4, 1.0, 1.2).unwrap().boxed()])
//!     .execute(|| println!("inner sequence complete"))
//!     .build()
//!     .unwrap();
//! assert!(!root.is_empty());
//! ```

use smallvec::SmallVec;

use crate::composite::{ParallelNode, SequenceNode};
use crate::control::{DelayNode, ExecuteNode, RepeatNode, UntilNode};
use crate::error::{Result, TweenError};
use crate::node::{BoxedNode, TweenNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameKind {
    Sequence,
    Parallel,
}

struct Frame {
    kind: FrameKind,
    children: Vec<BoxedNode>,
}

impl Frame {
    fn new(kind: FrameKind, children: Vec<BoxedNode>) -> Self {
        Self { kind, children }
    }

    fn into_node(self) -> BoxedNode {
        match self.kind {
            FrameKind::Sequence => Box::new(self.children.into_iter().collect::<SequenceNode>()),
            FrameKind::Parallel => Box::new(self.children.into_iter().collect::<ParallelNode>()),
        }
    }
}

/// Builder for tween trees
pub struct TweenChain {
    /// Open composites, root first; never empty
    frames: SmallVec<[Frame; 4]>,
    error: Option<TweenError>,
}

impl TweenChain {
    /// Start a chain whose root runs its children in order
    pub fn sequence() -> Self {
        Self::rooted(FrameKind::Sequence)
    }

    /// Start a chain whose root runs its children side by side
    pub fn parallel() -> Self {
        Self::rooted(FrameKind::Parallel)
    }

    fn rooted(kind: FrameKind) -> Self {
        let mut frames = SmallVec::new();
        frames.push(Frame::new(kind, Vec::new()));
        Self {
            frames,
            error: None,
        }
    }

    /// Append a single node to the innermost open composite
    pub fn append<N: TweenNode + 'static>(self, node: N) -> Self {
        self.append_boxed(Box::new(node))
    }

    pub fn append_boxed(mut self, node: BoxedNode) -> Self {
        self.current().children.push(node);
        self
    }

    /// Append a fallible node, holding the error for `build`
    pub fn try_append<N: TweenNode + 'static>(self, node: Result<N>) -> Self {
        match node {
            Ok(node) => self.append(node),
            Err(err) => self.fail(err),
        }
    }

    /// Append the nodes as one nested sequence; an empty list appends nothing
    pub fn append_sequence<I>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = BoxedNode>,
    {
        self.append_group(FrameKind::Sequence, nodes)
    }

    /// Append the nodes as one nested parallel group; an empty list appends nothing
    pub fn append_parallel<I>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = BoxedNode>,
    {
        self.append_group(FrameKind::Parallel, nodes)
    }

    fn append_group<I>(self, kind: FrameKind, nodes: I) -> Self
    where
        I: IntoIterator<Item = BoxedNode>,
    {
        let children: Vec<BoxedNode> = nodes.into_iter().collect();
        if children.is_empty() {
            return self;
        }
        self.append_boxed(Frame::new(kind, children).into_node())
    }

    /// Open a nested sequence seeded with `nodes`; later calls append into it
    pub fn switch_to_sequence<I>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = BoxedNode>,
    {
        self.open(FrameKind::Sequence, nodes)
    }

    /// Open a nested parallel group seeded with `nodes`; later calls append into it
    pub fn switch_to_parallel<I>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = BoxedNode>,
    {
        self.open(FrameKind::Parallel, nodes)
    }

    fn open<I>(mut self, kind: FrameKind, nodes: I) -> Self
    where
        I: IntoIterator<Item = BoxedNode>,
    {
        self.frames
            .push(Frame::new(kind, nodes.into_iter().collect()));
        self
    }

    /// Close the innermost switched composite and continue in its parent.
    /// At the root this does nothing.
    pub fn end(mut self) -> Self {
        if self.frames.len() > 1 {
            self.close_innermost();
        }
        self
    }

    pub fn execute<F: FnMut() + 'static>(self, action: F) -> Self {
        self.append(ExecuteNode::new(action))
    }

    pub fn delay(self, seconds: f64) -> Self {
        self.try_append(DelayNode::new(seconds))
    }

    /// Fire `trigger` every `interval` seconds inside `[delay, delay + duration]`
    pub fn repeat<F: FnMut() + 'static>(
        self,
        delay: f64,
        interval: f64,
        duration: f64,
        trigger: F,
    ) -> Self {
        self.try_append(RepeatNode::new(delay, interval, duration, trigger))
    }

    /// Fire `trigger` every `interval` seconds after `delay`, never finishing
    pub fn repeat_forever<F: FnMut() + 'static>(self, delay: f64, interval: f64, trigger: F) -> Self {
        self.try_append(RepeatNode::forever(delay, interval, trigger))
    }

    /// Suspend until `predicate` returns true
    pub fn until<F: FnMut() -> bool + 'static>(self, predicate: F) -> Self {
        self.append(UntilNode::new(predicate))
    }

    /// Number of open composites, the root included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Close every open composite and return the root
    pub fn build(mut self) -> Result<BoxedNode> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        while self.frames.len() > 1 {
            self.close_innermost();
        }
        let root = self.frames.pop().ok_or(TweenError::EmptyRoot)?;
        if root.children.is_empty() {
            return Err(TweenError::EmptyRoot);
        }
        Ok(root.into_node())
    }

    fn fail(mut self, err: TweenError) -> Self {
        if self.error.is_none() {
            tracing::debug!("tween chain construction failed: {}", err);
            self.error = Some(err);
        }
        self
    }

    fn current(&mut self) -> &mut Frame {
        // `frames` always holds the root frame
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn close_innermost(&mut self) {
        if let Some(frame) = self.frames.pop() {
            let node = frame.into_node();
            self.current().children.push(node);
        }
    }
}

impl Default for TweenChain {
    fn default() -> Self {
        Self::sequence()
    }
}
