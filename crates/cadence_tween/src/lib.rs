//! Cadence Tween Engine
//!
//! Time-driven tweens and task chains, advanced by an externally ticked scheduler.
//!
//! # Features
//!
//! - **Easing**: the standard In/Out/InOut families plus cubic Bezier and custom curves
//! - **Leaf Tweens**: `f32`, `Vec2`, `Vec3` and `Color` transitions with restart and ping-pong loops
//! - **Control Nodes**: delays, one-shot actions, periodic triggers and predicate gates
//! - **Chains**: fluent sequence/parallel composition with nested groups
//! - **Scheduler**: owner-scoped handles, bulk abort, and fault isolation per handle
//!
//! # Example
//!
//! ```rust
//! use cadence_tween::{Easing, FloatTween, OwnerKey, TweenChain, TweenScheduler};
//!
//! let scheduler = TweenScheduler::new();
//! let owner = OwnerKey::new();
//!
//! let root = TweenChain::sequence()
//!     .delay(0.25)
//!     .append(
//!         FloatTween::new(0.5, 0.0, 1.0)
//!             .unwrap()
//!             .ease(Easing::EaseOutQuad)
//!             .on_update(|opacity| println!("opacity = {opacity}")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let handle = scheduler.play(root, owner).unwrap();
//! while scheduler.is_active(owner) {
//!     scheduler.tick(1.0 / 60.0).unwrap();
//! }
//! assert!(handle.is_finished());
//! ```

pub mod chain;
pub mod composite;
pub mod control;
pub mod easing;
pub mod error;
pub mod global;
pub mod math;
pub mod node;
pub mod scheduler;
pub mod tween;
pub mod values;

pub use cadence_core::{Color, OwnerKey, Vec2, Vec3};

pub use chain::TweenChain;
pub use composite::{ParallelNode, SequenceNode};
pub use control::{DelayNode, ExecuteNode, RepeatNode, UntilNode};
pub use easing::Easing;
pub use error::{HandleFault, Result, TweenError};
pub use node::{BoxedNode, NodeStatus, TweenNode, TIME_EPSILON};
pub use scheduler::{
    HandleId, HandleState, OwnerGuard, SchedulerConfig, SchedulerHandle, TickReport, TweenHandle,
    TweenScheduler,
};
pub use tween::{ColorTween, FloatTween, LoopMode, ValueTween, Vec2Tween, Vec3Tween};
pub use values::Interpolate;
