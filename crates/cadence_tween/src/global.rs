//! Process-wide scheduler
//!
//! A per-thread [`TweenScheduler`] behind free functions, for hosts that
//! want one scheduler driven from their frame loop without passing it
//! around.
//!
//! # Initialization
//!
//! The host initializes it once on its main thread and ticks it every frame:
//!
//! ```rust
//! use cadence_tween::{global, DelayNode, OwnerKey};
//!
//! global::initialize(Default::default());
//!
//! let owner = OwnerKey::new();
//! global::play(DelayNode::new(0.5).unwrap(), owner).unwrap();
//! global::tick(1.0 / 60.0).unwrap();
//! assert_eq!(global::abort(owner).unwrap(), 1);
//!
//! global::shutdown();
//! ```

use std::cell::RefCell;

use cadence_core::OwnerKey;

use crate::error::{Result, TweenError};
use crate::node::TweenNode;
use crate::scheduler::{SchedulerConfig, SchedulerHandle, TickReport, TweenHandle, TweenScheduler};

thread_local! {
    static SCHEDULER: RefCell<Option<TweenScheduler>> = const { RefCell::new(None) };
}

/// Create this thread's scheduler. Returns false if one already exists.
pub fn initialize(config: SchedulerConfig) -> bool {
    SCHEDULER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            tracing::warn!("global tween scheduler already initialized");
            return false;
        }
        *slot = Some(TweenScheduler::with_config(config));
        true
    })
}

pub fn is_initialized() -> bool {
    SCHEDULER.with(|cell| cell.borrow().is_some())
}

/// Weak handle to this thread's scheduler.
///
/// Every operation goes through the handle so no borrow of the slot is
/// held while tween callbacks run.
pub fn handle() -> Result<SchedulerHandle> {
    SCHEDULER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(TweenScheduler::handle)
            .ok_or(TweenError::NotInitialized)
    })
}

pub fn play<N: TweenNode + 'static>(root: N, owner: OwnerKey) -> Result<TweenHandle> {
    handle()?.play(root, owner)
}

pub fn abort(owner: OwnerKey) -> Result<usize> {
    handle()?.abort(owner)
}

pub fn tick(dt: f64) -> Result<TickReport> {
    handle()?.tick(dt)
}

/// Abort everything and drop this thread's scheduler
pub fn shutdown() {
    let scheduler = SCHEDULER.with(|cell| cell.borrow_mut().take());
    if let Some(scheduler) = scheduler {
        let aborted = scheduler.abort_all();
        tracing::debug!("global tween scheduler shut down, {} tween(s) aborted", aborted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{DelayNode, ExecuteNode};
    use std::cell::Cell;
    use std::rc::Rc;

    // Test threads are fresh, so each test starts uninitialized.

    #[test]
    fn test_requires_initialize() {
        assert!(!is_initialized());
        assert_eq!(tick(0.1), Err(TweenError::NotInitialized));
        assert_eq!(abort(OwnerKey::new()), Err(TweenError::NotInitialized));
        assert!(play(DelayNode::new(1.0).unwrap(), OwnerKey::new()).is_err());
    }

    #[test]
    fn test_initialize_once() {
        assert!(initialize(SchedulerConfig::default()));
        assert!(!initialize(SchedulerConfig::default()));
        shutdown();
        assert!(!is_initialized());
        assert!(initialize(SchedulerConfig::default()));
        shutdown();
    }

    #[test]
    fn test_callbacks_can_use_global_api() {
        initialize(SchedulerConfig::default());
        let owner = OwnerKey::new();
        let aborted = Rc::new(Cell::new(0));
        let a = aborted.clone();

        play(DelayNode::new(10.0).unwrap(), owner).unwrap();
        play(
            ExecuteNode::new(move || a.set(abort(owner).unwrap_or(0))),
            OwnerKey::new(),
        )
        .unwrap();

        tick(0.1).unwrap();
        assert_eq!(aborted.get(), 1);
        shutdown();
    }

    #[test]
    fn test_shutdown_disposes_active_handles() {
        initialize(SchedulerConfig::default());
        let disposed = Rc::new(Cell::new(false));
        let d = disposed.clone();
        let handle = play(DelayNode::new(1.0).unwrap(), OwnerKey::new()).unwrap();
        handle.set_on_dispose(move || d.set(true));

        shutdown();
        assert!(disposed.get());
        assert!(handle.is_aborted());
    }
}
