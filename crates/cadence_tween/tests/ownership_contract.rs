//! The host owns the owner lifecycle
//!
//! The scheduler cannot observe an owner being destroyed. These tests model
//! a host object with a destruction hook and check both sides of the
//! contract: tweens stop when the hook aborts them, and keep running when
//! the host forgets to.

use cadence_tween::{
    DelayNode, FloatTween, OwnerGuard, OwnerKey, SchedulerHandle, TweenScheduler,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Stand-in for a host scene object whose property tweens write into
struct FakeEntity {
    key: OwnerKey,
    opacity: Rc<Cell<f32>>,
    destroyed: Rc<Cell<bool>>,
    _guard: Option<OwnerGuard>,
}

impl FakeEntity {
    /// Entity that aborts its tweens when dropped
    fn guarded(scheduler: &TweenScheduler) -> Self {
        let key = OwnerKey::new();
        Self {
            key,
            opacity: Rc::new(Cell::new(0.0)),
            destroyed: Rc::new(Cell::new(false)),
            _guard: Some(scheduler.owner_guard(key)),
        }
    }

    /// Entity whose host never calls abort
    fn unguarded() -> Self {
        Self {
            key: OwnerKey::new(),
            opacity: Rc::new(Cell::new(0.0)),
            destroyed: Rc::new(Cell::new(false)),
            _guard: None,
        }
    }

    fn fade_in(&self, scheduler: &TweenScheduler, duration: f64) {
        let opacity = self.opacity.clone();
        let destroyed = self.destroyed.clone();
        let writes_after_destroy = WRITES_AFTER_DESTROY.with(Rc::clone);
        scheduler
            .play(
                FloatTween::new(duration, 0.0, 1.0).unwrap().on_update(move |v| {
                    if destroyed.get() {
                        writes_after_destroy.set(writes_after_destroy.get() + 1);
                    }
                    opacity.set(v);
                }),
                self.key,
            )
            .unwrap();
    }
}

impl Drop for FakeEntity {
    fn drop(&mut self) {
        self.destroyed.set(true);
    }
}

thread_local! {
    static WRITES_AFTER_DESTROY: Rc<Cell<u32>> = Rc::new(Cell::new(0));
}

fn writes_after_destroy() -> u32 {
    WRITES_AFTER_DESTROY.with(|c| c.get())
}

#[test]
fn test_guard_aborts_on_destroy() {
    let scheduler = TweenScheduler::new();
    let entity = FakeEntity::guarded(&scheduler);
    let key = entity.key;
    entity.fade_in(&scheduler, 1.0);
    entity.fade_in(&scheduler, 2.0);

    scheduler.tick(0.25).unwrap();
    assert_eq!(scheduler.owner_active_count(key), 2);

    drop(entity);
    assert_eq!(scheduler.owner_active_count(key), 0);

    for _ in 0..10 {
        scheduler.tick(0.25).unwrap();
    }
    assert_eq!(writes_after_destroy(), 0);
}

#[test]
fn test_forgotten_abort_keeps_writing() {
    let scheduler = TweenScheduler::new();
    let entity = FakeEntity::unguarded();
    let key = entity.key;
    entity.fade_in(&scheduler, 1.0);

    scheduler.tick(0.25).unwrap();
    drop(entity);

    // Nothing tells the scheduler the owner is gone.
    assert!(scheduler.is_active(key));
    scheduler.tick(0.25).unwrap();
    assert_eq!(writes_after_destroy(), 1);

    // Late abort still stops it.
    assert_eq!(scheduler.abort(key), 1);
    scheduler.tick(0.25).unwrap();
    assert_eq!(writes_after_destroy(), 1);
}

#[test]
fn test_manual_destroy_hook() {
    let scheduler = TweenScheduler::new();
    let handle: SchedulerHandle = scheduler.handle();
    let on_destroy = {
        let handle = handle.clone();
        move |key: OwnerKey| handle.abort(key).unwrap()
    };

    let key = OwnerKey::new();
    let disposed = Rc::new(RefCell::new(Vec::new()));
    for i in 0..3 {
        let log = disposed.clone();
        scheduler
            .play(DelayNode::new(1.0).unwrap(), key)
            .unwrap()
            .set_on_dispose(move || log.borrow_mut().push(i));
    }

    assert_eq!(on_destroy(key), 3);
    assert_eq!(disposed.borrow().len(), 3);
    assert_eq!(on_destroy(key), 0);
}

#[test]
fn test_disarmed_guard_leaves_tweens_running() {
    let scheduler = TweenScheduler::new();
    let key = OwnerKey::new();
    scheduler.play(DelayNode::new(1.0).unwrap(), key).unwrap();

    scheduler.owner_guard(key).disarm();
    assert!(scheduler.is_active(key));

    drop(scheduler.owner_guard(key));
    assert!(!scheduler.is_active(key));
}

#[test]
fn test_guard_outliving_scheduler() {
    let scheduler = TweenScheduler::new();
    let guard = scheduler.owner_guard(OwnerKey::new());
    drop(scheduler);
    // Nothing left to abort; dropping must be quiet.
    drop(guard);
}
