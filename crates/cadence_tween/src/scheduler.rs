//! Tween scheduler
//!
//! Binds tween trees to owners and drives every active tree once per tick.
//!
//! The scheduler is single-threaded and re-entrant: callbacks fired while a
//! tree advances may start new tweens or abort existing ones through a
//! [`SchedulerHandle`]. Each tick works from a snapshot of the handles that
//! were active when it started, so a handle is advanced at most once per
//! tick and handles started mid-tick first run on the next one.
//!
//! # Ownership contract
//!
//! The scheduler cannot tell when an owner stops existing. Hosts must call
//! [`TweenScheduler::abort`] when an owner is destroyed, or hold an
//! [`OwnerGuard`] whose drop does it for them. Forgetting to do so leaves
//! that owner's tweens running against a target that is gone.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Instant;

use cadence_core::OwnerKey;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{HandleFault, Result, TweenError};
use crate::node::{BoxedNode, NodeStatus, TweenNode};

new_key_type! {
    /// Unique identifier for a played tween tree
    pub struct HandleId;
}

/// Lifecycle of a handle. `Finished` and `Aborted` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleState {
    Active,
    Finished,
    Aborted,
}

/// Scheduler tuning
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Multiplies every tick delta
    pub time_scale: f64,
    /// Upper bound applied to each tick delta before scaling.
    ///
    /// Off by default: clamping drops time, and with it repeat triggers
    /// that a long frame would otherwise have fired.
    pub max_delta: Option<f64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta: None,
        }
    }
}

impl SchedulerConfig {
    fn effective_delta(&self, dt: f64) -> f64 {
        let dt = match self.max_delta {
            Some(max) => dt.min(max),
            None => dt,
        };
        (dt * self.time_scale).max(0.0)
    }
}

/// What a tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Handles advanced this tick
    pub advanced: usize,
    /// Handles whose tree finished this tick
    pub finished: usize,
    /// Handles still active after the tick
    pub active: usize,
}

type DisposeFn = Box<dyn FnOnce()>;

struct HandleShared {
    id: HandleId,
    owner: OwnerKey,
    state: Cell<HandleState>,
    on_dispose: RefCell<Option<DisposeFn>>,
    registry: Weak<RefCell<Registry>>,
}

impl HandleShared {
    fn is_active(&self) -> bool {
        self.state.get() == HandleState::Active
    }

    /// Move out of `Active`; false if the handle already ended
    fn terminate(&self, state: HandleState) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state.set(state);
        true
    }

    fn dispose(&self) {
        let callback = self.on_dispose.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// The caller's view of a played tween tree
#[derive(Clone)]
pub struct TweenHandle {
    shared: Rc<HandleShared>,
}

impl TweenHandle {
    pub fn id(&self) -> HandleId {
        self.shared.id
    }

    pub fn owner(&self) -> OwnerKey {
        self.shared.owner
    }

    pub fn state(&self) -> HandleState {
        self.shared.state.get()
    }

    pub fn is_active(&self) -> bool {
        self.shared.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.state() == HandleState::Finished
    }

    pub fn is_aborted(&self) -> bool {
        self.state() == HandleState::Aborted
    }

    /// Run `f` once when the handle finishes or is aborted.
    ///
    /// Replaces any callback set earlier. If the handle has already ended,
    /// `f` runs immediately.
    pub fn set_on_dispose<F: FnOnce() + 'static>(&self, f: F) {
        if self.is_active() {
            *self.shared.on_dispose.borrow_mut() = Some(Box::new(f));
        } else {
            f();
        }
    }

    /// Abort just this handle; false if it had already ended
    pub fn abort(&self) -> bool {
        match self.shared.registry.upgrade() {
            Some(registry) => abort_handle_in(&registry, &self.shared),
            // No scheduler left to remove it from; still honor the state change.
            None => {
                let aborted = self.shared.terminate(HandleState::Aborted);
                if aborted {
                    if let Err(message) = contain(|| self.shared.dispose()) {
                        tracing::warn!(
                            "dispose callback of tween {:?} panicked: {}",
                            self.shared.id,
                            message
                        );
                    }
                }
                aborted
            }
        }
    }
}

impl fmt::Debug for TweenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenHandle")
            .field("id", &self.shared.id)
            .field("owner", &self.shared.owner)
            .field("state", &self.shared.state.get())
            .finish()
    }
}

struct Entry {
    /// Taken out while the tree is being advanced
    root: Option<BoxedNode>,
    shared: Rc<HandleShared>,
}

struct Registry {
    entries: SlotMap<HandleId, Entry>,
    by_owner: FxHashMap<OwnerKey, SmallVec<[HandleId; 4]>>,
    config: SchedulerConfig,
    ticking: bool,
    /// Dispose panics caught outside the advance loop, reported by the next tick
    faults: Vec<HandleFault>,
}

impl Registry {
    fn new(config: SchedulerConfig) -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_owner: FxHashMap::default(),
            config,
            ticking: false,
            faults: Vec::new(),
        }
    }

    fn active_ids(&self) -> Vec<HandleId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.shared.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    fn active_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.shared.is_active())
            .count()
    }

    fn owner_active_count(&self, owner: OwnerKey) -> usize {
        self.by_owner.get(&owner).map_or(0, |ids| {
            ids.iter()
                .filter(|id| self.entries.get(**id).is_some_and(|e| e.shared.is_active()))
                .count()
        })
    }

    fn remove(&mut self, id: HandleId) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        let owner = entry.shared.owner;
        if let Some(ids) = self.by_owner.get_mut(&owner) {
            ids.retain(|h| *h != id);
            if ids.is_empty() {
                self.by_owner.remove(&owner);
            }
        }
        Some(entry)
    }

    /// Unlink every entry that has left `Active`.
    ///
    /// The entries are returned so callers can drop their trees after
    /// releasing the registry borrow; dropped closures may call back in.
    fn reap(&mut self) -> Vec<Entry> {
        let done: SmallVec<[HandleId; 8]> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.shared.is_active())
            .map(|(id, _)| id)
            .collect();
        done.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Reap now unless a tick is iterating; the tick reaps when it ends
    fn reap_if_idle(&mut self) -> Vec<Entry> {
        if self.ticking {
            Vec::new()
        } else {
            self.reap()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations shared by the scheduler and its weak handles
// ─────────────────────────────────────────────────────────────────────────────

fn play_in(inner: &Rc<RefCell<Registry>>, root: BoxedNode, owner: OwnerKey) -> Result<TweenHandle> {
    if root.is_empty() {
        return Err(TweenError::EmptyRoot);
    }

    let registry = Rc::downgrade(inner);
    let mut reg = inner.borrow_mut();
    let id = reg.entries.insert_with_key(|id| Entry {
        root: Some(root),
        shared: Rc::new(HandleShared {
            id,
            owner,
            state: Cell::new(HandleState::Active),
            on_dispose: RefCell::new(None),
            registry,
        }),
    });
    reg.by_owner.entry(owner).or_default().push(id);
    let shared = reg.entries[id].shared.clone();
    tracing::debug!("tween {:?} started for {}", id, owner);

    Ok(TweenHandle { shared })
}

fn abort_in(inner: &Rc<RefCell<Registry>>, owner: OwnerKey) -> usize {
    let aborted: SmallVec<[Rc<HandleShared>; 4]> = {
        let reg = inner.borrow();
        let Some(ids) = reg.by_owner.get(&owner) else {
            return 0;
        };
        ids.iter()
            .filter_map(|id| reg.entries.get(*id))
            .filter(|e| e.shared.terminate(HandleState::Aborted))
            .map(|e| e.shared.clone())
            .collect()
    };

    if !aborted.is_empty() {
        tracing::debug!("aborted {} tween(s) for {}", aborted.len(), owner);
    }
    for shared in &aborted {
        dispose_contained(inner, shared);
    }
    let reaped = inner.borrow_mut().reap_if_idle();
    drop(reaped);
    aborted.len()
}

fn abort_all_in(inner: &Rc<RefCell<Registry>>) -> usize {
    let aborted: Vec<Rc<HandleShared>> = inner
        .borrow()
        .entries
        .values()
        .filter(|e| e.shared.terminate(HandleState::Aborted))
        .map(|e| e.shared.clone())
        .collect();

    for shared in &aborted {
        dispose_contained(inner, shared);
    }
    let reaped = inner.borrow_mut().reap_if_idle();
    drop(reaped);
    aborted.len()
}

fn abort_handle_in(inner: &Rc<RefCell<Registry>>, shared: &Rc<HandleShared>) -> bool {
    if !shared.terminate(HandleState::Aborted) {
        return false;
    }
    tracing::debug!("aborted tween {:?}", shared.id);
    dispose_contained(inner, shared);
    let reaped = inner.borrow_mut().reap_if_idle();
    drop(reaped);
    true
}

/// Run a handle's dispose callback, parking a panic in the registry so the
/// remaining disposals still run and the caller is not unwound
fn dispose_contained(inner: &Rc<RefCell<Registry>>, shared: &HandleShared) {
    if let Err(message) = contain(|| shared.dispose()) {
        tracing::warn!("dispose callback of tween {:?} panicked: {}", shared.id, message);
        inner.borrow_mut().faults.push(fault(shared, message));
    }
}

fn contain<R>(f: impl FnOnce() -> R) -> std::result::Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn tick_in(inner: &Rc<RefCell<Registry>>, dt: f64) -> Result<TickReport> {
    if dt.is_nan() || dt < 0.0 {
        return Err(TweenError::InvalidDelta(dt));
    }

    let (snapshot, dt) = {
        let mut reg = inner.borrow_mut();
        if reg.ticking {
            tracing::warn!("tick called from inside a tween callback; ignoring");
            return Err(TweenError::ReentrantTick);
        }
        reg.ticking = true;
        (reg.active_ids(), reg.config.effective_delta(dt))
    };
    tracing::trace!("tick dt={} handles={}", dt, snapshot.len());

    let mut report = TickReport::default();
    let mut faults = Vec::new();

    for id in snapshot {
        // Take the tree out so callbacks can borrow the registry while it runs.
        let taken = {
            let mut reg = inner.borrow_mut();
            reg.entries
                .get_mut(id)
                .filter(|e| e.shared.is_active())
                .and_then(|e| e.root.take().map(|root| (root, e.shared.clone())))
        };
        let Some((mut root, shared)) = taken else {
            continue;
        };
        report.advanced += 1;

        match contain(|| root.advance(dt)) {
            Ok(NodeStatus::Running) => {
                // Aborted mid-advance: the tree is dropped instead of put back.
                if shared.is_active() {
                    if let Some(entry) = inner.borrow_mut().entries.get_mut(id) {
                        entry.root = Some(root);
                    }
                }
            }
            Ok(NodeStatus::Finished) => {
                if shared.terminate(HandleState::Finished) {
                    report.finished += 1;
                    tracing::debug!("tween {:?} finished", id);
                    dispose_contained(inner, &shared);
                }
            }
            Err(message) => {
                tracing::warn!("tween {:?} panicked while advancing: {}", id, message);
                faults.push(fault(&shared, message));
                if shared.terminate(HandleState::Aborted) {
                    dispose_contained(inner, &shared);
                }
            }
        }
    }

    let reaped = {
        let mut reg = inner.borrow_mut();
        reg.ticking = false;
        report.active = reg.active_count();
        faults.append(&mut reg.faults);
        reg.reap()
    };
    drop(reaped);

    if faults.is_empty() {
        Ok(report)
    } else {
        Err(TweenError::HandlesFaulted(faults))
    }
}

fn fault(shared: &HandleShared, message: String) -> HandleFault {
    HandleFault {
        handle: shared.id,
        owner: shared.owner,
        message,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Drives every played tween tree
pub struct TweenScheduler {
    inner: Rc<RefCell<Registry>>,
    last_frame: Cell<Option<Instant>>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::new(config))),
            last_frame: Cell::new(None),
        }
    }

    /// A weak handle for use inside tween callbacks
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.inner.borrow().config.clone()
    }

    pub fn set_config(&self, config: SchedulerConfig) {
        self.inner.borrow_mut().config = config;
    }

    /// Bind `root` to `owner` and start driving it from the next tick
    pub fn play<N: TweenNode + 'static>(&self, root: N, owner: OwnerKey) -> Result<TweenHandle> {
        play_in(&self.inner, Box::new(root), owner)
    }

    /// Abort every active handle of `owner`, returning how many were aborted.
    ///
    /// Each handle's dispose callback runs before this returns; no
    /// completion callbacks of the trees run.
    pub fn abort(&self, owner: OwnerKey) -> usize {
        abort_in(&self.inner, owner)
    }

    /// Abort one handle, whichever scheduler it was played on
    pub fn abort_handle(&self, handle: &TweenHandle) -> bool {
        handle.abort()
    }

    pub fn abort_all(&self) -> usize {
        abort_all_in(&self.inner)
    }

    /// Advance every active handle by `dt` seconds.
    ///
    /// The order handles are advanced in within a tick is unspecified.
    /// Dispose panics caught by aborts since the last tick are reported
    /// together with this tick's faults.
    pub fn tick(&self, dt: f64) -> Result<TickReport> {
        tick_in(&self.inner, dt)
    }

    /// Drain dispose panics caught outside a tick without waiting for one
    pub fn take_faults(&self) -> Vec<HandleFault> {
        std::mem::take(&mut self.inner.borrow_mut().faults)
    }

    /// Tick by the wall-clock time since the previous call (zero on the first)
    pub fn tick_elapsed(&self) -> Result<TickReport> {
        let now = Instant::now();
        let dt = self
            .last_frame
            .replace(Some(now))
            .map_or(0.0, |last| (now - last).as_secs_f64());
        self.tick(dt)
    }

    /// Guard that aborts `owner`'s tweens when dropped
    pub fn owner_guard(&self, owner: OwnerKey) -> OwnerGuard {
        OwnerGuard::new(self.handle(), owner)
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().active_count()
    }

    pub fn owner_active_count(&self, owner: OwnerKey) -> usize {
        self.inner.borrow().owner_active_count(owner)
    }

    pub fn is_active(&self, owner: OwnerKey) -> bool {
        self.owner_active_count(owner) > 0
    }

    /// Check if any tweens are still running
    pub fn has_active_tweens(&self) -> bool {
        self.active_count() > 0
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak, cloneable access to a scheduler, safe to capture in callbacks
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<Registry>>,
}

impl SchedulerHandle {
    fn upgrade(&self) -> Result<Rc<RefCell<Registry>>> {
        self.inner.upgrade().ok_or(TweenError::SchedulerDropped)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn play<N: TweenNode + 'static>(&self, root: N, owner: OwnerKey) -> Result<TweenHandle> {
        play_in(&self.upgrade()?, Box::new(root), owner)
    }

    pub fn abort(&self, owner: OwnerKey) -> Result<usize> {
        Ok(abort_in(&self.upgrade()?, owner))
    }

    pub fn abort_all(&self) -> Result<usize> {
        Ok(abort_all_in(&self.upgrade()?))
    }

    pub fn tick(&self, dt: f64) -> Result<TickReport> {
        tick_in(&self.upgrade()?, dt)
    }

    pub fn owner_active_count(&self, owner: OwnerKey) -> Result<usize> {
        Ok(self.upgrade()?.borrow().owner_active_count(owner))
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Aborts an owner's tweens when dropped
///
/// Tie one to the lifetime of whatever the owner key stands for.
#[derive(Debug)]
pub struct OwnerGuard {
    scheduler: SchedulerHandle,
    owner: OwnerKey,
    armed: bool,
}

impl OwnerGuard {
    pub fn new(scheduler: SchedulerHandle, owner: OwnerKey) -> Self {
        Self {
            scheduler,
            owner,
            armed: true,
        }
    }

    pub fn owner(&self) -> OwnerKey {
        self.owner
    }

    /// Drop the guard without aborting anything
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(count) = self.scheduler.abort(self.owner) {
            if count > 0 {
                tracing::debug!("{} released with {} tween(s) still active", self.owner, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{DelayNode, ExecuteNode};
    use crate::tween::FloatTween;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn test_play_and_finish() {
        let scheduler = TweenScheduler::new();
        let owner = OwnerKey::new();
        let handle = scheduler.play(DelayNode::new(0.5).unwrap(), owner).unwrap();

        assert!(handle.is_active());
        assert_eq!(scheduler.active_count(), 1);

        let report = scheduler.tick(0.25).unwrap();
        assert_eq!(report.advanced, 1);
        assert_eq!(report.finished, 0);

        let report = scheduler.tick(0.25).unwrap();
        assert_eq!(report.finished, 1);
        assert_eq!(report.active, 0);
        assert!(handle.is_finished());
        assert!(!scheduler.is_active(owner));
    }

    #[test]
    fn test_dispose_runs_once_on_finish() {
        let scheduler = TweenScheduler::new();
        let (count, on_dispose) = counter();
        let handle = scheduler
            .play(DelayNode::new(0.1).unwrap(), OwnerKey::new())
            .unwrap();
        handle.set_on_dispose(on_dispose);

        scheduler.tick(1.0).unwrap();
        scheduler.tick(1.0).unwrap();
        assert_eq!(count.get(), 1);
        assert!(!handle.abort());
    }

    #[test]
    fn test_set_on_dispose_after_end_runs_immediately() {
        let scheduler = TweenScheduler::new();
        let handle = scheduler
            .play(DelayNode::new(0.0).unwrap(), OwnerKey::new())
            .unwrap();
        scheduler.tick(0.0).unwrap();

        let (count, on_dispose) = counter();
        handle.set_on_dispose(on_dispose);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_rejects_empty_root() {
        let scheduler = TweenScheduler::new();
        let result = scheduler.play(crate::composite::SequenceNode::new(), OwnerKey::new());
        assert_eq!(result.err(), Some(TweenError::EmptyRoot));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_rejects_bad_delta() {
        let scheduler = TweenScheduler::new();
        assert_eq!(scheduler.tick(-0.1), Err(TweenError::InvalidDelta(-0.1)));
        assert!(scheduler.tick(f64::NAN).is_err());
        assert!(scheduler.tick(0.0).is_ok());
    }

    #[test]
    fn test_abort_by_owner() {
        let scheduler = TweenScheduler::new();
        let (a, b) = (OwnerKey::new(), OwnerKey::new());
        let (disposed, on_dispose) = counter();

        let h1 = scheduler.play(DelayNode::new(1.0).unwrap(), a).unwrap();
        let h2 = scheduler.play(DelayNode::new(1.0).unwrap(), a).unwrap();
        let h3 = scheduler.play(DelayNode::new(1.0).unwrap(), b).unwrap();
        h1.set_on_dispose(on_dispose);

        assert_eq!(scheduler.owner_active_count(a), 2);
        assert_eq!(scheduler.abort(a), 2);
        assert!(h1.is_aborted() && h2.is_aborted());
        assert!(h3.is_active());
        assert_eq!(disposed.get(), 1);
        assert_eq!(scheduler.active_count(), 1);

        // Stale owner
        assert_eq!(scheduler.abort(a), 0);
        assert_eq!(scheduler.abort(OwnerKey::new()), 0);
    }

    #[test]
    fn test_abort_skips_completion() {
        let scheduler = TweenScheduler::new();
        let owner = OwnerKey::new();
        let (completed, on_complete) = counter();
        let (updates, mut on_update) = counter();
        scheduler
            .play(
                FloatTween::new(1.0, 0.0, 1.0)
                    .unwrap()
                    .on_update(move |_| on_update())
                    .on_complete(on_complete),
                owner,
            )
            .unwrap();

        scheduler.tick(0.5).unwrap();
        scheduler.abort(owner);
        scheduler.tick(0.5).unwrap();
        scheduler.tick(0.5).unwrap();
        assert_eq!(updates.get(), 1);
        assert_eq!(completed.get(), 0);
    }

    #[test]
    fn test_abort_single_handle() {
        let scheduler = TweenScheduler::new();
        let owner = OwnerKey::new();
        let h1 = scheduler.play(DelayNode::new(1.0).unwrap(), owner).unwrap();
        let h2 = scheduler.play(DelayNode::new(1.0).unwrap(), owner).unwrap();

        assert!(scheduler.abort_handle(&h1));
        assert!(!h1.abort());
        assert!(h2.is_active());
        assert_eq!(scheduler.owner_active_count(owner), 1);
    }

    #[test]
    fn test_panicking_dispose_does_not_stop_abort() {
        let scheduler = TweenScheduler::new();
        let owner = OwnerKey::new();
        let h1 = scheduler.play(DelayNode::new(1.0).unwrap(), owner).unwrap();
        let h2 = scheduler.play(DelayNode::new(1.0).unwrap(), owner).unwrap();
        let (disposed, on_dispose) = counter();
        h1.set_on_dispose(|| panic!("dispose failed"));
        h2.set_on_dispose(on_dispose);

        assert_eq!(scheduler.abort(owner), 2);
        assert!(h1.is_aborted() && h2.is_aborted());
        assert_eq!(disposed.get(), 1);
        assert_eq!(scheduler.active_count(), 0);

        // Reported by the next tick, then cleared.
        match scheduler.tick(0.0) {
            Err(TweenError::HandlesFaulted(faults)) => {
                assert_eq!(faults.len(), 1);
                assert_eq!(faults[0].handle, h1.id());
                assert!(faults[0].message.contains("dispose failed"));
            }
            other => panic!("expected dispose fault, got {other:?}"),
        }
        assert!(scheduler.tick(0.0).is_ok());
    }

    #[test]
    fn test_take_faults_drains_pending() {
        let scheduler = TweenScheduler::new();
        let handle = scheduler
            .play(DelayNode::new(1.0).unwrap(), OwnerKey::new())
            .unwrap();
        handle.set_on_dispose(|| panic!("boom"));

        assert!(scheduler.abort_handle(&handle));
        let faults = scheduler.take_faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].owner, handle.owner());
        assert!(scheduler.take_faults().is_empty());
        assert!(scheduler.tick(0.0).is_ok());
    }

    #[test]
    fn test_abort_handle_from_other_scheduler_unlinks_it() {
        let a = TweenScheduler::new();
        let b = TweenScheduler::new();
        let handle = b.play(DelayNode::new(1.0).unwrap(), OwnerKey::new()).unwrap();

        assert!(a.abort_handle(&handle));
        assert!(handle.is_aborted());
        assert!(b.inner.borrow().entries.is_empty());
        assert!(b.inner.borrow().by_owner.is_empty());
    }

    #[test]
    fn test_abort_all() {
        let scheduler = TweenScheduler::new();
        for _ in 0..3 {
            scheduler
                .play(DelayNode::new(1.0).unwrap(), OwnerKey::new())
                .unwrap();
        }
        assert_eq!(scheduler.abort_all(), 3);
        assert!(!scheduler.has_active_tweens());
    }

    #[test]
    fn test_time_scale_and_clamp() {
        let scheduler = TweenScheduler::with_config(SchedulerConfig {
            time_scale: 2.0,
            max_delta: Some(0.1),
        });
        let handle = scheduler
            .play(DelayNode::new(0.4).unwrap(), OwnerKey::new())
            .unwrap();

        // Each tick counts as 0.2s: clamped to 0.1, then doubled.
        scheduler.tick(5.0).unwrap();
        assert!(handle.is_active());
        scheduler.tick(5.0).unwrap();
        assert!(handle.is_finished());
    }

    #[test]
    fn test_play_during_tick_starts_next_tick() {
        let scheduler = TweenScheduler::new();
        let handle = scheduler.handle();
        let ran = Rc::new(Cell::new(0));
        let spawned = Rc::new(RefCell::new(None));
        let slot = spawned.clone();
        let ran_in = ran.clone();

        scheduler
            .play(
                ExecuteNode::new(move || {
                    let r = ran_in.clone();
                    let child = handle
                        .play(ExecuteNode::new(move || r.set(r.get() + 1)), OwnerKey::new())
                        .unwrap();
                    *slot.borrow_mut() = Some(child);
                }),
                OwnerKey::new(),
            )
            .unwrap();

        let report = scheduler.tick(0.0).unwrap();
        assert_eq!(report.advanced, 1);
        assert_eq!(ran.get(), 0);
        assert_eq!(report.active, 1);

        scheduler.tick(0.0).unwrap();
        assert_eq!(ran.get(), 1);
        assert!(spawned.borrow().as_ref().is_some_and(|h| h.is_finished()));
    }

    #[test]
    fn test_reentrant_tick_is_rejected() {
        let scheduler = TweenScheduler::new();
        let handle = scheduler.handle();
        let result = Rc::new(RefCell::new(None));
        let out = result.clone();

        scheduler
            .play(
                ExecuteNode::new(move || {
                    *out.borrow_mut() = Some(handle.tick(0.1));
                }),
                OwnerKey::new(),
            )
            .unwrap();
        scheduler.tick(0.1).unwrap();

        assert_eq!(*result.borrow(), Some(Err(TweenError::ReentrantTick)));
    }

    #[test]
    fn test_weak_handle_after_drop() {
        let scheduler = TweenScheduler::new();
        let handle = scheduler.handle();
        assert!(handle.is_alive());
        drop(scheduler);
        assert!(!handle.is_alive());
        assert_eq!(handle.abort(OwnerKey::new()), Err(TweenError::SchedulerDropped));
    }

    #[test]
    fn test_tick_elapsed_starts_at_zero() {
        let scheduler = TweenScheduler::new();
        let handle = scheduler
            .play(DelayNode::new(60.0).unwrap(), OwnerKey::new())
            .unwrap();
        let report = scheduler.tick_elapsed().unwrap();
        assert_eq!(report.advanced, 1);
        assert!(handle.is_active());
    }
}
