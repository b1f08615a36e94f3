//! Owner identity
//!
//! Every tween handle is bound to an owner. The engine only compares and
//! hashes owner keys; it never learns when the thing they name goes away.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keys from [`OwnerKey::new`] have this bit set; raw host ids must not.
const GENERATED_BIT: u64 = 1 << 63;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(GENERATED_BIT);

/// Opaque, comparable identity used to group and bulk-cancel tween handles
///
/// Generated keys and wrapped host ids live in separate halves of the `u64`
/// space, so the two kinds never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey(u64);

impl OwnerKey {
    /// Allocate a fresh key, distinct from every other key allocated by this process
    pub fn new() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed) | GENERATED_BIT)
    }

    /// Wrap a host-side identity (entity id, widget id, ...).
    ///
    /// Host ids must be below `2^63`; the top bit is reserved for generated keys.
    pub const fn from_raw(raw: u64) -> Self {
        assert!(raw & GENERATED_BIT == 0, "raw owner ids must be below 2^63");
        Self(raw)
    }

    /// Whether this key came from [`OwnerKey::new`]
    pub const fn is_generated(self) -> bool {
        self.0 & GENERATED_BIT != 0
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for OwnerKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for OwnerKey {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_generated() {
            write!(f, "owner#g{}", self.0 & !GENERATED_BIT)
        } else {
            write!(f, "owner#{}", self.0)
        }
    }
}
