//! Cadence Core
//!
//! Foundational primitives shared by the tween engine and its hosts:
//!
//! - **Values**: `Vec2`, `Vec3` and `Color`, the value kinds leaf tweens write out
//! - **Ownership**: `OwnerKey`, the opaque identity handles are grouped by
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Color, OwnerKey, Vec3};
//!
//! let owner = OwnerKey::new();
//! assert_ne!(owner, OwnerKey::new());
//!
//! let up = Vec3::UP * 2.0;
//! assert_eq!(up.y, 2.0);
//! assert_eq!(Color::from_hex(0xFF0000), Color::RED);
//! ```

pub mod owner;
pub mod value;

pub use owner::OwnerKey;
pub use value::{Color, Vec2, Vec3};
