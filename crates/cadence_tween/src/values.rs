//! Interpolation over tweenable value kinds
//!
//! `Interpolate` covers the built-in kinds (scalars, `Vec2`, `Vec3`, `Color`).
//! Anything else is tweened by handing a custom interpolation function to
//! [`ValueTween::with_lerp`](crate::tween::ValueTween::with_lerp).

use cadence_core::{Color, Vec2, Vec3};

/// A value that can be linearly interpolated between two endpoints
///
/// `t` is eased progress and may leave `[0, 1]` for overshooting curves, so
/// implementations must extrapolate rather than clamp.
pub trait Interpolate: Clone {
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

/// Linear interpolation for a single `f32`
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f64) -> f32 {
    a + (b - a) * t as f32
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp_f32(*self, *to, t)
    }
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Vec2::new(lerp_f32(self.x, to.x, t), lerp_f32(self.y, to.y, t))
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Vec3::new(
            lerp_f32(self.x, to.x, t),
            lerp_f32(self.y, to.y, t),
            lerp_f32(self.z, to.z, t),
        )
    }
}

impl Interpolate for Color {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Color::rgba(
            lerp_f32(self.r, to.r, t),
            lerp_f32(self.g, to.g, t),
            lerp_f32(self.b, to.b, t),
            lerp_f32(self.a, to.a, t),
        )
    }
}
