//! Tween math helpers
//!
//! Bezier evaluation for anything that adds and scales by `f32`, and a
//! damped random shake. Both plug into leaf tweens through
//! [`ValueTween::with_lerp`].

use std::ops::{Add, Mul};

use cadence_core::Vec3;
use rand::Rng;

use crate::error::Result;
use crate::tween::{ValueTween, Vec3Tween};

/// Point on a cubic Bezier curve at `t`
pub fn cubic_bezier<T>(p0: T, c0: T, c1: T, p1: T, t: f64) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let t = t as f32;
    let u = 1.0 - t;
    p0 * (u * u * u) + c0 * (3.0 * u * u * t) + c1 * (3.0 * u * t * t) + p1 * (t * t * t)
}

/// Point on a quadratic Bezier curve at `t`
pub fn quadratic_bezier<T>(p0: T, c: T, p1: T, t: f64) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let t = t as f32;
    let u = 1.0 - t;
    p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t)
}

/// Random offset within `magnitude` on each axis, fading to zero as
/// `progress` reaches 1
pub fn shake<R: Rng + ?Sized>(magnitude: Vec3, progress: f64, rng: &mut R) -> Vec3 {
    let damping = (1.0 - progress.clamp(0.0, 1.0)) as f32;
    let jitter = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    );
    jitter.scale_by(magnitude) * damping
}

/// Tween that shakes around `origin` and settles back on it
pub fn shake_tween(duration: f64, origin: Vec3, magnitude: Vec3) -> Result<Vec3Tween> {
    ValueTween::with_lerp(duration, origin, origin, move |from, _, t| {
        *from + shake(magnitude, t, &mut rand::thread_rng())
    })
}

/// Tween along a cubic Bezier path from `p0` to `p1`
pub fn bezier_tween(duration: f64, p0: Vec3, c0: Vec3, c1: Vec3, p1: Vec3) -> Result<Vec3Tween> {
    ValueTween::with_lerp(duration, p0, p1, move |from, to, t| {
        cubic_bezier(*from, c0, c1, *to, t)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TweenNode;
    use cadence_core::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-5
    }

    #[test]
    fn test_bezier_endpoints() {
        let (p0, c0, c1, p1) = (
            Vec3::ZERO,
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert!(approx(cubic_bezier(p0, c0, c1, p1, 0.0), p0));
        assert!(approx(cubic_bezier(p0, c0, c1, p1, 1.0), p1));
        assert!(approx(cubic_bezier(p0, c0, c1, p1, 0.5), Vec3::new(0.5, 1.5, 0.0)));
    }

    #[test]
    fn test_bezier_generic_over_scalars() {
        assert_eq!(quadratic_bezier(0.0f32, 1.0, 0.0, 0.5), 0.5);
        assert_eq!(cubic_bezier(0.0f32, 0.0, 1.0, 1.0, 0.5), 0.5);
        let mid = quadratic_bezier(Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0), 0.5);
        assert_eq!(mid, Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_shake_bounded_and_damped() {
        let mut rng = StdRng::seed_from_u64(7);
        let magnitude = Vec3::new(1.0, 0.5, 0.0);
        for i in 0..100 {
            let progress = i as f64 / 100.0;
            let offset = shake(magnitude, progress, &mut rng);
            let limit = (1.0 - progress) as f32 + 1e-6;
            assert!(offset.x.abs() <= limit);
            assert!(offset.y.abs() <= 0.5 * limit);
            assert_eq!(offset.z, 0.0);
        }
        assert_eq!(shake(magnitude, 1.0, &mut rng), Vec3::ZERO);
    }

    #[test]
    fn test_shake_tween_settles_on_origin() {
        let origin = Vec3::new(3.0, 1.0, -2.0);
        let last = Rc::new(RefCell::new(Vec3::ZERO));
        let sink = last.clone();
        let mut tween = shake_tween(0.5, origin, Vec3::ONE)
            .unwrap()
            .on_update(move |v| *sink.borrow_mut() = v);

        tween.advance(0.25);
        assert!(last.borrow().distance(origin) <= 3f32.sqrt() * 0.5 + 1e-5);
        assert!(tween.advance(0.25).is_finished());
        assert!(approx(*last.borrow(), origin));
    }

    #[test]
    fn test_bezier_tween_follows_curve() {
        let c0 = Vec3::new(0.0, 4.0, 0.0);
        let c1 = Vec3::new(4.0, 4.0, 0.0);
        let p1 = Vec3::new(4.0, 0.0, 0.0);
        let mut tween = bezier_tween(1.0, Vec3::ZERO, c0, c1, p1).unwrap();

        tween.advance(0.5);
        assert!(approx(tween.value(), Vec3::new(2.0, 3.0, 0.0)));
        tween.advance(0.5);
        assert!(approx(tween.value(), p1));
    }
}
