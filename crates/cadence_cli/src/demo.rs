//! Demo scene: one sprite driven by a chain of tweens
//!
//! The sprite stands in for a host object. Its fields are what leaf tweens
//! write into through their update callbacks.

use std::cell::Cell;
use std::rc::Rc;

use cadence_core::{Color, Vec3};
use cadence_tween::math::{bezier_tween, shake_tween};
use cadence_tween::{
    BoxedNode, ColorTween, Easing, FloatTween, LoopMode, Result, TweenChain, TweenNode,
};

/// Host-side state the demo animates
#[derive(Debug)]
pub struct Sprite {
    pub position: Cell<Vec3>,
    pub tint: Cell<Color>,
    pub scale: Cell<f32>,
    pub pulses: Cell<u32>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            position: Cell::new(Vec3::ZERO),
            tint: Cell::new(Color::TRANSPARENT),
            scale: Cell::new(0.0),
            pulses: Cell::new(0),
        }
    }
}

impl Sprite {
    pub fn describe(&self) -> String {
        let p = self.position.get();
        let c = self.tint.get();
        format!(
            "pos=({:.2}, {:.2}, {:.2}) scale={:.2} alpha={:.2} pulses={}",
            p.x,
            p.y,
            p.z,
            self.scale.get(),
            c.a,
            self.pulses.get()
        )
    }
}

const TARGET: Vec3 = Vec3::new(4.0, 0.0, 0.0);

/// Appear, arc across, pulse, then shake while bouncing the scale
pub fn build(sprite: &Rc<Sprite>) -> Result<BoxedNode> {
    let scale = {
        let sprite = sprite.clone();
        move |v: f32| sprite.scale.set(v)
    };
    let position = {
        let sprite = sprite.clone();
        move |v: Vec3| sprite.position.set(v)
    };
    let tint = {
        let sprite = sprite.clone();
        move |v: Color| sprite.tint.set(v)
    };
    let pulse = {
        let sprite = sprite.clone();
        move || {
            sprite.pulses.set(sprite.pulses.get() + 1);
            tracing::debug!("pulse {}", sprite.pulses.get());
        }
    };

    TweenChain::sequence()
        .execute(|| tracing::info!("demo: appear"))
        .append_parallel([
            FloatTween::new(0.5, 0.0, 1.0)?
                .ease(Easing::EaseOutBack)
                .on_update(scale.clone())
                .boxed(),
            ColorTween::new(0.5, Color::TRANSPARENT, Color::CYAN)?
                .on_update(tint)
                .boxed(),
        ])
        .execute(|| tracing::info!("demo: travel"))
        .append(
            bezier_tween(
                1.5,
                Vec3::ZERO,
                Vec3::new(0.0, 3.0, 0.0),
                Vec3::new(4.0, 3.0, 0.0),
                TARGET,
            )?
            .ease(Easing::EaseInOutSine)
            .on_update(position.clone()),
        )
        .repeat(0.0, 0.25, 1.0, pulse)
        .switch_to_parallel([shake_tween(0.75, TARGET, Vec3::new(0.3, 0.3, 0.0))?
            .on_update(position)
            .boxed()])
        .append(
            FloatTween::new(0.375, 1.0, 1.25)?
                .ease(Easing::EaseOutQuad)
                .looping(LoopMode::PingPong, 1)
                .on_update(scale),
        )
        .end()
        .execute(|| tracing::info!("demo: done"))
        .build()
}
