//! Flow control and the frame loop.
//!
//! A "flow" is a scene or character that updates its state and provides
//! renderable objects each frame. The [`App`] owns the flows, advances them
//! in fixed steps and submits their renders to a [`DrawTarget`].
//!
//! # Lifecycle Flow
//!
//! Each frame:
//! 1. Measure the frame delta and clamp it
//! 2. Call `on_update` on all flows once per whole fixed step
//! 3. Take the camera position from the last flow that drives one
//! 4. Collect every flow's `on_render()`
//! 5. Submit opaque draws, then transparent draws back to front

use cgmath::Point3;
use instant::{Duration, Instant};
use log::{debug, warn};

use crate::{
    context::{Context, init_logging},
    render::{DrawTarget, Render},
};

/// Trait for implementing an animated scene object.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once before the first frame; read settings from the context here
/// 2. `on_update()` is called once per fixed step with the step length
/// 3. `on_render()` is called each frame and specifies how to render `self`
pub trait Flow<S> {
    fn on_init(&mut self, ctx: &mut Context, state: &mut S);

    /// Update state by one fixed step.
    ///
    /// `ctx.elapsed` already includes this step.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration);

    fn on_render(&self) -> Render;

    /// Camera position this flow steers, if any.
    fn camera(&self) -> Option<Point3<f32>> {
        None
    }
}

/// Fixed-step accumulator.
///
/// Frame deltas are clamped to `max_frame` so a stalled frame cannot trigger
/// a flood of catch-up updates; the remainder below one step is carried over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    step: f32,
    max_frame: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_frame: f32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_frame,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried into the next frame.
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Adds a frame delta and returns how many fixed updates are due.
    pub fn advance(&mut self, frame: f32) -> u32 {
        let frame = if frame > self.max_frame {
            warn!("clamping frame delta of {:.3}s to {:.3}s", frame, self.max_frame);
            self.max_frame
        } else {
            frame.max(0.0)
        };
        self.accumulator += frame;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}

pub struct App<S> {
    pub ctx: Context,
    pub state: S,
    flows: Vec<Box<dyn Flow<S>>>,
    clock: FixedStep,
    initialized: bool,
}

impl<S> App<S> {
    pub fn new(ctx: Context, state: S, flows: Vec<Box<dyn Flow<S>>>) -> Self {
        let clock = FixedStep::new(ctx.config.fixed_step, ctx.config.max_frame);
        Self {
            ctx,
            state,
            flows,
            clock,
            initialized: false,
        }
    }

    pub fn flows(&self) -> &[Box<dyn Flow<S>>] {
        &self.flows
    }

    fn init(&mut self) {
        for flow in self.flows.iter_mut() {
            flow.on_init(&mut self.ctx, &mut self.state);
        }
        self.clock = FixedStep::new(self.ctx.config.fixed_step, self.ctx.config.max_frame);
        self.initialized = true;
    }

    /// Runs one frame of `dt` wall time and returns the number of fixed updates.
    pub fn frame(&mut self, dt: Duration, target: &mut dyn DrawTarget) -> u32 {
        if !self.initialized {
            self.init();
        }
        let steps = self.clock.advance(dt.as_secs_f32());
        let step = Duration::from_secs_f32(self.clock.step());
        for _ in 0..steps {
            self.ctx.elapsed += self.clock.step();
            for flow in self.flows.iter_mut() {
                flow.on_update(&self.ctx, &mut self.state, step);
            }
        }
        self.ctx.frame += 1;
        if let Some(eye) = self.flows.iter().filter_map(|f| f.camera()).last() {
            self.ctx.camera = eye;
        }

        let render = Render::Composed(self.flows.iter().map(|f| f.on_render()).collect());
        render.submit(self.ctx.camera, target);
        steps
    }
}

/// Drives `app` for `frames` frames against `target`, measuring real time between frames.
pub fn run<S>(app: &mut App<S>, target: &mut dyn DrawTarget, frames: u64) -> anyhow::Result<()> {
    init_logging();

    if app.flows().is_empty() {
        anyhow::bail!("nothing to run: no flows registered");
    }

    let mut last_time = Instant::now();
    for _ in 0..frames {
        let dt = last_time.elapsed();
        last_time = Instant::now();
        app.frame(dt, target);
    }
    debug!("ran {} frames, simulated {:.3}s", app.ctx.frame, app.ctx.elapsed);
    Ok(())
}
