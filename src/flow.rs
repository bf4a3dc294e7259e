//! Flow control and the frame loop.
//!
//! A "flow" is a self-contained scene: it reacts to input [`Command`]s, updates
//! its simulation every frame and describes what to draw. The [`FlowRunner`]
//! owns a flow together with the [`Context`] and drives it one frame at a time.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow`] is the trait for scenes that handle commands and rendering
//! - [`Out`] lets a hook reconfigure the context after it returns
//! - [`Command`] is the input boundary: movement, look, block edits and viewer controls
//!
//! # Lifecycle
//!
//! Each frame follows this pattern:
//! 1. Hand the frame's commands to `on_command` in order
//! 2. Call `on_update` with the elapsed frame time
//! 3. Call `on_tick` once `tick_duration_millis` have passed
//! 4. Call `on_render` to collect the [`Frame`] for the renderer

use instant::{Duration, Instant};

use crate::{context::Context, render::Frame};

/// One discrete piece of user input, already mapped from keys and mouse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    MoveForward(f32),
    MoveBackward(f32),
    MoveLeft(f32),
    MoveRight(f32),
    /// Degrees to turn left; negative turns right.
    PanLeft(f32),
    PanRight(f32),
    /// Degrees to look up; negative looks down.
    Tilt(f32),
    /// Mouse drag with the left button held, in pixels.
    Drag { dx: f32, dy: f32 },
    PlaceBlock,
    RemoveBlock,
    Poke,
    SetAnimated(bool),
    SetCollision(bool),
}

///
/// Output of every lifecycle hook.
///
/// `Out::Configure` modifies the Context once the hook has returned, for instance
/// to change the tick speed, the clear colour or whether movement collides.
///
/// `Empty` is the default output when nothing needs to change.
///
#[derive(Default)]
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    #[default]
    Empty,
}

impl std::fmt::Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Out::Configure(_) => f.write_str("Out::Configure"),
            Out::Empty => f.write_str("Out::Empty"),
        }
    }
}

/// Trait for implementing a scene driven by the frame loop.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the runner is created; adjust the context here
/// 2. `on_command()` is called for every input command of a frame
/// 3. `on_update()` is called every frame
/// 4. `on_tick()` is called every `tick_duration_millis`
/// 5. `on_render()` is called each frame and specifies how to draw `self`
pub trait GraphicsFlow {
    /// Build the scene and configure the context.
    ///
    /// This is the only hook that gets the Context mutably.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    /// React to one input command.
    fn on_command(&mut self, ctx: &Context, command: Command) -> Out;

    /// Update state every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out;

    /// Periodic update, every `tick_duration_millis` (configurable via context).
    fn on_tick(&mut self, ctx: &Context) -> Out;

    /// Camera matrices plus everything to draw this frame.
    fn on_render(&self, ctx: &Context, aspect: f32) -> Frame<'_>;
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

/// Wall-clock frame timing.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Time since the previous call (or since creation).
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts frames and reports the rate once per elapsed second.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    window: Duration,
    current: Option<f32>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame. Returns the new rate whenever a full second has been counted.
    pub fn record(&mut self, dt: Duration) -> Option<f32> {
        self.frames += 1;
        self.window += dt;
        if self.window < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / self.window.as_secs_f32();
        self.frames = 0;
        self.window = Duration::ZERO;
        self.current = Some(fps);
        self.current
    }

    /// The most recently reported rate.
    pub fn current(&self) -> Option<f32> {
        self.current
    }
}

/// Owns one flow and its context and steps them frame by frame.
pub struct FlowRunner<F: GraphicsFlow> {
    ctx: Context,
    flow: F,
    clock: FrameClock,
    fps: FpsCounter,
    time_since_tick: Duration,
    frames: u64,
}

impl<F: GraphicsFlow> FlowRunner<F> {
    pub fn new(mut ctx: Context, mut flow: F) -> Self {
        let out = flow.on_init(&mut ctx);
        handle_flow_output(&mut ctx, out);
        Self {
            ctx,
            flow,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            time_since_tick: Duration::ZERO,
            frames: 0,
        }
    }

    /// Runs one frame timed by the wall clock.
    pub fn frame(&mut self, commands: &[Command]) {
        let dt = self.clock.tick();
        self.step(dt, commands);
    }

    /// Runs one frame of length `dt`. Deterministic, so scripted runs and tests use it.
    pub fn step(&mut self, dt: Duration, commands: &[Command]) {
        for command in commands {
            let out = self.flow.on_command(&self.ctx, *command);
            handle_flow_output(&mut self.ctx, out);
        }

        let out = self.flow.on_update(&self.ctx, dt);
        handle_flow_output(&mut self.ctx, out);

        self.time_since_tick += dt;
        if self.time_since_tick >= Duration::from_millis(self.ctx.tick_duration_millis) {
            let out = self.flow.on_tick(&self.ctx);
            handle_flow_output(&mut self.ctx, out);
            self.time_since_tick = Duration::ZERO;
        }

        if let Some(fps) = self.fps.record(dt) {
            log::debug!("FPS: {:.1}", fps);
        }
        self.frames += 1;
    }

    pub fn render(&self, aspect: f32) -> Frame<'_> {
        self.flow.on_render(&self.ctx, aspect)
    }

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> Option<f32> {
        self.fps.current()
    }
}

/// Installs the platform logger. Safe to call more than once.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("Could not initialize logger: {}", e);
        }
    }
}
