#![allow(dead_code)]

use blocky_world::{
    cgmath::{Point3, Vector3},
    context::Context,
    flow::{Command, GraphicsFlow, Out},
    render::{Frame, Render},
};
use instant::Duration;

pub(crate) const EPSILON: f32 = 1e-4;

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON * (1.0 + a.abs().max(b.abs()))
}

pub(crate) fn assert_approx(a: f32, b: f32) {
    assert!(approx_eq(a, b), "expected {} ≈ {}", a, b);
}

pub(crate) fn assert_point_eq(a: Point3<f32>, b: Point3<f32>) {
    assert!(
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z),
        "expected {:?} ≈ {:?}",
        a,
        b
    );
}

pub(crate) fn assert_vector_eq(a: Vector3<f32>, b: Vector3<f32>) {
    assert!(
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z),
        "expected {:?} ≈ {:?}",
        a,
        b
    );
}

pub(crate) fn assert_cols_eq(a: [f32; 16], b: [f32; 16]) {
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(approx_eq(*x, *y), "element {}: {} vs {} in {:?} / {:?}", i, x, y, a, b);
    }
}

pub(crate) const FRAME: Duration = Duration::from_millis(16);

/// Records how often each lifecycle hook was invoked.
#[derive(Default)]
pub(crate) struct State {
    pub init_invocations: u32,
    pub update_invocations: u32,
    pub tick_invocations: u32,
    pub commands: Vec<Command>,
    pub elapsed: Duration,
}

/// A flow that only counts; used to check the runner's frame loop.
#[derive(Default)]
pub(crate) struct CountingFlow {
    pub state: State,
}

impl GraphicsFlow for CountingFlow {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        assert_eq!(self.state.update_invocations, 0);
        self.state.init_invocations += 1;
        ctx.tick_duration_millis = 100;
        Out::Empty
    }

    fn on_command(&mut self, _: &Context, command: Command) -> Out {
        assert_eq!(self.state.init_invocations, 1);
        self.state.commands.push(command);
        match command {
            Command::SetCollision(on) => Out::Configure(Box::new(move |ctx| ctx.collision = on)),
            _ => Out::Empty,
        }
    }

    fn on_update(&mut self, _: &Context, dt: Duration) -> Out {
        self.state.update_invocations += 1;
        self.state.elapsed += dt;
        Out::Empty
    }

    fn on_tick(&mut self, _: &Context) -> Out {
        self.state.tick_invocations += 1;
        Out::Empty
    }

    fn on_render(&self, ctx: &Context, _: f32) -> Frame<'_> {
        Frame {
            view: [0.0; 16],
            projection: [0.0; 16],
            clear_colour: ctx.clear_rgba(),
            render: Render::None,
        }
    }
}
