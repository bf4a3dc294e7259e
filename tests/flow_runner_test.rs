use blocky_world::{
    Command, Context, FlowRunner,
    flow::FpsCounter,
};
use instant::Duration;

use crate::common::test_utils::{CountingFlow, FRAME};

mod common;

#[test]
fn init_runs_once_before_any_frame() {
    let runner = FlowRunner::new(Context::default(), CountingFlow::default());
    assert_eq!(runner.flow().state.init_invocations, 1);
    assert_eq!(runner.flow().state.update_invocations, 0);
    assert_eq!(runner.ctx().tick_duration_millis, 100);
    assert_eq!(runner.frames(), 0);
}

#[test]
fn every_step_updates_and_ticks_follow_the_context() {
    let mut runner = FlowRunner::new(Context::default(), CountingFlow::default());
    for _ in 0..6 {
        runner.step(FRAME, &[]);
    }
    assert_eq!(runner.flow().state.tick_invocations, 0);

    // 7 × 16 ms crosses the 100 ms tick.
    runner.step(FRAME, &[]);
    assert_eq!(runner.flow().state.tick_invocations, 1);

    for _ in 0..6 {
        runner.step(FRAME, &[]);
    }
    assert_eq!(runner.flow().state.tick_invocations, 1);
    runner.step(FRAME, &[]);
    assert_eq!(runner.flow().state.tick_invocations, 2);

    assert_eq!(runner.flow().state.update_invocations, 14);
    assert_eq!(runner.frames(), 14);
    assert_eq!(runner.flow().state.elapsed, FRAME * 14);
}

#[test]
fn commands_arrive_in_order_before_the_update() {
    let mut runner = FlowRunner::new(Context::default(), CountingFlow::default());
    let commands = [Command::PlaceBlock, Command::MoveForward(0.5), Command::Poke];
    runner.step(FRAME, &commands);
    assert_eq!(runner.flow().state.commands, commands.to_vec());
    assert_eq!(runner.flow().state.update_invocations, 1);
}

#[test]
fn configure_output_changes_the_context() {
    let mut runner = FlowRunner::new(Context::default(), CountingFlow::default());
    assert!(runner.ctx().collision);
    runner.step(FRAME, &[Command::SetCollision(false)]);
    assert!(!runner.ctx().collision);
    runner.step(FRAME, &[Command::SetCollision(true)]);
    assert!(runner.ctx().collision);
}

#[test]
fn render_uses_the_context_clear_colour() {
    let ctx = Context::default().with_clear_colour([0.1, 0.2, 0.3]);
    let runner = FlowRunner::new(ctx, CountingFlow::default());
    let frame = runner.render(1.0);
    assert_eq!(frame.clear_colour, [0.1, 0.2, 0.3, 1.0]);
    assert_eq!(frame.render.draw_count(), 0);
}

#[test]
fn fps_is_reported_once_per_second() {
    let mut fps = FpsCounter::new();
    for _ in 0..49 {
        assert_eq!(fps.record(Duration::from_millis(20)), None);
    }
    let rate = fps.record(Duration::from_millis(20)).expect("a full second");
    assert!((rate - 50.0).abs() < 0.01);
    assert_eq!(fps.current(), Some(rate));
    assert_eq!(fps.record(Duration::from_millis(20)), None);
}
