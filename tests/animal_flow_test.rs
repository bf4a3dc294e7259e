use blocky_world::{
    Command, Context, FlowRunner,
    data_structures::{
        animation::JointMode,
        rat::{self, GAIT, Leg},
    },
    flows::animal::{AnimalFlow, MAX_DRAG_PITCH, VIEWER_CLEAR_COLOUR},
};

use crate::common::test_utils::{FRAME, assert_approx};

mod common;

fn viewer() -> FlowRunner<AnimalFlow> {
    FlowRunner::new(Context::default(), AnimalFlow::new().expect("rat builds"))
}

fn angle(runner: &FlowRunner<AnimalFlow>, name: &str) -> f32 {
    runner
        .flow()
        .rat()
        .segment(name)
        .expect("segment exists")
        .joint_angle()
}

#[test]
fn viewer_sets_its_own_clear_colour() {
    let runner = viewer();
    assert_eq!(runner.ctx().clear_colour, VIEWER_CLEAR_COLOUR);
    assert_eq!(runner.render(1.0).render.draw_count(), 23);
}

#[test]
fn sliders_drive_the_front_left_leg() {
    let mut runner = viewer();
    assert!(runner.flow_mut().set_slider(1, 30.0));
    assert!(runner.flow_mut().set_slider(2, -10.0));
    assert!(runner.flow_mut().set_slider(3, 5.0));
    runner.step(FRAME, &[]);
    assert_eq!(angle(&runner, Leg::FrontLeft.upper()), 30.0);
    assert_eq!(angle(&runner, Leg::FrontLeft.lower()), -10.0);
    assert_eq!(angle(&runner, Leg::FrontLeft.foot()), 5.0);
    assert_eq!(angle(&runner, Leg::BackRight.lower()), 20.0);
}

#[test]
fn unknown_slider_is_rejected() {
    let mut runner = viewer();
    assert!(!runner.flow_mut().set_slider(4, 1.0));
    runner.step(FRAME, &[]);
    assert_eq!(angle(&runner, Leg::FrontLeft.upper()), 0.0);
}

#[test]
fn animated_mode_walks() {
    let mut runner = viewer();
    runner.step(FRAME, &[Command::SetAnimated(true)]);
    assert_eq!(runner.flow().mode(), JointMode::Animated);
    for _ in 0..10 {
        runner.step(FRAME, &[]);
    }
    let t = runner.flow().seconds();
    assert_approx(angle(&runner, Leg::FrontLeft.upper()), GAIT.sample(t));

    runner.step(FRAME, &[Command::SetAnimated(false)]);
    assert_eq!(angle(&runner, Leg::FrontLeft.upper()), 0.0);
}

#[test]
fn drag_pitch_is_clamped() {
    let mut runner = viewer();
    runner.step(FRAME, &[Command::Drag { dx: 10.0, dy: 1000.0 }]);
    let (pitch, yaw) = runner.flow().drag_rotation();
    assert_eq!(pitch, MAX_DRAG_PITCH);
    assert_approx(yaw, 5.0);

    runner.step(FRAME, &[Command::Drag { dx: 0.0, dy: -5000.0 }]);
    assert_eq!(runner.flow().drag_rotation().0, -MAX_DRAG_PITCH);
}

#[test]
fn poke_hops_and_then_ends() {
    let mut runner = viewer();
    runner.step(FRAME, &[Command::Poke]);
    assert!(runner.flow().is_poking());
    for _ in 0..10 {
        runner.step(FRAME, &[]);
    }
    let body = runner.flow().rat().segment(rat::BODY).expect("body");
    assert!(body.world_base().origin().y > 0.05);

    for _ in 0..100 {
        runner.step(FRAME, &[]);
    }
    assert!(!runner.flow().is_poking());
    let body = runner.flow().rat().segment(rat::BODY).expect("body");
    assert_approx(body.world_base().origin().y, 0.0);
}
