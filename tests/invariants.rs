//! Property tests for the physics and clock invariants

use magnet_quest::consts::ROUND_SECONDS;
use magnet_quest::sim::Tier;
use magnet_quest::{Phase, Session};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Move(f32, f32),
    Down(bool),
    Flip,
    Tier(u8),
    Pause,
    Resume,
    Second,
    Frames(u8),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (-200.0f32..1200.0, -200.0f32..800.0).prop_map(|(x, y)| Action::Move(x, y)),
        any::<bool>().prop_map(Action::Down),
        Just(Action::Flip),
        (0u8..3).prop_map(Action::Tier),
        Just(Action::Pause),
        Just(Action::Resume),
        Just(Action::Second),
        (1u8..30).prop_map(Action::Frames),
    ]
}

fn tier(i: u8) -> Tier {
    match i {
        0 => Tier::Small,
        1 => Tier::Medium,
        _ => Tier::Large,
    }
}

proptest! {
    #[test]
    fn mover_never_leaves_playfield(
        width in 300.0f32..1600.0,
        height in 200.0f32..1200.0,
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 1..80),
    ) {
        let mut session = Session::new(width, height, seed);
        session.start();
        for action in actions {
            match action {
                Action::Move(x, y) => session.pointer_move(x, y),
                Action::Down(down) => session.set_pointer_down(down),
                Action::Flip => { session.flip_polarity(); }
                Action::Tier(t) => session.select_tier(tier(t)),
                Action::Pause => { session.pause(); }
                Action::Resume => { session.resume(); }
                Action::Second => session.on_timer_second(0.0),
                Action::Frames(n) => {
                    for _ in 0..n {
                        session.frame();
                        let m = &session.sim.mover;
                        let eps = 1e-3;
                        prop_assert!(m.pos.x >= m.radius - eps);
                        prop_assert!(m.pos.x <= width - m.radius + eps);
                        prop_assert!(m.pos.y >= m.radius - eps);
                        prop_assert!(m.pos.y <= height - m.radius + eps);
                    }
                }
            }
        }
    }

    #[test]
    fn time_left_is_monotonic_and_floored(
        actions in prop::collection::vec(action(), 1..200),
    ) {
        let mut session = Session::new(1000.0, 600.0, 1);
        session.start();
        let mut last = session.time_left();
        for action in actions {
            let running = session.phase() == Phase::Running;
            match action {
                Action::Pause => { session.pause(); }
                Action::Resume => { session.resume(); }
                Action::Second => {
                    for _ in 0..5 {
                        session.on_timer_second(0.0);
                    }
                }
                _ => { session.frame(); }
            }
            let now = session.time_left();
            prop_assert!(now <= last);
            prop_assert!(now <= ROUND_SECONDS);
            if !running {
                prop_assert_eq!(now, last);
            }
            last = now;
        }
    }
}
