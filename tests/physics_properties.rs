//! Property and scenario tests for the pool physics, through the public API

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use proptest::prelude::*;

use pet_pool::Tuning;
use pet_pool::consts::FRAME_MS;
use pet_pool::sim::{BallClass, LoopControl, Session, SimLoop, break_layout, cue_spot, step};

fn staged(layout: Vec<(u8, BallClass, Vec2)>) -> Session {
    let tuning = Tuning::default();
    Session::with_balls(tuning, cue_spot(&tuning), layout)
}

/// One ball per grid cell (never touching), ball 0 is the cue
fn grid_layout(cells: &[(usize, usize)]) -> Vec<(u8, BallClass, Vec2)> {
    cells
        .iter()
        .enumerate()
        .map(|(i, &(cx, cy))| {
            let pos = Vec2::new(60.0 + cx as f32 * 40.0, 60.0 + cy as f32 * 40.0);
            let class = if i == 0 { BallClass::Cue } else { BallClass::Solid };
            (i as u8, class, pos)
        })
        .collect()
}

/// Closest non-potted pair: (id, id, center distance)
fn worst_overlap(session: &Session) -> Option<(usize, usize, f32)> {
    let live: Vec<_> = session.balls.iter().filter(|b| !b.potted).collect();
    let mut worst: Option<(usize, usize, f32)> = None;
    for (i, a) in live.iter().enumerate() {
        for b in &live[i + 1..] {
            let dist = a.pos.distance(b.pos);
            if worst.is_none_or(|(_, _, d)| dist < d) {
                worst = Some((a.id, b.id, dist));
            }
        }
    }
    worst
}

/// How far a ball center sits past the playable bounds (0 when inside or
/// when the ball is at a pocket mouth, where the rails don't apply)
fn off_felt(session: &Session, pos: Vec2) -> f32 {
    let tuning = session.tuning;
    if session.table.pocket_within(pos, tuning.pocket_influence_radius).is_some() {
        return 0.0;
    }
    let bounds = session.table.playable_bounds(tuning.ball_radius);
    (bounds.min - pos).max(pos - bounds.max).max_element().max(0.0)
}

fn velocity() -> impl Strategy<Value = Vec2> {
    (0.0f32..18.0, -PI..PI).prop_map(|(speed, angle)| Vec2::new(angle.cos(), angle.sin()) * speed)
}

fn layout_with_velocities() -> impl Strategy<Value = (Vec<(usize, usize)>, Vec<Vec2>)> {
    // 8 x 17 grid inside the playable area
    proptest::collection::hash_set((0usize..8, 0usize..17), 2..8).prop_flat_map(|cells| {
        let cells: Vec<_> = cells.into_iter().collect();
        let n = cells.len();
        (Just(cells), proptest::collection::vec(velocity(), n))
    })
}

proptest! {
    #[test]
    fn prop_table_always_comes_to_rest((cells, vels) in layout_with_velocities()) {
        let mut session = staged(grid_layout(&cells));
        for (ball, vel) in session.balls.iter_mut().zip(vels) {
            ball.vel = vel;
        }

        let mut frames = 0;
        while step(&mut session) {
            frames += 1;
            prop_assert!(frames < 5_000, "table still moving after {} frames", frames);
        }
        prop_assert!(session.balls.iter().all(|b| b.vel == Vec2::ZERO));
    }

    #[test]
    fn prop_pair_never_left_overlapping(
        a in (40.0f32..360.0, 40.0f32..760.0),
        b in (40.0f32..360.0, 40.0f32..760.0),
        va in velocity(),
        vb in velocity(),
    ) {
        let (a, b) = (Vec2::from(a), Vec2::from(b));
        prop_assume!(a.distance(b) > 1e-2);

        let mut session = staged(vec![
            (0, BallClass::Cue, a),
            (1, BallClass::Solid, b),
        ]);
        session.balls[0].vel = va;
        session.balls[1].vel = vb;

        for _ in 0..200 {
            step(&mut session);
            let (x, y) = (&session.balls[0], &session.balls[1]);
            if x.potted || y.potted {
                break;
            }
            prop_assert!(x.pos.distance(y.pos) >= x.radius + y.radius - 1e-2);
        }
    }

    #[test]
    fn prop_table_never_left_overlapping((cells, vels) in layout_with_velocities()) {
        let mut session = staged(grid_layout(&cells));
        for (ball, vel) in session.balls.iter_mut().zip(vels) {
            ball.vel = vel;
        }

        for _ in 0..2_000 {
            let moving = step(&mut session);
            if let Some((a, b, dist)) = worst_overlap(&session) {
                prop_assert!(dist >= 2.0 * session.tuning.ball_radius - 1e-2, "balls {} and {} at {}", a, b, dist);
            }
            if !moving {
                break;
            }
        }
    }

    #[test]
    fn prop_balls_stay_on_the_felt((cells, vels) in layout_with_velocities()) {
        let mut session = staged(grid_layout(&cells));
        for (ball, vel) in session.balls.iter_mut().zip(vels) {
            ball.vel = vel;
        }

        for _ in 0..2_000 {
            let moving = step(&mut session);
            for ball in session.balls.iter().filter(|b| !b.potted) {
                prop_assert!(off_felt(&session, ball.pos) <= 1e-2, "ball {} at {:?}", ball.id, ball.pos);
            }
            if !moving {
                break;
            }
        }
    }

    #[test]
    fn prop_pots_are_permanent_and_counted((cells, vels) in layout_with_velocities()) {
        let mut session = staged(grid_layout(&cells));
        for (ball, vel) in session.balls.iter_mut().zip(vels) {
            ball.vel = vel;
        }

        let mut last_score = 0;
        let mut potted = vec![false; session.balls.len()];
        for _ in 0..2_000 {
            let moving = step(&mut session);
            prop_assert!(session.score >= last_score);
            last_score = session.score;

            for (was, ball) in potted.iter_mut().zip(&session.balls) {
                // Only the cue ball ever comes back, and only via its timer
                if !ball.is_cue() {
                    prop_assert!(!*was || ball.potted);
                }
                *was = ball.potted;
            }

            let object_pots = session
                .balls
                .iter()
                .filter(|b| b.potted && !b.is_cue())
                .count() as u32;
            prop_assert_eq!(session.score, object_pots);

            if !moving {
                break;
            }
        }
    }
}

#[test]
fn test_breaks_never_leave_overlaps() {
    let tuning = Tuning::default();
    for power in [1.0, 0.6, 0.3] {
        for k in -20..=20 {
            let angle = -FRAC_PI_2 + k as f32 * 0.01;
            let mut session = Session::racked(tuning);
            assert!(session.shoot(power, angle));

            for frame in 0..2_000 {
                let moving = step(&mut session);
                if let Some((a, b, dist)) = worst_overlap(&session) {
                    assert!(
                        dist >= 2.0 * tuning.ball_radius - 1e-2,
                        "power {power} angle {angle}: balls {a} and {b} at {dist} on frame {frame}"
                    );
                }
                for ball in session.balls.iter().filter(|b| !b.potted) {
                    assert!(off_felt(&session, ball.pos) <= 1e-2);
                }
                if !moving {
                    break;
                }
            }
        }
    }
}

#[test]
fn test_head_on_hit_stops_cue_ball() {
    let mut session = staged(vec![
        (0, BallClass::Cue, Vec2::new(200.0, 600.0)),
        (1, BallClass::Solid, Vec2::new(200.0, 300.0)),
    ]);
    assert!(session.shoot(0.5, -FRAC_PI_2));

    let mut hit = false;
    for _ in 0..100 {
        step(&mut session);
        if session.balls[1].vel != Vec2::ZERO {
            hit = true;
            break;
        }
    }

    assert!(hit, "object ball never hit");
    assert!(session.balls[0].vel.length() < 1e-3);
    assert!(session.balls[1].vel.y < 0.0);
    assert!(session.balls[1].vel.x.abs() < 1e-3);
}

#[test]
fn test_corner_scratch_respawns_at_cue_spot() {
    let tuning = Tuning::default();
    let mut sim = SimLoop::new(tuning);
    *sim.session_mut() = staged(vec![
        (0, BallClass::Cue, Vec2::new(80.0, 80.0)),
        (1, BallClass::Solid, Vec2::new(200.0, 500.0)),
    ]);

    // Straight at the top-left pocket
    assert!(sim.shoot(1.0, -3.0 * PI / 4.0));

    let mut now = 0.0;
    let mut scratched_at = None;
    for _ in 0..600 {
        let control = sim.frame(now);
        if scratched_at.is_none() && sim.session().balls[0].potted {
            scratched_at = Some(now);
        }
        if control == LoopControl::Stop {
            break;
        }
        now += FRAME_MS;
    }

    let scratched_at = scratched_at.expect("cue ball never dropped");
    assert!(now - scratched_at >= tuning.respawn_delay_ms - 1e-6);
    assert!(!sim.is_running());

    let cue = &sim.session().balls[0];
    assert!(!cue.potted);
    assert_eq!(cue.pos, cue_spot(&tuning));
    assert_eq!(cue.vel, Vec2::ZERO);
    assert_eq!(sim.session().score, 0);
}

#[test]
fn test_rail_bounce_loses_energy() {
    let tuning = Tuning::default();
    let mut session = staged(vec![(0, BallClass::Cue, Vec2::new(200.0, 250.0))]);
    session.balls[0].vel = Vec2::new(8.0, 0.0);
    let max_x = session.table.playable_bounds(tuning.ball_radius).max.x;

    let mut incoming = 0.0;
    for _ in 0..60 {
        incoming = session.balls[0].vel.x * tuning.friction;
        step(&mut session);
        if session.balls[0].vel.x < 0.0 {
            break;
        }
    }

    let ball = &session.balls[0];
    assert!(ball.vel.x < 0.0, "ball never reached the rail");
    assert!(ball.pos.x <= max_x);
    assert!((ball.vel.x + incoming * tuning.wall_elasticity).abs() < 1e-4);
}

#[test]
fn test_rack_is_reproducible() {
    let tuning = Tuning::default();
    let bits = |layout: Vec<(u8, BallClass, Vec2)>| -> Vec<(u8, BallClass, u32, u32)> {
        layout
            .into_iter()
            .map(|(n, c, p)| (n, c, p.x.to_bits(), p.y.to_bits()))
            .collect()
    };
    assert_eq!(bits(break_layout(&tuning)), bits(break_layout(&tuning)));
    assert_eq!(Session::racked(tuning).snapshot(), Session::racked(tuning).snapshot());

    // A fresh rack is at rest: the first frame stops the loop
    let mut sim = SimLoop::new(tuning);
    assert_eq!(sim.frame(0.0), LoopControl::Stop);
    assert_eq!(sim.snapshot().remaining(), 7);
}
