//! Fixed-step physics
//!
//! One call advances the table by one animation frame. Velocities are in
//! units per frame and there is no delta-time scaling: shot power was tuned
//! against ~60 Hz, so a slower display plays slower.

use super::collision::{approaching, ball_ball_contact, cushion_bounce, exchange_normal_velocity, separate};
use super::state::Session;
use crate::consts::{CONTACT_SLOP, RELAX_PASSES};

/// Advance the session by one frame. Returns whether anything is still moving.
///
/// Phase order matters: pockets are checked before cushions, otherwise a
/// ball dropping into a pocket would be bounced back off the rail.
pub fn step(session: &mut Session) -> bool {
    session.moving = false;

    integrate(session);
    capture_pockets(session);
    bounce_cushions(session);
    resolve_ball_collisions(session);

    session.moving
}

/// Move every ball and apply felt friction
fn integrate(session: &mut Session) {
    let friction = session.tuning.friction;
    let min_speed = session.tuning.min_speed;

    for ball in session.balls.iter_mut().filter(|b| !b.potted) {
        ball.pos += ball.vel;
        ball.vel *= friction;

        if ball.vel.x.abs() < min_speed && ball.vel.y.abs() < min_speed {
            ball.vel = glam::Vec2::ZERO;
        } else {
            session.moving = true;
        }
    }
}

/// Drop balls that reached a pocket; score object balls, schedule cue respawns
fn capture_pockets(session: &mut Session) {
    let capture = session.tuning.pocket_capture_radius;
    let table = session.table;
    let mut pots = 0u32;
    let mut scratches = Vec::new();

    for ball in session.balls.iter_mut().filter(|b| !b.potted) {
        let Some(pocket) = table.pocket_within(ball.pos, capture) else {
            continue;
        };

        ball.potted = true;
        ball.vel = glam::Vec2::ZERO;
        session.moving = true;

        if ball.class().scores() {
            pots += 1;
            log::debug!("Ball {} potted in pocket {}", ball.number, pocket);
        } else {
            scratches.push(ball.id);
            log::debug!("Scratch in pocket {}", pocket);
        }
    }

    session.score += pots;
    for id in scratches {
        session.schedule_respawn(id);
    }
}

/// Keep balls on the felt, except near a pocket mouth
fn bounce_cushions(session: &mut Session) {
    let Some(radius) = session.balls.first().map(|b| b.radius) else {
        return;
    };
    let bounds = session.table.playable_bounds(radius);
    let influence = session.tuning.pocket_influence_radius;
    let elasticity = session.tuning.wall_elasticity;
    let table = session.table;

    for ball in session.balls.iter_mut().filter(|b| !b.potted) {
        if table.pocket_within(ball.pos, influence).is_some() {
            continue;
        }
        if let Some(hit) = cushion_bounce(ball.pos, ball.vel, &bounds, elasticity) {
            ball.pos = hit.pos;
            ball.vel = hit.vel;
        }
    }
}

/// Push balls that relaxation moved past a rail back onto the felt.
/// Positions only: the rail bounce already happened this frame.
fn clamp_to_felt(session: &mut Session) {
    let Some(radius) = session.balls.first().map(|b| b.radius) else {
        return;
    };
    let bounds = session.table.playable_bounds(radius);
    let influence = session.tuning.pocket_influence_radius;
    let table = session.table;

    for ball in session.balls.iter_mut().filter(|b| !b.potted) {
        if table.pocket_within(ball.pos, influence).is_none() {
            ball.pos = ball.pos.clamp(bounds.min, bounds.max);
        }
    }
}

/// Separate every overlapping pair.
///
/// One sweep can push a ball into a third one (a rack hit by the cue ball),
/// so sweeps repeat until none finds an overlap, up to [`RELAX_PASSES`].
fn resolve_ball_collisions(session: &mut Session) {
    for pass in 0..RELAX_PASSES {
        if pass > 0 {
            clamp_to_felt(session);
        }
        if !relax_pairs(session) {
            break;
        }
    }
}

/// One sweep over all pairs in arena order. Returns whether any pair overlapped.
fn relax_pairs(session: &mut Session) -> bool {
    let count = session.balls.len();
    let mut corrected = false;

    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = session.balls.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            if a.potted || b.potted {
                continue;
            }

            let Some(contact) = ball_ball_contact(a.pos, a.radius, b.pos, b.radius, CONTACT_SLOP)
            else {
                continue;
            };

            (a.pos, b.pos) = separate(a.pos, b.pos, &contact);
            // Only closing pairs exchange momentum, so repeat sweeps add no energy
            if approaching(a.vel, b.vel, contact.normal) {
                (a.vel, b.vel) = exchange_normal_velocity(a.vel, b.vel, contact.normal);
            }
            corrected = true;
        }
    }

    if corrected {
        session.moving = true;
    }
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallClass;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn session(layout: Vec<(u8, BallClass, Vec2)>) -> Session {
        let tuning = Tuning::default();
        let spot = Vec2::new(tuning.table_width / 2.0, tuning.table_height * 0.75);
        Session::with_balls(tuning, spot, layout)
    }

    #[test]
    fn test_idle_table_reports_not_moving() {
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(200.0, 600.0)),
            (1, BallClass::Solid, Vec2::new(200.0, 300.0)),
        ]);
        assert!(!step(&mut s));
        assert_eq!(s.balls[0].pos, Vec2::new(200.0, 600.0));
    }

    #[test]
    fn test_integration_applies_friction() {
        let mut s = session(vec![(0, BallClass::Cue, Vec2::new(200.0, 400.0))]);
        s.balls[0].vel = Vec2::new(10.0, 0.0);
        assert!(step(&mut s));
        assert_eq!(s.balls[0].pos, Vec2::new(210.0, 400.0));
        assert!((s.balls[0].vel.x - 9.9).abs() < 1e-5);
    }

    #[test]
    fn test_slow_ball_snaps_to_rest() {
        let mut s = session(vec![(0, BallClass::Cue, Vec2::new(200.0, 400.0))]);
        s.balls[0].vel = Vec2::new(0.05, -0.04);
        assert!(!step(&mut s));
        assert_eq!(s.balls[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_head_on_collision_transfers_velocity() {
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(200.0, 421.0)),
            (1, BallClass::Solid, Vec2::new(200.0, 400.0)),
        ]);
        s.balls[0].vel = Vec2::new(0.0, -5.0);
        assert!(step(&mut s));

        let incoming = 5.0 * s.tuning.friction;
        let cue = &s.balls[0];
        let object = &s.balls[1];
        assert!(cue.vel.length() < 1e-4, "cue kept {:?}", cue.vel);
        assert!((object.vel - Vec2::new(0.0, -incoming)).length() < 1e-4);
        assert!(cue.pos.distance(object.pos) >= 20.0 - 1e-3);
    }

    fn assert_no_overlaps(s: &Session) {
        for (i, a) in s.balls.iter().enumerate().filter(|(_, b)| !b.potted) {
            for b in s.balls[i + 1..].iter().filter(|b| !b.potted) {
                let dist = a.pos.distance(b.pos);
                assert!(dist >= a.radius + b.radius - 1e-2, "balls {} and {} at {}", a.id, b.id, dist);
            }
        }
    }

    #[test]
    fn test_chain_of_overlaps_fully_separated() {
        // Separating the first pair pushes the middle ball into the third
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(200.0, 400.0)),
            (1, BallClass::Solid, Vec2::new(200.0, 415.0)),
            (2, BallClass::Solid, Vec2::new(200.0, 430.0)),
        ]);
        assert!(step(&mut s));
        assert_no_overlaps(&s);
        // Nobody was closing, so no momentum was exchanged
        assert!(s.balls.iter().all(|b| b.vel == Vec2::ZERO));
    }

    #[test]
    fn test_separating_pair_keeps_its_velocities() {
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(200.0, 400.0)),
            (1, BallClass::Solid, Vec2::new(212.0, 400.0)),
        ]);
        s.balls[0].vel = Vec2::new(-2.0, 0.0);
        s.balls[1].vel = Vec2::new(2.0, 0.0);
        step(&mut s);
        let friction = s.tuning.friction;
        assert!((s.balls[0].vel.x + 2.0 * friction).abs() < 1e-5);
        assert!((s.balls[1].vel.x - 2.0 * friction).abs() < 1e-5);
        assert_no_overlaps(&s);
    }

    #[test]
    fn test_separation_never_pushes_through_rail() {
        // Ball 0 rests on the right rail, ball 1 overlaps it from inside
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(370.0, 200.0)),
            (1, BallClass::Solid, Vec2::new(355.0, 200.0)),
        ]);
        step(&mut s);
        assert!(s.balls[0].pos.x <= 370.0);
        assert_no_overlaps(&s);
    }

    #[test]
    fn test_break_leaves_no_overlaps() {
        let tuning = Tuning::default();
        let mut s = Session::racked(tuning);
        s.shoot(1.0, -std::f32::consts::FRAC_PI_2);
        for _ in 0..2_000 {
            let moving = step(&mut s);
            assert_no_overlaps(&s);
            if !moving {
                break;
            }
        }
    }

    #[test]
    fn test_nine_ball_scores_like_any_object_ball() {
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(200.0, 600.0)),
            (9, BallClass::Nine, Vec2::new(60.0, 60.0)),
        ]);
        // Roll it into the top-left pocket
        s.balls[1].vel = Vec2::new(-8.0, -8.0);
        for _ in 0..20 {
            step(&mut s);
        }
        assert!(s.balls[1].potted);
        assert_eq!(s.score, 1);
        assert!(s.respawns.is_empty());
    }

    #[test]
    fn test_two_pots_in_one_frame_score_two() {
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(200.0, 600.0)),
            (1, BallClass::Solid, Vec2::new(25.0, 25.0)),
            (2, BallClass::Solid, Vec2::new(375.0, 775.0)),
        ]);
        assert!(step(&mut s));
        assert_eq!(s.score, 2);
        assert!(s.balls[1].potted && s.balls[2].potted);

        // Potted balls are never counted again
        step(&mut s);
        assert_eq!(s.score, 2);
    }

    #[test]
    fn test_cue_pot_does_not_score_and_schedules_respawn() {
        let mut s = session(vec![
            (0, BallClass::Cue, Vec2::new(22.0, 22.0)),
            (1, BallClass::Solid, Vec2::new(200.0, 300.0)),
        ]);
        s.clock_ms = 500.0;
        step(&mut s);
        assert!(s.balls[0].potted);
        assert_eq!(s.score, 0);
        assert_eq!(s.respawns.len(), 1);
        assert_eq!(s.respawns[0].due_ms, 500.0 + s.tuning.respawn_delay_ms);
    }

    #[test]
    fn test_near_pocket_is_not_bounced() {
        // Inside the influence radius of the corner but outside bounds: left alone
        let mut s = session(vec![(0, BallClass::Cue, Vec2::new(27.0, 45.0))]);
        s.balls[0].vel = Vec2::new(-0.5, 0.0);
        step(&mut s);
        assert!(s.balls[0].pos.x < 30.0);
        assert!(s.balls[0].vel.x < 0.0);
    }

    #[test]
    fn test_flat_rail_bounce() {
        let mut s = session(vec![(0, BallClass::Cue, Vec2::new(365.0, 200.0))]);
        s.balls[0].vel = Vec2::new(8.0, 0.0);
        step(&mut s);
        let cue = &s.balls[0];
        assert_eq!(cue.pos.x, 370.0);
        let expected = 8.0 * s.tuning.friction * s.tuning.wall_elasticity;
        assert!((cue.vel.x + expected).abs() < 1e-4);
    }

    #[test]
    fn test_coincident_balls_do_not_produce_nan() {
        let p = Vec2::new(200.0, 400.0);
        let mut s = session(vec![(0, BallClass::Cue, p), (1, BallClass::Solid, p)]);
        step(&mut s);
        for ball in &s.balls {
            assert!(ball.pos.is_finite());
            assert!(ball.vel.is_finite());
        }
    }
}
