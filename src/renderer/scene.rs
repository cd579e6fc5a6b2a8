//! Frame building: table + published snapshot + aim → vertex list
//!
//! Pure and platform independent, so what gets drawn can be tested without
//! a GPU. Draw order is back to front.

use glam::Vec2;

use super::shapes::{circle, circle_band, line, rect, ring};
use super::vertex::{Vertex, colors};
use crate::direction;
use crate::input::AimGesture;
use crate::sim::{BallClass, BallView, Snapshot, Table};
use crate::tuning::Tuning;

const BALL_SEGMENTS: u32 = 24;
const POCKET_SEGMENTS: u32 = 24;

/// Pocket holes are drawn a little wider than the capture radius
const POCKET_VISUAL_SCALE: f32 = 1.15;
/// Cue stick dimensions (table units)
const CUE_LENGTH: f32 = 180.0;
const CUE_WIDTH: f32 = 5.0;
/// Longest aim guide at full power
const GUIDE_LENGTH: f32 = 240.0;

/// Build every vertex for one frame
pub fn build_frame(table: &Table, snapshot: &Snapshot, aim: &AimGesture, tuning: &Tuning) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);

    table_vertices(table, tuning, &mut vertices);

    for ball in snapshot.balls.iter().filter(|b| !b.potted) {
        ball_vertices(ball, &mut vertices);
    }

    // No aiming while balls are rolling
    if !snapshot.moving {
        if let Some(cue) = snapshot.cue() {
            aim_vertices(cue, aim, tuning, &mut vertices);
        }
    }

    vertices
}

/// Rails, felt and pocket holes
fn table_vertices(table: &Table, tuning: &Tuning, out: &mut Vec<Vertex>) {
    out.extend(rect(Vec2::ZERO, Vec2::new(table.width, table.height), colors::RAIL));

    let felt = table.felt();
    let edge = (table.cushion * 0.25).min(4.0);
    out.extend(rect(felt.min, felt.max, colors::CUSHION_EDGE));
    out.extend(rect(
        felt.min + Vec2::splat(edge),
        felt.max - Vec2::splat(edge),
        colors::FELT,
    ));

    let pocket_radius = tuning.pocket_capture_radius * POCKET_VISUAL_SCALE;
    for pocket in table.pockets() {
        out.extend(circle(pocket, pocket_radius, colors::POCKET, POCKET_SEGMENTS));
    }
}

/// One ball: body, stripe band, number spot, outline
fn ball_vertices(ball: &BallView, out: &mut Vec<Vertex>) {
    match ball.class {
        BallClass::Stripe => {
            out.extend(circle(ball.pos, ball.radius, colors::STRIPE_BASE, BALL_SEGMENTS));
            out.extend(circle_band(
                ball.pos,
                ball.radius,
                ball.radius * 0.55,
                ball.color,
                BALL_SEGMENTS,
            ));
        }
        _ => out.extend(circle(ball.pos, ball.radius, ball.color, BALL_SEGMENTS)),
    }

    if ball.class != BallClass::Cue {
        out.extend(circle(
            ball.pos,
            ball.radius * 0.4,
            colors::NUMBER_SPOT,
            BALL_SEGMENTS / 2,
        ));
    }

    out.extend(ring(
        ball.pos,
        ball.radius - 0.75,
        ball.radius,
        colors::BALL_OUTLINE,
        BALL_SEGMENTS,
    ));
}

/// Cue stick behind the cue ball and a guide line in the shot direction
fn aim_vertices(cue: &BallView, aim: &AimGesture, tuning: &Tuning, out: &mut Vec<Vertex>) {
    let Some(shot) = aim.preview(tuning) else {
        return;
    };

    let shot_dir = direction(shot.angle);
    // The stick sits opposite the shot, pulled back with the drag
    let back = -shot_dir;
    let retract = shot.power * tuning.max_pull * 0.3;
    let tip = cue.pos + back * (cue.radius + 3.0 + retract);
    let butt = tip + back * CUE_LENGTH;
    let ferrule = tip + back * 8.0;

    out.extend(line(ferrule, butt, CUE_WIDTH, colors::CUE_STICK));
    out.extend(line(tip, ferrule, CUE_WIDTH * 0.8, colors::CUE_TIP));

    let guide_start = cue.pos + shot_dir * (cue.radius + 3.0);
    let guide_end = cue.pos + shot_dir * (cue.radius + GUIDE_LENGTH * shot.power);
    out.extend(line(guide_start, guide_end, 1.5, colors::AIM_GUIDE));
}
