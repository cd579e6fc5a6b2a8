//! Break layout: cue ball at one end, triangle rack at the other.
//!
//! The table is portrait: the cue ball sits in the lower quarter and the
//! rack apex points down at it, rows growing toward the top rail.
//!
//! ```text
//!      8        <- tail, touching distance behind ball 5
//!    4  5  6    <- row 2
//!     2   3     <- row 1
//!       1       <- apex
//!
//!
//!       0       <- cue ball
//! ```

use glam::Vec2;

use super::state::{BallClass, Session};
use crate::tuning::Tuning;

/// Cue ball start, as a fraction of table height
pub const CUE_START_FRACTION: f32 = 0.75;
/// Rack apex, as a fraction of table height
pub const RACK_APEX_FRACTION: f32 = 0.3;

/// Balls in the rack (six object balls plus the eight-ball)
pub const RACK_SIZE: usize = 7;

/// Rack layout: (number, class, triangle row, offset across in ball diameters).
/// The eight-ball is not part of the triangle: it tails straight behind
/// the middle of the back row.
const RACK: [(u8, BallClass, usize, f32); RACK_SIZE] = [
    (1, BallClass::Solid, 0, 0.0),
    (2, BallClass::Solid, 1, -0.5),
    (3, BallClass::Solid, 1, 0.5),
    (4, BallClass::Stripe, 2, -1.0),
    (5, BallClass::Stripe, 2, 0.0),
    (6, BallClass::Stripe, 2, 1.0),
    (8, BallClass::Eight, TAIL_ROW, 0.0),
];

/// Marker row for the ball tailing the triangle
const TAIL_ROW: usize = usize::MAX;

/// Where the cue ball starts (and comes back after a scratch)
pub fn cue_spot(tuning: &Tuning) -> Vec2 {
    Vec2::new(
        tuning.table_width / 2.0,
        tuning.table_height * CUE_START_FRACTION,
    )
}

/// Object ball positions, in [`RACK`] order
pub fn rack_positions(apex: Vec2, ball_radius: f32, gap: f32) -> [Vec2; RACK_SIZE] {
    // Tight equilateral packing, opened up by `gap` between neighbours
    let spacing = ball_radius + gap / 2.0;
    let row_step = spacing * 3f32.sqrt();
    let col_step = spacing * 2.0;
    let back_row = 2.0 * row_step;

    RACK.map(|(_, _, row, offset)| {
        // Rows move away from the cue ball (up the table)
        let along = if row == TAIL_ROW {
            back_row + col_step
        } else {
            row as f32 * row_step
        };
        Vec2::new(apex.x + offset * col_step, apex.y - along)
    })
}

/// Full break layout: cue ball first, then the rack
pub fn break_layout(tuning: &Tuning) -> Vec<(u8, BallClass, Vec2)> {
    let apex = Vec2::new(
        tuning.table_width / 2.0,
        tuning.table_height * RACK_APEX_FRACTION,
    );
    let positions = rack_positions(apex, tuning.ball_radius, tuning.rack_gap);

    std::iter::once((0, BallClass::Cue, cue_spot(tuning)))
        .chain(
            RACK.iter()
                .zip(positions)
                .map(|(&(number, class, _, _), pos)| (number, class, pos)),
        )
        .collect()
}

impl Session {
    /// New session with the standard break layout
    pub fn racked(tuning: Tuning) -> Self {
        let session = Session::with_balls(tuning, cue_spot(&tuning), break_layout(&tuning));
        log::info!(
            "Racked {} balls on a {}x{} table",
            session.balls.len(),
            tuning.table_width,
            tuning.table_height
        );
        session
    }
}
