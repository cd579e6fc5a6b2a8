//! Session state and core simulation types
//!
//! The session owns every ball. Renderers only ever see [`Snapshot`] copies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::table::Table;
use crate::direction;
use crate::tuning::Tuning;

/// Index of a ball in its session's arena
pub type BallId = usize;

/// Ball classification, fixed when the ball is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallClass {
    Cue,
    Solid,
    Stripe,
    Eight,
    Nine,
}

impl BallClass {
    /// Whether potting this ball scores
    #[inline]
    pub fn scores(&self) -> bool {
        *self != BallClass::Cue
    }
}

/// Render color for a numbered ball (stripes share their solid's color)
pub fn ball_color(number: u8) -> [f32; 4] {
    match number {
        0 => [1.0, 1.0, 1.0, 1.0],                    // White
        1 | 9 => [1.0, 0.84, 0.0, 1.0],               // Yellow
        2 | 10 => [0.0, 0.0, 0.7, 1.0],               // Blue
        3 | 11 => [0.86, 0.0, 0.0, 1.0],              // Red
        4 | 12 => [0.39, 0.0, 0.55, 1.0],             // Purple
        5 | 13 => [1.0, 0.39, 0.0, 1.0],              // Orange
        6 | 14 => [0.0, 0.47, 0.0, 1.0],              // Green
        7 | 15 => [0.51, 0.12, 0.12, 1.0],            // Maroon
        _ => [0.04, 0.04, 0.04, 1.0],                 // 8: black
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    /// Printed number (0 for the cue ball)
    pub number: u8,
    class: BallClass,
    pub pos: Vec2,
    /// Velocity in units per frame
    pub vel: Vec2,
    pub radius: f32,
    pub potted: bool,
    pub color: [f32; 4],
}

impl Ball {
    pub fn new(id: BallId, number: u8, class: BallClass, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            number,
            class,
            pos,
            vel: Vec2::ZERO,
            radius,
            potted: false,
            color: ball_color(number),
        }
    }

    #[inline]
    pub fn class(&self) -> BallClass {
        self.class
    }

    #[inline]
    pub fn is_cue(&self) -> bool {
        self.class == BallClass::Cue
    }

    /// Read-only copy for observers
    pub fn view(&self) -> BallView {
        BallView {
            id: self.id,
            number: self.number,
            class: self.class,
            pos: self.pos,
            radius: self.radius,
            color: self.color,
            potted: self.potted,
        }
    }
}

/// Published, read-only view of a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: BallId,
    pub number: u8,
    pub class: BallClass,
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    pub potted: bool,
}

/// Immutable frame snapshot handed to renderers/observers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub balls: Vec<BallView>,
    pub score: u32,
    pub moving: bool,
}

impl Snapshot {
    /// The cue ball, if it is on the table
    pub fn cue(&self) -> Option<&BallView> {
        self.balls
            .iter()
            .find(|b| b.class == BallClass::Cue && !b.potted)
    }

    /// Object balls still on the table
    pub fn remaining(&self) -> usize {
        self.balls
            .iter()
            .filter(|b| b.class.scores() && !b.potted)
            .count()
    }
}

/// Pending scratch recovery for a potted cue ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnTimer {
    pub ball: BallId,
    /// Session clock time (ms) at which the ball comes back
    pub due_ms: f64,
}

/// One game session: table, balls, score and pending timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub table: Table,
    pub tuning: Tuning,
    /// Ball arena, indexed by [`BallId`]; order is stable
    pub balls: Vec<Ball>,
    /// Whether anything moved (or fell) during the last step
    pub moving: bool,
    /// Object balls potted over the whole session
    pub score: u32,
    /// Where a scratched cue ball is put back
    pub respawn_spot: Vec2,
    /// Session clock (ms), advanced by the frame driver
    pub clock_ms: f64,
    /// Scheduled cue ball respawns
    pub respawns: Vec<RespawnTimer>,
}

impl Session {
    /// Create a session from an explicit ball layout: `(number, class, pos)`.
    ///
    /// Ids follow the order given. Layouts must contain exactly one cue ball.
    pub fn with_balls(
        tuning: Tuning,
        respawn_spot: Vec2,
        layout: impl IntoIterator<Item = (u8, BallClass, Vec2)>,
    ) -> Self {
        let balls: Vec<Ball> = layout
            .into_iter()
            .enumerate()
            .map(|(id, (number, class, pos))| Ball::new(id, number, class, pos, tuning.ball_radius))
            .collect();
        debug_assert_eq!(
            balls.iter().filter(|b| b.is_cue()).count(),
            1,
            "a session needs exactly one cue ball"
        );

        Self {
            table: tuning.table(),
            tuning,
            balls,
            moving: false,
            score: 0,
            respawn_spot,
            clock_ms: 0.0,
            respawns: Vec::new(),
        }
    }

    /// The cue ball, whether potted or not
    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_cue())
    }

    /// Give the cue ball its launch velocity.
    ///
    /// Returns false (and does nothing) while the cue ball is potted.
    pub fn shoot(&mut self, power: f32, angle: f32) -> bool {
        let max_speed = self.tuning.max_speed;
        let Some(cue) = self.balls.iter_mut().find(|b| b.is_cue() && !b.potted) else {
            return false;
        };
        let power = if power.is_finite() { power.clamp(0.0, 1.0) } else { 0.0 };
        cue.vel = direction(angle) * power * max_speed;
        self.moving = true;
        log::debug!(
            "Shot: power {:.2}, angle {:.2} rad, velocity {:?}",
            power,
            angle,
            cue.vel
        );
        true
    }

    /// Queue a scratch recovery for a freshly potted ball
    pub fn schedule_respawn(&mut self, ball: BallId) {
        let due_ms = self.clock_ms + self.tuning.respawn_delay_ms;
        self.respawns.push(RespawnTimer { ball, due_ms });
        log::debug!("Scratch: ball {} back at {:.0} ms", ball, due_ms);
    }

    /// Put back every ball whose respawn timer has elapsed
    pub fn fire_due_respawns(&mut self) -> usize {
        let now = self.clock_ms;
        let mut fired = 0;
        let balls = &mut self.balls;
        let spot = self.respawn_spot;
        self.respawns.retain(|timer| {
            if timer.due_ms > now {
                return true;
            }
            if let Some(ball) = balls.get_mut(timer.ball) {
                ball.potted = false;
                ball.pos = spot;
                ball.vel = Vec2::ZERO;
                log::debug!("Respawned ball {} at {:?}", ball.id, spot);
            }
            fired += 1;
            false
        });
        if fired > 0 {
            self.moving = true;
        }
        fired
    }

    /// Drop every pending respawn (session reset/teardown)
    pub fn cancel_respawns(&mut self) {
        if !self.respawns.is_empty() {
            log::debug!("Cancelled {} pending respawn(s)", self.respawns.len());
        }
        self.respawns.clear();
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balls: self.balls.iter().map(Ball::view).collect(),
            score: self.score,
            moving: self.moving,
        }
    }
}
