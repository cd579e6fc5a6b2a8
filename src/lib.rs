//! Pet Pool - billiards mini-game for the crypto pet
//!
//! Core modules:
//! - `sim`: Deterministic pool simulation (table, balls, physics step, frame loop)
//! - `input`: Drag-to-shoot gesture mapping
//! - `renderer`: WebGPU rendering of the published ball snapshot
//! - `tuning`: Data-driven physics constants

pub mod error;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame time the physics was tuned against (60 Hz, one step per frame)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Table dimensions (portrait, cue ball breaks "up" the table)
    pub const TABLE_WIDTH: f32 = 400.0;
    pub const TABLE_HEIGHT: f32 = 800.0;
    pub const CUSHION: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Extra space between racked balls so the rack doesn't start in contact
    pub const RACK_GAP: f32 = 0.5;

    /// Velocity retention per frame (felt friction)
    pub const FRICTION: f32 = 0.99;
    /// Per-axis speed below which a ball is snapped to rest (units/frame)
    pub const MIN_SPEED: f32 = 0.05;
    /// Speed retained after bouncing off a cushion
    pub const WALL_ELASTICITY: f32 = 0.85;

    /// Ball center within this distance of a pocket center falls in
    pub const POCKET_CAPTURE_RADIUS: f32 = 18.0;
    /// Near a pocket the cushions stop bouncing so balls can drop in
    pub const POCKET_INFLUENCE_RADIUS: f32 = 30.0;

    /// Cue speed at full power (units/frame). Kept below one ball diameter
    /// so a shot can't step through another ball in a single frame.
    pub const MAX_SPEED: f32 = 18.0;
    /// Drag distance (table units) that maps to full power
    pub const MAX_PULL: f32 = 150.0;
    /// Releases at or below this power are treated as taps
    pub const MIN_SHOT_POWER: f32 = 0.05;

    /// Scratch recovery delay before the cue ball comes back
    pub const RESPAWN_DELAY_MS: f64 = 1000.0;

    /// Overlap below this is resting contact, not a collision
    pub const CONTACT_SLOP: f32 = 1e-3;
    /// Most overlap-resolution sweeps per frame (a rack needs several)
    pub const RELAX_PASSES: usize = 16;
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of a vector, in [-π, π]
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
