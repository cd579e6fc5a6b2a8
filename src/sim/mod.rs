//! Deterministic pool simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one step per animation frame)
//! - Stable iteration order (by ball id)
//! - Time only enters through the session clock set by the frame driver
//! - No rendering or platform dependencies

pub mod collision;
pub mod driver;
pub mod rack;
pub mod state;
pub mod step;
pub mod table;

pub use collision::{Contact, CushionHit, approaching, ball_ball_contact, cushion_bounce, exchange_normal_velocity};
pub use driver::{LoopControl, SimLoop};
pub use rack::{break_layout, cue_spot, rack_positions};
pub use state::{Ball, BallClass, BallId, BallView, RespawnTimer, Session, Snapshot};
pub use step::step;
pub use table::{Bounds, POCKET_COUNT, Table};
