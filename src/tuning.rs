//! Data-driven physics tuning
//!
//! Every constant the physics step reads lives here so it can be overridden
//! without a rebuild. Overrides are persisted as JSON in LocalStorage; any
//! field left out of the JSON keeps its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::Table;

/// Physics and table tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Table ===
    pub table_width: f32,
    pub table_height: f32,
    pub cushion: f32,

    // === Balls ===
    pub ball_radius: f32,
    pub rack_gap: f32,

    // === Motion ===
    /// Velocity multiplier applied every frame (must be < 1)
    pub friction: f32,
    /// Per-axis rest threshold (units/frame)
    pub min_speed: f32,
    /// Cushion bounce speed retention (0-1)
    pub wall_elasticity: f32,

    // === Pockets ===
    pub pocket_capture_radius: f32,
    pub pocket_influence_radius: f32,

    // === Shooting ===
    /// Cue speed at power 1.0 (units/frame)
    pub max_speed: f32,
    /// Drag distance for full power
    pub max_pull: f32,
    /// Taps at or below this power are ignored
    pub min_shot_power: f32,

    // === Scratch ===
    pub respawn_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            table_width: TABLE_WIDTH,
            table_height: TABLE_HEIGHT,
            cushion: CUSHION,

            ball_radius: BALL_RADIUS,
            rack_gap: RACK_GAP,

            friction: FRICTION,
            min_speed: MIN_SPEED,
            wall_elasticity: WALL_ELASTICITY,

            pocket_capture_radius: POCKET_CAPTURE_RADIUS,
            pocket_influence_radius: POCKET_INFLUENCE_RADIUS,

            max_speed: MAX_SPEED,
            max_pull: MAX_PULL,
            min_shot_power: MIN_SHOT_POWER,

            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pet_pool_tuning";

    /// Table described by this tuning
    pub fn table(&self) -> Table {
        Table::new(self.table_width, self.table_height, self.cushion)
    }

    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the values keep the step stable
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::out_of_range(field, value))
            }
        }

        fn unit_open(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 && value < 1.0 {
                Ok(())
            } else {
                Err(TuningError::out_of_range(field, value))
            }
        }

        positive("table_width", self.table_width)?;
        positive("table_height", self.table_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("min_speed", self.min_speed)?;
        positive("pocket_capture_radius", self.pocket_capture_radius)?;
        positive("max_speed", self.max_speed)?;
        positive("max_pull", self.max_pull)?;
        unit_open("friction", self.friction)?;
        unit_open("min_shot_power", self.min_shot_power)?;

        if !(self.cushion.is_finite() && self.cushion >= 0.0) {
            return Err(TuningError::out_of_range("cushion", self.cushion));
        }
        if !(self.rack_gap.is_finite() && self.rack_gap >= 0.0) {
            return Err(TuningError::out_of_range("rack_gap", self.rack_gap));
        }
        if !(self.wall_elasticity.is_finite() && (0.0..=1.0).contains(&self.wall_elasticity)) {
            return Err(TuningError::out_of_range(
                "wall_elasticity",
                self.wall_elasticity,
            ));
        }
        if !(self.respawn_delay_ms.is_finite() && self.respawn_delay_ms >= 0.0) {
            return Err(TuningError::out_of_range(
                "respawn_delay_ms",
                self.respawn_delay_ms,
            ));
        }
        if self.pocket_influence_radius <= self.pocket_capture_radius {
            return Err(TuningError::InvalidPocketRadii {
                capture: self.pocket_capture_radius,
                influence: self.pocket_influence_radius,
            });
        }

        let min_side = 2.0 * (self.cushion + self.ball_radius);
        if self.table_width <= min_side || self.table_height <= min_side {
            return Err(TuningError::TableTooSmall {
                width: self.table_width,
                height: self.table_height,
                cushion: self.cushion,
                radius: self.ball_radius,
            });
        }

        Ok(())
    }

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
