//! Pool table geometry
//!
//! Coordinates are table units (pixels at 1:1), origin at the top-left
//! outer corner of the rails, y pointing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of pockets on the table
pub const POCKET_COUNT: usize = 6;

/// Static table description. Pockets are always derived from the
/// dimensions, never stored alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub width: f32,
    pub height: f32,
    /// Rail thickness on every side
    pub cushion: f32,
}

/// Axis-aligned region a ball center may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Table {
    pub fn new(width: f32, height: f32, cushion: f32) -> Self {
        Self {
            width,
            height,
            cushion,
        }
    }

    /// Whether the long side runs along y
    #[inline]
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Pocket centers: four corners, then the two middles of the long rails
    pub fn pockets(&self) -> [Vec2; POCKET_COUNT] {
        let c = self.cushion;
        let (w, h) = (self.width, self.height);
        let (side_a, side_b) = if self.is_portrait() {
            (Vec2::new(c, h / 2.0), Vec2::new(w - c, h / 2.0))
        } else {
            (Vec2::new(w / 2.0, c), Vec2::new(w / 2.0, h - c))
        };
        [
            Vec2::new(c, c),
            Vec2::new(w - c, c),
            Vec2::new(c, h - c),
            Vec2::new(w - c, h - c),
            side_a,
            side_b,
        ]
    }

    /// Range a ball center of the given radius may occupy
    pub fn playable_bounds(&self, radius: f32) -> Bounds {
        let inset = self.cushion + radius;
        Bounds {
            min: Vec2::new(inset, inset),
            max: Vec2::new(self.width - inset, self.height - inset),
        }
    }

    /// Inner felt rectangle (inside the rails)
    pub fn felt(&self) -> Bounds {
        self.playable_bounds(0.0)
    }

    /// Table center
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Index of the first pocket whose center is within `radius` of `p` (inclusive)
    pub fn pocket_within(&self, p: Vec2, radius: f32) -> Option<usize> {
        let r_sq = radius * radius;
        self.pockets()
            .iter()
            .position(|pocket| pocket.distance_squared(p) <= r_sq)
    }
}
