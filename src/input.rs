//! Drag-to-shoot input mapping
//!
//! Pull back away from where the ball should go, release to shoot: the shot
//! travels from the current pointer position back toward the drag start,
//! like a slingshot.

use glam::Vec2;

use crate::angle_of;
use crate::tuning::Tuning;

/// A shot ready to hand to [`crate::sim::SimLoop::shoot`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// 0..=1
    pub power: f32,
    /// Radians, table coordinates
    pub angle: f32,
}

/// Map a pull-back drag to a shot.
///
/// `angle` points from `current` back to `start`; power grows linearly with
/// the drag length up to `max_pull`. Drags at or below `min_power` are taps
/// and return `None`.
pub fn shot_from_drag(start: Vec2, current: Vec2, max_pull: f32, min_power: f32) -> Option<Shot> {
    let pull = start - current;
    let power = (pull.length().min(max_pull) / max_pull).clamp(0.0, 1.0);
    if !(power > min_power) {
        return None;
    }
    Some(Shot {
        power,
        angle: angle_of(pull),
    })
}

/// In-progress drag on the table
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AimGesture {
    drag: Option<(Vec2, Vec2)>,
}

impl AimGesture {
    /// Pointer went down at `p` (table coordinates)
    pub fn begin(&mut self, p: Vec2) {
        self.drag = Some((p, p));
    }

    /// Pointer moved; ignored when not dragging
    pub fn update(&mut self, p: Vec2) {
        if let Some((_, current)) = self.drag.as_mut() {
            *current = p;
        }
    }

    /// Abandon the drag without shooting (pointer left the canvas, etc.)
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Start and current pointer positions while dragging
    #[inline]
    pub fn points(&self) -> Option<(Vec2, Vec2)> {
        self.drag
    }

    /// Shot the drag would produce if released now
    pub fn preview(&self, tuning: &Tuning) -> Option<Shot> {
        let (start, current) = self.drag?;
        shot_from_drag(start, current, tuning.max_pull, tuning.min_shot_power)
    }

    /// Pointer released: end the drag and return the shot, if any
    pub fn release(&mut self, tuning: &Tuning) -> Option<Shot> {
        let shot = self.preview(tuning);
        self.drag = None;
        shot
    }
}

/// Convert a pointer position on the canvas (CSS pixels) to table units.
///
/// The table is letterboxed into the canvas the same way the renderer fits it.
pub fn screen_to_table(screen: Vec2, canvas_size: Vec2, table_size: Vec2) -> Vec2 {
    let scale = (canvas_size.x / table_size.x).min(canvas_size.y / table_size.y);
    if !(scale > 0.0) {
        return screen;
    }
    let drawn = table_size * scale;
    let offset = (canvas_size - drawn) * 0.5;
    (screen - offset) / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_pull_down_shoots_up() {
        // Drag from (200, 500) down to (200, 575): ball should go up (-y)
        let shot = shot_from_drag(Vec2::new(200.0, 500.0), Vec2::new(200.0, 575.0), 150.0, 0.05).unwrap();
        assert!((shot.power - 0.5).abs() < 1e-6);
        assert!((shot.angle + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_pull_right_shoots_left() {
        let shot = shot_from_drag(Vec2::new(100.0, 100.0), Vec2::new(130.0, 100.0), 150.0, 0.05).unwrap();
        assert!((shot.angle.abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_power_caps_at_max_pull() {
        let shot = shot_from_drag(Vec2::ZERO, Vec2::new(0.0, 900.0), 150.0, 0.05).unwrap();
        assert_eq!(shot.power, 1.0);
    }

    #[test]
    fn test_tap_is_not_a_shot() {
        // 7.5 / 150 = 0.05: exactly at the threshold is still a tap
        assert!(shot_from_drag(Vec2::ZERO, Vec2::new(7.5, 0.0), 150.0, 0.05).is_none());
        assert!(shot_from_drag(Vec2::ZERO, Vec2::ZERO, 150.0, 0.05).is_none());
        assert!(shot_from_drag(Vec2::ZERO, Vec2::new(9.0, 0.0), 150.0, 0.05).is_some());
    }

    #[test]
    fn test_gesture_lifecycle() {
        let tuning = Tuning::default();
        let mut aim = AimGesture::default();
        aim.update(Vec2::new(10.0, 10.0));
        assert!(!aim.is_active());

        aim.begin(Vec2::new(200.0, 400.0));
        aim.update(Vec2::new(200.0, 550.0));
        assert!(aim.is_active());
        assert_eq!(aim.preview(&tuning).map(|s| s.power), Some(1.0));

        let shot = aim.release(&tuning).unwrap();
        assert!((shot.angle + FRAC_PI_2).abs() < 1e-6);
        assert!(!aim.is_active());
        assert!(aim.release(&tuning).is_none());
    }

    #[test]
    fn test_cancel_drops_drag() {
        let tuning = Tuning::default();
        let mut aim = AimGesture::default();
        aim.begin(Vec2::ZERO);
        aim.update(Vec2::new(100.0, 0.0));
        aim.cancel();
        assert!(aim.release(&tuning).is_none());
    }

    #[test]
    fn test_screen_to_table_letterbox() {
        // 800x800 canvas, 400x800 table: scale 1, 200px bars left and right
        let p = screen_to_table(Vec2::new(300.0, 400.0), Vec2::new(800.0, 800.0), Vec2::new(400.0, 800.0));
        assert_eq!(p, Vec2::new(100.0, 400.0));

        // Half-size canvas: scale 0.5
        let p = screen_to_table(Vec2::new(100.0, 200.0), Vec2::new(200.0, 400.0), Vec2::new(400.0, 800.0));
        assert_eq!(p, Vec2::new(200.0, 400.0));
    }
}
