//! Collision detection and response for pool balls
//!
//! Pure functions over positions/velocities; the physics step decides when
//! each one runs.

use glam::Vec2;

use super::table::Bounds;

/// Result of a ball-ball overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first ball to the second
    pub normal: Vec2,
    /// How far the balls interpenetrate
    pub overlap: f32,
}

/// Check whether two balls overlap.
///
/// Returns `None` when they are apart, when the overlap is within `slop`
/// (resting contact), or when the centers coincide and no normal exists.
pub fn ball_ball_contact(
    pos_a: Vec2,
    radius_a: f32,
    pos_b: Vec2,
    radius_b: f32,
    slop: f32,
) -> Option<Contact> {
    let delta = pos_b - pos_a;
    let dist = delta.length();
    let overlap = radius_a + radius_b - dist;

    if overlap <= slop {
        return None;
    }
    if dist <= f32::EPSILON {
        // Same center: no usable normal this frame
        return None;
    }

    Some(Contact {
        normal: delta / dist,
        overlap,
    })
}

/// Push two overlapping balls apart, half the overlap each
#[inline]
pub fn separate(pos_a: Vec2, pos_b: Vec2, contact: &Contact) -> (Vec2, Vec2) {
    let push = contact.normal * (contact.overlap * 0.5);
    (pos_a - push, pos_b + push)
}

/// Whether two balls are closing along `normal` (first ball to second)
#[inline]
pub fn approaching(vel_a: Vec2, vel_b: Vec2, normal: Vec2) -> bool {
    (vel_b - vel_a).dot(normal) < 0.0
}

/// Equal-mass elastic response: swap the normal components, keep tangents
#[inline]
pub fn exchange_normal_velocity(vel_a: Vec2, vel_b: Vec2, normal: Vec2) -> (Vec2, Vec2) {
    let a_n = vel_a.dot(normal);
    let b_n = vel_b.dot(normal);
    let a_t = vel_a - normal * a_n;
    let b_t = vel_b - normal * b_n;
    (a_t + normal * b_n, b_t + normal * a_n)
}

/// Result of a cushion check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CushionHit {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Clamp a ball center into `bounds`, bouncing off every violated cushion.
///
/// The reflected component always points back into the table (its sign is
/// forced, not just flipped), scaled by `elasticity`.
pub fn cushion_bounce(pos: Vec2, vel: Vec2, bounds: &Bounds, elasticity: f32) -> Option<CushionHit> {
    let mut pos = pos;
    let mut vel = vel;
    let mut hit = false;

    if pos.x < bounds.min.x {
        pos.x = bounds.min.x;
        vel.x = vel.x.abs() * elasticity;
        hit = true;
    } else if pos.x > bounds.max.x {
        pos.x = bounds.max.x;
        vel.x = -vel.x.abs() * elasticity;
        hit = true;
    }

    if pos.y < bounds.min.y {
        pos.y = bounds.min.y;
        vel.y = vel.y.abs() * elasticity;
        hit = true;
    } else if pos.y > bounds.max.y {
        pos.y = bounds.max.y;
        vel.y = -vel.y.abs() * elasticity;
        hit = true;
    }

    hit.then_some(CushionHit { pos, vel })
}
