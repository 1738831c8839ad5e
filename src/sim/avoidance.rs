//! Jellyfish flee ghost nets
//!
//! A resource that senses a trap inside its avoidance radius blends an escape
//! vector into its velocity. With nothing nearby its drift is left alone.

use glam::Vec2;

use super::registry::{EntityId, EntityKind, EntityRegistry};

/// Weight kept from the current velocity when fleeing
pub const KEEP_WEIGHT: f32 = 0.7;
/// Weight given to the escape vector
pub const ESCAPE_WEIGHT: f32 = 0.3;

/// Escape velocity of magnitude `force` pointing from `threat` to `pos`
pub fn escape_vector(pos: Vec2, threat: Vec2, force: f32) -> Vec2 {
    // Coincident positions flee along +x
    (pos - threat).normalize_or(Vec2::X) * force
}

/// Steer every resource away from its nearest trap and keep it inside the
/// playable band (`band_top..=band_bottom`) by reflecting vertical velocity.
pub fn steer_resources(registry: &mut EntityRegistry, force: f32, band_top: f32, band_bottom: f32) {
    let escapes: Vec<(EntityId, Vec2)> = registry
        .iter()
        .filter(|e| e.kind == EntityKind::Resource)
        .filter_map(|resource| {
            registry
                .nearest(resource.pos, resource.avoidance_radius, EntityKind::Trap)
                .map(|trap| (resource.id, escape_vector(resource.pos, trap.pos, force)))
        })
        .collect();

    for (id, escape) in escapes {
        if let Some(resource) = registry.get_mut(id) {
            resource.vel = resource.vel * KEEP_WEIGHT + escape * ESCAPE_WEIGHT;
        }
    }

    registry.for_each_mut(EntityKind::Resource, |resource| {
        if resource.pos.y < band_top {
            resource.vel.y = resource.vel.y.abs();
        } else if resource.pos.y > band_bottom {
            resource.vel.y = -resource.vel.y.abs();
        }
    });
}
