//! Demo-mode pilot
//!
//! Plays the game for attract screens and the headless runner: always swims
//! toward the sanctuary, dodges the nearest hazard ahead, detours for food
//! when hurt and pings echolocation whenever it is ready.

use glam::Vec2;

use super::registry::EntityKind;
use super::state::GameState;
use super::tick::TickInput;

/// How far ahead the pilot looks for hazards
const LOOKAHEAD: f32 = 220.0;
/// How far the pilot will detour for food
const FORAGE_RANGE: f32 = 420.0;
/// Vertical slack before the pilot corrects
const DEADZONE: f32 = 8.0;
/// Forage below this fraction of max health
const HUNGRY_FRACTION: f32 = 0.7;

/// Input the pilot would press this tick
pub fn steer(state: &GameState) -> TickInput {
    let player = &state.player;
    let mut input = TickInput {
        right: true,
        ability: player.ability_ready,
        autopilot: true,
        ..Default::default()
    };

    // Dodge first
    let threat = state
        .registry
        .iter()
        .filter(|e| e.kind.is_hazard() && e.pos.x + e.radius >= player.pos.x)
        .filter(|e| {
            let keep_out = (e.radius + player.radius).max(e.avoidance_radius);
            e.pos.distance(player.pos) < LOOKAHEAD.max(keep_out)
        })
        .min_by(|a, b| {
            a.pos
                .distance_squared(player.pos)
                .total_cmp(&b.pos.distance_squared(player.pos))
        });

    let target_y = if let Some(hazard) = threat {
        let band = state.tuning.world.viewport_height;
        let clearance = hazard.radius + player.radius + DEADZONE;
        let above = hazard.pos.y - clearance;
        let below = hazard.pos.y + clearance;
        // Pass on whichever side is closer and still inside the band
        if (player.pos.y - above).abs() <= (below - player.pos.y).abs() && above > player.radius {
            Some(above)
        } else if below < band - player.radius {
            Some(below)
        } else {
            Some(above)
        }
    } else if player.health < player.max_health * HUNGRY_FRACTION {
        state
            .registry
            .iter()
            .filter(|e| e.kind == EntityKind::Resource && e.pos.x >= player.pos.x - 20.0)
            .filter(|e| e.pos.distance(player.pos) < FORAGE_RANGE)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .total_cmp(&b.pos.distance_squared(player.pos))
            })
            .map(|food| food.pos.y)
    } else {
        None
    };

    if let Some(y) = target_y {
        aim(&mut input, player.pos, y);
    }
    input
}

fn aim(input: &mut TickInput, pos: Vec2, target_y: f32) {
    let dy = target_y - pos.y;
    if dy > DEADZONE {
        input.down = true;
    } else if dy < -DEADZONE {
        input.up = true;
    }
}
