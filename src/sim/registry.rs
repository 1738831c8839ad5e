//! Entity storage
//!
//! The registry exclusively owns hazard and resource lifetimes. Entities are
//! kept sorted by id so iteration order is stable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique for the registry's lifetime; ids are never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Drifting debris: contact damage, consumed on hit
    Obstacle,
    /// Static ghost net: small damage plus slow, never consumed
    Trap,
    /// Jellyfish: heals on contact, flees traps
    Resource,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Obstacle, EntityKind::Trap, EntityKind::Resource];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Obstacle => "obstacle",
            EntityKind::Trap => "trap",
            EntityKind::Resource => "resource",
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Obstacle | EntityKind::Trap)
    }
}

/// A spawned hazard or resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Display state toggled by echolocation; no gameplay effect
    pub revealed: bool,
    /// Traps: how far they repel resources. Resources: how far they look for traps.
    pub avoidance_radius: f32,
}

impl Entity {
    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Owner of all live entities
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Spawn with zero radius and no avoidance radius
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2) -> EntityId {
        self.spawn_sized(kind, pos, vel, 0.0, 0.0)
    }

    pub fn spawn_sized(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        avoidance_radius: f32,
    ) -> EntityId {
        // Default-constructed registries start at 0; skip it so ids stay positive
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            vel,
            radius,
            revealed: false,
            avoidance_radius,
        });
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    /// Remove an entity. Returns false (and does nothing) if it is already gone.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.entities.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove every entity the predicate rejects; returns how many were removed
    pub fn retain(&mut self, mut keep: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| keep(e));
        before - self.entities.len()
    }

    pub fn for_each(&self, kind: EntityKind, mut f: impl FnMut(&Entity)) {
        self.entities.iter().filter(|e| e.kind == kind).for_each(|e| f(e));
    }

    pub fn for_each_mut(&mut self, kind: EntityKind, mut f: impl FnMut(&mut Entity)) {
        self.entities
            .iter_mut()
            .filter(|e| e.kind == kind)
            .for_each(|e| f(e));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entities whose centers lie strictly within `radius` of `point`
    pub fn query_within_radius(
        &self,
        point: Vec2,
        radius: f32,
        kind: Option<EntityKind>,
    ) -> Vec<&Entity> {
        let r2 = radius * radius;
        self.entities
            .iter()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .filter(|e| e.pos.distance_squared(point) < r2)
            .collect()
    }

    /// Closest entity of `kind` strictly within `radius`, ties broken by lowest id
    pub fn nearest(&self, point: Vec2, radius: f32, kind: EntityKind) -> Option<&Entity> {
        let r2 = radius * radius;
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| (e, e.pos.distance_squared(point)))
            .filter(|(_, d2)| *d2 < r2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique_and_never_reused() {
        let mut registry = EntityRegistry::new();
        let a = registry.spawn(EntityKind::Obstacle, Vec2::ZERO, Vec2::ZERO);
        let b = registry.spawn(EntityKind::Trap, Vec2::ZERO, Vec2::ZERO);
        assert_ne!(a, b);
        registry.destroy(b);
        let c = registry.spawn(EntityKind::Trap, Vec2::ZERO, Vec2::ZERO);
        assert!(c > b);
    }

    #[test]
    fn test_default_registry_ids_start_positive() {
        let mut registry = EntityRegistry::default();
        let id = registry.spawn(EntityKind::Resource, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(id, EntityId(1));
    }

    #[test]
    fn test_destroy_twice_is_noop() {
        let mut registry = EntityRegistry::new();
        let id = registry.spawn(EntityKind::Obstacle, Vec2::ZERO, Vec2::ZERO);
        assert!(registry.destroy(id));
        assert!(!registry.destroy(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_query_excludes_destroyed_and_filters_kind() {
        let mut registry = EntityRegistry::new();
        let near_trap = registry.spawn(EntityKind::Trap, Vec2::new(10.0, 0.0), Vec2::ZERO);
        let near_obstacle = registry.spawn(EntityKind::Obstacle, Vec2::new(0.0, 20.0), Vec2::ZERO);
        registry.spawn(EntityKind::Trap, Vec2::new(500.0, 0.0), Vec2::ZERO);

        let all = registry.query_within_radius(Vec2::ZERO, 100.0, None);
        assert_eq!(all.len(), 2);

        let traps = registry.query_within_radius(Vec2::ZERO, 100.0, Some(EntityKind::Trap));
        assert_eq!(traps.len(), 1);
        assert_eq!(traps[0].id, near_trap);

        registry.destroy(near_obstacle);
        let all = registry.query_within_radius(Vec2::ZERO, 100.0, None);
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_nearest_picks_closest() {
        let mut registry = EntityRegistry::new();
        registry.spawn(EntityKind::Trap, Vec2::new(50.0, 0.0), Vec2::ZERO);
        let close = registry.spawn(EntityKind::Trap, Vec2::new(0.0, 30.0), Vec2::ZERO);
        let found = registry.nearest(Vec2::ZERO, 100.0, EntityKind::Trap).unwrap();
        assert_eq!(found.id, close);
        assert!(registry.nearest(Vec2::ZERO, 10.0, EntityKind::Trap).is_none());
    }

    #[test]
    fn test_for_each_visits_only_kind() {
        let mut registry = EntityRegistry::new();
        registry.spawn(EntityKind::Trap, Vec2::ZERO, Vec2::ZERO);
        registry.spawn(EntityKind::Resource, Vec2::ZERO, Vec2::ZERO);
        registry.spawn(EntityKind::Resource, Vec2::ZERO, Vec2::ZERO);
        let mut seen = 0;
        registry.for_each(EntityKind::Resource, |e| {
            assert_eq!(e.kind, EntityKind::Resource);
            seen += 1;
        });
        assert_eq!(seen, 2);
        assert_eq!(registry.count(EntityKind::Trap), 1);
    }
}
