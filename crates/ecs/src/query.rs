use glam::Vec2;
use tickline_common::EntityId;

use crate::entity::Entity;
use crate::registry::Registry;

/// Shape of a spatial query around a point.
///
/// Zero-sized shapes differ: `Radius(0.0)` selects every entity, like `All`,
/// while `Box(Vec2::ZERO)` is a point that only overlaps entities whose
/// center coincides with the query point on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Region {
    /// Every entity in the collection.
    #[default]
    All,
    /// Axis-aligned box with the given full extents, centered on the query point.
    Box(Vec2),
    /// Circle of the given radius. A zero radius selects everything, unlike
    /// a zero box.
    Radius(f32),
}

impl Region {
    /// Extents and radii must be finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        match *self {
            Region::All => true,
            Region::Box(size) => size.is_finite() && size.x >= 0.0 && size.y >= 0.0,
            Region::Radius(r) => r.is_finite() && r >= 0.0,
        }
    }

    fn resolve(self) -> Self {
        debug_assert!(self.is_well_formed(), "malformed query region {self:?}");
        match self {
            r if !r.is_well_formed() => Region::All,
            Region::Radius(r) if r == 0.0 => Region::All,
            r => r,
        }
    }

    fn contains(&self, center: Vec2, entity: &Entity) -> bool {
        match *self {
            Region::All => true,
            Region::Box(size) => aabb_overlap(center, size, entity.position, entity.size),
            Region::Radius(r) => center.distance_squared(entity.position) < r * r,
        }
    }
}

/// Separating-axis overlap of two centered boxes.
///
/// Boxes overlap when, on both axes, the distance between centers is less
/// than the sum of half extents. Centers that coincide on an axis always
/// overlap on it, so zero-size boxes at the same point intersect.
pub fn aabb_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    let dist = (pos_a - pos_b).abs();
    let half = (size_a + size_b) * 0.5;
    let axis = |d: f32, h: f32| d < h || d == 0.0;
    axis(dist.x, half.x) && axis(dist.y, half.y)
}

impl Registry {
    /// Visit every entity in `all` (or `collidable`) that falls inside
    /// `region` around `position`.
    ///
    /// This is a linear scan over the chosen collection. Entities marked
    /// destroyed but not yet reaped are still visited; check
    /// [`Entity::is_destroyed`] if that matters to the caller.
    pub fn for_each(
        &self,
        position: Vec2,
        region: Region,
        collidable_only: bool,
        mut visit: impl FnMut(EntityId, &Entity),
    ) {
        let region = region.resolve();
        let ids = if collidable_only {
            self.collidable()
        } else {
            self.all()
        };
        for &id in ids {
            let Some(entity) = self.get(id) else {
                continue;
            };
            if region.contains(position, entity) {
                visit(id, entity);
            }
        }
    }

    /// Collect the ids [`Registry::for_each`] would visit, so the caller can
    /// mutate the registry afterwards.
    pub fn query(&self, position: Vec2, region: Region, collidable_only: bool) -> Vec<EntityId> {
        let mut hits = Vec::new();
        self.for_each(position, region, collidable_only, |id, _| hits.push(id));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityDesc;

    fn point(reg: &mut Registry, x: f32, y: f32) -> EntityId {
        reg.spawn(EntityDesc::at(Vec2::new(x, y)).with_size(Vec2::ZERO), ())
    }

    #[test]
    fn all_region_visits_everything() {
        let mut reg = Registry::new();
        let a = point(&mut reg, 0.0, 0.0);
        let b = point(&mut reg, 1000.0, -1000.0);
        assert_eq!(reg.query(Vec2::ZERO, Region::All, false), vec![a, b]);
    }

    #[test]
    fn zero_radius_visits_everything() {
        let mut reg = Registry::new();
        point(&mut reg, 0.0, 0.0);
        point(&mut reg, 50.0, 50.0);
        assert_eq!(reg.query(Vec2::ZERO, Region::Radius(0.0), false).len(), 2);
    }

    #[test]
    fn zero_box_hits_only_coincident_point() {
        let mut reg = Registry::new();
        let p = Vec2::new(3.0, 4.0);
        let on = point(&mut reg, p.x, p.y);
        point(&mut reg, p.x + 0.001, p.y);
        point(&mut reg, p.x, p.y - 0.001);
        assert_eq!(reg.query(p, Region::Box(Vec2::ZERO), false), vec![on]);
    }

    #[test]
    fn zero_radius_and_zero_box_differ() {
        let mut reg = Registry::new();
        let here = point(&mut reg, 0.0, 0.0);
        let there = point(&mut reg, 4.0, 0.0);
        assert_eq!(
            reg.query(Vec2::ZERO, Region::Radius(0.0), false),
            vec![here, there]
        );
        assert_eq!(reg.query(Vec2::ZERO, Region::Box(Vec2::ZERO), false), vec![here]);
    }

    #[test]
    fn box_overlap_uses_half_extents() {
        let mut reg = Registry::new();
        let near = reg.spawn(EntityDesc::at(Vec2::new(1.9, 0.0)).with_size(Vec2::splat(2.0)), ());
        // Touching edges do not overlap.
        reg.spawn(EntityDesc::at(Vec2::new(2.0, 0.0)).with_size(Vec2::splat(2.0)), ());
        reg.spawn(EntityDesc::at(Vec2::new(0.0, 5.0)).with_size(Vec2::splat(2.0)), ());
        let hits = reg.query(Vec2::ZERO, Region::Box(Vec2::splat(2.0)), false);
        assert_eq!(hits, vec![near]);
    }

    #[test]
    fn radius_uses_strict_squared_distance() {
        let mut reg = Registry::new();
        let inside = point(&mut reg, 3.0, 3.9);
        point(&mut reg, 3.0, 4.0); // exactly at radius 5
        point(&mut reg, -10.0, 0.0);
        assert_eq!(reg.query(Vec2::ZERO, Region::Radius(5.0), false), vec![inside]);
    }

    #[test]
    fn collidable_only_restricts_collection() {
        let mut reg = Registry::new();
        point(&mut reg, 0.0, 0.0);
        let solid = reg.spawn(EntityDesc::default().collidable(), ());
        assert_eq!(reg.query(Vec2::ZERO, Region::All, true), vec![solid]);
        assert_eq!(reg.query(Vec2::ZERO, Region::Radius(1.0), true), vec![solid]);
    }

    #[test]
    fn destroyed_entities_are_visited_until_reaped() {
        let mut reg = Registry::new();
        let a = point(&mut reg, 0.0, 0.0);
        reg.destroy(a);
        assert_eq!(reg.query(Vec2::ZERO, Region::All, false), vec![a]);
        reg.update(tickline_common::SimTime::new(0, 60));
        assert!(reg.query(Vec2::ZERO, Region::All, false).is_empty());
    }

    #[test]
    fn well_formedness() {
        assert!(Region::All.is_well_formed());
        assert!(Region::Box(Vec2::ZERO).is_well_formed());
        assert!(!Region::Box(Vec2::new(-1.0, 1.0)).is_well_formed());
        assert!(!Region::Radius(f32::NAN).is_well_formed());
        assert!(!Region::Radius(f32::INFINITY).is_well_formed());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "malformed query region")]
    fn malformed_region_asserts_in_debug() {
        let reg = Registry::new();
        reg.for_each(Vec2::ZERO, Region::Radius(-1.0), false, |_, _| {});
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn malformed_region_visits_all_in_release() {
        let mut reg = Registry::new();
        point(&mut reg, 0.0, 0.0);
        point(&mut reg, 9.0, 9.0);
        assert_eq!(reg.query(Vec2::ZERO, Region::Radius(-1.0), false).len(), 2);
    }

    #[test]
    fn aabb_overlap_is_symmetric() {
        let a = (Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        let b = (Vec2::new(2.5, 0.5), Vec2::new(2.0, 2.0));
        assert!(aabb_overlap(a.0, a.1, b.0, b.1));
        assert!(aabb_overlap(b.0, b.1, a.0, a.1));
    }
}
