use glam::DVec2;

use crate::model::{Commands, Entity, EntityRef, EventContext};

/// Circle overlap test. Touching circles do not collide.
pub fn circles_overlap(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    a.distance(b) < ra + rb
}

pub fn is_colliding(a: &dyn Entity, b: &dyn Entity) -> bool {
    circles_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// Point strictly inside the entity's circle.
pub fn is_point_in_entity(point: DVec2, entity: &dyn Entity) -> bool {
    point.distance(entity.position()) < entity.radius()
}

/// Dispatch `on_collision` both ways, first `a` then `b`.
pub fn notify_pair(a: &EntityRef, b: &EntityRef, commands: &mut Commands) {
    {
        let other = b.borrow();
        a.borrow_mut().on_collision(&*other, &mut EventContext::new(a, commands));
    }
    let other = a.borrow();
    b.borrow_mut().on_collision(&*other, &mut EventContext::new(b, commands));
}

fn overlapping(a: &EntityRef, b: &EntityRef) -> bool {
    is_colliding(&*a.borrow(), &*b.borrow())
}

/// One collision pass: player against every entity, then every unordered
/// pair `(i, j)` with `i < j`. Each hit is dispatched before the next test,
/// so a handler that moves its entity affects the remaining checks.
/// Despawns queued by handlers take effect once the pass is over.
/// Returns the number of colliding pairs.
pub fn dispatch_collisions(player: Option<&EntityRef>, entities: &[EntityRef], commands: &mut Commands) -> usize {
    let mut hits = 0;
    if let Some(player) = player {
        for entity in entities {
            if overlapping(player, entity) {
                notify_pair(player, entity, commands);
                hits += 1;
            }
        }
    }
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if overlapping(&entities[i], &entities[j]) {
                notify_pair(&entities[i], &entities[j], commands);
                hits += 1;
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity_ref;
    use crate::testing::ScriptedEntity;

    #[test]
    fn test_overlap_boundary() {
        let origin = DVec2::ZERO;
        // distance 8, radii sum 8: tangent
        assert!(!circles_overlap(origin, 5.0, DVec2::new(8.0, 0.0), 3.0));
        assert!(circles_overlap(origin, 5.0, DVec2::new(7.999, 0.0), 3.0));
        assert!(!circles_overlap(origin, 5.0, DVec2::new(20.0, 0.0), 3.0));
        // 3-4-5 triangle, radii sum exactly 5
        assert!(!circles_overlap(origin, 2.5, DVec2::new(3.0, 4.0), 2.5));
    }

    #[test]
    fn test_zero_radius_never_collides_at_same_point() {
        let p = DVec2::new(1.0, 1.0);
        assert!(!circles_overlap(p, 0.0, p, 0.0));
    }

    #[test]
    fn test_point_in_entity_is_strict() {
        let entity = ScriptedEntity::new(10.0, 10.0, 4.0);
        assert!(is_point_in_entity(DVec2::new(12.0, 10.0), &entity));
        assert!(!is_point_in_entity(DVec2::new(14.0, 10.0), &entity));
    }

    #[test]
    fn test_dispatch_checks_each_pair_once() {
        let scripted = [
            ScriptedEntity::new(0.0, 0.0, 2.0),
            ScriptedEntity::new(3.0, 0.0, 2.0),
            ScriptedEntity::new(100.0, 0.0, 2.0),
            ScriptedEntity::new(1.0, 0.0, 2.0),
        ];
        let logs: Vec<_> = scripted.iter().map(|p| p.log()).collect();
        let entities: Vec<EntityRef> = scripted.into_iter().map(entity_ref).collect();

        // (0, 1), (0, 3), (1, 3)
        assert_eq!(dispatch_collisions(None, &entities, &mut Commands::default()), 3);
        let counts: Vec<_> = logs.iter().map(|l| l.borrow().collisions).collect();
        assert_eq!(counts, vec![2, 2, 0, 2]);
    }

    #[test]
    fn test_player_collides_with_entity_once_each_way() {
        let player = ScriptedEntity::new(0.0, 0.0, 5.0);
        let rock = ScriptedEntity::new(3.0, 0.0, 3.0);
        let (player_log, rock_log) = (player.log(), rock.log());
        let player = entity_ref(player);
        let entities = vec![entity_ref(rock)];

        assert_eq!(dispatch_collisions(Some(&player), &entities, &mut Commands::default()), 1);
        assert_eq!(player_log.borrow().collisions, 1);
        assert_eq!(rock_log.borrow().collisions, 1);
    }

    #[test]
    fn test_notify_pair_both_directions() {
        let a = ScriptedEntity::new(0.0, 0.0, 1.0);
        let b = ScriptedEntity::new(0.5, 0.0, 1.0);
        let (a_log, b_log) = (a.log(), b.log());
        notify_pair(&entity_ref(a), &entity_ref(b), &mut Commands::default());
        assert_eq!(a_log.borrow().collisions, 1);
        assert_eq!(b_log.borrow().collisions, 1);
    }

    #[test]
    fn test_hit_handler_queues_its_own_removal() {
        let bullet = entity_ref(ScriptedEntity::new(0.0, 0.0, 1.0).despawning_on_hit());
        let wall = entity_ref(ScriptedEntity::new(1.0, 0.0, 1.0));
        let mut commands = Commands::default();

        notify_pair(&bullet, &wall, &mut commands);

        let (_, despawned) = commands.take();
        assert_eq!(despawned.len(), 1);
        assert!(std::rc::Rc::ptr_eq(&despawned[0], &bullet));
    }
}
