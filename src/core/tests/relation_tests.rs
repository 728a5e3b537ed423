// Tests for the relation manager
#[cfg(test)]
mod tests {
    use crate::core::errors::ModelError;
    use crate::core::relation::{self, Parent, Relation, Resource};
    use crate::core::types::EntityId;
    use crate::core::world::World;

    fn location(world: &mut World, name: &str, capacity: Option<u64>) -> EntityId {
        let id = world.create_entity(name);
        world.add_component(id, Relation::new()).unwrap();
        if let Some(capacity) = capacity {
            world.add_component(id, Resource { capacity }).unwrap();
        }
        id
    }

    #[test]
    fn test_move_preserves_arrival_order() {
        let mut world = World::new();
        let queue = location(&mut world, "Queue1", Some(5));
        let a = world.create_entity("a");
        let b = world.create_entity("b");

        relation::move_entity(&mut world, a, queue).unwrap();
        relation::move_entity(&mut world, b, queue).unwrap();

        let rel = world.get::<Relation>(queue).unwrap();
        assert_eq!(rel.child_count(), 2);
        assert_eq!(rel.first(), Some(a));
        assert_eq!(rel.children().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(relation::parent_of(&world, b), Some(queue));
    }

    #[test]
    fn test_move_reparents_atomically() {
        let mut world = World::new();
        let from = location(&mut world, "Queue1", Some(5));
        let to = location(&mut world, "Server1", Some(1));
        let p = world.create_entity("p");

        relation::move_entity(&mut world, p, from).unwrap();
        relation::move_entity(&mut world, p, to).unwrap();

        assert_eq!(relation::child_count(&world, from).unwrap(), 0);
        assert_eq!(relation::child_count(&world, to).unwrap(), 1);
        assert_eq!(world.get::<Parent>(p), Some(&Parent(to)));
    }

    #[test]
    fn test_move_into_full_location_is_refused() {
        let mut world = World::new();
        let from = location(&mut world, "Queue1", Some(5));
        let server = location(&mut world, "Server1", Some(1));
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        relation::move_entity(&mut world, a, server).unwrap();
        relation::move_entity(&mut world, b, from).unwrap();

        let err = relation::move_entity(&mut world, b, server).unwrap_err();
        assert_eq!(
            err,
            ModelError::CapacityExceeded {
                location: "Server1".to_string(),
                capacity: 1
            }
        );
        // Nothing changed
        assert_eq!(relation::parent_of(&world, b), Some(from));
        assert_eq!(relation::child_count(&world, server).unwrap(), 1);
    }

    #[test]
    fn test_zero_capacity_has_no_room() {
        let mut world = World::new();
        let queue = location(&mut world, "Queue1", Some(0));
        assert!(!relation::has_room(&world, queue).unwrap());
    }

    #[test]
    fn test_unbounded_location_always_has_room() {
        let mut world = World::new();
        let sink = location(&mut world, "Sink1", None);
        for i in 0..100 {
            let p = world.create_entity(format!("p{}", i));
            relation::move_entity(&mut world, p, sink).unwrap();
        }
        assert!(relation::has_room(&world, sink).unwrap());
        assert_eq!(relation::capacity(&world, sink), None);
    }

    #[test]
    fn test_move_into_non_location_fails() {
        let mut world = World::new();
        let plain = world.create_entity("plain");
        let p = world.create_entity("p");
        assert_eq!(
            relation::move_entity(&mut world, p, plain),
            Err(ModelError::NotALocation("plain".to_string()))
        );
    }

    #[test]
    fn test_move_from_wrong_parent_fails() {
        let mut world = World::new();
        let queue = location(&mut world, "Queue1", None);
        let server = location(&mut world, "Server1", Some(1));
        let sink = location(&mut world, "Sink1", None);
        let p = world.create_entity("p");
        relation::move_entity(&mut world, p, queue).unwrap();

        let err = relation::move_entity_from(&mut world, p, server, sink).unwrap_err();
        assert!(matches!(err, ModelError::NotResident { .. }));
        assert_eq!(relation::parent_of(&world, p), Some(queue));
    }

    #[test]
    fn test_destroy_detaches_and_fails_twice() {
        let mut world = World::new();
        let sink = location(&mut world, "Sink1", None);
        let p = world.create_entity("p");
        relation::move_entity(&mut world, p, sink).unwrap();

        relation::destroy_entity(&mut world, p).unwrap();
        assert_eq!(relation::child_count(&world, sink).unwrap(), 0);
        assert_eq!(
            relation::destroy_entity(&mut world, p),
            Err(ModelError::AlreadyDestroyed(p))
        );
    }

    #[test]
    fn test_moving_destroyed_entity_fails() {
        let mut world = World::new();
        let sink = location(&mut world, "Sink1", None);
        let p = world.create_entity("p");
        world.destroy_entity(p).unwrap();
        assert_eq!(
            relation::move_entity(&mut world, p, sink),
            Err(ModelError::AlreadyDestroyed(p))
        );
    }
}
