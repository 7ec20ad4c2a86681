// src/services/hotel_service_tests.rs
//
// HotelService behaviour against an in-memory store
//
// INVARIANTS TESTED:
// - Reads on empty tables return empty sets, never errors
// - Writes are atomic: a failed insert, update or generate leaves the store unchanged
// - Names are resolved through the registry (unknown kind/field, type mismatch)
// - Referenced rows cannot be deleted

#[cfg(test)]
mod facade_tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Timelike, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::db::{create_memory_pool, initialize_database, with_connection};
    use crate::domain::{EntityKind, Record, Room, RoomType, Service, ServiceOrder, User};
    use crate::error::AppError;
    use crate::services::{DeleteOutcome, HotelService};

    fn service() -> HotelService {
        let pool = create_memory_pool().unwrap();
        with_connection(&pool, |conn| initialize_database(conn)).unwrap();
        HotelService::new(Arc::new(pool))
    }

    fn seeded_rooms(service: &HotelService) {
        service
            .insert(&RoomType::new(1, "Standard", Some(100)).into())
            .unwrap();
        service.insert(&Room::new(1, 101, 1).into()).unwrap();
    }

    #[test]
    fn test_fetch_all_on_empty_store() {
        let service = service();
        for kind in EntityKind::ALL {
            assert!(service.fetch_all(kind.name()).unwrap().is_empty());
        }
    }

    #[test]
    fn test_unknown_kind() {
        let service = service();
        assert!(matches!(
            service.fetch_all("Spaceship"),
            Err(AppError::UnknownEntity(name)) if name == "Spaceship"
        ));
        assert!(matches!(
            service.delete("Spaceship", "1"),
            Err(AppError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_room_with_no_occupant() {
        let service = service();
        seeded_rooms(&service);

        let rooms = service.fetch_all("Room").unwrap();
        assert_eq!(rooms, vec![Record::Room(Room::new(1, 101, 1))]);
        match &rooms[0] {
            Record::Room(room) => assert_eq!(room.user_id, None),
            other => panic!("expected a room, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_then_fetch_one() {
        let service = service();
        let user = User::new(7, "Olena", "380501234567");
        service.insert(&user.clone().into()).unwrap();

        assert_eq!(
            service.fetch_one("users", "7").unwrap(),
            Some(Record::User(user))
        );
        assert_eq!(service.fetch_one("users", "8").unwrap(), None);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let service = service();
        service.insert(&User::new(1, "Ann", "1").into()).unwrap();

        let result = service.insert(&User::new(1, "Bob", "2").into());
        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));

        let users = service.fetch_all("User").unwrap();
        assert_eq!(users, vec![Record::User(User::new(1, "Ann", "1"))]);
    }

    #[test]
    fn test_foreign_key_is_enforced_on_insert() {
        let service = service();
        let result = service.insert(&Room::new(1, 101, 99).into());
        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));
        assert!(service.fetch_all("Room").unwrap().is_empty());
    }

    #[test]
    fn test_update_changes_only_that_field() {
        let service = service();
        seeded_rooms(&service);

        let updated = service.update_field("Room", "1", "room_number", "202").unwrap();

        let mut expected = Room::new(1, 101, 1);
        expected.room_number = 202;
        assert_eq!(updated, Record::Room(expected.clone()));
        assert_eq!(service.fetch_one("Room", "1").unwrap(), Some(Record::Room(expected)));
    }

    #[test]
    fn test_update_sets_and_clears_nullable_fields() {
        let service = service();
        seeded_rooms(&service);
        service.insert(&User::new(4, "Ann", "1").into()).unwrap();

        let occupied = service.update_field("Room", "1", "user_id", "4").unwrap();
        assert!(matches!(&occupied, Record::Room(r) if r.user_id == Some(4)));

        let checked_in = service
            .update_field("Room", "1", "check_in", "2024-03-01 14:00:00")
            .unwrap();
        assert!(matches!(
            &checked_in,
            Record::Room(r) if r.check_in == Some(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap())
        ));

        let vacated = service.update_field("Room", "1", "user_id", "none").unwrap();
        assert!(matches!(&vacated, Record::Room(r) if r.user_id.is_none()));
    }

    #[test]
    fn test_update_errors() {
        let service = service();
        seeded_rooms(&service);

        assert!(matches!(
            service.update_field("Room", "1", "colour", "red"),
            Err(AppError::UnknownField { .. })
        ));
        assert!(matches!(
            service.update_field("Room", "1", "room_number", "many"),
            Err(AppError::InvalidValue { .. })
        ));
        assert!(matches!(
            service.update_field("Room", "1", "room_id", "5"),
            Err(AppError::ImmutableField { .. })
        ));
        assert!(matches!(
            service.update_field("Room", "9", "room_number", "5"),
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            service.update_field("Room", "1", "room_type_id", "42"),
            Err(AppError::ConstraintViolation(_))
        ));

        assert_eq!(
            service.fetch_one("Room", "1").unwrap(),
            Some(Record::Room(Room::new(1, 101, 1)))
        );
    }

    #[test]
    fn test_delete_then_delete_again() {
        let service = service();
        service.insert(&Service::new(1, "Spa", 200).into()).unwrap();

        assert_eq!(service.delete("Service", "1").unwrap(), DeleteOutcome::Deleted);
        assert_eq!(service.fetch_one("Service", "1").unwrap(), None);
        assert_eq!(service.delete("Service", "1").unwrap(), DeleteOutcome::Missing);
    }

    #[test]
    fn test_delete_referenced_row_is_restricted() {
        let service = service();
        seeded_rooms(&service);

        assert!(matches!(
            service.delete("RoomType", "1"),
            Err(AppError::ConstraintViolation(_))
        ));
        assert_eq!(service.fetch_all("RoomType").unwrap().len(), 1);

        assert_eq!(service.delete("Room", "1").unwrap(), DeleteOutcome::Deleted);
        assert_eq!(service.delete("RoomType", "1").unwrap(), DeleteOutcome::Deleted);
    }

    #[test]
    fn test_service_order_round_trip_by_key() {
        let service = service();
        service.insert(&User::new(1, "Ann", "1").into()).unwrap();
        service.insert(&Service::new(2, "Spa", 200).into()).unwrap();

        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        service.insert(&ServiceOrder::new(1, 2, at).into()).unwrap();

        let key = "1,2,2024-05-01T09:30:00Z";
        assert_eq!(
            service.fetch_one("order", key).unwrap(),
            Some(Record::ServiceOrder(ServiceOrder::new(1, 2, at)))
        );

        let moved = service
            .update_field("order", key, "ordered_at", "2024-05-02 10:00:00")
            .unwrap();
        assert_eq!(moved.key().to_string(), "1,2,2024-05-02T10:00:00.000000Z");
        assert_eq!(service.fetch_one("order", key).unwrap(), None);
    }

    #[test]
    fn test_listed_order_key_finds_fractional_timestamp() {
        let service = service();
        service.insert(&User::new(1, "Ann", "1").into()).unwrap();
        service.insert(&Service::new(2, "Spa", 200).into()).unwrap();

        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .unwrap()
            .with_nanosecond(250_001_000)
            .unwrap();
        service.insert(&ServiceOrder::new(1, 2, at).into()).unwrap();

        let listed = service.fetch_all("order").unwrap();
        let shown = listed[0]
            .fields()
            .into_iter()
            .find(|(field, _)| field.name == "ordered_at")
            .map(|(_, value)| value.to_string())
            .unwrap();
        assert_eq!(shown, "2024-05-01 09:30:00.250001 UTC");

        let key = format!("1,2,{}", shown);
        assert_eq!(service.fetch_one("order", &key).unwrap(), Some(listed[0].clone()));
        assert_eq!(service.delete("order", &key).unwrap(), DeleteOutcome::Deleted);
        assert!(service.fetch_all("order").unwrap().is_empty());
    }

    #[test]
    fn test_range_query() {
        let service = service();
        for (id, price) in [(1, 300), (2, 50), (3, 120), (4, 80)] {
            service
                .insert(&Service::new(id, format!("Service_{}", id), price).into())
                .unwrap();
        }

        let found = service.fetch_in_range("Service", "price", 60, 300, "price").unwrap();
        let ids: Vec<String> = found.iter().map(|r| r.key().to_string()).collect();
        assert_eq!(ids, vec!["4", "3", "1"]);

        assert!(service
            .fetch_in_range("Service", "price", 300, 60, "price")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_range_and_pattern_field_checks() {
        let service = service();

        assert!(matches!(
            service.fetch_in_range("Service", "name", 1, 2, "price"),
            Err(AppError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            service.fetch_by_pattern("Service", "price", "5", "price"),
            Err(AppError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            service.fetch_in_range("Service", "weight", 1, 2, "price"),
            Err(AppError::UnknownField { .. })
        ));
        assert!(matches!(
            service.fetch_by_pattern("Service", "name", "x", "weight"),
            Err(AppError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_pattern_search_ignores_case() {
        let service = service();
        service.insert(&User::new(1, "Олена", "1").into()).unwrap();
        service.insert(&User::new(2, "Ivan", "2").into()).unwrap();
        service.insert(&User::new(3, "ОЛЕГ", "3").into()).unwrap();

        let found = service.fetch_by_pattern("User", "name", "оле", "user_id").unwrap();
        let ids: Vec<String> = found.iter().map(|r| r.key().to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_generate_continues_keys() {
        let service = service();
        service.insert(&User::new(10, "Ann", "1").into()).unwrap();

        let generated = service.generate("User", 3).unwrap();
        let ids: Vec<String> = generated.iter().map(|r| r.key().to_string()).collect();
        assert_eq!(ids, vec!["11", "12", "13"]);
        assert_eq!(service.fetch_all("User").unwrap().len(), 4);
    }

    #[test]
    fn test_generate_rooms_without_room_types() {
        let service = service();
        assert!(matches!(
            service.generate("Room", 5),
            Err(AppError::PreconditionNotMet(_))
        ));
        assert!(service.fetch_all("Room").unwrap().is_empty());
    }

    #[test]
    fn test_generate_stops_at_largest_key() {
        let service = service();
        service.insert(&User::new(i64::MAX, "Last", "1").into()).unwrap();

        assert!(matches!(
            service.generate("user", 1),
            Err(AppError::PreconditionNotMet(_))
        ));
        assert_eq!(service.fetch_all("user").unwrap().len(), 1);
    }

    #[test]
    fn test_generate_rejects_count_beyond_key_range() {
        let service = service();
        assert!(matches!(
            service.generate("user", usize::MAX),
            Err(AppError::InvalidValue { field, .. }) if field == "count"
        ));
        assert!(service.fetch_all("user").unwrap().is_empty());
    }

    #[test]
    fn test_generated_orders_are_stored() {
        let service = service();
        let mut rng = StdRng::seed_from_u64(42);
        service.generator().generate_users(3, &mut rng).unwrap();
        service.generator().generate_services(2, &mut rng).unwrap();

        let orders = service
            .generator()
            .generate_with(EntityKind::ServiceOrder, 25, &mut rng)
            .unwrap();
        assert_eq!(orders.len(), 25);
        assert_eq!(service.fetch_all("ServiceOrder").unwrap().len(), 25);
        assert_eq!(service.stats().unwrap().rows(EntityKind::ServiceOrder), 25);
    }

    #[test]
    fn test_stats_counts_rows() {
        let service = service();
        seeded_rooms(&service);

        let stats = service.stats().unwrap();
        assert_eq!(stats.rows(EntityKind::RoomType), 1);
        assert_eq!(stats.rows(EntityKind::Room), 1);
        assert_eq!(stats.rows(EntityKind::User), 0);
        assert!(stats.size_bytes > 0);
    }
}
