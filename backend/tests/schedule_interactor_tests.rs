//! Integration tests for ScheduleInteractor against the in-memory repository.

mod support;

use attendance_plan::db::repositories::LocalRepository;
use attendance_plan::db::repository::ScheduleRepository;
use attendance_plan::models::{format_date, Order, ScheduleId, ScheduleType, UserId};
use attendance_plan::services::{ScheduleError, ScheduleInteractor, ScheduleUpdate};

use support::{custom_schedule, master_schedule};

fn update_for(id: &ScheduleId, name: &str, starts_at: &str, order: u32) -> ScheduleUpdate {
    ScheduleUpdate {
        id: id.clone(),
        name: name.to_string(),
        starts_at: starts_at.to_string(),
        ends_at: starts_at.to_string(),
        color: "crimson".to_string(),
        schedule_type: ScheduleType::Custom,
        order: Order::new(order),
    }
}

// =============================================================================
// Order assignment
// =============================================================================

#[tokio::test]
async fn test_create_without_order_follows_existing_siblings() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);

    interactor
        .create(custom_schedule("u1", "first", "2024-04-01 09:00:00", Some(1)))
        .await
        .unwrap();
    interactor
        .create(custom_schedule("u1", "second", "2024-04-01 11:00:00", Some(2)))
        .await
        .unwrap();

    let third = interactor
        .create(custom_schedule("u1", "third", "2024-04-01 15:00:00", None))
        .await
        .unwrap();
    assert_eq!(third.order, Order::new(3));
}

#[tokio::test]
async fn test_auto_order_scoped_to_owner_date_and_type() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);

    interactor
        .create(custom_schedule("u1", "same day", "2024-04-01 09:00:00", Some(5)))
        .await
        .unwrap();
    interactor
        .create(custom_schedule("u2", "other owner", "2024-04-02 09:00:00", Some(9)))
        .await
        .unwrap();
    interactor
        .create(master_schedule("u1", "other type", "2024-04-02 09:00:00", Some(4)))
        .await
        .unwrap();
    interactor
        .create(custom_schedule("u1", "previous day", "2024-04-01 23:59:59", Some(8)))
        .await
        .unwrap();

    let created = interactor
        .create(custom_schedule("u1", "new", "2024-04-02 00:00:00", None))
        .await
        .unwrap();
    assert_eq!(created.order, Order::new(1));
}

#[tokio::test]
async fn test_auto_order_ignores_time_of_day() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);

    interactor
        .create(custom_schedule("u1", "late", "2024-04-01 23:00:00", Some(2)))
        .await
        .unwrap();
    let early = interactor
        .create(custom_schedule("u1", "early", "2024-04-01 00:00:01", None))
        .await
        .unwrap();
    assert_eq!(early.order, Order::new(3));
}

#[tokio::test]
async fn test_created_schedule_is_persisted() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);

    let created = interactor
        .create(custom_schedule("u1", "Databases", "2024-04-03 10:00:00", None))
        .await
        .unwrap();

    let stored = repo.get_schedule(&created.id).await.unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.created_at, stored.updated_at);
    assert_eq!(stored.owner_id, UserId::new("u1"));
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_for_owner_without_schedules() {
    let repo = LocalRepository::new();
    let view = ScheduleInteractor::new(&repo)
        .get_list(&UserId::new("nobody"))
        .await
        .unwrap();

    assert!(view.master_schedules.is_empty());
    assert!(view.custom_schedules.is_empty());

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["master_schedules"], serde_json::json!([]));
    assert_eq!(json["custom_schedules"], serde_json::json!([]));
}

#[tokio::test]
async fn test_list_groups_by_day_and_type() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);

    for input in [
        custom_schedule("u1", "Thu b", "2024-04-04 14:00:00", Some(2)),
        master_schedule("u1", "Holiday", "2024-04-03 00:00:00", None),
        custom_schedule("u1", "Wed", "2024-04-03 09:00:00", None),
        custom_schedule("u1", "Thu a", "2024-04-04 09:00:00", Some(1)),
        custom_schedule("someone-else", "Hidden", "2024-04-03 09:00:00", None),
    ] {
        interactor.create(input).await.unwrap();
    }

    let view = interactor.get_list(&UserId::new("u1")).await.unwrap();

    assert_eq!(view.master_schedules.len(), 1);
    assert_eq!(format_date(&view.master_schedules[0].date), "2024-04-03");

    let days: Vec<String> = view
        .custom_schedules
        .iter()
        .map(|item| format_date(&item.date))
        .collect();
    assert_eq!(days, vec!["2024-04-03", "2024-04-04"]);

    let thursday: Vec<&str> = view.custom_schedules[1]
        .schedules
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(thursday, vec!["Thu a", "Thu b"]);
}

#[tokio::test]
async fn test_list_storage_failure() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);
    let err = ScheduleInteractor::new(&repo)
        .get_list(&UserId::new("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InternalStorage(_)));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_identity() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let created = interactor
        .create(custom_schedule("u1", "Draft", "2024-04-01 09:00:00", None))
        .await
        .unwrap();

    let updated = interactor
        .update(update_for(&created.id, "Final", "2024-04-05 09:00:00", 0))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner_id, created.owner_id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.name, "Final");
    assert_eq!(updated.color, "crimson");
    // Update stores the order as given, even 0
    assert_eq!(updated.order, Order::UNASSIGNED);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_unknown_schedule() {
    let repo = LocalRepository::new();
    let err = ScheduleInteractor::new(&repo)
        .update(update_for(
            &ScheduleId::new("missing"),
            "x",
            "2024-04-01 09:00:00",
            1,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::NotFound { entity: "schedule", .. }));
}

#[tokio::test]
async fn test_update_bad_format_checked_before_lookup() {
    let repo = LocalRepository::new();
    let err = ScheduleInteractor::new(&repo)
        .update(update_for(&ScheduleId::new("missing"), "x", "01/04/2024", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::FormatInvalid { field: "starts_at" }));
}

#[tokio::test]
async fn test_update_owned_by_other_user() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let created = interactor
        .create(custom_schedule("u1", "Mine", "2024-04-01 09:00:00", None))
        .await
        .unwrap();

    let err = interactor
        .update_owned(
            update_for(&created.id, "Stolen", "2024-04-01 09:00:00", 1),
            &UserId::new("u2"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Forbidden));
    assert_eq!(repo.get_schedule(&created.id).await.unwrap().name, "Mine");
}

#[tokio::test]
async fn test_update_write_failure() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let created = interactor
        .create(custom_schedule("u1", "Draft", "2024-04-01 09:00:00", None))
        .await
        .unwrap();

    repo.set_writable(false);
    let err = interactor
        .update(update_for(&created.id, "Final", "2024-04-01 09:00:00", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InternalStorage(_)));
}

// =============================================================================
// Bulk
// =============================================================================

#[tokio::test]
async fn test_bulk_create_returns_items_in_input_order() {
    let repo = LocalRepository::new();
    let created = ScheduleInteractor::new(&repo)
        .create_bulk(vec![
            custom_schedule("u1", "a", "2024-04-01 09:00:00", None),
            custom_schedule("u1", "b", "2024-04-01 10:00:00", None),
            custom_schedule("u1", "c", "2024-04-02 10:00:00", None),
        ])
        .await
        .unwrap();

    let summary: Vec<(&str, u32)> = created
        .iter()
        .map(|s| (s.name.as_str(), s.order.value()))
        .collect();
    assert_eq!(summary, vec![("a", 1), ("b", 2), ("c", 1)]);
}

#[tokio::test]
async fn test_bulk_create_stops_at_first_failure() {
    let repo = LocalRepository::new();
    let err = ScheduleInteractor::new(&repo)
        .create_bulk(vec![
            custom_schedule("u1", "ok", "2024-04-01 09:00:00", None),
            custom_schedule("u1", "broken", "2024-04-01", None),
            custom_schedule("u1", "never", "2024-04-01 11:00:00", None),
        ])
        .await
        .unwrap_err();

    assert_eq!(err.bulk_index(), Some(1));
    assert!(matches!(
        err.root_cause(),
        ScheduleError::FormatInvalid { field: "starts_at" }
    ));
    // No rollback: the first item stays
    assert_eq!(repo.schedule_count(), 1);
}

#[tokio::test]
async fn test_bulk_update_unknown_item_keeps_earlier_writes() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let existing = interactor
        .create(custom_schedule("u1", "Before", "2024-04-01 09:00:00", None))
        .await
        .unwrap();
    let untouched = interactor
        .create(custom_schedule("u1", "Third", "2024-04-01 13:00:00", None))
        .await
        .unwrap();

    let err = interactor
        .update_bulk(vec![
            update_for(&existing.id, "After", "2024-04-01 09:00:00", 4),
            update_for(&ScheduleId::new("ghost"), "Nope", "2024-04-01 09:00:00", 1),
            update_for(&untouched.id, "Third v2", "2024-04-02 13:00:00", 7),
        ])
        .await
        .unwrap_err();

    match &err {
        ScheduleError::BulkAborted { index, cause } => {
            assert_eq!(*index, 1);
            assert!(matches!(**cause, ScheduleError::NotFound { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = repo.get_schedule(&existing.id).await.unwrap();
    assert_eq!(stored.name, "After");
    assert_eq!(stored.order, Order::new(4));

    // processing stopped at the unknown item
    let third = repo.get_schedule(&untouched.id).await.unwrap();
    assert_eq!(third, untouched);
    assert_eq!(third.order, Order::new(2));
}

#[tokio::test]
async fn test_bulk_update_owned_rejects_foreign_item() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let mine = interactor
        .create(custom_schedule("u1", "Mine", "2024-04-01 09:00:00", None))
        .await
        .unwrap();
    let theirs = interactor
        .create(custom_schedule("u2", "Theirs", "2024-04-01 09:00:00", None))
        .await
        .unwrap();

    let err = interactor
        .update_bulk_owned(
            vec![
                update_for(&mine.id, "Mine v2", "2024-04-01 09:00:00", 1),
                update_for(&theirs.id, "Hijack", "2024-04-01 09:00:00", 1),
            ],
            &UserId::new("u1"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.bulk_index(), Some(1));
    assert!(matches!(err.root_cause(), ScheduleError::Forbidden));
    assert_eq!(repo.get_schedule(&theirs.id).await.unwrap().name, "Theirs");
}

#[tokio::test]
async fn test_bulk_with_no_items() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    assert!(interactor.create_bulk(vec![]).await.unwrap().is_empty());
    assert!(interactor.update_bulk(vec![]).await.unwrap().is_empty());
}

// =============================================================================
// Get / Delete
// =============================================================================

#[tokio::test]
async fn test_get_one_missing() {
    let repo = LocalRepository::new();
    let err = ScheduleInteractor::new(&repo)
        .get_one(&ScheduleId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::NotFound { .. }));
}

#[tokio::test]
async fn test_get_one_storage_failure() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);
    let err = ScheduleInteractor::new(&repo)
        .get_one(&ScheduleId::new("any"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InternalStorage(_)));
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let created = interactor
        .create(custom_schedule("u1", "Temp", "2024-04-01 09:00:00", None))
        .await
        .unwrap();

    interactor.delete(&created.id).await.unwrap();
    assert!(!repo.has_schedule(&created.id));

    let err = interactor.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_owned_by_other_user() {
    let repo = LocalRepository::new();
    let interactor = ScheduleInteractor::new(&repo);
    let created = interactor
        .create(custom_schedule("u1", "Keep", "2024-04-01 09:00:00", None))
        .await
        .unwrap();

    let err = interactor
        .delete_owned(&created.id, &UserId::new("u2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Forbidden));
    assert!(repo.has_schedule(&created.id));
}

#[tokio::test]
async fn test_create_write_failure() {
    let repo = LocalRepository::new();
    repo.set_writable(false);
    let err = ScheduleInteractor::new(&repo)
        .create(custom_schedule("u1", "x", "2024-04-01 09:00:00", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InternalStorage(_)));
}
