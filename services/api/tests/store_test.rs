mod common;

use api_lib::adapters::DbAdapter;
use chrono::NaiveDate;
use common::{memory_db, memory_pool, PARIS_ITINERARY};
use trip_planner_core::domain::{
    NewPackingItem, NewTrip, PackingCategory, TripPurpose, TripRequest,
};
use trip_planner_core::ports::{DatabaseService, PortError};
use trip_planner_core::search::{SavedTripQuery, TripField};

fn new_trip(location: &str, purpose: TripPurpose, start_day: u32) -> NewTrip {
    NewTrip {
        request: TripRequest {
            location: location.to_string(),
            purpose,
            start_date: NaiveDate::from_ymd_opt(2024, 7, start_day).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, start_day + 5).unwrap(),
        },
        itinerary_text: PARIS_ITINERARY.to_string(),
    }
}

#[tokio::test]
async fn test_insert_and_fetch_trip() {
    let db = memory_db().await;
    assert_eq!(db.latest_trip().await.unwrap(), None);

    let first = db
        .insert_trip(&new_trip("Paris", TripPurpose::Leisure, 1))
        .await
        .unwrap();
    let second = db
        .insert_trip(&new_trip("Tokyo", TripPurpose::Business, 10))
        .await
        .unwrap();

    assert!(!first.saved);
    assert_eq!(first.location, "Paris");
    assert_eq!(first.itinerary_text, PARIS_ITINERARY);
    assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());

    let latest = db.latest_trip().await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.purpose, TripPurpose::Business);

    assert_eq!(db.get_trip(first.id).await.unwrap(), first);
    assert!(matches!(
        db.get_trip(9999).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_duplicate_locations_allowed() {
    let db = memory_db().await;
    let a = db
        .insert_trip(&new_trip("Paris", TripPurpose::Solo, 1))
        .await
        .unwrap();
    let b = db
        .insert_trip(&new_trip("Paris", TripPurpose::Family, 2))
        .await
        .unwrap();
    assert_ne!(a.id, b.id);

    db.mark_trip_saved(b.id).await.unwrap();
    assert!(!db.get_trip(a.id).await.unwrap().saved);
    assert!(db.get_trip(b.id).await.unwrap().saved);
}

#[tokio::test]
async fn test_saved_search_filters_by_location() {
    let db = memory_db().await;
    let paris = db
        .insert_trip(&new_trip("Paris", TripPurpose::Leisure, 1))
        .await
        .unwrap();
    let tokyo = db
        .insert_trip(&new_trip("Tokyo", TripPurpose::Business, 10))
        .await
        .unwrap();
    let unsaved = db
        .insert_trip(&new_trip("Paris", TripPurpose::Solo, 20))
        .await
        .unwrap();
    db.mark_trip_saved(paris.id).await.unwrap();
    db.mark_trip_saved(tokyo.id).await.unwrap();

    let query = SavedTripQuery {
        filter: TripField::Location,
        text: Some("Paris".to_string()),
        ..Default::default()
    };
    let found = db.search_saved_trips(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, paris.id);
    assert!(found.iter().all(|t| t.id != unsaved.id));

    let all_saved = db
        .search_saved_trips(&SavedTripQuery::default())
        .await
        .unwrap();
    assert_eq!(all_saved.len(), 2);
}

#[tokio::test]
async fn test_saved_search_on_other_columns() {
    let db = memory_db().await;
    let paris = db
        .insert_trip(&new_trip("Paris", TripPurpose::Leisure, 1))
        .await
        .unwrap();
    let tokyo = db
        .insert_trip(&new_trip("Tokyo", TripPurpose::Business, 10))
        .await
        .unwrap();
    db.mark_trip_saved(paris.id).await.unwrap();
    db.mark_trip_saved(tokyo.id).await.unwrap();

    let by_purpose = SavedTripQuery {
        filter: TripField::Purpose,
        text: Some("busi".to_string()),
        ..Default::default()
    };
    let found = db.search_saved_trips(&by_purpose).await.unwrap();
    assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![tokyo.id]);

    let by_start = SavedTripQuery {
        filter: TripField::StartDate,
        text: Some("2024-07-01".to_string()),
        ..Default::default()
    };
    let found = db.search_saved_trips(&by_start).await.unwrap();
    assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![paris.id]);
}

#[tokio::test]
async fn test_legacy_table_gains_saved_column() {
    let trips = memory_pool().await;
    sqlx::query(
        "CREATE TABLE trip_plans
         (location TEXT, purpose TEXT, start_date DATE, end_date DATE, itinerary TEXT)",
    )
    .execute(&trips)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO trip_plans (location, purpose, start_date, end_date, itinerary)
         VALUES ('Lisbon', 'Solo', '2024-03-01', '2024-03-06', 'Day 1: Alfama\nTram 28')",
    )
    .execute(&trips)
    .await
    .unwrap();

    let db = DbAdapter::new(trips.clone(), memory_pool().await);
    let trip = db.latest_trip().await.unwrap().unwrap();
    assert_eq!(trip.location, "Lisbon");
    assert!(!trip.saved);

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('trip_plans')")
        .fetch_all(&trips)
        .await
        .unwrap();
    assert!(columns.iter().any(|c| c == "saved"));

    // A second read must not try to add the column again.
    db.get_trip(trip.id).await.unwrap();
    db.mark_trip_saved(trip.id).await.unwrap();
    assert!(db.get_trip(trip.id).await.unwrap().saved);
}

#[tokio::test]
async fn test_packing_item_lifecycle() {
    let db = memory_db().await;
    let passport = db
        .add_packing_item(&NewPackingItem::new("Passport", PackingCategory::Other, 1).unwrap())
        .await
        .unwrap();
    let socks = db
        .add_packing_item(&NewPackingItem::new("Socks", PackingCategory::Clothing, 4).unwrap())
        .await
        .unwrap();

    assert!(!passport.packed);
    assert_eq!(passport.category, PackingCategory::Other);
    assert_eq!(passport.quantity, 1);
    assert_eq!(db.list_packing_items().await.unwrap().len(), 2);

    let packed = db.set_item_packed(passport.id, true).await.unwrap();
    assert!(packed.packed);

    let items = db.list_packing_items().await.unwrap();
    let socks_now = items.iter().find(|i| i.id == socks.id).unwrap();
    assert_eq!(socks_now, &socks);

    db.delete_packing_item(socks.id).await.unwrap();
    let items = db.list_packing_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, passport.id);

    assert!(matches!(
        db.delete_packing_item(socks.id).await,
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(
        db.set_item_packed(socks.id, true).await,
        Err(PortError::NotFound(_))
    ));
}
