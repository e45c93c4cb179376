use domain::{
    CongestionSample, FeedbackEntry, LatLng, OpenStatusObservation, PublicEvent,
    RegisteredFacility, SensorReading,
};
use finder_storage::{
    CongestionStore, EventStore, FacilityStore, FeedbackStore, InMemoryCongestionStore,
    InMemoryEventStore, InMemoryFacilityStore, InMemoryFeedbackStore, InMemoryOpenStatusStore,
    InMemorySensorStore, OpenStatusStore, SensorStore,
};

fn observation(place_id: &str, is_open: bool, ts_ms: i64) -> OpenStatusObservation {
    OpenStatusObservation {
        place_id: place_id.to_string(),
        facility_name: Some("Central Library".to_string()),
        is_open,
        ts_ms,
    }
}

#[tokio::test]
async fn facility_upsert_and_exists() {
    let store = InMemoryFacilityStore::new();
    assert!(!store.facility_exists("p-1").await.expect("exists"));

    store
        .upsert_facility(RegisteredFacility {
            place_id: "p-1".to_string(),
            name: "Central Library".to_string(),
            types: vec!["library".to_string()],
            location: LatLng::new(37.5, 127.0),
        })
        .await
        .expect("upsert");
    assert!(store.facility_exists("p-1").await.expect("exists"));
    assert!(!store.facility_exists("p-2").await.expect("exists"));
}

#[tokio::test]
async fn facility_rejects_invalid_id() {
    let store = InMemoryFacilityStore::new();
    let result = store
        .upsert_facility(RegisteredFacility {
            place_id: "".to_string(),
            name: "x".to_string(),
            types: Vec::new(),
            location: LatLng::new(0.0, 0.0),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn open_status_log_is_sorted_by_time() {
    let store = InMemoryOpenStatusStore::new();
    store
        .append_status(observation("p-1", true, 3000))
        .await
        .expect("append");
    store
        .append_status(observation("p-2", false, 1000))
        .await
        .expect("append");
    store
        .append_status(observation("p-1", false, 2000))
        .await
        .expect("append");

    let items = store.list_status().await.expect("list");
    let stamps: Vec<i64> = items.iter().map(|item| item.ts_ms).collect();
    assert_eq!(stamps, vec![1000, 2000, 3000]);
    assert_eq!(items[0].place_id, "p-2");
}

#[tokio::test]
async fn open_status_keeps_every_observation() {
    let store = InMemoryOpenStatusStore::new();
    for _ in 0..3 {
        store
            .append_status(observation("p-1", true, 1000))
            .await
            .expect("append");
    }
    let items = store.list_status().await.expect("list");
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn congestion_samples_grouped_by_facility() {
    let store = InMemoryCongestionStore::new();
    store
        .append_sample(
            "p-1",
            CongestionSample {
                congestion_level: 2.0,
                ts_ms: 1,
            },
        )
        .await
        .expect("append");
    store
        .append_sample(
            "p-1",
            CongestionSample {
                congestion_level: 4.0,
                ts_ms: 2,
            },
        )
        .await
        .expect("append");
    store
        .append_sample(
            "p-2",
            CongestionSample {
                congestion_level: 1.0,
                ts_ms: 3,
            },
        )
        .await
        .expect("append");

    let samples = store.list_samples("p-1").await.expect("list");
    assert_eq!(samples.len(), 2);
    assert!(store.list_samples("p-9").await.expect("list").is_empty());

    let all = store.list_all_samples().await.expect("list all");
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("p-2").map(Vec::len), Some(1));
}

#[tokio::test]
async fn feedback_appends_in_order() {
    let store = InMemoryFeedbackStore::new();
    store
        .append_feedback(
            "p-1",
            FeedbackEntry {
                rating: 5,
                review: "great".to_string(),
                ts_ms: 1,
            },
        )
        .await
        .expect("append");
    store
        .append_feedback(
            "p-1",
            FeedbackEntry {
                rating: 3,
                review: "ok".to_string(),
                ts_ms: 2,
            },
        )
        .await
        .expect("append");

    let items = store.list_feedback("p-1").await.expect("list");
    let ratings: Vec<u8> = items.iter().map(|item| item.rating).collect();
    assert_eq!(ratings, vec![5, 3]);
}

#[tokio::test]
async fn event_duplicate_id_rejected() {
    let store = InMemoryEventStore::new();
    let event = PublicEvent {
        event_id: "e-1".to_string(),
        title: "Book fair".to_string(),
        description: "Annual".to_string(),
        date: "2024-05-01".to_string(),
        location: "Hall".to_string(),
    };
    store.create_event(event.clone()).await.expect("create");
    assert!(store.create_event(event).await.is_err());
    assert_eq!(store.list_events().await.expect("list").len(), 1);
}

#[tokio::test]
async fn sensor_recent_keeps_tail() {
    let store = InMemorySensorStore::new();
    for index in 0..5 {
        store
            .push_reading(SensorReading {
                payload: format!("{{\"n\":{}}}", index),
                received_at_ms: index,
            })
            .await
            .expect("push");
    }

    let recent = store.recent_readings(2).await.expect("recent");
    let stamps: Vec<i64> = recent.iter().map(|item| item.received_at_ms).collect();
    assert_eq!(stamps, vec![3, 4]);

    let all = store.recent_readings(100).await.expect("recent");
    assert_eq!(all.len(), 5);
    assert!(store.recent_readings(0).await.expect("recent").is_empty());
}
