mod common;

use common::{FakeRemote, local_studio, remote_studio, seed};
use rclassbook::core::notify::{ChangeBridge, ChangeHandlers};
use rclassbook::models::day::Day;
use rclassbook::models::room::Room;
use rclassbook::models::time_slot::TimeSlot;
use rclassbook::persistence::GatewayMode;
use rclassbook::persistence::memory::MemoryStorage;
use rclassbook::persistence::remote::{ChangeHandler, Collection, ScheduleRecord};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counter() -> (Arc<AtomicUsize>, ChangeHandler) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let handler: ChangeHandler = Arc::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (count, handler)
}

#[test]
fn test_bridge_is_noop_in_local_mode() {
    let storage = MemoryStorage::new();
    let mut studio = local_studio(&storage);

    let handle = ChangeBridge::subscribe(studio.gateway_mut(), true, ChangeHandlers::uniform(|| {}));
    assert!(!handle.is_active());
    assert!(handle.subscribed().is_empty());
    assert!(handle.failed().is_empty());
}

#[test]
fn test_bridge_is_noop_when_realtime_disabled() {
    let storage = MemoryStorage::new();
    let remote = FakeRemote::new();
    let mut studio = remote_studio(&storage, &remote);

    let handle = ChangeBridge::subscribe(studio.gateway_mut(), false, ChangeHandlers::uniform(|| {}));
    assert!(!handle.is_active());
    assert_eq!(remote.subscriber_count(), 0);
}

#[test]
fn test_bridge_is_noop_after_fallback() {
    let storage = MemoryStorage::new();
    let remote = FakeRemote::new();
    remote.fail_everything(true);
    let mut studio = remote_studio(&storage, &remote);
    assert_eq!(studio.gateway_mode(), GatewayMode::Local);
    remote.fail_everything(false);

    let handle = ChangeBridge::subscribe(studio.gateway_mut(), true, ChangeHandlers::uniform(|| {}));
    assert!(!handle.is_active());
    assert_eq!(remote.subscriber_count(), 0);
}

#[test]
fn test_each_collection_reaches_its_handler() {
    let storage = MemoryStorage::new();
    let remote = FakeRemote::new();
    let mut studio = remote_studio(&storage, &remote);

    let (schedule_hits, on_schedule) = counter();
    let (teacher_hits, on_teachers) = counter();
    let (class_hits, on_classes) = counter();
    let handle = ChangeBridge::subscribe(
        studio.gateway_mut(),
        true,
        ChangeHandlers::new(on_schedule, on_teachers, on_classes),
    );
    assert!(handle.is_active());
    assert_eq!(handle.subscribed(), Collection::ALL.to_vec());
    assert_eq!(remote.subscriber_count(), 3);

    remote.emit(Collection::Schedule);
    remote.emit(Collection::Schedule);
    remote.emit(Collection::Teachers);

    // redundant notifications are delivered as-is
    assert_eq!(schedule_hits.load(Ordering::SeqCst), 2);
    assert_eq!(teacher_hits.load(Ordering::SeqCst), 1);
    assert_eq!(class_hits.load(Ordering::SeqCst), 0);

    handle.unsubscribe();
}

#[test]
fn test_notification_driven_reload_sees_other_client() {
    let storage = MemoryStorage::new();
    let remote = FakeRemote::new();
    let mut studio = remote_studio(&storage, &remote);
    seed(&mut studio);

    let (hits, handler) = counter();
    let handlers = ChangeHandlers::new(handler.clone(), handler.clone(), handler);
    let _handle = ChangeBridge::subscribe(studio.gateway_mut(), true, handlers);

    let at = TimeSlot::parse("7:00 PM").expect("slot");
    remote.insert_row_as_other_client(ScheduleRecord {
        id: None,
        day: "Saturday".into(),
        time: at.label(),
        room: Room::Movement,
        class_id: remote.class_id("Power").expect("power"),
        teacher_id: remote.teacher_id("Ana").expect("ana"),
        session_type: Some("Ladies Only".into()),
        start_date: None,
        duration: Some(60),
    });
    remote.emit(Collection::Schedule);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(studio.entry(Room::Movement, Day::Saturday, at).is_none());

    studio.reload().expect("reload");
    let entry = studio
        .entry(Room::Movement, Day::Saturday, at)
        .expect("visible after reload");
    assert_eq!(entry.duration_minutes, 60);
    assert!(entry.is_ladies_only());
}

#[test]
fn test_failed_subscription_is_logged_without_fallback() {
    let storage = MemoryStorage::new();
    let remote = FakeRemote::new();
    remote.fail_subscriptions(true);
    let mut studio = remote_studio(&storage, &remote);

    let handle = ChangeBridge::subscribe(studio.gateway_mut(), true, ChangeHandlers::uniform(|| {}));
    assert!(!handle.is_active());
    assert_eq!(handle.failed(), &Collection::ALL[..]);
    assert_eq!(studio.gateway_mode(), GatewayMode::Remote);

    let failures = storage
        .log_entries()
        .into_iter()
        .filter(|(op, _, _)| op == "subscribe_failed")
        .count();
    assert_eq!(failures, 3);
}
