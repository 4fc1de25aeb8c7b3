use std::path::PathBuf;
use std::sync::Arc;

use frontdesk::config::EngineConfig;
use frontdesk::model::{BookingStatus, Day, Event, PaymentStatus, day_of, now_ms};
use frontdesk::notify::NotifyHub;
use frontdesk::{Engine, EngineError};
use ulid::Ulid;

fn test_wal_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("frontdesk_test_flow");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn open_engine(path: PathBuf) -> Engine {
    Engine::new(path, Arc::new(NotifyHub::new()), EngineConfig::default()).unwrap()
}

fn today() -> Day {
    day_of(now_ms())
}

/// The whole lifecycle at rate 100/night: quote 3 nights → 300, commit,
/// cancel within the window → 270 refund and a free room.
#[tokio::test]
async fn quote_commit_cancel_lifecycle() {
    let engine = open_engine(test_wal_path("lifecycle.wal"));

    let room = Ulid::new();
    let guest = Ulid::new();
    engine
        .register_room(room, Some("Ocean View 731".into()), 100)
        .await
        .unwrap();

    let check_in = today() + 30;
    let check_out = check_in + 3;

    let quote = engine.quote(room, check_in, check_out).await.unwrap();
    assert_eq!(quote.nights, 3);
    assert_eq!(quote.total_amount, 300);

    let booking = engine
        .commit_booking(
            Ulid::new(),
            room,
            guest,
            check_in,
            check_out,
            "CARD",
            quote.total_amount,
        )
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_amount, 300);
    assert!(!engine.get_room(room).await.unwrap().available);

    let payment = engine.payment_for_booking(booking.id).unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, 300);

    let cancelled = engine.cancel_booking(booking.id, guest).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let refunded = engine.payment_for_booking(booking.id).unwrap();
    assert_eq!(refunded.status, PaymentStatus::Refunded);
    assert_eq!(refunded.amount, 270);
    assert_eq!(refunded.original_amount, 300);
    assert!(engine.get_room(room).await.unwrap().available);
}

/// Two guests race for the same dates: exactly one booking is created,
/// the other request fails with Overlap, whatever the interleaving.
#[tokio::test]
async fn racing_guests_get_one_booking() {
    let engine = Arc::new(open_engine(test_wal_path("race.wal")));

    let room = Ulid::new();
    engine.register_room(room, None, 100).await.unwrap();

    let check_in = today() + 14;
    let check_out = check_in + 4;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let eng = engine.clone();
        handles.push(tokio::spawn(async move {
            eng.commit_booking(
                Ulid::new(),
                room,
                Ulid::new(),
                check_in,
                check_out,
                "CARD",
                400,
            )
            .await
        }));
    }

    let mut wins = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => wins += 1,
            Err(EngineError::Overlap(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(engine.active_bookings(room, None).await.unwrap().len(), 1);
}

/// Restarting the engine replays the ledger: bookings, payments, and the
/// derived availability flag all come back.
#[tokio::test]
async fn restart_replays_ledger() {
    let path = test_wal_path("restart.wal");
    let room = Ulid::new();
    let guest = Ulid::new();
    let check_in = today() + 30;

    let booking_id = {
        let engine = open_engine(path.clone());
        engine
            .register_room(room, Some("Room 101".into()), 120)
            .await
            .unwrap();
        let booking = engine
            .commit_booking(
                Ulid::new(),
                room,
                guest,
                check_in,
                check_in + 2,
                "TRANSFER",
                240,
            )
            .await
            .unwrap();
        booking.id
    };

    let engine = open_engine(path);
    let stored = engine.get_booking(booking_id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
    assert_eq!(stored.total_amount, 240);
    assert!(!engine.get_room(room).await.unwrap().available);

    // And the booking is still cancellable through the rebuilt index
    let cancelled = engine.cancel_booking(booking_id, guest).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(engine.get_room(room).await.unwrap().available);
}

/// The change feed delivers commit and cancel events to a subscriber.
#[tokio::test]
async fn change_feed_delivers_booking_events() {
    let engine = open_engine(test_wal_path("feed.wal"));

    let room = Ulid::new();
    let guest = Ulid::new();
    engine.register_room(room, None, 100).await.unwrap();

    let mut rx = engine.notify.subscribe(room);

    let check_in = today() + 7;
    let booking = engine
        .commit_booking(Ulid::new(), room, guest, check_in, check_in + 1, "CARD", 100)
        .await
        .unwrap();
    engine.cancel_booking(booking.id, guest).await.unwrap();

    assert!(matches!(
        rx.recv().await.unwrap(),
        Event::BookingCommitted { .. }
    ));
    assert!(matches!(
        rx.recv().await.unwrap(),
        Event::BookingCancelled { refund: 90, .. }
    ));
}
