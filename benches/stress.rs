use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use frontdesk::config::EngineConfig;
use frontdesk::model::{Day, day_of, now_ms};
use frontdesk::notify::NotifyHub;
use frontdesk::{Engine, EngineError};
use ulid::Ulid;

const ROOMS: usize = 50;
const STAYS_PER_ROOM: i32 = 20;
const RACERS: usize = 32;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.2}ms, p50={:.2}ms, p95={:.2}ms, p99={:.2}ms, max={:.2}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies.last().unwrap().as_secs_f64() * 1000.0,
    );
}

fn bench_wal_path() -> PathBuf {
    let dir = std::env::temp_dir().join("frontdesk_bench");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stress.wal");
    let _ = std::fs::remove_file(&path);
    path
}

#[tokio::main]
async fn main() {
    frontdesk::observability::init_tracing();

    let engine = Arc::new(
        Engine::new(
            bench_wal_path(),
            Arc::new(NotifyHub::new()),
            EngineConfig::default(),
        )
        .unwrap(),
    );

    let mut rooms = Vec::with_capacity(ROOMS);
    for i in 0..ROOMS {
        let id = Ulid::new();
        engine
            .register_room(id, Some(format!("Room {i}")), 100 + i as i64)
            .await
            .unwrap();
        rooms.push(id);
    }

    let base: Day = day_of(now_ms()) + 7;

    println!("frontdesk stress — {ROOMS} rooms");

    // Phase 1: disjoint commits across all rooms concurrently
    let mut handles = Vec::new();
    for &room in &rooms {
        let eng = engine.clone();
        handles.push(tokio::spawn(async move {
            let mut latencies = Vec::with_capacity(STAYS_PER_ROOM as usize);
            for stay in 0..STAYS_PER_ROOM {
                let check_in = base + stay * 4;
                let start = Instant::now();
                eng.commit_booking(
                    Ulid::new(),
                    room,
                    Ulid::new(),
                    check_in,
                    check_in + 3,
                    "CARD",
                    300,
                )
                .await
                .expect("disjoint commit failed");
                latencies.push(start.elapsed());
            }
            latencies
        }));
    }
    let mut commit_latencies = Vec::new();
    for h in handles {
        commit_latencies.extend(h.await.unwrap());
    }
    print_latency("commit (disjoint)", &mut commit_latencies);

    // Phase 2: quote storm against fully booked rooms
    let mut handles = Vec::new();
    for &room in &rooms {
        let eng = engine.clone();
        handles.push(tokio::spawn(async move {
            let mut latencies = Vec::with_capacity(STAYS_PER_ROOM as usize);
            for stay in 0..STAYS_PER_ROOM {
                // The gap day after each stay is free
                let free_day = base + stay * 4 + 3;
                let start = Instant::now();
                eng.quote(room, free_day, free_day + 1)
                    .await
                    .expect("gap-day quote failed");
                latencies.push(start.elapsed());
            }
            latencies
        }));
    }
    let mut quote_latencies = Vec::new();
    for h in handles {
        quote_latencies.extend(h.await.unwrap());
    }
    print_latency("quote (gap days)", &mut quote_latencies);

    // Phase 3: contention — many guests race for one range on one room
    let hot_room = Ulid::new();
    engine.register_room(hot_room, None, 100).await.unwrap();
    let contested = base + (STAYS_PER_ROOM + 2) * 4;

    let mut handles = Vec::new();
    for _ in 0..RACERS {
        let eng = engine.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            let result = eng
                .commit_booking(
                    Ulid::new(),
                    hot_room,
                    Ulid::new(),
                    contested,
                    contested + 3,
                    "CARD",
                    300,
                )
                .await;
            (start.elapsed(), result)
        }));
    }
    let mut race_latencies = Vec::new();
    let mut wins = 0;
    let mut conflicts = 0;
    for h in handles {
        let (latency, result) = h.await.unwrap();
        race_latencies.push(latency);
        match result {
            Ok(_) => wins += 1,
            Err(EngineError::Overlap(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    print_latency("commit (contended)", &mut race_latencies);
    println!("    winners={wins}, conflicts={conflicts} (of {RACERS} racers)");
    assert_eq!(wins, 1);
    assert_eq!(conflicts, RACERS - 1);

    println!("  total bookings: {}", engine.list_bookings().await.len());
}
