mod availability;
mod error;
mod mutations;
mod queries;

pub use availability::{find_conflict, free_ranges, merge_overlapping, subtract_stays};
pub use error::EngineError;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot, RwLock};
use ulid::Ulid;

use crate::config::EngineConfig;
use crate::model::*;
use crate::notify::NotifyHub;
use crate::wal::Wal;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

// ── Group-commit WAL channel ─────────────────────────────

pub(super) enum WalCommand {
    Append {
        event: Event,
        response: oneshot::Sender<io::Result<()>>,
    },
    Compact {
        events: Vec<Event>,
        response: oneshot::Sender<io::Result<()>>,
    },
    AppendsSinceCompact {
        response: oneshot::Sender<u64>,
    },
}

/// Background task that owns the WAL and batches appends for group commit.
/// 1. Block until the first Append arrives.
/// 2. Buffer it (no fsync).
/// 3. Drain all immediately available Appends (the batch window).
/// 4. Single flush_sync for the whole batch.
/// 5. Respond Ok to all senders.
async fn wal_writer_loop(mut wal: Wal, mut rx: mpsc::Receiver<WalCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WalCommand::Append { event, response } => {
                let mut batch = vec![(event, response)];

                // Drain all immediately available appends
                loop {
                    match rx.try_recv() {
                        Ok(WalCommand::Append { event, response }) => {
                            batch.push((event, response));
                        }
                        Ok(other) => {
                            // Flush current batch first, then handle the non-append command
                            flush_and_respond(&mut wal, &mut batch);
                            handle_non_append(&mut wal, other);
                            break;
                        }
                        Err(_) => break, // channel empty — flush batch
                    }
                }

                if !batch.is_empty() {
                    flush_and_respond(&mut wal, &mut batch);
                }
            }
            other => handle_non_append(&mut wal, other),
        }
    }
}

fn flush_and_respond(wal: &mut Wal, batch: &mut Vec<(Event, oneshot::Sender<io::Result<()>>)>) {
    metrics::histogram!(crate::observability::WAL_FLUSH_BATCH_SIZE).record(batch.len() as f64);
    let flush_start = std::time::Instant::now();
    let result = flush_batch(wal, batch);
    metrics::histogram!(crate::observability::WAL_FLUSH_DURATION_SECONDS)
        .record(flush_start.elapsed().as_secs_f64());
    respond_batch(batch, &result);
}

fn flush_batch(
    wal: &mut Wal,
    batch: &mut [(Event, oneshot::Sender<io::Result<()>>)],
) -> io::Result<()> {
    let mut append_err: Option<io::Error> = None;
    for (event, _) in batch.iter() {
        if let Err(e) = wal.append_buffered(event) {
            append_err = Some(e);
            break;
        }
    }
    // Always flush — even on append error — so partially buffered bytes
    // don't leak into the next batch (callers were told this batch failed).
    let flush_err = wal.flush_sync().err();
    if let Some(e) = append_err {
        return Err(e);
    }
    if let Some(e) = flush_err {
        return Err(e);
    }
    Ok(())
}

fn respond_batch(batch: &mut Vec<(Event, oneshot::Sender<io::Result<()>>)>, result: &io::Result<()>) {
    for (_, tx) in batch.drain(..) {
        let r = match result {
            Ok(()) => Ok(()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        };
        let _ = tx.send(r);
    }
}

fn handle_non_append(wal: &mut Wal, cmd: WalCommand) {
    match cmd {
        WalCommand::Compact { events, response } => {
            let result = Wal::write_compact_file(wal.path(), &events)
                .and_then(|()| wal.swap_compact_file());
            let _ = response.send(result);
        }
        WalCommand::AppendsSinceCompact { response } => {
            let _ = response.send(wal.appends_since_compact());
        }
        WalCommand::Append { .. } => unreachable!(),
    }
}

/// The reservation engine: sole authority over each room's booking state.
///
/// Commit and cancel for the same room serialize on that room's write lock,
/// held across the overlap check and the ledger append, so the
/// check-then-act sequence is indivisible. Different rooms never contend.
pub struct Engine {
    /// Room directory: per-room state, each behind its own lock.
    pub rooms: DashMap<Ulid, SharedRoomState>,
    pub(super) wal_tx: mpsc::Sender<WalCommand>,
    pub notify: Arc<NotifyHub>,
    /// Ledger index: booking id → owning room id.
    pub(super) booking_to_room: DashMap<Ulid, Ulid>,
    /// Payment store, keyed by booking id (one payment per booking).
    /// Only mutated while holding the owning room's write lock.
    pub(super) payments: DashMap<Ulid, Payment>,
    pub(super) config: EngineConfig,
}

/// Apply an event directly to a RoomState (no locking — caller holds the lock).
fn apply_to_room(
    rs: &mut RoomState,
    event: &Event,
    ledger_index: &DashMap<Ulid, Ulid>,
    payments: &DashMap<Ulid, Payment>,
) {
    match event {
        Event::BookingCommitted { booking, payment } => {
            rs.insert_booking(booking.clone());
            ledger_index.insert(booking.id, booking.room_id);
            payments.insert(payment.booking_id, payment.clone());
            rs.recompute_available();
        }
        Event::BookingCancelled { id, refund, .. } => {
            if let Some(b) = rs.booking_mut(*id) {
                b.status = BookingStatus::Cancelled;
            }
            if let Some(mut p) = payments.get_mut(id) {
                p.status = PaymentStatus::Refunded;
                p.amount = *refund;
            }
            rs.recompute_available();
        }
        Event::RoomUpdated { name, rate, .. } => {
            rs.name = name.clone();
            rs.rate = *rate;
        }
        // RoomRegistered/Removed are handled at the DashMap level, not here
        Event::RoomRegistered { .. } | Event::RoomRemoved { .. } => {}
    }
}

impl Engine {
    pub fn new(
        wal_path: PathBuf,
        notify: Arc<NotifyHub>,
        config: EngineConfig,
    ) -> std::io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;
        let (wal_tx, wal_rx) = mpsc::channel(4096);
        tokio::spawn(wal_writer_loop(wal, wal_rx));

        let engine = Self {
            rooms: DashMap::new(),
            wal_tx,
            notify,
            booking_to_room: DashMap::new(),
            payments: DashMap::new(),
            config,
        };

        // Replay events — we're the sole owner of these Arcs, so try_read/try_write
        // always succeed instantly (no contention). Never use blocking_read/blocking_write
        // here because this may run inside an async context.
        for event in &events {
            match event {
                Event::RoomRegistered { id, name, rate } => {
                    let rs = RoomState::new(*id, name.clone(), *rate);
                    engine.rooms.insert(*id, Arc::new(RwLock::new(rs)));
                }
                Event::RoomRemoved { id } => {
                    if let Some((_, rs)) = engine.rooms.remove(id) {
                        let guard = rs.try_read().expect("replay: uncontended read");
                        for b in &guard.bookings {
                            engine.booking_to_room.remove(&b.id);
                            engine.payments.remove(&b.id);
                        }
                    }
                }
                other => {
                    if let Some(room_id) = event_room_id(other)
                        && let Some(entry) = engine.rooms.get(&room_id) {
                            let rs_arc = entry.clone();
                            let mut guard = rs_arc.try_write().expect("replay: uncontended write");
                            apply_to_room(
                                &mut guard,
                                other,
                                &engine.booking_to_room,
                                &engine.payments,
                            );
                        }
                }
            }
        }

        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Write event to WAL via the background group-commit writer.
    pub(super) async fn wal_append(&self, event: &Event) -> Result<(), EngineError> {
        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Append {
                event: event.clone(),
                response: tx,
            })
            .await
            .map_err(|_| EngineError::Storage("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::Storage("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    pub fn get_room_state(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    pub fn room_for_booking(&self, booking_id: &Ulid) -> Option<Ulid> {
        self.booking_to_room.get(booking_id).map(|e| *e.value())
    }

    /// WAL-append + apply + notify in one call. The caller holds the room's
    /// write lock, so nothing can observe the state between append and apply.
    pub(super) async fn persist_and_apply(
        &self,
        room_id: Ulid,
        rs: &mut RoomState,
        event: &Event,
    ) -> Result<(), EngineError> {
        self.wal_append(event).await?;
        apply_to_room(rs, event, &self.booking_to_room, &self.payments);
        self.notify.send(room_id, event);
        Ok(())
    }

    /// Lookup booking → room, get room, acquire write lock.
    pub(super) async fn resolve_booking_write(
        &self,
        booking_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .room_for_booking(booking_id)
            .ok_or(EngineError::NotFound(*booking_id))?;
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.write_owned().await;
        Ok((room_id, guard))
    }

    /// Compact the WAL by rewriting it with only the events needed to
    /// recreate the current state. Cancelled bookings are part of the state
    /// and survive compaction.
    pub async fn compact_wal(&self) -> Result<(), EngineError> {
        let mut events = Vec::new();

        let room_ids: Vec<Ulid> = self.rooms.iter().map(|e| *e.key()).collect();
        for id in room_ids {
            let Some(rs) = self.get_room_state(&id) else {
                continue;
            };
            let guard = rs.read().await;
            events.push(Event::RoomRegistered {
                id: guard.id,
                name: guard.name.clone(),
                rate: guard.rate,
            });
            for booking in &guard.bookings {
                if let Some(payment) = self.payments.get(&booking.id) {
                    events.push(Event::BookingCommitted {
                        booking: booking.clone(),
                        payment: payment.clone(),
                    });
                }
            }
        }

        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Compact {
                events,
                response: tx,
            })
            .await
            .map_err(|_| EngineError::Storage("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::Storage("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    pub async fn wal_appends_since_compact(&self) -> u64 {
        let (tx, rx) = oneshot::channel();
        if self
            .wal_tx
            .send(WalCommand::AppendsSinceCompact { response: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

/// Extract the room id from an event (for non-Register/Remove events).
fn event_room_id(event: &Event) -> Option<Ulid> {
    match event {
        Event::BookingCommitted { booking, .. } => Some(booking.room_id),
        Event::BookingCancelled { room_id, .. } => Some(*room_id),
        Event::RoomUpdated { id, .. } => Some(*id),
        Event::RoomRegistered { .. } | Event::RoomRemoved { .. } => None,
    }
}
