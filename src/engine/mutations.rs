use std::sync::Arc;

use tokio::sync::RwLock;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::availability::{find_conflict, validate_range};
use super::{Engine, EngineError};

impl Engine {
    pub async fn register_room(
        &self,
        id: Ulid,
        name: Option<String>,
        rate: Money,
    ) -> Result<(), EngineError> {
        if self.rooms.len() >= MAX_ROOMS {
            return Err(EngineError::LimitExceeded("too many rooms"));
        }
        if let Some(ref n) = name
            && n.len() > MAX_NAME_LEN {
                return Err(EngineError::LimitExceeded("room name too long"));
            }
        if rate <= 0 {
            return Err(EngineError::InvalidRate(rate));
        }
        if self.rooms.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }

        let event = Event::RoomRegistered {
            id,
            name: name.clone(),
            rate,
        };
        self.wal_append(&event).await?;
        let rs = RoomState::new(id, name, rate);
        self.rooms.insert(id, Arc::new(RwLock::new(rs)));
        self.notify.send(id, &event);
        metrics::gauge!(observability::ROOMS_ACTIVE).set(self.rooms.len() as f64);
        Ok(())
    }

    /// Rate changes apply to future commits only; existing bookings keep the
    /// total computed when they were committed.
    pub async fn update_room(
        &self,
        id: Ulid,
        name: Option<String>,
        rate: Money,
    ) -> Result<(), EngineError> {
        if let Some(ref n) = name
            && n.len() > MAX_NAME_LEN {
                return Err(EngineError::LimitExceeded("room name too long"));
            }
        if rate <= 0 {
            return Err(EngineError::InvalidRate(rate));
        }
        let rs = self.get_room_state(&id).ok_or(EngineError::NotFound(id))?;
        let mut guard = rs.write().await;

        let event = Event::RoomUpdated { id, name, rate };
        self.persist_and_apply(id, &mut guard, &event).await
    }

    /// Administrative removal. Refused while any confirmed booking exists;
    /// the room's booking history and payments go with it.
    pub async fn remove_room(&self, id: Ulid) -> Result<(), EngineError> {
        let rs = self.get_room_state(&id).ok_or(EngineError::NotFound(id))?;
        let guard = rs.write().await;
        if guard.bookings.iter().any(Booking::is_confirmed) {
            return Err(EngineError::HasActiveBookings(id));
        }

        let event = Event::RoomRemoved { id };
        self.wal_append(&event).await?;
        for b in &guard.bookings {
            self.booking_to_room.remove(&b.id);
            self.payments.remove(&b.id);
        }
        drop(guard);
        self.rooms.remove(&id);
        self.notify.send(id, &event);
        self.notify.remove(&id);
        metrics::gauge!(observability::ROOMS_ACTIVE).set(self.rooms.len() as f64);
        Ok(())
    }

    /// Finalize a booking: re-check the dates under the room's write lock,
    /// validate payment, then persist booking + payment as one ledger record.
    ///
    /// The write guard is held from the overlap check through the ledger
    /// append, so two commits for the same room serialize; the loser of a
    /// race on overlapping dates gets `Overlap`. A quote is not a
    /// reservation — the dates may have been taken since, which is why the
    /// check runs again here.
    pub async fn commit_booking(
        &self,
        id: Ulid,
        room_id: Ulid,
        guest_id: Ulid,
        check_in: Day,
        check_out: Day,
        method: &str,
        amount: Money,
    ) -> Result<Booking, EngineError> {
        let stay = validate_range(check_in, check_out)?;
        let now = now_ms();
        if stay.check_in < day_of(now) {
            return Err(EngineError::InvalidRange("check-in date is in the past"));
        }
        if method.len() > MAX_METHOD_LEN {
            return Err(EngineError::LimitExceeded("payment method too long"));
        }

        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let mut guard = rs.write().await;
        if guard.bookings.len() >= MAX_BOOKINGS_PER_ROOM {
            return Err(EngineError::LimitExceeded("too many bookings on room"));
        }

        if let Some(existing) = find_conflict(&guard.bookings, &stay, None) {
            metrics::counter!(observability::CONFLICTS_TOTAL).increment(1);
            tracing::debug!(%room_id, %existing, "commit rejected: dates taken");
            return Err(EngineError::Overlap(existing));
        }

        // Nothing is durable yet; a payment failure leaves no record behind.
        if amount <= 0 {
            return Err(EngineError::InvalidPayment("amount must be positive"));
        }
        if method.is_empty() {
            return Err(EngineError::InvalidPayment("method must not be empty"));
        }

        let booking = Booking {
            id,
            room_id,
            guest_id,
            stay,
            total_amount: guard.rate * stay.nights(),
            status: BookingStatus::Confirmed,
            created_at: now,
        };
        let payment = Payment {
            id: Ulid::new(),
            booking_id: id,
            amount,
            original_amount: amount,
            method: method.to_string(),
            status: PaymentStatus::Completed,
            recorded_at: now,
        };

        let event = Event::BookingCommitted {
            booking: booking.clone(),
            payment,
        };
        self.persist_and_apply(room_id, &mut guard, &event).await?;
        metrics::counter!(observability::COMMITS_TOTAL).increment(1);
        tracing::info!(%room_id, booking = %id, nights = stay.nights(), "booking committed");
        Ok(booking)
    }

    /// Cancel a confirmed booking within the cancellation window, refunding
    /// per the engine's configured share.
    ///
    /// Takes the same per-room write lock as `commit_booking`, so a cancel
    /// never interleaves with a commit that is mid-overlap-check.
    pub async fn cancel_booking(&self, id: Ulid, guest_id: Ulid) -> Result<Booking, EngineError> {
        let (room_id, mut guard) = self.resolve_booking_write(&id).await?;
        let booking = guard.booking(id).ok_or(EngineError::NotFound(id))?;

        if booking.guest_id != guest_id {
            return Err(EngineError::Forbidden(id));
        }
        match booking.status {
            BookingStatus::Cancelled => return Err(EngineError::AlreadyCancelled(id)),
            BookingStatus::Confirmed => {}
        }
        let now = now_ms();
        if !self.config.within_cancellation_window(booking.created_at, now) {
            return Err(EngineError::WindowExpired {
                deadline: self.config.cancellation_deadline(booking.created_at),
            });
        }

        let refund = self.config.refund_amount(booking.total_amount);
        let event = Event::BookingCancelled {
            id,
            room_id,
            refund,
            cancelled_at: now,
        };
        self.persist_and_apply(room_id, &mut guard, &event).await?;
        metrics::counter!(observability::CANCELLATIONS_TOTAL).increment(1);
        tracing::info!(%room_id, booking = %id, refund, "booking cancelled");

        guard.booking(id).cloned().ok_or(EngineError::NotFound(id))
    }
}
