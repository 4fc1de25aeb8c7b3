use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::availability::{find_conflict, free_ranges, validate_range};
use super::{Engine, EngineError};

impl Engine {
    /// Price/availability preview. Advisory only: nothing is reserved, and
    /// the answer may be stale by the time a commit is attempted — commit
    /// re-validates the dates under the room's write lock.
    pub async fn quote(
        &self,
        room_id: Ulid,
        check_in: Day,
        check_out: Day,
    ) -> Result<Quote, EngineError> {
        let stay = validate_range(check_in, check_out)?;
        if stay.check_in < day_of(now_ms()) {
            return Err(EngineError::InvalidRange("check-in date is in the past"));
        }
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        if let Some(existing) = find_conflict(&guard.bookings, &stay, None) {
            return Err(EngineError::Overlap(existing));
        }
        metrics::counter!(observability::QUOTES_TOTAL).increment(1);
        Ok(Quote {
            room: RoomInfo::from(&*guard),
            nights: stay.nights(),
            total_amount: guard.rate * stay.nights(),
        })
    }

    /// Free sub-ranges of `[from, until)` for a room. Unknown rooms have no
    /// free ranges.
    pub async fn room_availability(
        &self,
        room_id: Ulid,
        from: Day,
        until: Day,
    ) -> Result<Vec<Stay>, EngineError> {
        if from >= until {
            return Err(EngineError::InvalidRange("window end must be after start"));
        }
        if (until - from) as i64 > MAX_QUERY_WINDOW_DAYS {
            return Err(EngineError::LimitExceeded("query window too wide"));
        }
        let rs = match self.get_room_state(&room_id) {
            Some(rs) => rs,
            None => return Ok(vec![]),
        };
        let guard = rs.read().await;
        let window = Stay::new(from, until);
        Ok(free_ranges(&guard.bookings, &window))
    }

    /// Rooms with no confirmed booking overlapping the stay.
    pub async fn available_rooms(
        &self,
        check_in: Day,
        check_out: Day,
    ) -> Result<Vec<RoomInfo>, EngineError> {
        let stay = validate_range(check_in, check_out)?;
        let ids: Vec<Ulid> = self.rooms.iter().map(|e| *e.key()).collect();
        let mut out = Vec::new();
        for id in ids {
            let Some(rs) = self.get_room_state(&id) else {
                continue;
            };
            let guard = rs.read().await;
            if find_conflict(&guard.bookings, &stay, None).is_none() {
                out.push(RoomInfo::from(&*guard));
            }
        }
        Ok(out)
    }

    /// Re-validate a date range against a room, optionally ignoring one
    /// booking so an existing booking's own dates never conflict with
    /// themselves.
    pub async fn is_range_free(
        &self,
        room_id: Ulid,
        check_in: Day,
        check_out: Day,
        exclude: Option<Ulid>,
    ) -> Result<bool, EngineError> {
        let stay = validate_range(check_in, check_out)?;
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(find_conflict(&guard.bookings, &stay, exclude).is_none())
    }

    pub async fn get_room(&self, room_id: Ulid) -> Result<RoomInfo, EngineError> {
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(RoomInfo::from(&*guard))
    }

    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let ids: Vec<Ulid> = self.rooms.iter().map(|e| *e.key()).collect();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(rs) = self.get_room_state(&id) {
                let guard = rs.read().await;
                out.push(RoomInfo::from(&*guard));
            }
        }
        out
    }

    pub async fn get_booking(&self, id: Ulid) -> Result<Booking, EngineError> {
        let room_id = self
            .room_for_booking(&id)
            .ok_or(EngineError::NotFound(id))?;
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        guard.booking(id).cloned().ok_or(EngineError::NotFound(id))
    }

    /// Every booking ever taken for a room, cancelled stays included.
    pub async fn bookings_for_room(&self, room_id: Ulid) -> Result<Vec<Booking>, EngineError> {
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(guard.bookings.clone())
    }

    /// Confirmed bookings for a room, optionally skipping one booking id.
    pub async fn active_bookings(
        &self,
        room_id: Ulid,
        exclude: Option<Ulid>,
    ) -> Result<Vec<Booking>, EngineError> {
        let rs = self
            .get_room_state(&room_id)
            .ok_or(EngineError::NotFound(room_id))?;
        let guard = rs.read().await;
        Ok(guard
            .bookings
            .iter()
            .filter(|b| b.is_confirmed())
            .filter(|b| exclude != Some(b.id))
            .cloned()
            .collect())
    }

    /// All bookings across all rooms.
    pub async fn list_bookings(&self) -> Vec<Booking> {
        let ids: Vec<Ulid> = self.rooms.iter().map(|e| *e.key()).collect();
        let mut out = Vec::new();
        for id in ids {
            if let Some(rs) = self.get_room_state(&id) {
                let guard = rs.read().await;
                out.extend(guard.bookings.iter().cloned());
            }
        }
        out
    }

    pub fn payment_for_booking(&self, booking_id: Ulid) -> Result<Payment, EngineError> {
        self.payments
            .get(&booking_id)
            .map(|p| p.clone())
            .ok_or(EngineError::NotFound(booking_id))
    }
}
