use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only timestamp type.
pub type Ms = i64;

/// Days since the unix epoch — the only calendar type.
pub type Day = i32;

/// Money in minor units (cents). No floats anywhere.
pub type Money = i64;

pub const MS_PER_DAY: Ms = 86_400_000;

/// Current wall-clock time in unix milliseconds.
pub fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as Ms
}

/// Calendar day containing the given timestamp.
pub fn day_of(ts: Ms) -> Day {
    (ts / MS_PER_DAY) as Day
}

/// Half-open date range `[check_in, check_out)` — the checkout day is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub check_in: Day,
    pub check_out: Day,
}

impl Stay {
    pub fn new(check_in: Day, check_out: Day) -> Self {
        debug_assert!(check_in < check_out, "Stay check_in must be before check_out");
        Self { check_in, check_out }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in) as i64
    }

    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Returns true if the guest occupies the room on day `d`.
    pub fn contains_day(&self, d: Day) -> bool {
        self.check_in <= d && d < self.check_out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Completed,
    Refunded,
}

/// A committed reservation. Created only by a successful commit; cancellation
/// is a one-way status transition, never a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub room_id: Ulid,
    pub guest_id: Ulid,
    pub stay: Stay,
    /// rate × nights, fixed at commit time and never recomputed.
    pub total_amount: Money,
    pub status: BookingStatus,
    /// Anchors the cancellation window.
    pub created_at: Ms,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// The recorded transaction for a booking, one-to-one with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Ulid,
    pub booking_id: Ulid,
    /// Overwritten with the refund amount on cancellation.
    pub amount: Money,
    /// The amount charged at commit; survives a refund.
    pub original_amount: Money,
    pub method: String,
    pub status: PaymentStatus,
    pub recorded_at: Ms,
}

/// Per-room state: rate, derived availability, and this room's slice of the
/// booking ledger.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: Ulid,
    pub name: Option<String>,
    /// Nightly rate in minor units.
    pub rate: Money,
    /// Derived: true iff no CONFIRMED booking exists for this room.
    /// Recomputed on every booking event, never set directly.
    pub available: bool,
    /// Full booking history (cancelled stays included), sorted by
    /// `stay.check_in`.
    pub bookings: Vec<Booking>,
}

impl RoomState {
    pub fn new(id: Ulid, name: Option<String>, rate: Money) -> Self {
        Self {
            id,
            name,
            rate,
            available: true,
            bookings: Vec::new(),
        }
    }

    /// Insert keeping sort order by check-in day.
    pub fn insert_booking(&mut self, booking: Booking) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.stay.check_in, |b| b.stay.check_in)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    pub fn booking(&self, id: Ulid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn booking_mut(&mut self, id: Ulid) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    /// Return only bookings whose stay overlaps the query window.
    /// Uses binary search to skip bookings checking in at or after
    /// `query.check_out`.
    pub fn overlapping(&self, query: &Stay) -> impl Iterator<Item = &Booking> {
        let right_bound = self
            .bookings
            .partition_point(|b| b.stay.check_in < query.check_out);
        let after = query.check_in;
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.stay.check_out > after)
    }

    /// Recompute the derived availability flag from the confirmed set.
    pub fn recompute_available(&mut self) {
        self.available = !self.bookings.iter().any(Booking::is_confirmed);
    }
}

/// The event types — flat, no nesting. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    RoomRegistered {
        id: Ulid,
        name: Option<String>,
        rate: Money,
    },
    RoomUpdated {
        id: Ulid,
        name: Option<String>,
        rate: Money,
    },
    RoomRemoved {
        id: Ulid,
    },
    /// One record per commit — the booking and its payment become durable
    /// together or not at all.
    BookingCommitted {
        booking: Booking,
        payment: Payment,
    },
    BookingCancelled {
        id: Ulid,
        room_id: Ulid,
        refund: Money,
        cancelled_at: Ms,
    },
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub id: Ulid,
    pub name: Option<String>,
    pub rate: Money,
    pub available: bool,
}

impl From<&RoomState> for RoomInfo {
    fn from(rs: &RoomState) -> Self {
        Self {
            id: rs.id,
            name: rs.name.clone(),
            rate: rs.rate,
            available: rs.available,
        }
    }
}

/// Non-durable price preview. Nothing is reserved by a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub room: RoomInfo,
    pub nights: i64,
    pub total_amount: Money,
}
