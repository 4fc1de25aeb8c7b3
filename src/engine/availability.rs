use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::EngineError;

// ── Availability Oracle ──────────────────────────────────────────

/// Return the id of a CONFIRMED booking whose stay overlaps `stay`, if any.
///
/// Cancelled bookings never block. `exclude` skips one booking id, so an
/// existing booking's own dates can be re-validated without conflicting
/// with themselves.
pub fn find_conflict(bookings: &[Booking], stay: &Stay, exclude: Option<Ulid>) -> Option<Ulid> {
    bookings
        .iter()
        .filter(|b| b.is_confirmed())
        .filter(|b| exclude != Some(b.id))
        .find(|b| b.stay.overlaps(stay))
        .map(|b| b.id)
}

/// Free sub-ranges of `window` once confirmed stays are subtracted.
pub fn free_ranges(bookings: &[Booking], window: &Stay) -> Vec<Stay> {
    let mut taken: Vec<Stay> = bookings
        .iter()
        .filter(|b| b.is_confirmed())
        .filter(|b| b.stay.overlaps(window))
        .map(|b| {
            Stay::new(
                b.stay.check_in.max(window.check_in),
                b.stay.check_out.min(window.check_out),
            )
        })
        .collect();
    taken.sort_by_key(|s| s.check_in);
    let taken = merge_overlapping(&taken);
    subtract_stays(&[*window], &taken)
}

/// Merge sorted overlapping/adjacent ranges into disjoint ranges.
pub fn merge_overlapping(sorted: &[Stay]) -> Vec<Stay> {
    let mut merged: Vec<Stay> = Vec::new();
    for &stay in sorted {
        if let Some(last) = merged.last_mut()
            && stay.check_in <= last.check_out {
                last.check_out = last.check_out.max(stay.check_out);
                continue;
            }
        merged.push(stay);
    }
    merged
}

pub fn subtract_stays(base: &[Stay], to_remove: &[Stay]) -> Vec<Stay> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut current_start = b.check_in;
        let current_end = b.check_out;

        while ri < to_remove.len() && to_remove[ri].check_out <= current_start {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].check_in < current_end {
            let r = &to_remove[j];
            if r.check_in > current_start {
                result.push(Stay::new(current_start, r.check_in));
            }
            current_start = current_start.max(r.check_out);
            j += 1;
        }

        if current_start < current_end {
            result.push(Stay::new(current_start, current_end));
        }
    }

    result
}

/// Validate a caller-supplied date pair into a `Stay`.
pub(crate) fn validate_range(check_in: Day, check_out: Day) -> Result<Stay, EngineError> {
    if check_in >= check_out {
        return Err(EngineError::InvalidRange("check-out must be after check-in"));
    }
    if check_in < MIN_VALID_DAY || check_out > MAX_VALID_DAY {
        return Err(EngineError::LimitExceeded("date out of range"));
    }
    let stay = Stay::new(check_in, check_out);
    if stay.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(stay)
}
