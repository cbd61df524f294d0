//! Eligibility and extension predicates over a [`BookingStore`]
//!
//! Both checkers are read-only. They take the store explicitly so any backend,
//! including [`MemoryStore`](crate::store::MemoryStore), can be used.
use super::config::{ExtensionScan, UnitCheck};
use super::error::RejectReason;
use super::stay::{Booking, NewBooking};
use super::store::{BookingFilter, BookingStore};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Rejected(RejectReason),
}

impl Eligibility {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Eligibility::Allowed)
    }
    pub fn reason(&self) -> String {
        match self {
            Eligibility::Allowed => "OK".to_string(),
            Eligibility::Rejected(reason) => reason.to_string(),
        }
    }
}

/// Evaluate the three booking rules in order; the first failing rule wins.
pub fn is_booking_possible<S: BookingStore + ?Sized>(
    store: &S,
    booking: &NewBooking,
    unit_check: UnitCheck,
) -> anyhow::Result<Eligibility> {
    let guest = booking.guest_name.as_str();
    let unit = booking.unit_id.as_str();

    // check 1: the same guest cannot book the same unit twice
    if store
        .find_one(&BookingFilter::by_guest_and_unit(guest, unit))?
        .is_some()
    {
        debug!(guest, unit, "guest already holds this unit");
        return Ok(Eligibility::Rejected(RejectReason::SameUnitTwice));
    }

    // check 2: any existing booking for the guest blocks a new one
    if let Some(existing) = store.find_one(&BookingFilter::by_guest(guest))? {
        debug!(guest, held = %existing.unit_id, "guest already holds another unit");
        return Ok(Eligibility::Rejected(RejectReason::GuestInAnotherUnit));
    }

    // check 3: the unit is free for the requested stay
    let occupied = match unit_check {
        UnitCheck::StayOverlap => store
            .find_all(&BookingFilter::by_unit(unit))?
            .iter()
            .any(|existing| existing.overlaps(&booking.check_in_date, &booking.check_out_date)),
        UnitCheck::FirstCheckIn => store
            .find_one(&BookingFilter::by_unit(unit))?
            .is_some_and(|existing| existing.covers(&booking.check_in_date)),
    };
    if occupied {
        debug!(unit, check_in = %booking.check_in_date, "unit occupied");
        return Ok(Eligibility::Rejected(RejectReason::UnitOccupied));
    }

    Ok(Eligibility::Allowed)
}

/// Returns `true` when adding `additional_nights` to the guest's stay in
/// `unit_id` would run into the next booking for that unit.
pub fn is_extension_blocked<S: BookingStore + ?Sized>(
    store: &S,
    unit_id: &str,
    guest_name: &str,
    additional_nights: u32,
    scan: ExtensionScan,
) -> anyhow::Result<bool> {
    let bookings = store.find_all(&BookingFilter::by_unit(unit_id))?;

    // a single booking has nothing to collide with
    if bookings.len() <= 1 {
        return Ok(false);
    }

    let blocked = match scan {
        ExtensionScan::Chronological => chronological_scan(bookings, guest_name, additional_nights),
        ExtensionScan::StoreOrder => store_order_scan(&bookings, guest_name, additional_nights),
    };
    debug!(unit = unit_id, guest = guest_name, additional_nights, blocked, "extension check");

    Ok(blocked)
}

fn gap_too_small(current: &Booking, next: &Booking, additional_nights: u32) -> bool {
    current.check_out_date.days_until(&next.check_in_date) < i64::from(additional_nights)
}

fn chronological_scan(mut bookings: Vec<Booking>, guest_name: &str, additional_nights: u32) -> bool {
    bookings.sort_by_key(|b| b.check_in_date);

    let Some(position) = bookings.iter().position(|b| b.guest_name == guest_name) else {
        return false;
    };

    bookings
        .get(position + 1)
        .is_some_and(|next| gap_too_small(&bookings[position], next, additional_nights))
}

// Walks records in store order. Any record for another guest, or a guest
// record without a successor, ends the scan as not blocked.
fn store_order_scan(bookings: &[Booking], guest_name: &str, additional_nights: u32) -> bool {
    for (index, current) in bookings.iter().enumerate() {
        match bookings.get(index + 1) {
            Some(next) if current.guest_name == guest_name => {
                if gap_too_small(current, next, additional_nights) {
                    return true;
                }
            }
            _ => return false,
        }
    }

    true
}
