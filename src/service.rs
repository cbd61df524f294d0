//! Service layer API for booking lifecycle operations
use super::checks::{self, Eligibility};
use super::config::ServiceConfig;
use super::error::BookingError;
use super::stay::{Booking, BookingRequest};
use super::store::{BookingFilter, BookingStore};
use tracing::info;

pub const EXTENSION_MESSAGE: &str = "user data updated successfully";

/// Acknowledgement returned by a successful extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAck {
    pub message: &'static str,
    pub booking: Booking,
}

/// Owns the store and is its only writer. Mutating operations take `&mut self`
/// so a check and the write it gates cannot interleave with another request.
pub struct BookingService<S: BookingStore> {
    store: S,
    config: ServiceConfig,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Run the eligibility rules without writing anything.
    pub fn is_booking_possible(&self, request: &BookingRequest) -> Result<Eligibility, BookingError> {
        let booking = request.validate_and_finalise()?;
        Ok(checks::is_booking_possible(
            &self.store,
            &booking,
            self.config.unit_check,
        )?)
    }

    /// `true` when the extension would collide with the next booking.
    pub fn is_extension_blocked(
        &self,
        unit_id: &str,
        guest_name: &str,
        additional_nights: u32,
    ) -> Result<bool, BookingError> {
        Ok(checks::is_extension_blocked(
            &self.store,
            unit_id,
            guest_name,
            additional_nights,
            self.config.extension_scan,
        )?)
    }

    /// Validate and persist a new booking
    pub fn create_booking(&mut self, request: BookingRequest) -> Result<Booking, BookingError> {
        let booking = request.validate_and_finalise()?;

        let eligibility =
            checks::is_booking_possible(&self.store, &booking, self.config.unit_check)?;
        if let Eligibility::Rejected(reason) = eligibility {
            info!(guest = %booking.guest_name, unit = %booking.unit_id, %reason, "booking rejected");
            return Err(BookingError::BookingRejected(reason));
        }

        let booking = self.store.insert(booking)?;
        info!(
            id = %booking.id,
            guest = %booking.guest_name,
            unit = %booking.unit_id,
            check_in = %booking.check_in_date,
            check_out = %booking.check_out_date,
            "booking created"
        );

        Ok(booking)
    }

    /// Add nights to the guest's existing stay in the requested unit
    pub fn extend_booking(&mut self, request: BookingRequest) -> Result<ExtensionAck, BookingError> {
        request.validate_extension()?;
        let guest_name = request.guest_name();
        let unit_id = request.unit_id();
        let additional_nights = request.number_of_nights();

        if self.is_extension_blocked(unit_id, guest_name, additional_nights)? {
            info!(guest = guest_name, unit = unit_id, additional_nights, "extension rejected");
            return Err(BookingError::ExtensionRejected);
        }

        let mut booking = self
            .store
            .find_one(&BookingFilter::by_guest_and_unit(guest_name, unit_id))?
            .ok_or_else(|| BookingError::NotFound {
                guest_name: guest_name.to_string(),
                unit_id: unit_id.to_string(),
            })?;

        let check_out_date = booking
            .check_out_date
            .plus_nights(additional_nights)
            .ok_or_else(|| BookingError::InvalidRequest("check-out date is out of range".into()))?;
        booking.number_of_nights = booking
            .number_of_nights
            .checked_add(additional_nights)
            .ok_or_else(|| BookingError::InvalidRequest("number of nights overflows".into()))?;
        booking.check_out_date = check_out_date;

        self.store.update(&booking)?;
        info!(
            id = %booking.id,
            guest = guest_name,
            unit = unit_id,
            nights = booking.number_of_nights,
            check_out = %booking.check_out_date,
            "booking extended"
        );

        Ok(ExtensionAck {
            message: EXTENSION_MESSAGE,
            booking,
        })
    }

    /// The guest's booking, if they hold one anywhere.
    pub fn booking_for_guest(&self, guest_name: &str) -> Result<Option<Booking>, BookingError> {
        Ok(self.store.find_one(&BookingFilter::by_guest(guest_name))?)
    }

    /// All bookings for a unit ordered by check-in date.
    pub fn unit_schedule(&self, unit_id: &str) -> Result<Vec<Booking>, BookingError> {
        let mut bookings = self.store.find_all(&BookingFilter::by_unit(unit_id))?;
        bookings.sort_by_key(|b| b.check_in_date);
        Ok(bookings)
    }
}
