/// Business rule a proposed booking failed on.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("The given guest name cannot book the same unit multiple times")]
    SameUnitTwice,
    #[error("The same guest cannot be in multiple units at the same time")]
    GuestInAnotherUnit,
    #[error("For the given check-in date, the unit is already occupied")]
    UnitOccupied,
}

#[derive(thiserror::Error, Debug)]
pub enum BookingError {
    #[error("Booking rejected: {0}")]
    BookingRejected(RejectReason),
    #[error("Your stay in this unit cannot be extended. Recommend booking another unit")]
    ExtensionRejected,
    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),
    #[error("No booking found for guest {guest_name} in unit {unit_id}")]
    NotFound { guest_name: String, unit_id: String },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown unit check policy: {0}")]
    UnknownUnitCheck(String),
    #[error("Unknown extension scan policy: {0}")]
    UnknownExtensionScan(String),
}
