pub mod checks;
pub mod config;
pub mod error;
pub mod service;
pub mod stay;
pub mod store;
pub mod utils;

pub use checks::Eligibility;
pub use config::{ExtensionScan, ServiceConfig, UnitCheck};
pub use error::{BookingError, ConfigError, RejectReason};
pub use service::{BookingService, ExtensionAck};
pub use stay::{Booking, BookingRequest, StayDate};
pub use store::{BookingFilter, BookingStore, MemoryStore, SledStore};
