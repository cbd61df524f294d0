//! Booking persistence: the store seam plus sled and in-memory backends
use super::config::ServiceConfig;
use super::stay::{Booking, NewBooking, TimeStamp};
use super::utils::{self, BOOKING_HRP};
use anyhow::Context;
use sled::Tree;
use std::sync::Arc;
use uuid7::uuid7;

const BOOKINGS_TREE: &str = "bookings";

/// Selects bookings by guest, by unit, or both. An empty filter matches all.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingFilter {
    pub guest_name: Option<String>,
    pub unit_id: Option<String>,
}

/// Ordered collection of bookings. `find_all` returns records in insertion
/// order, which callers may rely on.
pub trait BookingStore {
    fn find_one(&self, filter: &BookingFilter) -> anyhow::Result<Option<Booking>>;
    fn find_all(&self, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>>;
    /// Persist a new record, assigning its id and creation time.
    fn insert(&mut self, booking: NewBooking) -> anyhow::Result<Booking>;
    /// Overwrite the record with the same id. Fails if no such record exists.
    fn update(&mut self, booking: &Booking) -> anyhow::Result<()>;
}

impl BookingFilter {
    pub fn by_guest(guest_name: &str) -> Self {
        Self {
            guest_name: Some(guest_name.to_string()),
            unit_id: None,
        }
    }
    pub fn by_unit(unit_id: &str) -> Self {
        Self {
            guest_name: None,
            unit_id: Some(unit_id.to_string()),
        }
    }
    pub fn by_guest_and_unit(guest_name: &str, unit_id: &str) -> Self {
        Self {
            guest_name: Some(guest_name.to_string()),
            unit_id: Some(unit_id.to_string()),
        }
    }
    pub fn matches(&self, booking: &Booking) -> bool {
        self.guest_name
            .as_deref()
            .is_none_or(|guest| booking.guest_name == guest)
            && self
                .unit_id
                .as_deref()
                .is_none_or(|unit| booking.unit_id == unit)
    }
}

/// sled backed store. Keys are uuid7 bytes, so tree order is insertion order.
pub struct SledStore {
    instance: Arc<sled::Db>,
    tree: Tree,
}

impl SledStore {
    pub fn new(instance: Arc<sled::Db>) -> anyhow::Result<Self> {
        let tree = instance
            .open_tree(BOOKINGS_TREE)
            .context("failed to open bookings tree")?;
        Ok(Self { instance, tree })
    }

    /// Open (or create) the database at the configured path.
    pub fn open(config: &ServiceConfig) -> anyhow::Result<Self> {
        let db = sled::open(&config.db_path)
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
        Self::new(Arc::new(db))
    }

    fn scan(&self, filter: &BookingFilter) -> impl Iterator<Item = anyhow::Result<Booking>> + '_ {
        let filter = filter.clone();
        self.tree
            .iter()
            .map(|entry| -> anyhow::Result<Booking> {
                let (_key, value) = entry?;
                let booking: Booking = minicbor::decode(&value)?;
                Ok(booking)
            })
            .filter(move |res| match res {
                Ok(booking) => filter.matches(booking),
                Err(_) => true,
            })
    }
}

impl BookingStore for SledStore {
    fn find_one(&self, filter: &BookingFilter) -> anyhow::Result<Option<Booking>> {
        self.scan(filter).next().transpose()
    }

    fn find_all(&self, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
        self.scan(filter).collect()
    }

    fn insert(&mut self, booking: NewBooking) -> anyhow::Result<Booking> {
        let key = uuid7();
        let id = utils::encode_id(BOOKING_HRP, key.as_bytes())?;
        let booking = booking.into_booking(id, TimeStamp::new());

        self.tree.insert(key.as_bytes(), minicbor::to_vec(&booking)?)?;
        self.instance.flush()?;

        Ok(booking)
    }

    fn update(&mut self, booking: &Booking) -> anyhow::Result<()> {
        let key = utils::decode_id(&booking.id)
            .with_context(|| format!("malformed booking id {}", booking.id))?;

        if !self.tree.contains_key(&key)? {
            anyhow::bail!("booking {} does not exist", booking.id);
        }
        self.tree.insert(key, minicbor::to_vec(booking)?)?;
        self.instance.flush()?;

        Ok(())
    }
}

/// Vec backed store, mainly a test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bookings: Vec<Booking>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for MemoryStore {
    fn find_one(&self, filter: &BookingFilter) -> anyhow::Result<Option<Booking>> {
        Ok(self.bookings.iter().find(|b| filter.matches(b)).cloned())
    }

    fn find_all(&self, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    fn insert(&mut self, booking: NewBooking) -> anyhow::Result<Booking> {
        let id = utils::new_uuid_to_bech32(BOOKING_HRP)?;
        let booking = booking.into_booking(id, TimeStamp::new());
        self.bookings.push(booking.clone());
        Ok(booking)
    }

    fn update(&mut self, booking: &Booking) -> anyhow::Result<()> {
        let slot = self
            .bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .with_context(|| format!("booking {} does not exist", booking.id))?;
        *slot = booking.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stay::StayDate;
    use tempfile::tempdir;

    fn new_booking(guest: &str, unit: &str, check_in: &str, nights: u32) -> NewBooking {
        let check_in_date: StayDate = check_in.parse().unwrap();
        NewBooking {
            guest_name: guest.into(),
            unit_id: unit.into(),
            check_in_date,
            number_of_nights: nights,
            check_out_date: check_in_date.plus_nights(nights).unwrap(),
        }
    }

    fn exercise_store(store: &mut impl BookingStore) {
        let alice = store.insert(new_booking("Alice", "u1", "2024-01-01", 3)).unwrap();
        store.insert(new_booking("Bob", "u2", "2024-01-01", 2)).unwrap();
        store.insert(new_booking("Carol", "u1", "2024-02-01", 1)).unwrap();

        assert!(alice.id.starts_with(BOOKING_HRP));

        let unit = store.find_all(&BookingFilter::by_unit("u1")).unwrap();
        let guests: Vec<_> = unit.iter().map(|b| b.guest_name.as_str()).collect();
        assert_eq!(guests, vec!["Alice", "Carol"]);

        let bob = store.find_one(&BookingFilter::by_guest("Bob")).unwrap().unwrap();
        assert_eq!(bob.unit_id, "u2");
        assert!(
            store
                .find_one(&BookingFilter::by_guest_and_unit("Bob", "u1"))
                .unwrap()
                .is_none()
        );
        assert_eq!(store.find_all(&BookingFilter::default()).unwrap().len(), 3);

        let mut extended = alice.clone();
        extended.number_of_nights = 5;
        store.update(&extended).unwrap();
        let reloaded = store
            .find_one(&BookingFilter::by_guest_and_unit("Alice", "u1"))
            .unwrap()
            .unwrap();
        assert_eq!(reloaded, extended);

        let mut unknown = alice;
        unknown.id = utils::new_uuid_to_bech32(BOOKING_HRP).unwrap();
        assert!(store.update(&unknown).is_err());
    }

    #[test]
    fn memory_store_filters_and_updates() {
        exercise_store(&mut MemoryStore::new());
    }

    #[test]
    fn sled_store_filters_and_updates() {
        let temp_dir = tempdir().unwrap();
        let db = sled::open(temp_dir.path().join("store.db")).unwrap();
        let mut store = SledStore::new(Arc::new(db)).unwrap();

        exercise_store(&mut store);
    }

    #[test]
    fn sled_store_opens_configured_path() {
        let temp_dir = tempdir().unwrap();
        let config = ServiceConfig::default().set_db_path(temp_dir.path().join("configured.db"));
        let mut store = SledStore::open(&config).unwrap();

        store.insert(new_booking("Alice", "u1", "2024-01-01", 3)).unwrap();
        assert!(config.db_path.exists());
    }
}
