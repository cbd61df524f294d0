//! Core booking records, stay dates and the request builder
use super::error::BookingError;
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// A calendar day a stay starts or ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StayDate(NaiveDate);

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

// A persisted booking. `id` and `created_at` are assigned by the store.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    #[n(0)]
    pub id: String, // bech32 encoded uuid7, also the store key
    #[n(1)]
    pub guest_name: String,
    #[n(2)]
    pub unit_id: String,
    #[n(3)]
    pub check_in_date: StayDate,
    #[n(4)]
    pub number_of_nights: u32,
    #[n(5)]
    pub check_out_date: StayDate,
    #[n(6)]
    pub created_at: TimeStamp<Utc>,
}

/// A booking that passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub guest_name: String,
    pub unit_id: String,
    pub check_in_date: StayDate,
    pub number_of_nights: u32,
    pub check_out_date: StayDate,
}

/// Request shape shared by create and extend. For an extension,
/// `number_of_nights` is the number of nights to add and the check-in date is
/// not consulted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub(crate) guest_name: String,
    pub(crate) unit_id: String,
    pub(crate) check_in_date: Option<StayDate>,
    pub(crate) number_of_nights: u32,
}

impl StayDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
    pub fn to_naive_date(&self) -> NaiveDate {
        self.0
    }
    /// `None` when the result falls outside chrono's supported range.
    pub fn plus_nights(&self, nights: u32) -> Option<Self> {
        self.0.checked_add_days(Days::new(u64::from(nights))).map(Self)
    }
    /// Signed number of days from `self` to `later`.
    pub fn days_until(&self, later: &StayDate) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl Booking {
    /// Inclusive overlap of this stay with `[check_in, check_out]`.
    pub fn overlaps(&self, check_in: &StayDate, check_out: &StayDate) -> bool {
        self.check_in_date <= *check_out && *check_in <= self.check_out_date
    }
    /// Whether `date` falls inside this stay, both ends included.
    pub fn covers(&self, date: &StayDate) -> bool {
        self.check_in_date <= *date && *date <= self.check_out_date
    }
}

impl NewBooking {
    pub fn into_booking(self, id: String, created_at: TimeStamp<Utc>) -> Booking {
        Booking {
            id,
            guest_name: self.guest_name,
            unit_id: self.unit_id,
            check_in_date: self.check_in_date,
            number_of_nights: self.number_of_nights,
            check_out_date: self.check_out_date,
            created_at,
        }
    }
}

impl BookingRequest {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_guest_name(mut self, guest_name: &str) -> Self {
        self.guest_name = guest_name.to_string();
        self
    }
    pub fn set_unit_id(mut self, unit_id: &str) -> Self {
        self.unit_id = unit_id.to_string();
        self
    }
    pub fn set_check_in_date(mut self, date: StayDate) -> Self {
        self.check_in_date = Some(date);
        self
    }
    pub fn set_number_of_nights(mut self, nights: u32) -> Self {
        self.number_of_nights = nights;
        self
    }
    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }
    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }
    pub fn check_in_date(&self) -> Option<StayDate> {
        self.check_in_date
    }
    pub fn number_of_nights(&self) -> u32 {
        self.number_of_nights
    }

    fn validate_common(&self) -> Result<(), BookingError> {
        if self.guest_name.trim().is_empty() {
            return Err(BookingError::InvalidRequest("guest name is empty".into()));
        }
        if self.unit_id.trim().is_empty() {
            return Err(BookingError::InvalidRequest("unit id is empty".into()));
        }
        if self.number_of_nights == 0 {
            return Err(BookingError::InvalidRequest(
                "number of nights is set to zero".into(),
            ));
        }
        Ok(())
    }

    // Checks fields and derives the checkout date for a new stay.
    pub fn validate_and_finalise(&self) -> Result<NewBooking, BookingError> {
        self.validate_common()?;

        let check_in_date = self
            .check_in_date
            .ok_or_else(|| BookingError::InvalidRequest("check-in date is not set".into()))?;
        let check_out_date = check_in_date
            .plus_nights(self.number_of_nights)
            .ok_or_else(|| BookingError::InvalidRequest("check-out date is out of range".into()))?;

        Ok(NewBooking {
            guest_name: self.guest_name.clone(),
            unit_id: self.unit_id.clone(),
            check_in_date,
            number_of_nights: self.number_of_nights,
            check_out_date,
        })
    }

    pub fn validate_extension(&self) -> Result<(), BookingError> {
        self.validate_common()
    }
}

impl From<NaiveDate> for StayDate {
    fn from(value: NaiveDate) -> Self {
        StayDate(value)
    }
}

impl FromStr for StayDate {
    type Err = chrono::ParseError;

    // ISO dates, e.g. 2024-01-31
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::from_str(s).map(StayDate)
    }
}

impl fmt::Display for StayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for StayDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(chrono::Datelike::num_days_from_ce(&self.0))?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for StayDate {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(StayDate)
            .ok_or(minicbor::decode::Error::message(
                "failed to convert day count to a calendar date",
            ))
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
