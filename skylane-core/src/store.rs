use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Booking, BookingStatus, Flight, Passenger};

/// A booking row as it comes back from storage, before its passenger and
/// flight references have been resolved against the loaded collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub passenger_id: String,
    pub flight_number: String,
    pub seat_number: String,
    pub booked_at: DateTime<Utc>,
    pub status: BookingStatus,
}

impl From<&Booking> for BookingRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            passenger_id: booking.passenger_id.clone(),
            flight_number: booking.flight_number.clone(),
            seat_number: booking.seat_number.clone(),
            booked_at: booking.booked_at,
            status: booking.status,
        }
    }
}

impl BookingRecord {
    /// Promote a resolved row into a ledger booking.
    pub fn into_booking(self) -> Booking {
        Booking {
            id: self.id,
            passenger_id: self.passenger_id,
            flight_number: self.flight_number,
            seat_number: self.seat_number,
            booked_at: self.booked_at,
            status: self.status,
        }
    }
}

/// Optional durable mirror of the in-memory collections.
///
/// Memory is authoritative: every write here is best-effort, and a failure
/// is logged by the caller without rolling back the in-memory change. The
/// core works identically with no adapter attached.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    async fn load_flights(
        &self,
    ) -> Result<Vec<Flight>, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_passengers(
        &self,
    ) -> Result<Vec<Passenger>, Box<dyn std::error::Error + Send + Sync>>;

    async fn load_bookings(
        &self,
    ) -> Result<Vec<BookingRecord>, Box<dyn std::error::Error + Send + Sync>>;

    async fn upsert_passenger(
        &self,
        passenger: &Passenger,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn insert_booking(
        &self,
        booking: &BookingRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn update_flight_seats(
        &self,
        flight_number: &str,
        available_seats: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
