use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled flight with a fixed seat capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: f64,
    pub total_seats: u32,
    pub available_seats: u32,
}

impl Flight {
    /// A freshly scheduled flight starts fully available.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flight_number: impl Into<String>,
        airline: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        price: f64,
        total_seats: u32,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            airline: airline.into(),
            origin: origin.into(),
            destination: destination.into(),
            departure_time,
            arrival_time,
            price,
            total_seats,
            available_seats: total_seats,
        }
    }

    pub fn has_seats(&self) -> bool {
        self.available_seats > 0
    }
}

/// A registered passenger. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: u32,
}

impl Passenger {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Case-insensitive parse of the persisted status column.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seat reservation on one flight for one passenger.
///
/// Flights and passengers are owned by the catalog and registry; a booking
/// references them by their business IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub passenger_id: String,
    pub flight_number: String,
    pub seat_number: String,
    pub booked_at: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}
