use chrono::Utc;

use crate::catalog::FlightCatalog;
use crate::model::{Booking, BookingStatus};
use crate::registry::numeric_suffix;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    #[error("Passenger not found: {0}")]
    PassengerNotFound(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Booking already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("No seats available on flight {0}")]
    NoSeatsAvailable(String),
}

/// Every booking ever made, in creation order, cancelled ones included.
/// Cancellation flips the status flag; records are never removed.
#[derive(Debug)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    next_sequence: u32,
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingLedger {
    pub fn new() -> Self {
        Self {
            bookings: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Book one seat on `flight_number` for an already-registered passenger.
    ///
    /// The seat is reserved through the catalog first; only once that
    /// succeeds does a booking record exist, so a full flight leaves the
    /// ledger and the seat counts untouched.
    pub fn book(
        &mut self,
        catalog: &mut FlightCatalog,
        passenger_id: &str,
        flight_number: &str,
    ) -> Result<Booking, BookingError> {
        let flight = catalog
            .find_by_number(flight_number)
            .ok_or_else(|| BookingError::FlightNotFound(flight_number.to_string()))?;
        let flight_number = flight.flight_number.clone();
        let total_seats = flight.total_seats;
        let seats_before = flight.available_seats;

        if !catalog.reserve_seat(&flight_number) {
            return Err(BookingError::NoSeatsAvailable(flight_number));
        }

        let id = format!("BK{:06}", self.next_sequence);
        self.next_sequence += 1;

        // reserve_seat succeeded, so seats_before was at least 1.
        let seat_number = seat_number(total_seats, seats_before - 1);

        let booking = Booking {
            id,
            passenger_id: passenger_id.to_string(),
            flight_number,
            seat_number,
            booked_at: Utc::now(),
            status: BookingStatus::Confirmed,
        };
        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Cancel a confirmed booking and release its seat back to the catalog.
    ///
    /// The in-memory status flip is the single source of truth: a booking
    /// that is unknown or already cancelled is a reported no-op, and the
    /// seat is released exactly once per booking.
    pub fn cancel(
        &mut self,
        catalog: &mut FlightCatalog,
        booking_id: &str,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled(booking_id.to_string()));
        }

        booking.status = BookingStatus::Cancelled;
        let booking = booking.clone();
        catalog.release_seat(&booking.flight_number);
        Ok(booking)
    }

    pub fn find(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }

    /// All bookings for one passenger, in creation order, cancelled
    /// bookings included.
    pub fn for_passenger(&self, passenger_id: &str) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| b.passenger_id == passenger_id)
            .collect()
    }

    pub fn all(&self) -> &[Booking] {
        &self.bookings
    }

    /// Bulk load from storage, resuming the ID counter at the highest
    /// numeric suffix seen plus one.
    pub fn restore(&mut self, bookings: Vec<Booking>) {
        for booking in bookings {
            if let Some(n) = numeric_suffix(&booking.id, "BK") {
                self.next_sequence = self.next_sequence.max(n + 1);
            }
            self.bookings.push(booking);
        }
    }
}

/// Seat label for the seat just taken, derived from occupancy alone.
///
/// `n` is the 1-based ordinal of the reservation (total minus available
/// after the decrement), laid out six seats per row: seat 7 is `B1`.
/// Deliberately not checked against existing bookings, so a cancel-and-
/// rebook cycle can hand out the same label twice.
fn seat_number(total_seats: u32, available_seats: u32) -> String {
    let n = total_seats - available_seats;
    // Row letters run past 'Z' into whatever codepoint the offset lands on;
    // large cabins get odd row characters, never a panic.
    let row = char::from_u32('A' as u32 + (n - 1) / 6).unwrap_or('?');
    let col = (n - 1) % 6 + 1;
    format!("{row}{col}")
}
