use serde::Serialize;

use crate::ledger::BookingError;
use crate::system::BookingSystem;

/// Header line matching [`BookingExportRow::csv_line`] field order.
pub const CSV_HEADER: &str =
    "BookingId,PassengerName,FlightNumber,Origin,Destination,Departure,SeatNumber,Status";

/// One booking flattened for export, fields in the fixed report order.
#[derive(Debug, Clone, Serialize)]
pub struct BookingExportRow {
    pub booking_id: String,
    pub passenger_name: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub seat_number: String,
    pub status: String,
}

impl BookingExportRow {
    pub fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.booking_id,
            self.passenger_name,
            self.flight_number,
            self.origin,
            self.destination,
            self.departure_time,
            self.seat_number,
            self.status,
        )
    }
}

/// Flatten one passenger's bookings (cancelled ones included) against the
/// current catalog and registry. Bookings on flights no longer in the
/// catalog are skipped.
pub fn export_rows(
    system: &BookingSystem,
    passenger_id: &str,
) -> Result<Vec<BookingExportRow>, BookingError> {
    let passenger = system
        .find_passenger(passenger_id)
        .ok_or_else(|| BookingError::PassengerNotFound(passenger_id.to_string()))?;
    let name = passenger.full_name();

    let rows = system
        .passenger_bookings(passenger_id)
        .into_iter()
        .filter_map(|booking| {
            let flight = system.find_flight(&booking.flight_number)?;
            Some(BookingExportRow {
                booking_id: booking.id.clone(),
                passenger_name: name.clone(),
                flight_number: flight.flight_number.clone(),
                origin: flight.origin.clone(),
                destination: flight.destination.clone(),
                departure_time: flight.departure_time.format("%Y-%m-%d %H:%M").to_string(),
                seat_number: booking.seat_number.clone(),
                status: booking.status.to_string(),
            })
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Flight;
    use chrono::{TimeZone, Utc};

    async fn seeded_system() -> BookingSystem {
        let dep = Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2025, 6, 10, 11, 45, 0).unwrap();
        let mut system = BookingSystem::new();
        system.add_flight(Flight::new(
            "AI101", "Air India", "Delhi", "Mumbai", dep, arr, 149.99, 180,
        ));
        system
            .register_passenger("John", "Doe", "j@x.com", "1234567890", 30)
            .await
            .unwrap();
        system
    }

    #[tokio::test]
    async fn rows_carry_fields_in_report_order() {
        let mut system = seeded_system().await;
        system.book_ticket("P0001", "AI101").await.unwrap();
        system.book_ticket("P0001", "AI101").await.unwrap();
        system.cancel_booking("BK000002").await.unwrap();

        let rows = export_rows(&system, "P0001").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].csv_line(),
            "BK000001,John Doe,AI101,Delhi,Mumbai,2025-06-10 09:30,A1,CONFIRMED"
        );
        assert_eq!(
            rows[1].csv_line(),
            "BK000002,John Doe,AI101,Delhi,Mumbai,2025-06-10 09:30,A2,CANCELLED"
        );
    }

    #[tokio::test]
    async fn unknown_passenger_is_an_error() {
        let system = seeded_system().await;
        assert!(matches!(
            export_rows(&system, "P0404"),
            Err(BookingError::PassengerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn passenger_with_no_bookings_exports_empty() {
        let system = seeded_system().await;
        assert!(export_rows(&system, "P0001").unwrap().is_empty());
    }
}
