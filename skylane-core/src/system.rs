use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::catalog::FlightCatalog;
use crate::ledger::{BookingError, BookingLedger};
use crate::model::{Booking, Flight, Passenger};
use crate::registry::{PassengerRegistry, RegistrationError};
use crate::store::{BookingRecord, PersistenceAdapter};

/// Front door for the booking core: owns the catalog, the registry and the
/// ledger, and mirrors every successful mutation to the attached adapter.
///
/// Mutating operations take `&mut self`, so each check-then-act sequence
/// (seat check, decrement, ID assignment, append) is a single critical
/// section. Exposing the system to concurrent callers means putting one
/// lock around the whole value, not around its parts.
pub struct BookingSystem {
    catalog: FlightCatalog,
    registry: PassengerRegistry,
    ledger: BookingLedger,
    adapter: Option<Arc<dyn PersistenceAdapter>>,
}

impl Default for BookingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingSystem {
    /// A system with no durable mirror; state lives for the process only.
    pub fn new() -> Self {
        Self {
            catalog: FlightCatalog::new(),
            registry: PassengerRegistry::new(),
            ledger: BookingLedger::new(),
            adapter: None,
        }
    }

    /// Restore state through a persistence adapter and keep it attached as
    /// the best-effort mirror for later mutations.
    ///
    /// Each load failure is logged and leaves that collection empty; a
    /// half-reachable store never prevents startup. Booking rows whose
    /// passenger or flight is unknown are skipped.
    pub async fn load(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        let mut system = Self::new();

        match adapter.load_flights().await {
            Ok(flights) => {
                info!(count = flights.len(), "Loaded flights from store");
                for flight in flights {
                    system.catalog.add(flight);
                }
            }
            Err(e) => warn!("Failed to load flights: {e}"),
        }

        match adapter.load_passengers().await {
            Ok(passengers) => {
                info!(count = passengers.len(), "Loaded passengers from store");
                system.registry.restore(passengers);
            }
            Err(e) => warn!("Failed to load passengers: {e}"),
        }

        match adapter.load_bookings().await {
            Ok(records) => {
                let bookings: Vec<Booking> = records
                    .into_iter()
                    .filter(|r| {
                        system.registry.find_by_id(&r.passenger_id).is_some()
                            && system.catalog.find_by_number(&r.flight_number).is_some()
                    })
                    .map(BookingRecord::into_booking)
                    .collect();
                info!(count = bookings.len(), "Loaded bookings from store");
                system.ledger.restore(bookings);
            }
            Err(e) => warn!("Failed to load bookings: {e}"),
        }

        system.adapter = Some(adapter);
        system
    }

    /// Seed the catalog directly, for running without a store attached.
    pub fn add_flight(&mut self, flight: Flight) {
        self.catalog.add(flight);
    }

    /// Register a passenger and mirror the record to the store. The
    /// registration stands even when the mirror write fails.
    pub async fn register_passenger(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: &str,
        age: u32,
    ) -> Result<Passenger, RegistrationError> {
        let passenger = self
            .registry
            .register(first_name, last_name, email, phone_number, age)?;
        info!(id = %passenger.id, "Registered passenger");

        if let Some(adapter) = &self.adapter {
            if let Err(e) = adapter.upsert_passenger(&passenger).await {
                warn!(id = %passenger.id, "Failed to persist passenger: {e}");
            }
        }
        Ok(passenger)
    }

    /// Book a seat for a registered passenger, then mirror the new booking
    /// row and the flight's seat count.
    pub async fn book_ticket(
        &mut self,
        passenger_id: &str,
        flight_number: &str,
    ) -> Result<Booking, BookingError> {
        if self.registry.find_by_id(passenger_id).is_none() {
            return Err(BookingError::PassengerNotFound(passenger_id.to_string()));
        }

        let booking = self.ledger.book(&mut self.catalog, passenger_id, flight_number)?;
        info!(id = %booking.id, flight = %booking.flight_number, seat = %booking.seat_number, "Booked ticket");

        if let Some(adapter) = &self.adapter {
            if let Err(e) = adapter.insert_booking(&BookingRecord::from(&booking)).await {
                warn!(id = %booking.id, "Failed to persist booking: {e}");
            }
            self.mirror_seat_count(&booking.flight_number).await;
        }
        Ok(booking)
    }

    /// Cancel a confirmed booking. The in-memory flip plus seat release is
    /// the source of truth; the store is told afterwards.
    pub async fn cancel_booking(&mut self, booking_id: &str) -> Result<Booking, BookingError> {
        let booking = self.ledger.cancel(&mut self.catalog, booking_id)?;
        info!(id = %booking.id, "Cancelled booking");

        if let Some(adapter) = &self.adapter {
            if let Err(e) = adapter.update_booking_status(&booking.id, booking.status).await {
                warn!(id = %booking.id, "Failed to persist cancellation: {e}");
            }
            self.mirror_seat_count(&booking.flight_number).await;
        }
        Ok(booking)
    }

    pub fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        date: Option<NaiveDate>,
    ) -> Vec<&Flight> {
        self.catalog.search(origin, destination, date)
    }

    pub fn available_flights(&self) -> Vec<&Flight> {
        self.catalog.available()
    }

    pub fn find_flight(&self, flight_number: &str) -> Option<&Flight> {
        self.catalog.find_by_number(flight_number)
    }

    pub fn find_passenger(&self, passenger_id: &str) -> Option<&Passenger> {
        self.registry.find_by_id(passenger_id)
    }

    pub fn passengers(&self) -> &[Passenger] {
        self.registry.all()
    }

    pub fn booking_details(&self, booking_id: &str) -> Option<&Booking> {
        self.ledger.find(booking_id)
    }

    pub fn passenger_bookings(&self, passenger_id: &str) -> Vec<&Booking> {
        self.ledger.for_passenger(passenger_id)
    }

    pub fn has_flights(&self) -> bool {
        !self.catalog.is_empty()
    }

    pub fn has_passengers(&self) -> bool {
        !self.registry.all().is_empty()
    }

    async fn mirror_seat_count(&self, flight_number: &str) {
        let Some(adapter) = &self.adapter else { return };
        let Some(flight) = self.catalog.find_by_number(flight_number) else { return };
        debug!(flight = %flight_number, seats = flight.available_seats, "Mirroring seat count");
        if let Err(e) = adapter
            .update_flight_seats(flight_number, flight.available_seats)
            .await
        {
            warn!(flight = %flight_number, "Failed to persist seat count: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookingStatus;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn sample_flight(number: &str, seats: u32) -> Flight {
        let dep = Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap();
        let arr = Utc.with_ymd_and_hms(2025, 6, 10, 11, 45, 0).unwrap();
        Flight::new(number, "Air India", "Delhi", "Mumbai", dep, arr, 149.99, seats)
    }

    /// Records every call; optionally refuses all writes, or all loads.
    #[derive(Default)]
    struct MockAdapter {
        flights: Vec<Flight>,
        passengers: Vec<Passenger>,
        bookings: Vec<BookingRecord>,
        fail_writes: bool,
        fail_loads: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockAdapter {
        fn log(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    #[async_trait::async_trait]
    impl PersistenceAdapter for MockAdapter {
        async fn load_flights(
            &self,
        ) -> Result<Vec<Flight>, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_loads {
                return Err("store unreachable".into());
            }
            Ok(self.flights.clone())
        }

        async fn load_passengers(
            &self,
        ) -> Result<Vec<Passenger>, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_loads {
                return Err("store unreachable".into());
            }
            Ok(self.passengers.clone())
        }

        async fn load_bookings(
            &self,
        ) -> Result<Vec<BookingRecord>, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_loads {
                return Err("store unreachable".into());
            }
            Ok(self.bookings.clone())
        }

        async fn upsert_passenger(
            &self,
            passenger: &Passenger,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_writes {
                return Err("store unavailable".into());
            }
            self.log(format!("upsert_passenger {}", passenger.id));
            Ok(())
        }

        async fn insert_booking(
            &self,
            booking: &BookingRecord,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_writes {
                return Err("store unavailable".into());
            }
            self.log(format!("insert_booking {}", booking.id));
            Ok(())
        }

        async fn update_booking_status(
            &self,
            booking_id: &str,
            status: BookingStatus,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_writes {
                return Err("store unavailable".into());
            }
            self.log(format!("update_booking_status {booking_id} {status}"));
            Ok(())
        }

        async fn update_flight_seats(
            &self,
            flight_number: &str,
            available_seats: u32,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_writes {
                return Err("store unavailable".into());
            }
            self.log(format!("update_flight_seats {flight_number} {available_seats}"));
            Ok(())
        }
    }

    fn passenger_row(id: &str) -> Passenger {
        Passenger {
            id: id.to_string(),
            first_name: "Jane".into(),
            last_name: "Roe".into(),
            email: "jane@example.com".into(),
            phone_number: "9876543210".into(),
            age: 41,
        }
    }

    fn booking_row(id: &str, passenger_id: &str, flight_number: &str) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            passenger_id: passenger_id.to_string(),
            flight_number: flight_number.to_string(),
            seat_number: "A1".into(),
            booked_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            status: BookingStatus::Confirmed,
        }
    }

    #[tokio::test]
    async fn register_book_cancel_round_trip() {
        let mut system = BookingSystem::new();
        system.add_flight(sample_flight("AI101", 180));

        let passenger = system
            .register_passenger("John", "Doe", "j@x.com", "1234567890", 30)
            .await
            .unwrap();
        assert_eq!(passenger.id, "P0001");

        let booking = system.book_ticket("P0001", "AI101").await.unwrap();
        assert_eq!(booking.id, "BK000001");
        assert_eq!(booking.seat_number, "A1");
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 179);

        let cancelled = system.cancel_booking("BK000001").await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 180);

        assert!(matches!(
            system.cancel_booking("BK000001").await,
            Err(BookingError::AlreadyCancelled(_))
        ));
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 180);
    }

    #[tokio::test]
    async fn booking_requires_a_registered_passenger() {
        let mut system = BookingSystem::new();
        system.add_flight(sample_flight("AI101", 180));

        let err = system.book_ticket("P0009", "AI101").await.unwrap_err();
        assert!(matches!(err, BookingError::PassengerNotFound(_)));
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 180);
    }

    #[tokio::test]
    async fn mutations_are_mirrored_to_the_adapter() {
        let adapter = Arc::new(MockAdapter {
            flights: vec![sample_flight("AI101", 180)],
            ..Default::default()
        });
        let mut system = BookingSystem::load(adapter.clone()).await;

        system
            .register_passenger("John", "Doe", "j@x.com", "1234567890", 30)
            .await
            .unwrap();
        system.book_ticket("P0001", "AI101").await.unwrap();
        system.cancel_booking("BK000001").await.unwrap();

        let calls = adapter.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "upsert_passenger P0001",
                "insert_booking BK000001",
                "update_flight_seats AI101 179",
                "update_booking_status BK000001 CANCELLED",
                "update_flight_seats AI101 180",
            ]
        );
    }

    #[tokio::test]
    async fn store_failures_never_fail_the_operation() {
        let adapter = Arc::new(MockAdapter {
            flights: vec![sample_flight("AI101", 180)],
            fail_writes: true,
            ..Default::default()
        });
        let mut system = BookingSystem::load(adapter).await;

        let passenger = system
            .register_passenger("John", "Doe", "j@x.com", "1234567890", 30)
            .await
            .unwrap();
        assert_eq!(passenger.id, "P0001");
        assert!(system.find_passenger("P0001").is_some());

        let booking = system.book_ticket("P0001", "AI101").await.unwrap();
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 179);

        system.cancel_booking(&booking.id).await.unwrap();
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 180);
    }

    #[tokio::test]
    async fn unreachable_store_yields_an_empty_working_system() {
        let adapter = Arc::new(MockAdapter {
            flights: vec![sample_flight("AI101", 180)],
            passengers: vec![passenger_row("P0001")],
            bookings: vec![booking_row("BK000001", "P0001", "AI101")],
            fail_loads: true,
            ..Default::default()
        });
        let mut system = BookingSystem::load(adapter).await;

        // Every collection comes up empty instead of the process dying.
        assert!(!system.has_flights());
        assert!(!system.has_passengers());
        assert!(system.booking_details("BK000001").is_none());

        // The system is still fully usable in memory afterwards.
        system.add_flight(sample_flight("AI101", 180));
        let passenger = system
            .register_passenger("John", "Doe", "j@x.com", "1234567890", 30)
            .await
            .unwrap();
        assert_eq!(passenger.id, "P0001");

        let booking = system.book_ticket("P0001", "AI101").await.unwrap();
        assert_eq!(booking.id, "BK000001");
        assert_eq!(system.find_flight("AI101").unwrap().available_seats, 179);
    }

    #[tokio::test]
    async fn load_skips_bookings_with_dangling_references() {
        let adapter = Arc::new(MockAdapter {
            flights: vec![sample_flight("AI101", 180)],
            passengers: vec![passenger_row("P0001")],
            bookings: vec![
                booking_row("BK000001", "P0001", "AI101"),
                booking_row("BK000002", "P0404", "AI101"),
                booking_row("BK000003", "P0001", "ZZ999"),
            ],
            ..Default::default()
        });
        let system = BookingSystem::load(adapter).await;

        assert!(system.booking_details("BK000001").is_some());
        assert!(system.booking_details("BK000002").is_none());
        assert!(system.booking_details("BK000003").is_none());
    }

    #[tokio::test]
    async fn counters_resume_past_restored_records() {
        let adapter = Arc::new(MockAdapter {
            flights: vec![sample_flight("AI101", 180)],
            passengers: vec![passenger_row("P0004")],
            bookings: vec![booking_row("BK000123", "P0004", "AI101")],
            ..Default::default()
        });
        let mut system = BookingSystem::load(adapter).await;

        let passenger = system
            .register_passenger("John", "Doe", "j@x.com", "1234567890", 30)
            .await
            .unwrap();
        assert_eq!(passenger.id, "P0005");

        let booking = system.book_ticket("P0005", "AI101").await.unwrap();
        assert_eq!(booking.id, "BK000124");
    }
}
