use chrono::NaiveDate;

use crate::model::Flight;

/// In-memory flight inventory, kept in load order.
///
/// Seat counts live here and nowhere else: the ledger asks the catalog to
/// reserve or release seats and never touches the numbers directly.
#[derive(Debug, Default)]
pub struct FlightCatalog {
    flights: Vec<Flight>,
}

impl FlightCatalog {
    pub fn new() -> Self {
        Self { flights: Vec::new() }
    }

    pub fn add(&mut self, flight: Flight) {
        self.flights.push(flight);
    }

    /// Exact, case-sensitive flight number lookup.
    pub fn find_by_number(&self, flight_number: &str) -> Option<&Flight> {
        self.flights.iter().find(|f| f.flight_number == flight_number)
    }

    /// Route search: case-insensitive origin/destination match, optional
    /// departure-date filter, flights with open seats only. Results keep
    /// catalog load order; no price or time sorting.
    pub fn search(
        &self,
        origin: &str,
        destination: &str,
        date: Option<NaiveDate>,
    ) -> Vec<&Flight> {
        self.flights
            .iter()
            .filter(|f| {
                f.origin.eq_ignore_ascii_case(origin)
                    && f.destination.eq_ignore_ascii_case(destination)
                    && date.map_or(true, |d| f.departure_time.date_naive() == d)
                    && f.has_seats()
            })
            .collect()
    }

    /// Take one seat. Returns false without touching anything when the
    /// flight is unknown or already full.
    pub fn reserve_seat(&mut self, flight_number: &str) -> bool {
        match self.find_mut(flight_number) {
            Some(flight) if flight.available_seats > 0 => {
                flight.available_seats -= 1;
                true
            }
            _ => false,
        }
    }

    /// Give one seat back, capped at the flight's total capacity.
    pub fn release_seat(&mut self, flight_number: &str) {
        if let Some(flight) = self.find_mut(flight_number) {
            if flight.available_seats < flight.total_seats {
                flight.available_seats += 1;
            }
        }
    }

    pub fn all(&self) -> &[Flight] {
        &self.flights
    }

    /// Flights that still have at least one open seat, in load order.
    pub fn available(&self) -> Vec<&Flight> {
        self.flights.iter().filter(|f| f.has_seats()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    fn find_mut(&mut self, flight_number: &str) -> Option<&mut Flight> {
        self.flights.iter_mut().find(|f| f.flight_number == flight_number)
    }
}
