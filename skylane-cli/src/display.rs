//! Bordered text cards for flights and tickets. Cosmetic only; all of the
//! booking logic lives in skylane-core.

use skylane_core::{Booking, Flight, Passenger};

const WIDTH: usize = 52;

fn line(label: &str, value: &str) -> String {
    format!("| {:<12}: {:<width$} |\n", label, value, width = WIDTH - 18)
}

fn border() -> String {
    format!("+{}+\n", "-".repeat(WIDTH - 2))
}

fn title(text: &str) -> String {
    format!("|{:^width$}|\n", text, width = WIDTH - 2)
}

pub fn flight_card(flight: &Flight) -> String {
    let mut card = String::new();
    card.push_str(&border());
    card.push_str(&title("FLIGHT INFORMATION"));
    card.push_str(&border());
    card.push_str(&line(
        "Flight",
        &format!("{} ({})", flight.flight_number, flight.airline),
    ));
    card.push_str(&line(
        "Route",
        &format!("{} -> {}", flight.origin, flight.destination),
    ));
    card.push_str(&line(
        "Departure",
        &flight.departure_time.format("%Y-%m-%d %H:%M").to_string(),
    ));
    card.push_str(&line(
        "Arrival",
        &flight.arrival_time.format("%Y-%m-%d %H:%M").to_string(),
    ));
    card.push_str(&line("Price", &format!("${:.2}", flight.price)));
    card.push_str(&line(
        "Seats",
        &format!("{} available out of {}", flight.available_seats, flight.total_seats),
    ));
    card.push_str(&border());
    card
}

pub fn ticket_card(booking: &Booking, flight: &Flight, passenger: &Passenger) -> String {
    let mut card = String::new();
    card.push_str(&border());
    card.push_str(&title("FLIGHT TICKET"));
    card.push_str(&border());
    card.push_str(&line("Booking ID", &booking.id));
    card.push_str(&line("Passenger", &passenger.full_name()));
    card.push_str(&line("Status", booking.status.as_str()));
    card.push_str(&border());
    card.push_str(&line("Flight", &flight.flight_number));
    card.push_str(&line("Airline", &flight.airline));
    card.push_str(&line(
        "Route",
        &format!("{} -> {}", flight.origin, flight.destination),
    ));
    card.push_str(&line(
        "Departure",
        &flight.departure_time.format("%Y-%m-%d %H:%M").to_string(),
    ));
    card.push_str(&line("Seat", &booking.seat_number));
    card.push_str(&border());
    card.push_str(&line("Amount Paid", &format!("${:.2}", flight.price)));
    card.push_str(&line(
        "Booked On",
        &booking.booked_at.format("%Y-%m-%d %H:%M").to_string(),
    ));
    card.push_str(&border());
    card
}

pub fn passenger_line(passenger: &Passenger) -> String {
    format!(
        "Passenger: {} (ID: {}, Age: {})",
        passenger.full_name(),
        passenger.id,
        passenger.age
    )
}
