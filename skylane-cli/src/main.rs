mod display;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use skylane_core::{export, BookingSystem, Flight, CSV_HEADER};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylane=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut system = connect().await;

    println!("=== WELCOME TO FLIGHT BOOKING SYSTEM ===");
    loop {
        print_menu();
        let choice = prompt("Enter your choice (1-10): ")?;
        match choice.as_str() {
            "1" => register_passenger(&mut system).await?,
            "2" => display_available_flights(&system),
            "3" => search_flights(&system)?,
            "4" => book_ticket(&mut system).await?,
            "5" => booking_details(&system)?,
            "6" => passenger_bookings(&system)?,
            "7" => cancel_booking(&mut system).await?,
            "8" => display_passengers(&system),
            "9" => export_bookings(&system)?,
            "10" => {
                println!("\nThank you for using Flight Booking System!");
                println!("Have a safe journey!");
                return Ok(());
            }
            _ => println!("Invalid choice! Please select a number between 1-10."),
        }
    }
}

/// Attach the Postgres mirror when it is reachable; otherwise run with an
/// in-memory sample schedule. The booking core behaves identically either way.
async fn connect() -> BookingSystem {
    match skylane_store::Config::load() {
        Ok(config) => match skylane_store::DbClient::new(&config.database.url).await {
            Ok(db) => {
                if let Err(e) = db.migrate().await {
                    warn!("Migration failed: {e}");
                }
                let adapter = Arc::new(skylane_store::PostgresAdapter::new(db.pool.clone()));
                return BookingSystem::load(adapter).await;
            }
            Err(e) => warn!("Database unavailable, running in memory: {e}"),
        },
        Err(e) => warn!("No configuration found, running in memory: {e}"),
    }

    let mut system = BookingSystem::new();
    for flight in sample_schedule() {
        system.add_flight(flight);
    }
    system
}

/// Matches the seed rows in migrations/0001_init.sql.
fn sample_schedule() -> Vec<Flight> {
    let at = |m: u32, d: u32, h: u32, min: u32| Utc.with_ymd_and_hms(2025, m, d, h, min, 0).unwrap();
    vec![
        Flight::new("AI101", "Air India", "Delhi", "Mumbai", at(6, 10, 9, 30), at(6, 10, 11, 45), 149.99, 180),
        Flight::new("AI202", "Air India", "Mumbai", "Delhi", at(6, 10, 14, 0), at(6, 10, 16, 10), 139.50, 180),
        Flight::new("6E331", "IndiGo", "Delhi", "Bengaluru", at(6, 11, 7, 15), at(6, 11, 10, 0), 120.00, 186),
        Flight::new("BA900", "British Airways", "London", "Paris", at(6, 12, 8, 45), at(6, 12, 11, 5), 210.75, 120),
    ]
}

fn print_menu() {
    println!("\n=== FLIGHT BOOKING SYSTEM MENU ===");
    println!("1. Register New Passenger");
    println!("2. Display All Available Flights");
    println!("3. Search Flights by Route and Date");
    println!("4. Book Flight Ticket");
    println!("5. View Booking Details");
    println!("6. View Passenger Bookings");
    println!("7. Cancel Booking");
    println!("8. Display All Passengers");
    println!("9. Export Passenger Bookings to CSV");
    println!("10. Exit");
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn register_passenger(system: &mut BookingSystem) -> anyhow::Result<()> {
    println!("\n=== PASSENGER REGISTRATION ===");
    let first_name = prompt("First Name: ")?;
    let last_name = prompt("Last Name: ")?;
    let email = prompt("Email: ")?;
    let phone = prompt("Phone Number: ")?;
    let age = match prompt("Age: ")?.parse::<u32>() {
        Ok(age) => age,
        Err(_) => {
            println!("Invalid input! Please enter a valid number.");
            return Ok(());
        }
    };

    match system.register_passenger(&first_name, &last_name, &email, &phone, age).await {
        Ok(passenger) => {
            println!("\nPassenger registered successfully!");
            println!("{}", display::passenger_line(&passenger));
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn display_available_flights(system: &BookingSystem) {
    println!("\n=== AVAILABLE FLIGHTS ===");
    let flights = system.available_flights();
    if flights.is_empty() {
        println!("No flights with available seats.");
        return;
    }
    for flight in flights {
        print!("{}", display::flight_card(flight));
    }
}

fn search_flights(system: &BookingSystem) -> anyhow::Result<()> {
    println!("\n=== FLIGHT SEARCH ===");
    let origin = prompt("Enter origin city: ")?;
    let destination = prompt("Enter destination city: ")?;
    let date_input = prompt("Enter departure date (yyyy-mm-dd, blank for any): ")?;

    let date = if date_input.is_empty() {
        None
    } else {
        match NaiveDate::parse_from_str(&date_input, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                println!("Invalid date format! Please use yyyy-mm-dd.");
                return Ok(());
            }
        }
    };

    let results = system.search_flights(&origin, &destination, date);
    if results.is_empty() {
        println!("No flights found for the route: {origin} -> {destination}");
    } else {
        println!("\n=== SEARCH RESULTS: {origin} -> {destination} ===");
        for flight in results {
            print!("{}", display::flight_card(flight));
        }
    }
    Ok(())
}

async fn book_ticket(system: &mut BookingSystem) -> anyhow::Result<()> {
    println!("\n=== FLIGHT BOOKING ===");
    if !system.has_passengers() {
        println!("Please register a passenger first (Option 1).");
        return Ok(());
    }

    let passenger_id = prompt("Enter Passenger ID: ")?;
    let flight_number = prompt("Enter Flight Number: ")?;

    match system.book_ticket(&passenger_id, &flight_number).await {
        Ok(booking) => {
            println!("\nBooking successful!");
            print_ticket(system, &booking.id);
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn booking_details(system: &BookingSystem) -> anyhow::Result<()> {
    println!("\n=== BOOKING DETAILS ===");
    let booking_id = prompt("Enter Booking ID: ")?;
    if system.booking_details(&booking_id).is_some() {
        print_ticket(system, &booking_id);
    } else {
        println!("Booking not found with ID: {booking_id}");
    }
    Ok(())
}

fn passenger_bookings(system: &BookingSystem) -> anyhow::Result<()> {
    println!("\n=== PASSENGER BOOKINGS ===");
    let passenger_id = prompt("Enter Passenger ID: ")?;
    if system.find_passenger(&passenger_id).is_none() {
        println!("Passenger not found with ID: {passenger_id}");
        return Ok(());
    }

    let bookings = system.passenger_bookings(&passenger_id);
    if bookings.is_empty() {
        println!("No bookings found for this passenger.");
        return Ok(());
    }
    let ids: Vec<String> = bookings.iter().map(|b| b.id.clone()).collect();
    for id in ids {
        print_ticket(system, &id);
    }
    Ok(())
}

async fn cancel_booking(system: &mut BookingSystem) -> anyhow::Result<()> {
    println!("\n=== CANCEL BOOKING ===");
    let booking_id = prompt("Enter Booking ID to cancel: ")?;
    let confirmation = prompt(&format!(
        "Are you sure you want to cancel booking {booking_id}? (y/n): "
    ))?;
    if !confirmation.eq_ignore_ascii_case("y") && !confirmation.eq_ignore_ascii_case("yes") {
        println!("Booking cancellation aborted.");
        return Ok(());
    }

    match system.cancel_booking(&booking_id).await {
        Ok(booking) => println!("Booking {} cancelled.", booking.id),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn display_passengers(system: &BookingSystem) {
    if !system.has_passengers() {
        println!("No passengers registered yet.");
        return;
    }
    println!("\n=== REGISTERED PASSENGERS ===");
    for passenger in system.passengers() {
        println!("{}", display::passenger_line(passenger));
    }
}

fn export_bookings(system: &BookingSystem) -> anyhow::Result<()> {
    println!("\n=== EXPORT PASSENGER BOOKINGS ===");
    let passenger_id = prompt("Enter Passenger ID: ")?;

    let rows = match export::export_rows(system, &passenger_id) {
        Ok(rows) => rows,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let file_name = format!("{passenger_id}_bookings.csv");
    match write_csv(&file_name, &rows) {
        Ok(()) => println!("Bookings exported to file: {file_name}"),
        Err(e) => println!("Error exporting CSV: {e}"),
    }
    Ok(())
}

fn write_csv(file_name: &str, rows: &[export::BookingExportRow]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(file_name)?);
    writeln!(writer, "{CSV_HEADER}")?;
    for row in rows {
        writeln!(writer, "{}", row.csv_line())?;
    }
    writer.flush()
}

/// Render one booking as a ticket card, resolving its flight and passenger.
fn print_ticket(system: &BookingSystem, booking_id: &str) {
    let Some(booking) = system.booking_details(booking_id) else { return };
    let flight = system.find_flight(&booking.flight_number);
    let passenger = system.find_passenger(&booking.passenger_id);
    match (flight, passenger) {
        (Some(flight), Some(passenger)) => {
            print!("{}", display::ticket_card(booking, flight, passenger));
        }
        _ => println!(
            "{} {} seat {} [{}]",
            booking.id, booking.flight_number, booking.seat_number, booking.status
        ),
    }
}
