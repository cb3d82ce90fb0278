use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use skylane_core::{BookingRecord, BookingStatus, Flight, Passenger, PersistenceAdapter};

/// Postgres mirror of the in-memory catalog, registry and ledger.
///
/// Memory stays authoritative; this adapter only loads the starting state
/// and receives best-effort writes after each mutation.
pub struct PostgresAdapter {
    pool: PgPool,
}

impl PostgresAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    flight_number: String,
    airline: String,
    origin: String,
    destination: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price: f64,
    total_seats: i32,
    available_seats: i32,
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    passenger_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    age: i32,
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    booking_id: String,
    passenger_id: String,
    flight_number: String,
    seat_number: String,
    booked_at: DateTime<Utc>,
    status: String,
}

#[async_trait]
impl PersistenceAdapter for PostgresAdapter {
    async fn load_flights(
        &self,
    ) -> Result<Vec<Flight>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<FlightRow> = sqlx::query_as(
            r#"
            SELECT flight_number, airline, origin, destination,
                   departure_time, arrival_time, price, total_seats, available_seats
            FROM flights
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Flight {
                flight_number: row.flight_number,
                airline: row.airline,
                origin: row.origin,
                destination: row.destination,
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
                price: row.price,
                total_seats: row.total_seats.max(0) as u32,
                available_seats: row.available_seats.max(0) as u32,
            })
            .collect())
    }

    async fn load_passengers(
        &self,
    ) -> Result<Vec<Passenger>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<PassengerRow> = sqlx::query_as(
            r#"
            SELECT passenger_id, first_name, last_name, email, phone_number, age
            FROM passengers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Passenger {
                id: row.passenger_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone_number: row.phone_number,
                age: row.age.max(0) as u32,
            })
            .collect())
    }

    async fn load_bookings(
        &self,
    ) -> Result<Vec<BookingRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT booking_id, passenger_id, flight_number, seat_number, booked_at, status
            FROM bookings
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .filter_map(|row| {
                let Some(status) = BookingStatus::parse(&row.status) else {
                    warn!(id = %row.booking_id, status = %row.status, "Skipping booking with unknown status");
                    return None;
                };
                Some(BookingRecord {
                    id: row.booking_id,
                    passenger_id: row.passenger_id,
                    flight_number: row.flight_number,
                    seat_number: row.seat_number,
                    booked_at: row.booked_at,
                    status,
                })
            })
            .collect();
        Ok(records)
    }

    async fn upsert_passenger(
        &self,
        passenger: &Passenger,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO passengers (passenger_id, first_name, last_name, email, phone_number, age)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (passenger_id) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                phone_number = EXCLUDED.phone_number,
                age = EXCLUDED.age
            "#,
        )
        .bind(&passenger.id)
        .bind(&passenger.first_name)
        .bind(&passenger.last_name)
        .bind(&passenger.email)
        .bind(&passenger.phone_number)
        .bind(passenger.age as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_booking(
        &self,
        booking: &BookingRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO bookings (booking_id, passenger_id, flight_number, seat_number, booked_at, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.passenger_id)
        .bind(&booking.flight_number)
        .bind(&booking.seat_number)
        .bind(booking.booked_at)
        .bind(booking.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE bookings SET status = $1 WHERE booking_id = $2")
            .bind(status.as_str())
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_flight_seats(
        &self,
        flight_number: &str,
        available_seats: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE flights SET available_seats = $1 WHERE flight_number = $2")
            .bind(available_seats as i32)
            .bind(flight_number)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
