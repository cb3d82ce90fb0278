use crate::model::Passenger;

/// Validation failures for a registration attempt. Nothing is mutated when
/// one of these is returned; in particular the ID counter does not advance.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Invalid phone number: must be exactly 10 digits")]
    InvalidPhone,

    #[error("Invalid email address: must contain '@'")]
    InvalidEmail,

    #[error("Invalid age: must be greater than 0")]
    InvalidAge,
}

/// Registered passengers in registration order, plus the sequence counter
/// behind the `P0001`-style IDs.
#[derive(Debug)]
pub struct PassengerRegistry {
    passengers: Vec<Passenger>,
    next_sequence: u32,
}

impl Default for PassengerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PassengerRegistry {
    pub fn new() -> Self {
        Self {
            passengers: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Validate and register a new passenger, assigning the next sequential
    /// ID. The registration stands for the rest of the process regardless of
    /// whether it also reaches durable storage.
    pub fn register(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: &str,
        age: u32,
    ) -> Result<Passenger, RegistrationError> {
        if phone_number.len() != 10 || !phone_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(RegistrationError::InvalidPhone);
        }
        if !email.contains('@') {
            return Err(RegistrationError::InvalidEmail);
        }
        if age == 0 {
            return Err(RegistrationError::InvalidAge);
        }

        let id = format!("P{:04}", self.next_sequence);
        self.next_sequence += 1;

        let passenger = Passenger {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone_number: phone_number.to_string(),
            age,
        };
        self.passengers.push(passenger.clone());
        Ok(passenger)
    }

    pub fn find_by_id(&self, passenger_id: &str) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == passenger_id)
    }

    pub fn all(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Bulk load from storage. The counter resumes at the highest numeric
    /// suffix seen plus one, so IDs stay unique across restarts even when
    /// rows come back out of registration order.
    pub fn restore(&mut self, passengers: Vec<Passenger>) {
        for passenger in passengers {
            if let Some(n) = numeric_suffix(&passenger.id, "P") {
                self.next_sequence = self.next_sequence.max(n + 1);
            }
            self.passengers.push(passenger);
        }
    }
}

/// Numeric tail of an ID like `P0004` or `BK000123`.
pub(crate) fn numeric_suffix(id: &str, prefix: &str) -> Option<u32> {
    id.strip_prefix(prefix)?.parse().ok()
}
