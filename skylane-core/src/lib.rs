pub mod catalog;
pub mod export;
pub mod ledger;
pub mod model;
pub mod registry;
pub mod store;
pub mod system;

pub use catalog::FlightCatalog;
pub use export::{BookingExportRow, CSV_HEADER};
pub use ledger::{BookingError, BookingLedger};
pub use model::{Booking, BookingStatus, Flight, Passenger};
pub use registry::{PassengerRegistry, RegistrationError};
pub use store::{BookingRecord, PersistenceAdapter};
pub use system::BookingSystem;
