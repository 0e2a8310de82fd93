//! Domain model structs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row for its collection.

pub mod locker;
pub mod reservation;
pub mod shipment;

pub use locker::Locker;
pub use reservation::{Reservation, ReservationStatus, ReservationView};
pub use shipment::Shipment;
