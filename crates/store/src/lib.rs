pub mod blocking_log;
pub mod cascade;
pub mod reservation;
pub mod reservation_manager;
pub mod reservation_store;
pub mod scenario_store;

pub use blocking_log::{NewOperationalBlocking, OperationalBlocking};
pub use cascade::{CascadeManager, ProcessedReservation};
pub use reservation::{NewReservation, Reservation, ReservationState, ReservationUpdate};
pub use reservation_manager::{CreateReservationRequest, ReservationManager};
pub use reservation_store::ReservationStore;
pub use scenario_store::{FixtureError, FixtureRepositories};
