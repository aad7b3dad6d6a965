mod duration;
mod ids;

pub use duration::DurationMinutes;
pub use ids::{BlockingId, EmployeeId, EquipmentId, ReservationId, ScenarioId, ServiceId};
