pub mod availability;
pub mod axis;
pub mod balancing;
pub mod blocking;
pub mod interval;
pub mod model;
pub mod repository;
pub mod window;

pub use availability::{AvailabilityContext, AvailabilityRequest, Candidate};
pub use balancing::Regime;
pub use interval::{Interval, IntervalSet};
pub use model::{
    BlockingScope, DayWindow, EmployeeSchedule, Equipment, EquipmentSelectionPolicy, Exception,
    Occupation, Scenario, Service, ServiceWindowPolicy,
};
