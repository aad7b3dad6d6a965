use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ServiceId, "Unique identifier for a service");
define_id!(EmployeeId, "Unique identifier for an employee");
define_id!(EquipmentId, "Unique identifier for a piece of equipment");
define_id!(ReservationId, "Unique identifier for a reservation");
define_id!(BlockingId, "Unique identifier for an operational blocking");
define_id!(ScenarioId, "Unique identifier for a test scenario fixture");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation_is_unique() {
        let id1 = EmployeeId::new();
        let id2 = EmployeeId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_display_and_parse_roundtrip() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = ReservationId::from_uuid(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        let parsed: ReservationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_ordering_is_deterministic() {
        let a = ServiceId::from_uuid(Uuid::from_u128(1));
        let b = ServiceId::from_uuid(Uuid::from_u128(2));
        assert!(a < b);
    }
}
