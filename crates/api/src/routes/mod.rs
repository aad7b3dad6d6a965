pub mod bloqueos;
pub mod disponibilidad;
pub mod health;
pub mod reservas;
