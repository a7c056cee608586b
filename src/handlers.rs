pub mod bookings;
pub mod dashboard;
