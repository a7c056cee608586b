pub mod aggregation;
pub mod bookings_service;
pub mod charts;
pub mod dashboard_view;
pub mod session;
pub mod trend;
