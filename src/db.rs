pub mod booking_repo;
pub use booking_repo::{BookingStore, PgBookingStore};
#[cfg(test)]
pub mod memory_store;
#[cfg(test)]
pub use memory_store::MemoryBookingStore;
