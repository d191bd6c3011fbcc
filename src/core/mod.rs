pub mod catalog;
pub mod defaults;
pub mod grid;
pub mod log;
pub mod notify;
pub mod occupancy;
pub mod schedule;
pub mod stats;
pub mod studio;
pub mod sync;
