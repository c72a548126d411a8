pub mod error;
pub mod fields;
pub mod patch;
pub mod service;
pub mod sync;
pub mod timeslot;
