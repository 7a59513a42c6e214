pub mod opensky;
pub mod types;
