pub mod clock;
pub mod config;
pub mod csv;
pub mod lot;
pub mod rate;
pub mod types;
