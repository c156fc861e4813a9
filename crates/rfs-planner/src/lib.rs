pub mod config;
pub mod error;
pub mod planning;
pub mod procurement;
pub mod report;
pub mod telemetry;
