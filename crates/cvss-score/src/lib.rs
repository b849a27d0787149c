pub mod config;
pub mod cvss;
pub mod error;
pub mod telemetry;
