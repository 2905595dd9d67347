//! Interview scheduling with double-booking protection and SMS notification fan-out.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
