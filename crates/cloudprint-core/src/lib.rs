// cloudprint-core: session lifecycle and printer registry for the
// CloudPrint API. Sits on top of cloudprint-api the way a consumer
// application would want to: one connected client, a self-refreshing
// printer registry, and observable readiness.

pub mod client;
pub mod config;
pub mod error;
pub mod registry;

pub use client::{Client, Notification};
pub use config::ClientConfig;
pub use error::CoreError;
pub use registry::PrinterRegistry;

// Re-export the wire records and selectors for ergonomics.
pub use cloudprint_api::{
    Credentials, FirmwareVersion, Printer, PrinterSource, PrinterStatus, Session, TeamUser, User,
};
