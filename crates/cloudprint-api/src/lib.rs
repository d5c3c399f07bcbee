// cloudprint-api: Async Rust client for the MakerBot CloudPrint API

pub mod auth;
pub mod cloud;
pub mod error;
pub mod transport;

pub use auth::{Credentials, Session};
pub use cloud::client::CloudClient;
pub use cloud::models::{
    FirmwareVersion, NotificationSetting, Printer, PrinterStatus, TeamRole, TeamUser, User,
    UserPatch,
};
pub use cloud::printers::PrinterSource;
pub use error::Error;
pub use transport::TransportConfig;
