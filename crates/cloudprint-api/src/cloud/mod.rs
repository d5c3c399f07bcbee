// CloudPrint org API surface.
//
// `client` holds transport mechanics; the endpoint modules (auth, user,
// printers) add inherent methods on `CloudClient` via separate files.

pub mod auth;
pub mod client;
pub mod models;
pub mod printers;
pub mod user;
