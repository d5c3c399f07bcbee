// CloudPrint printer listing endpoints
//
// The backend exposes two read-only listings with identical payloads,
// `static-printers-info` and `live-printers-info`. Why both exist is
// unknown; they are kept as distinct operations rather than unified.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cloud::client::CloudClient;
use crate::cloud::models::Printer;
use crate::error::Error;

/// Which backend data source to poll for the printer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrinterSource {
    /// `static-printers-info` -- the default, and the source the periodic
    /// resync always polls.
    #[default]
    Static,
    /// `live-printers-info`.
    Live,
}

impl PrinterSource {
    /// The endpoint path for this source.
    pub fn path(self) -> &'static str {
        match self {
            Self::Static => "static-printers-info",
            Self::Live => "live-printers-info",
        }
    }
}

impl CloudClient {
    /// List all printers linked to the account.
    ///
    /// `GET /static-printers-info` or `GET /live-printers-info`, per
    /// `source`. Both return a JSON array of printer records.
    pub async fn list_printers(&self, source: PrinterSource) -> Result<Vec<Printer>, Error> {
        let url = self.endpoint_url(source.path());
        debug!(?source, "listing printers");
        self.get(url).await
    }
}
