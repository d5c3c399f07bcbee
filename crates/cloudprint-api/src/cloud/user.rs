// CloudPrint user profile endpoint

use tracing::debug;

use crate::cloud::client::CloudClient;
use crate::cloud::models::UserPatch;
use crate::error::Error;

impl CloudClient {
    /// Fetch the authenticated account's profile.
    ///
    /// `GET /user`. Requires the session cookie; without one the backend
    /// answers with whatever error status it sees fit, surfaced as
    /// [`Error::Http`]. Returns the response as a patch -- apply it onto a
    /// [`User`](crate::User) record to get present-keys-only updates.
    pub async fn fetch_user(&self) -> Result<UserPatch, Error> {
        let url = self.endpoint_url("user");
        debug!("fetching user profile");
        self.get(url).await
    }
}
