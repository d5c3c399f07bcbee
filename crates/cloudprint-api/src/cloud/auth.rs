// CloudPrint authentication
//
// Username/password login against the login service, and direct injection
// of a pre-issued token. The login response carries the session token in a
// `Set-Cookie: makerbot.jwt=...` header rather than the body.

use reqwest::header::{self, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::{Session, SESSION_COOKIE};
use crate::cloud::client::CloudClient;
use crate::error::Error;

impl CloudClient {
    /// Authenticate with username and password.
    ///
    /// `POST {login_url}` with JSON body `{username, password}`. On
    /// success the backend answers with a `Set-Cookie` entry for
    /// `makerbot.jwt`; that token becomes the session and is presented as
    /// a cookie on all subsequent requests. A success response without the
    /// cookie fails with [`Error::Authentication`] and is not retried.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        debug!("logging in at {}", self.login_url());

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(self.login_url().clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let token = extract_session_token(resp.headers()).ok_or_else(|| Error::Authentication {
            message: format!("{SESSION_COOKIE} token not found in login response"),
        })?;

        let session = Session::new(token);
        self.store_session(session.clone());

        debug!("login successful");
        Ok(session)
    }

    /// Install a pre-issued session token.
    ///
    /// No outbound request is made and the token is not validated; a stale
    /// or bogus token only surfaces on the first authenticated call. Unlike
    /// [`login`](Self::login), this path does not imply any follow-up
    /// loading -- callers drive user/printer fetches themselves.
    pub fn set_token(&self, token: &SecretString) -> Session {
        debug!("installing pre-issued session token");
        let session = Session::new(token.expose_secret().to_owned());
        self.store_session(session.clone());
        session
    }
}

/// Find the `makerbot.jwt` entry among the `Set-Cookie` headers and slice
/// out its value (everything between the key and the next `;`).
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let key = format!("{SESSION_COOKIE}=");
    headers.get_all(header::SET_COOKIE).iter().find_map(|value| {
        let raw = value.to_str().ok()?;
        let (_, rest) = raw.split_once(key.as_str())?;
        let token = match rest.split_once(';') {
            Some((token, _)) => token,
            None => rest,
        };
        Some(token.to_owned())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, SET_COOKIE};

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(SET_COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn token_sliced_up_to_semicolon() {
        let map = headers(&["makerbot.jwt=abc123; Path=/; HttpOnly"]);
        assert_eq!(extract_session_token(&map).as_deref(), Some("abc123"));
    }

    #[test]
    fn token_without_attributes() {
        let map = headers(&["makerbot.jwt=abc123"]);
        assert_eq!(extract_session_token(&map).as_deref(), Some("abc123"));
    }

    #[test]
    fn unrelated_cookies_are_skipped() {
        let map = headers(&[
            "session=zzz; Path=/",
            "makerbot.jwt=tok-42; Secure",
        ]);
        assert_eq!(extract_session_token(&map).as_deref(), Some("tok-42"));
    }

    #[test]
    fn missing_cookie_yields_none() {
        let map = headers(&["session=zzz; Path=/"]);
        assert_eq!(extract_session_token(&map), None);
    }
}
