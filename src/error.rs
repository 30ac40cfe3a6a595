// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! # Error
//!
//! The adapter error taxonomy plus the single mapping point for vendor HTTP
//! failures. Configuration errors are kept apart from vendor errors so a
//! caller can always distinguish "misconfigured" from "remote failure".

use reqwest::Method;
use thiserror::Error;
use url::Url;

/// Invalid adapter configuration.
///
/// Always local: raised before any network call and never reinterpreted as a
/// vendor error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// No user name configured.
    #[error("Object Store username can not be empty.")]
    MissingUsername,

    /// No identity endpoint configured.
    #[error("Object Store authentication URL can not be empty.")]
    MissingAuthUrl,

    /// No region configured.
    #[error("Object Store region can not be empty.")]
    MissingRegion,

    /// Neither an API key nor a password configured.
    #[error("Object Store credentials must contain an API key or a password.")]
    MissingCredentials,

    /// The identity URL carries no trailing version segment.
    #[error("URL must end with identity API version number")]
    MissingUrlVersion,

    /// The identity URL names a version the adapter has no strategy for.
    #[error("Identity API v{0} is not supported")]
    UnsupportedVersion(String),

    /// A parameter an auth descriptor marks as required was not supplied.
    #[error("required authentication parameter '{0}' was not supplied")]
    MissingAuthParameter(String),

    /// A descriptor payload location collides with an already-placed value.
    #[error("authentication parameter location '{0}' is not an object")]
    InvalidParameterLocation(String),
}

/// Adapter operation errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration, surfaced at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Bootstrap or authentication failure; the adapter is left unusable.
    #[error("Failed to launch OpenStack service: {message}")]
    Connection { message: String },

    /// The remote container or object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The storage service rejected the request.
    #[error("{0}")]
    BadRequest(String),

    /// Any other vendor HTTP failure, carrying the status code.
    #[error("{message}")]
    Rest { code: u16, message: String },

    /// Operation intentionally unsupported by this adapter.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// An operation was invoked without an open session.
    #[error("No valid connection to blob file storage.")]
    NotConnected,

    /// Local file access failure; propagated unmapped.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    #[error("json serde error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Vendor failure without a structured response shape.
    #[error("{source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Catch-all internal failure carrying the original message.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Bootstrap-time wrapping: vendor failures become connection errors
    /// while configuration errors propagate unchanged.
    pub(crate) fn into_connection(self) -> Error {
        match self {
            Error::Config(_) | Error::Connection { .. } => self,
            other => Error::Connection {
                message: other.to_string(),
            },
        }
    }
}

/// The structured shape of a vendor "bad response": everything needed to
/// compose a support-diagnosable message.
#[derive(Clone, Debug)]
pub(crate) struct BadResponse {
    pub method: Method,
    pub url: Url,
    pub status: u16,
    pub reason: String,
    /// `X-Trans-Id` header value, when the service reported one.
    pub trans_id: Option<String>,
}

impl BadResponse {
    fn message(&self) -> String {
        format!(
            "[{}] Client error response. {}. {} {} ({})",
            self.status,
            self.reason,
            self.method,
            self.url,
            self.trans_id.as_deref().unwrap_or_default()
        )
    }

    /// Map one vendor HTTP failure into the domain taxonomy.
    pub(crate) fn into_error(self) -> Error {
        let message = self.message();
        match self.status {
            404 => Error::NotFound(message),
            400 => Error::BadRequest(message),
            code => Error::Rest { code, message },
        }
    }
}

/// Pass a successful response through; turn an error status into the mapped
/// domain error.
pub(crate) fn check_response(
    method: Method,
    url: &Url,
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let trans_id = response
        .headers()
        .get("x-trans-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    Err(BadResponse {
        method,
        url: url.clone(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        trans_id,
    }
    .into_error())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_response(status: u16, reason: &str) -> BadResponse {
        BadResponse {
            method: Method::GET,
            url: Url::parse(
                "https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_948417/dftest/path/file.txt",
            )
            .unwrap(),
            status,
            reason: reason.into(),
            trans_id: Some("tx123".into()),
        }
    }

    #[test]
    fn test_map_not_found() {
        match bad_response(404, "Not Found").into_error() {
            Error::NotFound(message) => assert_eq!(
                message,
                "[404] Client error response. Not Found. GET https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_948417/dftest/path/file.txt (tx123)"
            ),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_map_bad_request() {
        assert!(matches!(
            bad_response(400, "Bad Request").into_error(),
            Error::BadRequest(_)
        ));
    }

    #[test]
    fn test_map_other_status_keeps_code() {
        match bad_response(503, "Service Unavailable").into_error() {
            Error::Rest { code, .. } => assert_eq!(code, 503),
            other => panic!("expected Rest, got {other:?}"),
        }
    }

    #[test]
    fn test_message_without_trans_id() {
        let mut response = bad_response(418, "I'm a teapot");
        response.trans_id = None;
        assert!(response.message().ends_with("()"));
    }

    #[test]
    fn test_config_error_never_becomes_connection() {
        let err = Error::from(ConfigError::MissingRegion).into_connection();
        assert!(matches!(err, Error::Config(ConfigError::MissingRegion)));
    }

    #[test]
    fn test_vendor_error_wraps_into_connection() {
        match bad_response(401, "Unauthorized").into_error().into_connection() {
            Error::Connection { message } => {
                assert!(message.starts_with("[401] Client error response."))
            }
            other => panic!("expected Connection, got {other:?}"),
        }
    }
}
