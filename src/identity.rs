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

//! # Identity client
//!
//! A short-lived blocking HTTP client against the resolved authentication
//! endpoint. The exchange is the standard one for the resolved protocol
//! version, unless the credential resolution supplied an [`AuthDescriptor`],
//! in which case that template drives it instead. The exchange yields an
//! [`IdentityHandle`]: the token plus the service catalog the session
//! bootstrap selects an endpoint from.

use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::descriptor::AuthDescriptor;
use crate::auth::types::{AccessResponse, AuthRequest, AuthRequestV2, TokenResponse};
use crate::auth::{ResolvedAuthOptions, ResolvedCredentials};
use crate::catalog::ServiceCatalog;
use crate::error::{Error, check_response};

/// v3 response header carrying the issued token.
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Result of a successful identity exchange.
#[derive(Clone, Debug)]
pub struct IdentityHandle {
    /// Opaque, time-limited token presented as `X-Auth-Token` downstream.
    pub token: SecretString,
    pub catalog: ServiceCatalog,
}

/// Bootstrap HTTP client for the identity exchange.
#[derive(Debug)]
pub struct IdentityClient {
    client: reqwest::blocking::Client,
    base: Url,
    descriptor: Option<AuthDescriptor>,
    debug_log: bool,
}

impl IdentityClient {
    /// Build a client targeted at the normalized auth endpoint. With a
    /// descriptor, the token request is driven by that template. With
    /// `debug_log`, exchange summaries are emitted through `tracing`
    /// (no-op under a disabled subscriber).
    pub fn bootstrap(
        auth_url: &str,
        descriptor: Option<AuthDescriptor>,
        debug_log: bool,
    ) -> Result<Self, Error> {
        let base = Url::parse(&normalize_url(auth_url))?;
        let client = reqwest::blocking::Client::builder()
            .connection_verbose(debug_log)
            .build()?;
        Ok(Self {
            client,
            base,
            descriptor,
            debug_log,
        })
    }

    /// Perform the identity exchange for the resolved credentials.
    #[tracing::instrument(skip(self, credentials), err)]
    pub fn authenticate(&self, credentials: &ResolvedCredentials) -> Result<IdentityHandle, Error> {
        match &credentials.options {
            ResolvedAuthOptions::PasswordV3 {
                user_name,
                password,
                domain_id,
                project_name,
            } => self.tokens_v3(&AuthRequest::password(
                user_name,
                password,
                domain_id,
                project_name.as_deref(),
            )),
            ResolvedAuthOptions::PasswordV2 {
                username,
                password,
                tenant_name,
            } => {
                let request =
                    AuthRequestV2::password(username, password, tenant_name.as_deref());
                self.tokens_v2(Method::POST, "tokens", &serde_json::to_value(request)?)
            }
            ResolvedAuthOptions::ApiKeyV2 { .. } => {
                let descriptor = match &self.descriptor {
                    Some(descriptor) => descriptor.clone(),
                    None => AuthDescriptor::rackspace_api_key(),
                };
                let payload = descriptor.build_payload(&credentials.descriptor_values())?;
                self.tokens_v2(descriptor.method.clone(), &descriptor.path, &payload)
            }
        }
    }

    /// The v2 exchange: token and catalog both arrive in the response body.
    fn tokens_v2(
        &self,
        method: Method,
        path: &str,
        payload: &Value,
    ) -> Result<IdentityHandle, Error> {
        let url = self.base.join(path)?;
        if self.debug_log {
            debug!(%url, "requesting v2 identity token");
        }
        let response = self
            .client
            .request(method.clone(), url.clone())
            .json(payload)
            .send()?;
        let response = check_response(method, &url, response)?;
        let access: AccessResponse = response.json()?;
        if self.debug_log {
            debug!(
                services = access.access.service_catalog.len(),
                "v2 identity exchange succeeded"
            );
        }
        Ok(IdentityHandle {
            token: SecretString::from(access.access.token.id),
            catalog: access.access.service_catalog.into(),
        })
    }

    /// The v3 exchange: the token arrives in the `X-Subject-Token` header,
    /// the catalog in the body.
    fn tokens_v3(&self, request: &AuthRequest) -> Result<IdentityHandle, Error> {
        let url = self.base.join("auth/tokens")?;
        if self.debug_log {
            debug!(%url, "requesting v3 identity token");
        }
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()?;
        let response = check_response(Method::POST, &url, response)?;
        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::Internal(format!(
                    "identity response is missing the {SUBJECT_TOKEN_HEADER} header"
                ))
            })?;
        let body: TokenResponse = response.json()?;
        if self.debug_log {
            debug!(
                services = body.token.catalog.len(),
                "v3 identity exchange succeeded"
            );
        }
        Ok(IdentityHandle {
            token: SecretString::from(token),
            catalog: body.token.catalog.into(),
        })
    }
}

/// Base URLs must end with a slash for relative joins to preserve the
/// version path segment.
fn normalize_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
