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

//! # Credential resolution
//!
//! Decides which identity protocol version and credential scheme a
//! configuration bag calls for, and builds the matching strategy payload:
//!
//! - an API key selects the Rackspace `RAX-KSKEY` v2 extension, and the auth
//!   URL is rewritten to the `v2.0` suffix no matter what version it carried,
//!   since the extension is only defined there;
//! - otherwise a password is required and the version is parsed from the
//!   URL's trailing `/vN` or `/vN.M` segment. `3` and `2.0` are supported;
//!   anything else (including a missing segment) is rejected outright.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;

pub mod descriptor;
pub mod types;

use crate::config::ObjectStoreConfig;
use crate::error::ConfigError;
use descriptor::AuthDescriptor;

/// Domain applied to both the user and the project scope on v3.
pub const DEFAULT_DOMAIN: &str = "default";

/// Trailing `/vN` or `/vN.M` segment of an identity URL.
static URL_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/v(\d(?:\.\d)?)/?$").expect("hard-coded pattern"));

/// Strategy-tagged authentication payload; exactly one variant per session.
#[derive(Clone, PartialEq)]
pub enum ResolvedAuthOptions {
    /// Keystone v3 password authentication.
    PasswordV3 {
        user_name: String,
        password: String,
        domain_id: String,
        project_name: Option<String>,
    },
    /// Keystone v2 password authentication.
    PasswordV2 {
        username: String,
        password: String,
        tenant_name: Option<String>,
    },
    /// Rackspace API-key extension, v2 only.
    ApiKeyV2 {
        username: String,
        api_key: String,
        tenant_name: Option<String>,
    },
}

impl fmt::Debug for ResolvedAuthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordV3 {
                user_name,
                domain_id,
                project_name,
                ..
            } => f
                .debug_struct("PasswordV3")
                .field("user_name", user_name)
                .field("password", &"<redacted>")
                .field("domain_id", domain_id)
                .field("project_name", project_name)
                .finish(),
            Self::PasswordV2 {
                username,
                tenant_name,
                ..
            } => f
                .debug_struct("PasswordV2")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("tenant_name", tenant_name)
                .finish(),
            Self::ApiKeyV2 {
                username,
                tenant_name,
                ..
            } => f
                .debug_struct("ApiKeyV2")
                .field("username", username)
                .field("api_key", &"<redacted>")
                .field("tenant_name", tenant_name)
                .finish(),
        }
    }
}

/// Resolution result: the normalized auth endpoint plus the selected
/// credential payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCredentials {
    /// Identity endpoint to authenticate against; rewritten for the API-key
    /// strategy, verbatim otherwise.
    pub auth_url: String,
    pub options: ResolvedAuthOptions,
}

impl ResolvedCredentials {
    /// The descriptor driving a non-standard identity exchange, when the
    /// selected strategy needs one.
    pub fn descriptor(&self) -> Option<AuthDescriptor> {
        match self.options {
            ResolvedAuthOptions::ApiKeyV2 { .. } => Some(AuthDescriptor::rackspace_api_key()),
            _ => None,
        }
    }

    /// Parameter values a descriptor-driven exchange binds into its payload.
    pub(crate) fn descriptor_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        if let ResolvedAuthOptions::ApiKeyV2 {
            username,
            api_key,
            tenant_name,
        } = &self.options
        {
            values.insert("username".to_string(), username.clone());
            values.insert("apiKey".to_string(), api_key.clone());
            if let Some(tenant) = tenant_name {
                values.insert("tenantName".to_string(), tenant.clone());
            }
        }
        values
    }
}

/// Decide the authentication strategy for a configuration.
pub fn resolve(config: &ObjectStoreConfig) -> Result<ResolvedCredentials, ConfigError> {
    if config.username.trim().is_empty() {
        return Err(ConfigError::MissingUsername);
    }
    if config.url.trim().is_empty() {
        return Err(ConfigError::MissingAuthUrl);
    }
    if config.region.trim().is_empty() {
        return Err(ConfigError::MissingRegion);
    }
    let tenant_name = config
        .tenant_name
        .clone()
        .filter(|tenant| !tenant.is_empty());

    let api_key = config
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().to_string())
        .filter(|key| !key.is_empty());
    if let Some(api_key) = api_key {
        return Ok(ResolvedCredentials {
            auth_url: ensure_v2_in_auth_url(&config.url),
            options: ResolvedAuthOptions::ApiKeyV2 {
                username: config.username.clone(),
                api_key,
                tenant_name,
            },
        });
    }

    let password = config
        .password
        .as_ref()
        .map(|password| password.expose_secret().to_string())
        .filter(|password| !password.is_empty())
        .ok_or(ConfigError::MissingCredentials)?;

    let version = auth_version_from_url(&config.url)?;
    let options = match version.as_str() {
        "3" => ResolvedAuthOptions::PasswordV3 {
            user_name: config.username.clone(),
            password,
            domain_id: DEFAULT_DOMAIN.to_string(),
            project_name: tenant_name,
        },
        "2.0" => ResolvedAuthOptions::PasswordV2 {
            username: config.username.clone(),
            password,
            tenant_name,
        },
        _ => return Err(ConfigError::UnsupportedVersion(version)),
    };
    Ok(ResolvedCredentials {
        auth_url: config.url.clone(),
        options,
    })
}

/// Version token from the URL's trailing segment, without the `v` prefix,
/// i.e. `1.1`, `2.0`, `3`.
pub fn auth_version_from_url(url: &str) -> Result<String, ConfigError> {
    URL_VERSION
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|version| version.as_str().to_string())
        .ok_or(ConfigError::MissingUrlVersion)
}

/// Rewrite an auth URL to force the `v2.0` suffix: strip everything from the
/// first `/v` on, then append `v2.0`.
pub fn ensure_v2_in_auth_url(auth_url: &str) -> String {
    let base = match auth_url.to_ascii_lowercase().find("/v") {
        Some(pos) => &auth_url[..pos],
        None => auth_url,
    };
    format!("{}/v2.0", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> ObjectStoreConfig {
        ObjectStoreConfig::builder()
            .url("https://identity.api.rackspacecloud.com/v2.0")
            .region("DFW")
            .username("user")
            .password(SecretString::from("secret"))
            .tenant_name("948417")
            .container("dftest")
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_username_fails() {
        let mut config = config();
        config.username = String::new();
        assert_eq!(resolve(&config).unwrap_err(), ConfigError::MissingUsername);
    }

    #[test]
    fn test_missing_url_fails() {
        let mut config = config();
        config.url = String::new();
        assert_eq!(resolve(&config).unwrap_err(), ConfigError::MissingAuthUrl);
    }

    #[test]
    fn test_missing_region_fails() {
        let mut config = config();
        config.region = "  ".to_string();
        assert_eq!(resolve(&config).unwrap_err(), ConfigError::MissingRegion);
    }

    #[test]
    fn test_missing_credentials_fails() {
        let mut config = config();
        config.password = None;
        assert_eq!(
            resolve(&config).unwrap_err(),
            ConfigError::MissingCredentials
        );
    }

    #[test]
    fn test_v2_password_resolution() {
        let resolved = resolve(&config()).unwrap();
        assert_eq!(
            resolved.auth_url,
            "https://identity.api.rackspacecloud.com/v2.0"
        );
        assert_eq!(
            resolved.options,
            ResolvedAuthOptions::PasswordV2 {
                username: "user".into(),
                password: "secret".into(),
                tenant_name: Some("948417".into()),
            }
        );
        assert!(resolved.descriptor().is_none());
    }

    #[test]
    fn test_v3_password_resolution_uses_default_domain() {
        let mut config = config();
        config.url = "https://keystone.example.com/v3".to_string();
        let resolved = resolve(&config).unwrap();
        assert_eq!(
            resolved.options,
            ResolvedAuthOptions::PasswordV3 {
                user_name: "user".into(),
                password: "secret".into(),
                domain_id: "default".into(),
                project_name: Some("948417".into()),
            }
        );
    }

    #[test]
    fn test_api_key_takes_precedence_over_password() {
        let mut config = config();
        config.api_key = Some(SecretString::from("key"));
        let resolved = resolve(&config).unwrap();
        assert!(matches!(
            resolved.options,
            ResolvedAuthOptions::ApiKeyV2 { .. }
        ));
        assert!(resolved.descriptor().is_some());
    }

    #[test]
    fn test_api_key_forces_v2_suffix() {
        for url in [
            "https://identity.api.rackspacecloud.com/v2.0",
            "https://identity.api.rackspacecloud.com/V3/",
            "https://identity.api.rackspacecloud.com/v1.0",
            "https://identity.api.rackspacecloud.com",
        ] {
            let mut config = config();
            config.url = url.to_string();
            config.api_key = Some(SecretString::from("key"));
            let resolved = resolve(&config).unwrap();
            assert!(
                resolved.auth_url.ends_with("v2.0"),
                "expected v2.0 suffix for {url}, got {}",
                resolved.auth_url
            );
        }
    }

    #[test]
    fn test_empty_api_key_falls_back_to_password() {
        let mut config = config();
        config.api_key = Some(SecretString::from(""));
        let resolved = resolve(&config).unwrap();
        assert!(matches!(
            resolved.options,
            ResolvedAuthOptions::PasswordV2 { .. }
        ));
    }

    #[test]
    fn test_url_without_version_fails() {
        let mut config = config();
        config.url = "https://keystone.example.com/identity".to_string();
        assert_eq!(
            resolve(&config).unwrap_err(),
            ConfigError::MissingUrlVersion
        );
    }

    #[test]
    fn test_unsupported_version_fails() {
        let mut config = config();
        config.url = "https://keystone.example.com/v1.1".to_string();
        assert_eq!(
            resolve(&config).unwrap_err(),
            ConfigError::UnsupportedVersion("1.1".into())
        );
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(auth_version_from_url("https://h/v3").unwrap(), "3");
        assert_eq!(auth_version_from_url("https://h/v2.0/").unwrap(), "2.0");
        assert_eq!(auth_version_from_url("https://h/V2.0").unwrap(), "2.0");
        assert_eq!(auth_version_from_url("https://h/v1.1").unwrap(), "1.1");
        assert!(auth_version_from_url("https://h/v20").is_err());
        assert!(auth_version_from_url("https://h/version").is_err());
        assert!(auth_version_from_url("https://h/").is_err());
    }

    #[test]
    fn test_ensure_v2_rewrites_any_version() {
        assert_eq!(
            ensure_v2_in_auth_url("https://id.example.com/v3"),
            "https://id.example.com/v2.0"
        );
        assert_eq!(
            ensure_v2_in_auth_url("https://id.example.com/V3/"),
            "https://id.example.com/v2.0"
        );
        assert_eq!(
            ensure_v2_in_auth_url("https://id.example.com"),
            "https://id.example.com/v2.0"
        );
    }

    #[test]
    fn test_descriptor_values_for_api_key() {
        let mut config = config();
        config.api_key = Some(SecretString::from("key"));
        let resolved = resolve(&config).unwrap();
        let values = resolved.descriptor_values();
        assert_eq!(values["username"], "user");
        assert_eq!(values["apiKey"], "key");
        assert_eq!(values["tenantName"], "948417");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let resolved = resolve(&config()).unwrap();
        let rendered = format!("{resolved:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
