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

//! # Auth descriptor
//!
//! A declarative description of one non-standard authentication request:
//! HTTP method, path and where each parameter lands inside the JSON payload.
//! The descriptor is pure data; [`AuthDescriptor::build_payload`] is the
//! single generic function turning it plus a set of values into a request
//! body. This is the extensibility seam for identity extensions the default
//! exchange does not cover, such as the Rackspace API-key credentials.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Parameter value type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParamKind {
    String,
}

/// How one parameter binds into the request payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamSpec {
    pub kind: ParamKind,
    /// Payload construction fails when a required value is absent.
    pub required: bool,
    /// Dotted location of the enclosing object within the payload.
    pub location: String,
}

impl ParamSpec {
    fn required_at(location: &str) -> Self {
        Self {
            kind: ParamKind::String,
            required: true,
            location: location.into(),
        }
    }

    fn optional_at(location: &str) -> Self {
        Self {
            kind: ParamKind::String,
            required: false,
            location: location.into(),
        }
    }
}

/// A template for one non-standard authentication request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthDescriptor {
    pub method: Method,
    /// Request path relative to the authentication endpoint.
    pub path: String,
    pub params: BTreeMap<String, ParamSpec>,
}

impl AuthDescriptor {
    /// The Rackspace `RAX-KSKEY:apiKeyCredentials` token request, an
    /// extension defined only on the v2 identity API.
    pub fn rackspace_api_key() -> Self {
        let mut params = BTreeMap::new();
        params.insert(
            "username".to_string(),
            ParamSpec::required_at("auth.RAX-KSKEY:apiKeyCredentials"),
        );
        params.insert(
            "apiKey".to_string(),
            ParamSpec::required_at("auth.RAX-KSKEY:apiKeyCredentials"),
        );
        params.insert("tenantName".to_string(), ParamSpec::optional_at("auth"));
        Self {
            method: Method::POST,
            path: "tokens".to_string(),
            params,
        }
    }

    /// Build the request payload from the supplied parameter values.
    ///
    /// Fails before any network call when a required parameter is missing.
    pub fn build_payload(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<Value, ConfigError> {
        let mut root = Map::new();
        for (name, spec) in &self.params {
            match values.get(name) {
                Some(value) => {
                    insert_at(&mut root, &spec.location, name, Value::String(value.clone()))?
                }
                None if spec.required => {
                    return Err(ConfigError::MissingAuthParameter(name.clone()));
                }
                None => {}
            }
        }
        Ok(Value::Object(root))
    }
}

/// Walk (and create) the nested objects named by a dotted location, then
/// insert the parameter value there.
fn insert_at(
    root: &mut Map<String, Value>,
    location: &str,
    name: &str,
    value: Value,
) -> Result<(), ConfigError> {
    let mut node = root;
    for segment in location.split('.') {
        node = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ConfigError::InvalidParameterLocation(location.to_string()))?;
    }
    node.insert(name.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_rackspace_descriptor_shape() {
        let descriptor = AuthDescriptor::rackspace_api_key();
        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.path, "tokens");
        assert!(descriptor.params["username"].required);
        assert!(descriptor.params["apiKey"].required);
        assert!(!descriptor.params["tenantName"].required);
    }

    #[test]
    fn test_build_api_key_payload() {
        let payload = AuthDescriptor::rackspace_api_key()
            .build_payload(&values(&[
                ("username", "user"),
                ("apiKey", "key"),
                ("tenantName", "948417"),
            ]))
            .unwrap();
        assert_eq!(
            payload,
            json!({
                "auth": {
                    "RAX-KSKEY:apiKeyCredentials": {
                        "username": "user",
                        "apiKey": "key"
                    },
                    "tenantName": "948417"
                }
            })
        );
    }

    #[test]
    fn test_optional_parameter_omitted() {
        let payload = AuthDescriptor::rackspace_api_key()
            .build_payload(&values(&[("username", "user"), ("apiKey", "key")]))
            .unwrap();
        assert!(payload["auth"].get("tenantName").is_none());
    }

    #[test]
    fn test_missing_required_parameter_fails() {
        let err = AuthDescriptor::rackspace_api_key()
            .build_payload(&values(&[("username", "user")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingAuthParameter("apiKey".into()));
    }

    #[test]
    fn test_conflicting_location_is_rejected() {
        let mut params = BTreeMap::new();
        params.insert("leaf".to_string(), ParamSpec::required_at("auth"));
        params.insert("nested".to_string(), ParamSpec::required_at("auth.leaf"));
        let descriptor = AuthDescriptor {
            method: Method::POST,
            path: "tokens".to_string(),
            params,
        };
        let err = descriptor
            .build_payload(&values(&[("leaf", "x"), ("nested", "y")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidParameterLocation("auth.leaf".into()));
    }
}
