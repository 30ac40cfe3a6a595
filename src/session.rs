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

//! # Object store session
//!
//! The authenticated handle to the object storage service. Opening a session
//! performs the identity exchange, selects the storage endpoint from the
//! catalog by region (and, for Rackspace-hosted identity, by catalog name),
//! and retains the token for the session's lifetime. There is no automatic
//! re-authentication: an expired token surfaces as a mapped upstream
//! authentication failure on whatever operation hits it first.

use std::io::Read;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::auth::ResolvedCredentials;
use crate::error::{Error, check_response};
use crate::identity::IdentityClient;
use crate::store::ObjectStoreBackend;
use crate::store::types::{ContainerEntry, ContainerProperties, ListingEntry, ObjectRecord};

/// Service-catalog type of the Swift object storage offering.
pub const OBJECT_STORE_TYPE: &str = "object-store";

/// Catalog name disambiguating the Cloud Files offering on Rackspace-hosted
/// identity accounts.
pub const RACKSPACE_CATALOG_NAME: &str = "cloudFiles";

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const BYTES_USED_HEADER: &str = "x-container-bytes-used";

/// Authenticated object storage session.
pub struct ObjectStoreSession {
    client: reqwest::blocking::Client,
    /// Storage endpoint selected from the catalog, with a trailing slash.
    endpoint: Url,
    region: String,
    token: SecretString,
    catalog_name: Option<String>,
}

impl std::fmt::Debug for ObjectStoreSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreSession")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .field("catalog_name", &self.catalog_name)
            .finish()
    }
}

impl ObjectStoreSession {
    /// Authenticate and select the storage endpoint.
    ///
    /// Vendor failures are mapped and re-raised as [`Error::Connection`]
    /// with the underlying message attached; configuration errors propagate
    /// unchanged.
    #[tracing::instrument(skip(identity, credentials), err)]
    pub fn open(
        identity: &IdentityClient,
        credentials: &ResolvedCredentials,
        region: &str,
        catalog_name: Option<&str>,
    ) -> Result<Self, Error> {
        let handle = identity
            .authenticate(credentials)
            .map_err(Error::into_connection)?;
        let endpoint = handle
            .catalog
            .find_endpoint(OBJECT_STORE_TYPE, region, catalog_name)
            .ok_or_else(|| Error::Connection {
                message: format!(
                    "no {OBJECT_STORE_TYPE} endpoint for region '{region}' in the service catalog"
                ),
            })?;
        let endpoint = Url::parse(&format!("{}/", endpoint.url.trim_end_matches('/')))
            .map_err(|err| Error::from(err).into_connection())?;
        debug!(endpoint = %endpoint, region, "object store session established");
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| Error::from(err).into_connection())?;
        Ok(Self {
            client,
            endpoint,
            region: region.to_string(),
            token: handle.token.clone(),
            catalog_name: catalog_name.map(str::to_string),
        })
    }

    fn container_url(&self, container: &str) -> Result<Url, Error> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Internal("storage endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .push(container);
        Ok(url)
    }

    fn object_url(&self, container: &str, name: &str) -> Result<Url, Error> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Internal("storage endpoint cannot be a base URL".to_string()))?;
            segments.pop_if_empty().push(container);
            // keep the object's folder hierarchy as path segments
            segments.extend(name.split('/'));
        }
        Ok(url)
    }

    /// `Destination` header value for a server-side copy: the target path
    /// relative to the account endpoint.
    fn destination_path(&self, container: &str, name: &str) -> Result<String, Error> {
        let target = self.object_url(container, name)?;
        let base = self.endpoint.path().trim_end_matches('/');
        Ok(target
            .path()
            .strip_prefix(base)
            .unwrap_or(target.path())
            .to_string())
    }

    fn request(&self, method: Method, url: Url) -> reqwest::blocking::RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTH_TOKEN_HEADER, self.token.expose_secret())
    }

    /// Send and map an error status into the domain taxonomy.
    fn send(&self, method: Method, url: Url) -> Result<reqwest::blocking::Response, Error> {
        let response = self.request(method.clone(), url.clone()).send()?;
        check_response(method, &url, response)
    }

    /// Existence probe: a 404 is a negative answer, not an error.
    fn probe(&self, url: Url) -> Result<bool, Error> {
        let response = self.request(Method::HEAD, url.clone()).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_response(Method::HEAD, &url, response).map(|_| true)
    }
}

impl ObjectStoreBackend for ObjectStoreSession {
    #[tracing::instrument(skip(self), err)]
    fn list_containers(&self) -> Result<Vec<ContainerEntry>, Error> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("format", "json");
        let response = self.send(Method::GET, url)?;
        Ok(response.json()?)
    }

    #[tracing::instrument(skip(self), err)]
    fn head_container(&self, container: &str) -> Result<ContainerProperties, Error> {
        let response = self.send(Method::HEAD, self.container_url(container)?)?;
        let size = response
            .headers()
            .get(BYTES_USED_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Ok(ContainerProperties {
            name: container.to_string(),
            size,
        })
    }

    fn container_exists(&self, container: &str) -> Result<bool, Error> {
        self.probe(self.container_url(container)?)
    }

    #[tracing::instrument(skip(self), err)]
    fn create_container(&self, container: &str) -> Result<(), Error> {
        self.send(Method::PUT, self.container_url(container)?)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    fn delete_container(&self, container: &str) -> Result<(), Error> {
        self.send(Method::DELETE, self.container_url(container)?)?;
        Ok(())
    }

    fn object_exists(&self, container: &str, name: &str) -> Result<bool, Error> {
        self.probe(self.object_url(container, name)?)
    }

    #[tracing::instrument(skip(self, content), err)]
    fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), Error> {
        let url = self.object_url(container, name)?;
        let mut request = self.request(Method::PUT, url.clone()).body(content);
        if !content_type.is_empty() {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        let response = request.send()?;
        check_response(Method::PUT, &url, response)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    fn copy_object(
        &self,
        src_container: &str,
        src_name: &str,
        dest_container: &str,
        dest_name: &str,
    ) -> Result<(), Error> {
        let method = Method::from_bytes(b"COPY")
            .map_err(|_| Error::Internal("COPY is not a valid HTTP method".to_string()))?;
        let url = self.object_url(src_container, src_name)?;
        let destination = self.destination_path(dest_container, dest_name)?;
        let response = self
            .request(method.clone(), url.clone())
            .header("Destination", destination)
            .send()?;
        check_response(method, &url, response)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    fn get_object(&self, container: &str, name: &str) -> Result<Vec<u8>, Error> {
        let response = self.send(Method::GET, self.object_url(container, name)?)?;
        Ok(response.bytes()?.to_vec())
    }

    fn open_object(&self, container: &str, name: &str) -> Result<Box<dyn Read + Send>, Error> {
        let response = self.send(Method::GET, self.object_url(container, name)?)?;
        Ok(Box::new(response))
    }

    #[tracing::instrument(skip(self), err)]
    fn delete_object(&self, container: &str, name: &str) -> Result<(), Error> {
        self.send(Method::DELETE, self.object_url(container, name)?)?;
        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    fn list_objects(
        &self,
        container: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<ListingEntry>, Error> {
        let mut url = self.container_url(container)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("format", "json");
            if !prefix.is_empty() {
                query.append_pair("prefix", prefix);
            }
            if !delimiter.is_empty() {
                query.append_pair("delimiter", delimiter);
            }
        }
        let response = self.send(Method::GET, url)?;
        Ok(response.json()?)
    }

    #[tracing::instrument(skip(self), err)]
    fn head_object(&self, container: &str, name: &str) -> Result<ObjectRecord, Error> {
        let response = self.send(Method::HEAD, self.object_url(container, name)?)?;
        let header = |key: reqwest::header::HeaderName| {
            response
                .headers()
                .get(key)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        Ok(ObjectRecord {
            name: name.to_string(),
            content_type: header(reqwest::header::CONTENT_TYPE),
            content_length: header(reqwest::header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            last_modified: header(reqwest::header::LAST_MODIFIED),
        })
    }
}
