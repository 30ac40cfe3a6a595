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

//! # Cloud Files service
//!
//! The operational surface a host drives: container CRUD plus object
//! CRUD/list/stream against an open [`ObjectStoreSession`]. Construction
//! resolves the credentials, performs the identity exchange once, and
//! bootstraps the configured root container (created when absent). Every
//! operation checks for an open session first and reports
//! [`Error::NotConnected`] otherwise.

use std::path::Path;

use tracing::debug;

use crate::auth;
use crate::config::{ObjectStoreConfig, is_rackspace};
use crate::error::Error;
use crate::identity::IdentityClient;
use crate::session::{ObjectStoreSession, RACKSPACE_CATALOG_NAME};
use crate::store::ObjectStoreBackend;
use crate::store::chunks::BlobChunks;
use crate::store::types::{ContainerProperties, ContainerSummary, ListingEntry, ObjectRecord};

/// Cloud Files gateway bound to one configured service instance.
pub struct CloudFilesService {
    backend: Option<Box<dyn ObjectStoreBackend>>,
    /// Root container the host's file service lives in.
    container: String,
}

impl std::fmt::Debug for CloudFilesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudFilesService")
            .field("container", &self.container)
            .field("connected", &self.backend.is_some())
            .finish()
    }
}

impl CloudFilesService {
    /// Resolve credentials, authenticate, and bootstrap the root container.
    ///
    /// Configuration errors surface as [`Error::Config`]; any remote
    /// failure during bootstrap as [`Error::Connection`].
    #[tracing::instrument(name = "cloudfiles.connect", skip(config), err)]
    pub fn new(config: &ObjectStoreConfig) -> Result<Self, Error> {
        let container = config.container.trim_matches('/').to_string();
        let credentials = auth::resolve(config)?;
        let identity = IdentityClient::bootstrap(
            &credentials.auth_url,
            credentials.descriptor(),
            config.debug_log,
        )?;
        let catalog_name = is_rackspace(&config.url).then_some(RACKSPACE_CATALOG_NAME);
        let session =
            ObjectStoreSession::open(&identity, &credentials, &config.region, catalog_name)?;
        let service = Self {
            backend: Some(Box::new(session)),
            container,
        };
        if !service.container.is_empty()
            && !service
                .container_exists(&service.container)
                .map_err(Error::into_connection)?
        {
            debug!(container = %service.container, "creating missing root container");
            service
                .create_container(&service.container)
                .map_err(Error::into_connection)?;
        }
        Ok(service)
    }

    /// Discard the session and its token; subsequent operations report
    /// [`Error::NotConnected`].
    pub fn close(&mut self) {
        self.backend = None;
    }

    #[cfg(test)]
    pub(crate) fn with_backend(backend: Box<dyn ObjectStoreBackend>, container: &str) -> Self {
        Self {
            backend: Some(backend),
            container: container.to_string(),
        }
    }

    fn backend(&self) -> Result<&dyn ObjectStoreBackend, Error> {
        self.backend.as_deref().ok_or(Error::NotConnected)
    }

    /// List all containers. The properties flag is accepted for contract
    /// parity but carries no extra data here.
    pub fn list_containers(
        &self,
        _include_properties: bool,
    ) -> Result<Vec<ContainerSummary>, Error> {
        let containers = self.backend()?.list_containers()?;
        Ok(containers
            .into_iter()
            .map(|container| ContainerSummary::new(container.name.trim_end()))
            .collect())
    }

    /// Name and bytes used of one container.
    pub fn get_container_properties(&self, container: &str) -> Result<ContainerProperties, Error> {
        self.backend()?.head_container(container)
    }

    pub fn container_exists(&self, container: &str) -> Result<bool, Error> {
        self.backend()?.container_exists(container)
    }

    pub fn create_container(&self, container: &str) -> Result<ContainerSummary, Error> {
        let backend = self.backend()?;
        let name = container.trim();
        if name.is_empty() {
            return Err(Error::BadRequest(
                "No name found for container in create request.".to_string(),
            ));
        }
        backend.create_container(name)?;
        Ok(ContainerSummary::new(name))
    }

    /// Container property updates are not supported by this adapter.
    pub fn update_container_properties(&self, _container: &str) -> Result<(), Error> {
        Err(Error::NotImplemented("update of container properties"))
    }

    /// Delete a container. The `force` flag is accepted for contract parity
    /// but takes no part in the request.
    pub fn delete_container(&self, container: &str, _force: bool) -> Result<(), Error> {
        self.backend()?.delete_container(container)
    }

    pub fn blob_exists(&self, container: &str, name: &str) -> Result<bool, Error> {
        self.backend()?.object_exists(container, name)
    }

    pub fn put_blob_data(
        &self,
        container: &str,
        name: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), Error> {
        self.backend()?
            .put_object(container, name, content.to_vec(), content_type)
    }

    /// Upload a local file. A local read failure propagates unmapped.
    pub fn put_blob_from_file(
        &self,
        container: &str,
        name: &str,
        local_file: &Path,
        content_type: &str,
    ) -> Result<(), Error> {
        let backend = self.backend()?;
        let content = std::fs::read(local_file)?;
        backend.put_object(container, name, content, content_type)
    }

    pub fn copy_blob(
        &self,
        src_container: &str,
        src_name: &str,
        dest_container: &str,
        dest_name: &str,
    ) -> Result<(), Error> {
        self.backend()?
            .copy_object(src_container, src_name, dest_container, dest_name)
    }

    pub fn get_blob_data(&self, container: &str, name: &str) -> Result<Vec<u8>, Error> {
        self.backend()?.get_object(container, name)
    }

    /// Download-to-file is not supported by this adapter.
    pub fn get_blob_as_file(
        &self,
        _container: &str,
        _name: &str,
        _local_file: &Path,
    ) -> Result<(), Error> {
        Err(Error::NotImplemented("get_blob_as_file"))
    }

    /// Delete one object. With `no_check`, a failing delete is swallowed
    /// silently; otherwise a missing object reports not-found.
    pub fn delete_blob(&self, container: &str, name: &str, no_check: bool) -> Result<(), Error> {
        match self.backend()?.delete_object(container, name) {
            Ok(()) => Ok(()),
            Err(_) if no_check => Ok(()),
            Err(Error::NotFound(_)) => {
                Err(Error::NotFound(format!("File '{name}' was not found.")))
            }
            Err(err) => Err(err),
        }
    }

    /// List objects under a prefix. The entry named exactly like the prefix
    /// is the requested pseudo-folder itself and is excluded; bare delimiter
    /// markers are skipped.
    pub fn list_blobs(
        &self,
        container: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<ObjectRecord>, Error> {
        let entries = self.backend()?.list_objects(container, prefix, delimiter)?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                ListingEntry::Subdir { .. } => None,
                ListingEntry::Object(object) => {
                    if !prefix.is_empty() && object.name == prefix {
                        None
                    } else {
                        Some(ObjectRecord::from(object))
                    }
                }
            })
            .collect())
    }

    /// Metadata of one object. An empty name resolves to the container
    /// itself, reported as the `{name: "."}` sentinel record.
    pub fn get_blob_properties(&self, container: &str, name: &str) -> Result<ObjectRecord, Error> {
        let backend = self.backend()?;
        if name.trim_matches('/').is_empty() {
            backend.head_container(container)?;
            return Ok(ObjectRecord::container_root());
        }
        backend.head_object(container, name)
    }

    /// Stream one object as fixed-size chunks, pulled lazily by iteration.
    pub fn get_blob_in_chunks(
        &self,
        container: &str,
        name: &str,
        chunk_size: usize,
    ) -> Result<BlobChunks, Error> {
        let reader = self.backend()?.open_object(container, name)?;
        Ok(BlobChunks::new(reader, chunk_size))
    }
}
