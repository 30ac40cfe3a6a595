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

//! # Service catalog
//!
//! The catalog returned by the identity exchange, normalized across the v2
//! and v3 response shapes so endpoint selection is written once. A catalog
//! entry is selected by service type, optionally by catalog name (Rackspace
//! accounts expose several object-store offerings under one identity), and
//! an endpoint within it by region and interface.

use serde::{Deserialize, Serialize};

/// The interface type, which describes the visibility of the endpoint.
/// The adapter only ever talks to publicly visible endpoints.
pub const PUBLIC_INTERFACE: &str = "public";

/// A v2 `serviceCatalog` entry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ServiceEntryV2 {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointEntryV2>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EndpointEntryV2 {
    /// The region the endpoint serves; region-less entries serve every
    /// region.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(rename = "publicURL")]
    pub public_url: String,
    #[serde(rename = "internalURL", default, skip_serializing_if = "Option::is_none")]
    pub internal_url: Option<String>,
    #[serde(rename = "tenantId", default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// A v3 `catalog` entry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ServiceEntryV3 {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<EndpointEntryV3>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EndpointEntryV3 {
    #[serde(default)]
    pub region: Option<String>,
    pub interface: String,
    pub url: String,
}

/// Catalog normalized across identity versions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceCatalog(Vec<CatalogService>);

/// One service offering with its endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogService {
    pub name: String,
    pub service_type: String,
    pub endpoints: Vec<CatalogEndpoint>,
}

/// One endpoint of a catalog service.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEndpoint {
    pub region: Option<String>,
    pub interface: String,
    pub url: String,
}

impl ServiceCatalog {
    /// Find the public endpoint of a service, filtered by catalog name when
    /// one is given. A region-less endpoint matches any requested region.
    pub fn find_endpoint(
        &self,
        service_type: &str,
        region: &str,
        catalog_name: Option<&str>,
    ) -> Option<&CatalogEndpoint> {
        self.0
            .iter()
            .filter(|service| service.service_type == service_type)
            .filter(|service| catalog_name.is_none_or(|name| service.name == name))
            .flat_map(|service| service.endpoints.iter())
            .find(|endpoint| {
                endpoint.interface == PUBLIC_INTERFACE
                    && endpoint.region.as_deref().is_none_or(|r| r == region)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ServiceEntryV2>> for ServiceCatalog {
    fn from(entries: Vec<ServiceEntryV2>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|entry| CatalogService {
                    name: entry.name,
                    service_type: entry.service_type,
                    endpoints: entry
                        .endpoints
                        .into_iter()
                        .flat_map(|endpoint| {
                            let mut out = vec![CatalogEndpoint {
                                region: endpoint.region.clone(),
                                interface: PUBLIC_INTERFACE.to_string(),
                                url: endpoint.public_url,
                            }];
                            if let Some(internal) = endpoint.internal_url {
                                out.push(CatalogEndpoint {
                                    region: endpoint.region,
                                    interface: "internal".to_string(),
                                    url: internal,
                                });
                            }
                            out
                        })
                        .collect(),
                })
                .collect(),
        )
    }
}

impl From<Vec<ServiceEntryV3>> for ServiceCatalog {
    fn from(entries: Vec<ServiceEntryV3>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|entry| CatalogService {
                    name: entry.name,
                    service_type: entry.service_type,
                    endpoints: entry
                        .endpoints
                        .into_iter()
                        .map(|endpoint| CatalogEndpoint {
                            region: endpoint.region,
                            interface: endpoint.interface,
                            url: endpoint.url,
                        })
                        .collect(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rackspace_catalog() -> ServiceCatalog {
        let entries: Vec<ServiceEntryV2> = serde_json::from_value(json!([
            {
                "name": "cloudFilesCDN",
                "type": "rax:object-cdn",
                "endpoints": [
                    {"region": "DFW", "publicURL": "https://cdn1.clouddrive.com/v1/MossoCloudFS_948417"}
                ]
            },
            {
                "name": "cloudFiles",
                "type": "object-store",
                "endpoints": [
                    {"region": "ORD", "publicURL": "https://storage101.ord1.clouddrive.com/v1/MossoCloudFS_948417"},
                    {"region": "DFW", "publicURL": "https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_948417"}
                ]
            },
            {
                "name": "otherFiles",
                "type": "object-store",
                "endpoints": [
                    {"region": "DFW", "publicURL": "https://other.example.com/v1/acct"}
                ]
            }
        ]))
        .unwrap();
        entries.into()
    }

    #[test]
    fn test_select_by_region() {
        let catalog = rackspace_catalog();
        let endpoint = catalog
            .find_endpoint("object-store", "ORD", Some("cloudFiles"))
            .unwrap();
        assert_eq!(
            endpoint.url,
            "https://storage101.ord1.clouddrive.com/v1/MossoCloudFS_948417"
        );
    }

    #[test]
    fn test_catalog_name_disambiguates_offerings() {
        let catalog = rackspace_catalog();
        let endpoint = catalog
            .find_endpoint("object-store", "DFW", Some("cloudFiles"))
            .unwrap();
        assert_eq!(
            endpoint.url,
            "https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_948417"
        );
    }

    #[test]
    fn test_wrong_service_type_is_skipped() {
        let catalog = rackspace_catalog();
        assert!(catalog.find_endpoint("compute", "DFW", None).is_none());
    }

    #[test]
    fn test_without_catalog_name_first_offering_wins() {
        let catalog = rackspace_catalog();
        let endpoint = catalog.find_endpoint("object-store", "DFW", None).unwrap();
        assert_eq!(
            endpoint.url,
            "https://storage101.dfw1.clouddrive.com/v1/MossoCloudFS_948417"
        );
    }

    #[test]
    fn test_missing_region_yields_none() {
        let catalog = rackspace_catalog();
        assert!(
            catalog
                .find_endpoint("object-store", "SYD", Some("cloudFiles"))
                .is_none()
        );
    }

    #[test]
    fn test_v3_catalog_selects_public_interface() {
        let entries: Vec<ServiceEntryV3> = serde_json::from_value(json!([
            {
                "name": "swift",
                "type": "object-store",
                "endpoints": [
                    {"region": "RegionOne", "interface": "admin", "url": "https://admin.example.com/v1/AUTH_t"},
                    {"region": "RegionOne", "interface": "public", "url": "https://swift.example.com/v1/AUTH_t"}
                ]
            }
        ]))
        .unwrap();
        let catalog = ServiceCatalog::from(entries);
        let endpoint = catalog
            .find_endpoint("object-store", "RegionOne", None)
            .unwrap();
        assert_eq!(endpoint.url, "https://swift.example.com/v1/AUTH_t");
    }

    #[test]
    fn test_region_less_endpoint_matches_any_region() {
        let entries: Vec<ServiceEntryV3> = serde_json::from_value(json!([
            {
                "name": "swift",
                "type": "object-store",
                "endpoints": [
                    {"interface": "public", "url": "https://swift.example.com/v1/AUTH_t"}
                ]
            }
        ]))
        .unwrap();
        let catalog = ServiceCatalog::from(entries);
        assert!(catalog.find_endpoint("object-store", "anywhere", None).is_some());
    }
}
