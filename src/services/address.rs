// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Saving delivery addresses resolved from a places lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, Endpoint};
use crate::error::ApiError;
use crate::types::DeliveryAddress;

/// Payload for `POST /addresses/from-places`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFromPlace {
    #[serde(default)]
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub place_id: String,
    pub address_type: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub entry_code: Option<String>,
    #[serde(default)]
    pub drop_off_option: Option<String>,
    #[serde(default)]
    pub extra_description: Option<String>,
}

/// Address operations against the backend.
pub struct AddressService {
    client: Arc<ApiClient>,
}

impl AddressService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Save an address for `user_id` and return the stored record.
    pub async fn save_address_from_place(
        &self,
        user_id: &str,
        address: &AddressFromPlace,
    ) -> Result<DeliveryAddress, ApiError> {
        self.client
            .request(&Endpoint::save_address_from_place(user_id, address))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_payload_wire_keys() {
        let address = AddressFromPlace {
            label: Some("Home".to_string()),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62704".to_string(),
            country: "US".to_string(),
            place_id: "place-1".to_string(),
            address_type: "home".to_string(),
            apartment: None,
            building_name: None,
            entry_code: Some("1234".to_string()),
            drop_off_option: Some("leave_at_door".to_string()),
            extra_description: None,
        };

        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(value["zipCode"], "62704");
        assert_eq!(value["placeId"], "place-1");
        assert_eq!(value["entryCode"], "1234");
        assert_eq!(value["dropOffOption"], "leave_at_door");
    }
}
