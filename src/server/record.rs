//! Server and interface record types.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Port state reported for an interface that is up and bound.
pub const PORT_STATE_ACTIVE: &str = "ACTIVE";

/// A compute instance as returned by the server details call.
///
/// Field names follow the compute API's JSON representation. Every field is
/// optional on input so partial records from test fixtures or trimmed API
/// responses still deserialize.
///
/// # Address Map
///
/// `addresses` maps a network name to the list of address entries on that
/// network. Entries stay as raw JSON here: shape validation happens in
/// [`crate::addresses`], where a malformed entry becomes an
/// [`AddressError`](crate::addresses::AddressError).
///
/// The map is a `BTreeMap`, so networks are always visited in ascending
/// name order regardless of the order the provider emitted them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Server display name.
    #[serde(default)]
    pub name: String,

    /// Lifecycle status (e.g., "ACTIVE", "SHUTOFF").
    #[serde(default)]
    pub status: String,

    /// Opaque identifier of the hypervisor host.
    #[serde(default, rename = "hostId")]
    pub host_id: String,

    /// Access IPv4 address; empty means unset.
    #[serde(default, rename = "accessIPv4", deserialize_with = "null_as_default")]
    pub access_ipv4: String,

    /// Access IPv6 address; empty means unset.
    #[serde(default, rename = "accessIPv6", deserialize_with = "null_as_default")]
    pub access_ipv6: String,

    /// Free-form metadata; expected to carry the hostname.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Per-network address lists, still in their raw JSON shape.
    #[serde(default)]
    pub addresses: BTreeMap<String, Value>,
}

/// Reads an optional value, mapping JSON `null` to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ServerRecord {
    /// Returns the metadata value for `key`, treating an empty value as absent.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// One fixed IP bound to an attached interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    /// The bound IP literal.
    pub ip_address: String,

    /// Subnet the address was allocated from, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
}

/// An interface attached to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Port state; only [`PORT_STATE_ACTIVE`] counts as up.
    #[serde(default)]
    pub port_state: String,

    /// Fixed IPs bound to this interface, in provider order.
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,

    /// Port identifier, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,

    /// Hardware address, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_addr: Option<String>,
}

impl InterfaceRecord {
    /// Creates an interface record with the given port state and fixed IPs.
    #[must_use]
    pub fn new<I, S>(port_state: impl Into<String>, fixed_ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            port_state: port_state.into(),
            fixed_ips: fixed_ips
                .into_iter()
                .map(|ip| FixedIp {
                    ip_address: ip.into(),
                    subnet_id: None,
                })
                .collect(),
            port_id: None,
            mac_addr: None,
        }
    }

    /// Returns true if the port is up.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.port_state == PORT_STATE_ACTIVE
    }

    /// Iterates over the bound IP literals.
    pub fn ip_addresses(&self) -> impl Iterator<Item = &str> {
        self.fixed_ips.iter().map(|ip| ip.ip_address.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod server_record {
        use super::*;

        #[test]
        fn deserializes_api_field_names() {
            let server: ServerRecord = serde_json::from_value(json!({
                "name": "minion-0",
                "status": "ACTIVE",
                "hostId": "29d3c8c8",
                "accessIPv4": "50.56.176.99",
                "accessIPv6": "2001:db8::1",
                "metadata": { "hostname": "minion-0.novalocal" },
                "addresses": { "private": [] }
            }))
            .unwrap();

            assert_eq!(server.name, "minion-0");
            assert_eq!(server.status, "ACTIVE");
            assert_eq!(server.host_id, "29d3c8c8");
            assert_eq!(server.access_ipv4, "50.56.176.99");
            assert_eq!(server.access_ipv6, "2001:db8::1");
            assert_eq!(server.addresses.len(), 1);
        }

        #[test]
        fn missing_fields_default_to_empty() {
            let server: ServerRecord = serde_json::from_value(json!({})).unwrap();

            assert!(server.access_ipv4.is_empty());
            assert!(server.metadata.is_empty());
            assert!(server.addresses.is_empty());
        }

        #[test]
        fn null_access_addresses_read_as_empty() {
            let server: ServerRecord = serde_json::from_value(json!({
                "accessIPv4": null,
                "accessIPv6": null,
                "addresses": { "private": [] }
            }))
            .unwrap();

            assert!(server.access_ipv4.is_empty());
            assert!(server.access_ipv6.is_empty());
            assert!(server.addresses.contains_key("private"));
        }

        #[test]
        fn non_string_access_address_is_rejected() {
            let result = serde_json::from_value::<ServerRecord>(json!({ "accessIPv4": 42 }));

            assert!(result.is_err());
        }

        #[test]
        fn addresses_iterate_in_name_order() {
            let server: ServerRecord = serde_json::from_value(json!({
                "addresses": { "zeta": [], "alpha": [], "public": [] }
            }))
            .unwrap();

            let names: Vec<&str> = server.addresses.keys().map(String::as_str).collect();
            assert_eq!(names, ["alpha", "public", "zeta"]);
        }

        #[test]
        fn metadata_value_treats_empty_as_absent() {
            let mut server = ServerRecord::default();
            server.metadata.insert("hostname".into(), String::new());
            server.metadata.insert("name".into(), "node".into());

            assert_eq!(server.metadata_value("hostname"), None);
            assert_eq!(server.metadata_value("name"), Some("node"));
            assert_eq!(server.metadata_value("missing"), None);
        }
    }

    mod interface_record {
        use super::*;

        #[test]
        fn deserializes_attachment_shape() {
            let iface: InterfaceRecord = serde_json::from_value(json!({
                "port_state": "ACTIVE",
                "port_id": "p-1",
                "mac_addr": "fa:16:3e:7c:1b:2b",
                "fixed_ips": [
                    { "ip_address": "10.0.0.32", "subnet_id": "s-1" },
                    { "ip_address": "10.0.0.31" }
                ]
            }))
            .unwrap();

            assert!(iface.is_active());
            assert_eq!(iface.port_id.as_deref(), Some("p-1"));
            assert_eq!(iface.fixed_ips[0].subnet_id.as_deref(), Some("s-1"));
            assert_eq!(
                iface.ip_addresses().collect::<Vec<_>>(),
                ["10.0.0.32", "10.0.0.31"]
            );
        }

        #[test]
        fn only_active_state_counts_as_active() {
            assert!(InterfaceRecord::new("ACTIVE", ["10.0.0.1"]).is_active());
            assert!(!InterfaceRecord::new("DOWN", ["10.0.0.1"]).is_active());
            assert!(!InterfaceRecord::new("active", ["10.0.0.1"]).is_active());
            assert!(!InterfaceRecord::new("", Vec::<String>::new()).is_active());
        }
    }
}
