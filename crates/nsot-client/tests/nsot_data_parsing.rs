//! Integration tests for parsing NSoT response data.
//!
//! These tests validate that the nsot-client models decode the envelopes
//! NSoT returns for sites and networks.

use nsot_client::{Network, Site};
use nsot_core::{AttributeValue, Envelope, Error, IpVersion, NetworkId, SiteId};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture from disk.
fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

/// Load a fixture as a response envelope.
fn load_envelope(name: &str) -> Envelope {
    let json_data = load_fixture(name);
    serde_json::from_str(&json_data)
        .unwrap_or_else(|e| panic!("Failed to deserialize {name}: {e}\nJSON: {json_data}"))
}

/// Decode a fixture envelope and return its single keyed payload.
fn payload<T>(name: &str, key: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let mut data: HashMap<String, T> = load_envelope(name)
        .into_data()
        .unwrap_or_else(|e| panic!("Failed to decode payload of {name}: {e}"));
    data.remove(key)
        .unwrap_or_else(|| panic!("fixture {name} has no `{key}` key"))
}

#[test]
fn test_deserialize_site_detail() {
    let site: Site = payload("site_detail.json", "site");

    assert_eq!(site.id, SiteId::new(1));
    assert_eq!(site.name, "site1");
    assert_eq!(site.description.as_deref(), Some("Primary datacenter"));
}

#[test]
fn test_deserialize_site_list() {
    let sites: Vec<Site> = payload("site_list.json", "sites");

    assert_eq!(sites.len(), 3, "Expected 3 sites in test data");
    assert_eq!(sites[1].description.as_deref(), Some(""));
    assert!(sites[2].description.is_none(), "missing description stays absent");
}

#[test]
fn test_deserialize_network_detail() {
    let network: Network = payload("network_detail.json", "network");

    assert_eq!(network.id, NetworkId::new(7));
    assert_eq!(network.cidr(), "10.0.0.0/24");
    assert_eq!(network.ip_version, IpVersion::V4);
    assert_eq!(network.state.as_deref(), Some("allocated"));
    assert_eq!(network.site_id, Some(SiteId::new(1)));

    let attributes = network.attributes.expect("attributes present");
    assert_eq!(attributes["owner"], AttributeValue::from("netops"));
    assert_eq!(attributes["vlan"].as_i64(), Some(120));
    assert_eq!(attributes["managed"].as_bool(), Some(true));
    assert!(attributes["decommission_date"].is_null());
}

#[test]
fn test_deserialize_network_list() {
    let networks: Vec<Network> = payload("network_list.json", "networks");

    assert_eq!(networks.len(), 3);
    assert!(networks.iter().all(|n| n.site_id == Some(SiteId::new(1))));

    let host = &networks[1];
    assert!(host.is_ip);
    assert_eq!(host.cidr(), "10.0.0.1/32");

    let v6 = &networks[2];
    assert_eq!(v6.ip_version, IpVersion::V6);
    assert_eq!(v6.cidr(), "2001:db8::/32");
}

#[test]
fn test_error_envelopes_are_domain_errors() {
    for name in ["error_envelope.json", "error_no_data.json"] {
        let envelope = load_envelope(name);
        assert!(!envelope.is_ok());

        // Typed like a real site fetch, so a missing or null payload must not
        // mask the reported status.
        let err = envelope
            .into_data::<HashMap<String, Site>>()
            .unwrap_err();
        assert_eq!(err, Error::Domain("error".to_string()), "{name}");
    }
}

#[test]
fn test_network_reserializes_without_absent_fields() {
    let networks: Vec<Network> = payload("network_list.json", "networks");
    let mut bare = networks[0].clone();
    bare.state = None;
    bare.site_id = None;
    bare.attributes = None;

    let value = serde_json::to_value(&bare).unwrap();
    let object = value.as_object().unwrap();
    assert!(!object.contains_key("state"));
    assert!(!object.contains_key("site_id"));
    assert!(!object.contains_key("attributes"));
    assert_eq!(object["ip_version"], "4");
}
