//! Device command builders.
//!
//! Pure functions from validated fields to the exact lines sent to a device.

use std::net::Ipv4Addr;
use std::num::NonZeroU32;

use crate::fields::{AreaId, InterfaceName, SubnetMask, WildcardMask};

/// Interface status summary.
pub const SHOW_INTERFACES: &str = "show ip interface brief";

/// Full running configuration capture.
pub const SHOW_RUNNING_CONFIG: &str = "show running-config";

/// Address an interface and bring it up.
pub fn interface_config(name: &InterfaceName, ip: Ipv4Addr, mask: SubnetMask) -> Vec<String> {
    vec![
        format!("interface {name}"),
        format!("ip address {ip} {mask}"),
        "no shutdown".to_string(),
    ]
}

/// Start an OSPF process and advertise one network into an area.
pub fn ospf_config(
    process_id: NonZeroU32,
    router_id: Ipv4Addr,
    network: Ipv4Addr,
    wildcard: WildcardMask,
    area: &AreaId,
) -> Vec<String> {
    vec![
        format!("router ospf {process_id}"),
        format!("router-id {router_id}"),
        format!("network {network} {wildcard} area {area}"),
    ]
}

/// Extended ping with a repeat count.
pub fn ping(destination: Ipv4Addr, repeat: NonZeroU32) -> String {
    format!("ping {destination} repeat {repeat}")
}
