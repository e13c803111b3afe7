//! IPv4 subnet calculator: network facts, subnet splitting and range covers.

use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::respond;

const MAX_LISTED_SUBNETS: u64 = 1024;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetInfo {
    pub address: String,
    pub cidr: String,
    pub prefix: u8,
    pub netmask: String,
    pub wildcard: String,
    pub network: String,
    pub broadcast: String,
    pub first_host: String,
    pub last_host: String,
    pub total_addresses: u64,
    pub usable_hosts: u64,
    pub class: char,
    pub is_private: bool,
    pub is_loopback: bool,
    pub is_link_local: bool,
    pub binary_netmask: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSplit {
    pub parent: String,
    pub new_prefix: u8,
    pub total: u64,
    pub subnets: Vec<String>,
    pub truncated: bool,
}

fn parse_ipv4(value: &str) -> Result<Ipv4Addr> {
    Ipv4Addr::from_str(value.trim())
        .map_err(|_| ToolError::invalid(format!("invalid IPv4 address: {}", value.trim())))
}

fn prefix_to_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix as u32)
    }
}

fn mask_to_prefix(mask: u32) -> Result<u8> {
    let prefix = mask.leading_ones();
    if prefix_to_mask(prefix as u8) != mask {
        return Err(ToolError::invalid(format!(
            "invalid subnet mask: {}",
            Ipv4Addr::from(mask)
        )));
    }
    Ok(prefix as u8)
}

fn parse_prefix_or_mask(value: &str) -> Result<u8> {
    let value = value.trim();
    if value.contains('.') {
        return mask_to_prefix(u32::from(parse_ipv4(value)?));
    }
    let prefix: u8 = value
        .parse()
        .map_err(|_| ToolError::invalid(format!("invalid prefix length: {value}")))?;
    if prefix > 32 {
        return Err(ToolError::invalid(format!("invalid prefix length: {value}")));
    }
    Ok(prefix)
}

/// Accepts `a.b.c.d/len`, `a.b.c.d/mask`, `a.b.c.d mask` or a bare address.
fn parse_network_input(input: &str) -> Result<(Ipv4Addr, u8)> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ToolError::invalid("input is empty"));
    }
    if let Some((left, right)) = trimmed.split_once('/') {
        return Ok((parse_ipv4(left)?, parse_prefix_or_mask(right)?));
    }
    let mut parts = trimmed.split_whitespace();
    let address = parse_ipv4(parts.next().unwrap_or_default())?;
    let prefix = match parts.next() {
        Some(mask) => parse_prefix_or_mask(mask)?,
        None => 32,
    };
    if parts.next().is_some() {
        return Err(ToolError::invalid(format!("unexpected input: {trimmed}")));
    }
    Ok((address, prefix))
}

fn address_class(first_octet: u8) -> char {
    match first_octet {
        0..=127 => 'A',
        128..=191 => 'B',
        192..=223 => 'C',
        224..=239 => 'D',
        _ => 'E',
    }
}

fn binary_dotted(value: u32) -> String {
    value
        .to_be_bytes()
        .iter()
        .map(|octet| format!("{octet:08b}"))
        .collect::<Vec<_>>()
        .join(".")
}

pub fn subnet_info_internal(input: &str) -> Result<SubnetInfo> {
    let (address, prefix) = parse_network_input(input)?;
    let mask = prefix_to_mask(prefix);
    let ip = u32::from(address);
    let network = ip & mask;
    let broadcast = network | !mask;
    let total_addresses = 1u64 << (32 - prefix as u32);
    let (first_host, last_host, usable_hosts) = match prefix {
        32 => (network, network, 1),
        31 => (network, broadcast, 2),
        _ => (network + 1, broadcast - 1, total_addresses - 2),
    };
    Ok(SubnetInfo {
        address: address.to_string(),
        cidr: format!("{}/{}", Ipv4Addr::from(network), prefix),
        prefix,
        netmask: Ipv4Addr::from(mask).to_string(),
        wildcard: Ipv4Addr::from(!mask).to_string(),
        network: Ipv4Addr::from(network).to_string(),
        broadcast: Ipv4Addr::from(broadcast).to_string(),
        first_host: Ipv4Addr::from(first_host).to_string(),
        last_host: Ipv4Addr::from(last_host).to_string(),
        total_addresses,
        usable_hosts,
        class: address_class(address.octets()[0]),
        is_private: address.is_private(),
        is_loopback: address.is_loopback(),
        is_link_local: address.is_link_local(),
        binary_netmask: binary_dotted(mask),
    })
}

pub fn split_subnet_internal(cidr: &str, new_prefix: u8) -> Result<SubnetSplit> {
    let (address, prefix) = parse_network_input(cidr)?;
    if new_prefix > 32 || new_prefix < prefix {
        return Err(ToolError::invalid(format!(
            "new prefix must be between {prefix} and 32"
        )));
    }
    let network = u32::from(address) & prefix_to_mask(prefix);
    let total = 1u64 << (new_prefix - prefix);
    let step = 1u64 << (32 - new_prefix as u32);
    let subnets = (0..total.min(MAX_LISTED_SUBNETS))
        .map(|idx| {
            let start = (network as u64 + idx * step) as u32;
            format!("{}/{}", Ipv4Addr::from(start), new_prefix)
        })
        .collect();
    Ok(SubnetSplit {
        parent: format!("{}/{}", Ipv4Addr::from(network), prefix),
        new_prefix,
        total,
        subnets,
        truncated: total > MAX_LISTED_SUBNETS,
    })
}

/// Minimal list of CIDR blocks covering `start..=end`.
pub fn range_to_cidrs_internal(start: &str, end: &str) -> Result<Vec<String>> {
    let mut start = u32::from(parse_ipv4(start)?) as u64;
    let end = u32::from(parse_ipv4(end)?) as u64;
    if start > end {
        return Err(ToolError::invalid(
            "start IP must be less than or equal to end IP",
        ));
    }
    let mut cidrs = Vec::new();
    while start <= end {
        // Largest block aligned at `start`; address 0 aligns with the whole space.
        let mut size = if start == 0 { 1u64 << 32 } else { start & start.wrapping_neg() };
        let remaining = end - start + 1;
        while size > remaining {
            size >>= 1;
        }
        let prefix = 32 - size.trailing_zeros();
        cidrs.push(format!("{}/{}", Ipv4Addr::from(start as u32), prefix));
        start += size;
    }
    Ok(cidrs)
}

#[wasm_bindgen]
pub fn subnet_info(input: &str) -> Result<JsValue, JsValue> {
    respond("subnet calculator", subnet_info_internal(input))
}

#[wasm_bindgen]
pub fn split_subnet(cidr: &str, new_prefix: u8) -> Result<JsValue, JsValue> {
    respond("subnet splitter", split_subnet_internal(cidr, new_prefix))
}

#[wasm_bindgen]
pub fn range_to_cidrs(start: &str, end: &str) -> Result<JsValue, JsValue> {
    respond("range to CIDR", range_to_cidrs_internal(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_24_network_and_broadcast() {
        let info = subnet_info_internal("192.168.1.1/24").unwrap();
        assert_eq!(info.network, "192.168.1.0");
        assert_eq!(info.broadcast, "192.168.1.255");
        assert_eq!(info.netmask, "255.255.255.0");
        assert_eq!(info.wildcard, "0.0.0.255");
        assert_eq!(info.first_host, "192.168.1.1");
        assert_eq!(info.last_host, "192.168.1.254");
        assert_eq!(info.total_addresses, 256);
        assert_eq!(info.usable_hosts, 254);
        assert_eq!(info.class, 'C');
        assert!(info.is_private);
        assert_eq!(info.binary_netmask, "11111111.11111111.11111111.00000000");
    }

    #[test]
    fn accepts_dotted_masks_in_both_forms() {
        let slash = subnet_info_internal("10.1.2.3/255.255.0.0").unwrap();
        let spaced = subnet_info_internal("10.1.2.3 255.255.0.0").unwrap();
        assert_eq!(slash, spaced);
        assert_eq!(slash.cidr, "10.1.0.0/16");
        assert_eq!(slash.class, 'A');
    }

    #[test]
    fn point_to_point_and_host_routes() {
        let p2p = subnet_info_internal("203.0.113.8/31").unwrap();
        assert_eq!(p2p.usable_hosts, 2);
        assert_eq!(p2p.first_host, "203.0.113.8");
        assert_eq!(p2p.last_host, "203.0.113.9");
        let host = subnet_info_internal("127.0.0.1").unwrap();
        assert_eq!(host.prefix, 32);
        assert_eq!(host.usable_hosts, 1);
        assert!(host.is_loopback);
    }

    #[test]
    fn whole_address_space() {
        let info = subnet_info_internal("8.8.8.8/0").unwrap();
        assert_eq!(info.total_addresses, 1 << 32);
        assert_eq!(info.network, "0.0.0.0");
        assert_eq!(info.broadcast, "255.255.255.255");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(subnet_info_internal("10.0.0.1/33").is_err());
        assert!(subnet_info_internal("10.0.0.1/255.0.255.0").is_err());
        assert!(subnet_info_internal("300.1.1.1").is_err());
        assert!(subnet_info_internal("").is_err());
    }

    #[test]
    fn splits_into_child_networks() {
        let split = split_subnet_internal("192.168.0.0/24", 26).unwrap();
        assert_eq!(split.total, 4);
        assert_eq!(
            split.subnets,
            vec![
                "192.168.0.0/26",
                "192.168.0.64/26",
                "192.168.0.128/26",
                "192.168.0.192/26"
            ]
        );
        assert!(!split.truncated);
        let big = split_subnet_internal("10.0.0.0/8", 24).unwrap();
        assert_eq!(big.total, 65536);
        assert_eq!(big.subnets.len(), 1024);
        assert!(big.truncated);
        assert!(split_subnet_internal("10.0.0.0/16", 8).is_err());
    }

    #[test]
    fn range_cover_is_minimal() {
        assert_eq!(
            range_to_cidrs_internal("192.168.1.0", "192.168.1.255").unwrap(),
            vec!["192.168.1.0/24"]
        );
        assert_eq!(
            range_to_cidrs_internal("10.0.0.1", "10.0.0.6").unwrap(),
            vec!["10.0.0.1/32", "10.0.0.2/31", "10.0.0.4/31", "10.0.0.6/32"]
        );
        assert_eq!(
            range_to_cidrs_internal("0.0.0.0", "255.255.255.255").unwrap(),
            vec!["0.0.0.0/0"]
        );
        assert!(range_to_cidrs_internal("10.0.0.9", "10.0.0.1").is_err());
    }
}
