//! Validation and normalisation of operator-supplied fields.
//!
//! Each `parse_*` function is a pure check of one raw string. The matching
//! `prompt_*` function keeps asking on the [`Console`] until the parse
//! succeeds, printing the reason for every rejection. Invalid input never
//! leaves this module; only a closed input stream does.
//!
//! Command builders only accept the typed values produced here.

use std::fmt;
use std::io::{BufRead, Write};
use std::net::Ipv4Addr;
use std::num::NonZeroU32;

use ipnetwork::Ipv4Network;
use log::debug;

use crate::console::Console;
use crate::error::Result;

/// Rejection reason shown to the operator.
pub type Reason = &'static str;

const INVALID_IPV4: Reason = "Invalid IPv4 address. Try again.";
const EMPTY_VALUE: Reason = "Value cannot be empty.";
const INVALID_MASK: Reason = "Invalid subnet or mask. Use dotted decimal or prefix length.";
const INVALID_WILDCARD: Reason = "Invalid wildcard mask. Use dotted decimal (e.g. 0.0.0.255).";
const EMPTY_INTERFACE: Reason = "Interface name cannot be empty.";
const NOT_POSITIVE: Reason = "Enter a positive integer.";
const EMPTY_AREA: Reason = "Area cannot be empty.";

/// Dotted-decimal network mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetMask(Ipv4Addr);

impl SubnetMask {
    /// Mask for a prefix length, `None` when the length exceeds 32.
    pub fn from_prefix(prefix: u8) -> Option<Self> {
        Ipv4Network::new(Ipv4Addr::UNSPECIFIED, prefix)
            .ok()
            .map(|net| Self(net.mask()))
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }
}

impl fmt::Display for SubnetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// OSPF wildcard mask. Only the IPv4 shape is checked, not bit inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildcardMask(Ipv4Addr);

impl fmt::Display for WildcardMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Interface name with its first character upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceName(String);

impl InterfaceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty OSPF area identifier, kept as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaId(String);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a dotted-decimal IPv4 address.
pub fn parse_ipv4(raw: &str) -> std::result::Result<Ipv4Addr, Reason> {
    raw.trim().parse().map_err(|_| INVALID_IPV4)
}

/// Parse a dotted mask, a bare prefix length or a `/N` prefix.
///
/// Dotted masks must be contiguous.
pub fn parse_subnet_mask(raw: &str) -> std::result::Result<SubnetMask, Reason> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(EMPTY_VALUE);
    }

    let prefix = value.strip_prefix('/').unwrap_or(value);
    if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
        return prefix
            .parse::<u8>()
            .ok()
            .and_then(SubnetMask::from_prefix)
            .ok_or(INVALID_MASK);
    }

    let mask: Ipv4Addr = value.parse().map_err(|_| INVALID_MASK)?;
    ipnetwork::ipv4_mask_to_prefix(mask).map_err(|_| INVALID_MASK)?;
    Ok(SubnetMask(mask))
}

/// Parse a wildcard mask (any syntactically valid IPv4 value).
pub fn parse_wildcard_mask(raw: &str) -> std::result::Result<WildcardMask, Reason> {
    raw.trim()
        .parse()
        .map(WildcardMask)
        .map_err(|_| INVALID_WILDCARD)
}

/// Parse an interface name, upper-casing only the first character.
pub fn parse_interface_name(raw: &str) -> std::result::Result<InterfaceName, Reason> {
    let value = raw.trim();
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => Ok(InterfaceName(first.to_uppercase().chain(chars).collect())),
        None => Err(EMPTY_INTERFACE),
    }
}

/// Parse an all-digit integer from 1 to `u32::MAX`.
pub fn parse_positive_int(raw: &str) -> std::result::Result<NonZeroU32, Reason> {
    let value = raw.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NOT_POSITIVE);
    }
    value.parse().map_err(|_| NOT_POSITIVE)
}

/// Parse an OSPF area identifier.
pub fn parse_area(raw: &str) -> std::result::Result<AreaId, Reason> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(EMPTY_AREA);
    }
    Ok(AreaId(value.to_string()))
}

/// Ask until `parse` accepts the answer.
fn prompt_until<R, W, T>(
    console: &mut Console<R, W>,
    text: &str,
    parse: impl Fn(&str) -> std::result::Result<T, Reason>,
) -> Result<T>
where
    R: BufRead,
    W: Write,
    T: fmt::Debug,
{
    loop {
        let raw = console.prompt(text)?;
        match parse(&raw) {
            Ok(value) => {
                debug!("Accepted {:?} for prompt {:?}", value, text.trim_end());
                return Ok(value);
            }
            Err(reason) => console.say(reason)?,
        }
    }
}

pub fn prompt_ipv4<R: BufRead, W: Write>(console: &mut Console<R, W>, text: &str) -> Result<Ipv4Addr> {
    prompt_until(console, text, parse_ipv4)
}

pub fn prompt_subnet_mask<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    text: &str,
) -> Result<SubnetMask> {
    prompt_until(console, text, parse_subnet_mask)
}

pub fn prompt_wildcard_mask<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    text: &str,
) -> Result<WildcardMask> {
    prompt_until(console, text, parse_wildcard_mask)
}

pub fn prompt_interface_name<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<InterfaceName> {
    prompt_until(console, "Interface (e.g. GigabitEthernet0/0): ", parse_interface_name)
}

pub fn prompt_positive_int<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    text: &str,
) -> Result<NonZeroU32> {
    prompt_until(console, text, parse_positive_int)
}

pub fn prompt_area<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<AreaId> {
    prompt_until(console, "Area ID: ", parse_area)
}

/// Ask once for a ping repeat count.
///
/// Empty input takes `default`. Anything that is not a positive integer also
/// takes `default`, with a warning and no second prompt.
pub fn prompt_ping_count<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    default: NonZeroU32,
) -> Result<NonZeroU32> {
    let raw = console.prompt(&format!("Ping count [{default}]: "))?;
    if raw.is_empty() {
        debug!("Ping count default applied: {}", default);
        return Ok(default);
    }
    match parse_positive_int(&raw) {
        Ok(count) => {
            debug!("Ping count accepted: {}", count);
            Ok(count)
        }
        Err(_) => {
            console.say("Invalid count. Using default.")?;
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::{printed, scripted};

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_ipv4_canonical_and_idempotent() {
        for raw in ["10.0.0.1", " 192.168.50.10 ", "0.0.0.0", "255.255.255.255"] {
            let first = parse_ipv4(raw).unwrap().to_string();
            assert_eq!(first, raw.trim());
            assert_eq!(parse_ipv4(&first).unwrap().to_string(), first);
        }
    }

    #[test]
    fn test_ipv4_rejects_malformed() {
        for raw in ["", "10.0.0", "10.0.0.256", "a.b.c.d", "10.0.0.1.2", "-1.0.0.0"] {
            assert_eq!(parse_ipv4(raw), Err(INVALID_IPV4), "{raw}");
        }
    }

    #[test]
    fn test_prefix_to_mask() {
        assert_eq!(parse_subnet_mask("/24").unwrap().to_string(), "255.255.255.0");
        assert_eq!(parse_subnet_mask("/30").unwrap().to_string(), "255.255.255.252");
        assert_eq!(parse_subnet_mask("/0").unwrap().to_string(), "0.0.0.0");
        assert_eq!(parse_subnet_mask("/32").unwrap().to_string(), "255.255.255.255");
        assert_eq!(parse_subnet_mask("16").unwrap().to_string(), "255.255.0.0");
    }

    #[test]
    fn test_every_prefix_matches_bit_count() {
        for n in 0u8..=32 {
            let mask = parse_subnet_mask(&format!("/{n}")).unwrap();
            assert_eq!(u32::from(mask.addr()).count_ones(), u32::from(n));
            assert_eq!(u32::from(mask.addr()).leading_ones(), u32::from(n));
        }
    }

    #[test]
    fn test_subnet_mask_rejections() {
        assert_eq!(parse_subnet_mask(""), Err(EMPTY_VALUE));
        assert_eq!(parse_subnet_mask("/33"), Err(INVALID_MASK));
        assert_eq!(parse_subnet_mask("/"), Err(INVALID_MASK));
        assert_eq!(parse_subnet_mask("255.0.255.0"), Err(INVALID_MASK));
        assert_eq!(parse_subnet_mask("mask"), Err(INVALID_MASK));
        assert_eq!(
            parse_subnet_mask("255.255.255.128").unwrap().to_string(),
            "255.255.255.128"
        );
    }

    #[test]
    fn test_wildcard_is_shape_only() {
        assert_eq!(parse_wildcard_mask("0.0.0.255").unwrap().to_string(), "0.0.0.255");
        // Not an inverted contiguous mask, still accepted
        assert_eq!(parse_wildcard_mask("0.255.0.255").unwrap().to_string(), "0.255.0.255");
        assert_eq!(parse_wildcard_mask("0.0.0.256"), Err(INVALID_WILDCARD));
    }

    #[test]
    fn test_interface_name_capitalisation() {
        assert_eq!(parse_interface_name("gi0/0").unwrap().as_str(), "Gi0/0");
        assert_eq!(parse_interface_name("g").unwrap().as_str(), "G");
        assert_eq!(
            parse_interface_name("gigabitEthernet0/1").unwrap().as_str(),
            "GigabitEthernet0/1"
        );
        assert_eq!(parse_interface_name("   "), Err(EMPTY_INTERFACE));
    }

    #[test]
    fn test_positive_int() {
        assert_eq!(parse_positive_int("10"), Ok(nz(10)));
        for raw in ["0", "-1", "+3", "1.5", "abc", "", "99999999999"] {
            assert_eq!(parse_positive_int(raw), Err(NOT_POSITIVE), "{raw}");
        }
    }

    #[test]
    fn test_positive_int_upper_bound() {
        assert_eq!(parse_positive_int("4294967295"), Ok(nz(u32::MAX)));
        assert_eq!(parse_positive_int("4294967296"), Err(NOT_POSITIVE));
    }

    #[test]
    fn test_positive_int_reprompts_once() {
        let mut console = scripted(&["abc", "7"]);
        let value = prompt_positive_int(&mut console, "OSPF process ID: ").unwrap();
        assert_eq!(value, nz(7));

        let out = printed(&console);
        assert_eq!(out.matches("OSPF process ID: ").count(), 2);
        assert_eq!(out.matches(NOT_POSITIVE).count(), 1);
    }

    #[test]
    fn test_area_reprompts_on_blank() {
        let mut console = scripted(&["", "0"]);
        assert_eq!(prompt_area(&mut console).unwrap().to_string(), "0");
        assert!(printed(&console).contains(EMPTY_AREA));
    }

    #[test]
    fn test_ping_count_defaults() {
        let mut console = scripted(&[""]);
        assert_eq!(prompt_ping_count(&mut console, nz(5)).unwrap(), nz(5));

        let mut console = scripted(&["0"]);
        assert_eq!(prompt_ping_count(&mut console, nz(5)).unwrap(), nz(5));
        assert!(printed(&console).contains("Invalid count. Using default."));

        let mut console = scripted(&["10"]);
        assert_eq!(prompt_ping_count(&mut console, nz(5)).unwrap(), nz(10));
        assert!(printed(&console).starts_with("Ping count [5]: "));
    }

    #[test]
    fn test_prompt_stops_at_end_of_input() {
        let mut console = scripted(&["not-an-ip"]);
        assert!(matches!(
            prompt_ipv4(&mut console, "IPv4 address: "),
            Err(crate::Error::InputClosed)
        ));
    }
}
