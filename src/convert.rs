//! Conversions into the analyzer's `#H` hex literal format, and the
//! throughput arithmetic used to size a test stream.

use std::fmt::Write;
use std::net::IpAddr;

use crate::error::ValidationError;
use crate::port::DeviceAddress;
use crate::validate::validate_range;

/// Prefix the analyzer expects in front of every hex literal.
pub const HEX_MARKER: &str = "#H";

/// Ethernet minimum inter-frame gap in bytes at 100% line rate.
const MIN_IFG_BYTES: u64 = 12;

/// Largest preamble the gap arithmetic accepts, in bytes.
pub const MAX_PREAMBLE_BYTES: u64 = 65_535;

fn parse_octet(octet: &str) -> Result<u8, ValidationError> {
    if octet.is_empty() || octet.len() > 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::Malformed {
            field: "mac",
            value: octet.to_string(),
            reason: "octet must be one or two hex digits".into(),
        });
    }
    u8::from_str_radix(octet, 16).map_err(|e| ValidationError::Malformed {
        field: "mac",
        value: octet.to_string(),
        reason: e.to_string(),
    })
}

/// Converts a dash-separated MAC (`00-DE-BB-00-00-01`) into `#H00DEBB000001`.
///
/// A two-octet MAC (`00-01`) is completed with the port address, giving
/// `#H00 0<unit> 0<module> 0<port>` followed by the two octets. That form
/// is meant for source addresses, so that each generator port gets a MAC
/// derived from where it sits in the chassis.
pub fn mac_to_hex(mac: &str, address: Option<&DeviceAddress>) -> Result<String, ValidationError> {
    let octets = mac
        .split('-')
        .map(parse_octet)
        .collect::<Result<Vec<u8>, _>>()?;

    let mut out = String::from(HEX_MARKER);
    match octets.len() {
        6 => {}
        2 => {
            let addr = address.ok_or(ValidationError::Missing("port address for 2-octet MAC"))?;
            let _ = write!(out, "000{}0{}0{}", addr.unit, addr.module, addr.port);
        }
        _ => {
            return Err(ValidationError::Malformed {
                field: "mac",
                value: mac.to_string(),
                reason: "a MAC address must have 2 or 6 octets".into(),
            });
        }
    }
    for b in octets {
        let _ = write!(out, "{:02X}", b);
    }
    Ok(out.to_ascii_uppercase())
}

/// Converts `addr[/prefix]` to the analyzer's (address, netmask) hex pair.
/// A missing prefix means a host route (/32 or /128). Digits are not zero
/// padded: `10.0.0.1/8` becomes (`#HA000001`, `#HFF000000`).
pub fn ip_to_hex(cidr: &str) -> Result<(String, String), ValidationError> {
    let malformed = |reason: &str| ValidationError::Malformed {
        field: "ip",
        value: cidr.to_string(),
        reason: reason.to_string(),
    };

    let (addr, prefix) = match cidr.split_once('/') {
        Some((a, p)) => (a, Some(p)),
        None => (cidr, None),
    };
    let ip: IpAddr = addr.trim().parse().map_err(|_| malformed("not an IP address"))?;
    let bits: u32 = if ip.is_ipv4() { 32 } else { 128 };
    let prefix = match prefix {
        Some(p) => p
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed("prefix is not a number"))?,
        None => bits,
    };
    if prefix > bits {
        return Err(malformed("prefix longer than the address"));
    }

    let (addr_hex, mask_hex) = match ip {
        IpAddr::V4(v4) => {
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            (format!("{:X}", u32::from(v4)), format!("{:X}", mask))
        }
        IpAddr::V6(v6) => {
            let mask = u128::MAX.checked_shl(128 - prefix).unwrap_or(0);
            (format!("{:X}", u128::from(v6)), format!("{:X}", mask))
        }
    };
    Ok((
        format!("{HEX_MARKER}{addr_hex}"),
        format!("{HEX_MARKER}{mask_hex}"),
    ))
}

/// Whether `cidr` is an IPv4 network. Used by the builder to reject an
/// IPv6 network handed to an IPv4 field and vice versa.
pub fn is_ipv4(cidr: &str) -> bool {
    let addr = cidr.split_once('/').map_or(cidr, |(a, _)| a);
    matches!(addr.trim().parse::<IpAddr>(), Ok(IpAddr::V4(_)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterFrameGap {
    pub bytes: u64,
    pub nanoseconds: u64,
}

/// Gap needed to run a port at `speed_percent` of line rate.
///
/// The nanosecond figure divides the gap in bits by `gbps / 10`, which is
/// the unit the analyzer's IFG field is programmed in.
pub fn compute_inter_frame_gap(
    speed_percent: u64,
    preamble: u64,
    frame_size: u64,
    gbps: f64,
) -> Result<InterFrameGap, ValidationError> {
    let speed = validate_range("speed_percent", 1, 100, speed_percent)?;
    validate_range("frame_size", 1, u64::from(u32::MAX), frame_size)?;
    validate_range("preamble", 0, MAX_PREAMBLE_BYTES, preamble)?;
    if !(gbps > 0.0) {
        return Err(ValidationError::Malformed {
            field: "gbps",
            value: gbps.to_string(),
            reason: "line rate must be positive".into(),
        });
    }

    let on_wire = frame_size + preamble + MIN_IFG_BYTES;
    let total = (on_wire as f64 * (100.0 / speed as f64)) as u64;
    let bytes = total - frame_size - preamble;
    let nanoseconds = ((bytes * 8) as f64 / (gbps / 10.0)) as u64;
    Ok(InterFrameGap { bytes, nanoseconds })
}

/// Frames sent in `seconds` at `gbps` with the given per-frame overhead.
pub fn compute_frame_count(
    seconds: f64,
    preamble: u64,
    gap_bytes: u64,
    frame_size: u64,
    gbps: f64,
) -> u64 {
    let bytes_per_sec = gbps * 1_000_000_000.0 / 8.0;
    let per_frame = frame_size.saturating_add(preamble).saturating_add(gap_bytes) as f64;
    if per_frame == 0.0 {
        return 0;
    }
    (bytes_per_sec / per_frame * seconds) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_mac(hex: &str) -> Vec<u8> {
        let digits = hex.strip_prefix(HEX_MARKER).unwrap();
        (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn six_octet_mac_decodes_back() {
        let hex = mac_to_hex("00-de-bb-0a-ff-1", None).unwrap();
        assert_eq!(hex, "#H00DEBB0AFF01");
        assert_eq!(decode_mac(&hex), vec![0x00, 0xDE, 0xBB, 0x0A, 0xFF, 0x01]);
    }

    #[test]
    fn two_octet_mac_uses_port_address() {
        let addr = DeviceAddress::new("1", "2", "3");
        assert_eq!(
            mac_to_hex("00-0a", Some(&addr)).unwrap(),
            "#H00010203000A"
        );
        assert_eq!(
            mac_to_hex("00-0a", None),
            Err(ValidationError::Missing("port address for 2-octet MAC"))
        );
    }

    #[test]
    fn bad_mac_is_rejected() {
        assert!(mac_to_hex("00-11-22", None).is_err());
        assert!(mac_to_hex("00-11-22-33-44-GG", None).is_err());
        assert!(mac_to_hex("00-11-22-33-44-100", None).is_err());
    }

    #[test]
    fn ipv4_with_prefix() {
        let (addr, mask) = ip_to_hex("127.0.0.1/24").unwrap();
        assert_eq!(addr, "#H7F000001");
        assert_eq!(mask, "#HFFFFFF00");
    }

    #[test]
    fn ip_hex_is_not_padded() {
        assert_eq!(
            ip_to_hex("10.0.0.1/8").unwrap(),
            ("#HA000001".to_string(), "#HFF000000".to_string())
        );
        assert_eq!(ip_to_hex("0.0.0.0/0").unwrap().1, "#H0");
    }

    #[test]
    fn ipv6_defaults_to_host_prefix() {
        let (addr, mask) = ip_to_hex("fe80::dead:beef").unwrap();
        assert_eq!(addr, "#HFE8000000000000000000000DEADBEEF");
        assert_eq!(mask, format!("#H{}", "F".repeat(32)));
        let (_, mask) = ip_to_hex("1:2:3:4:5:6:7:8/64").unwrap();
        assert_eq!(mask, format!("#H{}{}", "F".repeat(16), "0".repeat(16)));
    }

    #[test]
    fn bad_ip_is_rejected() {
        assert!(ip_to_hex("127.0.0.1/33").is_err());
        assert!(ip_to_hex("300.0.0.1/24").is_err());
        assert!(ip_to_hex("127.0.0.1/x").is_err());
        assert!(is_ipv4("127.0.0.1/24"));
        assert!(!is_ipv4("::1/128"));
    }

    #[test]
    fn frame_count_matches_line_rate_formula() {
        let frames = compute_frame_count(1.0, 8, 12, 64, 10.0);
        let expected = (10.0 * 1e9 / 8.0 / (64.0 + 8.0 + 12.0) * 1.0_f64).floor() as u64;
        assert_eq!(frames, expected);
        assert_eq!(frames, 14_880_952);
    }

    #[test]
    fn inter_frame_gap_at_full_and_half_rate() {
        let full = compute_inter_frame_gap(100, 8, 64, 10.0).unwrap();
        assert_eq!(full, InterFrameGap { bytes: 12, nanoseconds: 96 });
        let half = compute_inter_frame_gap(50, 8, 64, 10.0).unwrap();
        assert_eq!(half.bytes, 168 - 72);
        assert!(compute_inter_frame_gap(0, 8, 64, 10.0).is_err());
        assert!(compute_inter_frame_gap(101, 8, 64, 10.0).is_err());
        assert!(compute_inter_frame_gap(100, 8, 64, 0.0).is_err());
    }

    #[test]
    fn oversized_preamble_is_out_of_range() {
        assert!(matches!(
            compute_inter_frame_gap(100, u64::MAX, 64, 10.0),
            Err(ValidationError::OutOfRange { field: "preamble", .. })
        ));
        let widest = compute_inter_frame_gap(1, MAX_PREAMBLE_BYTES, u64::from(u32::MAX), 10.0).unwrap();
        assert!(widest.bytes > 0);
        assert_eq!(compute_frame_count(1.0, u64::MAX, 12, 64, 10.0), 0);
    }
}
