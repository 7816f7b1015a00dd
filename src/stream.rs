//! Stream configuration builder.
//!
//! A stream is one row of a port's stream table. Every setter appends the
//! write lines for its field and records, for each of them, the query that
//! reads the field back together with the reply the analyzer must give.
//! Nothing is sent here; [`crate::commit`] replays the result.
//!
//! Read-backs are split in two: stream-level fields (distribution, gaps,
//! burst sizing, frame size policy) and frame-level fields (addresses,
//! protocol, test frame, error insertion). The analyzer can only report
//! frame fields once the stream-level fields are in effect, so the commit
//! verifies the stream set first.

use std::collections::BTreeMap;

use tracing::trace;

use crate::convert::{ip_to_hex, is_ipv4, mac_to_hex};
use crate::error::{Result, ValidationError};
use crate::port::DeviceAddress;
use crate::proto::command::{
    AddressType, ArpOperation, DeviceCommand, Distribution, EthernetError, FrameSizeType, GapType,
    Ipv4Error, Protocol, TestFrameType,
};
use crate::proto::parser::{SELECT_PATHS, expected_reply, format_command, query_line, write_line};
use crate::session::DeviceType;
use crate::validate::{require, require_range, validate_range};

const ITEM: &str = "TSTReam:TABLe:ITEM";

const MAX_JUMP_ID: u64 = 256;
const MAX_JUMP_COUNT: u64 = 16_000_000;
const MAX_GAP_NS: u64 = 1_200_000_000_000;
const MAX_BURST: u64 = 1_099_511_627_775;
const MIN_FRAME_SIZE: u64 = 8;
const MAX_FRAME_SIZE: u64 = 65_280;

/// Default mask for MAC fields: all bits significant.
pub const FULL_MAC_MASK: &str = "FF-FF-FF-FF-FF-FF";

/// A built stream, ready to commit. Read-only once built.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    stream_id: u32,
    address: DeviceAddress,
    device: DeviceType,
    port_commands: Vec<String>,
    port_queries: Vec<(String, String)>,
    commands: Vec<String>,
    stream_queries: BTreeMap<String, String>,
    frame_queries: BTreeMap<String, String>,
}

impl StreamConfig {
    pub fn stream_id(&self) -> u32 {
        self.stream_id
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub fn device(&self) -> DeviceType {
        self.device
    }

    pub fn port_commands(&self) -> &[String] {
        &self.port_commands
    }

    /// Selection read-backs in unit, module, port order.
    pub fn port_queries(&self) -> &[(String, String)] {
        &self.port_queries
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Ordered by query line, which is the order they are verified in.
    pub fn stream_queries(&self) -> &BTreeMap<String, String> {
        &self.stream_queries
    }

    pub fn frame_queries(&self) -> &BTreeMap<String, String> {
        &self.frame_queries
    }

    /// Every query with its expected reply, across all three phases.
    pub fn expectations(&self) -> impl Iterator<Item = (&String, &String)> {
        self.port_queries
            .iter()
            .map(|(q, e)| (q, e))
            .chain(self.stream_queries.iter())
            .chain(self.frame_queries.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Stream,
    Frame,
}

/// Accumulates one stream. Setters can be chained with `?`:
///
/// ```ignore
/// let mut b = session.stream(1, &addr);
/// b.distribution(Distribution::Next, None, None)?
///     .frames_per_burst(1000)?
///     .frame_size(FrameSizeType::Fixed, Some(64), None)?;
/// session.commit(&b.build())?;
/// ```
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    config: StreamConfig,
}

impl StreamBuilder {
    pub fn new(stream_id: u32, address: &DeviceAddress, device: DeviceType) -> Self {
        let port_commands = address
            .select_commands()
            .iter()
            .map(format_command)
            .collect();
        let selection = [&address.unit, &address.module, &address.port];
        let port_queries = SELECT_PATHS
            .iter()
            .zip(selection)
            .map(|(path, value)| (query_line(path), expected_reply(value)))
            .collect();

        let mut builder = Self {
            config: StreamConfig {
                stream_id,
                address: address.clone(),
                device,
                port_commands,
                port_queries,
                commands: vec![
                    format_command(&DeviceCommand::TableAdd),
                    format_command(&DeviceCommand::TableId(stream_id)),
                ],
                stream_queries: BTreeMap::new(),
                frame_queries: BTreeMap::new(),
            },
        };
        builder.expect(Scope::Stream, "TSTReam:TABLe:ID", stream_id);
        builder
    }

    pub fn build(self) -> StreamConfig {
        self.config
    }

    fn expect(&mut self, scope: Scope, path: &str, value: impl ToString) {
        let queries = match scope {
            Scope::Stream => &mut self.config.stream_queries,
            Scope::Frame => &mut self.config.frame_queries,
        };
        queries.insert(query_line(path), expected_reply(value.to_string()));
    }

    fn command(&mut self, path: &str, value: impl ToString) {
        let line = write_line(path, value.to_string());
        trace!(line = %line.escape_debug(), "stream command");
        self.config.commands.push(line);
    }

    /// A field whose read-back echoes the value written.
    fn set(&mut self, scope: Scope, field: &str, value: impl ToString) {
        let path = format!("{ITEM}:{field}");
        let value = value.to_string();
        self.command(&path, &value);
        self.expect(scope, &path, value);
    }

    /// `jump_to_id` is needed for the JUMP types and `count` for
    /// JUMP_COUNT and JUMP_STOP; otherwise they are ignored.
    pub fn distribution(
        &mut self,
        kind: Distribution,
        jump_to_id: Option<u64>,
        count: Option<u64>,
    ) -> Result<&mut Self> {
        let jump = match kind {
            Distribution::Jump => Some((require_range("jump_to_id", 1, MAX_JUMP_ID, jump_to_id)?, None)),
            Distribution::JumpCount | Distribution::JumpStop => Some((
                require_range("jump_to_id", 1, MAX_JUMP_ID, jump_to_id)?,
                Some(require_range("count", 1, MAX_JUMP_COUNT, count)?),
            )),
            _ => None,
        };

        self.set(Scope::Stream, "CONTrol:DISTribution", kind);
        if let Some((id, count)) = jump {
            self.set(Scope::Stream, "CONTrol:JTID", id);
            if let Some(count) = count {
                self.set(Scope::Stream, "CONTrol:COUNt", count);
            }
        }
        Ok(self)
    }

    /// Inter-burst gap in ns.
    pub fn inter_burst_gap(&mut self, ns: u64) -> Result<&mut Self> {
        let ns = validate_range("inter_burst_gap", 1, MAX_GAP_NS, ns)?;
        self.set(Scope::Stream, "CONTrol:GAP:IBG", ns);
        Ok(self)
    }

    /// Inter-stream gap in ns.
    pub fn inter_stream_gap(&mut self, ns: u64) -> Result<&mut Self> {
        let ns = validate_range("inter_stream_gap", 1, MAX_GAP_NS, ns)?;
        self.set(Scope::Stream, "CONTrol:GAP:ISG", ns);
        Ok(self)
    }

    /// FIXED takes `value` as the gap; RANDOM takes it as the minimum and
    /// needs `maximum`. In RANDOM mode the analyzer reports the minimum
    /// through the VALue field, so that is what gets read back.
    pub fn inter_frame_gap(
        &mut self,
        kind: GapType,
        value: u64,
        maximum: Option<u64>,
    ) -> Result<&mut Self> {
        let value = validate_range("inter_frame_gap", 1, MAX_GAP_NS, value)?;
        match kind {
            GapType::Fixed => {
                self.set(Scope::Stream, "CONTrol:GAP:IFG:TYPE", kind);
                self.set(Scope::Stream, "CONTrol:GAP:IFG:VALue", value);
            }
            GapType::Random => {
                let maximum = require_range("inter_frame_gap_maximum", 1, MAX_GAP_NS, maximum)?;
                self.set(Scope::Stream, "CONTrol:GAP:IFG:TYPE", kind);
                self.command(&format!("{ITEM}:CONTrol:GAP:IFG:MINimum"), value);
                self.expect(Scope::Stream, &format!("{ITEM}:CONTrol:GAP:IFG:VALue"), value);
                self.set(Scope::Stream, "CONTrol:GAP:IFG:MAXimum", maximum);
            }
        }
        Ok(self)
    }

    pub fn burst_per_stream(&mut self, amount: u64) -> Result<&mut Self> {
        let amount = validate_range("burst_per_stream", 1, MAX_BURST, amount)?;
        self.set(Scope::Stream, "CONTrol:BPSTream", amount);
        Ok(self)
    }

    pub fn frames_per_burst(&mut self, amount: u64) -> Result<&mut Self> {
        let amount = validate_range("frames_per_burst", 1, MAX_BURST, amount)?;
        self.set(Scope::Stream, "CONTrol:FPBurst", amount);
        Ok(self)
    }

    /// AUTO ignores both sizes. FIXED needs `value`. INCREMENT and RANDOM
    /// need `value` as minimum and `maximum`.
    pub fn frame_size(
        &mut self,
        kind: FrameSizeType,
        value: Option<u64>,
        maximum: Option<u64>,
    ) -> Result<&mut Self> {
        let size = |field, v| require_range(field, MIN_FRAME_SIZE, MAX_FRAME_SIZE, v);
        match kind {
            FrameSizeType::Auto => {
                self.set(Scope::Stream, "FSIZe:TYPE", kind);
            }
            FrameSizeType::Fixed => {
                let value = size("frame_size", value)?;
                self.set(Scope::Stream, "FSIZe:TYPE", kind);
                self.set(Scope::Stream, "FSIZe:VALue", value);
            }
            FrameSizeType::Increment | FrameSizeType::Random => {
                let min = size("frame_size", value)?;
                let max = size("frame_size_maximum", maximum)?;
                self.set(Scope::Stream, "FSIZe:TYPE", kind);
                self.set(Scope::Stream, "FSIZe:MINimum", min);
                self.set(Scope::Stream, "FSIZe:MAXimum", max);
            }
        }
        Ok(self)
    }

    fn ethernet_address(
        &mut self,
        field: &str,
        address_hex: &str,
        mask: &str,
        kind: AddressType,
    ) -> Result<&mut Self> {
        if address_hex.trim().is_empty() {
            return Err(ValidationError::Missing("ethernet address").into());
        }
        let mask_hex = mac_to_hex(mask, Some(&self.config.address))?;
        self.set(Scope::Frame, &format!("FRAMe:ETHernet:{field}:VALue"), address_hex);
        self.set(Scope::Frame, &format!("FRAMe:ETHernet:{field}:MASK"), mask_hex);
        self.set(Scope::Frame, &format!("FRAMe:ETHernet:{field}:TYPE"), kind);
        Ok(self)
    }

    /// `address_hex` must already be in `#H` form (see
    /// [`crate::convert::mac_to_hex`]); `mask` is dash-separated and is
    /// converted here.
    pub fn frame_source_address(
        &mut self,
        address_hex: &str,
        mask: &str,
        kind: AddressType,
    ) -> Result<&mut Self> {
        self.ethernet_address("SA", address_hex, mask, kind)
    }

    /// Same conventions as [`Self::frame_source_address`].
    pub fn frame_destination_address(
        &mut self,
        address_hex: &str,
        mask: &str,
        kind: AddressType,
    ) -> Result<&mut Self> {
        self.ethernet_address("DA", address_hex, mask, kind)
    }

    pub fn protocol(&mut self, protocol: Protocol) -> Result<&mut Self> {
        self.set(Scope::Frame, "PROTocol:TYPE", protocol);
        Ok(self)
    }

    /// Puts a test frame in data field 1. For PRBS `length_or_offset` is
    /// the optional PRBS length; for FLOW it is the optional offset and
    /// `flow_id` is required.
    pub fn test_frame(
        &mut self,
        kind: TestFrameType,
        length_or_offset: Option<u64>,
        flow_id: Option<u64>,
    ) -> Result<&mut Self> {
        const DFIELD: &str = "FRAMe:DFIeld1";
        match kind {
            TestFrameType::Prbs => {
                let length = length_or_offset
                    .map(|l| validate_range("prbs_length", 46, 65_517, l))
                    .transpose()?;
                self.set(Scope::Frame, &format!("{DFIELD}:ENABle"), 1);
                self.set(Scope::Frame, &format!("{DFIELD}:TYPE"), "TEST_FRAME");
                self.set(Scope::Frame, &format!("{DFIELD}:TFRame:TYPE"), kind);
                self.expect(Scope::Frame, &format!("{ITEM}:{DFIELD}:ITFRame"), 1);
                if let Some(length) = length {
                    self.set(Scope::Frame, &format!("{DFIELD}:LENGth"), length);
                }
            }
            TestFrameType::Flow => {
                let offset = length_or_offset
                    .map(|o| validate_range("flow_offset", 28, 65_499, o))
                    .transpose()?;
                let flow_id = validate_range("flow_id", 0, 65_535, require("flow_id", flow_id)?)?;
                self.set(Scope::Frame, &format!("{DFIELD}:ENABle"), 1);
                self.set(Scope::Frame, &format!("{DFIELD}:TYPE"), "TEST_FRAME");
                self.set(Scope::Frame, &format!("{DFIELD}:TFRame:TYPE"), "FLOW_ID");
                self.set(Scope::Frame, &format!("{DFIELD}:TFRame:FID"), flow_id);
                if let Some(offset) = offset {
                    self.set(Scope::Frame, &format!("{DFIELD}:OFFSet"), offset);
                }
            }
        }
        Ok(self)
    }

    /// Call after `test_frame` when inserting PRBS_BIT errors.
    pub fn ethernet_error(&mut self, error: EthernetError) -> Result<&mut Self> {
        self.set(Scope::Frame, "ERRor:ETHernet:TYPE", error);
        Ok(self)
    }

    pub fn ipv4_error(&mut self, error: Ipv4Error) -> Result<&mut Self> {
        self.set(Scope::Frame, "ERRor:IP:TYPE", error);
        Ok(self)
    }

    /// MACs are dash-separated, IPs plain or CIDR; both are converted.
    pub fn arp(
        &mut self,
        operation: ArpOperation,
        sender_mac: &str,
        sender_ip: &str,
        target_mac: &str,
        target_ip: &str,
    ) -> Result<&mut Self> {
        let sender_mac = mac_to_hex(sender_mac, Some(&self.config.address))?;
        let target_mac = mac_to_hex(target_mac, Some(&self.config.address))?;
        let (sender_ip, _) = ip_to_hex(sender_ip)?;
        let (target_ip, _) = ip_to_hex(target_ip)?;

        self.set(Scope::Frame, "PROTocol:ARP:OPERation", operation.code());
        self.set(Scope::Frame, "PROTocol:ARP:SMADdress", sender_mac);
        self.set(Scope::Frame, "PROTocol:ARP:SIADdress", sender_ip);
        self.set(Scope::Frame, "PROTocol:ARP:TIADdress", target_ip);
        self.set(Scope::Frame, "PROTocol:ARP:TMADdress", target_mac);
        Ok(self)
    }

    fn ip_address(
        &mut self,
        family: &'static str,
        field: &str,
        cidr: &str,
        kind: AddressType,
    ) -> Result<&mut Self> {
        let want_v4 = family == "IP";
        if is_ipv4(cidr) != want_v4 {
            return Err(ValidationError::Malformed {
                field: if want_v4 { "ipv4 address" } else { "ipv6 address" },
                value: cidr.to_string(),
                reason: "wrong address family".into(),
            }
            .into());
        }
        let (address, mask) = ip_to_hex(cidr)?;
        self.set(Scope::Frame, &format!("PROTocol:{family}:{field}:TYPE"), kind);
        self.set(Scope::Frame, &format!("PROTocol:{family}:{field}:VALue"), address);
        self.set(Scope::Frame, &format!("PROTocol:{family}:{field}:MASK"), mask);
        Ok(self)
    }

    /// `cidr` like `127.0.0.1/24`.
    pub fn ipv4_source_address(&mut self, cidr: &str, kind: AddressType) -> Result<&mut Self> {
        self.ip_address("IP", "SA", cidr, kind)
    }

    pub fn ipv4_destination_address(&mut self, cidr: &str, kind: AddressType) -> Result<&mut Self> {
        self.ip_address("IP", "DA", cidr, kind)
    }

    /// `cidr` like `1:2:3:4:5:6:7:8/64`.
    pub fn ipv6_source_address(&mut self, cidr: &str, kind: AddressType) -> Result<&mut Self> {
        self.ip_address("IPv6", "SA", cidr, kind)
    }

    pub fn ipv6_destination_address(&mut self, cidr: &str, kind: AddressType) -> Result<&mut Self> {
        self.ip_address("IPv6", "DA", cidr, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnritsuError;

    fn builder() -> StreamBuilder {
        StreamBuilder::new(1, &DeviceAddress::new("1", "1", "2"), DeviceType::Md1230b)
    }

    #[test]
    fn new_stream_adds_table_row_and_selection() {
        let cfg = builder().build();
        assert_eq!(
            cfg.commands(),
            &[":TSTReam:TABLe:ADD\n", ":TSTReam:TABLe:ID 1\n"]
        );
        assert_eq!(
            cfg.stream_queries().get(":TSTReam:TABLe:ID?\n").map(String::as_str),
            Some("1\n")
        );
        assert_eq!(
            cfg.port_commands(),
            &[":UENTry:ID 1\n", ":MODule:ID 1\n", ":PORT:ID 2\n"]
        );
        assert_eq!(
            cfg.port_queries()[2],
            (":PORT:ID?\n".to_string(), "2\n".to_string())
        );
        assert!(cfg.frame_queries().is_empty());
    }

    #[test]
    fn jump_branches_take_only_their_parameters() {
        let mut b = builder();
        b.distribution(Distribution::Next, Some(9), Some(9)).unwrap();
        let cfg = b.clone().build();
        assert!(!cfg.commands().iter().any(|c| c.contains("JTID")));

        b.distribution(Distribution::Jump, Some(3), Some(999_999_999)).unwrap();
        let cfg = b.clone().build();
        assert!(cfg.commands().contains(&":TSTReam:TABLe:ITEM:CONTrol:JTID 3\n".to_string()));
        assert!(!cfg.commands().iter().any(|c| c.contains("COUNt")));

        b.distribution(Distribution::JumpStop, Some(3), Some(10)).unwrap();
        let cfg = b.build();
        assert_eq!(
            cfg.stream_queries()
                .get(":TSTReam:TABLe:ITEM:CONTrol:COUNt?\n")
                .map(String::as_str),
            Some("10\n")
        );
    }

    #[test]
    fn invalid_input_leaves_builder_untouched() {
        let mut b = builder();
        let before = b.clone().build().commands().len();
        let err = b.distribution(Distribution::Jump, None, None).unwrap_err();
        assert!(matches!(
            err,
            AnritsuError::Validation(ValidationError::Missing("jump_to_id"))
        ));
        assert!(b.distribution(Distribution::JumpCount, Some(1), Some(0)).is_err());
        assert!(b.inter_burst_gap(0).is_err());
        assert!(b.frame_size(FrameSizeType::Fixed, Some(7), None).is_err());
        assert!(b.frame_size(FrameSizeType::Random, Some(64), None).is_err());
        assert!(b.test_frame(TestFrameType::Flow, Some(28), None).is_err());
        assert!(b.test_frame(TestFrameType::Prbs, Some(45), None).is_err());
        assert_eq!(b.build().commands().len(), before);
    }

    #[test]
    fn random_gap_reads_minimum_back_through_value() {
        let mut b = builder();
        b.inter_frame_gap(GapType::Random, 10, Some(20)).unwrap();
        let cfg = b.build();
        let tail: Vec<&str> = cfg.commands()[2..].iter().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                ":TSTReam:TABLe:ITEM:CONTrol:GAP:IFG:TYPE RANDOM\n",
                ":TSTReam:TABLe:ITEM:CONTrol:GAP:IFG:MINimum 10\n",
                ":TSTReam:TABLe:ITEM:CONTrol:GAP:IFG:MAXimum 20\n",
            ]
        );
        let q = cfg.stream_queries();
        assert_eq!(q[":TSTReam:TABLe:ITEM:CONTrol:GAP:IFG:VALue?\n"], "10\n");
        assert_eq!(q[":TSTReam:TABLe:ITEM:CONTrol:GAP:IFG:MAXimum?\n"], "20\n");
    }

    #[test]
    fn frame_fields_go_to_frame_queries() {
        let mut b = builder();
        b.frames_per_burst(1000)
            .unwrap()
            .frame_size(FrameSizeType::Fixed, Some(64), None)
            .unwrap()
            .frame_source_address("#H000101020000", FULL_MAC_MASK, AddressType::Static)
            .unwrap()
            .protocol(Protocol::Ipv4)
            .unwrap()
            .ipv4_source_address("127.0.0.1/24", AddressType::Static)
            .unwrap();
        let cfg = b.build();

        assert!(cfg.stream_queries().contains_key(":TSTReam:TABLe:ITEM:CONTrol:FPBurst?\n"));
        assert!(cfg.stream_queries().contains_key(":TSTReam:TABLe:ITEM:FSIZe:VALue?\n"));
        let f = cfg.frame_queries();
        assert_eq!(f[":TSTReam:TABLe:ITEM:FRAMe:ETHernet:SA:VALue?\n"], "#H000101020000\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:FRAMe:ETHernet:SA:MASK?\n"], "#HFFFFFFFFFFFF\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:PROTocol:TYPE?\n"], "IPV4\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:PROTocol:IP:SA:VALue?\n"], "#H7F000001\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:PROTocol:IP:SA:MASK?\n"], "#HFFFFFF00\n");
        assert!(!cfg.stream_queries().keys().any(|q| q.contains("PROTocol")));
    }

    #[test]
    fn mac_address_is_taken_as_given() {
        let mut b = builder();
        b.frame_destination_address("#HDEADBEEF0001", "00-00-00-FF-FF-FF", AddressType::Random)
            .unwrap();
        let cfg = b.build();
        assert!(cfg
            .commands()
            .contains(&":TSTReam:TABLe:ITEM:FRAMe:ETHernet:DA:VALue #HDEADBEEF0001\n".to_string()));
        assert!(cfg
            .commands()
            .contains(&":TSTReam:TABLe:ITEM:FRAMe:ETHernet:DA:MASK #H000000FFFFFF\n".to_string()));
    }

    #[test]
    fn prbs_test_frame_expects_implied_flag() {
        let mut b = builder();
        b.test_frame(TestFrameType::Prbs, Some(46), None).unwrap();
        let cfg = b.build();
        let f = cfg.frame_queries();
        assert_eq!(f[":TSTReam:TABLe:ITEM:FRAMe:DFIeld1:ITFRame?\n"], "1\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:FRAMe:DFIeld1:LENGth?\n"], "46\n");
        assert_eq!(f.len(), 5);
        assert_eq!(cfg.commands().len(), 2 + 4);
    }

    #[test]
    fn arp_uses_operation_code() {
        let mut b = builder();
        b.arp(
            ArpOperation::ArpReply,
            "00-DE-BB-00-00-01",
            "192.168.1.3",
            "00-01",
            "192.168.1.4/24",
        )
        .unwrap();
        let cfg = b.build();
        let f = cfg.frame_queries();
        assert_eq!(f[":TSTReam:TABLe:ITEM:PROTocol:ARP:OPERation?\n"], "2\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:PROTocol:ARP:SIADdress?\n"], "#HC0A80103\n");
        assert_eq!(f[":TSTReam:TABLe:ITEM:PROTocol:ARP:TMADdress?\n"], "#H000101020001\n");
    }

    #[test]
    fn address_family_is_checked() {
        let mut b = builder();
        assert!(b.ipv4_source_address("::1/128", AddressType::Static).is_err());
        assert!(b.ipv6_destination_address("10.0.0.1/8", AddressType::Static).is_err());
        b.ipv6_destination_address("1:2:3:4:5:6:7:8/64", AddressType::Increment)
            .unwrap();
        let cfg = b.build();
        assert_eq!(
            cfg.frame_queries()[":TSTReam:TABLe:ITEM:PROTocol:IPv6:DA:TYPE?\n"],
            "INCREMENT\n"
        );
    }
}
