use crate::error::ValidationError;
use crate::validate::validate_enum;

/// Commands without a read-back. Field settings with a verified echo are
/// built by the stream builder from `parser::write_line`/`query_line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    // ---- Selection ----
    SelectUnit(String),
    SelectModule(String),
    SelectPort(String),

    // ---- Port lifecycle ----
    PortDefault,
    OwnershipClear,
    OwnershipTake,

    // ---- Counters ----
    CounterClear,
    CounterStart,
    CounterStop,

    // ---- Stream table ----
    TableClearAll,
    TableAdd,
    TableId(u32),
    TableWrite,

    // ---- Run state ----
    StreamStart,
    StreamStop,
    CaptureStart,
    CaptureStop,
}

/// Reply alphabet of `:TSTReam:STATe?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitState {
    Stopped,
    Running,
    Transition,
}

/// Declares a device enumeration: the Rust variants, their wire tokens,
/// and a `FromStr` that validates against the token list.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match validate_enum($field, Self::TOKENS, s)? {
                    $($token => Ok($name::$variant),)+
                    other => Err(ValidationError::NotInSet {
                        field: $field,
                        value: other.to_string(),
                        allowed: Self::TOKENS.join(", "),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// How the stream hands over to the next table entry when it ends.
    Distribution("distribution") {
        Cont => "CONT",
        ContBurst => "CONT_BURST",
        Stop => "STOP",
        Next => "NEXT",
        Jump => "JUMP",
        JumpCount => "JUMP_COUNT",
        JumpStop => "JUMP_STOP",
    }
}

wire_enum! {
    GapType("inter_frame_gap_type") {
        Fixed => "FIXED",
        Random => "RANDOM",
    }
}

wire_enum! {
    FrameSizeType("frame_size_type") {
        Auto => "AUTO",
        Fixed => "FIXED",
        Increment => "INCREMENT",
        Random => "RANDOM",
    }
}

wire_enum! {
    AddressType("address_type") {
        Gateway => "GATEWAY",
        Static => "STATIC",
        Increment => "INCREMENT",
        Decrement => "DECREMENT",
        Random => "RANDOM",
    }
}

wire_enum! {
    Protocol("protocol") {
        None => "NONE",
        Arp => "ARP",
        Ipv4 => "IPV4",
        Igmp => "IGMP",
        Igap => "IGAP",
        Icmp => "ICMP",
        Tcp => "TCP",
        Udp => "UDP",
        Rip => "RIP",
        Dhcp => "DHCP",
        Ipv6 => "IPV6",
        Icmp6 => "ICMP6",
        TcpIpv6 => "TCP_IPV6",
        UdpIpv6 => "UDP_IPV6",
        Tunnel => "TUNNEL",
        Icmp6Tunnel => "ICMP6_TUNNEL",
        TcpTunnel => "TCP_TUNNEL",
        UdpTunnel => "UDP_TUNNEL",
        Tunnel6 => "TUNNEL6",
        TcpTunnel6 => "TCP_TUNNEL6",
        UdpTunnel6 => "UDP_TUNNEL6",
        Ipx => "IPX",
        IsIs => "IS_IS",
        MacControl => "MAC_CONTROL",
        Ethernet => "ETHERNET",
        LexControl => "LEX_CONTROL",
        Bpdu => "BPDU",
        Lacp => "LACP",
    }
}

wire_enum! {
    TestFrameType("test_frame_type") {
        Prbs => "PRBS",
        Flow => "FLOW",
    }
}

wire_enum! {
    EthernetError("ethernet_error") {
        Fcs => "FCS",
        Undersize => "UNDERSIZE",
        Oversize => "OVERSIZE",
        OversizeFcs => "OVERSIZE_FCS",
        PrbsBit => "PRBS_BIT",
    }
}

wire_enum! {
    Ipv4Error("ipv4_error") {
        Checksum => "CHECKSUM",
    }
}

wire_enum! {
    /// RFC 826 / RFC 903 operation, written to the device as its opcode.
    ArpOperation("arp_type") {
        ArpRequest => "ARP request",
        ArpReply => "ARP reply",
        RarpRequest => "RARP request",
        RarpReply => "RARP reply",
    }
}

impl ArpOperation {
    pub fn code(self) -> u8 {
        match self {
            ArpOperation::ArpRequest => 1,
            ArpOperation::ArpReply => 2,
            ArpOperation::RarpRequest => 3,
            ArpOperation::RarpReply => 4,
        }
    }
}

wire_enum! {
    /// `CONT` stops a continuous stream after a fixed time, `STOP` waits
    /// for the stream to finish by itself.
    WaitMode("wait_mode") {
        Cont => "CONT",
        Stop => "STOP",
    }
}
