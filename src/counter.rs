//! Port counters: single named counters, fixed counter groups, and the
//! two-port table a group read produces.

use std::fmt;
use std::str::FromStr;

use crate::error::{AnritsuError, Result, ValidationError};
use crate::port::DeviceAddress;
use crate::session::DeviceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    TxFrames,
    RxFrames,
    TxTestFrames,
    RxTestFrames,
    Bip,
}

impl Counter {
    pub const NAMES: &'static [&'static str] =
        &["txframes", "rxframes", "txtestframes", "rxtestframes", "BIP"];

    pub fn name(self) -> &'static str {
        match self {
            Counter::TxFrames => "txframes",
            Counter::RxFrames => "rxframes",
            Counter::TxTestFrames => "txtestframes",
            Counter::RxTestFrames => "rxtestframes",
            Counter::Bip => "BIP",
        }
    }

    /// The query line for this counter on `device`. Fails before any I/O
    /// when the device has no such counter.
    pub fn query(self, device: DeviceType) -> Result<&'static str> {
        Ok(match self {
            Counter::TxFrames => ":COUNter:TRANsmitted:FRAMes?\n",
            Counter::RxFrames => ":COUNter:RECeived:FRAMes?\n",
            Counter::TxTestFrames => ":COUNter:TRANsmitted:TFRames?\n",
            Counter::RxTestFrames => ":COUNter:RECeived:TFRames?\n",
            Counter::Bip => {
                if device == DeviceType::Md1230b {
                    return Err(AnritsuError::Unsupported {
                        feature: self.name().to_string(),
                        device,
                    });
                }
                ":COUNter:SON:ERRor:BIP2?\n"
            }
        })
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Counter {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "txframes" => Ok(Counter::TxFrames),
            "rxframes" => Ok(Counter::RxFrames),
            "txtestframes" => Ok(Counter::TxTestFrames),
            "rxtestframes" => Ok(Counter::RxTestFrames),
            b if b.eq_ignore_ascii_case("bip") => Ok(Counter::Bip),
            "" => Err(ValidationError::Missing("counter name")),
            other => Err(ValidationError::NotInSet {
                field: "counter",
                value: other.to_string(),
                allowed: Self::NAMES.join(", "),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterGroup {
    Base,
    Test,
    TestAndIpv4,
    Arp,
    Ipv4,
    Ipv6,
}

const BASE: &[(&str, &str)] = &[
    (":COUNter:TRANsmitted:BYTEs?\n", "Transmitted bytes"),
    (":COUNter:RECeived:BYTEs?\n", "Received bytes"),
    (":COUNter:TRANsmitted:FRAMes?\n", "Transmitted frames"),
    (":COUNter:TRANsmitted:FRAMes:FPS?\n", "Transmitted frames per second"),
    (":COUNter:RECeived:FRAMes?\n", "Received frames"),
    (":COUNter:RECeived:FRAMes:FPS?\n", "Received frames per second"),
    (":COUNter:ERRor:FCS?\n", "FCS errors"),
    (":COUNter:ERRor:OVERsize?\n", "Oversized errors"),
    (":COUNter:ERRor:OAFerror?\n", "Oversized with FCS errors"),
    (":COUNter:ERRor:UNDersize?\n", "Undersized errors"),
];

const TEST_FRAMES: &[(&str, &str)] = &[
    (":COUNter:TRANsmitted:TFRames?\n", "Transmitted test frame"),
    (":COUNter:RECeived:TFRames?\n", "Received test frame"),
];

const PRBS: &[(&str, &str)] = &[
    (":COUNter:ERRor:SEQuence?\n", "Sequence error"),
    (":COUNter:ERRor:PRBS:BIT?\n", "PRBS bit error count"),
    (":COUNter:ERRor:PRBS:FRAMes?\n", "PRBS frame error count"),
];

const IPV4: &[(&str, &str)] = &[
    (":COUNter:IP:ERRor:CHECksum?\n", "IPv4 header checksum error"),
    (":COUNter:IP:RECeived:PACKets?\n", "IPv4 received packets"),
    (":COUNter:IP:RECeived:PACKets:PPS?\n", "IPv4 received packets per second"),
    (":COUNter:IP:TRANsmitted:PACKets?\n", "IPv4 transmitted packets"),
    (":COUNter:IP:TRANsmitted:PACKets:PPS?\n", "IPv4 transmitted packets per second"),
];

const IPV6: &[(&str, &str)] = &[
    (":COUNter:IPV6:RECeived:PACKets?\n", "IPv6 received packets"),
    (":COUNter:IPV6:RECeived:PACKets:PPS?\n", "IPv6 received packets per second"),
    (":COUNter:IPV6:TRANsmitted:PACKets?\n", "IPv6 transmitted packets"),
    (":COUNter:IPV6:TRANsmitted:PACKets:PPS?\n", "IPv6 transmitted packets per second"),
];

const ARP: &[(&str, &str)] = &[
    (":COUNter:ARP:RECeived:AREQuest?\n", "Received ARP request"),
    (":COUNter:ARP:RECeived:AREPly?\n", "Received ARP reply"),
    (":COUNter:ARP:TRANsmitted:AREPly?\n", "Transmitted ARP reply"),
    (":COUNter:ARP:TRANsmitted:AREQuest?\n", "Transmitted ARP request"),
];

impl CounterGroup {
    pub const NAMES: &'static [&'static str] =
        &["base", "test", "test_and_IPV4", "ARP", "IPV4", "IPV6"];

    pub fn name(self) -> &'static str {
        match self {
            CounterGroup::Base => "base",
            CounterGroup::Test => "test",
            CounterGroup::TestAndIpv4 => "test_and_IPV4",
            CounterGroup::Arp => "ARP",
            CounterGroup::Ipv4 => "IPV4",
            CounterGroup::Ipv6 => "IPV6",
        }
    }

    /// (query, description) pairs sorted by query line. The base set is
    /// always included.
    pub fn entries(self, device: DeviceType) -> Result<Vec<(&'static str, &'static str)>> {
        let extra: &[&[(&str, &str)]] = match self {
            CounterGroup::Base => &[],
            CounterGroup::Test => &[TEST_FRAMES, PRBS],
            CounterGroup::TestAndIpv4 => &[PRBS, IPV4],
            CounterGroup::Arp if device == DeviceType::Md1260a => {
                return Err(AnritsuError::Unsupported {
                    feature: self.name().to_string(),
                    device,
                });
            }
            CounterGroup::Arp => &[ARP],
            CounterGroup::Ipv4 => &[IPV4],
            CounterGroup::Ipv6 => &[IPV6],
        };
        let mut entries: Vec<_> = BASE
            .iter()
            .chain(extra.iter().flat_map(|set| set.iter()))
            .copied()
            .collect();
        entries.sort_unstable_by_key(|(query, _)| *query);
        entries.dedup_by_key(|(query, _)| *query);
        Ok(entries)
    }
}

impl fmt::Display for CounterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CounterGroup {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let group = match s.trim() {
            "base" => CounterGroup::Base,
            "test" => CounterGroup::Test,
            "test_and_IPV4" => CounterGroup::TestAndIpv4,
            "ARP" => CounterGroup::Arp,
            "IPV4" => CounterGroup::Ipv4,
            "IPV6" => CounterGroup::Ipv6,
            other => {
                return Err(ValidationError::NotInSet {
                    field: "counter_group",
                    value: other.to_string(),
                    allowed: Self::NAMES.join(", "),
                });
            }
        };
        Ok(group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterReading {
    pub name: String,
    pub value: u64,
}

/// One counter group read from two ports. Rows keep the query order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterGroupTable {
    pub group: CounterGroup,
    pub ports: [DeviceAddress; 2],
    pub rows: Vec<(String, u64, u64)>,
}

impl CounterGroupTable {
    pub fn value(&self, description: &str) -> Option<(u64, u64)> {
        self.rows
            .iter()
            .find(|(d, _, _)| d == description)
            .map(|(_, a, b)| (*a, *b))
    }

    /// Readings of one side, `0` for the first port and `1` for the second.
    pub fn readings(&self, side: usize) -> Vec<CounterReading> {
        self.rows
            .iter()
            .map(|(name, a, b)| CounterReading {
                name: name.clone(),
                value: if side == 0 { *a } else { *b },
            })
            .collect()
    }
}

impl fmt::Display for CounterGroupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = [
            "Counter".to_string(),
            format!("Int {}", self.ports[0]),
            format!("Int {}", self.ports[1]),
        ];
        let body: Vec<[String; 3]> = self
            .rows
            .iter()
            .map(|(d, a, b)| [d.clone(), a.to_string(), b.to_string()])
            .collect();

        let mut widths = header.each_ref().map(String::len);
        for row in &body {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        let rule = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        writeln!(f, "+{rule}+")?;
        write_row(f, &header, &widths)?;
        writeln!(f, "+{}+", rule.replace('-', "="))?;
        for row in &body {
            write_row(f, row, &widths)?;
        }
        write_row(f, &header, &widths)?;
        write!(f, "+{rule}+")
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 3], widths: &[usize; 3]) -> fmt::Result {
    writeln!(
        f,
        "| {:<w0$} | {:>w1$} | {:>w2$} |",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    )
}

/// `low <= value <= high`.
pub fn in_range(value: u64, low: u64, high: u64) -> bool {
    (low..=high).contains(&value)
}
