//! Port addressing, the command sets that drive a port's run state, and
//! the run-state model the session keeps per port.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::proto::command::DeviceCommand;
use crate::proto::parser::format_command;

/// A generator port: unit (chassis), module (card) and port number, all
/// carried as the decimal strings the wire format uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceAddress {
    pub unit: String,
    pub module: String,
    pub port: String,
}

impl DeviceAddress {
    pub fn new(unit: impl Into<String>, module: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            module: module.into(),
            port: port.into(),
        }
    }

    pub fn select_commands(&self) -> [DeviceCommand; 3] {
        [
            DeviceCommand::SelectUnit(self.unit.clone()),
            DeviceCommand::SelectModule(self.module.clone()),
            DeviceCommand::SelectPort(self.port.clone()),
        ]
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.unit, self.module, self.port)
    }
}

/// Parses `unit/module/port`, e.g. `1/1/2`.
impl FromStr for DeviceAddress {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        let numeric = |p: &&str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
        if parts.len() != 3 || !parts.iter().all(numeric) {
            return Err(ValidationError::Malformed {
                field: "port address",
                value: s.to_string(),
                reason: "expected unit/module/port".into(),
            });
        }
        Ok(DeviceAddress::new(parts[0], parts[1], parts[2]))
    }
}

fn lines(cmds: impl IntoIterator<Item = DeviceCommand>) -> Vec<String> {
    cmds.into_iter().map(|c| format_command(&c)).collect()
}

fn select_then(addr: &DeviceAddress, tail: &[DeviceCommand]) -> Vec<String> {
    lines(addr.select_commands().into_iter().chain(tail.iter().cloned()))
}

pub fn select(addr: &DeviceAddress) -> Vec<String> {
    lines(addr.select_commands())
}

/// Defaults the port, takes ownership, clears counters and the stream
/// table, and leaves counters stopped.
pub fn initialize(addr: &DeviceAddress) -> Vec<String> {
    use DeviceCommand::*;
    select_then(
        addr,
        &[
            PortDefault,
            OwnershipClear,
            OwnershipTake,
            CounterClear,
            TableClearAll,
            CounterStop,
        ],
    )
}

pub fn count(addr: &DeviceAddress) -> Vec<String> {
    select_then(addr, &[DeviceCommand::CounterStart])
}

pub fn transmit(addr: &DeviceAddress) -> Vec<String> {
    select_then(addr, &[DeviceCommand::StreamStart])
}

pub fn capture(addr: &DeviceAddress) -> Vec<String> {
    select_then(addr, &[DeviceCommand::CaptureStart])
}

pub fn stop_all(addr: &DeviceAddress) -> Vec<String> {
    use DeviceCommand::*;
    select_then(addr, &[CaptureStop, CounterStop, StreamStop])
}

pub fn stop_capture(addr: &DeviceAddress) -> Vec<String> {
    select_then(addr, &[DeviceCommand::CaptureStop])
}

pub fn stop_counter(addr: &DeviceAddress) -> Vec<String> {
    select_then(addr, &[DeviceCommand::CounterStop])
}

pub fn stop_stream(addr: &DeviceAddress) -> Vec<String> {
    select_then(addr, &[DeviceCommand::StreamStop])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Owned,
    Active,
    Stopped,
}

/// What the session last asked a port to do. Counting, transmitting and
/// capturing overlap independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortRunState {
    pub owned: bool,
    pub counting: bool,
    pub transmitting: bool,
    pub capturing: bool,
    stopped: bool,
}

impl PortRunState {
    pub fn phase(&self) -> RunPhase {
        if !self.owned {
            RunPhase::Idle
        } else if self.counting || self.transmitting || self.capturing {
            RunPhase::Active
        } else if self.stopped {
            RunPhase::Stopped
        } else {
            RunPhase::Owned
        }
    }

    pub fn initialized(&mut self) {
        *self = PortRunState {
            owned: true,
            ..Default::default()
        };
    }

    pub fn stop(&mut self, counting: bool, transmitting: bool, capturing: bool) {
        self.counting &= !counting;
        self.transmitting &= !transmitting;
        self.capturing &= !capturing;
        self.stopped = true;
    }
}
