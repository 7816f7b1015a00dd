// src/proto/parser.rs
use std::fmt::Display;

use thiserror::Error;

use super::command::{DeviceCommand, TransmitState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty reply")]
    Empty,
    #[error("missing ',' in counter reply")]
    MissingSeparator,
    #[error("invalid integer: {0}")]
    BadInt(String),
    #[error("unknown transmit state: {0}")]
    UnknownState(String),
}

/// `:<PATH> <value>\n`
pub fn write_line(path: &str, value: impl Display) -> String {
    format!(":{path} {value}\n")
}

/// `:<PATH>?\n`
pub fn query_line(path: &str) -> String {
    format!(":{path}?\n")
}

/// `:<PATH>\n`, a command without a value.
pub fn action_line(path: &str) -> String {
    format!(":{path}\n")
}

/// The analyzer echoes a set value verbatim on its own line.
pub fn expected_reply(value: impl Display) -> String {
    format!("{value}\n")
}

/// Public API: serialize a command to a newline-terminated line.
pub fn format_command(cmd: &DeviceCommand) -> String {
    use DeviceCommand::*;
    match cmd {
        // ---- Selection
        SelectUnit(unit) => write_line("UENTry:ID", unit),
        SelectModule(module) => write_line("MODule:ID", module),
        SelectPort(port) => write_line("PORT:ID", port),

        // ---- Port lifecycle
        PortDefault => action_line("PORT:DEFault"),
        OwnershipClear => action_line("PORT:OWNership:CLEar"),
        OwnershipTake => action_line("PORT:OWNership:TAKE"),

        // ---- Counters
        CounterClear => action_line("COUNter:CLEar"),
        CounterStart => action_line("COUNter:STARt"),
        CounterStop => action_line("COUNter:STOP"),

        // ---- Stream table
        TableClearAll => action_line("TSTReam:TABLe:ACLear"),
        TableAdd => action_line("TSTReam:TABLe:ADD"),
        TableId(id) => write_line("TSTReam:TABLe:ID", id),
        TableWrite => action_line("TSTReam:TABLe:WRITe"),

        // ---- Run state
        StreamStart => action_line("TSTReam:STARt"),
        StreamStop => action_line("TSTReam:STOP"),
        CaptureStart => action_line("CAPTure:STARt"),
        CaptureStop => action_line("CAPTure:STOP"),
    }
}

/// Query paths for the selection triple, in selection order.
pub const SELECT_PATHS: [&str; 3] = ["UENTry:ID", "MODule:ID", "PORT:ID"];

pub fn transmit_state_query() -> String {
    query_line("TSTReam:STATe")
}

/// Counter replies are `<index>,<value>`; only the value is meaningful.
pub fn parse_counter_reply(reply: &str) -> Result<u64, ParseError> {
    let s = reply.trim_matches(|c| c == '\r' || c == '\n' || c == ' ');
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    let (_, value) = s.split_once(',').ok_or(ParseError::MissingSeparator)?;
    let value = value.trim();
    value
        .parse::<u64>()
        .map_err(|_| ParseError::BadInt(value.to_string()))
}

pub fn parse_transmit_state(reply: &str) -> Result<TransmitState, ParseError> {
    match reply {
        "0\n" => Ok(TransmitState::Stopped),
        "1\n" => Ok(TransmitState::Running),
        "2\n" => Ok(TransmitState::Transition),
        "" => Err(ParseError::Empty),
        other => Err(ParseError::UnknownState(other.escape_debug().to_string())),
    }
}

/* ---------- tests ---------- */
