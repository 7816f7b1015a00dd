//! Replays a built [`StreamConfig`] against the analyzer and verifies every
//! field by reading it back.
//!
//! Phases run strictly in order and the first failure aborts the rest:
//!
//! 1. port select: send the selection, read back unit, module and port;
//! 2. write: send the table row and `:TSTReam:TABLe:WRITe`;
//! 3. stream verify: read back every stream-level field;
//! 4. frame verify: read back every frame-level field.
//!
//! Nothing is rolled back on failure. Whatever was written before the
//! failing read-back stays on the device.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{AnritsuError, Result};
use crate::proto::command::DeviceCommand;
use crate::proto::parser::format_command;
use crate::stream::StreamConfig;
use crate::transport::Transport;

/// Queries sent per phase by a successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub port_checks: usize,
    pub stream_checks: usize,
    pub frame_checks: usize,
}

impl CommitReport {
    pub fn total(&self) -> usize {
        self.port_checks + self.stream_checks + self.frame_checks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mismatch {
    Command,
    Query,
}

fn verify<'a, T, I>(transport: &mut T, checks: I, kind: Mismatch) -> Result<usize>
where
    T: Transport + ?Sized,
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut count = 0;
    for (query, expected) in checks {
        let reply = transport.query(query)?;
        count += 1;
        if reply != *expected {
            warn!(
                query = %query.escape_debug(),
                expected = %expected.escape_debug(),
                reply = %reply.escape_debug(),
                "read-back mismatch"
            );
            let (command, sent, device) = (query.clone(), expected.clone(), reply);
            return Err(match kind {
                Mismatch::Command => AnritsuError::Command {
                    command,
                    sent,
                    device,
                },
                Mismatch::Query => AnritsuError::Query {
                    query: command,
                    sent,
                    device,
                },
            });
        }
    }
    Ok(count)
}

fn verify_map<T: Transport + ?Sized>(
    transport: &mut T,
    checks: &BTreeMap<String, String>,
) -> Result<usize> {
    verify(transport, checks.iter(), Mismatch::Query)
}

pub fn commit<T: Transport + ?Sized>(transport: &mut T, config: &StreamConfig) -> Result<CommitReport> {
    let mut report = CommitReport::default();

    transport.send_lines(config.port_commands())?;
    report.port_checks = verify(
        transport,
        config.port_queries().iter().map(|(q, e)| (q, e)),
        Mismatch::Command,
    )?;
    debug!(port = %config.address(), "port selected");

    let mut row = config.commands().to_vec();
    row.push(format_command(&DeviceCommand::TableWrite));
    transport.send_lines(&row)?;

    report.stream_checks = verify_map(transport, config.stream_queries())?;
    report.frame_checks = verify_map(transport, config.frame_queries())?;

    info!(
        stream = config.stream_id(),
        port = %config.address(),
        checks = report.total(),
        "stream committed"
    );
    Ok(report)
}
