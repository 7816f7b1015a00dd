use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AnritsuError, Result, ValidationError};

/// TCP port the analyzer's remote-control service listens on.
pub const CONTROL_PORT: u16 = 5001;

/// One line-oriented link to the analyzer. Requests are written strictly
/// one after another; replies carry no request tag, so a reader must never
/// have more than one query outstanding.
pub trait Transport {
    /// Writes one line as its own socket write.
    fn send_line(&mut self, line: &str) -> Result<()>;

    /// Writes `data` with a single socket write.
    fn send_raw(&mut self, data: &str) -> Result<()>;

    /// Reads one reply line, newline included. `Ok(None)` means the active
    /// read timeout fired before a full line arrived.
    fn recv_reply(&mut self) -> Result<Option<String>>;

    fn set_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Best effort; never fails.
    fn close(&mut self);

    fn send_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.send_line(line)?;
        }
        Ok(())
    }

    /// All lines in one write.
    fn send_batch(&mut self, lines: &[String]) -> Result<()> {
        self.send_raw(&lines.concat())
    }

    /// Sends one query and waits for its reply.
    fn query(&mut self, line: &str) -> Result<String> {
        self.send_line(line)?;
        self.recv_reply()?.ok_or_else(|| AnritsuError::Timeout {
            command: line.to_string(),
        })
    }

    /// Sends each line and reads one reply after each. Only the last reply
    /// is returned; call once per line when every reply matters.
    fn send_and_receive(&mut self, lines: &[String]) -> Result<String> {
        let mut last = None;
        for line in lines {
            last = Some(self.query(line)?);
        }
        last.ok_or_else(|| ValidationError::Missing("lines to send").into())
    }
}

/// Timing for the post-connect drain of stale replies.
#[derive(Debug, Clone, Copy)]
pub struct DrainPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub steady_timeout: Duration,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            attempt_timeout: Duration::from_secs(5),
            steady_timeout: Duration::from_secs(20),
        }
    }
}

/// Reads and discards replies left over from an earlier session. Every
/// read counts against the budget whether it returned a line or timed out.
/// Afterwards the steady-state timeout is restored. Returns the number of
/// stale replies seen.
pub fn drain_stale<T: Transport + ?Sized>(transport: &mut T, policy: &DrainPolicy) -> Result<u32> {
    let mut stale = 0;
    for attempt in 0..policy.max_attempts {
        transport.set_timeout(policy.attempt_timeout)?;
        match transport.recv_reply()? {
            Some(line) => {
                stale += 1;
                warn!(attempt, reply = %line.escape_debug(), "discarded stale reply");
            }
            None => debug!(attempt, "no stale reply"),
        }
    }
    transport.set_timeout(policy.steady_timeout)?;
    Ok(stale)
}

pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    peer: SocketAddr,
    // Bytes of a reply whose newline has not arrived yet.
    pending: Vec<u8>,
}

impl TcpTransport {
    pub fn connect(host: &str, port: u16, connect_timeout: Option<Duration>) -> Result<Self> {
        let target = format!("{host}:{port}");
        let connect_err = |source| AnritsuError::Connect {
            addr: target.clone(),
            source,
        };

        let stream = match connect_timeout {
            None => TcpStream::connect((host, port)).map_err(connect_err)?,
            Some(timeout) => {
                let mut last_err = std::io::Error::new(ErrorKind::NotFound, "no address resolved");
                let mut connected = None;
                for addr in (host, port).to_socket_addrs().map_err(connect_err)? {
                    match TcpStream::connect_timeout(&addr, timeout) {
                        Ok(s) => {
                            connected = Some(s);
                            break;
                        }
                        Err(e) => last_err = e,
                    }
                }
                connected.ok_or_else(|| connect_err(last_err))?
            }
        };

        let _ = stream.set_nodelay(true);
        let peer = stream.peer_addr().map_err(AnritsuError::Connection)?;
        let reader = BufReader::new(stream.try_clone().map_err(AnritsuError::Connection)?);
        debug!(%peer, "connected");
        Ok(Self {
            reader,
            writer: stream,
            peer,
            pending: Vec::new(),
        })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for TcpTransport {
    fn send_line(&mut self, line: &str) -> Result<()> {
        debug!(line = %line.escape_debug(), ">>");
        self.writer
            .write_all(line.as_bytes())
            .map_err(AnritsuError::Connection)
    }

    fn send_raw(&mut self, data: &str) -> Result<()> {
        debug!(batch = %data.escape_debug(), ">>");
        self.writer
            .write_all(data.as_bytes())
            .map_err(AnritsuError::Connection)
    }

    fn recv_reply(&mut self) -> Result<Option<String>> {
        // Invalid UTF-8 is decoded lossily and left to the caller's compare.
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) => Err(AnritsuError::ConnectionClosed),
            Ok(_) if self.pending.last() != Some(&b'\n') => Err(AnritsuError::ConnectionClosed),
            Ok(_) => {
                let raw = std::mem::take(&mut self.pending);
                let line = String::from_utf8_lossy(&raw).into_owned();
                debug!(reply = %line.escape_debug(), "<<");
                Ok(Some(line))
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(AnritsuError::Connection(e)),
        }
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(ValidationError::OutOfRange {
                field: "timeout",
                value: 0,
                min: 1,
                max: u64::MAX,
            }
            .into());
        }
        self.writer
            .set_read_timeout(Some(timeout))
            .and_then(|_| self.writer.set_write_timeout(Some(timeout)))
            .map_err(AnritsuError::Connection)
    }

    fn close(&mut self) {
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}
