//! One control connection to an analyzer and everything done over it.
//!
//! A [`Session`] owns its transport and issues requests strictly one at a
//! time. Operations take `&mut self`; to share a session between threads
//! wrap it in a `Mutex` so that a command and its read-back are never
//! interleaved with somebody else's.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::commit::{self, CommitReport};
use crate::counter::{Counter, CounterGroup, CounterGroupTable, in_range};
use crate::error::{AnritsuError, Result, ValidationError};
use crate::port::{self, DeviceAddress, PortRunState};
use crate::proto::command::{TransmitState, WaitMode};
use crate::proto::parser::{parse_counter_reply, parse_transmit_state, transmit_state_query};
use crate::stream::{StreamBuilder, StreamConfig};
use crate::transport::{CONTROL_PORT, DrainPolicy, TcpTransport, Transport, drain_stale};

/// Analyzer generation. The two differ in which counters they implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Md1230b,
    Md1260a,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Md1230b => "md1230b",
            DeviceType::Md1260a => "md1260a",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("md1230b") {
            Ok(DeviceType::Md1230b)
        } else if s.eq_ignore_ascii_case("md1260a") {
            Ok(DeviceType::Md1260a)
        } else {
            Err(ValidationError::NotInSet {
                field: "device",
                value: s.to_string(),
                allowed: "md1230b, md1260a".into(),
            })
        }
    }
}

/// Timing of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub control_port: u16,
    /// Reads spent discarding stale replies right after connecting.
    pub drain_attempts: u32,
    pub drain_timeout: Duration,
    /// Read timeout for every request after the drain.
    pub steady_timeout: Duration,
    /// Delay between transmit-state polls while waiting for a stream.
    pub poll_interval: Duration,
    pub connect_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let drain = DrainPolicy::default();
        Self {
            control_port: CONTROL_PORT,
            drain_attempts: drain.max_attempts,
            drain_timeout: drain.attempt_timeout,
            steady_timeout: drain.steady_timeout,
            poll_interval: Duration::from_secs(1),
            connect_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Socket timeouts must be non-zero; a zero read timeout is refused by
    /// the OS rather than meaning "no wait".
    pub fn validate(&self) -> Result<(), ValidationError> {
        let timeouts = [
            ("steady_timeout", Some(self.steady_timeout)),
            ("drain_timeout", Some(self.drain_timeout)),
            ("connect_timeout", self.connect_timeout),
        ];
        for (field, timeout) in timeouts {
            if timeout == Some(Duration::ZERO) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value: 0,
                    min: 1,
                    max: u64::MAX,
                });
            }
        }
        Ok(())
    }

    pub fn drain_policy(&self) -> DrainPolicy {
        DrainPolicy {
            max_attempts: self.drain_attempts,
            attempt_timeout: self.drain_timeout,
            steady_timeout: self.steady_timeout,
        }
    }
}

pub struct Session<T: Transport = TcpTransport> {
    // None once disconnected.
    transport: Option<T>,
    device: DeviceType,
    config: SessionConfig,
    ports: BTreeMap<DeviceAddress, PortRunState>,
    last_error: Option<String>,
}

impl Session<TcpTransport> {
    /// Connects to `host` on the control port and drains stale replies.
    pub fn connect(host: &str, device: DeviceType, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let transport = TcpTransport::connect(host, config.control_port, config.connect_timeout)?;
        info!(peer = %transport.peer(), %device, "analyzer connected");
        Self::from_transport(transport, device, config)
    }
}

impl<T: Transport> Session<T> {
    /// Starts a session over an already open transport. The drain runs
    /// here as it does for [`Session::connect`].
    pub fn from_transport(mut transport: T, device: DeviceType, config: SessionConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            transport.close();
            return Err(e.into());
        }
        let stale = match drain_stale(&mut transport, &config.drain_policy()) {
            Ok(n) => n,
            Err(e) => {
                transport.close();
                return Err(e);
            }
        };
        if stale > 0 {
            warn!(stale, "analyzer had replies from an earlier session");
        }
        Ok(Self {
            transport: Some(transport),
            device,
            config,
            ports: BTreeMap::new(),
            last_error: None,
        })
    }

    pub fn device(&self) -> DeviceType {
        self.device
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Message of the last failed operation, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Runs `op` on the transport. Records a failure, and closes the
    /// session when the failure is a lost connection.
    fn io<R>(&mut self, op: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let transport = self.transport.as_mut().ok_or(AnritsuError::NotConnected)?;
        let result = op(transport);
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
            if e.is_fatal() {
                warn!(error = %e, "connection lost, closing session");
                self.disconnect();
            }
        }
        result
    }

    fn reject<R>(&mut self, err: AnritsuError) -> Result<R> {
        self.last_error = Some(err.to_string());
        Err(err)
    }

    fn state_mut(&mut self, addr: &DeviceAddress) -> &mut PortRunState {
        self.ports.entry(addr.clone()).or_default()
    }

    // ---- Streams ----

    pub fn stream(&self, stream_id: u32, addr: &DeviceAddress) -> StreamBuilder {
        StreamBuilder::new(stream_id, addr, self.device)
    }

    pub fn commit(&mut self, config: &StreamConfig) -> Result<CommitReport> {
        if config.device() != self.device {
            warn!(
                stream = config.stream_id(),
                built_for = %config.device(),
                device = %self.device,
                "stream built for another device type"
            );
        }
        self.io(|t| commit::commit(t, config))
    }

    // ---- Port lifecycle ----

    pub fn initialize_and_own(&mut self, addr: &DeviceAddress) -> Result<()> {
        let lines = port::initialize(addr);
        self.io(|t| t.send_lines(&lines))?;
        self.state_mut(addr).initialized();
        info!(port = %addr, "port initialized and owned");
        Ok(())
    }

    pub fn start_count(&mut self, a: &DeviceAddress, b: &DeviceAddress) -> Result<()> {
        let lines = [port::count(a), port::count(b)].concat();
        self.io(|t| t.send_lines(&lines))?;
        for addr in [a, b] {
            self.state_mut(addr).counting = true;
        }
        Ok(())
    }

    pub fn start_transmit(&mut self, a: &DeviceAddress, b: &DeviceAddress) -> Result<()> {
        let lines = [port::transmit(a), port::transmit(b)].concat();
        self.io(|t| t.send_lines(&lines))?;
        for addr in [a, b] {
            self.state_mut(addr).transmitting = true;
        }
        Ok(())
    }

    /// Starts counters on both ports and then streams on both ports, all
    /// in one socket write so the ports start as close together as
    /// possible.
    pub fn start_count_and_transmit(&mut self, a: &DeviceAddress, b: &DeviceAddress) -> Result<()> {
        let lines = [port::count(a), port::count(b), port::transmit(a), port::transmit(b)].concat();
        self.io(|t| t.send_batch(&lines))?;
        for addr in [a, b] {
            let state = self.state_mut(addr);
            state.counting = true;
            state.transmitting = true;
        }
        info!(a = %a, b = %b, "counting and transmitting");
        Ok(())
    }

    pub fn capture(&mut self, addr: &DeviceAddress) -> Result<()> {
        let lines = port::capture(addr);
        self.io(|t| t.send_lines(&lines))?;
        self.state_mut(addr).capturing = true;
        Ok(())
    }

    pub fn stop_all(&mut self, addr: &DeviceAddress) -> Result<()> {
        let lines = port::stop_all(addr);
        self.io(|t| t.send_lines(&lines))?;
        self.state_mut(addr).stop(true, true, true);
        Ok(())
    }

    pub fn stop_capture(&mut self, addr: &DeviceAddress) -> Result<()> {
        let lines = port::stop_capture(addr);
        self.io(|t| t.send_lines(&lines))?;
        self.state_mut(addr).stop(false, false, true);
        Ok(())
    }

    pub fn stop_counter(&mut self, addr: &DeviceAddress) -> Result<()> {
        let lines = port::stop_counter(addr);
        self.io(|t| t.send_lines(&lines))?;
        self.state_mut(addr).stop(true, false, false);
        Ok(())
    }

    /// Stops the counters of both ports in one socket write.
    pub fn stop_counters(&mut self, a: &DeviceAddress, b: &DeviceAddress) -> Result<()> {
        let lines = [port::stop_counter(a), port::stop_counter(b)].concat();
        self.io(|t| t.send_batch(&lines))?;
        for addr in [a, b] {
            self.state_mut(addr).stop(true, false, false);
        }
        Ok(())
    }

    pub fn stop_stream(&mut self, addr: &DeviceAddress) -> Result<()> {
        let lines = port::stop_stream(addr);
        self.io(|t| t.send_lines(&lines))?;
        self.state_mut(addr).stop(false, true, false);
        Ok(())
    }

    /// What this session last told the port to do.
    pub fn port_state(&self, addr: &DeviceAddress) -> PortRunState {
        self.ports.get(addr).copied().unwrap_or_default()
    }

    // ---- Waiting ----

    /// `CONT` sleeps `duration` and then stops everything on the port;
    /// `duration` is required. `STOP`, the default, polls the transmit
    /// state until the stream ends. The poll has no bound of its own; it
    /// only ends early on a read timeout or a lost connection.
    pub fn wait_for_completion(
        &mut self,
        addr: &DeviceAddress,
        mode: Option<WaitMode>,
        duration: Option<Duration>,
    ) -> Result<()> {
        match mode.unwrap_or(WaitMode::Stop) {
            WaitMode::Cont => {
                let Some(duration) = duration else {
                    return self.reject(ValidationError::Missing("duration").into());
                };
                info!(port = %addr, ?duration, "running continuous stream");
                thread::sleep(duration);
                self.stop_all(addr)
            }
            WaitMode::Stop => self.poll_until_stopped(addr, None),
        }
    }

    /// Like the `STOP` wait, but gives up with
    /// [`AnritsuError::WaitExpired`] after `max_wait`.
    pub fn wait_until_stopped_within(&mut self, addr: &DeviceAddress, max_wait: Duration) -> Result<()> {
        self.poll_until_stopped(addr, Some(max_wait))
    }

    fn poll_until_stopped(&mut self, addr: &DeviceAddress, max_wait: Option<Duration>) -> Result<()> {
        let select = port::select(addr);
        let query = transmit_state_query();
        let interval = self.config.poll_interval;
        let started = Instant::now();
        info!(port = %addr, "waiting for transmission to end");

        self.io(|t| {
            t.send_lines(&select)?;
            let mut polls = 0u64;
            loop {
                let reply = t.query(&query)?;
                polls += 1;
                let state = parse_transmit_state(&reply).map_err(|_| AnritsuError::MalformedReply {
                    query: query.clone(),
                    reply: reply.clone(),
                })?;
                match state {
                    TransmitState::Stopped => {
                        debug!(port = %addr, polls, "transmission ended");
                        return Ok(());
                    }
                    TransmitState::Running => {}
                    TransmitState::Transition => debug!(port = %addr, "starting or halting"),
                }
                if let Some(max) = max_wait
                    && started.elapsed() + interval > max
                {
                    return Err(AnritsuError::WaitExpired {
                        port: addr.to_string(),
                        waited: started.elapsed(),
                    });
                }
                thread::sleep(interval);
            }
        })?;
        self.state_mut(addr).transmitting = false;
        Ok(())
    }

    // ---- Counters ----

    pub fn read_counter(&mut self, addr: &DeviceAddress, counter: Counter) -> Result<u64> {
        let query = match counter.query(self.device) {
            Ok(q) => q,
            Err(e) => return self.reject(e),
        };
        let select = port::select(addr);
        let value = self.io(|t| {
            t.send_lines(&select)?;
            read_value(t, query)
        })?;
        debug!(port = %addr, %counter, value, "counter read");
        Ok(value)
    }

    /// Reads every counter of `group` from both ports. Fails before any
    /// write when the device does not implement the group.
    pub fn read_counter_group(
        &mut self,
        a: &DeviceAddress,
        b: &DeviceAddress,
        group: CounterGroup,
    ) -> Result<CounterGroupTable> {
        let entries = match group.entries(self.device) {
            Ok(e) => e,
            Err(e) => return self.reject(e),
        };
        let mut columns = Vec::with_capacity(2);
        for addr in [a, b] {
            let select = port::select(addr);
            let values = self.io(|t| {
                t.send_lines(&select)?;
                entries
                    .iter()
                    .map(|(query, _)| read_value(t, query))
                    .collect::<Result<Vec<u64>>>()
            })?;
            columns.push(values);
        }
        let rows = entries
            .iter()
            .zip(columns[0].iter().zip(&columns[1]))
            .map(|((_, desc), (va, vb))| (desc.to_string(), *va, *vb))
            .collect();
        Ok(CounterGroupTable {
            group,
            ports: [a.clone(), b.clone()],
            rows,
        })
    }

    /// Reads `counter` and checks `low <= value <= high`.
    pub fn test_counter_range(
        &mut self,
        addr: &DeviceAddress,
        counter: Counter,
        low: u64,
        high: u64,
    ) -> Result<bool> {
        let value = self.read_counter(addr, counter)?;
        let ok = in_range(value, low, high);
        if !ok {
            warn!(port = %addr, %counter, value, low, high, "counter out of range");
        }
        Ok(ok)
    }

    /// Closes the connection. Never fails; later calls return
    /// [`AnritsuError::NotConnected`].
    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            info!("analyzer disconnected");
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn read_value<T: Transport + ?Sized>(t: &mut T, query: &str) -> Result<u64> {
    let reply = t.query(query)?;
    parse_counter_reply(&reply).map_err(|_| AnritsuError::MalformedReply {
        query: query.to_string(),
        reply,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::RunPhase;
    use crate::transport::mock::MockTransport;

    fn fast() -> SessionConfig {
        SessionConfig {
            drain_attempts: 0,
            poll_interval: Duration::ZERO,
            ..Default::default()
        }
    }

    fn session(t: MockTransport, device: DeviceType) -> Session<MockTransport> {
        let mut s = Session::from_transport(t, device, fast()).unwrap();
        s.transport.as_mut().unwrap().timeouts.clear();
        s
    }

    fn addr(p: &str) -> DeviceAddress {
        DeviceAddress::new("1", "1", p)
    }

    fn spy(s: &Session<MockTransport>) -> &MockTransport {
        s.transport.as_ref().unwrap()
    }

    #[test]
    fn device_type_parsing() {
        assert_eq!("MD1230B".parse::<DeviceType>(), Ok(DeviceType::Md1230b));
        assert_eq!(DeviceType::Md1260a.to_string(), "md1260a");
        assert!("md9999".parse::<DeviceType>().is_err());
    }

    #[test]
    fn drain_runs_on_open_and_leaves_steady_timeout() {
        let t = MockTransport::new().script([Some("1\n"), Some("0,3\n")]);
        let s = Session::from_transport(t, DeviceType::Md1230b, SessionConfig::default()).unwrap();
        let t = spy(&s);
        assert_eq!(t.reads, 2);
        assert_eq!(t.timeouts.last(), Some(&Duration::from_secs(20)));
        assert!(t.sent.is_empty());
    }

    #[test]
    fn zero_timeout_is_rejected_before_any_io() {
        let config = SessionConfig {
            steady_timeout: Duration::ZERO,
            ..fast()
        };
        let err = Session::from_transport(MockTransport::new(), DeviceType::Md1230b, config)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            AnritsuError::Validation(ValidationError::OutOfRange {
                field: "steady_timeout",
                ..
            })
        ));
        assert!(!err.is_fatal());

        let config = SessionConfig {
            connect_timeout: Some(Duration::ZERO),
            ..fast()
        };
        let err = Session::connect("127.0.0.1", DeviceType::Md1230b, config)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            AnritsuError::Validation(ValidationError::OutOfRange {
                field: "connect_timeout",
                ..
            })
        ));
    }

    #[test]
    fn arp_group_on_md1260a_sends_nothing() {
        let mut s = session(MockTransport::new(), DeviceType::Md1260a);
        let err = s
            .read_counter_group(&addr("1"), &addr("2"), CounterGroup::Arp)
            .unwrap_err();
        assert!(matches!(err, AnritsuError::Unsupported { .. }));
        assert!(spy(&s).sent.is_empty());
        assert_eq!(spy(&s).raw_writes, 0);
        assert!(s.is_connected());
        assert!(s.last_error().unwrap().contains("ARP"));
    }

    #[test]
    fn bip_on_md1230b_sends_nothing() {
        let mut s = session(MockTransport::new(), DeviceType::Md1230b);
        assert!(matches!(
            s.read_counter(&addr("1"), Counter::Bip),
            Err(AnritsuError::Unsupported { .. })
        ));
        assert!(spy(&s).sent.is_empty());
    }

    #[test]
    fn read_counter_selects_then_queries() {
        let t = MockTransport::new().answer(":COUNter:RECeived:FRAMes?\n", "0,14880952\n");
        let mut s = session(t, DeviceType::Md1230b);
        assert_eq!(s.read_counter(&addr("2"), Counter::RxFrames).unwrap(), 14_880_952);
        assert_eq!(
            spy(&s).sent,
            vec![":UENTry:ID 1\n", ":MODule:ID 1\n", ":PORT:ID 2\n", ":COUNter:RECeived:FRAMes?\n"]
        );
        assert!(s.test_counter_range(&addr("2"), Counter::RxFrames, 14_880_952, 14_880_952).unwrap());
        assert!(!s.test_counter_range(&addr("2"), Counter::RxFrames, 0, 100).unwrap());
    }

    #[test]
    fn malformed_counter_reply_keeps_session() {
        let t = MockTransport::new().answer(":COUNter:TRANsmitted:FRAMes?\n", "oops\n");
        let mut s = session(t, DeviceType::Md1230b);
        assert!(matches!(
            s.read_counter(&addr("1"), Counter::TxFrames),
            Err(AnritsuError::MalformedReply { .. })
        ));
        assert!(s.is_connected());
    }

    #[test]
    fn counter_group_reads_both_ports_in_query_order() {
        let entries = CounterGroup::Ipv6.entries(DeviceType::Md1230b).unwrap();
        let t = MockTransport::new().answers(
            entries
                .iter()
                .enumerate()
                .map(|(i, (q, _))| (q.to_string(), format!("0,{i}\n"))),
        );
        let mut s = session(t, DeviceType::Md1230b);
        let table = s
            .read_counter_group(&addr("1"), &addr("2"), CounterGroup::Ipv6)
            .unwrap();
        assert_eq!(table.rows.len(), entries.len());
        assert_eq!(table.rows[0], (entries[0].1.to_string(), 0, 0));
        assert_eq!(table.rows[3].1, 3);
        let queries = spy(&s).queries_sent();
        assert_eq!(queries.len(), 2 * entries.len());
        assert_eq!(queries[0], entries[0].0);
    }

    #[test]
    fn count_and_transmit_is_one_write() {
        let mut s = session(MockTransport::new(), DeviceType::Md1230b);
        let (a, b) = (addr("1"), addr("2"));
        s.initialize_and_own(&a).unwrap();
        s.initialize_and_own(&b).unwrap();
        let before = spy(&s).sent.len();
        s.start_count_and_transmit(&a, &b).unwrap();
        let t = spy(&s);
        assert_eq!(t.raw_writes, 1);
        assert_eq!(t.sent.len(), before + 1);
        let batch = t.sent.last().unwrap();
        assert_eq!(batch.matches(":COUNter:STARt\n").count(), 2);
        assert!(batch.ends_with(":PORT:ID 2\n:TSTReam:STARt\n"));
        assert_eq!(s.port_state(&a).phase(), RunPhase::Active);

        s.stop_counters(&a, &b).unwrap();
        assert_eq!(spy(&s).raw_writes, 2);
        assert!(s.port_state(&b).transmitting);
        s.stop_stream(&b).unwrap();
        assert_eq!(s.port_state(&b).phase(), RunPhase::Stopped);
    }

    #[test]
    fn stop_wait_polls_until_stopped() {
        let t = MockTransport::new()
            .script([Some("1\n"), Some("2\n"), Some("1\n")])
            .answer(":TSTReam:STATe?\n", "0\n");
        let mut s = session(t, DeviceType::Md1230b);
        s.wait_for_completion(&addr("2"), None, None).unwrap();
        let t = spy(&s);
        assert_eq!(&t.sent[..3], &port::select(&addr("2"))[..]);
        assert_eq!(t.queries_sent().len(), 4);
    }

    #[test]
    fn bounded_wait_expires() {
        let t = MockTransport::new().answer(":TSTReam:STATe?\n", "1\n");
        let mut s = session(t, DeviceType::Md1230b);
        s.config.poll_interval = Duration::from_millis(5);
        let err = s
            .wait_until_stopped_within(&addr("1"), Duration::from_millis(30))
            .unwrap_err();
        assert!(matches!(err, AnritsuError::WaitExpired { .. }));
        assert!(s.is_connected());
    }

    #[test]
    fn cont_wait_needs_duration() {
        let mut s = session(MockTransport::new(), DeviceType::Md1230b);
        let err = s
            .wait_for_completion(&addr("1"), Some(WaitMode::Cont), None)
            .unwrap_err();
        assert!(matches!(err, AnritsuError::Validation(ValidationError::Missing("duration"))));
        assert!(spy(&s).sent.is_empty());

        s.wait_for_completion(&addr("1"), Some(WaitMode::Cont), Some(Duration::ZERO))
            .unwrap();
        assert_eq!(spy(&s).sent.last().unwrap(), ":TSTReam:STOP\n");
    }

    #[test]
    fn unknown_transmit_state_is_malformed() {
        let t = MockTransport::new().answer(":TSTReam:STATe?\n", "7\n");
        let mut s = session(t, DeviceType::Md1230b);
        assert!(matches!(
            s.wait_for_completion(&addr("1"), Some(WaitMode::Stop), None),
            Err(AnritsuError::MalformedReply { .. })
        ));
    }

    #[test]
    fn lost_connection_closes_session() {
        let mut s = session(MockTransport::new().broken(), DeviceType::Md1230b);
        let err = s.initialize_and_own(&addr("1")).unwrap_err();
        assert!(err.is_fatal());
        assert!(!s.is_connected());
        assert!(matches!(
            s.stop_all(&addr("1")),
            Err(AnritsuError::NotConnected)
        ));
        s.disconnect();
    }
}
