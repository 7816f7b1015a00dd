use clap::{Args, Parser, Subcommand, ValueEnum};
use std::time::Duration;

use anritsu_ctl::counter::{Counter, CounterGroup};
use anritsu_ctl::port::DeviceAddress;
use anritsu_ctl::proto::command::WaitMode;
use anritsu_ctl::session::{DeviceType, SessionConfig};
use anritsu_ctl::test::ThroughputConfig;
use anritsu_ctl::test::test_config::DEFAULT_FRAME_SIZES;
use anritsu_ctl::transport::CONTROL_PORT;

#[derive(Parser, Debug, Clone)]
#[command(name = "anritsu-ctl", about = "Drive an Anritsu traffic generator over its control port")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Default ports and take ownership of them
    Init(InitOpts),
    /// Throughput test between two ports over a list of frame sizes
    Throughput(ThroughputOpts),
    /// Read one counter, optionally checking it against a range
    Counter(CounterOpts),
    /// Print a counter group for two ports
    Counters(CountersOpts),
    /// Stop activity on a port
    Stop(StopOpts),
    /// Wait for a port's stream to end
    Wait(WaitOpts),
}

impl Cmd {
    pub fn conn(&self) -> &ConnOpts {
        match self {
            Cmd::Init(o) => &o.conn,
            Cmd::Throughput(o) => &o.conn,
            Cmd::Counter(o) => &o.conn,
            Cmd::Counters(o) => &o.conn,
            Cmd::Stop(o) => &o.conn,
            Cmd::Wait(o) => &o.conn,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConnOpts {
    /// Analyzer host name or address
    #[arg(long)]
    pub host: String,
    /// Analyzer model: md1230b or md1260a
    #[arg(long, default_value = "md1230b")]
    pub device: DeviceType,
    /// Remote-control TCP port
    #[arg(long, default_value_t = CONTROL_PORT)]
    pub control_port: u16,
    /// Reply timeout in seconds
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
    /// Per-read timeout while discarding stale replies after connecting
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub drain_timeout_secs: u64,
    /// Give up connecting after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout_secs: Option<u64>,
    /// Log every line sent and received
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

impl ConnOpts {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            control_port: self.control_port,
            steady_timeout: Duration::from_secs(self.timeout_secs),
            drain_timeout: Duration::from_secs(self.drain_timeout_secs),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            ..Default::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InitOpts {
    #[command(flatten)]
    pub conn: ConnOpts,
    /// Port as unit/module/port; repeat for more ports
    #[arg(long = "port", required = true)]
    pub ports: Vec<DeviceAddress>,
}

#[derive(Args, Debug, Clone)]
pub struct ThroughputOpts {
    #[command(flatten)]
    pub conn: ConnOpts,
    /// First port (unit/module/port)
    #[arg(long)]
    pub a: DeviceAddress,
    /// Second port; the run waits for this one to stop
    #[arg(long)]
    pub b: DeviceAddress,
    /// Seconds of traffic per frame size
    #[arg(long, default_value_t = 1.0)]
    pub seconds: f64,
    /// Percentage of line rate
    #[arg(long, default_value_t = 100)]
    pub speed: u64,
    /// Comma-separated frame sizes in bytes
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_FRAME_SIZES.to_vec())]
    pub frame_sizes: Vec<u64>,
    /// Line rate in Gbit/s
    #[arg(long, default_value_t = 10.0)]
    pub gbps: f64,
    /// Preamble bytes per frame
    #[arg(long, default_value_t = 8)]
    pub preamble: u64,
    /// Only send traffic so the device under test learns the MACs
    #[arg(long, default_value_t = false)]
    pub learn: bool,
}

impl ThroughputOpts {
    pub fn config(&self) -> ThroughputConfig {
        ThroughputConfig {
            seconds: self.seconds,
            speed_percent: self.speed,
            frame_sizes: self.frame_sizes.clone(),
            line_rate_gbps: self.gbps,
            preamble: self.preamble,
            learn: self.learn,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CounterOpts {
    #[command(flatten)]
    pub conn: ConnOpts,
    #[arg(long)]
    pub port: DeviceAddress,
    /// txframes, rxframes, txtestframes, rxtestframes or BIP
    #[arg(long)]
    pub name: Counter,
    /// Check LOW <= value <= HIGH instead of printing the value
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    pub range: Option<Vec<u64>>,
}

#[derive(Args, Debug, Clone)]
pub struct CountersOpts {
    #[command(flatten)]
    pub conn: ConnOpts,
    #[arg(long)]
    pub a: DeviceAddress,
    #[arg(long)]
    pub b: DeviceAddress,
    /// base, test, test_and_IPV4, ARP, IPV4 or IPV6
    #[arg(long, default_value = "base")]
    pub group: CounterGroup,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWhat {
    All,
    Capture,
    Counter,
    Stream,
}

#[derive(Args, Debug, Clone)]
pub struct StopOpts {
    #[command(flatten)]
    pub conn: ConnOpts,
    #[arg(long)]
    pub port: DeviceAddress,
    #[arg(long, value_enum, default_value_t = StopWhat::All)]
    pub what: StopWhat,
}

#[derive(Args, Debug, Clone)]
pub struct WaitOpts {
    #[command(flatten)]
    pub conn: ConnOpts,
    #[arg(long)]
    pub port: DeviceAddress,
    /// STOP waits for the stream to end, CONT stops it after --seconds
    #[arg(long, default_value = "STOP")]
    pub mode: WaitMode,
    #[arg(long)]
    pub seconds: Option<u64>,
    /// Give up a STOP wait after this many seconds
    #[arg(long)]
    pub within: Option<u64>,
}
