use anyhow::{Context, Result, bail};
use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use anritsu_ctl::session::Session;
use anritsu_ctl::test::run_throughput_test;

mod cli;

use cli::{Cmd, StopWhat};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let conn = args.cmd.conn();
    init_logging(conn.verbose);

    let mut session = Session::connect(&conn.host, conn.device, conn.session_config())
        .with_context(|| format!("connecting to {}:{}", conn.host, conn.control_port))?;
    let result = run(&mut session, &args.cmd);
    session.disconnect();
    result
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(session: &mut Session, cmd: &Cmd) -> Result<()> {
    match cmd {
        Cmd::Init(opts) => {
            for port in &opts.ports {
                session
                    .initialize_and_own(port)
                    .with_context(|| format!("initializing port {port}"))?;
            }
        }
        Cmd::Throughput(opts) => {
            let outcomes = run_throughput_test(session, &opts.a, &opts.b, &opts.config())
                .context("throughput test")?;
            let failed = outcomes.iter().filter(|o| !o.passed()).count();
            if failed > 0 {
                bail!("{failed} of {} frame sizes failed", outcomes.len());
            }
            info!(frame_sizes = outcomes.len(), "throughput test passed");
        }
        Cmd::Counter(opts) => match opts.range.as_deref() {
            Some(&[low, high]) => {
                let ok = session
                    .test_counter_range(&opts.port, opts.name, low, high)
                    .with_context(|| format!("reading {} on {}", opts.name, opts.port))?;
                println!("{}", if ok { "in range" } else { "out of range" });
                if !ok {
                    bail!("{} on {} outside {low}..={high}", opts.name, opts.port);
                }
            }
            Some(other) => bail!("--range takes LOW and HIGH, got {other:?}"),
            None => {
                let value = session
                    .read_counter(&opts.port, opts.name)
                    .with_context(|| format!("reading {} on {}", opts.name, opts.port))?;
                println!("{value}");
            }
        },
        Cmd::Counters(opts) => {
            let table = session
                .read_counter_group(&opts.a, &opts.b, opts.group)
                .with_context(|| format!("reading counter group {}", opts.group))?;
            println!("{table}");
        }
        Cmd::Stop(opts) => {
            let port = &opts.port;
            let result = match opts.what {
                StopWhat::All => session.stop_all(port),
                StopWhat::Capture => session.stop_capture(port),
                StopWhat::Counter => session.stop_counter(port),
                StopWhat::Stream => session.stop_stream(port),
            };
            result.with_context(|| format!("stopping {:?} on {port}", opts.what))?;
        }
        Cmd::Wait(opts) => {
            let result = match opts.within {
                Some(secs) => session.wait_until_stopped_within(&opts.port, Duration::from_secs(secs)),
                None => session.wait_for_completion(
                    &opts.port,
                    Some(opts.mode),
                    opts.seconds.map(Duration::from_secs),
                ),
            };
            result.with_context(|| format!("waiting on {}", opts.port))?;
        }
    }
    Ok(())
}
