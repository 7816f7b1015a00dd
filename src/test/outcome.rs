use tracing::{info, warn};

use crate::convert::InterFrameGap;
use crate::counter::CounterGroupTable;

/// Result of one frame size of a throughput run.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub frame_size: u64,
    /// Frames each port was told to send.
    pub expected_frames: u64,
    pub gap: InterFrameGap,

    /// `None` for a learning run, which has no verdict.
    pub pass: Option<bool>,
    /// Range check of received frames, first and second port.
    pub in_range: [bool; 2],

    pub counters: Option<CounterGroupTable>,
    pub reason: Option<String>,
}

impl TestOutcome {
    pub fn learned(frame_size: u64, expected_frames: u64, gap: InterFrameGap) -> Self {
        Self {
            frame_size,
            expected_frames,
            gap,
            pass: None,
            in_range: [false; 2],
            counters: None,
            reason: None,
        }
    }

    pub fn checked(
        frame_size: u64,
        expected_frames: u64,
        gap: InterFrameGap,
        in_range: [bool; 2],
        counters: CounterGroupTable,
    ) -> Self {
        let pass = in_range[0] && in_range[1];
        let reason = match in_range {
            [true, true] => None,
            [false, false] => Some("received frames out of range on both ports".into()),
            [false, true] => Some(format!("received frames out of range on {}", counters.ports[0])),
            [true, false] => Some(format!("received frames out of range on {}", counters.ports[1])),
        };
        Self {
            frame_size,
            expected_frames,
            gap,
            pass: Some(pass),
            in_range,
            counters: Some(counters),
            reason,
        }
    }

    pub fn passed(&self) -> bool {
        self.pass.unwrap_or(true)
    }

    pub fn log(&self) {
        match self.pass {
            None => info!(
                frame_size = self.frame_size,
                frames = self.expected_frames,
                "LEARNED"
            ),
            Some(true) => info!(
                frame_size = self.frame_size,
                frames = self.expected_frames,
                gap_bytes = self.gap.bytes,
                gap_ns = self.gap.nanoseconds,
                "PASS"
            ),
            Some(false) => warn!(
                frame_size = self.frame_size,
                frames = self.expected_frames,
                gap_bytes = self.gap.bytes,
                gap_ns = self.gap.nanoseconds,
                reason = self.reason.as_deref().unwrap_or("none"),
                "FAIL"
            ),
        }
    }
}
