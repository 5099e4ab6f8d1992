//! Edge timing state machine.
//!
//! Turns the stream of INT-line edges into one pulse width per trigger
//! cycle. Written from the notifier's thread, read from the thread waiting
//! in `read_raw`.

use crate::consts::edge::{ORDINAL_END, ORDINAL_IDLE, ORDINAL_START};
use crate::notifier::Tick;
use log::trace;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Shared state of the current measurement cycle.
///
/// Polarity is not looked at: the first edge after [`reset`](Self::reset)
/// starts the pulse and the second one ends it. Later edges only advance the
/// ordinal. A glitch between the two real edges therefore produces a short,
/// wrong width; nothing here filters it.
#[derive(Debug)]
pub struct EdgeCycle {
    ordinal: AtomicU32,
    start_tick: AtomicU32,
    micros: AtomicU32,
    ready: AtomicBool,
}

impl EdgeCycle {
    /// Creates an idle cycle that ignores edges until the first reset.
    pub fn new() -> Self {
        Self {
            ordinal: AtomicU32::new(ORDINAL_IDLE),
            start_tick: AtomicU32::new(0),
            micros: AtomicU32::new(0),
            ready: AtomicBool::new(false),
        }
    }

    /// Arms the cycle for the next trigger.
    pub fn reset(&self) {
        self.ready.store(false, Ordering::Release);
        self.ordinal.store(ORDINAL_START, Ordering::Release);
    }

    /// Handles one edge. Called only from the notification context.
    pub fn on_edge(&self, tick: Tick) {
        // Claim the ordinal and advance it in one step so a concurrent reset
        // is never overwritten. Saturates: stray edges cannot wrap back into 1 or 2.
        let ordinal = match self
            .ordinal
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
        {
            Ok(previous) | Err(previous) => previous,
        };
        match ordinal {
            ORDINAL_START => {
                self.start_tick.store(tick.0, Ordering::Relaxed);
            }
            ORDINAL_END => {
                let start = Tick(self.start_tick.load(Ordering::Relaxed));
                let width = tick.micros_since(start);
                self.micros.store(width, Ordering::Relaxed);
                // value before flag
                self.ready.store(true, Ordering::Release);
                trace!("Pulse complete: {}us ({} -> {})", width, start, tick);
            }
            _ => {}
        }
    }

    /// Returns the pulse width once per completed cycle.
    pub fn take(&self) -> Option<u32> {
        if self.ready.swap(false, Ordering::Acquire) {
            Some(self.micros.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Whether a finished pulse is waiting to be taken.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Most recent pulse width, including one already taken or from an earlier cycle.
    pub fn last_micros(&self) -> u32 {
        self.micros.load(Ordering::Acquire)
    }
}

impl Default for EdgeCycle {
    fn default() -> Self {
        Self::new()
    }
}
