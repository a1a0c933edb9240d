//! Time-gated output coalescing.
//!
//! Test shells can write thousands of small chunks per second; forwarding
//! each one to the editor UI overloads it. The coalescer batches writes so
//! at most one emission happens per interval, while every byte eventually
//! surfaces: the next qualifying chunk carries the backlog, and the exit
//! path drains whatever is still pending.

use std::time::{Duration, Instant};

/// Batches rapid small writes into delayed emissions bounded by a minimum
/// inter-emission interval.
///
/// Purely time-gated: pending data grows without bound between emissions if
/// the producer outpaces the interval. stdout and stderr each get their own
/// instance so the two streams never interleave in one buffer.
#[derive(Debug)]
pub struct OutputCoalescer {
    pending: String,
    last_emit: Instant,
    min_interval: Duration,
}

impl OutputCoalescer {
    /// Create a coalescer. The emission clock starts now, so chunks arriving
    /// within the first interval are buffered.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            pending: String::new(),
            last_emit: Instant::now(),
            min_interval,
        }
    }

    /// Offer a chunk. Returns the batch to emit (any backlog plus the
    /// chunk), or `None` while buffering.
    pub fn offer(&mut self, chunk: &str) -> Option<String> {
        self.offer_at(Instant::now(), chunk)
    }

    fn offer_at(&mut self, now: Instant, chunk: &str) -> Option<String> {
        if now.duration_since(self.last_emit) >= self.min_interval {
            self.last_emit = now;
            let mut batch = std::mem::take(&mut self.pending);
            batch.push_str(chunk);
            Some(batch)
        } else {
            self.pending.push_str(chunk);
            None
        }
    }

    /// Drain whatever is still buffered. Used on the exit path.
    pub fn flush(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }

    /// True if buffered data is waiting for the next emission.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn buffers_within_the_interval() {
        let mut coalescer = OutputCoalescer::new(INTERVAL);
        let start = coalescer.last_emit;
        assert!(coalescer.offer_at(start + ms(10), "a").is_none());
        assert!(coalescer.offer_at(start + ms(20), "b").is_none());
        assert!(coalescer.has_pending());
    }

    #[test]
    fn qualifying_chunk_carries_the_backlog() {
        let mut coalescer = OutputCoalescer::new(INTERVAL);
        let start = coalescer.last_emit;
        assert!(coalescer.offer_at(start + ms(10), "a").is_none());
        assert!(coalescer.offer_at(start + ms(20), "b").is_none());
        assert_eq!(
            coalescer.offer_at(start + ms(150), "c").as_deref(),
            Some("abc")
        );
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn emission_resets_the_clock() {
        let mut coalescer = OutputCoalescer::new(INTERVAL);
        let start = coalescer.last_emit;
        assert!(coalescer.offer_at(start + ms(100), "a").is_some());
        assert!(coalescer.offer_at(start + ms(150), "b").is_none());
        assert_eq!(
            coalescer.offer_at(start + ms(200), "c").as_deref(),
            Some("bc")
        );
    }

    #[test]
    fn zero_interval_is_passthrough() {
        let mut coalescer = OutputCoalescer::new(Duration::ZERO);
        let start = coalescer.last_emit;
        assert_eq!(coalescer.offer_at(start, "x").as_deref(), Some("x"));
        assert_eq!(coalescer.offer_at(start, "y").as_deref(), Some("y"));
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn no_loss_or_duplication_under_fast_input() {
        let mut coalescer = OutputCoalescer::new(ms(50));
        let start = coalescer.last_emit;
        let chunks = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let mut emitted = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if let Some(batch) = coalescer.offer_at(start + ms(i as u64 * 30), chunk) {
                emitted.push_str(&batch);
            }
        }
        emitted.push_str(&coalescer.flush());
        assert_eq!(emitted, chunks.concat());
    }

    #[test]
    fn flush_drains_the_tail_exactly_once() {
        let mut coalescer = OutputCoalescer::new(INTERVAL);
        let start = coalescer.last_emit;
        assert!(coalescer.offer_at(start + ms(10), "tail output").is_none());
        assert_eq!(coalescer.flush(), "tail output");
        assert_eq!(coalescer.flush(), "");
    }
}
