//! Statistics tracking for link traffic

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Snapshot of link traffic counters
#[derive(Debug, Clone)]
pub struct LinkStats {
    /// Messages received from the peer
    pub messages_in: u64,
    /// Messages sent to the peer
    pub messages_out: u64,
    /// Total bytes received
    pub bytes_in: u64,
    /// Total bytes sent
    pub bytes_out: u64,
    /// Timestamp when stats collection started
    pub start_time: Instant,
    /// Inbound throughput in KB/s
    pub in_kbps: f64,
    /// Outbound throughput in KB/s
    pub out_kbps: f64,
}

impl LinkStats {
    /// Create a new LinkStats instance with zero counters
    pub fn new() -> Self {
        Self {
            messages_in: 0,
            messages_out: 0,
            bytes_in: 0,
            bytes_out: 0,
            start_time: Instant::now(),
            in_kbps: 0.0,
            out_kbps: 0.0,
        }
    }

    /// Update throughput calculations based on elapsed time
    pub fn update_throughput(&mut self) {
        let elapsed_secs = self.start_time.elapsed().as_secs_f64();
        if elapsed_secs > 0.0 {
            self.in_kbps = (self.bytes_in as f64) / 1024.0 / elapsed_secs;
            self.out_kbps = (self.bytes_out as f64) / 1024.0 / elapsed_secs;
        }
    }
}

impl Default for LinkStats {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LinkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "In: {} msg / {} B ({:.2} KB/s), Out: {} msg / {} B ({:.2} KB/s)",
            self.messages_in,
            self.bytes_in,
            self.in_kbps,
            self.messages_out,
            self.bytes_out,
            self.out_kbps
        )
    }
}

/// Thread-safe statistics tracker for link traffic
///
/// Uses atomic counters so the session and a render task can share it
#[derive(Debug, Clone)]
pub struct StatsTracker {
    messages_in: Arc<AtomicU64>,
    messages_out: Arc<AtomicU64>,
    bytes_in: Arc<AtomicU64>,
    bytes_out: Arc<AtomicU64>,
    start_time: Instant,
}

impl StatsTracker {
    /// Create a new StatsTracker
    pub fn new() -> Self {
        Self {
            messages_in: Arc::new(AtomicU64::new(0)),
            messages_out: Arc::new(AtomicU64::new(0)),
            bytes_in: Arc::new(AtomicU64::new(0)),
            bytes_out: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Count one inbound message of the given size
    pub fn add_inbound(&self, bytes: usize) {
        self.messages_in.fetch_add(1, Ordering::Relaxed);
        self.bytes_in.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Count one outbound message of the given size
    pub fn add_outbound(&self, bytes: usize) {
        self.messages_out.fetch_add(1, Ordering::Relaxed);
        self.bytes_out.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn get_stats(&self) -> LinkStats {
        let mut stats = LinkStats {
            messages_in: self.messages_in.load(Ordering::Relaxed),
            messages_out: self.messages_out.load(Ordering::Relaxed),
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
            start_time: self.start_time,
            in_kbps: 0.0,
            out_kbps: 0.0,
        };
        stats.update_throughput();
        stats
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.messages_in.store(0, Ordering::Relaxed);
        self.messages_out.store(0, Ordering::Relaxed);
        self.bytes_in.store(0, Ordering::Relaxed);
        self.bytes_out.store(0, Ordering::Relaxed);
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_creation() {
        let stats = LinkStats::new();
        assert_eq!(stats.messages_in, 0);
        assert_eq!(stats.messages_out, 0);
        assert_eq!(stats.bytes_in, 0);
        assert_eq!(stats.bytes_out, 0);
        assert_eq!(stats.in_kbps, 0.0);
        assert_eq!(stats.out_kbps, 0.0);
    }

    #[test]
    fn test_stats_display() {
        let mut stats = LinkStats::new();
        stats.messages_in = 3;
        stats.bytes_in = 1024;
        stats.messages_out = 5;
        stats.bytes_out = 2048;
        stats.update_throughput();

        let display = format!("{}", stats);
        assert!(display.contains("In: 3 msg"));
        assert!(display.contains("Out: 5 msg"));
        assert!(display.contains("KB/s"));
    }

    #[test]
    fn test_tracker_operations() {
        let tracker = StatsTracker::new();

        tracker.add_inbound(10);
        tracker.add_inbound(20);
        tracker.add_outbound(5);

        let stats = tracker.get_stats();
        assert_eq!(stats.messages_in, 2);
        assert_eq!(stats.bytes_in, 30);
        assert_eq!(stats.messages_out, 1);
        assert_eq!(stats.bytes_out, 5);

        tracker.reset();
        let stats = tracker.get_stats();
        assert_eq!(stats.messages_in, 0);
        assert_eq!(stats.bytes_out, 0);
    }

    #[test]
    fn test_tracker_clones_share_counters() {
        let tracker = StatsTracker::new();
        let clone = tracker.clone();

        tracker.add_outbound(7);
        assert_eq!(clone.get_stats().messages_out, 1);
        assert_eq!(clone.get_stats().bytes_out, 7);
    }

    #[test]
    fn test_throughput_calculation() {
        let tracker = StatsTracker::new();
        tracker.add_inbound(10240);
        tracker.add_outbound(20480);

        // Simulate some time passing
        std::thread::sleep(std::time::Duration::from_millis(100));
        let stats = tracker.get_stats();

        assert!(stats.in_kbps > 0.0);
        assert!(stats.out_kbps > 0.0);
    }
}
