//! Delivery metrics for streaming sessions

use std::time::{Duration, Instant};

/// Per-session delivery statistics
///
/// Updated by the session after each part is written, logged on teardown.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Frames actually written to the client
    pub frames_sent: u64,
    /// Payload and framing bytes written
    pub bytes_sent: u64,
    /// Versions that were superseded before this session could deliver them
    pub frames_skipped: u64,
    /// When streaming started
    pub started_at: Instant,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            frames_sent: 0,
            bytes_sent: 0,
            frames_skipped: 0,
            started_at: Instant::now(),
        }
    }

    /// Time since streaming started
    pub fn duration(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Delivered frames per second over the session lifetime
    pub fn delivered_framerate(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs > 0.0 {
            self.frames_sent as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = SessionStats::new();
        assert_eq!(stats.frames_sent, 0);
        assert_eq!(stats.bytes_sent, 0);
        assert_eq!(stats.frames_skipped, 0);
    }

    #[test]
    fn test_delivered_framerate_no_frames() {
        let stats = SessionStats::new();
        let rate = stats.delivered_framerate();
        assert!(rate >= 0.0);
    }

    #[test]
    fn test_delivered_framerate_counts_sent_frames() {
        let mut stats = SessionStats::new();
        let past = match Instant::now().checked_sub(Duration::from_secs(10)) {
            Some(past) => past,
            None => return, // monotonic clock too close to its epoch
        };
        stats.started_at = past;
        stats.frames_sent = 300;

        let rate = stats.delivered_framerate();
        assert!((rate - 30.0).abs() < 1.0);
    }
}
