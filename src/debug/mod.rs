pub mod ring;
pub mod timer;

use instant::Instant;

use self::ring::RingBuffer;

/// Number of frame times kept for the rolling stats.
const FRAME_HISTORY_LEN: usize = 300;
/// How often to log frame stats (seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;

/// Rolling frame-time statistics for the driver loop.
pub struct FrameStats {
    /// Rolling window of frame times (seconds).
    pub frame_times: RingBuffer<f64>,
    pub frame_count: u64,
    /// Sum of the frame times currently in the window.
    window_sum: f64,
    last_log_time: Instant,
    frames_since_log: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: RingBuffer::new(FRAME_HISTORY_LEN),
            frame_count: 0,
            window_sum: 0.0,
            last_log_time: Instant::now(),
            frames_since_log: 0,
        }
    }

    pub fn record_frame(&mut self, dt: f64) {
        self.window_sum += dt - self.frame_times.push(dt).unwrap_or(0.0);
        self.frame_count += 1;
        self.frames_since_log += 1;
    }

    /// `(avg, min, max)` frame time over the window, in seconds.
    pub fn window(&self) -> Option<(f64, f64, f64)> {
        if self.frame_times.is_empty() {
            return None;
        }
        let (min, max) = self
            .frame_times
            .iter()
            .fold((f64::MAX, 0.0_f64), |(min, max), &dt| (min.min(dt), max.max(dt)));
        Some((self.window_sum / self.frame_times.len() as f64, min, max))
    }

    /// Log FPS and frame times once per interval. Returns true if it logged.
    pub fn maybe_log(&mut self) -> bool {
        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed < STATS_LOG_INTERVAL {
            return false;
        }
        if let (Some((avg, min, max)), Some(last)) = (self.window(), self.frame_times.latest()) {
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | last: {:.2}ms | total frames: {}",
                self.frames_since_log as f64 / elapsed,
                avg * 1000.0,
                min * 1000.0,
                max * 1000.0,
                last * 1000.0,
                self.frame_count,
            );
        }
        self.last_log_time = Instant::now();
        self.frames_since_log = 0;
        true
    }
}
