use std::collections::VecDeque;
use std::time::Instant;

/// Frames kept for the latency report (about ten minutes at 15 fps)
pub const LATENCY_WINDOW: usize = 10_000;

/// Simple stopwatch for stage timings
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000_000.0
    }
}

/// Timing measurements for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub detect_us: f64,
    pub translate_us: f64,
    pub render_us: f64,
    pub display_us: f64,
    pub total_us: f64,
}

impl FrameTiming {
    pub fn total_ms(&self) -> f64 {
        self.total_us / 1000.0
    }
}

/// Statistics collector for latency measurements
///
/// Keeps only the most recent `capacity` frames; older timings are evicted.
#[derive(Debug)]
pub struct LatencyStats {
    timings: VecDeque<FrameTiming>,
    capacity: usize,
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyStats {
    pub fn new() -> Self {
        Self::with_window(LATENCY_WINDOW)
    }

    pub fn with_window(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            timings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn add(&mut self, timing: FrameTiming) {
        if self.timings.len() == self.capacity {
            self.timings.pop_front();
        }
        self.timings.push_back(timing);
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Calculate percentile from sorted data
    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx]
    }

    /// (mean, p50, p95, p99) for one stage
    pub fn stage_stats(&self, extract: impl Fn(&FrameTiming) -> f64) -> (f64, f64, f64, f64) {
        if self.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let mut values: Vec<f64> = self.timings.iter().map(&extract).collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let p50 = Self::percentile(&values, 50.0);
        let p95 = Self::percentile(&values, 95.0);
        let p99 = Self::percentile(&values, 99.0);

        (mean, p50, p95, p99)
    }

    /// Log a per-stage latency report
    pub fn log_report(&self) {
        if self.is_empty() {
            tracing::info!("No timing data collected");
            return;
        }

        tracing::info!("Latency report over the last {} frames (µs):", self.len());
        tracing::info!("  {:<10} {:>10} {:>10} {:>10} {:>10}", "Stage", "Mean", "p50", "p95", "p99");

        let stages: [(&str, fn(&FrameTiming) -> f64); 5] = [
            ("Detect", |t| t.detect_us),
            ("Translate", |t| t.translate_us),
            ("Render", |t| t.render_us),
            ("Display", |t| t.display_us),
            ("TOTAL", |t| t.total_us),
        ];

        let mut bottleneck = ("", 0.0);
        for (name, extract) in stages {
            let (mean, p50, p95, p99) = self.stage_stats(extract);
            tracing::info!(
                "  {:<10} {:>10.0} {:>10.0} {:>10.0} {:>10.0}",
                name,
                mean,
                p50,
                p95,
                p99
            );
            if name != "TOTAL" && p95 > bottleneck.1 {
                bottleneck = (name, p95);
            }
        }

        tracing::info!("  Bottleneck: {} ({:.0} µs p95)", bottleneck.0, bottleneck.1);
    }
}
