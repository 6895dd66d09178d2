//! Bounded recent-sample buffers backing the metric charts.
//!
//! A [`MetricWindow`] holds the last N samples for one host, oldest first.
//! The backend returns a complete history window on every fetch, so a
//! successful history sync replaces the window wholesale instead of merging.

use std::collections::VecDeque;

use crate::types::MetricSample;

/// Window size for the inline sparklines on the host list.
pub const SPARKLINE_CAP: usize = 8;

/// Window size for the detail-screen history charts.
pub const HISTORY_CAP: usize = 20;

/// Insertion-ordered, bounded buffer of metric samples for one host.
#[derive(Debug, Clone)]
pub struct MetricWindow {
    cap: usize,
    samples: VecDeque<MetricSample>,
}

impl MetricWindow {
    /// Create an empty window holding at most `cap` samples.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            samples: VecDeque::with_capacity(cap),
        }
    }

    /// Append a sample at the tail, evicting from the head past the cap.
    pub fn push(&mut self, sample: MetricSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.cap {
            self.samples.pop_front();
        }
    }

    /// Adopt a freshly fetched history wholesale, discarding prior content.
    ///
    /// Keeps the last `cap` entries of `samples` when the response is larger
    /// than the window.
    pub fn replace(&mut self, samples: Vec<MetricSample>) {
        self.samples = samples.into_iter().collect();
        while self.samples.len() > self.cap {
            self.samples.pop_front();
        }
    }

    /// The most recent sample, or a zero-valued default when empty.
    pub fn latest(&self) -> MetricSample {
        self.samples.back().cloned().unwrap_or_default()
    }

    /// Chart-ready copy of the window, front-padded with zero samples so the
    /// renderer always receives at least two points. The stored window itself
    /// is never padded.
    pub fn chart_points(&self) -> Vec<MetricSample> {
        let mut points: Vec<MetricSample> = self.samples.iter().cloned().collect();
        while points.len() < 2 {
            points.insert(0, MetricSample::default());
        }
        points
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over the stored samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MetricSample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cpu: f64) -> MetricSample {
        MetricSample {
            timestamp: format!("t{cpu}"),
            cpu,
            ..Default::default()
        }
    }

    #[test]
    fn push_within_cap_keeps_order() {
        let mut w = MetricWindow::new(4);
        w.push(sample(1.0));
        w.push(sample(2.0));
        w.push(sample(3.0));

        assert_eq!(w.len(), 3);
        let cpus: Vec<f64> = w.iter().map(|s| s.cpu).collect();
        assert_eq!(cpus, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn push_past_cap_evicts_oldest_first() {
        let mut w = MetricWindow::new(3);
        for i in 0..10 {
            w.push(sample(i as f64));
        }

        assert_eq!(w.len(), 3);
        let cpus: Vec<f64> = w.iter().map(|s| s.cpu).collect();
        assert_eq!(cpus, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn replace_discards_prior_content_wholesale() {
        let mut w = MetricWindow::new(4);
        w.push(sample(1.0));
        w.push(sample(2.0));

        w.replace(vec![sample(10.0), sample(11.0)]);

        let cpus: Vec<f64> = w.iter().map(|s| s.cpu).collect();
        assert_eq!(cpus, vec![10.0, 11.0]);
    }

    #[test]
    fn replace_truncates_oversized_response_from_front() {
        let mut w = MetricWindow::new(3);
        w.replace((0..8).map(|i| sample(i as f64)).collect());

        let cpus: Vec<f64> = w.iter().map(|s| s.cpu).collect();
        assert_eq!(cpus, vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn replace_then_latest_returns_last_element() {
        let mut w = MetricWindow::new(5);
        w.replace(vec![sample(1.0), sample(2.0), sample(3.0)]);
        assert_eq!(w.latest().cpu, 3.0);

        w.replace(Vec::new());
        assert_eq!(w.latest(), MetricSample::default());
    }

    #[test]
    fn latest_on_empty_window_is_zero_default() {
        let w = MetricWindow::new(8);
        let latest = w.latest();
        assert_eq!(latest.cpu, 0.0);
        assert_eq!(latest.network_in, 0.0);
        assert!(latest.timestamp.is_empty());
    }

    #[test]
    fn chart_points_pads_to_two_without_mutating_window() {
        let mut w = MetricWindow::new(8);

        let points = w.chart_points();
        assert_eq!(points.len(), 2);
        assert!(w.is_empty());

        w.push(sample(5.0));
        let points = w.chart_points();
        assert_eq!(points.len(), 2);
        // Padding goes to the front; the real sample stays last.
        assert_eq!(points[0].cpu, 0.0);
        assert_eq!(points[1].cpu, 5.0);
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn chart_points_full_window_is_unpadded() {
        let mut w = MetricWindow::new(3);
        for i in 0..3 {
            w.push(sample(i as f64));
        }
        assert_eq!(w.chart_points().len(), 3);
    }
}
