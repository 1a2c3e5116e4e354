use heapless::{Deque, Vec};

use crate::consts::{CHART_POINTS, EMA_ALPHA, SPEED_BATCH};

/// What falls out of a completed sample batch.
#[derive(Debug, PartialEq)]
pub struct BatchUpdate {
    /// Batch mean, still pre-scaled (knots x 10), ready for the chart.
    pub chart_point: i32,
    /// Smoothed speed in knots for the average-speed label.
    pub label_value: f32,
}

/// Two-stage filter: decimate raw samples in batches of ten, then run
/// an exponential moving average over the batch means. The first
/// stage kills GPS jitter, the second keeps the label from
/// flickering.
#[derive(Default)]
pub struct SpeedFilter {
    samples: Vec<i32, SPEED_BATCH>,
    smoothed: Option<f32>,
}

impl SpeedFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one pre-scaled sample (knots x 10). Returns the batch
    /// update when this sample completes a batch; the accumulator is
    /// empty again afterwards.
    pub fn push(&mut self, sample: i32) -> Option<BatchUpdate> {
        self.samples.push(sample).ok();
        if self.samples.len() < SPEED_BATCH {
            return None;
        }
        let mean = self.samples.iter().sum::<i32>() as f32 / SPEED_BATCH as f32;
        let smoothed = match self.smoothed {
            None => mean,
            Some(prev) => EMA_ALPHA * mean + (1.0 - EMA_ALPHA) * prev,
        };
        self.smoothed = Some(smoothed);
        self.samples.clear();
        Some(BatchUpdate {
            chart_point: mean as i32,
            label_value: smoothed / 10.0,
        })
    }

    /// Smoothed speed, still pre-scaled. None until the first batch
    /// completes.
    pub fn smoothed(&self) -> Option<f32> {
        self.smoothed
    }

    pub fn pending(&self) -> usize {
        self.samples.len()
    }
}

/// Bounded chart history; the oldest point falls off once the series
/// is at capacity.
pub struct ChartSeries {
    points: Deque<i32, CHART_POINTS>,
}

impl ChartSeries {
    pub fn new() -> Self {
        Self {
            points: Deque::new(),
        }
    }

    pub fn push(&mut self, value: i32) {
        if self.points.is_full() {
            self.points.pop_front();
        }
        // cannot fail, there is room now
        let _ = self.points.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<i32> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().copied()
    }
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self::new()
    }
}
