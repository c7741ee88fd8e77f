//! Pinch-to-zoom tracking for the waveform view.
//!
//! Zoom is stepped, not continuous: every time the finger span changes by
//! more than the threshold one zoom level is applied and the span re-bases.

/// Zoom step requested by a pinch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinchZoom {
    In,
    Out,
}

/// Horizontal distance between two touch points
pub fn pinch_span(x0: f32, x1: f32) -> f32 {
    (x1 - x0).abs()
}

/// Tracks the span of an in-progress two-finger gesture
#[derive(Debug, Clone, Copy)]
pub struct PinchTracker {
    /// Span at gesture start or at the last emitted zoom step
    base_span: Option<f32>,
    threshold: f32,
}

impl PinchTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            base_span: None,
            threshold: threshold.abs(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.base_span.is_some()
    }

    /// Second finger down
    pub fn begin(&mut self, span: f32) {
        self.base_span = Some(span.abs());
    }

    /// Fingers moved. Returns a zoom step once the span has grown or shrunk
    /// past the threshold.
    pub fn update(&mut self, span: f32) -> Option<PinchZoom> {
        let base = self.base_span?;
        let span = span.abs();
        let step = if span - base > self.threshold {
            PinchZoom::In
        } else if base - span > self.threshold {
            PinchZoom::Out
        } else {
            return None;
        };
        self.base_span = Some(span);
        Some(step)
    }

    pub fn end(&mut self) {
        self.base_span = None;
    }
}
