use crate::models::{Position3D, TimedSample};

/// Result of appending a sample to a [`HandTrace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// Same timestamp as the newest sample; the newest sample was overwritten.
    Replaced,
    /// Negative, non-finite or older than the newest sample. The trace is unchanged.
    Rejected,
}

impl AppendOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, AppendOutcome::Rejected)
    }
}

/// Time-ordered positions of one hand, from creation to destruction.
///
/// Timestamps are relative to the first sample, which is always at `0.0`.
/// Detectors only look at the last two entries.
#[derive(Debug, Clone, Default)]
pub struct HandTrace {
    samples: Vec<TimedSample>,
}

impl HandTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, time: f32, position: Position3D) -> AppendOutcome {
        if !time.is_finite() || time < 0.0 || !position.is_finite() {
            return AppendOutcome::Rejected;
        }

        match self.samples.last_mut() {
            Some(last) if time < last.time => AppendOutcome::Rejected,
            Some(last) if time == last.time => {
                last.position = position;
                AppendOutcome::Replaced
            }
            _ => {
                self.samples.push(TimedSample::new(time, position));
                AppendOutcome::Appended
            }
        }
    }

    pub fn last(&self) -> Option<&TimedSample> {
        self.samples.last()
    }

    pub fn second_last(&self) -> Option<&TimedSample> {
        self.samples.len().checked_sub(2).map(|idx| &self.samples[idx])
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
