//! Progress reporting for long analyses

/// Receives progress while an analysis consumes its input
///
/// Positions are sample offsets into the analyzed block, increasing
/// monotonically from 0 towards the range set by [`set_range`](Self::set_range).
pub trait ProgressSink {
    fn set_range(&mut self, total: usize);
    fn set_value(&mut self, current: usize);
    fn reset(&mut self);
}

/// Sink that ignores all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_range(&mut self, _total: usize) {}
    fn set_value(&mut self, _current: usize) {}
    fn reset(&mut self) {}
}
