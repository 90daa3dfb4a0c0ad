/// Sink for progress of long-running passes (file ingest, lane grouping,
/// regex filtering).
///
/// Passes call it cooperatively from the control thread; a host can use the
/// callbacks to pump its UI loop. Every pass accepts `Option<&mut dyn
/// Progress>` so headless callers simply pass `None`.
pub trait Progress {
    fn reset(&mut self);
    fn set_range(&mut self, min: u64, max: u64);
    fn set_value(&mut self, value: u64);
}
