/// Receives every rendered stereo block after the effects rack.
///
/// Implementations must not block: they run on the render path.
pub trait OutputSink: Send {
    fn consume(&mut self, left: &[f32], right: &[f32]);
}

/// Interleaves blocks into an rtrb ring, dropping samples when it is full.
impl OutputSink for rtrb::Producer<f32> {
    fn consume(&mut self, left: &[f32], right: &[f32]) {
        for (&l, &r) in left.iter().zip(right) {
            if self.slots() < 2 {
                return;
            }
            let _ = self.push(l);
            let _ = self.push(r);
        }
    }
}

/// Keeps the peak absolute level seen so far. Handy for metering and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeakMeter {
    pub peak: f32,
}

impl OutputSink for PeakMeter {
    fn consume(&mut self, left: &[f32], right: &[f32]) {
        for &s in left.iter().chain(right) {
            self.peak = self.peak.max(s.abs());
        }
    }
}
