/// Circular delay line with integer and fractional reads.
///
/// The buffer is sized once at construction; reads and writes never allocate.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(2)],
            write_pos: 0,
        }
    }

    /// Sized for `max_seconds` at `sample_rate`, plus interpolation headroom.
    pub fn with_duration(max_seconds: f32, sample_rate: f32) -> Self {
        Self::new((max_seconds * sample_rate).ceil() as usize + 2)
    }

    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Sample written `delay` samples ago (1 = most recent write).
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.clamp(1, len - 1);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Linearly interpolated read for modulated delay times.
    pub fn read_interpolated(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay.clamp(1.0, (len - 2) as f32);
        let whole = delay.floor() as usize;
        let frac = delay - whole as f32;

        let a = self.read(whole);
        let b = self.read(whole + 1);
        a + (b - a) * frac
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_comes_back_after_delay() {
        let mut line = DelayLine::new(16);
        let mut out = Vec::new();
        for i in 0..6 {
            out.push(line.read(4));
            line.write(if i == 0 { 1.0 } else { 0.0 });
        }

        assert_eq!(out[4], 1.0);
        assert!(out.iter().enumerate().all(|(i, &s)| i == 4 || s == 0.0));
    }

    #[test]
    fn test_interpolated_read_blends_neighbours() {
        let mut line = DelayLine::new(8);
        line.write(1.0);
        line.write(0.0);

        // delay 1 -> 0.0, delay 2 -> 1.0
        assert!((line.read_interpolated(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut line = DelayLine::new(8);
        line.write(0.7);
        line.reset();
        assert_eq!(line.read(1), 0.0);
    }
}
