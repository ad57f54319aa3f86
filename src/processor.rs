//! # Delay Processor
//!
//! The glue between the host's audio callbacks and the [`DelayLine`]. It
//! knows nothing about nih-plug: the plugin shell in `lib.rs` hands it plain
//! numbers and slices, which keeps the whole per-sample algorithm testable
//! without a DAW.
//!
//! For each frame (one sample per channel, all at the same instant):
//!
//! ```text
//!  L ──┐
//!      ├─► (L + R) / 2 ──► write ──► [Delay Line] ──► read(delay) ──┬──► L
//!  R ──┘                                                            └──► R
//! ```
//!
//! The write always happens before the read, so a delay of 0 seconds hears
//! the sample that was just written.

use crate::dsp::delay_line::{AllocateError, DelayLine};

/// Owns the delay line and the sample rate it was sized for.
#[derive(Debug)]
pub struct DelayProcessor {
    delay_line: DelayLine,

    /// Operating sample rate in Hz, from the last successful `prepare()`.
    sample_rate: f32,
}

impl Default for DelayProcessor {
    fn default() -> Self {
        Self {
            delay_line: DelayLine::new(),
            // Placeholder until the host calls prepare().
            sample_rate: 44100.0,
        }
    }
}

impl DelayProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get ready to process audio at `sample_rate`.
    ///
    /// `max_delay_seconds` must be the longest delay that will ever be
    /// passed to [`process_frame()`](Self::process_frame), since the buffer
    /// can't grow later. Any audio already in the delay line is discarded.
    ///
    /// Nothing changes if the arguments are rejected.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_delay_seconds: f32,
    ) -> Result<(), AllocateError> {
        self.delay_line.allocate(max_delay_seconds, sample_rate)?;
        self.sample_rate = sample_rate;

        Ok(())
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.delay_line
    }

    /// Run one frame through the delay, in place.
    ///
    /// All channels are averaged into one sample, which goes into the delay
    /// line. The sample from `delay_seconds` ago then replaces every
    /// channel. An empty frame is ignored and doesn't advance the line.
    pub fn process_frame(&mut self, frame: &mut [f32], delay_seconds: f32) {
        if frame.is_empty() {
            return;
        }

        let mono = frame.iter().sum::<f32>() / frame.len() as f32;
        self.delay_line.write(mono);

        let delayed = self.delay_line.read(delay_seconds, self.sample_rate);
        frame.fill(delayed);
    }

    /// How many samples of output remain after the input goes silent.
    ///
    /// Without feedback there is exactly one echo, so the tail is one delay
    /// period (capped at what the buffer can hold).
    pub fn tail_samples(&self, delay_seconds: f32) -> u32 {
        let max = self.delay_line.max_delay_seconds(self.sample_rate);
        (delay_seconds.max(0.0).min(max) * self.sample_rate) as u32
    }
}
