//! # Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets you read them back from some
//! time in the past. Every time-based effect is built on one.
//!
//! ## How a Ring Buffer Works
//!
//! Picture a circular tape loop with a single write head. Each incoming
//! sample is recorded on top of the *oldest* sample on the tape, and the
//! head moves forward by one slot. When it reaches the end of the tape it
//! jumps back to the start.
//!
//! In code, the tape is a `Vec<f32>` and the head is `write_index`:
//!
//! ```text
//!   capacity N = 5, after writing 1, 2, 3, 4, 5, 6
//!
//!   slot:     0    1    2    3    4
//!   value:  [ 6 ][ 2 ][ 3 ][ 4 ][ 5 ]
//!                  ▲
//!             write_index (oldest sample, next to be overwritten)
//! ```
//!
//! The most recent sample always sits just *behind* the write head, at
//! `write_index - 1`. Reading "`k` samples ago" means stepping `k` slots
//! further back, wrapping to the end of the buffer when we fall off the
//! front.
//!
//! ## Time to Index
//!
//! Callers think in seconds, the buffer thinks in slots:
//!
//! ```text
//! offset = seconds_ago * sample_rate
//! pos    = (write_index - 1) - offset      (+ N if negative)
//! index  = trunc(pos)
//! ```
//!
//! The sample rate is passed on every read rather than cached, so the
//! conversion stays correct if the host changes rate between processing
//! passes.
//!
//! ## No Interpolation
//!
//! When `offset` isn't a whole number, the position is simply truncated to
//! the slot below it. Sweeping the delay time therefore steps from sample to
//! sample instead of gliding, which is audible as zipper noise on
//! automation. This is a known limitation of this delay line.

use nih_plug::prelude::*;
use thiserror::Error;

/// Reasons [`DelayLine::allocate()`] can refuse to size the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AllocateError {
    /// The maximum delay time was zero, negative, NaN or infinite.
    #[error("maximum delay time must be a positive, finite number of seconds (got {0})")]
    InvalidSeconds(f32),

    /// The sample rate was zero, negative, NaN or infinite.
    #[error("sample rate must be a positive, finite number of Hz (got {0})")]
    InvalidSampleRate(f32),

    /// `seconds * sample_rate` samples would not fit in memory.
    #[error("{seconds} s at {sample_rate} Hz needs more samples than can be allocated")]
    CapacityOverflow { seconds: f32, sample_rate: f32 },
}

/// A single-channel circular delay buffer.
///
/// Starts out *unallocated* (capacity 0). [`allocate()`](Self::allocate)
/// must be called once, with the longest delay the caller will ever ask
/// for, before any [`write()`](Self::write) or [`read()`](Self::read).
/// After that the buffer never grows, so nothing on the audio thread ever
/// allocates memory.
#[derive(Debug, Default)]
pub struct DelayLine {
    /// The stored samples. Empty until allocated; zero (silence) right
    /// after allocation.
    buffer: Vec<f32>,

    /// The slot that receives the next written sample. This is one past
    /// the most recent sample, and also the oldest retained sample once the
    /// buffer has been filled.
    write_index: usize,
}

impl DelayLine {
    /// Create an unallocated delay line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the buffer to hold `seconds` of audio at `sample_rate`.
    ///
    /// The capacity is `floor(seconds * sample_rate) + 1` samples. The extra
    /// slot is what lets a read of exactly `seconds` ago still land on a
    /// retained sample.
    ///
    /// Calling this again is a destructive reset: the old contents are
    /// discarded, the buffer is refilled with silence and the write index
    /// goes back to 0. On error the delay line is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Both arguments must be positive and finite, and the resulting
    /// capacity must be allocatable.
    pub fn allocate(&mut self, seconds: f32, sample_rate: f32) -> Result<(), AllocateError> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(AllocateError::InvalidSeconds(seconds));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AllocateError::InvalidSampleRate(sample_rate));
        }

        // Same f32 product that `read()` computes, so a line sized for
        // `seconds` can always serve a read of exactly `seconds` ago.
        let frames = (seconds * sample_rate).floor();
        let max_frames = (isize::MAX as usize / std::mem::size_of::<f32>()) - 1;
        if frames >= max_frames as f32 {
            return Err(AllocateError::CapacityOverflow {
                seconds,
                sample_rate,
            });
        }

        let capacity = frames as usize + 1;
        self.buffer.clear();
        self.buffer.resize(capacity, 0.0);
        self.write_index = 0;

        Ok(())
    }

    /// Number of samples the buffer holds. 0 while unallocated.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_allocated(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// The longest `seconds_ago` that [`read()`](Self::read) can honour at
    /// `sample_rate`, i.e. `(capacity() - 1) / sample_rate`.
    ///
    /// Offsets between `capacity() - 1` and `capacity()` samples are still
    /// accepted by `read()` but land on the same oldest sample.
    pub fn max_delay_seconds(&self, sample_rate: f32) -> f32 {
        match self.buffer.len() {
            0 => 0.0,
            len => (len - 1) as f32 / sample_rate,
        }
    }

    /// Store one sample, evicting the oldest one.
    ///
    /// The new sample overwrites the slot at `write_index`, which always
    /// holds the oldest sample, and the index moves forward by one,
    /// wrapping back to 0 at the end of the buffer.
    ///
    /// Writing to an unallocated delay line is a programming error. Debug
    /// builds panic; release builds drop the sample.
    pub fn write(&mut self, value: f32) {
        debug_assert!(self.is_allocated(), "write to an unallocated delay line");

        let len = self.buffer.len();
        if let Some(slot) = self.buffer.get_mut(self.write_index) {
            *slot = value;

            self.write_index += 1;
            if self.write_index >= len {
                self.write_index = 0;
            }
        }
    }

    /// Read the sample that was written `seconds_ago` seconds before the
    /// most recent one.
    ///
    /// `read(0.0, sr)` returns the sample from the last `write()`.
    /// Fractional sample positions are truncated, never interpolated.
    ///
    /// # Out-of-range requests
    ///
    /// The delay must fit in the buffer: `seconds_ago * sample_rate` has to
    /// be less than `capacity()`. Anything past `capacity() - 1` samples is
    /// clamped to the oldest retained sample, and negative (or NaN) offsets
    /// to the most recent one. Debug builds log requests of `capacity()`
    /// samples or more. The audio keeps flowing either way.
    ///
    /// Reading from an unallocated delay line is a programming error. Debug
    /// builds panic; release builds return silence.
    pub fn read(&self, seconds_ago: f32, sample_rate: f32) -> f32 {
        debug_assert!(self.is_allocated(), "read from an unallocated delay line");

        let len = self.buffer.len();
        if len == 0 {
            return 0.0;
        }

        let max_offset = (len - 1) as f32;
        let offset = seconds_ago * sample_rate;
        nih_debug_assert!(
            offset < len as f32,
            "delay of {} s at {} Hz exceeds the {} sample buffer, clamping",
            seconds_ago,
            sample_rate,
            len
        );
        // `f32::max` returns the non-NaN operand, so NaN ends up at 0.
        let offset = offset.max(0.0).min(max_offset);

        // One behind the write index is the most recent sample. Since
        // `offset <= len - 1`, a single wrap is always enough.
        let mut pos = (self.write_index as f32 - 1.0) - offset;
        if pos < 0.0 {
            pos += len as f32;
        }

        // Truncate toward zero. The `min` only matters when `pos` was a hair
        // below zero and adding `len` rounded up to exactly `len`.
        let index = (pos as usize).min(len - 1);
        self.buffer[index]
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
