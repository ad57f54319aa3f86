//! # Plugin Parameters
//!
//! Parameters are the knobs the user sees in the DAW. Each one has a
//! **stable string ID** (`#[id = "..."]`) that the host uses to save and
//! recall sessions and presets, so once published the IDs must never
//! change.
//!
//! nih-plug serializes every parameter into the plugin state, so both
//! `gain` and `delay` are saved with the project and restored when it is
//! reopened. The contents of the delay buffer are never saved.

use nih_plug::prelude::*;

/// Longest delay the **Delay** knob can ask for, in seconds.
///
/// The delay line is sized from this value in `initialize()`, because its
/// buffer can't grow once audio is running.
pub const MAX_DELAY_SECONDS: f32 = 4.0;

#[derive(Params)]
pub struct DelayParams {
    /// **Gain** in decibels.
    ///
    /// Declared so hosts can store and automate it. The delay path itself
    /// runs at unity gain.
    #[id = "gain"]
    pub gain: FloatParam,

    /// **Delay** — how far back in time the output reads, in seconds.
    ///
    /// Range: 0 s (the input, downmixed) to [`MAX_DELAY_SECONDS`].
    /// Default: 0.7 s.
    ///
    /// Because the delay line doesn't interpolate, sweeping this knob
    /// steps through whole samples. The smoother keeps those steps small
    /// rather than letting the read position jump across the buffer.
    #[id = "delay"]
    pub delay_time: FloatParam,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            gain: FloatParam::new(
                "Gain",
                -65.0,
                FloatRange::Linear {
                    min: -65.0,
                    max: -1.0,
                },
            )
            .with_unit(" dB")
            .with_step_size(0.01),

            delay_time: FloatParam::new(
                "Delay",
                0.7,
                FloatRange::Linear {
                    min: 0.0,
                    max: MAX_DELAY_SECONDS,
                },
            )
            .with_unit(" s")
            .with_smoother(SmoothingStyle::Linear(50.0))
            .with_step_size(0.01),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DelayParams::default();

        assert_eq!(params.gain.value(), -65.0);
        assert!((params.delay_time.value() - 0.7).abs() < 1e-6);
    }

    /// The top of the knob's range must match the size the delay line is
    /// allocated for, or the end of the knob would read past the buffer.
    #[test]
    fn test_delay_range_ends_at_max_delay() {
        let params = DelayParams::default();

        assert_eq!(params.delay_time.preview_plain(0.0), 0.0);
        assert_eq!(params.delay_time.preview_plain(1.0), MAX_DELAY_SECONDS);
    }

    #[test]
    fn test_gain_range() {
        let params = DelayParams::default();

        assert_eq!(params.gain.preview_plain(0.0), -65.0);
        assert_eq!(params.gain.preview_plain(1.0), -1.0);
    }
}
