//! # Loveless Lookback — A Plain Digital Delay (AU/VST3/CLAP)
//!
//! A single-tap delay built with [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! The input is folded down to mono, pushed into a circular buffer, and the
//! output is whatever was in that buffer a chosen number of seconds ago.
//! No feedback, no filtering, no interpolation: just the ring buffer.
//!
//! ## Layout
//!
//! - `dsp::delay_line` — the ring buffer and its time-to-index math.
//! - `processor` — the per-frame algorithm, independent of any plugin
//!   framework so it can be tested on its own.
//! - `params` — the knobs the host sees and saves.
//! - this file — the nih-plug shell that wires host callbacks to the
//!   processor.
//!
//! ## Signal Flow
//!
//! ```text
//! In L ──┐                                                   ┌──► Out L
//!        ├──► (L + R) / 2 ──► [Delay Line] ──► read(delay) ──┤
//! In R ──┘                                                   └──► Out R
//! ```

mod dsp;
mod params;
mod processor;

use std::num::NonZeroU32;
use std::sync::Arc;

use nih_plug::prelude::*;
use params::{DelayParams, MAX_DELAY_SECONDS};
use processor::DelayProcessor;

/// The widest frame any of our `AUDIO_IO_LAYOUTS` can hand us.
const MAX_CHANNELS: usize = 2;

/// The main plugin struct.
///
/// Parameters are shared with the host through an `Arc` and may be read
/// from any thread. The processor (and the delay line inside it) belongs
/// to the audio thread alone: nih-plug only touches it through `&mut self`
/// in `initialize()` and `process()`, which never overlap, so no locking is
/// needed.
pub struct LovelessLookback {
    params: Arc<DelayParams>,
    processor: DelayProcessor,
}

impl Default for LovelessLookback {
    fn default() -> Self {
        Self {
            params: Arc::new(DelayParams::default()),
            // Unallocated until initialize() knows the sample rate.
            processor: DelayProcessor::new(),
        }
    }
}

impl Plugin for LovelessLookback {
    const NAME: &'static str = "Loveless Lookback";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // The host picks the first layout that matches the track. Input and
    // output always have the same channel count.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Called when the plugin is loaded and whenever the audio
    /// configuration changes. Never runs at the same time as `process()`.
    ///
    /// This is the only place the delay line is (re)allocated. It is sized
    /// for the *end* of the delay knob's range, not its current value,
    /// because the buffer can't grow while audio is running.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let sample_rate = buffer_config.sample_rate;

        match self.processor.prepare(sample_rate, MAX_DELAY_SECONDS) {
            Ok(()) => {
                nih_log!(
                    "Delay line sized to {} samples ({} s at {} Hz)",
                    self.processor.delay_line().capacity(),
                    MAX_DELAY_SECONDS,
                    self.processor.sample_rate()
                );
                true
            }
            Err(err) => {
                // Returning false makes the host refuse this configuration
                // instead of calling process() on an unallocated line.
                nih_error!("Could not allocate the delay line: {}", err);
                false
            }
        }
    }

    /// One pass over the host's buffer, one frame at a time.
    ///
    /// Each channel's sample is copied into a small stack array so the
    /// processor can see the whole frame at once, then the result is
    /// copied back. Nothing here allocates.
    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        for mut channel_samples in buffer.iter_samples() {
            let delay_seconds = self.params.delay_time.smoothed.next();

            let mut frame = [0.0_f32; MAX_CHANNELS];
            let num_channels = channel_samples.len().min(MAX_CHANNELS);
            for (slot, sample) in frame.iter_mut().zip(channel_samples.iter_mut()) {
                *slot = *sample;
            }

            self.processor
                .process_frame(&mut frame[..num_channels], delay_seconds);

            for (sample, slot) in channel_samples.iter_mut().zip(frame.iter()) {
                *sample = *slot;
            }
        }

        // Keep getting called after the input stops, long enough for the
        // echo to come out.
        let tail = self.processor.tail_samples(self.params.delay_time.value());
        ProcessStatus::Tail(tail)
    }
}

impl ClapPlugin for LovelessLookback {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-lookback";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A plain single-tap digital delay with no interpolation");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Delay,
    ];
}

impl Vst3Plugin for LovelessLookback {
    // Exactly 16 ASCII bytes.
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssLookback001";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Delay];
}

nih_export_clap!(LovelessLookback);
nih_export_vst3!(LovelessLookback);

// AUv2 entry point for Logic Pro, generated from the CLAP export.
clap_wrapper::export_auv2!();
