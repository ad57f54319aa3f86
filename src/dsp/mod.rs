//! # DSP (Digital Signal Processing) Primitives
//!
//! - **`delay_line`**: A ring buffer that stores past audio samples and
//!   hands them back from a given number of seconds ago. Everything else
//!   in the plugin is plumbing around it.

pub mod delay_line;
