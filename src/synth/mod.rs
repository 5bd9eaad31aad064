//! This namespace contains all the parts converting from note data to wave data.

pub mod envelope;
pub mod oscillator;
pub mod tuning;

pub use envelope::{Envelope, ADSR};
pub use oscillator::WaveShape;
pub use tuning::{note_frequency, Tuning};

/// Number of samples per second unless stated otherwise (CD quality).
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Amplitude of freshly generated tones.
pub const DEFAULT_AMPLITUDE: f64 = 0.8;
