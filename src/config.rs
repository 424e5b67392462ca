//! Coder configuration.
//!
//! Both knobs are passed into model construction explicitly, so models with
//! different widths can coexist in one process.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default quantization width `m`.
pub const DEFAULT_QUANTIZATION: u32 = 512;

/// Largest supported quantization width. The spread table holds one `Option<u8>` (two bytes) per slot.
pub const MAX_QUANTIZATION: u32 = 1 << 24;

/// Largest supported alphabet; symbol indices are stored as `u8`.
pub const MAX_ALPHABET_SIZE: usize = 256;

/// Parameters for building a [`Model`](crate::Model).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoderConfig {
    /// Quantization width `m`. Must be a power of two in `[1, MAX_QUANTIZATION]`.
    pub quantization: u32,
    /// Maximum number of distinct raw values, in `[1, MAX_ALPHABET_SIZE]`.
    pub max_alphabet_size: usize,
}

impl CoderConfig {
    /// Create a configuration with the default width (512) and alphabet size (256).
    pub fn new() -> Self {
        Self {
            quantization: DEFAULT_QUANTIZATION,
            max_alphabet_size: MAX_ALPHABET_SIZE,
        }
    }

    /// Set the quantization width `m`.
    pub fn with_quantization(mut self, quantization: u32) -> Self {
        self.quantization = quantization;
        self
    }

    /// Set the alphabet capacity.
    pub fn with_max_alphabet_size(mut self, max_alphabet_size: usize) -> Self {
        self.max_alphabet_size = max_alphabet_size;
        self
    }

    /// Check that both values are within bounds.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` naming the first violated bound.
    pub fn validate(&self) -> Result<()> {
        if !self.quantization.is_power_of_two() {
            return Err(Error::InvalidConfig("quantization must be a power of two"));
        }
        if self.quantization > MAX_QUANTIZATION {
            return Err(Error::InvalidConfig("quantization exceeds 2^24"));
        }
        if self.max_alphabet_size == 0 || self.max_alphabet_size > MAX_ALPHABET_SIZE {
            return Err(Error::InvalidConfig("max_alphabet_size must be in 1..=256"));
        }
        Ok(())
    }

    /// `log2(m)`; the encoder multiplies and the decoder divides by `m` with shifts.
    pub fn quantization_bits(&self) -> u32 {
        self.quantization.trailing_zeros()
    }
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
