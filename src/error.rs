//! Error types for the arbitrary-precision rANS coder.

use thiserror::Error;

/// Error variants for model construction and coding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The message uses more distinct raw values than the alphabet can hold.
    #[error("alphabet overflow: {distinct} distinct values exceed capacity {capacity}")]
    AlphabetOverflow {
        /// Number of distinct raw values observed.
        distinct: usize,
        /// Configured maximum alphabet size.
        capacity: usize,
    },

    /// A present symbol cannot be given a nonzero share of the quantization slots.
    #[error("degenerate frequency: {symbols} symbols cannot share {quantization} slots")]
    DegenerateFrequency {
        /// Number of symbols in the alphabet.
        symbols: usize,
        /// Quantization width `m`.
        quantization: u32,
    },

    /// Decoding hit a slot with no valid owning symbol.
    #[error("invalid slot {slot} for quantization width {quantization}")]
    InvalidSlot {
        /// Slot index `x mod m`.
        slot: u32,
        /// Quantization width `m`.
        quantization: u32,
    },

    /// An encoder sub-range is empty or does not fit the quantization width.
    #[error("invalid range: base {cum_freq} + freq {freq} over {quantization} slots")]
    InvalidRange {
        /// Cumulative base of the range.
        cum_freq: u32,
        /// Width of the range.
        freq: u32,
        /// Quantization width `m`.
        quantization: u64,
    },

    /// A configuration value is out of bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A model cannot be built from an empty message.
    #[error("cannot build a model from an empty message")]
    EmptyMessage,

    /// A raw value was never observed when the alphabet was built.
    #[error("raw value is not part of the alphabet")]
    UnknownValue,

    /// A symbol index lies outside the model's alphabet.
    #[error("unknown symbol {symbol} (alphabet has {num_symbols} symbols)")]
    UnknownSymbol {
        /// The offending symbol index.
        symbol: usize,
        /// Number of symbols in the alphabet.
        num_symbols: usize,
    },
}

/// A specialized Result type for rANS operations.
pub type Result<T> = std::result::Result<T, Error>;
