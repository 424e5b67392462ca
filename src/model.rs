//! Static model: alphabet, quantized frequencies and spread table.

use log::debug;

use crate::alphabet::{AlphabetMapper, Symbol};
use crate::config::CoderConfig;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::spread::SpreadTable;

/// Everything the coder needs, built once from a full pass over a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model<R> {
    config: CoderConfig,
    alphabet: AlphabetMapper<R>,
    frequencies: FrequencyTable,
    spread: SpreadTable,
}

/// Build a [`Model`] for `message` under `config`.
///
/// Deterministic for a fixed configuration.
///
/// # Errors
/// - `Error::InvalidConfig` if `config` fails validation.
/// - `Error::EmptyMessage` if `message` is empty.
/// - `Error::AlphabetOverflow` if `message` has more distinct values than
///   `config.max_alphabet_size`.
/// - `Error::DegenerateFrequency` if `config.quantization` is smaller than
///   the number of distinct values.
pub fn build_model<R: Copy + Ord>(message: &[R], config: &CoderConfig) -> Result<Model<R>> {
    Model::new(message, config)
}

impl<R: Copy + Ord> Model<R> {
    /// See [`build_model`].
    pub fn new(message: &[R], config: &CoderConfig) -> Result<Self> {
        config.validate()?;
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let alphabet = AlphabetMapper::new(message, config.max_alphabet_size)?;
        let symbols = alphabet.map_message(message)?;
        let frequencies =
            FrequencyTable::from_symbols(&symbols, alphabet.len(), config.quantization)?;
        let spread = SpreadTable::from_frequencies(&frequencies);

        debug!(
            "built model: {} symbols over {} values, m = {}",
            alphabet.len(),
            message.len(),
            config.quantization
        );

        Ok(Self {
            config: *config,
            alphabet,
            frequencies,
            spread,
        })
    }

    /// Assemble a model from separately built parts.
    ///
    /// The spread table is taken as given; the decoder checks every slot it
    /// reads.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if `config` fails validation, or if the
    ///   frequency table's width differs from `config.quantization`.
    /// - `Error::UnknownSymbol` if the alphabet and frequency table disagree
    ///   on the number of symbols.
    pub fn from_parts(
        config: CoderConfig,
        alphabet: AlphabetMapper<R>,
        frequencies: FrequencyTable,
        spread: SpreadTable,
    ) -> Result<Self> {
        config.validate()?;
        if frequencies.quantization() != config.quantization {
            return Err(Error::InvalidConfig(
                "frequency table width differs from configured quantization",
            ));
        }
        if frequencies.num_symbols() != alphabet.len() {
            return Err(Error::UnknownSymbol {
                symbol: frequencies.num_symbols().saturating_sub(1),
                num_symbols: alphabet.len(),
            });
        }
        Ok(Self {
            config,
            alphabet,
            frequencies,
            spread,
        })
    }

    /// Map raw values to symbol indices.
    ///
    /// # Errors
    /// Returns `Error::UnknownValue` for a value outside the alphabet.
    pub fn map_message(&self, message: &[R]) -> Result<Vec<Symbol>> {
        self.alphabet.map_message(message)
    }
}

impl<R> Model<R> {
    /// Configuration the model was built with.
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Raw value to symbol mapping.
    pub fn alphabet(&self) -> &AlphabetMapper<R> {
        &self.alphabet
    }

    /// Counts, quantized frequencies and bases.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Slot to symbol table.
    pub fn spread(&self) -> &SpreadTable {
        &self.spread
    }

    /// Number of symbols.
    pub fn num_symbols(&self) -> usize {
        self.frequencies.num_symbols()
    }

    /// Quantization width `m`.
    pub fn quantization(&self) -> u32 {
        self.config.quantization
    }

    /// Information content, in bits, of the modelled message under the
    /// quantized frequencies: `sum(count_i * log2(m / ls_i))`.
    ///
    /// The final coder state has roughly this many bits.
    pub fn entropy_bits(&self) -> f64 {
        let m = self.quantization() as f64;
        self.frequencies
            .counts()
            .iter()
            .zip(self.frequencies.freqs())
            .map(|(&count, &freq)| count as f64 * (m / freq as f64).log2())
            .sum()
    }
}
