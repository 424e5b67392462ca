//! Alphabet mapping.
//!
//! Collapses a sparse set of raw values into dense symbol indices
//! `0..num_symbols`, assigned in ascending raw order, and back.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::MAX_ALPHABET_SIZE;
use crate::error::{Error, Result};

/// Dense symbol index.
pub type Symbol = u8;

/// Bijection between the observed raw values and symbol indices.
///
/// Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphabetMapper<R> {
    raw_to_symbol: BTreeMap<R, Symbol>,
    symbol_to_raw: Vec<R>,
}

impl<R: Copy + Ord> AlphabetMapper<R> {
    /// Build the mapping from every value that occurs in `message`.
    ///
    /// `capacity` is clamped to [`MAX_ALPHABET_SIZE`].
    ///
    /// # Errors
    /// Returns `Error::AlphabetOverflow` if `message` holds more than
    /// `capacity` distinct values.
    pub fn new(message: &[R], capacity: usize) -> Result<Self> {
        let capacity = capacity.min(MAX_ALPHABET_SIZE);
        let present: BTreeSet<R> = message.iter().copied().collect();
        if present.len() > capacity {
            return Err(Error::AlphabetOverflow {
                distinct: present.len(),
                capacity,
            });
        }

        // BTreeSet iterates in ascending order, which fixes the assignment.
        let symbol_to_raw: Vec<R> = present.into_iter().collect();
        let raw_to_symbol = symbol_to_raw
            .iter()
            .enumerate()
            .map(|(symbol, &raw)| (raw, symbol as Symbol))
            .collect();

        Ok(Self {
            raw_to_symbol,
            symbol_to_raw,
        })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbol_to_raw.len()
    }

    /// Whether no value was observed.
    pub fn is_empty(&self) -> bool {
        self.symbol_to_raw.is_empty()
    }

    /// Symbol index of `raw`, or `None` if it was never observed.
    pub fn to_symbol(&self, raw: R) -> Option<Symbol> {
        self.raw_to_symbol.get(&raw).copied()
    }

    /// Raw value of `symbol`, or `None` if it lies outside the alphabet.
    pub fn to_raw(&self, symbol: Symbol) -> Option<R> {
        self.symbol_to_raw.get(symbol as usize).copied()
    }

    /// Observed raw values, indexed by symbol.
    pub fn values(&self) -> &[R] {
        &self.symbol_to_raw
    }

    /// Map a whole message to symbol indices.
    ///
    /// # Errors
    /// Returns `Error::UnknownValue` for a value outside the alphabet.
    pub fn map_message(&self, message: &[R]) -> Result<Vec<Symbol>> {
        message
            .iter()
            .map(|&raw| self.to_symbol(raw).ok_or(Error::UnknownValue))
            .collect()
    }

    /// Map symbol indices back to raw values.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` for an index outside the alphabet.
    pub fn unmap_symbols(&self, symbols: &[Symbol]) -> Result<Vec<R>> {
        symbols
            .iter()
            .map(|&symbol| {
                self.to_raw(symbol).ok_or(Error::UnknownSymbol {
                    symbol: symbol as usize,
                    num_symbols: self.len(),
                })
            })
            .collect()
    }
}
