//! Spread table: slot index to owning symbol.
//!
//! Slot `j` belongs to the symbol whose quantized range `[bs, bs + ls)`
//! contains `j`. Built from a [`FrequencyTable`] the table covers all of
//! `[0, m)`.

use crate::alphabet::Symbol;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Inverse cumulative distribution over the `m` quantization slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpreadTable {
    slots: Vec<Option<Symbol>>,
}

impl SpreadTable {
    /// Assign every slot of `freqs`' quantization range to its owning symbol.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Self {
        let mut slots = vec![None; freqs.quantization() as usize];
        for (symbol, (&base, &freq)) in freqs.bases().iter().zip(freqs.freqs()).enumerate() {
            let start = base as usize;
            slots[start..start + freq as usize].fill(Some(symbol as Symbol));
        }
        Self { slots }
    }

    /// Wrap a table assigned elsewhere, e.g. one received alongside a state.
    ///
    /// Unassigned slots are `None`; decoding through them fails with
    /// `Error::InvalidSlot`.
    pub fn from_slots(slots: Vec<Option<Symbol>>) -> Self {
        Self { slots }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Owner of `slot`, if any.
    pub fn get(&self, slot: u32) -> Option<Symbol> {
        self.slots.get(slot as usize).copied().flatten()
    }

    /// Owner of `slot`.
    ///
    /// # Errors
    /// Returns `Error::InvalidSlot` if `slot` is out of range or unassigned.
    pub fn lookup(&self, slot: u32) -> Result<Symbol> {
        self.get(slot).ok_or(Error::InvalidSlot {
            slot,
            quantization: self.slots.len() as u32,
        })
    }

    /// Whether every slot has an owner.
    pub fn is_total(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of slots owned by each of the first `num_symbols` symbols.
    pub fn slot_counts(&self, num_symbols: usize) -> Vec<u32> {
        let mut counts = vec![0u32; num_symbols];
        for symbol in self.slots.iter().flatten() {
            if let Some(count) = counts.get_mut(*symbol as usize) {
                *count += 1;
            }
        }
        counts
    }
}
