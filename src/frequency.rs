//! Symbol frequencies and their quantization onto `m` slots.
//!
//! Raw counts are scaled so that they sum to exactly `m`. Slot boundaries are
//! placed at `round(cum * m / L)` (with `cum` the running count and `L` the
//! message length), which keeps the sub-ranges contiguous and covering
//! `[0, m)`. Symbols that round to an empty range then take one slot at a
//! time from the currently largest share.

use crate::alphabet::Symbol;
use crate::config::MAX_ALPHABET_SIZE;
use crate::error::{Error, Result};

/// Raw counts, quantized frequencies `ls` and cumulative bases `bs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
    freqs: Vec<u32>,
    bases: Vec<u32>,
    quantization: u32,
}

impl FrequencyTable {
    /// Count each symbol of `symbols` and quantize the counts onto `quantization` slots.
    ///
    /// # Errors
    /// - `Error::AlphabetOverflow` if `num_symbols` exceeds [`MAX_ALPHABET_SIZE`].
    /// - `Error::EmptyMessage` if `symbols` is empty.
    /// - `Error::UnknownSymbol` if a symbol is `>= num_symbols`.
    /// - `Error::DegenerateFrequency` if some symbol in `0..num_symbols` never
    ///   occurs, or if `quantization < num_symbols`.
    pub fn from_symbols(symbols: &[Symbol], num_symbols: usize, quantization: u32) -> Result<Self> {
        check_alphabet_size(num_symbols)?;
        if symbols.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let mut counts = vec![0u64; num_symbols];
        for &symbol in symbols {
            let count = counts
                .get_mut(symbol as usize)
                .ok_or(Error::UnknownSymbol {
                    symbol: symbol as usize,
                    num_symbols,
                })?;
            *count += 1;
        }
        Self::from_counts(counts, quantization)
    }

    /// Quantize precomputed per-symbol counts.
    ///
    /// # Errors
    /// Same conditions as [`FrequencyTable::from_symbols`].
    pub fn from_counts(counts: Vec<u64>, quantization: u32) -> Result<Self> {
        check_alphabet_size(counts.len())?;
        if counts.iter().all(|&c| c == 0) {
            return Err(Error::EmptyMessage);
        }
        let freqs = quantize(&counts, quantization)?;

        let mut bases = Vec::with_capacity(freqs.len());
        let mut acc = 0u32;
        for &freq in &freqs {
            bases.push(acc);
            acc += freq;
        }
        debug_assert_eq!(acc, quantization);

        Ok(Self {
            counts,
            freqs,
            bases,
            quantization,
        })
    }

    /// Number of symbols.
    pub fn num_symbols(&self) -> usize {
        self.freqs.len()
    }

    /// Quantization width `m`.
    pub fn quantization(&self) -> u32 {
        self.quantization
    }

    /// Message length `L`, the sum of the raw counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Raw occurrence counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Quantized frequencies; they sum to `m`.
    pub fn freqs(&self) -> &[u32] {
        &self.freqs
    }

    /// Exclusive prefix sums of [`FrequencyTable::freqs`].
    pub fn bases(&self) -> &[u32] {
        &self.bases
    }

    /// `(base, freq)` of `symbol`.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` if `symbol` lies outside the table.
    pub fn range(&self, symbol: Symbol) -> Result<(u32, u32)> {
        let idx = symbol as usize;
        match (self.bases.get(idx), self.freqs.get(idx)) {
            (Some(&base), Some(&freq)) => Ok((base, freq)),
            _ => Err(Error::UnknownSymbol {
                symbol: idx,
                num_symbols: self.num_symbols(),
            }),
        }
    }
}

// Symbol indices are `u8`; a wider table would alias symbols in the spread table.
fn check_alphabet_size(num_symbols: usize) -> Result<()> {
    if num_symbols > MAX_ALPHABET_SIZE {
        return Err(Error::AlphabetOverflow {
            distinct: num_symbols,
            capacity: MAX_ALPHABET_SIZE,
        });
    }
    Ok(())
}

fn quantize(counts: &[u64], quantization: u32) -> Result<Vec<u32>> {
    let degenerate = Error::DegenerateFrequency {
        symbols: counts.len(),
        quantization,
    };
    if counts.contains(&0) || (quantization as usize) < counts.len() {
        return Err(degenerate);
    }

    let total = counts.iter().map(|&c| c as u128).sum::<u128>();
    let m = quantization as u128;

    // Boundary after symbol i is round(cum_i * m / total), half rounding up.
    let mut freqs = Vec::with_capacity(counts.len());
    let mut cum = 0u128;
    let mut prev = 0u128;
    for &count in counts {
        cum += count as u128;
        let boundary = (2 * cum * m + total) / (2 * total);
        freqs.push((boundary - prev) as u32);
        prev = boundary;
    }

    while let Some(starved) = freqs.iter().position(|&f| f == 0) {
        let donor = freqs
            .iter()
            .enumerate()
            .max_by(|(i, a), (j, b)| a.cmp(b).then(j.cmp(i)))
            .map(|(idx, _)| idx)
            .ok_or_else(|| degenerate.clone())?;
        if freqs[donor] <= 1 {
            return Err(degenerate);
        }
        freqs[donor] -= 1;
        freqs[starved] += 1;
    }

    Ok(freqs)
}
