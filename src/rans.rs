//! Range Asymmetric Numeral Systems (rANS) over an unbounded state.
//!
//! There is no renormalization: the state is one [`BigUint`] that grows by
//! about `log2(m / ls)` bits per encoded symbol, so its size is
//! O(message length). Decoding pops symbols in reverse order of encoding and
//! shrinks the state back to its starting value.

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::alphabet::Symbol;
use crate::config::MAX_QUANTIZATION;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::model::Model;
use crate::spread::SpreadTable;

/// `2^total_bits`, for widths up to [`MAX_QUANTIZATION`].
fn total_slots(total_bits: u32) -> Result<u32> {
    if total_bits > MAX_QUANTIZATION.trailing_zeros() {
        return Err(Error::InvalidConfig("total_bits exceeds 24"));
    }
    Ok(1 << total_bits)
}

/// rANS encoder.
#[derive(Clone, Debug, Default)]
pub struct RansEncoder {
    state: BigUint,
    count: usize,
}

impl RansEncoder {
    /// Create a new encoder with state zero.
    pub fn new() -> Self {
        Self {
            state: BigUint::zero(),
            count: 0,
        }
    }

    /// Encode one sub-range of the `2^total_bits` slots.
    ///
    /// `state = (state / freq) * total + cum_freq + (state % freq)`
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if `total_bits` exceeds 24.
    /// - `Error::InvalidRange` if `freq` is 0 or the range
    ///   `[cum_freq, cum_freq + freq)` does not fit in `2^total_bits`.
    pub fn encode(&mut self, cum_freq: u32, freq: u32, total_bits: u32) -> Result<()> {
        let total = total_slots(total_bits)? as u64;
        if freq == 0 || cum_freq as u64 + freq as u64 > total {
            return Err(Error::InvalidRange {
                cum_freq,
                freq,
                quantization: total,
            });
        }

        let (quotient, remainder) = self.state.div_rem(&BigUint::from(freq));
        self.state = (quotient << total_bits) + remainder + cum_freq;
        self.count += 1;
        Ok(())
    }

    /// Encode `symbol` using its quantized range in `freqs`.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` if `symbol` lies outside `freqs`.
    pub fn encode_symbol(&mut self, symbol: Symbol, freqs: &FrequencyTable) -> Result<()> {
        let (base, freq) = freqs.range(symbol)?;
        self.encode(base, freq, freqs.quantization().trailing_zeros())
    }

    /// Return the current internal state.
    pub fn get_state(&self) -> &BigUint {
        &self.state
    }

    /// Number of symbols encoded so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether nothing has been encoded yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Finish encoding; the symbol count must travel with the state.
    pub fn finish(self) -> EncodedMessage {
        EncodedMessage {
            state: self.state,
            len: self.count,
        }
    }
}

/// rANS decoder.
#[derive(Clone, Debug)]
pub struct RansDecoder {
    state: BigUint,
}

impl RansDecoder {
    /// Create a new decoder from a final encoder state.
    pub fn new(state: BigUint) -> Self {
        Self { state }
    }

    /// Return the current internal state.
    pub fn get_state(&self) -> &BigUint {
        &self.state
    }

    /// Consume the decoder and return its state.
    pub fn into_state(self) -> BigUint {
        self.state
    }

    /// Slot of the next symbol: `state mod 2^total_bits`.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if `total_bits` exceeds 24.
    pub fn get_cum_freq(&self, total_bits: u32) -> Result<u32> {
        let total = total_slots(total_bits)?;
        let low = self.state.iter_u32_digits().next().unwrap_or(0);
        Ok(low & (total - 1))
    }

    /// Pop the sub-range `[cum_freq, cum_freq + freq)` off the state.
    ///
    /// `state = freq * (state / total) + (state % total) - cum_freq`
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if `total_bits` exceeds 24.
    /// - `Error::InvalidSlot` if the current slot is not inside the given
    ///   range, which means the range belongs to another symbol.
    pub fn decode(&mut self, cum_freq: u32, freq: u32, total_bits: u32) -> Result<()> {
        let slot = self.get_cum_freq(total_bits)?;
        if slot < cum_freq || slot - cum_freq >= freq {
            return Err(Error::InvalidSlot {
                slot,
                quantization: 1 << total_bits,
            });
        }

        self.state = (&self.state >> total_bits) * freq + (slot - cum_freq);
        Ok(())
    }

    /// Decode the next symbol by looking its slot up in `spread`.
    ///
    /// # Errors
    /// Returns `Error::InvalidSlot` if the slot is unassigned, out of range,
    /// or assigned to a symbol whose range does not contain it.
    pub fn decode_symbol(&mut self, freqs: &FrequencyTable, spread: &SpreadTable) -> Result<Symbol> {
        let total_bits = freqs.quantization().trailing_zeros();
        let slot = self.get_cum_freq(total_bits)?;
        let symbol = spread.lookup(slot)?;
        let (base, freq) = freqs.range(symbol).map_err(|_| Error::InvalidSlot {
            slot,
            quantization: freqs.quantization(),
        })?;
        self.decode(base, freq, total_bits)?;
        Ok(symbol)
    }
}

/// Final coder state plus the symbol count needed to decode it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedMessage {
    /// Coder state after the last symbol.
    pub state: BigUint,
    /// Number of encoded symbols.
    pub len: usize,
}

impl EncodedMessage {
    /// Significant bits of the state.
    pub fn bit_len(&self) -> u64 {
        self.state.bits()
    }

    /// Bytes needed for the state as an unsigned big-endian integer.
    pub fn byte_len(&self) -> usize {
        self.bit_len().div_ceil(8) as usize
    }

    /// Average state bits per symbol; 0 for an empty message.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.bit_len() as f64 / self.len as f64
    }
}

/// Fold `symbols` left to right into a state starting at zero.
///
/// # Errors
/// Returns `Error::UnknownSymbol` for a symbol outside the model.
pub fn encode<R>(symbols: &[Symbol], model: &Model<R>) -> Result<BigUint> {
    let mut encoder = RansEncoder::new();
    for &symbol in symbols {
        encoder.encode_symbol(symbol, model.frequencies())?;
    }
    let encoded = encoder.finish();
    debug!(
        "encoded {} symbols into {} bits",
        encoded.len,
        encoded.bit_len()
    );
    Ok(encoded.state)
}

/// Unfold exactly `len` symbols from `state`, returned in encoding order.
///
/// The length is not recoverable from the state; decoding a different count
/// than was encoded silently yields wrong symbols unless a bad slot is hit.
///
/// # Errors
/// Returns `Error::InvalidSlot` if a slot has no valid owner in the model.
pub fn decode<R>(state: &BigUint, len: usize, model: &Model<R>) -> Result<Vec<Symbol>> {
    let mut decoder = RansDecoder::new(state.clone());
    // `len` comes from outside; don't trust it for the allocation.
    let mut symbols = Vec::with_capacity(len.min(state.bits() as usize + 1));
    for _ in 0..len {
        symbols.push(decoder.decode_symbol(model.frequencies(), model.spread())?);
    }
    symbols.reverse();
    debug!(
        "decoded {} symbols, {} state bits remain",
        len,
        decoder.get_state().bits()
    );
    Ok(symbols)
}

/// Map raw values through the model's alphabet and encode them.
///
/// # Errors
/// Returns `Error::UnknownValue` for a value outside the alphabet.
pub fn encode_message<R: Copy + Ord>(message: &[R], model: &Model<R>) -> Result<EncodedMessage> {
    let symbols = model.map_message(message)?;
    let state = encode(&symbols, model)?;
    Ok(EncodedMessage {
        state,
        len: symbols.len(),
    })
}

/// Decode an [`EncodedMessage`] and map the symbols back to raw values.
///
/// # Errors
/// Returns `Error::InvalidSlot` on a corrupt state or model.
pub fn decode_message<R: Copy + Ord>(encoded: &EncodedMessage, model: &Model<R>) -> Result<Vec<R>> {
    let symbols = decode(&encoded.state, encoded.len, model)?;
    model.alphabet().unmap_symbols(&symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoderConfig;
    use crate::model::build_model;
    use proptest::prelude::*;

    const REFERENCE: [u8; 20] = [0, 1, 2, 4, 5, 6, 6, 6, 9, 2, 0, 1, 2, 4, 5, 6, 6, 6, 9, 2];

    #[test]
    fn test_rans_basic_roundtrip() {
        let mut encoder = RansEncoder::new();
        let total_bits = 8;
        let symbols = [(0, 0, 128), (1, 128, 64), (2, 192, 64)];
        let input: Vec<usize> = vec![0, 1, 2, 0, 0];
        for &idx in &input {
            let (_, cum_freq, freq) = symbols[idx];
            encoder.encode(cum_freq, freq, total_bits).unwrap();
        }
        let encoded = encoder.finish();
        assert_eq!(encoded.len, input.len());

        let mut decoder = RansDecoder::new(encoded.state);
        let mut output = Vec::new();
        for _ in 0..input.len() {
            let cf = decoder.get_cum_freq(total_bits).unwrap();
            let idx = if cf < 128 {
                0
            } else if cf < 192 {
                1
            } else {
                2
            };
            output.push(idx);
            let (_, cum_freq, freq) = symbols[idx];
            decoder.decode(cum_freq, freq, total_bits).unwrap();
        }
        output.reverse();
        assert_eq!(input, output);
        assert!(decoder.get_state().is_zero());
    }

    #[test]
    fn test_encode_step_arithmetic() {
        // x = 10, ls = 3, bs = 5, m = 16: 16 * 3 + 5 + 1 = 54
        let mut encoder = RansEncoder {
            state: BigUint::from(10u32),
            count: 0,
        };
        encoder.encode(5, 3, 4).unwrap();
        assert_eq!(encoder.get_state(), &BigUint::from(54u32));

        let mut decoder = RansDecoder::new(BigUint::from(54u32));
        assert_eq!(decoder.get_cum_freq(4), Ok(6));
        decoder.decode(5, 3, 4).unwrap();
        assert_eq!(decoder.into_state(), BigUint::from(10u32));
    }

    #[test]
    fn test_invalid_range() {
        let mut encoder = RansEncoder::new();
        assert!(matches!(
            encoder.encode(0, 0, 8),
            Err(Error::InvalidRange { freq: 0, .. })
        ));
        assert!(matches!(
            encoder.encode(250, 10, 8),
            Err(Error::InvalidRange { .. })
        ));
        assert!(encoder.is_empty());
    }

    #[test]
    fn test_total_bits_limit() {
        let mut encoder = RansEncoder::new();
        for total_bits in [25, 33, 64, 200] {
            assert!(matches!(
                encoder.encode(0, 1, total_bits),
                Err(Error::InvalidConfig(_))
            ));
        }
        assert!(encoder.is_empty());
        encoder.encode(0, 1, 24).unwrap();

        let mut decoder = RansDecoder::new(BigUint::from(u64::MAX));
        assert_eq!(decoder.get_cum_freq(24), Ok(0xFF_FFFF));
        assert!(matches!(decoder.get_cum_freq(40), Err(Error::InvalidConfig(_))));
        assert!(matches!(decoder.decode(0, 1, 64), Err(Error::InvalidConfig(_))));
        assert_eq!(decoder.get_state(), &BigUint::from(u64::MAX));
    }

    #[test]
    fn test_decode_rejects_foreign_range() {
        let mut decoder = RansDecoder::new(BigUint::from(200u32));
        assert_eq!(
            decoder.decode(0, 128, 8),
            Err(Error::InvalidSlot {
                slot: 200,
                quantization: 256
            })
        );
        assert_eq!(decoder.get_state(), &BigUint::from(200u32));
    }

    #[test]
    fn test_reference_scenario() {
        let model = build_model(&REFERENCE, &CoderConfig::default()).unwrap();
        let encoded = encode_message(&REFERENCE, &model).unwrap();
        assert_eq!(encoded.len, 20);
        assert!(!encoded.state.is_zero());
        assert!(encoded.byte_len() > 0);
        assert_eq!(decode_message(&encoded, &model).unwrap(), REFERENCE.to_vec());
    }

    #[test]
    fn test_single_symbol_message() {
        let model = build_model(&[42u8], &CoderConfig::default()).unwrap();
        assert_eq!(model.num_symbols(), 1);
        let encoded = encode_message(&[42u8], &model).unwrap();
        assert!(encoded.state.is_zero());
        assert_eq!(encoded.byte_len(), 0);
        assert_eq!(decode_message(&encoded, &model).unwrap(), vec![42u8]);
    }

    #[test]
    fn test_decode_returns_state_to_zero() {
        let model = build_model(&REFERENCE, &CoderConfig::default()).unwrap();
        let symbols = model.map_message(&REFERENCE).unwrap();
        let state = encode(&symbols, &model).unwrap();

        let mut decoder = RansDecoder::new(state);
        for &expected in symbols.iter().rev() {
            let symbol = decoder
                .decode_symbol(model.frequencies(), model.spread())
                .unwrap();
            assert_eq!(symbol, expected);
        }
        assert!(decoder.get_state().is_zero());
    }

    #[test]
    fn test_unknown_inputs() {
        let model = build_model(&REFERENCE, &CoderConfig::default()).unwrap();
        assert_eq!(encode_message(&[3u8], &model), Err(Error::UnknownValue));
        assert!(matches!(
            encode(&[7], &model),
            Err(Error::UnknownSymbol { symbol: 7, .. })
        ));
    }

    #[test]
    fn test_unassigned_slot_is_reported() {
        let model = build_model(&REFERENCE, &CoderConfig::default()).unwrap();
        let symbols = model.map_message(&REFERENCE).unwrap();
        let state = encode(&symbols, &model).unwrap();
        let slot = RansDecoder::new(state.clone()).get_cum_freq(9).unwrap();

        let mut slots: Vec<_> = (0..512).map(|j| model.spread().get(j)).collect();
        slots[slot as usize] = None;
        let broken = Model::from_parts(
            *model.config(),
            model.alphabet().clone(),
            model.frequencies().clone(),
            SpreadTable::from_slots(slots),
        )
        .unwrap();

        assert_eq!(
            decode(&state, symbols.len(), &broken),
            Err(Error::InvalidSlot {
                slot,
                quantization: 512
            })
        );
    }

    #[test]
    fn test_oversized_length_fails_on_bad_slot() {
        let model = build_model(&REFERENCE, &CoderConfig::default()).unwrap();
        let mut slots: Vec<_> = (0..512).map(|j| model.spread().get(j)).collect();
        slots[0] = None;
        let broken = Model::from_parts(
            *model.config(),
            model.alphabet().clone(),
            model.frequencies().clone(),
            SpreadTable::from_slots(slots),
        )
        .unwrap();

        assert_eq!(
            decode(&BigUint::zero(), usize::MAX, &broken),
            Err(Error::InvalidSlot {
                slot: 0,
                quantization: 512
            })
        );
    }

    #[test]
    fn test_misassigned_slot_is_reported() {
        let model = build_model(&[1u8, 2, 2, 3], &CoderConfig::new().with_quantization(4)).unwrap();
        // Quantized ranges are [0,1), [1,3), [3,4); claim slot 0 for symbol 2.
        let spread = SpreadTable::from_slots(vec![Some(2), Some(1), Some(1), Some(2)]);
        let broken = Model::from_parts(
            *model.config(),
            model.alphabet().clone(),
            model.frequencies().clone(),
            spread,
        )
        .unwrap();
        assert_eq!(
            decode(&BigUint::zero(), 1, &broken),
            Err(Error::InvalidSlot {
                slot: 0,
                quantization: 4
            })
        );
    }

    #[test]
    fn test_state_size_grows_with_length() {
        let message: Vec<u8> = (0..2_000u32).map(|i| (i * 7 % 13) as u8).collect();
        let model = build_model(&message, &CoderConfig::default()).unwrap();
        let short = encode_message(&message[..200], &model).unwrap();
        let long = encode_message(&message, &model).unwrap();
        assert!(long.bit_len() > short.bit_len());
        assert!(long.bits_per_symbol() < 8.0);
        assert_eq!(decode_message(&long, &model).unwrap(), message);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_roundtrip_any_width(
            message in prop::collection::vec(0u8..=255, 1..200),
            extra_bits in 0u32..6,
        ) {
            let distinct = message.iter().collect::<std::collections::BTreeSet<_>>().len();
            let min_bits = (distinct as u32).next_power_of_two().trailing_zeros();
            let config = CoderConfig::new().with_quantization(1 << (min_bits + extra_bits));

            let model = build_model(&message, &config).unwrap();
            let encoded = encode_message(&message, &model).unwrap();
            prop_assert_eq!(decode_message(&encoded, &model).unwrap(), message);
        }

        #[test]
        fn prop_state_non_decreasing(
            message in prop::collection::vec(0u8..16, 1..120),
        ) {
            let model = build_model(&message, &CoderConfig::default()).unwrap();
            let symbols = model.map_message(&message).unwrap();
            let mut encoder = RansEncoder::new();
            let mut previous = BigUint::zero();
            for &symbol in &symbols {
                encoder.encode_symbol(symbol, model.frequencies()).unwrap();
                prop_assert!(encoder.get_state() >= &previous);
                previous = encoder.get_state().clone();
            }

            let mut decoder = RansDecoder::new(encoder.finish().state);
            for _ in 0..symbols.len() {
                decoder.decode_symbol(model.frequencies(), model.spread()).unwrap();
            }
            prop_assert!(decoder.get_state().is_zero());
        }
    }
}
