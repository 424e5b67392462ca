//! # Arbitrary-precision Range Asymmetric Numeral Systems
//!
//! *Entropy coding into a single big integer.*
//!
//! ## Intuition First
//!
//! Writing a number in base 10 appends one digit per step: `x -> 10 x + d`. Every digit
//! costs the same `log2(10)` bits because every digit owns the same share of the number
//! line. ANS lets digits own *unequal* shares. A frequent symbol owns a wide slice of each
//! block of `m` integers, so appending it grows the number by less; a rare symbol owns a
//! narrow slice and grows it by more. The number stays an integer and reading it back
//! pops the symbols off in reverse, like a stack.
//!
//! ## Mathematical Formulation
//!
//! Symbols get quantized frequencies `ls[s]` summing to `m` and cumulative bases
//! `bs[s] = ls[0] + ... + ls[s - 1]`. Encoding and decoding are exact inverses:
//!
//! ```text
//! C(x, s) = m * floor(x / ls[s]) + bs[s] + (x mod ls[s])
//! D(x)    = (s, ls[s] * floor(x / m) + (x mod m) - bs[s])   where s = spread[x mod m]
//! ```
//!
//! Each encode step multiplies `x` by roughly `m / ls[s] = 1 / p_s`, i.e. spends
//! `-log2(p_s)` bits.
//!
//! ## This Variant
//!
//! Production coders (see the `ans` family of streaming rANS/tANS coders) keep the state in
//! a machine word and flush fixed-width chunks as it grows. Here there is no
//! renormalization: the state is a [`num_bigint::BigUint`] starting at zero, and it keeps
//! the whole message. State size is O(message length).
//!
//! ## Complexity Analysis
//!
//! - **Model**: O(n log k) to map a length-`n` message over `k` distinct values,
//!   O(m) for the spread table.
//! - **Coding**: each step is a big-integer division by a small word, so O(n) per step
//!   and O(n^2) word operations per message.
//!
//! ## Failure Modes
//!
//! 1. **Missing length**: the state does not self-terminate. Decoding a different count
//!    than was encoded returns wrong symbols; only a slot with no valid owner is detected.
//! 2. **Leading zeros**: starting from zero, a run of the symbol with base 0 encodes to
//!    zero. The length carries that information.
//! 3. **Quadratic time**: without renormalization long messages get slow.
//!
//! ## Example
//!
//! ```
//! use bigrans::{build_model, decode_message, encode_message, CoderConfig};
//!
//! let message = [0u8, 1, 2, 4, 5, 6, 6, 6, 9, 2, 0, 1, 2, 4, 5, 6, 6, 6, 9, 2];
//! let model = build_model(&message, &CoderConfig::default()).unwrap();
//! let encoded = encode_message(&message, &model).unwrap();
//! assert_eq!(decode_message(&encoded, &model).unwrap(), message.to_vec());
//! ```
//!
//! ## References
//!
//! - Duda, J. (2013). "Asymmetric numeral systems: entropy coding combining speed of Huffman coding with compression rate of arithmetic coding."
//! - Gibbons, J. (2019). "Coding with Asymmetric Numeral Systems."
//! - Cheplyaka, R. (2017). "Understanding Asymmetric Numeral Systems."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod frequency;
pub mod model;
pub mod rans;
pub mod spread;

pub use alphabet::{AlphabetMapper, Symbol};
pub use config::CoderConfig;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use model::{build_model, Model};
pub use num_bigint::BigUint;
pub use rans::{
    decode, decode_message, encode, encode_message, EncodedMessage, RansDecoder, RansEncoder,
};
pub use spread::SpreadTable;
