//! # Adaptive Binary Arithmetic Coding (ABAC)
//!
//! *Entropy coding binary streams at fractional bits per symbol.*
//!
//! ## Intuition First
//!
//! Picture the unit interval as a map of every message you could ever send.
//! Each symbol you code carves the current region into two parts sized by
//! the symbols' probabilities, and you step into the part that matches.
//! After the whole message, any number inside the surviving region names the
//! message exactly; the more predictable the message, the larger the region
//! and the fewer digits the number needs.
//!
//! ## The Problem
//!
//! Prefix codes cannot spend less than one bit per symbol, which makes them
//! useless for a binary alphabet: every symbol costs a full bit no matter
//! how skewed the probabilities are. Arithmetic coding removes the one-bit
//! floor by letting many symbols share each output bit, paying the true
//! information cost of roughly `-log2(p)` per symbol.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon        Entropy as the fundamental limit
//! 1976  Rissanen/Pasco Arithmetic coding made finite-precision
//! 1987  Witten et al.  The canonical practical implementation (CACM)
//! 1998  Moffat et al.  Arithmetic coding revisited: the modern recipe
//! 2003  Marpe et al.   CABAC ships in H.264 video
//! ```
//!
//! The lasting engineering insight is renormalization: the interval is held
//! in fixed-width integer registers, and whenever its bounds agree on a
//! leading bit (or straddle the midpoint too tightly), the registers are
//! rescaled and the settled bits leave through the output.
//!
//! ## Mathematical Formulation
//!
//! With integer bounds `low` and `high` and a zero-probability estimate
//! `p0`, each symbol splits the interval at
//!
//! ```text
//! mid = low + (high - low) * p0
//! ```
//!
//! Symbol 0 keeps `[low, mid]`, symbol 1 keeps `[mid + 1, high]`. The
//! adaptive estimate is `p0 = n0 / (n0 + n1)` over the symbols seen so far,
//! evaluated in integer arithmetic identically on both sides.
//!
//! ## Complexity Analysis
//!
//! - **Time**: O(1) amortized per symbol (one multiply/divide plus an
//!   expected-constant number of renormalization shifts).
//! - **Space**: O(1) coder state; buffers are owned by the caller.
//!
//! ## Failure Modes
//!
//! 1. **Model starvation**: probabilities below the precision granularity
//!    stop narrowing the interval; the canonical 16-bit precision handles
//!    skews to roughly 1 in 16 thousand.
//! 2. **Desynchronization**: any divergence between encoder and decoder
//!    model state (even a single floored division) silently corrupts the
//!    rest of the stream.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **BitBuffer**: a bit-addressable buffer with independent read/write
//!   cursors and hybrid aligned/unaligned bulk transfers.
//! - **EntropyCoder**: a 16-bit-precision adaptive binary arithmetic coder
//!   with E1/E2/E3 renormalization and deferred inverse-bit emission.
//!
//! The coded stream is bare bits, LSB-first within each byte; the symbol
//! count travels out of band.
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic coding
//!   for data compression." Communications of the ACM.
//! - Moffat, A., Neal, R. M., Witten, I. H. (1998). "Arithmetic coding
//!   revisited." ACM Transactions on Information Systems.
//! - Marpe, D., Schwarz, H., Wiegand, T. (2003). "Context-based adaptive
//!   binary arithmetic coding in the H.264/AVC video compression standard."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitbuf;
pub mod coder;
pub mod error;

pub use bitbuf::BitBuffer;
pub use coder::{EntropyCoder, Model};
pub use error::{Error, Result};
