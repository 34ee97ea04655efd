//! Adaptive binary arithmetic coding.
//!
//! [`EntropyCoder`] codes one binary symbol at a time by subdividing a
//! finite-precision integer interval `[low, high]`. The split point `mid`
//! comes from the probability model: symbol 0 owns `[low, mid]` and symbol 1
//! owns `[mid + 1, high]`, both ends inclusive. Renormalization keeps the
//! interval wide enough to code the next symbol and is where every output
//! bit is produced; the symbol step itself never emits.
//!
//! There are two ways to drive the coder:
//!
//! - **Stream coding**: call [`encode`](EntropyCoder::encode) /
//!   [`decode`](EntropyCoder::decode) with the `auto` flag set. The coder
//!   initializes itself, codes the whole stream, flushes, and resets.
//! - **Incremental coding**: pass `false` for the `auto` flag, call
//!   [`finish_encode`](EntropyCoder::finish_encode) once after the last
//!   encode, and [`start_decode`](EntropyCoder::start_decode) once before
//!   the first decode.
//!
//! The coded stream carries no length prefix; the caller conveys the symbol
//! count to the decoder out of band.

use crate::bitbuf::BitBuffer;
use crate::error::{Error, Result};

/// Arithmetic precision of the interval registers, in bits.
pub const PRECISION: u32 = 16;

/// Upper bound of the coding interval (`2^PRECISION - 1`).
pub const PRECISION_MAX: u32 = (1 << PRECISION) - 1;

/// Midpoint of the full interval; also the natural fixed model for
/// equiprobable symbols.
pub const HALF_RANGE: u32 = PRECISION_MAX >> 1;

const QTR_RANGE: u32 = HALF_RANGE >> 1;
const THREE_QTR_RANGE: u32 = 3 * QTR_RANGE;
const MSB_MASK: u32 = 1 << (PRECISION - 1);

/// Per-symbol history ceiling. Encoding refuses once a symbol has been seen
/// this many times, keeping adaptive counts well clear of u32 overflow.
const SYMBOL_CAP: u32 = 1 << 31;

// Intermediate products are range * frequency at full precision, so the
// registers must leave headroom for 2 * PRECISION bits in u64.
const _: () = assert!(PRECISION <= 32);

/// Probability model driving the interval split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    /// Learn symbol probabilities from observed frequency counts.
    Adaptive,
    /// Use a static split point on the [`PRECISION_MAX`] scale.
    Fixed(u32),
}

/// A binary arithmetic coder over bit buffers.
///
/// One instance holds the full coding state (interval bounds, model
/// history, pending inverse bits) and borrows its source and destination
/// buffers only for the duration of a call. A session that fails mid-stream
/// leaves the state partially advanced; call [`clear`](EntropyCoder::clear)
/// before reuse.
#[derive(Debug)]
pub struct EntropyCoder {
    model: Model,
    history: [u32; 2],
    e3_count: u32,
    value: u32,
    low: u32,
    high: u32,
    mid: u32,
}

impl EntropyCoder {
    /// Create an adaptive coder with uniform priors.
    pub fn new() -> Self {
        Self {
            model: Model::Adaptive,
            history: [1, 1],
            e3_count: 0,
            value: 0,
            low: 0,
            high: PRECISION_MAX,
            mid: HALF_RANGE,
        }
    }

    /// Create a coder with a fixed probability split.
    ///
    /// `model` is the zero-symbol weight on the [`PRECISION_MAX`] scale;
    /// [`HALF_RANGE`] means equiprobable symbols. Round-trip is guaranteed
    /// for models in `[1, PRECISION_MAX - 1]`; the degenerate endpoints
    /// collapse one sub-interval.
    pub fn with_model(model: u32) -> Self {
        Self {
            model: Model::Fixed(model),
            history: [0, 0],
            e3_count: 0,
            value: 0,
            low: 0,
            high: PRECISION_MAX,
            mid: model,
        }
    }

    /// The probability model this coder was constructed with.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Reset to the initial state for the coder's model.
    pub fn clear(&mut self) {
        self.low = 0;
        self.high = PRECISION_MAX;
        self.value = 0;
        self.e3_count = 0;

        match self.model {
            Model::Adaptive => {
                self.history = [1, 1];
                self.mid = HALF_RANGE;
            }
            Model::Fixed(model) => {
                self.mid = model;
            }
        }
    }

    /// Encode every unread bit of `source` into `dest`.
    ///
    /// With `auto_finish` the coder flushes the final interval selection and
    /// resets itself, matching what [`decode`](EntropyCoder::decode) expects
    /// of a complete stream. Without it the session stays open for further
    /// `encode` calls and a closing
    /// [`finish_encode`](EntropyCoder::finish_encode).
    ///
    /// # Errors
    /// Returns `InvalidResource` when a symbol's history is saturated or the
    /// destination fills mid-emission, and `ExecutionFailure` when the flush
    /// epilogue cannot be written. After any error the session is dead and
    /// must be [`clear`](EntropyCoder::clear)ed.
    pub fn encode(
        &mut self,
        source: &mut BitBuffer,
        dest: &mut BitBuffer,
        auto_finish: bool,
    ) -> Result<()> {
        while !source.is_empty() {
            let bit = source
                .read_bit()
                .map_err(|_| Error::InvalidResource("source ran dry mid-symbol"))?;
            self.encode_symbol(bit)?;
            self.resolve_encode_scaling(dest)?;
        }

        if auto_finish {
            self.flush_encoder(dest)?;
        }

        Ok(())
    }

    /// Decode exactly `symbol_count` bits from `source` into `dest`.
    ///
    /// With `auto_start` the coder resets itself and primes its sliding
    /// window from the stream head first. The caller supplies
    /// `symbol_count` out of band; the stream itself carries no length.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero symbol count and `ExecutionFailure`
    /// when the decode output cannot be written. After any error the session
    /// is dead and must be [`clear`](EntropyCoder::clear)ed.
    pub fn decode(
        &mut self,
        symbol_count: u32,
        source: &mut BitBuffer,
        dest: &mut BitBuffer,
        auto_start: bool,
    ) -> Result<()> {
        if symbol_count == 0 {
            return Err(Error::InvalidArg("symbol count must be nonzero"));
        }

        if auto_start {
            self.start_decode(source)?;
        }

        for _ in 0..symbol_count {
            self.decode_symbol(dest)?;
            self.resolve_decode_scaling(source)?;
        }

        Ok(())
    }

    /// Reset and prime the decoder window with the first [`PRECISION`] bits
    /// of `source`, padding with zeroes if the stream is shorter.
    ///
    /// # Errors
    /// Returns `InvalidResource` if a stream bit cannot be read.
    pub fn start_decode(&mut self, source: &mut BitBuffer) -> Result<()> {
        self.clear();

        for _ in 0..PRECISION {
            let bit = if source.is_empty() {
                0
            } else {
                source
                    .read_bit()
                    .map_err(|_| Error::InvalidResource("coded stream unreadable"))?
            };

            self.value = (self.value << 1) | u32::from(bit);
        }

        Ok(())
    }

    /// Flush the open encode session into `dest` and reset the coder.
    ///
    /// # Errors
    /// Returns `ExecutionFailure` when the epilogue cannot be written.
    pub fn finish_encode(&mut self, dest: &mut BitBuffer) -> Result<()> {
        self.flush_encoder(dest)
    }

    /// Compute the interval split point from the model.
    ///
    /// Products are taken in u64 and the division floors; the decoder runs
    /// the identical computation, so `mid` agrees bit-for-bit on both sides.
    fn resolve_model(&mut self) {
        let range = u64::from(self.high - self.low);

        let mid_range = match self.model {
            Model::Adaptive => {
                let zeros = u64::from(self.history[0]);
                let ones = u64::from(self.history[1]);
                range * zeros / (zeros + ones)
            }
            Model::Fixed(model) => range * u64::from(model) / u64::from(PRECISION_MAX),
        };

        self.mid = self.low + mid_range as u32;
    }

    fn encode_symbol(&mut self, symbol: u8) -> Result<()> {
        let symbol = usize::from(symbol & 1);

        if self.history[symbol] >= SYMBOL_CAP {
            return Err(Error::InvalidResource("symbol history is saturated"));
        }

        self.resolve_model();

        if symbol == 1 {
            self.low = self.mid + 1;
        } else {
            self.high = self.mid;
        }

        if self.model == Model::Adaptive {
            self.history[symbol] += 1;
        }

        Ok(())
    }

    fn decode_symbol(&mut self, dest: &mut BitBuffer) -> Result<()> {
        self.resolve_model();

        // The scaling loop maintains low <= value <= high, so the window
        // falls in exactly one of the two sub-intervals.
        let symbol = u8::from(self.value > self.mid);

        if symbol == 1 {
            self.low = self.mid + 1;
        } else {
            self.high = self.mid;
        }

        if self.model == Model::Adaptive {
            self.history[usize::from(symbol)] += 1;
        }

        dest.write_bit(symbol)
            .map_err(|_| Error::ExecutionFailure("decode output is full"))
    }

    /// Emit the pending run of inverse bits that deferred E3 scalings owe
    /// the stream, then clear the debt.
    fn flush_inverse_bits(&mut self, bit: u8, dest: &mut BitBuffer) -> Result<()> {
        let inverse = bit ^ 1;

        for _ in 0..self.e3_count {
            dest.write_bit(inverse)
                .map_err(|_| Error::ExecutionFailure("coded output is full"))?;
        }

        self.e3_count = 0;
        Ok(())
    }

    fn resolve_encode_scaling(&mut self, dest: &mut BitBuffer) -> Result<()> {
        loop {
            if (self.high & MSB_MASK) == (self.low & MSB_MASK) {
                // E1/E2: the bounds agree on their top bit, so it is settled
                // and can leave the interval.
                let msb = ((self.high & MSB_MASK) >> (PRECISION - 1)) as u8;
                let shift = HALF_RANGE * u32::from(msb) + u32::from(msb);

                self.low -= shift;
                self.high -= shift;

                dest.write_bit(msb)
                    .map_err(|_| Error::InvalidResource("coded output is full"))?;
                self.flush_inverse_bits(msb, dest)?;
            } else if self.high <= THREE_QTR_RANGE && self.low > QTR_RANGE {
                // E3: the interval straddles the midpoint inside the middle
                // half. Defer the emission until the straddle resolves.
                self.high -= QTR_RANGE + 1;
                self.low -= QTR_RANGE + 1;
                self.e3_count += 1;
            } else {
                break;
            }

            self.high = ((self.high << 1) & PRECISION_MAX) | 1;
            self.low = (self.low << 1) & PRECISION_MAX;
        }

        Ok(())
    }

    fn resolve_decode_scaling(&mut self, source: &mut BitBuffer) -> Result<()> {
        loop {
            if self.high <= HALF_RANGE {
                // Low half: the coordinates already fit, only the shift-up
                // below is needed.
            } else if self.low > HALF_RANGE {
                self.high -= HALF_RANGE + 1;
                self.low -= HALF_RANGE + 1;
                self.value -= HALF_RANGE + 1;
            } else if self.high <= THREE_QTR_RANGE && self.low > QTR_RANGE {
                // E3 mirror of the encode side.
                self.high -= QTR_RANGE + 1;
                self.low -= QTR_RANGE + 1;
                self.value -= QTR_RANGE + 1;
            } else {
                break;
            }

            // Past the end of the coded stream the window shifts in zeroes,
            // matching the encoder's flush convention.
            let bit = if source.is_empty() {
                0
            } else {
                source
                    .read_bit()
                    .map_err(|_| Error::ExecutionFailure("coded stream unreadable"))?
            };

            self.high = ((self.high << 1) & PRECISION_MAX) | 1;
            self.low = (self.low << 1) & PRECISION_MAX;
            self.value = ((self.value << 1) & PRECISION_MAX) | u32::from(bit);
        }

        Ok(())
    }

    /// Close out the interval: one final disambiguating bit plus the pending
    /// inverse bits pins the decoder window inside the final interval no
    /// matter what follows on the wire.
    fn flush_encoder(&mut self, dest: &mut BitBuffer) -> Result<()> {
        self.e3_count += 1;

        let bit = u8::from(self.low >= QTR_RANGE);
        dest.write_bit(bit)
            .map_err(|_| Error::ExecutionFailure("coded output is full"))?;
        self.flush_inverse_bits(bit, dest)?;

        self.clear();
        Ok(())
    }
}

impl Default for EntropyCoder {
    fn default() -> Self {
        Self::new()
    }
}
