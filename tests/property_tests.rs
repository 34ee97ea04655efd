use abac::coder::{HALF_RANGE, PRECISION_MAX};
use abac::{BitBuffer, EntropyCoder};
use proptest::prelude::*;

fn buffer_from_bits(bits: &[u8]) -> BitBuffer {
    let mut buffer = BitBuffer::with_capacity(bits.len()).unwrap();
    for &bit in bits {
        buffer.write_bit(bit).unwrap();
    }
    buffer
}

fn read_all_bits(buffer: &mut BitBuffer, count: usize) -> Vec<u8> {
    (0..count).map(|_| buffer.read_bit().unwrap()).collect()
}

proptest! {
    #[test]
    fn prop_adaptive_roundtrip(bits in prop::collection::vec(0u8..2, 1..512)) {
        let mut source = buffer_from_bits(&bits);

        let mut coded = BitBuffer::with_capacity(bits.len() * 2 + 64).unwrap();
        let mut coder = EntropyCoder::new();
        coder.encode(&mut source, &mut coded, true).unwrap();

        let mut decoded = BitBuffer::with_capacity(bits.len()).unwrap();
        let mut coder = EntropyCoder::new();
        coder.decode(bits.len() as u32, &mut coded, &mut decoded, true).unwrap();

        prop_assert_eq!(read_all_bits(&mut decoded, bits.len()), bits);
    }

    #[test]
    fn prop_fixed_model_roundtrip(
        bits in prop::collection::vec(0u8..2, 1..256),
        model in 1..PRECISION_MAX,
    ) {
        let mut source = buffer_from_bits(&bits);

        // A badly fitting fixed model can cost up to PRECISION bits per
        // symbol, so size the destination for the worst case.
        let mut coded = BitBuffer::with_capacity(bits.len() * 17 + 64).unwrap();
        let mut coder = EntropyCoder::with_model(model);
        coder.encode(&mut source, &mut coded, true).unwrap();

        let mut decoded = BitBuffer::with_capacity(bits.len()).unwrap();
        let mut coder = EntropyCoder::with_model(model);
        coder.decode(bits.len() as u32, &mut coded, &mut decoded, true).unwrap();

        prop_assert_eq!(read_all_bits(&mut decoded, bits.len()), bits);
    }

    #[test]
    fn prop_equiprobable_model_stays_near_raw_size(
        bits in prop::collection::vec(0u8..2, 64..256),
    ) {
        let mut source = buffer_from_bits(&bits);

        let mut coded = BitBuffer::with_capacity(bits.len() * 2 + 64).unwrap();
        let mut coder = EntropyCoder::with_model(HALF_RANGE);
        coder.encode(&mut source, &mut coded, true).unwrap();

        // A half/half split codes each symbol at ~1 bit; finite precision
        // and the flush epilogue add a small tail.
        prop_assert!(coded.occupancy_bits() <= bits.len() + 48);
    }

    #[test]
    fn prop_encode_is_deterministic(bits in prop::collection::vec(0u8..2, 1..256)) {
        let mut source = buffer_from_bits(&bits);

        let mut first = BitBuffer::with_capacity(bits.len() * 2 + 64).unwrap();
        EntropyCoder::new().encode(&mut source, &mut first, true).unwrap();

        source.seek(0);
        let mut second = BitBuffer::with_capacity(bits.len() * 2 + 64).unwrap();
        EntropyCoder::new().encode(&mut source, &mut second, true).unwrap();

        prop_assert_eq!(first.occupancy_bits(), second.occupancy_bits());
        prop_assert_eq!(first.data(), second.data());
    }

    #[test]
    fn prop_buffer_byte_roundtrip(bytes in prop::collection::vec(any::<u8>(), 1..256)) {
        let mut buffer = BitBuffer::from_bytes(&bytes).unwrap();

        let mut readback = vec![0u8; bytes.len()];
        prop_assert_eq!(buffer.read_bytes(&mut readback).unwrap(), bytes.len());
        prop_assert_eq!(readback, bytes);
    }

    #[test]
    fn prop_mixed_alignment_preserves_bit_order(
        prefix in prop::collection::vec(0u8..2, 0..8),
        byte in any::<u8>(),
    ) {
        let mut buffer = BitBuffer::with_capacity(16).unwrap();
        for &bit in &prefix {
            buffer.write_bit(bit).unwrap();
        }
        buffer.write_byte(byte).unwrap();

        for &bit in &prefix {
            prop_assert_eq!(buffer.read_bit().unwrap(), bit);
        }
        for i in 0..8 {
            prop_assert_eq!(buffer.read_bit().unwrap(), (byte >> i) & 1);
        }
    }

    #[test]
    fn prop_occupancy_algebra(writes in 1..512usize, reads in 0..512usize) {
        let reads = reads.min(writes);

        let mut buffer = BitBuffer::with_capacity(writes).unwrap();
        for i in 0..writes {
            buffer.write_bit((i & 1) as u8).unwrap();
        }
        for _ in 0..reads {
            buffer.read_bit().unwrap();
        }

        prop_assert_eq!(buffer.occupancy_bits(), writes - reads);
    }
}
