#![no_main]
use abac::{BitBuffer, EntropyCoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    if data.is_empty() || data.len() > 4096 {
        return;
    }

    let mut source = BitBuffer::from_bytes(&data).unwrap();
    let bit_count = source.occupancy_bits();

    let mut coded = BitBuffer::with_capacity(bit_count * 2 + 64).unwrap();
    let mut coder = EntropyCoder::new();
    if coder.encode(&mut source, &mut coded, true).is_err() {
        return;
    }

    let mut decoded = BitBuffer::with_capacity(bit_count).unwrap();
    let mut coder = EntropyCoder::new();
    coder
        .decode(bit_count as u32, &mut coded, &mut decoded, true)
        .unwrap();

    assert_eq!(decoded.data(), &data[..]);
});
