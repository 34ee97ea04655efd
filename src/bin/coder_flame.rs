use abac::{BitBuffer, EntropyCoder};

fn main() {
    let bytes = 1024;

    for _ in 0..1000 {
        let mut source = BitBuffer::with_capacity(bytes * 8).unwrap();
        for i in 0..bytes {
            source.write_byte((i % 4) as u8).unwrap();
        }

        let mut coded = BitBuffer::with_capacity(bytes * 16).unwrap();
        let mut coder = EntropyCoder::new();
        coder.encode(&mut source, &mut coded, true).unwrap();

        let mut decoded = BitBuffer::with_capacity(bytes * 8).unwrap();
        coder
            .decode((bytes * 8) as u32, &mut coded, &mut decoded, true)
            .unwrap();
    }
}
