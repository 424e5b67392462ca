#![no_main]
use bigrans::{build_model, decode_message, encode_message, CoderConfig, Error};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u8)| {
    let (input, bits) = data;
    let config = CoderConfig::new().with_quantization(1 << (bits % 17));

    let model = match build_model(&input, &config) {
        Ok(model) => model,
        Err(Error::EmptyMessage | Error::DegenerateFrequency { .. }) => return,
        Err(e) => panic!("unexpected error: {e}"),
    };

    let encoded = encode_message(&input, &model).unwrap();
    assert_eq!(decode_message(&encoded, &model).unwrap(), input);
});
