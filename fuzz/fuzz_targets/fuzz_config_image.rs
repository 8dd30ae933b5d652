#![no_main]

use libfuzzer_sys::fuzz_target;
use vivarium::storage::{self, IMAGE_LEN};

// The image decoder must never panic on arbitrary bytes, and anything it
// accepts must re-encode into an image it accepts again.
fuzz_target!(|data: &[u8]| {
    if data.len() < IMAGE_LEN {
        return;
    }
    let mut image = [0u8; IMAGE_LEN];
    image.copy_from_slice(&data[..IMAGE_LEN]);

    if let Some(config) = storage::decode(&image) {
        let reencoded = storage::encode(&config);
        assert!(storage::decode(&reencoded).is_some());
    }
});
