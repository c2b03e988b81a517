#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are not. Formatting runs too so the emitter
    // sees whatever the decoder accepts.
    if let Ok(module) = watdump::parse(data) {
        let _ = watdump::wat::format(&module);
    }
});
