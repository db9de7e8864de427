#![no_main]

//! Snapshot loader fuzzer.
//!
//! Any byte string either fails to parse, fails validation, or yields a
//! store whose rebuilt indices agree with its records. Loading must
//! never panic.

use colonia::UnitsState;
use colonia::units::{WrappedUnitsState, check_index_agreement};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(wrapped) = serde_json::from_slice::<WrappedUnitsState>(data) else {
        return;
    };
    let Ok(units) = UnitsState::try_from(wrapped) else {
        return;
    };
    let violations = check_index_agreement(&units);
    assert!(violations.is_empty(), "loaded store disagrees with itself: {violations:?}");
});
