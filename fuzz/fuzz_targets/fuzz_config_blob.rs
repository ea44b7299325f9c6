//! Fuzz target: stored config blob
//!
//! Plants arbitrary bytes where the node config lives and loads it:
//! - No panics under arbitrary byte inputs
//! - Any config that loads successfully also validates
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use rainshade::adapters::nvs::NvsAdapter;
use rainshade::app::ports::{ConfigPort, StoragePort};

fuzz_target!(|data: &[u8]| {
    let Ok(mut nvs) = NvsAdapter::new() else {
        return;
    };
    if nvs.write("rainshade", "nodecfg", data).is_err() {
        return;
    }

    if let Ok(cfg) = nvs.load() {
        assert!(cfg.validate().is_ok(), "loaded config failed validation");
        let _ = cfg.awning.pulse.duty_for(true);
    }
});
