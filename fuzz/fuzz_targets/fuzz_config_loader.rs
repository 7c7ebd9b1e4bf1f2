#![no_main]

use crossconf::catalog::Catalog;
use crossconf::config::loader::{ConfigLoader, LoaderOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(catalog) = Catalog::builtin() else {
        return;
    };
    let loader = ConfigLoader::new(catalog.models(), LoaderOptions::default());

    // The first byte picks which registered model the rest is fed to.
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let names: Vec<_> = catalog.models().file_names().collect();
    let file_name = names[usize::from(selector) % names.len()];

    // Any outcome is fine as long as it does not panic.
    let _ = loader.load_bytes(file_name, body);
});
