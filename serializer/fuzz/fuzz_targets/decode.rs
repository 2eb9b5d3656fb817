#![no_main]

use libfuzzer_sys::fuzz_target;
use std::{collections::BTreeMap, sync::OnceLock};
use tagwire_serializer::{Dictionary, Nullable, Registry, Sequence, Tuple};

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut builder = Registry::builder();
        builder
            .with_builtins()
            .expect("builtins")
            .register::<Option<u32>, _>(1, Nullable)
            .expect("option")
            .register::<Vec<String>, _>(2, Sequence::new(..=64))
            .expect("vec")
            .register::<BTreeMap<String, u64>, _>(3, Dictionary::new(..=64))
            .expect("map")
            .register::<(u8, String), _>(4, Tuple)
            .expect("tuple");
        builder.build()
    })
}

fuzz_target!(|data: &[u8]| {
    let registry = registry();

    // Arbitrary input must either decode or fail with an error, never panic.
    let mut reader = data;
    if let Ok(value) = registry.read(&mut reader) {
        // Anything that decodes must re-encode to the bytes it was read from.
        let consumed = data.len() - reader.len();
        let encoded = registry.encode(&value).expect("re-encode");
        assert_eq!(&encoded[..], &data[..consumed]);
    }
});
