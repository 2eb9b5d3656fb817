#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;
use tagwire_serializer::{Dictionary, Nullable, Object, Registry, Sequence, Tuple};

#[derive(Arbitrary, Debug)]
enum Value {
    Bool(bool),
    U8(u8),
    U64(u64),
    I32(i32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Option(Option<u32>),
    Strings(Vec<String>),
    Map(BTreeMap<String, u64>),
    Pair(u8, String),
    List(Vec<Value>),
}

impl Value {
    fn into_object(self) -> Object {
        match self {
            Value::Bool(v) => Box::new(v),
            Value::U8(v) => Box::new(v),
            Value::U64(v) => Box::new(v),
            Value::I32(v) => Box::new(v),
            Value::F64(v) => Box::new(v),
            Value::String(v) => Box::new(v),
            Value::Bytes(v) => Box::new(Bytes::from(v)),
            Value::Option(v) => Box::new(v),
            Value::Strings(v) => Box::new(v),
            Value::Map(v) => Box::new(v),
            Value::Pair(a, b) => Box::new((a, b)),
            Value::List(v) => Box::new(v.into_iter().map(Value::into_object).collect::<Vec<_>>()),
        }
    }
}

fuzz_target!(|value: Value| {
    let mut builder = Registry::builder();
    builder
        .with_builtins()
        .expect("builtins")
        .register::<Option<u32>, _>(1, Nullable)
        .expect("option")
        .register::<Vec<String>, _>(2, Sequence::default())
        .expect("vec")
        .register::<BTreeMap<String, u64>, _>(3, Dictionary::default())
        .expect("map")
        .register::<(u8, String), _>(4, Tuple)
        .expect("tuple");
    let registry = builder.build();

    let object = value.into_object();
    let encoded = registry.encode(&object).expect("encode");
    let decoded = registry.decode(encoded.clone()).expect("decode");

    // Compare encodings since `Object` has no equality (and NaN != NaN).
    let reencoded = registry.encode(&decoded).expect("re-encode");
    assert_eq!(encoded, reencoded);
});
