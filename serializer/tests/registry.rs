//! Integration tests for the registry's public surface.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;
use tagwire_serializer::{
    buffer, builtin, Codec, Declaration, Error, Fixed, Nullable, Object, RangeCfg, Registry, Sequence,
    Serializable, Utf8,
};
use test_case::test_case;

/// A 4-byte big-endian integer, written by hand.
struct Int32;

impl Codec<i32> for Int32 {
    fn write(&self, value: &i32, buf: &mut dyn BufMut, _: &Registry) -> Result<(), Error> {
        buffer::has_capacity(buf, 4)?;
        buf.put_i32(*value);
        Ok(())
    }

    fn read(&self, buf: &mut dyn Buf, _: &Registry) -> Result<i32, Error> {
        buffer::at_least(buf, 4)?;
        Ok(buf.get_i32())
    }
}

/// A 4-byte length followed by UTF-8 bytes, written by hand.
struct Text;

impl Codec<String> for Text {
    fn write(&self, value: &String, buf: &mut dyn BufMut, _: &Registry) -> Result<(), Error> {
        buffer::put_len(buf, value.len(), "Text")?;
        buffer::put_slice(buf, value.as_bytes())
    }

    fn read(&self, buf: &mut dyn Buf, _: &Registry) -> Result<String, Error> {
        let len = buffer::get_len(buf, &RangeCfg::new(..=1024), "Text")?;
        let bytes = buffer::get_bytes(buf, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::MalformedData("Text", e.to_string()))
    }
}

fn scalars() -> Registry {
    let mut builder = Registry::builder();
    builder
        .register::<i32, _>(1, Int32)
        .unwrap()
        .register::<String, _>(2, Text)
        .unwrap();
    builder.build()
}

#[test]
fn test_integer_scenario() {
    let registry = scalars();
    let mut buf = BytesMut::new();
    registry.write(&42i32, &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        &[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x2A]
    );
    let mut reader = buf.freeze();
    assert_eq!(registry.read_as::<i32>(&mut reader).unwrap(), 42);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_string_scenario() {
    let registry = scalars();
    let mut buf = BytesMut::new();
    registry.write(&String::from("hi"), &mut buf).unwrap();
    assert_eq!(
        &buf[..],
        &[0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x68, 0x69]
    );
    let mut reader = buf.freeze();
    assert_eq!(registry.read_as::<String>(&mut reader).unwrap(), "hi");
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_builtin_codecs_match_scenario() {
    // The built-in codecs produce the same bodies as the hand-written ones
    let mut builder = Registry::builder();
    builder
        .register::<i32, _>(1, Fixed)
        .unwrap()
        .register::<String, _>(2, Utf8::default())
        .unwrap();
    let registry = builder.build();
    let reference = scalars();

    assert_eq!(
        registry.encode(&42i32).unwrap(),
        reference.encode(&42i32).unwrap()
    );
    assert_eq!(
        registry.encode(&String::from("hi")).unwrap(),
        reference.encode(&String::from("hi")).unwrap()
    );
}

#[test_case(0; "zero")]
#[test_case(-1; "negative")]
#[test_case(i32::MAX; "max")]
#[test_case(i32::MIN; "min")]
fn test_integer_roundtrip(value: i32) {
    let registry = scalars();
    let encoded = registry.encode(&value).unwrap();
    assert_eq!(encoded.len(), 8);
    assert_eq!(registry.decode_as::<i32>(encoded).unwrap(), value);
}

#[test_case(""; "empty")]
#[test_case("hello"; "ascii")]
#[test_case("añb"; "multibyte")]
fn test_string_roundtrip(value: &str) {
    let registry = scalars();
    let value = value.to_string();
    let encoded = registry.encode(&value).unwrap();
    assert_eq!(encoded.len(), 8 + value.len());
    assert_eq!(registry.decode_as::<String>(encoded).unwrap(), value);
}

#[test]
fn test_unknown_identifier() {
    let registry = scalars();
    let mut reader: &[u8] = &[0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x2A];
    assert_eq!(
        registry.read(&mut reader).unwrap_err(),
        Error::UnknownIdentifier(3)
    );
    assert_eq!(reader, &[0x00, 0x00, 0x00, 0x2A]);
}

#[test]
fn test_truncated_body() {
    let registry = scalars();
    let mut reader: &[u8] = &[0x00, 0x00, 0x00, 0x01, 0x00, 0x2A];
    assert_eq!(
        registry.read_as::<i32>(&mut reader).unwrap_err(),
        Error::BufferUnderflow {
            needed: 4,
            remaining: 2
        }
    );
}

#[test]
fn test_malformed_length() {
    let registry = scalars();
    let mut reader: &[u8] = &[0x00, 0x00, 0x00, 0x02, 0xFF, 0xFF, 0xFF, 0xFF];
    assert!(matches!(
        registry.read_as::<String>(&mut reader),
        Err(Error::MalformedData("Text", _))
    ));
}

// Two-field records, one containing the other.

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    label: String,
}

struct PointCodec;

impl Codec<Point> for PointCodec {
    fn write(&self, value: &Point, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error> {
        registry.write(&value.x, buf)?;
        registry.write(&value.label, buf)
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Point, Error> {
        Ok(Point {
            x: registry.read_as(buf)?,
            label: registry.read_as(buf)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    start: Point,
    end: Point,
}

struct SegmentCodec;

impl Codec<Segment> for SegmentCodec {
    fn write(
        &self,
        value: &Segment,
        buf: &mut dyn BufMut,
        registry: &Registry,
    ) -> Result<(), Error> {
        registry.write(&value.start, buf)?;
        registry.write(&value.end, buf)
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Segment, Error> {
        Ok(Segment {
            start: registry.read_as(buf)?,
            end: registry.read_as(buf)?,
        })
    }
}

fn shapes() -> Registry {
    let mut builder = Registry::builder();
    builder
        .register::<i32, _>(1, Int32)
        .unwrap()
        .register::<String, _>(2, Text)
        .unwrap()
        .register::<Point, _>(10, PointCodec)
        .unwrap()
        .register::<Segment, _>(11, SegmentCodec)
        .unwrap();
    builder.build()
}

#[test]
fn test_nested_record() {
    let registry = shapes();
    let point = Point {
        x: 42,
        label: "hi".into(),
    };
    let encoded = registry.encode(&point).unwrap();
    let mut expected = vec![0x00, 0x00, 0x00, 0x0A];
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x2A]);
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x68, 0x69]);
    assert_eq!(&encoded[..], &expected[..]);
    assert_eq!(registry.decode_as::<Point>(encoded).unwrap(), point);
}

#[test]
fn test_two_levels_of_nesting() {
    let registry = shapes();
    let segment = Segment {
        start: Point {
            x: -1,
            label: "start".into(),
        },
        end: Point {
            x: 1,
            label: "end".into(),
        },
    };
    let encoded = registry.encode(&segment).unwrap();
    assert_eq!(registry.decode_as::<Segment>(encoded).unwrap(), segment);
}

#[test]
fn test_nested_unregistered_field() {
    // `Point` is bound but its `String` field is not
    let mut builder = Registry::builder();
    builder
        .register::<i32, _>(1, Int32)
        .unwrap()
        .register::<Point, _>(10, PointCodec)
        .unwrap();
    let registry = builder.build();
    let point = Point {
        x: 1,
        label: "x".into(),
    };
    let mut buf = BytesMut::new();
    assert!(matches!(
        registry.write(&point, &mut buf),
        Err(Error::UnregisteredType(_))
    ));

    // No rollback: the prefix written before the failure remains
    assert_eq!(buf.len(), 4 + 8);
}

#[test]
fn test_nested_mismatch_is_not_coerced() {
    let registry = shapes();

    // A `Point` whose first field is a string
    let mut buf = BytesMut::new();
    buffer::put_id(&mut buf, 10).unwrap();
    registry.write(&String::from("oops"), &mut buf).unwrap();
    registry.write(&String::from("label"), &mut buf).unwrap();
    assert!(matches!(
        registry.decode_as::<Point>(buf),
        Err(Error::TypeMismatch {
            expected: "i32",
            ..
        })
    ));
}

// Self-serializing types

#[derive(Debug, PartialEq)]
struct Version {
    major: u16,
    minor: u16,
    tags: Vec<String>,
}

impl Serializable for Version {
    fn write_to(&self, buf: &mut dyn BufMut, registry: &Registry) -> Result<(), Error> {
        buffer::has_capacity(buf, 4)?;
        buf.put_u16(self.major);
        buf.put_u16(self.minor);
        registry.write(&self.tags, buf)
    }

    fn read_from(buf: &mut dyn Buf, registry: &Registry) -> Result<Self, Error> {
        buffer::at_least(buf, 4)?;
        let major = buf.get_u16();
        let minor = buf.get_u16();
        let tags = registry.read_as(buf)?;
        Ok(Self { major, minor, tags })
    }
}

#[test]
fn test_serializable() {
    let mut builder = Registry::builder();
    builder
        .with_builtins()
        .unwrap()
        .register::<Vec<String>, _>(1, Sequence::new(..=8))
        .unwrap()
        .register_serializable::<Version>(2)
        .unwrap();
    let registry = builder.build();

    let version = Version {
        major: 1,
        minor: 4,
        tags: vec!["stable".into(), "lts".into()],
    };
    let encoded = registry.encode(&version).unwrap();
    assert_eq!(&encoded[..4], &[0, 0, 0, 2]);
    assert_eq!(registry.decode_as::<Version>(encoded).unwrap(), version);
}

// Polymorphic fields

#[derive(Debug)]
struct Envelope {
    sender: u64,
    payload: Object,
}

struct EnvelopeCodec;

impl Codec<Envelope> for EnvelopeCodec {
    fn write(
        &self,
        value: &Envelope,
        buf: &mut dyn BufMut,
        registry: &Registry,
    ) -> Result<(), Error> {
        registry.write(&value.sender, buf)?;
        registry.write_object(value.payload.as_ref(), buf)
    }

    fn read(&self, buf: &mut dyn Buf, registry: &Registry) -> Result<Envelope, Error> {
        Ok(Envelope {
            sender: registry.read_as(buf)?,
            payload: registry.read(buf)?,
        })
    }
}

#[test]
fn test_polymorphic_field() {
    let mut builder = Registry::builder();
    builder
        .with_builtins()
        .unwrap()
        .register::<Envelope, _>(1, EnvelopeCodec)
        .unwrap()
        .register::<Option<Bytes>, _>(2, Nullable)
        .unwrap()
        .register::<BTreeMap<String, u64>, _>(3, tagwire_serializer::Dictionary::default())
        .unwrap();
    let registry = builder.build();

    let mut balances = BTreeMap::new();
    balances.insert("alice".to_string(), 10u64);
    let payloads: Vec<Object> = vec![
        Box::new(String::from("text")),
        Box::new(Some(Bytes::from_static(b"raw"))),
        Box::new(balances.clone()),
    ];
    for payload in payloads {
        let envelope = Envelope { sender: 9, payload };
        let encoded = registry.encode(&envelope).unwrap();
        let decoded = registry.decode_as::<Envelope>(encoded).unwrap();
        assert_eq!(decoded.sender, 9);
        assert_eq!(
            registry.encode(&decoded.payload).unwrap(),
            registry.encode(&envelope.payload).unwrap()
        );
    }
}

#[test]
fn test_builtin_identifiers_on_wire() {
    let mut builder = Registry::builder();
    builder.with_builtins().unwrap();
    let registry = builder.build();
    let encoded = registry.encode(&true).unwrap();
    assert_eq!(&encoded[..], &[0xFF, 0xFF, 0xFF, 0x00, 0x01]);
    assert_eq!(
        registry.binding(builtin::STRING).unwrap().type_name(),
        core::any::type_name::<String>()
    );
}

#[test]
fn test_declarations() {
    let declarations = [
        Declaration::new::<i32, _, _>(1, || Int32),
        Declaration::new::<String, _, _>(2, || Text),
        Declaration::new::<Point, _, _>(10, || PointCodec),
    ];
    let mut builder = Registry::builder();
    builder.declare(declarations).unwrap();
    let registry = builder.build();
    let point = Point {
        x: 3,
        label: "declared".into(),
    };
    let encoded = registry.encode(&point).unwrap();
    assert_eq!(registry.decode_as::<Point>(encoded).unwrap(), point);
}

#[test]
fn test_writer_out_of_space() {
    let registry = scalars();
    let mut storage = [0u8; 6];
    let mut writer = &mut storage[..];
    assert_eq!(
        registry.write(&42i32, &mut writer),
        Err(Error::BufferOverflow {
            needed: 4,
            remaining: 2
        })
    );
    // The identifier fit and was written
    assert_eq!(storage, [0, 0, 0, 1, 0, 0]);
}
