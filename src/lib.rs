//! Runtime, schema-directed encoding and decoding of ASN.1 values under the
//! Basic and Distinguished Encoding Rules of ITU-T X.690.
//!
//! Values travel as [`AsnValue`] trees; a hand-written [`AsnType`]
//! implementation describes each user type once ([`TypeDesc`] plus the
//! conversions), and field annotations such as `"tag:0,explicit,optional"`
//! steer tagging, optionality, defaults, SET semantics and CHOICE dispatch.
//!
//! ```
//! use asn1ber::{decode, encode};
//!
//! let bytes = encode(&true).unwrap();
//! assert_eq!(bytes, [0x01, 0x01, 0xff]);
//!
//! let mut flag = false;
//! let rest = decode(&bytes, &mut flag).unwrap();
//! assert!(flag);
//! assert!(rest.is_empty());
//! ```
//!
//! A [`Context`] carries the DER mode pair and the CHOICE registry; the
//! free functions below run on a fresh default context.

mod codec;
mod context;
mod error;
mod options;
mod schema;
mod value;
mod wire;

pub use context::Context;
pub use error::{Error, ErrorKind};
pub use options::FieldOptions;
pub use schema::{AsnType, IntWidth, RecordDesc, TypeDesc};
pub use value::{AsnValue, ChoiceValue, Null, ObjectIdentifier, OctetString};
pub use wire::{Class, Tag};

/// Encodes a value on a default context and without options.
pub fn encode<T: AsnType>(value: &T) -> Result<Vec<u8>, Error> {
    Context::new().encode(value)
}

/// Encodes a value on a default context with a top-level annotation.
pub fn encode_with_options<T: AsnType>(value: &T, annotation: &str) -> Result<Vec<u8>, Error> {
    Context::new().encode_with_options(value, annotation)
}

/// Decodes one element on a default context and returns the remaining
/// bytes.
pub fn decode<'a, T: AsnType>(data: &'a [u8], target: &mut T) -> Result<&'a [u8], Error> {
    Context::new().decode(data, target)
}

/// Decodes one element on a default context with a top-level annotation
/// and returns the remaining bytes.
pub fn decode_with_options<'a, T: AsnType>(
    data: &'a [u8],
    target: &mut T,
    annotation: &str,
) -> Result<&'a [u8], Error> {
    Context::new().decode_with_options(data, target, annotation)
}
