//! Content codecs for the primitive universal types.

use crate::error::Error;
use crate::schema::IntWidth;
use crate::value::ObjectIdentifier;
use crate::wire::tag::write_base128;
use num_bigint::BigInt;

pub(crate) fn decode_boolean(content: &[u8], der: bool) -> Result<bool, Error> {
    let &[byte] = content else {
        return Err(Error::parse(format!(
            "boolean content must be a single octet, found {}",
            content.len()
        )));
    };
    if der && !matches!(byte, 0x00 | 0xff) {
        return Err(Error::parse(format!(
            "non-canonical boolean octet {byte:#04x}"
        )));
    }
    Ok(byte != 0)
}

pub(crate) fn encode_boolean(value: bool) -> Vec<u8> {
    vec![if value { 0xff } else { 0x00 }]
}

fn check_integer_form(content: &[u8], der: bool) -> Result<(), Error> {
    if content.is_empty() {
        return Err(Error::parse("zero-length integer content"));
    }
    if der && content.len() > 1 {
        let redundant = (content[0] == 0x00 && content[1] & 0x80 == 0)
            || (content[0] == 0xff && content[1] & 0x80 != 0);
        if redundant {
            return Err(Error::parse("non-minimal integer encoding"));
        }
    }
    Ok(())
}

pub(crate) fn decode_integer(content: &[u8], width: IntWidth, der: bool) -> Result<i64, Error> {
    check_integer_form(content, der)?;
    if content.len() > 8 {
        return Err(Error::parse(format!(
            "integer of {} octets exceeds 64 bits",
            content.len()
        )));
    }
    let mut value = i64::from(content[0] as i8);
    for &byte in &content[1..] {
        value = value << 8 | i64::from(byte);
    }
    if !width.fits_signed(value) {
        return Err(Error::parse(format!(
            "integer {value} does not fit {} bits",
            width.bits()
        )));
    }
    Ok(value)
}

pub(crate) fn decode_unsigned(content: &[u8], width: IntWidth, der: bool) -> Result<u64, Error> {
    check_integer_form(content, der)?;
    if content[0] & 0x80 != 0 {
        return Err(Error::parse("negative content for an unsigned integer"));
    }
    let digits = if content[0] == 0x00 {
        &content[1..]
    } else {
        content
    };
    if digits.len() > 8 {
        return Err(Error::parse(format!(
            "integer of {} octets exceeds 64 bits",
            content.len()
        )));
    }
    let mut value = 0u64;
    for &byte in digits {
        value = value << 8 | u64::from(byte);
    }
    if !width.fits_unsigned(value) {
        return Err(Error::parse(format!(
            "integer {value} does not fit {} bits",
            width.bits()
        )));
    }
    Ok(value)
}

/// Minimum-length two's complement, X.690 8.3.2.
pub(crate) fn encode_integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

pub(crate) fn encode_unsigned(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    let mut out = Vec::with_capacity(9);
    if bytes[start] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(&bytes[start..]);
    out
}

pub(crate) fn decode_big_int(content: &[u8], der: bool) -> Result<BigInt, Error> {
    check_integer_form(content, der)?;
    Ok(BigInt::from_signed_bytes_be(content))
}

pub(crate) fn encode_big_int(value: &BigInt) -> Vec<u8> {
    value.to_signed_bytes_be()
}

pub(crate) fn decode_null(content: &[u8]) -> Result<(), Error> {
    if !content.is_empty() {
        return Err(Error::parse(format!(
            "null content must be empty, found {} octets",
            content.len()
        )));
    }
    Ok(())
}

/// X.690 8.19: the first two arcs share one subidentifier, the rest follow
/// in base-128.
pub(crate) fn decode_oid(content: &[u8]) -> Result<ObjectIdentifier, Error> {
    if content.is_empty() {
        return Err(Error::parse("zero-length object identifier content"));
    }
    let mut input = content;
    let first = read_arc(&mut input)?;
    let head = if first < 40 {
        (0, first)
    } else if first < 80 {
        (1, first - 40)
    } else {
        (2, first - 80)
    };
    let mut arcs = vec![head.0, head.1];
    while !input.is_empty() {
        arcs.push(read_arc(&mut input)?);
    }
    Ok(ObjectIdentifier::new(arcs))
}

fn read_arc(input: &mut &[u8]) -> Result<u64, Error> {
    let mut acc = 0u64;
    let mut leading = true;
    loop {
        let &byte = input
            .first()
            .ok_or_else(|| Error::parse("truncated object identifier arc"))?;
        *input = &input[1..];
        if leading && byte == 0x80 {
            return Err(Error::parse("non-minimal object identifier arc"));
        }
        leading = false;
        if acc > u64::MAX >> 7 {
            return Err(Error::parse("object identifier arc exceeds 64 bits"));
        }
        acc = acc << 7 | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok(acc);
        }
    }
}

pub(crate) fn encode_oid(oid: &ObjectIdentifier) -> Result<Vec<u8>, Error> {
    let arcs = oid.arcs();
    if arcs.len() < 2 {
        return Err(Error::syntax(format!(
            "object identifier needs at least two arcs, found {}",
            arcs.len()
        )));
    }
    let (first, second) = (arcs[0], arcs[1]);
    if first > 2 {
        return Err(Error::syntax(format!(
            "first object identifier arc must be 0, 1 or 2, found {first}"
        )));
    }
    if first < 2 && second >= 40 {
        return Err(Error::syntax(format!(
            "second object identifier arc must be below 40, found {second}"
        )));
    }
    let head = second
        .checked_add(40 * first)
        .ok_or_else(|| Error::syntax("object identifier arc overflow"))?;
    let mut out = Vec::new();
    write_base128(&mut out, head);
    for &arc in &arcs[2..] {
        write_base128(&mut out, arc);
    }
    Ok(out)
}
