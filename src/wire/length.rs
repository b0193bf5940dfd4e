use crate::error::Error;
use byteorder::{BigEndian, ByteOrder};

const LENGTH_SHORT_MAX: u64 = 127;
const LONG_FORM_BIT: u8 = 0b1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Length {
    Definite(usize),
    Indefinite,
}

/// Reads the length octets, X.690 chapter 8.1.3.
///
/// Under DER the indefinite form is rejected outright and definite lengths
/// must use the minimum number of octets.
pub(crate) fn read_length(input: &mut &[u8], der: bool) -> Result<Length, Error> {
    let &first = input.first().ok_or_else(Error::truncated)?;
    *input = &input[1..];
    if first & LONG_FORM_BIT == 0 {
        return Ok(Length::Definite(usize::from(first)));
    }
    let count = usize::from(first & !LONG_FORM_BIT);
    if count == 0 {
        if der {
            return Err(Error::parse(
                "indefinite length form is not supported by DER",
            ));
        }
        return Ok(Length::Indefinite);
    }
    if count == 0x7f {
        return Err(Error::parse("reserved length octet 0xff"));
    }
    if count > 8 {
        return Err(Error::parse(format!(
            "length of {count} octets exceeds the supported range"
        )));
    }
    if input.len() < count {
        return Err(Error::truncated());
    }
    let value = BigEndian::read_uint(&input[..count], count);
    *input = &input[count..];
    if der && (value <= LENGTH_SHORT_MAX || value >> ((count - 1) * 8) == 0) {
        return Err(Error::parse("non-minimal length encoding"));
    }
    usize::try_from(value)
        .map(Length::Definite)
        .map_err(|_| Error::parse("length exceeds the addressable range"))
}

/// Writes a definite length in the minimum number of octets.
pub(crate) fn write_length(out: &mut Vec<u8>, length: usize) {
    let length = length as u64;
    if length <= LENGTH_SHORT_MAX {
        out.push(length as u8);
    } else {
        let count = 8 - length.leading_zeros() as usize / 8;
        out.push(LONG_FORM_BIT | count as u8);
        let mut buffer = [0u8; 8];
        BigEndian::write_uint(&mut buffer, length, count);
        out.extend_from_slice(&buffer[..count]);
    }
}
