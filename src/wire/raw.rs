use crate::error::Error;
use crate::wire::length::{read_length, write_length, Length};
use crate::wire::tag::{read_identifier, write_identifier, Tag};

/// One decoded TLV whose content octets are still unparsed.
///
/// For an indefinite-length value the content is the span of the child TLVs
/// up to, but excluding, the end-of-contents octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawValue<'a> {
    pub tag: Tag,
    pub constructed: bool,
    pub indefinite: bool,
    pub content: &'a [u8],
}

impl<'a> RawValue<'a> {
    pub(crate) fn read(input: &mut &'a [u8], der: bool) -> Result<RawValue<'a>, Error> {
        let (tag, constructed) = read_identifier(input)?;
        match read_length(input, der)? {
            Length::Definite(length) => {
                if input.len() < length {
                    return Err(Error::truncated());
                }
                let (content, rest) = input.split_at(length);
                *input = rest;
                Ok(RawValue {
                    tag,
                    constructed,
                    indefinite: false,
                    content,
                })
            }
            Length::Indefinite => {
                if !constructed {
                    return Err(Error::parse(
                        "indefinite length requires a constructed encoding",
                    ));
                }
                let start = *input;
                loop {
                    if input.len() >= 2 && input[0] == 0x00 && input[1] == 0x00 {
                        let content = &start[..start.len() - input.len()];
                        *input = &input[2..];
                        return Ok(RawValue {
                            tag,
                            constructed,
                            indefinite: true,
                            content,
                        });
                    }
                    skip_value(input)?;
                }
            }
        }
    }
}

/// Advances past one TLV without materializing it.
fn skip_value(input: &mut &[u8]) -> Result<(), Error> {
    let (_, constructed) = read_identifier(input)?;
    match read_length(input, false)? {
        Length::Definite(length) => {
            if input.len() < length {
                return Err(Error::truncated());
            }
            *input = &input[length..];
        }
        Length::Indefinite => {
            if !constructed {
                return Err(Error::parse(
                    "indefinite length requires a constructed encoding",
                ));
            }
            loop {
                if input.len() >= 2 && input[0] == 0x00 && input[1] == 0x00 {
                    *input = &input[2..];
                    break;
                }
                skip_value(input)?;
            }
        }
    }
    Ok(())
}

/// Emits one complete TLV.
pub(crate) fn write_value(
    out: &mut Vec<u8>,
    tag: Tag,
    constructed: bool,
    indefinite: bool,
    content: &[u8],
) {
    write_identifier(out, tag, constructed);
    if indefinite {
        out.push(0x80);
        out.extend_from_slice(content);
        out.extend_from_slice(&[0x00, 0x00]);
    } else {
        write_length(out, content.len());
        out.extend_from_slice(content);
    }
}
