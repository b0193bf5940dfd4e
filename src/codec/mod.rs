//! Schema resolution and the encode/decode dispatch built on it.

pub(crate) mod composite;
pub(crate) mod primitive;

use crate::context::Context;
use crate::error::Error;
use crate::options::FieldOptions;
use crate::schema::{IntWidth, RecordDesc, TypeDesc};
use crate::value::{AsnValue, ChoiceValue};
use crate::wire::raw::{write_value, RawValue};
use crate::wire::tag::Tag;

/// The wire identity and content codec a (type, options) pair resolves to.
pub(crate) struct Expected<'a> {
    pub tag: Tag,
    pub constructed: bool,
    pub codec: Codec<'a>,
}

pub(crate) enum Codec<'a> {
    Boolean,
    Integer(IntWidth),
    Unsigned(IntWidth),
    BigInt,
    OctetString,
    Null,
    Oid,
    Sequence(&'a RecordDesc),
    Set(&'a RecordDesc),
    SequenceOf(&'a TypeDesc),
    SetOf(&'a TypeDesc),
}

/// Class and number forced by the annotation, if any.
fn override_tag(opts: &FieldOptions) -> Option<Tag> {
    let number = opts.tag?;
    Some(if opts.application {
        Tag::Application(number)
    } else if opts.universal {
        Tag::Universal(number)
    } else {
        Tag::ContextSpecific(number)
    })
}

/// The options an explicit wrapper forwards to its inner element.
fn explicit_inner_options(opts: &FieldOptions) -> FieldOptions {
    let mut inner = opts.clone();
    inner.explicit = false;
    inner.tag = None;
    inner.application = false;
    inner
}

impl Context {
    /// Maps a type description plus its options to the expected element:
    /// base universal identity, `set` swap, then class/tag overrides.
    ///
    /// `explicit` and `choice` are handled by the dispatch layer; this
    /// resolver only answers for the element itself.
    pub(crate) fn expected_element<'a>(
        &self,
        desc: &'a TypeDesc,
        opts: &FieldOptions,
    ) -> Result<Expected<'a>, Error> {
        if opts.default_value.is_some()
            && !matches!(desc, TypeDesc::Integer(_) | TypeDesc::Unsigned(_))
        {
            return Err(Error::syntax("'default' requires an integer field"));
        }

        let (mut tag, constructed, mut codec) = match desc {
            TypeDesc::Boolean => (Tag::BOOLEAN, false, Codec::Boolean),
            TypeDesc::Integer(width) => (Tag::INTEGER, false, Codec::Integer(*width)),
            TypeDesc::Unsigned(width) => (Tag::INTEGER, false, Codec::Unsigned(*width)),
            TypeDesc::BigInt => (Tag::INTEGER, false, Codec::BigInt),
            TypeDesc::OctetString => (Tag::OCTET_STRING, false, Codec::OctetString),
            TypeDesc::Null => (Tag::NULL, false, Codec::Null),
            TypeDesc::Oid => (Tag::OBJECT_IDENTIFIER, false, Codec::Oid),
            TypeDesc::SequenceOf(elem) => (Tag::SEQUENCE, true, Codec::SequenceOf(elem)),
            TypeDesc::Record(rec) => (Tag::SEQUENCE, true, Codec::Sequence(rec)),
            TypeDesc::Choice => {
                return Err(Error::syntax(
                    "type not supported: a choice field requires the 'choice' option",
                ));
            }
        };

        if opts.set {
            (tag, codec) = match codec {
                Codec::Sequence(rec) => (Tag::SET, Codec::Set(rec)),
                Codec::SequenceOf(elem) => (Tag::SET, Codec::SetOf(elem)),
                _ => {
                    return Err(Error::syntax(format!(
                        "'set' is not applicable to {}",
                        desc.zero_value().kind_name()
                    )));
                }
            };
        }

        if let Some(forced) = override_tag(opts) {
            tag = forced;
        }

        Ok(Expected {
            tag,
            constructed,
            codec,
        })
    }

    /// The tag an explicit wrapper carries: the override when present,
    /// otherwise the wrapped type's own identity.
    fn explicit_outer(&self, desc: &TypeDesc, opts: &FieldOptions) -> Result<Tag, Error> {
        match override_tag(opts) {
            Some(tag) => Ok(tag),
            None => Ok(self.expected_element(desc, opts)?.tag),
        }
    }

    /// Wire identity of the outermost TLV a non-choice field produces.
    pub(crate) fn outer_element(
        &self,
        desc: &TypeDesc,
        opts: &FieldOptions,
    ) -> Result<(Tag, bool), Error> {
        if opts.explicit {
            Ok((self.explicit_outer(desc, opts)?, true))
        } else {
            let elem = self.expected_element(desc, opts)?;
            Ok((elem.tag, elem.constructed))
        }
    }

    pub(crate) fn decode_value(
        &self,
        input: &mut &[u8],
        desc: &TypeDesc,
        opts: &FieldOptions,
    ) -> Result<AsnValue, Error> {
        let raw = RawValue::read(input, self.der.decoding)?;
        self.decode_raw(&raw, desc, opts)
    }

    pub(crate) fn decode_raw(
        &self,
        raw: &RawValue<'_>,
        desc: &TypeDesc,
        opts: &FieldOptions,
    ) -> Result<AsnValue, Error> {
        if opts.explicit {
            let outer = self.explicit_outer(desc, opts)?;
            if raw.tag != outer {
                log::debug!("explicit wrapper mismatch against options {opts:?}");
                return Err(Error::parse(format!(
                    "expected tag {outer:?} but found {:?}",
                    raw.tag
                )));
            }
            if !raw.constructed {
                return Err(Error::parse("explicit wrapper must be constructed"));
            }
            let mut content = raw.content;
            let child = RawValue::read(&mut content, self.der.decoding)?;
            if !content.is_empty() {
                return Err(Error::parse("trailing data after explicitly wrapped value"));
            }
            return self.decode_raw(&child, desc, &explicit_inner_options(opts));
        }

        if let Some(name) = opts.choice.as_deref() {
            let (variant, entry) = self.choice_by_tag(name, raw.tag)?;
            let value = self.decode_raw(raw, &entry.desc, &entry.opts)?;
            return Ok(AsnValue::Choice(Box::new(ChoiceValue { variant, value })));
        }

        let elem = self.expected_element(desc, opts)?;
        if raw.tag != elem.tag {
            log::debug!("tag mismatch against options {opts:?}");
            return Err(Error::parse(format!(
                "expected tag {:?} but found {:?}",
                elem.tag, raw.tag
            )));
        }
        if raw.constructed != elem.constructed {
            return Err(if elem.constructed {
                Error::parse(format!(
                    "expected a constructed encoding for {:?}",
                    elem.tag
                ))
            } else {
                Error::parse(format!(
                    "constructed encoding is not supported for primitive {:?}",
                    elem.tag
                ))
            });
        }
        self.decode_content(&elem.codec, raw.content)
    }

    fn decode_content(&self, codec: &Codec<'_>, content: &[u8]) -> Result<AsnValue, Error> {
        let der = self.der.decoding;
        match codec {
            Codec::Boolean => primitive::decode_boolean(content, der).map(AsnValue::Boolean),
            Codec::Integer(width) => {
                primitive::decode_integer(content, *width, der).map(AsnValue::Integer)
            }
            Codec::Unsigned(width) => {
                primitive::decode_unsigned(content, *width, der).map(AsnValue::Unsigned)
            }
            Codec::BigInt => primitive::decode_big_int(content, der).map(AsnValue::BigInt),
            Codec::OctetString => Ok(AsnValue::OctetString(content.to_vec())),
            Codec::Null => primitive::decode_null(content).map(|()| AsnValue::Null),
            Codec::Oid => primitive::decode_oid(content).map(AsnValue::Oid),
            Codec::Sequence(rec) => self.decode_record(content, rec, false),
            Codec::Set(rec) => self.decode_record(content, rec, true),
            Codec::SequenceOf(elem) | Codec::SetOf(elem) => self.decode_collection(content, elem),
        }
    }

    pub(crate) fn encode_value(
        &self,
        value: &AsnValue,
        desc: &TypeDesc,
        opts: &FieldOptions,
    ) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.encode_value_into(&mut out, value, desc, opts)?;
        Ok(out)
    }

    fn encode_value_into(
        &self,
        out: &mut Vec<u8>,
        value: &AsnValue,
        desc: &TypeDesc,
        opts: &FieldOptions,
    ) -> Result<(), Error> {
        if opts.explicit {
            let outer = self.explicit_outer(desc, opts)?;
            let inner = self.encode_value(value, desc, &explicit_inner_options(opts))?;
            write_value(out, outer, true, self.emit_indefinite(opts), &inner);
            return Ok(());
        }

        if let Some(name) = opts.choice.as_deref() {
            let AsnValue::Choice(chosen) = value else {
                return Err(Error::syntax(format!(
                    "expected a CHOICE value for '{name}', found {}",
                    value.kind_name()
                )));
            };
            let entry = self.choice_variant(name, chosen.variant)?;
            return self.encode_value_into(out, &chosen.value, &entry.desc, &entry.opts);
        }

        let elem = self.expected_element(desc, opts)?;
        let content = self.encode_content(&elem.codec, value)?;
        let indefinite = elem.constructed && self.emit_indefinite(opts);
        write_value(out, elem.tag, elem.constructed, indefinite, &content);
        Ok(())
    }

    fn encode_content(&self, codec: &Codec<'_>, value: &AsnValue) -> Result<Vec<u8>, Error> {
        match (codec, value) {
            (Codec::Boolean, AsnValue::Boolean(v)) => Ok(primitive::encode_boolean(*v)),
            (Codec::Integer(width), AsnValue::Integer(v)) => {
                if !width.fits_signed(*v) {
                    return Err(Error::syntax(format!(
                        "integer {v} does not fit {} bits",
                        width.bits()
                    )));
                }
                Ok(primitive::encode_integer(*v))
            }
            (Codec::Unsigned(width), AsnValue::Unsigned(v)) => {
                if !width.fits_unsigned(*v) {
                    return Err(Error::syntax(format!(
                        "integer {v} does not fit {} bits",
                        width.bits()
                    )));
                }
                Ok(primitive::encode_unsigned(*v))
            }
            (Codec::BigInt, AsnValue::BigInt(v)) => Ok(primitive::encode_big_int(v)),
            (Codec::OctetString, AsnValue::OctetString(v)) => Ok(v.clone()),
            (Codec::Null, AsnValue::Null) => Ok(Vec::new()),
            (Codec::Oid, AsnValue::Oid(v)) => primitive::encode_oid(v),
            (Codec::Sequence(rec), AsnValue::Sequence(fields)) => {
                self.encode_record(fields, rec, false)
            }
            (Codec::Set(rec), AsnValue::Sequence(fields)) => self.encode_record(fields, rec, true),
            (Codec::SequenceOf(elem), AsnValue::Sequence(items)) => {
                self.encode_collection(items, elem, false)
            }
            (Codec::SetOf(elem), AsnValue::Sequence(items)) => {
                self.encode_collection(items, elem, true)
            }
            (_, value) => Err(Error::syntax(format!(
                "value of kind {} does not match the declared type",
                value.kind_name()
            ))),
        }
    }

    fn emit_indefinite(&self, opts: &FieldOptions) -> bool {
        opts.indefinite && !self.der.encoding
    }
}
