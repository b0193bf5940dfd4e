//! SEQUENCE and SET engines: expected-field enumeration, raw extraction and
//! the optional/default/choice matching rules.

use crate::context::Context;
use crate::error::Error;
use crate::options::FieldOptions;
use crate::schema::{RecordDesc, TypeDesc};
use crate::value::AsnValue;
use crate::wire::raw::RawValue;
use crate::wire::tag::Tag;

/// One expected wire element of a record, after choice expansion.
///
/// A choice field contributes one element per registered alternative, all
/// sharing the same `field` index; `grouped` marks them so that a match
/// invalidates the siblings.
struct ExpectedField<'a> {
    tag: Tag,
    field: usize,
    desc: &'a TypeDesc,
    opts: &'a FieldOptions,
    grouped: bool,
    skip: bool,
}

fn default_value(desc: &TypeDesc, default: i64) -> Result<AsnValue, Error> {
    match desc {
        TypeDesc::Integer(_) => Ok(AsnValue::Integer(default)),
        TypeDesc::Unsigned(_) => u64::try_from(default)
            .map(AsnValue::Unsigned)
            .map_err(|_| Error::syntax(format!("negative default {default} for an unsigned field"))),
        _ => Err(Error::syntax("'default' requires an integer field")),
    }
}

impl Context {
    fn expected_fields<'a>(&'a self, rec: &'a RecordDesc) -> Result<Vec<ExpectedField<'a>>, Error> {
        let mut expected = Vec::new();
        for (index, field) in rec.fields().iter().enumerate() {
            match field.opts().choice.as_deref() {
                Some(name) if !field.opts().explicit => {
                    for entry in self.choice_entries(name)? {
                        expected.push(ExpectedField {
                            tag: entry.tag,
                            field: index,
                            desc: field.desc(),
                            opts: field.opts(),
                            grouped: true,
                            skip: false,
                        });
                    }
                }
                _ => {
                    let (tag, _) = self.outer_element(field.desc(), field.opts())?;
                    expected.push(ExpectedField {
                        tag,
                        field: index,
                        desc: field.desc(),
                        opts: field.opts(),
                        grouped: false,
                        skip: false,
                    });
                }
            }
        }
        Ok(expected)
    }

    /// Reads up to `max` TLVs out of the record content.
    fn raw_items<'a>(&self, mut content: &'a [u8], max: usize) -> Result<Vec<RawValue<'a>>, Error> {
        let mut raws = Vec::new();
        while !content.is_empty() {
            if raws.len() == max {
                return Err(Error::parse("too many items for the sequence"));
            }
            raws.push(RawValue::read(&mut content, self.der.decoding)?);
        }
        Ok(raws)
    }

    pub(crate) fn decode_record(
        &self,
        content: &[u8],
        rec: &RecordDesc,
        as_set: bool,
    ) -> Result<AsnValue, Error> {
        let mut expected = self.expected_fields(rec)?;
        if as_set {
            expected.sort_by_key(|e| e.tag);
            for pair in expected.windows(2) {
                if pair[0].tag == pair[1].tag {
                    return Err(Error::syntax(format!("duplicated tag {:?}", pair[0].tag)));
                }
            }
        }
        let mut raws = self.raw_items(content, expected.len())?;
        // DER transmits a SET already sorted; only BER needs the raw values
        // reordered before matching.
        if as_set && !self.der.decoding {
            raws.sort_by_key(|raw| raw.tag);
        }
        let values = self.match_fields(rec, &mut expected, &raws)?;
        Ok(AsnValue::Sequence(values))
    }

    /// Walks the expected elements in order against the raw values with a
    /// single advancing raw index.
    fn match_fields(
        &self,
        rec: &RecordDesc,
        expected: &mut [ExpectedField<'_>],
        raws: &[RawValue<'_>],
    ) -> Result<Vec<AsnValue>, Error> {
        let mut values: Vec<Option<AsnValue>> = vec![None; rec.fields().len()];
        let mut raw_index = 0;
        for e_index in 0..expected.len() {
            if expected[e_index].skip {
                continue;
            }
            if raw_index < raws.len() && raws[raw_index].tag == expected[e_index].tag {
                let value = self.decode_raw(
                    &raws[raw_index],
                    expected[e_index].desc,
                    expected[e_index].opts,
                )?;
                let field = expected[e_index].field;
                values[field] = Some(value);
                raw_index += 1;
                if expected[e_index].grouped {
                    for other in expected.iter_mut() {
                        if other.field == field && other.grouped {
                            other.skip = true;
                        }
                    }
                }
                continue;
            }

            let element = &expected[e_index];
            if element.opts.optional || element.grouped {
                continue;
            }
            if let Some(default) = element.opts.default_value {
                values[element.field] = Some(default_value(element.desc, default)?);
                continue;
            }
            return Err(Error::parse(format!(
                "missing value for {:?} (field '{}' of {})",
                element.tag,
                rec.fields()[element.field].name(),
                rec.name()
            )));
        }
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                value.unwrap_or_else(|| rec.fields()[index].desc().zero_value())
            })
            .collect())
    }

    pub(crate) fn decode_collection(
        &self,
        mut content: &[u8],
        elem: &TypeDesc,
    ) -> Result<AsnValue, Error> {
        let empty = FieldOptions::default();
        let mut items = Vec::new();
        while !content.is_empty() {
            items.push(self.decode_value(&mut content, elem, &empty)?);
        }
        Ok(AsnValue::Sequence(items))
    }

    pub(crate) fn encode_record(
        &self,
        values: &[AsnValue],
        rec: &RecordDesc,
        as_set: bool,
    ) -> Result<Vec<u8>, Error> {
        if values.len() != rec.fields().len() {
            return Err(Error::syntax(format!(
                "record {} expects {} fields, found {}",
                rec.name(),
                rec.fields().len(),
                values.len()
            )));
        }
        let mut parts: Vec<(Tag, Vec<u8>)> = Vec::new();
        for (field, value) in rec.fields().iter().zip(values) {
            if self.omit_field(field.desc(), field.opts(), value)? {
                continue;
            }
            let tag = self.field_wire_tag(field.desc(), field.opts(), value)?;
            let bytes = self.encode_value(value, field.desc(), field.opts())?;
            parts.push((tag, bytes));
        }
        if as_set {
            parts.sort_by_key(|(tag, _)| *tag);
        }
        let mut content = Vec::new();
        for (_, bytes) in parts {
            content.extend_from_slice(&bytes);
        }
        Ok(content)
    }

    fn omit_field(
        &self,
        desc: &TypeDesc,
        opts: &FieldOptions,
        value: &AsnValue,
    ) -> Result<bool, Error> {
        if opts.optional && *value == desc.zero_value() {
            return Ok(true);
        }
        if let Some(default) = opts.default_value {
            if *value == default_value(desc, default)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The tag a field's encoding will start with, for SET ordering.
    fn field_wire_tag(
        &self,
        desc: &TypeDesc,
        opts: &FieldOptions,
        value: &AsnValue,
    ) -> Result<Tag, Error> {
        match opts.choice.as_deref() {
            Some(name) if !opts.explicit => {
                let AsnValue::Choice(chosen) = value else {
                    return Err(Error::syntax(format!(
                        "expected a CHOICE value for '{name}', found {}",
                        value.kind_name()
                    )));
                };
                Ok(self.choice_variant(name, chosen.variant)?.tag)
            }
            _ => Ok(self.outer_element(desc, opts)?.0),
        }
    }

    pub(crate) fn encode_collection(
        &self,
        items: &[AsnValue],
        elem: &TypeDesc,
        as_set: bool,
    ) -> Result<Vec<u8>, Error> {
        let empty = FieldOptions::default();
        let mut encodings = Vec::with_capacity(items.len());
        for item in items {
            encodings.push(self.encode_value(item, elem, &empty)?);
        }
        if as_set && self.der.encoding {
            encodings.sort();
        }
        Ok(encodings.concat())
    }
}
