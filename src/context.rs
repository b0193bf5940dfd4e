use std::collections::HashMap;

use crate::error::Error;
use crate::options::FieldOptions;
use crate::schema::{AsnType, TypeDesc};
use crate::wire::tag::Tag;

/// Global settings shared by every encode/decode call: the DER mode pair
/// and the CHOICE registry.
///
/// Configure a context first (`set_der`, `add_choice`), then use it for any
/// number of codec calls; a configured context is never mutated by them.
///
/// ```
/// use asn1ber::Context;
///
/// let mut ctx = Context::new();
/// ctx.set_der(true, false);
/// let bytes = ctx.encode(&5i64).unwrap();
/// assert_eq!(bytes, [0x02, 0x01, 0x05]);
/// ```
pub struct Context {
    pub(crate) choices: HashMap<String, Vec<ChoiceEntry>>,
    pub(crate) der: DerMode,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DerMode {
    pub encoding: bool,
    pub decoding: bool,
}

/// One registered CHOICE alternative with its resolved wire identity.
#[derive(Debug, Clone)]
pub(crate) struct ChoiceEntry {
    pub tag: Tag,
    pub desc: TypeDesc,
    pub opts: FieldOptions,
}

impl Context {
    /// A fresh context: DER on the encoding side, plain BER on the
    /// decoding side.
    pub fn new() -> Self {
        Context {
            choices: HashMap::new(),
            der: DerMode {
                encoding: true,
                decoding: false,
            },
        }
    }

    /// Switches DER mode independently for encoding and decoding, so a
    /// peer can accept BER while emitting DER.
    pub fn set_der(&mut self, encoding: bool, decoding: bool) {
        self.der = DerMode { encoding, decoding };
    }

    /// Registers the alternatives of a named CHOICE group, in the order
    /// that defines their variant indices.
    pub fn add_choice(&mut self, name: &str, variants: &[(TypeDesc, &str)]) -> Result<(), Error> {
        for (desc, annotation) in variants {
            let opts = FieldOptions::parse(annotation)?;
            if let Some(nested) = &opts.choice {
                return Err(Error::syntax(format!(
                    "nested choices are not allowed: '{nested}' inside '{name}'"
                )));
            }
            let tag = self.expected_element(desc, &opts)?.tag;
            let entries = self.choices.entry(name.to_string()).or_default();
            if entries.iter().any(|entry| entry.tag == tag) {
                return Err(Error::syntax(format!(
                    "choice already registered: {name} {tag:?}"
                )));
            }
            log::trace!("choice {name}: variant {} is {tag:?}", entries.len());
            entries.push(ChoiceEntry {
                tag,
                desc: desc.clone(),
                opts,
            });
        }
        Ok(())
    }

    pub(crate) fn choice_entries(&self, name: &str) -> Result<&[ChoiceEntry], Error> {
        self.choices
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::syntax(format!("invalid choice '{name}'")))
    }

    pub(crate) fn choice_by_tag(
        &self,
        name: &str,
        tag: Tag,
    ) -> Result<(usize, &ChoiceEntry), Error> {
        self.choice_entries(name)?
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.tag == tag)
            .ok_or_else(|| {
                Error::parse(format!(
                    "no alternative of choice '{name}' matches {tag:?}"
                ))
            })
    }

    pub(crate) fn choice_variant(&self, name: &str, variant: usize) -> Result<&ChoiceEntry, Error> {
        self.choice_entries(name)?.get(variant).ok_or_else(|| {
            Error::syntax(format!("choice '{name}' has no alternative {variant}"))
        })
    }

    /// Encodes a value with an empty annotation.
    pub fn encode<T: AsnType>(&self, value: &T) -> Result<Vec<u8>, Error> {
        self.encode_with_options(value, "")
    }

    /// Encodes a value, treating the annotation like a field annotation on
    /// the top-level element.
    pub fn encode_with_options<T: AsnType>(
        &self,
        value: &T,
        annotation: &str,
    ) -> Result<Vec<u8>, Error> {
        let opts = FieldOptions::parse(annotation)?;
        let desc = T::type_desc();
        self.encode_value(&value.to_value(), &desc, &opts)
    }

    /// Decodes one element into `target` and returns the remaining bytes.
    pub fn decode<'a, T: AsnType>(
        &self,
        data: &'a [u8],
        target: &mut T,
    ) -> Result<&'a [u8], Error> {
        self.decode_with_options(data, target, "")
    }

    /// Decodes one element using an annotation for the top-level element
    /// and returns the remaining bytes. On error the target is left
    /// untouched.
    pub fn decode_with_options<'a, T: AsnType>(
        &self,
        data: &'a [u8],
        target: &mut T,
        annotation: &str,
    ) -> Result<&'a [u8], Error> {
        let opts = FieldOptions::parse(annotation)?;
        let desc = T::type_desc();
        let mut input = data;
        let value = self.decode_value(&mut input, &desc, &opts)?;
        *target = T::from_value(value)?;
        Ok(input)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntWidth;

    #[test]
    fn duplicate_choice_tags_rejected() {
        let mut ctx = Context::new();
        let err = ctx
            .add_choice(
                "num",
                &[
                    (TypeDesc::Integer(IntWidth::W64), ""),
                    (TypeDesc::Unsigned(IntWidth::W64), ""),
                ],
            )
            .unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn nested_choice_rejected() {
        let mut ctx = Context::new();
        ctx.add_choice("inner", &[(TypeDesc::Boolean, "")]).unwrap();
        let err = ctx
            .add_choice("outer", &[(TypeDesc::Choice, "choice:inner")])
            .unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn unknown_choice_name() {
        let ctx = Context::new();
        assert!(ctx.choice_entries("nope").unwrap_err().is_syntax());
    }

    #[test]
    fn lookup_by_tag_and_variant() {
        let mut ctx = Context::new();
        ctx.add_choice(
            "body",
            &[
                (TypeDesc::Integer(IntWidth::W64), ""),
                (TypeDesc::OctetString, "tag:0"),
            ],
        )
        .unwrap();

        let (variant, entry) = ctx.choice_by_tag("body", Tag::INTEGER).unwrap();
        assert_eq!(variant, 0);
        assert_eq!(entry.desc, TypeDesc::Integer(IntWidth::W64));

        let (variant, _) = ctx.choice_by_tag("body", Tag::ContextSpecific(0)).unwrap();
        assert_eq!(variant, 1);

        assert!(ctx
            .choice_by_tag("body", Tag::ContextSpecific(9))
            .unwrap_err()
            .is_parse());
        assert!(ctx.choice_variant("body", 2).unwrap_err().is_syntax());
    }
}
