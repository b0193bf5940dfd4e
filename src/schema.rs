use crate::error::Error;
use crate::options::FieldOptions;
use crate::value::{AsnValue, Null, ObjectIdentifier, OctetString};
use num_bigint::BigInt;

/// Width of a native integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub(crate) fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    pub(crate) fn fits_signed(self, value: i64) -> bool {
        match self {
            IntWidth::W8 => i8::try_from(value).is_ok(),
            IntWidth::W16 => i16::try_from(value).is_ok(),
            IntWidth::W32 => i32::try_from(value).is_ok(),
            IntWidth::W64 => true,
        }
    }

    pub(crate) fn fits_unsigned(self, value: u64) -> bool {
        match self {
            IntWidth::W8 => u8::try_from(value).is_ok(),
            IntWidth::W16 => u16::try_from(value).is_ok(),
            IntWidth::W32 => u32::try_from(value).is_ok(),
            IntWidth::W64 => true,
        }
    }
}

/// Static description of a value shape.
///
/// Descriptions are built once per user type and drive every codec decision;
/// no runtime type inspection happens anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    Boolean,
    Integer(IntWidth),
    Unsigned(IntWidth),
    BigInt,
    OctetString,
    Null,
    Oid,
    SequenceOf(Box<TypeDesc>),
    Record(RecordDesc),
    /// Stands in for a field whose shape is selected by a registered CHOICE
    /// group; only meaningful together with a `choice` annotation.
    Choice,
}

impl TypeDesc {
    /// The value an absent optional field decodes to, and the value an
    /// optional field is compared against when deciding to omit it.
    pub(crate) fn zero_value(&self) -> AsnValue {
        match self {
            TypeDesc::Boolean => AsnValue::Boolean(false),
            TypeDesc::Integer(_) => AsnValue::Integer(0),
            TypeDesc::Unsigned(_) => AsnValue::Unsigned(0),
            TypeDesc::BigInt => AsnValue::BigInt(BigInt::default()),
            TypeDesc::OctetString => AsnValue::OctetString(Vec::new()),
            TypeDesc::Null => AsnValue::Null,
            TypeDesc::Oid => AsnValue::Oid(ObjectIdentifier::default()),
            TypeDesc::SequenceOf(_) => AsnValue::Sequence(Vec::new()),
            TypeDesc::Record(rec) => AsnValue::Sequence(
                rec.fields().iter().map(|f| f.desc().zero_value()).collect(),
            ),
            TypeDesc::Choice => AsnValue::Null,
        }
    }
}

/// Ordered field list of a SEQUENCE or SET record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDesc {
    name: &'static str,
    fields: Vec<FieldDesc>,
}

impl RecordDesc {
    pub fn new(name: &'static str) -> Self {
        RecordDesc {
            name,
            fields: Vec::new(),
        }
    }

    /// Appends a field; the annotation is parsed and validated here, once.
    pub fn field(
        mut self,
        name: &'static str,
        desc: TypeDesc,
        annotation: &str,
    ) -> Result<Self, Error> {
        let opts = FieldOptions::parse(annotation)?;
        self.fields.push(FieldDesc { name, desc, opts });
        Ok(self)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldDesc {
    name: &'static str,
    desc: TypeDesc,
    opts: FieldOptions,
}

impl FieldDesc {
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn desc(&self) -> &TypeDesc {
        &self.desc
    }

    pub(crate) fn opts(&self) -> &FieldOptions {
        &self.opts
    }
}

/// Hand-written schema description of a user type: its shape plus the
/// conversions between the native representation and [`AsnValue`].
pub trait AsnType: Sized {
    fn type_desc() -> TypeDesc;

    fn to_value(&self) -> AsnValue;

    fn from_value(value: AsnValue) -> Result<Self, Error>;
}

fn mismatch(expected: &str, found: &AsnValue) -> Error {
    Error::syntax(format!(
        "expected a {expected} value, found {}",
        found.kind_name()
    ))
}

impl AsnType for bool {
    fn type_desc() -> TypeDesc {
        TypeDesc::Boolean
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::Boolean(*self)
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::Boolean(v) => Ok(v),
            other => Err(mismatch("BOOLEAN", &other)),
        }
    }
}

macro_rules! signed_asn_type {
    ( $($ty:ty => $width:ident),+ $(,)? ) => {$(
        impl AsnType for $ty {
            fn type_desc() -> TypeDesc {
                TypeDesc::Integer(IntWidth::$width)
            }

            fn to_value(&self) -> AsnValue {
                AsnValue::Integer(i64::from(*self))
            }

            fn from_value(value: AsnValue) -> Result<Self, Error> {
                match value {
                    AsnValue::Integer(v) => <$ty>::try_from(v).map_err(|_| {
                        Error::syntax(format!(
                            "value {v} does not fit {}",
                            stringify!($ty)
                        ))
                    }),
                    other => Err(mismatch("INTEGER", &other)),
                }
            }
        }
    )*};
}

macro_rules! unsigned_asn_type {
    ( $($ty:ty => $width:ident),+ $(,)? ) => {$(
        impl AsnType for $ty {
            fn type_desc() -> TypeDesc {
                TypeDesc::Unsigned(IntWidth::$width)
            }

            fn to_value(&self) -> AsnValue {
                AsnValue::Unsigned(u64::from(*self))
            }

            fn from_value(value: AsnValue) -> Result<Self, Error> {
                match value {
                    AsnValue::Unsigned(v) => <$ty>::try_from(v).map_err(|_| {
                        Error::syntax(format!(
                            "value {v} does not fit {}",
                            stringify!($ty)
                        ))
                    }),
                    other => Err(mismatch("INTEGER", &other)),
                }
            }
        }
    )*};
}

signed_asn_type!(i8 => W8, i16 => W16, i32 => W32, i64 => W64);
unsigned_asn_type!(u16 => W16, u32 => W32, u64 => W64);

impl AsnType for BigInt {
    fn type_desc() -> TypeDesc {
        TypeDesc::BigInt
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::BigInt(self.clone())
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::BigInt(v) => Ok(v),
            other => Err(mismatch("INTEGER", &other)),
        }
    }
}

impl AsnType for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::OctetString
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::OctetString(self.clone().into_bytes())
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::OctetString(bytes) => String::from_utf8(bytes)
                .map_err(|_| Error::parse("octet string content is not valid UTF-8")),
            other => Err(mismatch("OCTET STRING", &other)),
        }
    }
}

impl AsnType for OctetString {
    fn type_desc() -> TypeDesc {
        TypeDesc::OctetString
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::OctetString(self.0.clone())
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::OctetString(bytes) => Ok(OctetString(bytes)),
            other => Err(mismatch("OCTET STRING", &other)),
        }
    }
}

impl AsnType for Null {
    fn type_desc() -> TypeDesc {
        TypeDesc::Null
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::Null
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::Null => Ok(Null),
            other => Err(mismatch("NULL", &other)),
        }
    }
}

impl AsnType for ObjectIdentifier {
    fn type_desc() -> TypeDesc {
        TypeDesc::Oid
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::Oid(self.clone())
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::Oid(v) => Ok(v),
            other => Err(mismatch("OBJECT IDENTIFIER", &other)),
        }
    }
}

impl<T: AsnType> AsnType for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::SequenceOf(Box::new(T::type_desc()))
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::Sequence(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        match value {
            AsnValue::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("SEQUENCE", &other)),
        }
    }
}
