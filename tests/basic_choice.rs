use asn1ber::{AsnType, AsnValue, ChoiceValue, Context, Error, IntWidth, RecordDesc, TypeDesc};
use hex_literal::hex;

#[derive(Debug, PartialEq)]
enum Body {
    Num(i64),
    Name(String),
}

impl Default for Body {
    fn default() -> Self {
        Body::Num(0)
    }
}

impl AsnType for Body {
    fn type_desc() -> TypeDesc {
        TypeDesc::Choice
    }

    fn to_value(&self) -> AsnValue {
        let (variant, value) = match self {
            Body::Num(v) => (0, v.to_value()),
            Body::Name(v) => (1, v.to_value()),
        };
        AsnValue::Choice(Box::new(ChoiceValue { variant, value }))
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        let AsnValue::Choice(chosen) = value else {
            return Err(Error::syntax("expected a CHOICE value for Body"));
        };
        match chosen.variant {
            0 => Ok(Body::Num(i64::from_value(chosen.value)?)),
            1 => Ok(Body::Name(String::from_value(chosen.value)?)),
            variant => Err(Error::syntax(format!("unknown Body alternative {variant}"))),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct Message {
    id: i64,
    body: Body,
}

impl AsnType for Message {
    fn type_desc() -> TypeDesc {
        TypeDesc::Record(
            RecordDesc::new("Message")
                .field("id", i64::type_desc(), "")
                .unwrap()
                .field("body", Body::type_desc(), "choice:body")
                .unwrap(),
        )
    }

    fn to_value(&self) -> AsnValue {
        AsnValue::Sequence(vec![self.id.to_value(), self.body.to_value()])
    }

    fn from_value(value: AsnValue) -> Result<Self, Error> {
        let AsnValue::Sequence(fields) = value else {
            return Err(Error::syntax("expected a SEQUENCE value for Message"));
        };
        let mut fields = fields.into_iter();
        Ok(Message {
            id: i64::from_value(fields.next().unwrap())?,
            body: Body::from_value(fields.next().unwrap())?,
        })
    }
}

fn body_context() -> Context {
    let mut ctx = Context::new();
    ctx.add_choice(
        "body",
        &[
            (TypeDesc::Integer(IntWidth::W64), ""),
            (TypeDesc::OctetString, "tag:0"),
        ],
    )
    .unwrap();
    ctx
}

#[test]
fn decodes_by_tag() {
    let ctx = body_context();
    let mut body = Body::default();

    ctx.decode_with_options(&hex!("02012a"), &mut body, "choice:body")
        .unwrap();
    assert_eq!(body, Body::Num(42));

    ctx.decode_with_options(&hex!("8003666f6f"), &mut body, "choice:body")
        .unwrap();
    assert_eq!(body, Body::Name("foo".into()));
}

#[test]
fn encodes_by_variant() {
    let ctx = body_context();
    assert_eq!(
        ctx.encode_with_options(&Body::Num(42), "choice:body").unwrap(),
        hex!("02012a")
    );
    assert_eq!(
        ctx.encode_with_options(&Body::Name("foo".into()), "choice:body")
            .unwrap(),
        hex!("8003666f6f")
    );
}

#[test]
fn unmatched_tag_is_a_parse_error() {
    let ctx = body_context();
    let mut body = Body::default();
    let err = ctx
        .decode_with_options(&hex!("0101ff"), &mut body, "choice:body")
        .unwrap_err();
    assert!(err.is_parse());
}

#[test]
fn unknown_group_is_a_syntax_error() {
    let ctx = body_context();
    let mut body = Body::default();
    let err = ctx
        .decode_with_options(&hex!("02012a"), &mut body, "choice:missing")
        .unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn choice_field_in_a_sequence() {
    let ctx = body_context();

    let message = Message {
        id: 1,
        body: Body::Num(1),
    };
    let bytes = ctx.encode(&message).unwrap();
    assert_eq!(bytes, hex!("3006020101020101"));
    let mut back = Message::default();
    ctx.decode(&bytes, &mut back).unwrap();
    assert_eq!(back, message);

    let message = Message {
        id: 1,
        body: Body::Name("foo".into()),
    };
    let bytes = ctx.encode(&message).unwrap();
    assert_eq!(bytes, hex!("30080201018003666f6f"));
    let mut back = Message::default();
    ctx.decode(&bytes, &mut back).unwrap();
    assert_eq!(back, message);
}

#[test]
fn explicitly_tagged_choice_round_trips() {
    // CHOICE has no tag of its own, so an explicit wrapper pins it down.
    let ctx = body_context();
    let bytes = ctx
        .encode_with_options(&Body::Num(42), "tag:7,explicit,choice:body")
        .unwrap();
    assert_eq!(bytes, hex!("a70302012a"));

    let mut back = Body::default();
    ctx.decode_with_options(&bytes, &mut back, "tag:7,explicit,choice:body")
        .unwrap();
    assert_eq!(back, Body::Num(42));
}
