use asn1ber::{decode, encode, Context, Null, ObjectIdentifier};
use hex_literal::hex;
use num_bigint::BigInt;

#[test]
fn integer_vectors() {
    assert_eq!(encode(&127i64).unwrap(), hex!("02017f"));
    assert_eq!(encode(&128i64).unwrap(), hex!("02020080"));
    assert_eq!(encode(&-1i64).unwrap(), hex!("0201ff"));

    let mut value = 0i64;
    decode(&hex!("02017f"), &mut value).unwrap();
    assert_eq!(value, 127);
    decode(&hex!("02020080"), &mut value).unwrap();
    assert_eq!(value, 128);
    decode(&hex!("0201ff"), &mut value).unwrap();
    assert_eq!(value, -1);
}

#[test]
fn unsigned_and_bignum() {
    assert_eq!(encode(&128u64).unwrap(), hex!("02020080"));
    assert_eq!(encode(&BigInt::from(128)).unwrap(), hex!("02020080"));

    let mut unsigned = 0u64;
    decode(&hex!("02020080"), &mut unsigned).unwrap();
    assert_eq!(unsigned, 128);
    assert!(decode(&hex!("0201ff"), &mut unsigned).unwrap_err().is_parse());

    let mut narrow = 0i8;
    assert!(decode(&hex!("02020080"), &mut narrow).unwrap_err().is_parse());
}

#[test]
fn null_and_oid_vectors() {
    assert_eq!(encode(&Null).unwrap(), hex!("0500"));
    let mut null = Null;
    decode(&hex!("0500"), &mut null).unwrap();

    let oid = ObjectIdentifier::new([1u64, 2, 840, 113549]);
    assert_eq!(encode(&oid).unwrap(), hex!("06062a864886f70d"));
    let mut back = ObjectIdentifier::default();
    decode(&hex!("06062a864886f70d"), &mut back).unwrap();
    assert_eq!(back, oid);
}

#[test]
fn boolean_acceptance_per_mode() {
    assert_eq!(encode(&true).unwrap(), hex!("0101ff"));

    let mut flag = false;
    // Default decoding is BER: any non-zero octet is true.
    decode(&hex!("010101"), &mut flag).unwrap();
    assert!(flag);

    let mut ctx = Context::new();
    ctx.set_der(true, true);
    assert!(ctx.decode(&hex!("010101"), &mut flag).unwrap_err().is_parse());
    ctx.decode(&hex!("0101ff"), &mut flag).unwrap();
    assert!(flag);
}

#[test]
fn der_rejects_indefinite_length() {
    let bytes = hex!("30800201010201020000");

    let ctx = Context::new();
    let mut values: Vec<i64> = Vec::new();
    ctx.decode(&bytes, &mut values).unwrap();
    assert_eq!(values, [1, 2]);

    let mut ctx = Context::new();
    ctx.set_der(true, true);
    assert!(ctx.decode(&bytes, &mut values).unwrap_err().is_parse());
}

#[test]
fn ber_emits_indefinite_on_request() {
    let mut ctx = Context::new();
    ctx.set_der(false, false);
    let bytes = ctx
        .encode_with_options(&vec![1i64, 2], "indefinite")
        .unwrap();
    assert_eq!(bytes, hex!("30800201010201020000"));

    // DER encoding ignores the option and stays definite.
    let ctx = Context::new();
    let bytes = ctx
        .encode_with_options(&vec![1i64, 2], "indefinite")
        .unwrap();
    assert_eq!(bytes, hex!("3006020101020102"));
}

#[test]
fn der_rejects_non_minimal_lengths() {
    let bytes = hex!("02810107");

    let mut value = 0i64;
    decode(&bytes, &mut value).unwrap();
    assert_eq!(value, 7);

    let mut ctx = Context::new();
    ctx.set_der(true, true);
    assert!(ctx.decode(&bytes, &mut value).unwrap_err().is_parse());
}

#[test]
fn constructed_primitives_are_rejected() {
    // A constructed OCTET STRING carrying one primitive segment.
    let bytes = hex!("24030401ff");
    let mut data = String::new();
    assert!(decode(&bytes, &mut data).unwrap_err().is_parse());
}

#[test]
fn der_output_reparses_identically_under_both_modes() {
    let values = vec![1i64, 128, -300];
    let bytes = encode(&values).unwrap();

    let mut der_ctx = Context::new();
    der_ctx.set_der(true, true);
    let mut from_der: Vec<i64> = Vec::new();
    der_ctx.decode(&bytes, &mut from_der).unwrap();

    let ber_ctx = Context::new();
    let mut from_ber: Vec<i64> = Vec::new();
    ber_ctx.decode(&bytes, &mut from_ber).unwrap();

    assert_eq!(from_der, values);
    assert_eq!(from_ber, values);
}

#[test]
fn equal_values_share_one_der_encoding() {
    let first = vec![5i64, 300];
    let second: Vec<i64> = vec![5, 300];
    assert_eq!(encode(&first).unwrap(), encode(&second).unwrap());

    // A BER message with a padded integer re-encodes to canonical DER.
    let bytes = hex!("3008020105020300012c");
    let mut values: Vec<i64> = Vec::new();
    decode(&bytes, &mut values).unwrap();
    assert_eq!(values, [5, 300]);
    assert_eq!(encode(&values).unwrap(), hex!("30070201050202012c"));
}
