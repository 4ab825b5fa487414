//! Wire-format conformance: the line grammar, the raw tokenizer, and the
//! documented limits of what the format can represent.

use serde::Serialize;
use serde_pathline::{
    from_str, to_string, validate, Error, Named, Serializer, TokenKind, Tokenizer,
};
use std::collections::{BTreeMap, HashMap};

#[test]
fn test_every_line_ends_with_value() {
    let value = vec![
        BTreeMap::from([("a".to_string(), vec![1u8, 2])]),
        BTreeMap::from([("b".to_string(), vec![3u8])]),
    ];
    let text = to_string(&value).unwrap();
    assert_eq!(text, "[0].a[0]=1\n[0].a[1]=2\n[1].b[0]=3\n");
    assert_eq!(validate(text.as_bytes()), Ok(3));
}

#[test]
fn test_tokenizer_sees_serializer_output() {
    let text = to_string(&Named::new("speed", vec![1.5f32])).unwrap();
    let tokens: Vec<(TokenKind, &[u8])> = Tokenizer::new(text.as_bytes())
        .map(|t| (t.kind, t.bytes))
        .collect();
    assert_eq!(
        tokens,
        vec![
            (TokenKind::Field, &b"speed"[..]),
            (TokenKind::Index, &b"0"[..]),
            (TokenKind::Value, &b"1.5"[..]),
            (TokenKind::End, &b""[..]),
        ]
    );
}

#[test]
fn test_values_may_contain_delimiters() {
    let value = vec!["a.b[c]=d".to_string()];
    let text = to_string(&value).unwrap();
    assert_eq!(text, "[0]=a.b[c]=d\n");
    assert_eq!(from_str::<Vec<String>>(&text).unwrap(), value);
}

#[test]
fn test_newline_in_value_is_unrepresentable() {
    let err = to_string(&vec!["two\nlines"]).unwrap_err();
    assert!(matches!(err, Error::Unrepresentable(_)));
}

#[test]
fn test_delimiter_in_key_is_unrepresentable() {
    let map = HashMap::from([("a.b".to_string(), 1u8)]);
    assert!(matches!(to_string(&map), Err(Error::Unrepresentable(_))));

    let map = HashMap::from([("a=b".to_string(), 1u8)]);
    assert!(matches!(to_string(&map), Err(Error::Unrepresentable(_))));

    // `]` only ends an index, so it is fine inside a field name.
    let map = HashMap::from([("a]b".to_string(), 1u8)]);
    assert_eq!(to_string(&map).unwrap(), ".a]b=1\n");
}

#[test]
fn test_float_keys_unsupported() {
    struct FloatKeyed<'a>(&'a [(f64, u8)]);

    impl Serialize for FloatKeyed<'_> {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
        }
    }

    assert!(matches!(
        to_string(&FloatKeyed(&[(0.5, 1)])),
        Err(Error::UnsupportedType(_))
    ));
}

#[test]
fn test_no_partial_lines_on_error() {
    let mut serializer = Serializer::new(Vec::new());
    let err = vec!["ok", "bad\n", "never"].serialize(&mut serializer);
    assert!(err.is_err());
    assert_eq!(serializer.into_inner(), b"[0]=ok\n");
}

#[test]
fn test_float_formatting() {
    assert_eq!(to_string(&0.1f64).unwrap(), "=0.1\n");
    assert_eq!(to_string(&1e21f64).unwrap(), "=1000000000000000000000\n");
    assert_eq!(to_string(&f64::NAN).unwrap(), "=NaN\n");
    assert_eq!(to_string(&f64::NEG_INFINITY).unwrap(), "=-inf\n");

    for value in [0.1f64, -2.5e-8, 123456.789, f64::MAX, f64::MIN_POSITIVE] {
        let text = to_string(&value).unwrap();
        assert_eq!(from_str::<f64>(&text), Ok(value), "{}", text);
    }
    assert!(from_str::<f64>("=NaN\n").unwrap().is_nan());
}

#[test]
fn test_float_literal_grammar() {
    for bad in ["=1e5\n", "=+1\n", "=.5\n", "=1.\n", "= 1\n", "=0x10\n"] {
        assert!(
            matches!(from_str::<f64>(bad).map_err(|e| e.root().clone()), Err(Error::InvalidFloatValue { .. })),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_integer_literal_grammar() {
    assert_eq!(from_str::<i8>("=-128\n"), Ok(-128));
    for bad in ["=+1\n", "=1_000\n", "= 1\n", "=\n"] {
        assert!(
            matches!(from_str::<i32>(bad).map_err(|e| e.root().clone()), Err(Error::InvalidIntValue { .. })),
            "{:?} should be rejected",
            bad
        );
    }
    assert!(matches!(
        from_str::<u32>("=-1\n").map_err(|e| e.root().clone()),
        Err(Error::InvalidIntValue { .. })
    ));
}

#[test]
fn test_bool_is_case_sensitive() {
    assert!(matches!(
        from_str::<bool>("=True\n").map_err(|e| e.root().clone()),
        Err(Error::InvalidBoolValue { pos: 1 })
    ));
}

#[test]
fn test_trailing_empty_elements_do_not_roundtrip() {
    // `None` and empty collections emit no lines, so a trailing one is lost.
    let value = vec![Some(1u8), None];
    let text = to_string(&value).unwrap();
    assert_eq!(text, "[0]=1\n");
    assert_eq!(from_str::<Vec<Option<u8>>>(&text).unwrap(), vec![Some(1)]);

    // A missing element in the middle comes back as its zero value.
    let value = vec![vec![1u8], vec![], vec![3]];
    let back: Vec<Vec<u8>> = from_str(&to_string(&value).unwrap()).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_validate_rejects_what_decoding_rejects() {
    let doc = b".a=1\n.b\n";
    let err = validate(doc).unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert!(from_str::<BTreeMap<String, u8>>(".a=1\n.b\n").is_err());
}
