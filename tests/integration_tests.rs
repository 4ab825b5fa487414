use indexmap::IndexMap;
use serde_pathline::{
    decode_line, from_slice, from_slice_with_options, from_str, lines, pathline_enum,
    pathline_record, pathline_union, to_string, update_line, Accumulator, Error, Indexed,
    NumberError, Options,
};
use std::collections::BTreeMap;

pathline_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Nested {
        b: i32,
    }
}

pathline_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Outer {
        a: i32,
        nested: Nested,
    }
}

pathline_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red => "red",
        Green => "green",
        Blue => "blue",
    }
}

pathline_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Fields {
        int: i32,
        color: Color,
        ratio: f64,
        flag: bool,
    }
}

pathline_union! {
    #[derive(Debug, Clone, PartialEq)]
    enum Reading {
        Int(i64) => "int",
        IntBar(i64) => "intBar",
        Pair(Fields) => "pair",
        Samples(Vec<u16>) => "samples",
    }
}

pathline_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Sensor {
        name: String,
        label: Option<String>,
        offset: Option<Nested>,
        reading: Reading,
    }
}

pathline_union! {
    #[derive(Debug, Clone, PartialEq)]
    enum Expr {
        Lit(i64) => "lit",
        Neg(Box<Expr>) => "neg",
        Add(Box<(Expr, Expr)>) => "add",
    }
}

fn sensor() -> Sensor {
    Sensor {
        name: "probe-7".to_string(),
        label: Some("inlet".to_string()),
        offset: None,
        reading: Reading::Samples(vec![3, 1, 4]),
    }
}

#[test]
fn test_nested_record() {
    let value = Outer {
        a: 1,
        nested: Nested { b: 2 },
    };

    let text = to_string(&value).unwrap();
    assert_eq!(text, ".a=1\n.nested.b=2\n");

    let back: Outer = from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_sequence() {
    let text = to_string(&vec![1, 2, 3]).unwrap();
    assert_eq!(text, "[0]=1\n[1]=2\n[2]=3\n");

    let back: Vec<i32> = from_str(&text).unwrap();
    assert_eq!(back, vec![1, 2, 3]);
}

#[test]
fn test_indexed_pair() {
    assert_eq!(to_string(&Indexed::new(2u32, 3u32)).unwrap(), "[2]=3\n");
}

#[test]
fn test_record_roundtrip() {
    let value = sensor();
    let text = to_string(&value).unwrap();
    assert_eq!(
        text,
        ".name=probe-7\n.label=inlet\n.reading.samples[0]=3\n.reading.samples[1]=1\n.reading.samples[2]=4\n"
    );
    assert_eq!(from_str::<Sensor>(&text).unwrap(), value);
}

#[test]
fn test_optional_omission() {
    let mut value = sensor();
    value.label = None;
    let without = to_string(&value).unwrap();
    assert!(!without.contains(".label"));

    value.offset = Some(Nested { b: -5 });
    let with = to_string(&value).unwrap();
    assert_eq!(with.lines().count(), without.lines().count() + 1);
    assert!(with.contains(".offset.b=-5\n"));
    assert_eq!(from_str::<Sensor>(&with).unwrap(), value);
}

#[test]
fn test_union_requires_field() {
    assert_eq!(
        decode_line::<Reading>(b"[1]\n"),
        Err(Error::InvalidField { pos: 0 })
    );
    assert_eq!(
        decode_line::<Reading>(b".other=1\n"),
        Err(Error::InvalidField { pos: 0 })
    );
}

#[test]
fn test_malformed_scalars() {
    assert_eq!(
        decode_line::<Fields>(b".int=q\n"),
        Err(Error::InvalidIntValue {
            pos: 5,
            reason: NumberError::InvalidDigit
        })
    );
    assert_eq!(
        decode_line::<Fields>(b".color=q\n"),
        Err(Error::InvalidEnumValue { pos: 7 })
    );
    assert_eq!(
        decode_line::<Fields>(b".flag=yes\n"),
        Err(Error::InvalidBoolValue { pos: 6 })
    );
    assert!(matches!(
        decode_line::<Fields>(b".ratio=1.2.3\n"),
        Err(Error::InvalidFloatValue { pos: 7, .. })
    ));
}

#[test]
fn test_scalar_field_with_continuation() {
    assert_eq!(
        decode_line::<Fields>(b".int.a=1\n"),
        Err(Error::InvalidValue { pos: 4 })
    );
    assert_eq!(
        decode_line::<Fields>(b".int[0]=1\n"),
        Err(Error::InvalidValue { pos: 4 })
    );
    assert_eq!(decode_line::<i32>(b".a=1\n"), Err(Error::InvalidValue { pos: 0 }));
}

#[test]
fn test_missing_newline() {
    assert_eq!(
        decode_line::<Outer>(b".a=1"),
        Err(Error::InvalidValue { pos: 2 })
    );
}

#[test]
fn test_union_dispatch_on_shared_prefix() {
    assert_eq!(decode_line::<Reading>(b".int=1\n"), Ok(Reading::Int(1)));
    assert_eq!(decode_line::<Reading>(b".intBar=2\n"), Ok(Reading::IntBar(2)));
    assert_eq!(to_string(&Reading::IntBar(2)).unwrap(), ".intBar=2\n");
}

#[test]
fn test_union_variant_exclusivity() {
    let value = Reading::Pair(Fields {
        int: 4,
        color: Color::Blue,
        ratio: 0.5,
        flag: true,
    });
    let text = to_string(&value).unwrap();
    assert!(text.lines().all(|line| line.starts_with(".pair.")));

    // Each line selects its own variant; the last one wins.
    let value: Reading = from_str(".int=1\n.intBar=2\n").unwrap();
    assert_eq!(value, Reading::IntBar(2));
    let value: Reading = from_str(".samples[0]=1\n.int=3\n").unwrap();
    assert_eq!(value, Reading::Int(3));
}

#[test]
fn test_union_update_stays_on_active_variant() {
    let mut value = Reading::Samples(vec![1, 2, 3]);
    update_line(&mut value, b".samples[1]=9\n").unwrap();
    assert_eq!(value, Reading::Samples(vec![1, 9, 3]));

    update_line(&mut value, b".pair.flag=true\n").unwrap();
    assert_eq!(
        value,
        Reading::Pair(Fields {
            int: 0,
            color: Color::Red,
            ratio: 0.0,
            flag: true,
        })
    );
}

#[test]
fn test_incremental_matches_fresh() {
    let value = Sensor {
        name: "outlet".to_string(),
        label: None,
        offset: Some(Nested { b: 12 }),
        reading: Reading::Pair(Fields {
            int: -8,
            color: Color::Green,
            ratio: 2.25,
            flag: false,
        }),
    };
    let text = to_string(&value).unwrap();

    let mut acc = Accumulator::<Sensor>::new();
    for line in lines(text.as_bytes()) {
        acc.feed_line(line).unwrap();
    }
    assert_eq!(acc.lines(), text.lines().count());

    let fresh: Sensor = from_str(&text).unwrap();
    assert_eq!(acc.get(), &fresh);
    assert_eq!(fresh, value);

    // Order does not matter when each path appears once.
    let reversed: String = text.lines().rev().map(|l| format!("{}\n", l)).collect();
    assert_eq!(from_str::<Sensor>(&reversed).unwrap(), value);
}

#[test]
fn test_recursive_union() {
    let expr = Expr::Add(Box::new((
        Expr::Lit(1),
        Expr::Neg(Box::new(Expr::Lit(2))),
    )));
    let text = to_string(&expr).unwrap();
    assert_eq!(text, ".add[0].lit=1\n.add[1].neg.lit=2\n");
    assert_eq!(from_str::<Expr>(&text).unwrap(), expr);
}

#[test]
fn test_maps() {
    let mut ordered = IndexMap::new();
    ordered.insert("zeta".to_string(), 1u32);
    ordered.insert("alpha".to_string(), 2u32);
    let text = to_string(&ordered).unwrap();
    assert_eq!(text, ".zeta=1\n.alpha=2\n");
    assert_eq!(from_str::<IndexMap<String, u32>>(&text).unwrap(), ordered);

    let mut by_id = BTreeMap::new();
    by_id.insert(-3i64, vec![true]);
    by_id.insert(10, vec![false, true]);
    let text = to_string(&by_id).unwrap();
    assert_eq!(text, "[-3][0]=true\n[10][0]=false\n[10][1]=true\n");
    assert_eq!(from_str::<BTreeMap<i64, Vec<bool>>>(&text).unwrap(), by_id);
}

#[test]
fn test_char_and_bool_keys_roundtrip() {
    let by_char = BTreeMap::from([('a', 1u8), ('é', 2)]);
    let text = to_string(&by_char).unwrap();
    assert_eq!(text, ".a=1\n.é=2\n");
    assert_eq!(from_str::<BTreeMap<char, u8>>(&text).unwrap(), by_char);

    let by_flag = BTreeMap::from([(false, "off".to_string()), (true, "on".to_string())]);
    let text = to_string(&by_flag).unwrap();
    assert_eq!(text, ".false=off\n.true=on\n");
    assert_eq!(from_str::<BTreeMap<bool, String>>(&text).unwrap(), by_flag);
}

#[test]
fn test_last_line_wins() {
    let value: Outer = from_str(".a=1\n.nested.b=2\n.a=7\n").unwrap();
    assert_eq!(
        value,
        Outer {
            a: 7,
            nested: Nested { b: 2 }
        }
    );
}

#[test]
fn test_error_aborts_with_line_number() {
    let err = from_slice::<Outer>(b".a=1\n.nested.c=2\n.a=3\n").unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.root(), &Error::InvalidField { pos: 12 });
    assert_eq!(
        err.to_string(),
        "line 2: invalid field at byte 12"
    );
}

#[test]
fn test_decode_depth_limit() {
    let options = Options::new().with_max_depth(2);
    let err = from_slice_with_options::<Vec<Vec<Vec<u8>>>>(b"[0][0][0]=1\n", options).unwrap_err();
    assert_eq!(err.root(), &Error::DepthLimitExceeded { limit: 2 });

    let ok = from_slice_with_options::<Vec<Vec<u8>>>(b"[0][1]=1\n", options).unwrap();
    assert_eq!(ok, vec![vec![0, 1]]);
}

#[test]
fn test_empty_document_is_zero_value() {
    let value: Sensor = from_str("").unwrap();
    assert_eq!(
        value,
        Sensor {
            name: String::new(),
            label: None,
            offset: None,
            reading: Reading::Int(0),
        }
    );
}
