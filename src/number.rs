//! Decimal literal parsing for integer and float scalars.
//!
//! Integers follow `-?[0-9]+` with no `+`, whitespace or underscores; the
//! leading `-` is only accepted for signed targets. Overflow is detected while
//! accumulating digits, so a literal wider than the target is reported as
//! [`NumberError::Overflow`] (or `Underflow` when negative) rather than as
//! a malformed digit.
//!
//! Floats accept `-?[0-9]+(\.[0-9]+)?` plus the `NaN`, `inf` and `-inf`
//! spellings Rust's `Display` produces for non-finite values.

use crate::error::NumberError;

/// Integer types a pathline index or integer value can decode into.
pub trait Integer: Copy + PartialEq + Sized {
    const SIGNED: bool;

    fn from_decimal(bytes: &[u8]) -> Result<Self, NumberError>;
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Integer for $t {
                const SIGNED: bool = <$t>::MIN != 0;

                fn from_decimal(bytes: &[u8]) -> Result<Self, NumberError> {
                    let (negative, digits) = match bytes.split_first() {
                        Some((b'-', rest)) if Self::SIGNED => (true, rest),
                        _ => (false, bytes),
                    };
                    if digits.is_empty() {
                        return Err(NumberError::Empty);
                    }

                    let mut acc: $t = 0;
                    for &b in digits {
                        if !b.is_ascii_digit() {
                            return Err(NumberError::InvalidDigit);
                        }
                        let digit = (b - b'0') as $t;
                        let next = acc.checked_mul(10).and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        });
                        acc = match next {
                            Some(v) => v,
                            None if negative => return Err(NumberError::Underflow),
                            None => return Err(NumberError::Overflow),
                        };
                    }
                    Ok(acc)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Float types a pathline value can decode into.
pub trait Float: Copy + Sized {
    fn from_decimal(bytes: &[u8]) -> Result<Self, NumberError>;
}

fn is_decimal_literal(bytes: &[u8]) -> Result<(), NumberError> {
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    if digits.is_empty() {
        return Err(NumberError::Empty);
    }
    let (int, frac) = match digits.iter().position(|&b| b == b'.') {
        Some(dot) => (&digits[..dot], Some(&digits[dot + 1..])),
        None => (digits, None),
    };
    let all_digits = |s: &[u8]| !s.is_empty() && s.iter().all(u8::is_ascii_digit);
    if !all_digits(int) || frac.is_some_and(|f| !all_digits(f)) {
        return Err(NumberError::InvalidDigit);
    }
    Ok(())
}

macro_rules! impl_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Float for $t {
                fn from_decimal(bytes: &[u8]) -> Result<Self, NumberError> {
                    match bytes {
                        b"NaN" => return Ok(<$t>::NAN),
                        b"inf" => return Ok(<$t>::INFINITY),
                        b"-inf" => return Ok(<$t>::NEG_INFINITY),
                        _ => {}
                    }
                    is_decimal_literal(bytes)?;
                    // Validated as ASCII digits above.
                    let text = std::str::from_utf8(bytes).map_err(|_| NumberError::InvalidDigit)?;
                    let value: $t = text.parse().map_err(|_| NumberError::InvalidDigit)?;
                    if value.is_infinite() {
                        return Err(if value.is_sign_negative() {
                            NumberError::Underflow
                        } else {
                            NumberError::Overflow
                        });
                    }
                    Ok(value)
                }
            }
        )*
    };
}

impl_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_bounds() {
        assert_eq!(i8::from_decimal(b"127"), Ok(127));
        assert_eq!(i8::from_decimal(b"-128"), Ok(-128));
        assert_eq!(i8::from_decimal(b"128"), Err(NumberError::Overflow));
        assert_eq!(i8::from_decimal(b"-129"), Err(NumberError::Underflow));
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        assert_eq!(u32::from_decimal(b"-1"), Err(NumberError::InvalidDigit));
        assert_eq!(u64::from_decimal(b"18446744073709551615"), Ok(u64::MAX));
        assert_eq!(
            u64::from_decimal(b"18446744073709551616"),
            Err(NumberError::Overflow)
        );
    }

    #[test]
    fn test_malformed_integers() {
        assert_eq!(i32::from_decimal(b""), Err(NumberError::Empty));
        assert_eq!(i32::from_decimal(b"-"), Err(NumberError::Empty));
        assert_eq!(i32::from_decimal(b"+1"), Err(NumberError::InvalidDigit));
        assert_eq!(i32::from_decimal(b"1_000"), Err(NumberError::InvalidDigit));
        assert_eq!(i32::from_decimal(b" 1"), Err(NumberError::InvalidDigit));
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::from_decimal(b"1.5"), Ok(1.5));
        assert_eq!(f64::from_decimal(b"-0"), Ok(-0.0));
        assert_eq!(f32::from_decimal(b"0.1"), Ok(0.1f32));
        assert!(f64::from_decimal(b"NaN").unwrap().is_nan());
        assert_eq!(f64::from_decimal(b"-inf"), Ok(f64::NEG_INFINITY));
        assert_eq!(f64::from_decimal(b"1e5"), Err(NumberError::InvalidDigit));
        assert_eq!(f64::from_decimal(b"1."), Err(NumberError::InvalidDigit));
        assert_eq!(f64::from_decimal(b".5"), Err(NumberError::InvalidDigit));
    }

    #[test]
    fn test_float_overflow() {
        let huge = format!("{}", f64::MAX);
        assert_eq!(f32::from_decimal(huge.as_bytes()), Err(NumberError::Overflow));
        let tiny = format!("-{}", f64::MAX);
        assert_eq!(f32::from_decimal(tiny.as_bytes()), Err(NumberError::Underflow));
    }

    #[test]
    fn test_display_roundtrip() {
        for v in [0.1f64, 1e300, 5e-324, -123.456, f64::MAX] {
            let text = v.to_string();
            assert_eq!(f64::from_decimal(text.as_bytes()), Ok(v));
        }
    }
}
