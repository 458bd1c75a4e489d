//! Numeric literal classification.
//!
//! `classify` takes the raw text of a number as the scanner collected it and
//! decides its concrete kind and decoded value. It is pure, so the scanner
//! and the tests share it directly.

use crate::errors::errors::NumberError;

use super::tokens::{LiteralValue, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Int,
    Dot,
    Frac,
    ExpMark,
    ExpSign,
    Exp,
}

/// Splits a `0b`/`0o`/`0x` prefix off the literal. A prefix that is not
/// followed by a digit of its base is not a prefix at all: `0b` reads as
/// zero with the `b` suffix.
fn split_base(text: &str) -> (u32, &str) {
    let prefixes = [("0b", 2), ("0o", 8), ("0x", 16)];

    for (prefix, base) in prefixes {
        if let Some(rest) = text.strip_prefix(prefix) {
            if rest.chars().next().is_some_and(|c| c.is_digit(base)) {
                return (base, rest);
            }
        }
    }

    (10, text)
}

fn suffix_kind(suffix: &str) -> Option<TokenKind> {
    match suffix {
        "b" => Some(TokenKind::I8),
        "s" => Some(TokenKind::I16),
        "i" => Some(TokenKind::I32),
        "l" => Some(TokenKind::I64),
        "ub" => Some(TokenKind::U8),
        "us" => Some(TokenKind::U16),
        "ui" => Some(TokenKind::U32),
        "ul" => Some(TokenKind::U64),
        "f" => Some(TokenKind::F32),
        "d" => Some(TokenKind::F64),
        _ => None,
    }
}

/// Classifies a numeric literal into its kind and decoded value.
///
/// ```ignore
/// assert_eq!(classify("123i"), Ok((TokenKind::I32, LiteralValue::I32(123))));
/// ```
pub fn classify(text: &str) -> Result<(TokenKind, LiteralValue), NumberError> {
    let (base, body) = split_base(text);

    let mut state = State::Int;
    let mut digits = 0usize;
    let mut end = body.len();

    for (idx, ch) in body.char_indices() {
        if ch == '_' {
            return Err(NumberError::Underscore);
        }

        state = match state {
            State::Int => {
                if ch.is_digit(base) {
                    digits += 1;
                    State::Int
                } else if ch == '.' {
                    if base != 10 {
                        return Err(NumberError::DotOutsideBase10);
                    }
                    State::Dot
                } else if ch == 'e' || ch == 'E' {
                    if base != 10 {
                        return Err(NumberError::ExponentOutsideBase10);
                    }
                    if digits == 0 {
                        return Err(NumberError::NoDigits);
                    }
                    State::ExpMark
                } else if ch.is_ascii_digit() {
                    return Err(NumberError::InvalidDigit { digit: ch, base });
                } else if ch.is_alphabetic() {
                    end = idx;
                    break;
                } else {
                    return Err(NumberError::UnexpectedCharacter(ch));
                }
            }
            State::Dot => {
                if ch.is_ascii_digit() {
                    digits += 1;
                    State::Frac
                } else {
                    return Err(NumberError::TrailingDot);
                }
            }
            State::Frac => {
                if ch.is_ascii_digit() {
                    digits += 1;
                    State::Frac
                } else if ch == 'e' || ch == 'E' {
                    State::ExpMark
                } else if ch.is_alphabetic() {
                    end = idx;
                    break;
                } else {
                    return Err(NumberError::UnexpectedCharacter(ch));
                }
            }
            State::ExpMark => {
                if ch == '+' || ch == '-' {
                    State::ExpSign
                } else if ch.is_ascii_digit() {
                    State::Exp
                } else {
                    return Err(NumberError::MissingExponent);
                }
            }
            State::ExpSign => {
                if ch.is_ascii_digit() {
                    State::Exp
                } else {
                    return Err(NumberError::MissingExponent);
                }
            }
            State::Exp => {
                if ch.is_ascii_digit() {
                    State::Exp
                } else if ch.is_alphabetic() {
                    end = idx;
                    break;
                } else {
                    return Err(NumberError::UnexpectedCharacter(ch));
                }
            }
        };
    }

    match state {
        State::Dot => return Err(NumberError::TrailingDot),
        State::ExpMark | State::ExpSign => return Err(NumberError::MissingExponent),
        _ => {}
    }

    if digits == 0 {
        return Err(NumberError::NoDigits);
    }

    let (number, suffix) = body.split_at(end);
    let has_fraction_or_exponent = state != State::Int;

    let kind = if suffix.is_empty() {
        if has_fraction_or_exponent {
            TokenKind::F64
        } else {
            TokenKind::I64
        }
    } else {
        let Some(kind) = suffix_kind(suffix) else {
            return Err(NumberError::UnknownSuffix {
                suffix: suffix.to_string(),
            });
        };

        let is_float_suffix = matches!(kind, TokenKind::F32 | TokenKind::F64);
        if is_float_suffix && base != 10 {
            return Err(NumberError::FloatSuffixOutsideBase10);
        }
        if !is_float_suffix && has_fraction_or_exponent {
            return Err(NumberError::IntegerSuffixOnFloat {
                suffix: suffix.to_string(),
            });
        }

        kind
    };

    match kind {
        TokenKind::F32 => {
            let value = parse_float::<f32>(number, kind)?;
            Ok((kind, LiteralValue::F32(value)))
        }
        TokenKind::F64 => {
            let value = parse_float::<f64>(number, kind)?;
            Ok((kind, LiteralValue::F64(value)))
        }
        _ => {
            let value = u64::from_str_radix(number, base)
                .map_err(|_| NumberError::Overflow { kind })?;
            narrow_integer(value, kind).map(|value| (kind, value))
        }
    }
}

fn parse_float<T>(number: &str, kind: TokenKind) -> Result<T, NumberError>
where
    T: std::str::FromStr + Into<f64> + Copy,
{
    let value: T = number.parse().map_err(|_| NumberError::NoDigits)?;

    if !value.into().is_finite() {
        return Err(NumberError::Overflow { kind });
    }

    Ok(value)
}

fn narrow_integer(value: u64, kind: TokenKind) -> Result<LiteralValue, NumberError> {
    let overflow = |_| NumberError::Overflow { kind };

    let literal = match kind {
        TokenKind::I8 => LiteralValue::I8(i8::try_from(value).map_err(overflow)?),
        TokenKind::I16 => LiteralValue::I16(i16::try_from(value).map_err(overflow)?),
        TokenKind::I32 => LiteralValue::I32(i32::try_from(value).map_err(overflow)?),
        TokenKind::I64 => LiteralValue::I64(i64::try_from(value).map_err(overflow)?),
        TokenKind::U8 => LiteralValue::U8(u8::try_from(value).map_err(overflow)?),
        TokenKind::U16 => LiteralValue::U16(u16::try_from(value).map_err(overflow)?),
        TokenKind::U32 => LiteralValue::U32(u32::try_from(value).map_err(overflow)?),
        _ => LiteralValue::U64(value),
    };

    Ok(literal)
}
