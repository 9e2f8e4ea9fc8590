use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

/// Value types that can be converted from a single raw token.
///
/// `name` is the field being converted and only appears in error messages.
/// A conversion either consumes the whole token, fails with
/// [`Error::InvalidValue`] when nothing of it is usable, or fails with
/// [`Error::IncompleteConversion`] when only a prefix of it is.
pub trait FromToken: Sized + 'static {
    fn from_token(name: &str, token: &OsStr) -> Result<Self>;
}

/// Convert `token` into `T`. This is what every spec runs its raw values through.
pub fn convert<T: FromToken>(name: &str, token: &OsStr) -> Result<T> {
    T::from_token(name, token)
}

// Textual types take the token verbatim, whitespace included.

impl FromToken for String {
    fn from_token(name: &str, token: &OsStr) -> Result<Self> {
        token.to_str().map(Into::into).ok_or_else(|| Error::invalid_value(name, token))
    }
}

impl FromToken for OsString {
    fn from_token(_: &str, token: &OsStr) -> Result<Self> {
        Ok(token.to_owned())
    }
}

impl FromToken for PathBuf {
    fn from_token(_: &str, token: &OsStr) -> Result<Self> {
        Ok(token.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    Unsigned,
    Signed,
    Float,
}

/// How much of a token a numeric grammar accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Nothing,
    Prefix(usize),
    Whole,
}

fn count_digits(s: &[u8]) -> usize {
    s.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of the longest prefix of `s` matching `grammar`, 0 if none does.
fn scan_number(s: &[u8], grammar: Grammar) -> usize {
    let mut i = match s.first() {
        Some(b'+') => 1,
        Some(b'-') if grammar != Grammar::Unsigned => 1,
        _ => 0,
    };
    let int_digits = count_digits(&s[i..]);
    i += int_digits;
    if grammar != Grammar::Float {
        return if int_digits == 0 { 0 } else { i };
    }

    let mut frac_digits = 0;
    if s.get(i) == Some(&b'.') {
        frac_digits = count_digits(&s[i + 1..]);
        if int_digits + frac_digits != 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }

    // An exponent only counts if it has digits, "1e" stops before the "e".
    if matches!(s.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(s.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&s[j..]);
        if exp_digits != 0 {
            i = j + exp_digits;
        }
    }
    i
}

fn scan(s: &str, grammar: Grammar) -> Scan {
    match scan_number(s.as_bytes(), grammar) {
        0 => Scan::Nothing,
        len if len == s.len() => Scan::Whole,
        len => Scan::Prefix(len),
    }
}

fn convert_number<T: FromStr>(name: &str, token: &OsStr, grammar: Grammar) -> Result<T> {
    let invalid = || Error::invalid_value(name, token);
    let s = token.to_str().ok_or_else(invalid)?;
    // Leading whitespace is part of the numeric grammar, trailing is not.
    let body = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (len, complete) = match scan(body, grammar) {
        Scan::Nothing => return Err(invalid()),
        Scan::Prefix(len) => (len, false),
        Scan::Whole => (body.len(), true),
    };
    // Out-of-range values fail here even though they are well-formed.
    let value = body[..len].parse::<T>().map_err(|_| invalid())?;
    if complete { Ok(value) } else { Err(Error::incomplete_conversion(name, token)) }
}

macro_rules! impl_from_token_number {
    ($grammar:ident: $($ty:ty),*) => {
        $(
            impl FromToken for $ty {
                fn from_token(name: &str, token: &OsStr) -> Result<Self> {
                    convert_number(name, token, Grammar::$grammar)
                }
            }
        )*
    };
}

impl_from_token_number!(Signed: i8, i16, i32, i64, i128, isize);
impl_from_token_number!(Unsigned: u8, u16, u32, u64, u128, usize);
impl_from_token_number!(Float: f32, f64);

/// Booleans are spelled numerically, `0` or `1`.
impl FromToken for bool {
    fn from_token(name: &str, token: &OsStr) -> Result<Self> {
        match convert_number::<i64>(name, token, Grammar::Signed)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::invalid_value(name, token)),
        }
    }
}

impl FromToken for char {
    fn from_token(name: &str, token: &OsStr) -> Result<Self> {
        let s = token.to_str().ok_or_else(|| Error::invalid_value(name, token))?;
        let mut chars = s.trim_start_matches(|c: char| c.is_ascii_whitespace()).chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(Error::invalid_value(name, token)),
            (Some(c), None) => Ok(c),
            (Some(_), Some(_)) => Err(Error::incomplete_conversion(name, token)),
        }
    }
}

#[cfg(test)]
fn conv<T: FromToken>(s: &str) -> Result<T> {
    convert("x", s.as_ref())
}

#[test]
fn passthrough() {
    assert_eq!(conv::<String>("word after word").unwrap(), "word after word");
    assert_eq!(conv::<String>("").unwrap(), "");
    assert_eq!(conv::<PathBuf>("a/b.txt").unwrap(), PathBuf::from("a/b.txt"));
}

#[test]
fn integers() {
    assert_eq!(conv::<i32>("42").unwrap(), 42);
    assert_eq!(conv::<i32>("-42").unwrap(), -42);
    assert_eq!(conv::<i32>("+7").unwrap(), 7);
    assert_eq!(conv::<i32>("  7").unwrap(), 7);
    assert_eq!(conv::<u8>("255").unwrap(), 255);

    assert!(matches!(conv::<i32>("not a number"), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<i32>(""), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<i32>("-"), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<u8>("256"), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<u32>("-1"), Err(Error::InvalidValue { .. })));

    assert!(matches!(conv::<i32>("23tail"), Err(Error::IncompleteConversion { .. })));
    assert!(matches!(conv::<i32>("23.5"), Err(Error::IncompleteConversion { .. })));
    assert!(matches!(conv::<i32>("23 "), Err(Error::IncompleteConversion { .. })));
}

#[test]
fn floats() {
    assert_eq!(conv::<f64>("1.5").unwrap(), 1.5);
    assert_eq!(conv::<f64>("-.5").unwrap(), -0.5);
    assert_eq!(conv::<f64>("3.").unwrap(), 3.0);
    assert_eq!(conv::<f64>("1e3").unwrap(), 1000.0);
    assert_eq!(conv::<f32>("2.5E-1").unwrap(), 0.25);

    assert!(matches!(conv::<f64>("."), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<f64>("abc"), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<f64>("1e"), Err(Error::IncompleteConversion { .. })));
    assert!(matches!(conv::<f64>("1.5.2"), Err(Error::IncompleteConversion { .. })));
}

#[test]
fn bool_and_char() {
    assert!(conv::<bool>("1").unwrap());
    assert!(!conv::<bool>("0").unwrap());
    assert!(matches!(conv::<bool>("2"), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<bool>("true"), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<bool>("1x"), Err(Error::IncompleteConversion { .. })));

    assert_eq!(conv::<char>("z").unwrap(), 'z');
    assert!(matches!(conv::<char>(""), Err(Error::InvalidValue { .. })));
    assert!(matches!(conv::<char>("zz"), Err(Error::IncompleteConversion { .. })));
}

#[cfg(unix)]
#[test]
fn non_utf8() {
    use std::os::unix::ffi::OsStrExt;

    let token = OsStr::from_bytes(b"\xFF");
    assert!(matches!(convert::<String>("x", token), Err(Error::InvalidValue { .. })));
    assert!(matches!(convert::<i32>("x", token), Err(Error::InvalidValue { .. })));
    assert_eq!(convert::<OsString>("x", token).unwrap(), token.to_os_string());
}
