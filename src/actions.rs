//! Grammar actions: field-level validation and decoding
//!
//! Each action is specialized for one field by a description (used in logs and
//! errors) and a setter storing the decoded value into the object being built.
//! Setters are plain functions, so actions can live in `static` grammars:
//!
//! ```rust,ignore
//! StoreInt32::new("PrincipalName name-type", |pn: &mut PrincipalName, v| {
//!     pn.name_type = NameType(v)
//! })
//! ```

use log::debug;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::combinator::{all_consuming, map};
use nom::sequence::{terminated, tuple};
use nom::IResult;
use std::str;

use crate::grammar::{ActionContext, Decodable, GrammarAction};
use crate::krb5::{KerberosTime, Realm, TicketFlags};
use crate::krb5_constants::{KERBEROS_TIME_LENGTH, MIN_KERBEROS_FLAGS_BITS};
use crate::krb5_errors::{DecodeError, DecodeErrorKind};

fn invalid(context: String) -> DecodeError {
    DecodeError::new(DecodeErrorKind::SemanticValidationFailed).with_context(context)
}

/// Decode the content octets of an INTEGER
///
/// Redundant leading `00`/`ff` octets are tolerated. At most 8 significant
/// octets are accepted.
pub fn decode_integer(bytes: &[u8]) -> Result<i64, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::new(DecodeErrorKind::EmptyValueNotAllowed).with_context("INTEGER"));
    }
    let mut digits = bytes;
    while digits.len() > 1
        && ((digits[0] == 0x00 && digits[1] & 0x80 == 0) || (digits[0] == 0xff && digits[1] & 0x80 != 0))
    {
        digits = &digits[1..];
    }
    if digits.len() > 8 {
        return Err(invalid(format!("INTEGER of {} significant octets", digits.len())));
    }
    let init: i64 = if digits[0] & 0x80 != 0 { -1 } else { 0 };
    Ok(digits.iter().fold(init, |acc, &b| (acc << 8) | i64::from(b)))
}

/// Decode an INTEGER constrained to `Int32`
pub fn decode_int32(bytes: &[u8]) -> Result<i32, DecodeError> {
    let v = decode_integer(bytes)?;
    i32::try_from(v).map_err(|_| invalid(format!("{} is not an Int32", v)))
}

/// Decode an INTEGER constrained to `UInt32`
pub fn decode_uint32(bytes: &[u8]) -> Result<u32, DecodeError> {
    let v = decode_integer(bytes)?;
    u32::try_from(v).map_err(|_| invalid(format!("{} is not a UInt32", v)))
}

/// Decode the content of a KerberosString
///
/// <pre>
/// KerberosString  ::= GeneralString (IA5String)
/// </pre>
///
/// Deployed KDCs send UTF-8, which is what is accepted here.
pub fn decode_kerberos_string(bytes: &[u8]) -> Result<String, DecodeError> {
    match str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(invalid(format!("not a valid UTF-8 string ({})", e))),
    }
}

fn decimal<'a>(len: usize) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], u32> {
    map(take_while_m_n(len, len, |c: u8| c.is_ascii_digit()), |d: &[u8]| {
        d.iter().fold(0, |acc, &c| acc * 10 + u32::from(c - b'0'))
    })
}

#[allow(clippy::type_complexity)]
fn generalized_time(i: &[u8]) -> IResult<&[u8], (u32, u32, u32, u32, u32, u32)> {
    all_consuming(terminated(
        tuple((decimal(4), decimal(2), decimal(2), decimal(2), decimal(2), decimal(2))),
        tag("Z"),
    ))(i)
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Decode the content of a KerberosTime
///
/// <pre>
/// KerberosTime    ::= GeneralizedTime -- with no fractional seconds
/// </pre>
///
/// Only the `YYYYMMDDHHMMSSZ` form is accepted.
pub fn decode_kerberos_time(bytes: &[u8]) -> Result<KerberosTime, DecodeError> {
    if bytes.len() != KERBEROS_TIME_LENGTH {
        return Err(invalid(format!("KerberosTime of {} octets", bytes.len())));
    }
    let (_, (year, month, day, hour, minute, second)) =
        generalized_time(bytes).map_err(|_| invalid(format!("KerberosTime {:?}", String::from_utf8_lossy(bytes))))?;
    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) || hour > 23 || minute > 59 || second > 59 {
        return Err(invalid(format!("KerberosTime {:?} out of range", String::from_utf8_lossy(bytes))));
    }
    // all components fit, checked above
    Ok(KerberosTime {
        year: year as u16,
        month: month as u8,
        day: day as u8,
        hour: hour as u8,
        minute: minute as u8,
        second: second as u8,
    })
}

/// Decode the content of KerberosFlags
///
/// <pre>
/// KerberosFlags   ::= BIT STRING (SIZE (32..MAX))
///                     -- minimum number of bits shall be sent,
///                     -- but no fewer than 32
/// </pre>
///
/// Only the first 32 bits are kept.
pub fn decode_kerberos_flags(bytes: &[u8]) -> Result<u32, DecodeError> {
    let (&unused, bits) = match bytes.split_first() {
        Some(split) => split,
        None => {
            return Err(DecodeError::new(DecodeErrorKind::EmptyValueNotAllowed).with_context("BIT STRING"));
        }
    };
    if unused > 7 {
        return Err(invalid(format!("BIT STRING with {} unused bits", unused)));
    }
    if bits.len() * 8 < MIN_KERBEROS_FLAGS_BITS + usize::from(unused) {
        return Err(invalid(format!(
            "KerberosFlags of {} bits",
            (bits.len() * 8).saturating_sub(usize::from(unused))
        )));
    }
    Ok(u32::from_be_bytes([bits[0], bits[1], bits[2], bits[3]]))
}

/// Store an `Int32` field
pub struct StoreInt32<T> {
    description: &'static str,
    set: fn(&mut T, i32),
}

impl<T> StoreInt32<T> {
    pub fn new(description: &'static str, set: fn(&mut T, i32)) -> Self {
        StoreInt32 { description, set }
    }
}

impl<T> GrammarAction<T> for StoreInt32<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let v = decode_int32(ctx.value()?)?;
        debug!("{}: {}", self.description, v);
        (self.set)(object, v);
        Ok(())
    }
}

/// Store a `UInt32` field
pub struct StoreUInt32<T> {
    description: &'static str,
    set: fn(&mut T, u32),
}

impl<T> StoreUInt32<T> {
    pub fn new(description: &'static str, set: fn(&mut T, u32)) -> Self {
        StoreUInt32 { description, set }
    }
}

impl<T> GrammarAction<T> for StoreUInt32<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let v = decode_uint32(ctx.value()?)?;
        debug!("{}: {}", self.description, v);
        (self.set)(object, v);
        Ok(())
    }
}

/// Store a protocol version number, which must be `expected`
pub struct StoreVersion<T> {
    description: &'static str,
    expected: u32,
    set: fn(&mut T, u32),
}

impl<T> StoreVersion<T> {
    pub fn new(description: &'static str, expected: u32, set: fn(&mut T, u32)) -> Self {
        StoreVersion {
            description,
            expected,
            set,
        }
    }
}

impl<T> GrammarAction<T> for StoreVersion<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let v = decode_uint32(ctx.value()?)?;
        if v != self.expected {
            return Err(invalid(format!("version {}, expected {}", v, self.expected)));
        }
        (self.set)(object, v);
        Ok(())
    }
}

/// Store a KerberosString, possibly empty
pub struct StoreKerberosString<T> {
    description: &'static str,
    set: fn(&mut T, String),
}

impl<T> StoreKerberosString<T> {
    pub fn new(description: &'static str, set: fn(&mut T, String)) -> Self {
        StoreKerberosString { description, set }
    }
}

impl<T> GrammarAction<T> for StoreKerberosString<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let s = decode_kerberos_string(ctx.value()?)?;
        debug!("{}: {:?}", self.description, s);
        (self.set)(object, s);
        Ok(())
    }
}

/// Store a Realm, which must not be empty
pub struct StoreRealm<T> {
    description: &'static str,
    set: fn(&mut T, Realm),
}

impl<T> StoreRealm<T> {
    pub fn new(description: &'static str, set: fn(&mut T, Realm)) -> Self {
        StoreRealm { description, set }
    }
}

impl<T> GrammarAction<T> for StoreRealm<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let s = decode_kerberos_string(ctx.required_value()?)?;
        debug!("{}: {:?}", self.description, s);
        (self.set)(object, Realm(s));
        Ok(())
    }
}

/// Store the content of an OCTET STRING
pub struct StoreOctetString<T> {
    description: &'static str,
    required: bool,
    set: fn(&mut T, Vec<u8>),
}

impl<T> StoreOctetString<T> {
    /// The value must carry at least one octet
    pub fn new(description: &'static str, set: fn(&mut T, Vec<u8>)) -> Self {
        StoreOctetString {
            description,
            required: true,
            set,
        }
    }

    pub fn allow_empty(description: &'static str, set: fn(&mut T, Vec<u8>)) -> Self {
        StoreOctetString {
            description,
            required: false,
            set,
        }
    }
}

impl<T> GrammarAction<T> for StoreOctetString<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let value = if self.required {
            ctx.required_value()?
        } else {
            ctx.value()?
        };
        debug!("{}: {:02x?}", self.description, value);
        (self.set)(object, value.to_vec());
        Ok(())
    }
}

/// Store a KerberosTime
pub struct StoreKerberosTime<T> {
    description: &'static str,
    set: fn(&mut T, KerberosTime),
}

impl<T> StoreKerberosTime<T> {
    pub fn new(description: &'static str, set: fn(&mut T, KerberosTime)) -> Self {
        StoreKerberosTime { description, set }
    }
}

impl<T> GrammarAction<T> for StoreKerberosTime<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let t = decode_kerberos_time(ctx.required_value()?)?;
        debug!("{}: {}", self.description, t);
        (self.set)(object, t);
        Ok(())
    }
}

/// Store TicketFlags
pub struct StoreTicketFlags<T> {
    description: &'static str,
    set: fn(&mut T, TicketFlags),
}

impl<T> StoreTicketFlags<T> {
    pub fn new(description: &'static str, set: fn(&mut T, TicketFlags)) -> Self {
        StoreTicketFlags { description, set }
    }
}

impl<T> GrammarAction<T> for StoreTicketFlags<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let flags = TicketFlags(decode_kerberos_flags(ctx.required_value()?)?);
        debug!("{}: {:?}", self.description, flags);
        (self.set)(object, flags);
        Ok(())
    }
}

/// Decode the value of an explicitly tagged field with the grammar of `U`
pub struct StoreValue<T, U> {
    description: &'static str,
    set: fn(&mut T, U),
}

impl<T, U> StoreValue<T, U> {
    pub fn new(description: &'static str, set: fn(&mut T, U)) -> Self {
        StoreValue { description, set }
    }
}

impl<T, U: Decodable> GrammarAction<T> for StoreValue<T, U> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let v = ctx.decode_value::<U>()?;
        (self.set)(object, v);
        Ok(())
    }
}

/// Decode one SEQUENCE OF element with the grammar of `U`
pub struct StoreElement<T, U> {
    description: &'static str,
    push: fn(&mut T, U),
}

impl<T, U> StoreElement<T, U> {
    pub fn new(description: &'static str, push: fn(&mut T, U)) -> Self {
        StoreElement { description, push }
    }
}

impl<T, U: Decodable> GrammarAction<T> for StoreElement<T, U> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        let v = ctx.decode_element::<U>()?;
        (self.push)(object, v);
        Ok(())
    }
}

/// Mutate the object when entering a constructed TLV
pub struct Invoke<T> {
    description: &'static str,
    run: fn(&mut T),
}

impl<T> Invoke<T> {
    pub fn new(description: &'static str, run: fn(&mut T)) -> Self {
        Invoke { description, run }
    }
}

impl<T> GrammarAction<T> for Invoke<T> {
    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, _ctx: &ActionContext<'_>, object: &mut T) -> Result<(), DecodeError> {
        (self.run)(object);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(decode_integer(&[0x05]), Ok(5));
        assert_eq!(decode_integer(&[0x00, 0x80]), Ok(128));
        assert_eq!(decode_integer(&[0xff]), Ok(-1));
        assert_eq!(decode_integer(&[0xff, 0x7f]), Ok(-129));
        // non-minimal
        assert_eq!(decode_integer(&[0x00, 0x00, 0x00, 0x05]), Ok(5));
        assert_eq!(decode_integer(&[0xff, 0xff, 0x80]), Ok(-128));
        assert_eq!(
            decode_integer(&[0x00, 0x80, 0, 0, 0, 0, 0, 0, 0]),
            Err(invalid(String::from("INTEGER of 9 significant octets")))
        );
        assert_eq!(
            decode_integer(&[]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::EmptyValueNotAllowed)
        );
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(decode_int32(&[0x80, 0x00, 0x00, 0x00]), Ok(i32::MIN));
        assert_eq!(decode_uint32(&[0x00, 0xff, 0xff, 0xff, 0xff]), Ok(u32::MAX));
        assert_eq!(
            decode_uint32(&[0xff]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
        assert_eq!(
            decode_int32(&[0x01, 0x00, 0x00, 0x00, 0x00]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
    }

    #[test]
    fn test_kerberos_string() {
        assert_eq!(decode_kerberos_string(b"cifs"), Ok(String::from("cifs")));
        assert_eq!(decode_kerberos_string(b""), Ok(String::new()));
        assert_eq!(
            decode_kerberos_string(&[0x66, 0xff]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
    }

    #[test]
    fn test_kerberos_time() {
        assert_eq!(
            decode_kerberos_time(b"20170228135001Z"),
            Ok(KerberosTime {
                year: 2017,
                month: 2,
                day: 28,
                hour: 13,
                minute: 50,
                second: 1
            })
        );
        assert!(decode_kerberos_time(b"20160229000000Z").is_ok());
        for bad in &[
            &b"20170229000000Z"[..],
            b"20171301000000Z",
            b"20170100000000Z",
            b"20170101240000Z",
            b"20170101006000Z",
            b"20170101000060Z",
            b"2017010100000Z",
            b"20170101000000",
            b"20170101000000.5Z",
            b"2017010100000aZ",
            b"20170101000000z",
        ] {
            assert_eq!(
                decode_kerberos_time(bad).map_err(|e| e.kind()),
                Err(DecodeErrorKind::SemanticValidationFailed),
                "{:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn test_kerberos_flags() {
        assert_eq!(decode_kerberos_flags(&[0x00, 0x40, 0xe1, 0x00, 0x00]), Ok(0x40e1_0000));
        // extra bits are ignored
        assert_eq!(decode_kerberos_flags(&[0x04, 0x80, 0x00, 0x00, 0x01, 0xf0]), Ok(0x8000_0001));
        assert_eq!(
            decode_kerberos_flags(&[0x00, 0x40, 0xe1, 0x00]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
        assert_eq!(
            decode_kerberos_flags(&[0x01, 0x40, 0xe1, 0x00, 0x00]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
        assert_eq!(
            decode_kerberos_flags(&[0x08, 0x40, 0xe1, 0x00, 0x00, 0x00]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
        assert_eq!(
            decode_kerberos_flags(&[0x03]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::SemanticValidationFailed)
        );
        assert_eq!(
            decode_kerberos_flags(&[]).map_err(|e| e.kind()),
            Err(DecodeErrorKind::EmptyValueNotAllowed)
        );
    }
}
