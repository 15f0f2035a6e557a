//! BER identifier and length octets
//!
//! Only the definite-length subset of BER (X.690 section 8.1) is accepted: the
//! Kerberos structures decoded by this crate never use the indefinite form.
//!
//! The parsers are written with nom *streaming* combinators, so a truncated
//! header reports how many more bytes are needed instead of failing.

use der_parser::ber::{Class, Tag as BerTag};
use nom::bytes::streaming::take;
use nom::error::{ErrorKind, ParseError};
use nom::number::streaming::be_u8;
use nom::{Err, IResult, Needed};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::krb5_errors::DecodeErrorKind;

const CLASS_SHIFT: u8 = 6;
const CONSTRUCTED_BIT: u8 = 0b0010_0000;
const TAG_NUMBER_MASK: u8 = 0b0001_1111;
const HIGH_TAG_NUMBER: u8 = 0b0001_1111;
const MORE_OCTETS_BIT: u8 = 0b1000_0000;
const LENGTH_LONG_FORM: u8 = 0b1000_0000;
const LENGTH_OCTETS_MASK: u8 = 0b0111_1111;

/// Maximum number of length octets following a long-form initial octet
pub const MAX_LENGTH_OCTETS: usize = 4;

/// Longest header accepted: one identifier octet, five tag number octets, one
/// initial length octet and four length octets
pub const MAX_HEADER_LEN: usize = 1 + 5 + 1 + MAX_LENGTH_OCTETS;

/// BER tag: class, constructed flag and tag number
///
/// Two tags are equal when all three fields are equal. Grammars use the full
/// tag (including the constructed flag) as a transition key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class: Class,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    pub const SEQUENCE: Tag = Tag::new(Class::Universal, true, BerTag::Sequence.0);
    pub const INTEGER: Tag = Tag::universal(BerTag::Integer);
    pub const BIT_STRING: Tag = Tag::universal(BerTag::BitString);
    pub const OCTET_STRING: Tag = Tag::universal(BerTag::OctetString);
    pub const GENERALIZED_TIME: Tag = Tag::universal(BerTag::GeneralizedTime);
    pub const GENERAL_STRING: Tag = Tag::universal(BerTag::GeneralString);

    pub const fn new(class: Class, constructed: bool, number: u32) -> Tag {
        Tag {
            class,
            constructed,
            number,
        }
    }

    /// Primitive universal tag
    pub const fn universal(tag: BerTag) -> Tag {
        Tag::new(Class::Universal, false, tag.0)
    }

    /// Constructed `[APPLICATION n]` tag
    pub const fn application(number: u32) -> Tag {
        Tag::new(Class::Application, true, number)
    }

    /// Constructed context-specific `[n]` tag, as used by explicit tagging
    pub const fn context(number: u32) -> Tag {
        Tag::new(Class::ContextSpecific, true, number)
    }
}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let class: u8 = match self.class {
            Class::Universal => 0,
            Class::Application => 1,
            Class::ContextSpecific => 2,
            Class::Private => 3,
        };
        class.hash(state);
        self.constructed.hash(state);
        self.number.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let form = if self.constructed { "c" } else { "p" };
        match self.class {
            Class::Universal => write!(f, "[UNIVERSAL {}]/{}", self.number, form),
            Class::Application => write!(f, "[APPLICATION {}]/{}", self.number, form),
            Class::ContextSpecific => write!(f, "[{}]/{}", self.number, form),
            Class::Private => write!(f, "[PRIVATE {}]/{}", self.number, form),
        }
    }
}

/// Parsed identifier and length octets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tag: Tag,
    /// Declared length of the value
    pub length: usize,
    /// Number of octets used by the identifier and length
    pub header_len: usize,
}

/// Outcome of [`parse_header`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderParse {
    Parsed(Header),
    /// At least this many more bytes are required; the bytes already seen
    /// must be presented again together with the new ones
    NeedMore(usize),
    Malformed(DecodeErrorKind),
}

/// Error type of the header parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    Invalid(DecodeErrorKind),
    Nom(ErrorKind),
}

impl HeaderError {
    pub fn kind(&self) -> DecodeErrorKind {
        match *self {
            HeaderError::Invalid(kind) => kind,
            HeaderError::Nom(_) => DecodeErrorKind::MalformedTag,
        }
    }
}

impl<I> ParseError<I> for HeaderError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        HeaderError::Nom(kind)
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

#[inline]
fn malformed<T>(kind: DecodeErrorKind) -> Result<T, Err<HeaderError>> {
    Err(Err::Failure(HeaderError::Invalid(kind)))
}

#[inline]
fn octet(i: &[u8]) -> IResult<&[u8], u8, HeaderError> {
    be_u8(i)
}

#[inline]
fn octets(i: &[u8], count: usize) -> IResult<&[u8], &[u8], HeaderError> {
    take(count)(i)
}

/// Parse identifier octets
///
/// Tag numbers above 30 use the high-tag-number form: base-128 digits, most
/// significant first, bit 8 set on every octet but the last. A leading zero
/// digit or a number that does not fit in 32 bits is rejected.
pub fn parse_ber_tag(i: &[u8]) -> IResult<&[u8], Tag, HeaderError> {
    let (mut i, b) = octet(i)?;
    let class = match b >> CLASS_SHIFT {
        0b00 => Class::Universal,
        0b01 => Class::Application,
        0b10 => Class::ContextSpecific,
        _ => Class::Private,
    };
    let constructed = b & CONSTRUCTED_BIT != 0;
    if b & TAG_NUMBER_MASK != HIGH_TAG_NUMBER {
        return Ok((i, Tag::new(class, constructed, u32::from(b & TAG_NUMBER_MASK))));
    }
    let mut number: u32 = 0;
    let mut first = true;
    loop {
        let (rem, b) = octet(i)?;
        i = rem;
        if first && b == MORE_OCTETS_BIT {
            // X.690 8.1.2.4.2 c): bits 7 to 1 of the first subsequent octet shall not all be zero
            return malformed(DecodeErrorKind::MalformedTag);
        }
        first = false;
        if number > (u32::MAX >> 7) {
            return malformed(DecodeErrorKind::MalformedTag);
        }
        number = (number << 7) | u32::from(b & !MORE_OCTETS_BIT);
        if b & MORE_OCTETS_BIT == 0 {
            break;
        }
    }
    Ok((i, Tag::new(class, constructed, number)))
}

/// Parse length octets
///
/// The indefinite form (`0x80`), the reserved `0xff` initial octet, and more
/// than [`MAX_LENGTH_OCTETS`] length octets are rejected.
pub fn parse_ber_length(i: &[u8]) -> IResult<&[u8], usize, HeaderError> {
    let (i, b) = octet(i)?;
    if b & LENGTH_LONG_FORM == 0 {
        return Ok((i, usize::from(b)));
    }
    let count = usize::from(b & LENGTH_OCTETS_MASK);
    if count == 0 || count > MAX_LENGTH_OCTETS {
        return malformed(DecodeErrorKind::MalformedLength);
    }
    let (i, digits) = octets(i, count)?;
    let length = digits
        .iter()
        .fold(0u64, |acc, &d| (acc << 8) | u64::from(d));
    match usize::try_from(length) {
        Ok(length) => Ok((i, length)),
        Err(_) => malformed(DecodeErrorKind::MalformedLength),
    }
}

/// Parse one tag and one length from the start of `i`
pub fn parse_header(i: &[u8]) -> HeaderParse {
    let res = parse_ber_tag(i)
        .and_then(|(rem, tag)| parse_ber_length(rem).map(|(rem, length)| (rem, tag, length)));
    match res {
        Ok((rem, tag, length)) => HeaderParse::Parsed(Header {
            tag,
            length,
            header_len: i.len() - rem.len(),
        }),
        Err(Err::Incomplete(Needed::Size(n))) => HeaderParse::NeedMore(n.get()),
        Err(Err::Incomplete(Needed::Unknown)) => HeaderParse::NeedMore(1),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => HeaderParse::Malformed(e.kind()),
    }
}
