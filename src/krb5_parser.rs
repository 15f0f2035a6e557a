//! Kerberos 5 parsing functions
//!
//! Each function decodes one complete structure from the start of its input
//! and returns the remaining bytes with the decoded value, like a nom parser.
//! Input ending before the structure is complete is an
//! [`Incomplete`](crate::DecodeErrorKind::Incomplete) error; use
//! [`stream_decoder`] when the bytes arrive in pieces.

use crate::config::DecoderConfig;
use crate::decoder::{decode, StreamDecoder};
use crate::grammar::Decodable;
use crate::krb5::*;
use crate::krb5_errors::DecodeError;

/// Result of a parsing function: remaining input and decoded value
pub type Krb5Result<'a, T> = Result<(&'a [u8], T), DecodeError>;

/// Decode any [`Decodable`] structure with the default limits
pub fn parse_der<T: Decodable>(i: &[u8]) -> Krb5Result<T> {
    parse_der_with_config(i, &DecoderConfig::default())
}

/// Decode any [`Decodable`] structure with the given limits
pub fn parse_der_with_config<'a, T: Decodable>(i: &'a [u8], config: &DecoderConfig) -> Krb5Result<'a, T> {
    decode(T::grammar(), config, i)
}

/// Incremental decoder for a stream of `T` with the default limits
pub fn stream_decoder<T: Decodable>() -> StreamDecoder<'static, T, T::State> {
    StreamDecoder::new(T::grammar(), DecoderConfig::default())
}

/// Parse of a Kerberos Realm
pub fn parse_krb5_realm(i: &[u8]) -> Krb5Result<Realm> {
    parse_der(i)
}

/// Parse Kerberos PrincipalName
pub fn parse_krb5_principalname(i: &[u8]) -> Krb5Result<PrincipalName> {
    parse_der(i)
}

/// Parse Kerberos HostAddress
pub fn parse_krb5_hostaddress(i: &[u8]) -> Krb5Result<HostAddress> {
    parse_der(i)
}

/// Parse Kerberos HostAddresses
pub fn parse_krb5_hostaddresses(i: &[u8]) -> Krb5Result<HostAddresses> {
    parse_der(i)
}

/// Parse Kerberos Ticket
///
/// The `enc-part` is returned as EncryptedData: decrypting it (with the key of
/// the service) gives an encoding of [`EncTicketPart`], see [`parse_enc_ticket_part`].
pub fn parse_krb5_ticket(i: &[u8]) -> Krb5Result<Ticket> {
    parse_der(i)
}

/// Parse Kerberos EncryptedData
pub fn parse_encrypted(i: &[u8]) -> Krb5Result<EncryptedData> {
    parse_der(i)
}

/// Parse Kerberos EncryptionKey
pub fn parse_encryption_key(i: &[u8]) -> Krb5Result<EncryptionKey> {
    parse_der(i)
}

/// Parse Kerberos TransitedEncoding
pub fn parse_transited_encoding(i: &[u8]) -> Krb5Result<TransitedEncoding> {
    parse_der(i)
}

/// Parse Kerberos AuthorizationData
pub fn parse_authorization_data(i: &[u8]) -> Krb5Result<AuthorizationData> {
    parse_der(i)
}

/// Parse a decrypted Kerberos EncTicketPart
pub fn parse_enc_ticket_part(i: &[u8]) -> Krb5Result<EncTicketPart> {
    parse_der(i)
}
