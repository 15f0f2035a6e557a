//! # Kerberos Codec
//!
//! A resumable decoder for Kerberos v5 ([RFC4120]) structures encoded with the
//! ASN.1 Basic Encoding Rules.
//!
//! Decoding is driven by grammars: per-type state machines mapping the current
//! state and the next BER tag to a transition, whose action validates the
//! field and stores it into the structure being built. The tag and length
//! octets are parsed with [nom](https://github.com/Geal/nom) streaming
//! parsers, so input may be delivered in pieces of any size: a
//! [`StreamDecoder`](decoder::StreamDecoder) keeps the partial message between
//! calls.
//!
//! Specific parsing functions are provided for Kerberos structures. For ex. to parse a
//! Ticket, use [`parse_krb5_ticket`](krb5_parser/fn.parse_krb5_ticket.html).
//!
//! # Examples
//!
//! Parsing a Ticket:
//!
//! ```rust,no_run
//! use kerberos_codec::krb5::EncryptionType;
//! use kerberos_codec::krb5_parser::parse_krb5_ticket;
//!
//! static TICKET: &'static [u8] = include_bytes!("../assets/krb5-ticket.bin");
//!
//! # fn main() {
//! let res = parse_krb5_ticket(TICKET);
//! match res {
//!     Ok((rem, ticket)) => {
//!         assert!(rem.is_empty());
//!         //
//!         assert_eq!(ticket.tkt_vno, 5);
//!         assert_eq!(ticket.enc_part.etype, EncryptionType::AES256_CTS_HMAC_SHA1_96);
//!     },
//!     _ => panic!("Ticket parsing failed: {:?}", res),
//! }
//! # }
//! ```
//!
//! Decoding a stream, whatever the size of the reads:
//!
//! ```rust,no_run
//! use kerberos_codec::decoder::Decoded;
//! use kerberos_codec::krb5::Ticket;
//! use kerberos_codec::krb5_parser::stream_decoder;
//!
//! # fn main() -> Result<(), kerberos_codec::DecodeError> {
//! # let reads: Vec<Vec<u8>> = Vec::new();
//! let mut decoder = stream_decoder::<Ticket>();
//! for chunk in reads {
//!     let mut chunk = &chunk[..];
//!     while !chunk.is_empty() {
//!         match decoder.decode(chunk)? {
//!             Decoded::NeedMore(_) => break,
//!             Decoded::Message { consumed, message } => {
//!                 println!("{}@{}", message.sname, message.realm.0);
//!                 chunk = &chunk[consumed..];
//!             }
//!         }
//!     }
//! }
//! decoder.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! [RFC4120]: https://tools.ietf.org/html/rfc4120

#![deny(/*missing_docs,*/unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications)]

#[macro_use]
extern crate rusticata_macros;

pub mod actions;
pub mod ber;
pub mod config;
pub mod container;
pub mod decoder;
pub mod grammar;
pub mod grammars;
pub mod krb5;
pub mod krb5_constants;
pub mod krb5_parser;
pub mod tlv;

mod krb5_errors;
pub use config::DecoderConfig;
pub use grammar::Decodable;
pub use krb5_errors::*;
