//! TransitedEncoding
//!
//! <pre>
//! TransitedEncoding       ::= SEQUENCE {
//!         tr-type         [0] Int32 -- must be registered --,
//!         contents        [1] OCTET STRING
//! }
//! </pre>
//!
//! `contents` is empty when no realm was transited.

use once_cell::sync::Lazy;

use self::TransitedEncodingState as S;
use crate::actions::{StoreInt32, StoreOctetString};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::TransitedEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitedEncodingState {
    Start,
    Seq,
    TrTypeTag,
    TrType,
    TrTypeDone,
    ContentsTag,
    Contents,
    ContentsDone,
    End,
}

static GRAMMAR: Lazy<Grammar<TransitedEncoding, TransitedEncodingState>> = Lazy::new(|| {
    Grammar::builder("TransitedEncoding", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .enter(S::Seq, Tag::context(0), S::TrTypeTag, S::TrTypeDone)
        .read(
            S::TrTypeTag,
            Tag::INTEGER,
            S::TrType,
            StoreInt32::new("TransitedEncoding tr-type", |te: &mut TransitedEncoding, v| te.tr_type = v),
        )
        .enter(S::TrTypeDone, Tag::context(1), S::ContentsTag, S::ContentsDone)
        .read(
            S::ContentsTag,
            Tag::OCTET_STRING,
            S::Contents,
            StoreOctetString::allow_empty("TransitedEncoding contents", |te: &mut TransitedEncoding, v| {
                te.contents = v
            }),
        )
        .end_allowed(&[S::TrType, S::Contents, S::ContentsDone, S::End])
        .build()
});

impl Decodable for TransitedEncoding {
    type State = TransitedEncodingState;

    fn grammar() -> &'static Grammar<TransitedEncoding, TransitedEncodingState> {
        &GRAMMAR
    }
}
