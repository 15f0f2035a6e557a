//! AuthorizationData
//!
//! <pre>
//! AuthorizationData       ::= SEQUENCE OF SEQUENCE {
//!         ad-type         [0] Int32,
//!         ad-data         [1] OCTET STRING
//! }
//! </pre>
//!
//! The elements are decoded in place: a new entry is started when the
//! element SEQUENCE is entered, and its fields are stored into the last entry.

use once_cell::sync::Lazy;

use self::AuthorizationDataState as S;
use crate::actions::{Invoke, StoreInt32, StoreOctetString};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::{AuthorizationData, AuthorizationDataEntry, AuthorizationType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationDataState {
    Start,
    Seq,
    Entry,
    AdTypeTag,
    AdType,
    AdTypeDone,
    AdDataTag,
    AdData,
    AdDataDone,
    /// At least one entry was read
    EntryDone,
    End,
}

static GRAMMAR: Lazy<Grammar<AuthorizationData, AuthorizationDataState>> = Lazy::new(|| {
    let new_entry = || {
        Invoke::new("AuthorizationData entry", |ad: &mut AuthorizationData| {
            ad.0.push(AuthorizationDataEntry::default())
        })
    };
    Grammar::builder("AuthorizationData", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .enter_with(S::Seq, Tag::SEQUENCE, S::Entry, S::EntryDone, new_entry())
        .enter_with(S::EntryDone, Tag::SEQUENCE, S::Entry, S::EntryDone, new_entry())
        .enter(S::Entry, Tag::context(0), S::AdTypeTag, S::AdTypeDone)
        .read(
            S::AdTypeTag,
            Tag::INTEGER,
            S::AdType,
            StoreInt32::new("AuthorizationData ad-type", |ad: &mut AuthorizationData, v| {
                if let Some(entry) = ad.0.last_mut() {
                    entry.ad_type = AuthorizationType(v);
                }
            }),
        )
        .enter(S::AdTypeDone, Tag::context(1), S::AdDataTag, S::AdDataDone)
        .read(
            S::AdDataTag,
            Tag::OCTET_STRING,
            S::AdData,
            StoreOctetString::new("AuthorizationData ad-data", |ad: &mut AuthorizationData, v| {
                if let Some(entry) = ad.0.last_mut() {
                    entry.ad_data = v;
                }
            }),
        )
        .end_allowed(&[S::AdType, S::AdData, S::AdDataDone, S::EntryDone, S::End])
        .build()
});

impl Decodable for AuthorizationData {
    type State = AuthorizationDataState;

    fn grammar() -> &'static Grammar<AuthorizationData, AuthorizationDataState> {
        &GRAMMAR
    }
}
