//! EncryptionKey
//!
//! <pre>
//! EncryptionKey   ::= SEQUENCE {
//!         keytype         [0] Int32 -- actually encryption type --,
//!         keyvalue        [1] OCTET STRING
//! }
//! </pre>

use once_cell::sync::Lazy;

use self::EncryptionKeyState as S;
use crate::actions::{StoreInt32, StoreOctetString};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::{EncryptionKey, EncryptionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionKeyState {
    Start,
    Seq,
    KeytypeTag,
    Keytype,
    KeytypeDone,
    KeyvalueTag,
    Keyvalue,
    KeyvalueDone,
    End,
}

static GRAMMAR: Lazy<Grammar<EncryptionKey, EncryptionKeyState>> = Lazy::new(|| {
    Grammar::builder("EncryptionKey", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .enter(S::Seq, Tag::context(0), S::KeytypeTag, S::KeytypeDone)
        .read(
            S::KeytypeTag,
            Tag::INTEGER,
            S::Keytype,
            StoreInt32::new("EncryptionKey keytype", |k: &mut EncryptionKey, v| {
                k.keytype = EncryptionType(v)
            }),
        )
        .enter(S::KeytypeDone, Tag::context(1), S::KeyvalueTag, S::KeyvalueDone)
        .read(
            S::KeyvalueTag,
            Tag::OCTET_STRING,
            S::Keyvalue,
            StoreOctetString::new("EncryptionKey keyvalue", |k: &mut EncryptionKey, v| k.keyvalue = v),
        )
        .end_allowed(&[S::Keytype, S::Keyvalue, S::KeyvalueDone, S::End])
        .build()
});

impl Decodable for EncryptionKey {
    type State = EncryptionKeyState;

    fn grammar() -> &'static Grammar<EncryptionKey, EncryptionKeyState> {
        &GRAMMAR
    }
}
