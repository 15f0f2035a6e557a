//! EncryptedData
//!
//! <pre>
//! EncryptedData   ::= SEQUENCE {
//!         etype   [0] Int32 -- EncryptionType --,
//!         kvno    [1] UInt32 OPTIONAL,
//!         cipher  [2] OCTET STRING -- ciphertext
//! }
//! </pre>

use once_cell::sync::Lazy;

use self::EncryptedDataState as S;
use crate::actions::{StoreInt32, StoreOctetString, StoreUInt32};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::{EncryptedData, EncryptionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptedDataState {
    Start,
    Seq,
    EtypeTag,
    Etype,
    EtypeDone,
    KvnoTag,
    Kvno,
    KvnoDone,
    CipherTag,
    Cipher,
    CipherDone,
    End,
}

static GRAMMAR: Lazy<Grammar<EncryptedData, EncryptedDataState>> = Lazy::new(|| {
    Grammar::builder("EncryptedData", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .enter(S::Seq, Tag::context(0), S::EtypeTag, S::EtypeDone)
        .read(
            S::EtypeTag,
            Tag::INTEGER,
            S::Etype,
            StoreInt32::new("EncryptedData etype", |ed: &mut EncryptedData, v| {
                ed.etype = EncryptionType(v)
            }),
        )
        .enter(S::EtypeDone, Tag::context(1), S::KvnoTag, S::KvnoDone)
        .read(
            S::KvnoTag,
            Tag::INTEGER,
            S::Kvno,
            StoreUInt32::new("EncryptedData kvno", |ed: &mut EncryptedData, v| ed.kvno = Some(v)),
        )
        .enter(S::EtypeDone, Tag::context(2), S::CipherTag, S::CipherDone)
        .enter(S::KvnoDone, Tag::context(2), S::CipherTag, S::CipherDone)
        .read(
            S::CipherTag,
            Tag::OCTET_STRING,
            S::Cipher,
            StoreOctetString::new("EncryptedData cipher", |ed: &mut EncryptedData, v| ed.cipher = v),
        )
        .end_allowed(&[S::Etype, S::Kvno, S::Cipher, S::CipherDone, S::End])
        .build()
});

impl Decodable for EncryptedData {
    type State = EncryptedDataState;

    fn grammar() -> &'static Grammar<EncryptedData, EncryptedDataState> {
        &GRAMMAR
    }
}
