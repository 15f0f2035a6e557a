//! PrincipalName
//!
//! <pre>
//! PrincipalName   ::= SEQUENCE {
//!         name-type       [0] Int32,
//!         name-string     [1] SEQUENCE OF KerberosString
//! }
//! </pre>

use once_cell::sync::Lazy;

use self::PrincipalNameState as S;
use crate::actions::{StoreInt32, StoreKerberosString};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::{NameType, PrincipalName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalNameState {
    Start,
    Seq,
    NameTypeTag,
    NameType,
    NameTypeDone,
    NameStringTag,
    NameStringSeq,
    /// At least one component was read
    NameString,
    NameStringSeqDone,
    NameStringDone,
    End,
}

static GRAMMAR: Lazy<Grammar<PrincipalName, PrincipalNameState>> = Lazy::new(|| {
    let component = || {
        StoreKerberosString::new("PrincipalName name-string", |pn: &mut PrincipalName, s| {
            pn.name_string.push(s)
        })
    };
    Grammar::builder("PrincipalName", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .enter(S::Seq, Tag::context(0), S::NameTypeTag, S::NameTypeDone)
        .read(
            S::NameTypeTag,
            Tag::INTEGER,
            S::NameType,
            StoreInt32::new("PrincipalName name-type", |pn: &mut PrincipalName, v| {
                pn.name_type = NameType(v)
            }),
        )
        .enter(S::NameTypeDone, Tag::context(1), S::NameStringTag, S::NameStringDone)
        .enter(S::NameStringTag, Tag::SEQUENCE, S::NameStringSeq, S::NameStringSeqDone)
        .read(S::NameStringSeq, Tag::GENERAL_STRING, S::NameString, component())
        .read(S::NameString, Tag::GENERAL_STRING, S::NameString, component())
        .end_allowed(&[
            S::NameType,
            S::NameString,
            S::NameStringSeqDone,
            S::NameStringDone,
            S::End,
        ])
        .build()
});

impl Decodable for PrincipalName {
    type State = PrincipalNameState;

    fn grammar() -> &'static Grammar<PrincipalName, PrincipalNameState> {
        &GRAMMAR
    }
}
