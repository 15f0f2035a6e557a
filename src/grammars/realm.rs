//! Realm
//!
//! <pre>
//! Realm           ::= KerberosString
//! </pre>

use once_cell::sync::Lazy;

use self::RealmState as S;
use crate::actions::StoreRealm;
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::Realm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealmState {
    Start,
    End,
}

static GRAMMAR: Lazy<Grammar<Realm, RealmState>> = Lazy::new(|| {
    Grammar::builder("Realm", S::Start)
        .read(
            S::Start,
            Tag::GENERAL_STRING,
            S::End,
            StoreRealm::new("Realm", |r: &mut Realm, v| *r = v),
        )
        .end_allowed(&[S::End])
        .build()
});

impl Decodable for Realm {
    type State = RealmState;

    fn grammar() -> &'static Grammar<Realm, RealmState> {
        &GRAMMAR
    }
}
