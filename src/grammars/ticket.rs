//! Ticket
//!
//! <pre>
//! Ticket          ::= [APPLICATION 1] SEQUENCE {
//!         tkt-vno         [0] INTEGER (5),
//!         realm           [1] Realm,
//!         sname           [2] PrincipalName,
//!         enc-part        [3] EncryptedData -- EncTicketPart
//! }
//! </pre>

use once_cell::sync::Lazy;

use self::TicketState as S;
use crate::actions::{StoreRealm, StoreValue, StoreVersion};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::{EncryptedData, PrincipalName, Ticket};
use crate::krb5_constants::{APPLICATION_TICKET, KRB5_PVNO};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketState {
    Start,
    App,
    Seq,
    TktVnoTag,
    TktVno,
    TktVnoDone,
    RealmTag,
    RealmValue,
    RealmDone,
    SnameDone,
    EncPartDone,
    SeqDone,
    End,
}

static GRAMMAR: Lazy<Grammar<Ticket, TicketState>> = Lazy::new(|| {
    Grammar::builder("Ticket", S::Start)
        .enter(S::Start, Tag::application(APPLICATION_TICKET), S::App, S::End)
        .enter(S::App, Tag::SEQUENCE, S::Seq, S::SeqDone)
        .enter(S::Seq, Tag::context(0), S::TktVnoTag, S::TktVnoDone)
        .read(
            S::TktVnoTag,
            Tag::INTEGER,
            S::TktVno,
            StoreVersion::new("Ticket tkt-vno", KRB5_PVNO, |t: &mut Ticket, v| t.tkt_vno = v),
        )
        .enter(S::TktVnoDone, Tag::context(1), S::RealmTag, S::RealmDone)
        .read(
            S::RealmTag,
            Tag::GENERAL_STRING,
            S::RealmValue,
            StoreRealm::new("Ticket realm", |t: &mut Ticket, r| t.realm = r),
        )
        .read(
            S::RealmDone,
            Tag::context(2),
            S::SnameDone,
            StoreValue::new("Ticket sname", |t: &mut Ticket, n: PrincipalName| t.sname = n),
        )
        .read(
            S::SnameDone,
            Tag::context(3),
            S::EncPartDone,
            StoreValue::new("Ticket enc-part", |t: &mut Ticket, e: EncryptedData| t.enc_part = e),
        )
        .end_allowed(&[S::TktVno, S::RealmValue, S::EncPartDone, S::SeqDone, S::End])
        .build()
});

impl Decodable for Ticket {
    type State = TicketState;

    fn grammar() -> &'static Grammar<Ticket, TicketState> {
        &GRAMMAR
    }
}
