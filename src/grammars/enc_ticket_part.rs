//! EncTicketPart
//!
//! <pre>
//! EncTicketPart   ::= [APPLICATION 3] SEQUENCE {
//!         flags                   [0] TicketFlags,
//!         key                     [1] EncryptionKey,
//!         crealm                  [2] Realm,
//!         cname                   [3] PrincipalName,
//!         transited               [4] TransitedEncoding,
//!         authtime                [5] KerberosTime,
//!         starttime               [6] KerberosTime OPTIONAL,
//!         endtime                 [7] KerberosTime,
//!         renew-till              [8] KerberosTime OPTIONAL,
//!         caddr                   [9] HostAddresses OPTIONAL,
//!         authorization-data      [10] AuthorizationData OPTIONAL
//! }
//! </pre>

use once_cell::sync::Lazy;

use self::EncTicketPartState as S;
use crate::actions::{StoreKerberosTime, StoreRealm, StoreTicketFlags, StoreValue};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::*;
use crate::krb5_constants::APPLICATION_ENC_TICKET_PART;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncTicketPartState {
    Start,
    App,
    Seq,
    FlagsTag,
    Flags,
    FlagsDone,
    KeyDone,
    CrealmTag,
    Crealm,
    CrealmDone,
    CnameDone,
    TransitedDone,
    AuthtimeTag,
    Authtime,
    AuthtimeDone,
    StarttimeTag,
    Starttime,
    StarttimeDone,
    EndtimeTag,
    Endtime,
    EndtimeDone,
    RenewTillTag,
    RenewTill,
    RenewTillDone,
    CaddrDone,
    AuthorizationDataDone,
    SeqDone,
    End,
}

static GRAMMAR: Lazy<Grammar<EncTicketPart, EncTicketPartState>> = Lazy::new(|| {
    let caddr = || {
        StoreValue::new("EncTicketPart caddr", |p: &mut EncTicketPart, a: HostAddresses| {
            p.caddr = Some(a)
        })
    };
    let authorization_data = || {
        StoreValue::new(
            "EncTicketPart authorization-data",
            |p: &mut EncTicketPart, ad: AuthorizationData| p.authorization_data = Some(ad),
        )
    };
    Grammar::builder("EncTicketPart", S::Start)
        .enter(S::Start, Tag::application(APPLICATION_ENC_TICKET_PART), S::App, S::End)
        .enter(S::App, Tag::SEQUENCE, S::Seq, S::SeqDone)
        // flags
        .enter(S::Seq, Tag::context(0), S::FlagsTag, S::FlagsDone)
        .read(
            S::FlagsTag,
            Tag::BIT_STRING,
            S::Flags,
            StoreTicketFlags::new("EncTicketPart flags", |p: &mut EncTicketPart, f| p.flags = f),
        )
        // key
        .read(
            S::FlagsDone,
            Tag::context(1),
            S::KeyDone,
            StoreValue::new("EncTicketPart key", |p: &mut EncTicketPart, k: EncryptionKey| p.key = k),
        )
        // crealm
        .enter(S::KeyDone, Tag::context(2), S::CrealmTag, S::CrealmDone)
        .read(
            S::CrealmTag,
            Tag::GENERAL_STRING,
            S::Crealm,
            StoreRealm::new("EncTicketPart crealm", |p: &mut EncTicketPart, r| p.crealm = r),
        )
        // cname
        .read(
            S::CrealmDone,
            Tag::context(3),
            S::CnameDone,
            StoreValue::new("EncTicketPart cname", |p: &mut EncTicketPart, n: PrincipalName| p.cname = n),
        )
        // transited
        .read(
            S::CnameDone,
            Tag::context(4),
            S::TransitedDone,
            StoreValue::new(
                "EncTicketPart transited",
                |p: &mut EncTicketPart, te: TransitedEncoding| p.transited = te,
            ),
        )
        // authtime
        .enter(S::TransitedDone, Tag::context(5), S::AuthtimeTag, S::AuthtimeDone)
        .read(
            S::AuthtimeTag,
            Tag::GENERALIZED_TIME,
            S::Authtime,
            StoreKerberosTime::new("EncTicketPart authtime", |p: &mut EncTicketPart, t| p.authtime = t),
        )
        // starttime
        .enter(S::AuthtimeDone, Tag::context(6), S::StarttimeTag, S::StarttimeDone)
        .read(
            S::StarttimeTag,
            Tag::GENERALIZED_TIME,
            S::Starttime,
            StoreKerberosTime::new("EncTicketPart starttime", |p: &mut EncTicketPart, t| {
                p.starttime = Some(t)
            }),
        )
        // endtime
        .enter(S::AuthtimeDone, Tag::context(7), S::EndtimeTag, S::EndtimeDone)
        .enter(S::StarttimeDone, Tag::context(7), S::EndtimeTag, S::EndtimeDone)
        .read(
            S::EndtimeTag,
            Tag::GENERALIZED_TIME,
            S::Endtime,
            StoreKerberosTime::new("EncTicketPart endtime", |p: &mut EncTicketPart, t| p.endtime = t),
        )
        // renew-till
        .enter(S::EndtimeDone, Tag::context(8), S::RenewTillTag, S::RenewTillDone)
        .read(
            S::RenewTillTag,
            Tag::GENERALIZED_TIME,
            S::RenewTill,
            StoreKerberosTime::new("EncTicketPart renew-till", |p: &mut EncTicketPart, t| {
                p.renew_till = Some(t)
            }),
        )
        // caddr
        .read(S::EndtimeDone, Tag::context(9), S::CaddrDone, caddr())
        .read(S::RenewTillDone, Tag::context(9), S::CaddrDone, caddr())
        // authorization-data
        .read(S::EndtimeDone, Tag::context(10), S::AuthorizationDataDone, authorization_data())
        .read(S::RenewTillDone, Tag::context(10), S::AuthorizationDataDone, authorization_data())
        .read(S::CaddrDone, Tag::context(10), S::AuthorizationDataDone, authorization_data())
        .end_allowed(&[
            S::Flags,
            S::Crealm,
            S::Authtime,
            S::Starttime,
            S::Endtime,
            S::RenewTill,
            S::EndtimeDone,
            S::RenewTillDone,
            S::CaddrDone,
            S::AuthorizationDataDone,
            S::SeqDone,
            S::End,
        ])
        .build()
});

impl Decodable for EncTicketPart {
    type State = EncTicketPartState;

    fn grammar() -> &'static Grammar<EncTicketPart, EncTicketPartState> {
        &GRAMMAR
    }
}
