//! Test helpers: a minimal DER encoder and a chunked decoding driver
#![allow(dead_code)]

use kerberos_codec::container::{Asn1Container, Outcome};
use kerberos_codec::krb5::*;
use kerberos_codec::{Decodable, DecodeError, DecodeErrorKind, DecoderConfig};

pub fn length(n: usize) -> Vec<u8> {
    if n < 0x80 {
        return vec![n as u8];
    }
    let bytes = (n as u32).to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let mut v = vec![0x80 | (4 - skip) as u8];
    v.extend_from_slice(&bytes[skip..]);
    v
}

pub fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut v = vec![tag];
    v.extend(length(value.len()));
    v.extend_from_slice(value);
    v
}

pub fn seq(parts: &[Vec<u8>]) -> Vec<u8> {
    tlv(0x30, &parts.concat())
}

pub fn ctx(n: u8, value: Vec<u8>) -> Vec<u8> {
    tlv(0xa0 | n, &value)
}

pub fn app(n: u8, value: Vec<u8>) -> Vec<u8> {
    tlv(0x60 | n, &value)
}

pub fn integer(i: i64) -> Vec<u8> {
    let bytes = i.to_be_bytes();
    let mut start = 0;
    while start < 7
        && ((bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0))
    {
        start += 1;
    }
    tlv(0x02, &bytes[start..])
}

pub fn general_string(s: &str) -> Vec<u8> {
    tlv(0x1b, s.as_bytes())
}

pub fn octet_string(b: &[u8]) -> Vec<u8> {
    tlv(0x04, b)
}

pub fn generalized_time(t: &KerberosTime) -> Vec<u8> {
    tlv(0x18, t.to_string().as_bytes())
}

pub fn ticket_flags(flags: TicketFlags) -> Vec<u8> {
    let mut v = vec![0];
    v.extend_from_slice(&flags.0.to_be_bytes());
    tlv(0x03, &v)
}

pub fn principal_name(pn: &PrincipalName) -> Vec<u8> {
    let names: Vec<_> = pn.name_string.iter().map(|s| general_string(s)).collect();
    seq(&[
        ctx(0, integer(i64::from(pn.name_type.0))),
        ctx(1, seq(&names)),
    ])
}

pub fn encrypted_data(ed: &EncryptedData) -> Vec<u8> {
    let mut fields = vec![ctx(0, integer(i64::from(ed.etype.0)))];
    if let Some(kvno) = ed.kvno {
        fields.push(ctx(1, integer(i64::from(kvno))));
    }
    fields.push(ctx(2, octet_string(&ed.cipher)));
    seq(&fields)
}

pub fn ticket(t: &Ticket) -> Vec<u8> {
    app(
        1,
        seq(&[
            ctx(0, integer(i64::from(t.tkt_vno))),
            ctx(1, general_string(&t.realm.0)),
            ctx(2, principal_name(&t.sname)),
            ctx(3, encrypted_data(&t.enc_part)),
        ]),
    )
}

pub fn host_addresses(ha: &HostAddresses) -> Vec<u8> {
    let elements: Vec<_> = ha
        .0
        .iter()
        .map(|a| {
            seq(&[
                ctx(0, integer(i64::from(a.addr_type.0))),
                ctx(1, octet_string(&a.address)),
            ])
        })
        .collect();
    seq(&elements)
}

pub fn authorization_data(ad: &AuthorizationData) -> Vec<u8> {
    let elements: Vec<_> = ad
        .0
        .iter()
        .map(|e| {
            seq(&[
                ctx(0, integer(i64::from(e.ad_type.0))),
                ctx(1, octet_string(&e.ad_data)),
            ])
        })
        .collect();
    seq(&elements)
}

pub fn enc_ticket_part(p: &EncTicketPart) -> Vec<u8> {
    let mut fields = vec![
        ctx(0, ticket_flags(p.flags)),
        ctx(
            1,
            seq(&[
                ctx(0, integer(i64::from(p.key.keytype.0))),
                ctx(1, octet_string(&p.key.keyvalue)),
            ]),
        ),
        ctx(2, general_string(&p.crealm.0)),
        ctx(3, principal_name(&p.cname)),
        ctx(
            4,
            seq(&[
                ctx(0, integer(i64::from(p.transited.tr_type))),
                ctx(1, octet_string(&p.transited.contents)),
            ]),
        ),
        ctx(5, generalized_time(&p.authtime)),
    ];
    if let Some(ref t) = p.starttime {
        fields.push(ctx(6, generalized_time(t)));
    }
    fields.push(ctx(7, generalized_time(&p.endtime)));
    if let Some(ref t) = p.renew_till {
        fields.push(ctx(8, generalized_time(t)));
    }
    if let Some(ref ha) = p.caddr {
        fields.push(ctx(9, host_addresses(ha)));
    }
    if let Some(ref ad) = p.authorization_data {
        fields.push(ctx(10, authorization_data(ad)));
    }
    app(3, seq(&fields))
}

/// Non-`NeedMore` outcomes reported by a container
#[derive(Debug, PartialEq)]
pub enum Event {
    Transition,
    Complete,
}

/// Feed `input` to a fresh container, delivering at most `chunk` new bytes at
/// a time
pub fn drive<T: Decodable>(input: &[u8], chunk: usize) -> (Vec<Event>, Result<T, DecodeError>) {
    let mut container = Asn1Container::new(T::grammar(), DecoderConfig::default());
    let mut events = Vec::new();
    let mut pos = 0;
    let mut end = 0;
    loop {
        if pos == end {
            if end == input.len() {
                return (events, Err(DecodeError::new(DecodeErrorKind::Incomplete).at(pos)));
            }
            end = (end + chunk).min(input.len());
        }
        match container.advance(&input[pos..end]) {
            Err(e) => return (events, Err(e)),
            Ok(step) => {
                pos += step.consumed;
                match step.outcome {
                    Outcome::NeedMore(n) => {
                        assert_eq!(pos, end, "NeedMore before the input was exhausted");
                        assert!(n > 0);
                    }
                    Outcome::Transition => events.push(Event::Transition),
                    Outcome::Complete(object) => {
                        events.push(Event::Complete);
                        assert_eq!(container.consumed(), pos);
                        return (events, Ok(object));
                    }
                }
            }
        }
    }
}

pub fn sample_ticket() -> Ticket {
    Ticket {
        tkt_vno: 5,
        realm: Realm(String::from("EXAMPLE.ORG")),
        sname: PrincipalName {
            name_type: NameType::KRB_NT_SRV_INST,
            name_string: vec![String::from("krbtgt"), String::from("EXAMPLE.ORG")],
        },
        enc_part: EncryptedData {
            etype: EncryptionType::AES128_CTS_HMAC_SHA1_96,
            kvno: Some(0x0102_0304),
            cipher: (0..=255u8).collect(),
        },
    }
}

pub fn sample_enc_ticket_part() -> EncTicketPart {
    let time = |day, hour| KerberosTime {
        year: 2024,
        month: 2,
        day,
        hour,
        minute: 7,
        second: 59,
    };
    EncTicketPart {
        flags: TicketFlags(0x5081_0000),
        key: EncryptionKey {
            keytype: EncryptionType::AES128_CTS_HMAC_SHA1_96,
            keyvalue: vec![0x5a; 16],
        },
        crealm: Realm(String::from("EXAMPLE.ORG")),
        cname: PrincipalName {
            name_type: NameType::KRB_NT_PRINCIPAL,
            name_string: vec![String::from("alice")],
        },
        transited: TransitedEncoding {
            tr_type: 1,
            contents: b"EDU,MIT.,ATHENA.,WASHINGTON.EDU,CS.".to_vec(),
        },
        authtime: time(28, 8),
        starttime: None,
        endtime: time(29, 18),
        renew_till: Some(time(29, 23)),
        caddr: None,
        authorization_data: Some(AuthorizationData(vec![
            AuthorizationDataEntry {
                ad_type: AuthorizationType::AD_IF_RELEVANT,
                ad_data: vec![0x30, 0x00],
            },
            AuthorizationDataEntry {
                ad_type: AuthorizationType::AD_WIN2K_PAC,
                ad_data: vec![1, 2, 3],
            },
        ])),
    }
}
