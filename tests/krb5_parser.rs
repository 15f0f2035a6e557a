extern crate kerberos_codec;

mod common;

use common::*;
use kerberos_codec::krb5::*;
use kerberos_codec::krb5_parser::*;
use kerberos_codec::DecodeErrorKind;

#[test]
fn test_parse_kerberos_string() {
    let bytes = &[0x1b, 0x04, 0x63, 0x69, 0x66, 0x73];
    let empty = &b""[..];
    let expected = Ok((empty, Realm(String::from("cifs"))));

    let res = parse_krb5_realm(bytes);
    assert_eq!(res, expected);
}

#[test]
fn test_parse_realm() {
    let bytes = &[0x1b, 0x05, 0x4a, 0x6f, 0x6e, 0x65, 0x73];
    let empty = &b""[..];
    let expected = Ok((empty, Realm(String::from("Jones"))));

    let res = parse_krb5_realm(bytes);
    assert_eq!(res, expected);
}

#[test]
fn test_parse_empty_realm() {
    let res = parse_krb5_realm(&[0x1b, 0x00]);
    assert_eq!(res.map_err(|e| e.kind()), Err(DecodeErrorKind::EmptyValueNotAllowed));
}

#[test]
fn test_parse_principalname() {
    let bytes = &[
        0x30, 0x81, 0x11,
            0xa0, 0x03, 0x02, 0x01, 0x00,
            0xa1, 0x0a, 0x30, 0x81, 0x07, 0x1b, 0x05, 0x4a, 0x6f, 0x6e, 0x65, 0x73
    ];
    let empty = &b""[..];
    let expected = Ok((empty, PrincipalName {
        name_type: NameType::KRB_NT_UNKNOWN,
        name_string: vec![String::from("Jones")]
    }));

    let res = parse_krb5_principalname(bytes);
    assert_eq!(res, expected);
}

#[test]
fn test_parse_principalname2() {
    let bytes = &[
        0x30, 0x27,
        0xa0, 0x03, 0x02, 0x01, 0x02,
        0xa1, 0x20, 0x30, 0x1e,
            0x1b, 0x04, 0x63, 0x69, 0x66, 0x73,
            0x1b, 0x16, 0x41, 0x64, 0x6d, 0x69, 0x6e, 0x2d, 0x50, 0x43, 0x2e, 0x63, 0x6f, 0x6e, 0x74, 0x6f, 0x73, 0x6f, 0x2e, 0x6c, 0x6f, 0x63, 0x61, 0x6c,
    ];
    let empty = &b""[..];
    let expected = Ok((empty, PrincipalName {
        name_type: NameType::KRB_NT_SRV_INST,
        name_string: vec![String::from("cifs"), String::from("Admin-PC.contoso.local")]
    }));

    let res = parse_krb5_principalname(bytes);
    assert_eq!(res, expected);
}

#[test]
fn test_parse_principalname_requires_components() {
    // name-string is an empty SEQUENCE OF
    let bytes = &[0x30, 0x09, 0xa0, 0x03, 0x02, 0x01, 0x01, 0xa1, 0x02, 0x30, 0x00];
    let err = parse_krb5_principalname(bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::IncompleteStructure);
    assert_eq!(err.offset(), Some(9));
}

#[test]
fn test_parse_principalname_missing_field() {
    // name-string is absent
    let bytes = &[0x30, 0x05, 0xa0, 0x03, 0x02, 0x01, 0x01];
    let err = parse_krb5_principalname(bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::IncompleteStructure);
}

#[test]
fn test_parse_principalname_trailing_data() {
    let mut bytes = principal_name(&PrincipalName {
        name_type: NameType::KRB_NT_PRINCIPAL,
        name_string: vec![String::from("des")],
    });
    bytes.extend_from_slice(&[0xde, 0xad]);
    let (rem, pn) = parse_krb5_principalname(&bytes).expect("parsing failed");
    assert_eq!(rem, &[0xde, 0xad]);
    assert_eq!(pn.to_string(), "des");
}

static KRB5_TICKET: &'static [u8] = include_bytes!("../assets/krb5-ticket.bin");
#[test]
fn test_parse_ticket() {
    let bytes = KRB5_TICKET;

    let res = parse_krb5_ticket(bytes);
    // println!("parse_krb5_ticket: {:?}", res);
    match res {
        Ok((rem, tkt)) => {
            assert!(rem.is_empty());
            assert_eq!(tkt.tkt_vno, 5);
            assert_eq!(tkt.realm, Realm(String::from("CONTOSO.LOCAL")));
            assert_eq!(tkt.sname, PrincipalName {
                name_type: NameType::KRB_NT_SRV_INST,
                name_string: vec![String::from("cifs"), String::from("Admin-PC.contoso.local")]
            });
            let enc = tkt.enc_part;
            // println!("enc: {:?}", enc);
            assert_eq!(enc.etype, EncryptionType::AES256_CTS_HMAC_SHA1_96);
            assert_eq!(enc.kvno, Some(1));
            assert_eq!(enc.cipher.len(), 230);
            assert_eq!(&enc.cipher[..2], &[0x6e, 0x34]);
        }
        _ => assert!(false),
    }
}

#[test]
fn test_parse_ticket_bad_version() {
    let mut t = sample_ticket();
    t.tkt_vno = 4;
    let bytes = ticket(&t);
    let err = parse_krb5_ticket(&bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::SemanticValidationFailed);
    // [APPLICATION 1], SEQUENCE and [0] headers use 4, 4 and 2 bytes
    assert_eq!(err.offset(), Some(10));
    assert_eq!(err.context(), Some("Ticket tkt-vno: version 4, expected 5"));
}

#[test]
fn test_parse_ticket_roundtrip() {
    let t = sample_ticket();
    let bytes = ticket(&t);
    let (rem, decoded) = parse_krb5_ticket(&bytes).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(decoded, t);
    // kvno is optional
    let mut t = sample_ticket();
    t.enc_part.kvno = None;
    let bytes = ticket(&t);
    assert_eq!(parse_krb5_ticket(&bytes).map(|(_, t)| t), Ok(t));
}

#[test]
fn test_parse_ticket_empty_cipher() {
    let mut t = sample_ticket();
    t.enc_part.cipher = Vec::new();
    let bytes = ticket(&t);
    let err = parse_krb5_ticket(&bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::EmptyValueNotAllowed);
    assert_eq!(err.context(), Some("Ticket enc-part: EncryptedData cipher"));
}

#[test]
fn test_parse_ticket_wrong_application_tag() {
    let mut bytes = ticket(&sample_ticket());
    // [APPLICATION 2]
    bytes[0] = 0x62;
    let err = parse_krb5_ticket(&bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::UnexpectedTag);
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn test_parse_encrypted() {
    let bytes = &[
        0x30, 0x11,
        0xa0, 0x03, 0x02, 0x01, 0x17,
        0xa2, 0x0a, 0x04, 0x08, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
    ];
    let (rem, ed) = parse_encrypted(bytes).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(ed.etype, EncryptionType::RC4_HMAC);
    assert_eq!(ed.kvno, None);
    assert_eq!(ed.cipher, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_parse_encrypted_fields_out_of_order() {
    // kvno after cipher
    let bytes = seq(&[
        ctx(0, integer(18)),
        ctx(2, octet_string(&[1, 2, 3])),
        ctx(1, integer(2)),
    ]);
    let err = parse_encrypted(&bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::UnexpectedTag);
    assert_eq!(err.offset(), Some(14));
}

static ENC_TICKET_PART: &'static [u8] = include_bytes!("../assets/enc-ticket-part.bin");
#[test]
fn test_parse_enc_ticket_part() {
    let (rem, part) = parse_enc_ticket_part(ENC_TICKET_PART).expect("parsing failed");
    assert!(rem.is_empty());
    assert!(part.flags.is_set(TicketFlags::FORWARDABLE));
    assert!(part.flags.is_set(TicketFlags::RENEWABLE));
    assert!(part.flags.is_set(TicketFlags::INITIAL));
    assert!(part.flags.is_set(TicketFlags::PRE_AUTHENT));
    assert!(!part.flags.is_set(TicketFlags::FORWARDED));
    assert_eq!(part.key.keytype, EncryptionType::AES256_CTS_HMAC_SHA1_96);
    assert_eq!(part.key.keyvalue, (0x10..0x30).collect::<Vec<u8>>());
    assert_eq!(part.crealm, Realm(String::from("CONTOSO.LOCAL")));
    assert_eq!(part.cname.name_string, vec![String::from("Administrator")]);
    assert_eq!(part.transited, TransitedEncoding { tr_type: 1, contents: Vec::new() });
    assert_eq!(part.authtime.to_string(), "20170228135001Z");
    assert_eq!(part.starttime, Some(part.authtime));
    assert_eq!(part.endtime.as_unix_timestamp() - part.authtime.as_unix_timestamp(), 10 * 3600);
    assert_eq!(part.renew_till.map(|t| t.day), Some(7));
    let caddr = part.caddr.expect("missing caddr");
    assert_eq!(caddr.0.len(), 2);
    assert_eq!(caddr.0[0], HostAddress { addr_type: AddressType::IPV4, address: vec![192, 168, 56, 101] });
    assert_eq!(caddr.0[1].addr_type, AddressType::NETBIOS);
    let ad = part.authorization_data.expect("missing authorization-data");
    assert_eq!(ad.0.len(), 1);
    assert_eq!(ad.0[0].ad_type, AuthorizationType::AD_IF_RELEVANT);
    // AD-IF-RELEVANT wraps another AuthorizationData
    let (rem, inner) = parse_authorization_data(&ad.0[0].ad_data).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(inner.0, vec![AuthorizationDataEntry {
        ad_type: AuthorizationType::AD_WIN2K_PAC,
        ad_data: vec![0x04, 0x00, 0x00, 0x00],
    }]);
}

#[test]
fn test_parse_enc_ticket_part_roundtrip() {
    let part = sample_enc_ticket_part();
    let bytes = enc_ticket_part(&part);
    assert_eq!(parse_enc_ticket_part(&bytes), Ok((&b""[..], part.clone())));
    // with every optional field
    let mut full = part;
    full.starttime = Some(full.authtime);
    full.caddr = Some(HostAddresses(vec![HostAddress {
        addr_type: AddressType::IPV6,
        address: vec![0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    }]));
    let bytes = enc_ticket_part(&full);
    assert_eq!(parse_enc_ticket_part(&bytes), Ok((&b""[..], full.clone())));
    // and with none
    let mut minimal = full;
    minimal.starttime = None;
    minimal.renew_till = None;
    minimal.caddr = None;
    minimal.authorization_data = None;
    let bytes = enc_ticket_part(&minimal);
    assert_eq!(parse_enc_ticket_part(&bytes), Ok((&b""[..], minimal)));
}

#[test]
fn test_parse_enc_ticket_part_bad_time() {
    let mut part = sample_enc_ticket_part();
    part.endtime.month = 13;
    let bytes = enc_ticket_part(&part);
    let err = parse_enc_ticket_part(&bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::SemanticValidationFailed);
    assert!(err.context().unwrap_or_default().starts_with("EncTicketPart endtime"));
}

#[test]
fn test_parse_hostaddresses() {
    let bytes = &[
        0x30, 0x0f,
            0x30, 0x0d,
                0xa0, 0x03, 0x02, 0x01, 0x02,
                0xa1, 0x06, 0x04, 0x04, 0x0a, 0x00, 0x00, 0x01,
    ];
    let (rem, ha) = parse_krb5_hostaddresses(bytes).expect("parsing failed");
    assert!(rem.is_empty());
    assert_eq!(ha.0, vec![HostAddress { addr_type: AddressType::IPV4, address: vec![10, 0, 0, 1] }]);
    let (_, a) = parse_krb5_hostaddress(&bytes[2..]).expect("parsing failed");
    assert_eq!(a, ha.0[0]);
    // empty SEQUENCE OF
    let err = parse_krb5_hostaddresses(&[0x30, 0x00]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::IncompleteStructure);
}

#[test]
fn test_parse_encryption_key() {
    let bytes = seq(&[ctx(0, integer(17)), ctx(1, octet_string(&[0xaa; 16]))]);
    let (_, key) = parse_encryption_key(&bytes).expect("parsing failed");
    assert_eq!(key.keytype, EncryptionType::AES128_CTS_HMAC_SHA1_96);
    assert_eq!(key.keyvalue, vec![0xaa; 16]);
    assert_eq!(format!("{:?}", key), "EncryptionKey { keytype: AES128_CTS_HMAC_SHA1_96, keyvalue: <16 bytes> }");
    let bytes = seq(&[ctx(0, integer(17)), ctx(1, octet_string(&[]))]);
    assert_eq!(
        parse_encryption_key(&bytes).map_err(|e| e.kind()),
        Err(DecodeErrorKind::EmptyValueNotAllowed)
    );
}

#[test]
fn test_parse_transited_encoding() {
    let bytes = seq(&[ctx(0, integer(1)), ctx(1, octet_string(b"EDU,"))]);
    let (_, te) = parse_transited_encoding(&bytes).expect("parsing failed");
    assert_eq!(te, TransitedEncoding { tr_type: 1, contents: b"EDU,".to_vec() });
}

#[test]
fn test_parse_authorization_data_empty_payload() {
    // ad-data is present with length 0
    let bytes = &[
        0x30, 0x0b,
            0x30, 0x09,
                0xa0, 0x03, 0x02, 0x01, 0x01,
                0xa1, 0x02, 0x04, 0x00,
    ];
    let err = parse_authorization_data(bytes).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::EmptyValueNotAllowed);
    assert_eq!(err.offset(), Some(11));
    assert_eq!(err.context(), Some("AuthorizationData ad-data"));
}

#[test]
fn test_parse_truncated() {
    let err = parse_krb5_ticket(&KRB5_TICKET[..100]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Incomplete);
    assert_eq!(err.offset(), Some(100));
}
