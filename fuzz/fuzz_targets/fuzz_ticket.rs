#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate kerberos_codec;

use kerberos_codec::krb5::Ticket;
use kerberos_codec::krb5_parser::{parse_enc_ticket_part, parse_krb5_ticket, stream_decoder};

fuzz_target!(|data: &[u8]| {
    let _ = parse_krb5_ticket(data);
    let _ = parse_enc_ticket_part(data);
    // the same bytes, split in two
    let mut decoder = stream_decoder::<Ticket>();
    let (a, b) = data.split_at(data.len() / 2);
    if decoder.decode(a).is_ok() {
        let _ = decoder.decode(b);
    }
});
