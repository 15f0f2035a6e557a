//! HostAddress and HostAddresses
//!
//! <pre>
//! HostAddress     ::= SEQUENCE  {
//!         addr-type       [0] Int32,
//!         address         [1] OCTET STRING
//! }
//!
//! -- NOTE: HostAddresses is always used as an OPTIONAL field and
//! -- should not be empty.
//! HostAddresses   -- NOTE: subtly different from rfc1510,
//!                 -- but has a value mapping and encodes the same
//!         ::= SEQUENCE OF HostAddress
//! </pre>

use once_cell::sync::Lazy;

use crate::actions::{StoreElement, StoreInt32, StoreOctetString};
use crate::ber::Tag;
use crate::grammar::{Decodable, Grammar};
use crate::krb5::{AddressType, HostAddress, HostAddresses};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostAddressState {
    Start,
    Seq,
    AddrTypeTag,
    AddrType,
    AddrTypeDone,
    AddressTag,
    Address,
    AddressDone,
    End,
}

static HOST_ADDRESS: Lazy<Grammar<HostAddress, HostAddressState>> = Lazy::new(|| {
    use self::HostAddressState as S;
    Grammar::builder("HostAddress", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .enter(S::Seq, Tag::context(0), S::AddrTypeTag, S::AddrTypeDone)
        .read(
            S::AddrTypeTag,
            Tag::INTEGER,
            S::AddrType,
            StoreInt32::new("HostAddress addr-type", |ha: &mut HostAddress, v| {
                ha.addr_type = AddressType(v)
            }),
        )
        .enter(S::AddrTypeDone, Tag::context(1), S::AddressTag, S::AddressDone)
        .read(
            S::AddressTag,
            Tag::OCTET_STRING,
            S::Address,
            StoreOctetString::new("HostAddress address", |ha: &mut HostAddress, v| ha.address = v),
        )
        .end_allowed(&[S::AddrType, S::Address, S::AddressDone, S::End])
        .build()
});

impl Decodable for HostAddress {
    type State = HostAddressState;

    fn grammar() -> &'static Grammar<HostAddress, HostAddressState> {
        &HOST_ADDRESS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostAddressesState {
    Start,
    Seq,
    /// At least one address was read
    Element,
    End,
}

static HOST_ADDRESSES: Lazy<Grammar<HostAddresses, HostAddressesState>> = Lazy::new(|| {
    use self::HostAddressesState as S;
    let element = || {
        StoreElement::new("HostAddresses element", |ha: &mut HostAddresses, a: HostAddress| {
            ha.0.push(a)
        })
    };
    Grammar::builder("HostAddresses", S::Start)
        .enter(S::Start, Tag::SEQUENCE, S::Seq, S::End)
        .read(S::Seq, Tag::SEQUENCE, S::Element, element())
        .read(S::Element, Tag::SEQUENCE, S::Element, element())
        .end_allowed(&[S::Element, S::End])
        .build()
});

impl Decodable for HostAddresses {
    type State = HostAddressesState;

    fn grammar() -> &'static Grammar<HostAddresses, HostAddressesState> {
        &HOST_ADDRESSES
    }
}
