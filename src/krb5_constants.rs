//! Kerberos 5 protocol constants

/// Protocol version number (`pvno`, `tkt-vno`)
pub const KRB5_PVNO: u32 = 5;

// [APPLICATION n] tags of RFC 4120 section 5.10
pub const APPLICATION_TICKET: u32 = 1;
pub const APPLICATION_ENC_TICKET_PART: u32 = 3;

/// Octets in `YYYYMMDDHHMMSSZ`
pub const KERBEROS_TIME_LENGTH: usize = 15;

/// KerberosFlags carry no fewer than 32 bits
pub const MIN_KERBEROS_FLAGS_BITS: usize = 32;
