//! Kerberos 5 structures
//!
//! - [RFC1510](https://tools.ietf.org/html/rfc1510) The Kerberos Network Authentication Service (V5)
//! - [RFC3961](https://tools.ietf.org/html/rfc3961) Encryption and Checksum Specifications for Kerberos 5
//! - [RFC4120](https://tools.ietf.org/html/rfc4120) The Kerberos Network Authentication Service (V5)
//!
//! All structures own their data: they are filled field by field while the
//! encoding arrives, possibly across many input buffers.

use std::fmt;

/// Kerberos Realm
///
/// A Kerberos realm is a set of managed nodes that share the same Kerberos database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Realm(pub String);

/// Kerberos PrincipalName
///
/// A Kerberos principal is a service or user that is known to the Kerberos system. Each Kerberos
/// principal is identified by its principal name. Principal names consist of three parts: a
/// service or user name, an instance name, and a realm name in the following form:
///
/// <pre>
/// principal-name.instance-name@realm-name
/// </pre>
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrincipalName {
    pub name_type: NameType,
    pub name_string: Vec<String>,
}

impl fmt::Display for PrincipalName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name_string.join("/"))
    }
}

/// Kerberos Ticket
///
/// A record that helps a client authenticate itself to a server; it
/// contains the client's identity, a session key, a timestamp, and
/// other information, all sealed using the server's secret key.  It
/// only serves to authenticate a client when presented along with a
/// fresh Authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ticket {
    pub tkt_vno: u32,
    pub realm: Realm,
    pub sname: PrincipalName,
    pub enc_part: EncryptedData,
}

/// Kerberos EncryptedData
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncryptedData {
    /// EncryptionType
    pub etype: EncryptionType,
    /// Version number of the key under which data is encrypted
    pub kvno: Option<u32>,
    /// Ciphertext
    pub cipher: Vec<u8>,
}

/// Kerberos EncryptionKey
#[derive(Clone, PartialEq, Eq, Default)]
pub struct EncryptionKey {
    pub keytype: EncryptionType,
    pub keyvalue: Vec<u8>,
}

// key material is not printed
impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("keytype", &self.keytype)
            .field("keyvalue", &format_args!("<{} bytes>", self.keyvalue.len()))
            .finish()
    }
}

/// Kerberos TransitedEncoding
///
/// Names of the realms that took part in authenticating the client, in the
/// encoding given by `tr_type` (1 is DOMAIN-X500-COMPRESS).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitedEncoding {
    pub tr_type: i32,
    pub contents: Vec<u8>,
}

/// Kerberos HostAddress
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostAddress {
    pub addr_type: AddressType,
    pub address: Vec<u8>,
}

/// Kerberos HostAddresses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostAddresses(pub Vec<HostAddress>);

/// One element of AuthorizationData
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorizationDataEntry {
    pub ad_type: AuthorizationType,
    pub ad_data: Vec<u8>,
}

/// Kerberos AuthorizationData
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorizationData(pub Vec<AuthorizationDataEntry>);

/// Kerberos EncTicketPart
///
/// The encrypted part of a Ticket, once decrypted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncTicketPart {
    pub flags: TicketFlags,
    pub key: EncryptionKey,
    pub crealm: Realm,
    pub cname: PrincipalName,
    pub transited: TransitedEncoding,
    pub authtime: KerberosTime,
    pub starttime: Option<KerberosTime>,
    pub endtime: KerberosTime,
    pub renew_till: Option<KerberosTime>,
    pub caddr: Option<HostAddresses>,
    pub authorization_data: Option<AuthorizationData>,
}

/// Kerberos time, always UTC
///
/// <pre>
/// KerberosTime    ::= GeneralizedTime -- with no fractional seconds
/// </pre>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct KerberosTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl KerberosTime {
    /// Seconds since 1970-01-01T00:00:00Z
    pub fn as_unix_timestamp(&self) -> i64 {
        // days from civil, proleptic Gregorian calendar
        let (y, m) = if self.month <= 2 {
            (i64::from(self.year) - 1, i64::from(self.month) + 9)
        } else {
            (i64::from(self.year), i64::from(self.month) - 3)
        };
        let era = y.div_euclid(400);
        let yoe = y - era * 400;
        let doy = (153 * m + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        let days = era * 146_097 + doe - 719_468;
        days * 86_400 + i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

impl fmt::Display for KerberosTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}{:02}{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Kerberos ticket flags
///
/// Bit 0 is the most significant bit of the first octet of the BIT STRING.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketFlags(pub u32);

impl TicketFlags {
    pub const RESERVED: u32 = 0;
    pub const FORWARDABLE: u32 = 1;
    pub const FORWARDED: u32 = 2;
    pub const PROXIABLE: u32 = 3;
    pub const PROXY: u32 = 4;
    pub const MAY_POSTDATE: u32 = 5;
    pub const POSTDATED: u32 = 6;
    pub const INVALID: u32 = 7;
    pub const RENEWABLE: u32 = 8;
    pub const INITIAL: u32 = 9;
    pub const PRE_AUTHENT: u32 = 10;
    pub const HW_AUTHENT: u32 = 11;
    pub const TRANSITED_POLICY_CHECKED: u32 = 12;
    pub const OK_AS_DELEGATE: u32 = 13;

    pub fn is_set(&self, bit: u32) -> bool {
        bit < 32 && self.0 & (0x8000_0000 >> bit) != 0
    }
}

impl fmt::Debug for TicketFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TicketFlags({:#010x})", self.0)
    }
}

/// Encryption type
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct EncryptionType(pub i32);

newtype_enum! {
impl debug EncryptionType {
    DES_CBC_CRC                  = 1,
    DES_CBC_MD4                  = 2,
    DES_CBC_MD5                  = 3,
    DES3_CBC_MD5                 = 5,
    DES3_CBC_SHA1                = 7,
    DSAWITHSHA1_CMSOID           = 9,
    MD5WITHRSAENCRYPTION_CMSOID  = 10,
    SHA1WITHRSAENCRYPTION_CMSOID = 11,
    RC2CBC_ENVOID                = 12,
    RSAENCRYPTION_ENVOID         = 13,
    RSAES_OAEP_ENV_OID           = 14,
    DES_EDE3_CBC_ENV_OID         = 15,
    DES3_CBC_SHA1_KD             = 16,
    AES128_CTS_HMAC_SHA1_96      = 17,
    AES256_CTS_HMAC_SHA1_96      = 18,
    AES128_CTS_HMAC_SHA256_128   = 19,
    AES256_CTS_HMAC_SHA384_192   = 20,
    RC4_HMAC                     = 23,
    RC4_HMAC_EXP                 = 24,
    CAMELLIA128_CTS_CMAC         = 25,
    CAMELLIA256_CTS_CMAC         = 26,
    SUBKEY_KEYMATERIAL           = 65,
}
}

/// Principal name type
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct NameType(pub i32);

newtype_enum! {
impl debug NameType {
    KRB_NT_UNKNOWN        = 0,
    KRB_NT_PRINCIPAL      = 1,
    KRB_NT_SRV_INST       = 2,
    KRB_NT_SRV_HST        = 3,
    KRB_NT_SRV_XHST       = 4,
    KRB_NT_UID            = 5,
    KRB_NT_X500_PRINCIPAL = 6,
    KRB_NT_SMTP_NAME      = 7,
    KRB_NT_ENTERPRISE     = 10,
}
}

/// Host address type
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressType(pub i32);

newtype_enum! {
impl debug AddressType {
    IPV4           = 2,
    DIRECTIONAL    = 3,
    CHAOSNET       = 5,
    XNS            = 6,
    ISO            = 7,
    DECNET_PHASE_IV = 12,
    APPLETALK_DDP  = 16,
    NETBIOS        = 20,
    IPV6           = 24,
}
}

/// Authorization data type
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationType(pub i32);

newtype_enum! {
impl debug AuthorizationType {
    AD_IF_RELEVANT             = 1,
    AD_INTENDED_FOR_SERVER     = 2,
    AD_INTENDED_FOR_APPLICATION_CLASS = 3,
    AD_KDC_ISSUED              = 4,
    AD_AND_OR                  = 5,
    AD_MANDATORY_TICKET_EXTENSIONS = 6,
    AD_IN_TICKET_EXTENSIONS    = 7,
    AD_MANDATORY_FOR_KDC       = 8,
    OSF_DCE                    = 64,
    SESAME                     = 65,
    AD_OSF_DCE_PKI_CERTID      = 66,
    AD_WIN2K_PAC               = 128,
}
}
