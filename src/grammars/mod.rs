//! Grammars of the Kerberos structures
//!
//! Every grammar is built on first use and shared by all the decoders of its
//! type. States are named after the position in the structure: `XTag` once
//! inside the explicit `[n]` wrapper of field `x`, `X` once its value was
//! stored, `XDone` once the wrapper is closed.

pub mod authorization_data;
pub mod enc_ticket_part;
pub mod encrypted_data;
pub mod encryption_key;
pub mod host_address;
pub mod principal_name;
pub mod realm;
pub mod ticket;
pub mod transited_encoding;
