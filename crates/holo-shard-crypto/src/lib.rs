//! Secret splitting primitives for holo-shard.
//!
//! Two independent schemes live here:
//!
//! - **Key sharing**: a payload is sealed in an AES-256-GCM envelope under a
//!   random 256-bit key, and the key is split k-of-n over GF(2^8).
//! - **Field sharing**: a short string is mapped to an integer below the
//!   Mersenne prime 2^521 − 1 and split k-of-n with a random polynomial over
//!   that field. The shares have a text form that can be written back into a
//!   document in place of the secret.
//!
//! # Modules
//!
//! - [`envelope`] - AEAD envelope: `MAGIC || NONCE || TAG || CIPHERTEXT`
//! - [`key_split`] - 32-byte key split as two GF(2^8) halves
//! - [`bundle`] - encrypt-then-split and its inverse
//! - [`field`] - arithmetic mod 2^521 − 1
//! - [`polynomial`] - polynomial sharing over the prime field
//! - [`encoding`] - string/integer conversion and the `SHARD_V1` text form
//! - [`error`] - error type shared by all of the above
//!
//! # Example: Encrypt and Split
//!
//! ```rust
//! use holo_shard_crypto::bundle::{encrypt_and_split, reconstruct_and_decrypt};
//!
//! let bundle = encrypt_and_split(b"asset shell", 2, 3).unwrap();
//! let payload = reconstruct_and_decrypt(&bundle.encrypted, &bundle.shares[1..]).unwrap();
//!
//! assert_eq!(payload, b"asset shell");
//! ```
//!
//! # Example: Text Shards
//!
//! ```rust
//! use holo_shard_crypto::encoding::{parse_shard, recover_string, split_string};
//!
//! let texts: Vec<String> = split_string("hello", 3, 2)
//!     .unwrap()
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//! assert!(texts[0].starts_with("SHARD_V1:1:"));
//!
//! let shards: Vec<_> = texts.iter().filter_map(|t| parse_shard(t)).take(2).collect();
//! assert_eq!(recover_string(&shards).unwrap(), "hello");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bundle;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod field;
mod gf256;
pub mod key_split;
pub mod polynomial;

pub use bundle::{EncryptedBundle, encrypt_and_split, reconstruct_and_decrypt};
pub use encoding::{
    SHARD_PREFIX, int_to_str, parse_shard, recover_string, split_string, str_to_int,
};
pub use envelope::{Envelope, EnvelopeKey, decrypt, encrypt};
pub use error::{ErrorKind, ShardError, ShardResult};
pub use key_split::{KeyShare, combine_key, split_key};
pub use polynomial::{FieldShare, make_shards, recover_secret};
