//! Repository layer over the local key-value space.
//!
//! # Responsibility
//! - Define the key-value contract (`KvStore`) and its SQLite implementation.
//! - Map typed account/card collections onto their storage keys.
//!
//! # Invariants
//! - Collections are stored as one JSON blob per key.
//! - Read paths reject malformed blobs instead of masking them.

pub mod account_repo;
pub mod card_repo;
pub mod kv_repo;
