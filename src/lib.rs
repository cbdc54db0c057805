//! Chainfs is a tiny single-volume block file store.
//! Files are flat (no directories), named by short ASCII strings, and
//! read or replaced whole; no permissions, timestamps, or other advanced
//! features.
//!
//! Chainfs volume's linear layout:
//! - Directory table (16 fixed-width entries)
//! - Block-link table (64 fixed-width nodes)
//! - Zero padding up to a whole number of blocks
//! - Data blocks (64 x 128 bytes)
//!
//! Chainfs's layers (from bottom to top):
//! 1. Volume: Abstraction for the backing byte region.     | User implemented (file, RAM, etc.)
//! 2. Metadata codec: Fixed-width table serialization.     | Fs implemented
//! 3. Tables: Directory entries and block-link nodes.      | Fs implemented
//! 4. FileStore: Locked engine exposing the operations.    | Fs implemented
//! 5. Server: Line protocol adapter over TCP.              | Fs implemented (optional)

mod config;
mod error;
pub mod logging;
mod meta;
mod server;
mod store;
mod tables;
mod volume;

pub use config::*;
pub use error::Result;
pub use error::StoreError as Error;
pub use meta::{decode_tables, encode_tables};
pub use server::Server;
pub use store::FileStore;
pub use tables::{DirEntry, LinkNode, validate_name};
pub use volume::{FileVolume, Volume};
