use crate::config::*;
use crate::error::{Result, StoreError};

/// One directory slot. The slot is in use exactly when the name field
/// holds a non-empty name; `size` and `first_link` of unused slots are
/// still persisted verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub name: [u8; MAX_NAME_LEN],
    pub size: i16,
    pub first_link: i16,
}

impl DirEntry {
    pub const EMPTY: Self = Self {
        name: [0; MAX_NAME_LEN],
        size: 0,
        first_link: NO_LINK,
    };

    pub fn new(name: &str) -> Result<Self> {
        validate_name(name)?;
        let mut entry = Self::EMPTY;
        entry.name[..name.len()].copy_from_slice(name.as_bytes());
        Ok(entry)
    }

    pub fn is_used(&self) -> bool {
        self.name[0] != 0
    }

    /// The stored name without padding. Empty for unused slots.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_NAME_LEN);
        &self.name[..end]
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.is_used() && self.name_bytes() == name.as_bytes()
    }

    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }
}

/// One allocation node, indexed 0..MAX_BLOCKS. `block_index` is the
/// physical data block the node occupies when allocated; the allocator
/// always keeps it equal to the node's own table index, but it stays
/// real state because the metadata image round-trips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkNode {
    pub block_index: i16,
    pub next_link: i16,
}

impl LinkNode {
    pub const FREE: Self = Self {
        block_index: NO_LINK,
        next_link: NO_LINK,
    };

    pub fn is_used(&self) -> bool {
        self.block_index >= 0
    }

    pub fn clear(&mut self) {
        *self = Self::FREE;
    }
}

/// Names must be 1..=11 bytes of printable ASCII, no spaces. The name
/// field on disk is space/zero padded and the request protocol is
/// space-delimited, so anything wider cannot survive a round trip.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.len() > MAX_NAME_LEN
        || !name.bytes().all(|b| b.is_ascii_graphic())
    {
        return Err(StoreError::InvalidName(name.into()));
    }
    Ok(())
}
