pub const BLOCK_SIZE: usize = 128;
pub const MAX_ENTRIES: usize = 16; // Directory slots
pub const MAX_BLOCKS: usize = 64; // Data blocks, one link node each
pub const MAX_NAME_LEN: usize = 11;

pub const ENTRY_SIZE: usize = MAX_NAME_LEN + 2 + 2; // name + size + first_link
pub const NODE_SIZE: usize = 2 + 2; // block_index + next_link

pub const METADATA_BYTES: usize = MAX_ENTRIES * ENTRY_SIZE + MAX_BLOCKS * NODE_SIZE;
pub const METADATA_BLOCKS: usize = METADATA_BYTES.div_ceil(BLOCK_SIZE);
pub const METADATA_AREA: usize = METADATA_BLOCKS * BLOCK_SIZE; // Zero-padded on disk

pub const DATA_START: u64 = METADATA_AREA as u64; // Byte offset of data block 0
pub const MAX_FILE_SIZE: usize = MAX_BLOCKS * BLOCK_SIZE;

/// Smallest backing region that can hold the metadata area plus every
/// data block. The engine never grows the region.
pub const VOLUME_SIZE: u64 = DATA_START + MAX_FILE_SIZE as u64;

pub const NO_LINK: i16 = -1; // Chain end / unused sentinel
