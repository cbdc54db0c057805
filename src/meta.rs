//! Metadata codec: both tables serialize to one contiguous image that is
//! zero-padded to a whole number of blocks and written at offset 0.
//!
//! Record layout, in table order:
//! - Directory: 11 name bytes (padded), i16 BE size, i16 BE first_link.
//! - Links: i16 BE block_index, i16 BE next_link.

use crate::config::*;
use crate::tables::{DirEntry, LinkNode};

pub fn encode_tables(
    entries: &[DirEntry; MAX_ENTRIES],
    nodes: &[LinkNode; MAX_BLOCKS],
) -> [u8; METADATA_AREA] {
    let mut buf = [0u8; METADATA_AREA];
    let mut at = 0;
    for entry in entries {
        buf[at..at + MAX_NAME_LEN].copy_from_slice(&entry.name);
        at += MAX_NAME_LEN;
        at = put_i16(&mut buf, at, entry.size);
        at = put_i16(&mut buf, at, entry.first_link);
    }
    for node in nodes {
        at = put_i16(&mut buf, at, node.block_index);
        at = put_i16(&mut buf, at, node.next_link);
    }
    debug_assert_eq!(at, METADATA_BYTES);
    // The remaining METADATA_AREA - METADATA_BYTES bytes stay zero.
    buf
}

pub fn decode_tables(
    buf: &[u8; METADATA_AREA],
) -> ([DirEntry; MAX_ENTRIES], [LinkNode; MAX_BLOCKS]) {
    let mut entries = [DirEntry::EMPTY; MAX_ENTRIES];
    let mut nodes = [LinkNode::FREE; MAX_BLOCKS];
    let mut at = 0;
    for entry in entries.iter_mut() {
        let name = decode_name(&buf[at..at + MAX_NAME_LEN]);
        at += MAX_NAME_LEN;
        let (size, first_link) = (get_i16(buf, at), get_i16(buf, at + 2));
        at += 4;
        *entry = DirEntry {
            name,
            size,
            first_link,
        };
    }
    for node in nodes.iter_mut() {
        *node = LinkNode {
            block_index: get_i16(buf, at),
            next_link: get_i16(buf, at + 2),
        };
        at += 4;
    }
    (entries, nodes)
}

/// Strips trailing padding and renormalizes to zero padding. Images
/// written by older tooling space-pad the name field; an all-padding
/// field decodes to the unused state rather than an empty name.
fn decode_name(raw: &[u8]) -> [u8; MAX_NAME_LEN] {
    let mut name = [0u8; MAX_NAME_LEN];
    let len = raw
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |p| p + 1);
    name[..len].copy_from_slice(&raw[..len]);
    name
}

fn put_i16(buf: &mut [u8], at: usize, value: i16) -> usize {
    buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
    at + 2
}

fn get_i16(buf: &[u8], at: usize) -> i16 {
    i16::from_be_bytes([buf[at], buf[at + 1]])
}
