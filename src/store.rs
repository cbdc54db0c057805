use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};

use crate::config::*;
use crate::error::{Result, StoreError};
use crate::meta;
use crate::tables::{DirEntry, LinkNode};
use crate::volume::Volume;

/// The storage engine. Owns the backing volume and both metadata tables
/// behind one readers-writer lock: `read`/`list` hold it shared for
/// their whole duration (physical I/O included), the mutating operations
/// hold it exclusive. Every mutation re-serializes and persists the
/// whole metadata section before the lock is released.
#[derive(Debug)]
pub struct FileStore<V: Volume> {
    state: RwLock<State<V>>,
}

#[derive(Debug)]
struct State<V> {
    volume: V,
    entries: [DirEntry; MAX_ENTRIES],
    nodes: [LinkNode; MAX_BLOCKS],
}

impl<V: Volume> FileStore<V> {
    /// Opens a store over `volume`. An empty region is sized to
    /// `total_size` and initialized with fresh empty metadata; a
    /// non-empty region has its existing metadata loaded. The region is
    /// never grown afterwards, so `total_size` must at least cover the
    /// metadata area.
    pub fn open(volume: V, total_size: u64) -> Result<Self> {
        if total_size < METADATA_AREA as u64 {
            return Err(StoreError::VolumeTooSmall {
                required: METADATA_AREA as u64,
                actual: total_size,
            });
        }
        let mut state = State {
            volume,
            entries: [DirEntry::EMPTY; MAX_ENTRIES],
            nodes: [LinkNode::FREE; MAX_BLOCKS],
        };
        if state.volume.len()? == 0 {
            state.volume.set_len(total_size)?;
            state.save_metadata()?;
            info!("formatted empty volume, {total_size} bytes");
        } else {
            state.load_metadata()?;
            let used = state.entries.iter().filter(|e| e.is_used()).count();
            info!("loaded volume metadata, {used} file(s)");
        }
        Ok(FileStore {
            state: RwLock::new(state),
        })
    }

    /// Claims the lowest-index unused directory slot for `name`, with
    /// size 0 and an empty chain.
    pub fn create(&self, name: &str) -> Result<()> {
        let mut state = self.write_lock();
        let entry = DirEntry::new(name)?;
        if state.entries.iter().any(|e| e.matches(name)) {
            return Err(StoreError::AlreadyExists(name.into()));
        }
        let Some(slot) = state.entries.iter().position(|e| !e.is_used()) else {
            return Err(StoreError::DirectoryFull);
        };
        state.entries[slot] = entry;
        state.save_metadata()?;
        debug!("create {name} in slot {slot}");
        Ok(())
    }

    /// Returns the file's full content by walking its chain, copying up
    /// to a block from each node and stopping exactly when `size` bytes
    /// are filled.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let state = self.read_lock();
        let entry = *state
            .find(name)
            .ok_or_else(|| StoreError::NotFound(name.into()))?;
        let size = entry.size.max(0) as usize;
        let mut data = vec![0u8; size];
        let mut filled = 0;
        let mut link = entry.first_link;
        while link != NO_LINK && filled < size {
            // Chain links of a used entry always index live nodes.
            let node = state.nodes[link as usize];
            let take = BLOCK_SIZE.min(size - filled);
            state
                .volume
                .read_at(block_offset(node.block_index), &mut data[filled..filled + take])?;
            filled += take;
            link = node.next_link;
        }
        Ok(data)
    }

    /// Replaces the file's content. First-fit allocation in ascending
    /// node order; the space check happens before any side effect, so an
    /// `InsufficientSpace` failure leaves everything untouched.
    pub fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let mut state = self.write_lock();
        let slot = state
            .find_slot(name)
            .ok_or_else(|| StoreError::NotFound(name.into()))?;

        let required = data.len().div_ceil(BLOCK_SIZE).max(1);
        let free: Vec<usize> = (0..MAX_BLOCKS)
            .filter(|&i| !state.nodes[i].is_used())
            .collect();
        if free.len() < required {
            return Err(StoreError::InsufficientSpace {
                required,
                free: free.len(),
            });
        }
        let chain = &free[..required];

        for (pos, &i) in chain.iter().enumerate() {
            state.nodes[i] = LinkNode {
                block_index: i as i16,
                next_link: match chain.get(pos + 1) {
                    Some(&next) => next as i16,
                    None => NO_LINK,
                },
            };
        }

        // New content reaches disk before the old chain is released, so
        // a failure from here on leaves the entry on intact old data;
        // the fresh blocks stay unreferenced until the entry flips.
        let mut offset = 0;
        for &i in chain {
            let mut block = [0u8; BLOCK_SIZE];
            let take = BLOCK_SIZE.min(data.len() - offset);
            block[..take].copy_from_slice(&data[offset..offset + take]);
            state.volume.write_at(block_offset(i as i16), &block)?;
            offset += take;
        }

        let old_first = state.entries[slot].first_link;
        state.release_chain(old_first)?;
        state.entries[slot].size = data.len() as i16;
        state.entries[slot].first_link = chain[0] as i16;
        state.save_metadata()?;
        debug!("write {name}, {} byte(s) over {required} block(s)", data.len());
        Ok(())
    }

    /// Releases every node of the file's chain, zero-filling the blocks,
    /// then clears the directory slot.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut state = self.write_lock();
        let slot = state
            .find_slot(name)
            .ok_or_else(|| StoreError::NotFound(name.into()))?;
        let first = state.entries[slot].first_link;
        state.release_chain(first)?;
        state.entries[slot].clear();
        state.save_metadata()?;
        debug!("delete {name}");
        Ok(())
    }

    /// Names of all used entries, in table order.
    pub fn list(&self) -> Vec<String> {
        let state = self.read_lock();
        state
            .entries
            .iter()
            .filter(|e| e.is_used())
            .map(|e| e.name())
            .collect()
    }

    /// Flushes the backing volume. Never called implicitly; durability
    /// beyond the platform write call is the caller's concern.
    pub fn flush(&self) -> Result<()> {
        let state = self.read_lock();
        state.volume.flush()?;
        Ok(())
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, State<V>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, State<V>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Volume> State<V> {
    fn find(&self, name: &str) -> Option<&DirEntry> {
        self.entries.iter().find(|e| e.matches(name))
    }

    fn find_slot(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(name))
    }

    /// Clears every node reachable from `first` and zero-fills the
    /// physical block each one occupied.
    fn release_chain(&mut self, first: i16) -> Result<()> {
        let zeros = [0u8; BLOCK_SIZE];
        let mut link = first;
        while link != NO_LINK {
            let node = self.nodes[link as usize];
            self.volume.write_at(block_offset(node.block_index), &zeros)?;
            self.nodes[link as usize].clear();
            link = node.next_link;
        }
        Ok(())
    }

    fn save_metadata(&mut self) -> Result<()> {
        let image = meta::encode_tables(&self.entries, &self.nodes);
        self.volume.write_at(0, &image)?;
        Ok(())
    }

    fn load_metadata(&mut self) -> Result<()> {
        let mut image = [0u8; METADATA_AREA];
        self.volume.read_at(0, &mut image)?;
        (self.entries, self.nodes) = meta::decode_tables(&image);
        Ok(())
    }
}

fn block_offset(block_index: i16) -> u64 {
    DATA_START + block_index as u64 * BLOCK_SIZE as u64
}
