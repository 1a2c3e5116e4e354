//! Peer list persistence in a raw flash sector.
//!
//! The record is `magic (4) | len (4 LE) | bytes`. Anything that does
//! not start with the magic reads as an empty list, so a fresh chip
//! boots with no peers instead of an error.

use embedded_storage::{ReadStorage, Storage};
use esp_storage::{FlashStorage, FlashStorageError};
use speedo_traits::{PeerStore, PeerText, PEER_TEXT_SIZE};

const STORE_OFFSET: u32 = 0x9000;
const MAGIC: [u8; 4] = *b"PEER";

pub struct FlashPeerStore {
    flash: FlashStorage,
}

impl FlashPeerStore {
    pub fn new() -> Self {
        Self {
            flash: FlashStorage::new(),
        }
    }
}

impl PeerStore for FlashPeerStore {
    type Error = FlashStorageError;

    fn load(&mut self) -> Result<PeerText, FlashStorageError> {
        let mut header = [0u8; 8];
        self.flash.read(STORE_OFFSET, &mut header)?;

        let mut out = PeerText::new();
        if header[0..4] != MAGIC {
            return Ok(out);
        }
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        if len > PEER_TEXT_SIZE {
            log::warn!("peer record length {} out of range, ignored", len);
            return Ok(out);
        }

        let mut bytes = [0u8; PEER_TEXT_SIZE];
        self.flash.read(STORE_OFFSET + 8, &mut bytes[..len])?;
        match core::str::from_utf8(&bytes[..len]) {
            Ok(text) => {
                // length was checked against the buffer above
                let _ = out.push_str(text);
            }
            Err(_) => log::warn!("peer record is not utf-8, ignored"),
        }
        Ok(out)
    }

    fn save(&mut self, text: &str) -> Result<(), FlashStorageError> {
        let mut record = [0u8; 8 + PEER_TEXT_SIZE];
        record[0..4].copy_from_slice(&MAGIC);
        record[4..8].copy_from_slice(&(text.len() as u32).to_le_bytes());
        record[8..8 + text.len()].copy_from_slice(text.as_bytes());
        self.flash.write(STORE_OFFSET, &record[..8 + text.len()])
    }
}
