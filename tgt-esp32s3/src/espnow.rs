//! ESP-NOW transport for the peer broadcaster.

use esp_wifi::esp_now::{EspNow, PeerInfo, EspNowError};
use speedo_traits::PeerLink;

pub struct EspNowLink {
    esp_now: EspNow<'static>,
}

impl EspNowLink {
    pub fn new(esp_now: EspNow<'static>) -> Self {
        Self { esp_now }
    }
}

impl PeerLink for EspNowLink {
    type Error = EspNowError;

    fn register(&mut self, peer: [u8; 6]) -> Result<(), EspNowError> {
        if self.esp_now.peer_exists(&peer) {
            return Ok(());
        }
        self.esp_now.add_peer(PeerInfo {
            peer_address: peer,
            lmk: None,
            channel: None,
            encrypt: false,
        })
    }

    fn send(&mut self, peer: [u8; 6], payload: &[u8]) -> Result<(), EspNowError> {
        // fire and forget; the broadcaster repeats every cycle anyway
        self.esp_now.send(&peer, payload).map(|_| ())
    }
}
