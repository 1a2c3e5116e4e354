use core::fmt::{self, Write};
use core::str::FromStr;

use heapless::{String, Vec};
use speedo_traits::{PeerLink, PeerStore};

use crate::consts::{MAX_DATAGRAM, MAX_PEERS, TOPIC_COMPASS, TOPIC_SPEED};

/// 6-byte hardware address of a wireless peer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mac(pub [u8; 6]);

#[derive(Debug, PartialEq, Eq)]
pub struct MacParseError;

impl FromStr for Mac {
    type Err = MacParseError;

    /// Strictly six colon-separated 2-digit hex bytes, any case.
    fn from_str(s: &str) -> Result<Self, MacParseError> {
        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');
        for slot in bytes.iter_mut() {
            let part = parts.next().ok_or(MacParseError)?;
            if part.len() != 2 {
                return Err(MacParseError);
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| MacParseError)?;
        }
        if parts.next().is_some() {
            return Err(MacParseError);
        }
        Ok(Mac(bytes))
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Parse the line-oriented peer text. Bad lines are logged and
/// skipped; duplicates collapse to one entry.
pub fn parse_peer_list(text: &str) -> Vec<Mac, MAX_PEERS> {
    let mut peers: Vec<Mac, MAX_PEERS> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Mac>() {
            Ok(mac) => {
                if peers.contains(&mac) {
                    continue;
                }
                if peers.push(mac).is_err() {
                    log::warn!("peer list full, ignoring {}", line);
                }
            }
            Err(_) => log::warn!("invalid MAC skipped: {}", line),
        }
    }
    peers
}

/// Sends the per-cycle telemetry datagrams. Remembers which peers it
/// already handed to the link so re-registration stays a no-op.
pub struct Broadcaster {
    registered: Vec<Mac, MAX_PEERS>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
        }
    }

    /// One broadcast cycle. The store is re-read every time so edits
    /// from the peer editor show up without a restart; nothing in
    /// here is allowed to abort the cycle.
    pub fn run_cycle<S: PeerStore, L: PeerLink>(
        &mut self,
        store: &mut S,
        link: &mut L,
        speed_knots: f32,
        compass: &str,
    ) {
        let text = match store.load() {
            Ok(text) => text,
            Err(e) => {
                log::warn!("peer store read failed: {:?}", e);
                return;
            }
        };
        let peers = parse_peer_list(&text);

        let mut speed_value: String<8> = String::new();
        let _ = write!(speed_value, "{:.1}", speed_knots);

        for mac in &peers {
            if !self.registered.contains(mac) {
                match link.register(mac.0) {
                    Ok(()) => {
                        let _ = self.registered.push(*mac);
                    }
                    Err(e) => {
                        log::warn!("failed to register {}: {:?}", mac, e);
                        continue;
                    }
                }
            }
            self.send(link, *mac, TOPIC_SPEED, &speed_value);
            self.send(link, *mac, TOPIC_COMPASS, compass);
        }
    }

    fn send<L: PeerLink>(&self, link: &mut L, mac: Mac, topic: &str, value: &str) {
        let mut payload: Vec<u8, MAX_DATAGRAM> = Vec::new();
        let _ = payload.extend_from_slice(topic.as_bytes());
        let _ = payload.push(b':');
        let _ = payload.extend_from_slice(value.as_bytes());
        if let Err(e) = link.send(mac.0, &payload) {
            log::warn!("send {} to {} failed: {:?}", topic, mac, e);
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
