use std::io;
use std::path::PathBuf;

use speedo_traits::{PeerStore, PeerText};

/// `peers.txt` on the host filesystem. A missing file reads as an
/// empty list; saves truncate and rewrite the whole file.
pub struct FilePeerStore {
    path: PathBuf,
}

impl FilePeerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PeerStore for FilePeerStore {
    type Error = io::Error;

    fn load(&mut self) -> Result<PeerText, io::Error> {
        let mut out = PeerText::new();
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                if out.push_str(&text).is_err() {
                    log::warn!("{} larger than the peer buffer, ignored", self.path.display());
                }
                Ok(out)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(out),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, text: &str) -> Result<(), io::Error> {
        std::fs::write(&self.path, text)
    }
}
