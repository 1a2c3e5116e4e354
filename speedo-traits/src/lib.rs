#![no_std]

mod fix;
mod traits;

pub use fix::{compass_point, GpsFix, RawCoordinate};
pub use traits::{
    ByteSource, GpsDecoder, PeerLink, PeerStore, PeerText, ScreenId, Ui, UiEvent, PEER_TEXT_SIZE,
};
