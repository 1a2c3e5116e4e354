use crate::fix::GpsFix;

/// Capacity of the peer text blob, as stored and as edited: one MAC
/// address per line.
pub const PEER_TEXT_SIZE: usize = 512;

pub type PeerText = heapless::String<PEER_TEXT_SIZE>;

/// The GPS decoder capability: fed one byte at a time, queried for a
/// snapshot. Implementations drop malformed input silently and keep
/// the last good fix.
pub trait GpsDecoder {
    fn feed(&mut self, byte: u8);
    fn fix(&self) -> GpsFix;
}

/// Non-blocking byte input, typically a UART receive buffer.
pub trait ByteSource {
    /// Read whatever is buffered right now. Returns 0 when nothing is
    /// pending; must never block waiting for more.
    fn read_available(&mut self, buf: &mut [u8]) -> usize;
}

/// Point-to-multipoint datagram link addressed by 6-byte hardware
/// addresses. No delivery guarantees.
pub trait PeerLink {
    type Error: core::fmt::Debug;

    /// Make the address known to the transport. Registering an
    /// already-known peer is a no-op.
    fn register(&mut self, peer: [u8; 6]) -> Result<(), Self::Error>;

    fn send(&mut self, peer: [u8; 6], payload: &[u8]) -> Result<(), Self::Error>;
}

/// Persisted peer list, one MAC per line.
pub trait PeerStore {
    type Error: core::fmt::Debug;

    /// Absent backing storage reads as an empty list, not an error.
    fn load(&mut self) -> Result<PeerText, Self::Error>;

    /// Whole-value truncate-and-rewrite.
    fn save(&mut self, text: &str) -> Result<(), Self::Error>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScreenId {
    Main,
    GpsDetail,
    PeerEditor,
}

impl ScreenId {
    /// Clockwise around the screen ring.
    pub fn next(self) -> Self {
        match self {
            ScreenId::Main => ScreenId::GpsDetail,
            ScreenId::GpsDetail => ScreenId::PeerEditor,
            ScreenId::PeerEditor => ScreenId::Main,
        }
    }

    /// Counter-clockwise around the screen ring.
    pub fn prev(self) -> Self {
        match self {
            ScreenId::Main => ScreenId::PeerEditor,
            ScreenId::GpsDetail => ScreenId::Main,
            ScreenId::PeerEditor => ScreenId::GpsDetail,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    NextScreen,
    PrevScreen,
    SavePeers,
}

/// The rendering surface. Implementations own the widgets and the
/// pixels; the scheduler loop only pushes text, points and screen
/// switches through this seam and pulls events back out of it.
pub trait Ui {
    fn set_speed_text(&mut self, text: &str);
    fn set_compass_text(&mut self, text: &str);
    fn set_avg_speed_text(&mut self, text: &str);

    /// Append one batch-mean point to the scrolling speed chart.
    fn push_chart_point(&mut self, value: i32);

    fn show_screen(&mut self, screen: ScreenId);
    fn set_gps_fields(&mut self, lat: &str, lon: &str, status: &str);

    /// Fill the peer editor buffer; called once, when the editor is
    /// first built.
    fn seed_peer_text(&mut self, text: &str);

    /// Current contents of the peer editor buffer.
    fn peer_text(&self) -> &str;

    /// Transient confirmation after a successful save.
    fn flash_save_confirm(&mut self);

    /// Pop one pending input event, if any.
    fn poll_event(&mut self) -> Option<UiEvent>;

    /// One render pass. Runs every tick, synchronously.
    fn render(&mut self);

    /// Advance the UI clock by the scheduler tick quantum.
    fn advance(&mut self, ms: u32);
}
