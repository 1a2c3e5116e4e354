//! Host stand-ins for the hardware seams: a canned NMEA byte stream,
//! a UI that renders to the log, and a link that logs its datagrams.

use std::collections::VecDeque;

use speedo_traits::{ByteSource, PeerLink, ScreenId, Ui, UiEvent};

/// Sentence bodies replayed forever; checksums are filled in at
/// startup. A gentle drive around the harbour.
const FIXTURE_BODIES: &[&str] = &[
    "GPRMC,123519,A,4807.038,N,01131.000,E,1.8,080.0,230394,,",
    "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,",
    "GPRMC,123520,A,4807.040,N,01131.004,E,2.1,082.5,230394,,",
    "GPRMC,123521,A,4807.043,N,01131.009,E,2.4,085.0,230394,,",
    "GPGGA,123521,4807.043,N,01131.009,E,1,09,0.9,545.2,M,46.9,M,,",
    "GPRMC,123522,A,4807.047,N,01131.015,E,2.2,090.0,230394,,",
    "GPRMC,123523,A,4807.050,N,01131.021,E,1.9,095.5,230394,,",
];

/// Replays the fixture as if a 9600 baud receiver were behind it: a
/// small burst of bytes shows up whenever the port has gone idle.
pub struct ReplaySerial {
    data: Vec<u8>,
    cursor: usize,
    pending: usize,
    burst: usize,
}

impl ReplaySerial {
    pub fn from_fixture() -> Self {
        let mut data = Vec::new();
        for body in FIXTURE_BODIES {
            let sum = body.bytes().fold(0u8, |acc, b| acc ^ b);
            data.extend_from_slice(format!("${}*{:02X}\r\n", body, sum).as_bytes());
        }
        Self {
            data,
            cursor: 0,
            pending: 0,
            burst: 16,
        }
    }
}

impl ByteSource for ReplaySerial {
    fn read_available(&mut self, buf: &mut [u8]) -> usize {
        if self.pending == 0 {
            // port drained; the next burst arrives before the next poll
            self.pending = self.burst;
            return 0;
        }
        let n = self.pending.min(buf.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.data[self.cursor];
            self.cursor = (self.cursor + 1) % self.data.len();
        }
        self.pending -= n;
        n
    }
}

/// Renders by logging label changes instead of pushing pixels.
pub struct LogUi {
    speed: String,
    compass: String,
    avg: String,
    screen: ScreenId,
    peer_buffer: String,
    events: VecDeque<UiEvent>,
}

impl LogUi {
    pub fn new() -> Self {
        Self {
            speed: String::new(),
            compass: String::new(),
            avg: String::new(),
            screen: ScreenId::Main,
            peer_buffer: String::new(),
            events: VecDeque::new(),
        }
    }
}

impl Ui for LogUi {
    fn set_speed_text(&mut self, text: &str) {
        if self.speed != text {
            log::info!("speed label: {:?}", text);
            self.speed = text.into();
        }
    }

    fn set_compass_text(&mut self, text: &str) {
        if self.compass != text {
            log::info!("compass label: {}", text);
            self.compass = text.into();
        }
    }

    fn set_avg_speed_text(&mut self, text: &str) {
        if self.avg != text {
            log::info!("avg speed label: {}", text);
            self.avg = text.into();
        }
    }

    fn push_chart_point(&mut self, value: i32) {
        log::debug!("chart point: {}", value);
    }

    fn show_screen(&mut self, screen: ScreenId) {
        log::info!("screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
    }

    fn set_gps_fields(&mut self, lat: &str, lon: &str, status: &str) {
        log::info!("gps screen: {} | {} | {}", lat, lon, status);
    }

    fn seed_peer_text(&mut self, text: &str) {
        self.peer_buffer = text.into();
        log::info!("peer editor seeded with {} bytes", text.len());
    }

    fn peer_text(&self) -> &str {
        &self.peer_buffer
    }

    fn flash_save_confirm(&mut self) {
        log::info!("peers saved");
    }

    fn poll_event(&mut self) -> Option<UiEvent> {
        self.events.pop_front()
    }

    fn render(&mut self) {
        // labels went straight to the log, nothing deferred
    }

    fn advance(&mut self, _ms: u32) {
        // no UI clock on the host
    }
}

/// Logs every datagram instead of radiating it.
#[derive(Default)]
pub struct LogLink;

impl LogLink {
    pub fn new() -> Self {
        Self
    }
}

impl PeerLink for LogLink {
    type Error = std::convert::Infallible;

    fn register(&mut self, peer: [u8; 6]) -> Result<(), Self::Error> {
        log::info!("peer registered: {}", mac_string(&peer));
        Ok(())
    }

    fn send(&mut self, peer: [u8; 6], payload: &[u8]) -> Result<(), Self::Error> {
        log::debug!(
            "-> {}: {}",
            mac_string(&peer),
            String::from_utf8_lossy(payload)
        );
        Ok(())
    }
}

fn mac_string(peer: &[u8; 6]) -> String {
    format!(
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        peer[0], peer[1], peer[2], peer[3], peer[4], peer[5]
    )
}
