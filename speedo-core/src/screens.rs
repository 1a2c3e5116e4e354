use core::fmt::Write;

use heapless::String;
use speedo_traits::{GpsFix, PeerStore, ScreenId, Ui, UiEvent, PEER_TEXT_SIZE};

/// Formatted label state of the GPS detail screen. The widgets belong
/// to the `Ui` implementation; this holds the text that goes on them.
pub struct GpsDetailScreen {
    pub lat: String<24>,
    pub lon: String<24>,
    pub status: String<24>,
}

impl GpsDetailScreen {
    pub(crate) fn new() -> Self {
        let mut screen = Self {
            lat: String::new(),
            lon: String::new(),
            status: String::new(),
        };
        screen.update(&GpsFix::default());
        screen
    }

    /// Re-render the fields from a fix snapshot. Anything unavailable
    /// shows as "--".
    pub fn update(&mut self, fix: &GpsFix) {
        self.lat.clear();
        match &fix.latitude {
            Some(coord) => {
                let _ = write!(self.lat, "Lat: {:.6}", coord.signed_degrees());
            }
            None => {
                let _ = self.lat.push_str("Lat: --");
            }
        }

        self.lon.clear();
        match &fix.longitude {
            Some(coord) => {
                let _ = write!(self.lon, "Lon: {:.6}", coord.signed_degrees());
            }
            None => {
                let _ = self.lon.push_str("Lon: --");
            }
        }

        self.status.clear();
        match (fix.satellites_in_use, fix.fix_quality) {
            (Some(satellites), Some(quality)) => {
                let _ = write!(self.status, "Sat: {}  Fix: ", satellites);
                let label = match quality {
                    0 => "No",
                    1 => "Fix",
                    2 => "2D",
                    3 => "3D",
                    other => {
                        let _ = write!(self.status, "{}", other);
                        ""
                    }
                };
                let _ = self.status.push_str(label);
            }
            _ => {
                let _ = self.status.push_str("Sat: --  Fix: --");
            }
        }
    }
}

/// Marker for the built peer editor. Its buffer lives in the `Ui`;
/// what matters here is that seeding happens exactly once.
pub struct PeerEditorScreen;

/// The three screens form a ring. Non-Main screens are built on first
/// entry and kept for the life of the process.
pub struct Nav {
    active: ScreenId,
    gps_detail: Option<GpsDetailScreen>,
    peer_editor: Option<PeerEditorScreen>,
}

impl Nav {
    pub fn new() -> Self {
        Self {
            active: ScreenId::Main,
            gps_detail: None,
            peer_editor: None,
        }
    }

    pub fn active(&self) -> ScreenId {
        self.active
    }

    pub fn gps_detail_mut(&mut self) -> Option<&mut GpsDetailScreen> {
        self.gps_detail.as_mut()
    }

    /// Dispatch one input event. Only the save path can fail, and
    /// only on the store write.
    pub fn handle_event<U: Ui, S: PeerStore>(
        &mut self,
        event: UiEvent,
        ui: &mut U,
        store: &mut S,
    ) -> Result<(), S::Error> {
        match event {
            UiEvent::NextScreen => {
                self.enter(self.active.next(), ui, store);
                Ok(())
            }
            UiEvent::PrevScreen => {
                self.enter(self.active.prev(), ui, store);
                Ok(())
            }
            UiEvent::SavePeers => {
                // save belongs to the peer editor; the buffer may
                // never have been seeded on other screens
                if self.active != ScreenId::PeerEditor {
                    log::warn!("save ignored outside the peer editor");
                    return Ok(());
                }
                self.save_peers(ui, store)
            }
        }
    }

    fn enter<U: Ui, S: PeerStore>(&mut self, target: ScreenId, ui: &mut U, store: &mut S) {
        match target {
            ScreenId::Main => {}
            ScreenId::GpsDetail => self.ensure_gps_detail(ui),
            ScreenId::PeerEditor => self.ensure_peer_editor(ui, store),
        }
        self.active = target;
        ui.show_screen(target);
    }

    fn ensure_gps_detail<U: Ui>(&mut self, ui: &mut U) {
        if self.gps_detail.is_some() {
            return;
        }
        let screen = GpsDetailScreen::new();
        ui.set_gps_fields(&screen.lat, &screen.lon, &screen.status);
        self.gps_detail = Some(screen);
    }

    fn ensure_peer_editor<U: Ui, S: PeerStore>(&mut self, ui: &mut U, store: &mut S) {
        if self.peer_editor.is_some() {
            return;
        }
        let text = match store.load() {
            Ok(text) => text,
            Err(e) => {
                log::warn!("peer store read failed: {:?}", e);
                Default::default()
            }
        };
        ui.seed_peer_text(&text);
        self.peer_editor = Some(PeerEditorScreen);
    }

    /// Save action: trim the buffer lines, drop blanks, rewrite the
    /// store wholesale, confirm, go back to Main. MAC syntax is not
    /// checked here; the broadcaster validates on load.
    fn save_peers<U: Ui, S: PeerStore>(
        &mut self,
        ui: &mut U,
        store: &mut S,
    ) -> Result<(), S::Error> {
        let mut text: String<PEER_TEXT_SIZE> = String::new();
        for line in ui.peer_text().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if text.push_str(line).is_err() || text.push('\n').is_err() {
                log::warn!("peer text over capacity, rest dropped");
                break;
            }
        }
        store.save(&text)?;
        ui.flash_save_confirm();
        self.enter(ScreenId::Main, ui, store);
        Ok(())
    }
}

impl Default for Nav {
    fn default() -> Self {
        Self::new()
    }
}

/// Big speed label. Three-character values are padded so the decimal
/// point keeps its column; a leading 1 is narrow and gets extra room.
pub fn format_speed_label(speed_knots: f32, out: &mut String<8>) {
    out.clear();
    let mut digits: String<8> = String::new();
    let _ = write!(digits, "{:.1}", speed_knots);
    if digits.len() == 3 {
        let pad = if digits.starts_with('1') { "  " } else { " " };
        let _ = out.push_str(pad);
    }
    let _ = out.push_str(&digits);
}

pub fn format_course_label(course: f32, out: &mut String<8>) {
    out.clear();
    let _ = write!(out, "{:.0}\u{00B0}", course);
}

pub fn format_avg_label(value: f32, out: &mut String<8>) {
    out.clear();
    let _ = write!(out, "{:.1}", value);
}
