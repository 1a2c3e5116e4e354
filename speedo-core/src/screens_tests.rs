mod tests {
    extern crate std;
    use std::string::String;
    use std::vec::Vec;

    use speedo_traits::{GpsFix, PeerStore, PeerText, RawCoordinate, ScreenId, Ui, UiEvent};

    use crate::screens::{format_course_label, format_speed_label, GpsDetailScreen, Nav};

    #[derive(Default)]
    struct FakeUi {
        screen_switches: Vec<ScreenId>,
        gps_fields: Option<(String, String, String)>,
        peer_buffer: String,
        seeded: u32,
        confirms: u32,
    }

    impl Ui for FakeUi {
        fn set_speed_text(&mut self, _text: &str) {}
        fn set_compass_text(&mut self, _text: &str) {}
        fn set_avg_speed_text(&mut self, _text: &str) {}
        fn push_chart_point(&mut self, _value: i32) {}

        fn show_screen(&mut self, screen: ScreenId) {
            self.screen_switches.push(screen);
        }

        fn set_gps_fields(&mut self, lat: &str, lon: &str, status: &str) {
            self.gps_fields = Some((lat.into(), lon.into(), status.into()));
        }

        fn seed_peer_text(&mut self, text: &str) {
            self.seeded += 1;
            self.peer_buffer = text.into();
        }

        fn peer_text(&self) -> &str {
            &self.peer_buffer
        }

        fn flash_save_confirm(&mut self) {
            self.confirms += 1;
        }

        fn poll_event(&mut self) -> Option<UiEvent> {
            None
        }

        fn render(&mut self) {}
        fn advance(&mut self, _ms: u32) {}
    }

    #[derive(Default)]
    struct MemStore {
        text: PeerText,
        loads: u32,
        saves: u32,
    }

    impl PeerStore for MemStore {
        type Error = core::convert::Infallible;

        fn load(&mut self) -> Result<PeerText, Self::Error> {
            self.loads += 1;
            Ok(self.text.clone())
        }

        fn save(&mut self, text: &str) -> Result<(), Self::Error> {
            self.saves += 1;
            self.text.clear();
            let _ = self.text.push_str(text);
            Ok(())
        }
    }

    fn press(nav: &mut Nav, event: UiEvent, ui: &mut FakeUi, store: &mut MemStore) {
        nav.handle_event(event, ui, store).unwrap();
    }

    #[test]
    fn three_nexts_close_the_ring() {
        let mut nav = Nav::new();
        let mut ui = FakeUi::default();
        let mut store = MemStore::default();

        assert_eq!(nav.active(), ScreenId::Main);
        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        assert_eq!(nav.active(), ScreenId::GpsDetail);
        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        assert_eq!(nav.active(), ScreenId::PeerEditor);
        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        assert_eq!(nav.active(), ScreenId::Main);
    }

    #[test]
    fn three_prevs_close_the_ring() {
        let mut nav = Nav::new();
        let mut ui = FakeUi::default();
        let mut store = MemStore::default();

        for _ in 0..3 {
            press(&mut nav, UiEvent::PrevScreen, &mut ui, &mut store);
        }
        assert_eq!(nav.active(), ScreenId::Main);
    }

    #[test]
    fn next_then_prev_returns() {
        let mut nav = Nav::new();
        let mut ui = FakeUi::default();
        let mut store = MemStore::default();

        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        press(&mut nav, UiEvent::PrevScreen, &mut ui, &mut store);
        assert_eq!(nav.active(), ScreenId::Main);
    }

    #[test]
    fn peer_editor_is_seeded_exactly_once() {
        let mut nav = Nav::new();
        let mut ui = FakeUi::default();
        let mut store = MemStore::default();
        store.text.push_str("AA:BB:CC:DD:EE:FF\n").unwrap();

        press(&mut nav, UiEvent::PrevScreen, &mut ui, &mut store);
        assert_eq!(nav.active(), ScreenId::PeerEditor);
        assert_eq!(ui.seeded, 1);
        assert_eq!(ui.peer_buffer, "AA:BB:CC:DD:EE:FF\n");

        // leave and come back; no reseed, no extra load
        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        press(&mut nav, UiEvent::PrevScreen, &mut ui, &mut store);
        assert_eq!(ui.seeded, 1);
        assert_eq!(store.loads, 1);
    }

    #[test]
    fn save_trims_blanks_and_returns_to_main() {
        let mut nav = Nav::new();
        let mut ui = FakeUi::default();
        let mut store = MemStore::default();

        press(&mut nav, UiEvent::PrevScreen, &mut ui, &mut store);
        ui.peer_buffer = String::from("  AA:BB:CC:DD:EE:FF \n\n  \nnot-a-mac\n");

        press(&mut nav, UiEvent::SavePeers, &mut ui, &mut store);
        // no syntax filtering on save, only trimming
        assert_eq!(store.text.as_str(), "AA:BB:CC:DD:EE:FF\nnot-a-mac\n");
        assert_eq!(ui.confirms, 1);
        assert_eq!(nav.active(), ScreenId::Main);
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn save_outside_the_editor_is_ignored() {
        let mut nav = Nav::new();
        let mut ui = FakeUi::default();
        let mut store = MemStore::default();
        store.text.push_str("AA:BB:CC:DD:EE:FF\n").unwrap();

        // Main: the never-seeded buffer must not reach the store
        press(&mut nav, UiEvent::SavePeers, &mut ui, &mut store);
        assert_eq!(store.saves, 0);
        assert_eq!(store.text.as_str(), "AA:BB:CC:DD:EE:FF\n");
        assert_eq!(ui.confirms, 0);
        assert_eq!(nav.active(), ScreenId::Main);

        // GpsDetail is no different
        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        press(&mut nav, UiEvent::SavePeers, &mut ui, &mut store);
        assert_eq!(store.saves, 0);
        assert_eq!(nav.active(), ScreenId::GpsDetail);

        // on the editor itself it still works
        press(&mut nav, UiEvent::NextScreen, &mut ui, &mut store);
        press(&mut nav, UiEvent::SavePeers, &mut ui, &mut store);
        assert_eq!(store.saves, 1);
        assert_eq!(ui.confirms, 1);
        assert_eq!(nav.active(), ScreenId::Main);
    }

    #[test]
    fn gps_screen_placeholder_rendering() {
        let mut screen_ui = FakeUi::default();
        let mut store = MemStore::default();
        let mut nav = Nav::new();
        press(&mut nav, UiEvent::NextScreen, &mut screen_ui, &mut store);

        let (lat, lon, status) = screen_ui.gps_fields.clone().unwrap();
        assert_eq!(lat, "Lat: --");
        assert_eq!(lon, "Lon: --");
        assert_eq!(status, "Sat: --  Fix: --");
    }

    #[test]
    fn gps_screen_formats_signed_degrees() {
        let mut screen = detail_screen();
        let fix = GpsFix {
            latitude: Some(RawCoordinate {
                degrees: 48,
                minutes: 7.038,
                hemisphere: 'S',
            }),
            longitude: Some(RawCoordinate {
                degrees: 11,
                minutes: 31.0,
                hemisphere: 'W',
            }),
            satellites_in_use: Some(8),
            fix_quality: Some(1),
            ..Default::default()
        };
        screen.update(&fix);
        assert!(screen.lat.as_str().starts_with("Lat: -48.117"));
        assert!(screen.lon.as_str().starts_with("Lon: -11.516"));
        assert_eq!(screen.status.as_str(), "Sat: 8  Fix: Fix");
    }

    #[test]
    fn fix_quality_labels() {
        let mut screen = detail_screen();
        let mut fix = GpsFix {
            satellites_in_use: Some(5),
            ..Default::default()
        };
        for (code, label) in [(0, "No"), (1, "Fix"), (2, "2D"), (3, "3D"), (7, "7")] {
            fix.fix_quality = Some(code);
            screen.update(&fix);
            let mut expected = String::from("Sat: 5  Fix: ");
            expected.push_str(label);
            assert_eq!(screen.status.as_str(), expected);
        }
    }

    #[test]
    fn missing_satellites_blanks_both_fields() {
        let mut screen = detail_screen();
        let fix = GpsFix {
            fix_quality: Some(3),
            satellites_in_use: None,
            ..Default::default()
        };
        screen.update(&fix);
        assert_eq!(screen.status.as_str(), "Sat: --  Fix: --");
    }

    #[test]
    fn speed_label_padding() {
        let mut label = heapless::String::<8>::new();
        format_speed_label(2.0, &mut label);
        assert_eq!(label.as_str(), " 2.0");
        format_speed_label(1.2, &mut label);
        assert_eq!(label.as_str(), "  1.2");
        format_speed_label(12.5, &mut label);
        assert_eq!(label.as_str(), "12.5");
    }

    #[test]
    fn course_label_is_whole_degrees() {
        let mut label = heapless::String::<8>::new();
        format_course_label(84.4, &mut label);
        assert_eq!(label.as_str(), "84\u{00B0}");
    }

    fn detail_screen() -> GpsDetailScreen {
        GpsDetailScreen::new()
    }
}
