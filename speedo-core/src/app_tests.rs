mod tests {
    extern crate std;
    use std::collections::VecDeque;
    use std::format;
    use std::string::String;
    use std::vec::Vec;

    use speedo_traits::{
        ByteSource, PeerLink, PeerStore, PeerText, ScreenId, Ui, UiEvent,
    };

    use crate::app::{Fault, Speedometer};
    use crate::consts::SPEED_BATCH;
    use crate::nmea::NmeaDecoder;

    fn sentence(body: &str) -> String {
        let sum = body.bytes().fold(0u8, |acc, b| acc ^ b);
        format!("${}*{:02X}\r\n", body, sum)
    }

    fn rmc(speed_knots: f32, course: f32) -> String {
        sentence(&format!(
            "GPRMC,123519,A,4807.038,N,01131.000,E,{:.1},{:.1},230394,,",
            speed_knots, course
        ))
    }

    /// Bytes queued by the test, handed out on demand.
    #[derive(Default)]
    struct ScriptedSerial {
        pending: VecDeque<u8>,
    }

    impl ScriptedSerial {
        fn queue(&mut self, text: &str) {
            self.pending.extend(text.bytes());
        }
    }

    impl ByteSource for ScriptedSerial {
        fn read_available(&mut self, buf: &mut [u8]) -> usize {
            let mut n = 0;
            while n < buf.len() {
                match self.pending.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            n
        }
    }

    #[derive(Default)]
    struct FakeUi {
        speed: String,
        compass: String,
        avg: String,
        chart: Vec<i32>,
        screen: Option<ScreenId>,
        gps_fields: Option<(String, String, String)>,
        peer_buffer: String,
        events: VecDeque<UiEvent>,
        renders: u32,
        advanced_ms: u32,
    }

    impl Ui for FakeUi {
        fn set_speed_text(&mut self, text: &str) {
            self.speed = text.into();
        }
        fn set_compass_text(&mut self, text: &str) {
            self.compass = text.into();
        }
        fn set_avg_speed_text(&mut self, text: &str) {
            self.avg = text.into();
        }
        fn push_chart_point(&mut self, value: i32) {
            self.chart.push(value);
        }
        fn show_screen(&mut self, screen: ScreenId) {
            self.screen = Some(screen);
        }
        fn set_gps_fields(&mut self, lat: &str, lon: &str, status: &str) {
            self.gps_fields = Some((lat.into(), lon.into(), status.into()));
        }
        fn seed_peer_text(&mut self, text: &str) {
            self.peer_buffer = text.into();
        }
        fn peer_text(&self) -> &str {
            &self.peer_buffer
        }
        fn flash_save_confirm(&mut self) {}
        fn poll_event(&mut self) -> Option<UiEvent> {
            self.events.pop_front()
        }
        fn render(&mut self) {
            self.renders += 1;
        }
        fn advance(&mut self, ms: u32) {
            self.advanced_ms += ms;
        }
    }

    #[derive(Default)]
    struct MemStore {
        text: PeerText,
        fail_saves: bool,
    }

    impl PeerStore for MemStore {
        type Error = &'static str;

        fn load(&mut self) -> Result<PeerText, Self::Error> {
            Ok(self.text.clone())
        }

        fn save(&mut self, text: &str) -> Result<(), Self::Error> {
            if self.fail_saves {
                return Err("disk full");
            }
            self.text.clear();
            let _ = self.text.push_str(text);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLink {
        sent: Vec<([u8; 6], String)>,
    }

    impl PeerLink for RecordingLink {
        type Error = core::convert::Infallible;

        fn register(&mut self, _peer: [u8; 6]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn send(&mut self, peer: [u8; 6], payload: &[u8]) -> Result<(), Self::Error> {
            self.sent
                .push((peer, String::from_utf8(payload.to_vec()).unwrap()));
            Ok(())
        }
    }

    type App = Speedometer<ScriptedSerial, NmeaDecoder, FakeUi, MemStore, RecordingLink>;

    fn app() -> App {
        Speedometer::new(
            ScriptedSerial::default(),
            NmeaDecoder::new(),
            FakeUi::default(),
            MemStore::default(),
            RecordingLink::default(),
        )
    }

    fn app_with_store(text: &str) -> App {
        let mut store = MemStore::default();
        store.text.push_str(text).unwrap();
        Speedometer::new(
            ScriptedSerial::default(),
            NmeaDecoder::new(),
            FakeUi::default(),
            store,
            RecordingLink::default(),
        )
    }

    #[test]
    fn waiting_placeholders_before_first_fix() {
        let mut app = app();
        app.tick().unwrap();
        assert_eq!(app.ui().speed, "...");
        assert_eq!(app.ui().compass, "...");
        assert_eq!(app.ui().renders, 1);
    }

    #[test]
    fn labels_follow_the_fix() {
        let mut app = app();
        let line = rmc(2.0, 84.0);
        app.serial_mut().queue(&line);
        app.tick().unwrap();
        assert_eq!(app.ui().speed, " 2.0");
        assert_eq!(app.ui().compass, "84\u{00B0}");
    }

    #[test]
    fn chart_point_and_avg_label_after_one_batch() {
        let mut app = app();
        let line = rmc(2.0, 0.0);
        app.serial_mut().queue(&line);
        for _ in 0..SPEED_BATCH {
            app.tick().unwrap();
        }
        assert_eq!(app.ui().chart, std::vec![20]);
        assert_eq!(app.ui().avg, "2.0");
        assert_eq!(app.chart().latest(), Some(20));
    }

    #[test]
    fn navigation_and_detail_refresh() {
        let mut app = app();
        let line = rmc(5.0, 180.0);
        app.serial_mut().queue(&line);
        app.ui_mut().events.push_back(UiEvent::NextScreen);
        app.tick().unwrap();
        assert_eq!(app.active_screen(), ScreenId::GpsDetail);

        // next tick refreshes the detail fields from the live fix
        app.tick().unwrap();
        let (lat, lon, _) = app.ui().gps_fields.clone().unwrap();
        assert!(lat.starts_with("Lat: 48.117"), "got {}", lat);
        assert!(lon.starts_with("Lon: 11.516"), "got {}", lon);
    }

    #[test]
    fn editor_save_flow() {
        let mut app = app_with_store("AA:BB:CC:DD:EE:FF\n");
        app.ui_mut().events.push_back(UiEvent::PrevScreen);
        app.tick().unwrap();
        assert_eq!(app.active_screen(), ScreenId::PeerEditor);
        assert_eq!(app.ui().peer_buffer, "AA:BB:CC:DD:EE:FF\n");

        app.ui_mut().peer_buffer = String::from("11:22:33:44:55:66\n");
        app.ui_mut().events.push_back(UiEvent::SavePeers);
        app.tick().unwrap();
        assert_eq!(app.active_screen(), ScreenId::Main);

        // the next broadcast cycle sees the new peer
        app.tick().unwrap();
        let sent = &app.link().sent;
        assert!(sent
            .iter()
            .any(|(peer, _)| *peer == [0x11, 0x22, 0x33, 0x44, 0x55, 0x66]));
    }

    #[test]
    fn broadcast_payloads() {
        let mut app = app_with_store("AA:BB:CC:DD:EE:FF\nbadmac\n");
        let line = rmc(2.0, 90.0);
        app.serial_mut().queue(&line);
        app.tick().unwrap();

        let sent = &app.link().sent;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, "speedometer/speed:2.0");
        assert_eq!(sent[1].1, "speedometer/compass:E");
    }

    #[test]
    fn broadcast_before_fix_sends_zero() {
        let mut app = app_with_store("AA:BB:CC:DD:EE:FF\n");
        app.tick().unwrap();
        assert_eq!(app.link().sent[0].1, "speedometer/speed:0.0");
    }

    #[test]
    fn failed_save_is_fatal() {
        let mut app = app();
        app.store_mut().fail_saves = true;
        app.ui_mut().events.push_back(UiEvent::PrevScreen);
        app.tick().unwrap();
        assert_eq!(app.active_screen(), ScreenId::PeerEditor);

        app.ui_mut().events.push_back(UiEvent::SavePeers);
        match app.tick() {
            Err(Fault::StoreWrite(e)) => assert_eq!(e, "disk full"),
            other => panic!("expected a store fault, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn ui_clock_is_not_advanced_by_tick() {
        // `run` owns the 10ms quantum; a bare tick must not touch it
        let mut app = app();
        app.tick().unwrap();
        assert_eq!(app.ui().advanced_ms, 0);
    }
}
