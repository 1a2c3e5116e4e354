use core::fmt;

use embassy_time::{Duration, Timer};
use heapless::String;
use speedo_traits::{
    compass_point, ByteSource, GpsDecoder, GpsFix, PeerLink, PeerStore, ScreenId, Ui,
};

use crate::consts::{SERIAL_CHUNK, TICK_MS, WAITING_LABEL};
use crate::filter::{ChartSeries, SpeedFilter};
use crate::peers::Broadcaster;
use crate::screens::{format_avg_label, format_course_label, format_speed_label, Nav};

/// A fault that ends the main loop. Everything recoverable is handled
/// where it happens; only a failed peer-store write lands here.
#[derive(Debug)]
pub enum Fault<E> {
    StoreWrite(E),
}

impl<E: fmt::Debug> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::StoreWrite(e) => write!(f, "peer store write failed: {:?}", e),
        }
    }
}

/// The whole instrument, tied together over the capability seams.
/// Everything runs on one execution context; `tick` never blocks and
/// the only suspension point is the delay at the end of each `run`
/// iteration.
pub struct Speedometer<B, D, U, S, L> {
    serial: B,
    decoder: D,
    ui: U,
    store: S,
    link: L,
    nav: Nav,
    filter: SpeedFilter,
    chart: ChartSeries,
    broadcaster: Broadcaster,
}

impl<B, D, U, S, L> Speedometer<B, D, U, S, L>
where
    B: ByteSource,
    D: GpsDecoder,
    U: Ui,
    S: PeerStore,
    L: PeerLink,
{
    pub fn new(serial: B, decoder: D, ui: U, store: S, link: L) -> Self {
        Self {
            serial,
            decoder,
            ui,
            store,
            link,
            nav: Nav::new(),
            filter: SpeedFilter::new(),
            chart: ChartSeries::new(),
            broadcaster: Broadcaster::new(),
        }
    }

    /// One scheduler iteration, always in the same order: drain the
    /// serial port, snapshot the fix, labels, filter, detail screen,
    /// UI pass, broadcast.
    pub fn tick(&mut self) -> Result<(), Fault<S::Error>> {
        self.drain_serial();
        let fix = self.decoder.fix();

        self.update_primary_labels(&fix);
        self.feed_filter(&fix);
        self.refresh_gps_detail(&fix);

        // input callbacks run here, synchronously, so they can't race
        // anything in this loop
        if let Some(event) = self.ui.poll_event() {
            self.nav
                .handle_event(event, &mut self.ui, &mut self.store)
                .map_err(Fault::StoreWrite)?;
        }
        self.ui.render();

        self.broadcaster.run_cycle(
            &mut self.store,
            &mut self.link,
            fix.speed_knots.unwrap_or(0.0),
            compass_point(fix.course),
        );
        Ok(())
    }

    /// Run until the first unhandled fault.
    pub async fn run(mut self) {
        loop {
            if let Err(e) = self.tick() {
                log::error!("fatal fault in main loop: {}", e);
                break;
            }
            self.ui.advance(TICK_MS);
            Timer::after(Duration::from_millis(TICK_MS as u64)).await;
        }
    }

    fn drain_serial(&mut self) {
        let mut buf = [0u8; SERIAL_CHUNK];
        loop {
            let n = self.serial.read_available(&mut buf);
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                self.decoder.feed(byte);
            }
        }
    }

    fn update_primary_labels(&mut self, fix: &GpsFix) {
        match fix.speed_knots {
            Some(speed) => {
                let mut label: String<8> = String::new();
                format_speed_label(speed, &mut label);
                self.ui.set_speed_text(&label);
                format_course_label(fix.course, &mut label);
                self.ui.set_compass_text(&label);
            }
            None => {
                self.ui.set_speed_text(WAITING_LABEL);
                self.ui.set_compass_text(WAITING_LABEL);
            }
        }
    }

    fn feed_filter(&mut self, fix: &GpsFix) {
        let Some(speed) = fix.speed_knots else {
            return;
        };
        let Some(update) = self.filter.push((speed * 10.0) as i32) else {
            return;
        };
        self.chart.push(update.chart_point);
        self.ui.push_chart_point(update.chart_point);
        let mut label: String<8> = String::new();
        format_avg_label(update.label_value, &mut label);
        self.ui.set_avg_speed_text(&label);
    }

    fn refresh_gps_detail(&mut self, fix: &GpsFix) {
        if self.nav.active() != ScreenId::GpsDetail {
            return;
        }
        if let Some(screen) = self.nav.gps_detail_mut() {
            screen.update(fix);
            self.ui.set_gps_fields(&screen.lat, &screen.lon, &screen.status);
        }
    }

    pub fn active_screen(&self) -> ScreenId {
        self.nav.active()
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn serial_mut(&mut self) -> &mut B {
        &mut self.serial
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}
