//! Instrument panel rendered with embedded-graphics.
//!
//! Labels are cached and only flushed to the display when `render`
//! finds them dirty, so the 10ms loop usually touches no pixels.
//!
//! Two side buttons drive the screen ring. A short press of the right
//! button moves forward, the left button moves back, and holding the
//! right button fires the save action.

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use esp_hal::gpio::Input;
use heapless::{Deque, String};

use speedo_core::consts::{CHART_POINTS, CHART_Y_MAX};
use speedo_traits::{PeerText, ScreenId, Ui, UiEvent};

const WIDTH: i32 = 480;
const CHART_ORIGIN: Point = Point::new(40, 300);
const CHART_HEIGHT: i32 = 180;
const LONG_PRESS_MS: u32 = 700;
const SAVE_FLASH_MS: u32 = 1000;

pub struct PanelUi<D> {
    display: D,
    next_btn: Input<'static>,
    prev_btn: Input<'static>,
    next_pressed_ms: Option<u32>,
    prev_was_pressed: bool,

    screen: ScreenId,
    speed: String<8>,
    compass: String<8>,
    avg: String<8>,
    lat: String<24>,
    lon: String<24>,
    status: String<24>,
    peer_buffer: PeerText,
    chart: Deque<i32, CHART_POINTS>,
    save_flash_ms: u32,

    labels_dirty: bool,
    chart_dirty: bool,
    full_redraw: bool,
}

impl<D> PanelUi<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(display: D, next_btn: Input<'static>, prev_btn: Input<'static>) -> Self {
        Self {
            display,
            next_btn,
            prev_btn,
            next_pressed_ms: None,
            prev_was_pressed: false,
            screen: ScreenId::Main,
            speed: String::new(),
            compass: String::new(),
            avg: String::new(),
            lat: String::new(),
            lon: String::new(),
            status: String::new(),
            peer_buffer: PeerText::new(),
            chart: Deque::new(),
            save_flash_ms: 0,
            labels_dirty: true,
            chart_dirty: true,
            full_redraw: true,
        }
    }

    fn draw_text(&mut self, text: &str, origin: Point, large: bool) {
        let style = if large {
            MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE)
        } else {
            MonoTextStyle::new(&FONT_6X10, Rgb565::CSS_LIGHT_GRAY)
        };
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.display);
    }

    fn clear_band(&mut self, top: i32, height: u32) {
        let _ = Rectangle::new(Point::new(0, top), Size::new(WIDTH as u32, height))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(&mut self.display);
    }

    fn draw_main_labels(&mut self) {
        self.clear_band(20, 60);
        let speed = self.speed.clone();
        let compass = self.compass.clone();
        let avg = self.avg.clone();
        self.draw_text(&speed, Point::new(40, 30), true);
        self.draw_text(&compass, Point::new(300, 30), true);
        self.draw_text(&avg, Point::new(40, 90), false);
        self.draw_text("avg", Point::new(90, 90), false);
        if self.save_flash_ms > 0 {
            self.draw_text("saved", Point::new(400, 90), false);
        }
    }

    fn draw_chart(&mut self) {
        self.clear_band(CHART_ORIGIN.y - CHART_HEIGHT, CHART_HEIGHT as u32 + 1);
        let _ = Line::new(
            Point::new(CHART_ORIGIN.x, CHART_ORIGIN.y),
            Point::new(CHART_ORIGIN.x + CHART_POINTS as i32, CHART_ORIGIN.y),
        )
        .into_styled(PrimitiveStyle::with_stroke(Rgb565::CSS_DIM_GRAY, 1))
        .draw(&mut self.display);

        let mut prev: Option<Point> = None;
        for (i, value) in self.chart.iter().enumerate() {
            let clamped = (*value).clamp(0, CHART_Y_MAX);
            let y = CHART_ORIGIN.y - clamped * CHART_HEIGHT / CHART_Y_MAX;
            let point = Point::new(CHART_ORIGIN.x + i as i32, y);
            if let Some(prev) = prev {
                let _ = Line::new(prev, point)
                    .into_styled(PrimitiveStyle::with_stroke(Rgb565::CSS_ORANGE, 1))
                    .draw(&mut self.display);
            }
            prev = Some(point);
        }
    }

    fn draw_gps_detail(&mut self) {
        self.clear_band(20, 120);
        let lat = self.lat.clone();
        let lon = self.lon.clone();
        let status = self.status.clone();
        self.draw_text("GPS", Point::new(40, 20), true);
        self.draw_text(&lat, Point::new(40, 60), false);
        self.draw_text(&lon, Point::new(40, 80), false);
        self.draw_text(&status, Point::new(40, 100), false);
    }

    fn draw_peer_list(&mut self) {
        self.clear_band(20, 280);
        self.draw_text("Peers", Point::new(40, 20), true);
        let text = self.peer_buffer.clone();
        let mut y = 60;
        for line in text.lines() {
            self.draw_text(line, Point::new(40, y), false);
            y += 14;
        }
        if self.save_flash_ms > 0 {
            self.draw_text("saved", Point::new(400, 20), false);
        }
        self.draw_text("hold right button to save", Point::new(40, 300), false);
    }
}

impl<D> Ui for PanelUi<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_speed_text(&mut self, text: &str) {
        if self.speed.as_str() != text {
            self.speed.clear();
            let _ = self.speed.push_str(text);
            self.labels_dirty = true;
        }
    }

    fn set_compass_text(&mut self, text: &str) {
        if self.compass.as_str() != text {
            self.compass.clear();
            let _ = self.compass.push_str(text);
            self.labels_dirty = true;
        }
    }

    fn set_avg_speed_text(&mut self, text: &str) {
        if self.avg.as_str() != text {
            self.avg.clear();
            let _ = self.avg.push_str(text);
            self.labels_dirty = true;
        }
    }

    fn push_chart_point(&mut self, value: i32) {
        if self.chart.is_full() {
            self.chart.pop_front();
        }
        // full after eviction only if CHART_POINTS is zero
        let _ = self.chart.push_back(value);
        self.chart_dirty = true;
    }

    fn show_screen(&mut self, screen: ScreenId) {
        self.screen = screen;
        self.full_redraw = true;
    }

    fn set_gps_fields(&mut self, lat: &str, lon: &str, status: &str) {
        if self.lat.as_str() != lat || self.lon.as_str() != lon || self.status.as_str() != status {
            self.lat.clear();
            let _ = self.lat.push_str(lat);
            self.lon.clear();
            let _ = self.lon.push_str(lon);
            self.status.clear();
            let _ = self.status.push_str(status);
            self.labels_dirty = true;
        }
    }

    fn seed_peer_text(&mut self, text: &str) {
        self.peer_buffer.clear();
        let _ = self.peer_buffer.push_str(text);
        self.labels_dirty = true;
    }

    fn peer_text(&self) -> &str {
        &self.peer_buffer
    }

    fn flash_save_confirm(&mut self) {
        self.save_flash_ms = SAVE_FLASH_MS;
        self.labels_dirty = true;
    }

    fn poll_event(&mut self) -> Option<UiEvent> {
        if self.prev_btn.is_low() {
            if !self.prev_was_pressed {
                self.prev_was_pressed = true;
                return Some(UiEvent::PrevScreen);
            }
        } else {
            self.prev_was_pressed = false;
        }

        match (self.next_btn.is_low(), self.next_pressed_ms) {
            (true, None) => self.next_pressed_ms = Some(0),
            (false, Some(held)) => {
                self.next_pressed_ms = None;
                if held >= LONG_PRESS_MS && self.screen == ScreenId::PeerEditor {
                    return Some(UiEvent::SavePeers);
                }
                return Some(UiEvent::NextScreen);
            }
            _ => {}
        }
        None
    }

    fn render(&mut self) {
        if self.full_redraw {
            let _ = self.display.clear(Rgb565::BLACK);
            self.full_redraw = false;
            self.labels_dirty = true;
            self.chart_dirty = true;
        }
        match self.screen {
            ScreenId::Main => {
                if self.labels_dirty {
                    self.draw_main_labels();
                }
                if self.chart_dirty {
                    self.draw_chart();
                }
            }
            ScreenId::GpsDetail => {
                if self.labels_dirty {
                    self.draw_gps_detail();
                }
            }
            ScreenId::PeerEditor => {
                if self.labels_dirty {
                    self.draw_peer_list();
                }
            }
        }
        self.labels_dirty = false;
        self.chart_dirty = false;
    }

    fn advance(&mut self, ms: u32) {
        if let Some(held) = self.next_pressed_ms.as_mut() {
            *held = held.saturating_add(ms);
        }
        if self.save_flash_ms > 0 {
            self.save_flash_ms = self.save_flash_ms.saturating_sub(ms);
            if self.save_flash_ms == 0 {
                self.labels_dirty = true;
            }
        }
    }
}
