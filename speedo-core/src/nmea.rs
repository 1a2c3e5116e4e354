use heapless::Vec;
use speedo_traits::{GpsDecoder, GpsFix, RawCoordinate};

use crate::consts::MAX_SENTENCE;

/// Push decoder for the two sentence types the speedometer cares
/// about: RMC for position/speed/course, GGA for fix quality and
/// satellites in use. Fed one byte at a time; sentences that are
/// malformed, truncated or fail their checksum are dropped without
/// touching the last good fix.
#[derive(Default)]
pub struct NmeaDecoder {
    line: Vec<u8, MAX_SENTENCE>,
    in_sentence: bool,
    fix: GpsFix,
}

impl NmeaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_sentence(&mut self) {
        let line = core::mem::take(&mut self.line);
        let Ok(sentence) = core::str::from_utf8(&line) else {
            return;
        };
        let Some((body, sum)) = sentence.rsplit_once('*') else {
            return;
        };
        if sum.len() != 2 {
            return;
        }
        let Ok(expected) = u8::from_str_radix(sum, 16) else {
            return;
        };
        let computed = body.bytes().fold(0u8, |acc, b| acc ^ b);
        if computed != expected {
            return;
        }
        self.apply(body);
    }

    fn apply(&mut self, body: &str) {
        let mut fields = body.split(',');
        let Some(id) = fields.next() else { return };
        // talker prefix (GP/GN/...) doesn't matter, the tail does
        if id.len() != 5 {
            return;
        }
        match id.get(2..) {
            Some("RMC") => self.apply_rmc(fields),
            Some("GGA") => self.apply_gga(fields),
            _ => {}
        }
    }

    /// $xxRMC,time,status,lat,N/S,lon,E/W,speed,course,date,...
    fn apply_rmc<'a>(&mut self, mut fields: impl Iterator<Item = &'a str>) {
        let _time = fields.next();
        let status = fields.next().unwrap_or("");
        let lat = fields.next().unwrap_or("");
        let ns = fields.next().unwrap_or("");
        let lon = fields.next().unwrap_or("");
        let ew = fields.next().unwrap_or("");
        let speed = fields.next().unwrap_or("");
        let course = fields.next().unwrap_or("");

        // a void fix carries no usable data; keep what we had
        if status != "A" {
            return;
        }
        if let Some(coord) = parse_coordinate(lat, ns) {
            self.fix.latitude = Some(coord);
        }
        if let Some(coord) = parse_coordinate(lon, ew) {
            self.fix.longitude = Some(coord);
        }
        if let Ok(knots) = speed.parse::<f32>() {
            self.fix.speed_knots = Some(knots);
        }
        if let Ok(degrees) = course.parse::<f32>() {
            self.fix.course = degrees;
        }
    }

    /// $xxGGA,time,lat,N/S,lon,E/W,quality,satellites,...
    fn apply_gga<'a>(&mut self, mut fields: impl Iterator<Item = &'a str>) {
        let _time = fields.next();
        let lat = fields.next().unwrap_or("");
        let ns = fields.next().unwrap_or("");
        let lon = fields.next().unwrap_or("");
        let ew = fields.next().unwrap_or("");
        let quality = fields.next().unwrap_or("");
        let satellites = fields.next().unwrap_or("");

        let quality = match quality.parse::<u8>() {
            Ok(code) => code,
            Err(_) => return,
        };
        self.fix.fix_quality = Some(quality);
        if let Ok(count) = satellites.parse::<u8>() {
            self.fix.satellites_in_use = Some(count);
        }
        if quality > 0 {
            if let Some(coord) = parse_coordinate(lat, ns) {
                self.fix.latitude = Some(coord);
            }
            if let Some(coord) = parse_coordinate(lon, ew) {
                self.fix.longitude = Some(coord);
            }
        }
    }
}

/// "ddmm.mmmm" plus a hemisphere field.
fn parse_coordinate(value: &str, hemisphere: &str) -> Option<RawCoordinate> {
    let hemisphere = hemisphere.chars().next()?;
    let raw: f32 = value.parse().ok()?;
    let degrees = (raw / 100.0) as u16;
    let minutes = raw - degrees as f32 * 100.0;
    Some(RawCoordinate {
        degrees,
        minutes,
        hemisphere,
    })
}

impl GpsDecoder for NmeaDecoder {
    fn feed(&mut self, byte: u8) {
        match byte {
            b'$' => {
                self.line.clear();
                self.in_sentence = true;
            }
            b'\r' | b'\n' => {
                if self.in_sentence {
                    self.in_sentence = false;
                    self.finish_sentence();
                }
            }
            _ if self.in_sentence => {
                if self.line.push(byte).is_err() {
                    // oversized line, can't be a valid sentence
                    self.in_sentence = false;
                    self.line.clear();
                }
            }
            _ => {}
        }
    }

    fn fix(&self) -> GpsFix {
        self.fix.clone()
    }
}
