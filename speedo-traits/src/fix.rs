use serde::{Serialize, Serializer};

/// One coordinate exactly as the receiver reports it: whole degrees,
/// decimal minutes, and the hemisphere letter from the sentence.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RawCoordinate {
    pub degrees: u16,
    pub minutes: f32,
    // on the wire as a one-character string; not every JSON
    // serializer handles chars
    #[serde(serialize_with = "hemisphere_as_str")]
    pub hemisphere: char,
}

fn hemisphere_as_str<S: Serializer>(hemisphere: &char, serializer: S) -> Result<S::Ok, S::Error> {
    let mut buf = [0u8; 4];
    serializer.serialize_str(hemisphere.encode_utf8(&mut buf))
}

impl RawCoordinate {
    /// Decimal degrees with the hemisphere sign applied: 'S' and 'W'
    /// are negative, everything else is not.
    pub fn signed_degrees(&self) -> f64 {
        let magnitude = self.degrees as f64 + self.minutes as f64 / 60.0;
        match self.hemisphere {
            'S' | 'W' => -magnitude,
            _ => magnitude,
        }
    }
}

/// Snapshot of the decoder state, taken once per scheduler tick.
/// Fields stay `None` until the first sentence that carries them;
/// after that they always hold the last successfully parsed value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GpsFix {
    /// Speed over ground in knots.
    pub speed_knots: Option<f32>,
    /// Course over ground in degrees, 0.0 while unknown.
    pub course: f32,
    pub latitude: Option<RawCoordinate>,
    pub longitude: Option<RawCoordinate>,
    pub satellites_in_use: Option<u8>,
    /// GGA fix quality code (0-3 nominally).
    pub fix_quality: Option<u8>,
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass label for a course in degrees. Sectors are 22.5
/// degrees wide with N centred on 0.
pub fn compass_point(course: f32) -> &'static str {
    let mut course = course % 360.0;
    if course < 0.0 {
        course += 360.0;
    }
    let index = ((course + 11.25) / 22.5) as usize % 16;
    COMPASS_POINTS[index]
}
