//! Fixed tunables. Everything here is a build-time constant; there is
//! no runtime configuration surface.

/// Scheduler tick quantum in milliseconds.
pub const TICK_MS: u32 = 10;

/// Raw speed samples averaged into one chart point.
pub const SPEED_BATCH: usize = 10;

/// Smoothing factor for the average-speed label.
pub const EMA_ALPHA: f32 = 0.05;

/// Points kept by the scrolling speed chart.
pub const CHART_POINTS: usize = 400;

/// Chart Y range in pre-scaled knots (0 to 6.0 kn).
pub const CHART_Y_MAX: i32 = 60;

pub const MAX_PEERS: usize = 8;

pub const TOPIC_SPEED: &str = "speedometer/speed";
pub const TOPIC_COMPASS: &str = "speedometer/compass";

/// Largest datagram the broadcaster ever builds.
pub const MAX_DATAGRAM: usize = 64;

/// Scratch size for draining the serial port each tick.
pub const SERIAL_CHUNK: usize = 64;

/// Longest sentence we buffer; NMEA-0183 caps lines at 82 characters.
pub const MAX_SENTENCE: usize = 84;

/// Shown on the primary labels until the first fix arrives.
pub const WAITING_LABEL: &str = "...";
