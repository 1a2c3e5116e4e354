#![no_std]

pub mod consts;

mod app;
mod filter;
mod nmea;
mod peers;
mod screens;

pub use app::{Fault, Speedometer};
pub use filter::{BatchUpdate, ChartSeries, SpeedFilter};
pub use nmea::NmeaDecoder;
pub use peers::{parse_peer_list, Broadcaster, Mac, MacParseError};
pub use screens::{GpsDetailScreen, Nav};

#[cfg(test)]
mod app_tests;
#[cfg(test)]
mod screens_tests;
