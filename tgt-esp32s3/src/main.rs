//! ESP32-S3 build: GPS on UART1, ST7796 panel over SPI, ESP-NOW for
//! the peer broadcast.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    spi::master::{Config as SpiConfig, Spi},
    spi::Mode as SpiMode,
    time::Rate,
    timer::timg::TimerGroup,
    uart::{Config as UartConfig, Uart, UartRx, UartTx},
    Blocking,
};
use esp_println::println;

use display_interface_spi::SPIInterface;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::{
    models::ST7796,
    options::{Orientation, Rotation},
    Builder,
};
use static_cell::StaticCell;

// Local modules
mod espnow;
mod panel;
mod store;

use speedo_core::{NmeaDecoder, Speedometer};
use speedo_traits::ByteSource;

use crate::espnow::EspNowLink;
use crate::panel::PanelUi;
use crate::store::FlashPeerStore;

struct GpsUart(UartRx<'static, Blocking>);

impl ByteSource for GpsUart {
    fn read_available(&mut self, buf: &mut [u8]) -> usize {
        match self.0.read_buffered(buf) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("uart read failed: {:?}", e);
                0
            }
        }
    }
}

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let rng = esp_hal::rng::Rng::new(peripherals.RNG);

    static INIT: StaticCell<esp_wifi::EspWifiController<'static>> = StaticCell::new();
    let init = INIT.init(esp_wifi::init(timg0.timer0, rng, peripherals.RADIO_CLK).unwrap());
    let esp_now = esp_wifi::esp_now::EspNow::new(&*init, peripherals.WIFI).unwrap();
    println!("esp-now version {}", esp_now.version().unwrap());

    use esp_hal::timer::systimer::SystemTimer;
    let systimer = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(systimer.alarm0);

    //
    // Panel
    //
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(40))
            .with_mode(SpiMode::_0),
    )
    .unwrap()
    .with_sck(peripherals.GPIO12)
    .with_mosi(peripherals.GPIO11);

    let cs = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO13, Level::Low, OutputConfig::default());
    let mut backlight = Output::new(peripherals.GPIO42, Level::Low, OutputConfig::default());

    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).unwrap();
    let mut delay = embassy_time::Delay;
    let display = Builder::new(ST7796, SPIInterface::new(spi_device, dc))
        .display_size(320, 480)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .init(&mut delay)
        .unwrap();
    backlight.set_high();

    let next_btn = Input::new(
        peripherals.GPIO14,
        InputConfig::default().with_pull(Pull::Up),
    );
    let prev_btn = Input::new(
        peripherals.GPIO0,
        InputConfig::default().with_pull(Pull::Up),
    );

    //
    // GPS
    //
    let config = UartConfig::default().with_baudrate(9600);
    let uart1 = Uart::new(peripherals.UART1, config)
        .unwrap()
        .with_tx(peripherals.GPIO17)
        .with_rx(peripherals.GPIO18);
    let (uart_rx, mut uart_tx) = uart1.split();

    // Let the receiver boot before configuring it
    Timer::after(Duration::from_secs(2)).await;
    // RMC and GGA only, twice per second
    send_pmtk_command(&mut uart_tx, "PMTK314,0,1,0,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0");
    send_pmtk_command(&mut uart_tx, "PMTK220,500");
    Timer::after(Duration::from_secs(1)).await;

    // Enable SBAS with integrity mode
    send_pmtk_command(&mut uart_tx, "PMTK313,1");
    send_pmtk_command(&mut uart_tx, "PMTK319,1");

    let app = Speedometer::new(
        GpsUart(uart_rx),
        NmeaDecoder::new(),
        PanelUi::new(display, next_btn, prev_btn),
        FlashPeerStore::new(),
        EspNowLink::new(esp_now),
    );
    app.run().await;

    // the loop only returns on a fault; hold here rather than reboot-loop
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}

fn send_pmtk_command(tx: &mut UartTx<'static, Blocking>, command: &str) {
    let checksum = command.bytes().fold(0u8, |acc, b| acc ^ b);

    let mut buffer: [u8; 64] = [0; 64];
    let mut pos = 0;

    buffer[pos] = b'$';
    pos += 1;
    for &byte in command.as_bytes() {
        buffer[pos] = byte;
        pos += 1;
    }
    buffer[pos] = b'*';
    pos += 1;

    let hex_chars = b"0123456789ABCDEF";
    buffer[pos] = hex_chars[(checksum >> 4) as usize];
    pos += 1;
    buffer[pos] = hex_chars[(checksum & 0xF) as usize];
    pos += 1;

    buffer[pos] = b'\r';
    pos += 1;
    buffer[pos] = b'\n';
    pos += 1;

    if let Err(e) = tx.write(&buffer[..pos]) {
        log::error!("failed to send GPS command: {:?}", e);
    }
}
