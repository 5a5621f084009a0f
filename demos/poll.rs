// Polls a PMS5003 once a second and prints every reading.
//
//     cargo run --features std --example poll -- /dev/ttyUSB0

use std::io::{self, Read as _};
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use embedded_io_async::{ErrorKind, ErrorType, Read};
use futures::executor::block_on;
use pms5003_nostd_rs::{
    Config, Pms5003, SensorReading, StdClock, DEFAULT_BAUD_RATE, DEFAULT_DEVICE,
};

// Failures tolerated before giving up.
const ERROR_MAX: u32 = 5;

// Short read timeouts make the port behave non-blocking: no data is `Ok(0)`.
struct NonBlockingPort(Box<dyn serialport::SerialPort>);

impl ErrorType for NonBlockingPort {
    type Error = ErrorKind;
}

impl Read for NonBlockingPort {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.0.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Ok(0)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(e) => {
                log::error!("Serial read failed: {}", e);
                Err(ErrorKind::Other)
            }
        }
    }
}

fn print_reading(reading: &SensorReading) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!("---- {} ----", now);
    println!("PM1.0   {}", reading.pm1_0_cf);
    println!("PM2.5   {}", reading.pm2_5_cf);
    println!("PM10    {}", reading.pm10_cf);
    println!("PM1.0a  {}", reading.pm1_0_atm);
    println!("PM2.5a  {}", reading.pm2_5_atm);
    println!("PM10a   {}", reading.pm10_atm);
    println!(">0.3    {}", reading.gt0_3um);
    println!(">0.5    {}", reading.gt0_5um);
    println!(">1      {}", reading.gt1_0um);
    println!(">2.5    {}", reading.gt2_5um);
    println!(">5      {}", reading.gt5_0um);
    println!(">10     {}", reading.gt10um);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DEVICE.to_string());

    println!("Connecting to: {}", path);

    let port = match serialport::new(&path, DEFAULT_BAUD_RATE)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .timeout(Duration::from_millis(10))
        .open()
    {
        Ok(port) => port,
        Err(e) => {
            log::error!("Failed to open {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let mut port = NonBlockingPort(port);
    let mut sensor = Pms5003::new(&mut port, StdClock::new(), Config::default());

    let mut errors = 0;
    loop {
        match block_on(sensor.acquire_reading()) {
            Ok(reading) => print_reading(&reading),
            Err(e) => {
                log::error!("{}", e);
                errors += 1;
                if errors > ERROR_MAX {
                    break;
                }
            }
        }
        sleep(Duration::from_secs(1));
    }
}
