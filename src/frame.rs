use log::{debug, error};

use crate::constants::{CHECKSUM_OFFSET, FRAME_LEN, MEASUREMENT_COUNT, START_1, START_2};
use crate::error::Error;

/// The 28 payload bytes that follow the length word, exactly as received.
///
/// Layout: twelve big-endian measurement words, one reserved word, then the
/// big-endian checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; FRAME_LEN],
}

impl RawFrame {
    pub fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Decodes the `index`-th big-endian word of the payload.
    ///
    /// # Panics
    ///
    /// If `index` is 14 or above.
    pub fn field(&self, index: usize) -> u16 {
        let offset = 2 * index;
        (u16::from(self.bytes[offset]) << 8) | u16::from(self.bytes[offset + 1])
    }

    /// The checksum word carried at the end of the payload.
    pub fn stored_checksum(&self) -> u16 {
        self.field(CHECKSUM_OFFSET / 2)
    }

    /// Recomputes the running checksum: marker, length and every payload byte
    /// ahead of the checksum word.
    pub fn checksum(&self) -> u16 {
        self.bytes[..CHECKSUM_OFFSET]
            .iter()
            .fold(header_checksum(), |sum, &b| add_byte(sum, b))
    }
}

/// Sum of the marker and length bytes, where the running checksum starts.
pub fn header_checksum() -> u16 {
    [START_1, START_2, 0x00, FRAME_LEN as u8]
        .iter()
        .fold(0u16, |sum, &b| add_byte(sum, b))
}

pub(crate) fn add_byte(sum: u16, byte: u8) -> u16 {
    sum.wrapping_add(u16::from(byte))
}

/// A validated PMS5003 reading.
///
/// Mass concentrations are in µg/m³, particle counts are per 0.1 L of air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    /// PM1.0, standard particle (CF=1).
    pub pm1_0_cf: u16,
    /// PM2.5, standard particle (CF=1).
    pub pm2_5_cf: u16,
    /// PM10, standard particle (CF=1).
    pub pm10_cf: u16,
    /// PM1.0, atmospheric environment.
    pub pm1_0_atm: u16,
    /// PM2.5, atmospheric environment.
    pub pm2_5_atm: u16,
    /// PM10, atmospheric environment.
    pub pm10_atm: u16,
    /// Particles beyond 0.3 µm.
    pub gt0_3um: u16,
    /// Particles beyond 0.5 µm.
    pub gt0_5um: u16,
    /// Particles beyond 1.0 µm.
    pub gt1_0um: u16,
    /// Particles beyond 2.5 µm.
    pub gt2_5um: u16,
    /// Particles beyond 5.0 µm.
    pub gt5_0um: u16,
    /// Particles beyond 10 µm.
    pub gt10um: u16,
}

impl SensorReading {
    /// The twelve measurements in wire order.
    pub fn to_array(&self) -> [u16; MEASUREMENT_COUNT] {
        [
            self.pm1_0_cf,
            self.pm2_5_cf,
            self.pm10_cf,
            self.pm1_0_atm,
            self.pm2_5_atm,
            self.pm10_atm,
            self.gt0_3um,
            self.gt0_5um,
            self.gt1_0um,
            self.gt2_5um,
            self.gt5_0um,
            self.gt10um,
        ]
    }
}

/// Checks `computed` against the checksum carried by `frame` and, when they
/// agree, decodes the measurement words.
///
/// Pure: calling it again on the same frame gives the same answer.
pub fn validate_and_decode(frame: &RawFrame, computed: u16) -> Result<SensorReading, Error> {
    let expected = frame.stored_checksum();
    if expected != computed {
        error!(
            "Bad checksum: Calculated {:04X}, Received {:04X}. Frame: {:02X?}",
            computed,
            expected,
            frame.as_bytes()
        );
        return Err(Error::BadChecksum { expected, computed });
    }

    let reading = SensorReading {
        pm1_0_cf: frame.field(0),
        pm2_5_cf: frame.field(1),
        pm10_cf: frame.field(2),
        pm1_0_atm: frame.field(3),
        pm2_5_atm: frame.field(4),
        pm10_atm: frame.field(5),
        gt0_3um: frame.field(6),
        gt0_5um: frame.field(7),
        gt1_0um: frame.field(8),
        gt2_5um: frame.field(9),
        gt5_0um: frame.field(10),
        gt10um: frame.field(11),
    };
    debug!("Processed frame: {:?}", reading);
    Ok(reading)
}
