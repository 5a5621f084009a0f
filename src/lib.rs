#![cfg_attr(not(any(test, feature = "std")), no_std)]

use embedded_io_async::Read;
use log::{debug, warn};

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod clock;
pub use clock::*;

mod frame;
pub use frame::*;

mod word;
pub use word::word_from_bytes;

#[cfg(test)]
mod testutil;

use clock::Deadline;
use word::WordReader;

/// Represents a PMS5003 particulate matter sensor.
///
/// The sensor streams frames on its own once powered; this driver finds the
/// next complete frame in that stream, checks it and decodes it.
///
/// # Type Parameters
///
/// * `Serial`: The serial interface the sensor is wired to. It must implement
///   `embedded_io_async::Read` and behave non-blocking: a read returning zero
///   bytes means no data yet. Pass `&mut port` to keep ownership of the port.
/// * `C`: The [`Clock`] used to bound each acquisition.
pub struct Pms5003<Serial, C> {
    serial: Serial,
    clock: C,
    config: Config,
}

impl<S, C> Pms5003<S, C>
where
    S: Read,
    C: Clock,
{
    /// Creates a new `Pms5003` driver over an already opened and configured
    /// serial interface (9600 baud, 8N1).
    pub fn new(serial: S, clock: C, config: Config) -> Self {
        Self {
            serial,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the serial interface and clock.
    pub fn release(self) -> (S, C) {
        (self.serial, self.clock)
    }

    /// Reads a single validated reading from the sensor.
    ///
    /// This involves:
    /// 1. Scanning the stream for the start of frame marker.
    /// 2. Checking the declared frame length.
    /// 3. Collecting the payload while summing every byte.
    /// 4. Comparing that sum with the checksum carried by the frame.
    ///
    /// All of it must happen within the configured timeout. No reading is
    /// returned unless every step succeeded.
    pub async fn acquire_reading(&mut self) -> Result<SensorReading, Error> {
        let (frame, checksum) = self.assemble_frame().await.map_err(|e| {
            warn!("Failed to assemble a frame: {:?}", e);
            e
        })?;
        validate_and_decode(&frame, checksum)
    }

    /// Synchronizes on the next start of frame marker and collects the payload.
    ///
    /// Returns the payload together with the running checksum over marker,
    /// length and payload (checksum word excluded).
    ///
    /// The scan is word aligned and takes the first `0x42 0x4D` it sees as the
    /// start of a frame, even when those bytes belong to the payload of a
    /// frame joined midway.
    pub async fn assemble_frame(&mut self) -> Result<(RawFrame, u16), Error> {
        let deadline = Deadline::start(&self.clock, self.config.timeout_ms());
        let mut reader = WordReader::new(&mut self.serial, &deadline);

        loop {
            deadline.check()?;
            // Zero (no data yet) and stray words are dropped alike.
            if reader.read_word(false).await? == START_OF_FRAME {
                break;
            }
        }
        debug!("Start of frame found after {} ms", deadline.elapsed_ms());

        let length_bytes = reader.next_pair().await?;
        let length = word_from_bytes(length_bytes, true);
        if usize::from(length) != FRAME_LEN {
            log::error!(
                "Unexpected frame length {} (expected {})",
                length,
                FRAME_LEN
            );
            return Err(Error::UnexpectedLength(length));
        }

        let mut checksum = [START_1, START_2, length_bytes[0], length_bytes[1]]
            .iter()
            .fold(0u16, |sum, &b| frame::add_byte(sum, b));
        let mut bytes = [0u8; FRAME_LEN];
        for offset in (0..FRAME_LEN).step_by(2) {
            let pair = reader.next_pair().await?;
            bytes[offset..offset + 2].copy_from_slice(&pair);
            if offset < CHECKSUM_OFFSET {
                checksum = pair
                    .iter()
                    .fold(checksum, |sum, &b| frame::add_byte(sum, b));
            }
        }

        debug!(
            "Assembled frame in {} ms: {:02X?}",
            deadline.elapsed_ms(),
            bytes
        );
        Ok((RawFrame::new(bytes), checksum))
    }
}
