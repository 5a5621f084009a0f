//! Reads the sensor's byte stream two bytes at a time.
//!
//! The port is expected to be non-blocking: a read returning zero bytes means
//! nothing has arrived yet, not end of stream.

use embedded_io_async::{Error as _, Read};
use log::debug;

use crate::clock::{Clock, Deadline};
use crate::error::Error;

/// Interprets two bytes, in arrival order, as a 16-bit word.
///
/// Unswapped the first byte is the low byte, which is how a little-endian host
/// sees the pair in memory; the start marker `0x42 0x4D` reads as 19778.
/// Swapped the first byte is the high byte, matching the sensor's big-endian
/// fields: `0x00 0x1C` reads as 28.
pub fn word_from_bytes(bytes: [u8; 2], swap: bool) -> u16 {
    let (high, low) = if swap {
        (bytes[0], bytes[1])
    } else {
        (bytes[1], bytes[0])
    };
    (u16::from(high) << 8) | u16::from(low)
}

pub(crate) struct WordReader<'a, 'c, S, C: Clock> {
    serial: &'a mut S,
    deadline: &'a Deadline<'c, C>,
}

impl<'a, 'c, S, C> WordReader<'a, 'c, S, C>
where
    S: Read,
    C: Clock,
{
    pub(crate) fn new(serial: &'a mut S, deadline: &'a Deadline<'c, C>) -> Self {
        Self { serial, deadline }
    }

    /// Reads one word. If nothing is available yet the word is zero; that is
    /// not an error and the caller is expected to poll again.
    pub(crate) async fn read_word(&mut self, swap: bool) -> Result<u16, Error> {
        Ok(self
            .read_pair()
            .await?
            .map_or(0, |bytes| word_from_bytes(bytes, swap)))
    }

    /// Polls until two bytes have actually arrived.
    pub(crate) async fn next_pair(&mut self) -> Result<[u8; 2], Error> {
        loop {
            self.deadline.check()?;
            if let Some(bytes) = self.read_pair().await? {
                return Ok(bytes);
            }
        }
    }

    // One attempt at a word. `None` when the port had nothing; a single byte
    // is completed before returning so the stream stays word aligned.
    async fn read_pair(&mut self) -> Result<Option<[u8; 2]>, Error> {
        let mut bytes = [0u8; 2];
        let mut filled = self.receive(&mut bytes).await?;
        if filled == 0 {
            return Ok(None);
        }
        while filled < bytes.len() {
            self.deadline.check()?;
            filled += self.receive(&mut bytes[filled..]).await?;
        }
        Ok(Some(bytes))
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.serial.read(buf).await.map_err(|e| {
            debug!("Serial read error: {:?}", e);
            Error::ReadFailure(e.kind())
        })
    }
}
