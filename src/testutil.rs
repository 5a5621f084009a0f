// Scripted serial port and clock for driving the protocol in tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_io_async::{ErrorKind, ErrorType, Read};

use crate::clock::Clock;
use crate::constants::{CHECKSUM_OFFSET, FRAME_LEN, START_1, START_2};

pub(crate) enum Step {
    Data(Vec<u8>),
    Idle,
    Fail(ErrorKind),
}

/// Non-blocking serial mock: each `read` consumes the next scripted step.
/// Once the script runs out every read reports "no data yet".
pub(crate) struct ScriptedSerial {
    steps: VecDeque<Step>,
    consumed: usize,
    reads: usize,
}

impl ScriptedSerial {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            consumed: 0,
            reads: 0,
        }
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(vec![Step::Data(bytes.to_vec())])
    }

    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads
    }
}

impl ErrorType for ScriptedSerial {
    type Error = ErrorKind;
}

impl Read for ScriptedSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.reads += 1;
        match self.steps.pop_front() {
            None | Some(Step::Idle) => Ok(0),
            Some(Step::Fail(kind)) => Err(kind),
            Some(Step::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.steps.push_front(Step::Data(data.split_off(n)));
                }
                self.consumed += n;
                Ok(n)
            }
        }
    }
}

/// Clock that advances by a fixed step every time it is read.
pub(crate) struct StepClock {
    now: Cell<u64>,
    step: u64,
}

impl StepClock {
    pub(crate) fn new(step: u64) -> Self {
        Self::starting_at(0, step)
    }

    pub(crate) fn starting_at(origin: u64, step: u64) -> Self {
        Self {
            now: Cell::new(origin),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Encodes a payload carrying `fields` (reserved word zero) with a correct checksum.
pub(crate) fn encode_payload(fields: &[u16; 12]) -> [u8; FRAME_LEN] {
    let mut payload = [0u8; FRAME_LEN];
    for (i, value) in fields.iter().enumerate() {
        payload[2 * i..2 * i + 2].copy_from_slice(&value.to_be_bytes());
    }
    let sum = [START_1, START_2, 0x00, FRAME_LEN as u8]
        .iter()
        .chain(&payload[..CHECKSUM_OFFSET])
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)));
    payload[CHECKSUM_OFFSET..].copy_from_slice(&sum.to_be_bytes());
    payload
}

/// Marker, length and payload as the sensor sends them.
pub(crate) fn encode_frame(fields: &[u16; 12]) -> Vec<u8> {
    let mut wire = vec![START_1, START_2, 0x00, FRAME_LEN as u8];
    wire.extend_from_slice(&encode_payload(fields));
    wire
}

pub(crate) const SAMPLE_FIELDS: [u16; 12] = [
    12, 18, 21, 11, 17, 20, 2_145, 640, 118, 9, 3, 1,
];
