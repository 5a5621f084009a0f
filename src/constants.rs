// START_1 and START_2 are the two bytes opening every frame sent by the sensor ("BM").
pub const START_1: u8 = 0x42;
pub const START_2: u8 = 0x4D;

// START_OF_FRAME is the marker as read off the wire without byte swapping.
pub const START_OF_FRAME: u16 = 19778;

// FRAME_LEN is the only payload length the sensor declares: twelve measurement
// words, one reserved word and the checksum word.
pub const FRAME_LEN: usize = 28;

// CHECKSUM_OFFSET is where the checksum word starts inside the payload.
pub const CHECKSUM_OFFSET: usize = FRAME_LEN - 2;

// MEASUREMENT_COUNT is the number of measurement words at the head of the payload.
pub const MEASUREMENT_COUNT: usize = 12;

// DEFAULT_TIMEOUT_MS bounds one whole acquisition, from marker search to checksum.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

// DEFAULT_BAUD_RATE is the factory baud rate of the sensor (8N1).
pub const DEFAULT_BAUD_RATE: u32 = 9_600;

// DEFAULT_DEVICE is where the sensor usually shows up on a Raspberry Pi.
pub const DEFAULT_DEVICE: &str = "/dev/serial0";
