use core::fmt;

use embedded_io_async::ErrorKind;

/// Errors returned while acquiring a reading. All of them end the current
/// acquisition; retrying is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial transport reported an error.
    ReadFailure(ErrorKind),
    /// No complete frame was received before the deadline.
    Timeout,
    /// The frame declared a payload length other than 28 bytes.
    UnexpectedLength(u16),
    /// The checksum stored in the frame does not match the bytes received.
    BadChecksum {
        /// Checksum carried by the frame.
        expected: u16,
        /// Checksum computed over marker, length and payload.
        computed: u16,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadFailure(kind) => write!(f, "serial receive error ({:?})", kind),
            Error::Timeout => f.write_str("timed out waiting for a complete frame"),
            Error::UnexpectedLength(len) => {
                write!(f, "unexpected frame length {} (expected 28)", len)
            }
            Error::BadChecksum { expected, computed } => write!(
                f,
                "bad checksum: frame carries {:#06X}, computed {:#06X}",
                expected, computed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        assert_eq!(
            Error::UnexpectedLength(27).to_string(),
            "unexpected frame length 27 (expected 28)"
        );
        assert_eq!(
            Error::BadChecksum {
                expected: 0x01AB,
                computed: 0x01AC
            }
            .to_string(),
            "bad checksum: frame carries 0x01AB, computed 0x01AC"
        );
        assert_eq!(
            Error::ReadFailure(ErrorKind::BrokenPipe).to_string(),
            "serial receive error (BrokenPipe)"
        );
    }
}
