//! Frame assembly, the encode direction of the decoder
//!
//! Fills in the length field and checksum so callers only supply the header
//! codes and the data domain.
//!
//! # Example
//!
//! ```rust
//! use esam_protocol::FrameBuilder;
//!
//! let frame = FrameBuilder::command(0x00, 0x02)
//!     .data([0x12, 0x34, 0x56])
//!     .build()
//!     .unwrap();
//! assert_eq!(frame, "E9000500021234568CE6");
//! ```

use crate::error::BuildError;
use crate::frame::{
    checksum, is_main_function, ACK_FLAG, END_MARKER, MAX_COMMAND_CODE, START_MARKER,
    UPGRADE_CODES, UPGRADE_FUNCTION,
};
use crate::hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Command { code: u8 },
    Ack { code: u8, status: u8 },
    UpgradeEnd,
}

/// Builder for command, acknowledgement and upgrade-end frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuilder {
    main_function: u8,
    header: Header,
    data: Vec<u8>,
}

impl FrameBuilder {
    /// Command frame; `code` is the low 7 bits of the command byte
    pub fn command(main_function: u8, code: u8) -> Self {
        Self {
            main_function,
            header: Header::Command { code },
            data: Vec::new(),
        }
    }

    /// Acknowledgement frame; the ack flag is set on `code` if missing
    pub fn ack(main_function: u8, code: u8, status: u8) -> Self {
        Self {
            main_function,
            header: Header::Ack { code, status },
            data: Vec::new(),
        }
    }

    /// Upgrade-end acknowledgement: `F == FE` with no command byte
    pub fn upgrade_end() -> Self {
        Self {
            main_function: UPGRADE_FUNCTION,
            header: Header::UpgradeEnd,
            data: Vec::new(),
        }
    }

    /// Replace the data domain
    pub fn data(mut self, data: impl AsRef<[u8]>) -> Self {
        self.data = data.as_ref().to_vec();
        self
    }

    /// Assemble the frame bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        if !is_main_function(self.main_function) {
            return Err(BuildError::UnknownMainFunction(self.main_function));
        }

        let mut body = vec![self.main_function];
        match self.header {
            Header::Command { code } => {
                check_code(code)?;
                body.push(code);
            }
            Header::Ack { code, status } => {
                check_code(code & !ACK_FLAG)?;
                body.push(code | ACK_FLAG);
                body.push(status);
            }
            Header::UpgradeEnd => {}
        }
        body.extend_from_slice(&self.data);

        let length = u16::try_from(body.len()).map_err(|_| BuildError::DataTooLong(self.data.len()))?;
        let mut frame = Vec::with_capacity(body.len() + 5);
        frame.push(START_MARKER);
        frame.extend_from_slice(&length.to_be_bytes());
        frame.extend_from_slice(&body);
        frame.push(checksum(&frame));
        frame.push(END_MARKER);

        // The byte after F must not read as an upgrade code, or the frame
        // would be taken for an ordinary upgrade command
        if self.header == Header::UpgradeEnd && UPGRADE_CODES.contains(&frame[4]) {
            return Err(BuildError::AmbiguousUpgradeEnd(frame[4]));
        }

        Ok(frame)
    }

    /// Assemble the frame as uppercase hex
    pub fn build(&self) -> Result<String, BuildError> {
        self.to_bytes().map(|bytes| hex::encode_bytes(&bytes))
    }
}

fn check_code(code: u8) -> Result<(), BuildError> {
    if code > MAX_COMMAND_CODE {
        return Err(BuildError::InvalidCommandCode(code));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::validate;

    #[test]
    fn test_command_frame() {
        let frame = FrameBuilder::command(0x00, 0x02)
            .data([0x12, 0x34, 0x56])
            .build()
            .unwrap();
        assert_eq!(frame, "E9000500021234568CE6");
    }

    #[test]
    fn test_ack_sets_flag() {
        let with_flag = FrameBuilder::ack(0x00, 0x82, 0x01).build().unwrap();
        let without_flag = FrameBuilder::ack(0x00, 0x02, 0x01).build().unwrap();
        assert_eq!(with_flag, without_flag);
        assert_eq!(with_flag, "E900030082016FE6");
    }

    #[test]
    fn test_upgrade_end() {
        let frame = FrameBuilder::upgrade_end().data([0x12]).build().unwrap();
        assert_eq!(frame, "E90002FE12FBE6");
        assert!(validate(&frame).unwrap().is_fe03_special());
    }

    #[test]
    fn test_upgrade_end_rejects_ambiguous_data() {
        let err = FrameBuilder::upgrade_end().data([0x02, 0x00]).build();
        assert_eq!(err, Err(BuildError::AmbiguousUpgradeEnd(0x02)));
    }

    #[test]
    fn test_rejects_bad_header() {
        assert_eq!(
            FrameBuilder::command(0x07, 0x01).build(),
            Err(BuildError::UnknownMainFunction(0x07))
        );
        assert_eq!(
            FrameBuilder::command(0x00, 0x0F).build(),
            Err(BuildError::InvalidCommandCode(0x0F))
        );
    }

    #[test]
    fn test_rejects_oversized_data() {
        let err = FrameBuilder::command(0x00, 0x04).data(vec![0u8; 0x10000]).build();
        assert_eq!(err, Err(BuildError::DataTooLong(0x10000)));
    }
}
