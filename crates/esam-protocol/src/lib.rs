//! ESAM Frame Decoder Library
//!
//! This crate validates and decodes the hex frames exchanged with a
//! security unit (ESAM) used in electricity metering field work:
//!
//! - **Validation**: byte integrity, then format (markers, length field,
//!   header codes), then checksum, stopping at the first failure
//! - **Decoding**: an ordered list of fields, each with its raw hex, decoded
//!   value, short label and long description
//! - **Building**: assembling well-formed frames from header codes and data
//!
//! # Architecture
//!
//! Decoding is a single top-down pass:
//! - [`frame`] normalises the input, validates it and extracts the header
//! - [`meaning`] maps header bytes and coded values to text
//! - [`layout`] holds one field layout per (main function, command/ack) pair
//! - [`decoder`] ties them together and returns a [`DecodeOutcome`]
//!
//! The same command code is laid out differently in a command frame and in
//! its acknowledgement: `00 02` carries an operator password, `00 82` the
//! number of attempts left.
//!
//! # Example
//!
//! ```rust
//! use esam_protocol::{decode, DecodeOutcome};
//!
//! let outcome = decode("E9 00 05 00 02 12 34 56 8C E6");
//! let fields = outcome.fields().unwrap();
//! assert_eq!(fields[4].meaning, "操作员密码");
//! assert_eq!(fields[4].origin, "123456");
//!
//! assert_eq!(decode("E9000500021234568DE6"), DecodeOutcome::ChecksumFailed);
//! ```

pub mod builder;
pub mod decoder;
pub mod display;
pub mod error;
pub mod field;
pub mod frame;
pub mod hex;
pub mod layout;
pub mod meaning;

pub use builder::FrameBuilder;
pub use decoder::{decode, decode_validated, DecodeOutcome};
pub use error::{BuildError, FrameError};
pub use field::ResultField;
pub use frame::{FrameContext, ValidatedFrame};
