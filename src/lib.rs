//! # ARINC 429 Transmit Driver
//!
//! A Rust library for encoding ARINC 429 data words and shifting them onto a
//! clocked synchronous serial line.
//!
//! ARINC 429 is an avionics point-to-point serial bus with a fixed 32-bit
//! word format (label, SDI, data, SSM, parity). This library provides:
//!
//! - Word encoding: field packing, label bit-reversal, parity computation
//! - Wire-order serialization into a 4-byte transmission buffer
//! - A blocking transmitter driving an MSPIM-style clocked shift peripheral
//!
//! The analog line-driver stage, receive-side decoding, and label scheduling
//! policy are outside this crate's scope; the boundary is the clock+data
//! byte-shift peripheral, abstracted by [`TxPeripheral`].
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```
//! use arinc429_tx::{Arinc429Word, DataField, Label, ParityPolicy, Sdi, Ssm};
//!
//! let word = Arinc429Word::pack(
//!     Label::new(0x5B),
//!     Sdi::new(0x01)?,
//!     DataField::new(0x760FF)?,
//!     Ssm::NormalOperation,
//!     ParityPolicy::OddAuto,
//! );
//! let frame = word.to_frame();
//! println!("{} -> {}", word, frame);
//! # Ok::<(), arinc429_tx::TxError>(())
//! ```

pub mod core;
pub mod encoding;
pub mod error;
pub mod transmitter;

pub use self::core::{Arinc429Word, DataField, Label, ParityPolicy, Sdi, Ssm, WordBuilder};
pub use encoding::WireFrame;
pub use error::{Result, TxError};
pub use transmitter::{ClockConfig, ClockPolarity, Transmitter, TxPeripheral};

/// ARINC 429 specification constants
pub mod spec {
    /// Word length in bits
    pub const WORD_LENGTH: usize = 32;

    /// Bytes per transmitted frame
    pub const FRAME_BYTES: usize = 4;

    /// High-speed bus bit rate in bits per second
    pub const HIGH_SPEED_BIT_RATE: u32 = 100_000;

    /// Low-speed bus bit rate in bits per second
    pub const LOW_SPEED_BIT_RATE: u32 = 12_500;

    /// Label field width in bits
    pub const LABEL_BITS: usize = 8;

    /// Data payload width in bits
    pub const DATA_BITS: usize = 19;
}
