//! Bit-level primitives and wire-order serialization for ARINC 429
//!
//! ARINC 429 words leave the device least-significant-bit-first per byte,
//! while the shift peripheral clocks bits out most-significant-bit-first.
//! The single primitive underlying both the label permutation and the
//! wire-order fixup is the 8-bit mirror [`reverse_bits`].

/// Mask selecting bits 0-30, the parity computation domain
pub const PARITY_DOMAIN_MASK: u32 = 0x7FFF_FFFF;

/// Mirror the bits of a byte (bit i ↔ bit 7−i)
///
/// Used twice in the transmit path: once to permute the label field into its
/// on-wire order, and once per low byte to convert the peripheral's
/// MSB-first shift order into the LSB-first order the bus requires.
pub fn reverse_bits(byte: u8) -> u8 {
    let mut x = byte;
    x = (x >> 4) | (x << 4);
    x = ((x & 0xCC) >> 2) | ((x & 0x33) << 2);
    x = ((x & 0xAA) >> 1) | ((x & 0x55) << 1);
    x
}

/// XOR-fold bits 0-30 of a word down to a single bit
///
/// Returns the population-count-mod-2 of the parity domain: 1 if the number
/// of set bits in bits 0-30 is odd, 0 if it is even. Bit 31 is masked out
/// before folding.
pub fn parity_fold(word: u32) -> u8 {
    let mut x = word & PARITY_DOMAIN_MASK;
    x ^= x >> 16;
    x ^= x >> 8;
    x ^= x >> 4;
    x ^= x >> 2;
    x ^= x >> 1;
    (x & 1) as u8
}

/// A 4-byte ARINC 429 transmission buffer, ready for the shift peripheral
///
/// Byte order is most-significant word byte first. Byte 0 carries the label,
/// already permuted during packing, and is stored verbatim; bytes 1-3 are
/// individually bit-mirrored so the peripheral's MSB-first shift emits them
/// LSB-first on the wire. Hand the frame to the transmitter unchanged; no
/// further bit manipulation is required downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WireFrame([u8; 4]);

impl WireFrame {
    /// Number of bytes in one frame
    pub const LEN: usize = 4;

    /// Serialize a packed 32-bit word into wire byte order
    pub fn from_word(word: u32) -> Self {
        WireFrame([
            (word >> 24) as u8,
            reverse_bits((word >> 16) as u8),
            reverse_bits((word >> 8) as u8),
            reverse_bits(word as u8),
        ])
    }

    /// Get the frame bytes in transmission order
    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl AsRef<[u8]> for WireFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for WireFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:02X} {:02X} {:02X} {:02X}]",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}
