//! Core types and structures for the ARINC 429 word format

use crate::encoding::{parity_fold, reverse_bits, WireFrame, PARITY_DOMAIN_MASK};
use crate::error::{Result, TxError};

/// An ARINC 429 label (8 bits)
///
/// Identifies the data type carried by a word. Labels are conventionally
/// written in octal, and the standard transmits the label field bit-reversed
/// relative to normal byte significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label(u8);

impl Label {
    /// Create a new label; every 8-bit value is a valid label
    pub fn new(label: u8) -> Self {
        Label(label)
    }

    /// Get the raw label value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Get the label in its on-wire (bit-reversed) order
    pub fn permuted(&self) -> u8 {
        reverse_bits(self.0)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}

/// Source/Destination Identifier (2 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sdi(u8);

impl Sdi {
    /// Maximum SDI value (2-bit field)
    pub const MAX: u8 = 3;

    /// Create a new SDI, validating it's within range [0, 3]
    pub fn new(sdi: u8) -> Result<Self> {
        if sdi > Self::MAX {
            return Err(TxError::invalid_field(format!(
                "SDI {} out of range [0, {}]",
                sdi,
                Self::MAX
            )));
        }
        Ok(Sdi(sdi))
    }

    /// Get the raw SDI value
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// The 19-bit data payload of a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataField(u32);

impl DataField {
    /// Maximum payload value (19-bit field)
    pub const MAX: u32 = 0x7FFFF;

    /// Create a new data field, validating it fits in 19 bits
    pub fn new(data: u32) -> Result<Self> {
        if data > Self::MAX {
            return Err(TxError::invalid_field(format!(
                "Data {:#X} exceeds 19 bits",
                data
            )));
        }
        Ok(DataField(data))
    }

    /// Get the raw payload value
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Sign/Status Matrix (2 bits)
///
/// Variant values follow the BNR interpretation of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ssm {
    /// Failure warning (00)
    FailureWarning = 0,
    /// No computed data (01)
    NoComputedData = 1,
    /// Functional test (10)
    FunctionalTest = 2,
    /// Normal operation (11)
    NormalOperation = 3,
}

impl Ssm {
    /// Get the 2-bit field value
    pub fn as_bits(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Ssm {
    type Error = TxError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Ssm::FailureWarning),
            1 => Ok(Ssm::NoComputedData),
            2 => Ok(Ssm::FunctionalTest),
            3 => Ok(Ssm::NormalOperation),
            _ => Err(TxError::invalid_ssm(format!(
                "SSM {} exceeds 2 bits",
                value
            ))),
        }
    }
}

impl std::fmt::Display for Ssm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ssm::FailureWarning => write!(f, "Failure Warning"),
            Ssm::NoComputedData => write!(f, "No Computed Data"),
            Ssm::FunctionalTest => write!(f, "Functional Test"),
            Ssm::NormalOperation => write!(f, "Normal Operation"),
        }
    }
}

/// How the parity bit of a word is derived
///
/// Exactly one policy applies per encoded word; the policy is not retained
/// across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParityPolicy {
    /// Use the given bit verbatim
    Manual(bool),
    /// Make the total set-bit count of the word odd (the ARINC 429 default)
    OddAuto,
    /// Make the total set-bit count of the word even
    EvenAuto,
}

impl ParityPolicy {
    /// Derive the parity bit for a word whose bit 0 is still clear
    ///
    /// The computation domain is bits 0-30; bit 31 is excluded, matching the
    /// wire encoding this crate reproduces.
    pub fn parity_bit(&self, word: u32) -> u8 {
        match self {
            ParityPolicy::Manual(bit) => *bit as u8,
            ParityPolicy::OddAuto => 1 - parity_fold(word),
            ParityPolicy::EvenAuto => parity_fold(word),
        }
    }
}

/// A packed 32-bit ARINC 429 word
///
/// Layout:
/// - Bits 31-24: label, already permuted into on-wire bit order
/// - Bits 23-22: SDI
/// - Bits 21-3: 19-bit data payload
/// - Bits 2-1: SSM
/// - Bit 0: parity (the last bit shifted onto the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arinc429Word {
    /// 32-bit packed word value
    raw: u32,
}

const LABEL_SHIFT: u32 = 24;
const SDI_SHIFT: u32 = 22;
const DATA_SHIFT: u32 = 3;
const SSM_SHIFT: u32 = 1;

impl Arinc429Word {
    /// Pack protocol fields into a complete word, parity included
    ///
    /// Infallible: every combination of the typed field values is encodable.
    pub fn pack(label: Label, sdi: Sdi, data: DataField, ssm: Ssm, parity: ParityPolicy) -> Self {
        let body = ((label.permuted() as u32) << LABEL_SHIFT)
            | ((sdi.value() as u32) << SDI_SHIFT)
            | (data.value() << DATA_SHIFT)
            | ((ssm.as_bits() as u32) << SSM_SHIFT);
        let raw = body | parity.parity_bit(body) as u32;
        Arinc429Word { raw }
    }

    /// Create a word from an already-packed 32-bit value
    ///
    /// No parity check is performed; use [`Arinc429Word::has_odd_parity`] to
    /// verify words built this way.
    pub fn from_raw(raw: u32) -> Self {
        Arinc429Word { raw }
    }

    /// Get the raw packed word
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// Extract the label, undoing the on-wire permutation
    pub fn label(&self) -> Label {
        Label::new(reverse_bits((self.raw >> LABEL_SHIFT) as u8))
    }

    /// Extract the SDI field (bits 23-22)
    pub fn sdi(&self) -> Sdi {
        Sdi(((self.raw >> SDI_SHIFT) & 0x3) as u8)
    }

    /// Extract the 19-bit data payload (bits 21-3)
    pub fn data(&self) -> DataField {
        DataField((self.raw >> DATA_SHIFT) & DataField::MAX)
    }

    /// Extract the SSM field (bits 2-1)
    pub fn ssm(&self) -> Ssm {
        match (self.raw >> SSM_SHIFT) & 0x3 {
            0 => Ssm::FailureWarning,
            1 => Ssm::NoComputedData,
            2 => Ssm::FunctionalTest,
            _ => Ssm::NormalOperation,
        }
    }

    /// Extract the parity bit (bit 0)
    pub fn parity_bit(&self) -> bool {
        (self.raw & 1) != 0
    }

    /// Check whether bits 0-30, parity included, hold an odd set-bit count
    ///
    /// Counts set bits directly, independent of the XOR-fold used during
    /// packing, so the two computations cross-check each other.
    pub fn has_odd_parity(&self) -> bool {
        (self.raw & PARITY_DOMAIN_MASK).count_ones() % 2 == 1
    }

    /// Serialize the word into its 4-byte transmission buffer
    pub fn to_frame(&self) -> WireFrame {
        WireFrame::from_word(self.raw)
    }
}

impl std::fmt::Display for Arinc429Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Arinc429Word(label={}, sdi={}, data={:#07X}, ssm={}, raw={:#010X})",
            self.label(),
            self.sdi().value(),
            self.data().value(),
            self.ssm(),
            self.raw
        )
    }
}

/// Builder for ARINC 429 words
pub struct WordBuilder {
    label: Label,
    sdi: Sdi,
    data: DataField,
    ssm: Ssm,
    parity: ParityPolicy,
}

impl WordBuilder {
    /// Create a new builder with an all-zero payload and odd parity
    pub fn new(label: Label) -> Self {
        WordBuilder {
            label,
            sdi: Sdi(0),
            data: DataField(0),
            ssm: Ssm::NormalOperation,
            parity: ParityPolicy::OddAuto,
        }
    }

    /// Set the SDI field
    pub fn with_sdi(mut self, sdi: Sdi) -> Self {
        self.sdi = sdi;
        self
    }

    /// Set the data payload
    pub fn with_data(mut self, data: DataField) -> Self {
        self.data = data;
        self
    }

    /// Set the sign/status matrix
    pub fn with_ssm(mut self, ssm: Ssm) -> Self {
        self.ssm = ssm;
        self
    }

    /// Set the parity policy
    pub fn with_parity(mut self, parity: ParityPolicy) -> Self {
        self.parity = parity;
        self
    }

    /// Pack the configured fields into a word
    pub fn build(self) -> Arinc429Word {
        Arinc429Word::pack(self.label, self.sdi, self.data, self.ssm, self.parity)
    }
}
