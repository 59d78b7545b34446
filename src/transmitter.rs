//! Clocked byte-serial transmitter driver
//!
//! Drives a synchronous serial peripheral (an MSPIM-style USART or
//! equivalent) that generates its own clock alongside the data line. The
//! peripheral is abstracted behind [`TxPeripheral`] so the driver can run
//! against real hardware registers or a test double.

use log::{debug, trace};

use crate::encoding::WireFrame;
use crate::error::{Result, TxError};

/// Idle state of the generated clock line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClockPolarity {
    /// Clock idles low (CPOL = 0)
    IdleLow,
    /// Clock idles high (CPOL = 1)
    IdleHigh,
}

/// Fixed clock configuration for the transmit peripheral
///
/// The divisor is chosen once at initialization and is immutable for the
/// lifetime of the transmitter; it determines the wire bit rate as
/// `peripheral_hz / (2 * (divisor + 1))`. Transfers are 8 data bits,
/// shifted most-significant-bit-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockConfig {
    divisor: u16,
    polarity: ClockPolarity,
}

impl ClockConfig {
    /// ARINC 429 high-speed bit rate in bits per second
    pub const HIGH_SPEED_BIT_RATE: u32 = 100_000;

    /// ARINC 429 low-speed bit rate in bits per second
    pub const LOW_SPEED_BIT_RATE: u32 = 12_500;

    /// Create a configuration from a raw clock divisor
    ///
    /// The clock idles low, matching the ARINC 429 line-driver input.
    pub fn new(divisor: u16) -> Self {
        ClockConfig {
            divisor,
            polarity: ClockPolarity::IdleLow,
        }
    }

    /// Derive the divisor for a target bit rate from the peripheral clock
    ///
    /// The rate must be exactly achievable: `peripheral_hz` must be an even
    /// multiple of `bit_rate` and the resulting divisor must fit in 16 bits.
    pub fn from_bit_rate(peripheral_hz: u32, bit_rate: u32) -> Result<Self> {
        if bit_rate == 0 || peripheral_hz < 2 * bit_rate {
            return Err(TxError::invalid_clock(format!(
                "Bit rate {} not reachable from {} Hz",
                bit_rate, peripheral_hz
            )));
        }
        if peripheral_hz % (2 * bit_rate) != 0 {
            return Err(TxError::invalid_clock(format!(
                "Bit rate {} not an exact division of {} Hz",
                bit_rate, peripheral_hz
            )));
        }
        let divisor = peripheral_hz / (2 * bit_rate) - 1;
        if divisor > u16::MAX as u32 {
            return Err(TxError::invalid_clock(format!(
                "Divisor {} exceeds 16 bits",
                divisor
            )));
        }
        Ok(Self::new(divisor as u16))
    }

    /// Configuration for the ARINC 429 high-speed bus (100 kbit/s)
    pub fn high_speed(peripheral_hz: u32) -> Result<Self> {
        Self::from_bit_rate(peripheral_hz, Self::HIGH_SPEED_BIT_RATE)
    }

    /// Configuration for the ARINC 429 low-speed bus (12.5 kbit/s)
    pub fn low_speed(peripheral_hz: u32) -> Result<Self> {
        Self::from_bit_rate(peripheral_hz, Self::LOW_SPEED_BIT_RATE)
    }

    /// Get the raw divisor value
    pub fn divisor(&self) -> u16 {
        self.divisor
    }

    /// Get the clock idle polarity
    pub fn polarity(&self) -> ClockPolarity {
        self.polarity
    }

    /// The wire bit rate this configuration produces from a peripheral clock
    pub fn bit_rate(&self, peripheral_hz: u32) -> u32 {
        peripheral_hz / (2 * (self.divisor as u32 + 1))
    }
}

/// The clocked shift peripheral a [`Transmitter`] drives
///
/// Models an MSPIM-style USART: a one-byte data register feeding a shift
/// register, with two distinct status conditions. "Buffer empty" means the
/// data register can accept the next byte while the previous one is still
/// shifting; "shift complete" means the last bit of the last loaded byte has
/// fully left the shift register. Status reads take `&mut self` because
/// reading a hardware status register may have side effects.
pub trait TxPeripheral {
    /// Apply the clock configuration and enable the transmitter
    fn configure(&mut self, config: &ClockConfig);

    /// Whether the data register can accept a new byte
    fn buffer_empty(&mut self) -> bool;

    /// Load one byte into the data register
    ///
    /// Must only be called when [`TxPeripheral::buffer_empty`] last read
    /// true.
    fn load_byte(&mut self, byte: u8);

    /// Whether the final bit of the last byte has fully shifted out
    fn shift_complete(&mut self) -> bool;

    /// Clear a completion indication left over from an earlier frame
    fn clear_shift_complete(&mut self);
}

/// Blocking ARINC 429 frame transmitter
///
/// Sole owner of its peripheral for the lifetime of the value; there is no
/// shared access and no locking. Construction applies the clock
/// configuration exactly once.
pub struct Transmitter<P: TxPeripheral> {
    peripheral: P,
    config: ClockConfig,
}

impl<P: TxPeripheral> Transmitter<P> {
    /// Take ownership of a peripheral and configure it for transmission
    pub fn new(mut peripheral: P, config: ClockConfig) -> Self {
        peripheral.configure(&config);
        debug!("transmitter configured, divisor {}", config.divisor());
        Transmitter { peripheral, config }
    }

    /// Get the clock configuration applied at construction
    pub fn config(&self) -> ClockConfig {
        self.config
    }

    /// Release the underlying peripheral
    pub fn into_inner(self) -> P {
        self.peripheral
    }

    /// Shift a 4-byte frame onto the wire, blocking until fully sent
    ///
    /// Bytes are loaded back-to-back: each byte enters the data register the
    /// instant the previous byte's shift register empties, so there is no
    /// clock gap inside the frame. The call returns only once the last bit
    /// of the last byte has electrically left the shift register, so the
    /// caller may immediately start a delay or the next frame without
    /// corrupting the frame tail.
    ///
    /// The wait is unbounded: a stuck peripheral blocks forever. See
    /// [`Transmitter::try_transmit`] for a bounded variant.
    pub fn transmit(&mut self, frame: &WireFrame) {
        // A completion flag left set by the previous frame would end this
        // one early.
        self.peripheral.clear_shift_complete();

        for &byte in frame.bytes() {
            while !self.peripheral.buffer_empty() {}
            self.peripheral.load_byte(byte);
            trace!("loaded {:#04X}", byte);
        }

        while !self.peripheral.shift_complete() {}
        debug!("frame {} transmitted", frame);
    }

    /// Bounded-wait variant of [`Transmitter::transmit`]
    ///
    /// Identical byte-loading protocol, but each of the five waits (four
    /// buffer-empty waits and the final completion wait) polls at most
    /// `poll_budget` times before giving up. On timeout the frame may be
    /// partially shifted; the peripheral should be reconfigured before
    /// reuse.
    pub fn try_transmit(&mut self, frame: &WireFrame, poll_budget: u32) -> Result<()> {
        self.peripheral.clear_shift_complete();

        for (i, &byte) in frame.bytes().iter().enumerate() {
            let mut polls = 0;
            while !self.peripheral.buffer_empty() {
                polls += 1;
                if polls >= poll_budget {
                    return Err(TxError::timeout(format!(
                        "Buffer never emptied for byte {} within {} polls",
                        i, poll_budget
                    )));
                }
            }
            self.peripheral.load_byte(byte);
            trace!("loaded {:#04X}", byte);
        }

        let mut polls = 0;
        while !self.peripheral.shift_complete() {
            polls += 1;
            if polls >= poll_budget {
                return Err(TxError::timeout(format!(
                    "Final shift incomplete after {} polls",
                    poll_budget
                )));
            }
        }
        debug!("frame {} transmitted", frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Peripheral double whose conditions are always satisfied
    struct ReadyUsart {
        configured_divisor: Option<u16>,
        loaded: Vec<u8>,
        clears: u32,
    }

    impl ReadyUsart {
        fn new() -> Self {
            ReadyUsart {
                configured_divisor: None,
                loaded: Vec::new(),
                clears: 0,
            }
        }
    }

    impl TxPeripheral for ReadyUsart {
        fn configure(&mut self, config: &ClockConfig) {
            self.configured_divisor = Some(config.divisor());
        }

        fn buffer_empty(&mut self) -> bool {
            true
        }

        fn load_byte(&mut self, byte: u8) {
            self.loaded.push(byte);
        }

        fn shift_complete(&mut self) -> bool {
            true
        }

        fn clear_shift_complete(&mut self) {
            self.clears += 1;
        }
    }

    #[test]
    fn test_clock_config_high_speed() {
        // 16 MHz peripheral clock: 16e6 / (2 * 80) = 100 kHz
        let config = ClockConfig::high_speed(16_000_000).unwrap();
        assert_eq!(config.divisor(), 79);
        assert_eq!(config.bit_rate(16_000_000), 100_000);
        assert_eq!(config.polarity(), ClockPolarity::IdleLow);
    }

    #[test]
    fn test_clock_config_low_speed() {
        let config = ClockConfig::low_speed(16_000_000).unwrap();
        assert_eq!(config.divisor(), 639);
        assert_eq!(config.bit_rate(16_000_000), 12_500);
    }

    #[test]
    fn test_clock_config_rejects_inexact_rate() {
        assert!(ClockConfig::from_bit_rate(16_000_000, 0).is_err());
        assert!(ClockConfig::from_bit_rate(16_000_000, 48_000).is_err());
        assert!(ClockConfig::from_bit_rate(100, 100_000).is_err());
    }

    #[test]
    fn test_new_configures_once() {
        let tx = Transmitter::new(ReadyUsart::new(), ClockConfig::new(79));
        assert_eq!(tx.into_inner().configured_divisor, Some(79));
    }

    #[test]
    fn test_transmit_loads_whole_frame() {
        let mut tx = Transmitter::new(ReadyUsart::new(), ClockConfig::new(79));
        let frame = WireFrame::from_word(0xDEAD_BEEF);

        tx.transmit(&frame);

        let usart = tx.into_inner();
        assert_eq!(usart.loaded, frame.bytes().to_vec());
        assert_eq!(usart.clears, 1);
    }

    #[test]
    fn test_consecutive_frames_clear_completion_each_time() {
        let mut tx = Transmitter::new(ReadyUsart::new(), ClockConfig::new(79));
        let frame = WireFrame::from_word(0x1234_5678);

        tx.transmit(&frame);
        tx.transmit(&frame);

        let usart = tx.into_inner();
        assert_eq!(usart.loaded.len(), 2 * WireFrame::LEN);
        assert_eq!(usart.clears, 2);
    }

    #[test]
    fn test_try_transmit_ok_when_ready() {
        let mut tx = Transmitter::new(ReadyUsart::new(), ClockConfig::new(79));
        let frame = WireFrame::from_word(0xDEAD_BEEF);

        assert!(tx.try_transmit(&frame, 1).is_ok());
        assert_eq!(tx.into_inner().loaded.len(), WireFrame::LEN);
    }

    /// Peripheral double that never reaches either condition
    struct StuckUsart;

    impl TxPeripheral for StuckUsart {
        fn configure(&mut self, _config: &ClockConfig) {}

        fn buffer_empty(&mut self) -> bool {
            false
        }

        fn load_byte(&mut self, _byte: u8) {
            panic!("load on a full buffer");
        }

        fn shift_complete(&mut self) -> bool {
            false
        }

        fn clear_shift_complete(&mut self) {}
    }

    #[test]
    fn test_try_transmit_times_out() {
        let mut tx = Transmitter::new(StuckUsart, ClockConfig::new(79));
        let frame = WireFrame::from_word(0);

        let result = tx.try_transmit(&frame, 16);
        assert!(matches!(result, Err(TxError::Timeout(_))));
    }
}
