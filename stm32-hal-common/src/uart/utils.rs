//! Useful USART types

use fugit::HertzU32;

/// Word length (USART_CR1, M)
///
/// When parity is enabled, the parity bit takes the place of the most
/// significant data bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordLength {
    /// 8 bits
    Eight,
    /// 9 bits
    Nine,
}

/// Which halves of the line are enabled (USART_CR1, TE and RE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Transmitter only
    TxOnly,
    /// Receiver only
    RxOnly,
    /// Transmitter and receiver
    TxRx,
}

impl Mode {
    /// Is the transmitter enabled in this mode?
    pub const fn transmits(self) -> bool {
        matches!(self, Mode::TxOnly | Mode::TxRx)
    }

    /// Is the receiver enabled in this mode?
    pub const fn receives(self) -> bool {
        matches!(self, Mode::RxOnly | Mode::TxRx)
    }
}

/// Parity
///
/// The "none" state of parity is represented with the Option type (None).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// Odd parity
    Odd,
    /// Even parity
    Even,
}

/// Hardware flow control (USART_CR3, RTSE and CTSE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    /// No flow control
    None,
    /// RTS only
    Rts,
    /// CTS only
    Cts,
    /// RTS and CTS
    RtsCts,
}

impl FlowControl {
    /// RTS output enabled?
    pub const fn rts(self) -> bool {
        matches!(self, FlowControl::Rts | FlowControl::RtsCts)
    }

    /// CTS input enabled?
    pub const fn cts(self) -> bool {
        matches!(self, FlowControl::Cts | FlowControl::RtsCts)
    }
}

/// Stop bits (USART_CR2, STOP)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 bit
    One,
    /// 0.5 bit
    Half,
    /// 2 bits
    Two,
    /// 1.5 bits
    OneAndHalf,
}

impl StopBits {
    /// Encoding of the STOP field.
    pub const fn bits(self) -> u8 {
        match self {
            StopBits::One => 0b00,
            StopBits::Half => 0b01,
            StopBits::Two => 0b10,
            StopBits::OneAndHalf => 0b11,
        }
    }
}

/// A struct holding the configuration for an USART device.
///
/// The `Default` implementation implements the following values:
/// ```ignore
/// # // can't actually create this with the non_exhaustive attribute
/// UsartConfig {
///    baudrate: HertzU32::from_raw(115_200),
///    word_length: WordLength::Eight,
///    mode: Mode::TxRx,
///    parity: None,
///    flow_control: FlowControl::None,
///    stop_bits: StopBits::One,
///}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct UsartConfig {
    /// The baudrate the usart will run at.
    pub baudrate: HertzU32,

    /// The word length the usart should be configured to.
    pub word_length: WordLength,

    /// Whether transmitter, receiver or both are enabled.
    pub mode: Mode,

    /// The parity that this usart should have
    pub parity: Option<Parity>,

    /// Hardware flow control lines to enable.
    pub flow_control: FlowControl,

    /// The amount of stop bits the usart should be configured to.
    pub stop_bits: StopBits,
}

impl UsartConfig {
    /// Create a new instance of UsartConfig
    ///
    /// Transmitter and receiver are both enabled and flow control is off; use
    /// [`with_mode`](Self::with_mode) and
    /// [`with_flow_control`](Self::with_flow_control) to change that.
    pub const fn new(
        baudrate: HertzU32,
        word_length: WordLength,
        parity: Option<Parity>,
        stop_bits: StopBits,
    ) -> UsartConfig {
        UsartConfig {
            baudrate,
            word_length,
            mode: Mode::TxRx,
            parity,
            flow_control: FlowControl::None,
            stop_bits,
        }
    }

    /// Replace the transfer mode.
    pub const fn with_mode(mut self, mode: Mode) -> UsartConfig {
        self.mode = mode;
        self
    }

    /// Replace the hardware flow control setting.
    pub const fn with_flow_control(mut self, flow_control: FlowControl) -> UsartConfig {
        self.flow_control = flow_control;
        self
    }
}

impl Default for UsartConfig {
    fn default() -> Self {
        Self::new(
            HertzU32::from_raw(115_200),
            WordLength::Eight,
            None,
            StopBits::One,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugit::RateExtU32;

    #[test]
    fn default_is_115200_8n1() {
        let config = UsartConfig::default();
        assert_eq!(config.baudrate, 115_200.Hz::<1, 1>());
        assert_eq!(config.word_length, WordLength::Eight);
        assert_eq!(config.parity, None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.mode, Mode::TxRx);
        assert_eq!(config.flow_control, FlowControl::None);
    }

    #[test]
    fn builders_only_touch_their_field() {
        let config = UsartConfig::new(9600.Hz(), WordLength::Nine, Some(Parity::Even), StopBits::Two)
            .with_mode(Mode::RxOnly)
            .with_flow_control(FlowControl::Cts);
        assert_eq!(config.baudrate, 9600.Hz::<1, 1>());
        assert_eq!(config.word_length, WordLength::Nine);
        assert_eq!(config.parity, Some(Parity::Even));
        assert_eq!(config.stop_bits, StopBits::Two);
        assert!(!config.mode.transmits());
        assert!(config.mode.receives());
        assert!(config.flow_control.cts());
        assert!(!config.flow_control.rts());
    }

    #[test]
    fn stop_bit_encoding() {
        assert_eq!(StopBits::One.bits(), 0b00);
        assert_eq!(StopBits::Half.bits(), 0b01);
        assert_eq!(StopBits::Two.bits(), 0b10);
        assert_eq!(StopBits::OneAndHalf.bits(), 0b11);
    }
}
