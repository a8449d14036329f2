use core::fmt;

use stm32_hal_common::uart::InvalidBaudRate;

#[doc(inline)]
pub use stm32_hal_common::uart::{
    compute_divisor, Divisor, FlowControl, Mode, Parity, StopBits, UsartConfig, WordLength,
};

/// Error returned when a configuration cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The clock source could not tell the frequency of the instance's bus.
    ClockUnavailable,
    /// The baud rate cannot be generated from the bus clock.
    BaudOutOfRange,
    /// RTS/CTS requested on an instance without flow control lines.
    FlowControlUnsupported,
}

impl From<InvalidBaudRate> for ConfigError {
    fn from(_: InvalidBaudRate) -> Self {
        ConfigError::BaudOutOfRange
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ClockUnavailable => f.write_str("peripheral clock unavailable"),
            ConfigError::BaudOutOfRange => f.write_str("baud rate out of range"),
            ConfigError::FlowControlUnsupported => {
                f.write_str("hardware flow control not available on this instance")
            }
        }
    }
}

/// Error flags raised by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// A byte arrived before the previous one was read.
    Overrun,
    /// The received character didn't have a valid stop bit.
    Framing,
    /// Parity mismatch between what's received and our settings.
    Parity,
}

/// Error type for USART transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// An interrupt-driven transfer is in progress.
    Busy,
    /// Overrun error flag.
    Overrun,
    /// Framing error flag.
    Framing,
    /// Parity error flag.
    Parity,
    /// The poll bound ran out before the line was ready.
    Timeout,
}

impl From<LineError> for TransferError {
    fn from(error: LineError) -> Self {
        match error {
            LineError::Overrun => TransferError::Overrun,
            LineError::Framing => TransferError::Framing,
            LineError::Parity => TransferError::Parity,
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferError::Busy => "transfer in progress",
            TransferError::Overrun => "overrun error",
            TransferError::Framing => "framing error",
            TransferError::Parity => "parity error",
            TransferError::Timeout => "timed out",
        })
    }
}

impl embedded_hal_nb::serial::Error for TransferError {
    fn kind(&self) -> embedded_hal_nb::serial::ErrorKind {
        use embedded_hal_nb::serial::ErrorKind;
        match self {
            TransferError::Overrun => ErrorKind::Overrun,
            TransferError::Framing => ErrorKind::FrameFormat,
            TransferError::Parity => ErrorKind::Parity,
            TransferError::Busy | TransferError::Timeout => ErrorKind::Other,
        }
    }
}

impl embedded_io::Error for TransferError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            TransferError::Timeout => embedded_io::ErrorKind::TimedOut,
            TransferError::Overrun | TransferError::Framing | TransferError::Parity => {
                embedded_io::ErrorKind::InvalidData
            }
            TransferError::Busy => embedded_io::ErrorKind::Other,
        }
    }
}

/// Peripheral-level interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interrupt {
    /// Transmit data register empty
    TxEmpty,
    /// Receive data register not empty (also raised on overrun)
    RxNotEmpty,
    /// Transmission complete
    TransmissionComplete,
    /// Parity error
    Parity,
    /// Idle line detected
    Idle,
    /// Framing, noise and overrun errors in multibuffer mode
    Error,
}

/// Polls `f` until it stops returning `WouldBlock`.
///
/// With `Some(max_polls)`, gives up with [`TransferError::Timeout`] after that
/// many unsuccessful polls.
pub(crate) fn block_bounded<T>(
    max_polls: Option<u32>,
    mut f: impl FnMut() -> nb::Result<T, TransferError>,
) -> Result<T, TransferError> {
    let mut polls: u32 = 0;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(nb::Error::Other(e)) => return Err(e),
            Err(nb::Error::WouldBlock) => {
                if let Some(max) = max_polls {
                    polls += 1;
                    if polls >= max {
                        return Err(TransferError::Timeout);
                    }
                }
            }
        }
    }
}
