//! Universal Synchronous/Asynchronous Receiver Transmitter - Receiver Code
//!
//! This module is for receiving data with a USART.

use nb::Error::*;

use super::{LineError, TransferError};
use crate::pac::usart1::{sr, RegisterBlock};

/// Decodes the receiver error flags of a status snapshot.
///
/// An overrun wins over a framing error, which wins over a parity error.
pub(crate) fn line_error(flags: &sr::R) -> Option<LineError> {
    if flags.ore().bit_is_set() {
        Some(LineError::Overrun)
    } else if flags.fe().bit_is_set() {
        Some(LineError::Framing)
    } else if flags.pe().bit_is_set() {
        Some(LineError::Parity)
    } else {
        None
    }
}

/// Returns `true` if a received byte is waiting in the data register.
pub(crate) fn is_readable(rb: &RegisterBlock) -> bool {
    rb.sr.read().rxne().bit_is_set()
}

/// Reads one byte.
///
/// On an error flag the data register is read anyway: SR followed by DR is
/// the sequence that clears ORE, FE and PE.
pub(crate) fn read_byte(rb: &RegisterBlock) -> nb::Result<u8, TransferError> {
    let flags = rb.sr.read();
    if let Some(error) = line_error(&flags) {
        let _ = rb.dr.read();
        return Err(Other(error.into()));
    }
    if flags.rxne().bit_is_clear() {
        return Err(WouldBlock);
    }
    Ok(rb.dr.read().bits() as u8)
}

/// Reads bytes from the USART.
///
/// This function blocks until the full buffer has been received, an error
/// flag shows up, or `max_polls` polls go by without a new byte.
pub(crate) fn read_full_blocking(
    rb: &RegisterBlock,
    buffer: &mut [u8],
    max_polls: Option<u32>,
) -> Result<(), TransferError> {
    for slot in buffer.iter_mut() {
        *slot = super::utils::block_bounded(max_polls, || read_byte(rb))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{set_data, set_status, sr::*, zeroed_usart};

    #[test]
    fn error_precedence() {
        let rb = zeroed_usart();
        set_status(&rb, PE | FE | ORE);
        assert_eq!(line_error(&rb.sr.read()), Some(LineError::Overrun));
        set_status(&rb, PE | FE);
        assert_eq!(line_error(&rb.sr.read()), Some(LineError::Framing));
        set_status(&rb, PE | RXNE);
        assert_eq!(line_error(&rb.sr.read()), Some(LineError::Parity));
        set_status(&rb, NF | RXNE | TXE);
        assert_eq!(line_error(&rb.sr.read()), None);
    }

    #[test]
    fn read_waits_for_data() {
        let rb = zeroed_usart();
        assert_eq!(read_byte(&rb), Err(WouldBlock));
        // Ninth bit set, dropped on the way out.
        rb.dr.write(|w| unsafe { w.bits(0x1A5) });
        set_status(&rb, RXNE);
        assert!(is_readable(&rb));
        assert_eq!(read_byte(&rb), Ok(0xA5));
    }

    #[test]
    fn read_reports_errors() {
        let rb = zeroed_usart();
        set_status(&rb, RXNE | FE);
        assert_eq!(read_byte(&rb), Err(Other(TransferError::Framing)));
    }

    #[test]
    fn blocking_read_times_out() {
        let rb = zeroed_usart();
        let mut buffer = [0u8; 2];
        assert_eq!(
            read_full_blocking(&rb, &mut buffer, Some(10)),
            Err(TransferError::Timeout)
        );
    }

    #[test]
    fn blocking_read_fills_buffer() {
        let rb = zeroed_usart();
        set_status(&rb, RXNE);
        set_data(&rb, b'x');
        let mut buffer = [0u8; 3];
        read_full_blocking(&rb, &mut buffer, Some(1)).unwrap();
        assert_eq!(&buffer, b"xxx");
    }
}
