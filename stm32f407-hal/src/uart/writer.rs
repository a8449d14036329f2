//! Universal Synchronous/Asynchronous Receiver Transmitter - Transmitter Code
//!
//! This module is for transmitting data with a USART.

use nb::Error::*;

use super::TransferError;
use crate::pac::usart1::RegisterBlock;

/// Returns `Err(WouldBlock)` until the last frame has left the shift
/// register.
pub(crate) fn transmit_flushed(rb: &RegisterBlock) -> nb::Result<(), TransferError> {
    if rb.sr.read().tc().bit_is_set() {
        Ok(())
    } else {
        Err(WouldBlock)
    }
}

/// Returns `true` if the data register can take another byte.
pub(crate) fn is_writable(rb: &RegisterBlock) -> bool {
    rb.sr.read().txe().bit_is_set()
}

/// Writes one byte, or returns `WouldBlock` if the data register is full.
pub(crate) fn write_byte(rb: &RegisterBlock, byte: u8) -> nb::Result<(), TransferError> {
    if !is_writable(rb) {
        return Err(WouldBlock);
    }
    rb.dr.write(|w| unsafe { w.bits(u32::from(byte)) });
    Ok(())
}

/// Writes bytes to the USART.
///
/// This function blocks until the full buffer has been handed to the
/// transmitter, or until `max_polls` polls go by with the data register
/// still full.
pub(crate) fn write_full_blocking(
    rb: &RegisterBlock,
    data: &[u8],
    max_polls: Option<u32>,
) -> Result<(), TransferError> {
    for &byte in data {
        super::utils::block_bounded(max_polls, || write_byte(rb, byte))?;
    }
    Ok(())
}
