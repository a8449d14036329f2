//! Universal Synchronous/Asynchronous Receiver Transmitter (USART)
//!
//! This module brings together `uart::reader`, `uart::writer` and
//! `uart::transfer` to implement a [`Usart`] handle that can move buffers
//! either with interrupts or by polling.

use core::fmt;

use embedded_hal_0_2::serial as eh0;
use embedded_hal_nb::serial::{ErrorType, Read, Write};
use fugit::HertzU32;
use nb::Error::{Other, WouldBlock};

use super::{
    config::{self, configure, deconfigure},
    reader, writer, ConfigError, Event, EventNotifier, Instance, Interrupt, NoopNotifier,
    Released, Status, TransferError, TransferState, UsartConfig,
};
use crate::clocks::ClockSource;
use crate::nvic;
use crate::pac::usart1::RegisterBlock;
use crate::registers::RegisterMap;

/// A configured USART instance.
///
/// The handle owns the instance's transfer state. Interrupt-driven transfers
/// borrow their buffer for `'b`, so a buffer outlives any handle that might
/// still be using it.
pub struct Usart<'b, R: RegisterMap, N: EventNotifier = NoopNotifier> {
    regs: R,
    instance: Instance,
    config: UsartConfig,
    baudrate: HertzU32,
    transfer: TransferState<'b>,
    notifier: N,
}

impl<'b, R: RegisterMap> Usart<'b, R, NoopNotifier> {
    /// Configures `instance` and returns a handle to it.
    ///
    /// Transfer events are dropped; see [`Usart::init_with_notifier`].
    pub fn init<C: ClockSource + ?Sized>(
        regs: R,
        instance: Instance,
        config: UsartConfig,
        clocks: &C,
    ) -> Result<Self, ConfigError> {
        Self::init_with_notifier(regs, instance, config, clocks, NoopNotifier)
    }
}

impl<'b, R: RegisterMap, N: EventNotifier> Usart<'b, R, N> {
    /// Configures `instance` and returns a handle that reports transfer
    /// events to `notifier`.
    pub fn init_with_notifier<C: ClockSource + ?Sized>(
        regs: R,
        instance: Instance,
        config: UsartConfig,
        clocks: &C,
        notifier: N,
    ) -> Result<Self, ConfigError> {
        let baudrate = configure(&regs, instance, &config, clocks)?;
        Ok(Usart {
            regs,
            instance,
            config,
            baudrate,
            transfer: TransferState::new(),
            notifier,
        })
    }

    /// Disables the instance's interrupts, resets it and closes its clock
    /// gate. A transfer still running is abandoned.
    ///
    /// Returns the register map and the notifier.
    pub fn deinit(self) -> (R, N) {
        let device = self.device();
        for source in [
            Interrupt::TxEmpty,
            Interrupt::RxNotEmpty,
            Interrupt::TransmissionComplete,
            Interrupt::Parity,
            Interrupt::Idle,
            Interrupt::Error,
        ] {
            config::set_interrupt(device, source, false);
        }
        nvic::set_enabled(self.regs.nvic(), self.instance.irq(), false);
        deconfigure(&self.regs, self.instance);
        (self.regs, self.notifier)
    }

    /// The instance this handle drives.
    pub fn instance(&self) -> Instance {
        self.instance
    }

    /// The configuration applied by `init`.
    pub fn config(&self) -> &UsartConfig {
        &self.config
    }

    /// The baud rate actually produced, which may differ slightly from the
    /// requested one.
    pub fn baudrate(&self) -> HertzU32 {
        self.baudrate
    }

    /// Status of the interrupt-driven transfer.
    pub fn status(&self) -> Status {
        self.transfer.status()
    }

    /// Bytes moved by the current or last interrupt-driven transfer.
    pub fn bytes_transferred(&self) -> usize {
        self.transfer.cursor()
    }

    /// The event notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The event notifier, mutably.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    fn device(&self) -> &RegisterBlock {
        self.regs.usart(self.instance)
    }

    fn check_idle(&self) -> Result<(), TransferError> {
        if self.transfer.status().is_in_progress() {
            Err(TransferError::Busy)
        } else {
            Ok(())
        }
    }

    fn arm(&self, source: Interrupt) {
        let device = self.device();
        config::set_interrupt(device, source, true);
        config::set_interrupt(device, Interrupt::Parity, true);
        config::set_interrupt(device, Interrupt::Error, true);
        nvic::set_enabled(self.regs.nvic(), self.instance.irq(), true);
    }

    fn disarm(&self) {
        let device = self.device();
        for source in [
            Interrupt::TxEmpty,
            Interrupt::RxNotEmpty,
            Interrupt::Parity,
            Interrupt::Error,
        ] {
            config::set_interrupt(device, source, false);
        }
    }

    fn notify(&mut self, event: Event) {
        self.notifier.on_uart_event(self.instance, event);
    }

    /// Starts sending `data` in the background, one byte per TXE interrupt.
    ///
    /// Enables the TXE and error interrupts and the instance's NVIC line;
    /// the application's interrupt handler must then call
    /// [`Usart::handle_interrupt`]. An empty `data` completes at once.
    ///
    /// Fails with [`TransferError::Busy`] while another transfer runs, which
    /// is left as it was.
    ///
    /// The receiver's error flags stay armed while sending. An overrun,
    /// framing or parity error on the receive side aborts the send like any
    /// other transfer, and the data register read that clears the flag
    /// consumes the byte waiting in it. That byte is not seen by a later
    /// receive.
    pub fn start_send(&mut self, data: &'b [u8]) -> Result<(), TransferError> {
        match self.transfer.begin_send(data)? {
            Status::Complete => self.notify(Event::Completion),
            _ => self.arm(Interrupt::TxEmpty),
        }
        Ok(())
    }

    /// Starts filling `buffer` in the background, one byte per RXNE
    /// interrupt.
    ///
    /// See [`Usart::start_send`].
    pub fn start_receive(&mut self, buffer: &'b mut [u8]) -> Result<(), TransferError> {
        match self.transfer.begin_receive(buffer)? {
            Status::Complete => self.notify(Event::Completion),
            _ => self.arm(Interrupt::RxNotEmpty),
        }
        Ok(())
    }

    /// Advances the running transfer by one interrupt.
    ///
    /// Call from the instance's interrupt handler. An error flag aborts the
    /// transfer where it stands and is reported to the notifier; otherwise a
    /// ready data register moves one byte. The notifier hears about
    /// completion right after the last byte. Without a running transfer
    /// this does nothing.
    pub fn handle_interrupt(&mut self) {
        let status = self.transfer.status();
        if !status.is_in_progress() {
            return;
        }

        let device = self.regs.usart(self.instance);
        let flags = device.sr.read();

        if let Some(error) = reader::line_error(&flags) {
            let _ = device.dr.read();
            self.disarm();
            self.transfer.fail(error);
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{}: transfer aborted after {} bytes: {}",
                self.instance,
                self.transfer.cursor(),
                error
            );
            self.notify(error.into());
            return;
        }

        match status {
            Status::Sending if flags.txe().bit_is_set() => {
                if let Some(byte) = self.transfer.next_tx_byte() {
                    device.dr.write(|w| unsafe { w.bits(u32::from(byte)) });
                }
            }
            Status::Receiving if flags.rxne().bit_is_set() => {
                let byte = device.dr.read().bits() as u8;
                self.transfer.store_rx_byte(byte);
            }
            _ => return,
        }

        if self.transfer.is_done() {
            self.disarm();
            self.transfer.complete();
            self.notify(Event::Completion);
        }
    }

    /// Returns a finished handle to `Idle` and hands back the buffer of the
    /// last transfer.
    ///
    /// Fails with [`TransferError::Busy`] while a transfer runs.
    pub fn clear_status(&mut self) -> Result<Option<Released<'b>>, TransferError> {
        self.transfer.release()
    }

    /// Sends `data`, blocking until every byte is in the transmitter.
    pub fn send(&mut self, data: &[u8]) -> Result<(), TransferError> {
        self.send_bounded(data, None)
    }

    /// Sends `data` by polling TXE.
    ///
    /// With `Some(max_polls)`, fails with [`TransferError::Timeout`] when a
    /// byte waits that many polls for room.
    pub fn send_bounded(&mut self, data: &[u8], max_polls: Option<u32>) -> Result<(), TransferError> {
        self.check_idle()?;
        writer::write_full_blocking(self.device(), data, max_polls)
    }

    /// Fills `buffer`, blocking until every byte has arrived.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<(), TransferError> {
        self.receive_bounded(buffer, None)
    }

    /// Fills `buffer` by polling RXNE.
    ///
    /// With `Some(max_polls)`, fails with [`TransferError::Timeout`] when a
    /// byte doesn't arrive within that many polls. Error flags end the call
    /// with the matching error; bytes read before it stay in `buffer`.
    pub fn receive_bounded(
        &mut self,
        buffer: &mut [u8],
        max_polls: Option<u32>,
    ) -> Result<(), TransferError> {
        self.check_idle()?;
        reader::read_full_blocking(self.device(), buffer, max_polls)
    }

    /// Is a received byte waiting?
    pub fn is_readable(&self) -> bool {
        reader::is_readable(self.device())
    }

    /// Can another byte be written?
    pub fn is_writable(&self) -> bool {
        writer::is_writable(self.device())
    }
}

impl<R: RegisterMap, N: EventNotifier> eh0::Read<u8> for Usart<'_, R, N> {
    type Error = TransferError;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.check_idle()?;
        reader::read_byte(self.device())
    }
}

impl<R: RegisterMap, N: EventNotifier> eh0::Write<u8> for Usart<'_, R, N> {
    type Error = TransferError;

    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.check_idle()?;
        writer::write_byte(self.device(), word)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        writer::transmit_flushed(self.device())
    }
}

impl<R: RegisterMap, N: EventNotifier> ErrorType for Usart<'_, R, N> {
    type Error = TransferError;
}

impl<R: RegisterMap, N: EventNotifier> Read<u8> for Usart<'_, R, N> {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.check_idle()?;
        reader::read_byte(self.device())
    }
}

impl<R: RegisterMap, N: EventNotifier> Write<u8> for Usart<'_, R, N> {
    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.check_idle()?;
        writer::write_byte(self.device(), word)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        writer::transmit_flushed(self.device())
    }
}

impl<R: RegisterMap, N: EventNotifier> fmt::Write for Usart<'_, R, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl<R: RegisterMap, N: EventNotifier> embedded_io::ErrorType for Usart<'_, R, N> {
    type Error = TransferError;
}

impl<R: RegisterMap, N: EventNotifier> embedded_io::Read for Usart<'_, R, N> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.check_idle()?;
        let device = self.device();
        buf[0] = nb::block!(reader::read_byte(device))?;

        // Take whatever else is already there, but leave an error flag for
        // the next call.
        let mut bytes_read = 1;
        while bytes_read < buf.len() {
            let flags = device.sr.read();
            if flags.rxne().bit_is_clear() || reader::line_error(&flags).is_some() {
                break;
            }
            buf[bytes_read] = device.dr.read().bits() as u8;
            bytes_read += 1;
        }
        Ok(bytes_read)
    }
}

impl<R: RegisterMap, N: EventNotifier> embedded_io::ReadReady for Usart<'_, R, N> {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let flags = self.device().sr.read();
        Ok(flags.rxne().bit_is_set() || reader::line_error(&flags).is_some())
    }
}

impl<R: RegisterMap, N: EventNotifier> embedded_io::Write for Usart<'_, R, N> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.check_idle()?;
        let device = self.device();
        // Blocks if and only if no bytes can be written.
        nb::block!(writer::write_byte(device, buf[0]))?;
        let mut bytes_written = 1;
        for &byte in &buf[1..] {
            match writer::write_byte(device, byte) {
                Ok(()) => bytes_written += 1,
                Err(WouldBlock) => break,
                Err(Other(e)) => return Err(e),
            }
        }
        Ok(bytes_written)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        nb::block!(writer::transmit_flushed(self.device()))
    }
}

impl<R: RegisterMap, N: EventNotifier> embedded_io::WriteReady for Usart<'_, R, N> {
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_writable())
    }
}
