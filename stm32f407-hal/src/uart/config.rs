//! Register configuration
//!
//! Applies a [`UsartConfig`] to an instance. The peripheral is disabled while
//! its frame format is rewritten, so nothing half-configured ever reaches the
//! line.

use fugit::HertzU32;

use super::{compute_divisor, ConfigError, Instance, Interrupt, Parity, UsartConfig, WordLength};
use crate::clocks::ClockSource;
use crate::pac::usart1::RegisterBlock;
use crate::registers::RegisterMap;
use crate::resets::{self, ClockGate};

/// Configures `instance` and leaves it enabled.
///
/// The sequence is: open the clock gate, disable the USART, write word
/// length, mode, parity, flow control and stop bits (each a separate
/// read-modify-write), overwrite the baud rate register, enable the USART.
///
/// The clock and divisor are resolved before any register is touched, so a
/// failing call leaves the hardware as it was. Must not be called while a
/// transfer is running on `instance`.
///
/// Returns the baud rate actually produced.
pub fn configure<R, C>(
    regs: &R,
    instance: Instance,
    config: &UsartConfig,
    clocks: &C,
) -> Result<HertzU32, ConfigError>
where
    R: RegisterMap + ?Sized,
    C: ClockSource + ?Sized,
{
    if config.flow_control != super::FlowControl::None && !instance.has_flow_control() {
        return Err(ConfigError::FlowControlUnsupported);
    }
    let clock = clocks
        .bus_frequency(instance.bus())
        .ok_or(ConfigError::ClockUnavailable)?;
    let divisor = compute_divisor(clock, config.baudrate)?;

    instance.clock_enable(regs.rcc());

    let device = regs.usart(instance);
    set_peripheral_enabled(device, false);

    set_word_length(device, config.word_length);
    set_mode(device, config);
    set_parity(device, config.parity);
    set_flow_control(device, config);
    device
        .cr2
        .modify(|_, w| unsafe { w.stop().bits(config.stop_bits.bits()) });

    device.brr.write(|w| unsafe { w.bits(divisor.brr_bits()) });

    set_peripheral_enabled(device, true);

    let actual = divisor.actual_baudrate(clock);
    #[cfg(feature = "defmt")]
    defmt::debug!(
        "{}: {} baud requested, {} baud configured (BRR {=u32:#x})",
        instance,
        config.baudrate.to_Hz(),
        actual.to_Hz(),
        divisor.brr_bits()
    );
    Ok(actual)
}

/// Returns `instance` to its reset state and closes its clock gate.
///
/// The reset line is pulsed (asserted then released), not held. Calling this
/// on an instance that is already reset is harmless.
pub fn deconfigure<R: RegisterMap + ?Sized>(regs: &R, instance: Instance) {
    resets::reset_pulse(regs.rcc(), instance);
    resets::disable_clock(regs.rcc(), instance);
}

/// Enables or disables the whole peripheral (CR1.UE).
pub fn set_enabled<R: RegisterMap + ?Sized>(regs: &R, instance: Instance, enabled: bool) {
    set_peripheral_enabled(regs.usart(instance), enabled);
}

/// Enables or disables peripheral-level interrupt sources of `instance`.
///
/// This does not touch the NVIC line; see [`crate::nvic`].
pub fn set_interrupt_sources<R: RegisterMap + ?Sized>(
    regs: &R,
    instance: Instance,
    sources: &[Interrupt],
    enabled: bool,
) {
    let device = regs.usart(instance);
    for source in sources {
        set_interrupt(device, *source, enabled);
    }
}

pub(crate) fn set_interrupt(device: &RegisterBlock, source: Interrupt, enabled: bool) {
    match source {
        Interrupt::TxEmpty => device.cr1.modify(|_, w| w.txeie().bit(enabled)),
        Interrupt::RxNotEmpty => device.cr1.modify(|_, w| w.rxneie().bit(enabled)),
        Interrupt::TransmissionComplete => device.cr1.modify(|_, w| w.tcie().bit(enabled)),
        Interrupt::Parity => device.cr1.modify(|_, w| w.peie().bit(enabled)),
        Interrupt::Idle => device.cr1.modify(|_, w| w.idleie().bit(enabled)),
        Interrupt::Error => device.cr3.modify(|_, w| w.eie().bit(enabled)),
    }
}

fn set_peripheral_enabled(device: &RegisterBlock, enabled: bool) {
    device.cr1.modify(|_, w| w.ue().bit(enabled));
}

fn set_word_length(device: &RegisterBlock, word_length: WordLength) {
    device
        .cr1
        .modify(|_, w| w.m().bit(word_length == WordLength::Nine));
}

fn set_mode(device: &RegisterBlock, config: &UsartConfig) {
    device.cr1.modify(|_, w| {
        w.te()
            .bit(config.mode.transmits())
            .re()
            .bit(config.mode.receives())
    });
}

fn set_parity(device: &RegisterBlock, parity: Option<Parity>) {
    device.cr1.modify(|_, w| match parity {
        None => w.pce().clear_bit().ps().clear_bit(),
        Some(Parity::Even) => w.pce().set_bit().ps().clear_bit(),
        Some(Parity::Odd) => w.pce().set_bit().ps().set_bit(),
    });
}

fn set_flow_control(device: &RegisterBlock, config: &UsartConfig) {
    device.cr3.modify(|_, w| {
        w.rtse()
            .bit(config.flow_control.rts())
            .ctse()
            .bit(config.flow_control.cts())
    });
}
