//! Baud rate divisor
//!
//! The USART generates its bit clock by dividing the peripheral clock by
//! `USARTDIV = clock / (16 * baud)`. USARTDIV is held in the baud rate
//! register as a 12-bit mantissa and a 4-bit fraction (sixteenths).

use core::fmt;
use fugit::HertzU32;

/// Samples taken per bit.
pub const OVERSAMPLING: u32 = 16;

/// Largest value the mantissa field can hold.
pub const MANTISSA_MAX: u16 = 0x0FFF;

/// The requested baud rate cannot be produced from the given clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidBaudRate;

impl fmt::Display for InvalidBaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("baud rate cannot be generated from the peripheral clock")
    }
}

/// Fixed-point USARTDIV value.
///
/// Only [`compute_divisor`] builds one, so the mantissa is always in
/// `1..=MANTISSA_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Divisor {
    mantissa: u16,
    fraction: u8,
}

impl Divisor {
    /// Integer part, at most [`MANTISSA_MAX`].
    pub const fn mantissa(&self) -> u16 {
        self.mantissa
    }

    /// Sixteenths, in `0..=15`.
    pub const fn fraction(&self) -> u8 {
        self.fraction
    }

    /// USARTDIV expressed in sixteenths.
    pub const fn sixteenths(&self) -> u32 {
        ((self.mantissa as u32) << 4) | self.fraction as u32
    }

    /// Value of the baud rate register (mantissa in bits 15:4, fraction in 3:0).
    pub const fn brr_bits(&self) -> u32 {
        self.sixteenths()
    }

    /// The baud rate this divisor really produces from `clock`.
    pub fn actual_baudrate(&self, clock: HertzU32) -> HertzU32 {
        let sixteenths = u64::from(self.sixteenths());
        let baud = (u64::from(clock.to_Hz()) + sixteenths / 2) / sixteenths;
        // At least 16 sixteenths, so the quotient is below `clock`.
        HertzU32::from_raw(baud as u32)
    }
}

/// From the wanted baudrate, calculate the divider's two parts: mantissa and
/// fraction.
///
/// The fraction is rounded to the nearest sixteenth; when it rounds up to 16
/// the carry goes into the mantissa. Only integer arithmetic is used.
///
/// ```
/// use fugit::RateExtU32;
/// use stm32_hal_common::uart::compute_divisor;
///
/// let divisor = compute_divisor(16_000_000.Hz(), 9600.Hz()).unwrap();
/// assert_eq!((divisor.mantissa(), divisor.fraction()), (104, 3));
/// ```
pub fn compute_divisor(clock: HertzU32, baud: HertzU32) -> Result<Divisor, InvalidBaudRate> {
    let clock = u64::from(clock.to_Hz());
    let baud = u64::from(baud.to_Hz());
    if clock == 0 || baud == 0 {
        return Err(InvalidBaudRate);
    }

    // 16 * USARTDIV = clock / baud, rounded to the nearest integer.
    let sixteenths = (clock + baud / 2) / baud;
    let mantissa = sixteenths >> 4;
    if mantissa == 0 || mantissa > u64::from(MANTISSA_MAX) {
        return Err(InvalidBaudRate);
    }

    Ok(Divisor {
        mantissa: mantissa as u16,
        fraction: (sixteenths & 0xF) as u8,
    })
}
