//! Peripheral bus clocks
//!
//! Clock tree setup lives outside this crate. The USART driver only needs to
//! know the frequency of the APB bus an instance hangs off, which it asks a
//! [`ClockSource`] for.
//!
//! ```
//! use fugit::{HertzU32, RateExtU32};
//! use stm32f407_hal::clocks::{Bus, BusClocks, ClockSource};
//!
//! let clocks = BusClocks::new(42.MHz(), 84.MHz());
//! assert_eq!(clocks.bus_frequency(Bus::Apb2), Some(HertzU32::MHz(84)));
//!
//! // Any `Fn(Bus) -> Option<HertzU32>` works as well.
//! let fixed = |_bus: Bus| Some(HertzU32::MHz(16));
//! assert_eq!(fixed.bus_frequency(Bus::Apb1), Some(HertzU32::MHz(16)));
//! ```

use fugit::HertzU32;

/// Peripheral buses feeding the USART blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    /// Low speed bus: USART2, USART3, UART4, UART5.
    Apb1,
    /// High speed bus: USART1, USART6.
    Apb2,
}

/// Something that knows the frequency of the peripheral buses.
pub trait ClockSource {
    /// Input clock of peripherals on `bus`, or `None` if it is not known.
    fn bus_frequency(&self, bus: Bus) -> Option<HertzU32>;
}

impl<F> ClockSource for F
where
    F: Fn(Bus) -> Option<HertzU32>,
{
    fn bus_frequency(&self, bus: Bus) -> Option<HertzU32> {
        self(bus)
    }
}

/// Frozen APB clock frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusClocks {
    apb1: HertzU32,
    apb2: HertzU32,
}

impl BusClocks {
    /// Records the APB1 and APB2 clock frequencies.
    pub const fn new(apb1: HertzU32, apb2: HertzU32) -> Self {
        BusClocks { apb1, apb2 }
    }

    /// Clocks after reset: everything runs from the 16 MHz HSI.
    pub const fn reset_default() -> Self {
        Self::new(HertzU32::from_raw(16_000_000), HertzU32::from_raw(16_000_000))
    }
}

impl ClockSource for BusClocks {
    fn bus_frequency(&self, bus: Bus) -> Option<HertzU32> {
        let freq = match bus {
            Bus::Apb1 => self.apb1,
            Bus::Apb2 => self.apb2,
        };
        (freq.to_Hz() != 0).then_some(freq)
    }
}
