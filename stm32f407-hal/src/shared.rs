//! Handles shared between the main context and interrupt handlers
//!
//! A [`Usart`](crate::uart::Usart) is moved into a [`Shared`] cell, usually a
//! `static`, and both sides reach it through [`Shared::with`]. Every access
//! runs inside a critical section, so the interrupt handler never sees a
//! half-updated transfer.
//!
//! ```no_run
//! use stm32f407_hal::{
//!     clocks::BusClocks,
//!     pac,
//!     shared::Shared,
//!     uart::{Instance, Usart, UsartConfig},
//! };
//!
//! static USART2: Shared<Usart<'static, pac::Peripherals>> = Shared::new();
//!
//! // The USART2 interrupt vector.
//! fn usart2_handler() {
//!     USART2.handle_interrupt();
//! }
//!
//! static MESSAGE: [u8; 6] = *b"hello\n";
//!
//! let dp = pac::Peripherals::take().unwrap();
//! let clocks = BusClocks::reset_default();
//! let usart = Usart::init(dp, Instance::Usart2, UsartConfig::default(), &clocks).unwrap();
//! USART2.install(usart);
//! USART2.with(|usart| usart.start_send(&MESSAGE).unwrap());
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::registers::RegisterMap;
use crate::uart::{EventNotifier, Usart};

/// A `Mutex<RefCell<Option<_>>>` holding a value that interrupt handlers use.
pub struct Shared<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Shared<T> {
    /// An empty cell.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Stores `value`, returning the previous one.
    pub fn install(&self, value: T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(value)))
    }

    /// Empties the cell.
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }

    /// Runs `f` on the stored value inside a critical section.
    ///
    /// Returns `None` without calling `f` if the cell is empty.
    ///
    /// # Panics
    ///
    /// Panics if called from within `f` on the same cell.
    pub fn with<O>(&self, f: impl FnOnce(&mut T) -> O) -> Option<O> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().as_mut().map(f))
    }
}

impl<R: RegisterMap, N: EventNotifier> Shared<Usart<'_, R, N>> {
    /// Forwards one interrupt to the stored handle. Does nothing while the
    /// cell is empty.
    pub fn handle_interrupt(&self) {
        self.with(|usart| usart.handle_interrupt());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clocks::BusClocks;
    use crate::testing::{set_status, sr::TXE, Recorder, SimRegisters};
    use crate::uart::{Event, Instance, Status, UsartConfig};

    #[test]
    fn install_with_take() {
        let cell = Shared::new();
        assert_eq!(cell.with(|v: &mut u32| *v), None);
        assert_eq!(cell.install(1), None);
        assert_eq!(
            cell.with(|v| {
                *v += 1;
                *v
            }),
            Some(2)
        );
        assert_eq!(cell.install(7), Some(2));
        assert_eq!(cell.take(), Some(7));
        assert_eq!(cell.take(), None);
    }

    #[test]
    fn interrupts_reach_the_stored_handle() {
        let regs = SimRegisters::new();
        let data = [1u8, 2];
        let cell: Shared<Usart<'_, &SimRegisters, Recorder>> = Shared::new();
        cell.handle_interrupt();

        let usart = Usart::init_with_notifier(
            &regs,
            Instance::Usart1,
            UsartConfig::default(),
            &BusClocks::reset_default(),
            Recorder::default(),
        )
        .unwrap();
        cell.install(usart);
        cell.with(|usart| usart.start_send(&data)).unwrap().unwrap();

        set_status(regs.usart(Instance::Usart1), TXE);
        cell.handle_interrupt();
        cell.handle_interrupt();

        let usart = cell.take().unwrap();
        assert_eq!(usart.status(), Status::Complete);
        assert_eq!(usart.notifier().events, [(Instance::Usart1, Event::Completion)]);
    }
}
