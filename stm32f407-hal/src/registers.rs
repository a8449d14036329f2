//! Where the drivers find their register blocks
//!
//! The drivers never name a peripheral address themselves. They ask a
//! [`RegisterMap`] for the block of an instance, which lets host tests swap
//! device memory for plain memory.

use cortex_m::peripheral::{nvic, NVIC};

use crate::pac::{self, rcc, usart1};
use crate::uart::Instance;

/// Resolves the register blocks the drivers operate on.
///
/// [`pac::Peripherals`] hands out the real peripherals. Anything else
/// implementing this trait must keep returning the same block for the same
/// instance.
pub trait RegisterMap {
    /// Registers of one USART/UART block.
    ///
    /// UART4 and UART5 are reached through the USART1 layout. Their register
    /// offsets are the same, they just lack the synchronous and flow control
    /// bits.
    fn usart(&self, instance: Instance) -> &usart1::RegisterBlock;

    /// Reset and clock control.
    fn rcc(&self) -> &rcc::RegisterBlock;

    /// Nested vectored interrupt controller.
    fn nvic(&self) -> &nvic::RegisterBlock;
}

impl<T: RegisterMap + ?Sized> RegisterMap for &T {
    fn usart(&self, instance: Instance) -> &usart1::RegisterBlock {
        (**self).usart(instance)
    }

    fn rcc(&self) -> &rcc::RegisterBlock {
        (**self).rcc()
    }

    fn nvic(&self) -> &nvic::RegisterBlock {
        (**self).nvic()
    }
}

impl RegisterMap for pac::Peripherals {
    fn usart(&self, instance: Instance) -> &usart1::RegisterBlock {
        // SAFETY: owning the device peripherals means owning every USART
        // block, and the pointer comes from the PAC's memory map.
        unsafe { &*instance.register_block() }
    }

    fn rcc(&self) -> &rcc::RegisterBlock {
        &self.RCC
    }

    /// The NVIC is a core peripheral and not part of [`pac::Peripherals`].
    /// Only the set/clear-enable registers and the instance's own priority
    /// byte are ever written, none of which affects another line.
    fn nvic(&self) -> &nvic::RegisterBlock {
        // SAFETY: fixed address from `cortex-m`, see above for the accesses.
        unsafe { &*NVIC::PTR }
    }
}
