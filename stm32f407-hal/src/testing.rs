//! In-memory register map for host tests
//!
//! Registers are plain memory here: status flags only change when a test
//! writes them, and write-one registers just hold what was written.

use cortex_m::peripheral::nvic;

use crate::pac::{rcc, usart1};
use crate::registers::RegisterMap;
use crate::uart::{Event, EventNotifier, Instance};

/// Raw `SR` bits, for tests that play the hardware's part.
pub(crate) mod sr {
    pub const PE: u32 = 1 << 0;
    pub const FE: u32 = 1 << 1;
    pub const NF: u32 = 1 << 2;
    pub const ORE: u32 = 1 << 3;
    pub const RXNE: u32 = 1 << 5;
    pub const TC: u32 = 1 << 6;
    pub const TXE: u32 = 1 << 7;
}

// The PAC register blocks are `#[repr(C)]` structs of volatile cells, for
// which all-zero memory is a valid value.

pub(crate) fn zeroed_usart() -> usart1::RegisterBlock {
    unsafe { core::mem::zeroed() }
}

pub(crate) fn zeroed_rcc() -> rcc::RegisterBlock {
    unsafe { core::mem::zeroed() }
}

pub(crate) fn zeroed_nvic() -> nvic::RegisterBlock {
    unsafe { core::mem::zeroed() }
}

/// Overwrites the status register of `device`.
pub(crate) fn set_status(device: &usart1::RegisterBlock, bits: u32) {
    device.sr.write(|w| unsafe { w.bits(bits) });
}

/// Puts `byte` in the data register of `device`.
pub(crate) fn set_data(device: &usart1::RegisterBlock, byte: u8) {
    device.dr.write(|w| unsafe { w.bits(u32::from(byte)) });
}

pub(crate) struct SimRegisters {
    usart: [usart1::RegisterBlock; 6],
    rcc: rcc::RegisterBlock,
    nvic: nvic::RegisterBlock,
}

impl SimRegisters {
    pub(crate) fn new() -> Self {
        SimRegisters {
            usart: core::array::from_fn(|_| zeroed_usart()),
            rcc: zeroed_rcc(),
            nvic: zeroed_nvic(),
        }
    }
}

impl RegisterMap for SimRegisters {
    fn usart(&self, instance: Instance) -> &usart1::RegisterBlock {
        &self.usart[instance as usize]
    }

    fn rcc(&self) -> &rcc::RegisterBlock {
        &self.rcc
    }

    fn nvic(&self) -> &nvic::RegisterBlock {
        &self.nvic
    }
}

/// Notifier that remembers every event.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) events: Vec<(Instance, Event)>,
}

impl EventNotifier for Recorder {
    fn on_uart_event(&mut self, instance: Instance, event: Event) {
        self.events.push((instance, event));
    }
}
