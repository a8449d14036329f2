//! The six USART/UART blocks and their fixed wiring

use crate::clocks::Bus;
use crate::pac::{self, usart1, Interrupt};

/// One of the six USART/UART blocks.
///
/// Two values naming the same block refer to the same hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instance {
    /// USART1
    Usart1,
    /// USART2
    Usart2,
    /// USART3
    Usart3,
    /// UART4
    Uart4,
    /// UART5
    Uart5,
    /// USART6
    Usart6,
}

#[derive(Clone, Copy)]
struct InstanceInfo {
    bus: Bus,
    irq: u8,
    flow_control: bool,
}

// Indexed by `Instance as usize`.
const INSTANCES: [InstanceInfo; 6] = [
    InstanceInfo {
        bus: Bus::Apb2,
        irq: Interrupt::USART1 as u8,
        flow_control: true,
    },
    InstanceInfo {
        bus: Bus::Apb1,
        irq: Interrupt::USART2 as u8,
        flow_control: true,
    },
    InstanceInfo {
        bus: Bus::Apb1,
        irq: Interrupt::USART3 as u8,
        flow_control: true,
    },
    InstanceInfo {
        bus: Bus::Apb1,
        irq: Interrupt::UART4 as u8,
        flow_control: false,
    },
    InstanceInfo {
        bus: Bus::Apb1,
        irq: Interrupt::UART5 as u8,
        flow_control: false,
    },
    InstanceInfo {
        bus: Bus::Apb2,
        irq: Interrupt::USART6 as u8,
        flow_control: true,
    },
];

impl Instance {
    /// Every instance, in index order.
    pub const ALL: [Instance; 6] = [
        Instance::Usart1,
        Instance::Usart2,
        Instance::Usart3,
        Instance::Uart4,
        Instance::Uart5,
        Instance::Usart6,
    ];

    const fn info(self) -> InstanceInfo {
        INSTANCES[self as usize]
    }

    /// The instance's register block in the PAC's memory map.
    pub fn register_block(self) -> *const usart1::RegisterBlock {
        match self {
            Instance::Usart1 => pac::USART1::ptr().cast(),
            Instance::Usart2 => pac::USART2::ptr().cast(),
            Instance::Usart3 => pac::USART3::ptr().cast(),
            Instance::Uart4 => pac::UART4::ptr().cast(),
            Instance::Uart5 => pac::UART5::ptr().cast(),
            Instance::Usart6 => pac::USART6::ptr().cast(),
        }
    }

    /// Bus whose clock drives the baud rate generator.
    pub const fn bus(self) -> Bus {
        self.info().bus
    }

    /// NVIC interrupt line.
    pub const fn irq(self) -> u8 {
        self.info().irq
    }

    /// UART4 and UART5 have no RTS/CTS lines.
    pub const fn has_flow_control(self) -> bool {
        self.info().flow_control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_in_index_order() {
        for (index, instance) in Instance::ALL.iter().enumerate() {
            assert_eq!(*instance as usize, index);
        }
    }

    #[test]
    fn buses_and_lines() {
        assert_eq!(Instance::Usart1.bus(), Bus::Apb2);
        assert_eq!(Instance::Usart6.bus(), Bus::Apb2);
        for instance in [Instance::Usart2, Instance::Usart3, Instance::Uart4, Instance::Uart5] {
            assert_eq!(instance.bus(), Bus::Apb1);
        }
        assert_eq!(Instance::Usart2.irq(), 38);
        assert_eq!(Instance::Usart6.irq(), 71);
        assert!(!Instance::Uart5.has_flow_control());
    }

    #[test]
    fn register_blocks_match_the_memory_map() {
        let bases = [
            0x4001_1000,
            0x4000_4400,
            0x4000_4800,
            0x4000_4C00,
            0x4000_5000,
            0x4001_1400,
        ];
        for (instance, base) in Instance::ALL.iter().zip(bases) {
            assert_eq!(instance.register_block() as usize, base);
        }
    }
}
