//! Subsystem resets and clock gates
// See [Section 7.3](https://www.st.com/resource/en/reference_manual/rm0090.pdf) of RM0090
use crate::pac::rcc;
use crate::uart::Instance;

mod private {
    use crate::pac::rcc;

    pub trait SubsystemReset {
        fn reset_bring_up(&self, rcc: &rcc::RegisterBlock);
        fn reset_bring_down(&self, rcc: &rcc::RegisterBlock);
    }

    pub trait ClockGate {
        fn clock_enable(&self, rcc: &rcc::RegisterBlock);
        fn clock_disable(&self, rcc: &rcc::RegisterBlock);
        fn clock_enabled(&self, rcc: &rcc::RegisterBlock) -> bool;
    }
}

pub(crate) use private::{ClockGate, SubsystemReset};

macro_rules! generate_gates {
    ($($instance:ident => $enr:ident . $en:ident, $rstr:ident . $rst:ident;)+) => {
        impl SubsystemReset for Instance {
            fn reset_bring_up(&self, rcc: &rcc::RegisterBlock) {
                match self {
                    $(Instance::$instance => rcc.$rstr.modify(|_, w| w.$rst().clear_bit()),)+
                }
            }

            fn reset_bring_down(&self, rcc: &rcc::RegisterBlock) {
                match self {
                    $(Instance::$instance => rcc.$rstr.modify(|_, w| w.$rst().set_bit()),)+
                }
            }
        }

        impl ClockGate for Instance {
            fn clock_enable(&self, rcc: &rcc::RegisterBlock) {
                match self {
                    $(Instance::$instance => {
                        rcc.$enr.modify(|_, w| w.$en().set_bit());
                        // Errata 2.2.7: two bus cycles pass before the gated
                        // peripheral can be accessed. The read-back provides them.
                        let _ = rcc.$enr.read();
                    })+
                }
            }

            fn clock_disable(&self, rcc: &rcc::RegisterBlock) {
                match self {
                    $(Instance::$instance => rcc.$enr.modify(|_, w| w.$en().clear_bit()),)+
                }
            }

            fn clock_enabled(&self, rcc: &rcc::RegisterBlock) -> bool {
                match self {
                    $(Instance::$instance => rcc.$enr.read().$en().bit_is_set(),)+
                }
            }
        }
    };
}

generate_gates! {
    Usart1 => apb2enr.usart1en, apb2rstr.usart1rst;
    Usart2 => apb1enr.usart2en, apb1rstr.usart2rst;
    Usart3 => apb1enr.usart3en, apb1rstr.usart3rst;
    Uart4 => apb1enr.uart4en, apb1rstr.uart4rst;
    Uart5 => apb1enr.uart5en, apb1rstr.uart5rst;
    Usart6 => apb2enr.usart6en, apb2rstr.usart6rst;
}

/// Pulses the reset line of `instance`: asserted, then released at once.
pub fn reset_pulse(rcc: &rcc::RegisterBlock, instance: Instance) {
    instance.reset_bring_down(rcc);
    instance.reset_bring_up(rcc);
}

/// Opens the clock gate of `instance`.
pub fn enable_clock(rcc: &rcc::RegisterBlock, instance: Instance) {
    instance.clock_enable(rcc);
}

/// Closes the clock gate of `instance`.
pub fn disable_clock(rcc: &rcc::RegisterBlock, instance: Instance) {
    instance.clock_disable(rcc);
}

/// Is the clock gate of `instance` open?
pub fn is_clock_enabled(rcc: &rcc::RegisterBlock, instance: Instance) -> bool {
    instance.clock_enabled(rcc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn clock_gates_only_touch_their_bit() {
        let rcc = testing::zeroed_rcc();
        rcc.apb1enr.write(|w| unsafe { w.bits(1 << 0) });

        enable_clock(&rcc, Instance::Usart2);
        enable_clock(&rcc, Instance::Usart6);
        assert_eq!(rcc.apb1enr.read().bits(), (1 << 0) | (1 << 17));
        assert_eq!(rcc.apb2enr.read().bits(), 1 << 5);
        assert!(is_clock_enabled(&rcc, Instance::Usart2));
        assert!(!is_clock_enabled(&rcc, Instance::Usart3));

        disable_clock(&rcc, Instance::Usart2);
        assert_eq!(rcc.apb1enr.read().bits(), 1 << 0);
    }

    #[test]
    fn uarts_have_their_own_gates() {
        let rcc = testing::zeroed_rcc();
        enable_clock(&rcc, Instance::Uart4);
        enable_clock(&rcc, Instance::Uart5);
        assert_eq!(rcc.apb1enr.read().bits(), (1 << 19) | (1 << 20));
        assert_eq!(rcc.apb2enr.read().bits(), 0);
    }

    #[test]
    fn reset_is_a_pulse() {
        let rcc = testing::zeroed_rcc();
        rcc.apb2rstr.write(|w| unsafe { w.bits(1 << 14) });

        reset_pulse(&rcc, Instance::Usart1);
        // Released again, neighbours untouched, other buses untouched.
        assert_eq!(rcc.apb2rstr.read().bits(), 1 << 14);
        assert_eq!(rcc.apb1rstr.read().bits(), 0);
        assert_eq!(rcc.ahb1rstr.read().bits(), 0);
    }
}
