//! Interrupt line control
//!
//! Enables, disables and prioritises the NVIC lines peripherals raise their
//! interrupts on. Line numbers are the device's IRQ numbers
//! (see [`Instance::irq`](crate::uart::Instance::irq)).
//!
//! Passing a line above [`MAX_LINE`] or a priority that does not fit in
//! [`NVIC_PRIO_BITS`] is a programming error and panics.

use cortex_m::peripheral::nvic::RegisterBlock;

/// Number of priority bits implemented in each 8-bit priority field.
pub const NVIC_PRIO_BITS: u8 = 4;

/// Highest supported interrupt line.
pub const MAX_LINE: u8 = 95;

fn check_line(line: u8) {
    assert!(line <= MAX_LINE, "interrupt line {} out of range", line);
}

/// Enables or disables interrupt `line`.
///
/// ISER and ICER are write-one registers, so no other line is affected.
///
/// Unmasking a line can break a mask-based critical section if the line's
/// handler touches the data that section protects.
pub fn set_enabled(nvic: &RegisterBlock, line: u8, enabled: bool) {
    check_line(line);
    let word = usize::from(line / 32);
    let bit = 1u32 << (line % 32);
    if enabled {
        // SAFETY: write-one register, only `line` is affected.
        unsafe { nvic.iser[word].write(bit) };
    } else {
        // SAFETY: as above.
        unsafe { nvic.icer[word].write(bit) };
        // Make sure the line is really masked before returning.
        #[cfg(all(target_arch = "arm", target_os = "none"))]
        {
            cortex_m::asm::dsb();
            cortex_m::asm::isb();
        }
    }
}

/// Is interrupt `line` enabled?
pub fn is_enabled(nvic: &RegisterBlock, line: u8) -> bool {
    check_line(line);
    nvic.iser[usize::from(line / 32)].read() & (1 << (line % 32)) != 0
}

/// Sets the priority of interrupt `line`. Lower values preempt higher ones.
///
/// Only the top [`NVIC_PRIO_BITS`] bits of the line's priority byte exist,
/// so `priority` is shifted into them and the low bits are written as zero.
///
/// The priority of `line` is byte `line % 4` of word `IPR[line / 4]`. The
/// ARMv7-M NVIC allows byte access there, so the byte is written on its own
/// and the three other lines sharing the word are never touched.
pub fn set_priority(nvic: &RegisterBlock, line: u8, priority: u8) {
    check_line(line);
    assert!(
        priority < 1 << NVIC_PRIO_BITS,
        "priority {} does not fit in {} bits",
        priority,
        NVIC_PRIO_BITS
    );
    // SAFETY: byte store to the line's own priority field.
    unsafe { nvic.ipr[priority_byte(line)].write(priority << (8 - NVIC_PRIO_BITS)) };
}

/// Priority of interrupt `line`, as passed to [`set_priority`].
pub fn priority(nvic: &RegisterBlock, line: u8) -> u8 {
    check_line(line);
    nvic.ipr[priority_byte(line)].read() >> (8 - NVIC_PRIO_BITS)
}

fn priority_byte(line: u8) -> usize {
    4 * usize::from(line / 4) + usize::from(line % 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::zeroed_nvic;

    #[test]
    fn enable_selects_word_and_bit() {
        let nvic = zeroed_nvic();
        set_enabled(&nvic, 5, true);
        set_enabled(&nvic, 37, true);
        set_enabled(&nvic, 71, true);
        assert_eq!(nvic.iser[0].read(), 1 << 5);
        assert_eq!(nvic.iser[1].read(), 1 << 5);
        assert_eq!(nvic.iser[2].read(), 1 << 7);
        assert!(is_enabled(&nvic, 37));
        assert!(!is_enabled(&nvic, 38));
    }

    #[test]
    fn disable_writes_only_its_bit() {
        let nvic = zeroed_nvic();
        set_enabled(&nvic, 53, false);
        assert_eq!(nvic.icer[1].read(), 1 << 21);
        assert_eq!(nvic.iser[1].read(), 0);
    }

    /// `IPR[word]` as the core sees it.
    fn priority_word(nvic: &RegisterBlock, word: usize) -> u32 {
        let bytes: [u8; 4] = core::array::from_fn(|i| nvic.ipr[4 * word + i].read());
        u32::from_le_bytes(bytes)
    }

    #[test]
    fn priority_lands_in_implemented_bits() {
        let nvic = zeroed_nvic();
        set_priority(&nvic, 5, 3);
        // IPR1, byte 1, top four bits.
        assert_eq!(priority_word(&nvic, 1), 0x30 << 8);
        assert_eq!(priority(&nvic, 5), 3);
    }

    #[test]
    fn priority_leaves_neighbours_alone() {
        let nvic = zeroed_nvic();
        for (byte, value) in [0xD0, 0xC0, 0xB0, 0xA0].into_iter().enumerate() {
            unsafe { nvic.ipr[36 + byte].write(value) };
        }
        set_priority(&nvic, 37, 15);
        assert_eq!(priority_word(&nvic, 9), 0xA0B0_F0D0);
        set_priority(&nvic, 37, 0);
        assert_eq!(priority_word(&nvic, 9), 0xA0B0_00D0);
        assert_eq!(priority(&nvic, 39), 0xA);
    }

    #[test]
    #[should_panic]
    fn line_out_of_range_panics() {
        let nvic = zeroed_nvic();
        set_enabled(&nvic, MAX_LINE + 1, true);
    }

    #[test]
    #[should_panic]
    fn oversized_priority_panics() {
        let nvic = zeroed_nvic();
        set_priority(&nvic, 5, 16);
    }
}
