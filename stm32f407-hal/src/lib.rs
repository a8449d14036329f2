//! HAL for the USART/UART peripherals of the STM32F407 microcontroller
//!
//! This is an implementation of the [`embedded-hal`](https://crates.io/crates/embedded-hal)
//! serial traits for the six USART/UART blocks of the STM32F405/407, with
//! interrupt-driven transfers on top.
//!
//! NOTE This HAL is still under active development. This API will remain volatile until 1.0.0
//!
//! # Crate features
//!
//! * **critical-section-impl** -
//!   critical section that is safe for single core use
//! * **defmt** -
//!   Implement `defmt::Format` for several types, and log configuration and
//!   transfer errors through `defmt`.

#![warn(missing_docs)]
#![cfg_attr(not(test), no_std)]

pub use fugit;
pub use stm32_hal_common as common;
pub use stm32f4::stm32f407 as pac;

pub mod clocks;
pub mod nvic;
pub mod registers;
pub mod resets;
pub mod shared;
pub mod uart;

#[cfg(test)]
mod testing;

// Provide access to common datastructures to avoid repeating ourselves
pub use registers::RegisterMap;
pub use uart::Usart;
