//! Common HAL code
//!
//! This library contains types and functions which are shared between the
//! STM32 USART HAL crates.
//!
//! You shouldn't include anything here which requires either the `cortex-m`
//! crate, or access to peripheral registers.

#![cfg_attr(not(test), no_std)]

pub mod uart;
