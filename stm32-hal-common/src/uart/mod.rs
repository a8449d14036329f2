//! Chip-independent USART types

mod divisor;
mod utils;

pub use divisor::{compute_divisor, Divisor, InvalidBaudRate, MANTISSA_MAX, OVERSAMPLING};
pub use utils::*;
