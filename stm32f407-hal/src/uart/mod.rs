//! Universal Synchronous/Asynchronous Receiver Transmitter (USART)
//!
//! See [Section 30](https://www.st.com/resource/en/reference_manual/rm0090.pdf) of RM0090 for more details.
//!
//! Drives USART1-3, UART4-5 and USART6 in asynchronous mode with 16x
//! oversampling. Transfers either poll the status register
//! ([`Usart::send`], [`Usart::receive`]) or move one byte per interrupt
//! ([`Usart::start_send`], [`Usart::start_receive`] together with
//! [`Usart::handle_interrupt`]).
//!
//! ## Usage
//!
//! ```no_run
//! use fugit::{HertzU32, RateExtU32};
//! use stm32f407_hal::{
//!     clocks::BusClocks,
//!     pac,
//!     uart::{Instance, StopBits, Usart, UsartConfig, WordLength},
//! };
//!
//! let dp = pac::Peripherals::take().unwrap();
//! // APB1 at 42 MHz, APB2 at 84 MHz.
//! let clocks = BusClocks::new(HertzU32::MHz(42), HertzU32::MHz(84));
//!
//! let mut uart = Usart::init(
//!     dp,
//!     Instance::Usart2,
//!     UsartConfig::new(9600.Hz(), WordLength::Eight, None, StopBits::One),
//!     &clocks,
//! )
//! .unwrap();
//!
//! uart.send(b"Hello World!\r\n").unwrap();
//! ```

mod config;
mod event;
mod instance;
mod peripheral;
mod reader;
mod transfer;
mod utils;
mod writer;

pub use config::{configure, deconfigure, set_enabled, set_interrupt_sources};
pub use event::{Event, EventNotifier, NoopNotifier};
pub use instance::Instance;
pub use peripheral::Usart;
pub use transfer::{Released, Status, TransferState};
pub use utils::*;
