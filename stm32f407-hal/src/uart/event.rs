//! Transfer notifications
//!
//! A [`Usart`](super::Usart) tells the application about finished and
//! failed interrupt-driven transfers through an [`EventNotifier`]. The
//! notifier runs inside the interrupt handler: it must not block.

use super::{Instance, LineError};

/// What happened to the current transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Every byte has been transferred.
    Completion,
    /// The transfer was aborted on an overrun.
    OverrunError,
    /// The transfer was aborted on a framing error.
    FramingError,
    /// The transfer was aborted on a parity error.
    ParityError,
}

impl From<LineError> for Event {
    fn from(error: LineError) -> Self {
        match error {
            LineError::Overrun => Event::OverrunError,
            LineError::Framing => Event::FramingError,
            LineError::Parity => Event::ParityError,
        }
    }
}

/// Receives transfer events.
///
/// Any `FnMut(Instance, Event)` closure is a notifier.
pub trait EventNotifier {
    /// Called once per finished or failed transfer.
    fn on_uart_event(&mut self, instance: Instance, event: Event);
}

/// Notifier that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl EventNotifier for NoopNotifier {
    fn on_uart_event(&mut self, _instance: Instance, _event: Event) {}
}

impl<F> EventNotifier for F
where
    F: FnMut(Instance, Event),
{
    fn on_uart_event(&mut self, instance: Instance, event: Event) {
        self(instance, event)
    }
}
