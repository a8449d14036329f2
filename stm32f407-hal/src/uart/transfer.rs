//! Interrupt-driven transfer bookkeeping
//!
//! [`TransferState`] tracks one buffer moving through the peripheral, one
//! byte per interrupt. It never touches registers itself; the
//! [`Usart`](super::Usart) handle feeds it.

use super::{LineError, TransferError};

/// Where the current transfer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// No transfer has been started, or the last one was cleared.
    Idle,
    /// Bytes are being written from the send buffer.
    Sending,
    /// Bytes are being read into the receive buffer.
    Receiving,
    /// Every byte has been transferred.
    Complete,
    /// The transfer was aborted on a receiver error.
    Error(LineError),
}

impl Status {
    /// Is a transfer running?
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Status::Sending | Status::Receiving)
    }

    /// Has the last transfer finished, successfully or not?
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Status::Complete | Status::Error(_))
    }
}

/// A buffer handed back once its transfer is over.
#[derive(Debug, PartialEq, Eq)]
pub enum Released<'b> {
    /// The buffer of a send.
    Sent(&'b [u8]),
    /// The buffer of a receive. Bytes past the point where an error stopped
    /// the transfer are untouched.
    Received(&'b mut [u8]),
}

#[derive(Debug)]
enum Buffer<'b> {
    Empty,
    Tx(&'b [u8]),
    Rx(&'b mut [u8]),
}

impl Buffer<'_> {
    fn len(&self) -> usize {
        match self {
            Buffer::Empty => 0,
            Buffer::Tx(data) => data.len(),
            Buffer::Rx(data) => data.len(),
        }
    }
}

/// Progress of one interrupt-driven transfer.
#[derive(Debug)]
pub struct TransferState<'b> {
    buffer: Buffer<'b>,
    cursor: usize,
    status: Status,
}

impl Default for TransferState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'b> TransferState<'b> {
    /// An idle state holding no buffer.
    pub const fn new() -> Self {
        TransferState {
            buffer: Buffer::Empty,
            cursor: 0,
            status: Status::Idle,
        }
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Number of bytes transferred so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the current buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Does the current buffer hold no bytes?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_idle(&self) -> Result<(), TransferError> {
        if self.status.is_in_progress() {
            Err(TransferError::Busy)
        } else {
            Ok(())
        }
    }

    /// Starts sending `data`.
    ///
    /// Returns the new status: `Complete` straight away for an empty buffer.
    pub fn begin_send(&mut self, data: &'b [u8]) -> Result<Status, TransferError> {
        self.check_idle()?;
        self.buffer = Buffer::Tx(data);
        self.cursor = 0;
        self.status = if data.is_empty() {
            Status::Complete
        } else {
            Status::Sending
        };
        Ok(self.status)
    }

    /// Starts receiving into `buffer`.
    ///
    /// Returns the new status: `Complete` straight away for an empty buffer.
    pub fn begin_receive(&mut self, buffer: &'b mut [u8]) -> Result<Status, TransferError> {
        self.check_idle()?;
        let empty = buffer.is_empty();
        self.buffer = Buffer::Rx(buffer);
        self.cursor = 0;
        self.status = if empty {
            Status::Complete
        } else {
            Status::Receiving
        };
        Ok(self.status)
    }

    /// Takes the next byte to send and advances the cursor.
    ///
    /// Returns `None` unless a send is in progress with bytes left.
    pub fn next_tx_byte(&mut self) -> Option<u8> {
        match (&self.buffer, self.status) {
            (Buffer::Tx(data), Status::Sending) => {
                let byte = *data.get(self.cursor)?;
                self.cursor += 1;
                Some(byte)
            }
            _ => None,
        }
    }

    /// Stores a received byte at the cursor and advances it.
    ///
    /// Returns `false`, dropping `byte`, unless a receive is in progress with
    /// room left.
    pub fn store_rx_byte(&mut self, byte: u8) -> bool {
        match (&mut self.buffer, self.status) {
            (Buffer::Rx(buffer), Status::Receiving) => match buffer.get_mut(self.cursor) {
                Some(slot) => {
                    *slot = byte;
                    self.cursor += 1;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Have all bytes of the running transfer gone through?
    pub fn is_done(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    /// Marks the running transfer as complete.
    pub fn complete(&mut self) {
        self.status = Status::Complete;
    }

    /// Aborts the running transfer at the cursor.
    pub fn fail(&mut self, error: LineError) {
        self.status = Status::Error(error);
    }

    /// Returns to `Idle` and hands back the buffer of a finished transfer.
    ///
    /// Fails with `Busy` while a transfer is in progress. An idle state
    /// releases nothing.
    pub fn release(&mut self) -> Result<Option<Released<'b>>, TransferError> {
        self.check_idle()?;
        let buffer = core::mem::replace(&mut self.buffer, Buffer::Empty);
        self.cursor = 0;
        self.status = Status::Idle;
        Ok(match buffer {
            Buffer::Empty => None,
            Buffer::Tx(data) => Some(Released::Sent(data)),
            Buffer::Rx(data) => Some(Released::Received(data)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_walks_the_buffer_in_order() {
        let data = [1, 2, 3];
        let mut state = TransferState::new();
        assert_eq!(state.begin_send(&data), Ok(Status::Sending));
        assert_eq!(state.next_tx_byte(), Some(1));
        assert_eq!(state.next_tx_byte(), Some(2));
        assert!(!state.is_done());
        assert_eq!(state.next_tx_byte(), Some(3));
        assert!(state.is_done());
        assert_eq!(state.next_tx_byte(), None);
        state.complete();
        assert_eq!(state.status(), Status::Complete);
        assert_eq!(state.release(), Ok(Some(Released::Sent(&data[..]))));
        assert_eq!(state.status(), Status::Idle);
    }

    #[test]
    fn busy_while_in_progress() {
        let data = [0u8; 4];
        let mut other = [0u8; 2];
        let mut state = TransferState::new();
        state.begin_send(&data).unwrap();
        state.next_tx_byte();

        assert_eq!(state.begin_receive(&mut other), Err(TransferError::Busy));
        assert_eq!(state.begin_send(&data), Err(TransferError::Busy));
        assert_eq!(state.release(), Err(TransferError::Busy));
        assert_eq!(state.status(), Status::Sending);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn terminal_states_accept_a_new_transfer() {
        let first = [9u8];
        let mut second = [0u8; 2];
        let mut state = TransferState::new();
        state.begin_send(&first).unwrap();
        state.fail(LineError::Overrun);
        assert!(state.status().is_terminal());
        assert_eq!(state.begin_receive(&mut second), Ok(Status::Receiving));
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn empty_buffers_complete_at_once() {
        let mut state = TransferState::new();
        assert_eq!(state.begin_send(&[]), Ok(Status::Complete));
        assert!(state.is_done());
        assert_eq!(state.begin_receive(&mut []), Ok(Status::Complete));
    }

    #[test]
    fn failed_receive_keeps_what_arrived() {
        let mut buffer = [0xEEu8; 4];
        let mut state = TransferState::new();
        state.begin_receive(&mut buffer).unwrap();
        assert!(state.store_rx_byte(b'o'));
        assert!(state.store_rx_byte(b'k'));
        state.fail(LineError::Framing);
        assert!(!state.store_rx_byte(b'!'));
        assert_eq!(state.status(), Status::Error(LineError::Framing));

        match state.release() {
            Ok(Some(Released::Received(data))) => assert_eq!(data, &[b'o', b'k', 0xEE, 0xEE]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn idle_state_ignores_bytes() {
        let mut state = TransferState::new();
        assert_eq!(state.next_tx_byte(), None);
        assert!(!state.store_rx_byte(1));
        assert_eq!(state.release(), Ok(None));
    }
}
