//! Producer running on a worker thread.
//!
//! The worker steps a [`Producer`] and hands every unit over a rendezvous
//! channel (capacity 0), so decoding runs at most one unit ahead of the
//! consumer. Each message is one `Result<Option<Produced>>`; the worker stops
//! after sending the end of the stream or an error, or when the receiving
//! side is gone.

use crate::producer::{Produced, Producer, UnitSource};
use crossbeam_channel::{Receiver, Sender, bounded};
use oxigz_core::error::{GzError, Result};
use std::io::Read;
use std::thread;

type Message = Result<Option<Produced>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Done,
    Failed,
}

/// Unit source fed by a producer on another thread.
#[derive(Debug)]
pub struct PipelinedSource {
    receiver: Receiver<Message>,
    status: Status,
}

impl PipelinedSource {
    /// Start a worker decoding `reader`.
    pub fn spawn<R: Read + Send + 'static>(reader: R) -> Self {
        Self::from_producer(Producer::new(reader))
    }

    /// Start a worker driving an existing producer.
    pub fn from_producer<R: Read + Send + 'static>(producer: Producer<R>) -> Self {
        let (sender, receiver) = bounded(0);
        thread::spawn(move || run_producer(producer, sender));
        Self {
            receiver,
            status: Status::Running,
        }
    }
}

fn run_producer<R: Read>(mut producer: Producer<R>, sender: Sender<Message>) {
    loop {
        let message = producer.next_unit();
        let last = !matches!(message, Ok(Some(_)));
        // A send error means the consumer was dropped
        if sender.send(message).is_err() || last {
            return;
        }
    }
}

impl UnitSource for PipelinedSource {
    fn next_unit(&mut self) -> Result<Option<Produced>> {
        match self.status {
            Status::Done => return Ok(None),
            Status::Failed => return Err(GzError::Poisoned),
            Status::Running => {}
        }
        match self.receiver.recv() {
            Ok(Ok(Some(unit))) => Ok(Some(unit)),
            Ok(Ok(None)) => {
                self.status = Status::Done;
                Ok(None)
            }
            Ok(Err(err)) => {
                self.status = Status::Failed;
                Err(err)
            }
            Err(_) => {
                self.status = Status::Failed;
                Err(GzError::WorkerLost)
            }
        }
    }
}
