//! Destinations for outgoing instrument commands.

use rtrb::Producer;

use crate::messages::InstrumentCommand;

/// Anything that accepts parameter updates for the audio engine.
pub trait InstrumentSink {
    fn send(&mut self, command: InstrumentCommand);
}

impl InstrumentSink for Vec<InstrumentCommand> {
    fn send(&mut self, command: InstrumentCommand) {
        self.push(command);
    }
}

/// Pushes commands into a ring buffer drained by the host.
///
/// A full buffer drops the command; the next frame sends fresh values anyway.
pub struct RingSink {
    producer: Producer<InstrumentCommand>,
    dropped: usize,
}

impl RingSink {
    pub fn new(producer: Producer<InstrumentCommand>) -> Self {
        Self {
            producer,
            dropped: 0,
        }
    }

    /// Commands lost to a full buffer since creation.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl InstrumentSink for RingSink {
    fn send(&mut self, command: InstrumentCommand) {
        if self.producer.push(command).is_err() {
            self.dropped += 1;
            log::warn!(
                "command queue full, dropped {} command ({} total)",
                command.kind(),
                self.dropped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn test_ring_sink_delivers_in_order() {
        let (producer, mut consumer) = RingBuffer::new(4);
        let mut sink = RingSink::new(producer);
        sink.send(InstrumentCommand::SetFrequency(440.0));
        sink.send(InstrumentCommand::SetVolume(-6.0));

        assert_eq!(consumer.pop().ok(), Some(InstrumentCommand::SetFrequency(440.0)));
        assert_eq!(consumer.pop().ok(), Some(InstrumentCommand::SetVolume(-6.0)));
        assert!(consumer.pop().is_err());
    }

    #[test]
    fn test_ring_sink_drops_when_full() {
        let (producer, mut consumer) = RingBuffer::new(1);
        let mut sink = RingSink::new(producer);
        sink.send(InstrumentCommand::SetWetness(0.1));
        sink.send(InstrumentCommand::SetWetness(0.2));

        assert_eq!(sink.dropped(), 1);
        assert_eq!(consumer.pop().ok(), Some(InstrumentCommand::SetWetness(0.1)));
    }
}
