//! Minimal publish/subscribe channel used by panes and the zoom level.

use std::sync::mpsc::{self, Receiver, Sender};

/// A named output that any number of subscribers can listen to.
///
/// Every subscriber receives its own copy of each emitted value, in emission
/// order. Subscribers that dropped their receiver are pruned on the next emit.
#[derive(Debug)]
pub struct Signal<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E: Clone> Signal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `event` to every live subscriber.
    pub fn emit(&mut self, event: E) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_each_event() {
        let mut signal = Signal::new();
        let first = signal.subscribe();
        let second = signal.subscribe();

        signal.emit(1);
        signal.emit(2);

        assert_eq!(first.try_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(second.try_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut signal = Signal::new();
        let kept = signal.subscribe();
        drop(signal.subscribe());

        signal.emit("ping");

        assert_eq!(signal.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok("ping"));
    }
}
