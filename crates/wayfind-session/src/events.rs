//! Bounded, non-blocking event queues between producers and the coordinator
//!
//! Sensor callbacks and UI handlers hold a cloneable [`EventSender`]. Sending
//! never blocks. Heading samples and user commands travel on separate queues:
//! a full heading queue evicts its oldest sample, so a burst of sensor updates
//! never pushes out a command. The coordinator drains both queues at the start
//! of each frame, so all state changes happen on the frame loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use wayfind_align::HeadingSample;

/// User commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose the destination room by exact name
    SelectDestination(String),
    StartNavigation,
    StopNavigation,
    Recalibrate,
    /// Leave AR; stops navigation and detaches sensors
    ExitAr,
}

/// Anything that can change session state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Heading(HeadingSample),
    Command(Command),
}

impl From<Command> for SessionEvent {
    fn from(command: Command) -> Self {
        SessionEvent::Command(command)
    }
}

impl From<HeadingSample> for SessionEvent {
    fn from(sample: HeadingSample) -> Self {
        SessionEvent::Heading(sample)
    }
}

/// Creates queues holding at most `capacity` pending headings and `capacity`
/// pending commands
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    let capacity = capacity.max(1);
    let (heading_tx, heading_rx) = bounded(capacity);
    let (command_tx, command_rx) = bounded(capacity);
    let closed = Arc::new(AtomicBool::new(false));
    (
        EventSender {
            headings: heading_tx,
            stale_headings: heading_rx.clone(),
            commands: command_tx,
            dropped: Arc::new(AtomicU64::new(0)),
            closed: Arc::clone(&closed),
        },
        EventReceiver {
            headings: heading_rx,
            commands: command_rx,
            closed,
        },
    )
}

/// Producer handle, cheap to clone
#[derive(Debug, Clone)]
pub struct EventSender {
    headings: Sender<HeadingSample>,
    /// Used to evict the oldest sample when the heading queue is full
    stale_headings: Receiver<HeadingSample>,
    commands: Sender<Command>,
    dropped: Arc<AtomicU64>,
    /// Set once the receiver is dropped
    closed: Arc<AtomicBool>,
}

impl EventSender {
    /// Queues an event without blocking
    ///
    /// A heading sent to a full queue replaces the oldest queued sample. A
    /// command sent to a full queue is dropped. Returns `false` when the event
    /// itself was dropped.
    pub fn send(&self, event: impl Into<SessionEvent>) -> bool {
        match event.into() {
            SessionEvent::Heading(sample) => self.send_heading(sample),
            SessionEvent::Command(command) => match self.commands.try_send(command) {
                Ok(()) => true,
                Err(TrySendError::Full(command)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Command queue full, dropping {:?}", command);
                    false
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    false
                }
            },
        }
    }

    fn send_heading(&self, sample: HeadingSample) -> bool {
        if self.closed.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let sample = match self.headings.try_send(sample) {
            Ok(()) => return true,
            Err(TrySendError::Full(sample)) => sample,
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        };

        if let Ok(stale) = self.stale_headings.try_recv() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            log::debug!("Heading queue full, evicting {:?}", stale);
        }

        // Another producer may have refilled the slot
        match self.headings.try_send(sample) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("Heading queue full, dropping {:?}", sample);
                false
            }
        }
    }

    /// Number of events dropped or evicted across all clones of this sender
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer end, owned by the coordinator
///
/// Pending headings are delivered before pending commands, so a queued
/// `Recalibrate` sees the newest heading. Each queue keeps its own order.
#[derive(Debug)]
pub struct EventReceiver {
    headings: Receiver<HeadingSample>,
    commands: Receiver<Command>,
    closed: Arc<AtomicBool>,
}

impl EventReceiver {
    pub fn try_recv(&self) -> Option<SessionEvent> {
        self.headings
            .try_recv()
            .map(SessionEvent::Heading)
            .or_else(|_| self.commands.try_recv().map(SessionEvent::Command))
            .ok()
    }

    /// Takes up to `max` pending events, headings first
    pub fn try_recv_batch(&self, max: usize) -> Vec<SessionEvent> {
        let mut batch = Vec::with_capacity(max.min(64));
        while batch.len() < max {
            match self.try_recv() {
                Some(event) => batch.push(event),
                None => break,
            }
        }
        batch
    }

    /// Pending events across both queues
    pub fn len(&self) -> usize {
        self.headings.len() + self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty() && self.commands.is_empty()
    }
}

impl Drop for EventReceiver {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(degrees: f32) -> HeadingSample {
        HeadingSample::new(degrees).unwrap()
    }

    #[test]
    fn test_headings_precede_commands() {
        let (sender, receiver) = event_channel(8);

        assert!(sender.send(Command::SelectDestination("LAB".into())));
        assert!(sender.send(heading(90.0)));
        assert!(sender.send(Command::StartNavigation));
        assert_eq!(receiver.len(), 3);

        let batch = receiver.try_recv_batch(10);
        assert_eq!(
            batch,
            vec![
                SessionEvent::Heading(heading(90.0)),
                SessionEvent::Command(Command::SelectDestination("LAB".into())),
                SessionEvent::Command(Command::StartNavigation),
            ]
        );
        assert!(receiver.is_empty());
    }

    #[test]
    fn test_full_command_queue_drops() {
        let (sender, receiver) = event_channel(2);
        let clone = sender.clone();

        assert!(sender.send(Command::StartNavigation));
        assert!(clone.send(Command::StopNavigation));
        assert!(!sender.send(Command::Recalibrate));

        // The drop counter is shared between clones
        assert_eq!(clone.dropped(), 1);
        assert_eq!(receiver.len(), 2);
    }

    #[test]
    fn test_full_heading_queue_evicts_oldest() {
        let (sender, receiver) = event_channel(2);

        assert!(sender.send(heading(10.0)));
        assert!(sender.send(heading(20.0)));
        assert!(sender.send(heading(30.0)));

        assert_eq!(sender.dropped(), 1);
        assert_eq!(
            receiver.try_recv_batch(10),
            vec![
                SessionEvent::Heading(heading(20.0)),
                SessionEvent::Heading(heading(30.0)),
            ]
        );
    }

    #[test]
    fn test_heading_burst_keeps_commands() {
        let (sender, receiver) = event_channel(4);

        assert!(sender.send(Command::Recalibrate));
        for i in 0..100 {
            sender.send(heading(i as f32));
        }
        assert!(sender.send(Command::StopNavigation));

        let batch = receiver.try_recv_batch(receiver.len());
        assert_eq!(batch.len(), 6);
        assert_eq!(batch[0], SessionEvent::Heading(heading(96.0)));
        assert_eq!(batch[3], SessionEvent::Heading(heading(99.0)));
        assert_eq!(batch[4], SessionEvent::Command(Command::Recalibrate));
        assert_eq!(batch[5], SessionEvent::Command(Command::StopNavigation));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (sender, receiver) = event_channel(4);
        drop(receiver);

        assert!(!sender.send(Command::ExitAr));
        assert!(!sender.send(heading(45.0)));
        assert_eq!(sender.dropped(), 2);
    }

    #[test]
    fn test_batch_limit() {
        let (sender, receiver) = event_channel(16);
        for _ in 0..5 {
            sender.send(Command::Recalibrate);
        }

        assert_eq!(receiver.try_recv_batch(3).len(), 3);
        assert_eq!(receiver.try_recv_batch(3).len(), 2);
        assert!(receiver.try_recv().is_none());
    }
}
