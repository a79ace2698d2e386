use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast::{self, Receiver, Sender, error::TryRecvError};

use super::{SyncChannel, Transport};

/// Frames a member may fall behind by before the oldest are skipped.
const CHANNEL_CAPACITY: usize = 64;

/// In-process broadcast bus.
///
/// Each channel name maps to one broadcast sender. Members subscribe to it
/// and skip the frames they posted themselves.
#[derive(Clone, Default)]
pub struct MemoryBus {
    inner: Arc<Mutex<BusState>>,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    groups: HashMap<String, Sender<Frame>>,
}

#[derive(Debug, Clone)]
struct Frame {
    from: u64,
    body: String,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the group `name`. Opening the same name again joins the same group.
    pub fn open(&self, name: &str) -> SyncChannel {
        let (id, tx, rx) = {
            let mut state = self.state();
            state.next_id += 1;
            let id = state.next_id;
            let tx = state
                .groups
                .entry(name.to_string())
                .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                .clone();
            let rx = tx.subscribe();
            (id, tx, rx)
        };
        log::debug!("[{name}] member {id} joined");
        SyncChannel::new(
            name,
            Box::new(BusLink {
                bus: self.clone(),
                group: name.to_string(),
                id,
                tx,
                rx: Some(rx),
            }),
        )
    }

    /// Open handles on `name`.
    pub fn member_count(&self, name: &str) -> usize {
        self.state()
            .groups
            .get(name)
            .map_or(0, Sender::receiver_count)
    }

    fn state(&self) -> MutexGuard<'_, BusState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct BusLink {
    bus: MemoryBus,
    group: String,
    id: u64,
    tx: Sender<Frame>,
    /// `None` once closed.
    rx: Option<Receiver<Frame>>,
}

impl Transport for BusLink {
    fn post(&self, frame: &str) {
        if self.rx.is_none() {
            return;
        }
        // Our own receiver is subscribed, so this only fails mid-close.
        let _ = self.tx.send(Frame {
            from: self.id,
            body: frame.to_string(),
        });
    }

    fn try_recv(&mut self) -> Option<String> {
        let rx = self.rx.as_mut()?;
        loop {
            match rx.try_recv() {
                Ok(frame) if frame.from == self.id => continue,
                Ok(frame) => return Some(frame.body),
                Err(TryRecvError::Lagged(skipped)) => {
                    log::debug!("[{}] member {} skipped {skipped} frames", self.group, self.id);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    fn close(&mut self) {
        if self.rx.take().is_none() {
            return;
        }
        let mut state = self.bus.state();
        if state
            .groups
            .get(&self.group)
            .is_some_and(|tx| tx.receiver_count() == 0)
        {
            state.groups.remove(&self.group);
        }
        log::debug!("[{}] member {} left", self.group, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{Source, SyncMessage};

    fn change(index: usize) -> SyncMessage {
        SyncMessage::SlideChange {
            index,
            source: Source::Audience,
        }
    }

    #[test]
    fn test_same_name_joins_same_group() {
        let bus = MemoryBus::new();
        let _a = bus.open("deckview-talk");
        let _b = bus.open("deckview-talk");
        assert_eq!(bus.member_count("deckview-talk"), 2);
    }

    #[test]
    fn test_sender_does_not_hear_itself() {
        let bus = MemoryBus::new();
        let mut a = bus.open("deckview-talk");
        let mut b = bus.open("deckview-talk");
        a.send(&change(1));
        assert_eq!(a.recv(), None);
        assert_eq!(b.recv(), Some(change(1)));
    }

    #[test]
    fn test_broadcast_reaches_every_other_member() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-talk");
        let mut b = bus.open("deckview-talk");
        let mut c = bus.open("deckview-talk");
        a.send(&change(4));
        assert_eq!(b.drain(), vec![change(4)]);
        assert_eq!(c.drain(), vec![change(4)]);
    }

    #[test]
    fn test_groups_do_not_cross_talk() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-one");
        let mut b = bus.open("deckview-two");
        a.send(&change(1));
        assert_eq!(b.recv(), None);
    }

    #[test]
    fn test_send_without_listeners_is_dropped() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-talk");
        a.send(&change(1));
        let mut late = bus.open("deckview-talk");
        assert_eq!(late.recv(), None);
    }

    #[test]
    fn test_receipt_order_is_preserved() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-talk");
        let mut b = bus.open("deckview-talk");
        for i in 0..5 {
            a.send(&change(i));
        }
        let got: Vec<usize> = b.drain().iter().filter_map(SyncMessage::index).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_close_discards_pending_and_leaves_group() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-talk");
        let mut b = bus.open("deckview-talk");
        a.send(&change(2));
        b.close();
        assert_eq!(b.recv(), None);
        assert_eq!(bus.member_count("deckview-talk"), 1);
    }

    #[test]
    fn test_slow_member_skips_oldest_frames() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-talk");
        let mut b = bus.open("deckview-talk");
        for i in 0..CHANNEL_CAPACITY + 6 {
            a.send(&change(i));
        }
        let got: Vec<usize> = b.drain().iter().filter_map(SyncMessage::index).collect();
        assert_eq!(got.len(), CHANNEL_CAPACITY);
        assert_eq!(got.last(), Some(&(CHANNEL_CAPACITY + 5)));
    }

    #[test]
    fn test_drop_leaves_group() {
        let bus = MemoryBus::new();
        let a = bus.open("deckview-talk");
        {
            let _b = bus.open("deckview-talk");
            assert_eq!(bus.member_count("deckview-talk"), 2);
        }
        assert_eq!(bus.member_count("deckview-talk"), 1);
        drop(a);
        assert_eq!(bus.member_count("deckview-talk"), 0);
    }
}
