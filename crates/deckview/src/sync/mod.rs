//! Broadcast channel coupling the audience and presenter views.
//!
//! A [`SyncChannel`] is the only legal path between two views. It is
//! fire-and-forget: no acknowledgements, no retries, no delivery to the
//! sender, and frames sent while nobody else listens are simply lost.
//! Inbound frames queue in a per-view inbox that the owning view drains from
//! its own event loop.

pub mod bus;
pub mod message;

pub use bus::MemoryBus;
pub use message::{Source, SyncMessage};

/// Underlying broadcast mechanism for one member of a channel group.
pub trait Transport: Send {
    /// Deliver a frame to every other member of the group.
    fn post(&self, frame: &str);

    /// Next frame waiting in this member's inbox.
    fn try_recv(&mut self) -> Option<String>;

    /// Leave the group. Frames still queued are discarded.
    fn close(&mut self);
}

/// Channel name for a deck, so that different decks never cross-talk.
pub fn channel_name(deck_id: &str) -> String {
    format!("deckview-{deck_id}")
}

/// A view's handle on a named broadcast group.
///
/// Dropping the handle closes it.
pub struct SyncChannel {
    name: String,
    transport: Option<Box<dyn Transport>>,
}

impl SyncChannel {
    pub fn new(name: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            name: name.into(),
            transport: Some(transport),
        }
    }

    /// A handle with no transport behind it. Every operation is a no-op, which
    /// leaves the owning view working as a standalone tool.
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn send(&self, message: &SyncMessage) {
        log::trace!("[{}] send {:?}", self.name, message);
        self.send_frame(&message.encode());
    }

    pub(crate) fn send_frame(&self, frame: &str) {
        if let Some(transport) = &self.transport {
            transport.post(frame);
        }
    }

    /// Next decodable message in the inbox. Malformed frames are dropped.
    pub fn recv(&mut self) -> Option<SyncMessage> {
        let transport = self.transport.as_mut()?;
        while let Some(frame) = transport.try_recv() {
            match SyncMessage::decode(&frame) {
                Ok(message) => return Some(message),
                Err(e) => log::debug!("[{}] dropping frame: {e}", self.name),
            }
        }
        None
    }

    /// Everything currently in the inbox, in receipt order.
    pub fn drain(&mut self) -> Vec<SyncMessage> {
        std::iter::from_fn(|| self.recv()).collect()
    }

    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            log::debug!("[{}] closing channel", self.name);
            transport.close();
        }
    }
}

impl Drop for SyncChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SyncChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncChannel")
            .field("name", &self.name)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_includes_deck_id() {
        assert_eq!(channel_name("intro-talk"), "deckview-intro-talk");
    }

    #[test]
    fn test_detached_channel_is_inert() {
        let mut channel = SyncChannel::detached("deckview-x");
        assert!(!channel.is_connected());
        channel.send(&SyncMessage::SyncRequest {
            source: Source::Presenter,
        });
        assert_eq!(channel.recv(), None);
        channel.close();
        assert!(channel.drain().is_empty());
    }

    #[test]
    fn test_malformed_frames_are_skipped() {
        let bus = MemoryBus::new();
        let noisy = bus.open("deckview-x");
        let mut listener = bus.open("deckview-x");

        noisy.send_frame("{garbage");
        noisy.send(&SyncMessage::SlideChange {
            index: 2,
            source: Source::Audience,
        });
        noisy.send_frame(r#"{"type":"SLIDE_CHANGE","index":-4,"source":"audience"}"#);

        assert_eq!(
            listener.drain(),
            vec![SyncMessage::SlideChange {
                index: 2,
                source: Source::Audience
            }]
        );
    }
}
