mod audience;

use std::num::NonZeroUsize;

use super::{AudienceController, PresenterController, ViewerSettings};
use crate::sync::{MemoryBus, SyncChannel, SyncMessage};

const CHANNEL: &str = "deckview-test-deck";

fn count(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("slide count must be non-zero")
}

/// Audience view joined to `bus`.
fn audience(bus: &MemoryBus, slides: usize) -> AudienceController {
    AudienceController::new(
        count(slides),
        bus.open(CHANNEL),
        ViewerSettings {
            share_base: "https://example.com/slides/test-deck".to_string(),
            ..ViewerSettings::default()
        },
        None,
    )
}

/// Audience view with no transport at all.
fn standalone_audience(slides: usize, fragment: Option<&str>) -> AudienceController {
    AudienceController::new(
        count(slides),
        SyncChannel::detached(CHANNEL),
        ViewerSettings::default(),
        fragment,
    )
}

fn presenter(bus: &MemoryBus, slides: usize) -> PresenterController {
    PresenterController::mount(count(slides), bus.open(CHANNEL))
}

/// A bare member of the channel used to observe broadcasts.
fn observer(bus: &MemoryBus) -> SyncChannel {
    bus.open(CHANNEL)
}

fn slide_change_indices(messages: &[SyncMessage]) -> Vec<usize> {
    messages
        .iter()
        .filter_map(|m| match m {
            SyncMessage::SlideChange { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}
