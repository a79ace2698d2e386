use std::num::NonZeroUsize;
use std::time::Instant;

use super::{NavKey, NavigationState};
use crate::sync::{Source, SyncChannel, SyncMessage};
use crate::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterInput {
    Key(NavKey),
    Prev,
    Next,
    First,
    Last,
    ToggleTimer { at: Instant },
    ResetTimer,
}

/// Whether the view has heard back from an audience view since mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Sync request sent, no answer yet. May stay this way forever.
    Awaiting,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPane {
    Slide(usize),
    LastSlide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesPane<'a> {
    Text(&'a str),
    Empty,
}

/// The presenter view's state machine.
///
/// Same navigation rules as the audience, but every local move is sent out
/// with `source: Presenter`, so this view can drive the audience.
#[derive(Debug)]
pub struct PresenterController {
    state: NavigationState,
    channel: SyncChannel,
    sync_status: SyncStatus,
    timer: Timer,
}

impl PresenterController {
    /// Mount the view at slide 0 and ask any open audience view where it is.
    pub fn mount(slide_count: NonZeroUsize, channel: SyncChannel) -> Self {
        channel.send(&SyncMessage::SyncRequest {
            source: Source::Presenter,
        });
        log::debug!("presenter mounted on {}", channel.name());
        Self {
            state: NavigationState::new(slide_count),
            channel,
            sync_status: SyncStatus::Awaiting,
            timer: Timer::new(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Apply one input. Returns whether the slide index moved.
    pub fn handle(&mut self, input: PresenterInput) -> bool {
        let moved = match input {
            PresenterInput::Key(NavKey::ArrowLeft) | PresenterInput::Prev => self.state.prev(),
            PresenterInput::Key(NavKey::ArrowRight | NavKey::Space) | PresenterInput::Next => {
                self.state.next()
            }
            PresenterInput::Key(NavKey::Home) | PresenterInput::First => self.state.first(),
            PresenterInput::Key(NavKey::End) | PresenterInput::Last => self.state.last(),
            PresenterInput::Key(NavKey::G | NavKey::Escape) => false,
            PresenterInput::ToggleTimer { at } => {
                self.timer.toggle(at);
                false
            }
            PresenterInput::ResetTimer => {
                self.timer.reset();
                false
            }
        };
        if moved {
            log::debug!("presenter at slide {}", self.state.active_index() + 1);
            self.channel.send(&SyncMessage::SlideChange {
                index: self.state.active_index(),
                source: Source::Presenter,
            });
        }
        moved
    }

    /// Drain the inbox and apply every message in receipt order.
    pub fn pump_sync(&mut self) -> usize {
        let messages = self.channel.drain();
        for message in &messages {
            self.on_message(*message);
        }
        messages.len()
    }

    pub fn on_message(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::SlideChange { index, .. } => {
                self.state.go_to(index);
            }
            SyncMessage::SyncResponse { index, .. } => {
                self.state.go_to(index);
                if self.sync_status == SyncStatus::Awaiting {
                    log::debug!("presenter synced to slide {}", self.state.active_index() + 1);
                }
                self.sync_status = SyncStatus::Synced;
            }
            // Only audience views answer sync requests.
            SyncMessage::SyncRequest { .. } => {}
        }
    }

    pub fn next_pane(&self) -> NextPane {
        if self.state.is_last() {
            NextPane::LastSlide
        } else {
            NextPane::Slide(self.state.active_index() + 1)
        }
    }

    pub fn notes_pane<'a>(&self, notes: &'a [String]) -> NotesPane<'a> {
        match notes.get(self.state.active_index()) {
            Some(note) if !note.trim().is_empty() => NotesPane::Text(note),
            _ => NotesPane::Empty,
        }
    }

    /// `N / total`, 1-based.
    pub fn page_label(&self) -> String {
        format!(
            "{} / {}",
            self.state.active_index() + 1,
            self.state.slide_count()
        )
    }

    pub fn reload(&mut self, slide_count: NonZeroUsize) {
        self.state.resize(slide_count);
    }
}
