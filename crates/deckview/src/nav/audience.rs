use std::num::NonZeroUsize;
use std::time::Instant;

use super::{NavKey, NavigationState, ViewerSettings, format_fragment, parse_fragment};
use crate::sync::{Source, SyncChannel, SyncMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Prev,
    Next,
}

/// One input event for the audience view.
#[derive(Debug, Clone, PartialEq)]
pub enum AudienceInput {
    Key(NavKey),
    /// Wheel movement; positive `delta_y` scrolls down (towards the next slide).
    Wheel { delta_y: f32, at: Instant },
    /// Primary click at `(x, y)` relative to a slide of `width` × `height`.
    Click {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Swipe(SwipeDirection),
    /// Secondary click at viewer coordinates.
    ContextMenu { x: f32, y: f32 },
    Menu(MenuAction),
    /// Thumbnail picked in the overview grid.
    SelectThumbnail(usize),
    /// Click on the overview backdrop.
    DismissOverview,
    /// Click anywhere outside the context menu.
    DismissMenu,
    /// The location fragment was changed from outside (deep link, typed URL).
    FragmentChanged(String),
}

/// Entries of the right-click menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Prev,
    Next,
    First,
    Last,
    /// Raw text of the "go to slide" box.
    GoTo(String),
    OpenOverview,
    ToggleFullscreen,
    CopyLink,
    GoHome,
}

/// Work the hosting window has to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ToggleFullscreen,
    CopyLink(String),
    GoHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeZone {
    Top,
    Bottom,
    Left,
    Right,
}

/// Which edge band a point falls in. Top and bottom win over left and right.
pub fn edge_zone(x: f32, y: f32, width: f32, height: f32, zone: f32) -> Option<EdgeZone> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let fx = x / width;
    let fy = y / height;
    if fy <= zone {
        Some(EdgeZone::Top)
    } else if fy >= 1.0 - zone {
        Some(EdgeZone::Bottom)
    } else if fx <= zone {
        Some(EdgeZone::Left)
    } else if fx >= 1.0 - zone {
        Some(EdgeZone::Right)
    } else {
        None
    }
}

/// The audience view's state machine.
///
/// Owns the authoritative fragment. Every local index change rewrites the
/// fragment and broadcasts a `SlideChange`; indices that arrive over the
/// channel are applied without being sent back out.
#[derive(Debug)]
pub struct AudienceController {
    state: NavigationState,
    channel: SyncChannel,
    settings: ViewerSettings,
    fragment: String,
    wheel_quiet_until: Option<Instant>,
}

impl AudienceController {
    /// Mount the view. An invalid or missing fragment starts at the first slide.
    pub fn new(
        slide_count: NonZeroUsize,
        channel: SyncChannel,
        settings: ViewerSettings,
        initial_fragment: Option<&str>,
    ) -> Self {
        let start = initial_fragment
            .and_then(|f| parse_fragment(f, slide_count.get()))
            .unwrap_or(0);
        let state = NavigationState::starting_at(slide_count, start);
        log::debug!(
            "audience mounted on {} at slide {}/{}",
            channel.name(),
            start + 1,
            slide_count
        );
        Self {
            state,
            channel,
            settings,
            fragment: format_fragment(start),
            wheel_quiet_until: None,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn is_synced(&self) -> bool {
        self.channel.is_connected()
    }

    /// `<share base>#<N>` for the current slide.
    pub fn share_link(&self) -> String {
        format!("{}{}", self.settings.share_base, self.fragment)
    }

    pub fn handle(&mut self, input: AudienceInput) -> Option<Effect> {
        match input {
            AudienceInput::Key(key) => {
                self.handle_key(key);
                None
            }
            AudienceInput::Wheel { delta_y, at } => {
                self.handle_wheel(delta_y, at);
                None
            }
            AudienceInput::Click {
                x,
                y,
                width,
                height,
            } => self.handle_click(x, y, width, height),
            AudienceInput::Swipe(direction) => {
                if !self.state.is_overview_open() {
                    let moved = match direction {
                        SwipeDirection::Prev => self.state.prev(),
                        SwipeDirection::Next => self.state.next(),
                    };
                    self.commit(moved);
                }
                None
            }
            AudienceInput::ContextMenu { x, y } => {
                self.state.open_context_menu(x, y);
                None
            }
            AudienceInput::Menu(action) => self.handle_menu(action),
            AudienceInput::SelectThumbnail(index) => {
                if self.state.is_overview_open() {
                    let moved = self.state.go_to(index);
                    self.commit(moved);
                    self.state.close_overview();
                }
                None
            }
            AudienceInput::DismissOverview => {
                self.state.close_overview();
                None
            }
            AudienceInput::DismissMenu => {
                self.state.close_context_menu();
                None
            }
            AudienceInput::FragmentChanged(fragment) => {
                self.handle_fragment(&fragment);
                None
            }
        }
    }

    fn handle_key(&mut self, key: NavKey) {
        match key {
            NavKey::G => {
                self.state.toggle_overview();
                return;
            }
            NavKey::Escape => {
                if !self.state.close_overview() {
                    self.state.close_context_menu();
                }
                return;
            }
            _ => {}
        }

        if self.state.is_overview_open() || !self.state.is_multi() {
            return;
        }

        let moved = match key {
            NavKey::ArrowLeft => self.state.prev(),
            NavKey::ArrowRight | NavKey::Space => self.state.next(),
            NavKey::Home => self.state.first(),
            NavKey::End => self.state.last(),
            NavKey::G | NavKey::Escape => false,
        };
        self.commit(moved);
    }

    fn handle_wheel(&mut self, delta_y: f32, at: Instant) {
        if !self.state.is_multi()
            || self.state.context_menu().visible
            || self.state.is_overview_open()
            || delta_y == 0.0
        {
            return;
        }
        if self.wheel_quiet_until.is_some_and(|until| at < until) {
            return;
        }
        self.wheel_quiet_until = Some(at + self.settings.wheel_debounce);

        let moved = if delta_y > 0.0 {
            self.state.next()
        } else {
            self.state.prev()
        };
        self.commit(moved);
    }

    fn handle_click(&mut self, x: f32, y: f32, width: f32, height: f32) -> Option<Effect> {
        self.state.close_context_menu();
        if self.state.is_overview_open() {
            return None;
        }
        let moved = match edge_zone(x, y, width, height, self.settings.edge_zone)? {
            EdgeZone::Top => self.state.first(),
            EdgeZone::Bottom => return Some(Effect::GoHome),
            EdgeZone::Left => self.state.prev(),
            EdgeZone::Right => self.state.next(),
        };
        self.commit(moved);
        None
    }

    fn handle_menu(&mut self, action: MenuAction) -> Option<Effect> {
        let effect = match action {
            MenuAction::Prev => {
                let moved = self.state.prev();
                self.commit(moved);
                None
            }
            MenuAction::Next => {
                let moved = self.state.next();
                self.commit(moved);
                None
            }
            MenuAction::First => {
                let moved = self.state.first();
                self.commit(moved);
                None
            }
            MenuAction::Last => {
                let moved = self.state.last();
                self.commit(moved);
                None
            }
            MenuAction::GoTo(text) => {
                if let Ok(number) = text.trim().parse::<usize>() {
                    let moved = self.state.go_to_number(number);
                    self.commit(moved);
                }
                None
            }
            MenuAction::OpenOverview => {
                self.state.open_overview();
                None
            }
            MenuAction::ToggleFullscreen => Some(Effect::ToggleFullscreen),
            MenuAction::CopyLink => Some(Effect::CopyLink(self.share_link())),
            MenuAction::GoHome => Some(Effect::GoHome),
        };
        self.state.close_context_menu();
        effect
    }

    fn handle_fragment(&mut self, fragment: &str) {
        if !self.state.is_multi() {
            return;
        }
        if let Some(index) = parse_fragment(fragment, self.state.slide_count()) {
            let moved = self.state.go_to(index);
            self.commit(moved);
        }
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
            SyncMessage::SlideChange { index, .. } | SyncMessage::SyncResponse { index, .. } => {
                if self.state.go_to(index) {
                    self.fragment = format_fragment(self.state.active_index());
                    log::debug!(
                        "audience followed {} to slide {}",
                        message.source(),
                        self.state.active_index() + 1
                    );
                }
            }
            SyncMessage::SyncRequest { source } => {
                log::debug!("answering sync request from {source}");
                self.channel.send(&SyncMessage::SyncResponse {
                    index: self.state.active_index(),
                    source: Source::Audience,
                });
            }
        }
    }

    /// Swap in a re-rendered deck.
    pub fn reload(&mut self, slide_count: NonZeroUsize) {
        let before = self.state.active_index();
        self.state.resize(slide_count);
        self.fragment = format_fragment(self.state.active_index());
        if self.state.active_index() != before {
            self.broadcast_index();
        }
    }

    fn commit(&mut self, moved: bool) {
        if !moved {
            return;
        }
        self.fragment = format_fragment(self.state.active_index());
        self.broadcast_index();
    }

    fn broadcast_index(&self) {
        log::debug!("audience at slide {}", self.state.active_index() + 1);
        self.channel.send(&SyncMessage::SlideChange {
            index: self.state.active_index(),
            source: Source::Audience,
        });
    }
}
