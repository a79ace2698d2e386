//! Slide navigation state shared by the audience and presenter views.
//!
//! Both views run the same [`NavigationState`]; they only differ in how
//! inputs are wired to it (see [`audience`] and [`presenter`]).

pub mod audience;
pub mod presenter;

#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;
use std::time::Duration;

pub use audience::{AudienceController, AudienceInput, Effect, MenuAction};
pub use presenter::{NextPane, NotesPane, PresenterController, PresenterInput, SyncStatus};

/// Default width of the clickable edge bands, as a fraction of the slide.
pub const DEFAULT_EDGE_ZONE: f32 = 0.10;

/// Default wheel debounce window.
pub const DEFAULT_WHEEL_DEBOUNCE: Duration = Duration::from_millis(300);

/// Fixed at deck load: a one-slide deck never navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckMode {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContextMenu {
    pub visible: bool,
    pub x: f32,
    pub y: f32,
}

/// Keys the views react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Space,
    Home,
    End,
    G,
    Escape,
}

/// Tuning values for pointer navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    pub wheel_debounce: Duration,
    /// Fraction of width/height that counts as an edge band.
    pub edge_zone: f32,
    /// Base URL the copied slide link is built from (`<base>#<N>`).
    pub share_base: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            wheel_debounce: DEFAULT_WHEEL_DEBOUNCE,
            edge_zone: DEFAULT_EDGE_ZONE,
            share_base: String::new(),
        }
    }
}

/// Per-view navigation state. Never shared between views.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    active_index: usize,
    slide_count: NonZeroUsize,
    overview_open: bool,
    context_menu: ContextMenu,
}

impl NavigationState {
    pub fn new(slide_count: NonZeroUsize) -> Self {
        Self {
            active_index: 0,
            slide_count,
            overview_open: false,
            context_menu: ContextMenu::default(),
        }
    }

    /// Start at `index`, clamped into the deck.
    pub fn starting_at(slide_count: NonZeroUsize, index: usize) -> Self {
        let mut state = Self::new(slide_count);
        state.active_index = index.min(state.last_index());
        state
    }

    pub fn mode(&self) -> DeckMode {
        if self.slide_count.get() == 1 {
            DeckMode::Single
        } else {
            DeckMode::Multi
        }
    }

    pub fn is_multi(&self) -> bool {
        self.mode() == DeckMode::Multi
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count.get()
    }

    pub fn last_index(&self) -> usize {
        self.slide_count.get() - 1
    }

    pub fn is_first(&self) -> bool {
        self.active_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.active_index == self.last_index()
    }

    pub fn is_overview_open(&self) -> bool {
        self.overview_open
    }

    pub fn context_menu(&self) -> ContextMenu {
        self.context_menu
    }

    // Index transitions. Each returns whether the index actually moved.

    pub fn prev(&mut self) -> bool {
        self.set_index(self.active_index.saturating_sub(1))
    }

    pub fn next(&mut self) -> bool {
        self.set_index((self.active_index + 1).min(self.last_index()))
    }

    pub fn first(&mut self) -> bool {
        self.set_index(0)
    }

    pub fn last(&mut self) -> bool {
        self.set_index(self.last_index())
    }

    /// Jump to `index`, clamped to the last slide.
    pub fn go_to(&mut self, index: usize) -> bool {
        self.set_index(index.min(self.last_index()))
    }

    /// Jump to a 1-based slide number. Numbers outside `1..=len` are ignored.
    pub fn go_to_number(&mut self, number: usize) -> bool {
        if number == 0 || number > self.slide_count() {
            return false;
        }
        self.set_index(number - 1)
    }

    fn set_index(&mut self, index: usize) -> bool {
        if index == self.active_index {
            return false;
        }
        self.active_index = index;
        true
    }

    /// Swap in a new deck version, keeping the index when it still exists.
    pub fn resize(&mut self, slide_count: NonZeroUsize) {
        self.slide_count = slide_count;
        self.active_index = self.active_index.min(self.last_index());
        if self.mode() == DeckMode::Single {
            self.overview_open = false;
        }
    }

    // Overlays.

    /// Toggle overview. Only reachable with more than one slide.
    pub fn toggle_overview(&mut self) -> bool {
        if !self.is_multi() {
            return false;
        }
        self.overview_open = !self.overview_open;
        true
    }

    pub fn open_overview(&mut self) -> bool {
        if !self.is_multi() || self.overview_open {
            return false;
        }
        self.overview_open = true;
        true
    }

    pub fn close_overview(&mut self) -> bool {
        std::mem::replace(&mut self.overview_open, false)
    }

    pub fn open_context_menu(&mut self, x: f32, y: f32) {
        self.context_menu = ContextMenu {
            visible: true,
            x,
            y,
        };
    }

    pub fn close_context_menu(&mut self) -> bool {
        std::mem::replace(&mut self.context_menu.visible, false)
    }
}

/// `#<N>` for a 0-based index.
pub fn format_fragment(index: usize) -> String {
    format!("#{}", index + 1)
}

/// Parse `#<N>` (or a bare `N`) into a 0-based index. Anything that is not a
/// slide number inside `1..=slide_count` yields `None`.
pub fn parse_fragment(fragment: &str, slide_count: usize) -> Option<usize> {
    let digits = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    let number: usize = digits.parse().ok()?;
    (1..=slide_count).contains(&number).then(|| number - 1)
}

/// Split a `path#N` deep link into the path and the fragment.
pub fn split_deep_link(target: &str) -> (&str, Option<&str>) {
    match target.rsplit_once('#') {
        Some((path, fragment)) if !path.is_empty() => (path, Some(fragment)),
        _ => (target, None),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn state(count: usize) -> NavigationState {
        NavigationState::new(NonZeroUsize::new(count).unwrap())
    }

    #[test]
    fn test_mode_fixed_by_count() {
        assert_eq!(state(1).mode(), DeckMode::Single);
        assert_eq!(state(2).mode(), DeckMode::Multi);
    }

    #[test]
    fn test_prev_next_stop_at_edges() {
        let mut nav = state(3);
        assert!(!nav.prev());
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.active_index(), 2);
    }

    #[test]
    fn test_go_to_number_ignores_out_of_range() {
        let mut nav = state(5);
        assert!(!nav.go_to_number(0));
        assert!(!nav.go_to_number(6));
        assert!(nav.go_to_number(5));
        assert_eq!(nav.active_index(), 4);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut nav = state(5);
        assert!(nav.go_to(40));
        assert_eq!(nav.active_index(), 4);
    }

    #[test]
    fn test_overview_needs_multiple_slides() {
        let mut single = state(1);
        assert!(!single.toggle_overview());
        assert!(!single.open_overview());
        assert!(!single.is_overview_open());

        let mut multi = state(2);
        assert!(multi.toggle_overview());
        assert!(multi.is_overview_open());
        assert!(multi.close_overview());
        assert!(!multi.close_overview());
    }

    #[test]
    fn test_resize_clamps_index() {
        let mut nav = NavigationState::starting_at(NonZeroUsize::new(6).unwrap(), 5);
        nav.toggle_overview();
        nav.resize(NonZeroUsize::new(1).unwrap());
        assert_eq!(nav.active_index(), 0);
        assert!(!nav.is_overview_open());
    }

    #[test]
    fn test_fragment_parsing() {
        assert_eq!(parse_fragment("#3", 5), Some(2));
        assert_eq!(parse_fragment("3", 5), Some(2));
        assert_eq!(parse_fragment("#99", 5), None);
        assert_eq!(parse_fragment("#0", 5), None);
        assert_eq!(parse_fragment("#abc", 5), None);
        assert_eq!(parse_fragment("#", 5), None);
        assert_eq!(parse_fragment("#-2", 5), None);
        assert_eq!(format_fragment(2), "#3");
    }

    #[test]
    fn test_split_deep_link() {
        assert_eq!(split_deep_link("talk.md#4"), ("talk.md", Some("4")));
        assert_eq!(split_deep_link("talk.md"), ("talk.md", None));
        assert_eq!(split_deep_link("#4"), ("#4", None));
    }
}
