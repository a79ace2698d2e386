use std::time::{Duration, Instant};

use super::*;
use crate::nav::audience::SwipeDirection;
use crate::nav::{AudienceInput, Effect, MenuAction, NavKey};

fn click(x: f32, y: f32) -> AudienceInput {
    AudienceInput::Click {
        x,
        y,
        width: 1000.0,
        height: 500.0,
    }
}

#[test]
fn edge_clicks_navigate() {
    let mut audience = standalone_audience(5, Some("#3"));

    assert_eq!(audience.handle(click(980.0, 250.0)), None);
    assert_eq!(audience.state().active_index(), 3);

    audience.handle(click(20.0, 250.0));
    audience.handle(click(20.0, 250.0));
    assert_eq!(audience.state().active_index(), 1);

    audience.handle(click(500.0, 10.0));
    assert_eq!(audience.state().active_index(), 0);
}

#[test]
fn centre_click_does_nothing() {
    let mut audience = standalone_audience(5, Some("#2"));
    assert_eq!(audience.handle(click(500.0, 250.0)), None);
    assert_eq!(audience.state().active_index(), 1);
}

#[test]
fn bottom_click_goes_home() {
    let mut audience = standalone_audience(5, Some("#2"));
    assert_eq!(audience.handle(click(500.0, 490.0)), Some(Effect::GoHome));
    assert_eq!(audience.state().active_index(), 1);
}

#[test]
fn swipes_step_through_deck() {
    let mut audience = standalone_audience(3, None);
    audience.handle(AudienceInput::Swipe(SwipeDirection::Next));
    audience.handle(AudienceInput::Swipe(SwipeDirection::Next));
    audience.handle(AudienceInput::Swipe(SwipeDirection::Next));
    assert_eq!(audience.state().active_index(), 2);
    audience.handle(AudienceInput::Swipe(SwipeDirection::Prev));
    assert_eq!(audience.state().active_index(), 1);
}

#[test]
fn overview_selects_and_closes() {
    let mut audience = standalone_audience(6, None);
    audience.handle(AudienceInput::Key(NavKey::G));
    assert!(audience.state().is_overview_open());

    // Navigation keys are swallowed while the grid is up.
    audience.handle(AudienceInput::Key(NavKey::ArrowRight));
    assert_eq!(audience.state().active_index(), 0);

    audience.handle(AudienceInput::SelectThumbnail(4));
    assert!(!audience.state().is_overview_open());
    assert_eq!(audience.state().active_index(), 4);
    assert_eq!(audience.fragment(), "#5");
}

#[test]
fn thumbnail_ignored_when_overview_closed() {
    let mut audience = standalone_audience(6, None);
    audience.handle(AudienceInput::SelectThumbnail(4));
    assert_eq!(audience.state().active_index(), 0);
}

#[test]
fn overview_dismissed_by_backdrop_or_g() {
    let mut audience = standalone_audience(4, None);
    audience.handle(AudienceInput::Key(NavKey::G));
    audience.handle(AudienceInput::DismissOverview);
    assert!(!audience.state().is_overview_open());

    audience.handle(AudienceInput::Key(NavKey::G));
    audience.handle(AudienceInput::Key(NavKey::G));
    assert!(!audience.state().is_overview_open());
}

#[test]
fn escape_closes_overview_before_menu() {
    let mut audience = standalone_audience(4, None);
    audience.handle(AudienceInput::ContextMenu { x: 40.0, y: 60.0 });
    audience.handle(AudienceInput::Key(NavKey::G));

    audience.handle(AudienceInput::Key(NavKey::Escape));
    assert!(!audience.state().is_overview_open());
    assert!(audience.state().context_menu().visible);

    audience.handle(AudienceInput::Key(NavKey::Escape));
    assert!(!audience.state().context_menu().visible);
}

#[test]
fn context_menu_records_position() {
    let mut audience = standalone_audience(4, None);
    audience.handle(AudienceInput::ContextMenu { x: 120.0, y: 80.0 });
    let menu = audience.state().context_menu();
    assert!(menu.visible);
    assert_eq!((menu.x, menu.y), (120.0, 80.0));

    audience.handle(AudienceInput::DismissMenu);
    assert!(!audience.state().context_menu().visible);
}

#[test]
fn menu_actions_close_the_menu() {
    let mut audience = standalone_audience(5, None);
    let actions = [
        MenuAction::Next,
        MenuAction::Last,
        MenuAction::Prev,
        MenuAction::First,
    ];
    let expected = [1, 4, 3, 0];
    for (action, index) in actions.into_iter().zip(expected) {
        audience.handle(AudienceInput::ContextMenu { x: 1.0, y: 1.0 });
        assert_eq!(audience.handle(AudienceInput::Menu(action)), None);
        assert_eq!(audience.state().active_index(), index);
        assert!(!audience.state().context_menu().visible);
    }
}

#[test]
fn menu_go_to_accepts_only_valid_numbers() {
    let mut audience = standalone_audience(5, None);
    for text in ["0", "6", "abc", "", "-1", "2.5"] {
        audience.handle(AudienceInput::Menu(MenuAction::GoTo(text.to_string())));
        assert_eq!(audience.state().active_index(), 0, "input {text:?}");
    }
    audience.handle(AudienceInput::Menu(MenuAction::GoTo(" 4 ".to_string())));
    assert_eq!(audience.state().active_index(), 3);
}

#[test]
fn menu_effects_are_returned() {
    let bus = MemoryBus::new();
    let mut audience = audience(&bus, 5);
    audience.handle(AudienceInput::Key(NavKey::End));

    assert_eq!(
        audience.handle(AudienceInput::Menu(MenuAction::CopyLink)),
        Some(Effect::CopyLink(
            "https://example.com/slides/test-deck#5".to_string()
        ))
    );
    assert_eq!(
        audience.handle(AudienceInput::Menu(MenuAction::ToggleFullscreen)),
        Some(Effect::ToggleFullscreen)
    );
    assert_eq!(
        audience.handle(AudienceInput::Menu(MenuAction::GoHome)),
        Some(Effect::GoHome)
    );
}

#[test]
fn menu_opens_overview() {
    let mut audience = standalone_audience(3, None);
    audience.handle(AudienceInput::ContextMenu { x: 5.0, y: 5.0 });
    audience.handle(AudienceInput::Menu(MenuAction::OpenOverview));
    assert!(audience.state().is_overview_open());
    assert!(!audience.state().context_menu().visible);
}

#[test]
fn click_closes_menu_and_still_navigates() {
    let mut audience = standalone_audience(3, None);
    audience.handle(AudienceInput::ContextMenu { x: 5.0, y: 5.0 });
    audience.handle(click(990.0, 250.0));
    assert!(!audience.state().context_menu().visible);
    assert_eq!(audience.state().active_index(), 1);
}

#[test]
fn wheel_ignored_while_menu_open() {
    let mut audience = standalone_audience(3, None);
    audience.handle(AudienceInput::ContextMenu { x: 5.0, y: 5.0 });
    audience.handle(AudienceInput::Wheel {
        delta_y: 10.0,
        at: Instant::now(),
    });
    assert_eq!(audience.state().active_index(), 0);
}

#[test]
fn custom_debounce_window() {
    let mut audience = AudienceController::new(
        count(4),
        SyncChannel::detached(CHANNEL),
        ViewerSettings {
            wheel_debounce: Duration::from_millis(50),
            ..ViewerSettings::default()
        },
        None,
    );
    let t0 = Instant::now();
    for step in 0..3 {
        audience.handle(AudienceInput::Wheel {
            delta_y: 1.0,
            at: t0 + Duration::from_millis(step * 60),
        });
    }
    assert_eq!(audience.state().active_index(), 3);
}

#[test]
fn inbound_change_updates_fragment_without_broadcast() {
    let bus = MemoryBus::new();
    let mut audience = audience(&bus, 5);
    let mut peer = observer(&bus);

    audience.on_message(SyncMessage::SlideChange {
        index: 2,
        source: crate::sync::Source::Presenter,
    });

    assert_eq!(audience.fragment(), "#3");
    assert!(peer.drain().is_empty());
}

#[test]
fn share_link_follows_fragment() {
    let bus = MemoryBus::new();
    let mut audience = audience(&bus, 5);
    audience.handle(AudienceInput::FragmentChanged("#4".to_string()));
    assert_eq!(
        audience.share_link(),
        "https://example.com/slides/test-deck#4"
    );
    assert!(audience.is_synced());
    assert!(!standalone_audience(2, None).is_synced());
}
