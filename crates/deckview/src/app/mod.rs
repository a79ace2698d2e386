//! The desktop shell: an audience window and an optional presenter window.
//!
//! Both windows live in one process but each owns its own controller and its
//! own handle on the deck's [`MemoryBus`] channel. Nothing else is shared
//! except the immutable deck.

mod audience;
mod presenter;
mod slide;

use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::deck::markup::{self, SlideText};
use crate::deck::{self, Deck, DeckError};
use crate::nav::audience::SwipeDirection;
use crate::nav::{
    AudienceController, AudienceInput, Effect, MenuAction, NavKey, PresenterController,
    ViewerSettings,
};
use crate::sync::{self, MemoryBus, SyncChannel};
use crate::theme::Theme;
use crate::watch::DeckWatcher;

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);
const SWIPE_THRESHOLD: f32 = 60.0;

/// Key bindings shared by both windows.
const NAV_KEYS: [(egui::Key, NavKey); 7] = [
    (egui::Key::ArrowLeft, NavKey::ArrowLeft),
    (egui::Key::ArrowRight, NavKey::ArrowRight),
    (egui::Key::Space, NavKey::Space),
    (egui::Key::Home, NavKey::Home),
    (egui::Key::End, NavKey::End),
    (egui::Key::G, NavKey::G),
    (egui::Key::Escape, NavKey::Escape),
];

pub struct LaunchOptions {
    pub file: PathBuf,
    /// `N` from a `FILE#N` deep link.
    pub fragment: Option<String>,
    pub windowed: bool,
    pub slide: Option<usize>,
    pub overview: bool,
    pub presenter: bool,
    pub watch: bool,
    /// Link the presenter window to the audience window.
    pub sync: bool,
}

/// Where the audience view opens.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StartPosition {
    fragment: Option<String>,
    overview: bool,
}

/// Deep link beats `--slide`, which beats the configured start mode.
fn start_position(
    fragment: Option<&str>,
    slide: Option<usize>,
    overview: bool,
    config_start: Option<&str>,
) -> StartPosition {
    let fragment = fragment
        .map(|f| format!("#{}", f.trim_start_matches('#')))
        .or_else(|| slide.map(|n| format!("#{n}")));
    match (fragment, config_start) {
        (Some(fragment), _) => StartPosition {
            fragment: Some(fragment),
            overview,
        },
        (None, Some("overview")) => StartPosition {
            fragment: None,
            overview: true,
        },
        (None, Some(n)) if n.parse::<usize>().is_ok() => StartPosition {
            fragment: Some(format!("#{n}")),
            overview,
        },
        (None, _) => StartPosition {
            fragment: None,
            overview,
        },
    }
}

/// How a primary press/release pair is read.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Click(egui::Pos2),
    Swipe(SwipeDirection),
}

fn classify_release(origin: egui::Pos2, release: egui::Pos2) -> Gesture {
    let delta = release - origin;
    if delta.x.abs() >= SWIPE_THRESHOLD && delta.x.abs() > delta.y.abs() {
        // Content follows the finger: dragging left reveals the next slide.
        if delta.x < 0.0 {
            Gesture::Swipe(SwipeDirection::Next)
        } else {
            Gesture::Swipe(SwipeDirection::Prev)
        }
    } else {
        Gesture::Click(origin)
    }
}

/// A pasted `#N` or `deck.md#N` is treated like an edited location fragment.
fn pasted_fragment(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.starts_with('#') {
        Some(text)
    } else {
        crate::nav::split_deep_link(text).1
    }
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

/// A deck ready to draw: the shared deck plus its reduced slide text.
struct LoadedDeck {
    deck: Arc<Deck>,
    texts: Vec<SlideText>,
}

impl LoadedDeck {
    fn new(deck: Deck) -> Self {
        let texts = deck
            .slides
            .iter()
            .map(|slide| markup::slide_text(&slide.html))
            .collect();
        Self {
            deck: Arc::new(deck),
            texts,
        }
    }
}

struct DeckViewApp {
    file: PathBuf,
    title: String,
    /// Last title sent to the audience window.
    shown_title: String,
    renderer_command: Option<String>,
    home_url: Option<String>,
    settings: ViewerSettings,
    theme: Theme,
    bus: MemoryBus,
    channel: String,
    sync: bool,
    loaded: Option<LoadedDeck>,
    /// Shown on the cannot-load screen while `loaded` is `None`.
    load_error: String,
    audience: Option<AudienceController>,
    presenter: Option<PresenterController>,
    presenter_wanted: bool,
    watcher: Option<DeckWatcher>,
    toast: Option<Toast>,
    goto_text: String,
    press_origin: Option<egui::Pos2>,
    /// Window area from the last frame, used to place pointer input.
    view_rect: egui::Rect,
}

impl DeckViewApp {
    fn new(
        launch: &LaunchOptions,
        config: &Config,
        title: String,
        deck: Result<Deck, DeckError>,
    ) -> Self {
        let share_base = file_url(&launch.file);
        let mut app = Self {
            file: launch.file.clone(),
            shown_title: title.clone(),
            title,
            renderer_command: config.renderer_command().map(String::from),
            home_url: config.home_url().map(String::from),
            settings: config.viewer_settings(&share_base),
            theme: Theme::from_name(config.theme().unwrap_or("dark")),
            bus: MemoryBus::new(),
            channel: sync::channel_name(&deck::deck_id(&launch.file)),
            sync: launch.sync,
            loaded: None,
            load_error: String::new(),
            audience: None,
            presenter: None,
            presenter_wanted: launch.presenter,
            watcher: None,
            toast: None,
            goto_text: String::new(),
            press_origin: None,
            view_rect: egui::Rect::ZERO,
        };

        let start = start_position(
            launch.fragment.as_deref(),
            launch.slide,
            launch.overview,
            config.start_mode(),
        );
        match deck {
            Ok(deck) => {
                app.mount(deck, start.fragment.as_deref());
                if start.overview {
                    if let Some(audience) = &mut app.audience {
                        audience.handle(AudienceInput::Menu(MenuAction::OpenOverview));
                    }
                }
            }
            Err(e) => app.unmount(&e),
        }

        if launch.watch {
            match DeckWatcher::start(&launch.file) {
                Ok(watcher) => app.watcher = Some(watcher),
                Err(e) => {
                    log::error!("Failed to watch {}: {e}", launch.file.display());
                    app.toast = Some(Toast::new(format!("Live reload unavailable: {e}")));
                }
            }
        }
        app
    }

    /// Install a deck version. Existing views keep their place, clamped.
    fn mount(&mut self, deck: Deck, fragment: Option<&str>) {
        let count = deck.slide_count();
        self.loaded = Some(LoadedDeck::new(deck));

        match &mut self.audience {
            Some(audience) => audience.reload(count),
            None => {
                self.audience = Some(AudienceController::new(
                    count,
                    self.open_channel(),
                    self.settings.clone(),
                    fragment,
                ));
            }
        }
        // The audience has to be on the channel before the presenter asks
        // for its position.
        if self.presenter_wanted {
            match &mut self.presenter {
                Some(presenter) => presenter.reload(count),
                None => {
                    self.presenter = Some(PresenterController::mount(
                        count,
                        self.open_channel(),
                    ));
                }
            }
        }
    }

    fn unmount(&mut self, error: &DeckError) {
        log::warn!("cannot show {}: {error}", self.file.display());
        self.loaded = None;
        self.audience = None;
        self.presenter = None;
        self.load_error = error.to_string();
    }

    fn reload(&mut self) {
        match deck::load_deck(&self.file, self.renderer_command.as_deref()) {
            Ok(deck) => {
                self.mount(deck, None);
                self.toast = Some(Toast::new("Reloaded"));
            }
            Err(e @ DeckError::Empty) => self.unmount(&e),
            Err(e) => {
                log::error!("Reload failed: {e}");
                self.toast = Some(Toast::new(format!("Reload failed: {e}")));
            }
        }
    }

    fn open_channel(&self) -> SyncChannel {
        if self.sync {
            self.bus.open(&self.channel)
        } else {
            SyncChannel::detached(&self.channel)
        }
    }

    fn toggle_presenter(&mut self) {
        if self.presenter.take().is_some() {
            self.presenter_wanted = false;
            return;
        }
        self.presenter_wanted = true;
        if let Some(loaded) = &self.loaded {
            self.presenter = Some(PresenterController::mount(
                loaded.deck.slide_count(),
                self.open_channel(),
            ));
            log::info!(
                "presenter opened, {} views on {}",
                self.bus.member_count(&self.channel),
                self.channel
            );
        }
        if self.audience.as_ref().is_some_and(|a| !a.is_synced()) {
            self.toast = Some(Toast::new("Presenter is not linked (--no-sync)"));
        }
    }

    /// Show the current fragment in the window title, like an address bar.
    fn update_window_title(&mut self, ctx: &egui::Context) {
        let title = window_title(&self.title, self.audience.as_ref().map(|a| a.fragment()));
        if title != self.shown_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.shown_title = title;
        }
    }

    fn apply_effect(&mut self, ctx: &egui::Context, effect: Effect) {
        match effect {
            Effect::ToggleFullscreen => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
            }
            Effect::CopyLink(link) => {
                log::debug!("copied {link}");
                ctx.copy_text(link);
                self.toast = Some(Toast::new("Link copied"));
            }
            Effect::GoHome => match &self.home_url {
                Some(url) => ctx.open_url(egui::OpenUrl::same_tab(url)),
                None => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            },
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, inputs: Vec<AudienceInput>) {
        for input in inputs {
            let effect = self.audience.as_mut().and_then(|a| a.handle(input));
            if let Some(effect) = effect {
                self.apply_effect(ctx, effect);
            }
        }
    }

    /// Keyboard and paste events for the audience window.
    fn keyboard_inputs(&mut self, ctx: &egui::Context) -> Vec<AudienceInput> {
        let typing = ctx.wants_keyboard_input();
        let mut inputs = Vec::new();
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut toggle_presenter = false;
        let mut toggle_theme = false;

        ctx.input(|i| {
            if typing {
                // Escape still closes the menu while its go-to box has focus.
                if i.key_pressed(egui::Key::Escape) {
                    inputs.push(AudienceInput::Key(NavKey::Escape));
                }
                return;
            }
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
            }
            if i.key_pressed(egui::Key::P) {
                toggle_presenter = true;
            }
            if i.key_pressed(egui::Key::D) {
                toggle_theme = true;
            }
            for (key, nav) in NAV_KEYS {
                if i.key_pressed(key) {
                    inputs.push(AudienceInput::Key(nav));
                }
            }
            for event in &i.events {
                if let egui::Event::Paste(text) = event {
                    if let Some(fragment) = pasted_fragment(text) {
                        inputs.push(AudienceInput::FragmentChanged(fragment.to_string()));
                    }
                }
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_presenter {
            self.toggle_presenter();
        }
        if toggle_theme {
            self.theme = self.theme.toggled();
        }
        inputs
    }

    /// Wheel, clicks, swipes and right-clicks on the audience window.
    fn pointer_inputs(&mut self, ctx: &egui::Context) -> Vec<AudienceInput> {
        let Some(state) = self.audience.as_ref().map(|a| a.state()) else {
            return Vec::new();
        };
        let count = state.slide_count();
        let overview_open = state.is_overview_open();
        let menu_visible = state.context_menu().visible;
        let over_overlay = ctx.is_pointer_over_area();
        let (wheel_y, pressed, released, secondary, pos) = ctx.input(|i| {
            (
                i.raw_scroll_delta.y,
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.secondary_pressed(),
                i.pointer.interact_pos(),
            )
        });

        let mut inputs = Vec::new();
        if wheel_y != 0.0 {
            // egui reports scrolling down as a negative delta.
            inputs.push(AudienceInput::Wheel {
                delta_y: -wheel_y,
                at: Instant::now(),
            });
        }

        if over_overlay {
            self.press_origin = None;
            return inputs;
        }
        if let (true, Some(pos)) = (secondary, pos) {
            self.goto_text.clear();
            inputs.push(AudienceInput::ContextMenu { x: pos.x, y: pos.y });
        }
        if pressed {
            self.press_origin = pos;
        }
        if !released {
            return inputs;
        }
        let (Some(origin), Some(end)) = (self.press_origin.take(), pos) else {
            return inputs;
        };

        let rect = self.view_rect;
        let input = match classify_release(origin, end) {
            Gesture::Click(_) if overview_open && menu_visible => AudienceInput::DismissMenu,
            Gesture::Click(at) if overview_open => match audience::overview_hit(count, rect, at) {
                Some(index) => AudienceInput::SelectThumbnail(index),
                None => AudienceInput::DismissOverview,
            },
            Gesture::Click(at) => AudienceInput::Click {
                x: at.x - rect.left(),
                y: at.y - rect.top(),
                width: rect.width(),
                height: rect.height(),
            },
            Gesture::Swipe(direction) => AudienceInput::Swipe(direction),
        };
        inputs.push(input);
        inputs
    }

    fn poll_watcher(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        if watcher.poll_changed() {
            log::info!("reloading {}", watcher.path().display());
            self.reload();
        }
    }
}

impl eframe::App for DeckViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_watcher();
        if let Some(audience) = &mut self.audience {
            audience.pump_sync();
        }

        let keys = self.keyboard_inputs(ctx);
        self.dispatch(ctx, keys);
        let pointer = self.pointer_inputs(ctx);
        self.dispatch(ctx, pointer);

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        self.draw_audience(ctx);
        let actions = self.draw_context_menu(ctx);
        let inputs = actions.into_iter().map(AudienceInput::Menu).collect();
        self.dispatch(ctx, inputs);

        if self.presenter.is_some() {
            self.show_presenter(ctx);
        }
        self.update_window_title(ctx);

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

fn window_title(base: &str, fragment: Option<&str>) -> String {
    format!("{base}{}", fragment.unwrap_or_default())
}

fn file_url(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

/// Only an unreadable file stops startup. Bad renderer output still opens
/// the window, on the cannot-load screen.
fn startup_deck(
    path: &Path,
    loaded: Result<Deck, DeckError>,
) -> anyhow::Result<Result<Deck, DeckError>> {
    match loaded {
        Err(e @ DeckError::Io { .. }) => {
            anyhow::bail!("Failed to load {}: {e}", path.display())
        }
        other => Ok(other),
    }
}

pub fn run(launch: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let deck = startup_deck(
        &launch.file,
        deck::load_deck(&launch.file, config.renderer_command()),
    )?;

    let title = format!(
        "deckview - {}",
        launch.file.file_name().unwrap_or_default().to_string_lossy()
    );

    let viewport = if launch.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let app_name = title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |_cc| Ok(Box::new(DeckViewApp::new(&launch, &config, title, deck)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
