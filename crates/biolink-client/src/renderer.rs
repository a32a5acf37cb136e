//! The public profile page as data. [`render`] is a pure function of the
//! document; [`DisplayRenderer`] owns the page's live state around it.

use crate::cursor::CursorEffects;
use crate::editor::parse_hex_rgb;
use crate::error::ClientError;
use crate::resolver::SourceResolver;
use crate::splash::{AudioPlayer, SplashGate};
use crate::typewriter::Typewriter;
use biolink_models::{icon_class_for, preset_badge, Badge, ProfileConfig, SocialLink};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;

const DEFAULT_ACCENT: &str = "#00ff88";
const DEFAULT_TRANSPARENCY: f64 = 55.0;
const DEFAULT_BLUR: &str = "20";
const DEFAULT_VOLUME: f64 = 0.3;
const DEFAULT_LOCATION: &str = "ALONE";

#[derive(Debug, Clone, PartialEq)]
pub enum BadgeVisual {
    Image(String),
    Icon { class: String, color: Option<String> },
    /// Neither an image, a known preset nor an icon of its own.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeIcon {
    pub id: String,
    pub tooltip: String,
    pub visual: BadgeVisual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIcon {
    pub id: String,
    /// `#` when the link has no URL.
    pub href: String,
    pub tooltip: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioView {
    pub url: Option<String>,
    pub looped: bool,
    pub volume: f64,
    pub enabled: bool,
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundView {
    pub kind: String,
    pub url: Option<String>,
    pub fallback_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub show_views: bool,
    pub location: String,
    pub location_emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashView {
    pub visible: bool,
    pub text: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscordView {
    pub user_id: Option<String>,
    pub server_id: Option<String>,
    pub show_presence: bool,
    pub show_server: bool,
    pub invite_url: Option<String>,
    pub server_name_override: Option<String>,
    pub member_count_override: Option<String>,
    pub icon_url_override: Option<String>,
}

/// Live server widget data, as the widget API reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetData {
    pub name: Option<String>,
    pub presence_count: Option<u64>,
    pub instant_invite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerWidget {
    pub name: String,
    pub online_text: String,
    pub icon_url: Option<String>,
    pub join_url: Option<String>,
}

impl DiscordView {
    /// Resolve what the server card shows. A name or member count override
    /// means live data is not used at all; `live == None` means the widget
    /// could not be fetched.
    pub fn server_widget(&self, live: Option<&WidgetData>) -> ServerWidget {
        let overridden =
            self.server_name_override.is_some() || self.member_count_override.is_some();
        let data = if overridden {
            WidgetData {
                name: self.server_name_override.clone(),
                presence_count: None,
                instant_invite: self.invite_url.clone(),
            }
        } else if let Some(live) = live {
            live.clone()
        } else {
            return ServerWidget {
                name: "Server Unavailable".into(),
                online_text: "• Widget Disabled".into(),
                icon_url: self.icon_url_override.clone(),
                join_url: self.invite_url.clone(),
            };
        };

        let name = self
            .server_name_override
            .clone()
            .or_else(|| data.name.clone().filter(|n| !n.is_empty()))
            .unwrap_or_else(|| "Discord Server".into());
        let online_text = match &self.member_count_override {
            Some(count) => count.clone(),
            None => format!("• {} Online", data.presence_count.unwrap_or(0)),
        };

        ServerWidget {
            name,
            online_text,
            icon_url: self.icon_url_override.clone(),
            join_url: self.invite_url.clone().or(data.instant_invite),
        }
    }
}

/// Everything the page shows for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedProfile {
    pub username: String,
    /// Full text; the page types it out with a [`Typewriter`].
    pub display_name: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub font: Option<String>,
    pub username_effect: Option<String>,
    pub username_color: Option<String>,
    pub location: String,
    pub status: Option<String>,
    pub badges: Vec<BadgeIcon>,
    pub links: Vec<LinkIcon>,
    /// CSS variables on the document root.
    pub root_vars: BTreeMap<&'static str, String>,
    /// CSS variables on the profile card.
    pub card_vars: BTreeMap<&'static str, String>,
    pub audio: AudioView,
    pub background: BackgroundView,
    pub stats: StatsView,
    pub splash: SplashView,
    pub discord: DiscordView,
    pub cursor_effect: String,
}

/// Empty strings count as unset, as they do in the form.
fn text(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

pub fn render(doc: &ProfileConfig) -> RenderedProfile {
    let profile = doc.profile.clone().unwrap_or_default();
    let stats = doc.stats.clone().unwrap_or_default();
    let splash = doc.splash.clone().unwrap_or_default();
    let background = doc.background.clone().unwrap_or_default();
    let audio = doc.audio.clone().unwrap_or_default();
    let discord = doc.discord.clone().unwrap_or_default();

    let location = text(&profile.location).unwrap_or_else(|| DEFAULT_LOCATION.into());

    RenderedProfile {
        username: text(&profile.username).unwrap_or_else(|| "Username".into()),
        display_name: text(&profile.display_name).unwrap_or_else(|| "fryx".into()),
        bio: profile.bio.clone().unwrap_or_default(),
        avatar: text(&profile.avatar),
        font: text(&profile.font),
        username_effect: text(&profile.username_effect).filter(|e| e != "none"),
        username_color: text(&profile.username_color),
        status: text(&profile.status),
        badges: doc.badges.iter().filter(|b| b.enabled).map(badge_icon).collect(),
        links: doc.social_links.iter().filter(|l| l.enabled).map(link_icon).collect(),
        root_vars: root_vars(doc),
        card_vars: card_vars(doc),
        audio: AudioView {
            url: text(&audio.url),
            looped: true,
            volume: audio.volume().filter(|v| *v != 0.0).unwrap_or(DEFAULT_VOLUME),
            enabled: audio.enabled.unwrap_or(false),
            autoplay: audio.autoplay.unwrap_or(true),
        },
        background: BackgroundView {
            kind: text(&background.kind).unwrap_or_else(|| "video".into()),
            url: text(&background.url),
            fallback_image: text(&background.fallback_image),
        },
        stats: StatsView {
            show_views: stats.show_views.unwrap_or(true),
            location: text(&stats.location).unwrap_or_else(|| location.clone()),
            location_emoji: text(&stats.location_emoji).unwrap_or_else(|| "😔".into()),
        },
        splash: SplashView {
            visible: !matches!(&doc.splash, Some(s) if s.enabled != Some(true)),
            text: text(&splash.text).unwrap_or_else(|| "CLICK TO ENTER".into()),
            subtitle: text(&splash.subtitle).unwrap_or_else(|| "🔊 Audio will play".into()),
        },
        discord: DiscordView {
            user_id: text(&discord.user_id),
            server_id: text(&discord.server_id),
            show_presence: discord.show_presence != Some(false),
            show_server: discord.show_server != Some(false),
            invite_url: text(&discord.invite_url),
            server_name_override: text(&discord.server_name_override),
            member_count_override: text(&discord.member_count_override),
            icon_url_override: text(&discord.icon_url_override),
        },
        cursor_effect: text(&profile.cursor_effect).unwrap_or_else(|| "none".into()),
        location,
    }
}

fn badge_icon(badge: &Badge) -> BadgeIcon {
    let visual = if let Some(url) = text(&badge.image_url) {
        BadgeVisual::Image(url)
    } else if let Some(preset) = preset_badge(&badge.id) {
        BadgeVisual::Icon {
            class: preset.icon.into(),
            color: Some(preset.color.into()),
        }
    } else if let Some(icon) = text(&badge.icon) {
        BadgeVisual::Icon {
            class: icon,
            color: None,
        }
    } else {
        BadgeVisual::Empty
    };

    BadgeIcon {
        id: badge.id.clone(),
        tooltip: text(&badge.name).unwrap_or_else(|| badge.id.clone()),
        visual,
    }
}

fn link_icon(link: &SocialLink) -> LinkIcon {
    LinkIcon {
        id: link.id.clone(),
        href: text(&link.url).unwrap_or_else(|| "#".into()),
        tooltip: text(&link.name).unwrap_or_else(|| link.id.clone()),
        icon: icon_class_for(&link.id),
    }
}

fn root_vars(doc: &ProfileConfig) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();
    if let Some(accent) = doc.theme.as_ref().and_then(|t| text(&t.accent_color)) {
        vars.insert("--accent-primary", accent);
    }
    vars
}

fn card_vars(doc: &ProfileConfig) -> BTreeMap<&'static str, String> {
    let theme = doc.theme.clone().unwrap_or_default();
    let transparency = theme.card_transparency().unwrap_or(DEFAULT_TRANSPARENCY);
    let blur = theme
        .card_blur
        .as_ref()
        .map_or_else(|| DEFAULT_BLUR.to_owned(), ToString::to_string);
    let alpha = 1.0 - transparency / 100.0;
    let accent = text(&theme.accent_color).unwrap_or_else(|| DEFAULT_ACCENT.into());

    let widget_bg = match parse_hex_rgb(&accent) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, 0.15)"),
        None => "rgba(255, 255, 255, 0.1)".into(),
    };

    BTreeMap::from([
        ("--bg-card", format!("rgba(0, 0, 0, {alpha:.2})")),
        ("--card-blur", format!("{blur}px")),
        ("--text-primary", "#ffffff".into()),
        ("--text-secondary", "#cccccc".into()),
        ("--card-border", "rgba(255, 255, 255, 0.1)".into()),
        ("--border-color", "rgba(255, 255, 255, 0.15)".into()),
        ("--widget-bg", widget_bg),
    ])
}

struct PageState {
    view: RenderedProfile,
    typewriter: Typewriter,
    cursor: CursorEffects,
    splash: SplashGate,
}

/// The display page: current render plus the stateful pieces that react to
/// it (typewriter, splash overlay, cursor trail).
pub struct DisplayRenderer {
    state: Mutex<PageState>,
    resolver: SourceResolver,
    applied: watch::Sender<u64>,
}

impl DisplayRenderer {
    pub fn new(resolver: SourceResolver) -> Self {
        Self::with_cursor(resolver, CursorEffects::new())
    }

    pub fn with_cursor(resolver: SourceResolver, cursor: CursorEffects) -> Self {
        let view = render(&ProfileConfig::default());
        let (applied, _) = watch::channel(0);
        Self {
            state: Mutex::new(PageState {
                typewriter: Typewriter::new(&view.display_name),
                splash: SplashGate::new(view.splash.visible),
                cursor,
                view,
            }),
            resolver,
            applied,
        }
    }

    /// Re-render everything from `doc`. Returns how many times a document
    /// has been applied so far.
    pub fn apply(&self, doc: &ProfileConfig) -> u64 {
        let view = render(doc);
        {
            let mut state = self.lock();
            state.typewriter = Typewriter::new(&view.display_name);
            state.cursor.set_effect(&view.cursor_effect);
            if !view.splash.visible {
                state.splash.hide_overlay();
            }
            state.view = view;
        }

        self.applied.send_modify(|n| *n += 1);
        *self.applied.borrow()
    }

    /// Fetch through the display chain and apply. On failure the page keeps
    /// whatever it was showing.
    pub async fn load(&self) -> Result<&'static str, ClientError> {
        match self.resolver.resolve().await {
            Ok(resolved) => {
                self.apply(&resolved.config);
                Ok(resolved.source)
            }
            Err(e) => {
                tracing::error!("display: config loading failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn view(&self) -> RenderedProfile {
        self.lock().view.clone()
    }

    /// Ticks once per applied document ("Live Updated").
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.applied.subscribe()
    }

    pub fn applied_count(&self) -> u64 {
        *self.applied.borrow()
    }

    pub fn click_splash(&self, player: &mut dyn AudioPlayer) -> bool {
        let mut state = self.lock();
        let audio = state.view.audio.clone();
        state.splash.click(&audio, player)
    }

    pub fn splash(&self) -> SplashGate {
        self.lock().splash.clone()
    }

    pub fn pointer_moved(&self, x: f64, y: f64) {
        self.lock().cursor.pointer_moved(x, y);
    }

    /// One cursor animation frame. Returns live particle count.
    pub fn animate_frame(&self) -> usize {
        self.lock().cursor.step()
    }

    pub fn cursor_active(&self) -> bool {
        self.lock().cursor.is_active()
    }

    /// Advance the display name typewriter. Returns the visible text and the
    /// delay until the next tick.
    pub fn tick_typewriter(&self) -> (String, Duration) {
        let mut state = self.lock();
        let delay = state.typewriter.tick();
        (state.typewriter.visible(), delay)
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
