use crate::lenient::{self, Section};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Keys this crate does not model. Kept so a load/save cycle never drops them.
pub type Extra = Map<String, Value>;

/// The single document describing everything on the profile page.
///
/// Every section is optional and left out when absent; readers apply their
/// own literal defaults at read time. `badges` and `socialLinks` are the
/// exception: they always deserialize to a (possibly empty) array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub discord: Option<Discord>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub badges: Vec<Badge>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub social_links: Vec<SocialLink>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub splash: Option<Splash>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// URL or `data:` URL.
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub avatar_border: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub ornament: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub username_effect: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub username_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub cursor_effect: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discord {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub show_presence: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub show_server: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub invite_url: Option<String>,
    /// Non-empty overrides suppress the live widget data.
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub server_name_override: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub member_count_override: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub icon_url_override: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    /// Anything but `true`, including null, reads as disabled.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Badge {
    pub fn preset(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            ..Default::default()
        }
    }

    pub fn is_custom(&self) -> bool {
        self.is_custom.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    /// A known platform id, or `custom_<millis>` for user-defined links.
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

pub const CUSTOM_LINK_PREFIX: &str = "custom_";

impl SocialLink {
    pub fn is_custom(&self) -> bool {
        self.id.starts_with(CUSTOM_LINK_PREFIX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub card_background: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub card_blur: Option<Number>,
    /// Percent, 0 is opaque.
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub card_transparency: Option<Number>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub card_border_radius: Option<Number>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub card_text_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Theme {
    pub fn card_blur(&self) -> Option<f64> {
        self.card_blur.as_ref().and_then(Number::as_f64)
    }

    pub fn card_transparency(&self) -> Option<f64> {
        self.card_transparency.as_ref().and_then(Number::as_f64)
    }

    pub fn card_border_radius(&self) -> Option<f64> {
        self.card_border_radius.as_ref().and_then(Number::as_f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    /// `video`, `image` or `color`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub fallback_image: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audio {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Kept as a raw JSON number so `1` and `1.0` both survive a round trip.
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub volume: Option<Number>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Audio {
    pub fn volume(&self) -> Option<f64> {
        self.volume.as_ref().and_then(Number::as_f64)
    }

    /// Returns false (and leaves the volume untouched) for NaN or infinity.
    pub fn set_volume(&mut self, volume: f64) -> bool {
        match Number::from_f64(volume) {
            Some(n) => {
                self.volume = Some(n);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splash {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub show_views: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub location_emoji: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ProfileConfig {
    /// The hand-authored document the admin page starts from when neither the
    /// store nor the local copy can be read.
    pub fn defaults() -> Self {
        let mut audio = Audio {
            enabled: Some(true),
            url: Some("assets/music.mp3".into()),
            autoplay: Some(true),
            ..Default::default()
        };
        audio.set_volume(0.5);

        Self {
            profile: Some(Profile {
                username: Some("VXCH".into()),
                display_name: Some("vxch".into()),
                bio: Some(String::new()),
                avatar: Some(String::new()),
                avatar_border: Some("#00ff88".into()),
                ornament: Some("🐌".into()),
                ..Default::default()
            }),
            discord: Some(Discord {
                user_id: Some("986665260750622780".into()),
                server_id: Some("1259127565440778311".into()),
                show_presence: Some(true),
                show_server: Some(true),
                ..Default::default()
            }),
            badges: Vec::new(),
            social_links: Vec::new(),
            theme: Some(Theme {
                accent_color: Some("#00ff88".into()),
                card_background: Some("rgba(0, 0, 0, 0.78)".into()),
                card_blur: Some(Number::from(20)),
                card_transparency: Some(Number::from(55)),
                card_text_mode: Some("auto".into()),
                card_border_radius: Some(Number::from(20)),
                text_color: Some("#ffffff".into()),
                secondary_text: Some("#a0a0a0".into()),
                ..Default::default()
            }),
            background: Some(Background {
                kind: Some("video".into()),
                url: Some("assets/background.mp4".into()),
                fallback_image: Some("assets/background.jpg".into()),
                ..Default::default()
            }),
            audio: Some(audio),
            splash: Some(Splash {
                enabled: Some(true),
                text: Some("CLICK TO ENTER".into()),
                subtitle: Some("🔊 Audio will play".into()),
                ..Default::default()
            }),
            stats: Some(Stats {
                show_views: Some(true),
                location: Some("ALONE".into()),
                location_emoji: Some("😔".into()),
                ..Default::default()
            }),
            extra: Extra::new(),
        }
    }

    /// Give a raw document its `badges` and `socialLinks` arrays when they
    /// are missing or `null`. Other values are left for the parser to judge.
    pub fn ensure_collections(value: &mut Value) {
        if let Value::Object(map) = value {
            for key in ["badges", "socialLinks"] {
                if matches!(map.get(key), None | Some(Value::Null)) {
                    map.insert(key.to_string(), Value::Array(Vec::new()));
                }
            }
        }
    }

    /// Parse an untyped document, normalising the two lists first. Only a
    /// document that is not a JSON object fails: fields of an unexpected type
    /// read as unset and are written back exactly as they were found.
    pub fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        Self::ensure_collections(&mut value);
        let mut config: Self = serde_json::from_value(value.clone())?;
        config.keep_unread(&value);
        Ok(config)
    }

    fn keep_unread(&mut self, raw: &Value) {
        lenient::keep_unread(self, raw);
        let Value::Object(raw) = raw else {
            return;
        };

        fn nested<T: Section>(section: &mut Option<T>, raw: Option<&Value>) {
            if let (Some(section), Some(raw)) = (section.as_mut(), raw) {
                lenient::keep_unread(section, raw);
            }
        }
        nested(&mut self.profile, raw.get("profile"));
        nested(&mut self.discord, raw.get("discord"));
        nested(&mut self.theme, raw.get("theme"));
        nested(&mut self.background, raw.get("background"));
        nested(&mut self.audio, raw.get("audio"));
        nested(&mut self.splash, raw.get("splash"));
        nested(&mut self.stats, raw.get("stats"));

        // List parsing keeps exactly the object elements, in order.
        let objects = |key: &str| -> Vec<Value> {
            raw.get(key)
                .and_then(Value::as_array)
                .map(|items| items.iter().filter(|v| v.is_object()).cloned().collect())
                .unwrap_or_default()
        };
        for (badge, raw) in self.badges.iter_mut().zip(objects("badges")) {
            lenient::keep_unread(badge, &raw);
        }
        for (link, raw) in self.social_links.iter_mut().zip(objects("socialLinks")) {
            lenient::keep_unread(link, &raw);
        }
    }

    /// Drop raw values kept from loading once an edit has set the typed
    /// field of the same name, so each key is written once.
    pub fn drop_shadowed(&mut self) {
        lenient::drop_shadowed(self);

        fn nested<T: Section>(section: &mut Option<T>) {
            if let Some(section) = section.as_mut() {
                lenient::drop_shadowed(section);
            }
        }
        nested(&mut self.profile);
        nested(&mut self.discord);
        nested(&mut self.theme);
        nested(&mut self.background);
        nested(&mut self.audio);
        nested(&mut self.splash);
        nested(&mut self.stats);
        self.badges.iter_mut().for_each(lenient::drop_shadowed);
        self.social_links.iter_mut().for_each(lenient::drop_shadowed);
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        self.profile.get_or_insert_with(Default::default)
    }

    pub fn discord_mut(&mut self) -> &mut Discord {
        self.discord.get_or_insert_with(Default::default)
    }

    pub fn theme_mut(&mut self) -> &mut Theme {
        self.theme.get_or_insert_with(Default::default)
    }

    pub fn background_mut(&mut self) -> &mut Background {
        self.background.get_or_insert_with(Default::default)
    }

    pub fn audio_mut(&mut self) -> &mut Audio {
        self.audio.get_or_insert_with(Default::default)
    }

    pub fn splash_mut(&mut self) -> &mut Splash {
        self.splash.get_or_insert_with(Default::default)
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        self.stats.get_or_insert_with(Default::default)
    }
}

macro_rules! impl_section {
    ($($ty:ty),* $(,)?) => {
        $(impl Section for $ty {
            fn extra_mut(&mut self) -> &mut Extra {
                &mut self.extra
            }
        })*
    };
}

impl_section!(
    ProfileConfig,
    Profile,
    Discord,
    Badge,
    SocialLink,
    Theme,
    Background,
    Audio,
    Splash,
    Stats,
);
