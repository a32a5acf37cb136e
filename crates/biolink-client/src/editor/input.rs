use super::EditorError;
use biolink_models::ProfileConfig;

/// Opacity used when the card opacity field is empty, zero or not a number.
pub const DEFAULT_CARD_OPACITY: f64 = 0.78;

/// A single admin form field change. Applied to the document immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum FormInput {
    Username(String),
    DisplayName(String),
    Bio(String),
    Status(String),
    /// An avatar URL typed by hand. An empty value leaves the avatar alone.
    AvatarUrl(String),
    /// An uploaded avatar, already encoded as a `data:` URL.
    AvatarData(String),
    AvatarOrnament(String),
    Font(String),
    UsernameEffect(String),
    UsernameColor(String),
    CursorEffect(String),
    ProfileLocation(String),

    DiscordUserId(String),
    DiscordServerId(String),
    ShowPresence(bool),
    ShowServer(bool),
    InviteUrl(String),
    ServerNameOverride(String),
    MemberCountOverride(String),
    IconUrlOverride(String),

    AccentColor(String),
    /// `#rrggbb` plus an opacity, stored as `rgba(r, g, b, opacity)`.
    CardBackground { hex: String, opacity: f64 },
    CardBlur(i64),
    CardTransparency(i64),
    CardBorderRadius(i64),
    CardTextMode(String),
    TextColor(String),
    SecondaryTextColor(String),

    BackgroundType(String),
    /// URL, uploaded `data:` URL, or a CSS colour for the `color` type.
    BackgroundUrl(String),

    AudioEnabled(bool),
    AudioAutoplay(bool),
    AudioUrl(String),
    /// Slider value in percent.
    AudioVolumePercent(f64),

    SplashEnabled(bool),
    SplashText(String),
    SplashSubtitle(String),

    ShowViews(bool),
    StatsLocation(String),
    LocationEmoji(String),
}

impl FormInput {
    pub(crate) fn apply(self, doc: &mut ProfileConfig) -> Result<(), EditorError> {
        match self {
            Self::Username(v) => doc.profile_mut().username = Some(v),
            Self::DisplayName(v) => doc.profile_mut().display_name = Some(v),
            Self::Bio(v) => doc.profile_mut().bio = Some(v),
            Self::Status(v) => doc.profile_mut().status = Some(v),
            Self::AvatarUrl(v) => {
                if !v.is_empty() {
                    doc.profile_mut().avatar = Some(v);
                }
            }
            Self::AvatarData(v) => doc.profile_mut().avatar = Some(v),
            Self::AvatarOrnament(v) => doc.profile_mut().ornament = Some(v),
            Self::Font(v) => doc.profile_mut().font = Some(v),
            Self::UsernameEffect(v) => doc.profile_mut().username_effect = Some(v),
            Self::UsernameColor(v) => doc.profile_mut().username_color = Some(v),
            Self::CursorEffect(v) => doc.profile_mut().cursor_effect = Some(v),
            Self::ProfileLocation(v) => doc.profile_mut().location = Some(v),

            Self::DiscordUserId(v) => doc.discord_mut().user_id = Some(v),
            Self::DiscordServerId(v) => doc.discord_mut().server_id = Some(v),
            Self::ShowPresence(v) => doc.discord_mut().show_presence = Some(v),
            Self::ShowServer(v) => doc.discord_mut().show_server = Some(v),
            Self::InviteUrl(v) => doc.discord_mut().invite_url = Some(v),
            Self::ServerNameOverride(v) => doc.discord_mut().server_name_override = Some(v),
            Self::MemberCountOverride(v) => doc.discord_mut().member_count_override = Some(v),
            Self::IconUrlOverride(v) => doc.discord_mut().icon_url_override = Some(v),

            Self::AccentColor(v) => doc.theme_mut().accent_color = Some(v),
            Self::CardBackground { hex, opacity } => {
                doc.theme_mut().card_background = Some(card_background(&hex, opacity)?);
            }
            Self::CardBlur(v) => doc.theme_mut().card_blur = Some(v.into()),
            Self::CardTransparency(v) => doc.theme_mut().card_transparency = Some(v.into()),
            Self::CardBorderRadius(v) => doc.theme_mut().card_border_radius = Some(v.into()),
            Self::CardTextMode(v) => doc.theme_mut().card_text_mode = Some(v),
            Self::TextColor(v) => doc.theme_mut().text_color = Some(v),
            Self::SecondaryTextColor(v) => doc.theme_mut().secondary_text = Some(v),

            Self::BackgroundType(v) => doc.background_mut().kind = Some(v),
            Self::BackgroundUrl(v) => doc.background_mut().url = Some(v),

            Self::AudioEnabled(v) => doc.audio_mut().enabled = Some(v),
            Self::AudioAutoplay(v) => doc.audio_mut().autoplay = Some(v),
            Self::AudioUrl(v) => doc.audio_mut().url = Some(v),
            Self::AudioVolumePercent(percent) => {
                if !doc.audio_mut().set_volume(percent / 100.0) {
                    return Err(EditorError::InvalidInput(format!("volume {percent}")));
                }
            }

            Self::SplashEnabled(v) => doc.splash_mut().enabled = Some(v),
            Self::SplashText(v) => doc.splash_mut().text = Some(v),
            Self::SplashSubtitle(v) => doc.splash_mut().subtitle = Some(v),

            Self::ShowViews(v) => doc.stats_mut().show_views = Some(v),
            Self::StatsLocation(v) => doc.stats_mut().location = Some(v),
            Self::LocationEmoji(v) => doc.stats_mut().location_emoji = Some(v),
        }
        Ok(())
    }
}

/// `#rrggbb` + opacity to `rgba(r, g, b, opacity)`.
pub fn card_background(hex: &str, opacity: f64) -> Result<String, EditorError> {
    let (r, g, b) =
        parse_hex_rgb(hex).ok_or_else(|| EditorError::InvalidInput(format!("colour {hex}")))?;
    let opacity = if opacity.is_finite() && opacity != 0.0 {
        opacity
    } else {
        DEFAULT_CARD_OPACITY
    };
    Ok(format!("rgba({r}, {g}, {b}, {opacity})"))
}

/// Parses `#rrggbb`. Anything else is `None`.
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_background_formats_rgba() {
        assert_eq!(
            card_background("#102030", 0.5).unwrap(),
            "rgba(16, 32, 48, 0.5)"
        );
        assert_eq!(card_background("#000000", 1.0).unwrap(), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn missing_opacity_falls_back() {
        assert_eq!(
            card_background("#ffffff", f64::NAN).unwrap(),
            "rgba(255, 255, 255, 0.78)"
        );
        assert_eq!(
            card_background("#ffffff", 0.0).unwrap(),
            "rgba(255, 255, 255, 0.78)"
        );
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(parse_hex_rgb("#fff").is_none());
        assert!(parse_hex_rgb("00ff88").is_none());
        assert!(parse_hex_rgb("#zzzzzz").is_none());
        assert_eq!(parse_hex_rgb("#00FF88"), Some((0, 255, 136)));
        assert!(card_background("red", 0.5).is_err());
    }

    #[test]
    fn empty_avatar_url_is_ignored() {
        let mut doc = ProfileConfig::default();
        FormInput::AvatarUrl("a.png".into()).apply(&mut doc).unwrap();
        FormInput::AvatarUrl(String::new()).apply(&mut doc).unwrap();
        assert_eq!(
            doc.profile.as_ref().and_then(|p| p.avatar.as_deref()),
            Some("a.png")
        );
    }

    #[test]
    fn volume_slider_is_percent() {
        let mut doc = ProfileConfig::default();
        FormInput::AudioVolumePercent(30.0).apply(&mut doc).unwrap();
        assert_eq!(doc.audio.as_ref().and_then(|a| a.volume()), Some(0.3));
        assert!(FormInput::AudioVolumePercent(f64::NAN)
            .apply(&mut doc)
            .is_err());
    }
}
