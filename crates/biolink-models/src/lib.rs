pub mod catalog;
mod lenient;
pub mod profile;

pub use catalog::{
    icon_class_for, platform, preset_badge, Platform, PresetBadge, CUSTOM_PLATFORM_ID,
    FALLBACK_LINK_ICON, PLATFORMS, PRESET_BADGES,
};
pub use profile::{
    Audio, Background, Badge, Discord, Profile, ProfileConfig, SocialLink, Splash, Stats, Theme,
    CUSTOM_LINK_PREFIX,
};
