/// A social platform the admin page offers in its "add link" grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Picking this entry creates a `custom_<millis>` link instead of a platform link.
pub const CUSTOM_PLATFORM_ID: &str = "custom";

pub const PLATFORMS: &[Platform] = &[
    Platform {
        id: CUSTOM_PLATFORM_ID,
        name: "Custom / Other",
        icon: "fas fa-plus-circle",
        color: "#ffffff",
    },
    Platform {
        id: "github",
        name: "GitHub",
        icon: "fab fa-github",
        color: "#333333",
    },
    Platform {
        id: "discord",
        name: "Discord",
        icon: "fab fa-discord",
        color: "#5865f2",
    },
    Platform {
        id: "twitter",
        name: "Twitter/X",
        icon: "fab fa-twitter",
        color: "#000000",
    },
    Platform {
        id: "instagram",
        name: "Instagram",
        icon: "fab fa-instagram",
        color: "#e4405f",
    },
    Platform {
        id: "telegram",
        name: "Telegram",
        icon: "fab fa-telegram",
        color: "#0088cc",
    },
    Platform {
        id: "spotify",
        name: "Spotify",
        icon: "fab fa-spotify",
        color: "#1db954",
    },
    Platform {
        id: "youtube",
        name: "YouTube",
        icon: "fab fa-youtube",
        color: "#ff0000",
    },
    Platform {
        id: "twitch",
        name: "Twitch",
        icon: "fab fa-twitch",
        color: "#9146ff",
    },
    Platform {
        id: "tiktok",
        name: "TikTok",
        icon: "fab fa-tiktok",
        color: "#000000",
    },
    Platform {
        id: "reddit",
        name: "Reddit",
        icon: "fab fa-reddit",
        color: "#ff4500",
    },
    Platform {
        id: "linkedin",
        name: "LinkedIn",
        icon: "fab fa-linkedin",
        color: "#0077b5",
    },
    Platform {
        id: "steam",
        name: "Steam",
        icon: "fab fa-steam",
        color: "#171a21",
    },
    Platform {
        id: "email",
        name: "Email",
        icon: "fas fa-envelope",
        color: "#4285f4",
    },
    Platform {
        id: "website",
        name: "Website",
        icon: "fas fa-globe",
        color: "#00ff88",
    },
    Platform {
        id: "bitcoin",
        name: "Bitcoin",
        icon: "fab fa-bitcoin",
        color: "#f7931a",
    },
    Platform {
        id: "ethereum",
        name: "Ethereum",
        icon: "fab fa-ethereum",
        color: "#627eea",
    },
    Platform {
        id: "litecoin",
        name: "Litecoin",
        icon: "fas fa-coins",
        color: "#345d9d",
    },
    Platform {
        id: "solana",
        name: "Solana",
        icon: "fas fa-sun",
        color: "#14f195",
    },
    Platform {
        id: "paypal",
        name: "PayPal",
        icon: "fab fa-paypal",
        color: "#00457c",
    },
    Platform {
        id: "cashapp",
        name: "Cash App",
        icon: "fas fa-dollar-sign",
        color: "#00d632",
    },
];

pub fn platform(id: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetBadge {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

pub const PRESET_BADGES: &[PresetBadge] = &[
    PresetBadge {
        id: "premium",
        name: "Premium",
        icon: "fas fa-crown",
        color: "#ffd700",
        description: "Premium member badge",
    },
    PresetBadge {
        id: "verified",
        name: "Verified",
        icon: "fas fa-check-circle",
        color: "#00ff88",
        description: "Verified account",
    },
    PresetBadge {
        id: "dollar",
        name: "Supporter",
        icon: "fas fa-dollar-sign",
        color: "#00ff88",
        description: "Financial supporter",
    },
    PresetBadge {
        id: "star",
        name: "Star",
        icon: "fas fa-star",
        color: "#00ff88",
        description: "Star member",
    },
    PresetBadge {
        id: "partner",
        name: "Partner",
        icon: "fas fa-handshake",
        color: "#5865f2",
        description: "Official partner",
    },
    PresetBadge {
        id: "developer",
        name: "Developer",
        icon: "fas fa-code",
        color: "#9b59b6",
        description: "Developer status",
    },
    PresetBadge {
        id: "early",
        name: "Early Adopter",
        icon: "fas fa-bolt",
        color: "#e74c3c",
        description: "Early adopter badge",
    },
    PresetBadge {
        id: "bug",
        name: "Bug Hunter",
        icon: "fas fa-bug",
        color: "#2ecc71",
        description: "Found bugs",
    },
];

pub fn preset_badge(id: &str) -> Option<&'static PresetBadge> {
    PRESET_BADGES.iter().find(|b| b.id == id)
}

pub const FALLBACK_LINK_ICON: &str = "fas fa-link";

/// Icon class the display page uses for a link id. Custom and unknown ids get
/// the generic link icon.
pub fn icon_class_for(id: &str) -> &'static str {
    match id {
        "github" => "fab fa-github",
        "discord" => "fab fa-discord",
        "telegram" => "fab fa-telegram",
        "spotify" => "fab fa-spotify",
        "envelope" | "email" => "fas fa-envelope",
        "twitter" => "fab fa-twitter",
        "instagram" => "fab fa-instagram",
        "youtube" => "fab fa-youtube",
        "twitch" => "fab fa-twitch",
        "bitcoin" => "fab fa-bitcoin",
        "ethereum" => "fab fa-ethereum",
        "litecoin" => "fas fa-coins",
        "solana" => "fas fa-sun",
        "tiktok" => "fab fa-tiktok",
        "reddit" => "fab fa-reddit",
        "linkedin" => "fab fa-linkedin",
        "steam" => "fab fa-steam",
        "paypal" => "fab fa-paypal",
        _ => FALLBACK_LINK_ICON,
    }
}
