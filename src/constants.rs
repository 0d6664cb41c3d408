//! Constants module for the Anime Catalog API
//!
//! Contains listing defaults, platform label tables, and the theme cycle.

/// Listing pagination defaults
pub mod paging {
    /// Cards shown per listing page
    pub const CARDS_PER_PAGE: u32 = 24;
}

/// Sort orders accepted by the post listing
pub mod orders {
    /// Newest documents first (numeric id descending)
    pub const LATEST: &str = "latest";

    /// Rating descending with ranks reassigned (the ranked list view)
    pub const RATING: &str = "rating";
}

/// Streaming platform label table
pub mod platforms {
    /// Normalized platform key to display name
    pub const DISPLAY_NAMES: &[(&str, &str)] = &[
        ("crunchyroll", "Crunchyroll"),
        ("netflix", "Netflix"),
        ("prime", "Prime Video"),
        ("hulu", "Hulu"),
        ("hotstar", "Disney+ Hotstar"),
        ("sonyliv", "Sony LIV"),
        ("jiocinema", "Jio Cinema"),
        ("zee5", "Zee5"),
        ("aha", "Aha"),
        ("sunnxt", "Sun NXT"),
    ];
}

/// Theme cycle configuration
pub mod themes {
    /// Full cycle used when no settings document narrows it down.
    /// Dark is always first and can never be disabled.
    pub const DEFAULT_CYCLE: &[&str] = &[
        "dark",
        "light",
        "christmas",
        "ruby",
        "amethyst",
        "winter",
        "festival",
        "halloween",
        "spring",
    ];

    /// Themes that are opt-in via the settings document
    pub const OPTIONAL: &[&str] = &[
        "christmas",
        "ruby",
        "amethyst",
        "winter",
        "festival",
        "halloween",
        "spring",
    ];
}
