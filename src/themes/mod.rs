//! Themes module for the site-wide theme rotation
//!
//! The client cycles through a list of active themes; which themes are in
//! the cycle comes from a settings document. Dark is always available.

use crate::constants::themes::{DEFAULT_CYCLE, OPTIONAL};
use crate::models::{ThemeConfig, ThemeEntry, ThemeSettings};

/// Build the active theme cycle from stored settings
///
/// Dark is always first. Light stays active unless explicitly disabled;
/// seasonal themes are opt-in. A cycle of fewer than two themes falls back
/// to the full default cycle so the toggle always has somewhere to go.
pub fn active_themes(settings: Option<&ThemeSettings>) -> Vec<String> {
    let Some(settings) = settings else {
        return DEFAULT_CYCLE.iter().map(|t| (*t).to_string()).collect();
    };

    let mut active = vec!["dark".to_string()];
    if settings.light != Some(false) {
        active.push("light".to_string());
    }
    for theme in OPTIONAL {
        if settings.is_enabled(theme) {
            active.push((*theme).to_string());
        }
    }

    if active.len() < 2 {
        return DEFAULT_CYCLE.iter().map(|t| (*t).to_string()).collect();
    }
    active
}

/// The theme the toggle switches to from `current`
///
/// Cycles in list order; a current theme not in the active list restarts
/// the cycle at its head.
pub fn next_theme(current: &str, active: &[String]) -> String {
    match active.iter().position(|t| t == current) {
        Some(index) => active[(index + 1) % active.len()].clone(),
        None => active.first().cloned().unwrap_or_else(|| "dark".to_string()),
    }
}

/// Human label for a theme id
pub fn display_name(theme: &str) -> String {
    let name = match theme {
        "dark" => "Dark",
        "light" => "Light",
        "christmas" => "Christmas",
        "ruby" => "Ruby",
        "amethyst" => "Amethyst",
        "winter" => "Winter",
        "festival" => "Festival",
        "halloween" => "Halloween",
        "spring" => "Spring",
        other => {
            let mut chars = other.chars();
            return match chars.next() {
                Some(first) => {
                    format!("{}{} Mode", first.to_uppercase(), chars.as_str())
                }
                None => "Mode".to_string(),
            };
        }
    };
    format!("{} Mode", name)
}

/// Assemble the theme configuration served to the client
pub fn theme_config(settings: Option<&ThemeSettings>) -> ThemeConfig {
    ThemeConfig {
        active: active_themes(settings)
            .into_iter()
            .map(|id| ThemeEntry {
                display_name: display_name(&id),
                id,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_themes_without_settings_uses_default_cycle() {
        let active = active_themes(None);
        assert_eq!(active.len(), DEFAULT_CYCLE.len());
        assert_eq!(active[0], "dark");
        assert!(active.contains(&"halloween".to_string()));
    }

    #[test]
    fn test_active_themes_respects_flags() {
        let settings: ThemeSettings =
            serde_json::from_str(r#"{"christmas": true, "winter": true}"#).unwrap();

        let active = active_themes(Some(&settings));
        assert_eq!(active, vec!["dark", "light", "christmas", "winter"]);
    }

    #[test]
    fn test_active_themes_light_can_be_disabled() {
        let settings: ThemeSettings =
            serde_json::from_str(r#"{"light": false, "ruby": true}"#).unwrap();

        let active = active_themes(Some(&settings));
        assert_eq!(active, vec!["dark", "ruby"]);
    }

    #[test]
    fn test_active_themes_falls_back_when_everything_disabled() {
        let settings: ThemeSettings = serde_json::from_str(r#"{"light": false}"#).unwrap();

        let active = active_themes(Some(&settings));
        assert_eq!(active.len(), DEFAULT_CYCLE.len());
    }

    #[test]
    fn test_next_theme_cycles_and_wraps() {
        let active: Vec<String> = ["dark", "light", "ruby"]
            .iter()
            .map(|t| t.to_string())
            .collect();

        assert_eq!(next_theme("dark", &active), "light");
        assert_eq!(next_theme("ruby", &active), "dark");
    }

    #[test]
    fn test_next_theme_unknown_current_restarts_cycle() {
        let active: Vec<String> = ["dark", "light"].iter().map(|t| t.to_string()).collect();
        assert_eq!(next_theme("halloween", &active), "dark");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("dark"), "Dark Mode");
        assert_eq!(display_name("halloween"), "Halloween Mode");
        assert_eq!(display_name("custom"), "Custom Mode");
    }

    #[test]
    fn test_theme_config_pairs_ids_with_names() {
        let config = theme_config(None);
        assert_eq!(config.active[0].id, "dark");
        assert_eq!(config.active[0].display_name, "Dark Mode");
    }
}
