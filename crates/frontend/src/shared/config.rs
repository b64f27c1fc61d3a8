use serde::Deserialize;
use std::time::Duration;

/// Id of the optional `<script type="application/toml">` element that
/// overrides the embedded configuration
pub const CONFIG_ELEMENT_ID: &str = "cart-sync-config";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CartConfig {
    pub endpoints: EndpointsConfig,
    pub csrf: CsrfConfig,
    pub timings: TimingsConfig,
    pub behavior: BehaviorConfig,
    pub messages: MessagesConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EndpointsConfig {
    pub validate: String,
    pub clear: String,
    /// Prefix used to build `<prefix><id>/` when a quantity form has no action
    pub update_prefix: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            validate: "/cart/validate/".to_string(),
            clear: "/cart/clear/".to_string(),
            update_prefix: "/cart/update/".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CsrfConfig {
    pub cookie_name: String,
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: "csrftoken".to_string(),
            header_name: "X-CSRFToken".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimingsConfig {
    pub control_cooldown_ms: u32,
    pub row_fade_ms: u32,
    pub reload_delay_ms: u32,
    pub toast_ms: u32,
}

impl TimingsConfig {
    pub fn control_cooldown(&self) -> Duration {
        Duration::from_millis(u64::from(self.control_cooldown_ms))
    }

    pub fn row_fade(&self) -> Duration {
        Duration::from_millis(u64::from(self.row_fade_ms))
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.reload_delay_ms))
    }

    pub fn toast(&self) -> Duration {
        Duration::from_millis(u64::from(self.toast_ms))
    }
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            control_cooldown_ms: 500,
            row_fade_ms: 300,
            reload_delay_ms: 300,
            toast_ms: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Reload after every successful remove, not only when the cart empties
    pub reload_after_remove: bool,
    /// Ignore summary and badge values from responses older than the last applied one
    pub discard_stale_summaries: bool,
    pub validate_on_load: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            reload_after_remove: true,
            discard_stale_summaries: true,
            validate_on_load: true,
        }
    }
}

/// User-visible strings. `{name}` and `{message}` are substituted.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MessagesConfig {
    pub fallback_product_name: String,
    pub added: String,
    pub generic_failure: String,
    pub network_error: String,
    pub parse_error: String,
    pub update_failed: String,
    pub quantity_updated: String,
    /// Toast after a decrease removed the line
    pub line_removed: String,
    pub removed: String,
    pub confirm_remove: String,
    pub remove_rejected: String,
    pub remove_failed: String,
    pub confirm_clear: String,
    pub cleared: String,
    pub empty_cart: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            fallback_product_name: "Ürün".to_string(),
            added: "{name} sepete eklendi!".to_string(),
            generic_failure: "Bir hata oluştu".to_string(),
            network_error: "Bir hata oluştu, lütfen tekrar deneyin".to_string(),
            parse_error: "Sunucudan geçersiz yanıt alındı, lütfen tekrar deneyin".to_string(),
            update_failed: "Güncelleme başarısız".to_string(),
            quantity_updated: "Miktar güncellendi!".to_string(),
            line_removed: "Ürün sepetten silindi!".to_string(),
            removed: "{name} sepetten silindi!".to_string(),
            confirm_remove: "Bu ürünü sepetten kaldırmak istediğinizden emin misiniz?".to_string(),
            remove_rejected: "Ürün silinirken bir hata oluştu: {message}".to_string(),
            remove_failed: "İşlem sırasında bir hata oluştu. Sayfa yenileniyor...".to_string(),
            confirm_clear: "Sepetinizdeki tüm ürünleri kaldırmak istediğinizden emin misiniz?"
                .to_string(),
            cleared: "Sepet boşaltıldı!".to_string(),
            empty_cart: "Sepetinizde ürün bulunmuyor.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₺".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn level(&self) -> log::Level {
        self.level.parse().unwrap_or(log::Level::Debug)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
        }
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[endpoints]
validate = "/cart/validate/"
clear = "/cart/clear/"
update_prefix = "/cart/update/"

[csrf]
cookie_name = "csrftoken"
header_name = "X-CSRFToken"

[timings]
control_cooldown_ms = 500
row_fade_ms = 300
reload_delay_ms = 300
toast_ms = 3000

[behavior]
reload_after_remove = true
discard_stale_summaries = true
validate_on_load = true

[display]
currency_symbol = "₺"

[logging]
level = "debug"
"#;

pub fn parse_config(text: &str) -> Result<CartConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Load configuration for the current page
///
/// Search order:
/// 1. Inline `<script id="cart-sync-config" type="application/toml">`
/// 2. Falls back to the embedded default config
///
/// Runs before logging is set up, so the caller reports the outcome.
pub fn load_config() -> Result<CartConfig, toml::de::Error> {
    let inline = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content());

    match inline {
        Some(text) if !text.trim().is_empty() => parse_config(&text),
        _ => parse_config(DEFAULT_CONFIG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG);
        assert!(config.is_ok());
        assert_eq!(config.unwrap(), CartConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [timings]
            control_cooldown_ms = 800

            [messages]
            added = "{name} added"
            "#,
        )
        .unwrap();
        assert_eq!(config.timings.control_cooldown(), Duration::from_millis(800));
        assert_eq!(config.timings.row_fade_ms, 300);
        assert_eq!(config.messages.added, "{name} added");
        assert_eq!(config.messages.cleared, "Sepet boşaltıldı!");
        assert_eq!(config.csrf.cookie_name, "csrftoken");
    }

    #[test]
    fn test_logging_level_falls_back_to_debug() {
        let mut logging = LoggingConfig::default();
        logging.level = "warn".to_string();
        assert_eq!(logging.level(), log::Level::Warn);
        logging.level = "loud".to_string();
        assert_eq!(logging.level(), log::Level::Debug);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(parse_config("[timings]\ncontrol_cooldown_ms = \"soon\"").is_err());
    }
}
