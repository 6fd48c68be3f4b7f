use crate::dom::Dom;
use crate::{Error, Result};

/// Markup contract and tuning constants for a [`Page`](crate::Page).
///
/// `Default` matches the marketing page markup: ids such as `navbar` and
/// `hamburger`, classes such as `.nav-link` and `.contact-form`, and the
/// timing constants the page script was tuned with.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub navbar_id: String,
    pub hamburger_id: String,
    pub nav_menu_id: String,
    pub scroll_top_id: String,
    /// `href` of the injected skip link.
    pub skip_link_target: String,

    pub nav_link_selector: String,
    pub in_page_anchor_selector: String,
    pub section_selector: String,
    pub reveal_selector: String,
    pub hero_fade_selector: String,
    pub hero_slogan_selector: String,
    pub hero_background_selector: String,
    pub hero_button_selector: String,
    pub service_card_selector: String,
    pub contact_form_selector: String,
    pub lazy_image_selector: String,

    pub navbar_scrolled_offset: f64,
    pub scroll_top_visible_offset: f64,
    /// Extra lead applied when deciding which section is current.
    pub active_section_lead: f64,
    pub mobile_breakpoint: f64,
    pub parallax_factor: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin_bottom: f64,

    pub scroll_throttle_ms: i64,
    pub typing_start_delay_ms: i64,
    pub typing_char_interval_ms: i64,
    pub caret_hide_delay_ms: i64,
    pub hero_stagger_ms: i64,
    pub submit_reset_ms: i64,

    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar_id: "navbar".into(),
            hamburger_id: "hamburger".into(),
            nav_menu_id: "nav-menu".into(),
            scroll_top_id: "scrollToTop".into(),
            skip_link_target: "#home".into(),

            nav_link_selector: ".nav-link".into(),
            in_page_anchor_selector: r##"a[href^="#"]"##.into(),
            section_selector: "section[id]".into(),
            reveal_selector: ".fade-in-up, .fade-in-left, .fade-in-right".into(),
            hero_fade_selector: ".hero .fade-in".into(),
            hero_slogan_selector: ".hero-slogan".into(),
            hero_background_selector: ".hero-background".into(),
            hero_button_selector: ".hero-buttons .btn".into(),
            service_card_selector: ".service-card".into(),
            contact_form_selector: ".contact-form".into(),
            lazy_image_selector: "img[data-src]".into(),

            navbar_scrolled_offset: 100.0,
            scroll_top_visible_offset: 300.0,
            active_section_lead: 100.0,
            mobile_breakpoint: 768.0,
            parallax_factor: 0.5,
            reveal_threshold: 0.1,
            reveal_root_margin_bottom: -50.0,

            scroll_throttle_ms: 16,
            typing_start_delay_ms: 1000,
            typing_char_interval_ms: 50,
            caret_hide_delay_ms: 1000,
            hero_stagger_ms: 200,
            submit_reset_ms: 3000,

            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl PageConfig {
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_mobile_breakpoint(mut self, width: f64) -> Self {
        self.mobile_breakpoint = width;
        self
    }

    pub fn with_scroll_throttle_ms(mut self, limit_ms: i64) -> Self {
        self.scroll_throttle_ms = limit_ms;
        self
    }

    pub fn with_reveal_options(mut self, threshold: f64, root_margin_bottom: f64) -> Self {
        self.reveal_threshold = threshold;
        self.reveal_root_margin_bottom = root_margin_bottom;
        self
    }

    pub fn with_typing_delays(mut self, start_ms: i64, char_interval_ms: i64, caret_hide_ms: i64) -> Self {
        self.typing_start_delay_ms = start_ms;
        self.typing_char_interval_ms = char_interval_ms;
        self.caret_hide_delay_ms = caret_hide_ms;
        self
    }

    pub fn with_submit_reset_ms(mut self, delay_ms: i64) -> Self {
        self.submit_reset_ms = delay_ms;
        self
    }

    /// Checked by [`Page::with_config`](crate::Page::with_config) before any markup is parsed.
    pub fn validate(&self) -> Result<()> {
        for (name, id) in [
            ("navbar_id", &self.navbar_id),
            ("hamburger_id", &self.hamburger_id),
            ("nav_menu_id", &self.nav_menu_id),
            ("scroll_top_id", &self.scroll_top_id),
        ] {
            if id.trim().is_empty() || id.chars().any(char::is_whitespace) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a single non-empty id, got {id:?}"
                )));
            }
        }

        let scratch = Dom::new();
        for (name, selector) in self.selectors() {
            scratch.query_selector_all(selector).map_err(|err| {
                Error::InvalidConfig(format!("{name} is not a supported selector: {err}"))
            })?;
        }

        for (name, value) in [
            ("navbar_scrolled_offset", self.navbar_scrolled_offset),
            ("scroll_top_visible_offset", self.scroll_top_visible_offset),
            ("active_section_lead", self.active_section_lead),
            ("mobile_breakpoint", self.mobile_breakpoint),
            ("parallax_factor", self.parallax_factor),
            ("reveal_root_margin_bottom", self.reveal_root_margin_bottom),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!("{name} must be finite")));
            }
        }

        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(Error::InvalidConfig(format!(
                "reveal_threshold must be within 0..=1, got {}",
                self.reveal_threshold
            )));
        }

        for (name, value) in [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("scroll_throttle_ms", self.scroll_throttle_ms),
            ("typing_start_delay_ms", self.typing_start_delay_ms),
            ("typing_char_interval_ms", self.typing_char_interval_ms),
            ("caret_hide_delay_ms", self.caret_hide_delay_ms),
            ("hero_stagger_ms", self.hero_stagger_ms),
            ("submit_reset_ms", self.submit_reset_ms),
        ] {
            if value < 0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }

    fn selectors(&self) -> [(&'static str, &str); 12] {
        [
            ("nav_link_selector", &self.nav_link_selector),
            ("in_page_anchor_selector", &self.in_page_anchor_selector),
            ("section_selector", &self.section_selector),
            ("reveal_selector", &self.reveal_selector),
            ("hero_fade_selector", &self.hero_fade_selector),
            ("hero_slogan_selector", &self.hero_slogan_selector),
            ("hero_background_selector", &self.hero_background_selector),
            ("hero_button_selector", &self.hero_button_selector),
            ("service_card_selector", &self.service_card_selector),
            ("contact_form_selector", &self.contact_form_selector),
            ("lazy_image_selector", &self.lazy_image_selector),
            ("skip_link_target", self.skip_link_target.as_str()),
        ]
    }
}
