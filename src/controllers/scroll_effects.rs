use super::{Context, Handler, NavigationController};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId, format_float};
use crate::events::{EventType, ListenerStore};
use crate::timers::Throttle;
use crate::ui_state::{SCROLLED_CLASS, VISIBLE_CLASS};
use crate::Result;

#[derive(Debug, Clone)]
pub(crate) struct ScrollEffectsController {
    navbar: Option<NodeId>,
    scroll_top: Option<NodeId>,
    throttle: Throttle,
    scrolled_offset: f64,
    scroll_top_offset: f64,
    hero_background_selector: String,
    parallax_factor: f64,
}

impl ScrollEffectsController {
    pub(crate) fn install(
        dom: &Dom,
        config: &PageConfig,
        listeners: &mut ListenerStore<Handler>,
    ) -> Self {
        listeners.add_window(EventType::Scroll, Handler::ScrollEffects);
        listeners.add_window(EventType::Scroll, Handler::Parallax);

        let scroll_top = dom.by_id(&config.scroll_top_id);
        match scroll_top {
            Some(button) => listeners.add(button, EventType::Click, Handler::ScrollToTop),
            None => tracing::warn!(id = %config.scroll_top_id, "no scroll-to-top button"),
        }

        Self {
            navbar: dom.by_id(&config.navbar_id),
            scroll_top,
            throttle: Throttle::new(config.scroll_throttle_ms),
            scrolled_offset: config.navbar_scrolled_offset,
            scroll_top_offset: config.scroll_top_visible_offset,
            hero_background_selector: config.hero_background_selector.clone(),
            parallax_factor: config.parallax_factor,
        }
    }

    /// Throttled tick: navbar styling, active nav link, scroll-to-top visibility.
    pub(crate) fn on_scroll(
        &mut self,
        ctx: &mut Context<'_>,
        navigation: &NavigationController,
    ) -> Result<()> {
        if !self.throttle.try_acquire(ctx.now_ms) {
            ctx.trace.event(format!(
                "[event] scroll throttled now_ms={} window_ms={}",
                ctx.now_ms,
                self.throttle.limit_ms()
            ));
            return Ok(());
        }
        let scroll_y = ctx.viewport.scroll_y;
        if let Some(navbar) = self.navbar {
            ctx.dom
                .class_set(navbar, SCROLLED_CLASS, scroll_y > self.scrolled_offset)?;
        }
        navigation.update_active_link(ctx)?;
        if let Some(button) = self.scroll_top {
            ctx.dom
                .class_set(button, VISIBLE_CLASS, scroll_y > self.scroll_top_offset)?;
        }
        Ok(())
    }

    pub(crate) fn on_parallax(&self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(background) = ctx.dom.query_selector(&self.hero_background_selector)? else {
            return Ok(());
        };
        let offset = ctx.viewport.scroll_y * self.parallax_factor;
        ctx.dom.style_set(
            background,
            "transform",
            &format!("translateY({}px)", format_float(offset)),
        )
    }

    pub(crate) fn on_scroll_to_top(&self, ctx: &mut Context<'_>) {
        ctx.request_smooth_scroll(0.0);
    }
}
