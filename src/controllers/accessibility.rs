use super::{Context, Handler, MobileMenuController, TrapEdge};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{EventState, EventType, ListenerStore};
use crate::Result;

const SKIP_LINK_CLASS: &str = "skip-link";
const SKIP_LINK_TEXT: &str = "Skip to main content";
const SKIP_LINK_CSS: &str = "position: absolute; top: -40px; left: 6px; \
    background: var(--primary-color); color: white; padding: 8px; \
    text-decoration: none; z-index: 10000; border-radius: 4px;";
const HAMBURGER_LABEL: &str = "Toggle navigation menu";

/// Skip link, hamburger ARIA attributes and the open-menu focus trap.
#[derive(Debug, Clone)]
pub(crate) struct AccessibilityController {
    skip_link: Option<NodeId>,
    menu: Option<MobileMenuController>,
}

impl AccessibilityController {
    pub(crate) fn install(
        dom: &mut Dom,
        config: &PageConfig,
        menu: Option<MobileMenuController>,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<Self> {
        let skip_link = insert_skip_link(dom, &config.skip_link_target)?;
        if let Some(link) = skip_link {
            listeners.add(link, EventType::Focus, Handler::SkipLinkShow);
            listeners.add(link, EventType::Blur, Handler::SkipLinkHide);
        }

        if let Some(hamburger) = dom.by_id(&config.hamburger_id) {
            dom.set_attr(hamburger, "aria-label", HAMBURGER_LABEL)?;
            dom.set_attr(hamburger, "aria-expanded", "false")?;
        }

        let nav_links = dom.query_selector_all(&config.nav_link_selector)?;
        if let (Some(first), Some(last), Some(_)) = (nav_links.first(), nav_links.last(), menu) {
            listeners.add(*first, EventType::KeyDown, Handler::FocusTrap(TrapEdge::First));
            listeners.add(*last, EventType::KeyDown, Handler::FocusTrap(TrapEdge::Last));
        }

        Ok(Self { skip_link, menu })
    }

    pub(crate) fn on_skip_link_focus(&self, ctx: &mut Context<'_>) -> Result<()> {
        match self.skip_link {
            Some(link) => ctx.dom.style_set(link, "top", "6px"),
            None => Ok(()),
        }
    }

    pub(crate) fn on_skip_link_blur(&self, ctx: &mut Context<'_>) -> Result<()> {
        match self.skip_link {
            Some(link) => ctx.dom.style_set(link, "top", "-40px"),
            None => Ok(()),
        }
    }

    /// Keeps Tab focus cycling between the hamburger and the nav links while the menu is open.
    pub(crate) fn on_nav_link_keydown(&self, ctx: &mut Context<'_>, event: &mut EventState, edge: TrapEdge) {
        let (Some(menu), Some(key)) = (&self.menu, &event.key) else {
            return;
        };
        if !key.is_tab() || !menu.state(ctx.dom).is_open() {
            return;
        }
        let leaving = match edge {
            TrapEdge::First => key.shift,
            TrapEdge::Last => !key.shift,
        };
        if leaving {
            event.prevent_default();
            ctx.request_focus(menu.hamburger());
        }
    }
}

fn insert_skip_link(dom: &mut Dom, target: &str) -> Result<Option<NodeId>> {
    let Some(body) = dom.query_selector("body")? else {
        tracing::warn!("no body element; skip link not inserted");
        return Ok(None);
    };
    let link = dom.create_detached_element("a");
    dom.set_attr(link, "href", target)?;
    dom.set_attr(link, "class", SKIP_LINK_CLASS)?;
    dom.set_text_content(link, SKIP_LINK_TEXT)?;
    dom.set_css_text(link, SKIP_LINK_CSS)?;
    dom.prepend_child(body, link)?;
    Ok(Some(link))
}
