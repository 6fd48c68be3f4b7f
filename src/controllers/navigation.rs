use super::{Context, Handler, MobileMenuController};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{EventState, EventType, ListenerStore};
use crate::ui_state::ACTIVE_CLASS;
use crate::Result;

/// Smooth-scroll anchors and scroll-driven nav link highlighting.
#[derive(Debug, Clone)]
pub(crate) struct NavigationController {
    navbar: Option<NodeId>,
    nav_links: Vec<NodeId>,
    section_selector: String,
    section_lead: f64,
    menu: Option<MobileMenuController>,
}

impl NavigationController {
    pub(crate) fn install(
        dom: &Dom,
        config: &PageConfig,
        menu: Option<MobileMenuController>,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<Self> {
        let anchors = dom.query_selector_all(&config.in_page_anchor_selector)?;
        for anchor in &anchors {
            listeners.add(*anchor, EventType::Click, Handler::AnchorClick);
        }
        let navbar = dom.by_id(&config.navbar_id);
        if navbar.is_none() {
            tracing::warn!(id = %config.navbar_id, "no navbar element; scroll offsets ignore it");
        }
        let nav_links = dom.query_selector_all(&config.nav_link_selector)?;
        tracing::debug!(
            anchors = anchors.len(),
            nav_links = nav_links.len(),
            "navigation controller installed"
        );
        Ok(Self {
            navbar,
            nav_links,
            section_selector: config.section_selector.clone(),
            section_lead: config.active_section_lead,
            menu,
        })
    }

    fn navbar_height(&self, dom: &Dom) -> f64 {
        self.navbar.map_or(0.0, |navbar| dom.offset_height(navbar))
    }

    pub(crate) fn on_anchor_click(&self, ctx: &mut Context<'_>, event: &mut EventState) -> Result<()> {
        event.prevent_default();
        let Some(anchor) = event.current_target else {
            return Ok(());
        };
        let href = ctx.dom.attr(anchor, "href").unwrap_or_default();
        let target = href
            .strip_prefix('#')
            .filter(|id| !id.is_empty())
            .and_then(|id| ctx.dom.by_id(id));

        match target {
            Some(section) => {
                let top = ctx.dom.offset_top(section) - self.navbar_height(ctx.dom);
                tracing::debug!(%href, top, "smooth scroll to section");
                ctx.request_smooth_scroll(top);
            }
            None => tracing::debug!(%href, "anchor target missing; no scroll"),
        }

        match &self.menu {
            Some(menu) => menu.close(ctx.dom),
            None => Ok(()),
        }
    }

    /// Id of the section containing `scroll_y`; the last match wins.
    pub(crate) fn current_section(&self, dom: &Dom, scroll_y: f64) -> Result<Option<String>> {
        let nav_height = self.navbar_height(dom);
        let mut current = None;
        for section in dom.query_selector_all(&self.section_selector)? {
            let start = dom.offset_top(section) - nav_height - self.section_lead;
            let end = start + dom.offset_height(section);
            if scroll_y >= start && scroll_y < end {
                current = dom.attr(section, "id");
            }
        }
        Ok(current)
    }

    pub(crate) fn update_active_link(&self, ctx: &mut Context<'_>) -> Result<()> {
        let current = self.current_section(ctx.dom, ctx.viewport.scroll_y)?;
        let wanted = current.as_ref().map(|id| format!("#{id}"));
        for link in &self.nav_links {
            let active = wanted.is_some() && ctx.dom.attr(*link, "href") == wanted;
            ctx.dom.class_set(*link, ACTIVE_CLASS, active)?;
        }
        Ok(())
    }
}
