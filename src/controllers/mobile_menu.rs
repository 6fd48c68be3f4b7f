use super::Handler;
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{EventState, EventType, ListenerStore};
use crate::observer::Viewport;
use crate::ui_state::MenuState;
use crate::Result;

/// Hamburger-driven mobile menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MobileMenuController {
    menu: NodeId,
    hamburger: NodeId,
    /// Clicks outside this element close the menu.
    navbar: Option<NodeId>,
    breakpoint: f64,
}

impl MobileMenuController {
    pub(crate) fn resolve(dom: &Dom, config: &PageConfig) -> Option<Self> {
        let (Some(menu), Some(hamburger)) = (
            dom.by_id(&config.nav_menu_id),
            dom.by_id(&config.hamburger_id),
        ) else {
            tracing::warn!(
                menu = %config.nav_menu_id,
                hamburger = %config.hamburger_id,
                "mobile menu markup incomplete; menu controller disabled"
            );
            return None;
        };
        Some(Self {
            menu,
            hamburger,
            navbar: dom.by_id(&config.navbar_id),
            breakpoint: config.mobile_breakpoint,
        })
    }

    pub(crate) fn register(&self, dom: &Dom, listeners: &mut ListenerStore<Handler>) {
        listeners.add(self.hamburger, EventType::Click, Handler::HamburgerToggle);
        if self.navbar.is_some() {
            listeners.add(dom.root(), EventType::Click, Handler::OutsideClick);
        } else {
            tracing::warn!("no navbar element; outside clicks will not close the menu");
        }
        listeners.add_window(EventType::Resize, Handler::CloseMenuOnResize);
    }

    pub(crate) fn hamburger(&self) -> NodeId {
        self.hamburger
    }

    pub(crate) fn state(&self, dom: &Dom) -> MenuState {
        MenuState::read(dom, self.menu)
    }

    fn set_state(&self, dom: &mut Dom, next: MenuState) -> Result<()> {
        let current = self.state(dom);
        if current != next {
            tracing::debug!(from = ?current, to = ?next, "mobile menu transition");
        }
        next.apply(dom, self.menu, self.hamburger)
    }

    pub(crate) fn toggle(&self, dom: &mut Dom) -> Result<()> {
        let next = self.state(dom).toggled();
        self.set_state(dom, next)
    }

    pub(crate) fn close(&self, dom: &mut Dom) -> Result<()> {
        self.set_state(dom, MenuState::Closed)
    }

    pub(crate) fn on_document_click(&self, dom: &mut Dom, event: &EventState) -> Result<()> {
        let (Some(navbar), Some(target)) = (self.navbar, event.target) else {
            return Ok(());
        };
        if dom.contains(navbar, target) {
            return Ok(());
        }
        self.close(dom)
    }

    pub(crate) fn on_resize(&self, dom: &mut Dom, viewport: &Viewport) -> Result<()> {
        if viewport.width > self.breakpoint {
            self.close(dom)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    const MARKUP: &str = r#"
        <nav id="navbar"><button id="hamburger"></button><ul id="nav-menu"></ul></nav>
        <main id="main"><p id="outside">x</p></main>
    "#;

    fn setup() -> Result<(Dom, MobileMenuController)> {
        let dom = parse_html(MARKUP)?;
        let menu = MobileMenuController::resolve(&dom, &PageConfig::default())
            .expect("menu markup present");
        Ok((dom, menu))
    }

    #[test]
    fn toggle_flips_state_and_aria() -> Result<()> {
        let (mut dom, menu) = setup()?;
        menu.toggle(&mut dom)?;
        assert_eq!(menu.state(&dom), MenuState::Open);
        assert_eq!(
            dom.attr(menu.hamburger(), "aria-expanded").as_deref(),
            Some("true")
        );
        menu.toggle(&mut dom)?;
        assert_eq!(menu.state(&dom), MenuState::Closed);
        Ok(())
    }

    #[test]
    fn outside_click_closes_but_inside_click_does_not() -> Result<()> {
        let (mut dom, menu) = setup()?;
        menu.toggle(&mut dom)?;

        let inside = EventState::new(EventType::Click, Some(menu.hamburger()));
        menu.on_document_click(&mut dom, &inside)?;
        assert!(menu.state(&dom).is_open());

        let outside = EventState::new(EventType::Click, dom.by_id("outside"));
        menu.on_document_click(&mut dom, &outside)?;
        menu.on_document_click(&mut dom, &outside)?;
        assert_eq!(menu.state(&dom), MenuState::Closed);
        Ok(())
    }

    #[test]
    fn resize_closes_only_above_breakpoint() -> Result<()> {
        let (mut dom, menu) = setup()?;
        menu.toggle(&mut dom)?;
        menu.on_resize(&mut dom, &Viewport::new(768.0, 800.0))?;
        assert!(menu.state(&dom).is_open());
        menu.on_resize(&mut dom, &Viewport::new(769.0, 800.0))?;
        assert!(!menu.state(&dom).is_open());
        Ok(())
    }

    #[test]
    fn missing_hamburger_disables_the_controller() -> Result<()> {
        let dom = parse_html("<ul id='nav-menu'></ul>")?;
        assert!(MobileMenuController::resolve(&dom, &PageConfig::default()).is_none());
        Ok(())
    }
}
