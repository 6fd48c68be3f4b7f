mod common;

use common::{NAVBAR_HEIGHT, landing_page};
use page_interactions::{MenuState, Page, Result, ScrollBehavior, ScrollRequest};

#[test]
fn nav_link_click_scrolls_below_navbar_and_closes_menu() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#hamburger")?;
    assert_eq!(page.menu_state(), Some(MenuState::Open));

    page.click(r##".nav-link[href="#services"]"##)?;

    assert_eq!(
        page.scroll_requests(),
        [ScrollRequest {
            top: 800.0 - NAVBAR_HEIGHT,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    assert_eq!(page.scroll_y(), 730.0);
    assert_eq!(page.menu_state(), Some(MenuState::Closed));
    page.assert_class("#nav-menu", "active", false)?;
    page.assert_class("#hamburger", "active", false)?;
    page.assert_attr("#hamburger", "aria-expanded", Some("false"))?;
    page.assert_class(r##".nav-link[href="#services"]"##, "active", true)?;
    page.assert_class(r##".nav-link[href="#home"]"##, "active", false)?;
    Ok(())
}

#[test]
fn missing_anchor_target_is_a_quiet_no_op() -> Result<()> {
    let html = r##"
        <nav id="navbar">
          <ul id="nav-menu">
            <li><a id="gone" class="nav-link" href="#missing">Gone</a></li>
            <li><a id="bare" class="nav-link" href="#">Top</a></li>
          </ul>
          <button id="hamburger"></button>
        </nav>
    "##;
    let mut page = Page::from_html(html)?;
    page.click("#hamburger")?;
    page.click("#gone")?;
    page.click("#bare")?;

    assert!(page.scroll_requests().is_empty());
    assert_eq!(page.scroll_y(), 0.0);
    assert_eq!(page.menu_state(), Some(MenuState::Closed));
    Ok(())
}

#[test]
fn smooth_scroll_offset_is_clamped_at_the_top() -> Result<()> {
    let mut page = landing_page()?;
    page.scroll_to(400.0)?;
    page.click(".logo")?;
    assert_eq!(page.scroll_requests().len(), 1);
    assert_eq!(page.scroll_requests()[0].top, 0.0);
    assert_eq!(page.scroll_y(), 0.0);
    Ok(())
}

#[test]
fn active_link_follows_the_scroll_position() -> Result<()> {
    let mut page = landing_page()?;
    let home = r##".nav-link[href="#home"]"##;
    let services = r##".nav-link[href="#services"]"##;
    let contact = r##".nav-link[href="#contact"]"##;

    page.scroll_to(0.0)?;
    page.assert_class(home, "active", true)?;
    page.assert_class(services, "active", false)?;

    // Services begins 170px (navbar + lead) before its top edge.
    page.advance_time(16)?;
    page.scroll_to(629.0)?;
    page.assert_class(home, "active", true)?;
    page.advance_time(16)?;
    page.scroll_to(630.0)?;
    page.assert_class(home, "active", false)?;
    page.assert_class(services, "active", true)?;

    page.advance_time(16)?;
    page.scroll_to(1600.0)?;
    page.assert_class(services, "active", false)?;
    page.assert_class(contact, "active", true)?;

    page.advance_time(16)?;
    page.scroll_to(5000.0)?;
    for link in [home, services, contact] {
        page.assert_class(link, "active", false)?;
    }
    Ok(())
}

#[test]
fn scroll_ticks_inside_the_throttle_window_are_dropped() -> Result<()> {
    let mut page = landing_page()?;
    page.scroll_to(500.0)?;
    page.assert_class("#navbar", "scrolled", true)?;

    page.scroll_to(50.0)?;
    page.assert_class("#navbar", "scrolled", true)?;
    page.advance_time(15)?;
    page.scroll_to(50.0)?;
    page.assert_class("#navbar", "scrolled", true)?;

    page.advance_time(1)?;
    page.scroll_to(50.0)?;
    page.assert_class("#navbar", "scrolled", false)?;
    Ok(())
}

#[test]
fn unhandled_in_page_anchor_jumps_instantly() -> Result<()> {
    let mut page = landing_page()?;
    page.scroll_to(1200.0)?;
    page.click(".skip-link")?;
    assert_eq!(
        page.scroll_requests(),
        [ScrollRequest {
            top: 0.0,
            behavior: ScrollBehavior::Instant,
        }]
    );
    assert_eq!(page.scroll_y(), 0.0);
    Ok(())
}

#[test]
fn trace_records_listener_order_for_a_click() -> Result<()> {
    let mut page = landing_page()?;
    page.enable_trace(true);
    page.click("#hamburger")?;
    let logs = page.take_trace_logs();

    assert!(logs.iter().any(|line| line == "[event] click target=button#hamburger"));
    let position = |needle: &str| {
        logs.iter()
            .position(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("missing {needle:?} in {logs:#?}"))
    };
    assert!(position("handler=HamburgerToggle") < position("handler=OutsideClick"));
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}
