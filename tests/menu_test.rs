mod common;

use common::landing_page;
use page_interactions::{MenuState, Page, Result};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const MENU_PROPTEST_REGRESSION_FILE: &str = "tests/proptest-regressions/menu_test.txt";
const DEFAULT_MENU_PROPTEST_CASES: u32 = 64;

const NAV_LINKS: [&str; 3] = [
    r##".nav-link[href="#home"]"##,
    r##".nav-link[href="#services"]"##,
    r##".nav-link[href="#contact"]"##,
];

fn assert_menu(page: &Page, open: bool) -> Result<()> {
    let expected = if open { MenuState::Open } else { MenuState::Closed };
    assert_eq!(page.menu_state(), Some(expected));
    page.assert_class("#nav-menu", "active", open)?;
    page.assert_class("#hamburger", "active", open)?;
    page.assert_attr(
        "#hamburger",
        "aria-expanded",
        Some(if open { "true" } else { "false" }),
    )
}

#[test]
fn hamburger_toggles_menu_and_aria_expanded() -> Result<()> {
    let mut page = landing_page()?;
    assert_menu(&page, false)?;
    page.click("#hamburger")?;
    assert_menu(&page, true)?;
    page.click("#hamburger")?;
    assert_menu(&page, false)?;
    Ok(())
}

#[test]
fn click_outside_navbar_closes_menu() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#hamburger")?;

    page.click(".nav-container")?;
    assert_menu(&page, true)?;

    page.click("#hero-title")?;
    assert_menu(&page, false)?;

    page.click("#hero-title")?;
    assert_menu(&page, false)?;
    Ok(())
}

#[test]
fn resize_closes_menu_only_above_breakpoint() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#hamburger")?;

    page.resize(768.0, 900.0)?;
    assert_menu(&page, true)?;
    page.resize(375.0, 700.0)?;
    assert_menu(&page, true)?;

    page.resize(769.0, 900.0)?;
    assert_menu(&page, false)?;
    assert_eq!(page.viewport_size(), (769.0, 900.0));
    Ok(())
}

#[test]
fn tab_past_last_link_returns_focus_to_hamburger() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#hamburger")?;
    page.focus(NAV_LINKS[2])?;

    page.press_key(NAV_LINKS[2], "Tab", false)?;
    assert!(page.is_focused("#hamburger")?);
    assert!(!page.is_focused(NAV_LINKS[2])?);
    Ok(())
}

#[test]
fn shift_tab_before_first_link_returns_focus_to_hamburger() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#hamburger")?;
    page.focus(NAV_LINKS[0])?;

    page.press_key(NAV_LINKS[0], "Tab", true)?;
    assert!(page.is_focused("#hamburger")?);
    Ok(())
}

#[test]
fn focus_trap_ignores_inner_moves_and_closed_menu() -> Result<()> {
    let mut page = landing_page()?;
    page.focus(NAV_LINKS[2])?;

    page.press_key(NAV_LINKS[2], "Tab", false)?;
    assert!(page.is_focused(NAV_LINKS[2])?);

    page.click("#hamburger")?;
    page.focus(NAV_LINKS[2])?;
    page.press_key(NAV_LINKS[2], "Tab", true)?;
    page.press_key(NAV_LINKS[2], "Enter", false)?;
    page.press_key(NAV_LINKS[1], "Tab", false)?;
    assert!(page.is_focused(NAV_LINKS[2])?);
    Ok(())
}

#[test]
fn page_without_menu_markup_reports_no_menu() -> Result<()> {
    let mut page = Page::from_html("<body><button id='hamburger'>menu</button></body>")?;
    assert_eq!(page.menu_state(), None);
    page.click("#hamburger")?;
    page.assert_class("#hamburger", "active", false)?;
    page.assert_attr("#hamburger", "aria-expanded", Some("false"))?;
    Ok(())
}

#[derive(Debug, Clone)]
enum MenuAction {
    ToggleHamburger,
    ClickOutside,
    ClickNavLink(usize),
    Resize(u16),
    TabFromLastLink,
}

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn menu_proptest_cases() -> u32 {
    std::env::var("PAGE_INTERACTIONS_MENU_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases(
                "PAGE_INTERACTIONS_PROPTEST_CASES",
                DEFAULT_MENU_PROPTEST_CASES,
            )
        })
}

fn menu_action_strategy() -> BoxedStrategy<MenuAction> {
    prop_oneof![
        4 => Just(MenuAction::ToggleHamburger),
        2 => Just(MenuAction::ClickOutside),
        2 => (0..NAV_LINKS.len()).prop_map(MenuAction::ClickNavLink),
        2 => (320u16..=1600).prop_map(MenuAction::Resize),
        1 => Just(MenuAction::TabFromLastLink),
    ]
    .boxed()
}

fn run_action(page: &mut Page, action: &MenuAction) -> Result<()> {
    match action {
        MenuAction::ToggleHamburger => page.click("#hamburger"),
        MenuAction::ClickOutside => page.click("#hero-title"),
        MenuAction::ClickNavLink(index) => page.click(NAV_LINKS[*index]),
        MenuAction::Resize(width) => page.resize(f64::from(*width), 800.0),
        MenuAction::TabFromLastLink => page.press_key(NAV_LINKS[2], "Tab", false),
    }
}

fn assert_menu_follows_model(actions: &[MenuAction]) -> TestCaseResult {
    let mut page = landing_page()
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    let mut open = false;

    for (step, action) in actions.iter().enumerate() {
        if let Err(error) = run_action(&mut page, action) {
            prop_assert!(
                false,
                "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
            );
        }
        open = match action {
            MenuAction::ToggleHamburger => !open,
            MenuAction::ClickOutside | MenuAction::ClickNavLink(_) => false,
            MenuAction::Resize(width) => open && f64::from(*width) <= 768.0,
            MenuAction::TabFromLastLink => open,
        };

        let expected = if open { MenuState::Open } else { MenuState::Closed };
        prop_assert_eq!(
            page.menu_state(),
            Some(expected),
            "menu diverged at step {}: {:?}",
            step,
            action
        );
        prop_assert!(
            page.assert_class("#hamburger", "active", open).is_ok(),
            "hamburger class diverged at step {step}: {action:?}"
        );
        prop_assert!(
            page.assert_attr(
                "#hamburger",
                "aria-expanded",
                Some(if open { "true" } else { "false" })
            )
            .is_ok(),
            "aria-expanded diverged at step {step}: {action:?}"
        );
        if open && matches!(action, MenuAction::TabFromLastLink) {
            prop_assert!(page.is_focused("#hamburger").unwrap_or(false));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: menu_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(MENU_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn menu_state_follows_action_model(actions in vec(menu_action_strategy(), 1..=24)) {
        assert_menu_follows_model(&actions)?;
    }
}
