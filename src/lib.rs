//! Interaction controllers for a single static marketing page.
//!
//! A [`Page`] parses the page markup into an in-memory DOM and wires the
//! navigation, mobile menu, scroll effects, animation, form, accessibility,
//! lazy-load and analytics controllers onto it. Time, scrolling and user
//! input are driven explicitly by the caller, which makes every behavior
//! deterministic and testable.
//!
//! ```
//! use page_interactions::Page;
//!
//! let html = r#"
//!   <nav id="navbar"><button id="hamburger"></button><ul id="nav-menu"></ul></nav>
//! "#;
//! let mut page = Page::from_html(html)?;
//! page.click("#hamburger")?;
//! page.assert_class("#nav-menu", "active", true)?;
//! # Ok::<(), page_interactions::Error>(())
//! ```

use std::error::Error as StdError;
use std::fmt;

mod analytics;
mod config;
mod controllers;
mod dom;
mod events;
mod html;
mod observer;
mod page;
mod regex;
mod selector;
mod timers;
mod trace;
mod ui_state;
mod validation;

pub use analytics::{AnalyticsSink, TrackedEvent};
pub use config::PageConfig;
pub use page::{Page, PendingTimer, ScrollBehavior, ScrollRequest};
pub use timers::{Debounce, Throttle};
pub use ui_state::{FieldState, MenuState, RevealState};
pub use validation::{FieldKind, ValidationError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    InvalidConfig(String),
    InvalidPattern(String),
    Runtime(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::InvalidPattern(msg) => write!(f, "invalid pattern: {msg}"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl StdError for Error {}
