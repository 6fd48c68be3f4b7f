mod common;

use common::landing_page;
use page_interactions::{Error, FieldState, Page, Result, TrackedEvent};

const SPINNER_TEXT: &str = " Sending...";

#[test]
fn blur_validates_required_fields() -> Result<()> {
    let mut page = landing_page()?;
    page.blur("#name")?;
    assert_eq!(
        page.field_state("#name")?,
        FieldState::Invalid("This field is required".into())
    );
    page.assert_class("#name", "error", true)?;

    page.blur("#message")?;
    assert_eq!(
        page.field_state("#message")?,
        FieldState::Invalid("This field is required".into())
    );

    page.type_text("#name", "   ")?;
    page.blur("#name")?;
    assert_eq!(
        page.field_state("#name")?,
        FieldState::Invalid("This field is required".into())
    );
    Ok(())
}

#[test]
fn repeated_failures_keep_a_single_message() -> Result<()> {
    let mut page = landing_page()?;
    page.blur("#name")?;
    page.blur("#name")?;
    page.focus("#name")?;
    page.blur("#name")?;

    let form = page.dump_dom(".contact-form")?;
    assert_eq!(form.matches("error-message").count(), 1, "{form}");
    page.assert_text(".error-message", "This field is required")?;
    Ok(())
}

#[test]
fn email_and_phone_formats_are_checked() -> Result<()> {
    let mut page = landing_page()?;

    page.type_text("#email", "user@")?;
    page.blur("#email")?;
    assert_eq!(
        page.field_state("#email")?,
        FieldState::Invalid("Please enter a valid email address".into())
    );
    page.type_text("#email", "user@example.com")?;
    page.blur("#email")?;
    assert_eq!(page.field_state("#email")?, FieldState::Valid);

    page.blur("#phone")?;
    assert_eq!(page.field_state("#phone")?, FieldState::Valid);
    page.type_text("#phone", "123")?;
    page.blur("#phone")?;
    assert_eq!(
        page.field_state("#phone")?,
        FieldState::Invalid("Please enter a valid phone number".into())
    );
    page.type_text("#phone", "+1 (555) 123-4567")?;
    page.blur("#phone")?;
    assert_eq!(page.field_state("#phone")?, FieldState::Valid);
    Ok(())
}

#[test]
fn typing_clears_the_error_without_revalidating() -> Result<()> {
    let mut page = landing_page()?;
    page.type_text("#email", "nope")?;
    page.blur("#email")?;
    page.assert_class("#email", "error", true)?;

    page.type_text("#email", "still nope")?;
    assert_eq!(page.field_state("#email")?, FieldState::Valid);
    page.assert_class("#email", "error", false)?;
    let form = page.dump_dom(".contact-form")?;
    assert!(!form.contains("error-message"), "{form}");
    Ok(())
}

#[test]
fn submit_shows_spinner_and_restores_after_delay() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#send")?;

    page.assert_text("#send", SPINNER_TEXT)?;
    page.assert_exists("#send .fa-spinner")?;
    page.assert_attr("#send", "disabled", Some(""))?;
    assert_eq!(
        page.tracked_events(),
        [TrackedEvent::new("Contact", "Form Submission", "Contact Form")]
    );

    page.advance_time(2999)?;
    page.assert_attr("#send", "disabled", Some(""))?;

    page.advance_time(1)?;
    page.assert_text("#send", "Send Message")?;
    page.assert_attr("#send", "disabled", None)?;
    Ok(())
}

#[test]
fn restored_label_keeps_escaped_characters_as_text() -> Result<()> {
    let html = r#"
        <form class="contact-form">
          <button id="send" type="submit">Send &lt;b&gt;now&lt;/b&gt; &amp; relax</button>
        </form>
    "#;
    let mut page = Page::from_html(html)?;
    page.click("#send")?;
    page.assert_text("#send", SPINNER_TEXT)?;

    page.advance_time(3000)?;
    page.assert_text("#send", "Send <b>now</b> & relax")?;
    assert!(matches!(
        page.assert_exists("#send b"),
        Err(Error::SelectorNotFound(_))
    ));
    Ok(())
}

#[test]
fn clicking_the_disabled_button_does_nothing() -> Result<()> {
    let mut page = landing_page()?;
    page.click("#send")?;
    page.click("#send")?;
    assert_eq!(page.tracked_events().len(), 1);
    assert_eq!(
        page.pending_timers()
            .iter()
            .filter(|timer| timer.task == "restore-submit-button")
            .count(),
        1
    );
    Ok(())
}

#[test]
fn resubmitting_while_loading_restarts_the_timer() -> Result<()> {
    let mut page = landing_page()?;
    page.submit(".contact-form")?;
    page.advance_time(1000)?;
    page.submit("#email")?;

    page.advance_time(2000)?;
    page.assert_text("#send", SPINNER_TEXT)?;
    page.advance_time(1000)?;
    page.assert_text("#send", "Send Message")?;
    page.assert_attr("#send", "disabled", None)?;
    assert_eq!(page.tracked_events().len(), 2);
    Ok(())
}

#[test]
fn submit_does_not_validate_fields() -> Result<()> {
    let mut page = landing_page()?;
    page.submit(".contact-form")?;
    assert_eq!(page.field_state("#name")?, FieldState::Valid);
    assert_eq!(page.field_state("#message")?, FieldState::Valid);
    Ok(())
}

#[test]
fn actions_reject_the_wrong_element_kind() -> Result<()> {
    let mut page = landing_page()?;
    match page.submit("#hero-title") {
        Err(Error::TypeMismatch { expected, .. }) => {
            assert_eq!(expected, "form or form control")
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
    match page.type_text("#send", "x") {
        Err(Error::TypeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, "input or textarea");
            assert_eq!(actual, "button");
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
    assert!(matches!(
        page.blur("#does-not-exist"),
        Err(Error::SelectorNotFound(_))
    ));
    Ok(())
}
