use super::{Context, Handler, Task};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{EventState, EventType, ListenerStore};
use crate::timers::TimerHandle;
use crate::ui_state::FieldState;
use crate::validation::{FieldKind, FieldValidator};
use crate::Result;

const SUBMIT_BUTTON_SELECTOR: &str = r#"button[type="submit"]"#;
const SPINNER_HTML: &str = r#"<i class="fas fa-spinner fa-spin"></i> Sending..."#;

#[derive(Debug, Clone)]
struct PendingRestore {
    button: NodeId,
    original_html: String,
    timer: TimerHandle,
}

/// Contact form validation and submit loading state.
#[derive(Debug, Clone)]
pub(crate) struct FormController {
    form: NodeId,
    validator: FieldValidator,
    submit_reset_ms: i64,
    pending_restore: Option<PendingRestore>,
}

impl FormController {
    pub(crate) fn install(
        dom: &Dom,
        config: &PageConfig,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<Option<Self>> {
        let Some(form) = dom.query_selector(&config.contact_form_selector)? else {
            return Ok(None);
        };
        listeners.add(form, EventType::Submit, Handler::SubmitLoading);
        let fields = dom.query_selector_all_from(form, "input, textarea")?;
        for field in &fields {
            listeners.add(*field, EventType::Blur, Handler::ValidateField);
            listeners.add(*field, EventType::Input, Handler::ClearFieldError);
        }
        tracing::debug!(fields = fields.len(), "contact form controller installed");
        Ok(Some(Self {
            form,
            validator: FieldValidator::new()?,
            submit_reset_ms: config.submit_reset_ms,
            pending_restore: None,
        }))
    }

    pub(crate) fn validate_field(&self, dom: &mut Dom, field: NodeId) -> Result<FieldState> {
        let value = dom.value(field)?;
        let kind = FieldKind::from_type_attr(dom.attr(field, "type").as_deref());
        let state = match self.validator.validate(&value, dom.required(field), kind)? {
            Ok(()) => FieldState::Valid,
            Err(err) => FieldState::Invalid(err.message().to_string()),
        };
        state.apply(dom, field)?;
        Ok(state)
    }

    pub(crate) fn on_blur(&self, ctx: &mut Context<'_>, event: &EventState) -> Result<()> {
        let Some(field) = event.current_target else {
            return Ok(());
        };
        let state = self.validate_field(ctx.dom, field)?;
        if let FieldState::Invalid(message) = &state {
            tracing::debug!(%message, "field failed validation");
        }
        Ok(())
    }

    pub(crate) fn on_input(&self, ctx: &mut Context<'_>, event: &EventState) -> Result<()> {
        match event.current_target {
            Some(field) => FieldState::Valid.apply(ctx.dom, field),
            None => Ok(()),
        }
    }

    pub(crate) fn on_submit(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(button) = ctx.dom.query_selector_from(self.form, SUBMIT_BUTTON_SELECTOR)? else {
            tracing::warn!("contact form has no submit button; loading state skipped");
            return Ok(());
        };

        // A second submit while loading keeps the markup captured by the first.
        let original_html = match self.pending_restore.take() {
            Some(pending) if pending.button == button => {
                ctx.cancel(pending.timer);
                pending.original_html
            }
            _ => ctx.dom.inner_html(button)?,
        };

        ctx.dom.set_inner_html(button, SPINNER_HTML)?;
        ctx.dom.set_disabled(button, true)?;
        let timer = ctx.schedule(
            self.submit_reset_ms,
            Some(button),
            Task::RestoreSubmitButton(button),
        );
        self.pending_restore = Some(PendingRestore {
            button,
            original_html,
            timer,
        });
        Ok(())
    }

    pub(crate) fn restore_submit_button(&mut self, ctx: &mut Context<'_>, button: NodeId) -> Result<()> {
        let Some(pending) = self.pending_restore.take_if(|pending| pending.button == button) else {
            return Ok(());
        };
        ctx.dom.set_inner_html(button, &pending.original_html)?;
        ctx.dom.set_disabled(button, false)
    }
}
