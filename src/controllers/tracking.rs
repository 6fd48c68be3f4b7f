use super::{Context, Handler};
use crate::config::PageConfig;
use crate::dom::Dom;
use crate::events::{EventState, EventType, ListenerStore};
use crate::Result;

/// Wires the analytics stub onto the form, hero buttons and service cards.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrackingController;

impl TrackingController {
    pub(crate) fn install(
        dom: &Dom,
        config: &PageConfig,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<Self> {
        if let Some(form) = dom.query_selector(&config.contact_form_selector)? {
            listeners.add(form, EventType::Submit, Handler::TrackFormSubmit);
        }
        for button in dom.query_selector_all(&config.hero_button_selector)? {
            listeners.add(button, EventType::Click, Handler::TrackHeroButton);
        }
        for card in dom.query_selector_all(&config.service_card_selector)? {
            listeners.add(card, EventType::Click, Handler::TrackServiceCard);
        }
        Ok(Self)
    }

    pub(crate) fn on_form_submit(&self, ctx: &mut Context<'_>) {
        ctx.analytics
            .track_event("Contact", "Form Submission", "Contact Form");
    }

    pub(crate) fn on_hero_button_click(&self, ctx: &mut Context<'_>, event: &EventState) -> Result<()> {
        if let Some(button) = event.current_target {
            let label = ctx.dom.text_content(button);
            ctx.analytics.track_event("Hero", "Button Click", label.trim());
        }
        Ok(())
    }

    pub(crate) fn on_service_card_click(&self, ctx: &mut Context<'_>, event: &EventState) -> Result<()> {
        let Some(card) = event.current_target else {
            return Ok(());
        };
        match ctx.dom.query_selector_from(card, "h3")? {
            Some(heading) => {
                let label = ctx.dom.text_content(heading);
                ctx.analytics.track_event("Services", "Card Click", &label);
            }
            None => tracing::warn!("service card without a heading; click not tracked"),
        }
        Ok(())
    }
}
