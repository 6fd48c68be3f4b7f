use unicode_normalization::UnicodeNormalization;

use super::{Context, Handler, Task};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{EventState, EventType, ListenerStore};
use crate::observer::{IntersectionObserver, ObserverOptions};
use crate::ui_state::{LOADED_CLASS, RevealState};
use crate::Result;

const CARD_LIFT_TRANSFORM: &str = "translateY(-10px) scale(1.02)";
const CARET_STYLE: &str = "2px solid var(--primary-color)";

/// Character-by-character reveal of the hero slogan.
#[derive(Debug, Clone)]
struct Typewriter {
    slogan: NodeId,
    chars: Vec<char>,
    typed: usize,
    char_interval_ms: i64,
    caret_hide_delay_ms: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct AnimationController {
    reveal: IntersectionObserver,
    hero_fade_selector: String,
    hero_stagger_ms: i64,
    typewriter: Option<Typewriter>,
}

impl AnimationController {
    pub(crate) fn install(
        dom: &Dom,
        config: &PageConfig,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<Self> {
        let mut reveal = IntersectionObserver::new(ObserverOptions {
            threshold: config.reveal_threshold,
            root_margin_bottom: config.reveal_root_margin_bottom,
        });
        for node in dom.query_selector_all(&config.reveal_selector)? {
            reveal.observe(node);
        }
        listeners.add_window(EventType::Load, Handler::PageLoaded);
        tracing::debug!(observed = reveal.observed_count(), "reveal observer installed");

        Ok(Self {
            reveal,
            hero_fade_selector: config.hero_fade_selector.clone(),
            hero_stagger_ms: config.hero_stagger_ms,
            typewriter: None,
        })
    }

    /// Card hover lift and the slogan typing effect.
    pub(crate) fn install_hover_and_typing(
        &mut self,
        ctx: &mut Context<'_>,
        config: &PageConfig,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<()> {
        for card in ctx.dom.query_selector_all(&config.service_card_selector)? {
            listeners.add(card, EventType::MouseEnter, Handler::CardLift);
            listeners.add(card, EventType::MouseLeave, Handler::CardRest);
        }

        let Some(slogan) = ctx.dom.query_selector(&config.hero_slogan_selector)? else {
            return Ok(());
        };
        let chars = ctx.dom.text_content(slogan).nfc().collect::<Vec<_>>();
        ctx.dom.set_text_content(slogan, "")?;
        ctx.dom.style_set(slogan, "border-right", CARET_STYLE)?;
        ctx.schedule(config.typing_start_delay_ms, Some(slogan), Task::TypeNextChar);
        tracing::debug!(chars = chars.len(), "typing effect armed");

        self.typewriter = Some(Typewriter {
            slogan,
            chars,
            typed: 0,
            char_interval_ms: config.typing_char_interval_ms,
            caret_hide_delay_ms: config.caret_hide_delay_ms,
        });
        Ok(())
    }

    pub(crate) fn on_intersections(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        for entry in self.reveal.take_records(ctx.dom, &ctx.viewport) {
            if !entry.is_intersecting {
                continue;
            }
            let delay = reveal_delay_ms(ctx.dom, entry.target);
            ctx.schedule(delay, Some(entry.target), Task::Reveal(entry.target));
            self.reveal.unobserve(entry.target);
            ctx.trace.event(format!(
                "[event] intersect reveal ratio={:.2} delay_ms={delay}",
                entry.ratio
            ));
        }
        Ok(())
    }

    pub(crate) fn reveal(&self, ctx: &mut Context<'_>, node: NodeId) -> Result<()> {
        RevealState::Done.apply(ctx.dom, node)
    }

    pub(crate) fn on_load(&self, ctx: &mut Context<'_>) -> Result<()> {
        match ctx.dom.query_selector("body")? {
            Some(body) => ctx.dom.class_add(body, LOADED_CLASS)?,
            None => tracing::warn!("no body element to mark as loaded"),
        }
        let hero_elements = ctx.dom.query_selector_all(&self.hero_fade_selector)?;
        let mut delay = 0_i64;
        for element in hero_elements {
            ctx.schedule(delay, Some(element), Task::HeroFade(element));
            delay = delay.saturating_add(self.hero_stagger_ms);
        }
        Ok(())
    }

    pub(crate) fn fade_in_hero_element(&self, ctx: &mut Context<'_>, node: NodeId) -> Result<()> {
        ctx.dom.style_set(node, "opacity", "1")?;
        ctx.dom.style_set(node, "transform", "translateY(0)")
    }

    pub(crate) fn type_next_char(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(typewriter) = self.typewriter.as_mut() else {
            return Ok(());
        };
        if !ctx.dom.is_connected(typewriter.slogan) {
            return Ok(());
        }
        match typewriter.chars.get(typewriter.typed) {
            Some(ch) => {
                let mut text = ctx.dom.text_content(typewriter.slogan);
                text.push(*ch);
                ctx.dom.set_text_content(typewriter.slogan, &text)?;
                typewriter.typed += 1;
                ctx.schedule(
                    typewriter.char_interval_ms,
                    Some(typewriter.slogan),
                    Task::TypeNextChar,
                );
            }
            None => {
                ctx.schedule(
                    typewriter.caret_hide_delay_ms,
                    Some(typewriter.slogan),
                    Task::HideCaret,
                );
            }
        }
        Ok(())
    }

    pub(crate) fn hide_caret(&self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(typewriter) = &self.typewriter else {
            return Ok(());
        };
        if !ctx.dom.is_connected(typewriter.slogan) {
            return Ok(());
        }
        ctx.dom.style_set(typewriter.slogan, "border-right", "none")
    }

    pub(crate) fn on_card_enter(&self, ctx: &mut Context<'_>, event: &EventState) -> Result<()> {
        match event.current_target {
            Some(card) => ctx.dom.style_set(card, "transform", CARD_LIFT_TRANSFORM),
            None => Ok(()),
        }
    }

    pub(crate) fn on_card_leave(&self, ctx: &mut Context<'_>, event: &EventState) -> Result<()> {
        match event.current_target {
            Some(card) => ctx.dom.style_set(card, "transform", ""),
            None => Ok(()),
        }
    }
}

/// `data-delay` in milliseconds; missing or unparsable values mean no delay.
fn reveal_delay_ms(dom: &Dom, node: NodeId) -> i64 {
    dom.dataset_get(node, "delay")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|delay| delay.is_finite() && *delay > 0.0)
        .map_or(0, |delay| delay as i64)
}
