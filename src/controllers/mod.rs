//! Page controllers and the plumbing they share.
//!
//! Each controller is built once from element handles resolved at setup and
//! registers [`Handler`]s in the listener store. The page routes dispatched
//! events and fired timers back here through [`Controllers::handle`] and
//! [`Controllers::run_task`].

use crate::analytics::Analytics;
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{EventState, ListenerStore};
use crate::observer::Viewport;
use crate::page::{ScrollBehavior, ScrollRequest};
use crate::timers::{TimerHandle, TimerQueue};
use crate::trace::TraceLog;
use crate::Result;

mod accessibility;
mod animation;
mod form;
mod lazy_load;
mod mobile_menu;
mod navigation;
mod scroll_effects;
mod styles;
mod tracking;

pub(crate) use accessibility::AccessibilityController;
pub(crate) use animation::AnimationController;
pub(crate) use form::FormController;
pub(crate) use lazy_load::LazyLoadController;
pub(crate) use mobile_menu::MobileMenuController;
pub(crate) use navigation::NavigationController;
pub(crate) use scroll_effects::ScrollEffectsController;
pub(crate) use tracking::TrackingController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrapEdge {
    First,
    Last,
}

/// Listener registered by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    AnchorClick,
    HamburgerToggle,
    OutsideClick,
    CloseMenuOnResize,
    ScrollEffects,
    Parallax,
    ScrollToTop,
    PageLoaded,
    CardLift,
    CardRest,
    ValidateField,
    ClearFieldError,
    SubmitLoading,
    TrackFormSubmit,
    TrackHeroButton,
    TrackServiceCard,
    SkipLinkShow,
    SkipLinkHide,
    FocusTrap(TrapEdge),
}

/// Deferred work queued on the page timer queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Task {
    Reveal(NodeId),
    HeroFade(NodeId),
    TypeNextChar,
    HideCaret,
    RestoreSubmitButton(NodeId),
}

impl Task {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Reveal(_) => "reveal",
            Self::HeroFade(_) => "hero-fade",
            Self::TypeNextChar => "type-next-char",
            Self::HideCaret => "hide-caret",
            Self::RestoreSubmitButton(_) => "restore-submit-button",
        }
    }
}

/// Side effects a handler asks for; the page applies them after dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Effect {
    Focus(NodeId),
    Scroll(ScrollRequest),
}

/// Everything a handler may touch while it runs.
pub(crate) struct Context<'a> {
    pub(crate) dom: &'a mut Dom,
    pub(crate) timers: &'a mut TimerQueue<Task>,
    pub(crate) analytics: &'a mut Analytics,
    pub(crate) effects: &'a mut Vec<Effect>,
    pub(crate) trace: &'a mut TraceLog,
    pub(crate) viewport: Viewport,
    pub(crate) now_ms: i64,
}

impl Context<'_> {
    pub(crate) fn schedule(&mut self, delay_ms: i64, owner: Option<NodeId>, task: Task) -> TimerHandle {
        let label = task.label();
        let handle = self.timers.schedule(self.now_ms, delay_ms, owner, task);
        self.trace.timer(format!(
            "[timer] schedule id={} task={} due_at={}",
            handle.id(),
            label,
            self.now_ms.saturating_add(delay_ms.max(0))
        ));
        handle
    }

    pub(crate) fn cancel(&mut self, handle: TimerHandle) {
        if self.timers.cancel(handle) {
            self.trace
                .timer(format!("[timer] cancel id={}", handle.id()));
        }
    }

    pub(crate) fn request_focus(&mut self, node: NodeId) {
        self.effects.push(Effect::Focus(node));
    }

    pub(crate) fn request_smooth_scroll(&mut self, top: f64) {
        self.effects.push(Effect::Scroll(ScrollRequest {
            top: top.max(0.0),
            behavior: ScrollBehavior::Smooth,
        }));
    }
}

/// All controllers wired onto one page.
#[derive(Debug)]
pub(crate) struct Controllers {
    navigation: NavigationController,
    menu: Option<MobileMenuController>,
    scroll: ScrollEffectsController,
    animation: AnimationController,
    form: Option<FormController>,
    accessibility: AccessibilityController,
    lazy_load: Option<LazyLoadController>,
    tracking: TrackingController,
}

impl Controllers {
    /// Wires every controller whose markup is present, in page script order.
    pub(crate) fn install(
        ctx: &mut Context<'_>,
        config: &PageConfig,
        listeners: &mut ListenerStore<Handler>,
    ) -> Result<Self> {
        styles::inject_error_styles(ctx.dom)?;
        let lazy_load = LazyLoadController::install(ctx.dom, config)?;
        let scroll = ScrollEffectsController::install(ctx.dom, config, listeners);

        let menu = MobileMenuController::resolve(ctx.dom, config);
        let mut animation = AnimationController::install(ctx.dom, config, listeners)?;
        let navigation = NavigationController::install(ctx.dom, config, menu, listeners)?;
        let form = FormController::install(ctx.dom, config, listeners)?;
        if let Some(menu) = &menu {
            menu.register(ctx.dom, listeners);
        }
        animation.install_hover_and_typing(ctx, config, listeners)?;
        let accessibility = AccessibilityController::install(ctx.dom, config, menu, listeners)?;
        let tracking = TrackingController::install(ctx.dom, config, listeners)?;

        tracing::debug!(
            menu = menu.is_some(),
            form = form.is_some(),
            lazy_load = lazy_load.is_some(),
            "page controllers installed"
        );

        Ok(Self {
            navigation,
            menu,
            scroll,
            animation,
            form,
            accessibility,
            lazy_load,
            tracking,
        })
    }

    pub(crate) fn handle(
        &mut self,
        handler: Handler,
        ctx: &mut Context<'_>,
        event: &mut EventState,
    ) -> Result<()> {
        match handler {
            Handler::AnchorClick => self.navigation.on_anchor_click(ctx, event),
            Handler::HamburgerToggle => match &self.menu {
                Some(menu) => menu.toggle(ctx.dom),
                None => Ok(()),
            },
            Handler::OutsideClick => match &self.menu {
                Some(menu) => menu.on_document_click(ctx.dom, event),
                None => Ok(()),
            },
            Handler::CloseMenuOnResize => match &self.menu {
                Some(menu) => menu.on_resize(ctx.dom, &ctx.viewport),
                None => Ok(()),
            },
            Handler::ScrollEffects => self.scroll.on_scroll(ctx, &self.navigation),
            Handler::Parallax => self.scroll.on_parallax(ctx),
            Handler::ScrollToTop => {
                self.scroll.on_scroll_to_top(ctx);
                Ok(())
            }
            Handler::PageLoaded => self.animation.on_load(ctx),
            Handler::CardLift => self.animation.on_card_enter(ctx, event),
            Handler::CardRest => self.animation.on_card_leave(ctx, event),
            Handler::ValidateField => match &self.form {
                Some(form) => form.on_blur(ctx, event),
                None => Ok(()),
            },
            Handler::ClearFieldError => match &self.form {
                Some(form) => form.on_input(ctx, event),
                None => Ok(()),
            },
            Handler::SubmitLoading => match &mut self.form {
                Some(form) => form.on_submit(ctx),
                None => Ok(()),
            },
            Handler::TrackFormSubmit => {
                self.tracking.on_form_submit(ctx);
                Ok(())
            }
            Handler::TrackHeroButton => self.tracking.on_hero_button_click(ctx, event),
            Handler::TrackServiceCard => self.tracking.on_service_card_click(ctx, event),
            Handler::SkipLinkShow => self.accessibility.on_skip_link_focus(ctx),
            Handler::SkipLinkHide => self.accessibility.on_skip_link_blur(ctx),
            Handler::FocusTrap(edge) => {
                self.accessibility.on_nav_link_keydown(ctx, event, edge);
                Ok(())
            }
        }
    }

    pub(crate) fn run_task(&mut self, task: Task, ctx: &mut Context<'_>) -> Result<()> {
        match task {
            Task::Reveal(node) => self.animation.reveal(ctx, node),
            Task::HeroFade(node) => self.animation.fade_in_hero_element(ctx, node),
            Task::TypeNextChar => self.animation.type_next_char(ctx),
            Task::HideCaret => self.animation.hide_caret(ctx),
            Task::RestoreSubmitButton(button) => match &mut self.form {
                Some(form) => form.restore_submit_button(ctx, button),
                None => Ok(()),
            },
        }
    }

    /// Delivers pending intersection entries to the reveal and lazy-load observers.
    pub(crate) fn observe_intersections(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.animation.on_intersections(ctx)?;
        if let Some(lazy_load) = &mut self.lazy_load {
            lazy_load.on_intersections(ctx)?;
        }
        Ok(())
    }

    pub(crate) fn menu(&self) -> Option<&MobileMenuController> {
        self.menu.as_ref()
    }
}
