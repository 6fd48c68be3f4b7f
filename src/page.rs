use crate::analytics::{Analytics, AnalyticsSink, TrackedEvent};
use crate::config::PageConfig;
use crate::controllers::{Context, Controllers, Effect, Handler, Task};
use crate::dom::{Dom, LayoutBox, NodeId, truncate_chars};
use crate::events::{EventState, EventType, KeyInput, ListenerStore};
use crate::html::parse_html;
use crate::observer::Viewport;
use crate::timers::{ScheduledTask, TimerQueue};
use crate::trace::TraceLog;
use crate::ui_state::{FieldState, MenuState, RevealState};
use crate::{Error, Result};

const DEFAULT_TIMER_STEP_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A window scroll performed on behalf of a handler or a default action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub task: &'static str,
}

/// A marketing page with every interaction controller wired onto it.
///
/// The page never acts on its own: user input, scrolling and the passage of
/// time are all driven through its methods.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    config: PageConfig,
    viewport: Viewport,
    now_ms: i64,
    timers: TimerQueue<Task>,
    timer_step_limit: usize,
    listeners: ListenerStore<Handler>,
    controllers: Controllers,
    analytics: Analytics,
    effects: Vec<Effect>,
    focused: Option<NodeId>,
    scroll_requests: Vec<ScrollRequest>,
    loaded: bool,
    trace: TraceLog,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::with_config(html, PageConfig::default())
    }

    pub fn with_config(html: &str, config: PageConfig) -> Result<Self> {
        config.validate()?;
        let mut dom = parse_html(html)?;
        let viewport = Viewport::new(config.viewport_width, config.viewport_height);
        let mut timers = TimerQueue::new();
        let mut listeners = ListenerStore::default();
        let mut analytics = Analytics::default();
        let mut effects = Vec::new();
        let mut trace = TraceLog::default();

        let controllers = {
            let mut ctx = Context {
                dom: &mut dom,
                timers: &mut timers,
                analytics: &mut analytics,
                effects: &mut effects,
                trace: &mut trace,
                viewport,
                now_ms: 0,
            };
            Controllers::install(&mut ctx, &config, &mut listeners)?
        };

        Ok(Self {
            dom,
            config,
            viewport,
            now_ms: 0,
            timers,
            timer_step_limit: DEFAULT_TIMER_STEP_LIMIT,
            listeners,
            controllers,
            analytics,
            effects,
            focused: None,
            scroll_requests: Vec::new(),
            loaded: false,
            trace,
        })
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn set_analytics_sink(&mut self, sink: impl AnalyticsSink + 'static) {
        self.analytics.set_sink(Box::new(sink));
    }

    /// Places the first element matching `selector` in document coordinates.
    ///
    /// Observers measure layout lazily, at the next action or timer step.
    pub fn set_layout(&mut self, selector: &str, top: f64, height: f64) -> Result<()> {
        if !top.is_finite() || !height.is_finite() || height < 0.0 {
            return Err(Error::Runtime(format!(
                "set_layout requires finite top and non-negative height (top={top}, height={height})"
            )));
        }
        let target = self.select_one(selector)?;
        self.dom.set_layout(target, LayoutBox { top, height })
    }

    // ---- user actions ----

    /// Fires the window `load` event. Later calls are ignored.
    pub fn load(&mut self) -> Result<()> {
        if self.loaded {
            tracing::warn!("load already fired; ignoring");
            return Ok(());
        }
        self.loaded = true;
        self.dispatch(EventState::new(EventType::Load, None))?;
        self.settle()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            let target_desc = self.describe_node(target);
            self.trace
                .event(format!("[event] click ignored target={target_desc} disabled"));
            return Ok(());
        }

        let outcome = self.dispatch(EventState::new(EventType::Click, Some(target)))?;
        if !outcome.default_prevented {
            self.run_click_default_action(target)?;
        }
        self.settle()
    }

    /// Scrolls the window to `y` (clamped at 0) and fires `scroll`.
    pub fn scroll_to(&mut self, y: f64) -> Result<()> {
        if !y.is_finite() {
            return Err(Error::Runtime(format!("scroll_to requires a finite offset, got {y}")));
        }
        self.set_scroll_position(y)?;
        self.settle()
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::Runtime(format!(
                "resize requires a positive viewport (width={width}, height={height})"
            )));
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.dispatch(EventState::new(EventType::Resize, None))?;
        self.settle()
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)?;
        self.settle()
    }

    /// Moves focus away from the element, firing `blur` on it.
    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target)?;
        self.settle()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        self.dom.set_value(target, text)?;
        self.dispatch(EventState::new(EventType::Input, Some(target)))?;
        self.settle()
    }

    /// Submits the form matched by `selector`, or the form owning a matched control.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = self
            .closest_tag(target, "form")
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.dom.tag_name(target).unwrap_or_default().to_string(),
            })?;
        self.dispatch(EventState::new(EventType::Submit, Some(form)))?;
        self.settle()
    }

    pub fn press_key(&mut self, selector: &str, key: &str, shift: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let event = EventState::new(EventType::KeyDown, Some(target)).with_key(KeyInput {
            key: key.to_string(),
            shift,
        });
        let outcome = self.dispatch(event)?;
        if outcome.default_prevented {
            self.trace
                .event(format!("[event] keydown key={key} default prevented"));
        }
        self.settle()
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch(EventState::new(EventType::MouseEnter, Some(target)))?;
        self.settle()
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch(EventState::new(EventType::MouseLeave, Some(target)))?;
        self.settle()
    }

    /// Detaches the element and cancels every timer it owns.
    pub fn remove(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.remove_node(target)?;

        let dom = &self.dom;
        let cancelled = self.timers.cancel_orphaned(|owner| dom.is_connected(owner));
        if self.focused.is_some_and(|node| !self.dom.is_connected(node)) {
            self.focused = None;
        }
        self.trace.timer(format!(
            "[timer] remove target={selector} cancelled={cancelled}"
        ));
        self.settle()
    }

    // ---- virtual clock ----

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.now_ms;
        let target = self.now_ms.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(target))?;
        self.now_ms = target;
        self.trace.timer(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={target} ran_due={ran}"
        ));
        self.settle()
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.now_ms
            )));
        }
        self.advance_time(target_ms - self.now_ms)
    }

    /// Runs every pending timer, moving the clock forward as needed.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.now_ms;
        let ran = self.run_timer_queue(None)?;
        self.trace.timer(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.now_ms
        ));
        self.settle()
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.timers.pop_next(None) else {
            self.trace.timer("[timer] run_next none".into());
            return Ok(false);
        };
        self.now_ms = self.now_ms.max(task.due_at);
        self.execute_timer_task(task)?;
        Ok(true)
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_timer_queue(Some(self.now_ms))?;
        self.trace
            .timer(format!("[timer] run_due now_ms={} ran={ran}", self.now_ms));
        self.settle()?;
        Ok(ran)
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .timers
            .tasks()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                task: task.payload.label(),
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.timers.clear();
        self.trace
            .timer(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.timer_step_limit = max_steps;
        Ok(())
    }

    // ---- trace buffer ----

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.set_enabled(enabled);
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.take()
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_limit(max_entries)
    }

    // ---- observable state ----

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.viewport.width, self.viewport.height)
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.scroll_requests)
    }

    pub fn tracked_events(&self) -> &[TrackedEvent] {
        self.analytics.history()
    }

    /// Drains the tracked-event history. Long sessions should call this periodically.
    pub fn take_tracked_events(&mut self) -> Vec<TrackedEvent> {
        self.analytics.take_history()
    }

    pub fn is_focused(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.focused == Some(target))
    }

    /// `None` when the page has no mobile menu markup.
    pub fn menu_state(&self) -> Option<MenuState> {
        self.controllers.menu().map(|menu| menu.state(&self.dom))
    }

    pub fn field_state(&self, selector: &str) -> Result<FieldState> {
        let target = self.select_one(selector)?;
        FieldState::read(&self.dom, target)
    }

    pub fn reveal_state(&self, selector: &str) -> Result<RevealState> {
        let target = self.select_one(selector)?;
        Ok(RevealState::read(&self.dom, target))
    }

    // ---- assertions ----

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check(selector, target, expected.to_string(), actual)
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!(
                    "class attribute {:?}",
                    self.dom.attr(target, "class").unwrap_or_default()
                ),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    /// `expected = None` asserts the attribute is absent.
    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{name}={expected:?}"),
                actual: format!("{name}={actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    /// Compares one inline style property; an unset property reads as `""`.
    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, property);
        self.check(selector, target, expected.to_string(), actual)
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn check(&self, selector: &str, target: NodeId, expected: String, actual: String) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected,
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn describe_node(&self, node_id: NodeId) -> String {
        let Some(tag) = self.dom.tag_name(node_id) else {
            return "document".into();
        };
        match self.dom.attr(node_id, "id") {
            Some(id) if !id.is_empty() => format!("{tag}#{id}"),
            _ => tag.to_string(),
        }
    }

    // ---- dispatch plumbing ----

    fn split(&mut self) -> (&mut Controllers, Context<'_>) {
        (
            &mut self.controllers,
            Context {
                dom: &mut self.dom,
                timers: &mut self.timers,
                analytics: &mut self.analytics,
                effects: &mut self.effects,
                trace: &mut self.trace,
                viewport: self.viewport,
                now_ms: self.now_ms,
            },
        )
    }

    fn propagation_path(&self, event: &EventState) -> Vec<NodeId> {
        let Some(target) = event.target else {
            return Vec::new();
        };
        if !event.event_type.bubbles() {
            return vec![target];
        }
        let mut path = vec![target];
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path
    }

    fn dispatch(&mut self, mut event: EventState) -> Result<EventState> {
        let target_desc = event
            .target
            .map_or_else(|| "window".to_string(), |node| self.describe_node(node));
        self.trace
            .event(format!("[event] {} target={target_desc}", event.event_type));

        match event.target {
            Some(_) => {
                for node in self.propagation_path(&event) {
                    event.current_target = Some(node);
                    for handler in self.listeners.get(node, event.event_type) {
                        self.run_handler(handler, &mut event)?;
                    }
                }
            }
            None => {
                event.current_target = None;
                for handler in self.listeners.get_window(event.event_type) {
                    self.run_handler(handler, &mut event)?;
                }
            }
        }

        self.trace.event(format!(
            "[event] done {} default_prevented={}",
            event.event_type, event.default_prevented
        ));
        Ok(event)
    }

    fn run_handler(&mut self, handler: Handler, event: &mut EventState) -> Result<()> {
        self.trace
            .event(format!("[event] {} handler={handler:?}", event.event_type));
        let (controllers, mut ctx) = self.split();
        controllers.handle(handler, &mut ctx, event)
    }

    /// Applies focus moves and scrolls queued by handlers, then delivers intersections.
    fn settle(&mut self) -> Result<()> {
        while !self.effects.is_empty() {
            for effect in std::mem::take(&mut self.effects) {
                match effect {
                    Effect::Focus(node) => self.focus_node(node)?,
                    Effect::Scroll(request) => {
                        self.scroll_requests.push(request);
                        self.set_scroll_position(request.top)?;
                    }
                }
            }
        }
        let (controllers, mut ctx) = self.split();
        controllers.observe_intersections(&mut ctx)
    }

    fn set_scroll_position(&mut self, y: f64) -> Result<()> {
        self.viewport.scroll_y = y.max(0.0);
        self.dispatch(EventState::new(EventType::Scroll, None))?;
        Ok(())
    }

    fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.focused == Some(node) {
            return Ok(());
        }
        if let Some(previous) = self.focused.take() {
            self.dispatch(EventState::new(EventType::Blur, Some(previous)))?;
        }
        self.focused = Some(node);
        self.dispatch(EventState::new(EventType::Focus, Some(node)))?;
        Ok(())
    }

    fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.focused == Some(node) {
            self.focused = None;
        }
        self.dispatch(EventState::new(EventType::Blur, Some(node)))?;
        Ok(())
    }

    fn closest_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self
                .dom
                .tag_name(current)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            {
                return Some(current);
            }
            cursor = self.dom.parent(current);
        }
        None
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let kind = self
            .dom
            .attr(node, "type")
            .map(|kind| kind.to_ascii_lowercase());
        match self.dom.tag_name(node).map(str::to_ascii_lowercase).as_deref() {
            Some("button") => kind.as_deref().is_none_or(|kind| kind == "submit"),
            Some("input") => kind.as_deref() == Some("submit"),
            _ => false,
        }
    }

    fn run_click_default_action(&mut self, target: NodeId) -> Result<()> {
        if let Some(anchor) = self.closest_tag(target, "a") {
            let href = self.dom.attr(anchor, "href").unwrap_or_default();
            let section = href
                .strip_prefix('#')
                .filter(|id| !id.is_empty())
                .and_then(|id| self.dom.by_id(id));
            if let Some(section) = section {
                self.effects.push(Effect::Scroll(ScrollRequest {
                    top: self.dom.offset_top(section).max(0.0),
                    behavior: ScrollBehavior::Instant,
                }));
            }
            return Ok(());
        }

        let control = self
            .closest_tag(target, "button")
            .or_else(|| self.is_submit_control(target).then_some(target));
        if let Some(control) = control.filter(|control| self.is_submit_control(*control)) {
            if let Some(form) = self.closest_tag(control, "form") {
                self.dispatch(EventState::new(EventType::Submit, Some(form)))?;
            }
        }
        Ok(())
    }

    // ---- timers ----

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while self.timers.peek_next(due_limit).is_some() {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit));
            }
            let Some(task) = self.timers.pop_next(due_limit) else {
                break;
            };
            self.now_ms = self.now_ms.max(task.due_at);
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask<Task>) -> Result<()> {
        let label = task.payload.label();
        if let Some(owner) = task.owner {
            if !self.dom.is_connected(owner) {
                self.trace.timer(format!(
                    "[timer] skip id={} task={label} owner disconnected",
                    task.id
                ));
                return Ok(());
            }
        }
        self.trace.timer(format!(
            "[timer] run id={} task={label} now_ms={}",
            task.id, self.now_ms
        ));
        let (controllers, mut ctx) = self.split();
        controllers.run_task(task.payload, &mut ctx)?;
        self.settle()
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit.map_or_else(|| "none".into(), |value| value.to_string());
        let next_task_desc = self
            .timers
            .peek_next(due_limit)
            .map_or_else(
                || "none".into(),
                |task| format!("id={},due_at={},task={}", task.id, task.due_at, task.payload.label()),
            );
        Error::Runtime(format!(
            "timer queue exceeded max task steps (limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, next_task={next_task_desc})",
            self.timer_step_limit, self.now_ms
        ))
    }
}
