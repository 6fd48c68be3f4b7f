use super::Context;
use crate::config::PageConfig;
use crate::dom::Dom;
use crate::observer::{IntersectionObserver, ObserverOptions};
use crate::ui_state::LAZY_CLASS;
use crate::Result;

/// Swaps `data-src` into `src` once an image scrolls into view.
#[derive(Debug, Clone)]
pub(crate) struct LazyLoadController {
    observer: IntersectionObserver,
}

impl LazyLoadController {
    /// `None` when the page has no deferred images at setup.
    pub(crate) fn install(dom: &Dom, config: &PageConfig) -> Result<Option<Self>> {
        let images = dom.query_selector_all(&config.lazy_image_selector)?;
        if images.is_empty() {
            return Ok(None);
        }
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        for image in &images {
            observer.observe(*image);
        }
        tracing::debug!(images = images.len(), "lazy-load observer installed");
        Ok(Some(Self { observer }))
    }

    pub(crate) fn on_intersections(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        for entry in self.observer.take_records(ctx.dom, &ctx.viewport) {
            if !entry.is_intersecting {
                continue;
            }
            let image = entry.target;
            if let Some(src) = ctx.dom.dataset_get(image, "src") {
                ctx.dom.set_attr(image, "src", &src)?;
            }
            ctx.dom.class_remove(image, LAZY_CLASS)?;
            self.observer.unobserve(image);
            ctx.trace.event("[event] intersect lazy-image loaded".into());
        }
        Ok(())
    }
}
