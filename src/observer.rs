use crate::dom::{Dom, LayoutBox, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) scroll_y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Viewport {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ObserverOptions {
    pub(crate) threshold: f64,
    /// Added to the bottom edge of the root; negative values shrink it.
    pub(crate) root_margin_bottom: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin_bottom: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IntersectionEntry {
    pub(crate) target: NodeId,
    pub(crate) is_intersecting: bool,
    pub(crate) ratio: f64,
}

#[derive(Debug, Clone)]
struct Observation {
    target: NodeId,
    last_intersecting: Option<bool>,
}

/// Viewport intersection tracking for a set of targets.
///
/// An entry is reported the first time a target is measured and whenever
/// its intersecting state flips afterwards.
#[derive(Debug, Clone)]
pub(crate) struct IntersectionObserver {
    options: ObserverOptions,
    observations: Vec<Observation>,
}

impl IntersectionObserver {
    pub(crate) fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            observations: Vec::new(),
        }
    }

    pub(crate) fn observe(&mut self, target: NodeId) {
        if self.observations.iter().any(|o| o.target == target) {
            return;
        }
        self.observations.push(Observation {
            target,
            last_intersecting: None,
        });
    }

    pub(crate) fn unobserve(&mut self, target: NodeId) {
        self.observations.retain(|o| o.target != target);
    }

    #[cfg(test)]
    fn is_observing(&self, target: NodeId) -> bool {
        self.observations.iter().any(|o| o.target == target)
    }

    pub(crate) fn observed_count(&self) -> usize {
        self.observations.len()
    }

    pub(crate) fn take_records(&mut self, dom: &Dom, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let root_top = viewport.scroll_y;
        let root_bottom = viewport.scroll_y + viewport.height + self.options.root_margin_bottom;
        let threshold = self.options.threshold;

        let mut entries = Vec::new();
        for observation in &mut self.observations {
            // Disconnected targets are not rendered and produce no records.
            if !dom.is_connected(observation.target) {
                continue;
            }
            let layout = dom.layout(observation.target);
            let ratio = visible_ratio(&layout, root_top, root_bottom);
            let is_intersecting = if threshold <= 0.0 {
                ratio > 0.0
            } else {
                ratio >= threshold
            };
            if observation.last_intersecting != Some(is_intersecting) {
                observation.last_intersecting = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: observation.target,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

fn visible_ratio(layout: &LayoutBox, root_top: f64, root_bottom: f64) -> f64 {
    if root_bottom <= root_top {
        return 0.0;
    }
    if layout.height <= 0.0 {
        let inside = layout.top >= root_top && layout.top <= root_bottom;
        return if inside { 1.0 } else { 0.0 };
    }
    let overlap = layout.bottom().min(root_bottom) - layout.top.max(root_top);
    (overlap.max(0.0) / layout.height).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::html::parse_html;

    fn page_with_box(top: f64, height: f64) -> Result<(Dom, NodeId)> {
        let mut dom = parse_html("<div id='target'></div>")?;
        let target = dom.by_id("target").expect("target");
        dom.set_layout(target, LayoutBox { top, height })?;
        Ok((dom, target))
    }

    fn reveal_options() -> ObserverOptions {
        ObserverOptions {
            threshold: 0.1,
            root_margin_bottom: -50.0,
        }
    }

    #[test]
    fn first_measurement_always_reports() -> Result<()> {
        let (dom, target) = page_with_box(2000.0, 100.0)?;
        let mut observer = IntersectionObserver::new(reveal_options());
        observer.observe(target);
        let viewport = Viewport::new(1280.0, 800.0);
        let entries = observer.take_records(&dom, &viewport);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);
        assert!(observer.take_records(&dom, &viewport).is_empty());
        Ok(())
    }

    #[test]
    fn bottom_margin_and_threshold_delay_intersection() -> Result<()> {
        // Root spans [0, 750) once the -50px margin is applied.
        let (dom, target) = page_with_box(745.0, 100.0)?;
        let mut observer = IntersectionObserver::new(reveal_options());
        observer.observe(target);
        let mut viewport = Viewport::new(1280.0, 800.0);
        assert!(!observer.take_records(&dom, &viewport)[0].is_intersecting);

        viewport.scroll_y = 6.0;
        let entries = observer.take_records(&dom, &viewport);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
        assert!((entries[0].ratio - 0.11).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn zero_threshold_needs_any_overlap() -> Result<()> {
        let (dom, target) = page_with_box(800.0, 10.0)?;
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(target);
        let mut viewport = Viewport::new(1280.0, 800.0);
        assert!(!observer.take_records(&dom, &viewport)[0].is_intersecting);
        viewport.scroll_y = 5.0;
        assert!(observer.take_records(&dom, &viewport)[0].is_intersecting);
        Ok(())
    }

    #[test]
    fn unobserved_and_detached_targets_are_skipped() -> Result<()> {
        let (mut dom, target) = page_with_box(0.0, 10.0)?;
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(target);
        observer.observe(target);
        assert_eq!(observer.observed_count(), 1);

        dom.remove_node(target)?;
        let viewport = Viewport::new(1280.0, 800.0);
        assert!(observer.take_records(&dom, &viewport).is_empty());

        observer.unobserve(target);
        assert!(!observer.is_observing(target));
        Ok(())
    }
}
