use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use crate::config;
use crate::motion::prefers_reduced_motion;

const REVEAL_SELECTOR: &str = ".reveal";
const VISIBLE_CLASS: &str = "is-visible";
const ID_ATTR: &str = "data-reveal-id";

// Browsers may report a ratio a hair under the threshold that fired the callback.
const RATIO_TOLERANCE: f64 = 1e-3;

/// Remembers which elements have been revealed. Reveals are permanent.
pub struct RevealTracker {
    threshold: f64,
    revealed: HashSet<usize>,
}

impl RevealTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            revealed: HashSet::new(),
        }
    }

    /// Returns true only for the first sighting of `id` at or above the threshold.
    pub fn mark(&mut self, id: usize, ratio: f64) -> bool {
        if ratio + RATIO_TOLERANCE < self.threshold {
            return false;
        }
        self.revealed.insert(id)
    }

    pub fn is_revealed(&self, id: usize) -> bool {
        self.revealed.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPlan {
    /// No targets on the page.
    Skip,
    /// Mark every target visible immediately, without observing.
    RevealAll,
    Observe,
}

impl RevealPlan {
    pub fn choose(target_count: usize, reduced_motion: bool) -> Self {
        match (target_count, reduced_motion) {
            (0, _) => RevealPlan::Skip,
            (_, true) => RevealPlan::RevealAll,
            (_, false) => RevealPlan::Observe,
        }
    }
}

fn reveal_elements() -> Vec<Element> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let Ok(nodes) = document.query_selector_all(REVEAL_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Starts watching `.reveal` elements. Returns the teardown, if anything was set up.
fn observe_reveals() -> Option<Box<dyn FnOnce()>> {
    let elements = reveal_elements();
    match RevealPlan::choose(elements.len(), prefers_reduced_motion()) {
        RevealPlan::Skip => {
            debug!("No reveal targets on page");
            return None;
        }
        RevealPlan::RevealAll => {
            for element in &elements {
                let _ = element.class_list().add_1(VISIBLE_CLASS);
            }
            return None;
        }
        RevealPlan::Observe => {}
    }

    for (id, element) in elements.iter().enumerate() {
        let _ = element.set_attribute(ID_ATTR, &id.to_string());
    }

    let tracker = Rc::new(RefCell::new(RevealTracker::new(config::REVEAL_THRESHOLD)));
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                let Some(id) = target.get_attribute(ID_ATTR).and_then(|v| v.parse().ok()) else {
                    continue;
                };
                if tracker.borrow_mut().mark(id, entry.intersection_ratio()) {
                    let _ = target.class_list().add_1(VISIBLE_CLASS);
                    observer.unobserve(&target);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(config::REVEAL_THRESHOLD));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok()?;
    for element in &elements {
        observer.observe(element);
    }

    Some(Box::new(move || {
        observer.disconnect();
        drop(callback);
    }))
}

/// Fades `.reveal` elements in the first time they scroll into view.
#[hook]
pub fn use_reveal() {
    use_effect_with_deps(
        |_| {
            let teardown = observe_reveals();
            move || {
                if let Some(teardown) = teardown {
                    teardown();
                }
            }
        },
        (),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_once_threshold_is_reached() {
        let mut tracker = RevealTracker::new(0.12);
        assert!(!tracker.mark(0, 0.05));
        assert!(!tracker.is_revealed(0));
        assert!(tracker.mark(0, 0.12));
        assert!(tracker.is_revealed(0));
    }

    #[test]
    fn later_intersections_change_nothing() {
        let mut tracker = RevealTracker::new(0.12);
        assert!(tracker.mark(3, 0.5));
        for ratio in [0.0, 0.2, 1.0] {
            assert!(!tracker.mark(3, ratio));
            assert!(tracker.is_revealed(3));
        }
    }

    #[test]
    fn elements_are_tracked_independently() {
        let mut tracker = RevealTracker::new(0.12);
        assert!(tracker.mark(0, 1.0));
        assert!(!tracker.is_revealed(1));
        assert!(tracker.mark(1, 0.3));
    }

    #[test]
    fn reduced_motion_reveals_everything_up_front() {
        assert_eq!(RevealPlan::choose(5, true), RevealPlan::RevealAll);
        assert_eq!(RevealPlan::choose(5, false), RevealPlan::Observe);
    }

    #[test]
    fn nothing_to_do_without_targets() {
        assert_eq!(RevealPlan::choose(0, true), RevealPlan::Skip);
        assert_eq!(RevealPlan::choose(0, false), RevealPlan::Skip);
    }

    #[test]
    fn tolerates_rounding_just_below_threshold() {
        let mut tracker = RevealTracker::new(0.12);
        assert!(tracker.mark(0, 0.1195));
        assert!(!tracker.mark(1, 0.11));
    }
}
