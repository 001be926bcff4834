use std::rc::Rc;

use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::config;
use crate::motion::prefers_reduced_motion;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Testimonial {
    pub text: &'static str,
    pub author: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        text: "I finally finished a project instead of just starting ten of them.",
        author: "Mira, 16",
    },
    Testimonial {
        text: "The weekly challenges are the only notification I actually look forward to.",
        author: "Jonas, 14",
    },
    Testimonial {
        text: "Found two friends here who code at the same weird hours as me.",
        author: "Aiko, 18",
    },
    Testimonial {
        text: "Short, fun and nobody judges your first attempt.",
        author: "Leo, 13",
    },
];

/// Cyclic cursor over a fixed testimonial list.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotator {
    items: &'static [Testimonial],
    index: usize,
}

pub enum RotatorAction {
    Advance,
}

impl Rotator {
    pub fn new(items: &'static [Testimonial]) -> Self {
        Self { items, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&'static Testimonial> {
        self.items.get(self.index)
    }

    pub fn advance(&mut self) {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
    }
}

impl Reducible for Rotator {
    type Action = RotatorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            RotatorAction::Advance => {
                let mut next = (*self).clone();
                next.advance();
                next.into()
            }
        }
    }
}

/// Interval for the rotation timer; 0 keeps it stopped. Hovering and focus
/// pause independently, so leaving with the mouse keeps a focused quote still.
pub fn interval_ms(reduced_motion: bool, hovered: bool, focused: bool) -> u32 {
    if reduced_motion || hovered || focused {
        0
    } else {
        config::ROTATE_INTERVAL_MS
    }
}

#[function_component(Testimonials)]
pub fn testimonials() -> Html {
    let rotator = use_reducer(|| Rotator::new(TESTIMONIALS));
    let hovered = use_state(|| false);
    let focused = use_state(|| false);
    let reduced_motion = use_memo(|_| prefers_reduced_motion(), ());

    {
        let rotator = rotator.clone();
        use_interval(
            move || rotator.dispatch(RotatorAction::Advance),
            interval_ms(*reduced_motion, *hovered, *focused),
        );
    }

    let on_hover = |value: bool| {
        let hovered = hovered.clone();
        Callback::from(move |_: MouseEvent| hovered.set(value))
    };
    let on_focus = |value: bool| {
        let focused = focused.clone();
        Callback::from(move |_: FocusEvent| focused.set(value))
    };

    let Some(current) = rotator.current() else {
        return html! {};
    };

    html! {
        <figure
            class="testimonial"
            tabindex="0"
            aria-live="polite"
            onmouseenter={on_hover(true)}
            onmouseleave={on_hover(false)}
            onfocusin={on_focus(true)}
            onfocusout={on_focus(false)}
        >
            <blockquote class="testimonial-text">{current.text}</blockquote>
            <figcaption class="testimonial-author">{format!("— {}", current.author)}</figcaption>
        </figure>
    }
}
