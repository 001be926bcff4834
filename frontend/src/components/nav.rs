use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, KeyboardEvent, Node, ScrollBehavior, ScrollIntoViewOptions};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::clock::BrowserClock;
use crate::config;
use crate::motion::prefers_reduced_motion;
use crate::throttle::Throttle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavSection {
    pub id: &'static str,
    pub label: &'static str,
}

pub const SECTIONS: &[NavSection] = &[
    NavSection { id: "features", label: "What you get" },
    NavSection { id: "testimonials", label: "Voices" },
    NavSection { id: "faq", label: "FAQ" },
    NavSection { id: "join", label: "Join" },
];

/// Index of the last section whose top is at or above the reading line
/// (`NAV_OFFSET_RATIO` of the viewport below the scroll position).
pub fn active_section(offsets: &[f64], scroll_y: f64, viewport_height: f64) -> Option<usize> {
    let line = scroll_y + viewport_height * config::NAV_OFFSET_RATIO;
    offsets.iter().rposition(|&top| top <= line)
}

/// Inputs the section highlighter is set up from. It is torn down and
/// rebuilt whenever these change, so a route change re-reads the sections.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightDeps {
    pub enabled: bool,
    pub path: String,
}

impl HighlightDeps {
    pub fn new(reduced_motion: bool, path: Option<&str>) -> Self {
        Self {
            enabled: highlighter_enabled(reduced_motion),
            path: path.unwrap_or_default().to_string(),
        }
    }
}

/// The highlighter is off entirely under reduced motion.
pub fn highlighter_enabled(reduced_motion: bool) -> bool {
    !reduced_motion
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuState {
    pub open: bool,
    /// Set when the menu was closed from the keyboard.
    pub refocus_toggle: bool,
}

pub enum MenuAction {
    Toggle,
    OutsideClick,
    Navigate,
    Escape,
}

impl MenuState {
    pub fn next(self, action: MenuAction) -> Self {
        match action {
            MenuAction::Toggle => Self {
                open: !self.open,
                refocus_toggle: false,
            },
            MenuAction::OutsideClick | MenuAction::Navigate => Self {
                open: false,
                refocus_toggle: false,
            },
            MenuAction::Escape if self.open => Self {
                open: false,
                refocus_toggle: true,
            },
            MenuAction::Escape => self,
        }
    }
}

impl Reducible for MenuState {
    type Action = MenuAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        (*self).next(action).into()
    }
}

/// Highlights the link of the section currently being read. Returns the
/// teardown, or `None` when none of the sections are on the page.
fn highlight_on_scroll(
    sections: &'static [NavSection],
    active: UseStateSetter<Option<usize>>,
) -> Option<Box<dyn FnOnce()>> {
    let window = web_sys::window()?;
    let document = window.document()?;

    let targets: Vec<(usize, HtmlElement)> = sections
        .iter()
        .enumerate()
        .filter_map(|(i, section)| {
            let element = document.get_element_by_id(section.id)?;
            element.dyn_into::<HtmlElement>().ok().map(|el| (i, el))
        })
        .collect();
    if targets.is_empty() {
        debug!("No nav sections found, highlighter disabled");
        return None;
    }

    let update = move |()| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        let offsets: Vec<f64> = targets.iter().map(|(_, el)| f64::from(el.offset_top())).collect();
        active.set(active_section(&offsets, scroll_y, height).map(|i| targets[i].0));
    };
    let throttle = Rc::new(Throttle::new(
        Rc::new(BrowserClock::new()),
        config::NAV_THROTTLE_MS,
        update,
    ));
    throttle.call(());

    let callback = Closure::<dyn Fn()>::new({
        let throttle = throttle.clone();
        move || throttle.call(())
    });
    window
        .add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
        .ok()?;

    Some(Box::new(move || {
        let _ = window.remove_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
        drop(throttle);
    }))
}

fn scroll_to_section(id: &str, smooth: bool) {
    let target = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id));
    let Some(target) = target else {
        debug!("Section #{} not on page", id);
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(if smooth { ScrollBehavior::Smooth } else { ScrollBehavior::Auto });
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    #[prop_or(SECTIONS)]
    pub sections: &'static [NavSection],
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let sections = props.sections;
    let menu = use_reducer(MenuState::default);
    let active = use_state_eq(|| None::<usize>);
    let nav_ref = use_node_ref();
    let toggle_ref = use_node_ref();
    let reduced_motion = *use_memo(|_| prefers_reduced_motion(), ());
    let location = yew_router::hooks::use_location();

    {
        let active = active.setter();
        let deps = HighlightDeps::new(reduced_motion, location.as_ref().map(|l| l.path()));
        use_effect_with_deps(
            move |deps: &HighlightDeps| {
                let destructor: Box<dyn FnOnce()> = if deps.enabled {
                    highlight_on_scroll(sections, active).unwrap_or_else(|| Box::new(|| ()))
                } else {
                    Box::new(|| ())
                };
                move || destructor()
            },
            deps,
        );
    }

    // Return focus to the burger after closing from the keyboard.
    {
        let toggle_ref = toggle_ref.clone();
        use_effect_with_deps(
            move |state: &MenuState| {
                if state.refocus_toggle {
                    if let Some(toggle) = toggle_ref.cast::<HtmlElement>() {
                        let _ = toggle.focus();
                    }
                }
                || ()
            },
            *menu,
        );
    }

    {
        let menu = menu.clone();
        let nav_ref = nav_ref.clone();
        use_event_with_window("click", move |e: MouseEvent| {
            if !menu.open {
                return;
            }
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside = nav_ref
                .get()
                .map(|nav| nav.contains(target.as_ref()))
                .unwrap_or(false);
            if !inside {
                menu.dispatch(MenuAction::OutsideClick);
            }
        });
    }

    {
        let menu = menu.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if e.key() == "Escape" && menu.open {
                menu.dispatch(MenuAction::Escape);
            }
        });
    }

    let toggle = {
        let menu = menu.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu.dispatch(MenuAction::Toggle);
        })
    };

    let go_to = |id: &'static str| {
        let menu = menu.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            scroll_to_section(id, !reduced_motion);
            menu.dispatch(MenuAction::Navigate);
        })
    };

    let menu_class = if menu.open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <header class="site-header">
            <nav class="top-nav" ref={nav_ref} aria-label="Main">
                <div class="nav-content">
                    <a href="#top" class="nav-logo" onclick={go_to("top")}>
                        {"sparkcrew"}
                    </a>
                    <button
                        class="burger-menu"
                        ref={toggle_ref}
                        aria-label="Menu"
                        aria-controls="nav-links"
                        aria-expanded={menu.open.to_string()}
                        onclick={toggle}
                    >
                        <span></span>
                        <span></span>
                        <span></span>
                    </button>
                    <div id="nav-links" class={menu_class}>
                        { for sections.iter().enumerate().map(|(i, section)| {
                            let is_active = *active == Some(i);
                            html! {
                                <a
                                    href={format!("#{}", section.id)}
                                    class={classes!("nav-link", is_active.then(|| "active"))}
                                    aria-current={is_active.then(|| "true")}
                                    onclick={go_to(section.id)}
                                >
                                    {section.label}
                                </a>
                            }
                        }) }
                    </div>
                </div>
            </nav>
        </header>
    }
}
