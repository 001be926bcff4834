use yew::prelude::*;
use yew_router::prelude::*;
use log::info;

mod clock;
mod config;
mod motion;
mod storage;
mod throttle;

mod components {
    pub mod nav;
    pub mod reveal;
    pub mod testimonials;
}
mod pages {
    pub mod landing;
}
mod signup {
    //! Timed join prompt: validation rules, the presentation state machine,
    //! the clock-driven controller and the dialog component.
    pub mod controller;
    pub mod machine;
    pub mod modal;
    pub mod validation;
}

use components::nav::Nav;
use pages::landing::Landing;
use signup::modal::SignupModal;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Landing page");
            html! { <Landing /> }
        },
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! {
                <div class="not-found">
                    <h1>{"Nothing here"}</h1>
                    <Link<Route> to={Route::Home}>{"Back to the start"}</Link<Route>>
                </div>
            }
        },
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
            <SignupModal />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
