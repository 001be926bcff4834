use yew::prelude::*;

use crate::components::reveal::use_reveal;
use crate::components::testimonials::Testimonials;

/// Question and answer pairs, always shown in full.
pub const FAQ: &[(&str, &str)] = &[
    ("Does it cost anything?", "No. There is nothing to buy and nothing to unlock."),
    (
        "Why only 13 to 19?",
        "Challenges and mentoring are tuned for that range, and it keeps the crowd close in age.",
    ),
    (
        "Do I need to know how to code already?",
        "Nope. The first challenges assume zero experience.",
    ),
];

#[function_component(Landing)]
pub fn landing() -> Html {
    use_reveal();

    html! {
        <div class="landing-page">
            <style>
                {r#"
                    html {
                        scroll-behavior: smooth;
                    }
                    @media (prefers-reduced-motion: reduce) {
                        html {
                            scroll-behavior: auto;
                        }
                    }
                    .reveal {
                        opacity: 0;
                        transform: translateY(24px);
                        transition: opacity 0.6s ease-out, transform 0.6s ease-out;
                    }
                    .reveal.is-visible {
                        opacity: 1;
                        transform: none;
                    }
                    .top-nav {
                        position: fixed;
                        top: 0;
                        left: 0;
                        right: 0;
                        z-index: 100;
                        background: rgba(26, 26, 26, 0.9);
                        backdrop-filter: blur(10px);
                    }
                    .nav-content {
                        max-width: 1100px;
                        margin: 0 auto;
                        display: flex;
                        align-items: center;
                        justify-content: space-between;
                        padding: 1rem 1.5rem;
                    }
                    .nav-link.active {
                        color: #7EB2FF;
                        border-bottom: 2px solid #7EB2FF;
                    }
                    .burger-menu {
                        display: none;
                        background: none;
                        border: none;
                        cursor: pointer;
                    }
                    .burger-menu span {
                        display: block;
                        width: 24px;
                        height: 2px;
                        margin: 5px 0;
                        background: #fff;
                    }
                    @media (max-width: 768px) {
                        .burger-menu {
                            display: block;
                        }
                        .nav-right {
                            display: none;
                            position: absolute;
                            top: 100%;
                            left: 0;
                            right: 0;
                            flex-direction: column;
                            background: rgba(26, 26, 26, 0.98);
                            padding: 1rem;
                        }
                        .nav-right.mobile-menu-open {
                            display: flex;
                        }
                    }
                    .testimonial {
                        max-width: 640px;
                        margin: 0 auto;
                        text-align: center;
                    }
                    .testimonial-text {
                        font-size: 1.4rem;
                        font-style: italic;
                    }
                    .testimonial-author {
                        margin-top: 1rem;
                        color: rgba(255, 255, 255, 0.7);
                    }
                    .faq-list dt {
                        font-weight: 600;
                        margin-top: 1.25rem;
                    }
                    .faq-list dd {
                        margin: 0.25rem 0 0;
                        color: rgba(255, 255, 255, 0.8);
                    }
                "#}
            </style>

            <section id="top" class="hero">
                <div class="hero-content">
                    <h1>{"Build weird things with people your age"}</h1>
                    <p class="hero-subtitle">
                        {"sparkcrew is a free club for 13 to 19 year olds who like to make games, bots and tiny websites."}
                    </p>
                    <a href="#join" class="hero-cta">{"Get started"}</a>
                </div>
            </section>

            <section id="features" class="feature-block reveal">
                <h2>{"What you get"}</h2>
                <ul class="feature-list">
                    <li>{"A new build challenge every week, sized for one evening"}</li>
                    <li>{"Code reviews from older members who remember being stuck"}</li>
                    <li>{"Monthly showcase where everyone demos, finished or not"}</li>
                </ul>
            </section>

            <section id="testimonials" class="testimonials-block reveal">
                <h2>{"What members say"}</h2>
                <Testimonials />
            </section>

            <section id="faq" class="faq-section reveal">
                <h2>{"Questions"}</h2>
                <dl class="faq-list">
                    { for FAQ.iter().map(|(question, answer)| html! {
                        <>
                            <dt>{*question}</dt>
                            <dd>{*answer}</dd>
                        </>
                    }) }
                </dl>
            </section>

            <section id="join" class="join-block reveal">
                <h2>{"Ready when you are"}</h2>
                <p>{"Keep scrolling around and the invite will find you. It asks for a name and your age, email is optional."}</p>
            </section>

            <footer class="footer reveal">
                <p>{"sparkcrew · made by volunteers"}</p>
            </footer>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_entries_are_complete() {
        assert!(!FAQ.is_empty());
        for (question, answer) in FAQ {
            assert!(question.ends_with('?'), "{question}");
            assert!(!answer.trim().is_empty(), "{question}");
        }
    }
}
