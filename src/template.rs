use maud::{html, Markup, DOCTYPE};

use crate::{Component, Context};

/// Defines the root frame for rendering components
pub trait Template: Clone + Send + Sync + 'static {
    fn page(&self, context: &Context, body: Markup) -> Markup;
}

/// Public site frame: navigation bar, content area and footer.
#[derive(Clone)]
pub struct SiteTemplate {
    site_title: String,
}

impl SiteTemplate {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }

    fn head(&self, context: &Context) -> Markup {
        let title = match context.title() {
            page if page.is_empty() => self.site_title.clone(),
            page => format!("{page} | {}", self.site_title),
        };

        html! {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@1.9.12" {}
                script src="https://unpkg.com/htmx.org@1.9.12/dist/ext/json-enc.js" {}

                title { (title) }
            }
        }
    }

    fn account(&self, context: &Context) -> Markup {
        html! {
            @match &context.user {
                Some(user) => {
                    a href="/admin" class="px-3 py-2 text-gray-500 hover:text-gray-900" { "Admin" }
                    form method="post" action="/api/logout" class="inline" {
                        button type="submit" title=(user.email)
                            class="px-3 py-2 text-gray-500 hover:text-gray-900" { "Sign out" }
                    }
                },
                None => {}
            }
        }
    }
}

impl Template for SiteTemplate {
    fn page(&self, context: &Context, body: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                // <head>
                (self.head(context))

                // <body>
                body class="w-full min-h-screen m-0 p-0 font-sans bg-white" {
                    header class="border-b" {
                        nav #navigator
                            class="flex items-center max-w-6xl mx-auto p-4 gap-2"
                            hx-boost="true"
                            hx-target="#content"
                            hx-swap="innerHTML" {
                                a href="/" class="mr-auto text-xl font-bold" { (self.site_title) }
                                (context.navigator.render(context))
                                (self.account(context))
                            }
                    }

                    main #content class="max-w-6xl mx-auto p-4" {
                        (body)
                    }

                    footer class="border-t mt-16 p-8 text-center text-sm text-gray-500" {
                        (self.site_title)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{content::SiteRoute, Navigator};
    use axum::{body::Body, extract::Request};

    #[test]
    fn test_page_frame() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let mut context = Context::build(&request);
        context.navigator = Navigator::new(vec![SiteRoute {
            label: "Home".to_owned(),
            path: "/".to_owned(),
        }]);
        context.navigator.set_current("/");

        let page = SiteTemplate::new("Acme")
            .page(&context, html! { p { "hello" } })
            .into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Home | Acme</title>"));
        assert!(page.contains("<p>hello</p>"));
        assert!(page.contains("href=\"/\""));
        assert!(!page.contains("Sign out"));
    }
}
