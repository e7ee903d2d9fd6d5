use maud::{html, Markup};
use serde::Serialize;

use crate::{content::SiteRoute, Component, Context};

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub active: bool,
    pub label: String,
    pub route: String,
}

impl From<SiteRoute> for Link {
    fn from(route: SiteRoute) -> Self {
        Self {
            active: false,
            label: route.label,
            route: route.path,
        }
    }
}

impl Component for Link {
    fn render(&self, _: &Context) -> Markup {
        let active_class = match self.active {
            true => "text-gray-900 border-b-2 border-gray-900",
            false => "text-gray-500 hover:text-gray-900",
        };

        html! {
            a href=(self.route)
                class={"px-3 py-2 no-underline duration-200 " (active_class)} {
                    (self.label)
                }
        }
    }
}

/// Site navigation, one link per page in navigation order.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    links: Vec<Link>,
}

impl Navigator {
    pub fn new(routes: impl IntoIterator<Item = SiteRoute>) -> Self {
        Self {
            links: routes.into_iter().map(Link::from).collect(),
        }
    }

    /// Mark the link whose route is exactly `path` as active.
    pub fn set_current(&mut self, path: &str) {
        for link in self.links.iter_mut() {
            link.active = link.route == path;
        }
    }

    pub fn current_link(&self) -> Option<&Link> {
        self.links.iter().find(|&x| x.active)
    }
}

impl Component for Navigator {
    fn render(&self, context: &Context) -> Markup {
        html! {
            @for link in &self.links {
                (link.render(context))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn routes() -> Vec<SiteRoute> {
        vec![
            SiteRoute { label: "Home".to_owned(), path: "/".to_owned() },
            SiteRoute { label: "About Us".to_owned(), path: "/about-us".to_owned() },
        ]
    }

    #[test]
    fn test_set_current_is_exact() {
        let mut navigator = Navigator::new(routes());
        assert!(navigator.current_link().is_none());

        navigator.set_current("/about-us");
        assert_eq!(navigator.current_link().map(|l| l.label.as_str()), Some("About Us"));

        // "/" must not match every path
        navigator.set_current("/contact");
        assert!(navigator.current_link().is_none());

        navigator.set_current("/");
        assert_eq!(navigator.current_link().map(|l| l.label.as_str()), Some("Home"));
    }
}
