//! maud components for page sections.
//!
//! Section payloads are free-form once edited, so every field is read
//! defensively and anything missing simply renders nothing.

use maud::{html, Markup, PreEscaped};
use serde_json::Value;

use crate::{
    content::{Section, SectionKind},
    Component, Context,
};

fn text<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn list<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn heading(data: &Value) -> Markup {
    html! {
        @if let Some(tagline) = text(data, "tagline") {
            p class="text-sm font-semibold uppercase tracking-wide text-gray-500" { (tagline) }
        }
        @if let Some(title) = text(data, "title") {
            h2 class="text-3xl font-bold mt-2" { (title) }
        }
        @if let Some(subtitle) = text(data, "subtitle") {
            p class="text-lg text-gray-600 mt-2" { (subtitle) }
        }
    }
}

fn image(data: &Value) -> Markup {
    let image = data.get("image").unwrap_or(&Value::Null);
    html! {
        @if let Some(src) = text(image, "src") {
            img src=(src) alt=(text(image, "alt").unwrap_or_default()) class="rounded-lg w-full";
        }
    }
}

fn actions(data: &Value) -> Markup {
    html! {
        div class="flex gap-4 mt-6" {
            @for action in list(data, "actions") {
                @if let Some(label) = text(action, "text").or(text(action, "label")) {
                    a href=(text(action, "href").unwrap_or("#"))
                        class="bg-gray-900 text-white rounded px-5 py-3 no-underline" { (label) }
                }
            }
        }
    }
}

/// Card grid used by the feature-like layouts.
fn cards(items: &[Value], columns: &str) -> Markup {
    html! {
        div class={"grid gap-6 mt-8 " (columns)} {
            @for item in items {
                div class="border rounded-lg p-6" {
                    @if let Some(title) = text(item, "title").or(text(item, "name")) {
                        h3 class="font-semibold text-lg" { (title) }
                    }
                    @if let Some(description) = text(item, "description").or(text(item, "text")) {
                        p class="text-gray-600 mt-2" { (description) }
                    }
                }
            }
        }
    }
}

fn hero(data: &Value) -> Markup {
    html! {
        div class="grid md:grid-cols-2 gap-8 items-center py-16" {
            div {
                @if let Some(title) = text(data, "title") {
                    h1 class="text-5xl font-bold" { (title) }
                }
                @if let Some(subtitle) = text(data, "subtitle") {
                    p class="text-xl text-gray-600 mt-4" { (subtitle) }
                }
                (actions(data))
            }
            (image(data))
        }
    }
}

fn bullets(data: &Value) -> Markup {
    let image_first = text(data, "side") == Some("left");
    html! {
        div class="grid md:grid-cols-2 gap-8 items-center py-12" {
            @if image_first { (image(data)) }
            div {
                (heading(data))
                ul class="list-disc pl-6 mt-4 space-y-2" {
                    @for item in list(data, "items") {
                        @if let Some(line) = item.as_str().or(text(item, "text")).or(text(item, "title")) {
                            li { (line) }
                        }
                    }
                }
            }
            @if !image_first { (image(data)) }
        }
    }
}

fn team(data: &Value) -> Markup {
    html! {
        div class="py-12" {
            (heading(data))
            div class="grid md:grid-cols-4 gap-6 mt-8" {
                @for member in list(data, "members") {
                    div class="text-center" {
                        (image(member))
                        @if let Some(name) = text(member, "name") {
                            h3 class="font-semibold mt-2" { (name) }
                        }
                        @if let Some(role) = text(member, "role").or(text(member, "title")) {
                            p class="text-gray-500" { (role) }
                        }
                    }
                }
            }
        }
    }
}

fn numbers(data: &Value) -> Markup {
    html! {
        div class="py-12" {
            (heading(data))
            dl class="grid md:grid-cols-4 gap-6 mt-8 text-center" {
                @for stat in list(data, "stats") {
                    div {
                        dt class="text-4xl font-bold" {
                            (text(stat, "value").map(str::to_owned).unwrap_or_else(|| {
                                stat.get("value").map(Value::to_string).unwrap_or_default()
                            }))
                        }
                        dd class="text-gray-500" { (text(stat, "label").unwrap_or_default()) }
                    }
                }
            }
        }
    }
}

fn numbered_list(data: &Value) -> Markup {
    html! {
        div class="py-12" {
            (heading(data))
            ol class="list-decimal pl-6 mt-6 space-y-4" {
                @for item in list(data, "items") {
                    li {
                        @if let Some(title) = text(item, "title") {
                            span class="font-semibold" { (title) }
                        }
                        @if let Some(description) = text(item, "description") {
                            p class="text-gray-600" { (description) }
                        }
                    }
                }
            }
        }
    }
}

fn text_blocks(data: &Value) -> Markup {
    html! {
        div class="py-12 space-y-8" {
            @for block in list(data, "blocks") {
                article {
                    @if let Some(title) = text(block, "title") {
                        h2 class="text-2xl font-bold" { (title) }
                    }
                    // block bodies are rich text written by admins
                    div class="prose mt-2" { (PreEscaped(text(block, "body").unwrap_or_default())) }
                }
            }
        }
    }
}

fn form(data: &Value) -> Markup {
    let title = text(data, "title").unwrap_or("Contact Form");
    html! {
        div class="py-12 max-w-2xl" {
            (heading(data))
            form class="space-y-4 mt-6" data-form-title=(title)
                data-recipient=(text(data, "recipient").unwrap_or_default()) {
                @for field in list(data, "fields") {
                    label class="block" {
                        span class="text-sm text-gray-600" { (text(field, "label").unwrap_or_default()) }
                        input type=(text(field, "type").unwrap_or("text"))
                            name=(text(field, "name").unwrap_or_default())
                            class="block w-full border rounded px-3 py-2";
                    }
                }
                @if let Some(label) = data.get("textarea").and_then(|t| text(t, "label")) {
                    label class="block" {
                        span class="text-sm text-gray-600" { (label) }
                        textarea name="message" class="block w-full border rounded px-3 py-2" {}
                    }
                }
                @if let Some(disclaimer) = data.get("disclaimer").and_then(|d| text(d, "label")) {
                    p class="text-sm text-gray-500" { (disclaimer) }
                }
                button type="submit" class="bg-gray-900 text-white rounded px-5 py-3" { "Submit" }
            }
            @if let Some(footer) = text(data, "footer") {
                p class="text-sm text-gray-500 mt-4" { (footer) }
            }
        }
    }
}

impl Component for Section {
    fn render(&self, _: &Context) -> Markup {
        let data = &self.data;

        let body = match self.kind() {
            Some(SectionKind::Hero) => hero(data),
            Some(SectionKind::Features) => html! {
                div class="py-12" { (heading(data)) (cards(list(data, "features"), "md:grid-cols-2")) }
            },
            Some(SectionKind::Features3) | Some(SectionKind::LargeCard) => html! {
                div class="py-12" { (heading(data)) (cards(list(data, "items"), "md:grid-cols-3")) }
            },
            Some(SectionKind::Bullets) => bullets(data),
            Some(SectionKind::Team) => team(data),
            Some(SectionKind::Cta) => html! {
                div class="py-16 text-center bg-gray-50 rounded-lg" { (heading(data)) (actions(data)) }
            },
            Some(SectionKind::Numbers) => numbers(data),
            Some(SectionKind::NumberedList) => numbered_list(data),
            Some(SectionKind::TextBlocks) => text_blocks(data),
            Some(SectionKind::Form) => form(data),
            None => {
                tracing::warn!(section_id = self.id, kind = %self.kind, "unknown section type");
                html! {}
            }
        };

        html! {
            section id={"section-" (self.id)} data-type=(self.kind) { (body) }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::templates;
    use axum::{body::Body, extract::Request};
    use serde_json::json;

    fn context() -> Context {
        Context::build(&Request::builder().uri("/").body(Body::empty()).unwrap())
    }

    fn section(kind: &str, data: Value) -> Section {
        Section {
            id: 1,
            page_id: 1,
            kind: kind.to_owned(),
            order: 1,
            data,
        }
    }

    #[test]
    fn test_every_template_renders() {
        for kind in SectionKind::ALL {
            let html = section(kind.as_str(), templates::template(kind))
                .render(&context())
                .into_string();
            assert!(html.contains(&format!("data-type=\"{kind}\"")), "{html}");
        }
    }

    #[test]
    fn test_hero_escapes_text() {
        let html = section("hero", json!({ "title": "<b>Hi</b>", "image": { "src": "/a.png", "alt": "A" } }))
            .render(&context())
            .into_string();
        assert!(html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(html.contains("src=\"/a.png\""));
    }

    #[test]
    fn test_text_block_body_is_raw_html() {
        let html = section("textBlocks", json!({ "blocks": [{ "title": "T", "body": "<p>x</p>" }] }))
            .render(&context())
            .into_string();
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn test_unknown_and_malformed_render_empty() {
        let html = section("carousel", json!({ "title": "x" })).render(&context()).into_string();
        assert!(!html.contains("x</"));

        // wrong shapes are skipped, not fatal
        let html = section("team", json!({ "members": "nobody", "title": 5 }))
            .render(&context())
            .into_string();
        assert!(html.contains("data-type=\"team\""));
    }
}
