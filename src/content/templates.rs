//! Default `data` payloads for newly created sections.
//!
//! Only consulted when a section is created. Later edits may reshape the
//! payload freely.

use serde_json::{json, Value};

use super::SectionKind;

/// Default payload for a section type name. Unknown names get `{}`.
pub fn default_data(kind: &str) -> Value {
    match kind.parse::<SectionKind>() {
        Ok(kind) => template(kind),
        Err(_) => json!({}),
    }
}

pub fn template(kind: SectionKind) -> Value {
    match kind {
        SectionKind::Hero => json!({
            "title": "Welcome to our site",
            "subtitle": "This is the hero section.",
            "image": { "src": "", "alt": "" },
            "actions": [],
        }),
        SectionKind::Features => json!({
            "tagline": "Why Choose Us",
            "title": "Our Features",
            "subtitle": "",
            "features": [],
        }),
        SectionKind::Bullets => json!({
            "tagline": "",
            "title": "",
            "subtitle": "",
            "items": [],
            "image": { "src": "", "alt": "" },
            "side": "right",
        }),
        SectionKind::Team => json!({
            "tagline": "Leadership",
            "title": "Meet the Team",
            "subtitle": "",
            "members": [],
        }),
        SectionKind::Cta => json!({
            "tagline": "",
            "title": "Ready to talk?",
            "subtitle": "Let's build something great.",
            "actions": [],
        }),
        SectionKind::Numbers => json!({
            "title": "By the Numbers",
            "stats": [],
        }),
        SectionKind::Features3 => json!({
            "title": "More Features",
            "subtitle": "",
            "items": [],
        }),
        SectionKind::NumberedList => json!({
            "title": "",
            "subtitle": "",
            "items": [],
        }),
        SectionKind::LargeCard => json!({
            "title": "Core Platform Capabilities",
            "subtitle": "Explore the building blocks of our secure, AI\u{2011}driven infrastructure.",
            "items": [],
        }),
        SectionKind::TextBlocks => json!({
            "blocks": [
                {
                    "title": "Sample Title",
                    "body": "<p>This is an editable paragraph. You can format it with bold, italic, or links.</p>",
                }
            ],
        }),
        SectionKind::Form => json!({
            "title": "Submit Your Application",
            "subtitle": "Our HR team typically responds within 2 business days.",
            "disclaimer": {
                "label": "By applying, you consent to us collecting and using your information for recruitment purposes.",
            },
            "footer": "We value your privacy and will use your data solely to process your application.",
            "recipient": "",
            "fields": [
                { "type": "text", "name": "name", "label": "Full Name" },
                { "type": "email", "name": "email", "label": "Email Address" },
                { "type": "text", "name": "phone", "label": "Phone Number" },
                { "type": "text", "name": "address", "label": "Address" },
                { "type": "text", "name": "subject", "label": "Subject (enter \"Job Wanted\")" },
            ],
            "textarea": { "label": "Qualifications & Experience" },
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hero_default() {
        let data = default_data("hero");
        assert_eq!(data["title"], "Welcome to our site");
        assert_eq!(data["image"], json!({ "src": "", "alt": "" }));
        assert_eq!(data["actions"], json!([]));
    }

    #[test]
    fn test_unknown_type_is_empty_object() {
        assert_eq!(default_data("carousel"), json!({}));
        assert_eq!(default_data(""), json!({}));
    }

    #[test]
    fn test_every_kind_has_an_object_template() {
        for kind in SectionKind::ALL {
            let data = template(kind);
            assert!(data.is_object(), "{kind} template is not an object");
            assert!(!data.as_object().unwrap().is_empty(), "{kind} template is empty");
            assert_eq!(default_data(kind.as_str()), data);
        }
    }

    #[test]
    fn test_form_template_fields() {
        let data = template(SectionKind::Form);
        let names: Vec<&str> = data["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["name"].as_str())
            .collect();
        assert_eq!(names, ["name", "email", "phone", "address", "subject"]);
    }
}
