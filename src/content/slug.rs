/// Derive a URL-safe slug.
///
/// Lowercases and trims the input, turns each run of whitespace into a
/// single `-`, then drops anything outside `a-z`, `0-9` and `-`. The output
/// is a fixed point, so slugifying a slug returns it unchanged.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }

        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}

/// Pick the slug for a new page: a supplied slug wins when it is non-empty,
/// otherwise the name is used. Both go through [`slugify`].
///
/// Returns `None` when nothing usable is left.
pub fn resolve(name: &str, supplied: Option<&str>) -> Option<String> {
    let source = match supplied {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => name,
    };

    let slug = slugify(source);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slug_from_name() {
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("  Our   Team  "), "our-team");
        assert_eq!(slugify("Q&A: FAQ's"), "qa-faqs");
        assert_eq!(slugify("Services 2024"), "services-2024");
    }

    #[test]
    fn test_slug_strips_non_ascii() {
        assert_eq!(slugify("Café Menü"), "caf-men");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_is_idempotent() {
        for name in ["About Us", "Hello,\tWorld", "--Mixed CASE--", "a - b", "Ünïcödé Tïtle"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "slugify not idempotent for {name:?}");
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    #[test]
    fn test_resolve_prefers_supplied_slug() {
        assert_eq!(resolve("About Us", None).as_deref(), Some("about-us"));
        assert_eq!(resolve("About Us", Some("")).as_deref(), Some("about-us"));
        assert_eq!(resolve("About Us", Some("Who We Are")).as_deref(), Some("who-we-are"));
        assert_eq!(resolve("???", None), None);
    }
}
