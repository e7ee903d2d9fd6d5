use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A navigable top-level content unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPage {
    pub name: String,
    pub slug: String,
}

/// An ordered content block belonging to a page.
///
/// `kind` is kept as the stored string so rows written by other tools still
/// load; use [`Section::kind`] for the typed view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: i32,
    pub page_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub order: i32,
    pub data: Value,
}

impl Section {
    pub fn kind(&self) -> Option<SectionKind> {
        self.kind.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSection {
    pub page_id: i32,
    pub kind: SectionKind,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWithSections {
    pub page: Page,
    pub sections: Vec<Section>,
}

/// An admin account allowed to sign in.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub encrypted_password: String,
}

/// Navigation entry for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRoute {
    pub label: String,
    pub path: String,
}

impl SiteRoute {
    pub const HOME_SLUG: &'static str = "home";
}

impl From<&Page> for SiteRoute {
    fn from(page: &Page) -> Self {
        let path = match page.slug.as_str() {
            SiteRoute::HOME_SLUG => "/".to_owned(),
            slug => format!("/{slug}"),
        };

        Self {
            label: page.name.clone(),
            path,
        }
    }
}

/// The fixed set of section layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Hero,
    Features,
    Bullets,
    Team,
    Cta,
    Numbers,
    #[serde(rename = "features3")]
    Features3,
    NumberedList,
    LargeCard,
    TextBlocks,
    Form,
}

impl SectionKind {
    pub const ALL: [SectionKind; 11] = [
        SectionKind::Hero,
        SectionKind::Features,
        SectionKind::Bullets,
        SectionKind::Team,
        SectionKind::Cta,
        SectionKind::Numbers,
        SectionKind::Features3,
        SectionKind::NumberedList,
        SectionKind::LargeCard,
        SectionKind::TextBlocks,
        SectionKind::Form,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Features => "features",
            SectionKind::Bullets => "bullets",
            SectionKind::Team => "team",
            SectionKind::Cta => "cta",
            SectionKind::Numbers => "numbers",
            SectionKind::Features3 => "features3",
            SectionKind::NumberedList => "numberedList",
            SectionKind::LargeCard => "largeCard",
            SectionKind::TextBlocks => "textBlocks",
            SectionKind::Form => "form",
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown section type '{0}'")]
pub struct UnknownSectionKind(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSectionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSectionKind(s.to_owned()))
    }
}
