use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::content::{
    ordering::{next_order, validate_page_order},
    NewPage, NewSection, Page, Section, User,
};

use super::{ContentStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    pages: Vec<Page>,
    sections: Vec<Section>,
    users: Vec<User>,
    page_seq: i32,
    section_seq: i32,
    user_seq: i32,
}

/// In-process [`ContentStore`].
///
/// Every operation holds one lock for its whole duration, which gives the
/// same all-or-nothing behaviour the PostgreSQL store gets from transactions.
/// Used for tests and for running the site without a database.
#[derive(Default)]
pub struct MemoryContentStore {
    tables: Mutex<Tables>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account. `encrypted_password` must be a bcrypt hash.
    pub async fn add_user(&self, name: &str, email: &str, encrypted_password: &str) -> User {
        let mut tables = self.tables.lock().await;
        tables.user_seq += 1;

        let user = User {
            id: tables.user_seq,
            name: name.to_owned(),
            email: email.to_owned(),
            encrypted_password: encrypted_password.to_owned(),
        };
        tables.users.push(user.clone());
        user
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_pages(&self) -> StoreResult<Vec<Page>> {
        let tables = self.tables.lock().await;
        let mut pages = tables.pages.clone();
        pages.sort_by_key(|page| (page.sort_order, page.id));
        Ok(pages)
    }

    async fn find_page(&self, id: i32) -> StoreResult<Option<Page>> {
        let tables = self.tables.lock().await;
        Ok(tables.pages.iter().find(|page| page.id == id).cloned())
    }

    async fn find_page_by_slug(&self, slug: &str) -> StoreResult<Option<Page>> {
        let tables = self.tables.lock().await;
        Ok(tables.pages.iter().find(|page| page.slug == slug).cloned())
    }

    async fn create_page(&self, page: NewPage) -> StoreResult<Page> {
        let mut tables = self.tables.lock().await;

        if tables.pages.iter().any(|existing| existing.slug == page.slug) {
            return Err(StoreError::Duplicate {
                field: "slug",
                value: page.slug,
            });
        }

        let sort_order = tables
            .pages
            .iter()
            .map(|existing| existing.sort_order)
            .max()
            .map_or(0, |max| max + 1);

        tables.page_seq += 1;
        let now = Utc::now();
        let page = Page {
            id: tables.page_seq,
            name: page.name,
            slug: page.slug,
            sort_order,
            created_at: now,
            updated_at: now,
        };

        tables.pages.push(page.clone());
        Ok(page)
    }

    async fn delete_page(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;

        tables.sections.retain(|section| section.page_id != id);

        let before = tables.pages.len();
        tables.pages.retain(|page| page.id != id);
        Ok(tables.pages.len() < before)
    }

    async fn set_page_order(&self, ordered_ids: &[i32]) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;

        let existing: Vec<i32> = tables.pages.iter().map(|page| page.id).collect();
        validate_page_order(ordered_ids, &existing)?;

        let now = Utc::now();
        for (position, id) in (0_i32..).zip(ordered_ids) {
            if let Some(page) = tables.pages.iter_mut().find(|page| page.id == *id) {
                page.sort_order = position;
                page.updated_at = now;
            }
        }

        Ok(())
    }

    async fn list_sections(&self, page_id: i32) -> StoreResult<Vec<Section>> {
        let tables = self.tables.lock().await;
        let mut sections: Vec<Section> = tables
            .sections
            .iter()
            .filter(|section| section.page_id == page_id)
            .cloned()
            .collect();
        sections.sort_by_key(|section| section.order);
        Ok(sections)
    }

    async fn max_section_order(&self, page_id: i32) -> StoreResult<Option<i32>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sections
            .iter()
            .filter(|section| section.page_id == page_id)
            .map(|section| section.order)
            .max())
    }

    async fn create_section(&self, section: NewSection) -> StoreResult<Section> {
        let mut tables = self.tables.lock().await;

        if !tables.pages.iter().any(|page| page.id == section.page_id) {
            return Err(StoreError::NotFound { resource: "page" });
        }

        let max = tables
            .sections
            .iter()
            .filter(|existing| existing.page_id == section.page_id)
            .map(|existing| existing.order)
            .max();

        tables.section_seq += 1;
        let section = Section {
            id: tables.section_seq,
            page_id: section.page_id,
            kind: section.kind.as_str().to_owned(),
            order: next_order(max),
            data: section.data,
        };

        tables.sections.push(section.clone());
        Ok(section)
    }

    async fn update_section_data(&self, id: i32, data: Value) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.sections.iter_mut().find(|section| section.id == id) {
            Some(section) => {
                section.data = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_section(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.sections.len();
        tables.sections.retain(|section| section.id != id);
        Ok(tables.sections.len() < before)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }
}
