use async_trait::async_trait;
use serde_json::Value;
use tokio_postgres::{error::SqlState, Row};

use crate::{
    content::{
        ordering::{next_order, validate_page_order},
        NewPage, NewSection, Page, Section, User,
    },
    db::{Connection, ConnectionPool},
};

use super::{ContentStore, StoreError, StoreResult};

const PAGE_COLUMNS: &str = "id, name, slug, sort_order, created_at, updated_at";
const SECTION_COLUMNS: &str = r#"id, page_id, type, "order", data"#;

/// [`ContentStore`] backed by PostgreSQL through the shared connection pool.
#[derive(Clone)]
pub struct PgContentStore {
    pool: ConnectionPool,
}

impl PgContentStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> StoreResult<Connection<'_>> {
        Ok(self.pool.get().await?)
    }
}

fn page_from_row(row: &Row) -> Result<Page, tokio_postgres::Error> {
    Ok(Page {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn section_from_row(row: &Row) -> Result<Section, tokio_postgres::Error> {
    Ok(Section {
        id: row.try_get("id")?,
        page_id: row.try_get("page_id")?,
        kind: row.try_get("type")?,
        order: row.try_get("order")?,
        data: row.try_get("data")?,
    })
}

fn user_from_row(row: &Row) -> Result<User, tokio_postgres::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        encrypted_password: row.try_get("encrypted_password")?,
    })
}

fn is_unique_violation(e: &tokio_postgres::Error) -> bool {
    e.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn list_pages(&self) -> StoreResult<Vec<Page>> {
        let conn = self.conn().await?;
        let rows = conn
            .query(
                &format!("SELECT {PAGE_COLUMNS} FROM pages ORDER BY sort_order ASC, id ASC"),
                &[],
            )
            .await?;

        Ok(rows.iter().map(page_from_row).collect::<Result<_, _>>()?)
    }

    async fn find_page(&self, id: i32) -> StoreResult<Option<Page>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"), &[&id])
            .await?;

        Ok(row.as_ref().map(page_from_row).transpose()?)
    }

    async fn find_page_by_slug(&self, slug: &str) -> StoreResult<Option<Page>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = $1 LIMIT 1"),
                &[&slug],
            )
            .await?;

        Ok(row.as_ref().map(page_from_row).transpose()?)
    }

    async fn create_page(&self, page: NewPage) -> StoreResult<Page> {
        let conn = self.conn().await?;
        let row = conn
            .query_one(
                &format!(
                    "INSERT INTO pages (name, slug, sort_order, created_at, updated_at)
                     VALUES ($1, $2, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM pages), NOW(), NOW())
                     RETURNING {PAGE_COLUMNS}"
                ),
                &[&page.name, &page.slug],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate {
                        field: "slug",
                        value: page.slug.clone(),
                    }
                } else {
                    StoreError::Database(e)
                }
            })?;

        Ok(page_from_row(&row)?)
    }

    async fn delete_page(&self, id: i32) -> StoreResult<bool> {
        let mut conn = self.conn().await?;

        // an uncommitted transaction rolls back when dropped on any early return
        let tx = conn.transaction().await?;
        let sections = tx
            .execute("DELETE FROM sections WHERE page_id = $1", &[&id])
            .await?;
        let pages = tx.execute("DELETE FROM pages WHERE id = $1", &[&id]).await?;
        tx.commit().await?;

        tracing::debug!(page_id = id, sections, pages, "page deleted");
        Ok(pages > 0)
    }

    async fn set_page_order(&self, ordered_ids: &[i32]) -> StoreResult<()> {
        let mut conn = self.conn().await?;

        let tx = conn.transaction().await?;

        // blocks concurrent inserts and deletes until the new order commits
        tx.batch_execute("LOCK TABLE pages IN SHARE ROW EXCLUSIVE MODE").await?;
        let existing: Vec<i32> = tx
            .query("SELECT id FROM pages", &[])
            .await?
            .iter()
            .map(|row| row.try_get::<_, i32>("id"))
            .collect::<Result<_, _>>()?;
        validate_page_order(ordered_ids, &existing)?;

        let statement = tx
            .prepare("UPDATE pages SET sort_order = $1, updated_at = NOW() WHERE id = $2")
            .await?;

        for (position, id) in (0_i32..).zip(ordered_ids) {
            tx.execute(&statement, &[&position, id]).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn list_sections(&self, page_id: i32) -> StoreResult<Vec<Section>> {
        let conn = self.conn().await?;
        let rows = conn
            .query(
                &format!(
                    r#"SELECT {SECTION_COLUMNS} FROM sections WHERE page_id = $1 ORDER BY "order" ASC"#
                ),
                &[&page_id],
            )
            .await?;

        Ok(rows.iter().map(section_from_row).collect::<Result<_, _>>()?)
    }

    async fn max_section_order(&self, page_id: i32) -> StoreResult<Option<i32>> {
        let conn = self.conn().await?;
        let row = conn
            .query_one(
                r#"SELECT MAX("order") AS max_order FROM sections WHERE page_id = $1"#,
                &[&page_id],
            )
            .await?;

        Ok(row.try_get("max_order")?)
    }

    async fn create_section(&self, section: NewSection) -> StoreResult<Section> {
        let mut conn = self.conn().await?;
        let tx = conn.transaction().await?;

        // the page row lock serializes concurrent inserts for one page
        let page = tx
            .query_opt("SELECT id FROM pages WHERE id = $1 FOR UPDATE", &[&section.page_id])
            .await?;
        if page.is_none() {
            return Err(StoreError::NotFound { resource: "page" });
        }

        let row = tx
            .query_one(
                r#"SELECT MAX("order") AS max_order FROM sections WHERE page_id = $1"#,
                &[&section.page_id],
            )
            .await?;
        let order = next_order(row.try_get("max_order")?);

        let row = tx
            .query_one(
                &format!(
                    r#"INSERT INTO sections (page_id, type, "order", data)
                       VALUES ($1, $2, $3, $4)
                       RETURNING {SECTION_COLUMNS}"#
                ),
                &[&section.page_id, &section.kind.as_str(), &order, &section.data],
            )
            .await?;
        tx.commit().await?;

        Ok(section_from_row(&row)?)
    }

    async fn update_section_data(&self, id: i32, data: Value) -> StoreResult<bool> {
        let conn = self.conn().await?;
        let updated = conn
            .execute("UPDATE sections SET data = $1 WHERE id = $2", &[&data, &id])
            .await?;

        Ok(updated > 0)
    }

    async fn delete_section(&self, id: i32) -> StoreResult<bool> {
        let conn = self.conn().await?;
        let deleted = conn
            .execute("DELETE FROM sections WHERE id = $1", &[&id])
            .await?;

        Ok(deleted > 0)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, name, email, encrypted_password FROM users WHERE email = $1",
                &[&email],
            )
            .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::Database, content::SectionKind, db, store::schema};
    use serde_json::json;

    // Run with: DATABASE_URL=postgresql://... cargo test -- --ignored
    async fn store() -> PgContentStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = Database {
            url: Some(url),
            ..Default::default()
        };
        let pool = db::connect(&config).await.expect("pool creation failed");
        schema::migrate(&pool).await.expect("migration failed");
        PgContentStore::new(pool)
    }

    fn unique_slug(prefix: &str) -> String {
        format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_delete_page_removes_sections() {
        let store = store().await;
        let page = store
            .create_page(NewPage {
                name: "Cascade".to_owned(),
                slug: unique_slug("cascade"),
            })
            .await
            .unwrap();

        for kind in [SectionKind::Hero, SectionKind::Cta] {
            store
                .create_section(NewSection { page_id: page.id, kind, data: json!({}) })
                .await
                .unwrap();
        }

        assert!(store.delete_page(page.id).await.unwrap());
        assert!(store.list_sections(page.id).await.unwrap().is_empty());
        assert!(store.find_page(page.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_concurrent_sections_get_distinct_orders() {
        let store = store().await;
        let page = store
            .create_page(NewPage {
                name: "Concurrent".to_owned(),
                slug: unique_slug("concurrent"),
            })
            .await
            .unwrap();

        let page_id = page.id;
        let shared = store.clone();
        let handles: Vec<_> = (0..8)
            .map(move |_| {
                let store = shared.clone();
                tokio::spawn(async move {
                    store
                        .create_section(NewSection {
                            page_id,
                            kind: SectionKind::Hero,
                            data: json!({}),
                        })
                        .await
                        .expect("concurrent insert failed")
                        .order
                })
            })
            .collect();

        let mut orders = Vec::new();
        for handle in handles {
            orders.push(handle.await.expect("task panicked"));
        }
        orders.sort_unstable();
        assert_eq!(orders, (1..=8).collect::<Vec<_>>());

        store.delete_page(page.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_duplicate_slug_is_reported() {
        let store = store().await;
        let slug = unique_slug("dup");
        let page = store
            .create_page(NewPage { name: "One".to_owned(), slug: slug.clone() })
            .await
            .unwrap();

        let err = store
            .create_page(NewPage { name: "Two".to_owned(), slug: slug.clone() })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "slug", .. }));

        store.delete_page(page.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_stale_page_order_is_rejected() {
        let store = store().await;
        let stale: Vec<i32> = store.list_pages().await.unwrap().iter().map(|p| p.id).collect();

        let page = store
            .create_page(NewPage { name: "Late".to_owned(), slug: unique_slug("late") })
            .await
            .unwrap();

        let err = store.set_page_order(&stale).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidOrder(_)));

        store.delete_page(page.id).await.unwrap();
    }
}
