//! Category operations

use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, NewCategory};

const CATEGORY_COLUMNS: &str =
    "id, owner, name, color, icon, is_system, monzo_category, created_at";

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let created_at_str: String = row.get(7)?;

    Ok(Category {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        color: row.get(3)?,
        icon: row.get(4)?,
        is_system: row.get(5)?,
        external_key: row.get(6)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// List all of an owner's categories
    pub fn list_categories(&self, owner: &str) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE owner = ? ORDER BY name",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map(params![owner], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Insert several categories for an owner in one transaction
    ///
    /// Returns the created rows in input order.
    pub fn insert_categories(
        &self,
        owner: &str,
        categories: &[NewCategory],
    ) -> Result<Vec<Category>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut created = Vec::with_capacity(categories.len());
        {
            let mut insert = tx.prepare(
                r#"
                INSERT INTO categories (owner, name, color, icon, is_system, monzo_category)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )?;
            let mut fetch = tx.prepare(&format!(
                "SELECT {} FROM categories WHERE id = ?",
                CATEGORY_COLUMNS
            ))?;

            for category in categories {
                insert.execute(params![
                    owner,
                    category.name,
                    category.color,
                    category.icon,
                    category.is_system,
                    category.external_key,
                ])?;
                let id = tx.last_insert_rowid();
                created.push(fetch.query_row(params![id], category_from_row)?);
            }
        }

        tx.commit()?;
        Ok(created)
    }
}
