//! Item repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `validate()` before any SQL runs.
//! - Deleting an item removes its reviews through the
//!   `fk_reviews_item_id_items` cascade, inside one transaction (or a savepoint
//!   when the caller already holds one).

use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::{
    ensure_connection_ready, in_write_scope, EntityKind, ListQuery, RepoError, RepoResult,
};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT id, name, price FROM items";

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    fn create_item(&self, item: &NewItem) -> RepoResult<ItemId>;
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn list_items(&self, query: &ListQuery) -> RepoResult<Vec<Item>>;
    /// Deletes the item and returns how many reviews were cascaded.
    fn delete_item(&self, id: ItemId) -> RepoResult<usize>;
}

/// SQLite-backed item repository.
#[derive(Clone, Copy)]
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO items (name, price) VALUES (?1, ?2);",
            params![item.name.as_deref(), item.price],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=item_create module=repo status=ok item_id={id}");
        Ok(id)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE items SET name = ?1, price = ?2 WHERE id = ?3;",
            params![item.name.as_deref(), item.price, item.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Item,
                id: item.id,
            });
        }

        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let item = self
            .conn
            .query_row(
                &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_item_row,
            )
            .optional()?;
        Ok(item)
    }

    fn list_items(&self, query: &ListQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        query.push_pagination(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<usize> {
        let cascaded = in_write_scope(self.conn, |conn| {
            let cascaded: usize = conn.query_row(
                "SELECT COUNT(*) FROM reviews WHERE item_id = ?1;",
                [id],
                |row| row.get(0),
            )?;

            let changed = conn.execute("DELETE FROM items WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: EntityKind::Item,
                    id,
                });
            }
            Ok(cascaded)
        })?;

        info!("event=item_delete module=repo status=ok item_id={id} cascaded_reviews={cascaded}");
        Ok(cascaded)
    }
}

fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get("id")?,
        name: row.get("name")?,
        price: row.get("price")?,
    })
}
