//! Customer repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Deleting a customer removes its reviews through the
//!   `fk_reviews_customer_id_customers` cascade, inside one transaction (or a savepoint
//!   when the caller already holds one).

use crate::model::customer::{Customer, CustomerId, NewCustomer};
use crate::repo::{
    ensure_connection_ready, in_write_scope, EntityKind, ListQuery, RepoError, RepoResult,
};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CUSTOMER_SELECT_SQL: &str = "SELECT id, name FROM customers";

/// Repository interface for customer CRUD operations.
pub trait CustomerRepository {
    fn create_customer(&self, customer: &NewCustomer) -> RepoResult<CustomerId>;
    fn update_customer(&self, customer: &Customer) -> RepoResult<()>;
    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    fn list_customers(&self, query: &ListQuery) -> RepoResult<Vec<Customer>>;
    /// Deletes the customer and returns how many reviews were cascaded.
    fn delete_customer(&self, id: CustomerId) -> RepoResult<usize>;
}

/// SQLite-backed customer repository.
#[derive(Clone, Copy)]
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn create_customer(&self, customer: &NewCustomer) -> RepoResult<CustomerId> {
        self.conn.execute(
            "INSERT INTO customers (name) VALUES (?1);",
            params![customer.name.as_deref()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=customer_create module=repo status=ok customer_id={id}");
        Ok(id)
    }

    fn update_customer(&self, customer: &Customer) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE customers SET name = ?1 WHERE id = ?2;",
            params![customer.name.as_deref(), customer.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Customer,
                id: customer.id,
            });
        }

        Ok(())
    }

    fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let customer = self
            .conn
            .query_row(
                &format!("{CUSTOMER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_customer_row,
            )
            .optional()?;
        Ok(customer)
    }

    fn list_customers(&self, query: &ListQuery) -> RepoResult<Vec<Customer>> {
        let mut sql = format!("{CUSTOMER_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        query.push_pagination(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }

        Ok(customers)
    }

    fn delete_customer(&self, id: CustomerId) -> RepoResult<usize> {
        let cascaded = in_write_scope(self.conn, |conn| {
            let cascaded: usize = conn.query_row(
                "SELECT COUNT(*) FROM reviews WHERE customer_id = ?1;",
                [id],
                |row| row.get(0),
            )?;

            let changed = conn.execute("DELETE FROM customers WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: EntityKind::Customer,
                    id,
                });
            }
            Ok(cascaded)
        })?;

        info!(
            "event=customer_delete module=repo status=ok customer_id={id} cascaded_reviews={cascaded}"
        );
        Ok(cascaded)
    }
}

fn parse_customer_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
