use rusqlite::Connection;
use shopreview_core::db::migrations::latest_version;
use shopreview_core::db::open_db_in_memory;
use shopreview_core::{
    Customer, CustomerRepository, CustomerService, EntityKind, ItemService, ListQuery, NewCustomer,
    RepoError, ReviewService, SqliteCustomerRepository,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let id = repo.create_customer(&NewCustomer::named("Alice")).unwrap();

    let loaded = repo.get_customer(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.name.as_deref(), Some("Alice"));
}

#[test]
fn customers_get_distinct_storage_assigned_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = CustomerService::sqlite(&conn).unwrap();

    let first = service.create_customer(Some("Alice".to_string())).unwrap();
    let second = service.create_customer(None).unwrap();
    assert_ne!(first.id, second.id);

    let anonymous = service.get_customer(second.id).unwrap().unwrap();
    assert_eq!(anonymous.name, None);
}

#[test]
fn get_missing_customer_is_absent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    assert!(repo.get_customer(42).unwrap().is_none());
}

#[test]
fn update_and_rename_persist_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CustomerService::sqlite(&conn).unwrap();

    let mut customer = service.create_customer(Some("Alice".to_string())).unwrap();
    customer.name = Some("Alicia".to_string());
    service.update_customer(&customer).unwrap();
    assert_eq!(
        service
            .get_customer(customer.id)
            .unwrap()
            .unwrap()
            .name
            .as_deref(),
        Some("Alicia")
    );

    let renamed = service.rename_customer(customer.id, None).unwrap();
    assert_eq!(renamed.name, None);
    assert_eq!(service.get_customer(customer.id).unwrap().unwrap(), renamed);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCustomerRepository::try_new(&conn).unwrap();

    let ghost = Customer {
        id: 42,
        name: Some("ghost".to_string()),
    };
    let err = repo.update_customer(&ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Customer,
            id: 42
        }
    ));
}

#[test]
fn delete_removes_customer_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CustomerService::sqlite(&conn).unwrap();

    let customer = service.create_customer(Some("Bob".to_string())).unwrap();
    assert_eq!(service.delete_customer(customer.id).unwrap(), 0);
    assert!(service.get_customer(customer.id).unwrap().is_none());

    let err = service.delete_customer(customer.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn list_pagination_orders_by_id() {
    let conn = open_db_in_memory().unwrap();
    let service = CustomerService::sqlite(&conn).unwrap();
    let ids: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| service.create_customer(Some(name.to_string())).unwrap().id)
        .collect();

    let all = service.list_customers(&ListQuery::default()).unwrap();
    assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), ids);

    let page = service
        .list_customers(&ListQuery {
            limit: Some(2),
            offset: 1,
        })
        .unwrap();
    assert_eq!(page.iter().map(|c| c.id).collect::<Vec<_>>(), ids[1..3].to_vec());

    let tail = service
        .list_customers(&ListQuery {
            limit: None,
            offset: 3,
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, ids[3]);
}

#[test]
fn customer_items_are_distinct_and_follow_review_order() {
    let conn = open_db_in_memory().unwrap();
    let customers = CustomerService::sqlite(&conn).unwrap();
    let items = ItemService::sqlite(&conn).unwrap();
    let reviews = ReviewService::sqlite(&conn).unwrap();

    let alice = customers
        .create_customer(Some("Alice".to_string()))
        .unwrap();
    let widget = items
        .create_item(Some("Widget".to_string()), Some(9.99))
        .unwrap();
    let gadget = items.create_item(Some("Gadget".to_string()), None).unwrap();

    reviews
        .create_review(Some("first".to_string()), Some(alice.id), Some(gadget.id))
        .unwrap();
    reviews
        .create_review(Some("no item".to_string()), Some(alice.id), None)
        .unwrap();
    reviews
        .create_review(Some("second".to_string()), Some(alice.id), Some(widget.id))
        .unwrap();
    reviews
        .create_review(Some("again".to_string()), Some(alice.id), Some(gadget.id))
        .unwrap();

    let derived = customers.customer_items(alice.id).unwrap().unwrap();
    assert_eq!(derived, vec![gadget, widget]);
}

#[test]
fn customer_items_of_missing_customer_is_absent() {
    let conn = open_db_in_memory().unwrap();
    let customers = CustomerService::sqlite(&conn).unwrap();

    assert!(customers.customer_items(7).unwrap().is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("customers"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE customers (id INTEGER PRIMARY KEY);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "customers",
            column: "name"
        })
    ));
}

#[test]
fn repository_rejects_connection_with_foreign_keys_disabled() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();

    let result = SqliteCustomerRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::ForeignKeysDisabled)));
}
