use shopreview_core::db::open_db_in_memory;
use shopreview_core::{
    EntityKind, Item, ItemRepository, ItemService, ListQuery, NewItem, RepoError,
    SqliteItemRepository,
};

#[test]
fn create_and_get_roundtrip_preserves_price() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.create_item(&NewItem::new("Widget", 9.99)).unwrap();

    let loaded = repo.get_item(id).unwrap().unwrap();
    assert_eq!(loaded.name.as_deref(), Some("Widget"));
    assert_eq!(loaded.price, Some(9.99));
}

#[test]
fn item_fields_are_optional() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::sqlite(&conn).unwrap();

    let blank = service.create_item(None, None).unwrap();
    let loaded = service.get_item(blank.id).unwrap().unwrap();
    assert_eq!(loaded, blank);
    assert_eq!(loaded.name, None);
    assert_eq!(loaded.price, None);
}

#[test]
fn update_name_and_price() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::sqlite(&conn).unwrap();

    let mut item = service
        .create_item(Some("Widget".to_string()), Some(9.99))
        .unwrap();
    item.name = Some("Widget Pro".to_string());
    item.price = Some(19.5);
    service.update_item(&item).unwrap();
    assert_eq!(service.get_item(item.id).unwrap().unwrap(), item);

    let repriced = service.reprice_item(item.id, Some(4.25)).unwrap();
    assert_eq!(repriced.price, Some(4.25));
    assert_eq!(repriced.name.as_deref(), Some("Widget Pro"));
    assert_eq!(service.get_item(item.id).unwrap().unwrap(), repriced);
}

#[test]
fn non_finite_price_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::sqlite(&conn).unwrap();

    let create_err = service
        .create_item(Some("broken".to_string()), Some(f64::NAN))
        .unwrap_err();
    assert!(matches!(create_err, RepoError::Validation(_)));
    assert!(service
        .list_items(&ListQuery::default())
        .unwrap()
        .is_empty());

    let item = service.create_item(None, Some(1.0)).unwrap();
    let update_err = service
        .reprice_item(item.id, Some(f64::INFINITY))
        .unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));
    assert_eq!(service.get_item(item.id).unwrap().unwrap().price, Some(1.0));
}

#[test]
fn update_and_delete_missing_item_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let ghost = Item {
        id: 5,
        name: None,
        price: None,
    };
    assert!(matches!(
        repo.update_item(&ghost).unwrap_err(),
        RepoError::NotFound {
            entity: EntityKind::Item,
            id: 5
        }
    ));
    assert!(matches!(
        repo.delete_item(5).unwrap_err(),
        RepoError::NotFound {
            entity: EntityKind::Item,
            id: 5
        }
    ));
    assert!(repo.get_item(5).unwrap().is_none());
}

#[test]
fn list_with_limit_returns_first_items_by_id() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::sqlite(&conn).unwrap();
    let first = service.create_item(Some("a".to_string()), None).unwrap();
    let second = service.create_item(Some("b".to_string()), None).unwrap();
    service.create_item(Some("c".to_string()), None).unwrap();

    let page = service
        .list_items(&ListQuery {
            limit: Some(2),
            offset: 0,
        })
        .unwrap();
    assert_eq!(page, vec![first, second]);
}
