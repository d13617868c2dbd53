//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `shopreview_core` linkage and schema bootstrap.
//! - Print the review view of a seeded in-memory store as JSON.

use shopreview_core::db::open_db_in_memory;
use shopreview_core::{core_version, ping, CustomerService, ItemService, ReviewService};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("shopreview_core ping={}", ping());
    println!("shopreview_core version={}", core_version());

    let conn = open_db_in_memory()?;
    let customers = CustomerService::sqlite(&conn)?;
    let items = ItemService::sqlite(&conn)?;
    let reviews = ReviewService::sqlite(&conn)?;

    let alice = customers.create_customer(Some("Alice".to_string()))?;
    let widget = items.create_item(Some("Widget".to_string()), Some(9.99))?;
    let review =
        reviews.create_review(Some("Great!".to_string()), Some(alice.id), Some(widget.id))?;

    if let Some(view) = reviews.review_dict(review.id)? {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }
    if let Some(view) = customers.customer_dict(alice.id)? {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}
