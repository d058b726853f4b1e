//! Demo collections served when no backend is configured.

use serde_json::{Value, json};

use crate::{InMemoryFetcher, paths};

/// Builds an in-memory backend holding the demo catalog.
pub fn demo_fetcher() -> InMemoryFetcher {
    let fetcher = InMemoryFetcher::new();
    fetcher.set_collection(paths::PRODUCTS, products());
    fetcher.set_collection(paths::CATEGORIES, categories());
    fetcher.set_collection(paths::SUPPLIERS, suppliers());
    fetcher
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "productName": "Leaf Rake",
            "productCode": "GDN-0011",
            "description": "Leaf rake with 48-inch wooden handle",
            "price": 19.95,
            "categoryId": 1,
            "quantityInStock": 15,
            "supplierIds": [1, 2]
        }),
        json!({
            "id": 2,
            "productName": "Garden Cart",
            "productCode": "GDN-0023",
            "description": "15 gallon capacity rolling garden cart",
            "price": 32.99,
            "categoryId": 1,
            "quantityInStock": 2,
            "supplierIds": [3, 4]
        }),
        json!({
            "id": 5,
            "productName": "Hammer",
            "productCode": "TBX-0048",
            "description": "Curved claw steel hammer",
            "price": 8.9,
            "categoryId": 3,
            "quantityInStock": 8,
            "supplierIds": [5, 6]
        }),
        json!({
            "id": 8,
            "productName": "Saw",
            "productCode": "TBX-0022",
            "description": "15-inch steel blade hand saw",
            "price": 11.55,
            "categoryId": 3,
            "quantityInStock": 6,
            "supplierIds": [7, 8]
        }),
        json!({
            "id": 10,
            "productName": "Video Game Controller",
            "productCode": "GMG-0042",
            "description": "Standard two-button video game controller",
            "price": 35.95,
            "categoryId": 5,
            "quantityInStock": 12
        }),
    ]
}

fn categories() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Garden" }),
        json!({ "id": 3, "name": "Toolbox" }),
        json!({ "id": 5, "name": "Gaming" }),
    ]
}

fn suppliers() -> Vec<Value> {
    [
        (1, "Acme Gardening Supply", 16.95, 12),
        (2, "Acme General Supply", 15.95, 24),
        (3, "Acme General Supply", 20.95, 6),
        (4, "Acme Gardening Supply", 22.95, 2),
        (5, "Acme General Supply", 4.95, 12),
        (6, "Acme Tool Supply", 4.55, 24),
        (7, "Acme Tool Supply", 8.95, 6),
        (8, "Acme General Supply", 9.55, 12),
    ]
    .into_iter()
    .map(|(id, name, cost, min_quantity)| {
        json!({ "id": id, "name": name, "cost": cost, "minQuantity": min_quantity })
    })
    .collect()
}
