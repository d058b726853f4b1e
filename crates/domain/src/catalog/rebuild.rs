//! Denormalization of products against the category collection.

use crate::{Category, Product};

/// Multiplier applied to every non-zero price when a product is rebuilt.
pub const PRICE_MARKUP: f64 = 1.5;

/// Rebuilds one product for display.
///
/// - `price` is multiplied by [`PRICE_MARKUP`]; a zero or NaN price becomes `0`
/// - `category` is the name of the category whose id equals `category_id`,
///   or `None` when there is no such category
/// - `search_key` is `[product_name]`
///
/// Total: never fails, whatever the category collection contains.
pub fn rebuild_product(product: &Product, categories: &[Category]) -> Product {
    let category = product.category_id.and_then(|id| {
        categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.clone())
    });
    Product {
        price: marked_up(product.price),
        category,
        search_key: vec![product.product_name.clone()],
        ..product.clone()
    }
}

/// Rebuilds every product, preserving order.
pub fn rebuild_all(products: &[Product], categories: &[Category]) -> Vec<Product> {
    products
        .iter()
        .map(|product| rebuild_product(product, categories))
        .collect()
}

fn marked_up(price: f64) -> f64 {
    if price == 0.0 || price.is_nan() {
        0.0
    } else {
        price * PRICE_MARKUP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::CategoryId;

    fn categories() -> Vec<Category> {
        vec![Category::new(1, "Garden"), Category::new(3, "Toolbox")]
    }

    #[test]
    fn test_category_name_is_joined_by_id() {
        let hammer = Product::new(5, "Hammer", "TBX-0048").in_category(3);
        let rebuilt = rebuild_product(&hammer, &categories());
        assert_eq!(rebuilt.category.as_deref(), Some("Toolbox"));
    }

    #[test]
    fn test_unmatched_or_missing_category_is_none() {
        let orphan = Product::new(9, "Orphan", "X-1").in_category(99);
        assert_eq!(rebuild_product(&orphan, &categories()).category, None);

        let uncategorized = Product::new(10, "Loose", "X-2");
        assert_eq!(rebuild_product(&uncategorized, &categories()).category, None);
    }

    #[test]
    fn test_stale_category_in_payload_is_replaced() {
        let mut product = Product::new(1, "Rake", "GDN-0011").in_category(1);
        product.category = Some("Outdated".to_string());

        assert_eq!(
            rebuild_product(&product, &categories()).category.as_deref(),
            Some("Garden")
        );
        assert_eq!(rebuild_product(&product, &[]).category, None);
    }

    #[test]
    fn test_price_is_marked_up_unless_zero() {
        let cases = [(0.0, 0.0), (10.0, 15.0), (8.9, 8.9 * 1.5), (f64::NAN, 0.0)];
        for (input, expected) in cases {
            let product = Product::new(1, "Item", "I-1").with_price(input);
            assert_eq!(rebuild_product(&product, &[]).price, expected, "price {input}");
        }
    }

    #[test]
    fn test_search_key_is_product_name() {
        let product = Product::new(2, "Garden Cart", "GDN-0023");
        assert_eq!(
            rebuild_product(&product, &[]).search_key,
            vec!["Garden Cart".to_string()]
        );
    }

    #[test]
    fn test_rebuild_keeps_identity_and_order() {
        let products = vec![
            Product::new(2, "Cart", "GDN-0023").in_category(1),
            Product::new(1, "Rake", "GDN-0011").in_category(1),
        ];
        let rebuilt = rebuild_all(&products, &categories());

        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt[0].id, products[0].id);
        assert_eq!(rebuilt[1].category_id, Some(CategoryId::new(1)));
    }
}
