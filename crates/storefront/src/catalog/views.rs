//! Derived product views.
//!
//! Pure functions of a product slice; every view returns a fresh `Vec` and
//! leaves the underlying catalog untouched.

use rust_decimal::Decimal;

use clementine_core::ProductId;

use super::Product;

/// Products in the given category (case-insensitive match).
#[must_use]
pub fn by_category(products: &[Product], category: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.category.eq_ignore_ascii_case(category))
        .cloned()
        .collect()
}

/// Products whose name contains the query, case-insensitively.
///
/// An empty query matches everything.
#[must_use]
pub fn search(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Up to `limit` products sharing the category of `product_id`, excluding the
/// product itself. Unknown ids yield an empty list.
#[must_use]
pub fn related(products: &[Product], product_id: &ProductId, limit: usize) -> Vec<Product> {
    let Some(subject) = products.iter().find(|p| &p.id == product_id) else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|p| &p.id != product_id && p.category.eq_ignore_ascii_case(&subject.category))
        .take(limit)
        .cloned()
        .collect()
}

/// Up to `limit` discounted products, steepest discount first.
///
/// A product is on sale when its original price is present and strictly
/// greater than its current price.
#[must_use]
pub fn flash_sale(products: &[Product], limit: usize) -> Vec<Product> {
    let mut on_sale: Vec<(Decimal, Product)> = products
        .iter()
        .filter_map(|p| p.discount_percent().map(|d| (d, p.clone())))
        .collect();
    on_sale.sort_by(|(a, _), (b, _)| b.cmp(a));
    on_sale.into_iter().take(limit).map(|(_, p)| p).collect()
}

/// Up to `limit` products, most-reviewed first.
#[must_use]
pub fn best_selling(products: &[Product], limit: usize) -> Vec<Product> {
    let mut ranked: Vec<Product> = products.to_vec();
    ranked.sort_by(|a, b| b.reviews.cmp(&a.reviews));
    ranked.truncate(limit);
    ranked
}
