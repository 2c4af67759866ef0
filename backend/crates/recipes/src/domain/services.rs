//! Domain Services
//!
//! Shopping list aggregation and its plain-text rendering.

use std::collections::HashMap;

/// Body served when the cart holds no recipes
pub const EMPTY_CART_MESSAGE: &str = "Your shopping cart is empty";

/// First line of a non-empty shopping list
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// Amount of one ingredient needed, in its unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Ingredients of every recipe in a cart, grouped by (name, unit)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingItem>,
}

impl ShoppingList {
    /// Sum amounts per (name, unit)
    ///
    /// Groups keep the position of their first item, so the list follows the
    /// order the repository returned.
    pub fn aggregate(items: impl IntoIterator<Item = ShoppingItem>) -> Self {
        let mut merged: Vec<ShoppingItem> = Vec::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for item in items {
            let key = (item.name.clone(), item.measurement_unit.clone());
            match positions.get(&key) {
                Some(&at) => merged[at].amount += item.amount,
                None => {
                    positions.insert(key, merged.len());
                    merged.push(item);
                }
            }
        }

        Self { items: merged }
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Text of the downloadable file
    pub fn render(&self) -> String {
        if self.is_empty() {
            return EMPTY_CART_MESSAGE.to_string();
        }

        let mut text = format!("{SHOPPING_LIST_HEADER}\n");
        for item in &self.items {
            text.push_str(&format!(
                "{}: {} {}\n",
                item.name, item.amount, item.measurement_unit
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, amount: i64) -> ShoppingItem {
        ShoppingItem {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_empty_cart_message() {
        let list = ShoppingList::aggregate(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render(), EMPTY_CART_MESSAGE);
    }

    #[test]
    fn test_sums_same_ingredient_and_unit() {
        let list = ShoppingList::aggregate(vec![item("eggs", "pcs", 2), item("eggs", "pcs", 3)]);
        assert_eq!(list.render(), "Shopping list:\neggs: 5 pcs\n");
    }

    #[test]
    fn test_units_kept_apart() {
        let list = ShoppingList::aggregate(vec![
            item("milk", "cup", 1),
            item("milk", "ml", 200),
            item("sugar", "g", 100),
            item("sugar", "g", 50),
        ]);

        let lines: Vec<_> = list.render().lines().map(str::to_owned).collect();
        assert_eq!(
            lines,
            vec![
                "Shopping list:",
                "milk: 1 cup",
                "milk: 200 ml",
                "sugar: 150 g",
            ]
        );
    }

    #[test]
    fn test_keeps_repository_order() {
        let list = ShoppingList::aggregate(vec![
            item("apple", "pcs", 2),
            item("Zucchini", "pcs", 1),
            item("apple", "pcs", 3),
        ]);

        let names: Vec<_> = list.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Zucchini"]);
        assert_eq!(list.items()[0].amount, 5);
    }
}
