//! Recipe list filter

use kernel::id::UserId;

/// Criteria of `GET /recipes`
///
/// Tag slugs match any-of. The favorite and cart flags restrict the list to
/// the viewer's own marks and are dropped for anonymous viewers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<String>,
    pub author: Option<UserId>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

impl RecipeFilter {
    pub fn new(
        viewer: Option<UserId>,
        tags: Vec<String>,
        author: Option<UserId>,
        is_favorited: bool,
        is_in_shopping_cart: bool,
    ) -> Self {
        Self {
            tags: tags.into_iter().filter(|slug| !slug.is_empty()).collect(),
            author,
            favorited_by: viewer.filter(|_| is_favorited),
            in_cart_of: viewer.filter(|_| is_in_shopping_cart),
        }
    }
}
