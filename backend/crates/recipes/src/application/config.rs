//! Application Configuration

/// Recipes application configuration
#[derive(Debug, Clone)]
pub struct RecipesConfig {
    /// Page size when `limit` is absent
    pub page_size: u32,
    /// Upper bound for `limit`
    pub max_page_size: u32,
    /// File name offered for the shopping list download
    pub shopping_list_filename: String,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            max_page_size: 100,
            shopping_list_filename: "shopping_list.txt".to_string(),
        }
    }
}

impl RecipesConfig {
    /// `Content-Disposition` value for the shopping list download
    pub fn attachment_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.shopping_list_filename)
    }
}
