//! Value Objects
//!
//! Validated pieces of a recipe. Constructors return an [`AppError`] whose
//! message is reported under the field being parsed.

use std::collections::HashSet;

use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{IngredientId, TagId};
use platform::crypto::from_base64;
use serde::Serialize;

pub const RECIPE_NAME_MAX_LENGTH: usize = 200;

const MIN_VALUE_MESSAGE: &str = "Ensure this value is greater than or equal to 1.";
const BLANK_MESSAGE: &str = "This field may not be blank.";

/// Recipe title, unique per author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecipeName(String);

impl RecipeName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::bad_request(BLANK_MESSAGE));
        }
        if name.chars().count() > RECIPE_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Ensure this field has no more than {RECIPE_NAME_MAX_LENGTH} characters."
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cooking instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecipeText(String);

impl RecipeText {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let text = raw.into();
        if text.trim().is_empty() {
            return Err(AppError::bad_request(BLANK_MESSAGE));
        }
        Ok(Self(text))
    }

    pub fn from_db(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Picture as a `data:image/<type>;base64,<payload>` URL
///
/// Stored as submitted; the payload must decode to a non-empty byte string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecipeImage(String);

impl RecipeImage {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        let invalid = || {
            AppError::bad_request(
                "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
            )
        };

        let (header, payload) = raw
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(invalid)?;
        let subtype = header
            .strip_suffix(";base64")
            .and_then(|mime| mime.strip_prefix("image/"))
            .ok_or_else(invalid)?;
        if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric() || "+.-".contains(c)) {
            return Err(invalid());
        }

        let bytes = from_base64(payload.trim()).map_err(|_| invalid())?;
        if bytes.is_empty() {
            return Err(invalid());
        }

        Ok(Self(raw))
    }

    pub fn from_db(image: impl Into<String>) -> Self {
        Self(image.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Minutes of cooking, at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CookingTime(i32);

impl CookingTime {
    pub fn new(minutes: i64) -> AppResult<Self> {
        positive(minutes).map(Self)
    }

    pub fn from_db(minutes: i32) -> Self {
        Self(minutes)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Quantity of one ingredient, at least one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amount(i32);

impl Amount {
    pub fn new(amount: i64) -> AppResult<Self> {
        positive(amount).map(Self)
    }

    pub fn from_db(amount: i32) -> Self {
        Self(amount)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

fn positive(value: i64) -> AppResult<i32> {
    if value < 1 {
        return Err(AppError::bad_request(MIN_VALUE_MESSAGE));
    }
    i32::try_from(value).map_err(|_| {
        AppError::bad_request(format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        ))
    })
}

/// Non-empty set of distinct tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet(Vec<TagId>);

impl TagSet {
    pub fn new(ids: Vec<i64>) -> AppResult<Self> {
        if ids.is_empty() {
            return Err(AppError::bad_request("At least one tag is required."));
        }
        let mut seen = HashSet::new();
        if !ids.iter().all(|id| seen.insert(*id)) {
            return Err(AppError::bad_request("Tags must not repeat."));
        }

        Ok(Self(ids.into_iter().map(TagId::from_raw).collect()))
    }

    pub fn from_db(ids: Vec<TagId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[TagId] {
        &self.0
    }
}

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngredientAmount {
    pub id: IngredientId,
    pub amount: Amount,
}

/// Non-empty ingredient list without repeated ingredients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientList(Vec<IngredientAmount>);

impl IngredientList {
    /// Build from `(ingredient id, amount)` pairs
    pub fn new(lines: Vec<(i64, i64)>) -> AppResult<Self> {
        if lines.is_empty() {
            return Err(AppError::bad_request("At least one ingredient is required."));
        }
        let mut seen = HashSet::new();
        if !lines.iter().all(|(id, _)| seen.insert(*id)) {
            return Err(AppError::bad_request("Ingredients must not repeat."));
        }

        lines
            .into_iter()
            .map(|(id, amount)| {
                Ok(IngredientAmount {
                    id: IngredientId::from_raw(id),
                    amount: Amount::new(amount)?,
                })
            })
            .collect::<AppResult<Vec<_>>>()
            .map(Self)
    }

    pub fn from_db(lines: Vec<IngredientAmount>) -> Self {
        Self(lines)
    }

    pub fn lines(&self) -> &[IngredientAmount] {
        &self.0
    }

    pub fn ids(&self) -> Vec<IngredientId> {
        self.0.iter().map(|line| line.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_name_bounds() {
        assert_eq!(RecipeName::new("  Borscht ").unwrap().as_str(), "Borscht");
        assert!(RecipeName::new("   ").is_err());
        assert!(RecipeName::new("x".repeat(200)).is_ok());
        assert!(RecipeName::new("x".repeat(201)).is_err());
    }

    #[test]
    fn test_image_data_url() {
        assert!(RecipeImage::new("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(RecipeImage::new("data:image/svg+xml;base64,PHN2Zy8+").is_ok());

        assert!(RecipeImage::new("https://example.com/cat.png").is_err());
        assert!(RecipeImage::new("data:text/plain;base64,aGk=").is_err());
        assert!(RecipeImage::new("data:image/png,raw-bytes").is_err());
        assert!(RecipeImage::new("data:image/png;base64,@@@").is_err());
        assert!(RecipeImage::new("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_positive_numbers() {
        assert_eq!(CookingTime::new(15).unwrap().get(), 15);
        assert!(CookingTime::new(0).is_err());
        assert!(Amount::new(-3).is_err());
        assert!(Amount::new(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_tag_set() {
        assert_eq!(TagSet::new(vec![2, 1]).unwrap().ids().len(), 2);
        assert!(TagSet::new(vec![]).is_err());
        assert_eq!(
            TagSet::new(vec![1, 1]).unwrap_err().message(),
            "Tags must not repeat."
        );
    }

    #[test]
    fn test_ingredient_list() {
        let list = IngredientList::new(vec![(1, 2), (3, 4)]).unwrap();
        assert_eq!(list.ids(), vec![IngredientId::from_raw(1), IngredientId::from_raw(3)]);

        assert!(IngredientList::new(vec![]).is_err());
        assert!(IngredientList::new(vec![(1, 2), (1, 5)]).is_err());
        assert_eq!(
            IngredientList::new(vec![(1, 0)]).unwrap_err().message(),
            MIN_VALUE_MESSAGE
        );
    }
}
