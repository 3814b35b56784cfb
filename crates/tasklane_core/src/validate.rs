//! Pre-submission input validation. Failures stay local and never reach the
//! network; callers surface the message next to the offending input.

use crate::error::{CoreError, Result};

pub const LIST_NAME_MAX: usize = 100;
pub const ITEM_TITLE_MAX: usize = 200;
pub const ITEM_DESCRIPTION_MAX: usize = 500;

pub fn list_name(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name is required".to_string()));
    }
    if name.chars().count() > LIST_NAME_MAX {
        return Err(CoreError::Validation("Name is too long".to_string()));
    }
    Ok(())
}

pub fn item_title(title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > ITEM_TITLE_MAX {
        return Err(CoreError::Validation("Title is too long".to_string()));
    }
    Ok(())
}

pub fn item_description(description: &str) -> Result<()> {
    if description.chars().count() > ITEM_DESCRIPTION_MAX {
        return Err(CoreError::Validation("Description is too long".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_name_required() {
        assert!(list_name("groceries").is_ok());
        assert!(list_name("").is_err());
        assert!(list_name("   ").is_err());
    }

    #[test]
    fn test_list_name_length() {
        assert!(list_name(&"a".repeat(100)).is_ok());
        let err = list_name(&"a".repeat(101)).unwrap_err();
        assert_eq!(err.to_string(), "validation error: Name is too long");
    }

    #[test]
    fn test_item_title() {
        assert!(item_title("buy milk").is_ok());
        assert!(item_title("").is_err());
        assert!(item_title(&"t".repeat(200)).is_ok());
        assert!(item_title(&"t".repeat(201)).is_err());
    }

    #[test]
    fn test_item_description() {
        assert!(item_description("").is_ok());
        assert!(item_description(&"d".repeat(500)).is_ok());
        assert!(item_description(&"d".repeat(501)).is_err());
    }
}
