// ── Favorite input validation ──
//
// User-supplied favorite fields are checked here, before anything touches
// the cache or the store.

use super::mac::MacAddress;
use crate::error::CoreError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A validated request to create a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavorite {
    pub mac: MacAddress,
    pub name: String,
    pub description: Option<String>,
}

impl NewFavorite {
    pub fn parse(mac: &str, name: &str, description: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            mac: MacAddress::parse(mac)?,
            name: validate_name(name)?,
            description: validate_description(description)?,
        })
    }
}

/// A validated partial edit of an existing favorite.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteUpdate {
    pub mac: Option<MacAddress>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl FavoriteUpdate {
    pub fn parse(
        mac: Option<&str>,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            mac: mac.map(MacAddress::parse).transpose()?,
            name: name.map(validate_name).transpose()?,
            description: description
                .map(|d| validate_description(Some(d)))
                .transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.mac.is_none() && self.name.is_none() && self.description.is_none()
    }
}

/// Trimmed, non-empty, at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation {
            field: "name".into(),
            reason: "must not be empty".into(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation {
            field: "name".into(),
            reason: format!("must be at most {MAX_NAME_LEN} characters"),
        });
    }
    Ok(name.to_owned())
}

/// Trimmed; empty becomes `None`; at most [`MAX_DESCRIPTION_LEN`] characters.
pub fn validate_description(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(description) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation {
            field: "description".into(),
            reason: format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        });
    }
    Ok(Some(description.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_favorite() {
        let fav = NewFavorite::parse("AA:BB:CC:DD:EE:FF", "  NAS ", Some("rack")).unwrap();
        assert_eq!(fav.mac.as_str(), "aabbccddeeff");
        assert_eq!(fav.name, "NAS");
        assert_eq!(fav.description.as_deref(), Some("rack"));
    }

    #[test]
    fn rejects_bad_mac_as_validation_error() {
        let err = NewFavorite::parse("aa:bb", "NAS", None).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "mac"));
    }

    #[test]
    fn rejects_blank_and_oversized_names() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert_eq!(validate_name(&"x".repeat(MAX_NAME_LEN)).unwrap().len(), MAX_NAME_LEN);
    }

    #[test]
    fn blank_description_is_none() {
        assert_eq!(validate_description(Some("  ")).unwrap(), None);
        assert_eq!(validate_description(None).unwrap(), None);
        assert!(validate_description(Some(&"d".repeat(MAX_DESCRIPTION_LEN + 1))).is_err());
    }

    #[test]
    fn update_with_empty_description_clears_it() {
        let update = FavoriteUpdate::parse(None, None, Some("")).unwrap();
        assert_eq!(update.description, Some(None));
        assert!(!update.is_empty());
        assert!(FavoriteUpdate::default().is_empty());
    }
}
