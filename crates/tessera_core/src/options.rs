//! Per-field options parsed from declarative tags.

use crate::Size;
use std::collections::BTreeMap;
use tessera_error::ConfigError;

/// Key naming the storage backend.
const STORAGE: &str = "STORAGE";
/// Key overriding the URL template.
const URL: &str = "URL";
const MAX_SIZE: &str = "MAX_SIZE";
const TYPES: &str = "TYPES";
const EXTS: &str = "EXTS";
const SIZES: &str = "SIZES";

/// Case-insensitive key/value options attached to a media field.
///
/// Tags use `key:value;key:value`. A bare `key` maps to itself. List
/// values are comma separated.
///
/// # Examples
///
/// ```
/// use tessera_core::FieldOptions;
///
/// let options = FieldOptions::parse("storage:s3;url:/files/{filename};exts:jpg,png");
/// assert_eq!(options.storage(), Some("s3"));
/// assert_eq!(options.url_template(), Some("/files/{filename}"));
/// assert_eq!(
///     options.accepted_exts(),
///     Some(vec!["jpg".to_string(), "png".to_string()])
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    values: BTreeMap<String, String>,
}

impl FieldOptions {
    /// Empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a field tag.
    pub fn parse(tag: &str) -> Self {
        let mut options = Self::new();
        for setting in tag.split(';') {
            let setting = setting.trim();
            if setting.is_empty() {
                continue;
            }
            match setting.split_once(':') {
                Some((key, value)) => options.set(key.trim(), value.trim()),
                None => options.set(setting, setting),
            };
        }
        options
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_uppercase()).map(String::as_str)
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_uppercase(), value.into());
        self
    }

    /// Set a value only if the key is absent.
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(key.to_uppercase())
            .or_insert_with(|| value.into());
        self
    }

    /// Copy every value of `other` over this set.
    pub fn merge(&mut self, other: &FieldOptions) -> &mut Self {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
        self
    }

    /// Merge a parsed tag under `prefix.`, e.g. `media.storage`.
    pub fn merge_prefix(&mut self, prefix: &str, tag: &str) -> &mut Self {
        let parsed = Self::parse(tag);
        for (key, value) in parsed.values {
            self.set(&format!("{}.{}", prefix, key), value);
        }
        self
    }

    /// All values stored under `prefix.`, with the prefix removed.
    pub fn get_prefix(&self, prefix: &str) -> FieldOptions {
        let prefix = format!("{}.", prefix.to_uppercase());
        let values = self
            .values
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        FieldOptions { values }
    }

    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name of the storage backend for this field.
    pub fn storage(&self) -> Option<&str> {
        self.non_empty(STORAGE)
    }

    /// URL template override.
    pub fn url_template(&self) -> Option<&str> {
        self.non_empty(URL)
    }

    /// Maximum upload size in bytes.
    ///
    /// Accepts a plain byte count or a number with a `KB`, `MB`, `GB`
    /// (decimal) or `KiB`, `MiB`, `GiB` (binary) suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a size.
    pub fn max_size(&self) -> Result<Option<u64>, ConfigError> {
        self.non_empty(MAX_SIZE).map(parse_byte_size).transpose()
    }

    /// Accepted MIME types, lowercased.
    pub fn accepted_types(&self) -> Option<Vec<String>> {
        self.non_empty(TYPES).map(split_list)
    }

    /// Accepted extensions, lowercased and without dots.
    pub fn accepted_exts(&self) -> Option<Vec<String>> {
        self.non_empty(EXTS).map(|value| {
            split_list(value)
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect()
        })
    }

    /// Styles declared on the field, `thumb=50x50,medium=300x300`.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not `name=WIDTHxHEIGHT`.
    pub fn sizes(&self) -> Result<BTreeMap<String, Size>, ConfigError> {
        let mut sizes = BTreeMap::new();
        let Some(value) = self.non_empty(SIZES) else {
            return Ok(sizes);
        };

        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, dims) = entry.split_once('=').ok_or_else(|| {
                ConfigError::new(format!("Style size '{}' must be name=WIDTHxHEIGHT", entry))
            })?;
            sizes.insert(name.trim().to_string(), parse_size(dims.trim())?);
        }
        Ok(sizes)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_size(dims: &str) -> Result<Size, ConfigError> {
    let invalid = || ConfigError::new(format!("Invalid style size '{}'", dims));
    let (width, height) = dims
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(Size::new(width, height))
}

fn parse_byte_size(value: &str) -> Result<u64, ConfigError> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number = number
        .parse::<u64>()
        .map_err(|_| ConfigError::new(format!("Invalid max_size '{}'", value)))?;

    let multiplier: u64 = match unit.trim().to_lowercase().as_str() {
        "" | "b" => 1,
        "kb" => 1_000,
        "mb" => 1_000_000,
        "gb" => 1_000_000_000,
        "kib" => 1 << 10,
        "mib" => 1 << 20,
        "gib" => 1 << 30,
        other => {
            return Err(ConfigError::new(format!(
                "Unknown size unit '{}' in max_size '{}'",
                other, value
            )));
        }
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| ConfigError::new(format!("max_size '{}' overflows", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_sizes_with_units() {
        assert_eq!(parse_byte_size("1024").unwrap(), 1024);
        assert_eq!(parse_byte_size("2MB").unwrap(), 2_000_000);
        assert_eq!(parse_byte_size("1 MiB").unwrap(), 1_048_576);
        assert_eq!(parse_byte_size("3kib").unwrap(), 3072);
        assert!(parse_byte_size("ten").is_err());
        assert!(parse_byte_size("5 parsecs").is_err());
    }

    #[test]
    fn style_size_parsing() {
        assert_eq!(parse_size("50x40").unwrap(), Size::new(50, 40));
        assert!(parse_size("50").is_err());
        assert!(parse_size("ax1").is_err());
    }
}
