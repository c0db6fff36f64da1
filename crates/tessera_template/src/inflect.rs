//! Word transformations used by template placeholders.

use inflector::Inflector;

/// Convert a type name to snake case.
///
/// # Examples
///
/// ```
/// use tessera_template::snake_case;
///
/// assert_eq!(snake_case("UserProfile"), "user_profile");
/// assert_eq!(snake_case("Product Image"), "product_image");
/// ```
pub fn snake_case(name: &str) -> String {
    name.trim().to_snake_case()
}

/// Pluralise the last word of a snake cased name.
///
/// # Examples
///
/// ```
/// use tessera_template::pluralize;
///
/// assert_eq!(pluralize("user_profile"), "user_profiles");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("person"), "people");
/// ```
pub fn pluralize(name: &str) -> String {
    match name.rsplit_once('_') {
        Some((prefix, word)) if !word.is_empty() => format!("{}_{}", prefix, word.to_plural()),
        _ if name.is_empty() => String::new(),
        _ => name.to_plural(),
    }
}

/// Lowercase URL-safe slug: words joined by `-`.
///
/// # Examples
///
/// ```
/// use tessera_template::slugify;
///
/// assert_eq!(slugify("My Summer  Photo"), "my-summer-photo");
/// assert_eq!(slugify("__init__"), "init");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_kebab_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_keeps_prefix() {
        assert_eq!(pluralize("sales_person"), "sales_people");
        assert_eq!(pluralize("media_library"), "media_libraries");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("news_series"), "news_series");
    }

    #[test]
    fn slug_joins_words() {
        assert_eq!(slugify("My+File"), "my-file");
        assert_eq!(slugify("summer holiday"), "summer-holiday");
    }
}
