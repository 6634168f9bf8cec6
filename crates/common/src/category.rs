/// Separator between the category prefix and the rest of a vertex name.
pub const CATEGORY_SEPARATOR: char = '-';

/// Derives a vertex category from its name.
///
/// Vertex names follow the `<CATEGORY>-<identifier>` convention, e.g. `PJ-00012`
/// for a legal entity or `PF-301` for a person. The category is everything before
/// the first separator; a name without a separator is its own category.
pub fn category_of(name: &str) -> &str {
    name.split(CATEGORY_SEPARATOR).next().unwrap_or(name)
}
