//! Budget name handling
//!
//! Names are compared case-insensitively. The direct budget path only warns
//! about a collision; the auto-budget path picks the next free `"Name (N)"`.

/// Longest budget name that will be stored
pub const MAX_NAME_LEN: usize = 100;

/// Clean up a user-supplied budget name
///
/// Drops control characters and angle brackets, collapses runs of
/// whitespace, and caps the length.
pub fn sanitize_budget_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .filter(|c| *c != '<' && *c != '>')
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}

/// Case-insensitive name comparison
pub fn names_collide(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Whether `name` collides with any of `existing`
pub fn has_collision<'a, I>(name: &str, existing: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    existing.into_iter().any(|other| names_collide(name, other))
}

/// `base` if it is free, otherwise `"base (N)"` for the smallest free N >= 1
///
/// The base is shortened as needed so the suffixed name stays within
/// `MAX_NAME_LEN` characters.
pub fn resolve_unique_name(base: &str, existing: &[&str]) -> String {
    if !has_collision(base, existing.iter().copied()) {
        return base.to_string();
    }

    (1..)
        .map(|n| with_suffix(base, n))
        .find(|candidate| !has_collision(candidate, existing.iter().copied()))
        .unwrap_or_else(|| base.to_string())
}

fn with_suffix(base: &str, n: u32) -> String {
    let suffix = format!(" ({})", n);
    let room = MAX_NAME_LEN.saturating_sub(suffix.chars().count());
    let trimmed: String = base.chars().take(room).collect();
    format!("{}{}", trimmed.trim_end(), suffix)
}
