//! Machine-name normalization
//!
//! Machine names typed into spreadsheets drift in case and spacing from the
//! names stored on machine records ("Mayer 34A" vs "mayer34a"). Comparison
//! happens on a normalized key: lower-cased with every whitespace character
//! removed.

/// Lower-case `name` and drop all whitespace
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when both names share a normalized key
pub fn same_machine(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
