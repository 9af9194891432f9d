/// Title-case each space-separated word of a canonical name for display.
pub fn display_name(canonical: &str) -> String {
    canonical
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The name a member registers with: given name, family name and graduating year.
pub fn compose_full_name(first_name: &str, second_name: &str, year: &str) -> String {
    format!(
        "{} {} - Class of {}",
        first_name.trim(),
        second_name.trim(),
        year.trim()
    )
}
