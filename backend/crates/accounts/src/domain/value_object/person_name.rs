//! Person Name
//!
//! First and last names are stored as entered (trimmed). The full name is
//! derived from them: lower-cased, then every word's first character is
//! upper-cased. A word starts at an alphanumeric or `_` character that does
//! not follow another one, so `"o'neil"` becomes `"O'Neil"`.

pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for ch in s.chars().flat_map(char::to_lowercase) {
        let is_word_char = ch.is_alphanumeric() || ch == '_';
        if is_word_char && !in_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        in_word = is_word_char;
    }

    out
}

/// `"first last"`, title-cased
pub fn full_name(first_name: &str, last_name: &str) -> String {
    title_case(&format!("{} {}", first_name, last_name))
}
