#![forbid(unsafe_code)]

//! Type-prefix table for Hungarian notation
//!
//! Maps the canonical spelling of a primitive type to its notation prefix.
//! A declared identifier's required prefix is composed as
//! `"p"` (pointer) + `"a"` (array) + base prefix.

/// Canonical type spelling and its base prefix
const PREFIX_TABLE: &[(&str, &str)] = &[
    ("short", "si"),
    ("signed char", "c"),
    ("char", "c"),
    ("unsigned short int", "usi"),
    ("unsigned char", "uc"),
    ("int", "i"),
    ("float", "f"),
    ("unsigned int", "ui"),
    ("double", "d"),
    ("long int", "li"),
    ("long double", "ld"),
    ("_Bool", "b"),
    ("long long int", "lli"),
    ("unsigned long long int", "ulli"),
    ("void", "v"),
];

/// Alternate spellings folded onto a canonical entry
const ALIASES: &[(&str, &str)] = &[
    ("short int", "short"),
    ("signed short", "short"),
    ("signed short int", "short"),
    ("unsigned short", "unsigned short int"),
    ("signed", "int"),
    ("signed int", "int"),
    ("unsigned", "unsigned int"),
    ("long", "long int"),
    ("signed long", "long int"),
    ("signed long int", "long int"),
    ("long long", "long long int"),
    ("signed long long", "long long int"),
    ("signed long long int", "long long int"),
    ("unsigned long long", "unsigned long long int"),
    ("bool", "_Bool"),
];

/// Storage classes and qualifiers that do not change the prefix
const QUALIFIERS: &[&str] = &[
    "static", "extern", "const", "volatile", "register", "auto", "inline", "restrict",
];

pub fn is_qualifier(word: &str) -> bool {
    QUALIFIERS.contains(&word)
}

/// True for words that belong to a primitive type spelling
pub fn is_type_keyword(word: &str) -> bool {
    matches!(
        word,
        "char" | "short" | "int" | "long" | "float" | "double" | "void" | "signed" | "unsigned"
            | "_Bool" | "bool"
    )
}

/// Normalizes a declared type spelling
///
/// Drops qualifiers, collapses whitespace and folds aliases, so
/// `"static const long"` becomes `"long int"`.
pub fn canonical_type(spelling: &str) -> String {
    let joined = spelling
        .split_whitespace()
        .filter(|word| !is_qualifier(word))
        .collect::<Vec<_>>()
        .join(" ");

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == joined)
        .map_or(joined, |(_, canonical)| (*canonical).to_string())
}

/// Base prefix for a type spelling, or None if the type is not in the table
pub fn base_prefix(spelling: &str) -> Option<&'static str> {
    let canonical = canonical_type(spelling);
    PREFIX_TABLE
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, prefix)| *prefix)
}

/// Composes the required prefix from the base prefix and declarator modifiers
pub fn compose_prefix(base: &str, pointer: bool, array: bool) -> String {
    let mut prefix = String::with_capacity(base.len() + 2);
    if pointer {
        prefix.push('p');
    }
    if array {
        prefix.push('a');
    }
    prefix.push_str(base);
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_prefixes() {
        assert_eq!(base_prefix("int"), Some("i"));
        assert_eq!(base_prefix("unsigned long long int"), Some("ulli"));
        assert_eq!(base_prefix("long double"), Some("ld"));
        assert_eq!(base_prefix("_Bool"), Some("b"));
        assert_eq!(base_prefix("sMonthlySalary_t"), None);
    }

    #[test]
    fn test_aliases_and_qualifiers() {
        assert_eq!(canonical_type("static const long"), "long int");
        assert_eq!(canonical_type("unsigned"), "unsigned int");
        assert_eq!(base_prefix("const   unsigned  char"), Some("uc"));
        assert_eq!(base_prefix("bool"), Some("b"));
        assert_eq!(base_prefix("short int"), Some("si"));
    }

    #[test]
    fn test_compose_prefix() {
        assert_eq!(compose_prefix("i", false, false), "i");
        assert_eq!(compose_prefix("c", true, false), "pc");
        assert_eq!(compose_prefix("f", false, true), "af");
        assert_eq!(compose_prefix("d", true, true), "pad");
    }
}
