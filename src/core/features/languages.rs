//! Target languages the translation server has dictionaries for.

use crate::shared::settings::LanguageOption;

const LANGUAGES: &[(&str, &str)] = &[
    ("bemba", "Bemba"),
    ("nyanja", "Nyanja"),
    ("tonga", "Tonga"),
    ("lozi", "Lozi"),
    ("kaonde", "Kaonde"),
    ("luvale", "Luvale"),
    ("lunda", "Lunda"),
];

pub fn default_catalogue() -> Vec<LanguageOption> {
    LANGUAGES
        .iter()
        .map(|(code, name)| LanguageOption::new(code, name))
        .collect()
}

pub fn display_name<'a>(options: &'a [LanguageOption], code: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|opt| opt.code == code)
        .map(|opt| opt.name.as_str())
}
