use std::collections::HashSet;

/// Display names of the ISO 639-1 codes found in the metadata
const LANGUAGE_LABELS: &[(&str, &str)] = &[
    ("AF", "Afrikaans"),
    ("AR", "Arabic"),
    ("CN", "Chinese"),
    ("CS", "Czech"),
    ("DA", "Danish"),
    ("DE", "German"),
    ("EL", "Greek"),
    ("EN", "English"),
    ("ES", "Spanish"),
    ("FA", "Persian"),
    ("FI", "Finnish"),
    ("FR", "French"),
    ("HE", "Hebrew"),
    ("HI", "Hindi"),
    ("HU", "Hungarian"),
    ("ID", "Indonesian"),
    ("IS", "Icelandic"),
    ("IT", "Italian"),
    ("JA", "Japanese"),
    ("KO", "Korean"),
    ("KY", "Kyrgyz"),
    ("NB", "Norwegian Bokmål"),
    ("NL", "Dutch"),
    ("NO", "Norwegian"),
    ("PS", "Pashto"),
    ("PL", "Polish"),
    ("PT", "Portuguese"),
    ("RO", "Romanian"),
    ("RU", "Russian"),
    ("SL", "Slovenian"),
    ("SV", "Swedish"),
    ("TA", "Tamil"),
    ("TE", "Telugu"),
    ("TH", "Thai"),
    ("TR", "Turkish"),
    ("VI", "Vietnamese"),
    ("XX", "Unknown"),
    ("ZH", "Chinese"),
];

/// Fragments that mark a spoken-language entry as studio noise
const BLOCKED_TERMS: &[&str] = &[
    "company",
    "studio",
    "pictures",
    "films",
    "entertainment",
    "partners",
    "network",
    "office",
    "television",
    "media",
    "production",
    "productions",
    "disney",
    "lawson",
    "mitsubishi",
    "vivendi",
    "film",
];

/// Human-readable label of a language code; unknown codes label as themselves
pub fn language_label(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    LANGUAGE_LABELS
        .iter()
        .find(|(c, _)| *c == upper)
        .map(|(_, label)| label.to_string())
        .unwrap_or(upper)
}

/// Cleans one spoken-language name, dropping studio noise and numbers
pub fn clean_language_name(value: &str) -> Option<String> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return None;
    }
    let lowered = cleaned.to_lowercase();
    if BLOCKED_TERMS.iter().any(|term| lowered.contains(term)) {
        return None;
    }
    if cleaned.chars().filter(|c| !c.is_whitespace()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(title_case(cleaned))
}

/// Cleans spoken languages, de-duplicating while keeping first-seen order
pub fn clean_spoken_languages<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter_map(|v| clean_language_name(v.as_ref()))
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for c in value.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}
