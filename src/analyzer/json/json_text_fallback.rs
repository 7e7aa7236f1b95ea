use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyzer::ForJsonOptions;

static FOR_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFOR\s+JSON\b").unwrap());
static WITHOUT_ARRAY_WRAPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWITHOUT_ARRAY_WRAPPER\b").unwrap());
static ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bROOT\b(?:\s*\(\s*'([^']*)'\s*\))?").unwrap());
static INCLUDE_NULL_VALUES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bINCLUDE_NULL_VALUES\b").unwrap());

/// Reads FOR JSON options out of raw SQL text when the structured option list is incomplete.
pub struct JsonTextFallback;

impl JsonTextFallback {
    /// Text from the last `FOR JSON` onwards.
    pub fn for_json_suffix(source_text: &str) -> Option<&str> {
        FOR_JSON.find_iter(source_text).last().map(|found| &source_text[found.start()..])
    }

    /// Fills the fields the structured pass left unset; set fields are never overridden.
    pub fn fill(options: &mut ForJsonOptions, source_text: Option<&str>) {
        let mut texts = options.unparsed.clone();
        if let Some(suffix) = source_text.and_then(Self::for_json_suffix) {
            texts.push(suffix.to_string());
        }

        for text in &texts {
            if options.without_array_wrapper.is_none() && WITHOUT_ARRAY_WRAPPER.is_match(text) {
                options.without_array_wrapper = Some(true);
            }
            if options.include_null_values.is_none() && INCLUDE_NULL_VALUES.is_match(text) {
                options.include_null_values = Some(true);
            }
            if options.root_name.is_none() {
                if let Some(captures) = ROOT.captures(text) {
                    let name = captures.get(1).map_or(ForJsonOptions::DEFAULT_ROOT, |name| name.as_str());
                    options.root_name = Some(name.to_string());
                }
            }
        }
    }
}
