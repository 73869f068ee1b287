use isolang::Language;

use crate::errors::ConfigError;

/// Language utilities for the codes passed to the translation service
///
/// The service accepts ISO 639-1 codes (`en`), ISO 639-2/T codes (`eng`) and
/// region-qualified tags (`pt-BR`, `zh_Hant`), plus its own `zt` and `pb`. Only the
/// primary subtag is checked against the ISO tables; the code itself is forwarded
/// untouched.

// ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

// Codes the translation service uses outside ISO 639
const SERVICE_CODES: &[(&str, &str)] = &[
    ("zt", "Chinese (Traditional)"),
    ("pb", "Portuguese (Brazil)"),
];

fn service_code_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_lowercase();
    SERVICE_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Primary language subtag of a code, lowercased (`pt-BR` -> `pt`)
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup(code: &str) -> Option<Language> {
    let primary = primary_subtag(code);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == primary)
                .map_or(primary.as_str(), |(_, t)| t);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate that a code names a known language
pub fn validate_language_code(code: &str) -> Result<(), ConfigError> {
    if service_code_name(code).is_some() {
        return Ok(());
    }
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| ConfigError::Language(code.to_string()))
}

/// English name of the language behind a code, for log messages
pub fn get_language_name(code: &str) -> Result<String, ConfigError> {
    if let Some(name) = service_code_name(code) {
        return Ok(name.to_string());
    }
    lookup(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| ConfigError::Language(code.to_string()))
}
