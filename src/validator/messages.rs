//! Localized message catalog. Supported keys: `en, es, fr, de,
//! nl`; anything else falls back to English. Each function mirrors one
//! `#[validate(...)]` tag's default message.

const SUPPORTED: &[&str] = &["en", "es", "fr", "de", "nl"];

fn normalize_locale(locale: &str) -> &str {
    let lower = locale.trim();
    SUPPORTED
        .iter()
        .copied()
        .find(|key| key.eq_ignore_ascii_case(lower))
        .unwrap_or("en")
}

/// Simplified `Accept-Language` parsing: take the first well-formed
/// language subtag (ignoring quality values) that matches a known catalog
/// key, else fall back to English.
pub fn parse_accept_language(header: &str) -> String {
    for candidate in header.split(',') {
        let primary = candidate.split(';').next().unwrap_or("").trim();
        let primary = primary.split('-').next().unwrap_or("").trim().to_ascii_lowercase();
        if SUPPORTED.contains(&primary.as_str()) {
            return primary;
        }
    }
    "en".to_string()
}

pub fn minlength(locale: &str, field: &str, n: usize) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} debe tener al menos {} caracteres", field, n),
        "fr" => format!("{} doit contenir au moins {} caractères", field, n),
        "de" => format!("{} muss mindestens {} Zeichen lang sein", field, n),
        "nl" => format!("{} moet ten minste {} tekens bevatten", field, n),
        _ => format!("{} must be at least {} characters", field, n),
    }
}

pub fn maxlength(locale: &str, field: &str, n: usize) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} no debe tener más de {} caracteres", field, n),
        "fr" => format!("{} ne doit pas dépasser {} caractères", field, n),
        "de" => format!("{} darf höchstens {} Zeichen haben", field, n),
        "nl" => format!("{} mag niet langer zijn dan {} tekens", field, n),
        _ => format!("{} must be at most {} characters", field, n),
    }
}

pub fn pattern(locale: &str, field: &str) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} tiene un formato inválido", field),
        "fr" => format!("{} a un format invalide", field),
        "de" => format!("{} hat ein ungültiges Format", field),
        "nl" => format!("{} heeft een ongeldig formaat", field),
        _ => format!("{} has an invalid format", field),
    }
}

pub fn enumerate(locale: &str, field: &str, choices: &str) -> String {
    let choices = choices.replace('|', ", ");
    match normalize_locale(locale) {
        "es" => format!("{} debe ser uno de: {}", field, choices),
        "fr" => format!("{} doit être l'un de : {}", field, choices),
        "de" => format!("{} muss einer der folgenden Werte sein: {}", field, choices),
        "nl" => format!("{} moet een van de volgende zijn: {}", field, choices),
        _ => format!("{} must be one of: {}", field, choices),
    }
}

pub fn format(locale: &str, field: &str, kind: &str) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} debe ser un/a {} válido/a", field, kind),
        "fr" => format!("{} doit être un(e) {} valide", field, kind),
        "de" => format!("{} muss ein gültiges {} sein", field, kind),
        "nl" => format!("{} moet een geldige {} zijn", field, kind),
        _ => format!("{} must be a valid {}", field, kind),
    }
}

pub fn min(locale: &str, field: &str, n: f64) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} debe ser al menos {}", field, n),
        "fr" => format!("{} doit être au moins {}", field, n),
        "de" => format!("{} muss mindestens {} sein", field, n),
        "nl" => format!("{} moet ten minste {} zijn", field, n),
        _ => format!("{} must be at least {}", field, n),
    }
}

pub fn max(locale: &str, field: &str, n: f64) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} no debe ser mayor que {}", field, n),
        "fr" => format!("{} ne doit pas dépasser {}", field, n),
        "de" => format!("{} darf höchstens {} sein", field, n),
        "nl" => format!("{} mag niet groter zijn dan {}", field, n),
        _ => format!("{} must be at most {}", field, n),
    }
}

pub fn multiple_of(locale: &str, field: &str, n: f64) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} debe ser múltiplo de {}", field, n),
        "fr" => format!("{} doit être un multiple de {}", field, n),
        "de" => format!("{} muss ein Vielfaches von {} sein", field, n),
        "nl" => format!("{} moet een veelvoud van {} zijn", field, n),
        _ => format!("{} must be a multiple of {}", field, n),
    }
}

pub fn min_items(locale: &str, field: &str, n: usize) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} debe tener al menos {} elementos", field, n),
        "fr" => format!("{} doit contenir au moins {} éléments", field, n),
        "de" => format!("{} muss mindestens {} Elemente enthalten", field, n),
        "nl" => format!("{} moet ten minste {} items bevatten", field, n),
        _ => format!("{} must have at least {} items", field, n),
    }
}

pub fn max_items(locale: &str, field: &str, n: usize) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} no debe tener más de {} elementos", field, n),
        "fr" => format!("{} ne doit pas dépasser {} éléments", field, n),
        "de" => format!("{} darf höchstens {} Elemente enthalten", field, n),
        "nl" => format!("{} mag niet meer dan {} items bevatten", field, n),
        _ => format!("{} must have at most {} items", field, n),
    }
}

pub fn unique_items(locale: &str, field: &str) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} no debe contener elementos duplicados", field),
        "fr" => format!("{} ne doit pas contenir d'éléments en double", field),
        "de" => format!("{} darf keine doppelten Elemente enthalten", field),
        "nl" => format!("{} mag geen dubbele items bevatten", field),
        _ => format!("{} must not contain duplicate items", field),
    }
}

pub fn required(locale: &str, field: &str) -> String {
    match normalize_locale(locale) {
        "es" => format!("{} es obligatorio", field),
        "fr" => format!("{} est requis", field),
        "de" => format!("{} ist erforderlich", field),
        "nl" => format!("{} is verplicht", field),
        _ => format!("{} is required", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_for_unknown_locale() {
        assert_eq!(required("xx", "name"), required("en", "name"));
    }

    #[test]
    fn accept_language_picks_first_known_subtag() {
        assert_eq!(parse_accept_language("fr-CA;q=0.9, en;q=0.8"), "fr");
        assert_eq!(parse_accept_language("xx-XX, es;q=0.5"), "es");
        assert_eq!(parse_accept_language("xx-XX"), "en");
    }
}
