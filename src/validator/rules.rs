//! Pure per-rule checks generated validator code calls into. Each
//! function takes already-stringified input; the macro expansion is
//! responsible for turning a field's real type into the `&str`/`f64`/slice
//! shape these expect.

use regex::Regex;

/// `pattern:<regex>`, an anchored whole-segment match, the same anchoring
/// convention the pattern compiler uses for path parameters.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(re) => re.is_match(value),
        Err(_) => false,
    }
}

/// `enum:<v1>|<v2>...`, membership in the pipe-separated set.
pub fn in_enum(value: &str, choices: &str) -> bool {
    choices.split('|').any(|choice| choice == value)
}

/// `format:<kind>`, one of the built-in format validators.
pub fn matches_format(value: &str, kind: &str) -> bool {
    match kind {
        "email" => is_email(value),
        "url" => is_url(value),
        "uuid" => is_uuid(value),
        "date-time" => is_date_time(value),
        "date" => is_date(value),
        "time" => is_time(value),
        "password" => value.chars().count() >= 8,
        "phone" => is_phone(value),
        "alphanumeric" => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()),
        "alpha" => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
        "numeric" => !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

pub fn is_multiple_of(value: f64, divisor: f64) -> bool {
    if divisor == 0.0 {
        return false;
    }
    let quotient = value / divisor;
    (quotient - quotient.round()).abs() < 1e-9
}

pub fn has_unique_items(items: &[String]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item.as_str()))
}

/// A deliberately simplified subset of RFC-5322 mailbox-address form:
/// one `@`, a non-empty local part and domain, and at least one `.` in the
/// domain. It does not accept quoted local parts (`"john doe"@example.com`)
/// or IP-literal domains (`user@[192.168.1.1]`), and it does not reject
/// every malformed local/domain part RFC-5322 would — same spirit as the
/// `url`/`uuid` checks below, a practical rather than bit-exact parser.
fn is_email(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    }
    EMAIL.is_match(value)
}

/// An absolute URI with a non-empty scheme and host. Deliberately
/// not a full RFC-3986 parser, just enough to reject relative references
/// and scheme-only/host-less strings.
fn is_url(value: &str) -> bool {
    let (scheme, rest) = match value.split_once("://") {
        Some(parts) => parts,
        None => return false,
    };

    let scheme_ok = !scheme.is_empty()
        && scheme.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '.' || c == '-');

    let host = rest.split(&['/', '?', '#'][..]).next().unwrap_or("");
    let host = host.rsplit('@').next().unwrap_or(host);

    scheme_ok && !host.is_empty()
}

fn is_uuid(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref UUID: Regex =
            Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$")
                .unwrap();
    }
    UUID.is_match(value)
}

fn is_date_time(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref DATE_TIME: Regex =
            Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$").unwrap();
    }
    DATE_TIME.is_match(value)
}

fn is_date(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    }
    DATE.is_match(value)
}

fn is_time(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref TIME: Regex = Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap();
    }
    TIME.is_match(value)
}

fn is_phone(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref PHONE: Regex = Regex::new(r"^[+]?[1-9][\d\s\-\(\)]{7,15}$").unwrap();
    }
    PHONE.is_match(value)
}
