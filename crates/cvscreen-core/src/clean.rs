use once_cell::sync::Lazy;
use regex::Regex;

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n").unwrap());
static LATIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw resume text into the token stream the classifier was
/// trained on: punctuation, digit runs, line breaks, and Latin letters
/// become spaces, whitespace runs collapse to a single space, and the
/// result is lowercased and trimmed.
///
/// The substitution order matches the trained preprocessing and must not
/// be reordered. Pure and deterministic; empty input yields empty output.
pub fn clean_text(text: &str) -> String {
    let text = PUNCTUATION.replace_all(text, " ");
    let text = DIGITS.replace_all(&text, " ");
    let text = LINE_BREAKS.replace_all(&text, " ");
    let text = LATIN.replace_all(&text, " ");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n\t  "), "");
    }

    #[test]
    fn strips_punctuation_digits_latin_and_newlines() {
        let cleaned = clean_text("Менеджер (Senior), опыт 10 лет!\nEmail: ivan@example.com");
        assert!(!cleaned.chars().any(|c| c.is_ascii_alphanumeric()));
        assert!(!cleaned.contains('\n'));
        assert!(!cleaned.contains(['(', ')', ',', '!', ':', '@', '.']));
        assert!(cleaned.contains("менеджер"));
        assert!(cleaned.contains("опыт"));
        assert!(cleaned.contains("лет"));
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(clean_text("опыт   работы\n\nв  продажах"), "опыт работы в продажах");
    }

    #[test]
    fn lowercases_cyrillic() {
        assert_eq!(clean_text("ОПЫТ Работы"), "опыт работы");
    }

    #[test]
    fn idempotent() {
        let once = clean_text("Опыт работы: 5 лет, отдел продаж (Москва).");
        let twice = clean_text(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn digits_only_input_becomes_empty() {
        assert_eq!(clean_text("2021 - 2024"), "");
    }
}
