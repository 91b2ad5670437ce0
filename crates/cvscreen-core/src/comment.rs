//! Reviewer-comment synthesis.
//!
//! A comment is one randomly chosen base sentence for the predicted class,
//! optionally followed by up to two enhancement sentences triggered by
//! keyword matches in the resume text. The random source is injected so
//! that a fixed seed gives deterministic comments.

/// How many characters of the raw text are scanned for indicator phrases.
const SAMPLE_CHARS: usize = 1000;

/// At most this many enhancement sentences are appended to the base.
const MAX_ENHANCEMENTS: usize = 2;

/// Base templates for the recommended class (label 1).
const RECOMMENDED_TEMPLATES: [&str; 3] = [
    "Кандидат рекомендован. Профиль соответствует требованиям позиции.",
    "Резюме демонстрирует необходимые навыки и опыт для данной должности.",
    "Положительное решение. Квалификация кандидата соответствует ожиданиям.",
];

/// Base templates for every other class.
const NOT_RECOMMENDED_TEMPLATES: [&str; 3] = [
    "Кандидат не рекомендован. Недостаточное соответствие требованиям.",
    "Резюме не содержит необходимого опыта для данной позиции.",
    "Профиль кандидата не соответствует критериям отбора.",
];

/// A keyword category: if any indicator occurs as a substring of the text
/// sample, the category's sentence becomes an enhancement candidate.
struct Category {
    indicators: &'static [&'static str],
    sentence: &'static str,
}

const CATEGORIES: [Category; 4] = [
    // Work experience
    Category {
        indicators: &[
            "опыт работы",
            "лет опыта",
            "год опыта",
            "опыт в",
            "работал в",
            "занимал должность",
        ],
        sentence: "Имеет релевантный опыт работы.",
    },
    // Education
    Category {
        indicators: &[
            "высшее образование",
            "университет",
            "вуз",
            "бакалавр",
            "магистр",
            "специальность",
        ],
        sentence: "Обладает подходящим образованием.",
    },
    // Technical skills
    Category {
        indicators: &[
            "навыки",
            "владение",
            "знание",
            "умение",
            "компетенции",
            "технологии",
        ],
        sentence: "Демонстрирует необходимые технические навыки.",
    },
    // Sales background (word stems, matched as substrings)
    Category {
        indicators: &["продаж", "клиент", "менеджер", "сделк", "переговор", "презентаци"],
        sentence: "Имеет опыт в сфере продаж.",
    },
];

/// Pick a base sentence for the class uniformly at random.
pub fn base_comment(predicted_class: usize, rng: &mut fastrand::Rng) -> &'static str {
    let templates = if predicted_class == 1 {
        &RECOMMENDED_TEMPLATES
    } else {
        &NOT_RECOMMENDED_TEMPLATES
    };
    templates[rng.usize(..templates.len())]
}

/// Fixed single-sentence default per class, used if no template applies.
pub fn fallback_comment(predicted_class: usize) -> &'static str {
    if predicted_class == 1 {
        "Кандидат рекомендован к рассмотрению."
    } else {
        "Кандидат не рекомендован к рассмотрению."
    }
}

/// Synthesize the full comment for a resume.
///
/// The enhancement scan runs over the lowercased first [`SAMPLE_CHARS`]
/// characters of the *raw* (not cleaned) text, so that multi-word phrases
/// like "опыт работы" survive. Matched sentences are shuffled and at most
/// [`MAX_ENHANCEMENTS`] are kept.
pub fn synthesize_comment(
    raw_text: &str,
    predicted_class: usize,
    rng: &mut fastrand::Rng,
) -> String {
    let base = base_comment(predicted_class, rng);

    let sample: String = raw_text
        .chars()
        .take(SAMPLE_CHARS)
        .collect::<String>()
        .to_lowercase();

    let mut enhancements: Vec<&'static str> = CATEGORIES
        .iter()
        .filter(|cat| cat.indicators.iter().any(|ind| sample.contains(ind)))
        .map(|cat| cat.sentence)
        .collect();

    if enhancements.is_empty() {
        return base.to_string();
    }

    rng.shuffle(&mut enhancements);
    enhancements.truncate(MAX_ENHANCEMENTS);

    format!("{} {}", base, enhancements.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(42)
    }

    #[test]
    fn no_matches_yields_a_bare_base_sentence() {
        let mut rng = rng();
        for class in [0usize, 1] {
            let templates: &[&str] = if class == 1 {
                &RECOMMENDED_TEMPLATES
            } else {
                &NOT_RECOMMENDED_TEMPLATES
            };
            for _ in 0..20 {
                let comment = synthesize_comment("ничего интересного здесь нет", class, &mut rng);
                assert!(templates.contains(&comment.as_str()), "unexpected: {comment}");
            }
        }
    }

    #[test]
    fn experience_phrase_adds_experience_sentence() {
        let mut rng = rng();
        let comment = synthesize_comment("Опыт работы: 5 лет в компании", 1, &mut rng);
        assert!(comment.contains("Имеет релевантный опыт работы."));
    }

    #[test]
    fn matching_is_case_insensitive_on_the_sample() {
        let mut rng = rng();
        let comment = synthesize_comment("ВЫСШЕЕ ОБРАЗОВАНИЕ, МГУ", 0, &mut rng);
        assert!(comment.contains("Обладает подходящим образованием."));
    }

    #[test]
    fn at_most_two_enhancements() {
        // All four categories match; only two sentences may survive.
        let text = "опыт работы, высшее образование, навыки, продажи";
        let all: [&str; 4] = [
            "Имеет релевантный опыт работы.",
            "Обладает подходящим образованием.",
            "Демонстрирует необходимые технические навыки.",
            "Имеет опыт в сфере продаж.",
        ];
        let mut rng = rng();
        for _ in 0..50 {
            let comment = synthesize_comment(text, 1, &mut rng);
            let appended = all.iter().filter(|s| comment.contains(*s)).count();
            assert_eq!(appended, 2, "comment: {comment}");
        }
    }

    #[test]
    fn indicators_beyond_the_sample_window_are_ignored() {
        let mut padding = "а ".repeat(600); // 1200 chars of filler
        padding.push_str("высшее образование");
        let mut rng = rng();
        let comment = synthesize_comment(&padding, 1, &mut rng);
        assert!(!comment.contains("Обладает подходящим образованием."));
    }

    #[test]
    fn deterministic_under_a_fixed_seed() {
        let text = "опыт работы и высшее образование и навыки продаж";
        let a = synthesize_comment(text, 1, &mut fastrand::Rng::with_seed(7));
        let b = synthesize_comment(text, 1, &mut fastrand::Rng::with_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_comments_are_class_specific() {
        assert_ne!(fallback_comment(0), fallback_comment(1));
    }
}
