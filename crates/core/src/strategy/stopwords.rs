//! Stopword lists for the article-model strategy.
//!
//! Prose is dense in function words while menus, captions and link lists are
//! not, so a stopword count separates body paragraphs from page chrome in any
//! language that has a list here.

use std::collections::HashSet;
use std::sync::LazyLock;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "could", "did", "do",
    "does", "doing", "down", "during", "each", "even", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "may", "me", "might", "more", "most", "much", "must", "my",
    "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

const RUSSIAN: &[&str] = &[
    "а", "без", "более", "бы", "был", "была", "были", "было", "быть", "в", "вам", "вас", "весь", "во", "вот", "все",
    "всего", "всех", "вы", "где", "да", "даже", "для", "до", "его", "ее", "её", "если", "есть", "еще", "ещё", "же",
    "за", "здесь", "и", "из", "или", "им", "их", "к", "как", "когда", "кто", "ли", "либо", "мне", "может", "мы",
    "на", "над", "надо", "наш", "не", "него", "нее", "неё", "нет", "ни", "них", "но", "ну", "о", "об", "однако",
    "он", "она", "они", "оно", "от", "очень", "по", "под", "после", "при", "про", "с", "со", "так", "также",
    "такой", "там", "те", "тем", "то", "того", "тоже", "той", "только", "том", "ты", "у", "уже", "хотя", "чего",
    "чей", "чем", "что", "чтобы", "чье", "чья", "эта", "эти", "это", "этого", "этой", "этом", "этот", "я",
];

static ENGLISH_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| ENGLISH.iter().copied().collect());
static RUSSIAN_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| RUSSIAN.iter().copied().collect());
static COMBINED_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH.iter().chain(RUSSIAN).copied().collect());

/// The list for a page's `lang` value (`"en-US"` counts as English). Unknown
/// or missing languages get every list at once.
pub fn for_language(lang: Option<&str>) -> &'static HashSet<&'static str> {
    let primary = lang.and_then(|lang| lang.split(['-', '_']).next()).map(str::to_lowercase);

    match primary.as_deref() {
        Some("en") => &*ENGLISH_SET,
        Some("ru") => &*RUSSIAN_SET,
        _ => &*COMBINED_SET,
    }
}

/// Number of words in `text` found in `stopwords`.
pub fn count(text: &str, stopwords: &HashSet<&'static str>) -> usize {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|word| !word.is_empty())
        .filter(|word| stopwords.contains(word.to_lowercase().as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_english() {
        let words = for_language(Some("en-GB"));
        assert_eq!(count("The cat sat on the mat, and it was happy.", words), 6);
        assert_eq!(count("Home | News | Sport", words), 0);
    }

    #[test]
    fn test_count_russian() {
        let words = for_language(Some("ru"));
        assert_eq!(count("Он сказал, что это было не так.", words), 6);
    }

    #[test]
    fn test_unknown_language_uses_all_lists() {
        let words = for_language(None);
        assert_eq!(count("The report и the reply", words), 3);
        assert!(std::ptr::eq(for_language(Some("de")), words));
    }
}
