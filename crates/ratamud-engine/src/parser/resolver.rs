//! Fuzzy matching for "did you mean" hints.

use strsim::jaro_winkler;

use super::command::ALL_VERBS;

/// Minimum similarity score for a suggestion (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.85;

/// The candidate most similar to `input`, if any clears the threshold.
/// Comparison is case-insensitive; ties keep the earliest candidate.
pub fn closest_name<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = jaro_winkler(&input_lower, &candidate.to_lowercase());
        if score < FUZZY_THRESHOLD {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(name, _)| name)
}

/// A known verb resembling a mistyped one. Abbreviations are never suggested.
pub fn suggest_verb(word: &str) -> Option<&'static str> {
    let verbs = ALL_VERBS
        .iter()
        .flat_map(|group| group.iter().copied())
        .filter(|verb| verb.len() >= 3);
    closest_name(word, verbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_verbs() {
        assert_eq!(suggest_verb("lok"), Some("look"));
        assert_eq!(suggest_verb("inventroy"), Some("inventory"));
        assert_eq!(suggest_verb("TRAVLE"), Some("travel"));
    }

    #[test]
    fn no_suggestion_for_gibberish() {
        assert_eq!(suggest_verb("zzzzqqq"), None);
    }

    #[test]
    fn closest_map_name() {
        let maps = ["cave", "forest", "meadow"];
        assert_eq!(closest_name("forrest", maps), Some("forest"));
        assert_eq!(closest_name("Meadow", maps), Some("meadow"));
        assert_eq!(closest_name("volcano", maps), None);
    }
}
