use crate::errors::ValidationError;
use crate::prompts::Scenario;

/// Input that passed every guard and is ready for language routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub text: String,
    pub scenario: Scenario,
}

/// Checks, in order: non-empty text, known scenario, no banned words.
///
/// `banned_words` must already be lowercased (see `Config::banned_words`).
pub fn validate_input(
    text: &str,
    scenario: &str,
    banned_words: &[String],
) -> Result<ValidatedInput, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let scenario: Scenario = scenario
        .trim()
        .parse()
        .map_err(|_| ValidationError::UnknownScenario)?;

    if contains_banned_words(text, banned_words) {
        return Err(ValidationError::BannedContent);
    }

    Ok(ValidatedInput {
        text: text.to_string(),
        scenario,
    })
}

/// Case-insensitive substring match against the banned list.
pub fn contains_banned_words(text: &str, banned_words: &[String]) -> bool {
    let lowered = text.to_lowercase();
    banned_words.iter().any(|bad| lowered.contains(bad.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banned() -> Vec<String> {
        vec!["дурак".to_string(), "spam".to_string()]
    }

    #[test]
    fn test_accepts_clean_input() {
        let input = validate_input("  Please remind Ivan  ", "remind", &banned()).unwrap();
        assert_eq!(input.text, "Please remind Ivan");
        assert_eq!(input.scenario, Scenario::Remind);
    }

    #[test]
    fn test_empty_text_checked_first() {
        assert_eq!(
            validate_input("   \n", "bogus", &banned()),
            Err(ValidationError::EmptyText)
        );
    }

    #[test]
    fn test_unknown_scenario() {
        for scenario in ["", "fire", "HIRE", "reject,hire"] {
            assert_eq!(
                validate_input("hello", scenario, &banned()),
                Err(ValidationError::UnknownScenario),
                "scenario {scenario:?}"
            );
        }
    }

    #[test]
    fn test_banned_words_any_case() {
        assert_eq!(
            validate_input("Ты ДУРАК", "reject", &banned()),
            Err(ValidationError::BannedContent)
        );
        assert_eq!(
            validate_input("no SpAm please", "hire", &banned()),
            Err(ValidationError::BannedContent)
        );
    }

    #[test]
    fn test_empty_banned_list_allows_everything() {
        assert!(!contains_banned_words("anything at all", &[]));
    }
}
