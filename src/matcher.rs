//! Answer evaluation for a committed input line.

use crate::dictionary::AcronymDictionary;
use crate::round::Challenge;

const QUIT_COMMAND: &str = "Q";

/// How a committed answer is compared against the dictionary and challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Any acronym present in the dictionary scores, not only the one shown.
    ExactKeyMembership,
    /// The answer must equal the current challenge's full name.
    ExactFullNameEquality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
    QuitRequested,
}

/// Evaluates `raw_input` after upper-casing it. "Q" quits under every policy.
#[must_use]
pub fn evaluate(
    policy: MatchPolicy,
    raw_input: &str,
    challenge: &Challenge,
    dictionary: &AcronymDictionary,
) -> Outcome {
    let input = raw_input.to_uppercase();
    if input == QUIT_COMMAND {
        return Outcome::QuitRequested;
    }

    let hit = match policy {
        MatchPolicy::ExactKeyMembership => dictionary.contains(&input),
        MatchPolicy::ExactFullNameEquality => input == challenge.entry.full_name.to_uppercase(),
    };

    if hit { Outcome::Hit } else { Outcome::Miss }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::AcronymEntry;
    use crate::round::DisplayMode;

    fn dictionary() -> AcronymDictionary {
        AcronymDictionary::load_from_str(
            "CPU,Central Processing Unit\nRAM,Random Access Memory\n",
        )
    }

    fn challenge(acronym: &str, full_name: &str) -> Challenge {
        Challenge {
            entry: AcronymEntry {
                acronym: acronym.to_string(),
                full_name: full_name.to_string(),
            },
            display: DisplayMode::ShowFullName,
            draw: 1,
        }
    }

    #[test]
    fn test_membership_hit_on_shown_acronym() {
        let c = challenge("CPU", "Central Processing Unit");
        assert_eq!(
            evaluate(MatchPolicy::ExactKeyMembership, "CPU", &c, &dictionary()),
            Outcome::Hit
        );
    }

    #[test]
    fn test_membership_hit_on_other_acronym() {
        // Any known acronym counts, not only the challenge's.
        let c = challenge("CPU", "Central Processing Unit");
        assert_eq!(
            evaluate(MatchPolicy::ExactKeyMembership, "ram", &c, &dictionary()),
            Outcome::Hit
        );
    }

    #[test]
    fn test_membership_miss_on_unknown() {
        let c = challenge("CPU", "Central Processing Unit");
        assert_eq!(
            evaluate(MatchPolicy::ExactKeyMembership, "GPU", &c, &dictionary()),
            Outcome::Miss
        );
        assert_eq!(
            evaluate(MatchPolicy::ExactKeyMembership, "", &c, &dictionary()),
            Outcome::Miss
        );
    }

    #[test]
    fn test_full_name_hit_case_insensitive() {
        let c = challenge("RAM", "Random Access Memory");
        assert_eq!(
            evaluate(
                MatchPolicy::ExactFullNameEquality,
                "RANDOM ACCESS MEMORY",
                &c,
                &dictionary()
            ),
            Outcome::Hit
        );
        assert_eq!(
            evaluate(
                MatchPolicy::ExactFullNameEquality,
                "random access memory",
                &c,
                &dictionary()
            ),
            Outcome::Hit
        );
    }

    #[test]
    fn test_full_name_miss_on_acronym() {
        let c = challenge("RAM", "Random Access Memory");
        assert_eq!(
            evaluate(MatchPolicy::ExactFullNameEquality, "RAM", &c, &dictionary()),
            Outcome::Miss
        );
        assert_eq!(
            evaluate(
                MatchPolicy::ExactFullNameEquality,
                "Central Processing Unit",
                &c,
                &dictionary()
            ),
            Outcome::Miss
        );
    }

    #[test]
    fn test_quit_under_every_policy() {
        let c = challenge("RAM", "Random Access Memory");
        for policy in [MatchPolicy::ExactKeyMembership, MatchPolicy::ExactFullNameEquality] {
            assert_eq!(evaluate(policy, "q", &c, &dictionary()), Outcome::QuitRequested);
            assert_eq!(evaluate(policy, "Q", &c, &dictionary()), Outcome::QuitRequested);
        }
    }

    #[test]
    fn test_quit_wins_over_dictionary_key() {
        let dictionary = AcronymDictionary::load_from_str("Q,Queue\nCPU,Central Processing Unit");
        assert!(dictionary.contains("Q"));
        let c = challenge("CPU", "Central Processing Unit");
        assert_eq!(
            evaluate(MatchPolicy::ExactKeyMembership, "Q", &c, &dictionary),
            Outcome::QuitRequested
        );
    }
}
