use std::fmt;

/// Category of a change, decided by the marker at the start of a PR title
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeCategory {
    Breaking,
    Feature,
    Bugfix,
    Docs,
    Infra,
    Release,
    Uncategorized,
}

// Single code points on purpose: some editors append U+FE0F (emoji
// presentation) after these, which `classify` strips separately.
const EMOJI_BREAKING: &str = "\u{26A0}";
const EMOJI_FEATURE: &str = "\u{2728}";
const EMOJI_BUGFIX: &str = "\u{1F41B}";
const EMOJI_DOCS: &str = "\u{1F4D6}";
const EMOJI_INFRA: &str = "\u{1F331}";
const EMOJI_RELEASE: &str = "\u{1F680}";
const EMOJI_INFRA_LEGACY: &str = "\u{1F3C3}";

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Marker table: (emoji, textual alias, category).
///
/// `:running:` is the deprecated spelling of infra changes and is still
/// accepted so older history classifies correctly.
const MARKERS: &[(&str, &str, ChangeCategory)] = &[
    (EMOJI_BREAKING, ":warning:", ChangeCategory::Breaking),
    (EMOJI_FEATURE, ":sparkles:", ChangeCategory::Feature),
    (EMOJI_BUGFIX, ":bug:", ChangeCategory::Bugfix),
    (EMOJI_DOCS, ":book:", ChangeCategory::Docs),
    (EMOJI_INFRA, ":seedling:", ChangeCategory::Infra),
    (EMOJI_RELEASE, ":rocket:", ChangeCategory::Release),
    (EMOJI_INFRA_LEGACY, ":running:", ChangeCategory::Infra),
];

impl ChangeCategory {
    /// All categories in display order
    pub const ALL: [ChangeCategory; 7] = [
        ChangeCategory::Breaking,
        ChangeCategory::Feature,
        ChangeCategory::Bugfix,
        ChangeCategory::Docs,
        ChangeCategory::Infra,
        ChangeCategory::Release,
        ChangeCategory::Uncategorized,
    ];

    /// Canonical emoji for this category
    pub fn emoji(&self) -> &'static str {
        match self {
            ChangeCategory::Breaking => EMOJI_BREAKING,
            ChangeCategory::Feature => EMOJI_FEATURE,
            ChangeCategory::Bugfix => EMOJI_BUGFIX,
            ChangeCategory::Docs => EMOJI_DOCS,
            ChangeCategory::Infra => EMOJI_INFRA,
            ChangeCategory::Release => EMOJI_RELEASE,
            ChangeCategory::Uncategorized => "<uncategorized>",
        }
    }

    /// Canonical textual alias (`:sparkles:` and friends)
    pub fn alias(&self) -> &'static str {
        match self {
            ChangeCategory::Breaking => ":warning:",
            ChangeCategory::Feature => ":sparkles:",
            ChangeCategory::Bugfix => ":bug:",
            ChangeCategory::Docs => ":book:",
            ChangeCategory::Infra => ":seedling:",
            ChangeCategory::Release => ":rocket:",
            ChangeCategory::Uncategorized => ":question:",
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeCategory::Breaking => "breaking",
            ChangeCategory::Feature => "feature",
            ChangeCategory::Bugfix => "bugfix",
            ChangeCategory::Docs => "docs",
            ChangeCategory::Infra => "infra",
            ChangeCategory::Release => "release",
            ChangeCategory::Uncategorized => "uncategorized",
        };
        write!(f, "{}", name)
    }
}

/// A title after classification, with its marker removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTitle {
    pub category: ChangeCategory,
    pub text: String,
}

/// Classify a PR title by its leading marker.
///
/// Only a marker at the very start of the trimmed title counts. The marker,
/// one following variation selector and surrounding whitespace are removed
/// from the returned text. Never fails: anything unrecognized is
/// [`ChangeCategory::Uncategorized`] with the trimmed title unchanged.
pub fn classify(title: &str) -> ClassifiedTitle {
    let title = title.trim();

    for (emoji, alias, category) in MARKERS {
        let rest = title
            .strip_prefix(alias)
            .or_else(|| title.strip_prefix(emoji));

        if let Some(rest) = rest {
            let rest = rest.strip_prefix(VARIATION_SELECTOR).unwrap_or(rest);
            return ClassifiedTitle {
                category: *category,
                text: rest.trim().to_string(),
            };
        }
    }

    ClassifiedTitle {
        category: ChangeCategory::Uncategorized,
        text: title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(title: &str, category: ChangeCategory, text: &str) {
        let classified = classify(title);
        assert_eq!(classified.category, category, "category for {:?}", title);
        assert_eq!(classified.text, text, "text for {:?}", title);
    }

    #[test]
    fn test_emoji_markers() {
        check("⚠ Change leader election", ChangeCategory::Breaking, "Change leader election");
        check("✨ Add a thing", ChangeCategory::Feature, "Add a thing");
        check("🐛 Fix a thing", ChangeCategory::Bugfix, "Fix a thing");
        check("📖 Document a thing", ChangeCategory::Docs, "Document a thing");
        check("🌱 Bump deps", ChangeCategory::Infra, "Bump deps");
        check("🚀 Release v1.2.0", ChangeCategory::Release, "Release v1.2.0");
        check("🏃 Old infra marker", ChangeCategory::Infra, "Old infra marker");
    }

    #[test]
    fn test_textual_aliases() {
        check(":warning: Drop v1alpha1", ChangeCategory::Breaking, "Drop v1alpha1");
        check(":sparkles: Add a thing", ChangeCategory::Feature, "Add a thing");
        check(":bug: Fix a thing", ChangeCategory::Bugfix, "Fix a thing");
        check(":book: Fix typo", ChangeCategory::Docs, "Fix typo");
        check(":seedling: Bump deps", ChangeCategory::Infra, "Bump deps");
        check(":rocket: Release v1.2.0", ChangeCategory::Release, "Release v1.2.0");
        check(":running: Old infra marker", ChangeCategory::Infra, "Old infra marker");
    }

    #[test]
    fn test_marker_without_space() {
        check("✨CreateOrPatch", ChangeCategory::Feature, "CreateOrPatch");
    }

    #[test]
    fn test_strips_variation_selector() {
        check("⚠\u{FE0F} Breaking thing", ChangeCategory::Breaking, "Breaking thing");
        check("✨\u{FE0F}Feature thing", ChangeCategory::Feature, "Feature thing");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        check("   :bug:   Fix a thing  \n", ChangeCategory::Bugfix, "Fix a thing");
        check("\t🌱 Bump deps ", ChangeCategory::Infra, "Bump deps");
    }

    #[test]
    fn test_marker_in_middle_is_not_a_prefix() {
        check(
            "this is not a ✨ feature",
            ChangeCategory::Uncategorized,
            "this is not a ✨ feature",
        );
        check(
            "neither is this :bug: a bug",
            ChangeCategory::Uncategorized,
            "neither is this :bug: a bug",
        );
    }

    #[test]
    fn test_empty_and_blank() {
        check("", ChangeCategory::Uncategorized, "");
        check("   \t ", ChangeCategory::Uncategorized, "");
    }

    #[test]
    fn test_marker_only() {
        check(":sparkles:", ChangeCategory::Feature, "");
        check("🐛\u{FE0F}", ChangeCategory::Bugfix, "");
    }

    #[test]
    fn test_unknown_alias_is_uncategorized() {
        check(":tada: Party", ChangeCategory::Uncategorized, ":tada: Party");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ChangeCategory::Feature.to_string(), "feature");
        assert_eq!(ChangeCategory::Uncategorized.to_string(), "uncategorized");
        assert_eq!(ChangeCategory::Bugfix.emoji(), "🐛");
    }

    #[test]
    fn test_every_category_round_trips_through_its_alias() {
        for category in ChangeCategory::ALL {
            if category == ChangeCategory::Uncategorized {
                continue;
            }
            let title = format!("{} something", category.alias());
            assert_eq!(classify(&title).category, category);
            let title = format!("{} something", category.emoji());
            assert_eq!(classify(&title).category, category);
        }
    }
}
