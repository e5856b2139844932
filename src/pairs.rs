// Preset example pairs: one concept rendered in every supported language,
// for quick comparisons from the CLI.

use std::str::FromStr;

use crate::catalog::Language;

/// A concept with its word in each supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePair {
    pub name: &'static str,
    words: [&'static str; 5],
}

impl ExamplePair {
    /// The concept's word in `language`.
    pub fn word(&self, language: Language) -> &'static str {
        let idx = Language::ALL
            .iter()
            .position(|&l| l == language)
            .unwrap_or(0);
        self.words[idx]
    }
}

/// Word order follows `Language::ALL`.
pub const EXAMPLE_PAIRS: [ExamplePair; 3] = [
    ExamplePair {
        name: "gender",
        words: ["man", "男人", "hombre", "homme", "男"],
    },
    ExamplePair {
        name: "family",
        words: ["family", "家庭", "familia", "famille", "家族"],
    },
    ExamplePair {
        name: "person",
        words: ["person", "人", "persona", "personne", "人"],
    },
];

impl FromStr for ExamplePair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EXAMPLE_PAIRS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = EXAMPLE_PAIRS.iter().map(|p| p.name).collect();
                anyhow::anyhow!("Unknown example '{}'. Known examples: {}", s, known.join(", "))
            })
    }
}
