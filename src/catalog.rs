// Configuration tables: the closed category and language sets, each
// category's probe phrase, and the per-(category, language) vocabulary lists.
//
// A catalog is built once (the built-in tables or a JSON file) and treated as
// immutable afterwards. Category dispatch is a typed enum lookup, so a missing
// vocabulary list is an `UnsupportedLanguage` error rather than a key miss.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SemanticError;

/// Semantic category. Declaration order is the classifier's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Animal,
    Human,
    Object,
}

impl Category {
    /// Every category, in fixed iteration order.
    pub const ALL: [Category; 3] = [Category::Animal, Category::Human, Category::Object];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Animal => "animal",
            Category::Human => "human",
            Category::Object => "object",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SemanticError::UnknownCategory(wanted.to_string()))
    }
}

/// Supported language. Only selects a vocabulary list; never affects scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Chinese,
    Spanish,
    French,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Chinese,
        Language::Spanish,
        Language::French,
        Language::Japanese,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::Japanese => "Japanese",
        }
    }

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Japanese => "ja",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the language name or its ISO code, case-insensitively.
impl FromStr for Language {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(tag) || l.code().eq_ignore_ascii_case(tag))
            .ok_or_else(|| SemanticError::UnsupportedLanguage {
                category: None,
                language: tag.to_string(),
            })
    }
}

/// One category's probe phrase and vocabulary lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub probe: String,
    pub vocabulary: BTreeMap<Language, Vec<String>>,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: BTreeMap<Category, CategoryEntry>,
}

/// Validated, immutable configuration tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<Category, CategoryEntry>,
}

impl Catalog {
    /// Build a catalog, checking that every category has a probe phrase and
    /// that no vocabulary list is empty.
    pub fn new(entries: BTreeMap<Category, CategoryEntry>) -> Result<Self, SemanticError> {
        for category in Category::ALL {
            let entry = entries.get(&category).ok_or_else(|| {
                SemanticError::InvalidCatalog(format!("category '{category}' has no entry"))
            })?;

            if entry.probe.trim().is_empty() {
                return Err(SemanticError::InvalidCatalog(format!(
                    "category '{category}' has a blank probe phrase"
                )));
            }

            for (language, terms) in &entry.vocabulary {
                if terms.is_empty() {
                    return Err(SemanticError::InvalidCatalog(format!(
                        "category '{category}' has an empty {language} vocabulary"
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Parse and validate a JSON catalog.
    pub fn from_json_str(json: &str) -> Result<Self, SemanticError> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| SemanticError::InvalidCatalog(format!("malformed catalog JSON: {e}")))?;
        Self::new(file.categories)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SemanticError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SemanticError::InvalidCatalog(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Probe phrase used to anchor classification for `category`.
    pub fn probe(&self, category: Category) -> &str {
        // `new` guarantees an entry for every category.
        self.entries
            .get(&category)
            .map(|e| e.probe.as_str())
            .unwrap_or_default()
    }

    /// Ordered vocabulary for (category, language).
    pub fn vocabulary(
        &self,
        category: Category,
        language: Language,
    ) -> Result<&[String], SemanticError> {
        self.entries
            .get(&category)
            .and_then(|e| e.vocabulary.get(&language))
            .map(Vec::as_slice)
            .ok_or_else(|| SemanticError::UnsupportedLanguage {
                category: Some(category),
                language: language.name().to_string(),
            })
    }

    /// Languages with a vocabulary list for `category`.
    pub fn languages(&self, category: Category) -> Vec<Language> {
        self.entries
            .get(&category)
            .map(|e| e.vocabulary.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The tables shipped with the tool.
    pub fn builtin() -> Self {
        let table = |probe: &str, rows: [(Language, [&str; 6]); 5]| CategoryEntry {
            probe: probe.to_string(),
            vocabulary: rows
                .into_iter()
                .map(|(lang, terms)| (lang, terms.iter().map(|t| t.to_string()).collect()))
                .collect(),
        };

        let mut entries = BTreeMap::new();
        entries.insert(
            Category::Animal,
            table(
                "animal pet creature",
                [
                    (
                        Language::English,
                        ["animal", "pet", "creature", "mammal", "wildlife", "companion"],
                    ),
                    (Language::Chinese, ["动物", "宠物", "生物", "哺乳动物", "野生动物", "伙伴"]),
                    (
                        Language::Spanish,
                        ["animal", "mascota", "criatura", "mamífero", "fauna", "compañero"],
                    ),
                    (
                        Language::French,
                        [
                            "animal",
                            "animal de compagnie",
                            "créature",
                            "mammifère",
                            "faune",
                            "compagnon",
                        ],
                    ),
                    (
                        Language::Japanese,
                        ["動物", "ペット", "生き物", "哺乳類", "野生動物", "仲間"],
                    ),
                ],
            ),
        );
        entries.insert(
            Category::Human,
            table(
                "human person people",
                [
                    (
                        Language::English,
                        ["person", "human", "individual", "people", "adult", "being"],
                    ),
                    (Language::Chinese, ["人", "人类", "个人", "人们", "成人", "生命"]),
                    (
                        Language::Spanish,
                        ["persona", "humano", "individuo", "gente", "adulto", "ser"],
                    ),
                    (
                        Language::French,
                        ["personne", "humain", "individu", "gens", "adulte", "être"],
                    ),
                    (Language::Japanese, ["人", "人間", "個人", "人々", "大人", "存在"]),
                ],
            ),
        );
        entries.insert(
            Category::Object,
            table(
                "thing object item",
                [
                    (
                        Language::English,
                        ["thing", "object", "item", "material", "substance", "matter"],
                    ),
                    (Language::Chinese, ["东西", "物体", "物品", "材料", "物质", "事物"]),
                    (
                        Language::Spanish,
                        ["cosa", "objeto", "elemento", "material", "sustancia", "materia"],
                    ),
                    (
                        Language::French,
                        ["chose", "objet", "article", "matériel", "substance", "matière"],
                    ),
                    (Language::Japanese, ["物", "物体", "品物", "材料", "物質", "事物"]),
                ],
            ),
        );

        Self { entries }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_six_terms_everywhere() {
        let catalog = Catalog::builtin();
        for category in Category::ALL {
            for language in Language::ALL {
                let terms = catalog.vocabulary(category, language).unwrap();
                assert_eq!(terms.len(), 6, "{category}/{language}");
            }
        }
    }

    #[test]
    fn test_builtin_passes_validation() {
        let catalog = Catalog::builtin();
        let rebuilt = Catalog::new(catalog.entries.clone()).unwrap();
        assert_eq!(rebuilt, catalog);
    }

    #[test]
    fn test_builtin_probes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.probe(Category::Animal), "animal pet creature");
        assert_eq!(catalog.probe(Category::Human), "human person people");
        assert_eq!(catalog.probe(Category::Object), "thing object item");
    }

    #[test]
    fn test_language_parse_name_and_code() {
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!("chinese".parse::<Language>().unwrap(), Language::Chinese);
        assert_eq!("JA".parse::<Language>().unwrap(), Language::Japanese);
        assert_eq!(" fr ".parse::<Language>().unwrap(), Language::French);
    }

    #[test]
    fn test_language_parse_unknown() {
        match "Klingon".parse::<Language>() {
            Err(SemanticError::UnsupportedLanguage { category, language }) => {
                assert_eq!(category, None);
                assert_eq!(language, "Klingon");
            }
            other => panic!("expected UnsupportedLanguage, got {other:?}"),
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("human".parse::<Category>().unwrap(), Category::Human);
        assert_eq!("Object".parse::<Category>().unwrap(), Category::Object);
        match "plant".parse::<Category>() {
            Err(SemanticError::UnknownCategory(name)) => assert_eq!(name, "plant"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_language_is_unsupported() {
        let mut entries = Catalog::builtin().entries;
        if let Some(entry) = entries.get_mut(&Category::Animal) {
            entry.vocabulary.remove(&Language::French);
        }
        let catalog = Catalog::new(entries).unwrap();
        assert!(matches!(
            catalog.vocabulary(Category::Animal, Language::French),
            Err(SemanticError::UnsupportedLanguage { category: Some(Category::Animal), .. })
        ));
        assert!(!catalog.languages(Category::Animal).contains(&Language::French));
        assert!(catalog.vocabulary(Category::Human, Language::French).is_ok());
    }

    #[test]
    fn test_missing_category_rejected() {
        let mut entries = Catalog::builtin().entries;
        entries.remove(&Category::Object);
        assert!(matches!(
            Catalog::new(entries),
            Err(SemanticError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_blank_probe_rejected() {
        let mut entries = Catalog::builtin().entries;
        if let Some(entry) = entries.get_mut(&Category::Human) {
            entry.probe = "   ".to_string();
        }
        assert!(matches!(
            Catalog::new(entries),
            Err(SemanticError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let mut entries = Catalog::builtin().entries;
        if let Some(entry) = entries.get_mut(&Category::Human) {
            entry.vocabulary.insert(Language::English, vec![]);
        }
        assert!(matches!(
            Catalog::new(entries),
            Err(SemanticError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "categories": {
                "animal": { "probe": "beast", "vocabulary": { "English": ["dog", "cat"] } },
                "human":  { "probe": "someone", "vocabulary": { "English": ["man"] } },
                "object": { "probe": "stuff", "vocabulary": {} }
            }
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.probe(Category::Animal), "beast");
        assert_eq!(
            catalog.vocabulary(Category::Animal, Language::English).unwrap(),
            ["dog".to_string(), "cat".to_string()]
        );
        assert!(catalog.vocabulary(Category::Object, Language::English).is_err());
    }

    #[test]
    fn test_from_json_str_malformed() {
        assert!(matches!(
            Catalog::from_json_str("{ not json"),
            Err(SemanticError::InvalidCatalog(_))
        ));
    }
}
