// ABOUTME: Restriction-family keyword, safe-word, and homonym tables for the safety filter
// ABOUTME: Diet and intolerance tables are separate and scanned independently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, HashSet};

use pantry_core::models::IngredientToken;
use serde::{Deserialize, Serialize};

use crate::normalizer::IngredientNormalizer;

/// A group of ingredients sharing one restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionFamily {
    /// Meat and poultry
    LandMeat,
    /// Fish and seafood products
    Seafood,
    /// Milk and milk products
    Dairy,
    /// Eggs and egg-based products
    Egg,
    /// Wheat, barley, rye and derived products
    Gluten,
    /// Non-meat animal products
    AnimalDerived,
    /// Tree nuts and peanuts
    Nut,
    /// Crustaceans and molluscs
    Shellfish,
}

impl RestrictionFamily {
    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LandMeat => "land_meat",
            Self::Seafood => "seafood",
            Self::Dairy => "dairy",
            Self::Egg => "egg",
            Self::Gluten => "gluten",
            Self::AnimalDerived => "animal_derived",
            Self::Nut => "nut",
            Self::Shellfish => "shellfish",
        }
    }
}

/// Static word lists for one family before normalization
struct FamilySpec {
    keywords: &'static [&'static str],
    safe_words: &'static [&'static str],
    homonyms: &'static [&'static str],
}

const LAND_MEAT: FamilySpec = FamilySpec {
    keywords: &[
        "meat", "beef", "pork", "chicken", "lamb", "veal", "mutton", "bacon", "ham", "sausage",
        "prosciutto", "pancetta", "salami", "pepperoni", "chorizo", "turkey", "duck", "goose",
        "venison", "rabbit", "goat", "steak", "mince", "brisket", "sirloin", "ribeye", "oxtail",
        "jerky", "bratwurst", "hot dog", "liver", "sweetbread", "bone broth", "gelatin", "gelatine",
        "lard", "tallow", "suet", "burger", "meatball",
    ],
    safe_words: &[
        "vegan", "vegetarian", "plant", "plant-based", "meatless", "meat-free", "veggie", "mock",
        "faux", "soy", "tofu", "tempeh", "seitan", "jackfruit", "mushroom", "agar",
    ],
    homonyms: &[
        "beefsteak tomato", "hamburger bun", "hot dog bun", "graham", "goat cheese",
        "goat milk", "lamb lettuce", "lambs lettuce", "duck sauce", "chicken of the woods",
    ],
};

const SEAFOOD: FamilySpec = FamilySpec {
    keywords: &[
        "fish", "seafood", "salmon", "tuna", "cod", "shrimp", "prawn", "crab", "lobster",
        "anchovy", "sardine", "mackerel", "trout", "halibut", "tilapia", "haddock", "herring",
        "snapper", "bass", "scallop", "clam", "mussel", "oyster", "squid", "calamari", "octopus",
        "caviar", "roe", "eel", "bonito", "dashi", "fish sauce", "oyster sauce", "worcestershire",
        "krill",
    ],
    safe_words: &[
        "vegan", "vegetarian", "plant", "plant-based", "fish-free", "mock", "faux", "soy",
        "mushroom", "seaweed",
    ],
    homonyms: &[
        "oyster mushroom", "crab apple", "crabapple", "goldfish",
    ],
};

const DAIRY: FamilySpec = FamilySpec {
    keywords: &[
        "milk", "cheese", "butter", "cream", "creamer", "yogurt", "yoghurt", "ghee", "whey",
        "casein", "lactose", "parmesan", "parmigiano", "pecorino", "mozzarella", "cheddar",
        "ricotta", "feta", "brie", "gouda", "mascarpone", "paneer", "kefir", "custard",
        "creme fraiche", "half and half", "buttermilk",
    ],
    safe_words: &[
        "vegan", "plant", "plant-based", "non-dairy", "dairy-free", "lactose-free", "almond",
        "coconut", "oat", "soy", "rice", "cashew", "hemp",
    ],
    homonyms: &[
        "peanut butter", "almond butter", "cashew butter", "sunflower butter", "apple butter",
        "cocoa butter", "shea butter", "butter bean", "butternut", "butternut squash",
        "butterhead", "butterhead lettuce", "cream of tartar", "cheesecloth",
    ],
};

const EGG: FamilySpec = FamilySpec {
    keywords: &[
        "egg", "egg white", "egg yolk", "albumen", "mayonnaise", "mayo", "meringue", "aioli",
        "custard", "eggnog",
    ],
    safe_words: &[
        "egg-free", "eggless", "vegan", "plant", "plant-based", "flax", "chia", "aquafaba",
    ],
    homonyms: &["eggplant"],
};

const GLUTEN: FamilySpec = FamilySpec {
    keywords: &[
        "wheat", "gluten", "flour", "barley", "rye", "spelt", "farro", "semolina", "durum",
        "bulgur", "couscous", "seitan", "malt", "malted", "pasta", "spaghetti", "noodle",
        "macaroni", "lasagna", "bread", "breadcrumb", "panko", "crouton", "cracker", "tortilla",
        "pita", "bun", "bagel", "cake", "cookie", "biscuit", "pastry", "pie crust", "soy sauce",
        "beer",
    ],
    safe_words: &[
        "gluten-free", "gf", "wheat-free", "rice", "almond", "coconut", "corn", "cassava",
        "tapioca", "chickpea", "potato", "tamari", "quinoa", "lentil", "sorghum", "millet",
        "zucchini", "konjac", "shirataki",
    ],
    homonyms: &[
        "buckwheat", "sweetbread", "breadfruit", "rice cracker", "rice noodle",
    ],
};

const ANIMAL_DERIVED: FamilySpec = FamilySpec {
    keywords: &[
        "honey", "gelatin", "gelatine", "bee pollen", "royal jelly", "carmine", "isinglass",
    ],
    safe_words: &["vegan", "plant", "plant-based", "agar"],
    homonyms: &["honeydew", "honeydew melon", "honeycrisp"],
};

const NUT: FamilySpec = FamilySpec {
    keywords: &[
        "nut", "almond", "walnut", "pecan", "cashew", "pistachio", "hazelnut", "macadamia",
        "pine nut", "peanut", "brazil nut", "chestnut", "praline", "marzipan", "frangipane",
        "gianduja", "nutella", "pesto",
    ],
    safe_words: &["nut-free", "peanut-free", "sunflower", "pumpkin"],
    homonyms: &[
        "nutmeg", "coconut", "doughnut", "nutritional yeast", "water chestnut", "butternut",
        "butternut squash",
    ],
};

const SHELLFISH: FamilySpec = FamilySpec {
    keywords: &[
        "shellfish", "shrimp", "prawn", "crab", "lobster", "crayfish", "crawfish",
        "langoustine", "scallop", "clam", "mussel", "oyster", "squid", "calamari", "octopus",
        "krill", "oyster sauce",
    ],
    safe_words: &["vegan", "plant", "plant-based", "mock", "faux", "shellfish-free"],
    homonyms: &["oyster mushroom", "crab apple", "crabapple"],
};

/// Diet-side keyword tables
const DIET_FAMILIES: &[(RestrictionFamily, &FamilySpec)] = &[
    (RestrictionFamily::LandMeat, &LAND_MEAT),
    (RestrictionFamily::Seafood, &SEAFOOD),
    (RestrictionFamily::Dairy, &DAIRY),
    (RestrictionFamily::Egg, &EGG),
    (RestrictionFamily::Gluten, &GLUTEN),
    (RestrictionFamily::AnimalDerived, &ANIMAL_DERIVED),
];

const INTOLERANCE_DAIRY: FamilySpec = FamilySpec {
    keywords: &[
        "milk", "cheese", "butter", "cream", "creamer", "yogurt", "yoghurt", "ghee", "whey",
        "casein", "caseinate", "lactose", "milk powder", "milk solid", "parmesan", "parmigiano",
        "pecorino", "mozzarella", "cheddar", "ricotta", "feta", "brie", "gouda", "mascarpone",
        "paneer", "kefir", "custard", "creme fraiche", "half and half", "buttermilk", "ghee",
        "curd", "quark",
    ],
    safe_words: DAIRY.safe_words,
    homonyms: &[
        "peanut butter", "almond butter", "cashew butter", "sunflower butter", "apple butter",
        "cocoa butter", "shea butter", "butter bean", "butternut", "butternut squash",
        "butterhead", "butterhead lettuce", "cream of tartar", "cheesecloth", "bean curd",
    ],
};

const INTOLERANCE_GLUTEN: FamilySpec = FamilySpec {
    keywords: &[
        "wheat", "gluten", "flour", "barley", "rye", "spelt", "farro", "semolina", "durum",
        "kamut", "triticale", "einkorn", "bulgur", "couscous", "seitan", "malt", "malted",
        "brewer yeast", "pasta", "spaghetti", "noodle", "macaroni", "lasagna", "bread",
        "breadcrumb", "panko", "crouton", "cracker", "tortilla", "pita", "bun", "bagel", "cake",
        "cookie", "biscuit", "pastry", "pie crust", "soy sauce", "teriyaki", "beer",
    ],
    safe_words: GLUTEN.safe_words,
    homonyms: GLUTEN.homonyms,
};

const INTOLERANCE_EGG: FamilySpec = FamilySpec {
    keywords: &[
        "egg", "egg white", "egg yolk", "albumen", "albumin", "mayonnaise", "mayo", "meringue",
        "aioli", "custard", "eggnog", "hollandaise", "bearnaise",
    ],
    safe_words: EGG.safe_words,
    homonyms: EGG.homonyms,
};

/// Intolerance-side keyword tables
const INTOLERANCE_FAMILIES: &[(RestrictionFamily, &FamilySpec)] = &[
    (RestrictionFamily::Dairy, &INTOLERANCE_DAIRY),
    (RestrictionFamily::Gluten, &INTOLERANCE_GLUTEN),
    (RestrictionFamily::Egg, &INTOLERANCE_EGG),
    (RestrictionFamily::Nut, &NUT),
    (RestrictionFamily::Shellfish, &SHELLFISH),
];

/// Words that end a qualifier window
const WINDOW_SEPARATORS: &[&str] = &["and", "or", "with", "plus"];

/// Minimum length on both sides of a compound-word match
const COMPOUND_MIN_LEN: usize = 3;

/// Endings that inflect a keyword rather than form a compound ("buttered", "cheesy")
const INFLECTIONS: &[&str] = &["ed", "y", "ie", "ey"];

/// A restricted keyword found in one ingredient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    /// Keyword that matched
    pub keyword: String,
    /// Safe word found near the keyword, if any
    pub qualifier: Option<String>,
}

impl KeywordHit {
    /// True when a safe word qualifies the match
    #[must_use]
    pub const fn is_guarded(&self) -> bool {
        self.qualifier.is_some()
    }
}

/// Normalized keyword, safe-word, and homonym lists for one family
#[derive(Debug, Clone)]
pub struct FamilyTable {
    family: RestrictionFamily,
    keywords: Vec<Vec<String>>,
    safe_words: HashSet<String>,
    homonyms: Vec<Vec<String>>,
}

impl FamilyTable {
    fn build(family: RestrictionFamily, spec: &FamilySpec, normalizer: &IngredientNormalizer) -> Self {
        let phrases = |list: &[&str]| -> Vec<Vec<String>> {
            list.iter()
                .map(|s| {
                    normalizer
                        .normalize_text(s)
                        .split_whitespace()
                        .map(str::to_owned)
                        .collect::<Vec<_>>()
                })
                .filter(|words| !words.is_empty())
                .collect()
        };
        Self {
            family,
            keywords: phrases(spec.keywords),
            safe_words: spec
                .safe_words
                .iter()
                .map(|s| normalizer.normalize_text(s))
                .collect(),
            homonyms: phrases(spec.homonyms),
        }
    }

    /// Family this table covers
    #[must_use]
    pub const fn family(&self) -> RestrictionFamily {
        self.family
    }

    /// True when `word` (or one of its hyphen parts) is a safe word for this family
    #[must_use]
    pub fn is_safe_word(&self, word: &str) -> bool {
        self.safe_words.contains(word) || word.split('-').any(|part| self.safe_words.contains(part))
    }

    /// Scan one ingredient for restricted keywords.
    ///
    /// Returns the first unguarded hit if there is one, otherwise the first
    /// guarded hit, otherwise `None`.
    #[must_use]
    pub fn scan(&self, token: &IngredientToken, window: usize) -> Option<KeywordHit> {
        let words: Vec<&str> = token.words().collect();
        let masked = self.mask_homonyms(&words);
        let mut guarded: Option<KeywordHit> = None;

        for start in 0..words.len() {
            if masked[start] || self.safe_words.contains(words[start]) {
                continue;
            }
            let Some((keyword, end, remainder)) = self.match_at(&words, &masked, start) else {
                continue;
            };
            let qualifier = remainder
                .filter(|r| self.safe_words.contains(*r))
                .map(str::to_owned)
                .or_else(|| self.find_qualifier(&words, start, end, window));
            let hit = KeywordHit {
                keyword: keyword.join(" "),
                qualifier,
            };
            if !hit.is_guarded() {
                return Some(hit);
            }
            guarded.get_or_insert(hit);
        }
        guarded
    }

    fn mask_homonyms(&self, words: &[&str]) -> Vec<bool> {
        let mut masked = vec![false; words.len()];
        for homonym in &self.homonyms {
            let len = homonym.len();
            if len > words.len() {
                continue;
            }
            for start in 0..=words.len() - len {
                if homonym.iter().zip(&words[start..start + len]).all(|(h, w)| h == w) {
                    masked[start..start + len].fill(true);
                }
            }
        }
        masked
    }

    /// Match a keyword starting at `start`, returning the keyword, the end
    /// position, and the non-keyword part of a compound word
    fn match_at<'a>(
        &'a self,
        words: &[&'a str],
        masked: &[bool],
        start: usize,
    ) -> Option<(&'a [String], usize, Option<&'a str>)> {
        // Longest multi-word keywords first so "oyster sauce" wins over "oyster"
        let mut best: Option<(&[String], usize, Option<&str>)> = None;
        for keyword in &self.keywords {
            let end = start + keyword.len();
            if keyword.len() > 1 {
                if end <= words.len()
                    && !masked[start..end].contains(&true)
                    && keyword.iter().zip(&words[start..end]).all(|(k, w)| k == w)
                    && best.is_none_or(|(b, _, _)| b.len() < keyword.len())
                {
                    best = Some((keyword.as_slice(), end, None));
                }
                continue;
            }
            if best.is_some() {
                continue;
            }
            if let Some(remainder) = word_match(words[start], &keyword[0]) {
                best = Some((keyword.as_slice(), end, remainder));
            }
        }
        best
    }

    fn find_qualifier(&self, words: &[&str], start: usize, end: usize, window: usize) -> Option<String> {
        let before = words[..start]
            .iter()
            .rev()
            .take(window)
            .take_while(|w| !WINDOW_SEPARATORS.contains(w));
        let after = words[end..]
            .iter()
            .take(window)
            .take_while(|w| !WINDOW_SEPARATORS.contains(w));
        let inside = words[start..end].iter().filter(|w| w.contains('-'));

        before
            .chain(after)
            .chain(inside)
            .find(|w| self.is_safe_word(w))
            .map(|w| (*w).to_owned())
    }
}

/// Match one word against a single-word keyword.
///
/// Returns `Some(None)` for an exact match, `Some(Some(rest))` for a compound
/// such as "buttermilk" or "walnut", and `None` otherwise.
fn word_match<'a>(word: &'a str, keyword: &str) -> Option<Option<&'a str>> {
    if word == keyword {
        return Some(None);
    }
    for part in word.split('-').filter(|p| !p.is_empty()) {
        if part == keyword {
            return Some(None);
        }
    }
    if keyword.len() < COMPOUND_MIN_LEN {
        return None;
    }
    if word
        .strip_prefix(keyword)
        .is_some_and(|rest| INFLECTIONS.contains(&rest))
    {
        return Some(None);
    }
    let compound = |rest: &'a str| {
        let rest = rest.trim_matches('-');
        (rest.len() >= COMPOUND_MIN_LEN).then_some(rest)
    };
    if let Some(rest) = word.strip_prefix(keyword).and_then(compound) {
        return Some(Some(rest));
    }
    word.strip_suffix(keyword).and_then(compound).map(Some)
}

/// Diet-side and intolerance-side tables, built once per filter
#[derive(Debug, Clone)]
pub struct KeywordTables {
    diet: HashMap<RestrictionFamily, FamilyTable>,
    intolerance: HashMap<RestrictionFamily, FamilyTable>,
}

impl KeywordTables {
    /// Normalize every list through `normalizer`
    #[must_use]
    pub fn build(normalizer: &IngredientNormalizer) -> Self {
        let build_all = |families: &[(RestrictionFamily, &FamilySpec)]| {
            families
                .iter()
                .map(|(family, spec)| (*family, FamilyTable::build(*family, spec, normalizer)))
                .collect()
        };
        Self {
            diet: build_all(DIET_FAMILIES),
            intolerance: build_all(INTOLERANCE_FAMILIES),
        }
    }

    /// Diet-side table for a family
    #[must_use]
    pub fn diet(&self, family: RestrictionFamily) -> Option<&FamilyTable> {
        self.diet.get(&family)
    }

    /// Intolerance-side table for a family
    #[must_use]
    pub fn intolerance(&self, family: RestrictionFamily) -> Option<&FamilyTable> {
        self.intolerance.get(&family)
    }
}
