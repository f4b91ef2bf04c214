// ABOUTME: Request-scoped user constraints parsed once and never mutated
// ABOUTME: Relaxation derives new constraint values that record what was dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::candidate::Difficulty;
use super::ingredient::IngredientToken;
use crate::constants::orchestration;
use crate::errors::EngineError;

/// Profile selecting the base-score weight table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Equal weight on using and on not missing
    #[default]
    Balanced,
    /// Prefers recipes needing few purchases
    MinimalShopper,
    /// Prefers recipes that use up the pantry
    PantryCleaner,
}

impl Profile {
    /// Parse from a user-facing name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match canonical(s).as_str() {
            "balanced" => Some(Self::Balanced),
            "minimal_shopper" => Some(Self::MinimalShopper),
            "pantry_cleaner" => Some(Self::PantryCleaner),
            _ => None,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::MinimalShopper => "minimal_shopper",
            Self::PantryCleaner => "pantry_cleaner",
        }
    }
}

/// Cook's mood, modulating penalty rates and bonuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// Wants something quick and easy
    Tired,
    /// No strong preference
    #[default]
    Casual,
    /// Happy to take on a project
    Energetic,
}

impl Mood {
    /// Parse from a user-facing name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match canonical(s).as_str() {
            "tired" => Some(Self::Tired),
            "casual" => Some(Self::Casual),
            "energetic" => Some(Self::Energetic),
            _ => None,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tired => "tired",
            Self::Casual => "casual",
            Self::Energetic => "energetic",
        }
    }
}

/// Hard dietary requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRequirement {
    /// No meat or seafood
    Vegetarian,
    /// No animal products
    Vegan,
    /// No land meat
    Pescatarian,
    /// No gluten
    GlutenFree,
    /// No dairy
    DairyFree,
}

impl DietaryRequirement {
    /// Parse from a user-facing name ("gluten-free", "Gluten Free", "gluten_free")
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match canonical(s).as_str() {
            "vegetarian" | "lacto_ovo_vegetarian" => Some(Self::Vegetarian),
            "vegan" => Some(Self::Vegan),
            "pescatarian" | "pescetarian" => Some(Self::Pescatarian),
            "gluten_free" | "glutenfree" => Some(Self::GlutenFree),
            "dairy_free" | "dairyfree" => Some(Self::DairyFree),
            _ => None,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescatarian => "pescatarian",
            Self::GlutenFree => "gluten_free",
            Self::DairyFree => "dairy_free",
        }
    }

    /// Phrase a source diet label must contain to carry this requirement as a tag
    #[must_use]
    pub const fn tag_phrase(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Pescatarian => "pescatarian",
            Self::GlutenFree => "gluten free",
            Self::DairyFree => "dairy free",
        }
    }
}

/// Hard intolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intolerance {
    /// Milk and milk products
    Dairy,
    /// Wheat, barley, rye
    Gluten,
    /// Eggs
    Egg,
    /// Tree nuts and peanuts
    Nut,
    /// Crustaceans and molluscs
    Shellfish,
}

impl Intolerance {
    /// Parse from a user-facing name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match canonical(s).as_str() {
            "dairy" | "lactose" | "milk" => Some(Self::Dairy),
            "gluten" | "wheat" => Some(Self::Gluten),
            "egg" | "eggs" => Some(Self::Egg),
            "nut" | "nuts" | "peanut" | "peanuts" | "tree_nut" | "tree_nuts" => Some(Self::Nut),
            "shellfish" | "crustacean" | "crustaceans" => Some(Self::Shellfish),
            _ => None,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dairy => "dairy",
            Self::Gluten => "gluten",
            Self::Egg => "egg",
            Self::Nut => "nut",
            Self::Shellfish => "shellfish",
        }
    }
}

/// A non-safety semantic requirement a candidate's labels must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SemanticTag {
    /// Cuisine label
    Cuisine(String),
    /// Meal or dish type label
    MealType(String),
    /// Diet label declared by the source
    Diet(DietaryRequirement),
}

impl SemanticTag {
    /// Human-readable form used in prompts and notes
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Cuisine(cuisine) => format!("cuisine: {cuisine}"),
            Self::MealType(meal) => format!("meal type: {meal}"),
            Self::Diet(diet) => format!("diet label: {}", diet.as_str()),
        }
    }
}

/// A constraint dropped while deriving a relaxed constraints value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelaxedConstraint {
    /// A semantic tag no longer enforced
    Tag {
        /// The dropped tag
        tag: SemanticTag,
    },
    /// The search ingredient set was reduced to its core
    IngredientSet {
        /// Ingredients left out of the search
        dropped: Vec<String>,
    },
}

impl RelaxedConstraint {
    /// Human-readable form
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Tag { tag } => format!("relaxed {}", tag.describe()),
            Self::IngredientSet { dropped } => {
                format!("searched without: {}", dropped.join(", "))
            }
        }
    }
}

/// Unvalidated constraint fields as received from the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintsRequest {
    /// Dietary requirement names
    #[serde(
        alias = "diet",
        alias = "dietary_requirements",
        deserialize_with = "one_or_many"
    )]
    pub diets: Vec<String>,
    /// Intolerance names
    #[serde(deserialize_with = "one_or_many")]
    pub intolerances: Vec<String>,
    /// Preferred cuisine
    pub cuisine: Option<String>,
    /// Preferred meal type
    pub meal_type: Option<String>,
    /// Mood name
    pub mood: Option<String>,
    /// Profile name
    pub profile: Option<String>,
    /// Ready-time ceiling in minutes
    pub max_ready_minutes: Option<u32>,
    /// Allowed missing ingredients before penalties apply
    pub max_missing: Option<u32>,
    /// Hardest acceptable difficulty name
    pub max_difficulty: Option<String>,
    /// Cook's skill level, 0-100
    pub skill_level: Option<u8>,
    /// Number of results wanted
    pub target_count: Option<usize>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Validated, immutable constraints for one request.
///
/// Relaxation never mutates a value; [`UserConstraints::safety_only`] and
/// [`UserConstraints::with_reduced_ingredients`] derive new values that keep
/// every safety rule and record what was dropped.
#[derive(Debug, Clone, Serialize)]
pub struct UserConstraints {
    ingredients: Vec<IngredientToken>,
    diets: Vec<DietaryRequirement>,
    intolerances: Vec<Intolerance>,
    cuisine: Option<String>,
    meal_type: Option<String>,
    enforce_diet_tags: bool,
    mood: Mood,
    profile: Profile,
    max_ready_minutes: Option<u32>,
    max_missing: Option<u32>,
    max_difficulty: Option<Difficulty>,
    skill_level: Option<u8>,
    target_count: usize,
    relaxations: Vec<RelaxedConstraint>,
}

impl UserConstraints {
    /// Parse and validate a request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraints` when the ingredient list is empty, any name
    /// (profile, mood, diet, intolerance, difficulty) is unknown, or a numeric
    /// field is out of range. An unknown safety rule is never ignored.
    pub fn parse<F>(
        ingredients: &[String],
        request: &ConstraintsRequest,
        tokenize: F,
    ) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> IngredientToken,
    {
        let mut tokens: Vec<IngredientToken> = Vec::with_capacity(ingredients.len());
        for raw in ingredients {
            let token = tokenize(raw);
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        if tokens.is_empty() {
            return Err(invalid("at least one ingredient is required"));
        }

        let diets = parse_all(&request.diets, "dietary requirement", DietaryRequirement::parse)?;
        let intolerances = parse_all(&request.intolerances, "intolerance", Intolerance::parse)?;

        let mood = parse_named(request.mood.as_deref(), "mood", Mood::parse)?.unwrap_or_default();
        let profile =
            parse_named(request.profile.as_deref(), "profile", Profile::parse)?.unwrap_or_default();
        let max_difficulty = parse_named(
            request.max_difficulty.as_deref(),
            "difficulty",
            Difficulty::parse,
        )?;

        if let Some(skill) = request.skill_level {
            if skill > 100 {
                return Err(invalid(&format!(
                    "skill level {skill} is outside 0-100"
                )));
            }
        }

        let target_count = request
            .target_count
            .unwrap_or(orchestration::DEFAULT_TARGET_COUNT);
        if target_count == 0 || target_count > orchestration::MAX_TARGET_COUNT {
            return Err(invalid(&format!(
                "target count {target_count} is outside 1-{}",
                orchestration::MAX_TARGET_COUNT
            )));
        }

        let constraints = Self {
            ingredients: tokens,
            diets,
            intolerances,
            cuisine: clean_label(request.cuisine.as_deref()),
            meal_type: clean_label(request.meal_type.as_deref()),
            enforce_diet_tags: true,
            mood,
            profile,
            max_ready_minutes: request.max_ready_minutes,
            max_missing: request.max_missing,
            max_difficulty,
            skill_level: request.skill_level,
            target_count,
            relaxations: Vec::new(),
        };
        debug!(
            ingredients = constraints.ingredients.len(),
            diets = constraints.diets.len(),
            intolerances = constraints.intolerances.len(),
            mood = constraints.mood.as_str(),
            profile = constraints.profile.as_str(),
            "Parsed user constraints"
        );
        Ok(constraints)
    }

    /// Semantic tags a candidate must carry under these constraints
    #[must_use]
    pub fn semantic_requirements(&self) -> Vec<SemanticTag> {
        let mut tags = Vec::new();
        if let Some(cuisine) = &self.cuisine {
            tags.push(SemanticTag::Cuisine(cuisine.clone()));
        }
        if let Some(meal) = &self.meal_type {
            tags.push(SemanticTag::MealType(meal.clone()));
        }
        if self.enforce_diet_tags {
            tags.extend(self.diets.iter().copied().map(SemanticTag::Diet));
        }
        tags
    }

    /// Derive constraints with every semantic tag dropped and every safety rule kept
    #[must_use]
    pub fn safety_only(&self) -> Self {
        let mut relaxed = self.clone();
        relaxed.relaxations.extend(
            self.semantic_requirements()
                .into_iter()
                .map(|tag| RelaxedConstraint::Tag { tag }),
        );
        relaxed.cuisine = None;
        relaxed.meal_type = None;
        relaxed.enforce_diet_tags = false;
        relaxed
    }

    /// Derive constraints searching with a reduced ingredient set.
    ///
    /// An empty `core` leaves the ingredient list unchanged.
    #[must_use]
    pub fn with_reduced_ingredients(&self, core: Vec<IngredientToken>, dropped: Vec<String>) -> Self {
        let mut reduced = self.clone();
        if core.is_empty() {
            return reduced;
        }
        reduced.ingredients = core;
        reduced
            .relaxations
            .push(RelaxedConstraint::IngredientSet { dropped });
        reduced
    }

    /// Normalized user ingredients
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientToken] {
        &self.ingredients
    }

    /// Original ingredient text
    #[must_use]
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|t| t.original().to_owned())
            .collect()
    }

    /// Hard dietary requirements
    #[must_use]
    pub fn diets(&self) -> &[DietaryRequirement] {
        &self.diets
    }

    /// Hard intolerances
    #[must_use]
    pub fn intolerances(&self) -> &[Intolerance] {
        &self.intolerances
    }

    /// Requested cuisine, if still enforced
    #[must_use]
    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    /// Requested meal type, if still enforced
    #[must_use]
    pub fn meal_type(&self) -> Option<&str> {
        self.meal_type.as_deref()
    }

    /// Mood
    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    /// Profile
    #[must_use]
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    /// Ready-time ceiling
    #[must_use]
    pub const fn max_ready_minutes(&self) -> Option<u32> {
        self.max_ready_minutes
    }

    /// Missing-ingredient allowance
    #[must_use]
    pub const fn max_missing(&self) -> Option<u32> {
        self.max_missing
    }

    /// Hardest acceptable difficulty
    #[must_use]
    pub const fn max_difficulty(&self) -> Option<Difficulty> {
        self.max_difficulty
    }

    /// Cook's skill level
    #[must_use]
    pub const fn skill_level(&self) -> Option<u8> {
        self.skill_level
    }

    /// Results wanted
    #[must_use]
    pub const fn target_count(&self) -> usize {
        self.target_count
    }

    /// Constraints dropped to derive this value
    #[must_use]
    pub fn relaxations(&self) -> &[RelaxedConstraint] {
        &self.relaxations
    }
}

fn canonical(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

fn clean_label(label: Option<&str>) -> Option<String> {
    label
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
}

fn invalid(message: &str) -> EngineError {
    EngineError::InvalidConstraints(message.to_owned())
}

fn parse_named<T>(
    value: Option<&str>,
    kind: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, EngineError> {
    value
        .map(|name| parse(name).ok_or_else(|| invalid(&format!("unknown {kind} '{name}'"))))
        .transpose()
}

fn parse_all<T: PartialEq>(
    names: &[String],
    kind: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Vec<T>, EngineError> {
    let mut parsed = Vec::with_capacity(names.len());
    for name in names {
        let value = parse(name).ok_or_else(|| invalid(&format!("unknown {kind} '{name}'")))?;
        if !parsed.contains(&value) {
            parsed.push(value);
        }
    }
    Ok(parsed)
}
