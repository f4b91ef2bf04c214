// ABOUTME: Semantic tag check for cuisine, meal type, and diet labels
// ABOUTME: Non-safety relevance check separating GOLDEN from RESCUE candidates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pantry_core::models::{Candidate, DietaryRequirement, SemanticTag};

/// Tags from `requirements` the candidate does not carry
#[must_use]
pub fn failed_tags(candidate: &Candidate, requirements: &[SemanticTag]) -> Vec<SemanticTag> {
    requirements
        .iter()
        .filter(|tag| !carries(candidate, tag))
        .cloned()
        .collect()
}

fn carries(candidate: &Candidate, tag: &SemanticTag) -> bool {
    match tag {
        SemanticTag::Cuisine(cuisine) => candidate.tags.cuisines.iter().any(|c| c == cuisine),
        SemanticTag::MealType(meal) => candidate
            .tags
            .meal_types
            .iter()
            .any(|m| m == meal || m.split_whitespace().any(|word| word == meal)),
        SemanticTag::Diet(diet) => carries_diet(candidate, *diet),
    }
}

fn carries_diet(candidate: &Candidate, diet: DietaryRequirement) -> bool {
    let labelled = |d: DietaryRequirement| {
        candidate
            .tags
            .diets
            .iter()
            .any(|label| label.contains(d.tag_phrase()))
    };
    let flags = candidate.source_flags;
    let vegan = labelled(DietaryRequirement::Vegan) || flags.vegan == Some(true);
    let vegetarian = labelled(DietaryRequirement::Vegetarian) || flags.vegetarian == Some(true);

    match diet {
        DietaryRequirement::Vegan => vegan,
        DietaryRequirement::Vegetarian => vegetarian || vegan,
        DietaryRequirement::Pescatarian => {
            labelled(DietaryRequirement::Pescatarian) || vegetarian || vegan
        }
        DietaryRequirement::GlutenFree => {
            labelled(DietaryRequirement::GlutenFree) || flags.gluten_free == Some(true)
        }
        DietaryRequirement::DairyFree => {
            labelled(DietaryRequirement::DairyFree) || flags.dairy_free == Some(true) || vegan
        }
    }
}
