//! # Filter Engine
//!
//! Boolean predicates over Food attributes, used to narrow catalog views.
//!
//! One parametrized [`FoodPredicate`] covers every attribute: it pairs the
//! attribute being read with a [`MatchMode`] and the comparison keywords.
//! A predicate only ever tests a single attribute; AND composition lives in
//! [`FoodFilter`], which is what the model keeps as its current view filter.

use crate::{Food, NomError};
use std::fmt;

// =============================================================================
// ATTRIBUTES & MODES
// =============================================================================

/// The Food attribute a predicate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodAttribute {
    Name,
    Tag,
    Calorie,
    Protein,
    Carbohydrate,
    Fat,
}

impl FoodAttribute {
    /// Textual values of this attribute on `food`.
    ///
    /// Single-valued for everything except tags.
    pub fn values<'a>(&self, food: &'a Food) -> Vec<&'a str> {
        match self {
            Self::Name => vec![food.name().as_str()],
            Self::Tag => food.tags().iter().map(|t| t.as_str()).collect(),
            Self::Calorie => vec![food.calorie().as_str()],
            Self::Protein => vec![food.protein().as_str()],
            Self::Carbohydrate => vec![food.carbohydrate().as_str()],
            Self::Fat => vec![food.fat().as_str()],
        }
    }

    /// True for the four nutrient attributes.
    #[must_use]
    pub fn is_nutrient(&self) -> bool {
        matches!(
            self,
            Self::Calorie | Self::Protein | Self::Carbohydrate | Self::Fat
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Tag => "tag",
            Self::Calorie => "calorie",
            Self::Protein => "protein",
            Self::Carbohydrate => "carbohydrate",
            Self::Fat => "fat",
        }
    }
}

/// How a predicate compares its keywords against attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Both sides parse as integers and are equal.
    EqualsNumeric,
    /// Some keyword is a case-insensitive substring of some word.
    ContainsWord,
    /// `ContainsWord`, or the whole query and the value are case-insensitive
    /// prefixes of one another in either direction.
    PrefixEitherDirection,
}

// =============================================================================
// MATCHING PRIMITIVES
// =============================================================================

/// Case-insensitive word match: equal, or `keyword` occurs inside `word`.
#[must_use]
pub fn keyword_matches_word(keyword: &str, word: &str) -> bool {
    let keyword = keyword.to_lowercase();
    !keyword.is_empty() && word.to_lowercase().contains(&keyword)
}

/// Case-insensitive prefix check in either direction.
#[must_use]
pub fn prefix_either_direction(query: &str, stored: &str) -> bool {
    let query = query.to_lowercase();
    let stored = stored.to_lowercase();
    if query.is_empty() || stored.is_empty() {
        return false;
    }
    stored.starts_with(&query) || query.starts_with(&stored)
}

/// Integer equality of two textual operands.
///
/// Fails with `InvalidArgument` if either side does not parse.
pub fn numeric_equals(lhs: &str, rhs: &str) -> Result<bool, NomError> {
    let parse = |s: &str| {
        s.trim().parse::<i64>().map_err(|_| {
            NomError::InvalidArgument(format!("'{}' is not a whole number", s.trim()))
        })
    };
    Ok(parse(lhs)? == parse(rhs)?)
}

// =============================================================================
// PREDICATE
// =============================================================================

/// A single-attribute predicate over foods.
///
/// Equality is structural: same attribute, same mode, same keywords in the
/// same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoodPredicate {
    attribute: FoodAttribute,
    mode: MatchMode,
    keywords: Vec<String>,
}

impl FoodPredicate {
    /// Build a predicate, checking the keywords against the mode.
    pub fn new(
        attribute: FoodAttribute,
        mode: MatchMode,
        keywords: Vec<String>,
    ) -> Result<Self, NomError> {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            return Err(NomError::InvalidArgument(format!(
                "A {} filter needs at least one keyword",
                attribute.as_str()
            )));
        }

        if mode == MatchMode::EqualsNumeric {
            if keywords.len() != 1 {
                return Err(NomError::InvalidArgument(format!(
                    "A {} filter takes exactly one value",
                    attribute.as_str()
                )));
            }
            // Validate the comparison side up front; the food side is a
            // validated Nutrient and always parses.
            numeric_equals(&keywords[0], "0")?;
        }

        Ok(Self {
            attribute,
            mode,
            keywords,
        })
    }

    /// Name auto-complete predicate over a free-text query.
    pub fn name(query: &str) -> Result<Self, NomError> {
        Self::new(
            FoodAttribute::Name,
            MatchMode::PrefixEitherDirection,
            query.split_whitespace().map(str::to_string).collect(),
        )
    }

    /// Tag predicate over a list of keywords.
    pub fn tags(keywords: Vec<String>) -> Result<Self, NomError> {
        Self::new(FoodAttribute::Tag, MatchMode::ContainsWord, keywords)
    }

    /// Exact-value predicate over a nutrient attribute.
    pub fn nutrient(attribute: FoodAttribute, value: &str) -> Result<Self, NomError> {
        if !attribute.is_nutrient() {
            return Err(NomError::InvalidArgument(format!(
                "{} is not a nutrient",
                attribute.as_str()
            )));
        }
        Self::new(attribute, MatchMode::EqualsNumeric, vec![value.to_string()])
    }

    #[must_use]
    pub fn attribute(&self) -> FoodAttribute {
        self.attribute
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Test the predicate against one food.
    #[must_use]
    pub fn test(&self, food: &Food) -> bool {
        let values = self.attribute.values(food);
        match self.mode {
            MatchMode::EqualsNumeric => values
                .iter()
                .any(|v| numeric_equals(v, &self.keywords[0]).unwrap_or(false)),
            MatchMode::ContainsWord => values.iter().any(|v| self.any_word_matches(v)),
            MatchMode::PrefixEitherDirection => {
                let query = self.keywords.join(" ");
                values
                    .iter()
                    .any(|v| self.any_word_matches(v) || prefix_either_direction(&query, v))
            }
        }
    }

    fn any_word_matches(&self, sentence: &str) -> bool {
        sentence.split_whitespace().any(|word| {
            self.keywords
                .iter()
                .any(|keyword| keyword_matches_word(keyword, word))
        })
    }
}

impl fmt::Display for FoodPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.attribute.as_str(), self.keywords.join(" "))
    }
}

// =============================================================================
// FILTER (AND COMPOSITION)
// =============================================================================

/// Conjunction of predicates. An empty filter matches every food.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodFilter {
    predicates: Vec<FoodPredicate>,
}

impl FoodFilter {
    /// The filter that shows every food.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(predicates: Vec<FoodPredicate>) -> Self {
        Self { predicates }
    }

    #[must_use]
    pub fn predicates(&self) -> &[FoodPredicate] {
        &self.predicates
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn test(&self, food: &Food) -> bool {
        self.predicates.iter().all(|p| p.test(food))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str, calorie: &str, tags: &[&str]) -> Food {
        Food::parse(name, calorie, "3", "40", "1", tags).expect("valid food")
    }

    #[test]
    fn name_prefix_of_stored_name_matches() {
        let apple = food("Apple", "100", &[]);
        assert!(FoodPredicate::name("Ap").expect("pred").test(&apple));
    }

    #[test]
    fn stored_name_prefix_of_query_matches() {
        let apple = food("Apple", "100", &[]);
        assert!(FoodPredicate::name("Apple Pie").expect("pred").test(&apple));
    }

    #[test]
    fn keyword_substring_of_word_matches() {
        let pie = food("Blueberry Pie", "300", &[]);
        assert!(FoodPredicate::name("berry").expect("pred").test(&pie));
        assert!(FoodPredicate::name("PIE").expect("pred").test(&pie));
        assert!(!FoodPredicate::name("cake").expect("pred").test(&pie));
    }

    #[test]
    fn tag_predicate_matches_any_tag() {
        let apple = food("Apple", "100", &["fruit", "snack"]);
        assert!(
            FoodPredicate::tags(vec!["SNA".into()])
                .expect("pred")
                .test(&apple)
        );
        assert!(
            !FoodPredicate::tags(vec!["meat".into()])
                .expect("pred")
                .test(&apple)
        );
    }

    #[test]
    fn nutrient_predicate_is_numeric() {
        let apple = food("Apple", "100", &[]);
        let pred = FoodPredicate::nutrient(FoodAttribute::Calorie, "0100").expect("pred");
        assert!(pred.test(&apple));
        let pred = FoodPredicate::nutrient(FoodAttribute::Calorie, "99").expect("pred");
        assert!(!pred.test(&apple));
    }

    #[test]
    fn nutrient_predicate_rejects_non_numbers() {
        let result = FoodPredicate::nutrient(FoodAttribute::Fat, "lots");
        assert!(matches!(result, Err(NomError::InvalidArgument(_))));
        assert!(matches!(
            numeric_equals("12", "x"),
            Err(NomError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_keywords_rejected() {
        assert!(FoodPredicate::name("   ").is_err());
        assert!(FoodPredicate::tags(vec![]).is_err());
    }

    #[test]
    fn predicate_equality_respects_keyword_order() {
        let a = FoodPredicate::tags(vec!["fruit".into(), "snack".into()]).expect("pred");
        let b = FoodPredicate::tags(vec!["fruit".into(), "snack".into()]).expect("pred");
        let c = FoodPredicate::tags(vec!["snack".into(), "fruit".into()]).expect("pred");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let name = FoodPredicate::name("fruit").expect("pred");
        let tag = FoodPredicate::tags(vec!["fruit".into()]).expect("pred");
        assert_ne!(name, tag);
    }

    #[test]
    fn filter_is_conjunction() {
        let apple = food("Apple", "100", &["fruit"]);
        let filter = FoodFilter::new(vec![
            FoodPredicate::name("apple").expect("pred"),
            FoodPredicate::nutrient(FoodAttribute::Calorie, "200").expect("pred"),
        ]);
        assert!(!filter.test(&apple));
        assert!(FoodFilter::all().test(&apple));
    }
}
