//! # Command Parser
//!
//! Turns one line of user text into a bound [`Command`].
//!
//! A line is a command word followed by free text (the preamble) and
//! `prefix/value` arguments:
//!
//! ```text
//! nom name/Greek Yogurt portion/1.5 rating/8
//! ```
//!
//! Argument values run until the next recognised prefix, so they may
//! contain spaces. Every field is validated here; a malformed line fails
//! with `NomError::Parse` before the model is touched.

use chrono::NaiveDate;
use nomnom_core::{
    Command, FoodAttribute, FoodPredicate, FoodUpdate, Name, NomError, Nutrient, Portion, Rating,
    Tag,
};
use std::collections::BTreeSet;

// =============================================================================
// PREFIXES
// =============================================================================

/// The argument prefixes understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    Name,
    Calorie,
    Protein,
    Carbohydrate,
    Fat,
    Tag,
    Date,
    Portion,
    Rating,
}

impl Prefix {
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Calorie,
        Self::Protein,
        Self::Carbohydrate,
        Self::Fat,
        Self::Tag,
        Self::Date,
        Self::Portion,
        Self::Rating,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name/",
            Self::Calorie => "cal/",
            Self::Protein => "protein/",
            Self::Carbohydrate => "carbohydrate/",
            Self::Fat => "fat/",
            Self::Tag => "tag/",
            Self::Date => "date/",
            Self::Portion => "portion/",
            Self::Rating => "rating/",
        }
    }

    fn nutrient_attribute(self) -> Option<FoodAttribute> {
        match self {
            Self::Calorie => Some(FoodAttribute::Calorie),
            Self::Protein => Some(FoodAttribute::Protein),
            Self::Carbohydrate => Some(FoodAttribute::Carbohydrate),
            Self::Fat => Some(FoodAttribute::Fat),
            _ => None,
        }
    }

    /// Split `word` into a prefix and the start of its value.
    fn strip(word: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|p| word.strip_prefix(p.as_str()).map(|rest| (p, rest)))
    }
}

// =============================================================================
// ARGUMENT MAP
// =============================================================================

/// Preamble plus every `prefix/value` pair, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMap {
    preamble: String,
    values: Vec<(Prefix, String)>,
}

impl ArgumentMap {
    /// Tokenize the text following the command word.
    #[must_use]
    pub fn tokenize(args: &str) -> Self {
        let mut preamble: Vec<&str> = Vec::new();
        let mut values: Vec<(Prefix, Vec<&str>)> = Vec::new();

        for word in args.split_whitespace() {
            match Prefix::strip(word) {
                Some((prefix, rest)) => {
                    let parts = if rest.is_empty() { Vec::new() } else { vec![rest] };
                    values.push((prefix, parts));
                }
                None => match values.last_mut() {
                    Some((_, parts)) => parts.push(word),
                    None => preamble.push(word),
                },
            }
        }

        Self {
            preamble: preamble.join(" "),
            values: values
                .into_iter()
                .map(|(prefix, parts)| (prefix, parts.join(" ")))
                .collect(),
        }
    }

    #[must_use]
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Every value given for `prefix`.
    pub fn all(&self, prefix: Prefix) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(move |(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
    }

    /// The single value for `prefix`, rejecting repeats.
    pub fn single(&self, prefix: Prefix) -> Result<Option<&str>, NomError> {
        let mut values = self.all(prefix);
        let first = values.next();
        if values.next().is_some() {
            return Err(NomError::Parse(format!(
                "Multiple values specified for {}",
                prefix.as_str()
            )));
        }
        Ok(first)
    }

    fn require(&self, prefix: Prefix, usage: &str) -> Result<&str, NomError> {
        self.single(prefix)?.ok_or_else(|| invalid_format(usage))
    }

    /// Fail if any prefix outside `allowed` is present.
    fn only(&self, allowed: &[Prefix], usage: &str) -> Result<(), NomError> {
        if self.values.iter().any(|(p, _)| !allowed.contains(p)) {
            return Err(invalid_format(usage));
        }
        Ok(())
    }
}

// =============================================================================
// USAGE
// =============================================================================

const UPDATE_USAGE: &str = "update: Creates a food, or edits the food with the same name.\n\
    Parameters: name/NAME [cal/CALORIES] [protein/PROTEIN] [carbohydrate/CARBOHYDRATE] [fat/FAT] [tag/TAG]...\n\
    Example: update name/Apple cal/95 protein/0 carbohydrate/25 fat/0 tag/fruit";

const DELETE_USAGE: &str = "delete: Deletes the food at the given index of the displayed list.\n\
    Parameters: INDEX (must be a positive integer)\n\
    Example: delete 1";

const NOM_USAGE: &str = "nom: Logs a food as eaten.\n\
    Parameters: name/NAME [date/YYYY-MM-DD] [portion/PORTION] [rating/1-10]\n\
    Example: nom name/Apple portion/2 rating/7";

const UNNOM_USAGE: &str = "unnom: Removes an eaten portion of a food.\n\
    Parameters: name/NAME [date/YYYY-MM-DD] [portion/PORTION]\n\
    Example: unnom name/Apple date/2024-05-01";

const FIND_USAGE: &str = "find: Lists foods matching every given criterion.\n\
    Parameters: [name/KEYWORDS] [tag/TAG]... [cal/N] [protein/N] [carbohydrate/N] [fat/N]\n\
    Example: find name/app tag/fruit";

const GOAL_USAGE: &str = "goal: Sets the daily calorie goal.\n\
    Parameters: CALORIES (a whole number)\n\
    Example: goal 2000";

const SUMMARY_USAGE: &str = "summary: Shows what was eaten on a day.\n\
    Parameters: [date/YYYY-MM-DD]";

const WEEK_USAGE: &str = "week: Shows daily calorie totals for the seven days ending on a date.\n\
    Parameters: [date/YYYY-MM-DD]";

const DATE_CONSTRAINTS: &str = "Dates should be valid calendar dates written as YYYY-MM-DD";

fn invalid_format(usage: &str) -> NomError {
    NomError::Parse(format!("Invalid command format!\n{}", usage))
}

// =============================================================================
// PARSER
// =============================================================================

/// Parses command lines, resolving omitted dates to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandParser {
    today: NaiveDate,
}

impl CommandParser {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// A parser whose default date is the local calendar date.
    #[must_use]
    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Parse one line of user input.
    pub fn parse(&self, input: &str) -> Result<Command, NomError> {
        let input = input.trim();
        let (word, rest) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));
        let args = ArgumentMap::tokenize(rest);

        match word.to_ascii_lowercase().as_str() {
            "update" => parse_update(&args),
            "delete" => parse_delete(&args),
            "nom" => self.parse_nom(&args),
            "unnom" => self.parse_unnom(&args),
            "list" => Ok(Command::List),
            "find" => parse_find(&args),
            "goal" => parse_goal(&args),
            "summary" => Ok(Command::Summary {
                date: self.parse_date_only(&args, SUMMARY_USAGE)?,
            }),
            "week" => Ok(Command::Week {
                date: self.parse_date_only(&args, WEEK_USAGE)?,
            }),
            "clear" => Ok(Command::Clear),
            "help" => Ok(Command::Help),
            "exit" => Ok(Command::Exit),
            "" => Err(invalid_format(nomnom_core::HELP_MESSAGE)),
            _ => Err(NomError::Parse("Unknown command".to_string())),
        }
    }

    fn parse_nom(&self, args: &ArgumentMap) -> Result<Command, NomError> {
        args.only(
            &[Prefix::Name, Prefix::Date, Prefix::Portion, Prefix::Rating],
            NOM_USAGE,
        )?;
        if !args.preamble().is_empty() {
            return Err(invalid_format(NOM_USAGE));
        }
        Ok(Command::Nom {
            name: Name::parse(args.require(Prefix::Name, NOM_USAGE)?)?,
            date: self.parse_date(args)?,
            portion: parse_portion(args)?,
            rating: args.single(Prefix::Rating)?.map(Rating::parse).transpose()?,
        })
    }

    fn parse_unnom(&self, args: &ArgumentMap) -> Result<Command, NomError> {
        args.only(&[Prefix::Name, Prefix::Date, Prefix::Portion], UNNOM_USAGE)?;
        if !args.preamble().is_empty() {
            return Err(invalid_format(UNNOM_USAGE));
        }
        Ok(Command::Unnom {
            name: Name::parse(args.require(Prefix::Name, UNNOM_USAGE)?)?,
            date: self.parse_date(args)?,
            portion: parse_portion(args)?,
        })
    }

    /// For commands whose only argument is an optional `date/`.
    fn parse_date_only(&self, args: &ArgumentMap, usage: &str) -> Result<NaiveDate, NomError> {
        args.only(&[Prefix::Date], usage)?;
        if !args.preamble().is_empty() {
            return Err(invalid_format(usage));
        }
        self.parse_date(args)
    }

    /// `date/` if present, otherwise today.
    fn parse_date(&self, args: &ArgumentMap) -> Result<NaiveDate, NomError> {
        match args.single(Prefix::Date)? {
            Some(raw) => parse_date_value(raw),
            None => Ok(self.today),
        }
    }
}

fn parse_date_value(raw: &str) -> Result<NaiveDate, NomError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| NomError::Parse(DATE_CONSTRAINTS.to_string()))
}

fn parse_portion(args: &ArgumentMap) -> Result<Portion, NomError> {
    Ok(args
        .single(Prefix::Portion)?
        .map(Portion::parse)
        .transpose()?
        .unwrap_or_default())
}

fn parse_tags<'a>(values: impl Iterator<Item = &'a str>) -> Result<Option<BTreeSet<Tag>>, NomError> {
    let raw: Vec<&str> = values.collect();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.into_iter()
        .map(Tag::parse)
        .collect::<Result<BTreeSet<_>, _>>()
        .map(Some)
}

fn parse_update(args: &ArgumentMap) -> Result<Command, NomError> {
    args.only(
        &[
            Prefix::Name,
            Prefix::Calorie,
            Prefix::Protein,
            Prefix::Carbohydrate,
            Prefix::Fat,
            Prefix::Tag,
        ],
        UPDATE_USAGE,
    )?;
    if !args.preamble().is_empty() {
        return Err(invalid_format(UPDATE_USAGE));
    }

    let nutrient = |prefix| -> Result<Option<Nutrient>, NomError> {
        args.single(prefix)?.map(Nutrient::parse).transpose()
    };

    Ok(Command::Update(FoodUpdate {
        name: Name::parse(args.require(Prefix::Name, UPDATE_USAGE)?)?,
        calorie: nutrient(Prefix::Calorie)?,
        protein: nutrient(Prefix::Protein)?,
        carbohydrate: nutrient(Prefix::Carbohydrate)?,
        fat: nutrient(Prefix::Fat)?,
        tags: parse_tags(args.all(Prefix::Tag))?,
    }))
}

fn parse_delete(args: &ArgumentMap) -> Result<Command, NomError> {
    args.only(&[], DELETE_USAGE)?;
    let index = args
        .preamble()
        .parse::<usize>()
        .ok()
        .filter(|i| *i > 0)
        .ok_or_else(|| invalid_format(DELETE_USAGE))?;
    Ok(Command::Delete { index })
}

fn parse_find(args: &ArgumentMap) -> Result<Command, NomError> {
    args.only(
        &[
            Prefix::Name,
            Prefix::Tag,
            Prefix::Calorie,
            Prefix::Protein,
            Prefix::Carbohydrate,
            Prefix::Fat,
        ],
        FIND_USAGE,
    )?;
    if !args.preamble().is_empty() {
        return Err(invalid_format(FIND_USAGE));
    }

    let mut predicates = Vec::new();
    if let Some(query) = args.single(Prefix::Name)? {
        predicates.push(FoodPredicate::name(query).map_err(|_| invalid_format(FIND_USAGE))?);
    }
    let tags: Vec<String> = args.all(Prefix::Tag).map(str::to_string).collect();
    if !tags.is_empty() {
        predicates.push(FoodPredicate::tags(tags).map_err(|_| invalid_format(FIND_USAGE))?);
    }
    for prefix in [
        Prefix::Calorie,
        Prefix::Protein,
        Prefix::Carbohydrate,
        Prefix::Fat,
    ] {
        if let (Some(value), Some(attribute)) = (args.single(prefix)?, prefix.nutrient_attribute()) {
            let value = Nutrient::parse(value)?;
            predicates.push(
                FoodPredicate::nutrient(attribute, value.as_str())
                    .map_err(|e| NomError::Parse(e.to_string()))?,
            );
        }
    }

    if predicates.is_empty() {
        return Err(invalid_format(FIND_USAGE));
    }
    Ok(Command::Find { predicates })
}

fn parse_goal(args: &ArgumentMap) -> Result<Command, NomError> {
    args.only(&[], GOAL_USAGE)?;
    let calories = args
        .preamble()
        .parse::<i32>()
        .map_err(|_| invalid_format(GOAL_USAGE))?;
    Ok(Command::Goal { calories })
}

// =============================================================================
// TESTS
// =============================================================================
