//! Demographic label vocabularies.
//!
//! Authors declare their gender and age group as attributes.
//! Both dimensions are closed sets: a value that is not in the [Vocabulary]
//! is a fatal error, and labels are stored as the index of the value in its set.
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, StructureError};

/// Gender categories of the PAN13 English corpus.
pub const GENDER_NAMES: [&str; 2] = ["male", "female"];
/// Age groups of the PAN13 English corpus.
pub const AGE_NAMES: [&str; 3] = ["10s", "20s", "30s"];

/// A label dimension, tied to the author attribute that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Gender,
    Age,
}

impl Dimension {
    /// Name of the author attribute holding this dimension.
    pub fn attribute(&self) -> &'static str {
        match self {
            Dimension::Gender => "gender",
            Dimension::Age => "age_group",
        }
    }
}

/// Label pair of an author block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Labels {
    pub gender: u8,
    pub age: u8,
}

impl Labels {
    pub fn new(gender: u8, age: u8) -> Self {
        Self { gender, age }
    }
}

/// Closed category sets for both label dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    genders: Vec<String>,
    ages: Vec<String>,
}

impl Default for Vocabulary {
    /// PAN13 English categories.
    fn default() -> Self {
        Self {
            genders: GENDER_NAMES.iter().map(|s| s.to_string()).collect(),
            ages: AGE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Vocabulary {
    /// Build a vocabulary from category names.
    ///
    /// Errors if a dimension is empty, holds duplicates or more than 256 categories.
    pub fn new(genders: Vec<String>, ages: Vec<String>) -> Result<Self, Error> {
        Self::check(Dimension::Gender, &genders)?;
        Self::check(Dimension::Age, &ages)?;
        Ok(Self { genders, ages })
    }

    fn check(dimension: Dimension, names: &[String]) -> Result<(), Error> {
        if names.is_empty() {
            return Err(Error::Custom(format!(
                "no `{}` category declared",
                dimension.attribute()
            )));
        }
        if names.len() > usize::from(u8::MAX) + 1 {
            return Err(Error::Custom(format!(
                "too many `{}` categories ({})",
                dimension.attribute(),
                names.len()
            )));
        }
        if let Some(dup) = names.iter().duplicates().next() {
            return Err(Error::Custom(format!(
                "`{}` category {:?} is declared twice",
                dimension.attribute(),
                dup
            )));
        }
        Ok(())
    }

    pub fn names(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Gender => &self.genders,
            Dimension::Age => &self.ages,
        }
    }

    pub fn genders(&self) -> &[String] {
        &self.genders
    }

    pub fn ages(&self) -> &[String] {
        &self.ages
    }

    /// Name of the category at `index`, if any.
    pub fn name(&self, dimension: Dimension, index: u8) -> Option<&str> {
        self.names(dimension)
            .get(usize::from(index))
            .map(String::as_str)
    }

    /// Resolve an author attribute value into its category index.
    ///
    /// `position` is only used for error reporting.
    pub fn resolve(
        &self,
        dimension: Dimension,
        value: Option<&str>,
        position: u64,
    ) -> Result<u8, StructureError> {
        let attribute = dimension.attribute();
        let value = value.ok_or(StructureError::MissingAttribute {
            attribute,
            position,
        })?;

        self.names(dimension)
            .iter()
            .position(|name| name == value)
            // vocabularies hold at most 256 names
            .map(|idx| idx as u8)
            .ok_or_else(|| StructureError::UnknownCategory {
                attribute,
                value: value.to_string(),
                position,
            })
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gender: [{}], age_group: [{}]",
            self.genders.iter().join(", "),
            self.ages.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_indices() {
        let v = Vocabulary::default();
        assert_eq!(v.resolve(Dimension::Gender, Some("male"), 0), Ok(0));
        assert_eq!(v.resolve(Dimension::Gender, Some("female"), 0), Ok(1));
        assert_eq!(v.resolve(Dimension::Age, Some("30s"), 0), Ok(2));
        assert_eq!(v.name(Dimension::Age, 1), Some("20s"));
        assert_eq!(v.name(Dimension::Age, 3), None);
    }

    #[test]
    fn missing_value() {
        let v = Vocabulary::default();
        assert_eq!(
            v.resolve(Dimension::Age, None, 42),
            Err(StructureError::MissingAttribute {
                attribute: "age_group",
                position: 42
            })
        );
    }

    #[test]
    fn unknown_value_is_not_defaulted() {
        let v = Vocabulary::default();
        let err = v.resolve(Dimension::Gender, Some("Female"), 7).unwrap_err();
        assert_eq!(
            err,
            StructureError::UnknownCategory {
                attribute: "gender",
                value: "Female".to_string(),
                position: 7
            }
        );
    }

    #[test]
    fn custom_vocabulary() {
        let v = Vocabulary::new(
            vec!["male".into(), "female".into()],
            vec!["18-24".into(), "25-34".into(), "35-49".into()],
        )
        .unwrap();
        assert_eq!(v.resolve(Dimension::Age, Some("25-34"), 0), Ok(1));
        assert!(v.resolve(Dimension::Age, Some("20s"), 0).is_err());
    }

    #[test]
    fn reject_bad_vocabularies() {
        assert!(Vocabulary::new(vec![], vec!["10s".into()]).is_err());
        assert!(Vocabulary::new(vec!["male".into(), "male".into()], vec!["10s".into()]).is_err());
    }
}
