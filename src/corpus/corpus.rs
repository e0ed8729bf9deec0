//! Aligned corpus.
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::labels::{Dimension, Labels, Vocabulary};

/// Normalized texts with their parallel gender and age labels.
///
/// `texts`, `genders` and `ages` always have the same length,
/// and every label is a valid index in the [Vocabulary].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    vocabulary: Vocabulary,
    texts: Vec<String>,
    genders: Vec<u8>,
    ages: Vec<u8>,
}

impl Corpus {
    /// Build a corpus from its parts, checking alignment and label ranges.
    pub fn from_raw_parts(
        vocabulary: Vocabulary,
        texts: Vec<String>,
        genders: Vec<u8>,
        ages: Vec<u8>,
    ) -> Result<Self, String> {
        if texts.len() != genders.len() || texts.len() != ages.len() {
            return Err(format!(
                "misaligned corpus: {} texts, {} genders, {} ages",
                texts.len(),
                genders.len(),
                ages.len()
            ));
        }

        for (dimension, labels) in [(Dimension::Gender, &genders), (Dimension::Age, &ages)] {
            let nb_names = vocabulary.names(dimension).len();
            if let Some(bad) = labels.iter().find(|&&l| usize::from(l) >= nb_names) {
                return Err(format!(
                    "label {} is out of the `{}` vocabulary ({} categories)",
                    bad,
                    dimension.attribute(),
                    nb_names
                ));
            }
        }

        Ok(Self {
            vocabulary,
            texts,
            genders,
            ages,
        })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn genders(&self) -> &[u8] {
        &self.genders
    }

    pub fn ages(&self) -> &[u8] {
        &self.ages
    }

    /// Iterate over `(text, labels)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Labels)> {
        self.texts
            .iter()
            .zip(self.genders.iter().zip(&self.ages))
            .map(|(text, (&gender, &age))| (text.as_str(), Labels::new(gender, age)))
    }

    /// Count rows per category.
    pub fn summary(&self) -> Summary {
        let count = |dimension: Dimension, labels: &[u8]| {
            let names = self.vocabulary.names(dimension);
            let mut counts: BTreeMap<String, usize> =
                names.iter().map(|name| (name.clone(), 0)).collect();
            for &label in labels {
                if let Some(c) = counts.get_mut(&names[usize::from(label)]) {
                    *c += 1;
                }
            }
            counts
        };

        Summary {
            documents: self.len(),
            genders: count(Dimension::Gender, &self.genders),
            ages: count(Dimension::Age, &self.ages),
        }
    }
}

/// Row counts of a [Corpus].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub documents: usize,
    pub genders: BTreeMap<String, usize>,
    pub ages: BTreeMap<String, usize>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "documents: {}", self.documents)?;
        for (name, count) in &self.genders {
            writeln!(f, "gender {name}: {count}")?;
        }
        for (name, count) in &self.ages {
            writeln!(f, "age_group {name}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text number {i}")).collect()
    }

    #[test]
    fn misaligned() {
        let r = Corpus::from_raw_parts(Vocabulary::default(), texts(2), vec![0, 1], vec![0]);
        assert!(r.is_err());
    }

    #[test]
    fn out_of_vocabulary() {
        let r = Corpus::from_raw_parts(Vocabulary::default(), texts(1), vec![2], vec![0]);
        assert!(r.is_err());
        let r = Corpus::from_raw_parts(Vocabulary::default(), texts(1), vec![0], vec![3]);
        assert!(r.is_err());
    }

    #[test]
    fn rows() {
        let c = Corpus::from_raw_parts(Vocabulary::default(), texts(2), vec![0, 1], vec![2, 0])
            .unwrap();
        let rows: Vec<_> = c.rows().collect();
        assert_eq!(
            rows,
            vec![
                ("text number 0", Labels::new(0, 2)),
                ("text number 1", Labels::new(1, 0))
            ]
        );
    }

    #[test]
    fn summary() {
        let c = Corpus::from_raw_parts(
            Vocabulary::default(),
            texts(3),
            vec![1, 1, 0],
            vec![1, 1, 1],
        )
        .unwrap();
        let s = c.summary();
        assert_eq!(s.documents, 3);
        assert_eq!(s.genders["female"], 2);
        assert_eq!(s.genders["male"], 1);
        assert_eq!(s.ages["20s"], 3);
        assert_eq!(s.ages["10s"], 0);
        assert!(s.to_string().starts_with("documents: 3\n"));
    }
}
