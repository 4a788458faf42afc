// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Catalog filtering
//
// Pure functions over a fetched catalog. Every call rescans the input;
// catalogs are screen-sized.

use crate::saved::SavedItemsStore;
use crate::types::{CompanyFilter, FeedbackEntry, Toy};

/// Case-insensitive substring match against the toy name.
/// An empty query matches every name.
pub fn name_matches(toy: &Toy, query: &str) -> bool {
    query.is_empty() || toy.toy_name.to_lowercase().contains(&query.to_lowercase())
}

/// Toys passing both the brand selector and the name query, in input order
pub fn filter_toys<'a>(toys: &'a [Toy], query: &str, company: &CompanyFilter) -> Vec<&'a Toy> {
    toys.iter()
        .filter(|toy| company.matches(toy) && name_matches(toy, query))
        .collect()
}

/// Number of toys matching the brand selector alone, for filter badges
pub fn company_count(toys: &[Toy], company: &CompanyFilter) -> usize {
    match company {
        CompanyFilter::All => toys.len(),
        CompanyFilter::Company(_) => toys.iter().filter(|toy| company.matches(toy)).count(),
    }
}

/// Badge counts for the sentinel and every known brand, in display order
pub fn company_badges(toys: &[Toy]) -> Vec<(CompanyFilter, usize)> {
    CompanyFilter::known()
        .into_iter()
        .map(|company| {
            let count = company_count(toys, &company);
            (company, count)
        })
        .collect()
}

/// Saved toys whose name matches the query, in input order
pub fn filter_saved<'a>(toys: &'a [Toy], saved: &SavedItemsStore, query: &str) -> Vec<&'a Toy> {
    toys.iter()
        .filter(|toy| saved.is_saved(&toy.id) && name_matches(toy, query))
        .collect()
}

/// Star filter for a toy's feedback list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingFilter {
    selected: Option<u8>,
}

impl RatingFilter {
    /// Filter showing every entry
    pub fn none() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    /// Select a star, or clear the filter when that star is already selected
    pub fn select(self, star: u8) -> Self {
        if self.selected == Some(star) {
            Self { selected: None }
        } else {
            Self {
                selected: Some(star),
            }
        }
    }

    /// Entries with exactly the selected rating, or all entries
    pub fn apply<'a>(&self, entries: &'a [FeedbackEntry]) -> Vec<&'a FeedbackEntry> {
        match self.selected {
            Some(star) => entries.iter().filter(|e| e.rating == star).collect(),
            None => entries.iter().collect(),
        }
    }
}
