//! Wizard sections and error routing.

use crate::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of the wizard, in display order
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Cover image
    #[default]
    Media,
    /// Title, description, category, tags
    Basics,
    /// Start and end date/time
    Schedule,
    /// Venue or meeting link
    Location,
    /// Paid toggle and ticket tiers
    Tickets,
    /// Privacy and capacity
    Settings,
}

impl Section {
    /// Every section, in display order
    pub const ALL: [Self; 6] = [
        Self::Media,
        Self::Basics,
        Self::Schedule,
        Self::Location,
        Self::Tickets,
        Self::Settings,
    ];

    /// Sections searched, in order, when a submission is blocked.
    ///
    /// Media and settings own no validated field.
    pub const SUBMIT_PRIORITY: [Self; 4] =
        [Self::Basics, Self::Schedule, Self::Location, Self::Tickets];

    /// Scalar field keys owned by this section
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Media => &["coverImage"],
            Self::Basics => &["title", "description", "category", "tags"],
            Self::Schedule => &["startDate", "startTime", "endDate", "endTime"],
            Self::Location => &["location", "isOnline"],
            Self::Tickets => &["isPaid"],
            Self::Settings => &["isPrivate", "capacityLimit"],
        }
    }

    /// Whether an error at `path` belongs to this section
    #[must_use]
    pub fn owns(self, path: &str) -> bool {
        self.fields().iter().any(|field| *field == path)
            || (self == Self::Tickets && path.starts_with("tickets."))
    }

    /// Whether any error in `errors` belongs to this section
    #[must_use]
    pub fn has_error(self, errors: &ValidationErrors) -> bool {
        errors.paths().any(|path| self.owns(path))
    }

    /// Number of errors belonging to this section
    #[must_use]
    pub fn error_count(self, errors: &ValidationErrors) -> usize {
        errors.paths().filter(|path| self.owns(path)).count()
    }

    /// Position in display order
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The section after this one
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The section before this one
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Basics => "basics",
            Self::Schedule => "schedule",
            Self::Location => "location",
            Self::Tickets => "tickets",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First section in submit priority order that has an error
#[must_use]
pub fn first_error_section(errors: &ValidationErrors) -> Option<Section> {
    Section::SUBMIT_PRIORITY
        .into_iter()
        .find(|section| section.has_error(errors))
}

/// Per-section error counts, for section badges. Sections without errors are omitted.
#[must_use]
pub fn error_summary(errors: &ValidationErrors) -> Vec<(Section, usize)> {
    Section::ALL
        .into_iter()
        .map(|section| (section, section.error_count(errors)))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Tracks which section is on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SectionRouter {
    active: Section,
}

impl SectionRouter {
    /// Router starting at the first section
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: Section::Media,
        }
    }

    /// Section on screen
    #[must_use]
    pub const fn active(&self) -> Section {
        self.active
    }

    /// Show `section`
    pub fn go_to(&mut self, section: Section) {
        self.active = section;
    }

    /// Advance one section. Returns `false` on the last section.
    pub fn next(&mut self) -> bool {
        match self.active.next() {
            Some(section) => {
                self.active = section;
                true
            },
            None => false,
        }
    }

    /// Go back one section. Returns `false` on the first section.
    pub fn previous(&mut self) -> bool {
        match self.active.previous() {
            Some(section) => {
                self.active = section;
                true
            },
            None => false,
        }
    }

    /// Jump to the first section with an error. Stays put if none has one.
    pub fn jump_to_first_error(&mut self, errors: &ValidationErrors) -> Option<Section> {
        let target = first_error_section(errors)?;
        self.active = target;
        Some(target)
    }
}
