//! Draft data model.
//!
//! The draft mirrors the wizard form one-to-one. Every free-text input is
//! kept as the raw string the user typed, so a half-typed price or a date
//! the user is still editing round-trips through autosave unchanged. Typed
//! views such as [`EventDraft::capacity_limit`] parse on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an existing event (edit mode)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Conference (default)
    #[default]
    Conference,
    /// Workshop
    Workshop,
    /// Concert
    Concert,
    /// Festival
    Festival,
    /// Sports
    Sports,
    /// Networking
    Networking,
    /// Exhibition
    Exhibition,
    /// Anything else
    Other,
}

impl EventCategory {
    /// Every category, in display order
    pub const ALL: [Self; 8] = [
        Self::Conference,
        Self::Workshop,
        Self::Concert,
        Self::Festival,
        Self::Sports,
        Self::Networking,
        Self::Exhibition,
        Self::Other,
    ];

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conference => "Conference",
            Self::Workshop => "Workshop",
            Self::Concert => "Concert",
            Self::Festival => "Festival",
            Self::Sports => "Sports",
            Self::Networking => "Networking",
            Self::Exhibition => "Exhibition",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cover image as shown in the wizard: a preview plus the original file name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    /// Original file name
    pub file_name: String,
    /// Displayable preview (a `data:` URL or a remote URL in edit mode)
    pub preview: String,
}

/// One ticket tier.
///
/// Blank optional fields (`description`, `sale_start`, `sale_end`,
/// `max_per_order`) mean "not set".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketTier {
    /// Tier name shown to buyers
    pub name: String,
    /// Unit price, decimal text
    pub price: String,
    /// Tickets available in this tier
    pub quantity: String,
    /// Optional blurb
    pub description: String,
    /// Sale window start, `YYYY-MM-DDTHH:MM`
    pub sale_start: String,
    /// Sale window end, `YYYY-MM-DDTHH:MM`
    pub sale_end: String,
    /// Per-order cap
    pub max_per_order: String,
}

impl TicketTier {
    /// The blank row appended by "add tier"
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Raw value of `field`
    #[must_use]
    pub fn get(&self, field: TicketField) -> &str {
        match field {
            TicketField::Name => &self.name,
            TicketField::Price => &self.price,
            TicketField::Quantity => &self.quantity,
            TicketField::Description => &self.description,
            TicketField::SaleStart => &self.sale_start,
            TicketField::SaleEnd => &self.sale_end,
            TicketField::MaxPerOrder => &self.max_per_order,
        }
    }

    /// Overwrite `field` with `value`
    pub fn set(&mut self, field: TicketField, value: String) {
        let slot = match field {
            TicketField::Name => &mut self.name,
            TicketField::Price => &mut self.price,
            TicketField::Quantity => &mut self.quantity,
            TicketField::Description => &mut self.description,
            TicketField::SaleStart => &mut self.sale_start,
            TicketField::SaleEnd => &mut self.sale_end,
            TicketField::MaxPerOrder => &mut self.max_per_order,
        };
        *slot = value;
    }
}

/// The complete in-progress event definition
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    /// Event title; also gates autosave
    pub title: String,
    /// Long description
    pub description: String,
    /// Event category
    pub category: EventCategory,
    /// Distinct, trimmed tags in insertion order
    pub tags: Vec<String>,
    /// Selected cover image, if any
    pub cover_image: Option<CoverImage>,
    /// Online events need no location
    pub is_online: bool,
    /// Venue for in-person events
    pub location: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    /// `HH:MM`
    pub end_time: String,
    /// Hidden from public listings
    pub is_private: bool,
    /// Paid events require ticket tiers to validate
    pub is_paid: bool,
    /// Attendee cap as typed; see [`EventDraft::capacity_limit`]
    pub capacity_limit: String,
    /// Ticket tiers, addressed by position
    pub tickets: Vec<TicketTier>,
}

impl EventDraft {
    /// Raw value of a text field
    #[must_use]
    pub fn text(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::Location => &self.location,
            DraftField::StartDate => &self.start_date,
            DraftField::StartTime => &self.start_time,
            DraftField::EndDate => &self.end_date,
            DraftField::EndTime => &self.end_time,
            DraftField::CapacityLimit => &self.capacity_limit,
        }
    }

    /// Overwrite a text field
    pub fn set_text(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::Title => &mut self.title,
            DraftField::Description => &mut self.description,
            DraftField::Location => &mut self.location,
            DraftField::StartDate => &mut self.start_date,
            DraftField::StartTime => &mut self.start_time,
            DraftField::EndDate => &mut self.end_date,
            DraftField::EndTime => &mut self.end_time,
            DraftField::CapacityLimit => &mut self.capacity_limit,
        };
        *slot = value;
    }

    /// Current value of a boolean flag
    #[must_use]
    pub const fn flag(&self, flag: DraftFlag) -> bool {
        match flag {
            DraftFlag::IsOnline => self.is_online,
            DraftFlag::IsPrivate => self.is_private,
            DraftFlag::IsPaid => self.is_paid,
        }
    }

    /// Flip a boolean flag, returning the new value
    pub fn toggle(&mut self, flag: DraftFlag) -> bool {
        let slot = match flag {
            DraftFlag::IsOnline => &mut self.is_online,
            DraftFlag::IsPrivate => &mut self.is_private,
            DraftFlag::IsPaid => &mut self.is_paid,
        };
        *slot = !*slot;
        *slot
    }

    /// Add a tag. Blank and duplicate tags are rejected.
    ///
    /// Returns `true` if the tag list changed.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag. Returns `true` if it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Attendee cap, if one is set and parses as a positive integer.
    ///
    /// The raw field is never validated; anything else reads as "no limit".
    #[must_use]
    pub fn capacity_limit(&self) -> Option<u32> {
        self.capacity_limit
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|limit| *limit > 0)
    }
}

/// Text fields of the draft that are edited by [`EventDraft::set_text`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// `title`
    Title,
    /// `description`
    Description,
    /// `location`
    Location,
    /// `startDate`
    StartDate,
    /// `startTime`
    StartTime,
    /// `endDate`
    EndDate,
    /// `endTime`
    EndTime,
    /// `capacityLimit`
    CapacityLimit,
}

impl DraftField {
    /// Field key as used in validation paths and the persisted form
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Location => "location",
            Self::StartDate => "startDate",
            Self::StartTime => "startTime",
            Self::EndDate => "endDate",
            Self::EndTime => "endTime",
            Self::CapacityLimit => "capacityLimit",
        }
    }
}

/// Boolean flags of the draft
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DraftFlag {
    /// Event happens online
    IsOnline,
    /// Event is unlisted
    IsPrivate,
    /// Event sells tickets
    IsPaid,
}

impl DraftFlag {
    /// Field key as used in validation paths
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::IsOnline => "isOnline",
            Self::IsPrivate => "isPrivate",
            Self::IsPaid => "isPaid",
        }
    }
}

/// Fields of a ticket tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TicketField {
    /// Tier name
    Name,
    /// Unit price
    Price,
    /// Tickets available
    Quantity,
    /// Tier blurb
    Description,
    /// Sale window start
    SaleStart,
    /// Sale window end
    SaleEnd,
    /// Per-order cap
    MaxPerOrder,
}

impl TicketField {
    /// Field key as used in `tickets.<i>.<key>` paths
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::Description => "description",
            Self::SaleStart => "saleStart",
            Self::SaleEnd => "saleEnd",
            Self::MaxPerOrder => "maxPerOrder",
        }
    }
}

/// Partial draft used to seed a session (edit mode, or caller-supplied data).
///
/// Fields left as `None` keep their default value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraftPatch {
    /// Replaces `title` when set
    pub title: Option<String>,
    /// Replaces `description` when set
    pub description: Option<String>,
    /// Replaces `category` when set
    pub category: Option<EventCategory>,
    /// Replaces `tags` when set
    pub tags: Option<Vec<String>>,
    /// Replaces `cover_image` when set
    pub cover_image: Option<CoverImage>,
    /// Replaces `is_online` when set
    pub is_online: Option<bool>,
    /// Replaces `location` when set
    pub location: Option<String>,
    /// Replaces `start_date` when set
    pub start_date: Option<String>,
    /// Replaces `start_time` when set
    pub start_time: Option<String>,
    /// Replaces `end_date` when set
    pub end_date: Option<String>,
    /// Replaces `end_time` when set
    pub end_time: Option<String>,
    /// Replaces `is_private` when set
    pub is_private: Option<bool>,
    /// Replaces `is_paid` when set
    pub is_paid: Option<bool>,
    /// Replaces `capacity_limit` when set
    pub capacity_limit: Option<String>,
    /// Replaces `tickets` when set
    pub tickets: Option<Vec<TicketTier>>,
}

impl EventDraftPatch {
    /// Overlay the set fields onto `draft`
    pub fn apply_to(self, draft: &mut EventDraft) {
        fn overlay<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        overlay(&mut draft.title, self.title);
        overlay(&mut draft.description, self.description);
        overlay(&mut draft.category, self.category);
        overlay(&mut draft.tags, self.tags);
        if self.cover_image.is_some() {
            draft.cover_image = self.cover_image;
        }
        overlay(&mut draft.is_online, self.is_online);
        overlay(&mut draft.location, self.location);
        overlay(&mut draft.start_date, self.start_date);
        overlay(&mut draft.start_time, self.start_time);
        overlay(&mut draft.end_date, self.end_date);
        overlay(&mut draft.end_time, self.end_time);
        overlay(&mut draft.is_private, self.is_private);
        overlay(&mut draft.is_paid, self.is_paid);
        overlay(&mut draft.capacity_limit, self.capacity_limit);
        overlay(&mut draft.tickets, self.tickets);
    }

    /// A default draft with this patch applied
    #[must_use]
    pub fn into_draft(self) -> EventDraft {
        let mut draft = EventDraft::default();
        self.apply_to(&mut draft);
        draft
    }
}
