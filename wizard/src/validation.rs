//! Draft validation.
//!
//! [`validate`] is a pure function of the draft: it never looks at the
//! current error map, the active section, or the clock. Field errors are
//! values, not `Err`s; an empty [`ValidationErrors`] means the draft can be
//! submitted.

use crate::draft::{EventDraft, TicketField, TicketTier};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Messages shown next to invalid fields
pub mod messages {
    pub const TITLE_REQUIRED: &str = "Event title is required";
    pub const DESCRIPTION_REQUIRED: &str = "Event description is required";
    pub const START_DATE_REQUIRED: &str = "Start date is required";
    pub const START_TIME_REQUIRED: &str = "Start time is required";
    pub const END_DATE_REQUIRED: &str = "End date is required";
    pub const END_TIME_REQUIRED: &str = "End time is required";
    pub const INVALID_START: &str = "Invalid start date/time";
    pub const INVALID_END: &str = "Invalid end date/time";
    pub const END_BEFORE_START: &str = "End date/time cannot be before start date/time";
    pub const LOCATION_REQUIRED: &str = "Location is required for in-person events";
    pub const TICKET_NAME_REQUIRED: &str = "Ticket name is required";
    pub const TICKET_PRICE_INVALID: &str = "Price must be a number of 0 or more";
    pub const TICKET_QUANTITY_INVALID: &str = "Quantity must be a whole number greater than 0";
    pub const SALE_START_INVALID: &str = "Invalid sale start date/time";
    pub const SALE_END_INVALID: &str = "Invalid sale end date/time";
    pub const SALE_END_NOT_AFTER_START: &str = "Sale end must be after sale start";
    pub const MAX_PER_ORDER_INVALID: &str = "Max per order must be a whole number greater than 0";
    pub const MAX_PER_ORDER_EXCEEDS_QUANTITY: &str = "Max per order cannot exceed quantity";
}

/// Path of a tier field: `tickets.<index>.<field>`
#[must_use]
pub fn ticket_path(index: usize, field: TicketField) -> String {
    format!("tickets.{index}.{}", field.key())
}

/// Ordered map of field path to message
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// An empty map
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record `message` for `path`, replacing any earlier message
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    /// Message for `path`
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    /// Whether `path` has an error
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// Drop the error for exactly `path`
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.0.remove(path)
    }

    /// Drop every error
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `true` when the draft is valid
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `(path, message)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field paths in order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Errors of tier `index`, keyed by tier field name
    pub fn for_ticket(&self, index: usize) -> impl Iterator<Item = (&str, &str)> {
        let prefix = format!("tickets.{index}.");
        self.0
            .iter()
            .filter_map(move |(k, v)| k.strip_prefix(&prefix).map(|field| (field, v.as_str())))
    }
}

/// Validate the whole draft
#[must_use]
pub fn validate(draft: &EventDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    validate_basics(draft, &mut errors);
    validate_schedule(draft, &mut errors);
    validate_location(draft, &mut errors);

    if draft.is_paid {
        for (index, tier) in draft.tickets.iter().enumerate() {
            validate_tier(index, tier, &mut errors);
        }
    }

    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validate_basics(draft: &EventDraft, errors: &mut ValidationErrors) {
    if is_blank(&draft.title) {
        errors.insert("title", messages::TITLE_REQUIRED);
    }
    if is_blank(&draft.description) {
        errors.insert("description", messages::DESCRIPTION_REQUIRED);
    }
}

fn validate_schedule(draft: &EventDraft, errors: &mut ValidationErrors) {
    let required = [
        ("startDate", &draft.start_date, messages::START_DATE_REQUIRED),
        ("startTime", &draft.start_time, messages::START_TIME_REQUIRED),
        ("endDate", &draft.end_date, messages::END_DATE_REQUIRED),
        ("endTime", &draft.end_time, messages::END_TIME_REQUIRED),
    ];

    let mut complete = true;
    for (path, value, message) in required {
        if is_blank(value) {
            errors.insert(path, message);
            complete = false;
        }
    }
    if !complete {
        return;
    }

    let start = parse_date_time(&draft.start_date, &draft.start_time);
    let end = parse_date_time(&draft.end_date, &draft.end_time);

    match (start, end) {
        (Some(start), Some(end)) => {
            if end < start {
                errors.insert("endDate", messages::END_BEFORE_START);
            }
        },
        (start, end) => {
            if start.is_none() {
                errors.insert("startDate", messages::INVALID_START);
            }
            if end.is_none() {
                errors.insert("endDate", messages::INVALID_END);
            }
        },
    }
}

fn validate_location(draft: &EventDraft, errors: &mut ValidationErrors) {
    if !draft.is_online && is_blank(&draft.location) {
        errors.insert("location", messages::LOCATION_REQUIRED);
    }
}

fn validate_tier(index: usize, tier: &TicketTier, errors: &mut ValidationErrors) {
    let path = |field| ticket_path(index, field);

    if is_blank(&tier.name) {
        errors.insert(path(TicketField::Name), messages::TICKET_NAME_REQUIRED);
    }

    if parse_price(&tier.price).is_none() {
        errors.insert(path(TicketField::Price), messages::TICKET_PRICE_INVALID);
    }

    let quantity = parse_positive_int(&tier.quantity);
    if quantity.is_none() {
        errors.insert(path(TicketField::Quantity), messages::TICKET_QUANTITY_INVALID);
    }

    let sale_start = optional(&tier.sale_start).map(parse_sale_date_time);
    let sale_end = optional(&tier.sale_end).map(parse_sale_date_time);
    if matches!(sale_start, Some(None)) {
        errors.insert(path(TicketField::SaleStart), messages::SALE_START_INVALID);
    }
    match (sale_start, sale_end) {
        (_, Some(None)) => {
            errors.insert(path(TicketField::SaleEnd), messages::SALE_END_INVALID);
        },
        (Some(Some(start)), Some(Some(end))) if end <= start => {
            errors.insert(path(TicketField::SaleEnd), messages::SALE_END_NOT_AFTER_START);
        },
        _ => {},
    }

    if let Some(raw) = optional(&tier.max_per_order) {
        match parse_positive_int(raw) {
            None => {
                errors.insert(path(TicketField::MaxPerOrder), messages::MAX_PER_ORDER_INVALID);
            },
            Some(max) if quantity.is_some_and(|quantity| max > quantity) => {
                errors.insert(
                    path(TicketField::MaxPerOrder),
                    messages::MAX_PER_ORDER_EXCEEDS_QUANTITY,
                );
            },
            Some(_) => {},
        }
    }
}

/// `Some(trimmed)` when the optional field is set
fn optional(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// A finite decimal ≥ 0
#[must_use]
pub fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

/// A whole number > 0
#[must_use]
pub fn parse_positive_int(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM[:SS]` time
#[must_use]
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    Some(date.and_time(time))
}

/// Parse a `YYYY-MM-DDTHH:MM[:SS]` sale window bound
#[must_use]
pub fn parse_sale_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_draft() -> EventDraft {
        EventDraft {
            title: "RustConf".into(),
            description: "Talks and workshops".into(),
            location: "Montreal".into(),
            start_date: "2025-06-01".into(),
            start_time: "09:00".into(),
            end_date: "2025-06-01".into(),
            end_time: "17:00".into(),
            ..EventDraft::default()
        }
    }

    fn valid_tier() -> TicketTier {
        TicketTier {
            name: "General".into(),
            price: "25".into(),
            quantity: "100".into(),
            ..TicketTier::blank()
        }
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn blank_draft_reports_required_fields() {
        let errors = validate(&EventDraft::default());
        assert_eq!(errors.get("title"), Some(messages::TITLE_REQUIRED));
        assert_eq!(errors.get("description"), Some(messages::DESCRIPTION_REQUIRED));
        assert_eq!(errors.get("startDate"), Some(messages::START_DATE_REQUIRED));
        assert_eq!(errors.get("startTime"), Some(messages::START_TIME_REQUIRED));
        assert_eq!(errors.get("endDate"), Some(messages::END_DATE_REQUIRED));
        assert_eq!(errors.get("endTime"), Some(messages::END_TIME_REQUIRED));
        assert_eq!(errors.get("location"), Some(messages::LOCATION_REQUIRED));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let draft = EventDraft {
            title: "   ".into(),
            ..valid_draft()
        };
        assert!(validate(&draft).contains("title"));
    }

    #[test]
    fn end_before_start_is_reported_on_end_date() {
        let draft = EventDraft {
            end_date: "2025-05-31".into(),
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(errors.get("endDate"), Some(messages::END_BEFORE_START));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn end_equal_to_start_is_allowed() {
        let draft = EventDraft {
            end_time: "09:00:00".into(),
            ..valid_draft()
        };
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn unparseable_schedule_is_reported() {
        let draft = EventDraft {
            start_date: "June 1st".into(),
            end_time: "25:99".into(),
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(errors.get("startDate"), Some(messages::INVALID_START));
        assert_eq!(errors.get("endDate"), Some(messages::INVALID_END));
    }

    #[test]
    fn online_events_do_not_need_a_location() {
        let draft = EventDraft {
            is_online: true,
            location: String::new(),
            ..valid_draft()
        };
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn tiers_are_ignored_when_free() {
        let draft = EventDraft {
            tickets: vec![TicketTier::blank()],
            ..valid_draft()
        };
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn blank_paid_tier_reports_required_fields() {
        let draft = EventDraft {
            is_paid: true,
            tickets: vec![TicketTier::blank()],
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(errors.get("tickets.0.name"), Some(messages::TICKET_NAME_REQUIRED));
        assert_eq!(errors.get("tickets.0.price"), Some(messages::TICKET_PRICE_INVALID));
        assert_eq!(
            errors.get("tickets.0.quantity"),
            Some(messages::TICKET_QUANTITY_INVALID)
        );
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn price_and_quantity_rules() {
        for (price, quantity, price_ok, quantity_ok) in [
            ("0", "1", true, true),
            ("19.99", "10", true, true),
            ("-1", "10", false, true),
            ("free", "0", false, false),
            ("5", "1.5", true, false),
            ("5", "-2", true, false),
        ] {
            let draft = EventDraft {
                is_paid: true,
                tickets: vec![TicketTier {
                    price: price.into(),
                    quantity: quantity.into(),
                    ..valid_tier()
                }],
                ..valid_draft()
            };
            let errors = validate(&draft);
            assert_eq!(!errors.contains("tickets.0.price"), price_ok, "price {price}");
            assert_eq!(
                !errors.contains("tickets.0.quantity"),
                quantity_ok,
                "quantity {quantity}"
            );
        }
    }

    #[test]
    fn sale_window_must_be_ordered() {
        let draft = EventDraft {
            is_paid: true,
            tickets: vec![TicketTier {
                sale_start: "2025-05-01T10:00".into(),
                sale_end: "2025-05-01T10:00".into(),
                ..valid_tier()
            }],
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(
            errors.get("tickets.0.saleEnd"),
            Some(messages::SALE_END_NOT_AFTER_START)
        );
    }

    #[test]
    fn unparseable_sale_bounds_are_reported() {
        let draft = EventDraft {
            is_paid: true,
            tickets: vec![TicketTier {
                sale_start: "soon".into(),
                sale_end: "later".into(),
                ..valid_tier()
            }],
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(errors.get("tickets.0.saleStart"), Some(messages::SALE_START_INVALID));
        assert_eq!(errors.get("tickets.0.saleEnd"), Some(messages::SALE_END_INVALID));
    }

    #[test]
    fn max_per_order_rules() {
        let tier = |max: &str| EventDraft {
            is_paid: true,
            tickets: vec![TicketTier {
                quantity: "5".into(),
                max_per_order: max.into(),
                ..valid_tier()
            }],
            ..valid_draft()
        };

        assert!(validate(&tier("")).is_empty());
        assert!(validate(&tier("5")).is_empty());
        assert_eq!(
            validate(&tier("6")).get("tickets.0.maxPerOrder"),
            Some(messages::MAX_PER_ORDER_EXCEEDS_QUANTITY)
        );
        assert_eq!(
            validate(&tier("0")).get("tickets.0.maxPerOrder"),
            Some(messages::MAX_PER_ORDER_INVALID)
        );
    }

    #[test]
    fn errors_for_ticket_strip_prefix() {
        let draft = EventDraft {
            is_paid: true,
            tickets: vec![valid_tier(), TicketTier::blank()],
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(errors.for_ticket(0).count(), 0);
        let fields: Vec<_> = errors.for_ticket(1).map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["name", "price", "quantity"]);
    }

    fn arb_text() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("  ".to_string()),
            "[a-zA-Z0-9 .:-]{0,12}",
        ]
    }

    fn arb_tier() -> impl Strategy<Value = TicketTier> {
        (arb_text(), arb_text(), 0u32..20, arb_text(), 0u32..30).prop_map(
            |(name, price, quantity, sale_start, max)| TicketTier {
                name,
                price,
                quantity: quantity.to_string(),
                sale_start,
                max_per_order: max.to_string(),
                ..TicketTier::blank()
            },
        )
    }

    fn arb_draft() -> impl Strategy<Value = EventDraft> {
        (
            arb_text(),
            arb_text(),
            any::<bool>(),
            any::<bool>(),
            arb_text(),
            (1u32..28, 0u32..24, 1u32..28, 0u32..24),
            prop::collection::vec(arb_tier(), 0..4),
        )
            .prop_map(
                |(title, description, is_online, is_paid, location, (sd, sh, ed, eh), tickets)| {
                    EventDraft {
                        title,
                        description,
                        is_online,
                        is_paid,
                        location,
                        start_date: format!("2025-03-{sd:02}"),
                        start_time: format!("{sh:02}:00"),
                        end_date: format!("2025-03-{ed:02}"),
                        end_time: format!("{eh:02}:30"),
                        tickets,
                        ..EventDraft::default()
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn validate_is_idempotent(draft in arb_draft()) {
            prop_assert_eq!(validate(&draft), validate(&draft.clone()));
        }

        #[test]
        fn end_before_start_iff_error(draft in arb_draft()) {
            let start = parse_date_time(&draft.start_date, &draft.start_time).unwrap();
            let end = parse_date_time(&draft.end_date, &draft.end_time).unwrap();
            let errors = validate(&draft);
            prop_assert_eq!(
                errors.get("endDate") == Some(messages::END_BEFORE_START),
                end < start
            );
        }

        #[test]
        fn location_required_iff_in_person(draft in arb_draft()) {
            let errors = validate(&draft);
            prop_assert_eq!(
                errors.contains("location"),
                !draft.is_online && draft.location.trim().is_empty()
            );
        }

        #[test]
        fn tier_errors_only_when_paid(draft in arb_draft()) {
            let errors = validate(&draft);
            let has_tier_errors = errors.paths().any(|p| p.starts_with("tickets."));
            if !draft.is_paid {
                prop_assert!(!has_tier_errors);
            }
        }

        #[test]
        fn max_per_order_never_exceeds_quantity_silently(draft in arb_draft()) {
            let errors = validate(&draft);
            if draft.is_paid {
                for (i, tier) in draft.tickets.iter().enumerate() {
                    let quantity: u64 = tier.quantity.parse().unwrap();
                    let max: u64 = tier.max_per_order.parse().unwrap();
                    let path = ticket_path(i, TicketField::MaxPerOrder);
                    if max > 0 && quantity > 0 && max > quantity {
                        prop_assert_eq!(
                            errors.get(&path),
                            Some(messages::MAX_PER_ORDER_EXCEEDS_QUANTITY)
                        );
                    }
                    if quantity == 0 {
                        prop_assert!(errors.contains(&ticket_path(i, TicketField::Quantity)));
                    }
                }
            }
        }
    }
}
