// ── List view-models: filter, search, sort ──
//
// Filters are plain structs of optional predicates. Every predicate that
// is set must hold (logical AND), so application order never matters.

use std::cmp::Ordering;
use std::sync::Arc;

use strum::{Display, EnumString};

use crate::model::{
    Activity, ActivityType, Device, DeviceStatus, DiningPlace, EnrollmentStatus, Guest,
    GuestStatus, GuestType, InfoCategory, Ordered, PropertyInfoItem,
};

/// A predicate over one entity type.
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;

    /// Keep the matching entries, preserving input order.
    fn apply(&self, items: &[Arc<T>]) -> Vec<Arc<T>> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Case-insensitive substring match over any of `fields`. A blank needle
/// matches everything.
fn search_hit<'a>(needle: Option<&str>, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
        return true;
    };
    let needle = needle.to_lowercase();
    fields
        .into_iter()
        .any(|f| f.to_lowercase().contains(&needle))
}

fn eq_ci(a: Option<&str>, b: &str) -> bool {
    a.is_some_and(|a| a.eq_ignore_ascii_case(b))
}

// ── Guests ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct GuestFilter {
    pub status: Option<GuestStatus>,
    pub guest_type: Option<GuestType>,
    pub label: Option<String>,
    pub search: Option<String>,
}

impl Filter<Guest> for GuestFilter {
    fn matches(&self, g: &Guest) -> bool {
        let name = g.display_name();
        self.status.is_none_or(|s| g.status == s)
            && self.guest_type.is_none_or(|t| g.guest_type == t)
            && self
                .label
                .as_deref()
                .is_none_or(|l| g.guest_labels.iter().any(|gl| gl.eq_ignore_ascii_case(l)))
            && search_hit(
                self.search.as_deref(),
                [
                    name.as_str(),
                    g.email.as_deref().unwrap_or_default(),
                    g.phone.as_deref().unwrap_or_default(),
                    g.room_number.as_deref().unwrap_or_default(),
                ],
            )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum GuestSort {
    #[default]
    CheckIn,
    CheckOut,
    Name,
    Status,
}

/// Sort guests in place. Missing dates sort last in either direction.
pub fn sort_guests(guests: &mut [Arc<Guest>], by: GuestSort, descending: bool) {
    guests.sort_by(|a, b| {
        let ord = match by {
            GuestSort::CheckIn => cmp_dates(a.check_in(), b.check_in(), descending),
            GuestSort::CheckOut => cmp_dates(a.check_out(), b.check_out(), descending),
            GuestSort::Name => directed(
                a.display_name()
                    .to_lowercase()
                    .cmp(&b.display_name().to_lowercase()),
                descending,
            ),
            GuestSort::Status => directed(a.status.cmp(&b.status), descending),
        };
        ord.then_with(|| a.id.cmp(&b.id))
    });
}

fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending { ord.reverse() } else { ord }
}

fn cmp_dates<D: Ord>(a: Option<D>, b: Option<D>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), descending),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ── Ordered resources ───────────────────────────────────────────────

/// Sort by `display_order`, keeping server order among ties.
pub fn by_display_order<T: Ordered>(items: &mut [Arc<T>]) {
    items.sort_by_key(|i| i.display_order());
}

// ── Activities ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub activity_type: Option<ActivityType>,
    pub active: Option<bool>,
    pub label: Option<String>,
    pub search: Option<String>,
}

impl Filter<Activity> for ActivityFilter {
    fn matches(&self, a: &Activity) -> bool {
        self.activity_type.is_none_or(|t| a.activity_type == t)
            && self.active.is_none_or(|on| a.is_active == on)
            && self
                .label
                .as_deref()
                .is_none_or(|l| a.labels.iter().any(|al| al.eq_ignore_ascii_case(l)))
            && search_hit(
                self.search.as_deref(),
                [
                    a.title.as_str(),
                    a.title_de.as_deref().unwrap_or_default(),
                    a.description.as_deref().unwrap_or_default(),
                    a.description_de.as_deref().unwrap_or_default(),
                ]
                .into_iter()
                .chain(a.labels.iter().map(String::as_str)),
            )
    }
}

// ── Dining ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct DiningFilter {
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub search: Option<String>,
}

impl Filter<DiningPlace> for DiningFilter {
    fn matches(&self, d: &DiningPlace) -> bool {
        self.category
            .as_deref()
            .is_none_or(|c| eq_ci(d.category.as_deref(), c))
            && self
                .cuisine
                .as_deref()
                .is_none_or(|c| eq_ci(d.cuisine_type.as_deref(), c))
            && search_hit(
                self.search.as_deref(),
                [
                    d.name_en.as_deref().unwrap_or_default(),
                    d.name_de.as_deref().unwrap_or_default(),
                    d.cuisine_type.as_deref().unwrap_or_default(),
                    d.city.as_deref().unwrap_or_default(),
                    d.address.as_deref().unwrap_or_default(),
                ],
            )
    }
}

// ── Property information ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InfoFilter {
    pub category: Option<InfoCategory>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

impl Filter<PropertyInfoItem> for InfoFilter {
    fn matches(&self, i: &PropertyInfoItem) -> bool {
        self.category.is_none_or(|c| i.category == c)
            && self.active.is_none_or(|on| i.is_active == on)
            && search_hit(
                self.search.as_deref(),
                [
                    i.title.as_str(),
                    i.description.as_deref().unwrap_or_default(),
                    i.info_type.as_deref().unwrap_or_default(),
                ],
            )
    }
}

// ── Devices ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub status: Option<DeviceStatus>,
    pub enrollment: Option<EnrollmentStatus>,
    pub kiosk: Option<bool>,
    pub search: Option<String>,
}

impl Filter<Device> for DeviceFilter {
    fn matches(&self, d: &Device) -> bool {
        let name = d.display_name();
        self.status.is_none_or(|s| d.device_status == s)
            && self.enrollment.is_none_or(|e| d.enrollment_status == e)
            && self.kiosk.is_none_or(|k| d.kiosk_mode_enabled == k)
            && search_hit(
                self.search.as_deref(),
                [
                    name.as_str(),
                    d.serial_number.as_deref().unwrap_or_default(),
                    d.device_type.as_deref().unwrap_or_default(),
                ],
            )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EntityId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn guests() -> Vec<Arc<Guest>> {
        [
            json!({"id": 1, "first_name": "Ada", "status": "checked_in", "guest_type": "family",
                   "check_in_date": "2026-07-03"}),
            json!({"id": 2, "first_name": "Bo", "status": "checked_in", "guest_type": "couple",
                   "check_in_date": "2026-07-01"}),
            json!({"id": 3, "first_name": "Cy", "status": "reserved", "guest_type": "family",
                   "guest_labels": ["VIP"]}),
            json!({"id": 4, "first_name": "Di", "status": "checked_in", "guest_type": "family",
                   "email": "di@example.com", "check_in_date": "2026-06-30"}),
        ]
        .into_iter()
        .map(|v| Arc::new(serde_json::from_value(v).unwrap()))
        .collect()
    }

    fn ids(items: &[Arc<Guest>]) -> Vec<EntityId> {
        items.iter().map(|g| g.id.clone()).collect()
    }

    #[test]
    fn guest_filters_combine_with_and() {
        let all = guests();
        let both = GuestFilter {
            status: Some(GuestStatus::CheckedIn),
            guest_type: Some(GuestType::Family),
            ..GuestFilter::default()
        };
        assert_eq!(ids(&both.apply(&all)), [EntityId::from(1), EntityId::from(4)]);

        // Filtering in either order gives the same answer.
        let status_only = GuestFilter {
            status: Some(GuestStatus::CheckedIn),
            ..GuestFilter::default()
        };
        let type_only = GuestFilter {
            guest_type: Some(GuestType::Family),
            ..GuestFilter::default()
        };
        let a = type_only.apply(&status_only.apply(&all));
        let b = status_only.apply(&type_only.apply(&all));
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a), ids(&both.apply(&all)));
    }

    #[test]
    fn search_is_case_insensitive_over_display_fields() {
        let all = guests();
        let f = GuestFilter {
            search: Some("DI@EXAMPLE".into()),
            ..GuestFilter::default()
        };
        assert_eq!(ids(&f.apply(&all)), [EntityId::from(4)]);

        let label = GuestFilter {
            label: Some("vip".into()),
            ..GuestFilter::default()
        };
        assert_eq!(ids(&label.apply(&all)), [EntityId::from(3)]);
    }

    #[test]
    fn check_in_sort_puts_undated_last() {
        let mut all = guests();
        sort_guests(&mut all, GuestSort::CheckIn, false);
        assert_eq!(
            ids(&all),
            [
                EntityId::from(4),
                EntityId::from(2),
                EntityId::from(1),
                EntityId::from(3)
            ]
        );

        sort_guests(&mut all, GuestSort::CheckIn, true);
        assert_eq!(ids(&all).first(), Some(&EntityId::from(1)));
        assert_eq!(ids(&all).last(), Some(&EntityId::from(3)));
    }

    #[test]
    fn sort_key_parses_from_cli_text() {
        assert_eq!("check-out".parse::<GuestSort>().unwrap(), GuestSort::CheckOut);
        assert_eq!(GuestSort::Name.to_string(), "name");
    }

    #[test]
    fn activity_filter_by_active_and_type() {
        let items: Vec<Arc<Activity>> = [
            json!({"id": 1, "title": "Lake hike", "activity_type": "outdoor"}),
            json!({"id": 2, "title": "Spa", "activity_type": "wellness", "is_active": false}),
            json!({"id": 3, "title": "Ridge hike", "activity_type": "outdoor", "is_active": false}),
        ]
        .into_iter()
        .map(|v| Arc::new(serde_json::from_value(v).unwrap()))
        .collect();

        let f = ActivityFilter {
            activity_type: Some(ActivityType::Outdoor),
            active: Some(false),
            search: Some("hike".into()),
            ..ActivityFilter::default()
        };
        let hits = f.apply(&items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Ridge hike");
    }
}
