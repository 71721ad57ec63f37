//! Read-side helpers over a snapshot.
//!
//! Weak references (`place_id`, a tale's `friend_id` after the friend is
//! gone) resolve to `None` when they dangle; callers render that as
//! "unlinked" rather than treating it as an error.

use house_schemas::{
    Friend, FriendId, Memory, Mode, Place, PlaceId, PlaceType, StoreSnapshot, Tale,
};
use serde::Serialize;
use std::collections::BTreeMap;

pub fn find_place<'a>(snapshot: &'a StoreSnapshot, id: &PlaceId) -> Option<&'a Place> {
    snapshot.places.iter().find(|p| &p.id == id)
}

pub fn find_friend<'a>(snapshot: &'a StoreSnapshot, id: &FriendId) -> Option<&'a Friend> {
    snapshot.friends.iter().find(|f| &f.id == id)
}

pub fn place_name<'a>(snapshot: &'a StoreSnapshot, id: Option<&PlaceId>) -> Option<&'a str> {
    id.and_then(|id| find_place(snapshot, id))
        .map(|p| p.name.as_str())
}

pub fn tales_for_friend<'a>(snapshot: &'a StoreSnapshot, id: &FriendId) -> Vec<&'a Tale> {
    snapshot.tales.iter().filter(|t| &t.friend_id == id).collect()
}

pub fn tale_count(snapshot: &StoreSnapshot, id: &FriendId) -> usize {
    snapshot.tales.iter().filter(|t| &t.friend_id == id).count()
}

pub fn memories_at_place<'a>(snapshot: &'a StoreSnapshot, id: &PlaceId) -> Vec<&'a Memory> {
    snapshot
        .memories
        .iter()
        .filter(|m| m.place_id.as_ref() == Some(id))
        .collect()
}

/// Passport filter; `None` means all places.
pub fn places_of_kind(snapshot: &StoreSnapshot, kind: Option<PlaceType>) -> Vec<&Place> {
    snapshot
        .places
        .iter()
        .filter(|p| kind.map_or(true, |k| p.kind == k))
        .collect()
}

/// Scrapbook grouping: memories keyed by the `YYYY-MM` prefix of their date,
/// newest month first. Within a month, memories keep their stored order.
pub fn memories_by_month(snapshot: &StoreSnapshot) -> Vec<(&str, Vec<&Memory>)> {
    let mut months: BTreeMap<&str, Vec<&Memory>> = BTreeMap::new();
    for memory in &snapshot.memories {
        let month = memory.date.get(..7).unwrap_or(memory.date.as_str());
        months.entry(month).or_default().push(memory);
    }
    months.into_iter().rev().collect()
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub places_visited: usize,
    pub tales_written: usize,
    pub goals_completed: usize,
    pub goal_progress: u8, // percent
}

/// Completed share of goals, rounded to the nearest percent; 0 with no goals.
pub fn goal_progress_percent(snapshot: &StoreSnapshot) -> u8 {
    let total = snapshot.goals.len();
    if total == 0 {
        return 0;
    }
    let completed = snapshot.goals.iter().filter(|g| g.completed).count();
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

pub fn dashboard_stats(snapshot: &StoreSnapshot) -> DashboardStats {
    DashboardStats {
        places_visited: snapshot.places.len(),
        tales_written: snapshot.tales.len(),
        goals_completed: snapshot.goals.iter().filter(|g| g.completed).count(),
        goal_progress: goal_progress_percent(snapshot),
    }
}

// ============================================================================
// Modes
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ModeProfile {
    pub mode: Mode,
    pub label: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

pub fn mode_profile(mode: Mode) -> ModeProfile {
    match mode {
        Mode::Solo => ModeProfile {
            mode,
            label: "Solo",
            description: "Quiet corners and contemplative moments",
            tags: &["cozy", "quiet", "reading"],
        },
        Mode::Friends => ModeProfile {
            mode,
            label: "Friends",
            description: "Spaces for laughter and long conversations",
            tags: &["social", "group", "fun"],
        },
        Mode::Family => ModeProfile {
            mode,
            label: "Family",
            description: "Comfortable spots for generations to gather",
            tags: &["heritage", "family-friendly", "classic"],
        },
        Mode::Date => ModeProfile {
            mode,
            label: "Date",
            description: "Romantic ambiences for special moments",
            tags: &["romantic", "intimate", "aesthetic"],
        },
        Mode::Special => ModeProfile {
            mode,
            label: "Special",
            description: "Extraordinary places for celebrations",
            tags: &["celebration", "special", "iconic"],
        },
    }
}

const WELL_RATED: f32 = 4.0;

/// Places whose tags overlap the mode's tags (substring either way,
/// case-insensitive). With no overlap at all, every place averaging at
/// least 4 is suggested instead.
pub fn recommended_places(snapshot: &StoreSnapshot, mode: Mode) -> Vec<&Place> {
    let profile = mode_profile(mode);

    let matching: Vec<&Place> = snapshot
        .places
        .iter()
        .filter(|place| {
            place.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                profile
                    .tags
                    .iter()
                    .any(|mode_tag| tag.contains(mode_tag) || mode_tag.contains(tag.as_str()))
            })
        })
        .collect();

    if !matching.is_empty() {
        return matching;
    }

    snapshot
        .places
        .iter()
        .filter(|p| p.ratings.average() >= WELL_RATED)
        .collect()
}
