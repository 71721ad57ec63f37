use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ULID and ID Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemoryId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FriendId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaleId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoodboardItemId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FriendId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TaleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MoodboardItemId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceType {
    #[serde(rename = "cafe")]
    Cafe,
    #[serde(rename = "restaurant")]
    Restaurant,
}

impl PlaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceType::Cafe => "cafe",
            PlaceType::Restaurant => "restaurant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodboardKind {
    #[serde(rename = "image")]
    Image, // value is a URL
    #[serde(rename = "quote")]
    Quote, // value is free text
    #[serde(rename = "color")]
    Color, // value is a hex string
}

impl MoodboardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodboardKind::Image => "image",
            MoodboardKind::Quote => "quote",
            MoodboardKind::Color => "color",
        }
    }
}

/// Companion filter the view layer applies when suggesting places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "solo")]
    Solo,
    #[serde(rename = "friends")]
    Friends,
    #[serde(rename = "family")]
    Family,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "special")]
    Special,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Solo,
        Mode::Friends,
        Mode::Family,
        Mode::Date,
        Mode::Special,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Solo => "solo",
            Mode::Friends => "friends",
            Mode::Family => "family",
            Mode::Date => "date",
            Mode::Special => "special",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

// ============================================================================
// Session Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ============================================================================
// Place Schema (Passport)
// ============================================================================

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub vibe: u8,
    pub ambience: u8,
    pub food: u8,
    pub service: u8,
}

impl Ratings {
    pub fn new(vibe: u8, ambience: u8, food: u8, service: u8) -> Self {
        Self {
            vibe,
            ambience,
            food,
            service,
        }
    }

    /// Every sub-score pinned into `MIN_RATING..=MAX_RATING`.
    pub fn clamped(self) -> Self {
        let pin = |score: u8| score.clamp(MIN_RATING, MAX_RATING);
        Self {
            vibe: pin(self.vibe),
            ambience: pin(self.ambience),
            food: pin(self.food),
            service: pin(self.service),
        }
    }

    pub fn is_in_range(&self) -> bool {
        *self == self.clamped()
    }

    pub fn average(&self) -> f32 {
        let total = self.vibe as u16 + self.ambience as u16 + self.food as u16 + self.service as u16;
        total as f32 / 4.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaceType,
    pub location: String,
    pub date_visited: String, // YYYY-MM-DD
    pub ratings: Ratings,
    pub tags: Vec<String>,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaceType,
    pub location: String,
    pub date_visited: String,
    pub ratings: Ratings,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl NewPlace {
    pub fn into_place(self, id: PlaceId) -> Place {
        Place {
            id,
            name: self.name,
            kind: self.kind,
            location: self.location,
            date_visited: self.date_visited,
            ratings: self.ratings,
            tags: self.tags,
            notes: self.notes,
            image_url: self.image_url,
            coordinates: self.coordinates,
        }
    }
}

// ============================================================================
// Memory Schema (Scrapbook)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: MemoryId,
    pub title: String,
    pub date: String, // YYYY-MM-DD
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>, // weak reference, may dangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemory {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub place_id: Option<PlaceId>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewMemory {
    pub fn into_memory(self, id: MemoryId) -> Memory {
        Memory {
            id,
            title: self.title,
            date: self.date,
            caption: self.caption,
            place_id: self.place_id,
            image_url: self.image_url,
        }
    }
}

// ============================================================================
// Friends & Tales Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: FriendId,
    pub name: String,
    pub monogram: String,
    pub color: String, // hex, e.g. "#D7B47A"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFriend {
    pub name: String,
    pub color: String,
}

impl NewFriend {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn into_friend(self, id: FriendId) -> Friend {
        let monogram = monogram_for(&self.name);
        Friend {
            id,
            name: self.name,
            monogram,
            color: self.color,
        }
    }
}

/// First character of the trimmed name, uppercased. Empty names yield an empty monogram.
pub fn monogram_for(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tale {
    pub id: TaleId,
    pub friend_id: FriendId, // owning friend, cascades on delete
    pub title: String,
    pub date: String, // YYYY-MM-DD
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTale {
    pub friend_id: FriendId,
    pub title: String,
    pub date: String,
    pub story: String,
    #[serde(default)]
    pub place_id: Option<PlaceId>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewTale {
    pub fn into_tale(self, id: TaleId) -> Tale {
        Tale {
            id,
            friend_id: self.friend_id,
            title: self.title,
            date: self.date,
            story: self.story,
            place_id: self.place_id,
            image_url: self.image_url,
        }
    }
}

// ============================================================================
// Goals Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub place_id: Option<PlaceId>,
}

impl NewGoal {
    pub fn into_goal(self, id: GoalId) -> Goal {
        Goal {
            id,
            text: self.text,
            completed: self.completed,
            place_id: self.place_id,
        }
    }
}

// ============================================================================
// Moodboard Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodboardItem {
    pub id: MoodboardItemId,
    #[serde(rename = "type")]
    pub kind: MoodboardKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMoodboardItem {
    #[serde(rename = "type")]
    pub kind: MoodboardKind,
    pub value: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl NewMoodboardItem {
    pub fn into_item(self, id: MoodboardItemId) -> MoodboardItem {
        MoodboardItem {
            id,
            kind: self.kind,
            value: self.value,
            caption: self.caption,
        }
    }
}

// ============================================================================
// Taste Profile Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteProfile {
    pub persona: String,
    pub description: String,
    pub vibe: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>, // question id -> option id
}

// ============================================================================
// Patch Types
// ============================================================================
//
// Required fields are `Option<T>` (absent keeps the current value). Optional
// fields are `Option<Option<T>>`: absent keeps, `null` clears, a value sets.

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PlaceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_visited: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Ratings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Option<Coordinates>>,
}

impl PlacePatch {
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::default()
        }
    }

    pub fn apply_to(self, place: &mut Place) {
        if let Some(name) = self.name {
            place.name = name;
        }
        if let Some(kind) = self.kind {
            place.kind = kind;
        }
        if let Some(location) = self.location {
            place.location = location;
        }
        if let Some(date_visited) = self.date_visited {
            place.date_visited = date_visited;
        }
        if let Some(ratings) = self.ratings {
            place.ratings = ratings;
        }
        if let Some(tags) = self.tags {
            place.tags = tags;
        }
        if let Some(notes) = self.notes {
            place.notes = notes;
        }
        if let Some(image_url) = self.image_url {
            place.image_url = image_url;
        }
        if let Some(coordinates) = self.coordinates {
            place.coordinates = coordinates;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub place_id: Option<Option<PlaceId>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
}

impl MemoryPatch {
    pub fn apply_to(self, memory: &mut Memory) {
        if let Some(title) = self.title {
            memory.title = title;
        }
        if let Some(date) = self.date {
            memory.date = date;
        }
        if let Some(caption) = self.caption {
            memory.caption = caption;
        }
        if let Some(place_id) = self.place_id {
            memory.place_id = place_id;
        }
        if let Some(image_url) = self.image_url {
            memory.image_url = image_url;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friend_id: Option<FriendId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub place_id: Option<Option<PlaceId>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
}

impl TalePatch {
    pub fn apply_to(self, tale: &mut Tale) {
        if let Some(friend_id) = self.friend_id {
            tale.friend_id = friend_id;
        }
        if let Some(title) = self.title {
            tale.title = title;
        }
        if let Some(date) = self.date {
            tale.date = date;
        }
        if let Some(story) = self.story {
            tale.story = story;
        }
        if let Some(place_id) = self.place_id {
            tale.place_id = place_id;
        }
        if let Some(image_url) = self.image_url {
            tale.image_url = image_url;
        }
    }
}

// ============================================================================
// Persisted Snapshot
// ============================================================================

/// Whole-store document written under the storage key after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub places: Vec<Place>,
    pub memories: Vec<Memory>,
    pub friends: Vec<Friend>,
    pub tales: Vec<Tale>,
    pub goals: Vec<Goal>,
    pub moodboard_items: Vec<MoodboardItem>,
    pub taste_profile: Option<TasteProfile>,
    pub current_mode: Mode,
}

// ============================================================================
// Helper Functions
// ============================================================================

pub fn generate_place_id() -> PlaceId {
    PlaceId(format!("place_{}", ulid::Ulid::new()))
}

pub fn generate_memory_id() -> MemoryId {
    MemoryId(format!("mem_{}", ulid::Ulid::new()))
}

pub fn generate_friend_id() -> FriendId {
    FriendId(format!("friend_{}", ulid::Ulid::new()))
}

pub fn generate_tale_id() -> TaleId {
    TaleId(format!("tale_{}", ulid::Ulid::new()))
}

pub fn generate_goal_id() -> GoalId {
    GoalId(format!("goal_{}", ulid::Ulid::new()))
}

pub fn generate_moodboard_item_id() -> MoodboardItemId {
    MoodboardItemId(format!("mood_{}", ulid::Ulid::new()))
}
