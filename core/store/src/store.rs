use house_schemas::{
    generate_friend_id, generate_goal_id, generate_memory_id, generate_moodboard_item_id,
    generate_place_id, generate_tale_id, FriendId, GoalId, MemoryId, MemoryPatch, Mode,
    MoodboardItemId, NewFriend, NewGoal, NewMemory, NewMoodboardItem, NewPlace, NewTale, PlaceId,
    PlacePatch, StoreSnapshot, TaleId, TalePatch, TasteProfile, User, UserId,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::persistence::{
    decode_snapshot, encode_snapshot, malformed_key, MemoryStorage, SnapshotStorage,
};
use crate::seed::seeded_snapshot;

pub const SESSION_USER_ID: &str = "1";
pub const SESSION_DISPLAY_NAME: &str = "Swass";
pub const SESSION_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=200";

/// Single source of truth for every slice of the journal.
///
/// Readers take immutable `Arc<StoreSnapshot>` values or subscribe to a
/// watch channel; every mutation derives a fresh snapshot from the previous
/// one, publishes it, and writes it through to storage before returning.
pub struct Store {
    state: watch::Sender<Arc<StoreSnapshot>>,
    // Also serializes writers, so each mutation sees the previous one's result
    storage: Mutex<Box<dyn SnapshotStorage>>,
    config: StoreConfig,
}

impl Store {
    /// Rehydrate from `storage`, falling back to the seeded defaults when
    /// nothing is stored or the stored document cannot be decoded.
    pub fn open<S>(config: StoreConfig, storage: S) -> Self
    where
        S: SnapshotStorage + 'static,
    {
        let mut storage: Box<dyn SnapshotStorage> = Box::new(storage);
        let key = config.storage_key.as_str();

        let initial = match storage.load(key) {
            Ok(Some(document)) => match decode_snapshot(&document) {
                Ok(snapshot) => {
                    info!("Rehydrated store from {}", key);
                    clamp_loaded_ratings(normalize_session(snapshot))
                }
                Err(e) => {
                    warn!(
                        "Stored snapshot under {} is malformed ({}); resetting to seeded defaults",
                        key, e
                    );
                    if let Err(e) = storage.save(&malformed_key(key), &document) {
                        error!("Failed to park malformed snapshot: {}", e);
                    }
                    let seeded = seeded_snapshot();
                    persist(&mut *storage, key, &seeded);
                    seeded
                }
            },
            Ok(None) => {
                info!("No stored snapshot under {}; starting from seeded defaults", key);
                let seeded = seeded_snapshot();
                persist(&mut *storage, key, &seeded);
                seeded
            }
            Err(e) => {
                error!("Failed to read snapshot under {}: {}; using seeded defaults", key, e);
                seeded_snapshot()
            }
        };

        let (state, _) = watch::channel(Arc::new(initial));

        Self {
            state,
            storage: Mutex::new(storage),
            config,
        }
    }

    /// Seeded store with no durable backing and no login latency.
    pub fn in_memory() -> Self {
        Self::open(StoreConfig::instant(), MemoryStorage::new())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ========== READERS ==========

    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.state.borrow().clone()
    }

    /// The receiver sees the latest snapshot at all times and is marked
    /// changed by every mutation that alters state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.state.subscribe()
    }

    /// The routing guard reads only this.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn current_mode(&self) -> Mode {
        self.state.borrow().current_mode
    }

    // ========== SESSION ==========

    /// Stub login: waits out the simulated round-trip, then accepts any
    /// credential. Concurrent calls race and the last one to land wins.
    pub async fn login(&self, email: &str, _credential: &str) -> bool {
        debug!("Login requested for {}", email);
        tokio::time::sleep(self.config.login_delay).await;

        let user = User {
            id: UserId(SESSION_USER_ID.to_string()),
            name: SESSION_DISPLAY_NAME.to_string(),
            email: email.to_string(),
            avatar: Some(SESSION_AVATAR_URL.to_string()),
        };
        self.apply("login", |state| {
            state.user = Some(user);
            state.is_authenticated = true;
            true
        });

        info!("Logged in as {}", email);
        true
    }

    pub fn logout(&self) {
        self.apply("logout", |state| {
            let was_signed_in = state.user.is_some() || state.is_authenticated;
            state.user = None;
            state.is_authenticated = false;
            was_signed_in
        });
        info!("Logged out");
    }

    // ========== PLACES ==========

    pub fn add_place(&self, place: NewPlace) -> PlaceId {
        let mut place = place;
        if !place.ratings.is_in_range() {
            warn!(
                "Ratings for {} out of range ({:?}); clamping",
                place.name, place.ratings
            );
            place.ratings = place.ratings.clamped();
        }

        self.commit("add_place", |state| {
            let id = fresh_id(&state.places, |p| &p.id, generate_place_id);
            state.places.push(place.into_place(id.clone()));
            (id, true)
        })
    }

    pub fn update_place(&self, id: &PlaceId, patch: PlacePatch) {
        let mut patch = patch;
        if let Some(ratings) = patch.ratings.filter(|r| !r.is_in_range()) {
            warn!("Ratings update for {} out of range ({:?}); clamping", id, ratings);
            patch.ratings = Some(ratings.clamped());
        }

        self.apply("update_place", |state| {
            match state.places.iter_mut().find(|p| &p.id == id) {
                Some(place) => {
                    let before = place.clone();
                    patch.apply_to(place);
                    *place != before
                }
                None => false,
            }
        });
    }

    /// Memories, tales and goals pointing at the place keep their dangling
    /// `place_id`; readers resolve it to "unlinked".
    pub fn delete_place(&self, id: &PlaceId) {
        self.apply("delete_place", |state| {
            remove_where(&mut state.places, |p| &p.id == id)
        });
    }

    // ========== MEMORIES ==========

    pub fn add_memory(&self, memory: NewMemory) -> MemoryId {
        self.commit("add_memory", |state| {
            let id = fresh_id(&state.memories, |m| &m.id, generate_memory_id);
            state.memories.push(memory.into_memory(id.clone()));
            (id, true)
        })
    }

    pub fn update_memory(&self, id: &MemoryId, patch: MemoryPatch) {
        self.apply("update_memory", |state| {
            match state.memories.iter_mut().find(|m| &m.id == id) {
                Some(memory) => {
                    let before = memory.clone();
                    patch.apply_to(memory);
                    *memory != before
                }
                None => false,
            }
        });
    }

    pub fn delete_memory(&self, id: &MemoryId) {
        self.apply("delete_memory", |state| {
            remove_where(&mut state.memories, |m| &m.id == id)
        });
    }

    // ========== FRIENDS & TALES ==========

    pub fn add_friend(&self, friend: NewFriend) -> FriendId {
        self.commit("add_friend", |state| {
            let id = fresh_id(&state.friends, |f| &f.id, generate_friend_id);
            state.friends.push(friend.into_friend(id.clone()));
            (id, true)
        })
    }

    /// Removes the friend and every tale it owns in one published snapshot.
    pub fn delete_friend(&self, id: &FriendId) {
        self.apply("delete_friend", |state| {
            let removed_friend = remove_where(&mut state.friends, |f| &f.id == id);
            let tales_before = state.tales.len();
            state.tales.retain(|t| &t.friend_id != id);
            let cascaded = tales_before - state.tales.len();
            if cascaded > 0 {
                debug!("Cascaded {} tales with friend {}", cascaded, id);
            }
            removed_friend || cascaded > 0
        });
    }

    /// `friend_id` is expected to name an existing friend; the store does not check.
    pub fn add_tale(&self, tale: NewTale) -> TaleId {
        self.commit("add_tale", |state| {
            let id = fresh_id(&state.tales, |t| &t.id, generate_tale_id);
            state.tales.push(tale.into_tale(id.clone()));
            (id, true)
        })
    }

    pub fn update_tale(&self, id: &TaleId, patch: TalePatch) {
        self.apply("update_tale", |state| {
            match state.tales.iter_mut().find(|t| &t.id == id) {
                Some(tale) => {
                    let before = tale.clone();
                    patch.apply_to(tale);
                    *tale != before
                }
                None => false,
            }
        });
    }

    pub fn delete_tale(&self, id: &TaleId) {
        self.apply("delete_tale", |state| {
            remove_where(&mut state.tales, |t| &t.id == id)
        });
    }

    // ========== GOALS ==========

    pub fn add_goal(&self, goal: NewGoal) -> GoalId {
        self.commit("add_goal", |state| {
            let id = fresh_id(&state.goals, |g| &g.id, generate_goal_id);
            state.goals.push(goal.into_goal(id.clone()));
            (id, true)
        })
    }

    pub fn toggle_goal(&self, id: &GoalId) {
        self.apply("toggle_goal", |state| {
            match state.goals.iter_mut().find(|g| &g.id == id) {
                Some(goal) => {
                    goal.completed = !goal.completed;
                    true
                }
                None => false,
            }
        });
    }

    pub fn delete_goal(&self, id: &GoalId) {
        self.apply("delete_goal", |state| {
            remove_where(&mut state.goals, |g| &g.id == id)
        });
    }

    // ========== MOODBOARD ==========

    pub fn add_moodboard_item(&self, item: NewMoodboardItem) -> MoodboardItemId {
        self.commit("add_moodboard_item", |state| {
            let id = fresh_id(&state.moodboard_items, |m| &m.id, generate_moodboard_item_id);
            state.moodboard_items.push(item.into_item(id.clone()));
            (id, true)
        })
    }

    pub fn delete_moodboard_item(&self, id: &MoodboardItemId) {
        self.apply("delete_moodboard_item", |state| {
            remove_where(&mut state.moodboard_items, |m| &m.id == id)
        });
    }

    // ========== SINGLETONS ==========

    /// Replaces the profile wholesale; answers are never merged.
    pub fn set_taste_profile(&self, profile: TasteProfile) {
        self.apply("set_taste_profile", |state| {
            let changed = state.taste_profile.as_ref() != Some(&profile);
            state.taste_profile = Some(profile);
            changed
        });
    }

    pub fn set_current_mode(&self, mode: Mode) {
        self.apply("set_current_mode", |state| {
            let changed = state.current_mode != mode;
            state.current_mode = mode;
            changed
        });
    }

    /// Back to first-run contents, signed out. A parked malformed document
    /// is dropped as well.
    pub fn reset_to_seed(&self) {
        self.apply("reset_to_seed", |state| {
            *state = seeded_snapshot();
            true
        });

        let parked = malformed_key(&self.config.storage_key);
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = storage.remove(&parked) {
            error!("Failed to drop {}: {}", parked, e);
        }
        info!("Store reset to seeded defaults");
    }

    // ========== COMMIT PIPELINE ==========

    fn apply<F>(&self, op: &'static str, mutate: F)
    where
        F: FnOnce(&mut StoreSnapshot) -> bool,
    {
        self.commit(op, |state| ((), mutate(state)));
    }

    /// Run `mutate` against a copy of the current snapshot. When it reports a
    /// change, the copy is published to subscribers and written through.
    fn commit<R, F>(&self, op: &'static str, mutate: F) -> R
    where
        F: FnOnce(&mut StoreSnapshot) -> (R, bool),
    {
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);

        let mut draft = StoreSnapshot::clone(&self.state.borrow());
        let (output, changed) = mutate(&mut draft);

        if changed {
            let next = Arc::new(draft);
            self.state.send_replace(Arc::clone(&next));
            persist(&mut **storage, &self.config.storage_key, &next);
            debug!("{} applied", op);
        } else {
            debug!("{} matched nothing; state unchanged", op);
        }

        output
    }
}

/// Best-effort write-through; a failed save is logged and otherwise ignored.
fn persist(storage: &mut dyn SnapshotStorage, key: &str, snapshot: &StoreSnapshot) {
    let result = encode_snapshot(snapshot).and_then(|document| storage.save(key, &document));
    if let Err(e) = result {
        error!("Failed to persist snapshot under {}: {}", key, e);
    }
}

/// A user exists iff the session is authenticated.
fn normalize_session(mut snapshot: StoreSnapshot) -> StoreSnapshot {
    if snapshot.user.is_none() || !snapshot.is_authenticated {
        snapshot.user = None;
        snapshot.is_authenticated = false;
    }
    snapshot
}

/// Stored ratings bypass `add_place`, so they are pinned to range on load.
fn clamp_loaded_ratings(mut snapshot: StoreSnapshot) -> StoreSnapshot {
    for place in snapshot.places.iter_mut().filter(|p| !p.ratings.is_in_range()) {
        warn!(
            "Stored ratings for {} out of range ({:?}); clamping",
            place.name, place.ratings
        );
        place.ratings = place.ratings.clamped();
    }
    snapshot
}

fn fresh_id<T, Id, K, G>(records: &[T], id_of: K, generate: G) -> Id
where
    Id: PartialEq,
    K: Fn(&T) -> &Id,
    G: Fn() -> Id,
{
    loop {
        let id = generate();
        if !records.iter().any(|r| id_of(r) == &id) {
            return id;
        }
    }
}

fn remove_where<T, P>(records: &mut Vec<T>, matches: P) -> bool
where
    P: Fn(&T) -> bool,
{
    let before = records.len();
    records.retain(|r| !matches(r));
    records.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use house_schemas::{MoodboardKind, PlaceType, Ratings};
    use std::time::Duration;

    fn new_place(name: &str) -> NewPlace {
        NewPlace {
            name: name.into(),
            kind: PlaceType::Cafe,
            location: "Y".into(),
            date_visited: "2025-01-05".into(),
            ratings: Ratings::new(4, 4, 4, 4),
            tags: vec!["cozy".into()],
            notes: String::new(),
            image_url: None,
            coordinates: None,
        }
    }

    fn new_tale(friend_id: &FriendId, title: &str) -> NewTale {
        NewTale {
            friend_id: friend_id.clone(),
            title: title.into(),
            date: "2025-02-01".into(),
            story: "A story.".into(),
            place_id: None,
            image_url: None,
        }
    }

    #[test]
    fn test_add_appends_with_fresh_id() {
        let store = Store::in_memory();
        let before = store.snapshot();

        let id = store.add_place(new_place("X"));
        let after = store.snapshot();

        assert_eq!(after.places.len(), before.places.len() + 1);
        assert_eq!(after.places.last().map(|p| &p.id), Some(&id));
        assert_eq!(after.places.iter().filter(|p| p.id == id).count(), 1);
        assert!(before.places.iter().all(|p| p.id != id));
    }

    #[test]
    fn test_add_then_delete_restores_seeded_places() {
        let store = Store::in_memory();
        let original = store.snapshot().places.clone();

        let id = store.add_place(new_place("X"));
        store.delete_place(&id);

        assert_eq!(store.snapshot().places, original);
    }

    #[test]
    fn test_add_place_clamps_ratings() {
        let store = Store::in_memory();
        let mut place = new_place("Loud");
        place.ratings = Ratings::new(0, 7, 3, 5);

        let id = store.add_place(place);
        store.update_place(
            &id,
            PlacePatch {
                ratings: Some(Ratings::new(9, 1, 1, 1)),
                ..PlacePatch::default()
            },
        );

        let snapshot = store.snapshot();
        let stored = snapshot.places.iter().find(|p| p.id == id).unwrap();
        assert_eq!(stored.ratings, Ratings::new(5, 1, 1, 1));
    }

    #[test]
    fn test_update_place_changes_only_notes() {
        let store = Store::in_memory();
        let id = PlaceId("2".into());
        let before = store.snapshot().places[1].clone();

        store.update_place(&id, PlacePatch::notes("x"));

        let after = store.snapshot().places[1].clone();
        assert_eq!(after.notes, "x");
        assert_eq!(
            serde_json::to_vec(&house_schemas::Place {
                notes: before.notes.clone(),
                ..after
            })
            .unwrap(),
            serde_json::to_vec(&before).unwrap()
        );
    }

    #[test]
    fn test_missing_ids_are_silently_ignored() {
        let store = Store::in_memory();
        let updates = store.subscribe();
        let before = store.snapshot();

        store.update_place(&PlaceId("nope".into()), PlacePatch::notes("x"));
        store.update_memory(&MemoryId("nope".into()), MemoryPatch::default());
        store.update_tale(&TaleId("nope".into()), TalePatch::default());
        store.toggle_goal(&GoalId("nope".into()));
        store.delete_place(&PlaceId("nope".into()));
        store.delete_memory(&MemoryId("nope".into()));
        store.delete_tale(&TaleId("nope".into()));
        store.delete_goal(&GoalId("nope".into()));
        store.delete_moodboard_item(&MoodboardItemId("nope".into()));
        store.delete_friend(&FriendId("nope".into()));

        assert_eq!(*store.snapshot(), *before);
        assert!(!updates.has_changed().unwrap());
    }

    #[test]
    fn test_identical_updates_are_not_published() {
        let storage = MemoryStorage::new();
        let store = Store::open(StoreConfig::instant(), storage.clone());
        let key = store.config().storage_key.clone();
        storage.insert(&key, "sentinel");
        let updates = store.subscribe();

        let place = store.snapshot().places[0].clone();
        store.update_place(&place.id, PlacePatch::notes(place.notes.as_str()));
        let tale = store.snapshot().tales[0].clone();
        store.update_tale(
            &tale.id,
            TalePatch {
                title: Some(tale.title.clone()),
                ..TalePatch::default()
            },
        );

        assert!(!updates.has_changed().unwrap());
        assert_eq!(storage.get(&key).as_deref(), Some("sentinel"));
    }

    #[test]
    fn test_update_memory_patches_and_clears_link() {
        let store = Store::in_memory();
        let id = store.add_memory(NewMemory {
            title: "Monsoon walk".into(),
            date: "2025-07-14".into(),
            caption: "Soaked".into(),
            place_id: Some(PlaceId("1".into())),
            image_url: Some("https://example.com/rain.jpg".into()),
        });
        let mut updates = store.subscribe();
        let _ = updates.borrow_and_update();

        let patch: MemoryPatch =
            serde_json::from_str(r#"{"caption": "x", "placeId": null}"#).unwrap();
        store.update_memory(&id, patch);

        assert!(updates.has_changed().unwrap());
        let snapshot = store.snapshot();
        let memory = snapshot.memories.iter().find(|m| m.id == id).unwrap();
        assert_eq!(memory.caption, "x");
        assert_eq!(memory.place_id, None);
        assert_eq!(memory.title, "Monsoon walk");
        assert_eq!(memory.date, "2025-07-14");
        assert_eq!(memory.image_url.as_deref(), Some("https://example.com/rain.jpg"));
    }

    #[test]
    fn test_update_tale_changes_only_title() {
        let store = Store::in_memory();
        let id = TaleId("1".into());
        let before = store.snapshot().tales[0].clone();

        store.update_tale(
            &id,
            TalePatch {
                title: Some("new".into()),
                ..TalePatch::default()
            },
        );

        let after = store.snapshot().tales[0].clone();
        assert_eq!(after.title, "new");
        assert_eq!(
            house_schemas::Tale {
                title: before.title.clone(),
                ..after
            },
            before
        );
    }

    #[test]
    fn test_deletes_remove_existing_records() {
        let store = Store::in_memory();
        let memory = store.add_memory(NewMemory {
            title: "Tea".into(),
            date: "2025-03-01".into(),
            caption: String::new(),
            place_id: None,
            image_url: None,
        });
        let mut updates = store.subscribe();

        let _ = updates.borrow_and_update();
        store.delete_memory(&memory);
        assert!(updates.has_changed().unwrap());
        assert!(store.snapshot().memories.is_empty());

        let _ = updates.borrow_and_update();
        store.delete_tale(&TaleId("2".into()));
        assert!(updates.has_changed().unwrap());
        let tales: Vec<_> = store.snapshot().tales.iter().map(|t| t.id.0.clone()).collect();
        assert_eq!(tales, vec!["1"]);

        let _ = updates.borrow_and_update();
        store.delete_goal(&GoalId("3".into()));
        assert!(updates.has_changed().unwrap());
        let snapshot = store.snapshot();
        assert_eq!(snapshot.goals.len(), 4);
        assert!(snapshot.goals.iter().all(|g| g.id.0 != "3"));

        let _ = updates.borrow_and_update();
        let item = snapshot.moodboard_items[0].id.clone();
        store.delete_moodboard_item(&item);
        assert!(updates.has_changed().unwrap());
        let snapshot = store.snapshot();
        assert_eq!(snapshot.moodboard_items.len(), 2);
        assert!(snapshot.moodboard_items.iter().all(|m| m.id != item));
    }

    #[test]
    fn test_delete_friend_cascades_only_their_tales() {
        let store = Store::in_memory();
        let seeded = store.snapshot();
        for friend in &seeded.friends {
            store.delete_friend(&friend.id);
        }
        assert!(store.snapshot().tales.is_empty());

        // friends=[A,B], tales=[{A},{A},{B}]
        let a = store.add_friend(NewFriend::new("Anu", "#D7B47A"));
        let b = store.add_friend(NewFriend::new("Bela", "#7B3230"));
        store.add_tale(new_tale(&a, "one"));
        store.add_tale(new_tale(&a, "two"));
        let kept = store.add_tale(new_tale(&b, "three"));

        store.delete_friend(&a);

        let after = store.snapshot();
        assert_eq!(after.friends.iter().map(|f| &f.id).collect::<Vec<_>>(), vec![&b]);
        assert_eq!(after.tales.len(), 1);
        assert_eq!(after.tales[0].id, kept);
        assert_eq!(after.tales[0].friend_id, b);
    }

    #[test]
    fn test_add_friend_derives_monogram() {
        let store = Store::in_memory();
        let id = store.add_friend(NewFriend::new("rohini", "#2F4F4F"));
        let snapshot = store.snapshot();
        let friend = snapshot.friends.iter().find(|f| f.id == id).unwrap();
        assert_eq!(friend.monogram, "R");
    }

    #[test]
    fn test_toggle_goal_twice_is_identity() {
        let store = Store::in_memory();
        let id = GoalId("2".into());
        let original = store.snapshot().goals.clone();

        store.toggle_goal(&id);
        assert!(!store.snapshot().goals[1].completed);
        store.toggle_goal(&id);

        assert_eq!(store.snapshot().goals, original);
    }

    #[test]
    fn test_deleted_place_leaves_memory_dangling() {
        let store = Store::in_memory();
        let place_id = PlaceId("1".into());
        let memory_id = store.add_memory(NewMemory {
            title: "Breakfast".into(),
            date: "2025-01-01".into(),
            caption: "Eggs and tea".into(),
            place_id: Some(place_id.clone()),
            image_url: None,
        });

        store.delete_place(&place_id);

        let snapshot = store.snapshot();
        let memory = snapshot.memories.iter().find(|m| m.id == memory_id).unwrap();
        assert_eq!(memory.place_id, Some(place_id.clone()));
        assert!(snapshot.places.iter().all(|p| p.id != place_id));
    }

    #[test]
    fn test_mode_changes_touch_nothing_else() {
        let store = Store::in_memory();
        let before = store.snapshot();

        store.set_current_mode(Mode::Date);
        assert_eq!(store.current_mode(), Mode::Date);
        store.set_current_mode(Mode::Solo);

        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn test_taste_profile_replaced_wholesale() {
        let store = Store::in_memory();
        let mut first = TasteProfile {
            persona: "A".into(),
            description: "a".into(),
            vibe: "a".into(),
            answers: Default::default(),
        };
        first.answers.insert("time".into(), "morning".into());
        first.answers.insert("vibe".into(), "cozy".into());
        store.set_taste_profile(first);

        let mut second = TasteProfile {
            persona: "B".into(),
            description: "b".into(),
            vibe: "b".into(),
            answers: Default::default(),
        };
        second.answers.insert("drink".into(), "tea".into());
        store.set_taste_profile(second.clone());

        assert_eq!(store.snapshot().taste_profile, Some(second));
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = Store::in_memory();
        let held = store.snapshot();

        store.add_moodboard_item(NewMoodboardItem {
            kind: MoodboardKind::Color,
            value: "#7B3230".into(),
            caption: Some("Maroon".into()),
        });

        assert_eq!(held.moodboard_items.len(), 3);
        assert_eq!(store.snapshot().moodboard_items.len(), 4);
    }

    #[test]
    fn test_subscribers_see_change_before_return() {
        let store = Store::in_memory();
        let mut updates = store.subscribe();

        store.add_goal(NewGoal {
            text: "Learn to make phuchka".into(),
            completed: false,
            place_id: None,
        });

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().goals.len(), 6);
    }

    #[test]
    fn test_every_change_is_written_through() {
        let storage = MemoryStorage::new();
        let store = Store::open(StoreConfig::instant(), storage.clone());
        let key = store.config().storage_key.clone();

        store.set_current_mode(Mode::Special);

        let document = storage.get(&key).unwrap();
        assert_eq!(decode_snapshot(&document).unwrap(), *store.snapshot());
    }

    #[test]
    fn test_rehydrates_from_storage() {
        let storage = MemoryStorage::new();
        let first = Store::open(StoreConfig::instant(), storage.clone());
        first.add_place(new_place("Nahoum's"));
        first.toggle_goal(&GoalId("1".into()));
        drop(first);

        let second = Store::open(StoreConfig::instant(), storage);
        let snapshot = second.snapshot();
        assert_eq!(snapshot.places.last().unwrap().name, "Nahoum's");
        assert!(snapshot.goals[0].completed);
    }

    #[test]
    fn test_malformed_document_resets_to_seed() {
        let storage = MemoryStorage::new();
        let key = StoreConfig::instant().storage_key;
        storage.insert(&key, r#"{"places": "not a list"}"#);

        let store = Store::open(StoreConfig::instant(), storage.clone());

        assert_eq!(*store.snapshot(), seeded_snapshot());
        assert_eq!(
            storage.get(&malformed_key(&key)).as_deref(),
            Some(r#"{"places": "not a list"}"#)
        );
        let rewritten = decode_snapshot(&storage.get(&key).unwrap()).unwrap();
        assert_eq!(rewritten, seeded_snapshot());
    }

    #[test]
    fn test_rehydrate_clamps_stored_ratings() {
        let storage = MemoryStorage::new();
        let key = StoreConfig::instant().storage_key;
        let mut document = seeded_snapshot();
        document.places[0].ratings = Ratings::new(0, 9, 3, 3);
        storage.insert(&key, &encode_snapshot(&document).unwrap());

        let store = Store::open(StoreConfig::instant(), storage);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.places[0].ratings, Ratings::new(1, 5, 3, 3));
        assert_eq!(snapshot.places[1..], seeded_snapshot().places[1..]);
    }

    #[test]
    fn test_reset_drops_parked_document() {
        let storage = MemoryStorage::new();
        let key = StoreConfig::instant().storage_key;
        storage.insert(&key, "{broken");

        let store = Store::open(StoreConfig::instant(), storage.clone());
        assert!(storage.get(&malformed_key(&key)).is_some());

        store.set_current_mode(Mode::Family);
        store.reset_to_seed();

        assert_eq!(*store.snapshot(), seeded_snapshot());
        assert_eq!(storage.get(&malformed_key(&key)), None);
    }

    #[test]
    fn test_rehydrate_normalizes_session() {
        let storage = MemoryStorage::new();
        let key = StoreConfig::instant().storage_key;
        storage.insert(&key, r#"{"user": null, "isAuthenticated": true}"#);

        let store = Store::open(StoreConfig::instant(), storage);
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let store = Store::in_memory();
        assert!(!store.is_authenticated());

        assert!(store.login("swass@example.com", "anything").await);
        let user = store.current_user().unwrap();
        assert_eq!(user.email, "swass@example.com");
        assert_eq!(user.name, SESSION_DISPLAY_NAME);
        assert!(store.is_authenticated());

        store.logout();
        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_state_readable_while_login_pending() {
        let config = StoreConfig {
            login_delay: Duration::from_millis(50),
            ..StoreConfig::instant()
        };
        let store = Arc::new(Store::open(config, MemoryStorage::new()));

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.login("a@example.com", "pw").await }
        });

        assert!(!store.is_authenticated());
        store.set_current_mode(Mode::Friends);
        assert_eq!(store.snapshot().places.len(), 3);

        assert!(pending.await.unwrap());
        assert!(store.is_authenticated());
        assert_eq!(store.current_mode(), Mode::Friends);
    }

    #[tokio::test]
    async fn test_concurrent_logins_last_write_wins() {
        let store = Store::in_memory();
        let (first, second) = tokio::join!(
            store.login("one@example.com", "x"),
            store.login("two@example.com", "y")
        );
        assert!(first && second);

        let email = store.current_user().unwrap().email;
        assert!(email == "one@example.com" || email == "two@example.com");
        assert!(store.is_authenticated());
    }
}
