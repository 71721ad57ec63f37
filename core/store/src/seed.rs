//! First-run contents of the store.

use house_schemas::{
    Friend, FriendId, Goal, GoalId, Mode, MoodboardItem, MoodboardItemId, MoodboardKind, Place,
    PlaceId, PlaceType, Ratings, StoreSnapshot, Tale, TaleId,
};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

pub fn seeded_places() -> Vec<Place> {
    vec![
        Place {
            id: PlaceId("1".into()),
            name: "Flurys".into(),
            kind: PlaceType::Cafe,
            location: "Park Street, Kolkata".into(),
            date_visited: "2024-12-01".into(),
            ratings: Ratings::new(5, 5, 4, 4),
            tags: tags(&["heritage", "breakfast", "iconic"]),
            notes: "The original Kolkata tea room experience. Timeless.".into(),
            image_url: Some(
                "https://images.unsplash.com/photo-1554118811-1e0d58224f24?w=400".into(),
            ),
            coordinates: None,
        },
        Place {
            id: PlaceId("2".into()),
            name: "Peter Cat".into(),
            kind: PlaceType::Restaurant,
            location: "Park Street, Kolkata".into(),
            date_visited: "2024-11-15".into(),
            ratings: Ratings::new(4, 4, 5, 4),
            tags: tags(&["chelo kebab", "legendary", "dinner"]),
            notes: "The Chelo Kebab is unmatched. Always a queue, always worth it.".into(),
            image_url: Some(
                "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?w=400".into(),
            ),
            coordinates: None,
        },
        Place {
            id: PlaceId("3".into()),
            name: "Mrs. Magpie".into(),
            kind: PlaceType::Cafe,
            location: "Hindustan Park, Kolkata".into(),
            date_visited: "2024-10-20".into(),
            ratings: Ratings::new(5, 5, 5, 5),
            tags: tags(&["desserts", "aesthetic", "cozy"]),
            notes: "Best cheesecake in the city. Period.".into(),
            image_url: Some(
                "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=400".into(),
            ),
            coordinates: None,
        },
    ]
}

pub fn seeded_friends() -> Vec<Friend> {
    [("1", "Priya", "#D7B47A"), ("2", "Ria", "#7B3230"), ("3", "Ananya", "#2F4F4F")]
        .into_iter()
        .map(|(id, name, color)| Friend {
            id: FriendId(id.into()),
            name: name.into(),
            monogram: house_schemas::monogram_for(name),
            color: color.into(),
        })
        .collect()
}

pub fn seeded_tales() -> Vec<Tale> {
    vec![
        Tale {
            id: TaleId("1".into()),
            friend_id: FriendId("1".into()),
            title: "The Rainy Evening at Flurys".into(),
            date: "2024-08-15".into(),
            story: "We sat by the window watching the monsoon pour down Park Street. The hot chocolate was perfect, and we talked for hours about everything and nothing.".into(),
            place_id: Some(PlaceId("1".into())),
            image_url: None,
        },
        Tale {
            id: TaleId("2".into()),
            friend_id: FriendId("2".into()),
            title: "Birthday Dinner Surprise".into(),
            date: "2024-07-20".into(),
            story: "Ria planned the most elaborate surprise at Peter Cat. The Chelo Kebab never tasted better than when shared with friends.".into(),
            place_id: Some(PlaceId("2".into())),
            image_url: None,
        },
    ]
}

pub fn seeded_goals() -> Vec<Goal> {
    [
        ("1", "Try 10 new cafés this year", false),
        ("2", "Host a dinner party", true),
        ("3", "Visit Victoria Memorial at sunset", false),
        ("4", "Take a yellow taxi ride through North Kolkata", true),
        ("5", "Write 12 tales with friends", false),
    ]
    .into_iter()
    .map(|(id, text, completed)| Goal {
        id: GoalId(id.into()),
        text: text.into(),
        completed,
        place_id: None,
    })
    .collect()
}

pub fn seeded_moodboard_items() -> Vec<MoodboardItem> {
    vec![
        MoodboardItem {
            id: MoodboardItemId("1".into()),
            kind: MoodboardKind::Quote,
            value: "\"Kolkata is a feeling, not just a city.\"".into(),
            caption: None,
        },
        MoodboardItem {
            id: MoodboardItemId("2".into()),
            kind: MoodboardKind::Color,
            value: "#D7B47A".into(),
            caption: Some("Antique Gold".into()),
        },
        MoodboardItem {
            id: MoodboardItemId("3".into()),
            kind: MoodboardKind::Image,
            value: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400".into(),
            caption: Some("Heritage corridors".into()),
        },
    ]
}

/// Logged out, solo mode, no memories or taste profile yet.
pub fn seeded_snapshot() -> StoreSnapshot {
    StoreSnapshot {
        user: None,
        is_authenticated: false,
        places: seeded_places(),
        memories: Vec::new(),
        friends: seeded_friends(),
        tales: seeded_tales(),
        goals: seeded_goals(),
        moodboard_items: seeded_moodboard_items(),
        taste_profile: None,
        current_mode: Mode::Solo,
    }
}
