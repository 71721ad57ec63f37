use house_schemas::TasteProfile;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct QuizOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub question: &'static str,
    pub options: Vec<QuizOption>,
}

fn question(
    id: &'static str,
    text: &'static str,
    options: [(&'static str, &'static str); 4],
) -> QuizQuestion {
    QuizQuestion {
        id,
        question: text,
        options: options
            .into_iter()
            .map(|(value, label)| QuizOption { value, label })
            .collect(),
    }
}

pub fn questions() -> Vec<QuizQuestion> {
    vec![
        question(
            "time",
            "What time of day speaks to your soul?",
            [
                ("morning", "Golden Morning"),
                ("afternoon", "Lazy Afternoon"),
                ("evening", "Twilight Hours"),
                ("night", "Midnight Tales"),
            ],
        ),
        question(
            "vibe",
            "Your ideal café mood?",
            [
                ("cozy", "Cozy & Intimate"),
                ("aesthetic", "Aesthetic & Pretty"),
                ("classic", "Classic & Heritage"),
                ("modern", "Modern & Minimal"),
            ],
        ),
        question(
            "drink",
            "Your drink of choice?",
            [
                ("coffee", "Strong Coffee"),
                ("tea", "Delicate Tea"),
                ("chocolate", "Hot Chocolate"),
                ("cold", "Cold Brews"),
            ],
        ),
        question(
            "dessert",
            "Sweet ending preference?",
            [
                ("cake", "Rich Cakes"),
                ("pastry", "Flaky Pastries"),
                ("chocolate", "All Chocolate"),
                ("light", "Light & Fruity"),
            ],
        ),
        question(
            "company",
            "Best enjoyed with?",
            [
                ("solo", "Just Myself"),
                ("bestie", "Best Friend"),
                ("group", "The Whole Gang"),
                ("date", "Someone Special"),
            ],
        ),
    ]
}

struct Persona {
    key: &'static str,
    persona: &'static str,
    description: &'static str,
    vibe: &'static str,
}

const PERSONAS: &[Persona] = &[
    Persona {
        key: "classic-tea-solo",
        persona: "The Heritage Dreamer",
        description: "You find solace in old-world charm. A book, a cup of Darjeeling, and the whisper of history is all you need.",
        vibe: "Colonial clubs, Flurys at dawn, poetry corners",
    },
    Persona {
        key: "aesthetic-chocolate-bestie",
        persona: "The Golden Hour Seeker",
        description: "Beauty and friendship fuel your soul. You curate moments like art pieces, each café visit a story waiting to be shared.",
        vibe: "Mrs. Magpie brunches, Instagram-worthy corners, sunlit afternoons",
    },
    Persona {
        key: "cozy-coffee-date",
        persona: "The Romantic Nostalgic",
        description: "Love and warmth guide your choices. Every cup is better when shared with someone who understands your soul.",
        vibe: "Candlelit dinners, monsoon evenings, handwritten notes",
    },
    Persona {
        key: "modern-cold-group",
        persona: "The Social Trendsetter",
        description: "You bring the energy wherever you go. New spots, new experiences, and good company are your calling.",
        vibe: "Rooftop cafés, weekend brunches, celebration vibes",
    },
];

const FALLBACK_PERSONA: Persona = Persona {
    key: "default",
    persona: "The Kolkata Connoisseur",
    description: "A unique blend of old and new, you appreciate the richness of heritage while embracing modern delights.",
    vibe: "Park Street evenings, surprise discoveries, curated experiences",
};

/// `vibe-drink-company`, with unanswered questions read as classic, tea and solo.
pub fn persona_key(answers: &BTreeMap<String, String>) -> String {
    let pick = |question: &str, fallback: &'static str| {
        answers
            .get(question)
            .map(String::as_str)
            .filter(|answer| !answer.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    format!(
        "{}-{}-{}",
        pick("vibe", "classic"),
        pick("drink", "tea"),
        pick("company", "solo")
    )
}

/// Map quiz answers onto a persona. The returned profile carries the answers
/// and is meant to be handed to `Store::set_taste_profile` as-is.
pub fn resolve_profile(answers: BTreeMap<String, String>) -> TasteProfile {
    let key = persona_key(&answers);
    let persona = PERSONAS
        .iter()
        .find(|p| p.key == key)
        .unwrap_or(&FALLBACK_PERSONA);

    debug!("Quiz key {} resolved to {}", key, persona.persona);

    TasteProfile {
        persona: persona.persona.to_string(),
        description: persona.description.to_string(),
        vibe: persona.vibe.to_string(),
        answers,
    }
}
