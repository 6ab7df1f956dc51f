//! Simulated listener message feed.

use std::collections::VecDeque;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Messages shown at once.
pub const VISIBLE_MESSAGES: usize = 6;
/// Older messages beyond this are dropped.
const MAX_STORED: usize = 50;
/// Chance that a refresh cycle brings a new message.
const ARRIVAL_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialMessage {
    pub author: String,
    pub text: String,
    pub likes: u32,
    pub posted_at: NaiveDateTime,
}

impl SocialMessage {
    pub fn new(author: &str, text: &str, likes: u32, posted_at: NaiveDateTime) -> Self {
        Self {
            author: author.to_string(),
            text: text.to_string(),
            likes,
            posted_at,
        }
    }
}

const SEED_MESSAGES: [(&str, &str, i64, u32); 6] = [
    ("Marie_StDenis", "Le Réveil Freedom meilleur réveil de l'île ! #FreedomReunion", 2, 42),
    ("Kevin974", "En écoutant Freedom dans les bouchons vers St-Pierre", 4, 38),
    ("Sarah_Tampon", "Qui va au concert de Kaf Maron ce week-end ?", 7, 29),
    ("Zoreil974", "Découvert Gabriel Zaccai grâce à Freedom, quelle voix !", 12, 51),
    ("Reunion_Addict", "Le son de Baster passe trop en ce moment sur Freedom !", 15, 33),
    ("Metro_Lontan", "Freedom, la seule radio qui parle vraiment à tous les réunionnais", 18, 47),
];

const NEW_AUTHORS: [&str; 5] = [
    "Ti_Creole",
    "Fan_De_Maloya",
    "StPierre_Radio",
    "Freedom4Ever",
    "Reunion_Sega",
];

const NEW_TEXTS: [&str; 5] = [
    "La playlist de ce matin est trop bien !",
    "Jean-Marc trop drôle dans le Réveil Freedom",
    "Qui écoute Freedom au boulot ?",
    "Freedom devrait organiser un concert à Cilaos !",
    "Le maloya de Danyèl Waro, quel chef-d'œuvre",
];

/// Draw this cycle's new message, if any.
pub fn maybe_arrival(rng: &mut fastrand::Rng, now: NaiveDateTime) -> Option<SocialMessage> {
    if rng.f64() >= ARRIVAL_PROBABILITY {
        return None;
    }
    let author = NEW_AUTHORS[rng.usize(..NEW_AUTHORS.len())];
    let text = NEW_TEXTS[rng.usize(..NEW_TEXTS.len())];
    Some(SocialMessage::new(author, text, rng.u32(15..=45), now))
}

/// Session-owned feed, newest message first. Likes persist for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialFeed {
    messages: VecDeque<SocialMessage>,
}

impl SocialFeed {
    /// A feed holding the six opening messages, aged relative to `now`.
    pub fn seeded(now: NaiveDateTime) -> Self {
        let messages = SEED_MESSAGES
            .iter()
            .map(|&(author, text, age_min, likes)| {
                SocialMessage::new(author, text, likes, now - Duration::minutes(age_min))
            })
            .collect();
        Self { messages }
    }

    pub fn push(&mut self, message: SocialMessage) {
        self.messages.push_front(message);
        self.messages.truncate(MAX_STORED);
    }

    pub fn visible(&self) -> impl Iterator<Item = &SocialMessage> {
        self.messages.iter().take(VISIBLE_MESSAGES)
    }

    pub fn visible_len(&self) -> usize {
        self.messages.len().min(VISIBLE_MESSAGES)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Like the visible message at `index`. Returns the new like count.
    pub fn like(&mut self, index: usize) -> Option<u32> {
        if index >= VISIBLE_MESSAGES {
            return None;
        }
        let message = self.messages.get_mut(index)?;
        message.likes = message.likes.saturating_add(1);
        Some(message.likes)
    }
}
