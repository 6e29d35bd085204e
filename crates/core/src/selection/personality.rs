//! Bot personality traits

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Five independent traits, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    aggression: f64,
    positional_play: f64,
    tactical_awareness: f64,
    endgame_skill: f64,
    opening_knowledge: f64,
}

/// A partial trait update; absent traits are left unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityUpdate {
    pub aggression: Option<f64>,
    pub positional_play: Option<f64>,
    pub tactical_awareness: Option<f64>,
    pub endgame_skill: Option<f64>,
    pub opening_knowledge: Option<f64>,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            positional_play: 0.5,
            tactical_awareness: 0.5,
            endgame_skill: 0.5,
            opening_knowledge: 0.5,
        }
    }
}

impl PersonalityProfile {
    pub fn aggression(&self) -> f64 {
        self.aggression
    }

    pub fn positional_play(&self) -> f64 {
        self.positional_play
    }

    pub fn tactical_awareness(&self) -> f64 {
        self.tactical_awareness
    }

    pub fn endgame_skill(&self) -> f64 {
        self.endgame_skill
    }

    pub fn opening_knowledge(&self) -> f64 {
        self.opening_knowledge
    }

    /// Applies every present trait, clamped to [0, 1]. Non-finite values are
    /// skipped.
    pub fn apply(&mut self, update: &PersonalityUpdate) {
        let fields = [
            ("aggression", update.aggression, &mut self.aggression),
            ("positional_play", update.positional_play, &mut self.positional_play),
            ("tactical_awareness", update.tactical_awareness, &mut self.tactical_awareness),
            ("endgame_skill", update.endgame_skill, &mut self.endgame_skill),
            ("opening_knowledge", update.opening_knowledge, &mut self.opening_knowledge),
        ];

        for (name, value, slot) in fields {
            match value {
                Some(v) if v.is_finite() => *slot = v.clamp(0.0, 1.0),
                Some(v) => warn!(personality_trait = name, value = %v, "ignoring non-finite personality value"),
                None => {}
            }
        }
    }
}

impl PersonalityUpdate {
    /// Builds an update from trait names. Unknown names are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut update = Self::default();
        for (name, value) in pairs {
            match name {
                "aggression" => update.aggression = Some(value),
                "positional_play" => update.positional_play = Some(value),
                "tactical_awareness" => update.tactical_awareness = Some(value),
                "endgame_skill" => update.endgame_skill = Some(value),
                "opening_knowledge" => update.opening_knowledge = Some(value),
                _ => {}
            }
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_neutral() {
        let profile = PersonalityProfile::default();
        assert_eq!(profile.aggression(), 0.5);
        assert_eq!(profile.opening_knowledge(), 0.5);
    }

    #[test]
    fn test_partial_update_clamps() {
        let mut profile = PersonalityProfile::default();
        profile.apply(&PersonalityUpdate {
            aggression: Some(1.7),
            endgame_skill: Some(-0.2),
            tactical_awareness: Some(0.8),
            ..Default::default()
        });

        assert_eq!(profile.aggression(), 1.0);
        assert_eq!(profile.endgame_skill(), 0.0);
        assert_eq!(profile.tactical_awareness(), 0.8);
        assert_eq!(profile.positional_play(), 0.5);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let mut profile = PersonalityProfile::default();
        profile.apply(&PersonalityUpdate {
            aggression: Some(f64::NAN),
            positional_play: Some(f64::INFINITY),
            ..Default::default()
        });
        assert_eq!(profile, PersonalityProfile::default());
    }

    #[test]
    fn test_from_pairs_ignores_unknown_traits() {
        let update = PersonalityUpdate::from_pairs([("aggression", 0.9), ("luck", 1.0)]);
        assert_eq!(update.aggression, Some(0.9));
        assert_eq!(update.positional_play, None);
    }

    #[test]
    fn test_update_deserializes_partial_json() {
        let update: PersonalityUpdate = serde_json::from_str(r#"{"endgame_skill": 0.25}"#).unwrap();
        assert_eq!(update.endgame_skill, Some(0.25));
        assert_eq!(update.aggression, None);
    }
}
