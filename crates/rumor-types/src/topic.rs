//! Topic Vocabulary
//!
//! The fixed set of discourse subjects used when generating seed messages.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::TopicId;

/// Discourse subjects an opinion can be about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    HealthAndWellness,
    TechnologyAndSociety,
    EducationAndLearning,
    EnvironmentAndSustainability,
    CultureAndTraditions,
    EconomyAndFinance,
    PoliticsAndGovernment,
    ScienceAndDiscoveries,
    ArtAndCreativity,
    WorkAndCareer,
    LeisureAndEntertainment,
    TravelAndTourism,
    FoodAndNutrition,
    SportsAndPhysicalActivity,
    ReligionAndSpirituality,
    FashionAndStyle,
    HistoryAndHeritage,
    TechnologyAndGadgets,
    TransportationAndMobility,
    JusticeAndHumanRights,
    CommunicationAndMedia,
    CommunityAndSociety,
    HomeAndDomesticLife,
    SecurityAndProtection,
}

impl Topic {
    /// Human-readable label, also used as the topic id on beliefs
    pub fn label(&self) -> &'static str {
        match self {
            Topic::HealthAndWellness => "Health and wellness",
            Topic::TechnologyAndSociety => "Technology and society",
            Topic::EducationAndLearning => "Education and learning",
            Topic::EnvironmentAndSustainability => "Environment and sustainability",
            Topic::CultureAndTraditions => "Culture and traditions",
            Topic::EconomyAndFinance => "Economy and finance",
            Topic::PoliticsAndGovernment => "Politics and government",
            Topic::ScienceAndDiscoveries => "Science and discoveries",
            Topic::ArtAndCreativity => "Art and creativity",
            Topic::WorkAndCareer => "Work and career",
            Topic::LeisureAndEntertainment => "Leisure and entertainment",
            Topic::TravelAndTourism => "Travel and tourism",
            Topic::FoodAndNutrition => "Food and nutrition",
            Topic::SportsAndPhysicalActivity => "Sports and physical activity",
            Topic::ReligionAndSpirituality => "Religion and spirituality",
            Topic::FashionAndStyle => "Fashion and style",
            Topic::HistoryAndHeritage => "History and heritage",
            Topic::TechnologyAndGadgets => "Technology and gadgets",
            Topic::TransportationAndMobility => "Transportation and mobility",
            Topic::JusticeAndHumanRights => "Justice and human rights",
            Topic::CommunicationAndMedia => "Communication and media",
            Topic::CommunityAndSociety => "Community and society",
            Topic::HomeAndDomesticLife => "Home and domestic life",
            Topic::SecurityAndProtection => "Security and protection",
        }
    }

    pub fn id(&self) -> TopicId {
        TopicId::from(self.label())
    }

    /// Look a topic up by its label
    pub fn from_label(label: &str) -> Option<Topic> {
        Topic::all().iter().copied().find(|t| t.label() == label)
    }

    /// Returns all topic variants.
    pub fn all() -> &'static [Topic] {
        &[
            Topic::HealthAndWellness,
            Topic::TechnologyAndSociety,
            Topic::EducationAndLearning,
            Topic::EnvironmentAndSustainability,
            Topic::CultureAndTraditions,
            Topic::EconomyAndFinance,
            Topic::PoliticsAndGovernment,
            Topic::ScienceAndDiscoveries,
            Topic::ArtAndCreativity,
            Topic::WorkAndCareer,
            Topic::LeisureAndEntertainment,
            Topic::TravelAndTourism,
            Topic::FoodAndNutrition,
            Topic::SportsAndPhysicalActivity,
            Topic::ReligionAndSpirituality,
            Topic::FashionAndStyle,
            Topic::HistoryAndHeritage,
            Topic::TechnologyAndGadgets,
            Topic::TransportationAndMobility,
            Topic::JusticeAndHumanRights,
            Topic::CommunicationAndMedia,
            Topic::CommunityAndSociety,
            Topic::HomeAndDomesticLife,
            Topic::SecurityAndProtection,
        ]
    }

    /// Select `count` distinct topics in random order.
    ///
    /// Asking for more topics than exist returns the whole vocabulary.
    pub fn select_random_topics<R: Rng>(count: usize, rng: &mut R) -> Vec<Topic> {
        let mut topics = Topic::all().to_vec();
        topics.shuffle(rng);
        topics.truncate(count);
        topics
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_size_and_unique_labels() {
        assert_eq!(Topic::all().len(), 24);
        let labels: HashSet<_> = Topic::all().iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), 24);
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(Topic::from_label("Food and nutrition"), Some(Topic::FoodAndNutrition));
        assert_eq!(Topic::from_label("Underwater basket weaving"), None);
        assert_eq!(Topic::SecurityAndProtection.id().as_str(), "Security and protection");
    }

    #[test]
    fn test_select_random_topics_distinct() {
        let mut rng = SmallRng::seed_from_u64(42);
        let picked = Topic::select_random_topics(5, &mut rng);
        assert_eq!(picked.len(), 5);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 5);

        let all = Topic::select_random_topics(100, &mut rng);
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn test_select_random_topics_deterministic() {
        let mut rng1 = SmallRng::seed_from_u64(7);
        let mut rng2 = SmallRng::seed_from_u64(7);
        assert_eq!(
            Topic::select_random_topics(3, &mut rng1),
            Topic::select_random_topics(3, &mut rng2)
        );
    }
}
