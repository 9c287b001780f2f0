use serde::{Deserialize, Serialize};

use crate::geo::{format_distance, haversine_distance, Coordinate, SearchRadius};
use crate::picker::PickerSink;
use crate::{format_date, format_time_ago, DESCRIPTION_PREVIEW_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BountyId(pub String);

impl BountyId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BountyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BountyCategory {
    Pet,
    Person,
    #[default]
    #[serde(other)]
    Other,
}

impl BountyCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Person => "person",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for BountyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounty document as stored in the remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyRecord {
    pub id: BountyId,
    pub name: String,
    #[serde(default)]
    pub category: BountyCategory,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub reward: Option<f64>,
    #[serde(default)]
    pub appearance: String,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub location: Coordinate,
    pub last_seen_ms: u64,
    pub created_at_ms: u64,
}

impl BountyRecord {
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn appearance_preview(&self, max_len: usize) -> String {
        if self.appearance.chars().count() <= max_len {
            return self.appearance.clone();
        }
        let truncated: String = self.appearance.chars().take(max_len).collect();
        format!("{}...", truncated.trim_end())
    }
}

/// The form that hosts the location picker; its confirmed location and
/// radius narrow the feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchFilter {
    pub location: Option<Coordinate>,
    pub radius: SearchRadius,
    pub picker_open: bool,
}

impl SearchFilter {
    #[must_use]
    pub fn matches(&self, bounty: &BountyRecord) -> bool {
        self.location
            .map_or(true, |center| self.radius.contains(center, bounty.location))
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }
}

impl PickerSink for SearchFilter {
    fn set_location(&mut self, coordinate: Coordinate) {
        self.location = Some(coordinate);
    }

    fn set_radius(&mut self, radius: SearchRadius) {
        self.radius = radius;
    }

    fn set_open(&mut self, open: bool) {
        self.picker_open = open;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub bounties: Vec<BountyRecord>,
    pub is_refreshing: bool,
    pub selected: Option<BountyId>,
    pub last_refresh_ms: Option<u64>,
}

impl FeedState {
    pub fn replace(&mut self, bounties: Vec<BountyRecord>, now_ms: u64) {
        if let Some(selected) = &self.selected {
            if !bounties.iter().any(|b| &b.id == selected) {
                self.selected = None;
            }
        }
        self.bounties = bounties;
        self.last_refresh_ms = Some(now_ms);
    }

    #[must_use]
    pub fn find(&self, id: &BountyId) -> Option<&BountyRecord> {
        self.bounties.iter().find(|b| &b.id == id)
    }

    #[must_use]
    pub fn selected_bounty(&self) -> Option<&BountyRecord> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BountyCardView {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub category: BountyCategory,
    pub primary_line: String,
    pub secondary_line: String,
    pub appearance_preview: String,
    pub time_ago: String,
    pub created_on: String,
    pub distance_text: Option<String>,
    pub created_at_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BountyDetailView {
    pub id: String,
    pub name: String,
    pub images: Vec<String>,
    pub category: String,
    pub appearance: String,
    pub additional_info: String,
    pub breed: String,
    pub age: String,
    pub gender: String,
    pub reward: String,
    pub latitude: f64,
    pub longitude: f64,
    pub last_seen_ms: u64,
    pub last_seen_ago: String,
}

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

#[must_use]
pub fn build_card(bounty: &BountyRecord, origin: Option<Coordinate>, now_ms: u64) -> BountyCardView {
    let age = or_unknown(bounty.age);
    let (primary_line, secondary_line) = match bounty.category {
        BountyCategory::Pet => (
            format!("Breed:{}", or_unknown(bounty.breed.as_deref())),
            format!("Age:{age} Gender:{}", bounty.gender),
        ),
        BountyCategory::Person | BountyCategory::Other => (
            bounty.category.to_string(),
            format!("Age: {age} Gender: {}", bounty.gender),
        ),
    };

    BountyCardView {
        id: bounty.id.0.clone(),
        name: bounty.name.clone(),
        thumbnail_url: bounty.thumbnail().map(str::to_string),
        category: bounty.category,
        primary_line,
        secondary_line,
        appearance_preview: bounty.appearance_preview(DESCRIPTION_PREVIEW_LENGTH),
        time_ago: format_time_ago(bounty.created_at_ms, now_ms),
        created_on: format_date(bounty.created_at_ms),
        distance_text: origin.map(|o| format_distance(haversine_distance(o, bounty.location))),
        created_at_ms: bounty.created_at_ms,
    }
}

/// Cards that pass the filter, nearest first when a search origin is set,
/// otherwise newest first.
#[must_use]
pub fn build_cards(feed: &FeedState, filter: &SearchFilter, now_ms: u64) -> Vec<BountyCardView> {
    let mut matching: Vec<&BountyRecord> =
        feed.bounties.iter().filter(|b| filter.matches(b)).collect();

    match filter.location {
        Some(origin) => matching.sort_by(|a, b| {
            haversine_distance(origin, a.location)
                .partial_cmp(&haversine_distance(origin, b.location))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        None => matching.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms)),
    }

    matching
        .into_iter()
        .map(|b| build_card(b, filter.location, now_ms))
        .collect()
}

#[must_use]
pub fn build_detail(bounty: &BountyRecord, now_ms: u64) -> BountyDetailView {
    let additional_info = bounty
        .additional_info
        .as_deref()
        .filter(|info| !info.is_empty())
        .unwrap_or("No additional info")
        .to_string();

    BountyDetailView {
        id: bounty.id.0.clone(),
        name: bounty.name.clone(),
        images: bounty.images.clone(),
        category: bounty.category.to_string(),
        appearance: bounty.appearance.clone(),
        additional_info,
        breed: or_unknown(bounty.breed.as_deref()),
        age: or_unknown(bounty.age),
        gender: bounty.gender.clone(),
        reward: bounty
            .reward
            .map_or_else(|| "unknown".to_string(), |r| format!("$$$ {r}")),
        latitude: bounty.location.latitude,
        longitude: bounty.location.longitude,
        last_seen_ms: bounty.last_seen_ms,
        last_seen_ago: format_time_ago(bounty.last_seen_ms, now_ms),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn bounty(id: &str, category: BountyCategory, lat: f64, lng: f64) -> BountyRecord {
        BountyRecord {
            id: BountyId::new(id),
            name: format!("Bounty {id}"),
            category,
            breed: None,
            age: Some(3),
            gender: "female".into(),
            reward: None,
            appearance: "Brown with a white patch".into(),
            additional_info: None,
            images: vec![format!("https://img.example.com/{id}.jpg")],
            location: Coordinate::unchecked(lat, lng),
            last_seen_ms: 0,
            created_at_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::bounty;
    use super::*;

    mod record_tests {
        use super::*;

        #[test]
        fn test_decode_camel_case_document() {
            let json = r#"{
                "id": "b1",
                "name": "Rex",
                "category": "pet",
                "breed": "Beagle",
                "age": 4,
                "gender": "male",
                "reward": 250.0,
                "appearance": "Tri-colour",
                "additionalInfo": "Wears a red collar",
                "images": ["https://img.example.com/rex.jpg"],
                "location": {"latitude": 40.7, "longitude": -73.9},
                "lastSeenMs": 1000,
                "createdAtMs": 900
            }"#;
            let record: BountyRecord = serde_json::from_str(json).unwrap();
            assert_eq!(record.category, BountyCategory::Pet);
            assert_eq!(record.additional_info.as_deref(), Some("Wears a red collar"));
            assert_eq!(record.thumbnail(), Some("https://img.example.com/rex.jpg"));
        }

        #[test]
        fn test_unknown_category_is_other() {
            let category: BountyCategory = serde_json::from_str(r#""vehicle""#).unwrap();
            assert_eq!(category, BountyCategory::Other);
        }

        #[test]
        fn test_appearance_preview_truncates() {
            let mut b = bounty("b1", BountyCategory::Pet, 0.0, 0.0);
            b.appearance = "a".repeat(100);
            let preview = b.appearance_preview(10);
            assert_eq!(preview, format!("{}...", "a".repeat(10)));
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_no_location_matches_everything() {
            let filter = SearchFilter::default();
            assert!(filter.matches(&bounty("b1", BountyCategory::Pet, 50.0, 50.0)));
        }

        #[test]
        fn test_sink_updates_filter() {
            let mut filter = SearchFilter {
                picker_open: true,
                ..SearchFilter::default()
            };
            filter.set_location(Coordinate::unchecked(40.0, -73.0));
            filter.set_radius(SearchRadius::snap(1000.0));
            filter.set_open(false);

            assert_eq!(filter.location, Some(Coordinate::unchecked(40.0, -73.0)));
            assert_eq!(filter.radius.meters(), 1000);
            assert!(!filter.picker_open);
        }

        #[test]
        fn test_radius_filter_and_nearest_first() {
            let feed = FeedState {
                bounties: vec![
                    bounty("far", BountyCategory::Pet, 41.0, -73.0),
                    bounty("mid", BountyCategory::Pet, 40.005, -73.0),
                    bounty("near", BountyCategory::Pet, 40.001, -73.0),
                ],
                ..FeedState::default()
            };
            let filter = SearchFilter {
                location: Some(Coordinate::unchecked(40.0, -73.0)),
                radius: SearchRadius::snap(1000.0),
                picker_open: false,
            };

            let cards = build_cards(&feed, &filter, 0);
            let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["near", "mid"]);
            assert!(cards[0].distance_text.is_some());
        }

        #[test]
        fn test_without_location_newest_first() {
            let mut older = bounty("older", BountyCategory::Pet, 0.0, 0.0);
            older.created_at_ms = 10;
            let mut newer = bounty("newer", BountyCategory::Pet, 0.0, 0.0);
            newer.created_at_ms = 20;
            let feed = FeedState {
                bounties: vec![older, newer],
                ..FeedState::default()
            };

            let cards = build_cards(&feed, &SearchFilter::default(), 30);
            assert_eq!(cards[0].id, "newer");
            assert!(cards[0].distance_text.is_none());
        }
    }

    mod card_tests {
        use super::*;

        #[test]
        fn test_pet_card_lines() {
            let mut b = bounty("b1", BountyCategory::Pet, 0.0, 0.0);
            b.breed = Some("Beagle".into());
            let card = build_card(&b, None, 0);
            assert_eq!(card.primary_line, "Breed:Beagle");
            assert_eq!(card.secondary_line, "Age:3 Gender:female");
        }

        #[test]
        fn test_card_shows_creation_date() {
            let mut b = bounty("b1", BountyCategory::Pet, 0.0, 0.0);
            b.created_at_ms = 1_792_411_200_000;
            let card = build_card(&b, None, 1_792_411_260_000);
            assert_eq!(card.time_ago, "1m ago");
            assert_eq!(card.created_on, "Mon Oct 19 2026");
        }

        #[test]
        fn test_person_card_lines() {
            let mut b = bounty("b1", BountyCategory::Person, 0.0, 0.0);
            b.age = None;
            let card = build_card(&b, None, 0);
            assert_eq!(card.primary_line, "person");
            assert_eq!(card.secondary_line, "Age: unknown Gender: female");
        }

        #[test]
        fn test_detail_fallbacks() {
            let mut b = bounty("b1", BountyCategory::Pet, 1.0, 2.0);
            b.additional_info = Some(String::new());
            let detail = build_detail(&b, 0);
            assert_eq!(detail.additional_info, "No additional info");
            assert_eq!(detail.breed, "unknown");
            assert_eq!(detail.reward, "unknown");
            assert_eq!(detail.latitude, 1.0);
        }

        #[test]
        fn test_detail_reward() {
            let mut b = bounty("b1", BountyCategory::Pet, 0.0, 0.0);
            b.reward = Some(250.0);
            assert_eq!(build_detail(&b, 0).reward, "$$$ 250");
        }
    }

    mod feed_state_tests {
        use super::*;

        #[test]
        fn test_replace_drops_vanished_selection() {
            let mut feed = FeedState::default();
            feed.replace(vec![bounty("b1", BountyCategory::Pet, 0.0, 0.0)], 1);
            feed.selected = Some(BountyId::new("b1"));

            feed.replace(vec![bounty("b2", BountyCategory::Pet, 0.0, 0.0)], 2);
            assert!(feed.selected.is_none());
            assert_eq!(feed.last_refresh_ms, Some(2));
        }

        #[test]
        fn test_replace_keeps_surviving_selection() {
            let mut feed = FeedState::default();
            feed.replace(vec![bounty("b1", BountyCategory::Pet, 0.0, 0.0)], 1);
            feed.selected = Some(BountyId::new("b1"));
            feed.replace(vec![bounty("b1", BountyCategory::Pet, 0.0, 0.0)], 2);
            assert_eq!(
                feed.selected_bounty().map(|b| b.id.as_str()),
                Some("b1")
            );
        }
    }
}
