use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ParseError, prelude::*};

/// The kinds of entity the database stores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub enum EntityType {
    Author,
    Edition,
    EditionGroup,
    Publisher,
    Series,
    Work,
}

impl EntityType {
    pub const ALL: [Self; 6] = [
        Self::Author,
        Self::Edition,
        Self::EditionGroup,
        Self::Publisher,
        Self::Series,
        Self::Work,
    ];

    /// Key under which lists of this entity appear in collection payloads
    pub const fn collection_key(self) -> &'static str {
        match self {
            Self::Author => "authors",
            Self::Edition => "editions",
            Self::EditionGroup => "editionGroups",
            Self::Publisher => "publishers",
            Self::Series => "series",
            Self::Work => "works",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Edition => "Edition",
            Self::EditionGroup => "EditionGroup",
            Self::Publisher => "Publisher",
            Self::Series => "Series",
            Self::Work => "Work",
        }
    }
}

impl FromStr for EntityType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|entity| entity.name() == trimmed)
            .ok_or_else(|| ParseError::UnknownEntityType(s.to_owned()))
    }
}

/// Field labels on the author form, which differ for groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorLabels {
    pub begin_area_label: &'static str,
    pub begin_date_label: &'static str,
    pub end_area_label: &'static str,
    pub end_date_label: &'static str,
    pub ended_label: &'static str,
}

impl AuthorLabels {
    pub const fn for_author(is_group: bool) -> Self {
        if is_group {
            Self {
                begin_area_label: "Place founded",
                begin_date_label: "Date founded",
                end_area_label: "Place of dissolution",
                end_date_label: "Date of dissolution",
                ended_label: "Dissolved?",
            }
        } else {
            Self {
                begin_area_label: "Place of birth",
                begin_date_label: "Date of birth",
                end_area_label: "Place of death",
                end_date_label: "Date of death",
                ended_label: "Died?",
            }
        }
    }
}

/// Counter target for each achievement, indexed by achievement id - 1
const MAX_ACHIEVEMENT_PROGRESS: [u32; 30] = [
    1, 50, 250, 1, 10, 100, 1, 10, 100, 10, 7, 30, 1, 1, 1, 10, 100, 1, 10, 100, 1, 10, 100, 10,
    100, 1000, 1, 1, 10, 100,
];

/// Progress target for an achievement; 0 for ids without a counter
pub fn max_achievement_progress(id: u32) -> u32 {
    id.checked_sub(1)
        .and_then(|index| MAX_ACHIEVEMENT_PROGRESS.get(index as usize))
        .copied()
        .unwrap_or(0)
}

/// An editor's progress towards one achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub achievement_id: u32,
    #[serde(default)]
    pub counter: u32,
    #[serde(default)]
    pub unlocked: bool,
}

impl AchievementProgress {
    /// `counter/target` for locked achievements, `None` once unlocked
    pub fn counter_label(&self) -> Option<String> {
        (!self.unlocked).then(|| {
            format!(
                "{}/{}",
                self.counter,
                max_achievement_progress(self.achievement_id)
            )
        })
    }
}
