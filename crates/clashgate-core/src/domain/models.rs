use serde::{Deserialize, Serialize};

use super::page::Page;
use super::timestamp::ApiTimestamp;

/// Badge or icon image links; each size is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub tiny: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub tag: String,
    pub name: String,
    pub role: Option<String>,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    pub tag: String,
    pub name: String,
    pub clan_level: Option<u32>,
    pub members: Option<u32>,
    pub description: Option<String>,
    pub badge_urls: Option<ImageUrls>,
    pub member_list: Option<Vec<ClanMember>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerClan {
    pub tag: String,
    pub name: String,
    pub badge_urls: Option<ImageUrls>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub tag: String,
    pub name: String,
    pub town_hall_level: Option<u32>,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub clan: Option<PlayerClan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMember {
    pub tag: String,
    pub name: String,
    pub town_hall_level: Option<u32>,
    pub map_position: Option<u32>,
}

/// One side of a war. Every field is optional because the API omits the
/// opponent entirely while a clan is not in war.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarClan {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub badge_urls: Option<ImageUrls>,
    pub clan_level: Option<u32>,
    pub attacks: Option<u32>,
    pub stars: Option<u32>,
    pub destruction_percentage: Option<f64>,
    pub members: Option<Vec<WarMember>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWar {
    pub state: Option<String>,
    pub team_size: Option<u32>,
    pub preparation_start_time: Option<ApiTimestamp>,
    pub start_time: Option<ApiTimestamp>,
    pub end_time: Option<ApiTimestamp>,
    pub clan: Option<WarClan>,
    pub opponent: Option<WarClan>,
}

/// A single Clan War League war; same shape as a regular war.
pub type CwlWar = CurrentWar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLogEntry {
    pub result: Option<String>,
    pub end_time: Option<ApiTimestamp>,
    pub team_size: Option<u32>,
    pub attacks_per_member: Option<u32>,
    pub clan: Option<WarClan>,
    pub opponent: Option<WarClan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CwlRound {
    #[serde(default)]
    pub war_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CwlGroup {
    pub state: Option<String>,
    pub season: Option<String>,
    #[serde(default)]
    pub clans: Vec<WarClan>,
    #[serde(default)]
    pub rounds: Vec<CwlRound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidSeason {
    pub state: Option<String>,
    pub start_time: Option<ApiTimestamp>,
    pub end_time: Option<ApiTimestamp>,
    pub capital_total_loot: Option<u64>,
    pub raids_completed: Option<u32>,
    pub total_attacks: Option<u32>,
    pub enemy_districts_destroyed: Option<u32>,
    pub offensive_reward: Option<u32>,
    pub defensive_reward: Option<u32>,
}

/// League, war league or label entry: an id, a name and icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: i64,
    pub name: String,
    pub icon_urls: Option<ImageUrls>,
}

pub type Label = League;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSeason {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_country: Option<bool>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanRanking {
    pub tag: String,
    pub name: String,
    pub rank: Option<u32>,
    pub previous_rank: Option<i32>,
    pub clan_level: Option<u32>,
    pub members: Option<u32>,
    pub clan_points: Option<u64>,
    pub badge_urls: Option<ImageUrls>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRanking {
    pub tag: String,
    pub name: String,
    pub rank: Option<u32>,
    pub previous_rank: Option<i32>,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub clan: Option<PlayerClan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalRanking {
    pub tag: String,
    pub name: String,
    pub rank: Option<u32>,
    pub previous_rank: Option<i32>,
    pub clan_level: Option<u32>,
    #[serde(alias = "clanCapitalPoints")]
    pub capital_points: Option<u64>,
    pub badge_urls: Option<ImageUrls>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldPassSeason {
    pub start_time: ApiTimestamp,
    pub end_time: ApiTimestamp,
}

pub type ClanMembersPage = Page<ClanMember>;
pub type WarLogPage = Page<WarLogEntry>;
pub type RaidSeasonsPage = Page<RaidSeason>;
pub type LeaguesPage = Page<League>;
pub type LeagueSeasonsPage = Page<LeagueSeason>;
pub type LeagueSeasonRankingsPage = Page<PlayerRanking>;
pub type LabelsPage = Page<Label>;
pub type LocationsPage = Page<Location>;
pub type ClanRankingsPage = Page<ClanRanking>;
pub type PlayerRankingsPage = Page<PlayerRanking>;
pub type CapitalRankingsPage = Page<CapitalRanking>;
