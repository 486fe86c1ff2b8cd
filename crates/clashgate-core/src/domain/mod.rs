//! # Domain Records
//!
//! Typed views of the API's JSON payloads and the validation boundary that
//! produces them.
//!
//! Records are plain serde structs: unknown fields are ignored and optional
//! fields may be absent. [`validate`] is the only place a raw
//! [`JsonObject`](crate::engine::JsonObject) becomes a record.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tag`] | Normalized, URL-encoded player/clan/war tag |
//! | [`PageRequest`] / [`Page`] | Cursor pagination in and out |
//! | [`ApiTimestamp`] | `YYYYMMDDTHHMMSS.mmmZ` timestamps |
//! | [`Clan`], [`Player`], [`CurrentWar`], ... | Endpoint payloads |

mod models;
mod page;
mod tag;
mod timestamp;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::engine::JsonObject;
use crate::ValidationError;

pub use models::{
    CapitalRanking, CapitalRankingsPage, Clan, ClanMember, ClanMembersPage, ClanRanking,
    ClanRankingsPage, CurrentWar, CwlGroup, CwlRound, CwlWar, GoldPassSeason, ImageUrls, Label,
    LabelsPage, League, LeagueSeason, LeagueSeasonRankingsPage, LeagueSeasonsPage, LeaguesPage,
    Location, LocationsPage, Player, PlayerClan, PlayerRanking, PlayerRankingsPage, RaidSeason,
    RaidSeasonsPage, WarClan, WarLogEntry, WarLogPage, WarMember,
};
pub use page::{Cursors, Page, PageRequest, Paging};
pub use tag::Tag;
pub use timestamp::ApiTimestamp;

/// Decode a JSON object into record `R`.
pub fn validate<R: DeserializeOwned>(payload: JsonObject) -> Result<R, ValidationError> {
    serde_json::from_value(Value::Object(payload)).map_err(|error| ValidationError::Payload {
        record: std::any::type_name::<R>(),
        reason: error.to_string(),
    })
}
