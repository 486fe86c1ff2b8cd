//! Path templates for the read endpoints.
//!
//! Each builder validates its inputs and returns a [`Route`] typed with the
//! record the endpoint yields; the clients turn a route into a request with
//! `fetch`.

use std::fmt::Display;
use std::marker::PhantomData;

use crate::domain::{
    CapitalRankingsPage, Clan, ClanMembersPage, ClanRankingsPage, CurrentWar, CwlGroup, CwlWar,
    GoldPassSeason, LabelsPage, LeagueSeasonRankingsPage, LeagueSeasonsPage, LeaguesPage,
    LocationsPage, PageRequest, Player, PlayerRankingsPage, RaidSeasonsPage, Tag, WarLogPage,
};
use crate::engine::Params;
use crate::http_client::HttpMethod;
use crate::ValidationError;

/// A GET request description bound to the record type it decodes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<R> {
    pub method: HttpMethod,
    pub path: String,
    pub params: Params,
    record: PhantomData<fn() -> R>,
}

impl<R> Route<R> {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            params: Params::new(),
            record: PhantomData,
        }
    }

    fn paged(path: impl Into<String>, page: &PageRequest) -> Result<Self, ValidationError> {
        let mut route = Self::get(path);
        route.params = page.to_params()?;
        Ok(route)
    }
}

fn segment(field: &'static str, value: impl Display) -> Result<String, ValidationError> {
    let value = value.to_string();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySegment { field });
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}

pub fn clan(tag: &str) -> Result<Route<Clan>, ValidationError> {
    Ok(Route::get(format!("/clans/{}", Tag::parse(tag)?)))
}

pub fn clan_members(
    tag: &str,
    page: &PageRequest,
) -> Result<Route<ClanMembersPage>, ValidationError> {
    Route::paged(format!("/clans/{}/members", Tag::parse(tag)?), page)
}

pub fn player(tag: &str) -> Result<Route<Player>, ValidationError> {
    Ok(Route::get(format!("/players/{}", Tag::parse(tag)?)))
}

pub fn current_war(clan_tag: &str) -> Result<Route<CurrentWar>, ValidationError> {
    Ok(Route::get(format!("/clans/{}/currentwar", Tag::parse(clan_tag)?)))
}

pub fn capital_raids(
    clan_tag: &str,
    page: &PageRequest,
) -> Result<Route<RaidSeasonsPage>, ValidationError> {
    Route::paged(
        format!("/clans/{}/capitalraidseasons", Tag::parse(clan_tag)?),
        page,
    )
}

pub fn cwl_group(clan_tag: &str) -> Result<Route<CwlGroup>, ValidationError> {
    Ok(Route::get(format!(
        "/clans/{}/currentwar/leaguegroup",
        Tag::parse(clan_tag)?
    )))
}

pub fn clan_warlog(tag: &str, page: &PageRequest) -> Result<Route<WarLogPage>, ValidationError> {
    Route::paged(format!("/clans/{}/warlog", Tag::parse(tag)?), page)
}

pub fn cwl_leagues(page: &PageRequest) -> Result<Route<LeaguesPage>, ValidationError> {
    Route::paged("/clanwarleagues/warleagues", page)
}

pub fn cwl_war(war_tag: &str) -> Result<Route<CwlWar>, ValidationError> {
    Ok(Route::get(format!(
        "/clanwarleagues/wars/{}",
        Tag::parse(war_tag)?
    )))
}

pub fn locations(page: &PageRequest) -> Result<Route<LocationsPage>, ValidationError> {
    Route::paged("/locations", page)
}

pub fn location_clan_rankings(
    location_id: impl Display,
    page: &PageRequest,
) -> Result<Route<ClanRankingsPage>, ValidationError> {
    let id = segment("location_id", location_id)?;
    Route::paged(format!("/locations/{id}/rankings/clans"), page)
}

pub fn location_player_rankings(
    location_id: impl Display,
    page: &PageRequest,
) -> Result<Route<PlayerRankingsPage>, ValidationError> {
    let id = segment("location_id", location_id)?;
    Route::paged(format!("/locations/{id}/rankings/players"), page)
}

pub fn location_capital_rankings(
    location_id: impl Display,
    page: &PageRequest,
) -> Result<Route<CapitalRankingsPage>, ValidationError> {
    let id = segment("location_id", location_id)?;
    Route::paged(format!("/locations/{id}/rankings/capital"), page)
}

pub fn leagues(page: &PageRequest) -> Result<Route<LeaguesPage>, ValidationError> {
    Route::paged("/leagues", page)
}

pub fn league_seasons(
    league_id: impl Display,
    page: &PageRequest,
) -> Result<Route<LeagueSeasonsPage>, ValidationError> {
    let id = segment("league_id", league_id)?;
    Route::paged(format!("/leagues/{id}/seasons"), page)
}

pub fn league_season(
    league_id: impl Display,
    season_id: &str,
    page: &PageRequest,
) -> Result<Route<LeagueSeasonRankingsPage>, ValidationError> {
    let id = segment("league_id", league_id)?;
    let season = segment("season_id", season_id)?;
    Route::paged(format!("/leagues/{id}/seasons/{season}"), page)
}

pub fn clan_labels(page: &PageRequest) -> Result<Route<LabelsPage>, ValidationError> {
    Route::paged("/labels/clans", page)
}

pub fn current_goldpass() -> Route<GoldPassSeason> {
    Route::get("/goldpass/seasons/current")
}
