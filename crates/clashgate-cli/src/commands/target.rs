use clashgate_core::{domain, endpoints, HttpMethod, JsonObject, PageRequest, Params, Route};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cli::{Command, PageArgs, RankingKind};
use crate::error::CliError;

/// A resolved command: the request to issue and how to decode its payload.
#[derive(Debug, Clone)]
pub struct Target {
    pub method: HttpMethod,
    pub path: String,
    pub params: Params,
    decode: fn(JsonObject) -> Result<Value, CliError>,
}

impl Target {
    fn new<R: DeserializeOwned + Serialize>(route: Route<R>) -> Self {
        Self {
            method: route.method,
            path: route.path,
            params: route.params,
            decode: decode::<R>,
        }
    }

    /// Validate `payload` into the endpoint's record and re-serialize it.
    pub fn decode(&self, payload: JsonObject) -> Result<Value, CliError> {
        (self.decode)(payload)
    }
}

fn decode<R: DeserializeOwned + Serialize>(payload: JsonObject) -> Result<Value, CliError> {
    let record: R = domain::validate(payload)?;
    Ok(serde_json::to_value(record)?)
}

fn page(args: &PageArgs) -> PageRequest {
    PageRequest {
        limit: args.limit,
        after: args.after.clone(),
    }
}

pub fn resolve(command: &Command) -> Result<Target, CliError> {
    let target = match command {
        Command::Clan(args) => Target::new(endpoints::clan(&args.tag)?),
        Command::Members(args) => {
            Target::new(endpoints::clan_members(&args.tag, &page(&args.page))?)
        }
        Command::Player(args) => Target::new(endpoints::player(&args.tag)?),
        Command::War(args) => Target::new(endpoints::current_war(&args.tag)?),
        Command::Raids(args) => {
            Target::new(endpoints::capital_raids(&args.tag, &page(&args.page))?)
        }
        Command::Warlog(args) => {
            Target::new(endpoints::clan_warlog(&args.tag, &page(&args.page))?)
        }
        Command::CwlGroup(args) => Target::new(endpoints::cwl_group(&args.tag)?),
        Command::CwlWar(args) => Target::new(endpoints::cwl_war(&args.tag)?),
        Command::CwlLeagues(args) => Target::new(endpoints::cwl_leagues(&page(args))?),
        Command::Locations(args) => Target::new(endpoints::locations(&page(args))?),
        Command::Rankings(args) => {
            let page = page(&args.page);
            match args.kind {
                RankingKind::Clans => {
                    Target::new(endpoints::location_clan_rankings(&args.location_id, &page)?)
                }
                RankingKind::Players => {
                    Target::new(endpoints::location_player_rankings(&args.location_id, &page)?)
                }
                RankingKind::Capital => {
                    Target::new(endpoints::location_capital_rankings(&args.location_id, &page)?)
                }
            }
        }
        Command::Leagues(args) => Target::new(endpoints::leagues(&page(args))?),
        Command::LeagueSeasons(args) => {
            Target::new(endpoints::league_seasons(&args.league_id, &page(&args.page))?)
        }
        Command::LeagueSeason(args) => Target::new(endpoints::league_season(
            &args.league_id,
            &args.season_id,
            &page(&args.page),
        )?),
        Command::Labels(args) => Target::new(endpoints::clan_labels(&page(args))?),
        Command::Goldpass => Target::new(endpoints::current_goldpass()),
    };
    Ok(target)
}
