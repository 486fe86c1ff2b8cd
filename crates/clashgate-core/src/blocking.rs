//! Blocking client: same engine, retries park the calling thread.

use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::cache::TtlCache;
use crate::config::ClientConfig;
use crate::domain::{
    self, CapitalRankingsPage, Clan, ClanMembersPage, ClanRankingsPage, CurrentWar, CwlGroup,
    CwlWar, GoldPassSeason, LabelsPage, LeagueSeasonRankingsPage, LeagueSeasonsPage, LeaguesPage,
    LocationsPage, PageRequest, Player, PlayerRankingsPage, RaidSeasonsPage, WarLogPage,
};
use crate::endpoints::{self, Route};
use crate::engine::{Begin, Engine, JsonObject, Params, Step};
use crate::error::{ApiError, ClientError};
use crate::http_client::{BlockingHttpClient, HttpMethod, ReqwestBlockingHttpClient};
use crate::sleep::{Sleep, ThreadSleep};

pub struct BlockingClientBuilder {
    config: ClientConfig,
    http_client: Option<Arc<dyn BlockingHttpClient>>,
    sleeper: Option<Arc<dyn Sleep>>,
    cache: Option<Arc<TtlCache<JsonObject>>>,
}

impl BlockingClientBuilder {
    pub fn http_client(mut self, http_client: Arc<dyn BlockingHttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleep>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn cache(mut self, cache: Arc<TtlCache<JsonObject>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<BlockingClient, ClientError> {
        let http_client: Arc<dyn BlockingHttpClient> = match self.http_client {
            Some(http_client) => http_client,
            None => Arc::new(ReqwestBlockingHttpClient::new(self.config.timeout)?),
        };
        let engine = match self.cache {
            Some(cache) => Engine::with_cache(&self.config, cache),
            None => Engine::new(&self.config),
        };

        Ok(BlockingClient {
            engine: Arc::new(engine),
            http_client,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(ThreadSleep)),
        })
    }
}

/// Blocking API client. Safe to share across threads.
#[derive(Clone)]
pub struct BlockingClient {
    engine: Arc<Engine>,
    http_client: Arc<dyn BlockingHttpClient>,
    sleeper: Arc<dyn Sleep>,
}

impl BlockingClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> BlockingClientBuilder {
        BlockingClientBuilder {
            config,
            http_client: None,
            sleeper: None,
            cache: None,
        }
    }

    pub fn cache(&self) -> &TtlCache<JsonObject> {
        self.engine.cache()
    }

    pub fn base_url(&self) -> &str {
        self.engine.base_url()
    }

    pub fn close(self) {
        drop(self);
    }

    pub fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<Params>,
    ) -> Result<JsonObject, ApiError> {
        let mut call = match self.engine.begin(method, path, params) {
            Begin::Cached(object) => return Ok(object),
            Begin::Network(call) => call,
        };

        loop {
            let request = self.engine.request(&call);
            let outcome = self.http_client.execute(request);
            match self.engine.advance(&mut call, outcome) {
                Step::Done(object) => return Ok(object),
                Step::Retry(delay) => self.sleeper.sleep(delay),
                Step::Fail(error) => return Err(error),
            }
        }
    }

    pub fn fetch<R: DeserializeOwned>(&self, route: Route<R>) -> Result<R, ClientError> {
        let payload = self.execute(route.method, &route.path, Some(route.params))?;
        Ok(domain::validate(payload)?)
    }

    pub fn clan(&self, tag: &str) -> Result<Clan, ClientError> {
        self.fetch(endpoints::clan(tag)?)
    }

    pub fn clan_members(
        &self,
        tag: &str,
        page: &PageRequest,
    ) -> Result<ClanMembersPage, ClientError> {
        self.fetch(endpoints::clan_members(tag, page)?)
    }

    pub fn player(&self, tag: &str) -> Result<Player, ClientError> {
        self.fetch(endpoints::player(tag)?)
    }

    pub fn current_war(&self, clan_tag: &str) -> Result<CurrentWar, ClientError> {
        self.fetch(endpoints::current_war(clan_tag)?)
    }

    pub fn capital_raids(
        &self,
        clan_tag: &str,
        page: &PageRequest,
    ) -> Result<RaidSeasonsPage, ClientError> {
        self.fetch(endpoints::capital_raids(clan_tag, page)?)
    }

    pub fn cwl_group(&self, clan_tag: &str) -> Result<CwlGroup, ClientError> {
        self.fetch(endpoints::cwl_group(clan_tag)?)
    }

    pub fn clan_warlog(&self, tag: &str, page: &PageRequest) -> Result<WarLogPage, ClientError> {
        self.fetch(endpoints::clan_warlog(tag, page)?)
    }

    pub fn cwl_leagues(&self, page: &PageRequest) -> Result<LeaguesPage, ClientError> {
        self.fetch(endpoints::cwl_leagues(page)?)
    }

    pub fn cwl_war(&self, war_tag: &str) -> Result<CwlWar, ClientError> {
        self.fetch(endpoints::cwl_war(war_tag)?)
    }

    pub fn locations(&self, page: &PageRequest) -> Result<LocationsPage, ClientError> {
        self.fetch(endpoints::locations(page)?)
    }

    pub fn location_clan_rankings(
        &self,
        location_id: impl Display,
        page: &PageRequest,
    ) -> Result<ClanRankingsPage, ClientError> {
        self.fetch(endpoints::location_clan_rankings(location_id, page)?)
    }

    pub fn location_player_rankings(
        &self,
        location_id: impl Display,
        page: &PageRequest,
    ) -> Result<PlayerRankingsPage, ClientError> {
        self.fetch(endpoints::location_player_rankings(location_id, page)?)
    }

    pub fn location_capital_rankings(
        &self,
        location_id: impl Display,
        page: &PageRequest,
    ) -> Result<CapitalRankingsPage, ClientError> {
        self.fetch(endpoints::location_capital_rankings(location_id, page)?)
    }

    pub fn leagues(&self, page: &PageRequest) -> Result<LeaguesPage, ClientError> {
        self.fetch(endpoints::leagues(page)?)
    }

    pub fn league_seasons(
        &self,
        league_id: impl Display,
        page: &PageRequest,
    ) -> Result<LeagueSeasonsPage, ClientError> {
        self.fetch(endpoints::league_seasons(league_id, page)?)
    }

    pub fn league_season(
        &self,
        league_id: impl Display,
        season_id: &str,
        page: &PageRequest,
    ) -> Result<LeagueSeasonRankingsPage, ClientError> {
        self.fetch(endpoints::league_season(league_id, season_id, page)?)
    }

    pub fn clan_labels(&self, page: &PageRequest) -> Result<LabelsPage, ClientError> {
        self.fetch(endpoints::clan_labels(page)?)
    }

    pub fn current_goldpass(&self) -> Result<GoldPassSeason, ClientError> {
        self.fetch(endpoints::current_goldpass())
    }
}
