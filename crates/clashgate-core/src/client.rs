//! Async client: one logical call per method, retries sleep on the injected timer.

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
use crate::http_client::{HttpClient, HttpMethod, ReqwestHttpClient};
use crate::sleep::{AsyncSleep, TokioSleep};

/// Builder for [`Client`] with injectable transport, sleeper and cache.
pub struct ClientBuilder {
    config: ClientConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    sleeper: Option<Arc<dyn AsyncSleep>>,
    cache: Option<Arc<TtlCache<JsonObject>>>,
}

impl ClientBuilder {
    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn AsyncSleep>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Use a caller-owned cache, e.g. one shared with another client.
    pub fn cache(mut self, cache: Arc<TtlCache<JsonObject>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let http_client: Arc<dyn HttpClient> = match self.http_client {
            Some(http_client) => http_client,
            None => Arc::new(ReqwestHttpClient::new(self.config.timeout)?),
        };
        let engine = match self.cache {
            Some(cache) => Engine::with_cache(&self.config, cache),
            None => Engine::new(&self.config),
        };

        Ok(Client {
            engine: Arc::new(engine),
            http_client,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleep)),
        })
    }
}

/// Async API client. Cheap to clone; clones share transport and cache.
#[derive(Clone)]
pub struct Client {
    engine: Arc<Engine>,
    http_client: Arc<dyn HttpClient>,
    sleeper: Arc<dyn AsyncSleep>,
}

impl Client {
    /// Client with the default reqwest transport and tokio timer.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
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

    /// Release the transport. Dropping the last clone has the same effect.
    pub fn close(self) {
        drop(self);
    }

    /// Run one logical request with retries, returning the decoded object.
    pub async fn execute(
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
            let outcome = self.http_client.execute(request).await;
            match self.engine.advance(&mut call, outcome) {
                Step::Done(object) => return Ok(object),
                Step::Retry(delay) => self.sleeper.sleep(delay).await,
                Step::Fail(error) => return Err(error),
            }
        }
    }

    /// Execute `route` and validate the payload into its record type.
    pub async fn fetch<R: DeserializeOwned>(&self, route: Route<R>) -> Result<R, ClientError> {
        let payload = self
            .execute(route.method, &route.path, Some(route.params))
            .await?;
        Ok(domain::validate(payload)?)
    }

    pub async fn clan(&self, tag: &str) -> Result<Clan, ClientError> {
        self.fetch(endpoints::clan(tag)?).await
    }

    pub async fn clan_members(
        &self,
        tag: &str,
        page: &PageRequest,
    ) -> Result<ClanMembersPage, ClientError> {
        self.fetch(endpoints::clan_members(tag, page)?).await
    }

    pub async fn player(&self, tag: &str) -> Result<Player, ClientError> {
        self.fetch(endpoints::player(tag)?).await
    }

    pub async fn current_war(&self, clan_tag: &str) -> Result<CurrentWar, ClientError> {
        self.fetch(endpoints::current_war(clan_tag)?).await
    }

    pub async fn capital_raids(
        &self,
        clan_tag: &str,
        page: &PageRequest,
    ) -> Result<RaidSeasonsPage, ClientError> {
        self.fetch(endpoints::capital_raids(clan_tag, page)?).await
    }

    pub async fn cwl_group(&self, clan_tag: &str) -> Result<CwlGroup, ClientError> {
        self.fetch(endpoints::cwl_group(clan_tag)?).await
    }

    pub async fn clan_warlog(
        &self,
        tag: &str,
        page: &PageRequest,
    ) -> Result<WarLogPage, ClientError> {
        self.fetch(endpoints::clan_warlog(tag, page)?).await
    }

    pub async fn cwl_leagues(&self, page: &PageRequest) -> Result<LeaguesPage, ClientError> {
        self.fetch(endpoints::cwl_leagues(page)?).await
    }

    pub async fn cwl_war(&self, war_tag: &str) -> Result<CwlWar, ClientError> {
        self.fetch(endpoints::cwl_war(war_tag)?).await
    }

    pub async fn locations(&self, page: &PageRequest) -> Result<LocationsPage, ClientError> {
        self.fetch(endpoints::locations(page)?).await
    }

    pub async fn location_clan_rankings(
        &self,
        location_id: impl Display,
        page: &PageRequest,
    ) -> Result<ClanRankingsPage, ClientError> {
        self.fetch(endpoints::location_clan_rankings(location_id, page)?)
            .await
    }

    pub async fn location_player_rankings(
        &self,
        location_id: impl Display,
        page: &PageRequest,
    ) -> Result<PlayerRankingsPage, ClientError> {
        self.fetch(endpoints::location_player_rankings(location_id, page)?)
            .await
    }

    pub async fn location_capital_rankings(
        &self,
        location_id: impl Display,
        page: &PageRequest,
    ) -> Result<CapitalRankingsPage, ClientError> {
        self.fetch(endpoints::location_capital_rankings(location_id, page)?)
            .await
    }

    pub async fn leagues(&self, page: &PageRequest) -> Result<LeaguesPage, ClientError> {
        self.fetch(endpoints::leagues(page)?).await
    }

    pub async fn league_seasons(
        &self,
        league_id: impl Display,
        page: &PageRequest,
    ) -> Result<LeagueSeasonsPage, ClientError> {
        self.fetch(endpoints::league_seasons(league_id, page)?).await
    }

    pub async fn league_season(
        &self,
        league_id: impl Display,
        season_id: &str,
        page: &PageRequest,
    ) -> Result<LeagueSeasonRankingsPage, ClientError> {
        self.fetch(endpoints::league_season(league_id, season_id, page)?)
            .await
    }

    pub async fn clan_labels(&self, page: &PageRequest) -> Result<LabelsPage, ClientError> {
        self.fetch(endpoints::clan_labels(page)?).await
    }

    pub async fn current_goldpass(&self) -> Result<GoldPassSeason, ClientError> {
        self.fetch(endpoints::current_goldpass()).await
    }
}
