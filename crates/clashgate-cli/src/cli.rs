//! CLI argument definitions for clashgate.
//!
//! Every command maps onto one read endpoint. The API token and client
//! defaults come from `COC_*` environment variables; the global flags below
//! override them per invocation.
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--locale` | `BOT_LOCALE` or `ru` | Language for error messages |
//! | `--max-retries` | `3` | Engine retry budget per request |
//! | `--timeout-secs` | `10` | Per-attempt timeout |
//! | `--base-url` | official API | Alternate API root (e.g. a proxy) |
//! | `--no-cache` | `false` | Disable the response cache |
//! | `--blocking` | `false` | Use the blocking client |
//! | `--rate-limit-retries` | `1` | Re-invocations after a rate limit |
//! | `--rate-limit-wait` | `15` | Longest `Retry-After` worth waiting for |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! clashgate player '#2PP' --pretty
//! clashgate members '#2PP' --limit 10
//! clashgate rankings 32000007 --kind capital --locale en
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "clashgate",
    author,
    version,
    about = "Resilient Clash of Clans API client",
    long_about = "Query the Clash of Clans API with retries, caching and readable errors.\n\
\n\
The API token is read from COC_API_TOKEN."
)]
pub struct Cli {
    /// Language for error messages (en, ru).
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Retries per request for transport errors, 429 and 5xx.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Per-attempt timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<f64>,

    /// API root, e.g. a proxy in front of the official API.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Disable the in-memory response cache.
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    /// Use the blocking client instead of the async one.
    #[arg(long, global = true, default_value_t = false)]
    pub blocking: bool,

    /// Times a rate-limited command is re-run after waiting.
    #[arg(long, global = true, default_value_t = 1)]
    pub rate_limit_retries: u32,

    /// Longest Retry-After, in seconds, worth waiting for.
    #[arg(long, global = true, default_value_t = 15.0)]
    pub rate_limit_wait: f64,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Clan profile.
    ///
    ///   clashgate clan '#2PP'
    Clan(TagArgs),

    /// Clan member list.
    Members(PagedTagArgs),

    /// Player profile.
    Player(TagArgs),

    /// Current war of a clan.
    War(TagArgs),

    /// Capital raid seasons of a clan.
    Raids(PagedTagArgs),

    /// War log of a clan.
    Warlog(PagedTagArgs),

    /// Current war league group of a clan.
    CwlGroup(TagArgs),

    /// A single war league war by war tag.
    CwlWar(TagArgs),

    /// War leagues.
    CwlLeagues(PageArgs),

    /// Locations.
    Locations(PageArgs),

    /// Rankings for a location.
    ///
    ///   clashgate rankings 32000007 --kind players --limit 5
    Rankings(RankingsArgs),

    /// Leagues.
    Leagues(PageArgs),

    /// Seasons of a league.
    LeagueSeasons(LeagueArgs),

    /// Player rankings for one league season.
    LeagueSeason(LeagueSeasonArgs),

    /// Clan labels.
    Labels(PageArgs),

    /// Current gold pass season.
    Goldpass,
}

/// Cursor pagination flags shared by list commands.
#[derive(Debug, Clone, Default, Args)]
pub struct PageArgs {
    /// Maximum number of items to return.
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Cursor from a previous page's `paging.cursors.after`.
    #[arg(long)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TagArgs {
    /// Tag with or without the leading '#'.
    pub tag: String,
}

#[derive(Debug, Clone, Args)]
pub struct PagedTagArgs {
    /// Clan tag with or without the leading '#'.
    pub tag: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankingKind {
    Clans,
    Players,
    Capital,
}

#[derive(Debug, Clone, Args)]
pub struct RankingsArgs {
    /// Location id, e.g. 32000007.
    pub location_id: String,

    #[arg(long, value_enum, default_value_t = RankingKind::Clans)]
    pub kind: RankingKind,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, Args)]
pub struct LeagueArgs {
    pub league_id: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, Args)]
pub struct LeagueSeasonArgs {
    pub league_id: String,

    /// Season id such as 2024-01.
    pub season_id: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "clashgate",
            "members",
            "#2PP",
            "--limit",
            "5",
            "--locale",
            "en",
            "--no-cache",
        ])
        .expect("valid args");

        assert_eq!(cli.locale.as_deref(), Some("en"));
        assert!(cli.no_cache);
        match cli.command {
            Command::Members(args) => {
                assert_eq!(args.tag, "#2PP");
                assert_eq!(args.page.limit, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rankings_kind_defaults_to_clans() {
        let cli = Cli::try_parse_from(["clashgate", "rankings", "32000007"]).expect("valid args");
        match cli.command {
            Command::Rankings(args) => assert_eq!(args.kind, RankingKind::Clans),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.rate_limit_retries, 1);
    }
}
