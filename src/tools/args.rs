//! Tool argument schemas
//!
//! One struct per tool. The JSON schemas advertised by `tools/list` are
//! generated from these types, and every invocation is decoded into them
//! before a handler runs, so a call that does not fit never reaches the
//! platform.

use crate::client::types::{SearchMode, TrendCategory, TweetType};
use crate::error::AppError;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

pub const TWEET_MAX_GRAPHEMES: usize = 280;
pub const DM_MAX_GRAPHEMES: usize = 10_000;
pub const POLL_CHOICE_MAX_GRAPHEMES: usize = 25;
pub const POLL_MIN_MINUTES: i64 = 5;
pub const POLL_MAX_MINUTES: i64 = 10_080;
pub const POLL_DEFAULT_MINUTES: i64 = 1_440;

/// Inclusive clamp range and default for a `count` argument
#[derive(Debug, Clone, Copy)]
pub struct CountLimit {
    pub default: u32,
    pub max: u32,
}

pub const SEARCH_COUNT: CountLimit = CountLimit { default: 10, max: 20 };
pub const RETWEETERS_COUNT: CountLimit = CountLimit { default: 20, max: 40 };
pub const USER_TWEETS_COUNT: CountLimit = CountLimit { default: 20, max: 100 };
pub const GRAPH_COUNT: CountLimit = CountLimit { default: 20, max: 50 };

/// Decode tool arguments; a missing argument object counts as `{}`
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, AppError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| AppError::invalid(format!("Invalid arguments: {}", e)))
}

/// Trim, NFC-normalize and cap text at `max` grapheme clusters
pub fn clean_text(text: &str, field: &str, max: usize) -> Result<String, AppError> {
    let normalized: String = text.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(AppError::invalid(format!("{} must not be empty", field)));
    }
    let graphemes = normalized.graphemes(true).count();
    if graphemes <= max {
        return Ok(normalized);
    }
    debug!("Truncating {} from {} to {} graphemes", field, graphemes, max);
    Ok(normalized.graphemes(true).take(max).collect())
}

/// Platform ids are decimal strings
pub fn require_id(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid(format!(
            "{} must be a numeric id, got {:?}",
            field, value
        )));
    }
    Ok(value.to_string())
}

pub fn require_ids(values: &[String], field: &str) -> Result<Vec<String>, AppError> {
    values.iter().map(|v| require_id(v, field)).collect()
}

/// Screen names are matched without the leading `@`
pub fn clean_screen_name(value: &str) -> Result<String, AppError> {
    let name = value.trim().trim_start_matches('@');
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::invalid(format!("Invalid screen_name: {:?}", value)));
    }
    Ok(name.to_string())
}

pub fn clamp_count(count: Option<i64>, limit: CountLimit) -> u32 {
    match count {
        None => limit.default,
        Some(n) => n.clamp(1, limit.max as i64) as u32,
    }
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct PostTweetArgs {
    #[schemars(description = "Tweet text (up to 280 characters)")]
    pub text: String,
}

/// Arguments of every tool that acts on a single tweet
#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct TweetIdArgs {
    #[schemars(description = "Numeric tweet id")]
    pub tweet_id: String,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct PollTweetArgs {
    #[schemars(description = "Tweet text")]
    pub text: String,
    #[schemars(description = "Poll choices (2 to 4, up to 25 characters each)")]
    pub choices: Vec<String>,
    #[schemars(description = "Poll duration in minutes (5 to 10080, default 1440)")]
    pub duration_minutes: Option<i64>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScheduledTweetArgs {
    #[schemars(description = "Tweet text")]
    pub text: String,
    #[schemars(description = "Publication time as a unix timestamp in seconds; must be in the future")]
    pub scheduled_at: i64,
    #[schemars(description = "Ids of already uploaded media to attach")]
    #[serde(default)]
    pub media_ids: Vec<String>,
}

/// Tools without arguments
#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct SearchTweetsArgs {
    #[schemars(description = "Search query, using the platform's search syntax")]
    pub query: String,
    #[schemars(description = "Result ordering: Latest (default), Top, People, Photos or Videos")]
    #[serde(default)]
    pub mode: SearchMode,
    #[schemars(description = "Number of results (1 to 20, default 10)")]
    pub count: Option<i64>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct RetweetersArgs {
    #[schemars(description = "Numeric tweet id")]
    pub tweet_id: String,
    #[schemars(description = "Number of users (1 to 40, default 20)")]
    pub count: Option<i64>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScreenNameArgs {
    #[schemars(description = "Screen name, with or without the leading @")]
    pub screen_name: String,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct UserIdArgs {
    #[schemars(description = "Numeric user id")]
    pub user_id: String,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct UserTweetsArgs {
    #[schemars(description = "Numeric user id")]
    pub user_id: String,
    #[schemars(description = "Timeline to read: Tweets (default), Replies, Media or Likes")]
    #[serde(default)]
    pub tweet_type: TweetType,
    #[schemars(description = "Number of tweets (1 to 100, default 20)")]
    pub count: Option<i64>,
}

/// `get_user_media` and `get_user_likes`
#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct UserTimelineArgs {
    #[schemars(description = "Numeric user id")]
    pub user_id: String,
    #[schemars(description = "Number of tweets (1 to 100, default 20)")]
    pub count: Option<i64>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct UserTargetArgs {
    #[schemars(description = "Numeric user id (give this or screen_name)")]
    pub user_id: Option<String>,
    #[schemars(description = "Screen name (give this or user_id)")]
    pub screen_name: Option<String>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct GraphArgs {
    #[schemars(description = "Numeric user id")]
    pub user_id: String,
    #[schemars(description = "Number of users (1 to 50, default 20)")]
    pub count: Option<i64>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct SendDmArgs {
    #[schemars(description = "Numeric id of the recipient")]
    pub user_id: String,
    #[schemars(description = "Message text")]
    pub text: String,
    #[schemars(description = "Id of an already uploaded media item to attach")]
    pub media_id: Option<String>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct DmHistoryArgs {
    #[schemars(description = "Numeric id of the other participant")]
    pub user_id: String,
    #[schemars(description = "Only return messages older than this message id")]
    pub max_id: Option<String>,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct DmIdArgs {
    #[schemars(description = "Numeric message id")]
    pub message_id: String,
}

#[derive(JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct TrendsArgs {
    #[schemars(description = "Trend tab: trending (default), for-you, news, sports or entertainment")]
    #[serde(default)]
    pub category: TrendCategory,
}
