//! Records returned by the platform adapter, shaped for tool payloads

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search result ordering/filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum SearchMode {
    #[default]
    Latest,
    Top,
    People,
    Photos,
    Videos,
}

impl SearchMode {
    /// Value of the `product` variable of the search timeline
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Latest => "Latest",
            SearchMode::Top => "Top",
            SearchMode::People => "People",
            SearchMode::Photos => "Photos",
            SearchMode::Videos => "Videos",
        }
    }
}

/// Which of a user's timelines to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TweetType {
    #[default]
    Tweets,
    Replies,
    Media,
    Likes,
}

impl TweetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TweetType::Tweets => "Tweets",
            TweetType::Replies => "Replies",
            TweetType::Media => "Media",
            TweetType::Likes => "Likes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TrendCategory {
    #[default]
    Trending,
    ForYou,
    News,
    Sports,
    Entertainment,
}

impl TrendCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendCategory::Trending => "trending",
            TrendCategory::ForYou => "for-you",
            TrendCategory::News => "news",
            TrendCategory::Sports => "sports",
            TrendCategory::Entertainment => "entertainment",
        }
    }
}

/// A new tweet as handed to the platform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetDraft {
    pub text: String,
    pub card_uri: Option<String>,
    pub media_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetAuthor {
    pub id: String,
    pub name: String,
    pub screen_name: String,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: Option<String>,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub reply_count: u64,
    pub quote_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    pub is_quote_status: bool,
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<TweetAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub screen_name: String,
    pub description: Option<String>,
    pub profile_image_url: Option<String>,
    pub followers_count: u64,
    pub following_count: u64,
    pub statuses_count: u64,
    pub created_at: Option<String>,
    pub verified: bool,
    pub location: Option<String>,
    pub url: Option<String>,
    pub protected: bool,
}

/// One page of a timeline: tweets and/or users plus the next-page cursor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub tweets: Vec<Tweet>,
    pub users: Vec<User>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledTweet {
    pub id: String,
    pub text: String,
    /// Unix seconds
    pub scheduled_at: Option<i64>,
    pub media_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectMessage {
    pub id: String,
    pub text: String,
    pub time: Option<String>,
    pub sender_id: Option<String>,
    pub recipient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub name: String,
    pub tweets_count: Option<String>,
    pub domain_context: Option<String>,
}
