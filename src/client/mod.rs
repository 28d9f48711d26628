//! Client Adapter: the platform capabilities the tools forward to
//!
//! `XApi` is the seam between tool dispatch and the network. `WebClient` is the
//! production implementation; tests substitute `mock::MockApi`.

pub mod endpoints;
pub mod headers;
pub mod parse;
pub mod types;
pub mod web;

#[cfg(test)]
pub mod mock;

use crate::auth::SessionBundle;
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

pub use types::{
    DirectMessage, ScheduledTweet, SearchMode, Timeline, Trend, TrendCategory, Tweet, TweetDraft,
    TweetType, User,
};
pub use web::WebConnector;

/// One method per platform capability
#[async_trait]
pub trait XApi: Send + Sync {
    /// Cheap authenticated call; returns the viewer's screen name
    async fn probe(&self) -> Result<String, AppError>;

    /// Returns the new tweet's id
    async fn create_tweet(&self, draft: &TweetDraft) -> Result<String, AppError>;
    async fn delete_tweet(&self, tweet_id: &str) -> Result<(), AppError>;
    /// Returns the card uri to attach to a tweet
    async fn create_poll(&self, choices: &[String], duration_minutes: u32) -> Result<String, AppError>;
    /// Returns the scheduled tweet's id
    async fn create_scheduled_tweet(
        &self,
        text: &str,
        execute_at: i64,
        media_ids: &[String],
    ) -> Result<String, AppError>;
    async fn scheduled_tweets(&self) -> Result<Vec<ScheduledTweet>, AppError>;

    async fn search_tweets(&self, query: &str, mode: SearchMode, count: u32) -> Result<Timeline, AppError>;
    async fn tweet_by_id(&self, tweet_id: &str) -> Result<Tweet, AppError>;
    async fn favorite_tweet(&self, tweet_id: &str) -> Result<(), AppError>;
    async fn unfavorite_tweet(&self, tweet_id: &str) -> Result<(), AppError>;
    async fn retweet(&self, tweet_id: &str) -> Result<(), AppError>;
    async fn delete_retweet(&self, tweet_id: &str) -> Result<(), AppError>;
    async fn retweeters(&self, tweet_id: &str, count: u32) -> Result<Timeline, AppError>;

    async fn user_by_screen_name(&self, screen_name: &str) -> Result<User, AppError>;
    async fn user_by_id(&self, user_id: &str) -> Result<User, AppError>;
    async fn user_tweets(&self, user_id: &str, tweet_type: TweetType, count: u32) -> Result<Timeline, AppError>;

    async fn follow_user(&self, user_id: &str) -> Result<User, AppError>;
    async fn unfollow_user(&self, user_id: &str) -> Result<User, AppError>;
    async fn followers(&self, user_id: &str, count: u32) -> Result<Timeline, AppError>;
    async fn following(&self, user_id: &str, count: u32) -> Result<Timeline, AppError>;

    async fn send_dm(&self, user_id: &str, text: &str, media_id: Option<&str>) -> Result<DirectMessage, AppError>;
    async fn dm_history(&self, user_id: &str, max_id: Option<&str>) -> Result<Vec<DirectMessage>, AppError>;
    async fn delete_dm(&self, message_id: &str) -> Result<(), AppError>;

    async fn trends(&self, category: TrendCategory) -> Result<Vec<Trend>, AppError>;
}

/// Builds an adapter around a session bundle
pub trait Connector {
    fn connect(&self, bundle: &SessionBundle) -> Result<Arc<dyn XApi>, AppError>;
}
