//! In-memory `XApi` for tests: records every call and replays scripted results

use crate::auth::SessionBundle;
use crate::client::types::{
    DirectMessage, ScheduledTweet, SearchMode, Timeline, Trend, TrendCategory, Tweet, TweetDraft,
    TweetType, User,
};
use crate::client::{Connector, XApi};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, AppError>>,
    probe_result: Mutex<Option<Result<String, AppError>>>,
    search_result: Mutex<Timeline>,
    users: Mutex<HashMap<String, User>>,
    drafts: Mutex<Vec<TweetDraft>>,
}

pub fn sample_user(id: &str, screen_name: &str) -> User {
    User {
        id: id.to_string(),
        name: screen_name.to_uppercase(),
        screen_name: screen_name.to_string(),
        description: None,
        profile_image_url: None,
        followers_count: 1,
        following_count: 2,
        statuses_count: 3,
        created_at: None,
        verified: false,
        location: None,
        url: None,
        protected: false,
    }
}

pub fn sample_tweet(id: &str, text: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        text: text.to_string(),
        created_at: Some("2024-06-04T12:00:00+00:00".to_string()),
        favorite_count: 0,
        retweet_count: 0,
        reply_count: 0,
        quote_count: 0,
        view_count: None,
        is_quote_status: false,
        lang: Some("en".to_string()),
        user: None,
        media: Vec::new(),
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `method` fail with `error`
    pub fn fail(self, method: &'static str, error: AppError) -> Self {
        self.failures.lock().unwrap().insert(method, error);
        self
    }

    pub fn with_probe(self, result: Result<String, AppError>) -> Self {
        *self.probe_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_search(self, timeline: Timeline) -> Self {
        *self.search_result.lock().unwrap() = timeline;
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().insert(user.screen_name.clone(), user);
        self
    }

    /// Recorded calls as `method(args)`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn drafts(&self) -> Vec<TweetDraft> {
        self.drafts.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, args: String) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(format!("{}({})", method, args));
        match self.failures.lock().unwrap().get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl XApi for MockApi {
    async fn probe(&self) -> Result<String, AppError> {
        self.record("probe", String::new())?;
        self.probe_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok("mock_user".to_string()))
    }

    async fn create_tweet(&self, draft: &TweetDraft) -> Result<String, AppError> {
        self.record("create_tweet", draft.text.clone())?;
        self.drafts.lock().unwrap().push(draft.clone());
        Ok("1001".to_string())
    }

    async fn delete_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.record("delete_tweet", tweet_id.to_string())
    }

    async fn create_poll(&self, choices: &[String], duration_minutes: u32) -> Result<String, AppError> {
        self.record("create_poll", format!("{}, {}", choices.join("|"), duration_minutes))?;
        Ok("card://poll".to_string())
    }

    async fn create_scheduled_tweet(
        &self,
        text: &str,
        execute_at: i64,
        media_ids: &[String],
    ) -> Result<String, AppError> {
        self.record(
            "create_scheduled_tweet",
            format!("{}, {}, [{}]", text, execute_at, media_ids.join(",")),
        )?;
        Ok("2002".to_string())
    }

    async fn scheduled_tweets(&self) -> Result<Vec<ScheduledTweet>, AppError> {
        self.record("scheduled_tweets", String::new())?;
        Ok(vec![ScheduledTweet {
            id: "2002".to_string(),
            text: "later".to_string(),
            scheduled_at: Some(1_900_000_000),
            media_ids: Vec::new(),
        }])
    }

    async fn search_tweets(&self, query: &str, mode: SearchMode, count: u32) -> Result<Timeline, AppError> {
        self.record("search_tweets", format!("{}, {}, {}", query, mode.as_str(), count))?;
        Ok(self.search_result.lock().unwrap().clone())
    }

    async fn tweet_by_id(&self, tweet_id: &str) -> Result<Tweet, AppError> {
        self.record("tweet_by_id", tweet_id.to_string())?;
        Ok(sample_tweet(tweet_id, "fetched"))
    }

    async fn favorite_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.record("favorite_tweet", tweet_id.to_string())
    }

    async fn unfavorite_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.record("unfavorite_tweet", tweet_id.to_string())
    }

    async fn retweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.record("retweet", tweet_id.to_string())
    }

    async fn delete_retweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.record("delete_retweet", tweet_id.to_string())
    }

    async fn retweeters(&self, tweet_id: &str, count: u32) -> Result<Timeline, AppError> {
        self.record("retweeters", format!("{}, {}", tweet_id, count))?;
        Ok(Timeline {
            users: vec![sample_user("5", "fan")],
            ..Default::default()
        })
    }

    async fn user_by_screen_name(&self, screen_name: &str) -> Result<User, AppError> {
        self.record("user_by_screen_name", screen_name.to_string())?;
        self.users
            .lock()
            .unwrap()
            .get(screen_name)
            .cloned()
            .ok_or_else(|| AppError::remote(format!("user @{} not found", screen_name)))
    }

    async fn user_by_id(&self, user_id: &str) -> Result<User, AppError> {
        self.record("user_by_id", user_id.to_string())?;
        Ok(sample_user(user_id, "someone"))
    }

    async fn user_tweets(&self, user_id: &str, tweet_type: TweetType, count: u32) -> Result<Timeline, AppError> {
        self.record("user_tweets", format!("{}, {}, {}", user_id, tweet_type.as_str(), count))?;
        Ok(Timeline {
            tweets: vec![sample_tweet("10", "mine")],
            ..Default::default()
        })
    }

    async fn follow_user(&self, user_id: &str) -> Result<User, AppError> {
        self.record("follow_user", user_id.to_string())?;
        Ok(sample_user(user_id, "followed"))
    }

    async fn unfollow_user(&self, user_id: &str) -> Result<User, AppError> {
        self.record("unfollow_user", user_id.to_string())?;
        Ok(sample_user(user_id, "unfollowed"))
    }

    async fn followers(&self, user_id: &str, count: u32) -> Result<Timeline, AppError> {
        self.record("followers", format!("{}, {}", user_id, count))?;
        Ok(Timeline::default())
    }

    async fn following(&self, user_id: &str, count: u32) -> Result<Timeline, AppError> {
        self.record("following", format!("{}, {}", user_id, count))?;
        Ok(Timeline::default())
    }

    async fn send_dm(&self, user_id: &str, text: &str, media_id: Option<&str>) -> Result<DirectMessage, AppError> {
        self.record("send_dm", format!("{}, {}, {:?}", user_id, text, media_id))?;
        Ok(DirectMessage {
            id: "m1".to_string(),
            text: text.to_string(),
            time: None,
            sender_id: Some("1".to_string()),
            recipient_id: Some(user_id.to_string()),
            attachment: None,
        })
    }

    async fn dm_history(&self, user_id: &str, max_id: Option<&str>) -> Result<Vec<DirectMessage>, AppError> {
        self.record("dm_history", format!("{}, {:?}", user_id, max_id))?;
        Ok(Vec::new())
    }

    async fn delete_dm(&self, message_id: &str) -> Result<(), AppError> {
        self.record("delete_dm", message_id.to_string())
    }

    async fn trends(&self, category: TrendCategory) -> Result<Vec<Trend>, AppError> {
        self.record("trends", category.as_str().to_string())?;
        Ok(vec![Trend {
            name: "#Rust".to_string(),
            tweets_count: Some("12K posts".to_string()),
            domain_context: None,
        }])
    }
}

/// Hands out the shared `MockApi` for accepted bundles
pub struct MockConnector {
    pub api: Arc<MockApi>,
    accepted_tokens: Option<Vec<String>>,
}

impl MockConnector {
    pub fn new(api: MockApi) -> Self {
        Self {
            api: Arc::new(api),
            accepted_tokens: None,
        }
    }

    /// Bundles with any other auth_token get an adapter whose probe fails
    pub fn accepting(mut self, tokens: &[&str]) -> Self {
        self.accepted_tokens = Some(tokens.iter().map(|t| t.to_string()).collect());
        self
    }
}

impl Connector for MockConnector {
    fn connect(&self, bundle: &SessionBundle) -> Result<Arc<dyn XApi>, AppError> {
        let token = bundle.cookies.get("auth_token").cloned().unwrap_or_default();
        match &self.accepted_tokens {
            Some(tokens) if !tokens.contains(&token) => Ok(Arc::new(MockApi::new().with_probe(Err(
                AppError::AuthenticationFailure("session rejected".to_string()),
            )))),
            _ => Ok(self.api.clone()),
        }
    }
}
