//! reqwest-backed `XApi` over the x.com web endpoints

use crate::auth::SessionBundle;
use crate::client::endpoints::{self, tweet_features, user_features, Endpoints};
use crate::client::headers::{merge_headers, session_headers, to_header_map, HeaderPairs};
use crate::client::parse;
use crate::client::types::{
    DirectMessage, ScheduledTweet, SearchMode, Timeline, Trend, TrendCategory, Tweet, TweetDraft,
    TweetType, User,
};
use crate::client::{Connector, XApi};
use crate::error::AppError;
use crate::http::{build_client, REQUEST_TIMEOUT};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

enum Payload {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

pub struct WebClient {
    http: reqwest::Client,
    injected: HeaderPairs,
    endpoints: Endpoints,
    viewer_id: OnceCell<String>,
}

impl WebClient {
    pub fn new(http: reqwest::Client, bundle: &SessionBundle, language: &str, endpoints: Endpoints) -> Self {
        let viewer_id = match bundle.viewer_id() {
            Some(id) => OnceCell::new_with(Some(id)),
            None => OnceCell::new(),
        };
        Self {
            http,
            injected: session_headers(bundle, language),
            endpoints,
            viewer_id,
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        payload: Payload,
    ) -> Result<Value, AppError> {
        let mut caller: HeaderPairs = Vec::new();
        let body = match payload {
            Payload::Empty => None,
            Payload::Json(value) => Some(serde_json::to_string(&value)?),
            Payload::Form(fields) => {
                caller.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
                let mut serializer = url::form_urlencoded::Serializer::new(String::new());
                for (name, value) in &fields {
                    serializer.append_pair(name, value);
                }
                Some(serializer.finish())
            }
        };

        let headers = to_header_map(&merge_headers(&self.injected, &caller));
        let mut request = self.http.request(method.clone(), url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        debug!("{} {}", method, url);
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("{} {} -> {}", method, url, status);
        parse::classify_response(status, &text)
    }

    async fn gql_get(&self, operation: &str, variables: Value, features: Value) -> Result<Value, AppError> {
        let query = [
            ("variables", variables.to_string()),
            ("features", features.to_string()),
        ];
        self.send(Method::GET, &self.endpoints.graphql(operation), &query, Payload::Empty)
            .await
    }

    async fn gql_post(&self, operation: &str, variables: Value, features: Option<Value>) -> Result<Value, AppError> {
        let query_id = operation.split('/').next().unwrap_or_default();
        let mut body = json!({ "variables": variables, "queryId": query_id });
        if let Some(features) = features {
            body["features"] = features;
        }
        self.send(Method::POST, &self.endpoints.graphql(operation), &[], Payload::Json(body))
            .await
    }

    async fn form_post(&self, url: &str, fields: Vec<(String, String)>) -> Result<Value, AppError> {
        self.send(Method::POST, url, &[], Payload::Form(fields)).await
    }

    async fn viewer_id(&self) -> Result<String, AppError> {
        self.viewer_id
            .get_or_try_init(|| async {
                let screen_name = self.probe().await?;
                Ok::<_, AppError>(self.user_by_screen_name(&screen_name).await?.id)
            })
            .await
            .cloned()
    }

    async fn paged_users(&self, operation: &str, user_id: &str, count: u32) -> Result<Timeline, AppError> {
        let variables = json!({
            "userId": user_id,
            "count": count,
            "includePromotedContent": false,
        });
        let root = self.gql_get(operation, variables, tweet_features()).await?;
        Ok(parse::parse_timeline(&root))
    }
}

/// DM conversations between two accounts are keyed `<lower id>-<higher id>`
pub fn conversation_id(a: &str, b: &str) -> String {
    let ordered = match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x <= y,
        _ => a <= b,
    };
    if ordered {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

fn request_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

fn not_found(what: String) -> AppError {
    AppError::remote(format!("{} not found", what))
}

#[async_trait]
impl XApi for WebClient {
    async fn probe(&self) -> Result<String, AppError> {
        let root = self
            .send(Method::GET, &self.endpoints.account_settings(), &[], Payload::Empty)
            .await?;
        root.get("screen_name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::AuthenticationFailure("account settings did not include a screen name".into()))
    }

    async fn create_tweet(&self, draft: &TweetDraft) -> Result<String, AppError> {
        let media_entities: Vec<Value> = draft
            .media_ids
            .iter()
            .map(|id| json!({ "media_id": id, "tagged_users": [] }))
            .collect();
        let mut variables = json!({
            "tweet_text": draft.text,
            "dark_request": false,
            "media": { "media_entities": media_entities, "possibly_sensitive": false },
            "semantic_annotation_ids": [],
        });
        if let Some(card_uri) = &draft.card_uri {
            variables["card_uri"] = json!(card_uri);
        }
        let root = self
            .gql_post(endpoints::CREATE_TWEET, variables, Some(tweet_features()))
            .await?;
        parse::created_tweet_id(&root).ok_or_else(|| AppError::remote("CreateTweet returned no tweet id"))
    }

    async fn delete_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.gql_post(
            endpoints::DELETE_TWEET,
            json!({ "tweet_id": tweet_id, "dark_request": false }),
            None,
        )
        .await?;
        Ok(())
    }

    async fn create_poll(&self, choices: &[String], duration_minutes: u32) -> Result<String, AppError> {
        let mut card = json!({
            "twitter:card": format!("poll{}choice_text_only", choices.len()),
            "twitter:api:api:endpoint": "1",
            "twitter:long:duration_minutes": duration_minutes,
        });
        for (index, choice) in choices.iter().enumerate() {
            card[format!("twitter:string:choice{}_label", index + 1)] = json!(choice);
        }
        let root = self
            .form_post(
                &self.endpoints.create_card(),
                vec![("card_data".to_string(), card.to_string())],
            )
            .await?;
        root.get("card_uri")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::remote("poll card creation returned no card uri"))
    }

    async fn create_scheduled_tweet(
        &self,
        text: &str,
        execute_at: i64,
        media_ids: &[String],
    ) -> Result<String, AppError> {
        let variables = json!({
            "post_tweet_request": {
                "auto_populate_reply_metadata": false,
                "status": text,
                "exclude_reply_user_ids": [],
                "media_ids": media_ids,
            },
            "execute_at": execute_at,
        });
        let root = self
            .gql_post(endpoints::CREATE_SCHEDULED_TWEET, variables, None)
            .await?;
        root.pointer("/data/tweet/rest_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::remote("CreateScheduledTweet returned no id"))
    }

    async fn scheduled_tweets(&self) -> Result<Vec<ScheduledTweet>, AppError> {
        let root = self
            .gql_get(endpoints::FETCH_SCHEDULED_TWEETS, json!({ "ascending": true }), json!({}))
            .await?;
        Ok(parse::parse_scheduled(&root))
    }

    async fn search_tweets(&self, query: &str, mode: SearchMode, count: u32) -> Result<Timeline, AppError> {
        let variables = json!({
            "rawQuery": query,
            "count": count,
            "querySource": "typed_query",
            "product": mode.as_str(),
        });
        let root = self
            .gql_get(endpoints::SEARCH_TIMELINE, variables, tweet_features())
            .await?;
        Ok(parse::parse_timeline(&root))
    }

    async fn tweet_by_id(&self, tweet_id: &str) -> Result<Tweet, AppError> {
        let variables = json!({
            "tweetId": tweet_id,
            "withCommunity": false,
            "includePromotedContent": false,
            "withVoice": false,
        });
        let root = self
            .gql_get(endpoints::TWEET_RESULT_BY_REST_ID, variables, tweet_features())
            .await?;
        root.pointer("/data/tweetResult/result")
            .and_then(parse::parse_tweet)
            .ok_or_else(|| not_found(format!("tweet {}", tweet_id)))
    }

    async fn favorite_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.gql_post(endpoints::FAVORITE_TWEET, json!({ "tweet_id": tweet_id }), None)
            .await?;
        Ok(())
    }

    async fn unfavorite_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.gql_post(endpoints::UNFAVORITE_TWEET, json!({ "tweet_id": tweet_id }), None)
            .await?;
        Ok(())
    }

    async fn retweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.gql_post(
            endpoints::CREATE_RETWEET,
            json!({ "tweet_id": tweet_id, "dark_request": false }),
            None,
        )
        .await?;
        Ok(())
    }

    async fn delete_retweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.gql_post(
            endpoints::DELETE_RETWEET,
            json!({ "source_tweet_id": tweet_id, "dark_request": false }),
            None,
        )
        .await?;
        Ok(())
    }

    async fn retweeters(&self, tweet_id: &str, count: u32) -> Result<Timeline, AppError> {
        let variables = json!({
            "tweetId": tweet_id,
            "count": count,
            "includePromotedContent": true,
        });
        let root = self.gql_get(endpoints::RETWEETERS, variables, tweet_features()).await?;
        Ok(parse::parse_timeline(&root))
    }

    async fn user_by_screen_name(&self, screen_name: &str) -> Result<User, AppError> {
        let variables = json!({ "screen_name": screen_name, "withSafetyModeUserFields": true });
        let root = self
            .gql_get(endpoints::USER_BY_SCREEN_NAME, variables, user_features())
            .await?;
        root.pointer("/data/user/result")
            .and_then(parse::parse_user)
            .ok_or_else(|| not_found(format!("user @{}", screen_name)))
    }

    async fn user_by_id(&self, user_id: &str) -> Result<User, AppError> {
        let variables = json!({ "userId": user_id, "withSafetyModeUserFields": true });
        let root = self
            .gql_get(endpoints::USER_BY_REST_ID, variables, user_features())
            .await?;
        root.pointer("/data/user/result")
            .and_then(parse::parse_user)
            .ok_or_else(|| not_found(format!("user {}", user_id)))
    }

    async fn user_tweets(&self, user_id: &str, tweet_type: TweetType, count: u32) -> Result<Timeline, AppError> {
        let operation = match tweet_type {
            TweetType::Tweets => endpoints::USER_TWEETS,
            TweetType::Replies => endpoints::USER_TWEETS_AND_REPLIES,
            TweetType::Media => endpoints::USER_MEDIA,
            TweetType::Likes => endpoints::USER_LIKES,
        };
        let variables = json!({
            "userId": user_id,
            "count": count,
            "includePromotedContent": true,
            "withQuickPromoteEligibilityTweetFields": true,
            "withVoice": true,
            "withV2Timeline": true,
        });
        let root = self.gql_get(operation, variables, tweet_features()).await?;
        Ok(parse::parse_timeline(&root))
    }

    async fn follow_user(&self, user_id: &str) -> Result<User, AppError> {
        let root = self
            .form_post(&self.endpoints.friendships_create(), friendship_form(user_id))
            .await?;
        parse::parse_user(&root).ok_or_else(|| AppError::remote("follow returned no user"))
    }

    async fn unfollow_user(&self, user_id: &str) -> Result<User, AppError> {
        let root = self
            .form_post(&self.endpoints.friendships_destroy(), friendship_form(user_id))
            .await?;
        parse::parse_user(&root).ok_or_else(|| AppError::remote("unfollow returned no user"))
    }

    async fn followers(&self, user_id: &str, count: u32) -> Result<Timeline, AppError> {
        self.paged_users(endpoints::FOLLOWERS, user_id, count).await
    }

    async fn following(&self, user_id: &str, count: u32) -> Result<Timeline, AppError> {
        self.paged_users(endpoints::FOLLOWING, user_id, count).await
    }

    async fn send_dm(&self, user_id: &str, text: &str, media_id: Option<&str>) -> Result<DirectMessage, AppError> {
        let viewer = self.viewer_id().await?;
        let mut body = json!({
            "conversation_id": conversation_id(&viewer, user_id),
            "recipient_ids": false,
            "request_id": request_id(),
            "text": text,
            "cards_platform": "Web-12",
            "include_cards": 1,
            "include_quote_count": true,
            "dm_users": false,
        });
        if let Some(media_id) = media_id {
            body["media_id"] = json!(media_id);
        }
        let root = self
            .send(Method::POST, &self.endpoints.dm_new(), &[], Payload::Json(body))
            .await?;
        parse::parse_messages(&root)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::remote("direct message response contained no message"))
    }

    async fn dm_history(&self, user_id: &str, max_id: Option<&str>) -> Result<Vec<DirectMessage>, AppError> {
        let viewer = self.viewer_id().await?;
        let mut query = vec![
            ("context", "FETCH_DM_CONVERSATION_HISTORY".to_string()),
            ("include_conversation_info", "true".to_string()),
        ];
        if let Some(max_id) = max_id {
            query.push(("max_id", max_id.to_string()));
        }
        let url = self.endpoints.dm_conversation(&conversation_id(&viewer, user_id));
        let root = self.send(Method::GET, &url, &query, Payload::Empty).await?;
        Ok(parse::parse_messages(&root))
    }

    async fn delete_dm(&self, message_id: &str) -> Result<(), AppError> {
        self.gql_post(
            endpoints::DELETE_DM,
            json!({ "messageId": message_id, "requestId": request_id() }),
            None,
        )
        .await?;
        Ok(())
    }

    async fn trends(&self, category: TrendCategory) -> Result<Vec<Trend>, AppError> {
        let query = [
            ("count", "20".to_string()),
            ("candidate_source", "trends".to_string()),
            ("include_page_configuration", "false".to_string()),
            ("entity_tokens", "false".to_string()),
            ("initial_tab_id", category.as_str().to_string()),
        ];
        let root = self
            .send(Method::GET, &self.endpoints.guide(), &query, Payload::Empty)
            .await?;
        Ok(parse::parse_trends(&root))
    }
}

fn friendship_form(user_id: &str) -> Vec<(String, String)> {
    vec![
        ("user_id".to_string(), user_id.to_string()),
        ("include_profile_interstitial_type".to_string(), "1".to_string()),
        ("skip_status".to_string(), "1".to_string()),
    ]
}

/// Production `Connector`
#[derive(Debug, Clone)]
pub struct WebConnector {
    user_agent: String,
    language: String,
    endpoints: Endpoints,
    timeout: Duration,
}

impl WebConnector {
    pub fn new(user_agent: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            language: language.into(),
            endpoints: Endpoints::default(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl Connector for WebConnector {
    fn connect(&self, bundle: &SessionBundle) -> Result<Arc<dyn XApi>, AppError> {
        let http = build_client(self.timeout, &self.user_agent)?;
        Ok(Arc::new(WebClient::new(
            http,
            bundle,
            &self.language,
            self.endpoints.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::collections::BTreeMap;

    fn bundle(with_twid: bool) -> SessionBundle {
        let mut cookies = BTreeMap::new();
        cookies.insert("auth_token".to_string(), "tok".to_string());
        cookies.insert("ct0".to_string(), "csrf".to_string());
        if with_twid {
            cookies.insert("twid".to_string(), "u%3D100".to_string());
        }
        SessionBundle::new(cookies, BTreeMap::new())
    }

    fn client_for(server: &mockito::ServerGuard, with_twid: bool) -> Arc<dyn XApi> {
        let endpoints = Endpoints {
            api_base: server.url(),
            caps_base: server.url(),
        };
        WebConnector::new("test-agent", "en")
            .with_endpoints(endpoints)
            .connect(&bundle(with_twid))
            .unwrap()
    }

    #[test]
    fn test_conversation_id_orders_numerically() {
        assert_eq!(conversation_id("100", "9"), "9-100");
        assert_eq!(conversation_id("9", "100"), "9-100");
        assert_eq!(conversation_id("5", "5"), "5-5");
    }

    #[tokio::test]
    async fn test_probe_sends_session_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/1.1/account/settings.json")
            .match_header("x-csrf-token", "csrf")
            .match_header("cookie", Matcher::Regex("auth_token=tok".into()))
            .match_header("authorization", Matcher::Regex("^Bearer ".into()))
            .match_header("user-agent", "test-agent")
            .with_status(200)
            .with_body(r#"{"screen_name":"alice"}"#)
            .create_async()
            .await;

        let api = client_for(&server, true);
        assert_eq!(api.probe().await.unwrap(), "alice");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_tweet_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Regex("/CreateTweet".into()))
            .with_status(429)
            .with_body(r#"{"errors":[{"code":88,"message":"Rate limit exceeded"}]}"#)
            .create_async()
            .await;

        let api = client_for(&server, true);
        let err = api
            .create_tweet(&TweetDraft {
                text: "hello".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "RemoteOperationFailure");
        assert!(err.to_string().contains("HTTP 429"));
    }

    #[tokio::test]
    async fn test_create_tweet_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex("/CreateTweet".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "tweet_text": "hello", "card_uri": "card://1" },
                "queryId": "SiM_cAu83R0wnrpmKQQSEw"
            })))
            .with_status(200)
            .with_body(r#"{"data":{"create_tweet":{"tweet_results":{"result":{"rest_id":"1800"}}}}}"#)
            .create_async()
            .await;

        let api = client_for(&server, true);
        let id = api
            .create_tweet(&TweetDraft {
                text: "hello".into(),
                card_uri: Some("card://1".into()),
                media_ids: vec![],
            })
            .await
            .unwrap();
        assert_eq!(id, "1800");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_by_screen_name_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("/UserByScreenName".into()))
            .with_status(200)
            .with_body(r#"{"data":{}}"#)
            .create_async()
            .await;

        let api = client_for(&server, true);
        let err = api.user_by_screen_name("ghost").await.unwrap_err();
        assert_eq!(err.kind(), "RemoteOperationFailure");
        assert!(err.to_string().contains("@ghost not found"));
    }

    #[tokio::test]
    async fn test_follow_posts_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/1.1/friendships/create.json")
            .match_header("content-type", FORM_CONTENT_TYPE)
            .match_body(Matcher::UrlEncoded("user_id".into(), "42".into()))
            .with_status(200)
            .with_body(r#"{"id_str":"42","name":"Bob","screen_name":"bob"}"#)
            .create_async()
            .await;

        let api = client_for(&server, true);
        let user = api.follow_user("42").await.unwrap();
        assert_eq!(user.screen_name, "bob");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_dm_uses_sorted_conversation_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/1.1/dm/new2.json")
            .match_body(Matcher::PartialJson(json!({
                "conversation_id": "42-100",
                "text": "hi"
            })))
            .with_status(200)
            .with_body(
                r#"{"entries":[{"message":{"id":"m1","time":"1","message_data":{"id":"m1","text":"hi","sender_id":"100","recipient_id":"42"}}}]}"#,
            )
            .create_async()
            .await;

        let api = client_for(&server, true);
        let message = api.send_dm("42", "hi", None).await.unwrap();
        assert_eq!(message.id, "m1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_viewer_id_resolved_once_without_twid() {
        let mut server = mockito::Server::new_async().await;
        let settings = server
            .mock("GET", "/1.1/account/settings.json")
            .with_status(200)
            .with_body(r#"{"screen_name":"alice"}"#)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", Matcher::Regex("/UserByScreenName".into()))
            .with_status(200)
            .with_body(
                r#"{"data":{"user":{"result":{"rest_id":"7","legacy":{"name":"Alice","screen_name":"alice"}}}}}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", Matcher::Regex("/1.1/dm/conversation/7-42.json".into()))
            .with_status(200)
            .with_body(r#"{"conversation_timeline":{"entries":[]}}"#)
            .expect(2)
            .create_async()
            .await;

        let api = client_for(&server, false);
        assert!(api.dm_history("42", None).await.unwrap().is_empty());
        assert!(api.dm_history("42", Some("99")).await.unwrap().is_empty());
        settings.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("/guide.json".into()))
            .with_status(401)
            .with_body(r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#)
            .create_async()
            .await;

        let api = client_for(&server, true);
        let err = api.trends(TrendCategory::News).await.unwrap_err();
        assert_eq!(err.kind(), "AuthenticationFailure");
    }
}
