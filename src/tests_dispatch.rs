//! End-to-end tool dispatch against the in-memory adapter

#[cfg(test)]
mod tests {
    use crate::client::mock::{sample_tweet, MockApi};
    use crate::client::types::Timeline;
    use crate::error::AppError;
    use crate::mcp::{handle_request, McpRequest, ServerContext};
    use crate::tools::registry::{invoke, list_tools};
    use serde_json::{json, Value};
    use std::sync::Arc;

    const DOCUMENTED_TOOLS: [&str; 25] = [
        "post_tweet",
        "delete_tweet",
        "create_tweet_with_poll",
        "create_scheduled_tweet",
        "get_scheduled_tweets",
        "search_tweets",
        "get_tweet_by_id",
        "favorite_tweet",
        "unfavorite_tweet",
        "retweet",
        "delete_retweet",
        "get_retweeters",
        "get_user_by_screen_name",
        "get_user_by_id",
        "get_user_tweets",
        "get_user_media",
        "get_user_likes",
        "follow_user",
        "unfollow_user",
        "get_user_followers",
        "get_user_following",
        "send_dm",
        "get_dm_history",
        "delete_dm",
        "get_trends",
    ];

    #[test]
    fn list_tools_matches_documented_surface() {
        let names: Vec<&str> = list_tools().iter().map(|t| t.name).collect();
        assert_eq!(names, DOCUMENTED_TOOLS);
        // stable across calls
        let again: Vec<&str> = list_tools().iter().map(|t| t.name).collect();
        assert_eq!(names, again);
    }

    #[tokio::test]
    async fn every_listed_tool_is_dispatchable() {
        for tool in list_tools() {
            let api = MockApi::new();
            let result = invoke(&api, tool.name, json!({})).await;
            let message = result.error.as_ref().map(|e| e.message.clone()).unwrap_or_default();
            assert!(
                !message.contains("Unknown tool"),
                "{} is listed but not dispatched",
                tool.name
            );
        }
    }

    #[tokio::test]
    async fn search_returns_at_most_count_tweets() {
        let tweets = (0..40).map(|i| sample_tweet(&format!("{}", 100 + i), "ai")).collect();
        let api = MockApi::new().with_search(Timeline {
            tweets,
            ..Default::default()
        });
        let result = invoke(
            &api,
            "search_tweets",
            json!({"query": "artificial intelligence", "mode": "Latest", "count": 15}),
        )
        .await;
        assert!(result.success);
        let data = result.data.unwrap();
        let tweets = data["tweets"].as_array().unwrap();
        assert!(tweets.len() <= 15);
        assert!(tweets.iter().all(|t| t["id"].is_string() && t["text"].is_string()));
    }

    #[tokio::test]
    async fn search_with_bogus_mode_makes_no_call() {
        let api = MockApi::new();
        let result = invoke(&api, "search_tweets", json!({"query": "x", "mode": "Bogus", "count": 15})).await;
        assert_eq!(result.error_kind(), Some("InvalidArgument"));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn rate_limited_post_is_an_envelope() {
        let api = MockApi::new().fail(
            "create_tweet",
            AppError::RemoteOperationFailure {
                status: Some(429),
                message: "rate limited: Rate limit exceeded (code 88)".into(),
            },
        );
        let result = invoke(&api, "post_tweet", json!({"text": "hello"})).await;
        assert!(!result.success);
        assert_eq!(result.error_kind(), Some("RemoteOperationFailure"));
        assert!(result.error.unwrap().message.contains("429"));
    }

    #[tokio::test]
    async fn follow_unknown_user_is_not_found() {
        let api = MockApi::new();
        let result = invoke(&api, "follow_user", json!({"screen_name": "doesnotexist123456"})).await;
        assert_eq!(result.error_kind(), Some("RemoteOperationFailure"));
        assert!(result.error.unwrap().message.contains("not found"));
    }

    #[tokio::test]
    async fn expired_session_surfaces_as_auth_failure() {
        let api = MockApi::new().fail(
            "tweet_by_id",
            AppError::AuthenticationFailure("session rejected by the platform".into()),
        );
        let result = invoke(&api, "get_tweet_by_id", json!({"tweet_id": "5"})).await;
        assert_eq!(result.error_kind(), Some("AuthenticationFailure"));
    }

    #[tokio::test]
    async fn failures_keep_the_server_answering() {
        let api = Arc::new(MockApi::new().fail("retweet", AppError::remote("boom")));
        let mut ctx = ServerContext::new(api.clone(), "mock_user");

        let call = |id: i64, name: &str, args: Value| McpRequest {
            jsonrpc: "2.0".into(),
            id: Some(json!(id)),
            method: "tools/call".into(),
            params: Some(json!({"name": name, "arguments": args})),
        };

        let first = handle_request(call(1, "retweet", json!({"tweet_id": "1"})), &mut ctx)
            .await
            .unwrap();
        assert_eq!(first.result.unwrap()["isError"], true);

        let second = handle_request(call(2, "favorite_tweet", json!({"tweet_id": "1"})), &mut ctx)
            .await
            .unwrap();
        assert_eq!(second.result.unwrap()["isError"], false);
        assert_eq!(api.calls(), vec!["retweet(1)", "favorite_tweet(1)"]);
    }
}
