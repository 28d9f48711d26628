//! Web API locations used by `WebClient`
//!
//! GraphQL operations are addressed as `<query id>/<operation name>`; the ids
//! are the ones the x.com web app ships and change when it is redeployed.

use serde_json::{json, Value};

pub const CREATE_TWEET: &str = "SiM_cAu83R0wnrpmKQQSEw/CreateTweet";
pub const DELETE_TWEET: &str = "VaenaVgh5q5ih7kvyVjgtg/DeleteTweet";
pub const CREATE_SCHEDULED_TWEET: &str = "LCVzRQGxOaGnOnYH01NQXg/CreateScheduledTweet";
pub const FETCH_SCHEDULED_TWEETS: &str = "ITtjAzvlZni2wWXwf295Qg/FetchScheduledTweets";
pub const SEARCH_TIMELINE: &str = "flaR-PUMshxFWZWPNpq4zA/SearchTimeline";
pub const TWEET_RESULT_BY_REST_ID: &str = "Xl5pC_lBk_gcO2ItU39DQw/TweetResultByRestId";
pub const FAVORITE_TWEET: &str = "lI07N6Otwv1PhnEgXILM7A/FavoriteTweet";
pub const UNFAVORITE_TWEET: &str = "ZYKSe-w7KEslx3JhSIk5LA/UnfavoriteTweet";
pub const CREATE_RETWEET: &str = "ojPdsZsimiJrUGLR1sjUtA/CreateRetweet";
pub const DELETE_RETWEET: &str = "iQtK4dl5hBmXewYZuEOKVw/DeleteRetweet";
pub const RETWEETERS: &str = "X-XEqG5qHQSAwmvy00xfyQ/Retweeters";
pub const USER_BY_SCREEN_NAME: &str = "NimuplG1OB7Fd2btCLdBOw/UserByScreenName";
pub const USER_BY_REST_ID: &str = "tD8zKvQzwY3kdx5yz6YmOw/UserByRestId";
pub const USER_TWEETS: &str = "QWF3SzpHmykQHsQMixG0cg/UserTweets";
pub const USER_TWEETS_AND_REPLIES: &str = "vMkJyzx1wdmvOeeNG0n6Wg/UserTweetsAndReplies";
pub const USER_MEDIA: &str = "2tLOJWwGuCTytDrGBg8VwQ/UserMedia";
pub const USER_LIKES: &str = "IohM3gxQHfvWePH5E3KuNA/Likes";
pub const FOLLOWERS: &str = "gC_lyAxZOptAMLCJX5UhWw/Followers";
pub const FOLLOWING: &str = "2vUj-_Ek-UmBVDNtd8OnQA/Following";
pub const DELETE_DM: &str = "BJ6DtxA2llfjnRoRjaiIiw/DMMessageDeleteMutation";

/// Base URLs; overridable so tests can point the client at a local server
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_base: String,
    pub caps_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: "https://x.com/i/api".to_string(),
            caps_base: "https://caps.x.com".to_string(),
        }
    }
}

impl Endpoints {
    pub fn graphql(&self, operation: &str) -> String {
        format!("{}/graphql/{}", self.api_base, operation)
    }

    pub fn account_settings(&self) -> String {
        format!("{}/1.1/account/settings.json", self.api_base)
    }

    pub fn friendships_create(&self) -> String {
        format!("{}/1.1/friendships/create.json", self.api_base)
    }

    pub fn friendships_destroy(&self) -> String {
        format!("{}/1.1/friendships/destroy.json", self.api_base)
    }

    pub fn dm_new(&self) -> String {
        format!("{}/1.1/dm/new2.json", self.api_base)
    }

    pub fn dm_conversation(&self, conversation_id: &str) -> String {
        format!("{}/1.1/dm/conversation/{}.json", self.api_base, conversation_id)
    }

    pub fn guide(&self) -> String {
        format!("{}/2/guide.json", self.api_base)
    }

    pub fn create_card(&self) -> String {
        format!("{}/v2/cards/create.json", self.caps_base)
    }
}

/// Feature switches sent with tweet-bearing GraphQL operations
pub fn tweet_features() -> Value {
    json!({
        "creator_subscriptions_tweet_preview_api_enabled": true,
        "c9s_tweet_anatomy_moderator_badge_enabled": true,
        "tweetypie_unmention_optimization_enabled": true,
        "responsive_web_edit_tweet_api_enabled": true,
        "graphql_is_translatable_rweb_tweet_is_translatable_enabled": true,
        "view_counts_everywhere_api_enabled": true,
        "longform_notetweets_consumption_enabled": true,
        "responsive_web_twitter_article_tweet_consumption_enabled": true,
        "tweet_awards_web_tipping_enabled": false,
        "longform_notetweets_rich_text_read_enabled": true,
        "longform_notetweets_inline_media_enabled": true,
        "rweb_video_timestamps_enabled": true,
        "responsive_web_graphql_exclude_directive_enabled": true,
        "verified_phone_label_enabled": false,
        "freedom_of_speech_not_reach_fetch_enabled": true,
        "standardized_nudges_misinfo": true,
        "tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled": true,
        "responsive_web_media_download_video_enabled": false,
        "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
        "responsive_web_graphql_timeline_navigation_enabled": true,
        "responsive_web_enhance_cards_enabled": false
    })
}

/// Feature switches for user lookups
pub fn user_features() -> Value {
    json!({
        "hidden_profile_likes_enabled": true,
        "hidden_profile_subscriptions_enabled": true,
        "responsive_web_graphql_exclude_directive_enabled": true,
        "verified_phone_label_enabled": false,
        "subscriptions_verification_info_is_identity_verified_enabled": true,
        "subscriptions_verification_info_verified_since_enabled": true,
        "highlights_tweets_tab_ui_enabled": true,
        "responsive_web_twitter_article_notes_tab_enabled": true,
        "creator_subscriptions_tweet_preview_api_enabled": true,
        "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
        "responsive_web_graphql_timeline_navigation_enabled": true
    })
}
