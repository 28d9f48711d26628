//! Tool Registry and Dispatcher
//!
//! `TOOLS` is the advertised surface, in display order. `invoke` decodes the
//! arguments into the tool's schema type, runs the handler and wraps the
//! outcome in the result envelope; nothing escapes as a protocol error.

use crate::client::XApi;
use crate::error::AppError;
use crate::mcp::ToolResult;
use crate::tools::args::*;
use crate::tools::{dm, engage, graph, trends, tweet, user, ToolOutput};
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    schema: fn() -> RootSchema,
}

impl ToolDescriptor {
    pub fn input_schema(&self) -> RootSchema {
        (self.schema)()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

fn schema<T: JsonSchema>() -> RootSchema {
    schemars::schema_for!(T)
}

macro_rules! tool {
    ($name:literal, $args:ty, $description:literal) => {
        ToolDescriptor {
            name: $name,
            description: $description,
            schema: schema::<$args>,
        }
    };
}

pub const TOOLS: &[ToolDescriptor] = &[
    tool!("post_tweet", PostTweetArgs, "Post a new tweet"),
    tool!("delete_tweet", TweetIdArgs, "Delete one of your tweets"),
    tool!(
        "create_tweet_with_poll",
        PollTweetArgs,
        "Post a tweet with a poll of 2 to 4 choices"
    ),
    tool!(
        "create_scheduled_tweet",
        ScheduledTweetArgs,
        "Schedule a tweet for publication at a future time"
    ),
    tool!("get_scheduled_tweets", NoArgs, "List your scheduled tweets"),
    tool!(
        "search_tweets",
        SearchTweetsArgs,
        "Search tweets, ordered by Latest, Top, People, Photos or Videos"
    ),
    tool!("get_tweet_by_id", TweetIdArgs, "Fetch a single tweet by id"),
    tool!("favorite_tweet", TweetIdArgs, "Like a tweet"),
    tool!("unfavorite_tweet", TweetIdArgs, "Remove a like from a tweet"),
    tool!("retweet", TweetIdArgs, "Retweet a tweet"),
    tool!("delete_retweet", TweetIdArgs, "Undo a retweet"),
    tool!("get_retweeters", RetweetersArgs, "List users who retweeted a tweet"),
    tool!(
        "get_user_by_screen_name",
        ScreenNameArgs,
        "Look up a user by screen name"
    ),
    tool!("get_user_by_id", UserIdArgs, "Look up a user by numeric id"),
    tool!(
        "get_user_tweets",
        UserTweetsArgs,
        "Read a user's tweets, replies, media or likes"
    ),
    tool!("get_user_media", UserTimelineArgs, "Read a user's media tweets"),
    tool!("get_user_likes", UserTimelineArgs, "Read tweets a user has liked"),
    tool!(
        "follow_user",
        UserTargetArgs,
        "Follow a user given by user_id or screen_name"
    ),
    tool!(
        "unfollow_user",
        UserTargetArgs,
        "Unfollow a user given by user_id or screen_name"
    ),
    tool!("get_user_followers", GraphArgs, "List a user's followers"),
    tool!("get_user_following", GraphArgs, "List accounts a user follows"),
    tool!("send_dm", SendDmArgs, "Send a direct message"),
    tool!(
        "get_dm_history",
        DmHistoryArgs,
        "Read the direct message conversation with a user"
    ),
    tool!("delete_dm", DmIdArgs, "Delete a direct message"),
    tool!("get_trends", TrendsArgs, "List trending topics for a category"),
];

/// Descriptors in display order
pub fn list_tools() -> &'static [ToolDescriptor] {
    TOOLS
}

pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.name == name)
}

/// Run tool `name` and wrap the outcome in the result envelope
pub async fn invoke(api: &dyn XApi, name: &str, args: Value) -> ToolResult {
    debug!("Invoking tool {}", name);
    let Some(tool) = find_tool(name) else {
        let e = AppError::invalid(format!("Unknown tool: {}", name));
        warn!("{}", e);
        return ToolResult::failure(&e);
    };
    match dispatch(api, tool.name, args).await {
        Ok(output) => ToolResult::success(output.message, output.data),
        Err(e) => {
            warn!("Tool {} failed [{}]: {}", name, e.error_code(), e);
            ToolResult::failure(&e)
        }
    }
}

async fn dispatch(api: &dyn XApi, name: &str, args: Value) -> Result<ToolOutput, AppError> {
    match name {
        "post_tweet" => tweet::post_tweet(api, parse_args(args)?).await,
        "delete_tweet" => tweet::delete_tweet(api, parse_args(args)?).await,
        "create_tweet_with_poll" => tweet::create_tweet_with_poll(api, parse_args(args)?).await,
        "create_scheduled_tweet" => tweet::create_scheduled_tweet(api, parse_args(args)?).await,
        "get_scheduled_tweets" => tweet::get_scheduled_tweets(api, parse_args(args)?).await,
        "search_tweets" => tweet::search_tweets(api, parse_args(args)?).await,
        "get_tweet_by_id" => tweet::get_tweet_by_id(api, parse_args(args)?).await,
        "favorite_tweet" => engage::favorite_tweet(api, parse_args(args)?).await,
        "unfavorite_tweet" => engage::unfavorite_tweet(api, parse_args(args)?).await,
        "retweet" => engage::retweet(api, parse_args(args)?).await,
        "delete_retweet" => engage::delete_retweet(api, parse_args(args)?).await,
        "get_retweeters" => engage::get_retweeters(api, parse_args(args)?).await,
        "get_user_by_screen_name" => user::get_user_by_screen_name(api, parse_args(args)?).await,
        "get_user_by_id" => user::get_user_by_id(api, parse_args(args)?).await,
        "get_user_tweets" => user::get_user_tweets(api, parse_args(args)?).await,
        "get_user_media" => user::get_user_media(api, parse_args(args)?).await,
        "get_user_likes" => user::get_user_likes(api, parse_args(args)?).await,
        "follow_user" => graph::follow_user(api, parse_args(args)?).await,
        "unfollow_user" => graph::unfollow_user(api, parse_args(args)?).await,
        "get_user_followers" => graph::get_user_followers(api, parse_args(args)?).await,
        "get_user_following" => graph::get_user_following(api, parse_args(args)?).await,
        "send_dm" => dm::send_dm(api, parse_args(args)?).await,
        "get_dm_history" => dm::get_dm_history(api, parse_args(args)?).await,
        "delete_dm" => dm::delete_dm(api, parse_args(args)?).await,
        "get_trends" => trends::get_trends(api, parse_args(args)?).await,
        _ => Err(AppError::invalid(format!("Unknown tool: {}", name))),
    }
}
