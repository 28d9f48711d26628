//! User lookup and user timelines

use crate::client::types::{Timeline, TweetType};
use crate::client::XApi;
use crate::error::AppError;
use crate::tools::args::{
    clamp_count, clean_screen_name, require_id, ScreenNameArgs, UserIdArgs, UserTimelineArgs,
    UserTweetsArgs, USER_TWEETS_COUNT,
};
use crate::tools::ToolOutput;
use serde_json::json;

pub async fn get_user_by_screen_name(api: &dyn XApi, args: ScreenNameArgs) -> Result<ToolOutput, AppError> {
    let screen_name = clean_screen_name(&args.screen_name)?;
    let user = api.user_by_screen_name(&screen_name).await?;
    Ok(ToolOutput::new(format!("User @{}", user.screen_name), json!({ "user": user })))
}

pub async fn get_user_by_id(api: &dyn XApi, args: UserIdArgs) -> Result<ToolOutput, AppError> {
    let user_id = require_id(&args.user_id, "user_id")?;
    let user = api.user_by_id(&user_id).await?;
    Ok(ToolOutput::new(format!("User @{}", user.screen_name), json!({ "user": user })))
}

pub async fn get_user_tweets(api: &dyn XApi, args: UserTweetsArgs) -> Result<ToolOutput, AppError> {
    user_timeline(api, &args.user_id, args.tweet_type, args.count).await
}

pub async fn get_user_media(api: &dyn XApi, args: UserTimelineArgs) -> Result<ToolOutput, AppError> {
    user_timeline(api, &args.user_id, TweetType::Media, args.count).await
}

pub async fn get_user_likes(api: &dyn XApi, args: UserTimelineArgs) -> Result<ToolOutput, AppError> {
    user_timeline(api, &args.user_id, TweetType::Likes, args.count).await
}

async fn user_timeline(
    api: &dyn XApi,
    user_id: &str,
    tweet_type: TweetType,
    count: Option<i64>,
) -> Result<ToolOutput, AppError> {
    let user_id = require_id(user_id, "user_id")?;
    let count = clamp_count(count, USER_TWEETS_COUNT);
    let Timeline {
        mut tweets,
        next_cursor,
        ..
    } = api.user_tweets(&user_id, tweet_type, count).await?;
    tweets.truncate(count as usize);
    Ok(ToolOutput::new(
        format!("{} {} item(s) for user {}", tweets.len(), tweet_type.as_str(), user_id),
        json!({
            "user_id": user_id,
            "tweet_type": tweet_type,
            "count": tweets.len(),
            "tweets": tweets,
            "next_cursor": next_cursor,
        }),
    ))
}
