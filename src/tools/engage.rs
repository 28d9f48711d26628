//! Likes, retweets and retweeters

use crate::client::XApi;
use crate::error::AppError;
use crate::tools::args::{clamp_count, require_id, RetweetersArgs, TweetIdArgs, RETWEETERS_COUNT};
use crate::tools::ToolOutput;
use serde_json::json;

pub async fn favorite_tweet(api: &dyn XApi, args: TweetIdArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    api.favorite_tweet(&tweet_id).await?;
    Ok(ToolOutput::new("Tweet liked", json!({ "tweet_id": tweet_id })))
}

pub async fn unfavorite_tweet(api: &dyn XApi, args: TweetIdArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    api.unfavorite_tweet(&tweet_id).await?;
    Ok(ToolOutput::new("Like removed", json!({ "tweet_id": tweet_id })))
}

pub async fn retweet(api: &dyn XApi, args: TweetIdArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    api.retweet(&tweet_id).await?;
    Ok(ToolOutput::new("Tweet retweeted", json!({ "tweet_id": tweet_id })))
}

pub async fn delete_retweet(api: &dyn XApi, args: TweetIdArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    api.delete_retweet(&tweet_id).await?;
    Ok(ToolOutput::new("Retweet removed", json!({ "tweet_id": tweet_id })))
}

pub async fn get_retweeters(api: &dyn XApi, args: RetweetersArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    let count = clamp_count(args.count, RETWEETERS_COUNT);
    let mut timeline = api.retweeters(&tweet_id, count).await?;
    timeline.users.truncate(count as usize);
    Ok(ToolOutput::new(
        format!("{} retweeter(s) of {}", timeline.users.len(), tweet_id),
        json!({
            "tweet_id": tweet_id,
            "count": timeline.users.len(),
            "users": timeline.users,
            "next_cursor": timeline.next_cursor,
        }),
    ))
}
