//! Tweet lifecycle and lookup tools

use crate::client::types::TweetDraft;
use crate::client::XApi;
use crate::error::AppError;
use crate::tools::args::{
    clamp_count, clean_text, require_id, require_ids, NoArgs, PollTweetArgs, PostTweetArgs,
    ScheduledTweetArgs, SearchTweetsArgs, TweetIdArgs, POLL_CHOICE_MAX_GRAPHEMES,
    POLL_DEFAULT_MINUTES, POLL_MAX_MINUTES, POLL_MIN_MINUTES, SEARCH_COUNT, TWEET_MAX_GRAPHEMES,
};
use crate::tools::ToolOutput;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

pub fn tweet_url(tweet_id: &str) -> String {
    format!("https://x.com/i/status/{}", tweet_id)
}

pub async fn post_tweet(api: &dyn XApi, args: PostTweetArgs) -> Result<ToolOutput, AppError> {
    let text = clean_text(&args.text, "text", TWEET_MAX_GRAPHEMES)?;
    let tweet_id = api
        .create_tweet(&TweetDraft {
            text: text.clone(),
            ..Default::default()
        })
        .await?;
    info!("Posted tweet {}", tweet_id);
    Ok(ToolOutput::new(
        "Tweet posted",
        json!({ "tweet_id": tweet_id, "text": text, "url": tweet_url(&tweet_id) }),
    ))
}

pub async fn delete_tweet(api: &dyn XApi, args: TweetIdArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    api.delete_tweet(&tweet_id).await?;
    Ok(ToolOutput::new("Tweet deleted", json!({ "tweet_id": tweet_id })))
}

pub async fn create_tweet_with_poll(api: &dyn XApi, args: PollTweetArgs) -> Result<ToolOutput, AppError> {
    let text = clean_text(&args.text, "text", TWEET_MAX_GRAPHEMES)?;
    if !(2..=4).contains(&args.choices.len()) {
        return Err(AppError::invalid(format!(
            "A poll needs 2 to 4 choices, got {}",
            args.choices.len()
        )));
    }
    let choices = args
        .choices
        .iter()
        .map(|choice| {
            let cleaned = clean_text(choice, "choice", usize::MAX)?;
            if cleaned.graphemes(true).count() > POLL_CHOICE_MAX_GRAPHEMES {
                return Err(AppError::invalid(format!(
                    "Poll choice {:?} is longer than {} characters",
                    cleaned, POLL_CHOICE_MAX_GRAPHEMES
                )));
            }
            Ok(cleaned)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let duration = args.duration_minutes.unwrap_or(POLL_DEFAULT_MINUTES);
    if !(POLL_MIN_MINUTES..=POLL_MAX_MINUTES).contains(&duration) {
        return Err(AppError::invalid(format!(
            "duration_minutes must be between {} and {}, got {}",
            POLL_MIN_MINUTES, POLL_MAX_MINUTES, duration
        )));
    }

    let card_uri = api.create_poll(&choices, duration as u32).await?;
    let tweet_id = api
        .create_tweet(&TweetDraft {
            text: text.clone(),
            card_uri: Some(card_uri.clone()),
            media_ids: Vec::new(),
        })
        .await?;
    info!("Posted poll tweet {}", tweet_id);
    Ok(ToolOutput::new(
        "Poll tweet posted",
        json!({
            "tweet_id": tweet_id,
            "url": tweet_url(&tweet_id),
            "card_uri": card_uri,
            "choices": choices,
            "duration_minutes": duration,
        }),
    ))
}

pub async fn create_scheduled_tweet(api: &dyn XApi, args: ScheduledTweetArgs) -> Result<ToolOutput, AppError> {
    let text = clean_text(&args.text, "text", TWEET_MAX_GRAPHEMES)?;
    let media_ids = require_ids(&args.media_ids, "media_ids")?;
    let now = Utc::now().timestamp();
    if args.scheduled_at <= now {
        return Err(AppError::invalid(format!(
            "scheduled_at must be in the future (now is {})",
            now
        )));
    }
    let when = Utc
        .timestamp_opt(args.scheduled_at, 0)
        .single()
        .ok_or_else(|| AppError::invalid(format!("scheduled_at {} is out of range", args.scheduled_at)))?;

    let id = api
        .create_scheduled_tweet(&text, args.scheduled_at, &media_ids)
        .await?;
    Ok(ToolOutput::new(
        format!("Tweet scheduled for {}", when.to_rfc3339()),
        json!({
            "scheduled_tweet_id": id,
            "scheduled_at": args.scheduled_at,
            "scheduled_for": when.to_rfc3339(),
        }),
    ))
}

pub async fn get_scheduled_tweets(api: &dyn XApi, _args: NoArgs) -> Result<ToolOutput, AppError> {
    let scheduled = api.scheduled_tweets().await?;
    Ok(ToolOutput::new(
        format!("{} scheduled tweet(s)", scheduled.len()),
        json!({ "count": scheduled.len(), "scheduled_tweets": scheduled }),
    ))
}

pub async fn search_tweets(api: &dyn XApi, args: SearchTweetsArgs) -> Result<ToolOutput, AppError> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(AppError::invalid("query must not be empty"));
    }
    let count = clamp_count(args.count, SEARCH_COUNT);
    let mut timeline = api.search_tweets(query, args.mode, count).await?;
    timeline.tweets.truncate(count as usize);
    timeline.users.truncate(count as usize);

    Ok(ToolOutput::new(
        format!("Found {} tweet(s) for {:?}", timeline.tweets.len(), query),
        json!({
            "query": query,
            "mode": args.mode,
            "count": timeline.tweets.len(),
            "tweets": timeline.tweets,
            "users": timeline.users,
            "next_cursor": timeline.next_cursor,
        }),
    ))
}

pub async fn get_tweet_by_id(api: &dyn XApi, args: TweetIdArgs) -> Result<ToolOutput, AppError> {
    let tweet_id = require_id(&args.tweet_id, "tweet_id")?;
    let tweet = api.tweet_by_id(&tweet_id).await?;
    Ok(ToolOutput::new(
        format!("Tweet {}", tweet_id),
        json!({ "tweet": tweet, "url": tweet_url(&tweet_id) }),
    ))
}
