//! Follow, unfollow and follower lists

use crate::client::types::User;
use crate::client::XApi;
use crate::error::AppError;
use crate::tools::args::{clamp_count, clean_screen_name, require_id, GraphArgs, UserTargetArgs, GRAPH_COUNT};
use crate::tools::ToolOutput;
use serde_json::json;
use tracing::info;

/// Resolve a follow target to a numeric user id
async fn target_user_id(api: &dyn XApi, args: &UserTargetArgs) -> Result<String, AppError> {
    match (&args.user_id, &args.screen_name) {
        (Some(user_id), None) => require_id(user_id, "user_id"),
        (None, Some(screen_name)) => {
            let screen_name = clean_screen_name(screen_name)?;
            Ok(api.user_by_screen_name(&screen_name).await?.id)
        }
        _ => Err(AppError::invalid("Give exactly one of user_id or screen_name")),
    }
}

fn user_summary(user: &User) -> serde_json::Value {
    json!({ "id": user.id, "screen_name": user.screen_name, "name": user.name })
}

pub async fn follow_user(api: &dyn XApi, args: UserTargetArgs) -> Result<ToolOutput, AppError> {
    let user_id = target_user_id(api, &args).await?;
    let user = api.follow_user(&user_id).await?;
    info!("Followed @{}", user.screen_name);
    Ok(ToolOutput::new(
        format!("Now following @{}", user.screen_name),
        json!({ "user": user_summary(&user) }),
    ))
}

pub async fn unfollow_user(api: &dyn XApi, args: UserTargetArgs) -> Result<ToolOutput, AppError> {
    let user_id = target_user_id(api, &args).await?;
    let user = api.unfollow_user(&user_id).await?;
    info!("Unfollowed @{}", user.screen_name);
    Ok(ToolOutput::new(
        format!("Unfollowed @{}", user.screen_name),
        json!({ "user": user_summary(&user) }),
    ))
}

pub async fn get_user_followers(api: &dyn XApi, args: GraphArgs) -> Result<ToolOutput, AppError> {
    let user_id = require_id(&args.user_id, "user_id")?;
    let count = clamp_count(args.count, GRAPH_COUNT);
    let mut timeline = api.followers(&user_id, count).await?;
    timeline.users.truncate(count as usize);
    Ok(ToolOutput::new(
        format!("{} follower(s) of {}", timeline.users.len(), user_id),
        json!({
            "user_id": user_id,
            "count": timeline.users.len(),
            "users": timeline.users,
            "next_cursor": timeline.next_cursor,
        }),
    ))
}

pub async fn get_user_following(api: &dyn XApi, args: GraphArgs) -> Result<ToolOutput, AppError> {
    let user_id = require_id(&args.user_id, "user_id")?;
    let count = clamp_count(args.count, GRAPH_COUNT);
    let mut timeline = api.following(&user_id, count).await?;
    timeline.users.truncate(count as usize);
    Ok(ToolOutput::new(
        format!("{} account(s) followed by {}", timeline.users.len(), user_id),
        json!({
            "user_id": user_id,
            "count": timeline.users.len(),
            "users": timeline.users,
            "next_cursor": timeline.next_cursor,
        }),
    ))
}
