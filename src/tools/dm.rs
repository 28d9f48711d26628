//! Direct messages

use crate::client::XApi;
use crate::error::AppError;
use crate::tools::args::{clean_text, require_id, DmHistoryArgs, DmIdArgs, SendDmArgs, DM_MAX_GRAPHEMES};
use crate::tools::ToolOutput;
use serde_json::json;
use tracing::info;

pub async fn send_dm(api: &dyn XApi, args: SendDmArgs) -> Result<ToolOutput, AppError> {
    let user_id = require_id(&args.user_id, "user_id")?;
    let text = clean_text(&args.text, "text", DM_MAX_GRAPHEMES)?;
    let media_id = args
        .media_id
        .as_deref()
        .map(|id| require_id(id, "media_id"))
        .transpose()?;

    let message = api.send_dm(&user_id, &text, media_id.as_deref()).await?;
    info!("Sent direct message {} to {}", message.id, user_id);
    Ok(ToolOutput::new(
        format!("Message sent to {}", user_id),
        json!({ "message": message }),
    ))
}

pub async fn get_dm_history(api: &dyn XApi, args: DmHistoryArgs) -> Result<ToolOutput, AppError> {
    let user_id = require_id(&args.user_id, "user_id")?;
    let max_id = args
        .max_id
        .as_deref()
        .map(|id| require_id(id, "max_id"))
        .transpose()?;

    let messages = api.dm_history(&user_id, max_id.as_deref()).await?;
    Ok(ToolOutput::new(
        format!("{} message(s) with {}", messages.len(), user_id),
        json!({ "user_id": user_id, "count": messages.len(), "messages": messages }),
    ))
}

pub async fn delete_dm(api: &dyn XApi, args: DmIdArgs) -> Result<ToolOutput, AppError> {
    let message_id = require_id(&args.message_id, "message_id")?;
    api.delete_dm(&message_id).await?;
    Ok(ToolOutput::new("Message deleted", json!({ "message_id": message_id })))
}
