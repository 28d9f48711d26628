use crate::client::XApi;
use crate::error::AppError;
use crate::tools::args::TrendsArgs;
use crate::tools::ToolOutput;
use serde_json::json;

pub async fn get_trends(api: &dyn XApi, args: TrendsArgs) -> Result<ToolOutput, AppError> {
    let trends = api.trends(args.category).await?;
    Ok(ToolOutput::new(
        format!("{} trend(s) in {}", trends.len(), args.category.as_str()),
        json!({ "category": args.category, "count": trends.len(), "trends": trends }),
    ))
}
