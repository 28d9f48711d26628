//! Response shaping: platform JSON into tool-facing records
//!
//! The web API nests the interesting objects deep inside timeline
//! instructions and changes the nesting between deployments, so lookups here
//! are lenient: anything unrecognized is skipped rather than failing the call.

use crate::client::types::{DirectMessage, Media, ScheduledTweet, Timeline, Trend, Tweet, TweetAuthor, User};
use crate::error::AppError;
use chrono::DateTime;
use serde_json::Value;

/// Check the HTTP status and the body's error list, returning the parsed body
pub fn classify_response(status: u16, body: &str) -> Result<Value, AppError> {
    let value: Option<Value> = if body.trim().is_empty() {
        Some(Value::Null)
    } else {
        serde_json::from_str(body).ok()
    };

    if status == 401 {
        return Err(AppError::AuthenticationFailure(format!(
            "session rejected by the platform: {}",
            error_message(value.as_ref()).unwrap_or_else(|| "unauthorized".to_string())
        )));
    }

    if !(200..300).contains(&status) {
        let detail = error_message(value.as_ref())
            .unwrap_or_else(|| truncate_body(body));
        let message = match status {
            429 => format!("rate limited: {}", detail),
            404 => format!("not found: {}", detail),
            403 => format!("forbidden: {}", detail),
            _ => detail,
        };
        return Err(AppError::RemoteOperationFailure {
            status: Some(status),
            message,
        });
    }

    let value = value.ok_or_else(|| AppError::remote(format!("malformed response: {}", truncate_body(body))))?;

    // GraphQL reports failures with a 200 and an errors array
    if let Some(message) = error_message(Some(&value)) {
        let data_empty = match value.get("data") {
            None | Some(Value::Null) => true,
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
        };
        if data_empty {
            return Err(AppError::RemoteOperationFailure {
                status: Some(status),
                message,
            });
        }
    }
    Ok(value)
}

fn error_message(value: Option<&Value>) -> Option<String> {
    let errors = value?.get("errors")?.as_array()?;
    let first = errors.first()?;
    let message = first.get("message").and_then(Value::as_str).unwrap_or("unknown error");
    Some(match first.get("code").and_then(Value::as_i64) {
        Some(code) => format!("{} (code {})", message, code),
        None => message.to_string(),
    })
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response".to_string();
    }
    trimmed.chars().take(200).collect()
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    str_at(value, pointer).map(str::to_string)
}

fn u64_at(value: &Value, pointer: &str) -> u64 {
    value
        .pointer(pointer)
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(0)
}

fn bool_at(value: &Value, pointer: &str) -> bool {
    value.pointer(pointer).and_then(Value::as_bool).unwrap_or(false)
}

/// `Wed Oct 10 20:19:24 +0000 2018` → RFC 3339; unknown formats pass through
pub fn normalize_timestamp(raw: &str) -> String {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}

/// Parse a `tweet_results.result` object
pub fn parse_tweet(result: &Value) -> Option<Tweet> {
    let result = match str_at(result, "/__typename") {
        Some("TweetWithVisibilityResults") => result.get("tweet")?,
        Some("TweetTombstone") | Some("TweetUnavailable") => return None,
        _ => result,
    };
    let legacy = result.get("legacy")?;
    let id = string_at(result, "/rest_id").or_else(|| string_at(legacy, "/id_str"))?;

    let text = string_at(result, "/note_tweet/note_tweet_results/result/text")
        .or_else(|| string_at(legacy, "/full_text"))
        .unwrap_or_default();

    let user = result
        .pointer("/core/user_results/result")
        .and_then(parse_user)
        .map(|u| TweetAuthor {
            id: u.id,
            name: u.name,
            screen_name: u.screen_name,
            profile_image_url: u.profile_image_url,
        });

    let media = legacy
        .pointer("/extended_entities/media")
        .or_else(|| legacy.pointer("/entities/media"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_media).collect())
        .unwrap_or_default();

    let view_count = result
        .pointer("/views/count")
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));

    Some(Tweet {
        id,
        text,
        created_at: str_at(legacy, "/created_at").map(normalize_timestamp),
        favorite_count: u64_at(legacy, "/favorite_count"),
        retweet_count: u64_at(legacy, "/retweet_count"),
        reply_count: u64_at(legacy, "/reply_count"),
        quote_count: u64_at(legacy, "/quote_count"),
        view_count,
        is_quote_status: bool_at(legacy, "/is_quote_status"),
        lang: string_at(legacy, "/lang"),
        user,
        media,
    })
}

fn parse_media(item: &Value) -> Option<Media> {
    Some(Media {
        kind: string_at(item, "/type")?,
        url: string_at(item, "/media_url_https").or_else(|| string_at(item, "/media_url"))?,
        width: item
            .pointer("/original_info/width")
            .or_else(|| item.pointer("/sizes/large/w"))
            .and_then(Value::as_u64),
        height: item
            .pointer("/original_info/height")
            .or_else(|| item.pointer("/sizes/large/h"))
            .and_then(Value::as_u64),
    })
}

/// Parse a GraphQL `user_results.result` or a REST v1.1 user object
pub fn parse_user(result: &Value) -> Option<User> {
    if str_at(result, "/__typename") == Some("UserUnavailable") {
        return None;
    }
    // REST v1.1 objects are flat: the object is its own legacy block
    let (id, legacy) = match string_at(result, "/rest_id") {
        Some(id) => (id, result.get("legacy")?),
        None => (string_at(result, "/id_str")?, result),
    };

    // Newer deployments moved the names under `core`
    let name = string_at(result, "/core/name").or_else(|| string_at(legacy, "/name"))?;
    let screen_name =
        string_at(result, "/core/screen_name").or_else(|| string_at(legacy, "/screen_name"))?;

    Some(User {
        id,
        name,
        screen_name,
        description: string_at(legacy, "/description"),
        profile_image_url: string_at(legacy, "/profile_image_url_https")
            .or_else(|| string_at(result, "/avatar/image_url")),
        followers_count: u64_at(legacy, "/followers_count"),
        following_count: u64_at(legacy, "/friends_count"),
        statuses_count: u64_at(legacy, "/statuses_count"),
        created_at: str_at(legacy, "/created_at")
            .or_else(|| str_at(result, "/core/created_at"))
            .map(normalize_timestamp),
        verified: bool_at(legacy, "/verified") || bool_at(result, "/is_blue_verified"),
        location: string_at(legacy, "/location").filter(|l| !l.is_empty()),
        url: string_at(legacy, "/url"),
        protected: bool_at(legacy, "/protected"),
    })
}

/// Collect tweets, users and the bottom cursor from any timeline response
pub fn parse_timeline(root: &Value) -> Timeline {
    let mut timeline = Timeline::default();
    let mut instructions = Vec::new();
    find_instructions(root, &mut instructions);

    for instruction in instructions {
        let entries = instruction
            .get("entries")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .chain(instruction.get("entry"))
            .chain(
                instruction
                    .get("moduleItems")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten(),
            );
        for entry in entries {
            collect_entry(entry, &mut timeline);
        }
    }
    timeline
}

fn find_instructions<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("instructions") {
                out.extend(items.iter());
                return;
            }
            map.values().for_each(|v| find_instructions(v, out));
        }
        Value::Array(items) => items.iter().for_each(|v| find_instructions(v, out)),
        _ => {}
    }
}

fn collect_entry(entry: &Value, timeline: &mut Timeline) {
    let content = entry
        .get("content")
        .or_else(|| entry.get("item"))
        .unwrap_or(entry);

    if str_at(content, "/cursorType") == Some("Bottom") {
        timeline.next_cursor = string_at(content, "/value");
        return;
    }

    if let Some(item) = content.get("itemContent") {
        collect_item(item, timeline);
    }
    if let Some(items) = content.get("items").and_then(Value::as_array) {
        for module_item in items {
            if let Some(item) = module_item.pointer("/item/itemContent") {
                collect_item(item, timeline);
            }
        }
    }
}

fn collect_item(item: &Value, timeline: &mut Timeline) {
    if let Some(tweet) = item.pointer("/tweet_results/result").and_then(parse_tweet) {
        timeline.tweets.push(tweet);
    } else if let Some(user) = item.pointer("/user_results/result").and_then(parse_user) {
        timeline.users.push(user);
    }
}

/// Id of the tweet created by CreateTweet
pub fn created_tweet_id(root: &Value) -> Option<String> {
    string_at(root, "/data/create_tweet/tweet_results/result/rest_id")
}

pub fn parse_scheduled(root: &Value) -> Vec<ScheduledTweet> {
    root.pointer("/data/viewer/scheduled_tweet_list")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(ScheduledTweet {
                        id: string_at(item, "/rest_id")?,
                        text: string_at(item, "/tweet_create_request/status").unwrap_or_default(),
                        scheduled_at: item
                            .pointer("/scheduling_info/execute_at")
                            .and_then(Value::as_i64)
                            .map(|ms| ms / 1000),
                        media_ids: item
                            .pointer("/tweet_create_request/media_ids")
                            .and_then(Value::as_array)
                            .map(|ids| {
                                ids.iter()
                                    .filter_map(|id| {
                                        id.as_str().map(str::to_string).or_else(|| id.as_u64().map(|n| n.to_string()))
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the `message` entries of a DM response (`entries` or `conversation_timeline.entries`)
pub fn parse_messages(root: &Value) -> Vec<DirectMessage> {
    let entries = root
        .pointer("/conversation_timeline/entries")
        .or_else(|| root.get("entries"))
        .and_then(Value::as_array);

    entries
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get("message"))
        .filter_map(parse_message)
        .collect()
}

fn parse_message(message: &Value) -> Option<DirectMessage> {
    let data = message.get("message_data")?;
    Some(DirectMessage {
        id: string_at(message, "/id").or_else(|| string_at(data, "/id"))?,
        text: string_at(data, "/text").unwrap_or_default(),
        time: string_at(message, "/time").or_else(|| string_at(data, "/time")),
        sender_id: string_at(data, "/sender_id"),
        recipient_id: string_at(data, "/recipient_id"),
        attachment: data.get("attachment").cloned(),
    })
}

/// Collect every `trend` object in a guide response
pub fn parse_trends(root: &Value) -> Vec<Trend> {
    let mut trends = Vec::new();
    collect_trends(root, &mut trends);
    trends
}

fn collect_trends(value: &Value, out: &mut Vec<Trend>) {
    match value {
        Value::Object(map) => {
            if let Some(trend) = map.get("trend") {
                if let Some(name) = string_at(trend, "/name") {
                    out.push(Trend {
                        name,
                        tweets_count: string_at(trend, "/trendMetadata/metaDescription"),
                        domain_context: string_at(trend, "/trendMetadata/domainContext"),
                    });
                    return;
                }
            }
            map.values().for_each(|v| collect_trends(v, out));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_trends(v, out)),
        _ => {}
    }
}
