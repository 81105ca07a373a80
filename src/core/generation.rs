//! Generation backend client.
//!
//! Image and video generation runs on an external HTTP backend with a
//! submit-then-poll task API: `POST <base>/image/async_generations` returns
//! a `task_id`, and `POST <base>/image/pollimages` (or `/video/pollvideos`)
//! reports per-task status until it reaches a terminal state. Each submitted
//! job runs as its own cancellable task; there is no shared poll timer.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::{GENERATION_POLL_INTERVAL_MS, GENERATION_POLL_MAX_ATTEMPTS};
use crate::state::GenerationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Image,
    Video,
}

impl GenerationKind {
    fn submit_path(&self) -> &'static str {
        match self {
            GenerationKind::Image => "image/async_generations",
            GenerationKind::Video => "video/async_generations",
        }
    }

    fn poll_path(&self) -> &'static str {
        match self {
            GenerationKind::Image => "image/pollimages",
            GenerationKind::Video => "video/pollvideos",
        }
    }

    fn url_field(&self) -> &'static str {
        match self {
            GenerationKind::Image => "image_urls",
            GenerationKind::Video => "video_urls",
        }
    }
}

/// One poll result for a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub status: GenerationStatus,
    pub urls: Vec<String>,
    pub message: String,
}

/// Terminal result of a generation job.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Completed { urls: Vec<String> },
    Failed { message: String },
    Overtime,
}

/// A running generation job. Dropping the handle does not stop the task;
/// call [`GenerationJobHandle::cancel`] to abort the poll loop.
#[derive(Debug)]
pub struct GenerationJobHandle {
    pub id: Uuid,
    pub kind: GenerationKind,
    pub created_at: DateTime<Utc>,
    handle: tokio::task::JoinHandle<()>,
}

impl GenerationJobHandle {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Submit a payload and poll until the task reaches a terminal state,
/// delivering the result through `on_done`. The returned handle cancels the
/// in-flight poll loop; a cancelled job never calls `on_done`.
pub fn spawn_generation_job(
    base_url: String,
    kind: GenerationKind,
    payload: Value,
    on_done: impl FnOnce(Uuid, Result<GenerationOutcome, String>) + Send + 'static,
) -> GenerationJobHandle {
    let id = Uuid::new_v4();
    let handle = tokio::spawn(async move {
        let result = run_generation(&base_url, kind, &payload).await;
        on_done(id, result);
    });
    GenerationJobHandle {
        id,
        kind,
        created_at: Utc::now(),
        handle,
    }
}

/// Submit and poll a single generation task to completion.
pub async fn run_generation(
    base_url: &str,
    kind: GenerationKind,
    payload: &Value,
) -> Result<GenerationOutcome, String> {
    let client = reqwest::Client::new();
    let task_id = submit_generation(&client, base_url, kind, payload).await?;
    for _ in 0..GENERATION_POLL_MAX_ATTEMPTS {
        let updates = poll_generation(&client, base_url, kind, &[task_id.clone()]).await?;
        if let Some(update) = updates.get(&task_id) {
            if let Some(outcome) = outcome_from_update(update) {
                return Ok(outcome);
            }
        }
        tokio::time::sleep(Duration::from_millis(GENERATION_POLL_INTERVAL_MS)).await;
    }
    Err("Timed out waiting for generation backend.".to_string())
}

async fn submit_generation(
    client: &reqwest::Client,
    base_url: &str,
    kind: GenerationKind,
    payload: &Value,
) -> Result<String, String> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), kind.submit_path());
    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|err| format!("Failed to submit generation: {}", err))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|err| format!("Failed to parse submit response: {}", err))?;
    if !status.is_success() {
        return Err(format!("Backend rejected generation ({}): {}", status, body));
    }
    parse_submit_response(&body)
}

async fn poll_generation(
    client: &reqwest::Client,
    base_url: &str,
    kind: GenerationKind,
    task_ids: &[String],
) -> Result<HashMap<String, TaskUpdate>, String> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), kind.poll_path());
    let response = client
        .post(url)
        .json(&serde_json::json!({ "task_ids": task_ids }))
        .send()
        .await
        .map_err(|err| format!("Failed to poll generation: {}", err))?;
    let body: Value = response
        .json()
        .await
        .map_err(|err| format!("Failed to parse poll response: {}", err))?;
    Ok(parse_poll_response(&body, kind))
}

fn parse_submit_response(body: &Value) -> Result<String, String> {
    body.get("task_id")
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
        .ok_or_else(|| "Backend response missing task_id".to_string())
}

fn parse_poll_response(body: &Value, kind: GenerationKind) -> HashMap<String, TaskUpdate> {
    let mut updates = HashMap::new();
    let Some(entries) = body.get("data").and_then(|data| data.as_object()) else {
        return updates;
    };
    for (task_id, entry) in entries {
        let status = entry
            .get("status")
            .and_then(|value| value.as_str())
            .map(parse_status)
            .unwrap_or(GenerationStatus::Unknown);
        let urls = entry
            .get(kind.url_field())
            .and_then(|value| value.as_array())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|value| value.as_str())
                    .filter(|url| !url.is_empty())
                    .map(|url| url.to_string())
                    .collect()
            })
            .unwrap_or_default();
        let message = entry
            .get("message")
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string();
        updates.insert(task_id.clone(), TaskUpdate { status, urls, message });
    }
    updates
}

fn parse_status(raw: &str) -> GenerationStatus {
    match raw {
        "isloading" | "processing" => GenerationStatus::IsLoading,
        "completed" => GenerationStatus::Completed,
        "failed" => GenerationStatus::Failed,
        "overtime" => GenerationStatus::Overtime,
        _ => GenerationStatus::Unknown,
    }
}

/// `None` while the task is still running.
fn outcome_from_update(update: &TaskUpdate) -> Option<GenerationOutcome> {
    match update.status {
        GenerationStatus::Completed => {
            if update.urls.is_empty() {
                Some(GenerationOutcome::Failed {
                    message: "Generation completed without output URLs".to_string(),
                })
            } else {
                Some(GenerationOutcome::Completed {
                    urls: update.urls.clone(),
                })
            }
        }
        GenerationStatus::Failed => Some(GenerationOutcome::Failed {
            message: if update.message.is_empty() {
                "Generation failed".to_string()
            } else {
                update.message.clone()
            },
        }),
        GenerationStatus::Overtime => Some(GenerationOutcome::Overtime),
        GenerationStatus::IsLoading | GenerationStatus::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_submit_response() {
        assert_eq!(
            parse_submit_response(&json!({"task_id": "abc"})).unwrap(),
            "abc"
        );
        assert!(parse_submit_response(&json!({"error": "nope"})).is_err());
    }

    #[test]
    fn test_parse_poll_response() {
        let body = json!({
            "data": {
                "t1": {"task_id": "t1", "status": "completed", "image_urls": ["a.png", ""], "message": ""},
                "t2": {"task_id": "t2", "status": "processing", "image_urls": [], "message": ""},
                "t3": {"task_id": "t3", "status": "overtime", "image_urls": [], "message": "timeout"}
            }
        });
        let updates = parse_poll_response(&body, GenerationKind::Image);
        assert_eq!(updates.len(), 3);
        assert_eq!(updates["t1"].status, GenerationStatus::Completed);
        assert_eq!(updates["t1"].urls, vec!["a.png".to_string()]);
        assert_eq!(updates["t2"].status, GenerationStatus::IsLoading);
        assert_eq!(updates["t3"].status, GenerationStatus::Overtime);
    }

    #[test]
    fn test_poll_response_kind_selects_url_field() {
        let body = json!({
            "data": {
                "t1": {"status": "completed", "video_urls": ["v.mp4"], "message": ""}
            }
        });
        let updates = parse_poll_response(&body, GenerationKind::Video);
        assert_eq!(updates["t1"].urls, vec!["v.mp4".to_string()]);
        let as_images = parse_poll_response(&body, GenerationKind::Image);
        assert!(as_images["t1"].urls.is_empty());
    }

    #[test]
    fn test_outcome_terminal_states() {
        let update = |status, urls: Vec<&str>, message: &str| TaskUpdate {
            status,
            urls: urls.into_iter().map(String::from).collect(),
            message: message.to_string(),
        };
        assert_eq!(
            outcome_from_update(&update(GenerationStatus::Completed, vec!["u"], "")),
            Some(GenerationOutcome::Completed { urls: vec!["u".to_string()] })
        );
        assert_eq!(
            outcome_from_update(&update(GenerationStatus::Failed, vec![], "boom")),
            Some(GenerationOutcome::Failed { message: "boom".to_string() })
        );
        assert_eq!(
            outcome_from_update(&update(GenerationStatus::Overtime, vec![], "")),
            Some(GenerationOutcome::Overtime)
        );
        assert_eq!(outcome_from_update(&update(GenerationStatus::IsLoading, vec![], "")), None);
        // Completed with no URLs degrades to a failure, not a success.
        assert!(matches!(
            outcome_from_update(&update(GenerationStatus::Completed, vec![], "")),
            Some(GenerationOutcome::Failed { .. })
        ));
    }
}
