//! Model lifecycle manager.
//!
//! The backend does not support in-place updates of a conversation model, so
//! "update" means delete-then-recreate under the same logical id. The backend
//! may silently assign a different id on create, most often when the prompt
//! payload is large enough to leave the fast path; that case is reported as a
//! consistency fault rather than adopted.
//!
//! Every retry loop here is bounded. The create response is authoritative:
//! failing to re-read the model afterwards is a warning, not a failure.

use std::time::Duration;

use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::search_client::{ConversationModel, ModelCreatePayload, SearchClient};

const MODEL_NAME: &str = "openai/gpt-4o";
const MAX_BYTES: u64 = 16384;
const HISTORY_COLLECTION: &str = "job_search_conversations";
const TTL_SECONDS: u64 = 86400;

// Tunable policy, not a backend contract. The backend documents no
// consistency guarantee; these bounds were chosen empirically.
const DELETE_CONFIRM_ATTEMPTS: u32 = 3;
const DELETE_CONFIRM_BASE_DELAY: Duration = Duration::from_millis(500);
const VERIFY_ATTEMPTS: u32 = 5;
const VERIFY_BASE_DELAY: Duration = Duration::from_millis(500);
/// Prompts above this size ride the backend's slow path; replication lag
/// grows with payload size.
const LARGE_PAYLOAD_BYTES: usize = 8192;
const LARGE_PAYLOAD_DELAY_FACTOR: u32 = 3;

/// Phases of one upsert operation. Terminal phases are `Verified`,
/// `CreatedUnverified`, `ConsistencyFault`, and `CreateFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Start,
    Absent,
    Creating,
    Created,
    Verifying,
    Verified,
    CreatedUnverified,
    ConsistencyFault,
    CreateFailed,
}

fn transition(phase: &mut LifecyclePhase, next: LifecyclePhase) {
    debug!("Model lifecycle: {phase:?} -> {next:?}");
    *phase = next;
}

/// Outcome of a successful upsert. `verified` is false when the model was
/// created but never became visible within the verification window.
#[derive(Debug, Serialize)]
pub struct UpsertReport {
    pub model: ConversationModel,
    pub verified: bool,
}

/// Fetches the current conversation model, or `None` when absent.
pub async fn get_model(
    search: &SearchClient,
    id: &str,
) -> Result<Option<ConversationModel>, AppError> {
    Ok(search.get_model(id).await?)
}

/// Backoff before visibility check `attempt` (1-based). Scales linearly with
/// the attempt number, and up by a fixed factor for large payloads.
fn verify_backoff(payload_bytes: usize, attempt: u32) -> Duration {
    let factor = if payload_bytes > LARGE_PAYLOAD_BYTES {
        LARGE_PAYLOAD_DELAY_FACTOR
    } else {
        1
    };
    VERIFY_BASE_DELAY * attempt * factor
}

/// Rejects a create response whose assigned id differs from the requested
/// logical id.
fn check_assigned_id(
    expected_id: &str,
    created: &ConversationModel,
    payload_bytes: usize,
) -> Result<(), AppError> {
    if created.id == expected_id {
        Ok(())
    } else {
        Err(AppError::Consistency {
            expected_id: expected_id.to_string(),
            actual_id: created.id.clone(),
            payload_bytes,
        })
    }
}

/// Replaces the conversation model under `id` with a fresh configuration
/// carrying `system_prompt`. Strictly sequential: delete, confirm absence,
/// create, verify.
pub async fn upsert_model(
    search: &SearchClient,
    id: &str,
    openai_api_key: &str,
    system_prompt: &str,
) -> Result<UpsertReport, AppError> {
    let mut phase = LifecyclePhase::Start;
    let payload_bytes = system_prompt.len();

    // Delete the existing model. 404 means it was already absent; any other
    // failure is logged and the create is still attempted, since remote
    // deletion may simply be lagging.
    match search.delete_model(id).await {
        Ok(existed) => debug!("Delete model '{id}': existed={existed}"),
        Err(e) => warn!("Delete model '{id}' warning: {e}"),
    }

    // Confirm the model is gone, retrying the delete a bounded number of
    // times. Best-effort only.
    for attempt in 1..=DELETE_CONFIRM_ATTEMPTS {
        match search.get_model(id).await {
            Ok(None) => break,
            Ok(Some(_)) => {
                warn!("Model '{id}' still visible after delete (attempt {attempt}), retrying");
                sleep(DELETE_CONFIRM_BASE_DELAY * attempt).await;
                if let Err(e) = search.delete_model(id).await {
                    warn!("Retry delete of model '{id}' failed: {e}");
                }
            }
            Err(e) => {
                warn!("Absence check for model '{id}' failed: {e}");
                break;
            }
        }
    }
    transition(&mut phase, LifecyclePhase::Absent);

    transition(&mut phase, LifecyclePhase::Creating);
    let payload = ModelCreatePayload {
        id,
        model_name: MODEL_NAME,
        api_key: openai_api_key,
        system_prompt,
        max_bytes: MAX_BYTES,
        history_collection: HISTORY_COLLECTION,
        ttl: TTL_SECONDS,
    };
    let created = match search.create_model(&payload).await {
        Ok(model) => model,
        Err(e) => {
            transition(&mut phase, LifecyclePhase::CreateFailed);
            return Err(e.into());
        }
    };
    transition(&mut phase, LifecyclePhase::Created);

    // The backend accepted the payload but may have assigned a different
    // identity. Report the fault and clean up the stray object rather than
    // silently adopting the new id.
    if let Err(fault) = check_assigned_id(id, &created, payload_bytes) {
        transition(&mut phase, LifecyclePhase::ConsistencyFault);
        if let Err(e) = search.delete_model(&created.id).await {
            warn!("Cleanup delete of mismatched model '{}' failed: {e}", created.id);
        }
        return Err(fault);
    }

    // Confirm the new model is externally visible. The create response is
    // authoritative, so exhausting the attempts only warns.
    transition(&mut phase, LifecyclePhase::Verifying);
    let mut verified = false;
    for attempt in 1..=VERIFY_ATTEMPTS {
        sleep(verify_backoff(payload_bytes, attempt)).await;
        match search.get_model(id).await {
            Ok(Some(_)) => {
                verified = true;
                break;
            }
            Ok(None) => debug!("Model '{id}' not yet visible (attempt {attempt})"),
            Err(e) => warn!("Visibility check for model '{id}' failed: {e}"),
        }
    }

    if verified {
        transition(&mut phase, LifecyclePhase::Verified);
    } else {
        transition(&mut phase, LifecyclePhase::CreatedUnverified);
        warn!(
            "Model '{id}' never became visible after create ({payload_bytes} byte prompt); \
             treating create response as authoritative"
        );
    }

    Ok(UpsertReport {
        model: created,
        verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str) -> ConversationModel {
        ConversationModel {
            id: id.to_string(),
            model_name: MODEL_NAME.to_string(),
            system_prompt: "You are helpful.".to_string(),
            max_bytes: MAX_BYTES,
            history_collection: Some(HISTORY_COLLECTION.to_string()),
            ttl: Some(TTL_SECONDS),
        }
    }

    #[test]
    fn test_matching_assigned_id_passes() {
        let created = model("assistant-1");
        assert!(check_assigned_id("assistant-1", &created, 100).is_ok());
    }

    #[test]
    fn test_mismatched_assigned_id_is_a_consistency_fault() {
        let created = model("a1b2-uuid");
        let err = check_assigned_id("assistant-1", &created, 20_000).unwrap_err();
        match err {
            AppError::Consistency {
                expected_id,
                actual_id,
                payload_bytes,
            } => {
                assert_eq!(expected_id, "assistant-1");
                assert_eq!(actual_id, "a1b2-uuid");
                assert_eq!(payload_bytes, 20_000);
            }
            other => panic!("expected Consistency, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_backoff_grows_with_attempts() {
        let first = verify_backoff(100, 1);
        let third = verify_backoff(100, 3);
        assert!(third > first);
    }

    #[test]
    fn test_verify_backoff_is_longer_for_large_payloads() {
        let small = verify_backoff(100, 1);
        let large = verify_backoff(LARGE_PAYLOAD_BYTES + 1, 1);
        assert_eq!(large, small * LARGE_PAYLOAD_DELAY_FACTOR);
    }

    #[test]
    fn test_verify_backoff_threshold_is_exclusive() {
        assert_eq!(
            verify_backoff(LARGE_PAYLOAD_BYTES, 2),
            verify_backoff(100, 2)
        );
    }

    #[test]
    fn test_transition_moves_phase_forward() {
        let mut phase = LifecyclePhase::Start;
        transition(&mut phase, LifecyclePhase::Creating);
        transition(&mut phase, LifecyclePhase::Created);
        assert_eq!(phase, LifecyclePhase::Created);
    }
}
