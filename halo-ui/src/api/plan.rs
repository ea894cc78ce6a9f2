//! Reading plan endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use halo_common::plan::{self, PlanItem};

use crate::error::ApiResult;
use crate::store::ProgressSummary;
use crate::AppState;

/// Today's plan
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub goal: u32,
    /// Unread chapters remaining across the whole catalog
    pub unread: u32,
    /// First `goal` unread chapters in canonical order (may be empty)
    pub plan: Vec<PlanItem>,
}

/// Result of marking the plan read
#[derive(Debug, Serialize)]
pub struct PlanCompleteResponse {
    pub marked: Vec<PlanItem>,
    pub summary: ProgressSummary,
    /// The next plan after completion
    pub plan: Vec<PlanItem>,
}

fn current_plan(state: &AppState) -> PlanResponse {
    let progress = state.store.progress();
    let goal = state.store.daily_goal();
    PlanResponse {
        goal,
        unread: plan::unread_count(&progress),
        plan: plan::next_unread(&progress, goal),
    }
}

/// GET /api/plan
pub async fn get_plan(State(state): State<AppState>) -> Json<PlanResponse> {
    Json(current_plan(&state))
}

/// POST /api/plan/complete
///
/// Marks every chapter of today's plan read. Idempotent: completing an
/// empty plan marks nothing.
pub async fn complete_plan(State(state): State<AppState>) -> ApiResult<Json<PlanCompleteResponse>> {
    let progress = state.store.progress();
    let items = plan::next_unread(&progress, state.store.daily_goal());

    if !items.is_empty() {
        state.store.mark_read(&items)?;
        let summary = state.store.summary();
        state
            .session
            .notify_progress(summary.completed, summary.percent);
    }

    let next = current_plan(&state);
    Ok(Json(PlanCompleteResponse {
        marked: items,
        summary: state.store.summary(),
        plan: next.plan,
    }))
}
