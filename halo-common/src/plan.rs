//! Reading plan derivation
//!
//! Derives "today's plan" from the canonical chapter order: skip everything
//! already marked read, take the first `goal` chapters. Pure functions of
//! `(progress, goal)` with no hidden state.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::progress::ProgressMap;

/// Daily goal bounds (chapters per day)
pub const MIN_DAILY_GOAL: u32 = 1;
pub const MAX_DAILY_GOAL: u32 = 6;

/// One chapter drawn from the canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub book: String,
    pub chapter: u32,
}

/// Clamp a requested daily goal into the supported range
pub fn clamp_goal(goal: u32) -> u32 {
    goal.clamp(MIN_DAILY_GOAL, MAX_DAILY_GOAL)
}

/// First `goal` unread chapters in canonical order
///
/// Returns fewer than `goal` items (possibly none) when the remaining
/// unread chapters run out.
pub fn next_unread(progress: &ProgressMap, goal: u32) -> Vec<PlanItem> {
    let goal = clamp_goal(goal) as usize;
    catalog::canonical_order()
        .iter()
        .filter(|(book, chapter)| !progress.is_read(book, *chapter))
        .take(goal)
        .map(|(book, chapter)| PlanItem {
            book: (*book).to_string(),
            chapter: *chapter,
        })
        .collect()
}

/// Chapters not yet marked read, across the whole catalog
pub fn unread_count(progress: &ProgressMap) -> u32 {
    catalog::total_chapters().saturating_sub(progress.completed_count())
}

/// Mark every item of a plan read (idempotent per item)
pub fn mark_read(progress: &mut ProgressMap, items: &[PlanItem]) {
    for item in items {
        progress.insert(&item.book, item.chapter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_progress_starts_at_genesis() {
        let progress = ProgressMap::new();
        let plan = next_unread(&progress, 2);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].book, "Genesis");
        assert_eq!(plan[0].chapter, 1);
        assert_eq!(plan[1].book, "Genesis");
        assert_eq!(plan[1].chapter, 2);
    }

    #[test]
    fn test_plan_skips_read_chapters() {
        let mut progress = ProgressMap::new();
        progress.insert("Genesis", 1);
        progress.insert("Genesis", 3);

        let plan = next_unread(&progress, 3);
        let refs: Vec<(&str, u32)> = plan.iter().map(|p| (p.book.as_str(), p.chapter)).collect();
        assert_eq!(refs, vec![("Genesis", 2), ("Genesis", 4), ("Genesis", 5)]);
        assert!(plan.iter().all(|p| !progress.is_read(&p.book, p.chapter)));
    }

    #[test]
    fn test_goal_is_clamped() {
        let progress = ProgressMap::new();
        assert_eq!(next_unread(&progress, 0).len(), 1);
        assert_eq!(next_unread(&progress, 100).len(), 6);
    }

    #[test]
    fn test_plan_length_when_nearly_done() {
        let mut progress = ProgressMap::new();
        for (book, chapter) in crate::catalog::canonical_order() {
            progress.insert(book, *chapter);
        }
        assert!(next_unread(&progress, 3).is_empty());
        assert_eq!(unread_count(&progress), 0);

        // Reopen exactly one chapter
        progress.toggle("Revelation", 22);
        let plan = next_unread(&progress, 3);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].book, "Revelation");
        assert_eq!(plan[0].chapter, 22);
        assert_eq!(unread_count(&progress), 1);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut progress = ProgressMap::new();
        let plan = next_unread(&progress, 2);
        mark_read(&mut progress, &plan);
        assert_eq!(progress.completed_count(), 2);
        mark_read(&mut progress, &plan);
        assert_eq!(progress.completed_count(), 2);
    }

    #[test]
    fn test_plan_crosses_book_boundary() {
        let mut progress = ProgressMap::new();
        for chapter in 1..=49 {
            progress.insert("Genesis", chapter);
        }
        let plan = next_unread(&progress, 2);
        let refs: Vec<(&str, u32)> = plan.iter().map(|p| (p.book.as_str(), p.chapter)).collect();
        assert_eq!(refs, vec![("Genesis", 50), ("Exodus", 1)]);
    }
}
