use crate::scorer::Scoreboard;
use crate::DocId;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Best-first order: higher score, then lower document id.
fn rank_order(a: &ScoredDoc, b: &ScoredDoc) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// The `k` best documents of a scoreboard, best first.
pub fn rank(scores: Scoreboard, k: usize) -> Vec<ScoredDoc> {
    let mut ranked: Vec<ScoredDoc> = scores
        .into_iter()
        .map(|(doc_id, score)| ScoredDoc { doc_id, score })
        .collect();
    ranked.sort_unstable_by(rank_order);
    ranked.truncate(k);
    ranked
}

/// Space-separated document ids; empty when nothing matched.
pub fn format_result_line(ranked: &[ScoredDoc]) -> String {
    ranked.iter().map(|d| d.doc_id.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(entries: &[(DocId, f64)]) -> Scoreboard {
        entries.iter().copied().collect()
    }

    #[test]
    fn sorts_by_score_then_id() {
        let ranked = rank(board(&[(9, 0.2), (4, 0.7), (2, 0.2), (7, 0.9)]), 10);
        let ids: Vec<DocId> = ranked.iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![7, 4, 2, 9]);
    }

    #[test]
    fn truncates_to_k() {
        let entries: Vec<(DocId, f64)> = (1..=25).map(|id| (id, id as f64)).collect();
        let ranked = rank(board(&entries), 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].doc_id, 25);
        assert_eq!(ranked[9].doc_id, 16);
    }

    #[test]
    fn ties_resolve_identically_every_time() {
        let entries: Vec<(DocId, f64)> = (1..=50).rev().map(|id| (id, 0.5)).collect();
        let first = format_result_line(&rank(board(&entries), 10));
        for _ in 0..5 {
            assert_eq!(format_result_line(&rank(board(&entries), 10)), first);
        }
        assert_eq!(first, "1 2 3 4 5 6 7 8 9 10");
    }

    #[test]
    fn empty_scoreboard_gives_empty_line() {
        assert_eq!(format_result_line(&rank(Scoreboard::new(), 10)), "");
    }
}
