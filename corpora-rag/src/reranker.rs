//! A reranker is an external collaborator (spec §1 "out of scope"): this
//! crate only defines the contract `search_documents`'s optional `rerank`
//! flag calls through. Candidates keep their original order on a tie so a
//! reranker that declines to move anything is observably a no-op.

use async_trait::async_trait;
use corpora_core::CoreError;

/// One candidate passage handed to the reranker, identified by its position
/// in the input slice rather than by document/chunk id — the reranker only
/// ever reorders, it never looks anything up.
#[derive(Debug, Clone)]
pub struct RerankCandidate {
    pub index: usize,
    pub content: String,
}

/// A reranked candidate: the original `index` plus a new relevance score.
#[derive(Debug, Clone)]
pub struct RerankedResult {
    pub index: usize,
    pub score: f32,
}

#[async_trait]
pub trait Reranker: Send + Sync {
    /// Re-score `candidates` against `query`, returned in descending
    /// relevance order. Implementations are not required to return every
    /// candidate; callers should treat a missing index as unranked.
    async fn rerank(
        &self,
        query: &str,
        candidates: &[RerankCandidate],
    ) -> Result<Vec<RerankedResult>, CoreError>;
}

/// Test/dev stand-in: preserves input order and echoes a monotonically
/// decreasing score, so wiring `rerank: true` through without a live
/// reranker configured stays a well-defined no-op rather than an error.
pub struct IdentityReranker;

#[async_trait]
impl Reranker for IdentityReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: &[RerankCandidate],
    ) -> Result<Vec<RerankedResult>, CoreError> {
        let n = candidates.len().max(1) as f32;
        Ok(candidates
            .iter()
            .enumerate()
            .map(|(i, c)| RerankedResult {
                index: c.index,
                score: (n - i as f32) / n,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identity_reranker_preserves_order() {
        let candidates = vec![
            RerankCandidate { index: 0, content: "a".into() },
            RerankCandidate { index: 1, content: "b".into() },
        ];
        let reranked = IdentityReranker.rerank("q", &candidates).await.unwrap();
        assert_eq!(reranked[0].index, 0);
        assert_eq!(reranked[1].index, 1);
        assert!(reranked[0].score > reranked[1].score);
    }
}
