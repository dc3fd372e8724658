//! Leaderboard
//!
//! Scores are a name, a gold total and the level label reached. The
//! service trait has two implementations: an in-memory mock used by the
//! game (and by tests), and a blocking JSON-over-HTTP client for a real
//! endpoint on native builds. Neither can affect simulation state; a
//! transport failure just means the score screen shows nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many rows the score screens show
pub const TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub gold: u32,
    pub level: String,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait ScoreService {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), LeaderboardError>;
    fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, LeaderboardError>;
}

/// In-memory leaderboard seeded with a few canned rows, kept sorted by
/// gold descending.
pub struct MockLeaderboard {
    scores: Vec<ScoreRecord>,
}

impl MockLeaderboard {
    pub fn new() -> Self {
        let seed = [
            ("Cave Dweller", 7200, "3-2"),
            ("Gold Hunter", 5400, "2-3"),
            ("First Timer", 900, "1-2"),
        ];
        Self {
            scores: seed
                .into_iter()
                .map(|(name, gold, level)| ScoreRecord {
                    name: name.to_string(),
                    gold,
                    level: level.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for MockLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreService for MockLeaderboard {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), LeaderboardError> {
        self.scores.push(record);
        self.scores.sort_by(|a, b| b.gold.cmp(&a.gold));
        Ok(())
    }

    fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        Ok(self.scores.iter().take(n).cloned().collect())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpLeaderboard;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use super::{LeaderboardError, ScoreRecord, ScoreService};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct ScoresResponse {
        scores: Vec<ScoreRecord>,
    }

    /// Blocking client against a scores endpoint:
    /// POST submits a record, GET returns the top list.
    pub struct HttpLeaderboard {
        endpoint: String,
        agent: ureq::Agent,
    }

    impl HttpLeaderboard {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
                agent: ureq::AgentBuilder::new()
                    .timeout(std::time::Duration::from_secs(4))
                    .build(),
            }
        }
    }

    impl ScoreService for HttpLeaderboard {
        fn submit(&mut self, record: ScoreRecord) -> Result<(), LeaderboardError> {
            self.agent
                .post(&self.endpoint)
                .send_json(serde_json::to_value(&record)?)
                .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
            Ok(())
        }

        fn top(&self, n: usize) -> Result<Vec<ScoreRecord>, LeaderboardError> {
            let response: ScoresResponse = self
                .agent
                .get(&self.endpoint)
                .call()
                .map_err(|e| LeaderboardError::Transport(e.to_string()))?
                .into_json()
                .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
            Ok(response.scores.into_iter().take(n).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_keeps_scores_sorted() {
        let mut board = MockLeaderboard::new();
        board
            .submit(ScoreRecord {
                name: "Topo".into(),
                gold: 9000,
                level: "4-1".into(),
            })
            .unwrap();
        let top = board.top(TOP_N).unwrap();
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].name, "Topo");
        assert!(top.windows(2).all(|w| w[0].gold >= w[1].gold));
    }

    #[test]
    fn test_top_is_bounded() {
        let board = MockLeaderboard::new();
        assert_eq!(board.top(2).unwrap().len(), 2);
        assert_eq!(board.top(100).unwrap().len(), 3);
    }

    #[test]
    fn test_record_json_shape() {
        let record = ScoreRecord {
            name: "Topo".into(),
            gold: 1200,
            level: "2-1".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"gold\":1200"));
        let back: ScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
