//! 接続グラフ（誰と誰がつながっているか）
//!
//! セッション内の無向グラフを隣接リストで保持する。
//! 追加・削除は常に両方向に対して行うため、
//! `b ∈ adjacency[a] ⟺ a ∈ adjacency[b]` が常に成り立つ。

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{ClientId, Participant};

/// toggle の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Connected,
    Disconnected,
}

/// 対称な隣接リスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConnectionGraph {
    adjacency: BTreeMap<ClientId, BTreeSet<ClientId>>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空の隣接集合を用意する（既にあれば何もしない）
    pub fn ensure(&mut self, id: &ClientId) {
        self.adjacency.entry(id.clone()).or_default();
    }

    /// `source` と `target` の接続を切り替える
    ///
    /// どちらの端点も、隣接集合がなければ空で作成される。
    /// 自己ループの拒否は呼び出し側の責務。
    pub fn toggle(&mut self, source: &ClientId, target: &ClientId) -> Toggle {
        self.ensure(source);
        self.ensure(target);

        let connected = self
            .adjacency
            .get(source)
            .is_some_and(|neighbors| neighbors.contains(target));

        if connected {
            self.unlink(source, target);
            self.unlink(target, source);
            Toggle::Disconnected
        } else {
            self.link(source, target);
            self.link(target, source);
            Toggle::Connected
        }
    }

    fn link(&mut self, from: &ClientId, to: &ClientId) {
        self.adjacency
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
    }

    fn unlink(&mut self, from: &ClientId, to: &ClientId) {
        if let Some(neighbors) = self.adjacency.get_mut(from) {
            neighbors.remove(to);
        }
    }

    /// ノードを完全に削除する（自身のキーと、他の全ノードの隣接集合から）
    ///
    /// 存在しないノードに対しては何もしない。
    pub fn remove(&mut self, id: &ClientId) -> bool {
        let existed = self.adjacency.remove(id).is_some();
        let mut referenced = false;
        for neighbors in self.adjacency.values_mut() {
            referenced |= neighbors.remove(id);
        }
        existed || referenced
    }

    pub fn contains_node(&self, id: &ClientId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn are_connected(&self, a: &ClientId, b: &ClientId) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(b))
    }

    pub fn neighbors(&self, id: &ClientId) -> impl Iterator<Item = &ClientId> {
        self.adjacency.get(id).into_iter().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClientId, &BTreeSet<ClientId>)> {
        self.adjacency.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
    }

    /// 対称性の検査
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(a, neighbors)| {
            neighbors.iter().all(|b| {
                self.adjacency
                    .get(b)
                    .is_some_and(|reverse| reverse.contains(a))
            })
        })
    }

    /// 参加者（ロスター）に限定した統合度の統計を計算する
    pub fn statistics(&self, participants: &[Participant]) -> IntegrationStatistics {
        let total = participants.len();
        let possible_connections = total * total.saturating_sub(1) / 2;

        let roster: BTreeSet<&ClientId> = participants.iter().map(|p| &p.id).collect();

        let mut degree_sum = 0;
        let mut per_participant: Vec<ParticipantIntegration> = participants
            .iter()
            .map(|participant| {
                let connections = self
                    .neighbors(&participant.id)
                    .filter(|neighbor| roster.contains(neighbor))
                    .count();
                degree_sum += connections;
                let integration_rate = if total > 1 {
                    connections as f64 / (total - 1) as f64 * 100.0
                } else {
                    0.0
                };
                ParticipantIntegration {
                    id: participant.id.clone(),
                    name: participant.name.as_str().to_string(),
                    connections,
                    integration_rate,
                    level: IntegrationLevel::from_rate(integration_rate),
                }
            })
            .collect();

        // 無向グラフなので各接続は 2 回数えられている
        let actual_connections = degree_sum / 2;
        let team_integration_rate = if possible_connections > 0 {
            actual_connections as f64 / possible_connections as f64 * 100.0
        } else {
            0.0
        };

        // 安定ソート: 同率ならロスター順
        per_participant.sort_by(|a, b| b.integration_rate.total_cmp(&a.integration_rate));

        IntegrationStatistics {
            participant_count: total,
            possible_connections,
            actual_connections,
            team_integration_rate,
            team_level: IntegrationLevel::from_rate(team_integration_rate),
            participants: per_participant,
        }
    }
}

/// 統合度の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegrationLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl IntegrationLevel {
    pub fn from_rate(rate: f64) -> Self {
        match rate {
            r if r >= 80.0 => IntegrationLevel::VeryHigh,
            r if r >= 60.0 => IntegrationLevel::High,
            r if r >= 40.0 => IntegrationLevel::Medium,
            r if r >= 20.0 => IntegrationLevel::Low,
            _ => IntegrationLevel::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationLevel::VeryLow => "veryLow",
            IntegrationLevel::Low => "low",
            IntegrationLevel::Medium => "medium",
            IntegrationLevel::High => "high",
            IntegrationLevel::VeryHigh => "veryHigh",
        }
    }
}

/// 参加者ごとの統合度
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantIntegration {
    pub id: ClientId,
    pub name: String,
    pub connections: usize,
    pub integration_rate: f64,
    pub level: IntegrationLevel,
}

/// セッション全体の統合度
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatistics {
    pub participant_count: usize,
    pub possible_connections: usize,
    pub actual_connections: usize,
    pub team_integration_rate: f64,
    pub team_level: IntegrationLevel,
    /// 統合度の高い順
    pub participants: Vec<ParticipantIntegration>,
}
