// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Creative Work Attribution
//!
//! Tracks who contributed to a creative work, human or AI, and summarises it
//! in a [`CreativePassport`] once the work is finalized.
//!
//! | Type | Description |
//! |------|-------------|
//! | `CreativeContribution` | One timestamped piece of content, tagged human or AI |
//! | `CreativeWork` | Ordered contributions; the first is always the owner's concept |
//! | `AttributionPolicy` | Maximum AI share, minimum human share, flagged terms |
//! | `CreativePassport` | Immutable summary issued by [`CreativeWork::finalize`] |
//!
//! Shares are contribution counts, not content length. A passport is only
//! issued while the human share is at least [`MIN_HUMAN_SHARE`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

pub const MAX_AI_SHARE: f64 = 0.3;
pub const MIN_HUMAN_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionType {
    Human,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Draft,
    /// Passport issued
    Reviewing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeContribution {
    pub id: Uuid,
    pub contributor_id: String,
    pub contribution_type: ContributionType,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl CreativeContribution {
    pub fn new(
        contributor_id: impl Into<String>,
        contribution_type: ContributionType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contributor_id: contributor_id.into(),
            contribution_type,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativePassport {
    pub unique_identifier: Uuid,
    pub title: String,
    pub owner_id: String,
    pub content_type: String,
    pub creation_timestamp: DateTime<Utc>,
    pub last_updated_timestamp: DateTime<Utc>,
    /// Human contributions / all contributions, in `[0, 1]`
    pub human_contribution_percentage: f64,
    pub originality_score: f64,
    pub contributor_count: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum AttributionError {
    #[error("AI share {share:.2} exceeds the limit of {limit:.2}")]
    ExcessiveAi { share: f64, limit: f64 },

    #[error("contribution contains flagged term '{term}'")]
    FlaggedContent { term: String },

    #[error("originality score {0} must be within [0, 1]")]
    InvalidOriginality(f64),

    #[error("human share {share:.2} is below the required {required:.2}")]
    InsufficientHuman { share: f64, required: f64 },

    #[error("work has no contributions")]
    NoContributions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeWork {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    /// Free-form: "book", "course", "video", ...
    pub content_type: String,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub contributions: Vec<CreativeContribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport: Option<CreativePassport>,
}

impl CreativeWork {
    /// Start a draft whose first contribution is the owner's concept.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        content_type: impl Into<String>,
        initial_concept: impl Into<String>,
    ) -> Self {
        let owner_id = owner_id.into();
        let now = Utc::now();
        let mut work = Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.clone(),
            title: title.into(),
            content_type: content_type.into(),
            status: WorkStatus::Draft,
            created_at: now,
            updated_at: now,
            contributions: Vec::new(),
            passport: None,
        };
        work.add_contribution(CreativeContribution::new(
            owner_id,
            ContributionType::Human,
            initial_concept,
        ));
        work
    }

    pub fn add_contribution(&mut self, contribution: CreativeContribution) {
        self.contributions.push(contribution);
        self.updated_at = Utc::now();
    }

    /// Add an AI contribution unless it would push the AI share past the
    /// policy limit. The work is left untouched on rejection.
    pub fn add_ai_contribution(
        &mut self,
        contributor_id: impl Into<String>,
        content: impl Into<String>,
        policy: &AttributionPolicy,
    ) -> Result<(), AttributionError> {
        let ai = self.count_of(ContributionType::Ai) + 1;
        let share = ai as f64 / (self.contributions.len() + 1) as f64;
        if share > policy.max_ai_share {
            return Err(AttributionError::ExcessiveAi {
                share,
                limit: policy.max_ai_share,
            });
        }
        self.add_contribution(CreativeContribution::new(
            contributor_id,
            ContributionType::Ai,
            content,
        ));
        Ok(())
    }

    fn count_of(&self, kind: ContributionType) -> usize {
        self.contributions
            .iter()
            .filter(|c| c.contribution_type == kind)
            .count()
    }

    fn share_of(&self, kind: ContributionType) -> f64 {
        if self.contributions.is_empty() {
            return 0.0;
        }
        self.count_of(kind) as f64 / self.contributions.len() as f64
    }

    pub fn human_share(&self) -> f64 {
        self.share_of(ContributionType::Human)
    }

    pub fn ai_share(&self) -> f64 {
        self.share_of(ContributionType::Ai)
    }

    pub fn contributor_count(&self) -> usize {
        self.contributions
            .iter()
            .map(|c| c.contributor_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Issue the passport and move the work into review.
    pub fn finalize(
        &mut self,
        originality_score: f64,
        policy: &AttributionPolicy,
    ) -> Result<&CreativePassport, AttributionError> {
        if !(0.0..=1.0).contains(&originality_score) {
            return Err(AttributionError::InvalidOriginality(originality_score));
        }
        if self.contributions.is_empty() {
            return Err(AttributionError::NoContributions);
        }
        let share = self.human_share();
        if share < policy.min_human_share {
            return Err(AttributionError::InsufficientHuman {
                share,
                required: policy.min_human_share,
            });
        }

        let passport = CreativePassport {
            unique_identifier: self.id,
            title: self.title.clone(),
            owner_id: self.owner_id.clone(),
            content_type: self.content_type.clone(),
            creation_timestamp: self.created_at,
            last_updated_timestamp: self.updated_at,
            human_contribution_percentage: share,
            originality_score,
            contributor_count: self.contributor_count(),
        };
        self.status = WorkStatus::Reviewing;
        let passport: &CreativePassport = self.passport.insert(passport);
        Ok(passport)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionPolicy {
    pub max_ai_share: f64,
    #[serde(default = "default_min_human_share")]
    pub min_human_share: f64,
    pub flagged_terms: Vec<String>,
}

fn default_min_human_share() -> f64 {
    MIN_HUMAN_SHARE
}

impl Default for AttributionPolicy {
    fn default() -> Self {
        Self {
            max_ai_share: MAX_AI_SHARE,
            min_human_share: MIN_HUMAN_SHARE,
            flagged_terms: ["harmful", "offensive", "illegal", "discriminatory"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl AttributionPolicy {
    pub fn check(&self, work: &CreativeWork) -> Result<(), AttributionError> {
        let share = work.ai_share();
        if share > self.max_ai_share {
            return Err(AttributionError::ExcessiveAi {
                share,
                limit: self.max_ai_share,
            });
        }

        for contribution in &work.contributions {
            let content = contribution.content.to_lowercase();
            if let Some(term) = self
                .flagged_terms
                .iter()
                .find(|t| content.contains(&t.to_lowercase()))
            {
                return Err(AttributionError::FlaggedContent { term: term.clone() });
            }
        }

        Ok(())
    }
}
