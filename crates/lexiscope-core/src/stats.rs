//! Derived statistics: sentiment classification, aggregates and pagination.
//!
//! Everything here is recomputed from normalized records on each fetch.

use serde::Serialize;

use crate::defaults::{SENTIMENT_NEGATIVE_THRESHOLD, SENTIMENT_POSITIVE_THRESHOLD};
use crate::models::{ActorSentiment, AggregateStat, VictimSentiment};

/// Three-way sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Bucket a compound score. Both thresholds are inclusive.
pub fn classify_sentiment(score: f64) -> SentimentLabel {
    if score >= SENTIMENT_POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score <= SENTIMENT_NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Arithmetic mean of `scores`, or `None` for an empty set.
pub fn mean_score(scores: &[f64]) -> Option<AggregateStat> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().sum();
    Some(AggregateStat {
        mean: sum / scores.len() as f64,
        count: scores.len() as u64,
    })
}

/// Corpus-wide mean victim-context sentiment.
pub fn mean_victim_sentiment(victims: &[VictimSentiment]) -> Option<AggregateStat> {
    let scores: Vec<f64> = victims.iter().map(|v| v.score).collect();
    mean_score(&scores)
}

/// Sum of actor occurrence counts.
pub fn total_actor_occurrences(actors: &[ActorSentiment]) -> u64 {
    actors.iter().map(|a| a.occurrences).sum()
}

/// How many records fall into each sentiment bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl LabelCounts {
    pub fn tally(labels: impl IntoIterator<Item = SentimentLabel>) -> Self {
        labels.into_iter().fold(Self::default(), |mut acc, label| {
            match label {
                SentimentLabel::Positive => acc.positive += 1,
                SentimentLabel::Negative => acc.negative += 1,
                SentimentLabel::Neutral => acc.neutral += 1,
            }
            acc
        })
    }
}

/// Pagination over a total count with 1-based pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub total: u64,
    pub per_page: u64,
    pub page: u64,
}

impl PageWindow {
    /// First page of an as-yet unknown total. `per_page` is clamped to at least 1.
    pub fn first(per_page: u64) -> Self {
        Self {
            total: 0,
            per_page: per_page.max(1),
            page: 1,
        }
    }

    /// `max(1, ceil(total / per_page))`.
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page.max(1)).max(1)
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.per_page) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Same window positioned on `page` (clamped to at least 1).
    pub fn at(self, page: u64) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Same position with a freshly reported total.
    pub fn with_total(self, total: u64) -> Self {
        Self { total, ..self }
    }

    pub fn next(self) -> Option<Self> {
        self.has_next().then(|| self.at(self.page.saturating_add(1)))
    }

    pub fn previous(self) -> Option<Self> {
        self.has_previous().then(|| self.at(self.page - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify_sentiment(0.05), SentimentLabel::Positive);
        assert_eq!(classify_sentiment(-0.05), SentimentLabel::Negative);
        assert_eq!(classify_sentiment(0.0), SentimentLabel::Neutral);
        assert_eq!(classify_sentiment(0.049999), SentimentLabel::Neutral);
        assert_eq!(classify_sentiment(-0.049999), SentimentLabel::Neutral);
        assert_eq!(classify_sentiment(0.9), SentimentLabel::Positive);
        assert_eq!(classify_sentiment(-0.9), SentimentLabel::Negative);
    }

    #[test]
    fn test_mean_of_victim_scores() {
        let stat = mean_score(&[0.2, -0.4, 0.0]).unwrap();
        assert!((stat.mean - (-0.0667)).abs() < 1e-3);
        assert_eq!(stat.count, 3);
    }

    #[test]
    fn test_mean_guarded_when_empty() {
        assert!(mean_score(&[]).is_none());
        assert!(mean_victim_sentiment(&[]).is_none());
    }

    #[test]
    fn test_mean_victim_sentiment_uses_resolved_scores() {
        let victims = vec![
            VictimSentiment {
                doc_id: "a".into(),
                context_text: "x".into(),
                score: 0.5,
            },
            VictimSentiment {
                doc_id: "b".into(),
                context_text: "y".into(),
                score: -0.1,
            },
        ];
        let stat = mean_victim_sentiment(&victims).unwrap();
        assert!((stat.mean - 0.2).abs() < 1e-9);
        assert_eq!(stat.count, 2);
    }

    #[test]
    fn test_total_actor_occurrences() {
        let actors = vec![
            ActorSentiment {
                actor: "israel".into(),
                mean_score: -0.2,
                occurrences: 12,
            },
            ActorSentiment {
                actor: "hamas".into(),
                mean_score: -0.4,
                occurrences: 1,
            },
        ];
        assert_eq!(total_actor_occurrences(&actors), 13);
        assert_eq!(total_actor_occurrences(&[]), 0);
    }

    #[test]
    fn test_label_tally() {
        let counts = LabelCounts::tally(
            [0.2, -0.4, 0.0, 0.05].into_iter().map(classify_sentiment),
        );
        assert_eq!(
            counts,
            LabelCounts {
                positive: 2,
                negative: 1,
                neutral: 1
            }
        );
        assert_eq!(LabelCounts::tally([]), LabelCounts::default());
    }

    #[test]
    fn test_pagination_boundaries() {
        let window = PageWindow::first(20).with_total(45);
        assert_eq!(window.last_page(), 3);
        assert!(!window.has_previous());
        assert!(window.has_next());

        let last = window.at(3);
        assert_eq!(last.page * last.per_page, 60);
        assert!(!last.has_next());
        assert!(last.next().is_none());
        assert_eq!(last.offset(), 40);
    }

    #[test]
    fn test_pagination_empty_total_has_one_page() {
        let window = PageWindow::first(20);
        assert_eq!(window.last_page(), 1);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn test_pagination_exact_multiple() {
        let window = PageWindow::first(20).with_total(40).at(2);
        assert_eq!(window.last_page(), 2);
        assert!(!window.has_next());
        assert_eq!(window.previous().unwrap().page, 1);
    }

    #[test]
    fn test_pagination_zero_page_size_and_page() {
        let window = PageWindow::first(0).with_total(5).at(4);
        assert_eq!(window.per_page, 1);
        assert_eq!(window.at(0).page, 1);
    }

    #[test]
    fn test_pagination_huge_page_saturates() {
        let window = PageWindow::first(20).at(u64::MAX);
        assert_eq!(window.offset(), u64::MAX);
        assert!(!window.has_next());
        assert!(window.next().is_none());

        let window = PageWindow::first(20).with_total(u64::MAX).at(u64::MAX / 2);
        assert_eq!(window.offset(), u64::MAX);
        assert!(!window.has_next());
        assert!(window.has_previous());
    }
}
