// Side-by-side comparison of selected players over selected z-score metrics:
// per-metric leaderboards (bar charts), radar polygons and an overall ranking.

use std::cmp::Ordering;
use std::f64::consts::PI;

use serde::Serialize;

use crate::error::AnalysisError;
use crate::zscore::{ZScoreRow, ZScoreTable};

/// A view of a [`ZScoreTable`] restricted to chosen players and metrics,
/// rows in selection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub metrics: Vec<&'static str>,
    pub rows: Vec<ZScoreRow>,
}

/// One entry of a ranking or leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub player_name: String,
    pub score: Option<f64>,
}

/// Closed polygon for one player on a radar chart. The first point is
/// repeated at the end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub player_name: String,
    pub angles: Vec<f64>,
    pub values: Vec<Option<f64>>,
}

/// Restrict `table` to `players` and `metrics`.
///
/// Errors with `EmptySelection` before touching the table when either list
/// is empty, and with `MissingInput` for a player or metric the table lacks.
/// Repeated players are kept once.
pub fn compare<P, M>(table: &ZScoreTable, players: &[P], metrics: &[M]) -> Result<Comparison, AnalysisError>
where
    P: AsRef<str>,
    M: AsRef<str>,
{
    if players.is_empty() {
        return Err(AnalysisError::EmptySelection { what: "players" });
    }
    if metrics.is_empty() {
        return Err(AnalysisError::EmptySelection { what: "metrics" });
    }

    let mut columns = Vec::with_capacity(metrics.len());
    for metric in metrics {
        let metric = metric.as_ref();
        let idx = table
            .metric_index(metric)
            .ok_or_else(|| AnalysisError::missing("metric", metric))?;
        columns.push((table.metrics[idx], idx));
    }

    let mut rows: Vec<ZScoreRow> = Vec::with_capacity(players.len());
    for player in players {
        let player = player.as_ref();
        if rows.iter().any(|r| r.player_name == player) {
            continue;
        }
        let row = table
            .row(player)
            .ok_or_else(|| AnalysisError::missing("player", player))?;
        rows.push(ZScoreRow {
            player_name: row.player_name.clone(),
            values: columns.iter().map(|(_, idx)| row.values[*idx]).collect(),
        });
    }

    Ok(Comparison {
        metrics: columns.into_iter().map(|(name, _)| name).collect(),
        rows,
    })
}

/// Descending by score, undefined scores last. Stable, so ties keep the
/// selection order.
fn rank(mut entries: Vec<RankedPlayer>) -> Vec<RankedPlayer> {
    entries.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    entries
}

impl Comparison {
    /// Selected players ordered by one metric's z-score.
    pub fn metric_leaderboard(&self, metric: &str) -> Result<Vec<RankedPlayer>, AnalysisError> {
        let idx = self
            .metrics
            .iter()
            .position(|m| *m == metric)
            .ok_or_else(|| AnalysisError::missing("metric", metric))?;
        Ok(self.leaderboard_at(idx))
    }

    fn leaderboard_at(&self, idx: usize) -> Vec<RankedPlayer> {
        rank(
            self.rows
                .iter()
                .map(|r| RankedPlayer {
                    player_name: r.player_name.clone(),
                    score: r.values[idx],
                })
                .collect(),
        )
    }

    /// Unweighted mean of each player's defined z-scores, best first.
    pub fn overall_ranking(&self) -> Vec<RankedPlayer> {
        rank(
            self.rows
                .iter()
                .map(|r| {
                    let defined: Vec<f64> = r.values.iter().flatten().copied().collect();
                    let score = (!defined.is_empty())
                        .then(|| defined.iter().sum::<f64>() / defined.len() as f64);
                    RankedPlayer {
                        player_name: r.player_name.clone(),
                        score,
                    }
                })
                .collect(),
        )
    }

    /// One closed polygon per player, metrics spread evenly around the circle.
    pub fn radar_series(&self) -> Vec<RadarSeries> {
        let n = self.metrics.len();
        let mut angles: Vec<f64> = (0..n).map(|k| 2.0 * PI * k as f64 / n as f64).collect();
        if let Some(first) = angles.first().copied() {
            angles.push(first);
        }
        self.rows
            .iter()
            .map(|r| {
                let mut values = r.values.clone();
                if let Some(first) = values.first().copied() {
                    values.push(first);
                }
                RadarSeries {
                    player_name: r.player_name.clone(),
                    angles: angles.clone(),
                    values,
                }
            })
            .collect()
    }
}

/// Everything the presentation layer draws for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub comparison: Comparison,
    /// One bar chart per metric, in metric order.
    pub leaderboards: Vec<Leaderboard>,
    pub radar: Vec<RadarSeries>,
    pub overall_ranking: Vec<RankedPlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub metric: &'static str,
    pub entries: Vec<RankedPlayer>,
}

impl ComparisonView {
    pub fn new(comparison: Comparison) -> Self {
        let leaderboards = comparison
            .metrics
            .iter()
            .enumerate()
            .map(|(idx, metric)| Leaderboard {
                metric: *metric,
                entries: comparison.leaderboard_at(idx),
            })
            .collect();
        let radar = comparison.radar_series();
        let overall_ranking = comparison.overall_ranking();
        ComparisonView {
            comparison,
            leaderboards,
            radar,
            overall_ranking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn table() -> ZScoreTable {
        ZScoreTable::from_columns(
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec![
                ("shots", vec![Some(1.0), Some(-1.0), Some(1.0), Some(-1.0)]),
                ("xg", vec![Some(0.5), Some(1.5), Some(-1.0), Some(-1.0)]),
                ("avg_time", vec![None, Some(1.0), None, None]),
            ],
        )
    }

    fn names(ranking: &[RankedPlayer]) -> Vec<&str> {
        ranking.iter().map(|r| r.player_name.as_str()).collect()
    }

    #[test]
    fn empty_players_or_metrics_short_circuit() {
        let t = table();
        let none: [&str; 0] = [];
        let err = compare(&t, &none, &["shots"]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySelection { what: "players" }));
        let err = compare(&t, &["A"], &none).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySelection { what: "metrics" }));

        // Empty selection is reported even against an empty table.
        let empty = ZScoreTable::from_columns(vec![], vec![]);
        assert!(matches!(
            compare(&empty, &none, &none),
            Err(AnalysisError::EmptySelection { .. })
        ));
    }

    #[test]
    fn unknown_player_or_metric_is_missing_input() {
        let t = table();
        assert!(matches!(
            compare(&t, &["Z"], &["shots"]),
            Err(AnalysisError::MissingInput { what: "player", .. })
        ));
        assert!(matches!(
            compare(&t, &["A"], &["passes"]),
            Err(AnalysisError::MissingInput { what: "metric", .. })
        ));
    }

    #[test]
    fn selection_order_and_columns() {
        let c = compare(&table(), &["C", "A", "C"], &["xg", "shots"]).unwrap();
        assert_eq!(c.metrics, vec!["xg", "shots"]);
        assert_eq!(c.rows.len(), 2);
        assert_eq!(c.rows[0].player_name, "C");
        assert_eq!(c.rows[0].values, vec![Some(-1.0), Some(1.0)]);
        assert_eq!(c.rows[1].values, vec![Some(0.5), Some(1.0)]);
    }

    #[test]
    fn overall_ranking_is_mean_descending_and_stable() {
        let c = compare(&table(), &["A", "B", "C", "D"], &["shots", "xg"]).unwrap();
        let ranking = c.overall_ranking();
        // A: 0.75, B: 0.25, C: 0.0, D: -1.0
        assert_eq!(names(&ranking), vec!["A", "B", "C", "D"]);
        assert!(approx_eq(ranking[0].score.unwrap(), 0.75, 1e-12));

        // Ties keep selection order.
        let c = compare(&table(), &["D", "B", "A"], &["shots"]).unwrap();
        assert_eq!(names(&c.overall_ranking()), vec!["A", "D", "B"]);
    }

    #[test]
    fn overall_ranking_skips_undefined_cells() {
        let c = compare(&table(), &["A", "B"], &["avg_time"]).unwrap();
        let ranking = c.overall_ranking();
        assert_eq!(names(&ranking), vec!["B", "A"]);
        assert_eq!(ranking[1].score, None);

        let c = compare(&table(), &["A", "B"], &["shots", "avg_time"]).unwrap();
        let ranking = c.overall_ranking();
        // A: mean of [1.0] ; B: mean of [-1.0, 1.0]
        assert_eq!(names(&ranking), vec!["A", "B"]);
        assert_eq!(ranking[0].score, Some(1.0));
        assert_eq!(ranking[1].score, Some(0.0));
    }

    #[test]
    fn leaderboard_per_metric() {
        let c = compare(&table(), &["A", "B", "C"], &["xg", "avg_time"]).unwrap();
        assert_eq!(names(&c.metric_leaderboard("xg").unwrap()), vec!["B", "A", "C"]);
        assert_eq!(names(&c.metric_leaderboard("avg_time").unwrap()), vec!["B", "A", "C"]);
        assert!(c.metric_leaderboard("shots").is_err());
    }

    #[test]
    fn view_bundles_every_chart() {
        let c = compare(&table(), &["A", "B"], &["shots", "xg"]).unwrap();
        let view = ComparisonView::new(c);
        assert_eq!(view.leaderboards.len(), 2);
        assert_eq!(view.leaderboards[1].metric, "xg");
        assert_eq!(names(&view.leaderboards[1].entries), vec!["B", "A"]);
        assert_eq!(view.radar.len(), 2);
        assert_eq!(names(&view.overall_ranking), vec!["A", "B"]);
    }

    #[test]
    fn radar_polygons_are_closed() {
        let c = compare(&table(), &["A"], &["shots", "xg", "avg_time"]).unwrap();
        let radar = c.radar_series();
        assert_eq!(radar.len(), 1);
        let r = &radar[0];
        assert_eq!(r.angles.len(), 4);
        assert_eq!(r.values.len(), 4);
        assert!(approx_eq(r.angles[1], 2.0 * PI / 3.0, 1e-12));
        assert_eq!(r.angles[3], r.angles[0]);
        assert_eq!(r.values, vec![Some(1.0), Some(0.5), None, Some(1.0)]);
    }
}
