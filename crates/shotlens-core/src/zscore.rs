// Population z-scores with a zero-variance guard, and the named-column
// z-score table handed to the presentation layer.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single metric across a player pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero. Summing
/// identical floats can leave a residue far below this. A column whose real
/// spread is under the threshold is flattened to 0 as well, so it does not
/// come out with unit standard deviation.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator): the pool is every
/// player in the table, not a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is below `STDEV_EPSILON`.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Standardize a column that may contain undefined cells.
///
/// Pool stats come from the defined cells only; undefined cells stay
/// undefined.
pub fn zscore_column(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    let stats = compute_pool_stats(&defined);
    values
        .iter()
        .map(|v| v.map(|v| compute_zscore(v, &stats)))
        .collect()
}

/// Standardize a fully defined column, flattening it to 0 unless it holds at
/// least two distinct values.
pub fn zscore_column_distinct(values: &[f64]) -> Vec<f64> {
    if distinct_count(values) < 2 {
        return vec![0.0; values.len()];
    }
    let stats = compute_pool_stats(values);
    values.iter().map(|v| compute_zscore(*v, &stats)).collect()
}

fn distinct_count(values: &[f64]) -> usize {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

// ---------------------------------------------------------------------------
// Z-score table
// ---------------------------------------------------------------------------

/// One player's standardized values, aligned with [`ZScoreTable::metrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreRow {
    pub player_name: String,
    pub values: Vec<Option<f64>>,
}

/// Players by metrics, every cell a z-score (or undefined).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreTable {
    pub metrics: Vec<&'static str>,
    pub rows: Vec<ZScoreRow>,
}

impl ZScoreTable {
    /// Assemble a table from per-metric columns. Every column must have one
    /// cell per player.
    pub fn from_columns(
        players: Vec<String>,
        columns: Vec<(&'static str, Vec<Option<f64>>)>,
    ) -> Self {
        debug_assert!(columns.iter().all(|(_, c)| c.len() == players.len()));
        let metrics = columns.iter().map(|(name, _)| *name).collect();
        let rows = players
            .into_iter()
            .enumerate()
            .map(|(i, player_name)| ZScoreRow {
                player_name,
                values: columns.iter().map(|(_, c)| c[i]).collect(),
            })
            .collect();
        ZScoreTable { metrics, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| *m == metric)
    }

    pub fn row(&self, player: &str) -> Option<&ZScoreRow> {
        self.rows.iter().find(|r| r.player_name == player)
    }

    /// Single cell lookup; `None` when the player or metric is unknown or
    /// the cell is undefined.
    pub fn get(&self, player: &str, metric: &str) -> Option<f64> {
        let idx = self.metric_index(metric)?;
        self.row(player)?.values[idx]
    }

    /// All cells of one metric, in row order.
    pub fn column(&self, metric: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.metric_index(metric)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
