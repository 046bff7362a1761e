// Plain-text and JSON rendering of a match analysis.

use std::fmt::{self, Write};

use shotlens_core::comparison::ComparisonView;
use shotlens_core::pipeline::MatchAnalysis;
use shotlens_core::zscore::ZScoreTable;

use crate::config::{ReportConfig, ReportFormat};

/// Render in the configured format.
pub fn render(analysis: &MatchAnalysis, config: &ReportConfig) -> anyhow::Result<String> {
    Ok(match config.format {
        ReportFormat::Text => render_text(analysis, config.decimals)?,
        ReportFormat::Json => render_json(analysis)?,
    })
}

pub fn render_json(analysis: &MatchAnalysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(analysis)
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Number with `decimals` places, `-` when undefined.
pub fn cell(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".into(),
    }
}

fn opt_str(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{:<w$}", c.as_ref()))
        .collect();
    writeln!(out, "  {}", padded.join("  ").trim_end())
}

/// Left-aligned columns sized to their widest cell.
fn write_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }
    write_row(out, headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths)?;
    for row in rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_zscores(out: &mut String, table: &ZScoreTable, decimals: usize) -> fmt::Result {
    let mut headers = vec!["player"];
    headers.extend(table.metrics.iter().copied());
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| {
            std::iter::once(r.player_name.clone())
                .chain(r.values.iter().map(|v| cell(*v, decimals)))
                .collect()
        })
        .collect();
    write_table(out, &headers, &rows)
}

fn write_comparison(out: &mut String, title: &str, view: Option<&ComparisonView>, decimals: usize) -> fmt::Result {
    writeln!(out, "\n== {title} ==")?;
    let Some(view) = view else {
        writeln!(out, "  Select at least one player and one metric to compare.")?;
        return Ok(());
    };
    let table = ZScoreTable {
        metrics: view.comparison.metrics.clone(),
        rows: view.comparison.rows.clone(),
    };
    write_zscores(out, &table, decimals)?;

    for board in &view.leaderboards {
        writeln!(out, "\n  {} (z-score)", board.metric)?;
        for entry in &board.entries {
            writeln!(out, "    {:<28} {}", entry.player_name, cell(entry.score, decimals))?;
        }
    }

    writeln!(out, "\n  Overall z-score ranking")?;
    for (i, entry) in view.overall_ranking.iter().enumerate() {
        writeln!(out, "    {:>2}. {:<24} {}", i + 1, entry.player_name, cell(entry.score, decimals))?;
    }
    Ok(())
}

pub fn render_text(a: &MatchAnalysis, decimals: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let info = &a.match_info;
    writeln!(
        out,
        "{} | {} vs {} | {} | focus: {}",
        info.display_label(),
        info.home_team,
        info.away_team,
        info.match_date,
        a.team
    )?;

    if let Some(focus) = &a.player {
        let name = &focus.info.player_name;
        writeln!(out, "\n== Player: {} ==", name)?;
        writeln!(
            out,
            "  id {} | {} | #{} | {}",
            focus.info.player_id,
            focus.info.label(),
            focus
                .info
                .jersey_number
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            focus.info.team_name
        )?;

        writeln!(out, "\n  Shots")?;
        if focus.shots.is_empty() {
            writeln!(out, "  No shots found for {name}.")?;
        } else {
            let rows: Vec<Vec<String>> = focus
                .shots
                .iter()
                .map(|e| {
                    vec![
                        e.id.clone(),
                        format!("{}:{:02}", e.minute, e.second),
                        cell(e.x, 1),
                        cell(e.y, 1),
                        opt_str(e.outcome_name.as_deref()),
                        cell(e.shot_xg, decimals),
                    ]
                })
                .collect();
            write_table(&mut out, &["id", "time", "x", "y", "outcome", "xg"], &rows)?;
        }

        writeln!(out, "\n  Shots following a recovery")?;
        if focus.shots_after_recovery.is_empty() {
            writeln!(out, "  No shots following a recovery were found for {name}.")?;
        } else {
            let rows: Vec<Vec<String>> = focus
                .shots_after_recovery
                .iter()
                .map(|s| {
                    vec![
                        s.minute.to_string(),
                        s.second.to_string(),
                        s.time_since_recovery.to_string(),
                        cell(s.x, 1),
                        cell(s.y, 1),
                        opt_str(s.outcome_name.as_deref()),
                    ]
                })
                .collect();
            write_table(
                &mut out,
                &["minute", "second", "time_since_recovery", "x", "y", "outcome"],
                &rows,
            )?;
        }
    }

    writeln!(out, "\n== Shot metrics (all shooters) ==")?;
    if a.shot_zscores.is_empty() {
        writeln!(out, "  No shots in this match.")?;
    } else {
        let rows: Vec<Vec<String>> = a
            .player_metrics
            .iter()
            .map(|m| {
                vec![
                    m.player_name.clone(),
                    m.total_shots.to_string(),
                    m.goals.to_string(),
                    m.shots_after_recovery.to_string(),
                    cell(Some(m.pct_shots_after_recovery), decimals),
                    cell(m.avg_time_after_recovery, decimals),
                    cell(Some(m.total_xg), decimals),
                ]
            })
            .collect();
        write_table(
            &mut out,
            &["player", "shots", "goals", "after_rec", "pct_after_rec", "avg_time_after_rec", "xg"],
            &rows,
        )?;
        writeln!(out, "\n  Z-scores")?;
        write_zscores(&mut out, &a.shot_zscores, decimals)?;
    }

    writeln!(out, "\n== Squad stats ({}) ==", a.team)?;
    let rows: Vec<Vec<String>> = a
        .squad_stats
        .iter()
        .map(|s| {
            vec![
                s.player_name.clone(),
                s.shots.to_string(),
                s.shots_on_target.to_string(),
                cell(Some(s.xg), decimals),
                s.passes.to_string(),
                s.key_passes.to_string(),
            ]
        })
        .collect();
    write_table(
        &mut out,
        &["player", "shots", "shots_on_target", "xg", "passes", "key_passes"],
        &rows,
    )?;
    writeln!(out, "\n  Z-scores")?;
    write_zscores(&mut out, &a.squad_zscores, decimals)?;

    write_comparison(&mut out, "Shot comparison", a.shot_comparison.as_ref(), decimals)?;
    write_comparison(&mut out, "Squad comparison", a.squad_comparison.as_ref(), decimals)?;

    Ok(out)
}
