//! # sirsim-cli::export
//!
//! CSV writers for every result view. One file per view x channel, named
//! `<prefix>-<channel>.csv`, `<prefix>-<channel>-statistics.csv`,
//! `<prefix>-<channel>-pyramid.csv`, plus the final
//! `<prefix>-cases-by-age.csv` profile. Time-series files carry one column
//! per trajectory so multi-trajectory runs stay in a single table.

use anyhow::{Context, Result};
use sirsim_engine::prelude::*;
use std::path::PathBuf;

/// Writes every output table for the completed trajectories and returns
/// the list of files written.
pub fn write_all(prefix: &str, sims: &[SirSimulation]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for channel in SirChannel::ALL {
        written.push(write_time_series(prefix, channel, sims)?);
        written.push(write_statistics(prefix, channel, sims)?);
        written.push(write_pyramid(prefix, channel, sims)?);
    }
    written.push(write_case_profile(prefix, sims)?);
    Ok(written)
}

fn write_time_series(
    prefix: &str,
    channel: SirChannel,
    sims: &[SirSimulation],
) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{prefix}-{}.csv", channel.label()));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["period".to_string(), "day".to_string()];
    header.extend((0..sims.len()).map(|i| format!("trajectory-{i}")));
    writer.write_record(&header)?;

    let params = sims[0].params();
    let views: Vec<TimeSeriesView> = sims.iter().map(|s| s.time_series(channel)).collect();
    for p in 0..params.n_periods() {
        let mut row = vec![p.to_string(), (p as u32 * params.p_length).to_string()];
        row.extend(views.iter().map(|v| v.value(p).to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_statistics(prefix: &str, channel: SirChannel, sims: &[SirSimulation]) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{prefix}-{}-statistics.csv", channel.label()));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["trajectory", "Total", "Average", "Minimum", "Maximum"])?;
    for (i, sim) in sims.iter().enumerate() {
        let stat = sim.statistic(channel);
        writer.write_record([
            i.to_string(),
            stat.sum().to_string(),
            stat.mean().to_string(),
            stat.min().to_string(),
            stat.max().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_pyramid(prefix: &str, channel: SirChannel, sims: &[SirSimulation]) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{prefix}-{}-pyramid.csv", channel.label()));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["trajectory", "period", "age_group", "sex", "count"])?;
    for (i, sim) in sims.iter().enumerate() {
        let pyr = sim.pyramid_series(channel);
        for p in 0..pyr.n_periods() {
            for g in 0..pyr.breaks().n_groups() {
                for sex in Sex::ALL {
                    writer.write_record([
                        i.to_string(),
                        p.to_string(),
                        pyr.breaks().group_label(g),
                        sex.label().to_string(),
                        pyr.value(p, g, sex.index()).to_string(),
                    ])?;
                }
            }
        }
    }
    writer.flush()?;
    Ok(path)
}

fn write_case_profile(prefix: &str, sims: &[SirSimulation]) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{prefix}-cases-by-age.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["trajectory", "age_group", "infected_fraction"])?;
    for (i, sim) in sims.iter().enumerate() {
        if let Some(profile) = sim.case_profile(SirChannel::Infections) {
            for g in 0..profile.breaks().n_groups() {
                writer.write_record([
                    i.to_string(),
                    profile.breaks().group_label(g),
                    profile.get(g, 0).to_string(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner;

    #[test]
    fn writes_the_full_file_set() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("sir-test").to_string_lossy().into_owned();

        let scenario = Scenario {
            seed: Some(7),
            trajectories: 2,
            ..Scenario::default()
        };
        let sims = runner::run_all(&scenario).unwrap();
        let written = write_all(&prefix, &sims).unwrap();

        // 5 channels x 3 views + the case profile.
        assert_eq!(written.len(), 16);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }

        let infected = std::fs::read_to_string(format!("{prefix}-infected.csv")).unwrap();
        let mut lines = infected.lines();
        assert_eq!(
            lines.next().unwrap(),
            "period,day,trajectory-0,trajectory-1"
        );
        let n_rows = lines.count();
        assert_eq!(n_rows, sims[0].params().n_periods());
    }
}
