//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepResult;

/// Column header for CSV step export.
const HEADER: &str = "timestep,time_hr,hour,band,household_kw,appliance_kw,\
                      active_kw,average_kwh,action,appliance,over_load";

/// Exports simulation results to a CSV file at the given path.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes simulation results as CSV to any writer.
///
/// Steps without an action leave the `action` and `appliance` columns empty.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.2}", r.time_hr),
            r.hour.to_string(),
            r.band.to_string(),
            format!("{:.4}", r.household_kw),
            format!("{:.4}", r.appliance_kw),
            format!("{:.4}", r.active_kw),
            format!("{:.4}", r.average_kwh),
            r.action.map(|a| a.to_string()).unwrap_or_default(),
            r.appliance.as_deref().unwrap_or_default().to_string(),
            r.over_load.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::Action;
    use crate::price::PriceBand;

    fn make_step(t: usize) -> StepResult {
        let action = (t % 3 == 0).then_some(Action::Start);
        StepResult {
            timestep: t,
            time_hr: t as f32 * 0.25,
            hour: (t / 4) as u32,
            band: PriceBand::Low,
            household_kw: 1.25,
            appliance_kw: 2.0,
            active_kw: 3.25,
            average_kwh: 3.0,
            action,
            appliance: action.map(|_| Arc::from("Water heater")),
            over_load: false,
        }
    }

    fn render(results: &[StepResult]) -> String {
        let mut buf = Vec::new();
        write_csv(results, &mut buf).expect("write to vec");
        String::from_utf8(buf).expect("utf8 csv")
    }

    #[test]
    fn header_lists_every_column() {
        let output = render(&[make_step(0)]);
        assert_eq!(
            output.lines().next(),
            Some(
                "timestep,time_hr,hour,band,household_kw,appliance_kw,\
                 active_kw,average_kwh,action,appliance,over_load"
            )
        );
    }

    #[test]
    fn row_count_matches_step_count() {
        let results: Vec<StepResult> = (0..24).map(make_step).collect();
        // 1 header + 24 data rows
        assert_eq!(render(&results).lines().count(), 25);
    }

    #[test]
    fn deterministic_output() {
        let results: Vec<StepResult> = (0..5).map(make_step).collect();
        assert_eq!(render(&results), render(&results));
    }

    #[test]
    fn actions_and_idle_steps_render() {
        let results: Vec<StepResult> = (0..2).map(make_step).collect();
        let output = render(&results);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(rows.len(), 2);

        assert_eq!(&rows[0][3], "Low");
        assert_eq!(&rows[0][8], "start");
        assert_eq!(&rows[0][9], "Water heater");
        assert_eq!(&rows[1][8], "");
        assert_eq!(&rows[1][9], "");
        for row in &rows {
            for i in [1, 4, 5, 6, 7] {
                assert!(row[i].parse::<f32>().is_ok(), "column {i} should parse as f32");
            }
            assert!(row[10].parse::<bool>().is_ok());
        }
    }
}
