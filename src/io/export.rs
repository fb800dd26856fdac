//! CSV export for the hourly charging profile and the evaluation report.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::advisor::{Issue, Solution};
use crate::model::ModelResult;
use crate::model::reference::{GRID_CO2_G_PER_KWH, HOURS_PER_DAY, TOU_PRICE_EUR_PER_KWH};

/// Column header of the hourly profile export.
const PROFILE_HEADER: &str = "hour,charging_flag,share,grid_co2_g_per_kwh,tou_price_eur_per_kwh";

/// Column header of the report export.
const REPORT_HEADER: &str = "section,metric,value";

/// Exports the 24-hour charging profile to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_profile_csv(result: &ModelResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_profile_csv(result, io::BufWriter::new(file))
}

/// Writes one row per clock hour: charging flag, energy share and the
/// reference curves at that hour.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_profile_csv(result: &ModelResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PROFILE_HEADER.split(','))?;

    let p = &result.charging_profile;
    for hour in 0..HOURS_PER_DAY {
        wtr.write_record(&[
            hour.to_string(),
            p.flags[hour].to_string(),
            format!("{:.6}", p.shares[hour]),
            format!("{:.1}", GRID_CO2_G_PER_KWH[hour]),
            format!("{:.3}", TOU_PRICE_EUR_PER_KWH[hour]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the full report (KPIs, notices, issues, solutions) to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_report_csv(
    result: &ModelResult,
    issues: &[Issue],
    solutions: &[Solution],
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_report_csv(result, issues, solutions, io::BufWriter::new(file))
}

/// Writes the report as `section,metric,value` rows.
///
/// Empty issue and solution lists are written as a single explanatory row
/// so the sections are never silently missing.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_report_csv(
    result: &ModelResult,
    issues: &[Issue],
    solutions: &[Solution],
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(REPORT_HEADER.split(','))?;

    let mut row = |section: &str, metric: &str, value: String| -> io::Result<()> {
        wtr.write_record([section, metric, value.as_str()])?;
        Ok(())
    };

    let d = &result.diesel_vs_ev;
    row("overview", "total_savings_incl_toll_eur", num(d.total_savings_incl_toll_eur))?;
    row("overview", "co2_savings_kg", num(d.co2_savings_kg))?;
    row("overview", "annual_energy_mwh", num(result.energy_cost.annual_energy_mwh))?;
    row("overview", "capacity_ok", result.load.capacity_ok.to_string())?;

    let p = &result.charging_profile;
    row("charging", "start_hour", p.start_hour.to_string())?;
    row("charging", "end_hour", p.end_hour.to_string())?;
    row("charging", "charging_hours_by_clock", p.charging_hours_by_clock.to_string())?;
    row("charging", "charging_window_hours", num(p.charging_window_hours))?;

    let e = &result.energy_cost;
    row("energy", "energy_per_event_kwh", num(e.energy_per_event_kwh))?;
    row("energy", "daily_energy_kwh", num(e.daily_energy_kwh))?;
    row("energy", "annual_energy_mwh", num(e.annual_energy_mwh))?;
    row("energy", "tou_relative_factor", num(e.tou_relative_factor))?;
    row("energy", "effective_price_eur_per_kwh", num(e.effective_price_eur_per_kwh))?;
    row("energy", "annual_cost_eur", num(e.annual_cost_eur))?;

    let c = &result.co2;
    row("co2", "effective_co2_kg_per_kwh", num(c.effective_co2_kg_per_kwh))?;
    row("co2", "annual_ev_co2_tonnes", num(c.annual_ev_co2_tonnes))?;

    let km = &result.distance;
    row("distance", "km_per_truck_per_day", num(km.km_per_truck_per_day))?;
    row("distance", "annual_km_per_truck", num(km.annual_km_per_truck))?;
    row("distance", "annual_km_fleet", num(km.annual_km_fleet))?;

    row("diesel_vs_ev", "diesel_litres", num(d.diesel_litres))?;
    row("diesel_vs_ev", "diesel_cost_eur", num(d.diesel_cost_eur))?;
    row("diesel_vs_ev", "ev_cost_eur", num(d.ev_cost_eur))?;
    row("diesel_vs_ev", "cost_savings_eur", num(d.cost_savings_eur))?;
    row("diesel_vs_ev", "toll_savings_eur", num(d.toll_savings_eur))?;
    row("diesel_vs_ev", "diesel_cost_per_km_eur", num(d.diesel_cost_per_km_eur))?;
    row("diesel_vs_ev", "ev_cost_per_km_eur", num(d.ev_cost_per_km_eur))?;
    row("diesel_vs_ev", "diesel_co2_per_km_kg", num(d.diesel_co2_per_km_kg))?;
    row("diesel_vs_ev", "ev_co2_per_km_kg", num(d.ev_co2_per_km_kg))?;
    row("diesel_vs_ev", "diesel_cost_per_truck_eur", num(d.diesel_cost_per_truck_eur))?;
    row("diesel_vs_ev", "ev_cost_per_truck_eur", num(d.ev_cost_per_truck_eur))?;

    let l = &result.load;
    row("load", "new_theoretical_peak_kw", num(l.new_theoretical_peak_kw))?;
    row("load", "new_avg_load_kw", num(l.new_avg_load_kw))?;
    row("load", "capacity_ok", l.capacity_ok.to_string())?;
    row("load", "overload_kw", num(l.overload_kw))?;
    row("load", "required_battery_energy_kwh", num(l.required_battery_energy_kwh))?;

    for notice in &result.notices {
        row("notice", "input", notice.to_string())?;
    }

    if issues.is_empty() {
        row("issues", "none", "No issues detected".to_string())?;
    }
    for issue in issues {
        row("issues", issue.id.as_str(), format!("{}: {}", issue.severity, issue.description))?;
    }

    if solutions.is_empty() {
        row("solutions", "none", "No solutions applicable".to_string())?;
    }
    for (rank, s) in solutions.iter().enumerate() {
        let section = format!("solution_{}", rank + 1);
        row(section.as_str(), "title", s.title.to_string())?;
        row(section.as_str(), "rank_score", num(s.rank_score))?;
        row(section.as_str(), "capex_level", s.capex_level.to_string())?;
        for (metric, value) in &s.quantitative {
            row(section.as_str(), *metric, value.to_string())?;
        }
    }

    drop(row);
    wtr.flush()?;
    Ok(())
}

fn num(v: f64) -> String {
    format!("{v:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{detect_issues, rank_solutions};
    use crate::model::{ModelInputs, RawInputs, evaluate};

    fn baseline() -> ModelResult {
        evaluate(&ModelInputs::default())
    }

    fn profile_text(result: &ModelResult) -> String {
        let mut buf = Vec::new();
        write_profile_csv(result, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    fn report_text(result: &ModelResult, issues: &[Issue], solutions: &[Solution]) -> String {
        let mut buf = Vec::new();
        write_report_csv(result, issues, solutions, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn profile_header_and_row_count() {
        let output = profile_text(&baseline());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], PROFILE_HEADER);
        // 1 header + 24 hours
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn profile_flags_follow_window() {
        let output = profile_text(&baseline());
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let flags: Vec<u8> = rdr
            .records()
            .filter_map(Result::ok)
            .filter_map(|rec| rec[1].parse().ok())
            .collect();
        assert_eq!(flags.len(), 24);
        assert_eq!(flags.iter().filter(|&&f| f == 1).count(), 14);
        assert_eq!(flags[5], 0);
        assert_eq!(flags[6], 1);
        assert_eq!(flags[19], 1);
        assert_eq!(flags[20], 0);
    }

    #[test]
    fn profile_shares_sum_to_one() {
        let output = profile_text(&baseline());
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let total: f64 = rdr
            .records()
            .filter_map(Result::ok)
            .filter_map(|rec| rec[2].parse::<f64>().ok())
            .sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn deterministic_output() {
        let r = baseline();
        assert_eq!(profile_text(&r), profile_text(&r));
        let issues = detect_issues(&r);
        let solutions = rank_solutions(&r, &issues);
        assert_eq!(
            report_text(&r, &issues, &solutions),
            report_text(&r, &issues, &solutions)
        );
    }

    #[test]
    fn empty_sections_are_explicit() {
        let r = baseline();
        let output = report_text(&r, &[], &[]);
        assert!(output.contains("issues,none,No issues detected"));
        assert!(output.contains("solutions,none,No solutions applicable"));
    }

    #[test]
    fn report_lists_ranked_solutions() {
        let r = evaluate(&ModelInputs::new(&RawInputs {
            site_capacity_limit_kva: 1500.0,
            ..RawInputs::default()
        }));
        let issues = detect_issues(&r);
        let solutions = rank_solutions(&r, &issues);
        let output = report_text(&r, &issues, &solutions);
        assert!(output.contains("issues,capacity_exceeded,"));
        assert!(output.contains("solution_1,title,Smart charging / load management"));
        assert!(!output.contains("solution_4"));
    }

    #[test]
    fn report_is_three_columns() {
        let r = evaluate(&ModelInputs::new(&RawInputs {
            fleet_size: 0,
            ..RawInputs::default()
        }));
        let output = report_text(&r, &[], &[]);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        assert_eq!(rdr.headers().map(csv::StringRecord::len).ok(), Some(3));
        let mut notices = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert_eq!(rec.as_ref().map(csv::StringRecord::len), Some(3));
            if rec.as_ref().is_some_and(|r| &r[0] == "notice") {
                notices += 1;
            }
        }
        assert_eq!(notices, 1);
    }
}
