use std::collections::BTreeMap;
use std::fmt;

use crate::github::ItemDetail;

/// How completely the board's field values are filled in.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldStats {
    pub total: usize,
    pub with_status: usize,
    pub with_iteration: usize,
    pub with_estimate: usize,
    pub with_dates: usize,
    pub with_assignees: usize,
}

#[derive(Debug, Default, Clone)]
pub struct AnalysisReport {
    pub stats: FieldStats,
    /// Item title with the names of its empty fields.
    pub incomplete: Vec<(String, Vec<&'static str>)>,
    /// Estimated hours summed per iteration title.
    pub hours_by_iteration: BTreeMap<String, f64>,
}

pub fn analyze(details: &[ItemDetail]) -> AnalysisReport {
    let mut report = AnalysisReport::default();
    report.stats.total = details.len();

    for detail in details {
        let mut missing = Vec::new();

        if detail.status.is_some() {
            report.stats.with_status += 1;
        } else {
            missing.push("status");
        }
        if let Some(iteration) = &detail.iteration {
            report.stats.with_iteration += 1;
            if let Some(hours) = detail.estimate {
                *report.hours_by_iteration.entry(iteration.clone()).or_default() += hours;
            }
        } else {
            missing.push("iteration");
        }
        if detail.estimate.is_some() {
            report.stats.with_estimate += 1;
        } else {
            missing.push("estimate");
        }
        if detail.start_date.is_some() && detail.target_date.is_some() {
            report.stats.with_dates += 1;
        } else {
            missing.push("dates");
        }
        if detail.assignees.is_empty() {
            missing.push("assignees");
        } else {
            report.stats.with_assignees += 1;
        }

        if !missing.is_empty() {
            report.incomplete.push((detail.title.clone(), missing));
        }
    }
    report
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 100) / total) as u32
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(f, "Project items: {}", stats.total)?;
        writeln!(f, "  status:    {} ({}%)", stats.with_status, percent(stats.with_status, stats.total))?;
        writeln!(f, "  iteration: {} ({}%)", stats.with_iteration, percent(stats.with_iteration, stats.total))?;
        writeln!(f, "  estimate:  {} ({}%)", stats.with_estimate, percent(stats.with_estimate, stats.total))?;
        writeln!(f, "  dates:     {} ({}%)", stats.with_dates, percent(stats.with_dates, stats.total))?;
        writeln!(f, "  assignees: {} ({}%)", stats.with_assignees, percent(stats.with_assignees, stats.total))?;
        if !self.hours_by_iteration.is_empty() {
            writeln!(f, "Estimated hours by iteration:")?;
            for (iteration, hours) in &self.hours_by_iteration {
                writeln!(f, "  {iteration}: {hours}h")?;
            }
        }
        if !self.incomplete.is_empty() {
            writeln!(f, "Incomplete items:")?;
            for (title, missing) in &self.incomplete {
                writeln!(f, "  {title}: missing {}", missing.join(", "))?;
            }
        }
        Ok(())
    }
}
