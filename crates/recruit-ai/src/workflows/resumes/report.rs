use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::analyzer::KeywordCounts;

/// Keyword hits for one résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordReport {
    pub resume_path: String,
    pub keyword_counts: KeywordCounts,
}

impl KeywordReport {
    pub fn distinct_keywords(&self) -> usize {
        self.keyword_counts.len()
    }

    pub fn total_occurrences(&self) -> usize {
        self.keyword_counts.values().sum()
    }
}

/// Structured form of the report for `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<ReportEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<&'a str>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry<'a> {
    pub resume_path: &'a str,
    pub distinct_keywords: usize,
    pub total_occurrences: usize,
    pub keyword_counts: &'a KeywordCounts,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn render_text(&self, reports: &[KeywordReport]) -> String {
        let mut out = String::new();
        out.push_str("Summary Report\n");
        out.push_str("==============\n");

        for report in reports {
            writeln!(&mut out, "Resume: {}", report.resume_path).expect("write resume path");
            writeln!(
                &mut out,
                "Total Keywords Found: {}",
                report.distinct_keywords()
            )
            .expect("write keyword total");
            for (keyword, count) in &report.keyword_counts {
                writeln!(&mut out, "{keyword}: {count}").expect("write keyword count");
            }
            out.push_str("--------------\n\n");
        }

        out
    }

    /// Descending by distinct keywords matched; ties keep their input order.
    pub fn rank<'a>(&self, reports: &'a [KeywordReport]) -> Vec<&'a KeywordReport> {
        let mut ranked: Vec<&KeywordReport> = reports.iter().collect();
        ranked.sort_by(|a, b| b.distinct_keywords().cmp(&a.distinct_keywords()));
        ranked
    }

    pub fn render_ranking(&self, reports: &[KeywordReport]) -> String {
        let mut out = String::from("Ranking\n=======\n");
        for (position, report) in self.rank(reports).into_iter().enumerate() {
            writeln!(
                &mut out,
                "{}. {} ({} distinct, {} total)",
                position + 1,
                report.resume_path,
                report.distinct_keywords(),
                report.total_occurrences()
            )
            .expect("write ranking entry");
        }
        out
    }

    pub fn document<'a>(&self, reports: &'a [KeywordReport], ranked: bool) -> ReportDocument<'a> {
        let entries = reports
            .iter()
            .map(|report| ReportEntry {
                resume_path: &report.resume_path,
                distinct_keywords: report.distinct_keywords(),
                total_occurrences: report.total_occurrences(),
                keyword_counts: &report.keyword_counts,
            })
            .collect();

        let ranking = ranked.then(|| {
            self.rank(reports)
                .into_iter()
                .map(|report| report.resume_path.as_str())
                .collect()
        });

        ReportDocument {
            generated_at: Utc::now(),
            reports: entries,
            ranking,
        }
    }

    pub fn render_json(
        &self,
        reports: &[KeywordReport],
        ranked: bool,
    ) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.document(reports, ranked))
    }
}
