//! Résumé keyword analysis: load text files, count keyword hits, report.

pub mod analyzer;
pub mod loader;
pub mod report;

pub use analyzer::{
    KeywordAnalyzer, KeywordCounts, Tokenizer, WordTokenizer, DEFAULT_KEYWORDS,
    ENGLISH_STOP_WORDS,
};
pub use loader::{FileAccessError, LoadedResumes, ResumeDocument, ResumeError, ResumeLoader};
pub use report::{KeywordReport, ReportDocument, ReportEntry, ReportGenerator};

use tracing::info;

/// Reports for every readable résumé plus the files that were skipped.
#[derive(Debug)]
pub struct ResumeAnalysis {
    pub reports: Vec<KeywordReport>,
    pub skipped: Vec<FileAccessError>,
}

impl ResumeAnalysis {
    pub fn summary_line(&self) -> String {
        format!(
            "résumés: {} processed, {} skipped",
            self.reports.len(),
            self.skipped.len()
        )
    }
}

/// Load every résumé in the loader's directory and count keyword hits.
pub fn analyze_resumes(
    loader: &ResumeLoader,
    analyzer: &KeywordAnalyzer,
) -> Result<ResumeAnalysis, ResumeError> {
    let LoadedResumes { documents, skipped } = loader.load()?;

    let reports = documents
        .iter()
        .map(|document| KeywordReport {
            resume_path: document.path.display().to_string(),
            keyword_counts: analyzer.analyze(&document.text),
        })
        .collect();

    let analysis = ResumeAnalysis { reports, skipped };
    info!(directory = %loader.directory().display(), "{}", analysis.summary_line());
    Ok(analysis)
}
