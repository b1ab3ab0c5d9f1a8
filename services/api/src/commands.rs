use clap::{Args, ValueEnum};
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::resumes::{
    analyze_resumes, KeywordAnalyzer, ReportGenerator, ResumeLoader, DEFAULT_KEYWORDS,
};
use recruit_ai::workflows::screening::{
    DeliveryMode, QualificationCriteria, RecruitmentSettings, ScreeningSummary,
    ScreeningWorkflow, SettingsError, SkillMatching,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ScreenArgs {
    /// Required skill (repeatable). Defaults to Python, Django and APIs.
    #[arg(long = "skill")]
    pub(crate) skills: Vec<String>,
    /// Minimum years of experience (defaults to 2)
    #[arg(long)]
    pub(crate) min_experience: Option<u32>,
    /// Compare skills without regard to letter case
    #[arg(long)]
    pub(crate) ignore_case: bool,
    /// Notify at most this many qualified candidates (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) max_candidates: Option<u32>,
    /// Override HR_DELIVERY_MODE (batch or individual)
    #[arg(long, value_parser = parse_delivery_mode)]
    pub(crate) delivery: Option<DeliveryMode>,
    /// Qualify candidates without sending any email
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ResumeAnalysisArgs {
    /// Résumé directory (defaults to RESUME_PATH)
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
    /// Keyword to count (repeatable). Defaults to Python, Java, SQL and JavaScript.
    #[arg(long = "keyword")]
    pub(crate) keywords: Vec<String>,
    /// Append a ranking by number of distinct keywords matched
    #[arg(long)]
    pub(crate) rank: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

fn parse_delivery_mode(raw: &str) -> Result<DeliveryMode, String> {
    DeliveryMode::parse(raw).ok_or_else(|| format!("'{raw}' is not 'batch' or 'individual'"))
}

impl ScreenArgs {
    fn criteria(&self) -> QualificationCriteria {
        let defaults = QualificationCriteria::default();
        QualificationCriteria {
            required_skills: if self.skills.is_empty() {
                defaults.required_skills
            } else {
                self.skills.clone()
            },
            minimum_experience_years: self
                .min_experience
                .unwrap_or(defaults.minimum_experience_years),
            skill_matching: if self.ignore_case {
                SkillMatching::CaseInsensitive
            } else {
                SkillMatching::Exact
            },
        }
    }

    fn settings(&self) -> Result<RecruitmentSettings, SettingsError> {
        let settings = RecruitmentSettings {
            maximum_candidates: self.max_candidates.unwrap_or(u32::MAX),
            auto_screening_enabled: !self.dry_run,
            ..RecruitmentSettings::default()
        };
        settings.validate()?;
        Ok(settings)
    }
}

pub(crate) async fn run_screening(args: ScreenArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(mode) = args.delivery {
        config.hr.delivery_mode = mode;
    }

    let settings = args.settings()?;
    let workflow = if args.dry_run {
        ScreeningWorkflow::dry_run_from_config(&config, args.criteria())?
    } else {
        ScreeningWorkflow::from_config(&config, args.criteria())?
    };

    let summary = workflow.run(&settings).await?;
    print!("{}", render_screening_summary(&summary));
    Ok(())
}

fn render_screening_summary(summary: &ScreeningSummary) -> String {
    let mut out = String::new();
    writeln!(&mut out, "Fetching job applications...").expect("write progress");
    writeln!(&mut out, "Filtering candidates based on criteria...").expect("write progress");

    if summary.qualified == 0 {
        writeln!(&mut out, "No suitable candidates found.").expect("write progress");
    } else if !summary.delivered.is_empty() || !summary.failures.is_empty() {
        writeln!(&mut out, "Sending emails to filtered candidates...").expect("write progress");
        for email in &summary.delivered {
            writeln!(&mut out, "Email sent successfully to {email}").expect("write delivery");
        }
        for failure in &summary.failures {
            writeln!(
                &mut out,
                "Failed to send email to {} ({})",
                failure.email, failure.reason
            )
            .expect("write failure");
        }
    }

    writeln!(&mut out, "{}", summary.summary_line()).expect("write summary");
    out
}

pub(crate) fn run_resume_analysis(args: ResumeAnalysisArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let directory = args.dir.unwrap_or(config.resumes.directory);
    let keywords = if args.keywords.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
    } else {
        args.keywords
    };

    let loader = ResumeLoader::new(directory);
    let analysis = analyze_resumes(&loader, &KeywordAnalyzer::new(keywords))?;
    let generator = ReportGenerator;

    match args.format {
        OutputFormat::Text => {
            print!("{}", generator.render_text(&analysis.reports));
            if args.rank {
                print!("{}", generator.render_ranking(&analysis.reports));
            }
            for skipped in &analysis.skipped {
                println!("Skipped: {skipped}");
            }
            println!("{}", analysis.summary_line());
        }
        OutputFormat::Json => {
            println!("{}", generator.render_json(&analysis.reports, args.rank)?);
        }
    }

    Ok(())
}
