use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use eyre::{Result, WrapErr};
use tracing::info;

use oralscan_core::models::patient::{DurationBucket, PatientContext};
use oralscan_core::models::result::{Level2Result, ResultModel};
use oralscan_core::models::suggestion::Suggestion;
use oralscan_export::artifact::ReportArtifact;
use oralscan_workflow::state::{ImageSelection, SubmitOutcome};

use crate::config::{self, DEFAULT_BEDROCK_MODEL, OralScanConfig, SuggestionSource};
use crate::wiring;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DurationArg {
    LessThanOneWeek,
    OneToFourWeeks,
    OneToSixMonths,
    MoreThanSixMonths,
}

impl From<DurationArg> for DurationBucket {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::LessThanOneWeek => DurationBucket::LessThanOneWeek,
            DurationArg::OneToFourWeeks => DurationBucket::OneToFourWeeks,
            DurationArg::OneToSixMonths => DurationBucket::OneToSixMonths,
            DurationArg::MoreThanSixMonths => DurationBucket::MoreThanSixMonths,
        }
    }
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Photograph of the oral lesion (JPG, PNG, WEBP).
    pub image: PathBuf,

    /// Directory to write the report into.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub gender: Option<String>,

    /// Repeat for each symptom.
    #[arg(long = "symptom")]
    pub symptoms: Vec<String>,

    #[arg(long, value_enum)]
    pub duration: Option<DurationArg>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Also write the Markdown preview next to the DOCX.
    #[arg(long)]
    pub preview: bool,
}

impl AnalyzeArgs {
    pub fn patient_context(&self) -> PatientContext {
        PatientContext {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            symptoms: self.symptoms.iter().cloned().collect::<BTreeSet<_>>(),
            duration: self.duration.map(DurationBucket::from),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Gemini,
    Bedrock,
    Disabled,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub classifier_url: Option<String>,

    #[arg(long, value_enum, default_value = "gemini")]
    pub backend: BackendArg,

    /// Gemini model name or Bedrock model id.
    #[arg(long)]
    pub model: Option<String>,

    /// AWS region for the Bedrock backend.
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

/// Guess the MIME type from the file extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub async fn analyze(config: &OralScanConfig, args: AnalyzeArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .wrap_err_with(|| format!("failed to read {}", args.image.display()))?;
    let mime_type = guess_mime(&args.image);
    let file_name = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let workflow = wiring::build_orchestrator(config).await?;
    let mut suggestions_rx = workflow.subscribe_suggestions();

    workflow
        .select_image(ImageSelection::new(bytes, mime_type).with_file_name(file_name))
        .await?;

    let patient = args.patient_context();
    if !patient.is_empty() {
        workflow.attach_patient_context(patient).await?;
    }

    println!("Analyzing {} ...", args.image.display());
    let result = match workflow.submit().await? {
        SubmitOutcome::Completed(result) => result,
        SubmitOutcome::Failed { kind, message } => {
            return Err(eyre::eyre!("Analysis failed ({kind:?}): {message}"));
        }
        SubmitOutcome::AlreadyInFlight | SubmitOutcome::Superseded => {
            return Err(eyre::eyre!("analysis was interrupted"));
        }
    };
    print_result(&result);

    let ready = suggestions_rx
        .wait_for(|v| v.is_some())
        .await
        .map_err(|e| eyre::eyre!("suggestion channel closed: {e}"))?
        .clone();
    if let Some(ready) = ready {
        print_suggestions(&ready.suggestions);
    }

    let artifact = workflow.generate_report(jiff::Timestamp::now()).await?;
    let out_dir = args
        .out
        .clone()
        .or_else(|| config.report_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    write_report(&out_dir, &artifact, args.preview).await?;

    Ok(())
}

fn print_result(result: &ResultModel) {
    let level1 = result.level1();
    println!();
    println!("ANALYSIS RESULTS");
    println!(
        "  Level 1 Classification: {} ({}% confidence)",
        level1.classification.label(),
        level1.confidence
    );
    match result.level2() {
        Some(Level2Result::Classified {
            classification,
            confidence,
            ..
        }) => println!(
            "  Level 2 Classification: {} ({confidence}% confidence)",
            classification.label()
        ),
        // The report omits this row; the terminal notes why.
        Some(Level2Result::Failed { error }) => {
            println!("  Level 2 Classification: unavailable ({error})")
        }
        None => {}
    }
}

fn print_suggestions(suggestions: &[Suggestion]) {
    println!();
    println!("RECOMMENDATIONS");
    for (index, suggestion) in suggestions.iter().enumerate() {
        println!("  {}. {}: {}", index + 1, suggestion.title, suggestion.description);
    }
}

async fn write_report(out_dir: &Path, artifact: &ReportArtifact, preview: bool) -> Result<()> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .wrap_err_with(|| format!("failed to create {}", out_dir.display()))?;

    let docx_path = out_dir.join(&artifact.filename);
    tokio::fs::write(&docx_path, &artifact.docx).await?;
    info!(path = %docx_path.display(), report_id = %artifact.report_id, "report written");
    println!();
    println!("Report {} written to {}", artifact.report_id, docx_path.display());

    if preview {
        let md_path = docx_path.with_extension("md");
        tokio::fs::write(&md_path, artifact.markdown.as_bytes()).await?;
        println!("Preview written to {}", md_path.display());
    }
    Ok(())
}

pub async fn health(config: &OralScanConfig) -> Result<()> {
    let client = wiring::build_classifier(config)?;
    let health = client.health().await?;
    println!(
        "{} at {}: {}",
        health.status,
        client.base_url(),
        health.message.as_deref().unwrap_or("(no message)")
    );
    Ok(())
}

pub fn config_show(path: &Path, config: &OralScanConfig) -> Result<()> {
    let info = config::config_info(config);
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

pub fn config_init(path: &Path, args: InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        return Err(eyre::eyre!(
            "config already exists at {}; pass --force to overwrite",
            path.display()
        ));
    }

    let mut config = OralScanConfig::new(jiff::Timestamp::now());
    if let Some(url) = args.classifier_url {
        config.classifier_url = url;
    }
    config.report_dir = args.report_dir;
    config.suggestions = match args.backend {
        BackendArg::Gemini => SuggestionSource::Gemini {
            api_key: None,
            model: args
                .model
                .unwrap_or_else(|| oralscan_suggest::gemini::DEFAULT_GEMINI_MODEL.to_string()),
        },
        BackendArg::Bedrock => SuggestionSource::Bedrock {
            region: args.region,
            model_id: args.model.unwrap_or_else(|| DEFAULT_BEDROCK_MODEL.to_string()),
        },
        BackendArg::Disabled => SuggestionSource::Disabled,
    };

    config::save_config(path, &config)?;
    println!("Config written to {}", path.display());
    Ok(())
}

pub fn config_delete(path: &Path) -> Result<()> {
    if config::delete_config(path)? {
        println!("Deleted {}", path.display());
    } else {
        println!("No config at {}", path.display());
    }
    Ok(())
}
