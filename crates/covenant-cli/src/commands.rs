//! Command handlers.

use std::io::Write;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use covenant_core::types::PARSER_FAILED;
use covenant_core::{ContractRecord, DocumentService, ParseFlags};

use crate::cli::{BatchArgs, ExtractArgs, ParseArgs, ParseOptions, PreviewArgs, RiskArgs};

/// Writes command results as JSON.
pub struct Output<W: Write> {
    writer: W,
    compact: bool,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W, compact: bool) -> Self {
        Self { writer, compact }
    }

    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let rendered = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        writeln!(self.writer, "{}", rendered)?;
        Ok(())
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn flags(options: &ParseOptions) -> ParseFlags {
    ParseFlags {
        extract_tables: options.tables,
        extract_images: options.images,
    }
}

pub async fn execute_parse<W: Write>(
    args: ParseArgs,
    service: &DocumentService,
    out: &mut Output<W>,
) -> Result<()> {
    let parsed = service
        .parse_document(&args.document_id, args.options.strategy, flags(&args.options))
        .await?;

    if parsed.parser_used == PARSER_FAILED {
        bail!("Parse failed for document '{}'", args.document_id);
    }

    if args.text_only {
        out.text(&parsed.content)
    } else {
        out.json(&parsed)
    }
}

pub async fn execute_batch<W: Write>(
    args: BatchArgs,
    service: &DocumentService,
    out: &mut Output<W>,
) -> Result<()> {
    let outcome = service
        .parse_documents_batch(&args.document_ids, args.options.strategy, flags(&args.options))
        .await?;
    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Batch finished"
    );
    out.json(&outcome)
}

pub async fn execute_preview<W: Write>(
    args: PreviewArgs,
    service: &DocumentService,
    out: &mut Output<W>,
) -> Result<()> {
    let preview = service
        .preview_document(&args.document_id, args.length)
        .await?;
    out.json(&preview)
}

pub async fn execute_extract<W: Write>(
    args: ExtractArgs,
    service: &DocumentService,
    out: &mut Output<W>,
) -> Result<()> {
    let record = match (&args.document_id, &args.text_file) {
        (_, Some(path)) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            service.extract_structured_record(&text, args.depth).await?
        }
        (Some(document_id), None) => service.extract_from_document(document_id, args.depth).await?,
        (None, None) => bail!("Either a document id or --text-file is required"),
    };

    if args.assess {
        let assessment = service.assess_risks(&record, Default::default()).await;
        out.json(&serde_json::json!({
            "record": record,
            "assessment": assessment,
        }))
    } else {
        out.json(&record)
    }
}

pub async fn execute_risk<W: Write>(
    args: RiskArgs,
    service: &DocumentService,
    out: &mut Output<W>,
) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.record)
        .await
        .with_context(|| format!("Failed to read {}", args.record.display()))?;
    let record: ContractRecord = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a contract record", args.record.display()))?;

    let assessment = service.assess_risks(&record, args.depth).await;
    out.json(&assessment)
}

pub fn execute_formats<W: Write>(service: &DocumentService, out: &mut Output<W>) -> Result<()> {
    out.json(&service.supported_formats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::factory::create_service;
    use clap::Parser;
    use covenant_core::CovenantConfig;

    fn service(dir: &std::path::Path) -> DocumentService {
        let mut config = CovenantConfig::default();
        config.llm.config.api_key = Some("sk-test".to_string());
        create_service(config, dir, "acme", false).unwrap()
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let tenant = dir.path().join("acme");
        std::fs::create_dir_all(&tenant).unwrap();
        std::fs::write(tenant.join("a.txt"), "Lease agreement\nRent is due monthly.").unwrap();
        std::fs::write(tenant.join("b.txt"), "Second lease").unwrap();
        dir
    }

    async fn run(dir: &std::path::Path, argv: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(argv).unwrap();
        let service = service(dir);
        let mut out = Output::new(Vec::new(), true);
        match cli.command {
            Command::Parse(args) => execute_parse(args, &service, &mut out).await?,
            Command::Batch(args) => execute_batch(args, &service, &mut out).await?,
            Command::Preview(args) => execute_preview(args, &service, &mut out).await?,
            Command::Formats => execute_formats(&service, &mut out)?,
            other => panic!("unexpected command: {:?}", other),
        }
        Ok(String::from_utf8(out.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn test_parse_text_only() {
        let dir = setup();
        let output = run(dir.path(), &["covenant", "parse", "a.txt", "--text-only"])
            .await
            .unwrap();
        assert_eq!(output, "Lease agreement\nRent is due monthly.\n");
    }

    #[tokio::test]
    async fn test_batch_reports_failures() {
        let dir = setup();
        let output = run(dir.path(), &["covenant", "batch", "a.txt", "missing.txt", "b.txt"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["succeeded"].as_array().unwrap().len(), 2);
        assert_eq!(value["failed"][0]["document_id"], "missing.txt");
    }

    #[tokio::test]
    async fn test_preview_truncates() {
        let dir = setup();
        let output = run(dir.path(), &["covenant", "preview", "a.txt", "--length", "5"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["preview_content"], "Lease");
        assert_eq!(value["is_truncated"], true);
    }

    #[tokio::test]
    async fn test_unsupported_format_is_error() {
        let dir = setup();
        std::fs::write(dir.path().join("acme").join("c.exe"), "MZ").unwrap();
        let result = run(dir.path(), &["covenant", "parse", "c.exe"]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_formats_lists_extensions() {
        let dir = setup();
        let output = run(dir.path(), &["covenant", "formats"]).await.unwrap();
        assert!(output.contains(".pdf"));
        assert!(output.contains("comprehensive"));
    }
}
