//! Command handlers behind the CLI definitions.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use colored::Colorize;
use serde::Serialize;
use tokio::fs;

use super::{Cli, Commands, ConfigArgs, DetectArgs, PutArgs, RulesArgs};
use crate::config::Config;
use crate::sniff::{Action, Detection, FileKind, FileType, SignatureRule, Sniffer, Tier};
use crate::upload::{peek_prefix, FsStore, UploadRequest, Uploader};

/// Resolve the configuration for this invocation.
///
/// An explicit `--config` must exist, except for `config --init` which is
/// about to create it.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let Some(path) = &cli.config else {
        return Ok(Config::load());
    };
    let initialising = matches!(&cli.command, Commands::Config(args) if args.init);
    let mut config = if initialising && !path.exists() {
        Config::default()
    } else {
        Config::load_from(path)?
    };
    config.apply_env();
    Ok(config)
}

/// One line of `detect` output
#[derive(Debug, Serialize)]
pub struct DetectReport {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<&'static str>,
    pub mime: &'static str,
    pub file_type: FileType,
    pub rule: Option<&'static str>,
    pub id3_tags: usize,
}

impl DetectReport {
    fn new(path: &Path, size: u64, detection: Detection) -> Self {
        let kind = detection.kind.unwrap_or(FileKind::OCTET_STREAM);
        Self {
            path: path.to_path_buf(),
            size,
            extension: detection.kind.map(|k| k.extension).filter(|e| !e.is_empty()),
            mime: kind.mime,
            file_type: kind.file_type(),
            rule: detection.rule,
            id3_tags: detection.id3_tags,
        }
    }
}

/// Sniff a single file from disk
pub async fn detect_file(sniffer: &Sniffer, path: &Path, prefix_len: usize) -> Result<DetectReport> {
    let file = fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let size = file.metadata().await?.len();
    let (prefix, _) = peek_prefix(file, prefix_len)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(DetectReport::new(path, size, sniffer.sniff(&prefix)))
}

pub async fn run_detect(args: &DetectArgs, config: &Config) -> Result<()> {
    let mut options = config.sniff.options();
    if args.strict {
        options.weak_signatures = false;
    }
    let sniffer = Sniffer::with_options(options);
    let prefix_len = args.prefix.unwrap_or(config.sniff.prefix_len);

    let mut reports = Vec::with_capacity(args.paths.len());
    let mut failed = 0usize;

    for path in &args.paths {
        match detect_file(&sniffer, path, prefix_len).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                failed += 1;
                eprintln!("{} {:#}", "✗".red(), e);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report, args.explain);
        }
    }

    ensure!(failed == 0, "{failed} of {} file(s) could not be read", args.paths.len());
    Ok(())
}

fn print_report(report: &DetectReport, explain: bool) {
    let color = report.file_type.color();
    let ext = report.extension.unwrap_or("-");
    print!(
        "{}  {:<6} {:<10} {}  ({})",
        report.path.display(),
        ext.color(color).bold(),
        report.file_type.label().color(color),
        report.mime,
        humansize::format_size(report.size, humansize::BINARY).dimmed()
    );
    if explain {
        match report.rule {
            Some(rule) => print!("  [{}]", rule.cyan()),
            None => print!("  [{}]", "no rule matched".dimmed()),
        }
        if report.id3_tags > 0 {
            print!(" after {} ID3 tag(s)", report.id3_tags);
        }
    }
    println!();
}

pub async fn run_put(args: &PutArgs, config: &Config) -> Result<()> {
    let store_dir = args
        .store
        .clone()
        .unwrap_or_else(|| config.upload.store_dir.clone());
    let uploader = Uploader::from_config(FsStore::new(&store_dir), config);

    let file = fs::File::open(&args.file)
        .await
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let request = UploadRequest {
        authorization: args.token.as_ref().map(|t| format!("Bearer {t}")),
        key: args.key.clone(),
        content_type: args.content_type.clone(),
    };

    let receipt = uploader
        .put(file, request)
        .await
        .with_context(|| format!("Failed to upload {}", args.file.display()))?;

    println!("{} Stored {}", "✓".green(), receipt.key.green().bold());
    println!("  Type:   {}", receipt.meta.content_type);
    println!(
        "  Size:   {}",
        humansize::format_size(receipt.meta.size, humansize::BINARY)
    );
    println!("  blake3: {}", receipt.meta.blake3);
    println!("  Path:   {}", uploader.store().object_path(&receipt.key).display());
    Ok(())
}

/// Serializable view of a rule for `rules --json`
#[derive(Debug, Serialize)]
pub struct RuleInfo {
    pub index: usize,
    pub name: &'static str,
    pub tier: Tier,
    pub offset: usize,
    pub magic: String,
    pub mask: Option<String>,
    /// Decided by a structural sub-parser rather than the magic alone
    pub structural: bool,
    pub result: Option<FileKind>,
}

impl RuleInfo {
    fn new(index: usize, rule: &SignatureRule) -> Self {
        let (structural, result) = match rule.action {
            Action::Kind(kind) => (false, Some(kind)),
            Action::Parse(_) => (true, None),
        };
        Self {
            index,
            name: rule.name,
            tier: rule.tier,
            offset: rule.offset,
            magic: hex::encode(rule.magic),
            mask: rule.mask.map(hex::encode),
            structural,
            result,
        }
    }
}

pub fn run_rules(args: &RulesArgs, config: &Config) -> Result<()> {
    let sniffer = Sniffer::with_options(config.sniff.options());
    let rules: Vec<_> = sniffer
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleInfo::new(i, rule))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    for rule in &rules {
        let tier = match rule.tier {
            Tier::Strong => "strong".normal(),
            Tier::Weak => "weak".yellow(),
            Tier::Heuristic => "heuristic".magenta(),
        };
        let result = match rule.result {
            Some(kind) => kind.to_string(),
            None => "(structural)".dimmed().to_string(),
        };
        let mask = rule
            .mask
            .as_ref()
            .map(|m| format!(" & {m}"))
            .unwrap_or_default();
        println!(
            "{:>3}  {:<9} {:<24} @{:<4} {}{}  {}",
            rule.index,
            tier,
            rule.name,
            rule.offset,
            rule.magic,
            mask,
            result
        );
    }
    Ok(())
}

pub fn run_config(args: &ConfigArgs, config: &Config, path: &Path) -> Result<()> {
    if args.init {
        if Config::ensure_exists_at(path)? {
            println!("{} Wrote sample config to {}", "✓".green(), path.display());
        } else {
            println!("{} Config already exists at {}", "✓".green(), path.display());
        }
        return Ok(());
    }

    let state = if path.exists() { "" } else { " (not present, showing defaults)" };
    println!("# {}{}", path.display(), state);
    // never echo secrets
    let mut shown = config.clone();
    for secret in &mut shown.upload.auth_secrets {
        *secret = "********".to_string();
    }
    print!("{}", toml::to_string_pretty(&shown).context("Failed to serialize config")?);
    Ok(())
}
