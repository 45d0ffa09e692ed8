//! 解析結果を検証するユーティリティ
//!
//! このバイナリは、JSON Lines形式のコーパス(分割ケースと表記選択ケース)を再生し、
//! 失敗したケースを分類して、推定原因と修正の提案を出力します。

mod analysis;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use kotoba::errors::KotobaError;
use kotoba::{FeatureLayout, MemoryDictionary, Parser, VibratoAnalyzer};

use crate::analysis::{Case, Failure, FailureKind};

/// 素性のレイアウト
#[derive(Clone, Copy, Debug)]
enum Layout {
    Ipadic,
    Unidic,
}

impl FromStr for Layout {
    type Err = &'static str;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        match layout {
            "ipadic" => Ok(Self::Ipadic),
            "unidic" => Ok(Self::Unidic),
            _ => Err("Could not parse a layout"),
        }
    }
}

/// コマンドライン引数
#[derive(clap::Parser, Debug)]
#[clap(
    name = "diagnose",
    about = "Replays test cases and explains the failures",
    long_about = "Replays test cases and explains the failures.\n\n\
        Segmentation cases are compared against the resolved words only. \
        Tokens without a dictionary entry, such as punctuation, are left out."
)]
struct Args {
    /// Test cases in JSON Lines.
    #[clap(short = 't', long)]
    test_in: PathBuf,

    /// System dictionary of the tokenizer (in zstd).
    #[clap(short = 'i', long)]
    sysdic_in: PathBuf,

    /// Word dictionary snapshot built by the compiler.
    #[clap(short = 'd', long)]
    dictionary_in: PathBuf,

    /// Feature layout of the system dictionary. Choices are ipadic and unidic.
    #[clap(short = 'L', long, default_value = "ipadic")]
    layout: Layout,

    /// Ignores white spaces in input strings.
    #[clap(short = 'S', long)]
    ignore_space: bool,

    /// Maximum length of unknown words.
    #[clap(short = 'M', long)]
    max_grouping_len: Option<usize>,

    /// Directory to which the diagnostics of each failure are written in JSON.
    #[clap(long)]
    dump_dir: Option<PathBuf>,
}

/// 実行中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum DiagnoseError {
    /// 解析器のエラー
    #[error(transparent)]
    Kotoba(#[from] KotobaError),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// テストケースの読み込みエラー
    #[error("line {line}: {source}")]
    InvalidCase {
        line: usize,
        source: serde_json::Error,
    },

    /// JSONの出力エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 失敗の1行要約を出力します。
fn report<W: Write>(out: &mut W, failure: &Failure) -> io::Result<()> {
    match &failure.kind {
        FailureKind::Segmentation {
            mismatch,
            expected,
            actual,
            cause,
        } => writeln!(
            out,
            "{}\t{:?}\t{}\texpected={}\tactual={}\t{:?}",
            failure.line,
            mismatch,
            failure.input,
            expected.join("|"),
            actual.join("|"),
            cause,
        )?,
        FailureKind::FormSelection {
            token,
            expected,
            actual,
            cause,
        } => writeln!(
            out,
            "{}\tFormSelection\t{}\t{token}\texpected={expected:?}\tactual={actual:?}\t{cause:?}",
            failure.line, failure.input,
        )?,
    }
    if let Some(suggestion) = &failure.suggestion {
        writeln!(out, "\tsuggestion: {suggestion}")?;
    }
    Ok(())
}

fn main() -> Result<(), DiagnoseError> {
    env_logger::init();
    let args = <Args as clap::Parser>::parse();

    eprintln!("Loading the dictionaries...");
    let layout = match args.layout {
        Layout::Ipadic => FeatureLayout::ipadic(),
        Layout::Unidic => FeatureLayout::unidic(),
    };
    let analyzer = VibratoAnalyzer::from_path(&args.sysdic_in)?
        .layout(layout)
        .ignore_space(args.ignore_space)?
        .max_grouping_len(args.max_grouping_len.unwrap_or(0));
    let store = MemoryDictionary::from_path(&args.dictionary_in)?;
    let parser = Parser::new(analyzer, store);

    if let Some(dir) = &args.dump_dir {
        fs::create_dir_all(dir)?;
    }

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    let mut total = 0;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (i, line) in BufReader::new(File::open(&args.test_in)?).lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let case: Case = serde_json::from_str(&line)
            .map_err(|source| DiagnoseError::InvalidCase { line: line_no, source })?;
        total += 1;

        let Some(failure) = analysis::evaluate(&parser, line_no, &case)? else {
            continue;
        };
        let key = match &failure.kind {
            FailureKind::Segmentation { mismatch, .. } => format!("{mismatch:?}"),
            FailureKind::FormSelection { .. } => "FormSelection".to_string(),
        };
        *counts.entry(key).or_default() += 1;
        report(&mut out, &failure)?;

        if let Some(dir) = &args.dump_dir {
            let wtr = BufWriter::new(File::create(dir.join(format!("{line_no}.json")))?);
            serde_json::to_writer_pretty(wtr, &failure)?;
        }
    }
    out.flush()?;

    let failed: usize = counts.values().sum();
    eprintln!("{} cases, {} passed, {} failed", total, total - failed, failed);
    for (kind, n) in &counts {
        eprintln!("  {kind}: {n}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser as _;

    #[test]
    fn test_ignore_space_flag() {
        let args = Args::try_parse_from(["diagnose", "-t", "cases.jsonl", "-i", "system.dic.zst", "-d", "words.dic.zst"])
            .unwrap();
        assert!(!args.ignore_space);
        let args = Args::try_parse_from([
            "diagnose",
            "-t",
            "cases.jsonl",
            "-i",
            "system.dic.zst",
            "-d",
            "words.dic.zst",
            "-S",
        ])
        .unwrap();
        assert!(args.ignore_space);
    }
}
