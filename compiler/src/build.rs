//! スナップショットのビルドモジュール
//!
//! JSON Lines形式の辞書ソースを読み込み、索引付きの辞書を構築して
//! zstd圧縮のスナップショットとして書き出します。

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use kotoba::DictionaryBuilder;
use kotoba::errors::KotobaError;

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to build the word dictionary snapshot.")]
pub struct Args {
    /// Dictionary source in JSON Lines. Can be specified multiple times.
    #[clap(short = 'i', long, required = true)]
    jsonl_in: Vec<PathBuf>,

    /// File to which the snapshot is output (in zstd).
    #[clap(short = 'o', long)]
    dictionary_out: PathBuf,

    /// Fails on malformed or duplicate entries instead of skipping them.
    #[clap(long)]
    strict: bool,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 辞書が空
    #[error("No entries were read from the dictionary source.")]
    Empty,

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書の構築エラー
    #[error("Dictionary error: {0}")]
    Kotoba(#[from] KotobaError),
}

/// ビルド処理を実行します。
///
/// # エラー
///
/// 入力ファイルの読み込み、項目の検証(`--strict`指定時)、
/// スナップショットの書き出しに失敗した場合にエラーを返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    let mut builder = DictionaryBuilder::new().strict(args.strict);
    for path in &args.jsonl_in {
        eprintln!("Reading {}...", path.display());
        let rdr = BufReader::new(File::open(path)?);
        let n = builder.read_jsonl(rdr)?;
        log::info!("read {n} entries from {}", path.display());
    }

    eprintln!("Indexing the entries...");
    let dict = builder.build();
    if dict.is_empty() {
        return Err(BuildError::Empty);
    }

    eprintln!("Writing {} entries to {}...", dict.len(), args.dictionary_out.display());
    dict.write_to_path(&args.dictionary_out)?;

    Ok(())
}
