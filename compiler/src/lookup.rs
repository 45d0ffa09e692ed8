//! 辞書検索モジュール
//!
//! スナップショットを読み込み、表層形またはかなのキーに一致する項目を
//! 1行1項目のJSONで出力します。

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use kotoba::errors::KotobaError;
use kotoba::{DictionaryStore, MemoryDictionary};

use clap::Parser;

/// 検索コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "lookup", about = "Prints dictionary entries matching the keys.")]
pub struct Args {
    /// Word dictionary snapshot (in zstd).
    #[clap(short = 'd', long)]
    dictionary: PathBuf,

    /// Prints the entry with this word ID instead of searching by key.
    #[clap(long)]
    word_id: Option<u32>,

    /// Surface forms or kana to look up.
    keys: Vec<String>,
}

/// 検索中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書の読み込みエラー
    #[error("Dictionary error: {0}")]
    Kotoba(#[from] KotobaError),

    /// JSONの出力エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn run(args: Args) -> Result<(), LookupError> {
    let dict = MemoryDictionary::from_path(&args.dictionary)?;

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    if let Some(word_id) = args.word_id {
        match dict.get(word_id) {
            Some(entry) => {
                serde_json::to_writer(&mut out, entry.as_ref())?;
                out.write_all(b"\n")?;
            }
            None => eprintln!("{word_id}: not found"),
        }
    }
    for key in &args.keys {
        let entries = dict.lookup(key)?;
        if entries.is_empty() {
            eprintln!("{key}: not found");
        }
        for entry in entries {
            serde_json::to_writer(&mut out, entry.as_ref())?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;

    Ok(())
}
