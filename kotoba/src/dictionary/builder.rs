//! JSON Lines形式の辞書ソースから[`MemoryDictionary`]を構築するビルダー

use std::io::BufRead;

use hashbrown::HashSet;

use crate::dictionary::{DictionaryEntry, MemoryDictionary};
use crate::errors::{KotobaError, Result};

/// 辞書ソースから[`MemoryDictionary`]を構築するビルダー
///
/// ソースは1行に1エントリのJSONです。
///
/// ```text
/// {"word_id":1489340,"readings":[{"text":"表","form_type":"kanji","kana":"おもて"},{"text":"おもて","form_type":"kana"}],"senses":[{"pos":["n"]}]}
/// ```
#[derive(Default)]
pub struct DictionaryBuilder {
    entries: Vec<DictionaryEntry>,
    seen: HashSet<u32>,
    strict: bool,
}

impl DictionaryBuilder {
    /// 新しいビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 不正な行をエラーとして扱うかどうかを設定します。
    ///
    /// 無効の場合(デフォルト)、不正な行は警告を出力して読み飛ばします。
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    /// エントリを追加します。
    ///
    /// # エラー
    ///
    /// 単語IDが重複している場合、または表記のないエントリの場合にエラーを返します。
    pub fn push(&mut self, entry: DictionaryEntry) -> Result<()> {
        if !entry.is_valid() {
            return Err(KotobaError::invalid_format(
                "entry",
                format!("word {} has no usable reading", entry.word_id),
            ));
        }
        if !self.seen.insert(entry.word_id) {
            return Err(KotobaError::invalid_format(
                "entry",
                format!("word {} is defined more than once", entry.word_id),
            ));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// リーダーからJSON Linesを読み込み、エントリを追加します。
    ///
    /// 空行と`#`で始まる行は無視します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 辞書ソースのリーダー
    ///
    /// # 戻り値
    ///
    /// 追加したエントリの数
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、または厳格モードで不正な行があった場合にエラーを返します。
    pub fn read_jsonl<R>(&mut self, rdr: R) -> Result<usize>
    where
        R: BufRead,
    {
        let mut added = 0;
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let pushed = serde_json::from_str::<DictionaryEntry>(line)
                .map_err(KotobaError::from)
                .and_then(|entry| self.push(entry));
            match pushed {
                Ok(()) => added += 1,
                Err(e) if !self.strict => {
                    log::warn!("skipping line {}: {e}", i + 1);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }

    /// 辞書を構築します。
    pub fn build(self) -> MemoryDictionary {
        MemoryDictionary::from_entries(self.entries)
    }
}
