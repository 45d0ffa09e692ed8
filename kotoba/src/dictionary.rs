//! 候補解決のための辞書モジュール。
//!
//! このモジュールは、辞書ストアのインターフェース[`DictionaryStore`]と、
//! そのメモリ上の実装[`MemoryDictionary`]を提供します。
//!
//! # 辞書の読み込み方法
//!
//! - [`DictionaryBuilder`]: JSON Lines形式のソースから構築する
//! - [`MemoryDictionary::read`]: コンパイル済みスナップショットをリーダーから読み込む
//! - [`MemoryDictionary::from_path`]: コンパイル済みスナップショットをファイルから読み込む
//!
//! スナップショットは、マジックバイトとrkyvアーカイブをZstandardで圧縮したものです。
pub mod builder;
pub mod entry;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{KotobaError, Result};
use crate::kana;

pub use crate::dictionary::builder::DictionaryBuilder;
pub use crate::dictionary::entry::{DictionaryEntry, FormType, FrequencyTier, Reading, Sense};

/// 辞書スナップショットを識別するマジックバイト。
///
/// "0.3"はスナップショット形式のバージョンであり、クレートのバージョンとは独立しています。
pub const SNAPSHOT_MAGIC: &[u8] = b"KotobaDictionaryRkyv 0.3\n";

const SNAPSHOT_MAGIC_LEN: usize = SNAPSHOT_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize =
    (RKYV_ALIGNMENT - (SNAPSHOT_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = SNAPSHOT_MAGIC_LEN + PADDING_LEN;

/// スナップショット書き込み時のZstandard圧縮レベル
const ZSTD_LEVEL: i32 = 19;

/// 辞書ストアのインターフェース
///
/// 候補解決器はこのトレイトを通じて辞書を参照します。
/// 実装は読み取り専用で、複数のスレッドから同時に呼び出されても安全である必要があります。
/// 実装の失敗は[`KotobaError::upstream`]で報告してください。
pub trait DictionaryStore: Send + Sync {
    /// 表記または発音(ひらがなに畳み込んだもの)がキーに一致するエントリを返します。
    ///
    /// # 引数
    ///
    /// * `key` - 検索キー
    ///
    /// # 戻り値
    ///
    /// 一致したエントリ。単語IDの昇順で、重複はありません。
    fn lookup(&self, key: &str) -> Result<Vec<Arc<DictionaryEntry>>>;

    /// 複数のキーをまとめて検索します。
    ///
    /// デフォルト実装は[`lookup`](Self::lookup)を繰り返し呼び出します。
    /// リモートのストアではまとめて問い合わせるように上書きしてください。
    ///
    /// # 戻り値
    ///
    /// キーから一致したエントリへのマップ。一致しなかったキーは含まれません。
    fn lookup_many(&self, keys: &[&str]) -> Result<HashMap<String, Vec<Arc<DictionaryEntry>>>> {
        let mut result = HashMap::with_capacity(keys.len());
        for &key in keys {
            if result.contains_key(key) {
                continue;
            }
            let entries = self.lookup(key)?;
            if !entries.is_empty() {
                result.insert(key.to_string(), entries);
            }
        }
        Ok(result)
    }

    /// 単語IDの表記数を返します。未知の単語IDの場合は`None`です。
    fn reading_count(&self, word_id: u32) -> Result<Option<usize>>;
}

impl<T> DictionaryStore for Arc<T>
where
    T: DictionaryStore + ?Sized,
{
    fn lookup(&self, key: &str) -> Result<Vec<Arc<DictionaryEntry>>> {
        (**self).lookup(key)
    }

    fn lookup_many(&self, keys: &[&str]) -> Result<HashMap<String, Vec<Arc<DictionaryEntry>>>> {
        (**self).lookup_many(keys)
    }

    fn reading_count(&self, word_id: u32) -> Result<Option<usize>> {
        (**self).reading_count(word_id)
    }
}

/// スナップショットに格納されるデータ
#[derive(Archive, Serialize, Deserialize)]
struct SnapshotData {
    entries: Vec<DictionaryEntry>,
}

/// メモリ上の読み取り専用辞書
///
/// 表記の文字列と、かな表記・漢字表記の発音をひらがなに畳み込んだ文字列を
/// キーとする索引を読み込み時に一度だけ構築します。
pub struct MemoryDictionary {
    entries: Vec<Arc<DictionaryEntry>>,
    index: HashMap<String, Vec<usize>>,
    ids: HashMap<u32, usize>,
}

impl MemoryDictionary {
    /// エントリのリストから辞書を作成します。
    ///
    /// エントリは単語IDの昇順に並べ替えられます。
    pub fn from_entries(mut entries: Vec<DictionaryEntry>) -> Self {
        entries.sort_unstable_by_key(|e| e.word_id);

        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut ids = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            ids.insert(entry.word_id, i);
            for reading in &entry.readings {
                let mut keys = vec![reading.text.clone()];
                if let Some(folded) = kana::fold_kana(&reading.text) {
                    keys.push(folded);
                }
                if let Some(folded) = reading.kana.as_deref().and_then(kana::fold_kana) {
                    keys.push(folded);
                }
                for key in keys {
                    let positions = index.entry(key).or_default();
                    if positions.last() != Some(&i) {
                        positions.push(i);
                    }
                }
            }
        }
        log::debug!(
            "dictionary index built: {} entries, {} keys",
            entries.len(),
            index.len()
        );

        Self {
            entries: entries.into_iter().map(Arc::new).collect(),
            index,
            ids,
        }
    }

    /// エントリの数を返します。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// エントリが1つもない場合に`true`を返します。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 単語IDからエントリを取得します。
    pub fn get(&self, word_id: u32) -> Option<&Arc<DictionaryEntry>> {
        self.ids.get(&word_id).map(|&i| &self.entries[i])
    }

    /// すべてのエントリを単語IDの昇順で返します。
    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter().map(AsRef::as_ref)
    }

    /// 辞書をスナップショットとして書き出します。
    ///
    /// 出力はZstandardで圧縮され、[`MemoryDictionary::read`]で読み込むことができます。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - 基礎となる`writer`への書き込みに失敗した場合。
    /// - `rkyv`シリアライゼーションプロセスでエラーが発生した場合。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let data = SnapshotData {
            entries: self.entries.iter().map(|e| e.as_ref().clone()).collect(),
        };
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&data)?;

        let mut encoder = zstd::Encoder::new(wtr, ZSTD_LEVEL)?;
        encoder.write_all(SNAPSHOT_MAGIC)?;
        encoder.write_all(&[0xFF; PADDING_LEN])?;
        encoder.write_all(&bytes)?;
        encoder.finish()?;

        Ok(())
    }

    /// 辞書をスナップショットとしてファイルに書き出します。
    ///
    /// 同じディレクトリの一時ファイルに書き込んだ後で置き換えるため、
    /// 書き込み途中のファイルが読み込まれることはありません。
    pub fn write_to_path<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
        self.write(temp_file.as_file_mut())?;
        temp_file.persist(path)?;
        Ok(())
    }

    /// リーダーからスナップショットを読み込みます。
    ///
    /// # 引数
    ///
    /// * `rdr` - Zstandard圧縮されたスナップショットのリーダー
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - データを読み込めない、または展開できない場合。
    /// - マジックバイトが一致しない場合。
    /// - アーカイブの検証に失敗した場合。
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut decoder = zstd::Decoder::new(rdr)?;
        let mut buffer = Vec::new();
        decoder.read_to_end(&mut buffer)?;

        if !buffer.starts_with(SNAPSHOT_MAGIC) {
            return Err(KotobaError::invalid_argument(
                "rdr",
                "The magic number of the input snapshot mismatches.",
            ));
        }
        let Some(data_bytes) = buffer.get(DATA_START..) else {
            return Err(KotobaError::invalid_argument(
                "rdr",
                "Snapshot too small or corrupted.",
            ));
        };

        let mut aligned_bytes = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(data_bytes.len());
        aligned_bytes.extend_from_slice(data_bytes);

        let data = rkyv::from_bytes::<SnapshotData, rkyv::rancor::Error>(&aligned_bytes)?;

        Ok(Self::from_entries(data.entries))
    }

    /// ファイルパスからスナップショットを読み込みます。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }
}

impl DictionaryStore for MemoryDictionary {
    fn lookup(&self, key: &str) -> Result<Vec<Arc<DictionaryEntry>>> {
        Ok(self
            .index
            .get(key)
            .map(|positions| positions.iter().map(|&i| Arc::clone(&self.entries[i])).collect())
            .unwrap_or_default())
    }

    fn reading_count(&self, word_id: u32) -> Result<Option<usize>> {
        Ok(self.get(word_id).map(|e| e.reading_count()))
    }
}
