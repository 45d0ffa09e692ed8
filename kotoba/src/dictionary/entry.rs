//! 辞書エントリの定義
//!
//! 1つのエントリは単語IDと、表記(読み)のリスト、語義のリストから構成されます。
//! 表記のインデックスが出力の`reading_index`になります。

use rkyv::{Archive, Deserialize, Serialize};

use crate::kana;

/// 表記の種類
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    Archive,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[rkyv(compare(PartialEq), derive(Clone, Copy, Debug))]
pub enum FormType {
    /// 漢字表記
    Kanji,
    /// かな表記
    Kana,
    /// 検索専用のかな表記
    ///
    /// 通常は表示に使われませんが、入力の表層形と完全に一致した場合は選択されます。
    SearchOnlyKana,
}

impl FormType {
    /// かな表記(検索専用を含む)かどうかを返します。
    #[inline(always)]
    pub const fn is_kana(self) -> bool {
        matches!(self, Self::Kana | Self::SearchOnlyKana)
    }
}

/// エントリの表記
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    Archive,
    Serialize,
    Deserialize,
)]
pub struct Reading {
    /// 表記の文字列
    pub text: String,

    /// 表記の種類
    pub form_type: FormType,

    /// 漢字表記の発音(かな)。かな表記では使用しません。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kana: Option<String>,

    /// 頻度タグ(`nf01`、`ichi1`、`news2`など)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priorities: Vec<String>,
}

impl Reading {
    /// この表記の頻度帯を返します。
    pub fn frequency_tier(&self) -> FrequencyTier {
        FrequencyTier::from_priorities(&self.priorities)
    }
}

/// エントリの語義
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    Archive,
    Serialize,
    Deserialize,
)]
pub struct Sense {
    /// 品詞タグ(`n`、`v5k`、`adj-i`など)
    #[serde(default)]
    pub pos: Vec<String>,

    /// 用法タグ(`uk`、`arch`など)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub misc: Vec<String>,
}

impl Sense {
    /// 古語の語義かどうかを返します。
    pub fn is_archaic(&self) -> bool {
        self.misc.iter().any(|m| m == "arch")
    }

    /// 通常かな書きされる語義かどうかを返します。
    pub fn is_usually_kana(&self) -> bool {
        self.misc.iter().any(|m| m == "uk")
    }
}

/// 辞書エントリ
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    Archive,
    Serialize,
    Deserialize,
)]
pub struct DictionaryEntry {
    /// 単語ID
    pub word_id: u32,

    /// 表記のリスト。インデックスが`reading_index`に対応します。
    pub readings: Vec<Reading>,

    /// 語義のリスト
    #[serde(default)]
    pub senses: Vec<Sense>,
}

impl DictionaryEntry {
    /// すべての語義が古語の場合に`true`を返します。
    ///
    /// 語義が1つもない場合は`false`です。
    pub fn is_fully_archaic(&self) -> bool {
        !self.senses.is_empty() && self.senses.iter().all(Sense::is_archaic)
    }

    /// 指定した表記の発音をひらがなで返します。
    ///
    /// かな表記はその文字列、漢字表記は付与された発音を使用します。
    /// 漢字表記に発音がない場合は、最初のかな表記で代用します。
    ///
    /// # 引数
    ///
    /// * `index` - 表記のインデックス
    ///
    /// # 戻り値
    ///
    /// 発音が得られない場合は`None`
    pub fn pronunciation(&self, index: usize) -> Option<String> {
        let reading = self.readings.get(index)?;
        let text = if reading.form_type.is_kana() {
            reading.text.as_str()
        } else if let Some(kana) = &reading.kana {
            kana.as_str()
        } else {
            self.readings
                .iter()
                .find(|r| r.form_type.is_kana())
                .map(|r| r.text.as_str())?
        };
        Some(kana::to_hiragana(text))
    }

    /// エントリ全体で最も頻度の高い頻度帯を返します。
    pub fn best_frequency_tier(&self) -> FrequencyTier {
        self.readings
            .iter()
            .map(Reading::frequency_tier)
            .min()
            .unwrap_or(FrequencyTier::NONE)
    }

    /// 指定した表記の頻度帯を返します。
    ///
    /// 表記に頻度タグがない場合はエントリ全体の頻度帯を使用します。
    pub fn frequency_tier(&self, index: usize) -> FrequencyTier {
        match self.readings.get(index) {
            Some(r) if !r.priorities.is_empty() => r.frequency_tier(),
            _ => self.best_frequency_tier(),
        }
    }

    /// 表記の数を返します。
    #[inline(always)]
    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    /// エントリを検証します。
    ///
    /// 表記が1つもないエントリ、または空の表記を含むエントリは無効です。
    pub(crate) fn is_valid(&self) -> bool {
        !self.readings.is_empty() && self.readings.iter().all(|r| !r.text.is_empty())
    }
}

/// 頻度帯
///
/// 値が小さいほど一般的な語です。`nfXX`の順位は対数的な帯にまとめられ、
/// 同じ帯の語は同じ頻度スコアになります。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct FrequencyTier(u8);

impl FrequencyTier {
    /// 順位付きでない一般語(`ichi1`、`news1`、`spec1`、`spec2`、`gai1`)の帯
    pub const COMMON: Self = Self(6);

    /// 二次的な一般語(`ichi2`、`news2`、`gai2`)の帯
    pub const SECONDARY: Self = Self(7);

    /// 頻度タグなしの帯
    pub const NONE: Self = Self(8);

    /// 頻度タグのリストから頻度帯を決定します。
    ///
    /// 複数のタグがある場合は最も頻度の高い帯を採用します。
    pub fn from_priorities<S>(priorities: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        priorities
            .iter()
            .map(|p| Self::from_tag(p.as_ref()))
            .min()
            .unwrap_or(Self::NONE)
    }

    fn from_tag(tag: &str) -> Self {
        if let Some(rank) = tag.strip_prefix("nf")
            && let Ok(rank) = rank.parse::<u32>()
            && rank > 0
        {
            // nf01..nf48 は 0..=5 の帯に収まる
            return Self(rank.ilog2().min(5) as u8);
        }
        match tag {
            "ichi1" | "news1" | "spec1" | "spec2" | "gai1" => Self::COMMON,
            "ichi2" | "news2" | "gai2" => Self::SECONDARY,
            _ => Self::NONE,
        }
    }

    /// 帯の値を返します。
    #[inline(always)]
    pub const fn band(self) -> u8 {
        self.0
    }

    /// 最も頻度の低い帯からの距離を返します。スコア計算に使用します。
    #[inline(always)]
    pub const fn rank_from_bottom(self) -> u8 {
        Self::NONE.0 - self.0
    }
}
