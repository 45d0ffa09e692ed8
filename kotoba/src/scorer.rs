//! 候補のスコア付け
//!
//! 各候補のスコアの要素を個別に計算し、次の順序の辞書式比較で順位を決めます。
//!
//! 1. 読みの一致(完全一致 > 語幹一致 > 不一致)
//! 2. 表記の一致([`FormMatch`])
//! 3. 品詞の一致
//! 4. 優先度(頻度スコア + かな書きボーナス − 古語ペナルティ)
//! 5. 単語IDの小さいもの
//!
//! この比較は全順序であり、同点になることはありません。

use std::cmp::{Ordering, Reverse};

use serde::{Deserialize, Serialize};

use crate::dictionary::{DictionaryEntry, FrequencyTier, Sense};
use crate::kana;
use crate::resolver::{Candidate, FormMatch};
use crate::token::CombinedToken;

/// 読みの一致の度合い
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMatch {
    None,
    /// 活用語の語幹の読みが発音の先頭と一致
    Stem,
    Exact,
}

/// 優先度の重み
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// 頻度帯1つあたりのスコア
    pub band_weight: i32,

    /// かな書きボーナス
    pub kana_bonus: i32,

    /// 古語ペナルティ
    pub archaic_penalty: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            band_weight: 10,
            kana_bonus: 100,
            archaic_penalty: 200,
        }
    }
}

/// スコア付けされた候補
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoredCandidate {
    pub word_id: u32,
    pub reading_index: usize,

    /// 選択された表記
    pub form: String,

    /// 選択された表記の発音(ひらがな)
    pub pronunciation: String,

    pub reading_match: ReadingMatch,
    pub form_match: FormMatch,
    pub pos_match: bool,
    pub frequency_tier: FrequencyTier,
    pub frequency_score: i32,
    pub kana_bonus: i32,
    pub archaic_penalty: i32,

    /// 優先度の合計
    pub priority: i32,
}

impl ScoredCandidate {
    fn rank_key(&self) -> (ReadingMatch, FormMatch, bool, i32, Reverse<u32>, Reverse<usize>) {
        (
            self.reading_match,
            self.form_match,
            self.pos_match,
            self.priority,
            Reverse(self.word_id),
            Reverse(self.reading_index),
        )
    }

    /// 2つの候補を比較します。`Ordering::Greater`は`self`の方が良いことを表します。
    pub fn compare(&self, other: &Self) -> Ordering {
        self.rank_key().cmp(&other.rank_key())
    }
}

/// 候補のスコア付けを行う構造体
#[derive(Clone, Debug, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    /// 新しいインスタンスを作成します。
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// 候補のスコアの要素を計算します。
    ///
    /// # 引数
    ///
    /// * `token` - 解決対象のトークン
    /// * `candidate` - 候補
    pub fn score(&self, token: &CombinedToken, candidate: &Candidate) -> ScoredCandidate {
        let entry = candidate.entry.as_ref();
        let index = candidate.reading_index;
        let pronunciation = entry.pronunciation(index).unwrap_or_default();

        let reading_match = reading_match(token, &pronunciation);
        let compatible: Vec<&Sense> = entry
            .senses
            .iter()
            .filter(|s| s.pos.iter().any(|tag| token.pos().accepts_tag(tag)))
            .collect();
        let pos_match = !compatible.is_empty();

        let frequency_tier = entry.frequency_tier(index);
        let frequency_score = self
            .weights
            .band_weight
            .saturating_mul(i32::from(frequency_tier.rank_from_bottom()));
        let kana_bonus = if self.usually_kana(token, entry, &compatible) {
            self.weights.kana_bonus
        } else {
            0
        };
        let archaic_penalty = if entry.is_fully_archaic() {
            self.weights.archaic_penalty
        } else {
            0
        };

        ScoredCandidate {
            word_id: entry.word_id,
            reading_index: index,
            form: entry
                .readings
                .get(index)
                .map(|r| r.text.clone())
                .unwrap_or_default(),
            pronunciation,
            reading_match,
            form_match: candidate.form_match,
            pos_match,
            frequency_tier,
            frequency_score,
            kana_bonus,
            archaic_penalty,
            priority: frequency_score
                .saturating_add(kana_bonus)
                .saturating_sub(archaic_penalty),
        }
    }

    fn usually_kana(&self, token: &CombinedToken, entry: &DictionaryEntry, compatible: &[&Sense]) -> bool {
        if !token.is_kana() {
            return false;
        }
        if compatible.is_empty() {
            entry.senses.iter().any(Sense::is_usually_kana)
        } else {
            compatible.iter().any(|s| s.is_usually_kana())
        }
    }

    /// 候補をスコア付けし、良い順に並べて返します。
    pub fn rank<I>(&self, token: &CombinedToken, candidates: I) -> Vec<ScoredCandidate>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|c| self.score(token, &c))
            .collect();
        scored.sort_by(|a, b| b.compare(a));
        scored
    }
}

/// トークンの読みと候補の発音を比較します。
///
/// 活用形から戻されたトークンでは、語幹の読みが発音の先頭と一致すれば語幹一致とします。
pub fn reading_match(token: &CombinedToken, pronunciation: &str) -> ReadingMatch {
    if pronunciation.is_empty() {
        return ReadingMatch::None;
    }
    let reading = kana::to_hiragana(token.reading());
    if reading == pronunciation {
        return ReadingMatch::Exact;
    }
    match token.stem_reading() {
        Some(stem) if pronunciation.starts_with(stem.as_str()) => ReadingMatch::Stem,
        _ => ReadingMatch::None,
    }
}
