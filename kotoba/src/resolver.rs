//! 候補解決器
//!
//! 結合後のトークンごとに、表記が一致する辞書エントリを検索し、
//! エントリごとに使用する表記(`reading_index`)を選択します。

use std::sync::Arc;

use hashbrown::HashSet;
use serde::Serialize;

use crate::dictionary::{DictionaryEntry, DictionaryStore, FormType};
use crate::errors::Result;
use crate::kana;
use crate::token::{CombinedToken, PartOfSpeech};

/// 選択された表記とトークンの一致の度合い
///
/// 後のバリアントほど良い一致です。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMatch {
    /// かなをひらがなに畳み込んだ後で一致
    Folded,
    /// 辞書形(活用を戻した形)と一致
    Stem,
    /// 検索専用の表記と表層形が完全一致
    ExactSearchOnly,
    /// 通常の表記と表層形が完全一致
    Exact,
}

/// 1つのトークンに対する候補
#[derive(Clone, Debug)]
pub struct Candidate {
    /// 辞書エントリ
    pub entry: Arc<DictionaryEntry>,

    /// 選択された表記のインデックス
    pub reading_index: usize,

    /// 表記とトークンの一致の度合い
    pub form_match: FormMatch,
}

/// 候補を検索する必要のないトークンかどうかを返します。
fn is_skipped(token: &CombinedToken) -> bool {
    token.pos() == PartOfSpeech::Symbol || token.surface().trim().is_empty()
}

/// トークンの検索キーを返します。
///
/// 表層形、辞書形、およびそれぞれをひらがなに畳み込んだものです。
pub fn lookup_keys(token: &CombinedToken) -> Vec<String> {
    let mut keys: Vec<String> = vec![];
    let mut push = |key: String| {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    };
    push(token.surface().to_string());
    if let Some(folded) = kana::fold_kana(token.surface()) {
        push(folded);
    }
    if token.is_deconjugated() {
        push(token.dictionary_form().to_string());
        if let Some(folded) = kana::fold_kana(token.dictionary_form()) {
            push(folded);
        }
    }
    keys
}

/// エントリの中からトークンに最も一致する表記を選択します。
///
/// 表層形と完全一致する表記があれば、それが検索専用であっても他の表記より優先します。
///
/// # 戻り値
///
/// 表記のインデックスと一致の度合い。一致する表記がない場合は`None`
pub fn select_form(entry: &DictionaryEntry, token: &CombinedToken) -> Option<(usize, FormMatch)> {
    let surface = token.surface();
    let readings = &entry.readings;

    let exact = |search_only: bool| {
        readings.iter().position(|r| {
            r.text == surface && (r.form_type == FormType::SearchOnlyKana) == search_only
        })
    };
    if let Some(i) = exact(false) {
        return Some((i, FormMatch::Exact));
    }
    if let Some(i) = exact(true) {
        return Some((i, FormMatch::ExactSearchOnly));
    }

    if token.is_deconjugated() {
        let base = token.dictionary_form();
        if let Some(i) = readings.iter().position(|r| r.text == base) {
            return Some((prefer_kana_form(entry, i, token), FormMatch::Stem));
        }
        if let Some(folded) = kana::fold_kana(base)
            && let Some(i) = position_folded(entry, &folded)
        {
            return Some((prefer_kana_form(entry, i, token), FormMatch::Stem));
        }
    }

    let folded = kana::fold_kana(surface)?;
    position_folded(entry, &folded).map(|i| (i, FormMatch::Folded))
}

/// ひらがなに畳み込んだ表記が一致する位置を返します。通常の表記を優先します。
fn position_folded(entry: &DictionaryEntry, folded: &str) -> Option<usize> {
    let matches = |i: &usize| {
        let r = &entry.readings[*i];
        let text = if r.form_type.is_kana() {
            Some(r.text.as_str())
        } else {
            r.kana.as_deref()
        };
        text.and_then(kana::fold_kana).as_deref() == Some(folded)
    };
    let all = 0..entry.readings.len();
    all.clone()
        .filter(|&i| entry.readings[i].form_type != FormType::SearchOnlyKana)
        .find(matches)
        .or_else(|| all.clone().find(matches))
}

/// かなで書かれた活用形の場合、漢字表記の代わりに同じ発音のかな表記を選びます。
fn prefer_kana_form(entry: &DictionaryEntry, index: usize, token: &CombinedToken) -> usize {
    if !token.is_kana() || entry.readings[index].form_type.is_kana() {
        return index;
    }
    let Some(pron) = entry.pronunciation(index) else {
        return index;
    };
    entry
        .readings
        .iter()
        .position(|r| r.form_type == FormType::Kana && kana::to_hiragana(&r.text) == pron)
        .unwrap_or(index)
}

/// トークン列のすべての候補を検索します。
///
/// すべての検索キーは1回の[`DictionaryStore::lookup_many`]で問い合わせます。
///
/// # 戻り値
///
/// トークンと同じ順序の候補リスト。候補のないトークンは空のリストになります。
///
/// # エラー
///
/// 辞書ストアの失敗をそのまま返します。
pub fn resolve<S>(tokens: &[CombinedToken], store: &S) -> Result<Vec<Vec<Candidate>>>
where
    S: DictionaryStore + ?Sized,
{
    let token_keys: Vec<Vec<String>> = tokens
        .iter()
        .map(|t| if is_skipped(t) { vec![] } else { lookup_keys(t) })
        .collect();

    let mut unique = HashSet::new();
    let batch: Vec<&str> = token_keys
        .iter()
        .flatten()
        .map(String::as_str)
        .filter(|k| unique.insert(*k))
        .collect();
    let found = store.lookup_many(&batch)?;
    log::trace!("{} lookup keys, {} hits", batch.len(), found.len());

    Ok(tokens
        .iter()
        .zip(&token_keys)
        .map(|(token, keys)| {
            let mut seen = HashSet::new();
            keys.iter()
                .filter_map(|k| found.get(k))
                .flatten()
                .filter(|e| seen.insert(e.word_id))
                .filter_map(|entry| {
                    select_form(entry, token).map(|(reading_index, form_match)| Candidate {
                        entry: Arc::clone(entry),
                        reading_index,
                        form_match,
                    })
                })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::{Reading, Sense};
    use crate::token::Token;

    fn reading(text: &str, form_type: FormType, kana: Option<&str>) -> Reading {
        Reading {
            text: text.to_string(),
            form_type,
            kana: kana.map(str::to_string),
            priorities: vec![],
        }
    }

    fn mendoi() -> DictionaryEntry {
        DictionaryEntry {
            word_id: 2078360,
            readings: vec![
                reading("面倒い", FormType::Kanji, Some("めんどい")),
                reading("めんどい", FormType::Kana, None),
                reading("メンドイ", FormType::SearchOnlyKana, None),
            ],
            senses: vec![Sense::default()],
        }
    }

    #[test]
    fn test_exact_search_only_preferred() {
        let token = CombinedToken::from(Token::new("メンドイ", 0));
        assert_eq!(
            Some((2, FormMatch::ExactSearchOnly)),
            select_form(&mendoi(), &token)
        );
    }

    #[test]
    fn test_folded() {
        let token = CombinedToken::from(Token::new("メンドい", 0));
        assert_eq!(Some((1, FormMatch::Folded)), select_form(&mendoi(), &token));
    }

    #[test]
    fn test_stem_prefers_kana_for_kana_surface() {
        let entry = DictionaryEntry {
            word_id: 1358280,
            readings: vec![
                reading("食べる", FormType::Kanji, Some("たべる")),
                reading("喰べる", FormType::Kanji, Some("たべる")),
                reading("たべる", FormType::Kana, None),
            ],
            senses: vec![Sense::default()],
        };
        let kanji = CombinedToken::from(Token::new("食べた", 0).with_dictionary_form("食べる"));
        assert_eq!(Some((0, FormMatch::Stem)), select_form(&entry, &kanji));

        let kana = CombinedToken::from(Token::new("たべた", 0).with_dictionary_form("食べる"));
        assert_eq!(Some((2, FormMatch::Stem)), select_form(&entry, &kana));
    }

    #[test]
    fn test_lookup_keys() {
        let token = CombinedToken::from(Token::new("ママ", 0));
        assert_eq!(vec!["ママ", "まま"], lookup_keys(&token));

        let token = CombinedToken::from(Token::new("開いた", 0).with_dictionary_form("開く"));
        assert_eq!(vec!["開いた", "開く"], lookup_keys(&token));
    }
}
