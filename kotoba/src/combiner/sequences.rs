//! 固定列の結合
//!
//! 常に1語として扱うべきトークンの表層形の列を登録した表です。
//! 各位置で最も長い列から順に、連続する表層形の完全一致で照合します。

use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::diagnostics::{Modification, ModificationKind};
use crate::token::{CombinedToken, PartOfSpeech};

/// 結合するトークン列
#[derive(Debug)]
pub struct FixedSequence {
    /// 構成するトークンの表層形
    pub parts: &'static [&'static str],

    /// 結合後の品詞
    pub pos: PartOfSpeech,

    /// 結合後の読み。`None`の場合は構成トークンの読みを連結します。
    pub reading: Option<&'static str>,
}

const fn expression(parts: &'static [&'static str]) -> FixedSequence {
    FixedSequence {
        parts,
        pos: PartOfSpeech::Expression,
        reading: None,
    }
}

/// 固定列の登録表
pub static FIXED_SEQUENCES: &[FixedSequence] = &[
    expression(&["に", "つい", "て"]),
    expression(&["に", "とっ", "て"]),
    expression(&["に", "よっ", "て"]),
    expression(&["に", "対し", "て"]),
    expression(&["と", "し", "て"]),
    expression(&["と", "いう"]),
    expression(&["かも", "しれ", "ない"]),
    expression(&["だろ", "う"]),
    expression(&["でしょ", "う"]),
    expression(&["初め", "まし", "て"]),
    expression(&["何", "と", "なく"]),
    expression(&["ところ", "で"]),
    expression(&["そう", "いえ", "ば"]),
    expression(&["ありがとう", "ござい", "ます"]),
    FixedSequence {
        parts: &["ちゃん", "と"],
        pos: PartOfSpeech::Adverb,
        reading: Some("チャント"),
    },
];

/// 先頭の表層形から、長い順に並べた固定列への索引
static BY_FIRST_PART: LazyLock<HashMap<&'static str, Vec<&'static FixedSequence>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, Vec<&'static FixedSequence>> = HashMap::new();
        for seq in FIXED_SEQUENCES {
            if let Some(first) = seq.parts.first() {
                map.entry(*first).or_default().push(seq);
            }
        }
        for seqs in map.values_mut() {
            seqs.sort_by_key(|s| std::cmp::Reverse(s.parts.len()));
        }
        map
    });

fn matches(seq: &FixedSequence, tokens: &[CombinedToken]) -> bool {
    tokens.len() >= seq.parts.len()
        && seq
            .parts
            .iter()
            .zip(tokens)
            .all(|(part, token)| *part == token.surface())
}

/// `tokens`の先頭で一致する最長の固定列を返します。
pub fn longest_match(tokens: &[CombinedToken]) -> Option<&'static FixedSequence> {
    let first = tokens.first()?;
    BY_FIRST_PART
        .get(first.surface())?
        .iter()
        .copied()
        .find(|seq| matches(seq, tokens))
}

pub(crate) fn merge_fixed_sequences(
    tokens: Vec<CombinedToken>,
    modifications: &mut Vec<Modification>,
) -> Vec<CombinedToken> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut rest = tokens.as_slice();
    while !rest.is_empty() {
        let Some(seq) = longest_match(rest) else {
            result.push(rest[0].clone());
            rest = &rest[1..];
            continue;
        };
        let (group, tail) = rest.split_at(seq.parts.len());
        let merged = CombinedToken::merge(group.to_vec(), seq.pos, seq.reading, None);
        modifications.push(Modification::new(ModificationKind::Merge, group, &merged));
        result.push(merged);
        rest = tail;
    }
    result
}
