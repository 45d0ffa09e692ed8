//! 活用語の結合
//!
//! 動詞・形容詞・助動詞に続く助動詞、接続助詞、補助動詞を1語にまとめます。
//! 結合後のトークンは先頭の語の辞書形と品詞を引き継ぎます。

use crate::diagnostics::{Modification, ModificationKind};
use crate::token::{CombinedToken, PartOfSpeech};

/// 活用語に続けて結合する接続助詞
pub static CONJUNCTIVE_PARTICLES: &[&str] = &["て", "で", "ば", "ちゃ", "じゃ"];

/// 活用語に続けて結合する補助動詞(辞書形)
pub static BOUND_VERBS: &[&str] = &[
    "いる", "ある", "しまう", "おく", "くる", "いく", "みる", "ちゃう", "じゃう",
];

fn is_dependent(token: &CombinedToken) -> bool {
    token
        .head()
        .is_some_and(|t| t.pos_sections().iter().any(|s| s.starts_with("非自立")))
}

/// 直前の活用語に吸収されるトークンかどうかを判定します。
fn is_absorbed(token: &CombinedToken) -> bool {
    match token.pos() {
        PartOfSpeech::Auxiliary => true,
        PartOfSpeech::Particle => CONJUNCTIVE_PARTICLES.contains(&token.surface()),
        PartOfSpeech::Verb => {
            BOUND_VERBS.contains(&token.dictionary_form()) && is_dependent(token)
        }
        _ => false,
    }
}

pub(crate) fn merge_inflections(
    tokens: Vec<CombinedToken>,
    modifications: &mut Vec<Modification>,
) -> Vec<CombinedToken> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(head) = iter.next() {
        if !head.pos().is_inflecting() {
            result.push(head);
            continue;
        }
        let mut group = vec![head];
        while let Some(next) = iter.next_if(is_absorbed) {
            group.push(next);
        }
        if group.len() == 1 {
            result.extend(group);
            continue;
        }
        let pos = group[0].pos();
        let dictionary_form = group[0].dictionary_form().to_string();
        let inputs = group.clone();
        let merged = CombinedToken::merge(group, pos, None, Some(dictionary_form));
        modifications.push(Modification::new(ModificationKind::Merge, &inputs, &merged));
        result.push(merged);
    }
    result
}
