//! 複合助詞の分割
//!
//! トークナイザーが1語として出力する複合助詞を、構成する助詞に分割します。

use crate::diagnostics::{Modification, ModificationKind};
use crate::kana;
use crate::token::{CombinedToken, PartOfSpeech, Token};

/// 分割する複合助詞と、その構成要素
pub static COMPOUND_PARTICLES: &[(&str, &[&str])] = &[
    ("には", &["に", "は"]),
    ("では", &["で", "は"]),
    ("とは", &["と", "は"]),
    ("にも", &["に", "も"]),
    ("でも", &["で", "も"]),
    ("へは", &["へ", "は"]),
    ("からは", &["から", "は"]),
    ("までは", &["まで", "は"]),
];

fn components(token: &CombinedToken) -> Option<&'static [&'static str]> {
    if token.pos() != PartOfSpeech::Particle || token.parts().len() != 1 {
        return None;
    }
    COMPOUND_PARTICLES
        .iter()
        .find(|(surface, _)| *surface == token.surface())
        .map(|(_, parts)| *parts)
}

pub(crate) fn split_compound_particles(
    tokens: Vec<CombinedToken>,
    modifications: &mut Vec<Modification>,
) -> Vec<CombinedToken> {
    let mut result = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Some(parts) = components(&token) else {
            result.push(token);
            continue;
        };
        let sections = token.head().map(|t| t.pos_sections().to_vec()).unwrap_or_default();
        let mut start = token.start();
        for &part in parts {
            let piece = CombinedToken::from(
                Token::new(part, start)
                    .with_pos_sections(sections.iter().cloned())
                    .with_pos(PartOfSpeech::Particle)
                    .with_reading(kana::to_katakana(part)),
            );
            start += piece.len();
            modifications.push(Modification::new(
                ModificationKind::Split,
                std::slice::from_ref(&token),
                &piece,
            ));
            result.push(piece);
        }
    }
    result
}
