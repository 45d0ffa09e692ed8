//! 特殊ケース結合器
//!
//! トークナイザーの出力を、解決に適した単位に書き換えます。
//! 以下の段階をこの順に適用します。
//!
//! 1. 複合助詞の分割([`particles`])
//! 2. 固定列の結合([`sequences`])
//! 3. 活用語の結合([`inflection`])
//! 4. 文脈による読みの上書き([`overrides`])
//!
//! どの規則にも該当しないトークンはそのまま通過します。

pub mod inflection;
pub mod overrides;
pub mod particles;
pub mod sequences;

use crate::diagnostics::{Modification, ParserDiagnostics, StageRecord};
use crate::token::{CombinedToken, Token};

/// 結合器の1段階
struct Stage {
    name: &'static str,
    apply: fn(Vec<CombinedToken>, &mut Vec<Modification>) -> Vec<CombinedToken>,
}

const STAGES: &[Stage] = &[
    Stage {
        name: "SplitCompoundParticles",
        apply: particles::split_compound_particles,
    },
    Stage {
        name: "FixedSequences",
        apply: sequences::merge_fixed_sequences,
    },
    Stage {
        name: "Inflections",
        apply: inflection::merge_inflections,
    },
    Stage {
        name: "ReadingOverrides",
        apply: overrides::apply_reading_overrides,
    },
];

/// トークン列にすべての段階を適用します。
///
/// # 引数
///
/// * `tokens` - トークナイザーアダプターの出力
/// * `diagnostics` - 各段階の記録先
///
/// # 戻り値
///
/// 結合後のトークン列
pub fn combine(
    tokens: Vec<Token>,
    mut diagnostics: Option<&mut ParserDiagnostics>,
) -> Vec<CombinedToken> {
    let mut tokens: Vec<CombinedToken> = tokens.into_iter().map(CombinedToken::from).collect();
    for stage in STAGES {
        let input_token_count = tokens.len();
        let mut modifications = vec![];
        tokens = (stage.apply)(tokens, &mut modifications);
        log::debug!(
            "{}: {} -> {} tokens, {} modifications",
            stage.name,
            input_token_count,
            tokens.len(),
            modifications.len()
        );
        if let Some(diagnostics) = diagnostics.as_deref_mut() {
            diagnostics.stages.push(StageRecord {
                stage_name: stage.name.to_string(),
                input_token_count,
                output_token_count: tokens.len(),
                modifications,
            });
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::diagnostics::ModificationKind;
    use crate::token::PartOfSpeech;

    #[test]
    fn test_stages_recorded_in_order() {
        let tokens = vec![
            Token::new("初め", 0)
                .with_pos_sections(["動詞", "自立"])
                .with_reading("ハジメ")
                .with_dictionary_form("初める"),
            Token::new("まし", 2)
                .with_pos_sections(["助動詞"])
                .with_reading("マシ")
                .with_dictionary_form("ます"),
            Token::new("て", 4)
                .with_pos_sections(["助詞", "接続助詞"])
                .with_reading("テ"),
        ];
        let mut diagnostics = ParserDiagnostics::new();
        let combined = combine(tokens, Some(&mut diagnostics));

        assert_eq!(1, combined.len());
        assert_eq!("初めまして", combined[0].surface());
        assert_eq!(PartOfSpeech::Expression, combined[0].pos());

        let names: Vec<&str> = diagnostics.stages.iter().map(|s| s.stage_name.as_str()).collect();
        assert_eq!(
            vec![
                "SplitCompoundParticles",
                "FixedSequences",
                "Inflections",
                "ReadingOverrides"
            ],
            names
        );
        let fixed = diagnostics.stage("FixedSequences").unwrap();
        assert_eq!(3, fixed.input_token_count);
        assert_eq!(1, fixed.output_token_count);
        assert_eq!(ModificationKind::Merge, fixed.modifications[0].kind);
        assert_eq!(
            vec!["初め", "まし", "て"],
            fixed.modifications[0].input_tokens
        );
        assert!(diagnostics.stage("Inflections").unwrap().modifications.is_empty());
    }

    #[test]
    fn test_untouched_tokens_pass_through() {
        let tokens = vec![
            Token::new("猫", 0).with_pos_sections(["名詞", "一般"]).with_reading("ネコ"),
            Token::new("。", 1).with_pos_sections(["記号", "句点"]),
        ];
        let combined = combine(tokens.clone(), None);
        assert_eq!(2, combined.len());
        for (c, t) in combined.iter().zip(&tokens) {
            assert_eq!(std::slice::from_ref(t), c.parts());
            assert_eq!(t.reading(), c.reading());
        }
    }
}
