//! 失敗ケースの分類と原因の推定
//!
//! 分割ケースでは、期待される単語列と解決された単語の列を比較します。
//! 辞書に見つからなかったトークン(記号など)は比較に含めません。
//! 食い違いがあれば、結合後のトークン列と文字位置で突き合わせ、
//! 最初の食い違いについてトークナイザーと結合器のどちらに原因があるかを
//! [`ParserDiagnostics`]から推定します。
//! 表記選択ケースでは、期待される候補が選ばれなかった理由をスコアの要素から求めます。

use std::ops::Range;

use serde::{Deserialize, Serialize};

use kotoba::diagnostics::ModificationKind;
use kotoba::errors::KotobaError;
use kotoba::{Analyzer, DictionaryStore, Parser, ParserDiagnostics};

/// 分割ケース
#[derive(Clone, Debug, Deserialize)]
pub struct SegmentationCase {
    pub input: String,

    /// 期待される単語の表層形の列。空白は含めません。
    pub expected: Vec<String>,
}

/// 表記選択ケース
#[derive(Clone, Debug, Deserialize)]
pub struct FormCase {
    pub input: String,

    /// 対象のトークンの表層形
    pub token: String,

    pub word_id: u32,
    pub reading_index: usize,
}

/// コーパスの1行
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Case {
    Form(FormCase),
    Segmentation(SegmentationCase),
}

impl Case {
    pub fn input(&self) -> &str {
        match self {
            Self::Form(case) => &case.input,
            Self::Segmentation(case) => &case.input,
        }
    }
}

/// 分割の食い違いの種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// 期待より細かく分割された
    OverSegmentation,
    /// 期待より粗く分割された
    UnderSegmentation,
    /// トークン数は同じだが境界が異なる
    TokenMismatch,
}

/// 期待される単語列と実際のトークン列を比較します。一致する場合は`None`を返します。
pub fn classify<S>(expected: &[S], actual: &[S]) -> Option<MismatchKind>
where
    S: AsRef<str>,
{
    if expected.iter().map(AsRef::as_ref).eq(actual.iter().map(AsRef::as_ref)) {
        return None;
    }
    Some(match actual.len().cmp(&expected.len()) {
        std::cmp::Ordering::Greater => MismatchKind::OverSegmentation,
        std::cmp::Ordering::Less => MismatchKind::UnderSegmentation,
        std::cmp::Ordering::Equal => MismatchKind::TokenMismatch,
    })
}

/// 分割の食い違いの推定原因
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum Cause {
    /// トークナイザーが単語を分割し、どの段階も結合しなかった
    TokenizerSplit { word: String, pieces: Vec<String> },
    /// トークナイザーが複数の単語を1トークンとして出力した
    TokenizerMerge { token: String },
    /// 結合器の段階がトークンを結合した
    StageMerge {
        stage: String,
        inputs: Vec<String>,
        output: String,
    },
    /// 結合器の段階が単語を分割した
    StageSplit { stage: String, word: String },
    Unknown,
}

impl Cause {
    /// 修正の提案を返します。
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::TokenizerSplit { pieces, .. } if (2..=3).contains(&pieces.len()) => {
                let parts: Vec<String> = pieces.iter().map(|p| format!("{p:?}")).collect();
                Some(format!(
                    "add a fixed sequence entry: expression(&[{}])",
                    parts.join(", ")
                ))
            }
            Self::TokenizerSplit { word, pieces } if pieces.len() > 3 => Some(format!(
                "{word:?} splits into {} pieces; merge it in a custom combiner stage",
                pieces.len()
            )),
            Self::StageMerge {
                stage,
                inputs,
                output,
            } => Some(format!(
                "review the {stage} stage, which merged {inputs:?} into {output:?}"
            )),
            Self::StageSplit { stage, word } => {
                Some(format!("review the {stage} stage, which split {word:?}"))
            }
            _ => None,
        }
    }
}

/// 文字位置の範囲と表層形
#[derive(Clone, Debug)]
struct Span<'a> {
    range: Range<usize>,
    text: &'a str,
}

impl Span<'_> {
    fn overlaps(&self, other: &Range<usize>) -> bool {
        self.range.start < other.end && other.start < self.range.end
    }

    fn within(&self, other: &Range<usize>) -> bool {
        other.start <= self.range.start && self.range.end <= other.end
    }
}

/// 期待される単語を入力の先頭から順に探し、文字位置を求めます。
fn locate<'a>(input: &str, words: &'a [String]) -> Vec<Span<'a>> {
    let mut spans = vec![];
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for word in words {
        let Some(offset) = input[byte_cursor..].find(word.as_str()) else {
            log::warn!("{word:?} was not found in {input:?}");
            continue;
        };
        let start = char_cursor + input[byte_cursor..byte_cursor + offset].chars().count();
        let end = start + word.chars().count();
        spans.push(Span {
            range: start..end,
            text: word,
        });
        byte_cursor += offset + word.len();
        char_cursor = end;
    }
    spans
}

/// 結合後のトークンの表層形の列を返します。空白のみのトークンは除きます。
pub fn combined_surfaces(diagnostics: &ParserDiagnostics) -> Vec<String> {
    diagnostics
        .resolutions
        .iter()
        .filter(|r| !r.surface.trim().is_empty())
        .map(|r| r.surface.clone())
        .collect()
}

fn combined_spans(diagnostics: &ParserDiagnostics) -> Vec<Span<'_>> {
    diagnostics
        .resolutions
        .iter()
        .filter(|r| !r.surface.trim().is_empty())
        .map(|r| Span {
            range: r.start..r.start + r.surface.chars().count(),
            text: &r.surface,
        })
        .collect()
}

fn tokenizer_spans(diagnostics: &ParserDiagnostics) -> Vec<Span<'_>> {
    diagnostics
        .tokenizer_output
        .iter()
        .map(|t| Span {
            range: t.range_char(),
            text: t.surface(),
        })
        .collect()
}

fn merge_cause(token: &Span, diagnostics: &ParserDiagnostics) -> Cause {
    match diagnostics
        .modifications_producing(token.text)
        .find(|(_, m)| m.kind == ModificationKind::Merge)
    {
        Some((stage, m)) => Cause::StageMerge {
            stage: stage.to_string(),
            inputs: m.input_tokens.clone(),
            output: m.output_token.clone(),
        },
        None => Cause::TokenizerMerge {
            token: token.text.to_string(),
        },
    }
}

fn split_cause(word: &Span, diagnostics: &ParserDiagnostics) -> Cause {
    let tokenizer = tokenizer_spans(diagnostics);
    if tokenizer.iter().any(|t| t.range == word.range) {
        let split = diagnostics.stages.iter().find_map(|stage| {
            stage
                .modifications
                .iter()
                .any(|m| m.kind == ModificationKind::Split && m.input_tokens.iter().any(|t| t == word.text))
                .then(|| stage.stage_name.clone())
        });
        return match split {
            Some(stage) => Cause::StageSplit {
                stage,
                word: word.text.to_string(),
            },
            None => Cause::Unknown,
        };
    }
    Cause::TokenizerSplit {
        word: word.text.to_string(),
        pieces: tokenizer
            .iter()
            .filter(|t| t.within(&word.range))
            .map(|t| t.text.to_string())
            .collect(),
    }
}

/// 最初の食い違いについて原因を推定します。
///
/// # 引数
///
/// * `expected` - 期待される単語の表層形の列
/// * `diagnostics` - 入力を解析した際の記録
pub fn probable_cause(expected: &[String], diagnostics: &ParserDiagnostics) -> Cause {
    let expected = locate(&diagnostics.input_text, expected);
    let actual = combined_spans(diagnostics);

    if let Some(word) = expected
        .iter()
        .find(|e| !actual.iter().any(|a| a.range == e.range))
    {
        let covering: Vec<&Span> = actual.iter().filter(|a| a.overlaps(&word.range)).collect();
        if let Some(crossing) = covering.iter().find(|a| !a.within(&word.range)) {
            return merge_cause(crossing, diagnostics);
        }
        return split_cause(word, diagnostics);
    }
    if let Some(token) = actual
        .iter()
        .find(|a| !expected.iter().any(|e| e.range == a.range))
    {
        return merge_cause(token, diagnostics);
    }
    Cause::Unknown
}

/// 表記選択の失敗の推定原因
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum FormCause {
    /// 対象の表層形がトークンとして現れなかった
    TokenNotFound { tokens: Vec<String> },
    /// 期待される単語が候補に含まれなかった
    NotACandidate,
    /// 期待される単語は選ばれたが、表記が異なる
    WrongForm { selected_index: usize },
    /// 他の候補がスコアで上回った
    Outranked {
        winner: u32,
        /// 最初に差のついたスコアの要素
        component: &'static str,
    },
}

impl FormCause {
    pub fn suggestion(&self, token: &str) -> Option<String> {
        match self {
            Self::TokenNotFound { .. } => {
                Some(format!("{token:?} is not a token; check the segmentation first"))
            }
            Self::Outranked {
                component: "reading_match",
                ..
            } => Some(format!("add a reading override rule for {token:?}")),
            Self::Outranked {
                component: "pos_match",
                ..
            } => Some(format!("check the part of speech assigned to {token:?}")),
            _ => None,
        }
    }
}

/// 表記選択ケースの失敗の原因を求めます。
pub fn form_cause(case: &FormCase, diagnostics: &ParserDiagnostics) -> FormCause {
    let Some(resolution) = diagnostics.resolution(&case.token) else {
        return FormCause::TokenNotFound {
            tokens: combined_surfaces(diagnostics),
        };
    };
    let Some(expected) = resolution
        .candidates
        .iter()
        .find(|c| c.word_id == case.word_id)
    else {
        return FormCause::NotACandidate;
    };
    if expected.reading_index != case.reading_index {
        return FormCause::WrongForm {
            selected_index: expected.reading_index,
        };
    }
    let Some(selected) = resolution.selected() else {
        return FormCause::NotACandidate;
    };
    let component = if selected.reading_match != expected.reading_match {
        "reading_match"
    } else if selected.form_match != expected.form_match {
        "form_match"
    } else if selected.pos_match != expected.pos_match {
        "pos_match"
    } else if selected.priority != expected.priority {
        "priority"
    } else {
        "word_id"
    };
    FormCause::Outranked {
        winner: selected.word_id,
        component,
    }
}

/// 失敗の内容
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "case", rename_all = "snake_case")]
pub enum FailureKind {
    Segmentation {
        mismatch: MismatchKind,
        expected: Vec<String>,
        actual: Vec<String>,
        cause: Cause,
    },
    FormSelection {
        token: String,
        expected: (u32, usize),
        actual: Option<(u32, usize)>,
        cause: FormCause,
    },
}

/// 失敗したケース
#[derive(Clone, Debug, Serialize)]
pub struct Failure {
    /// コーパスの行番号(1始まり)
    pub line: usize,
    pub input: String,
    pub kind: FailureKind,
    pub suggestion: Option<String>,
    pub diagnostics: ParserDiagnostics,
}

/// 1つのケースを解析し、失敗した場合はその内容を返します。
///
/// # エラー
///
/// 解析器がエラーを返した場合はそのエラー。
pub fn evaluate<A, S>(
    parser: &Parser<A, S>,
    line: usize,
    case: &Case,
) -> Result<Option<Failure>, KotobaError>
where
    A: Analyzer,
    S: DictionaryStore,
{
    let mut diagnostics = ParserDiagnostics::new();
    let words = parser.parse(case.input(), Some(&mut diagnostics))?;

    let (kind, suggestion) = match case {
        Case::Segmentation(case) => {
            let actual: Vec<String> = words.iter().map(|w| w.original_text.clone()).collect();
            let Some(mismatch) = classify(&case.expected, &actual) else {
                return Ok(None);
            };
            let cause = probable_cause(&case.expected, &diagnostics);
            let suggestion = cause.suggestion();
            let kind = FailureKind::Segmentation {
                mismatch,
                expected: case.expected.clone(),
                actual,
                cause,
            };
            (kind, suggestion)
        }
        Case::Form(case) => {
            let actual = words
                .iter()
                .find(|w| w.original_text == case.token)
                .map(|w| (w.word_id, w.reading_index));
            if actual == Some((case.word_id, case.reading_index)) {
                return Ok(None);
            }
            let cause = form_cause(case, &diagnostics);
            let suggestion = cause.suggestion(&case.token);
            let kind = FailureKind::FormSelection {
                token: case.token.clone(),
                expected: (case.word_id, case.reading_index),
                actual,
                cause,
            };
            (kind, suggestion)
        }
    };
    Ok(Some(Failure {
        line,
        input: case.input().to_string(),
        kind,
        suggestion,
        diagnostics,
    }))
}
