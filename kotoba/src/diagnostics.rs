//! 解析過程の記録
//!
//! [`ParserDiagnostics`]は呼び出し元が所有し、解析時に可変参照として渡す記録器です。
//! 解析結果には影響しません。

use serde::Serialize;

use crate::scorer::ScoredCandidate;
use crate::token::{CombinedToken, Token};

/// 変更の種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationKind {
    Merge,
    Split,
    ReadingOverride,
}

/// 1つの段階で行われた変更
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Modification {
    /// 変更の種類
    pub kind: ModificationKind,

    /// 変更前のトークンの表層形
    pub input_tokens: Vec<String>,

    /// 変更後のトークンの表層形
    pub output_token: String,

    /// 変更後のトークンの読み
    pub output_reading: String,
}

impl Modification {
    pub(crate) fn new(kind: ModificationKind, inputs: &[CombinedToken], output: &CombinedToken) -> Self {
        Self {
            kind,
            input_tokens: inputs.iter().map(|t| t.surface().to_string()).collect(),
            output_token: output.surface().to_string(),
            output_reading: output.reading().to_string(),
        }
    }
}

/// 結合器の1段階の記録
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage_name: String,
    pub input_token_count: usize,
    pub output_token_count: usize,
    pub modifications: Vec<Modification>,
}

/// 1トークンの候補解決の記録
#[derive(Clone, Debug, Serialize)]
pub struct TokenResolution {
    /// トークンの表層形
    pub surface: String,

    /// トークンの開始位置(文字単位)
    pub start: usize,

    /// 照合に使用した読み(ひらがな)
    pub reading: String,

    /// スコアの高い順に並んだ候補
    pub candidates: Vec<ScoredCandidate>,
}

impl TokenResolution {
    /// 選択された候補を返します。
    pub fn selected(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }
}

/// 1回の解析の記録
#[derive(Clone, Debug, Default, Serialize)]
pub struct ParserDiagnostics {
    /// 入力テキスト
    pub input_text: String,

    /// トークナイザーの出力
    pub tokenizer_output: Vec<Token>,

    /// 結合器の各段階の記録(適用順)
    pub stages: Vec<StageRecord>,

    /// トークンごとの候補解決の記録
    pub resolutions: Vec<TokenResolution>,
}

impl ParserDiagnostics {
    /// 空の記録を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録を消去します。同じインスタンスを次の解析に再利用できます。
    pub fn clear(&mut self) {
        self.input_text.clear();
        self.tokenizer_output.clear();
        self.stages.clear();
        self.resolutions.clear();
    }

    /// 名前で段階の記録を検索します。
    pub fn stage(&self, name: &str) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.stage_name == name)
    }

    /// 表層形が`surface`のトークンを出力した変更を、段階名とともに返します。
    pub fn modifications_producing<'a>(
        &'a self,
        surface: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Modification)> + 'a {
        self.stages.iter().flat_map(move |stage| {
            stage
                .modifications
                .iter()
                .filter(move |m| m.output_token == surface)
                .map(move |m| (stage.stage_name.as_str(), m))
        })
    }

    /// 表層形が`surface`のトークンの候補解決の記録を返します。
    pub fn resolution(&self, surface: &str) -> Option<&TokenResolution> {
        self.resolutions.iter().find(|r| r.surface == surface)
    }

    /// トークナイザーの出力した表層形の列を返します。
    pub fn tokenizer_surfaces(&self) -> Vec<&str> {
        self.tokenizer_output.iter().map(Token::surface).collect()
    }
}
