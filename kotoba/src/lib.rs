//! # kotoba
//!
//! kotobaは、形態素解析器の出力を辞書の単語(単語IDと表記インデックス)に解決する
//! 日本語テキストの解析器です。
//!
//! ## 概要
//!
//! 形態素解析器のトークン境界は、学習者向けの辞書の単語境界と一致しないことがあります。
//! このライブラリは、トークン列に特殊ケースの結合(活用語尾、定型表現、複合助詞、
//! 文脈による読みの上書き)を適用し、辞書の候補を決定的な規則でスコア付けして、
//! 各トークンに最も適切な単語を1つ選びます。
//!
//! ## 主な機能
//!
//! - **決定的な解析**: 同じ入力と辞書には常に同じ結果を返します
//! - **段階ごとの診断**: [`ParserDiagnostics`]に各段階の結合と候補のスコアを記録します
//! - **辞書のスナップショット**: rkyvとzstdによる辞書の保存と読み込み
//! - **差し替え可能な部品**: [`Analyzer`]と[`DictionaryStore`]を実装すれば、
//!   任意の形態素解析器と辞書を使用できます
//!
//! ## 使用例
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use kotoba::{DictionaryBuilder, Parser, ParserDiagnostics, VibratoAnalyzer};
//!
//! let mut builder = DictionaryBuilder::new();
//! builder.read_jsonl(std::io::BufReader::new(std::fs::File::open("jmdict.jsonl")?))?;
//! let store = builder.build();
//!
//! let analyzer = VibratoAnalyzer::from_path("system.dic.zst")?;
//! let parser = Parser::new(analyzer, store);
//!
//! let mut diagnostics = ParserDiagnostics::new();
//! let words = parser.parse("寒気がした", Some(&mut diagnostics))?;
//! for word in &words {
//!     println!("{} {} {}", word.original_text, word.word_id, word.reading_index);
//! }
//! for stage in &diagnostics.stages {
//!     println!("{}: {} -> {}", stage.stage_name, stage.input_token_count, stage.output_token_count);
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// トークナイザーアダプター
pub mod analyzer;

/// 解析結果の組み立て
pub mod assembler;

/// 特殊ケースの結合
pub mod combiner;

/// 解析過程の記録
pub mod diagnostics;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// かな文字のユーティリティ
pub mod kana;

/// 解析器
pub mod parser;

/// 辞書候補の検索
pub mod resolver;

/// 候補のスコア付け
pub mod scorer;

/// トークン型の定義
pub mod token;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-exports
#[cfg(feature = "vibrato")]
#[cfg_attr(docsrs, doc(cfg(feature = "vibrato")))]
pub use analyzer::VibratoAnalyzer;
pub use analyzer::{Analyzer, FeatureLayout};
pub use assembler::{ResolvedWord, Segment, stitch};
pub use diagnostics::ParserDiagnostics;
pub use dictionary::{DictionaryBuilder, DictionaryEntry, DictionaryStore, MemoryDictionary};
pub use errors::KotobaError;
pub use parser::Parser;
pub use scorer::ScoreWeights;
pub use token::{CombinedToken, PartOfSpeech, Token};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
