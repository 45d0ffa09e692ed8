//! 解析器
//!
//! トークナイザーアダプター、特殊ケース結合器、候補解決器、スコア付けを順に適用し、
//! 入力テキストを辞書の単語IDの列に変換します。
//! 解析は入力テキストと辞書の内容だけで決まり、同じ入力には常に同じ結果を返します。

use std::sync::Arc;

use crate::analyzer::{self, Analyzer};
use crate::assembler::ResolvedWord;
use crate::combiner;
use crate::diagnostics::{ParserDiagnostics, TokenResolution};
use crate::dictionary::DictionaryStore;
use crate::errors::{KotobaError, Result};
use crate::kana;
use crate::resolver;
use crate::scorer::{ScoreWeights, Scorer};

/// 日本語テキストの解析器
///
/// 解析器と辞書ストアは[`Arc`]で共有されるため、複製は安価です。
/// 複数のスレッドから同時に[`Parser::parse`]を呼び出すことができます。
///
/// # 例
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use kotoba::{MemoryDictionary, Parser, VibratoAnalyzer};
///
/// let analyzer = VibratoAnalyzer::from_path("system.dic.zst")?;
/// let store = MemoryDictionary::from_path("words.dic.zst")?;
/// let parser = Parser::new(analyzer, store).max_input_chars(10_000);
///
/// for word in parser.parse("表へ出る", None)? {
///     println!("{}\t{}\t{}", word.original_text, word.word_id, word.reading_index);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Parser<A, S> {
    analyzer: Arc<A>,
    store: Arc<S>,
    scorer: Scorer,
    max_input_chars: Option<usize>,
}

impl<A, S> Clone for Parser<A, S> {
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
            store: Arc::clone(&self.store),
            scorer: self.scorer.clone(),
            max_input_chars: self.max_input_chars,
        }
    }
}

impl<A, S> Parser<A, S>
where
    A: Analyzer,
    S: DictionaryStore,
{
    /// 新しい解析器を作成します。
    ///
    /// # 引数
    ///
    /// * `analyzer` - 形態素解析器
    /// * `store` - 辞書ストア
    pub fn new(analyzer: A, store: S) -> Self {
        Self::from_shared(Arc::new(analyzer), Arc::new(store))
    }

    /// 共有された形態素解析器と辞書ストアから解析器を作成します。
    pub fn from_shared(analyzer: Arc<A>, store: Arc<S>) -> Self {
        Self {
            analyzer,
            store,
            scorer: Scorer::default(),
            max_input_chars: None,
        }
    }

    /// 入力テキストの最大文字数を設定します。
    ///
    /// これを超える入力は[`KotobaError::InvalidArgument`]になります。
    pub fn max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = Some(max_input_chars);
        self
    }

    /// スコアの重みを設定します。
    pub fn weights(mut self, weights: ScoreWeights) -> Self {
        self.scorer = Scorer::new(weights);
        self
    }

    /// 辞書ストアを取得します。
    pub fn store(&self) -> &S {
        &self.store
    }

    /// テキストを解析します。
    ///
    /// # 引数
    ///
    /// * `text` - 正規化済みの入力テキスト
    /// * `diagnostics` - 解析過程の記録先。記録は結果に影響しません。
    ///
    /// # 戻り値
    ///
    /// 入力の先頭から順に並んだ、解決された単語の列。
    /// 候補のないトークンは含まれません。空の入力には空の列を返します。
    ///
    /// # エラー
    ///
    /// - 入力が最大文字数を超える場合は[`KotobaError::InvalidArgument`]
    /// - 形態素解析器または辞書ストアが失敗した場合はそのエラー。部分的な結果は返しません。
    pub fn parse(
        &self,
        text: &str,
        mut diagnostics: Option<&mut ParserDiagnostics>,
    ) -> Result<Vec<ResolvedWord>> {
        if let Some(diagnostics) = diagnostics.as_deref_mut() {
            diagnostics.clear();
            text.clone_into(&mut diagnostics.input_text);
        }
        if text.trim().is_empty() {
            return Ok(vec![]);
        }
        if let Some(max) = self.max_input_chars {
            let len = text.chars().count();
            if len > max {
                return Err(KotobaError::invalid_argument(
                    "text",
                    format!("input has {len} characters, more than {max}"),
                ));
            }
        }

        let tokens = self.analyzer.analyze(text)?;
        analyzer::validate_tokens(text, &tokens)?;
        if let Some(diagnostics) = diagnostics.as_deref_mut() {
            diagnostics.tokenizer_output.clone_from(&tokens);
        }

        let combined = combiner::combine(tokens, diagnostics.as_deref_mut());
        let candidates = resolver::resolve(&combined, self.store.as_ref())?;

        let mut words = Vec::with_capacity(combined.len());
        for (token, candidates) in combined.iter().zip(candidates) {
            let ranked = self.scorer.rank(token, candidates);
            if let Some(best) = ranked.first() {
                log::trace!(
                    "{} -> {}/{} ({:?})",
                    token.surface(),
                    best.word_id,
                    best.reading_index,
                    best.reading_match
                );
                words.push(ResolvedWord {
                    original_text: token.surface().to_string(),
                    word_id: best.word_id,
                    reading_index: best.reading_index,
                });
            }
            if let Some(diagnostics) = diagnostics.as_deref_mut() {
                diagnostics.resolutions.push(TokenResolution {
                    surface: token.surface().to_string(),
                    start: token.start(),
                    reading: kana::to_hiragana(token.reading()),
                    candidates: ranked,
                });
            }
        }
        log::debug!(
            "parsed {} chars into {} words ({} tokens)",
            text.chars().count(),
            words.len(),
            combined.len()
        );
        Ok(words)
    }
}
