//! vibratoを使用するトークナイザーアダプター

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::analyzer::{Analyzer, FeatureLayout};
use crate::errors::{KotobaError, Result};
use crate::token::Token;

/// vibratoによる形態素解析器
///
/// 解析のたびにワーカーを作成するため、1つのインスタンスを複数のスレッドで共有できます。
pub struct VibratoAnalyzer {
    tokenizer: ::vibrato::Tokenizer,
    layout: FeatureLayout,
}

impl VibratoAnalyzer {
    /// 辞書から解析器を作成します。素性はIPADIC形式として解釈します。
    pub fn new(dict: ::vibrato::Dictionary) -> Self {
        Self {
            tokenizer: ::vibrato::Tokenizer::new(dict),
            layout: FeatureLayout::ipadic(),
        }
    }

    /// 辞書を読み込んで解析器を作成します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 辞書データのリーダー
    /// * `compressed` - データがZstandardで圧縮されている場合は`true`
    pub fn read<R>(rdr: R, compressed: bool) -> Result<Self>
    where
        R: Read,
    {
        let dict = if compressed {
            ::vibrato::Dictionary::read(zstd::Decoder::new(rdr)?)
        } else {
            ::vibrato::Dictionary::read(rdr)
        }
        .map_err(|e| KotobaError::upstream("tokenizer", e.to_string()))?;
        Ok(Self::new(dict))
    }

    /// ファイルから辞書を読み込んで解析器を作成します。
    ///
    /// 拡張子が`.zst`の場合はZstandard圧縮として扱います。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let compressed = path.extension().is_some_and(|ext| ext == "zst");
        let rdr = BufReader::new(File::open(path)?);
        Self::read(rdr, compressed)
    }

    /// 素性文字列の形式を設定します。
    pub fn layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 空白文字を無視するかどうかを設定します。
    ///
    /// # エラー
    ///
    /// 辞書に空白文字のカテゴリが定義されていない場合にエラーを返します。
    pub fn ignore_space(mut self, yes: bool) -> Result<Self> {
        self.tokenizer = self
            .tokenizer
            .ignore_space(yes)
            .map_err(|e| KotobaError::upstream("tokenizer", e.to_string()))?;
        Ok(self)
    }

    /// 未知語をまとめる最大文字数を設定します。0は無制限です。
    pub fn max_grouping_len(mut self, max_grouping_len: usize) -> Self {
        self.tokenizer = self.tokenizer.max_grouping_len(max_grouping_len);
        self
    }
}

impl Analyzer for VibratoAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();
        let mut tokens = Vec::with_capacity(worker.num_tokens());
        for t in worker.token_iter() {
            tokens.push(
                self.layout
                    .token(t.surface(), t.range_char().start, t.feature())?,
            );
        }
        log::trace!("vibrato produced {} tokens", tokens.len());
        Ok(tokens)
    }
}
