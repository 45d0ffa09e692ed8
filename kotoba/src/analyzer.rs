//! トークナイザーアダプター
//!
//! 外部の形態素解析器を呼び出し、その出力を[`Token`]の列に正規化します。
//! このモジュールには判断のロジックは含まれません。

#[cfg(feature = "vibrato")]
pub mod vibrato;

use std::ops::Range;
use std::sync::Arc;

use crate::errors::{KotobaError, Result};
use crate::kana;
use crate::token::Token;
use crate::utils::{feature_field, parse_csv_row};

#[cfg(feature = "vibrato")]
pub use crate::analyzer::vibrato::VibratoAnalyzer;

/// 形態素解析器のインターフェース
///
/// 実装は入力全体を隙間なく覆うトークン列を返す必要があります。
/// 解析器が利用できない場合や失敗した場合は[`KotobaError::upstream`]を返してください。
pub trait Analyzer: Send + Sync {
    /// テキストを解析してトークン列を返します。
    ///
    /// # 引数
    ///
    /// * `text` - 解析するテキスト
    ///
    /// # 戻り値
    ///
    /// 入力の先頭から順に並んだトークン列
    fn analyze(&self, text: &str) -> Result<Vec<Token>>;
}

impl<T> Analyzer for Arc<T>
where
    T: Analyzer + ?Sized,
{
    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        (**self).analyze(text)
    }
}

/// 素性文字列の各フィールドの位置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    /// 品詞区分のフィールド範囲
    pub pos_sections: Range<usize>,

    /// 原形(辞書形)のフィールド位置
    pub base_form: usize,

    /// 読みのフィールド位置
    pub reading: usize,
}

impl FeatureLayout {
    /// IPADIC形式の素性
    ///
    /// `品詞,品詞細分類1,品詞細分類2,品詞細分類3,活用型,活用形,原形,読み,発音`
    pub const fn ipadic() -> Self {
        Self {
            pos_sections: 0..4,
            base_form: 6,
            reading: 7,
        }
    }

    /// UniDic形式の素性
    ///
    /// `pos1,pos2,pos3,pos4,cType,cForm,lForm,lemma,orth,pron,orthBase,pronBase,goshu,
    /// iType,iForm,fType,fForm,iConType,fConType,type,kana,...`
    ///
    /// 読みには表記どおりのかな(`kana`)を使用します。`pron`は長音を`ー`で表すため使用しません。
    /// `kana`を含まない短い形式の素性では、表層形がかなでない限り読みは空になります。
    pub const fn unidic() -> Self {
        Self {
            pos_sections: 0..4,
            base_form: 10,
            reading: 20,
        }
    }

    /// 素性文字列からトークンを作成します。
    ///
    /// 読みがない場合、表層形がかなであればそのカタカナ形を使用し、そうでなければ空にします。
    /// 原形がない場合は表層形を使用します。
    ///
    /// # 引数
    ///
    /// * `surface` - 表層形
    /// * `start` - 開始位置(文字単位)
    /// * `feature` - 素性文字列
    ///
    /// # エラー
    ///
    /// 素性文字列がCSVとして解析できない場合にエラーを返します。
    pub fn token(&self, surface: &str, start: usize, feature: &str) -> Result<Token> {
        let fields = parse_csv_row(feature)?;
        let sections = self
            .pos_sections
            .clone()
            .filter_map(|i| feature_field(&fields, i))
            .map(str::to_string)
            .collect::<Vec<_>>();
        let reading = match feature_field(&fields, self.reading) {
            Some(reading) => kana::to_katakana(reading),
            None if kana::is_kana(surface) => kana::to_katakana(surface),
            None => String::new(),
        };
        let base_form = feature_field(&fields, self.base_form).unwrap_or(surface);
        Ok(Token::new(surface, start)
            .with_pos_sections(sections)
            .with_reading(reading)
            .with_dictionary_form(base_form))
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::ipadic()
    }
}

/// 解析器の出力を検証します。
///
/// トークンは入力の順に並び、重なりがなく、表層形が入力の該当範囲と一致する必要があります。
/// トークンの間や前後に残る文字は空白文字だけが許されます。
///
/// # エラー
///
/// 条件を満たさない場合は[`KotobaError::Upstream`]を返します。
pub(crate) fn validate_tokens(text: &str, tokens: &[Token]) -> Result<()> {
    let chars: Vec<char> = text.chars().collect();
    let mut cursor = 0;
    for token in tokens {
        let range = token.range_char();
        if token.is_empty() || range.start < cursor || range.end > chars.len() {
            return Err(KotobaError::upstream(
                "tokenizer",
                format!("token {:?} at {range:?} is out of order", token.surface()),
            ));
        }
        if !chars[cursor..range.start].iter().all(|c| c.is_whitespace()) {
            return Err(KotobaError::upstream(
                "tokenizer",
                format!("tokens leave a gap at {}..{}", cursor, range.start),
            ));
        }
        if !chars[range.clone()].iter().copied().eq(token.surface().chars()) {
            return Err(KotobaError::upstream(
                "tokenizer",
                format!(
                    "token {:?} does not match the input at {range:?}",
                    token.surface()
                ),
            ));
        }
        cursor = range.end;
    }
    if !chars[cursor..].iter().all(|c| c.is_whitespace()) {
        return Err(KotobaError::upstream(
            "tokenizer",
            format!("tokens do not cover the input after {cursor}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::token::PartOfSpeech;

    #[test]
    fn test_ipadic_token() {
        let token = FeatureLayout::ipadic()
            .token("開い", 2, "動詞,自立,*,*,五段・カ行イ音便,連用タ接続,開く,ヒライ,ヒライ")
            .unwrap();
        assert_eq!(PartOfSpeech::Verb, token.pos());
        assert_eq!(&["動詞", "自立"], token.pos_sections());
        assert_eq!("ヒライ", token.reading());
        assert_eq!("開く", token.dictionary_form());
        assert_eq!(2..4, token.range_char());
    }

    #[test]
    fn test_missing_fields() {
        let token = FeatureLayout::ipadic()
            .token("ぴえん", 0, "名詞,一般,*,*,*,*,*")
            .unwrap();
        assert_eq!("ピエン", token.reading());
        assert_eq!("ぴえん", token.dictionary_form());

        let token = FeatureLayout::ipadic().token("鬱", 0, "名詞").unwrap();
        assert_eq!("", token.reading());
        assert_eq!(PartOfSpeech::Noun, token.pos());
    }

    #[test]
    fn test_unidic_token() {
        let token = FeatureLayout::unidic()
            .token(
                "空",
                0,
                "形状詞,一般,*,*,*,*,ウツロ,空ろ,空,ウツロ,空,ウツロ,和,*,*,*,*,*,*,相,ウツロ,ウツロ,ウツロ,ウツロ,0,C1,*,1234,5678",
            )
            .unwrap();
        assert_eq!(PartOfSpeech::NaAdjective, token.pos());
        assert_eq!("ウツロ", token.reading());
        assert_eq!("空", token.dictionary_form());
    }

    #[test]
    fn test_unidic_reading_keeps_long_vowel_kana() {
        let token = FeatureLayout::unidic()
            .token(
                "表",
                0,
                "名詞,普通名詞,一般,*,*,*,ヒョウ,表,表,ヒョー,表,ヒョー,漢,*,*,*,*,*,*,体,ヒョウ,ヒョウ,ヒョウ,ヒョウ,0,C2,*,8697741284483584,31642",
            )
            .unwrap();
        assert_eq!("ヒョウ", token.reading());
        assert_eq!(PartOfSpeech::Noun, token.pos());

        let short = FeatureLayout::unidic()
            .token("表", 0, "名詞,普通名詞,一般,*,*,*,ヒョウ,表,表,ヒョー,表,ヒョー,漢,*,*,*,*")
            .unwrap();
        assert_eq!("", short.reading());
    }

    #[test]
    fn test_validate_tokens() {
        let tokens = vec![Token::new("表", 0), Token::new("へ", 1)];
        assert!(validate_tokens("表へ", &tokens).is_ok());
        assert!(validate_tokens("表 へ ", &[Token::new("表", 0), Token::new("へ", 2)]).is_ok());

        let err = validate_tokens("表へ出る", &tokens).unwrap_err();
        assert!(err.is_upstream());

        let overlapping = vec![Token::new("表へ", 0), Token::new("へ", 1)];
        assert!(validate_tokens("表へ", &overlapping).is_err());

        let gap = vec![Token::new("表", 0), Token::new("出", 2)];
        assert!(validate_tokens("表へ出", &gap).is_err());
    }
}
