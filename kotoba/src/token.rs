//! トークンの型定義
//!
//! このモジュールは、トークナイザーアダプターが生成する[`Token`]と、
//! 特殊ケース結合器が生成する[`CombinedToken`]、およびそれらに付与される
//! 品詞[`PartOfSpeech`]を提供します。

use std::ops::Range;

use serde::Serialize;

use crate::kana;

/// トークンの品詞
///
/// トークナイザーの品詞体系(IPADIC、UniDicなど)の差を吸収した粗い分類です。
/// 辞書側の品詞タグ(`n`、`v5r`、`adj-i`など)との照合にも使用されます。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PartOfSpeech {
    Noun,
    Numeral,
    Pronoun,
    Verb,
    IAdjective,
    NaAdjective,
    Adverb,
    Particle,
    Auxiliary,
    PrenounAdjectival,
    Interjection,
    Conjunction,
    Prefix,
    Suffix,
    /// 複数のトークンから構成される慣用表現
    Expression,
    Symbol,
    Unknown,
}

impl PartOfSpeech {
    /// トークナイザーの品詞区分から品詞を決定します。
    ///
    /// # 引数
    ///
    /// * `sections` - 品詞大分類から順に並んだ品詞区分(`["名詞", "数"]`など)
    ///
    /// # 戻り値
    ///
    /// 対応する品詞。未知の区分の場合は[`PartOfSpeech::Unknown`]
    pub fn from_sections<S>(sections: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let major = sections.first().map_or("", |s| s.as_ref());
        let minor = sections.get(1).map_or("", |s| s.as_ref());
        match major {
            "名詞" => match minor {
                "数" | "数詞" => Self::Numeral,
                "代名詞" => Self::Pronoun,
                "接尾" => Self::Suffix,
                "形容動詞語幹" => Self::NaAdjective,
                _ => Self::Noun,
            },
            "代名詞" => Self::Pronoun,
            "動詞" => Self::Verb,
            "形容詞" => Self::IAdjective,
            "形状詞" => Self::NaAdjective,
            "副詞" => Self::Adverb,
            "助詞" => Self::Particle,
            "助動詞" => Self::Auxiliary,
            "連体詞" => Self::PrenounAdjectival,
            "感動詞" => Self::Interjection,
            "接続詞" => Self::Conjunction,
            "接頭辞" | "接頭詞" => Self::Prefix,
            "接尾辞" => Self::Suffix,
            "記号" | "補助記号" | "空白" => Self::Symbol,
            _ => Self::Unknown,
        }
    }

    /// 名詞相当(名詞、数詞、代名詞)かどうかを返します。
    #[inline(always)]
    pub const fn is_nominal(self) -> bool {
        matches!(self, Self::Noun | Self::Numeral | Self::Pronoun)
    }

    /// 活用する語(動詞、形容詞、助動詞)かどうかを返します。
    #[inline(always)]
    pub const fn is_inflecting(self) -> bool {
        matches!(self, Self::Verb | Self::IAdjective | Self::Auxiliary)
    }

    /// 辞書の品詞タグがこの品詞と両立するかどうかを判定します。
    ///
    /// # 引数
    ///
    /// * `tag` - 辞書の語義に付与された品詞タグ(`n`、`v1`、`adj-pn`など)
    ///
    /// # 戻り値
    ///
    /// 両立する場合は`true`
    pub fn accepts_tag(self, tag: &str) -> bool {
        match self {
            Self::Noun => {
                matches!(tag, "n" | "n-adv" | "n-t" | "n-pr" | "adj-no" | "vs" | "ctr")
            }
            Self::Numeral => matches!(tag, "num" | "n" | "ctr"),
            Self::Pronoun => matches!(tag, "pn" | "n"),
            Self::Verb => tag.starts_with('v') && tag != "vs",
            Self::IAdjective => matches!(tag, "adj-i" | "adj-ix"),
            Self::NaAdjective => matches!(tag, "adj-na" | "adj-no" | "adj-t"),
            Self::Adverb => matches!(tag, "adv" | "adv-to" | "n-adv"),
            Self::Particle => tag == "prt",
            Self::Auxiliary => matches!(tag, "aux" | "aux-v" | "aux-adj" | "cop"),
            Self::PrenounAdjectival => matches!(tag, "adj-pn" | "adj-f"),
            Self::Interjection => tag == "int",
            Self::Conjunction => tag == "conj",
            Self::Prefix => matches!(tag, "pref" | "n-pref"),
            Self::Suffix => matches!(tag, "suf" | "n-suf" | "ctr"),
            Self::Expression => tag == "exp",
            Self::Symbol | Self::Unknown => false,
        }
    }
}

/// トークナイザーが生成したトークン
///
/// トークナイザーアダプターによって作成された後は変更されません。
/// 位置と長さは文字単位です。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    surface: String,
    start: usize,
    len: usize,
    pos: PartOfSpeech,
    pos_sections: Vec<String>,
    reading: String,
    dictionary_form: String,
}

impl Token {
    /// 新しいトークンを作成します。
    ///
    /// 品詞は[`PartOfSpeech::Unknown`]、読みは空、辞書形は表層形で初期化されます。
    ///
    /// # 引数
    ///
    /// * `surface` - 表層形
    /// * `start` - 入力文中の開始位置(文字単位)
    pub fn new<S>(surface: S, start: usize) -> Self
    where
        S: Into<String>,
    {
        let surface = surface.into();
        Self {
            len: surface.chars().count(),
            dictionary_form: surface.clone(),
            surface,
            start,
            pos: PartOfSpeech::Unknown,
            pos_sections: vec![],
            reading: String::new(),
        }
    }

    /// 品詞区分を設定します。品詞は区分から決定されます。
    pub fn with_pos_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pos_sections = sections.into_iter().map(Into::into).collect();
        self.pos = PartOfSpeech::from_sections(&self.pos_sections);
        self
    }

    /// 品詞を直接設定します。
    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = pos;
        self
    }

    /// 読み(カタカナ)を設定します。
    pub fn with_reading<S>(mut self, reading: S) -> Self
    where
        S: Into<String>,
    {
        self.reading = reading.into();
        self
    }

    /// 辞書形を設定します。空文字列の場合は表層形のままにします。
    pub fn with_dictionary_form<S>(mut self, dictionary_form: S) -> Self
    where
        S: Into<String>,
    {
        let dictionary_form = dictionary_form.into();
        if !dictionary_form.is_empty() {
            self.dictionary_form = dictionary_form;
        }
        self
    }

    /// 表層形を取得します。
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// 開始位置(文字単位)を取得します。
    #[inline(always)]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// 長さ(文字数)を取得します。
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// 表層形が空かどうかを返します。
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 文字単位の位置範囲を取得します。
    #[inline(always)]
    pub const fn range_char(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// 品詞を取得します。
    #[inline(always)]
    pub const fn pos(&self) -> PartOfSpeech {
        self.pos
    }

    /// トークナイザーが出力した品詞区分を取得します。
    #[inline(always)]
    pub fn pos_sections(&self) -> &[String] {
        &self.pos_sections
    }

    /// トークナイザーの推定した読み(カタカナ)を取得します。
    #[inline(always)]
    pub fn reading(&self) -> &str {
        &self.reading
    }

    /// 辞書形を取得します。
    #[inline(always)]
    pub fn dictionary_form(&self) -> &str {
        &self.dictionary_form
    }
}

/// 特殊ケース結合器が扱うトークン
///
/// 1つ以上(分割で生じた合成トークンを含む)の構成トークンと、結合後の表層形、
/// 読み、辞書形、品詞を保持します。どの規則にも触れられていないトークンは
/// 構成トークンを1つだけ持ちます。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CombinedToken {
    parts: Vec<Token>,
    surface: String,
    start: usize,
    pos: PartOfSpeech,
    reading: String,
    dictionary_form: String,
    reading_overridden: bool,
}

impl CombinedToken {
    /// 単一のトークンから作成します。
    pub fn from_token(token: Token) -> Self {
        Self {
            surface: token.surface.clone(),
            start: token.start,
            pos: token.pos,
            reading: token.reading.clone(),
            dictionary_form: token.dictionary_form.clone(),
            reading_overridden: false,
            parts: vec![token],
        }
    }

    /// 連続する複数のトークンを1つに結合します。
    ///
    /// # 引数
    ///
    /// * `items` - 結合するトークン(入力文中で連続している必要があります)
    /// * `pos` - 結合後の品詞
    /// * `reading` - 読みの上書き。`None`の場合は各トークンの読みを連結します
    /// * `dictionary_form` - 辞書形。`None`の場合は結合後の表層形を使用します
    pub fn merge(
        items: Vec<CombinedToken>,
        pos: PartOfSpeech,
        reading: Option<&str>,
        dictionary_form: Option<String>,
    ) -> Self {
        let start = items.first().map_or(0, |t| t.start);
        let surface: String = items.iter().map(|t| t.surface.as_str()).collect();
        let reading = reading.map_or_else(
            || items.iter().map(|t| t.reading.as_str()).collect(),
            str::to_string,
        );
        let dictionary_form = dictionary_form.unwrap_or_else(|| surface.clone());
        let parts = items.into_iter().flat_map(|t| t.parts).collect();
        Self {
            parts,
            surface,
            start,
            pos,
            reading,
            dictionary_form,
            reading_overridden: false,
        }
    }

    /// 構成トークンを取得します。
    #[inline(always)]
    pub fn parts(&self) -> &[Token] {
        &self.parts
    }

    /// 表層形を取得します。
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// 開始位置(文字単位)を取得します。
    #[inline(always)]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// 長さ(文字数)を取得します。
    pub fn len(&self) -> usize {
        self.surface.chars().count()
    }

    /// 表層形が空かどうかを返します。
    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }

    /// 品詞を取得します。
    #[inline(always)]
    pub const fn pos(&self) -> PartOfSpeech {
        self.pos
    }

    /// 読み(カタカナ)を取得します。
    #[inline(always)]
    pub fn reading(&self) -> &str {
        &self.reading
    }

    /// 辞書形を取得します。
    #[inline(always)]
    pub fn dictionary_form(&self) -> &str {
        &self.dictionary_form
    }

    /// 読みが文脈規則によって上書きされたかどうかを返します。
    #[inline(always)]
    pub const fn reading_overridden(&self) -> bool {
        self.reading_overridden
    }

    /// 先頭の構成トークンを取得します。
    #[inline(always)]
    pub fn head(&self) -> Option<&Token> {
        self.parts.first()
    }

    /// 表層形がすべてかなで書かれているかを返します。
    pub fn is_kana(&self) -> bool {
        kana::is_kana(&self.surface)
    }

    /// 活用形から辞書形に戻されたトークンかどうかを返します。
    pub fn is_deconjugated(&self) -> bool {
        !self.dictionary_form.is_empty() && self.dictionary_form != self.surface
    }

    /// 活用語尾を除いた語幹の読み(ひらがな)を返します。
    ///
    /// 先頭トークンの表層形と辞書形の共通接頭辞より後ろのかなを、
    /// 先頭トークンの読みの末尾から取り除きます。
    /// 例えば`開い`(ヒライ)と辞書形`開く`からは`ひら`が得られます。
    ///
    /// # 戻り値
    ///
    /// 活用していないトークンや読みが不明なトークンの場合は`None`
    pub fn stem_reading(&self) -> Option<String> {
        if !self.is_deconjugated() {
            return None;
        }
        let head = self.head()?;
        let head_reading = if self.parts.len() == 1 {
            &self.reading
        } else {
            &head.reading
        };
        if head_reading.is_empty() {
            return None;
        }
        let head_reading = kana::to_hiragana(head_reading);
        let prefix_len = kana::common_prefix_chars(head.surface(), &self.dictionary_form);
        let tail: String = head.surface().chars().skip(prefix_len).collect();
        let tail = kana::to_hiragana(&tail);
        let stem = head_reading
            .strip_suffix(tail.as_str())
            .unwrap_or(&head_reading)
            .to_string();
        if stem.is_empty() { None } else { Some(stem) }
    }

    /// 読みと品詞を上書きします。
    pub(crate) fn override_reading(&mut self, reading: &str, pos: Option<PartOfSpeech>) {
        reading.clone_into(&mut self.reading);
        if let Some(pos) = pos {
            self.pos = pos;
        }
        self.reading_overridden = true;
    }
}

impl From<Token> for CombinedToken {
    fn from(token: Token) -> Self {
        Self::from_token(token)
    }
}
