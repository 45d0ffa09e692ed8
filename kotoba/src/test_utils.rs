//! テスト用ユーティリティ
//!
//! 入力ごとに決められたトークン列を返す形態素解析器と、
//! テスト用の辞書を提供します。

use hashbrown::HashMap;

use crate::analyzer::{Analyzer, FeatureLayout};
use crate::dictionary::{DictionaryBuilder, MemoryDictionary};
use crate::errors::{KotobaError, Result};
use crate::kana;
use crate::parser::Parser;
use crate::token::Token;

/// トークンの定義(表層形、品詞区分、原形、読み)
pub(crate) type TokenSpec<'a> = (&'a str, &'a str, &'a str, &'a str);

/// IPADIC形式の素性文字列を作成します。
///
/// `sections`は`名詞,一般`のようにカンマ区切りで4つまで指定します。
pub(crate) fn feature(sections: &str, base: &str, reading: &str) -> String {
    let mut fields: Vec<&str> = sections.split(',').collect();
    fields.resize(4, "*");
    format!("{},*,*,{base},{reading},{reading}", fields.join(","))
}

/// 決められたトークン列を返す形態素解析器
///
/// 登録されていない入力は、語彙の最長一致で分割します。
/// 語彙にない文字は1文字ずつのトークンになります。
#[derive(Default)]
pub(crate) struct ScriptedAnalyzer {
    scripts: HashMap<String, Vec<Token>>,
    lexicon: Vec<(String, String)>,
    failing: bool,
}

impl ScriptedAnalyzer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 常に失敗する解析器を作成します。
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// 入力に対するトークン列を登録します。
    pub(crate) fn script(mut self, text: &str, tokens: &[TokenSpec]) -> Self {
        let layout = FeatureLayout::ipadic();
        let mut start = 0;
        let mut result = vec![];
        for &(surface, sections, base, reading) in tokens {
            let token = layout
                .token(surface, start, &feature(sections, base, reading))
                .unwrap();
            start += token.len();
            result.push(token);
        }
        self.scripts.insert(text.to_string(), result);
        self
    }

    /// 最長一致に使用する語彙を登録します。
    pub(crate) fn lexicon(mut self, words: &[TokenSpec]) -> Self {
        for &(surface, sections, base, reading) in words {
            self.lexicon
                .push((surface.to_string(), feature(sections, base, reading)));
        }
        self.lexicon
            .sort_by_key(|(surface, _)| std::cmp::Reverse(surface.chars().count()));
        self
    }

    fn greedy(&self, text: &str) -> Result<Vec<Token>> {
        let layout = FeatureLayout::ipadic();
        let mut tokens = vec![];
        let mut rest = text;
        let mut start = 0;
        while let Some(c) = rest.chars().next() {
            let token = match self.lexicon.iter().find(|(s, _)| rest.starts_with(s.as_str())) {
                Some((surface, feature)) => layout.token(surface, start, feature)?,
                None if c.is_whitespace() => {
                    start += 1;
                    rest = &rest[c.len_utf8()..];
                    continue;
                }
                None if kana::is_kana_char(c) || kana::is_kanji(c) => {
                    let surface = c.to_string();
                    layout.token(&surface, start, &feature("名詞,一般", &surface, "*"))?
                }
                None => {
                    let surface = c.to_string();
                    layout.token(&surface, start, &feature("記号,一般", &surface, "*"))?
                }
            };
            start += token.len();
            rest = &rest[token.surface().len()..];
            tokens.push(token);
        }
        Ok(tokens)
    }
}

impl Analyzer for ScriptedAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        if self.failing {
            return Err(KotobaError::upstream("tokenizer", "scripted failure"));
        }
        match self.scripts.get(text) {
            Some(tokens) => Ok(tokens.clone()),
            None => self.greedy(text),
        }
    }
}

/// テスト用の辞書ソース
pub(crate) const FIXTURE_JSONL: &str = r#"
{"word_id":1000420,"readings":[{"text":"彼の","form_type":"kanji","kana":"あの"},{"text":"あの","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["adj-pn"],"misc":["uk"]}]}
{"word_id":1000430,"readings":[{"text":"あの","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["int"]}]}
{"word_id":1008860,"readings":[{"text":"言える","form_type":"kanji","kana":"いえる","priorities":["ichi1"]},{"text":"云える","form_type":"kanji","kana":"いえる"},{"text":"いえる","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["v1","vi"]},{"pos":["v1","vi"],"misc":["arch"]}]}
{"word_id":1080510,"readings":[{"text":"テレビ","form_type":"kana","priorities":["gai1","ichi1"]},{"text":"テレヴィ","form_type":"kana"}],"senses":[{"pos":["n"]}]}
{"word_id":1129240,"readings":[{"text":"ママ","form_type":"kana","priorities":["gai1"]}],"senses":[{"pos":["n"]}]}
{"word_id":1202440,"readings":[{"text":"開く","form_type":"kanji","kana":"ひらく","priorities":["ichi1","news1","nf10"]},{"text":"ひらく","form_type":"kana","priorities":["ichi1","news1","nf10"]}],"senses":[{"pos":["v5k","vi","vt"]}]}
{"word_id":1210410,"readings":[{"text":"寒気","form_type":"kanji","kana":"さむけ","priorities":["ichi1"]},{"text":"さむけ","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["n"]}]}
{"word_id":1245280,"readings":[{"text":"空","form_type":"kanji","kana":"から","priorities":["ichi1"]},{"text":"から","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["n","adj-no"]}]}
{"word_id":1245290,"readings":[{"text":"空","form_type":"kanji","kana":"そら","priorities":["ichi1","news1","nf08"]},{"text":"そら","form_type":"kana","priorities":["ichi1","news1","nf08"]}],"senses":[{"pos":["n"]}]}
{"word_id":1269320,"readings":[{"text":"後","form_type":"kanji","kana":"あと","priorities":["ichi1","news1","nf01"]},{"text":"あと","form_type":"kana","priorities":["ichi1","news1","nf01"]}],"senses":[{"pos":["n","adv"]}]}
{"word_id":1269410,"readings":[{"text":"後","form_type":"kanji","kana":"うしろ","priorities":["ichi1","news1","nf02"]},{"text":"うしろ","form_type":"kana","priorities":["ichi1","news1","nf02"]}],"senses":[{"pos":["n"]}]}
{"word_id":1295080,"readings":[{"text":"災い","form_type":"kanji","kana":"わざわい","priorities":["ichi1"]},{"text":"禍","form_type":"kanji","kana":"わざわい"},{"text":"わざわい","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["n"]}]}
{"word_id":1358280,"readings":[{"text":"食べる","form_type":"kanji","kana":"たべる","priorities":["ichi1","news2","nf25"]},{"text":"喰べる","form_type":"kanji","kana":"たべる"},{"text":"たべる","form_type":"kana","priorities":["ichi1","news2","nf25"]}],"senses":[{"pos":["v1","vt"]}]}
{"word_id":1383680,"readings":[{"text":"跡","form_type":"kanji","kana":"あと","priorities":["ichi1","news1","nf03"]},{"text":"址","form_type":"kanji","kana":"あと"},{"text":"あと","form_type":"kana","priorities":["ichi1","news1","nf03"]}],"senses":[{"pos":["n"]}]}
{"word_id":1489340,"readings":[{"text":"表","form_type":"kanji","kana":"おもて","priorities":["ichi1","news1","nf07"]},{"text":"おもて","form_type":"kana","priorities":["ichi1","news1","nf07"]}],"senses":[{"pos":["n"]}]}
{"word_id":1489350,"readings":[{"text":"表","form_type":"kanji","kana":"ひょう","priorities":["ichi1","news1","nf04"]},{"text":"ひょう","form_type":"kana","priorities":["ichi1","news1","nf04"]}],"senses":[{"pos":["n","n-suf"]}]}
{"word_id":1538740,"readings":[{"text":"癒える","form_type":"kanji","kana":"いえる","priorities":["ichi1"]},{"text":"いえる","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["v1","vi"]}]}
{"word_id":1576260,"readings":[{"text":"一日","form_type":"kanji","kana":"いちにち","priorities":["ichi1","news1","nf03"]},{"text":"１日","form_type":"kanji","kana":"いちにち"},{"text":"いちにち","form_type":"kana","priorities":["ichi1","news1","nf03"]}],"senses":[{"pos":["n","n-adv"]}]}
{"word_id":1576870,"readings":[{"text":"俺","form_type":"kanji","kana":"おれ","priorities":["ichi1"]},{"text":"己","form_type":"kanji","kana":"おれ"},{"text":"おれ","form_type":"kana","priorities":["ichi1"]},{"text":"オレ","form_type":"kana"}],"senses":[{"pos":["pn"]}]}
{"word_id":1585410,"readings":[{"text":"儘","form_type":"kanji","kana":"まま"},{"text":"侭","form_type":"kanji","kana":"まま"},{"text":"まま","form_type":"kana","priorities":["ichi1","news1","nf07"]},{"text":"ママ","form_type":"search_only_kana"}],"senses":[{"pos":["n"],"misc":["uk"]}]}
{"word_id":1625780,"readings":[{"text":"初めまして","form_type":"kanji","kana":"はじめまして","priorities":["spec1"]},{"text":"はじめまして","form_type":"kana","priorities":["spec1"]}],"senses":[{"pos":["exp","int"]}]}
{"word_id":2078360,"readings":[{"text":"面倒い","form_type":"kanji","kana":"めんどい"},{"text":"めんどい","form_type":"kana"},{"text":"メンドイ","form_type":"search_only_kana"}],"senses":[{"pos":["adj-i"],"misc":["uk"]}]}
{"word_id":2225040,"readings":[{"text":"朔","form_type":"kanji","kana":"ついたち"},{"text":"一日","form_type":"kanji","kana":"ついたち","priorities":["ichi1"]},{"text":"ついたち","form_type":"kana","priorities":["ichi1"]}],"senses":[{"pos":["n"]}]}
{"word_id":2768550,"readings":[{"text":"オレ","form_type":"kana"}],"senses":[{"pos":["int"]}]}
{"word_id":2844158,"readings":[{"text":"禍","form_type":"kanji","kana":"か"}],"senses":[{"pos":["n","n-suf"]}]}
{"word_id":2866134,"readings":[{"text":"寒気","form_type":"kanji","kana":"かんき","priorities":["news2"]},{"text":"かんき","form_type":"kana","priorities":["news2"]}],"senses":[{"pos":["n"]}]}
"#;

/// テスト用の辞書を構築します。
pub(crate) fn fixture_dictionary() -> MemoryDictionary {
    let mut builder = DictionaryBuilder::new().strict(true);
    builder.read_jsonl(FIXTURE_JSONL.as_bytes()).unwrap();
    builder.build()
}

/// 登録されていない入力の分割に使用する語彙
pub(crate) const FIXTURE_LEXICON: &[TokenSpec] = &[
    ("ママ", "名詞,一般", "ママ", "ママ"),
    ("まま", "名詞,非自立", "まま", "ママ"),
    ("オレ", "名詞,代名詞,一般", "オレ", "オレ"),
    ("テレビ", "名詞,一般", "テレビ", "テレビ"),
    ("表", "名詞,一般", "表", "ヒョウ"),
    ("一日", "名詞,副詞可能", "一日", "イチニチ"),
    ("後", "名詞,一般", "後", "アト"),
    ("あと", "名詞,副詞可能", "あと", "アト"),
    ("寒気", "名詞,一般", "寒気", "サムケ"),
    ("あの", "連体詞", "あの", "アノ"),
    ("空", "名詞,一般", "空", "ソラ"),
    ("禍", "名詞,一般", "禍", "ワザワイ"),
    ("メンドイ", "形容詞,自立", "メンドイ", "メンドイ"),
    ("へ", "助詞,格助詞,一般", "へ", "ヘ"),
    ("を", "助詞,格助詞,一般", "を", "ヲ"),
    ("が", "助詞,格助詞,一般", "が", "ガ"),
    ("の", "助詞,連体化", "の", "ノ"),
    ("に", "助詞,格助詞,一般", "に", "ニ"),
    ("。", "記号,句点", "。", "。"),
];

/// テスト用の辞書と語彙による解析器を作成します。
pub(crate) fn fixture_parser(analyzer: ScriptedAnalyzer) -> Parser<ScriptedAnalyzer, MemoryDictionary> {
    Parser::new(analyzer.lexicon(FIXTURE_LEXICON), fixture_dictionary())
}
