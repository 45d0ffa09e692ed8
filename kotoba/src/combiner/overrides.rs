//! 文脈による読みの上書き
//!
//! 特定の表層形に対して、前後のトークンを見る条件と上書きする読みを登録した表です。
//! 同じ表層形の規則は登録順に評価され、最初に条件を満たした規則だけが適用されます。

use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::diagnostics::{Modification, ModificationKind};
use crate::kana;
use crate::token::{CombinedToken, PartOfSpeech};

/// 名詞句の前に置かれる開き括弧
const OPENING_BRACKETS: &[&str] = &["「", "『", "〝", "（", "(", "【", "〈", "《", "“"];

/// 規則の条件
///
/// 参照できるのは直前の2トークンと直後の2トークン、およびトークン自身です。
#[derive(Debug)]
pub enum Condition {
    /// 常に成立
    Always,
    /// 直前が名詞相当
    PrevNominal,
    /// 直前の2トークンが月の表現(`七月`、`7月`など)で終わる
    PrevMonth,
    /// 直後の表層形が一致する
    NextSurface(&'static str),
    /// 直後のトークンの辞書形が順に一致する
    NextDictionaryForms(&'static [&'static str]),
    /// 直後が数詞、または数を問う語(`何`)
    NextQuantity,
    /// 直後が名詞相当。開き括弧は読み飛ばす
    NextNominal,
    /// トークン自身の品詞が一致する
    SelfPos(PartOfSpeech),
    /// 前後のどちらも名詞相当・接頭辞・接尾辞でない
    Standalone,
    /// すべての条件が成立
    All(&'static [Condition]),
    /// 条件が成立しない
    Not(&'static Condition),
}

/// 読みの上書き規則
#[derive(Debug)]
pub struct ReadingRule {
    /// 対象の表層形
    pub span: &'static str,

    /// 条件
    pub when: Condition,

    /// 上書きする読み(カタカナ)
    pub reading: &'static str,

    /// 上書きする品詞
    pub pos: Option<PartOfSpeech>,
}

const fn rule(span: &'static str, when: Condition, reading: &'static str) -> ReadingRule {
    ReadingRule {
        span,
        when,
        reading,
        pos: None,
    }
}

/// 読みの上書き規則の登録表
pub static READING_RULES: &[ReadingRule] = &[
    rule(
        "表",
        Condition::All(&[Condition::NextSurface("へ"), Condition::Not(&Condition::PrevNominal)]),
        "オモテ",
    ),
    rule("表", Condition::PrevNominal, "ヒョウ"),
    rule("一日", Condition::PrevMonth, "ツイタチ"),
    rule("一日", Condition::Always, "イチニチ"),
    rule("１日", Condition::PrevMonth, "ツイタチ"),
    rule("１日", Condition::Always, "イチニチ"),
    rule("1日", Condition::PrevMonth, "ツイタチ"),
    rule("1日", Condition::Always, "イチニチ"),
    rule("寒気", Condition::NextDictionaryForms(&["が", "する"]), "サムケ"),
    rule("後", Condition::NextQuantity, "アト"),
    ReadingRule {
        span: "あの",
        when: Condition::NextNominal,
        reading: "アノ",
        pos: Some(PartOfSpeech::PrenounAdjectival),
    },
    ReadingRule {
        span: "あの",
        when: Condition::Always,
        reading: "アノ",
        pos: Some(PartOfSpeech::Interjection),
    },
    rule("禍", Condition::Standalone, "ワザワイ"),
    ReadingRule {
        span: "空",
        when: Condition::SelfPos(PartOfSpeech::NaAdjective),
        reading: "カラ",
        pos: Some(PartOfSpeech::Noun),
    },
];

static BY_SPAN: LazyLock<HashMap<&'static str, Vec<&'static ReadingRule>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, Vec<&'static ReadingRule>> = HashMap::new();
        for rule in READING_RULES {
            map.entry(rule.span).or_default().push(rule);
        }
        map
    });

/// 規則の評価に使用するトークンの周辺
#[derive(Clone, Copy)]
pub struct Window<'a> {
    tokens: &'a [CombinedToken],
    index: usize,
}

impl<'a> Window<'a> {
    /// `tokens[index]`を中心とする周辺を作成します。
    pub fn new(tokens: &'a [CombinedToken], index: usize) -> Self {
        Self { tokens, index }
    }

    fn current(&self) -> &'a CombinedToken {
        &self.tokens[self.index]
    }

    fn prev(&self, n: usize) -> Option<&'a CombinedToken> {
        self.index.checked_sub(n).and_then(|i| self.tokens.get(i))
    }

    fn next(&self, n: usize) -> Option<&'a CombinedToken> {
        self.tokens.get(self.index + n)
    }

    fn prev_month(&self) -> bool {
        let mut text = String::new();
        for n in (1..=2).rev() {
            if let Some(t) = self.prev(n) {
                text.push_str(t.surface());
            }
        }
        let mut chars = text.chars().rev();
        chars.next() == Some('月') && chars.next().is_some_and(kana::is_numeral_char)
    }

    fn next_nominal(&self) -> bool {
        let next = (1..=2)
            .filter_map(|n| self.next(n))
            .find(|t| !OPENING_BRACKETS.contains(&t.surface()));
        next.is_some_and(|t| t.pos().is_nominal())
    }

    /// 条件を評価します。
    pub fn satisfies(&self, cond: &Condition) -> bool {
        match cond {
            Condition::Always => true,
            Condition::PrevNominal => self.prev(1).is_some_and(|t| t.pos().is_nominal()),
            Condition::PrevMonth => self.prev_month(),
            Condition::NextSurface(surface) => {
                self.next(1).is_some_and(|t| t.surface() == *surface)
            }
            Condition::NextDictionaryForms(forms) => forms
                .iter()
                .enumerate()
                .all(|(i, form)| self.next(i + 1).is_some_and(|t| t.dictionary_form() == *form)),
            Condition::NextQuantity => self.next(1).is_some_and(|t| {
                t.pos() == PartOfSpeech::Numeral
                    || t.surface()
                        .chars()
                        .next()
                        .is_some_and(|c| c == '何' || kana::is_numeral_char(c))
            }),
            Condition::NextNominal => self.next_nominal(),
            Condition::SelfPos(pos) => self.current().pos() == *pos,
            Condition::Standalone => {
                let bound = |t: &CombinedToken| {
                    t.pos().is_nominal()
                        || matches!(t.pos(), PartOfSpeech::Prefix | PartOfSpeech::Suffix)
                };
                !self.prev(1).is_some_and(bound) && !self.next(1).is_some_and(bound)
            }
            Condition::All(conds) => conds.iter().all(|c| self.satisfies(c)),
            Condition::Not(cond) => !self.satisfies(cond),
        }
    }
}

/// トークンに適用される最初の規則を返します。
pub fn find_rule(tokens: &[CombinedToken], index: usize) -> Option<&'static ReadingRule> {
    let token = tokens.get(index)?;
    let window = Window::new(tokens, index);
    BY_SPAN
        .get(token.surface())?
        .iter()
        .copied()
        .find(|rule| window.satisfies(&rule.when))
}

pub(crate) fn apply_reading_overrides(
    mut tokens: Vec<CombinedToken>,
    modifications: &mut Vec<Modification>,
) -> Vec<CombinedToken> {
    // 条件はすべて上書き前のトークン列で評価する
    let decisions: Vec<(usize, &ReadingRule)> = (0..tokens.len())
        .filter_map(|i| find_rule(&tokens, i).map(|rule| (i, rule)))
        .collect();
    for (i, rule) in decisions {
        let before = tokens[i].clone();
        tokens[i].override_reading(rule.reading, rule.pos);
        log::trace!(
            "reading override: {} {} -> {}",
            before.surface(),
            before.reading(),
            rule.reading
        );
        modifications.push(Modification::new(
            ModificationKind::ReadingOverride,
            std::slice::from_ref(&before),
            &tokens[i],
        ));
    }
    tokens
}
