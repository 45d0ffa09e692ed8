//! 解析結果の組み立て
//!
//! 解決された単語の列[`ResolvedWord`]と、入力テキストとの突き合わせ([`stitch`])を提供します。

use serde::Serialize;

/// 解決された単語
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedWord {
    /// 入力テキスト中の表層形
    pub original_text: String,

    /// 単語ID
    pub word_id: u32,

    /// 選択された表記のインデックス
    pub reading_index: usize,
}

/// 入力テキストの断片
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment<'a> {
    /// 解決された単語
    Word(&'a ResolvedWord),

    /// 解決されなかった部分
    Literal { text: &'a str },
}

impl Segment<'_> {
    /// 断片の文字列を返します。
    pub fn text(&self) -> &str {
        match self {
            Self::Word(word) => &word.original_text,
            Self::Literal { text } => text,
        }
    }
}

/// 解決された単語を入力テキストに当てはめ、テキスト全体を覆う断片の列を返します。
///
/// 各単語は直前の単語の後ろから前方に検索されます。
/// 見つからない単語は無視され、その部分は文字列の断片になります。
///
/// # 引数
///
/// * `text` - 入力テキスト
/// * `words` - 解析結果
///
/// # 戻り値
///
/// 連結すると`text`に一致する断片の列
pub fn stitch<'a>(text: &'a str, words: &'a [ResolvedWord]) -> Vec<Segment<'a>> {
    let mut segments = Vec::with_capacity(words.len() * 2 + 1);
    let mut cursor = 0;
    for word in words {
        if word.original_text.is_empty() {
            continue;
        }
        let Some(offset) = text[cursor..].find(&word.original_text) else {
            log::warn!("{:?} was not found after byte {}", word.original_text, cursor);
            continue;
        };
        let start = cursor + offset;
        if start > cursor {
            segments.push(Segment::Literal {
                text: &text[cursor..start],
            });
        }
        segments.push(Segment::Word(word));
        cursor = start + word.original_text.len();
    }
    if cursor < text.len() {
        segments.push(Segment::Literal {
            text: &text[cursor..],
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, word_id: u32) -> ResolvedWord {
        ResolvedWord {
            original_text: text.to_string(),
            word_id,
            reading_index: 0,
        }
    }

    #[test]
    fn test_stitch() {
        let text = "表へ出る。";
        let words = vec![word("表", 1489340), word("出る", 1)];
        let segments = stitch(text, &words);
        let texts: Vec<&str> = segments.iter().map(Segment::text).collect();
        assert_eq!(vec!["表", "へ", "出る", "。"], texts);
        assert_eq!(Segment::Word(&words[0]), segments[0]);
        assert!(matches!(segments[1], Segment::Literal { text: "へ" }));
    }

    #[test]
    fn test_stitch_repeated_surface() {
        let text = "ママとママ";
        let words = vec![word("ママ", 1129240), word("ママ", 1129240)];
        let segments = stitch(text, &words);
        assert_eq!(3, segments.len());
        assert_eq!(text, segments.iter().map(Segment::text).collect::<String>());
    }

    #[test]
    fn test_stitch_missing_word() {
        let words = vec![word("猫", 1)];
        let segments = stitch("犬", &words);
        assert_eq!(vec![Segment::Literal { text: "犬" }], segments);
    }
}
