//! 文字種の判定とかなの変換
//!
//! 候補解決や読みの照合では、カタカナとひらがなを同一視する必要があります。
//! このモジュールはそのための小さな関数群を提供します。

/// カタカナとひらがなのコードポイントの差
const KANA_OFFSET: u32 = 0x60;

/// 文字がひらがなかどうかを判定します。
#[inline(always)]
pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}')
}

/// 文字がカタカナかどうかを判定します。
///
/// 長音符`ー`、カタカナ拡張、半角カタカナも含みます。
#[inline(always)]
pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF65}'..='\u{FF9F}')
}

/// 文字がかな(ひらがなまたはカタカナ)かどうかを判定します。
#[inline(always)]
pub fn is_kana_char(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

/// 文字が漢字かどうかを判定します。
///
/// CJK統合漢字とその拡張A〜E、互換漢字、および踊り字`々`を漢字として扱います。
pub fn is_kanji(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2B73F}'
            | '\u{2B740}'..='\u{2B81F}'
            | '\u{2B820}'..='\u{2CEAF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{2F800}'..='\u{2FA1F}'
            | '\u{3005}'
    )
}

/// 文字が数字(算用数字、全角数字、漢数字)かどうかを判定します。
pub fn is_numeral_char(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '０'..='９')
        || matches!(
            c,
            '〇' | '一' | '二' | '三' | '四' | '五' | '六' | '七' | '八' | '九' | '十' | '百' | '千' | '万'
        )
}

/// 文字列が空でなく、すべてかなで構成されているかを判定します。
///
/// # 引数
///
/// * `s` - 判定する文字列
///
/// # 戻り値
///
/// すべての文字がかなの場合は`true`
pub fn is_kana(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_kana_char)
}

/// カタカナをひらがなに変換します。
///
/// 長音符や半角カタカナなど、対応するひらがなのない文字はそのまま残します。
///
/// # 引数
///
/// * `s` - 変換する文字列
///
/// # 戻り値
///
/// 変換後の文字列
pub fn to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' | '\u{30FD}'..='\u{30FE}' => {
                char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// ひらがなをカタカナに変換します。
pub fn to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}' => {
                char::from_u32(c as u32 + KANA_OFFSET).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// かな表記を比較用の正規形(ひらがな)に畳み込みます。
///
/// かな以外の文字を含む場合は`None`を返します。
pub fn fold_kana(s: &str) -> Option<String> {
    if is_kana(s) {
        Some(to_hiragana(s))
    } else {
        None
    }
}

/// 2つの文字列の共通接頭辞の長さを文字数で返します。
pub fn common_prefix_chars(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
