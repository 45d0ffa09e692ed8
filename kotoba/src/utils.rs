//! 素性文字列の解析ユーティリティ
//!
//! トークナイザーが返す素性文字列はCSV形式(引用符付きフィールドを含む)です。
//! このモジュールはその分解と、未定義値`*`の取り扱いを提供します。

use csv_core::ReadFieldResult;

use crate::errors::{KotobaError, Result};

/// CSV形式の行を解析してフィールドのベクターに分割する
///
/// ダブルクォートで囲まれたフィールドや、フィールド内のカンマも正しく処理します。
///
/// # 引数
///
/// * `row` - 解析するCSV形式の文字列
///
/// # 戻り値
///
/// 解析されたフィールドを格納する文字列のベクター
///
/// # エラー
///
/// フィールドが内部バッファを超える長さの場合、またはUTF-8として不正な場合にエラーを返します。
///
/// # 例
///
/// ```
/// # use kotoba::utils::parse_csv_row;
/// let fields = parse_csv_row("名詞,\"1,2-ジクロロエタン\"").unwrap();
/// assert_eq!(fields, vec!["名詞", "1,2-ジクロロエタン"]);
/// ```
pub fn parse_csv_row(row: &str) -> Result<Vec<String>> {
    let mut features = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty | ReadFieldResult::End => true,
            ReadFieldResult::Field { .. } => false,
            ReadFieldResult::OutputFull => {
                return Err(KotobaError::invalid_format(
                    "feature",
                    format!("a field is too long: {row}"),
                ));
            }
        };
        features.push(std::str::from_utf8(&output[..nout])?.to_string());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    Ok(features)
}

/// 素性フィールドを取得します。
///
/// 範囲外のインデックス、空文字列、未定義値`*`は`None`として扱います。
///
/// # 引数
///
/// * `fields` - [`parse_csv_row`]で分解したフィールド
/// * `index` - 取得するフィールドの位置
pub fn feature_field(fields: &[String], index: usize) -> Option<&str> {
    fields
        .get(index)
        .map(String::as_str)
        .filter(|f| !f.is_empty() && *f != "*")
}
