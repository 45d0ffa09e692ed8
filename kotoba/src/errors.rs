//! エラー型の定義
//!
//! このモジュールは、kotobaライブラリで使用されるすべてのエラー型を定義します。
//! 未解決トークンやスコアの同点はエラーではなく、ここには現れません。

use std::error::Error;
use std::fmt;

/// kotoba専用のResult型
///
/// エラー型としてデフォルトで[`KotobaError`]を使用します。
pub type Result<T, E = KotobaError> = std::result::Result<T, E>;

/// kotobaのエラー型
///
/// 各バリアントは特定のエラー条件に対応しています。
/// 上流(トークナイザーや辞書ストア)の失敗は[`KotobaError::Upstream`]として
/// 呼び出し元に伝播し、その解析呼び出しは部分的な結果を返さずに中断されます。
#[derive(Debug, thiserror::Error)]
pub enum KotobaError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 上流コンポーネントの失敗
    ///
    /// [`UpstreamError`]のエラーバリアント。
    #[error(transparent)]
    Upstream(UpstreamError),

    /// UTF-8エンコーディングエラー
    #[error(transparent)]
    Utf8(std::str::Utf8Error),

    /// I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSONのデシリアライズエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// スナップショットのシリアライズまたは検証のエラー
    #[error(transparent)]
    Rkyv(#[from] rkyv::rancor::Error),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}

impl KotobaError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }

    /// 上流コンポーネントの失敗を表すエラーを生成します
    ///
    /// 外部の[`Analyzer`](crate::analyzer::Analyzer)や
    /// [`DictionaryStore`](crate::dictionary::DictionaryStore)の実装から利用されることを
    /// 想定して公開しています。
    ///
    /// # 引数
    ///
    /// * `component` - 失敗したコンポーネントの名前(`"tokenizer"`、`"dictionary"`など)
    /// * `msg` - エラーメッセージ
    pub fn upstream<S>(component: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Upstream(UpstreamError {
            component,
            msg: msg.into(),
        })
    }

    /// このエラーが上流コンポーネントの失敗かどうかを返します。
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}

/// トークナイザーや辞書ストアが失敗した場合に使用されるエラー
#[derive(Debug)]
pub struct UpstreamError {
    /// 失敗したコンポーネント
    pub(crate) component: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl UpstreamError {
    /// 失敗したコンポーネントの名前を返します。
    pub fn component(&self) -> &'static str {
        self.component
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UpstreamError: {}: {}", self.component, self.msg)
    }
}

impl Error for UpstreamError {}

impl From<std::str::Utf8Error> for KotobaError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::Utf8(error)
    }
}
