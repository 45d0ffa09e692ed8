//! テキストを辞書の単語に解決するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだテキストを1行ずつ解析し、
//! 指定された出力形式(words、wakati、segments、json)で結果を出力します。

use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use kotoba::errors::KotobaError;
use kotoba::{
    Analyzer, DictionaryStore, FeatureLayout, MemoryDictionary, Parser, ResolvedWord, Segment,
    VibratoAnalyzer, stitch,
};

/// 出力モード
#[derive(Clone, Copy, Debug)]
enum OutputMode {
    Words,
    Wakati,
    Segments,
    Json,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "words" => Ok(Self::Words),
            "wakati" => Ok(Self::Wakati),
            "segments" => Ok(Self::Segments),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// 素性のレイアウト
#[derive(Clone, Copy, Debug)]
enum Layout {
    Ipadic,
    Unidic,
}

impl FromStr for Layout {
    type Err = &'static str;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        match layout {
            "ipadic" => Ok(Self::Ipadic),
            "unidic" => Ok(Self::Unidic),
            _ => Err("Could not parse a layout"),
        }
    }
}

impl From<Layout> for FeatureLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Ipadic => FeatureLayout::ipadic(),
            Layout::Unidic => FeatureLayout::unidic(),
        }
    }
}

/// コマンドライン引数
#[derive(clap::Parser, Debug)]
#[clap(name = "parse", about = "Resolves Japanese text into dictionary words")]
struct Args {
    /// System dictionary of the tokenizer (in zstd).
    #[clap(short = 'i', long)]
    sysdic: PathBuf,

    /// Word dictionary snapshot built by the compiler.
    #[clap(short = 'd', long)]
    dictionary: PathBuf,

    /// Feature layout of the system dictionary. Choices are ipadic and unidic.
    #[clap(short = 'L', long, default_value = "ipadic")]
    layout: Layout,

    /// Output mode. Choices are words, wakati, segments, and json.
    #[clap(short = 'O', long, default_value = "words")]
    output_mode: OutputMode,

    /// Ignores white spaces in input strings.
    #[clap(short = 'S', long)]
    ignore_space: bool,

    /// Maximum length of unknown words.
    #[clap(short = 'M', long)]
    max_grouping_len: Option<usize>,

    /// Rejects input lines longer than this number of characters.
    #[clap(long)]
    max_input_chars: Option<usize>,
}

/// 実行中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum ParseError {
    /// 解析器のエラー
    #[error(transparent)]
    Kotoba(#[from] KotobaError),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSONの出力エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 1行分の解析結果を出力します。
fn write_words<W: Write>(
    out: &mut W,
    mode: OutputMode,
    line: &str,
    words: &[ResolvedWord],
) -> Result<(), ParseError> {
    match mode {
        OutputMode::Words => {
            for word in words {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    word.original_text, word.word_id, word.reading_index
                )?;
            }
            out.write_all(b"EOS\n")?;
        }
        OutputMode::Wakati => {
            for (i, segment) in stitch(line, words).iter().enumerate() {
                if i != 0 {
                    out.write_all(b" ")?;
                }
                out.write_all(segment.text().as_bytes())?;
            }
            out.write_all(b"\n")?;
        }
        OutputMode::Segments => {
            for segment in stitch(line, words) {
                match segment {
                    Segment::Word(word) => writeln!(
                        out,
                        "{}\t{}\t{}",
                        word.original_text, word.word_id, word.reading_index
                    )?,
                    Segment::Literal { text } => writeln!(out, "{text}\t*")?,
                }
            }
            out.write_all(b"EOS\n")?;
        }
        OutputMode::Json => {
            serde_json::to_writer(&mut *out, &stitch(line, words))?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// 入力を1行ずつ解析して出力します。
///
/// 解析に失敗した行は警告を出して読み飛ばします。
///
/// # 戻り値
///
/// 読み飛ばした行の数
fn run<A, S, R, W>(
    parser: &Parser<A, S>,
    mode: OutputMode,
    rdr: R,
    out: &mut W,
    flush_each_line: bool,
) -> Result<usize, ParseError>
where
    A: Analyzer,
    S: DictionaryStore,
    R: BufRead,
    W: Write,
{
    let mut skipped = 0;
    for (i, line) in rdr.lines().enumerate() {
        let line = line?;
        let words = match parser.parse(&line, None) {
            Ok(words) => words,
            Err(e) => {
                log::warn!("line {}: {e}", i + 1);
                skipped += 1;
                continue;
            }
        };
        write_words(out, mode, &line, &words)?;
        if flush_each_line {
            out.flush()?;
        }
    }
    Ok(skipped)
}

fn main() -> Result<(), ParseError> {
    env_logger::init();
    let args = <Args as clap::Parser>::parse();

    eprintln!("Loading the dictionaries...");
    let analyzer = VibratoAnalyzer::from_path(&args.sysdic)?
        .layout(args.layout.into())
        .ignore_space(args.ignore_space)?
        .max_grouping_len(args.max_grouping_len.unwrap_or(0));
    let store = MemoryDictionary::from_path(&args.dictionary)?;
    log::info!("loaded {} entries from {}", store.len(), args.dictionary.display());

    let mut parser = Parser::new(analyzer, store);
    if let Some(max) = args.max_input_chars {
        parser = parser.max_input_chars(max);
    }

    eprintln!("Ready to parse");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    let skipped = run(&parser, args.output_mode, io::stdin().lock(), &mut out, is_tty)?;
    out.flush()?;
    if skipped != 0 {
        eprintln!("{skipped} lines could not be parsed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use kotoba::{DictionaryBuilder, Token};

    /// 入力全体を1つの名詞として返す解析器
    struct WholeLine;

    impl Analyzer for WholeLine {
        fn analyze(&self, text: &str) -> Result<Vec<Token>, KotobaError> {
            Ok(vec![
                Token::new(text, 0)
                    .with_pos_sections("名詞,一般".split(','))
                    .with_reading("ネコ")
                    .with_dictionary_form(text),
            ])
        }
    }

    fn parser() -> Parser<WholeLine, MemoryDictionary> {
        let mut builder = DictionaryBuilder::new().strict(true);
        builder
            .read_jsonl(
                r#"{"word_id":10,"readings":[{"text":"猫","form_type":"kanji","kana":"ねこ"},{"text":"ねこ","form_type":"kana"}],"senses":[{"pos":["n"]}]}"#
                    .as_bytes(),
            )
            .unwrap();
        Parser::new(WholeLine, builder.build()).max_input_chars(3)
    }

    #[test]
    fn test_failed_line_is_skipped() {
        let input = "ねこ\nねこねこねこ\n猫\n";
        let mut out = vec![];
        let skipped = run(&parser(), OutputMode::Words, input.as_bytes(), &mut out, false).unwrap();
        assert_eq!(1, skipped);
        assert_eq!(
            "ねこ\t10\t1\nEOS\n猫\t10\t0\nEOS\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn test_wakati() {
        let mut out = vec![];
        run(&parser(), OutputMode::Wakati, "ねこ\n".as_bytes(), &mut out, false).unwrap();
        assert_eq!("ねこ\n", String::from_utf8(out).unwrap());
    }
}
