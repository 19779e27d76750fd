//! 行の並び替えデモ
//!
//! 空行まで入力を読み、大文字小文字を無視した逆辞書順で並べて出力する

use crate::buffer::{sort_reversed_case_insensitive, DynamicString};
use crate::config::SortOptions;
use crate::error::Result;
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter some strings and press Enter:";
pub const HEADER: &str = "Your strings sorted lexicographically in reverse & case insensitive:";

/// 空行または入力の終端まで行を読み込む
pub fn read_lines<R: BufRead + ?Sized>(
    reader: &mut R,
    line_capacity: usize,
) -> io::Result<Vec<DynamicString>> {
    let mut lines = Vec::new();

    loop {
        let mut line = DynamicString::with_capacity(line_capacity);
        line.read_line(reader)?;

        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    Ok(lines)
}

/// 読み込み・並び替え・出力を行い、出力した行数を返す
pub fn run<R, W>(reader: &mut R, writer: &mut W, options: &SortOptions) -> Result<usize>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    if options.show_prompt {
        writeln!(writer, "{}", PROMPT)?;
        writer.flush()?;
    }

    let mut lines = read_lines(reader, options.line_capacity)?;
    log::debug!("read {} lines", lines.len());

    sort_reversed_case_insensitive(&mut lines);
    log::info!("sorted {} lines", lines.len());

    if options.show_prompt {
        writeln!(writer, "{}", HEADER)?;
    }
    for line in &lines {
        line.write_to(writer)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(lines.len())
}
