//! ストリームへの入出力

use super::dynamic_string::SENTINEL;
use super::DynamicString;
use std::fmt;
use std::io::{self, BufRead, ErrorKind, Write};

const LINE_SEPARATOR: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

impl DynamicString {
    /// 内容をそのまま書き出す（空洞状態なら何も書かない）
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.as_bytes())
    }

    /// 改行までの1行を読み込み、末尾に追加する
    ///
    /// 改行（直前の `\r` を含む）は消費されるが内容には含めない。
    /// 消費したバイト数を返し、入力の終端では 0 を返す。
    /// 終端文字は内容に保持できないため読み飛ばす。
    pub fn read_line<R: BufRead + ?Sized>(&mut self, reader: &mut R) -> io::Result<usize> {
        let start = self.len();
        let mut consumed = 0;

        loop {
            let (used, found_separator) = {
                let available = match reader.fill_buf() {
                    Ok(available) => available,
                    Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                    Err(error) => return Err(error),
                };
                if available.is_empty() {
                    return Ok(consumed);
                }

                let (line, used, found_separator) =
                    match available.iter().position(|&byte| byte == LINE_SEPARATOR) {
                        Some(end) => (&available[..end], end + 1, true),
                        None => (available, available.len(), false),
                    };

                self.push_skipping_sentinel(line);

                (used, found_separator)
            };

            reader.consume(used);
            consumed += used;

            if found_separator {
                if self.len() > start && self.as_bytes().last() == Some(&CARRIAGE_RETURN) {
                    self.remove(self.len() - 1);
                }
                return Ok(consumed);
            }
        }
    }

    /// 終端文字を読み飛ばしながら末尾に追加
    pub(super) fn push_skipping_sentinel(&mut self, bytes: &[u8]) {
        for &byte in bytes.iter().filter(|&&byte| byte != SENTINEL) {
            self.push(byte);
        }
    }
}

impl fmt::Display for DynamicString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
    }
}

impl fmt::Write for DynamicString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_skipping_sentinel(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_write_to_stream() {
        let mut output = Vec::new();
        DynamicString::from("Hello").write_to(&mut output).unwrap();
        DynamicString::hollow().write_to(&mut output).unwrap();
        assert_eq!(output, b"Hello");
    }

    #[test]
    fn test_display() {
        assert_eq!(DynamicString::from("Hello").to_string(), "Hello");
        assert_eq!(DynamicString::hollow().to_string(), "");
        assert_eq!(format!("[{:>6}]", DynamicString::from("ab")), "[    ab]");
    }

    #[test]
    fn test_read_lines_until_separator() {
        let mut input = Cursor::new("first line\nsecond\n\nlast");

        let mut first = DynamicString::new();
        assert_eq!(first.read_line(&mut input).unwrap(), 11);
        assert_eq!(first, "first line");

        let mut second = DynamicString::new();
        assert_eq!(second.read_line(&mut input).unwrap(), 7);
        assert_eq!(second, "second");

        let mut empty = DynamicString::new();
        assert_eq!(empty.read_line(&mut input).unwrap(), 1);
        assert!(empty.is_empty());

        let mut last = DynamicString::new();
        assert_eq!(last.read_line(&mut input).unwrap(), 4);
        assert_eq!(last, "last");

        let mut end = DynamicString::new();
        assert_eq!(end.read_line(&mut input).unwrap(), 0);
        assert!(end.is_empty());
    }

    #[test]
    fn test_read_line_across_small_chunks() {
        let mut input = BufReader::with_capacity(2, Cursor::new("abcdefg\nrest"));
        let mut line = DynamicString::with_capacity(1);
        assert_eq!(line.read_line(&mut input).unwrap(), 8);
        assert_eq!(line, "abcdefg");
        assert!(line.capacity() >= 7);

        let mut rest = DynamicString::new();
        rest.read_line(&mut input).unwrap();
        assert_eq!(rest, "rest");
    }

    #[test]
    fn test_read_line_appends_and_skips_sentinel() {
        let mut input = Cursor::new(b"b\0c\n".to_vec());
        let mut line = DynamicString::from("a");
        line.read_line(&mut input).unwrap();
        assert_eq!(line, "abc");
    }

    #[test]
    fn test_read_line_strips_carriage_return() {
        let mut input = Cursor::new("dos line\r\n\r\nkeep\rme\n");

        let mut first = DynamicString::new();
        assert_eq!(first.read_line(&mut input).unwrap(), 10);
        assert_eq!(first, "dos line");

        let mut blank = DynamicString::new();
        assert_eq!(blank.read_line(&mut input).unwrap(), 2);
        assert!(blank.is_empty());

        let mut inner = DynamicString::new();
        inner.read_line(&mut input).unwrap();
        assert_eq!(inner, "keep\rme");
    }

    #[test]
    fn test_read_line_carriage_return_split_across_chunks() {
        let mut input = BufReader::with_capacity(3, Cursor::new("ab\r\ncd"));
        let mut line = DynamicString::new();
        assert_eq!(line.read_line(&mut input).unwrap(), 4);
        assert_eq!(line, "ab");
    }

    #[test]
    fn test_read_line_keeps_existing_carriage_return() {
        let mut input = Cursor::new("\n");
        let mut line = DynamicString::from("x\r");
        line.read_line(&mut input).unwrap();
        assert_eq!(line, "x\r");
    }

    #[test]
    fn test_fmt_write() {
        let mut string = DynamicString::new();
        write!(string, "{}-{}", 4, "two").unwrap();
        assert_eq!(string, "4-two");
    }

    #[test]
    fn test_fmt_write_skips_sentinel() {
        let mut string = DynamicString::new();
        write!(string, "{}{}", "a\0b", "c").unwrap();
        assert_eq!(string, "abc");
    }
}
