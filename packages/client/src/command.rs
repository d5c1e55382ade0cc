//! Command line parsing for the interactive prompt.

use crate::error::CommandError;

/// A command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Tell the opponent a submission was made
    Submit,
    /// Report the judged outcome of our submission
    Verdict(String),
    /// Leave the duel
    Quit,
}

impl Command {
    /// Parse one trimmed, non-empty input line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };

        match head.to_ascii_lowercase().as_str() {
            "submit" | "s" => Ok(Self::Submit),
            "verdict" | "v" => words
                .next()
                .map(|verdict| Self::Verdict(verdict.to_string()))
                .ok_or(CommandError::MissingVerdict),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit() {
        // テスト項目: submit とその短縮形を解析できる
        assert_eq!(Command::parse("submit"), Ok(Command::Submit));
        assert_eq!(Command::parse("S"), Ok(Command::Submit));
    }

    #[test]
    fn test_parse_verdict_keeps_value_as_typed() {
        // テスト項目: verdict の値は大文字小文字を変えずに渡される
        // given (前提条件):
        let line = "verdict AC";

        // when (操作):
        let command = Command::parse(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Verdict("AC".to_string())));
        assert_eq!(
            Command::parse("v  wa"),
            Ok(Command::Verdict("wa".to_string()))
        );
    }

    #[test]
    fn test_parse_verdict_without_value() {
        // テスト項目: 値のない verdict はエラー
        assert_eq!(Command::parse("verdict"), Err(CommandError::MissingVerdict));
    }

    #[test]
    fn test_parse_unknown_and_quit() {
        // テスト項目: 未知のコマンドはエラー、quit は終了
        assert_eq!(
            Command::parse("dance now"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }
}
