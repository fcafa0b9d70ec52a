// Argument-list scanner for recognized method calls

/// Why an argument list could not be scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgFault {
    UnterminatedString,
    UnbalancedParens,
}

/// Character scanner over the text following a call's opening parenthesis
pub struct ArgScanner {
    input: Vec<char>,
    position: usize,
}

impl ArgScanner {
    pub fn new(text: &str) -> Self {
        ArgScanner {
            input: text.chars().collect(),
            position: 0,
        }
    }

    /// Read arguments up to the matching `)`.
    ///
    /// Arguments are split on commas outside quotes and brackets, trimmed,
    /// unquoted, and reduced to their value when written as `key=value`.
    /// Nothing is evaluated: `a+1` stays `a+1`.
    pub fn scan_arguments(&mut self) -> Result<Vec<String>, ArgFault> {
        let mut args = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        loop {
            let ch = self.advance().ok_or(ArgFault::UnbalancedParens)?;
            match ch {
                '"' | '\'' => {
                    let text = self.string_literal(ch)?;
                    current.push(ch);
                    current.push_str(&text);
                    current.push(ch);
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' if depth == 0 => break,
                ')' | ']' | '}' => {
                    depth = depth.checked_sub(1).ok_or(ArgFault::UnbalancedParens)?;
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    push_argument(&mut args, &current);
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
        push_argument(&mut args, &current);
        Ok(args)
    }

    /// Byte length of the text read so far, closing parenthesis included
    pub fn consumed(&self) -> usize {
        self.input[..self.position].iter().map(|c| c.len_utf8()).sum()
    }

    fn string_literal(&mut self, quote: char) -> Result<String, ArgFault> {
        let mut text = String::new();
        while let Some(ch) = self.advance() {
            if ch == quote {
                return Ok(text);
            }
            if ch == '\\' {
                let escaped = self.advance().ok_or(ArgFault::UnterminatedString)?;
                text.push(escaped);
            } else {
                text.push(ch);
            }
        }
        Err(ArgFault::UnterminatedString)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(ch)
    }
}

fn push_argument(args: &mut Vec<String>, raw: &str) {
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    let text = strip_keyword(text);
    args.push(unquote(text).to_string());
}

/// `key=value` → `value`; leaves `a==b` and quoted `=` alone
fn strip_keyword(text: &str) -> &str {
    let Some(eq) = text.find('=') else {
        return text;
    };
    let key = text[..eq].trim();
    let is_identifier = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_identifier && !text[eq + 1..].starts_with('=') {
        text[eq + 1..].trim()
    } else {
        text
    }
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Result<Vec<String>, ArgFault> {
        ArgScanner::new(text).scan_arguments()
    }

    #[test]
    fn test_plain_and_quoted_arguments() {
        assert_eq!(scan(")").unwrap(), Vec::<String>::new());
        assert_eq!(scan("10)").unwrap(), ["10"]);
        assert_eq!(scan("\"A\", 'B', 3)").unwrap(), ["A", "B", "3"]);
        assert_eq!(scan("\"a, b\")").unwrap(), ["a, b"]);
    }

    #[test]
    fn test_expressions_are_not_evaluated() {
        assert_eq!(scan("a+1)").unwrap(), ["a+1"]);
        assert_eq!(scan("f(1, 2), 3)").unwrap(), ["f(1, 2)", "3"]);
        assert_eq!(scan("x == y)").unwrap(), ["x == y"]);
    }

    #[test]
    fn test_keyword_arguments_keep_value() {
        assert_eq!(scan("value=5)").unwrap(), ["5"]);
        assert_eq!(scan("start = \"A\", end=\"D\")").unwrap(), ["A", "D"]);
    }

    #[test]
    fn test_consumed_stops_at_closing_paren() {
        let text = "'é', 1)) + 1";
        let mut scanner = ArgScanner::new(text);
        scanner.scan_arguments().unwrap();
        assert_eq!(&text[scanner.consumed()..], ") + 1");
    }

    #[test]
    fn test_faults() {
        assert_eq!(scan("\"oops)"), Err(ArgFault::UnterminatedString));
        assert_eq!(scan("1, 2"), Err(ArgFault::UnbalancedParens));
        assert_eq!(scan("(1, 2)"), Err(ArgFault::UnbalancedParens));
        assert_eq!(scan("1])"), Err(ArgFault::UnbalancedParens));
    }
}
