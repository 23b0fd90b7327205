//! Splits a raw input line into shell words.
//!
//! Quoting follows the POSIX shell subset the interpreter understands:
//! single quotes are fully literal, double quotes only honour `\\` and `\"`,
//! and an unquoted backslash makes the next character literal.

/// Tokenize a command line into unquoted, unescaped arguments.
///
/// Unterminated quotes swallow the rest of the line; this never fails.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();

    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            if in_double && c != '\\' && c != '"' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' if !in_single => escaped = true,
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            ' ' | '\t' if !in_single && !in_double => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    log::trace!("tokenized {:?} into {:?}", line, args);
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_words_round_trip() {
        let words = ["ls", "-la", "/tmp", "foo.txt"];
        assert_eq!(tokenize(&words.join(" ")), words);
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(tokenize("echo   a   b"), ["echo", "a", "b"]);
        assert_eq!(tokenize("  \techo a\t "), ["echo", "a"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn adjacent_quotes_concatenate() {
        assert_eq!(tokenize("'a''b'c''d''e'f"), ["abcdef"]);
        assert_eq!(tokenize("echo \"hello\"'world'"), ["echo", "helloworld"]);
    }

    #[test]
    fn empty_quotes_do_not_split_words() {
        assert_eq!(tokenize("echo a''\"\"b"), ["echo", "ab"]);
        assert_eq!(tokenize("echo ''"), ["echo"]);
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(
            tokenize(r#"echo 'shell\\nscript   \"x\"'"#),
            ["echo", r#"shell\\nscript   \"x\""#]
        );
    }

    #[test]
    fn double_quote_escapes() {
        assert_eq!(
            tokenize(r#"echo "A \\ escapes itself""#),
            ["echo", r"A \ escapes itself"]
        );
        assert_eq!(tokenize(r#"echo "say \"hi\"""#), ["echo", r#"say "hi""#]);
        assert_eq!(tokenize(r#"echo "a\nb""#), ["echo", r"a\nb"]);
        assert_eq!(tokenize(r#"echo "it's""#), ["echo", "it's"]);
    }

    #[test]
    fn backslash_outside_quotes() {
        assert_eq!(tokenize(r"echo a\ \ b"), ["echo", "a  b"]);
        assert_eq!(tokenize(r"echo \'x\'"), ["echo", "'x'"]);
        assert_eq!(tokenize(r"echo \n"), ["echo", "n"]);
    }

    #[test]
    fn unterminated_quote_consumes_rest() {
        assert_eq!(tokenize("echo 'a b"), ["echo", "a b"]);
        assert_eq!(tokenize("echo \"x  y"), ["echo", "x  y"]);
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        assert_eq!(tokenize(r"echo a\"), ["echo", "a"]);
    }
}
