//! Infix tokenization shared by the Medline and PubMed parsers.

use crate::error::ParseError;

/// Whether a token is a proximity operator: `adj` or `adjN`.
pub(crate) fn is_adjacency(token: &str) -> bool {
    token
        .strip_prefix("adj")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

/// Whether a lowercased token is a Boolean or proximity operator.
pub(crate) fn is_operator(token: &str) -> bool {
    matches!(token, "and" | "or" | "not") || is_adjacency(token)
}

/// Splits an infix keyword expression into a token stack.
///
/// Whitespace separates tokens, balanced double quotes protect their contents
/// verbatim (the quotes stay in the token), and parentheses are emitted as
/// their own tokens. Adjacent non-operator words merge into one keyword
/// token, so `exp Sleep Apnea Syndromes/` comes out whole. Operator words are
/// lowercased; everything else keeps its case.
pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending = String::new();
    let mut current = String::new();
    let mut inside_quote = false;
    let mut depth = 0i64;

    for ch in line.chars() {
        if ch == '"' {
            inside_quote = !inside_quote;
            current.push('"');
        } else if inside_quote {
            current.push(ch);
        } else if ch.is_whitespace() {
            if current.is_empty() {
                continue;
            }
            let lowered = current.to_lowercase();
            if is_operator(&lowered) {
                flush_keyword(&mut tokens, &mut pending);
                tokens.push(lowered);
            } else {
                push_word(&mut pending, &current);
            }
            current.clear();
        } else if ch == '(' {
            depth += 1;
            push_word(&mut pending, &current);
            current.clear();
            flush_keyword(&mut tokens, &mut pending);
            tokens.push("(".to_string());
        } else if ch == ')' {
            depth -= 1;
            if depth < 0 {
                return Err(ParseError::MismatchedParentheses(line.trim().to_string()));
            }
            push_word(&mut pending, &current);
            current.clear();
            flush_keyword(&mut tokens, &mut pending);
            tokens.push(")".to_string());
        } else {
            current.push(ch);
        }
    }

    if inside_quote {
        return Err(ParseError::UnclosedQuote(line.trim().to_string()));
    }
    if depth != 0 {
        return Err(ParseError::MismatchedParentheses(line.trim().to_string()));
    }

    // A trailing word is a keyword even if it spells an operator; an operator
    // cannot end an expression.
    push_word(&mut pending, &current);
    flush_keyword(&mut tokens, &mut pending);

    Ok(tokens)
}

fn push_word(pending: &mut String, word: &str) {
    if word.is_empty() {
        return;
    }
    if !pending.is_empty() {
        pending.push(' ');
    }
    pending.push_str(word);
}

fn flush_keyword(tokens: &mut Vec<String>, pending: &mut String) {
    let keyword = pending.trim();
    if !keyword.is_empty() {
        tokens.push(keyword.to_string());
    }
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn single_keyword() {
        assert_eq!(tokens("OSA.mp."), vec!["OSA.mp."]);
    }

    #[test]
    fn multi_word_keyword_stays_whole() {
        assert_eq!(
            tokens("exp Sleep Apnea Syndromes/"),
            vec!["exp Sleep Apnea Syndromes/"]
        );
    }

    #[test]
    fn operators_split_keywords() {
        assert_eq!(
            tokens("heart attack and stroke"),
            vec!["heart attack", "and", "stroke"]
        );
    }

    #[test]
    fn operators_are_lowercased() {
        assert_eq!(tokens("a OR b"), vec!["a", "or", "b"]);
    }

    #[test]
    fn parens_are_their_own_tokens() {
        assert_eq!(
            tokens("(sleep$ adj3 (apnea$ or apnoea$)).mp."),
            vec![
                "(", "sleep$", "adj3", "(", "apnea$", "or", "apnoea$", ")", ")", ".mp."
            ]
        );
    }

    #[test]
    fn quotes_protect_contents() {
        assert_eq!(
            tokens(r#""mini mental stat*"[tiab] OR MMSE*[tiab]"#),
            vec![r#""mini mental stat*"[tiab]"#, "or", "MMSE*[tiab]"]
        );
    }

    #[test]
    fn quoted_operator_is_not_an_operator() {
        assert_eq!(tokens(r#""black and white""#), vec![r#""black and white""#]);
    }

    #[test]
    fn unclosed_quote_errors() {
        assert!(matches!(
            tokenize(r#""unfinished phrase"#),
            Err(ParseError::UnclosedQuote(_))
        ));
    }

    #[test]
    fn mismatched_parens_error() {
        assert!(matches!(
            tokenize("(a or b"),
            Err(ParseError::MismatchedParentheses(_))
        ));
        assert!(matches!(
            tokenize("a or b)"),
            Err(ParseError::MismatchedParentheses(_))
        ));
    }

    #[test]
    fn adjacency_operators_recognized() {
        assert!(is_operator("adj"));
        assert!(is_operator("adj3"));
        assert!(is_operator("adj42"));
        assert!(!is_operator("adjacent"));
        assert!(!is_operator("near2"));
    }
}
