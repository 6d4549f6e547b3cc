//! Infix-to-prefix conversion for operator token streams.
//!
//! This is the standard shunting-yard pass run right-to-left over the input,
//! which yields a postfix expression that is then reversed in place to give
//! prefix ordering. Parentheses are kept in the output so the tree-building
//! pass can see group boundaries; unknown tokens pass through as operands.

use crate::tokens::is_adjacency;

/// A dialect precedence table. `None` marks an operand.
pub(crate) type Precedence = fn(&str) -> Option<u8>;

/// Medline precedence: `or` binds loosest, everything else equally tight.
pub(crate) fn medline_precedence(token: &str) -> Option<u8> {
    match token {
        "or" => Some(0),
        "and" | "not" => Some(1),
        _ if is_adjacency(token) => Some(1),
        _ => None,
    }
}

/// PubMed precedence: like Medline, except `not` binds tighter than `and`.
pub(crate) fn pubmed_precedence(token: &str) -> Option<u8> {
    match token {
        "or" => Some(0),
        "and" => Some(1),
        "not" => Some(2),
        _ if is_adjacency(token) => Some(1),
        _ => None,
    }
}

/// Converts an infix token stream to prefix order.
pub(crate) fn infix_to_prefix(infix: &[String], precedence: Precedence) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    let mut result: Vec<String> = Vec::new();

    for token in infix.iter().rev() {
        if token.is_empty() {
            continue;
        }
        if token == ")" {
            stack.push(token.clone());
            result.push(token.clone());
        } else if token == "(" {
            while let Some(top) = stack.pop() {
                if top == ")" {
                    result.push("(".to_string());
                    break;
                }
                result.push(top);
            }
        } else if let Some(binding) = precedence(token) {
            // A `)` left on the stack acts as the weakest binding, so an
            // operator never pops across a group boundary.
            while let Some(top) = stack.last() {
                if precedence(top).unwrap_or(0) > binding {
                    result.push(stack.pop().expect("stack has a top"));
                } else {
                    break;
                }
            }
            stack.push(token.clone());
        } else {
            result.push(token.clone());
        }
    }

    while let Some(top) = stack.pop() {
        result.push(top);
    }

    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn prefix(tokens: &[&str], precedence: Precedence) -> Vec<String> {
        infix_to_prefix(&strings(tokens), precedence)
    }

    #[test]
    fn single_operand_passes_through() {
        assert_eq!(prefix(&["a"], medline_precedence), strings(&["a"]));
    }

    #[test]
    fn binary_expression() {
        assert_eq!(
            prefix(&["a", "and", "b"], medline_precedence),
            strings(&["and", "a", "b"])
        );
    }

    #[test]
    fn parentheses_are_retained() {
        assert_eq!(
            prefix(&["(", "a", "or", "b", ")"], medline_precedence),
            strings(&["(", "or", "a", "b", ")"])
        );
    }

    #[test]
    fn nested_groups() {
        assert_eq!(
            prefix(
                &["(", "sleep$", "adj3", "(", "apnea$", "or", "apnoea$", ")", ")", ".mp."],
                medline_precedence,
            ),
            strings(&["(", "adj3", "sleep$", "(", "or", "apnea$", "apnoea$", ")", ")", ".mp."])
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // a or b and c => or a (and b c), prefix: or a and b c
        assert_eq!(
            prefix(&["a", "or", "b", "and", "c"], medline_precedence),
            strings(&["or", "a", "and", "b", "c"])
        );
    }

    #[test]
    fn preserves_operand_and_operator_multiset() {
        let input = strings(&["(", "a", "and", "b", ")", "or", "c", "not", "d"]);
        let output = infix_to_prefix(&input, medline_precedence);
        let mut sorted_in: Vec<&String> = input.iter().collect();
        let mut sorted_out: Vec<&String> = output.iter().collect();
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);
    }

    #[test]
    fn unknown_tokens_are_operands() {
        assert_eq!(
            prefix(&["x.ti.", "near", "y.ti."], medline_precedence),
            strings(&["x.ti.", "near", "y.ti."])
        );
    }

    #[test]
    fn pubmed_not_binds_tightest() {
        // a and b not c => and a (not b c), prefix: and a not b c
        assert_eq!(
            prefix(&["a", "and", "b", "not", "c"], pubmed_precedence),
            strings(&["and", "a", "not", "b", "c"])
        );
    }
}
