//! Sample literal parser
//!
//! Accepts a comma separated list of numbers, optionally bracketed, whose
//! last element may be an open range `x..` meaning "x and onwards":
//! `[1, 2, 4, 8..]`, `1, 1/2, 1/3`, `[3+2i, 4+4i, 5+6i..]`.

use unodos_core::{Number, UnodosError};

/// Parse a sample literal into its values
pub fn parse_sample(input: &str) -> Result<Vec<Number>, UnodosError> {
    let body = strip_brackets(input.trim())?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let elements = split_elements(body)?;
    let last = elements.len() - 1;
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let text = match element.strip_suffix("..") {
                Some(start) if i == last => start,
                Some(_) => {
                    return Err(UnodosError::parse_error(format!(
                        "open range '{}' is only allowed as the last element",
                        element
                    )))
                }
                None => element,
            };
            Number::from_str(text).map_err(|e| {
                UnodosError::parse_error(format!("element {} ('{}'): {}", i + 1, text, e))
            })
        })
        .collect()
}

fn strip_brackets(input: &str) -> Result<&str, UnodosError> {
    match (input.strip_prefix('['), input.ends_with(']')) {
        (Some(rest), true) => Ok(&rest[..rest.len() - 1]),
        (None, false) => Ok(input),
        _ => Err(UnodosError::parse_error(format!("unbalanced brackets in '{}'", input))),
    }
}

/// Split at top-level commas, keeping parenthesised parts like `(1/2)i` whole
fn split_elements(input: &str) -> Result<Vec<&str>, UnodosError> {
    let mut elements = Vec::new();
    let mut paren_depth = 0i32;
    let mut current_start = 0;

    for (byte_pos, c) in input.char_indices() {
        match c {
            '(' => paren_depth += 1,
            ')' => paren_depth -= 1,
            ',' if paren_depth == 0 => {
                elements.push(input[current_start..byte_pos].trim());
                current_start = byte_pos + c.len_utf8();
            }
            _ => {}
        }
        if paren_depth < 0 {
            return Err(UnodosError::parse_error(format!("unbalanced parentheses in '{}'", input)));
        }
    }
    if paren_depth != 0 {
        return Err(UnodosError::parse_error(format!("unbalanced parentheses in '{}'", input)));
    }
    elements.push(input[current_start..].trim());

    if let Some(pos) = elements.iter().position(|e| e.is_empty()) {
        return Err(UnodosError::parse_error(format!("empty element at position {}", pos + 1)));
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unodos_core::codes;

    fn n(text: &str) -> Number {
        Number::from_str(text).unwrap()
    }

    #[test]
    fn test_plain_list() {
        assert_eq!(
            parse_sample("1, 2, 3").unwrap(),
            vec![n("1"), n("2"), n("3")]
        );
        assert_eq!(parse_sample("[7]").unwrap(), vec![n("7")]);
        assert!(parse_sample("[]").unwrap().is_empty());
        assert!(parse_sample("  ").unwrap().is_empty());
    }

    #[test]
    fn test_open_range_tail() {
        assert_eq!(
            parse_sample("[1, 2, 4, 8..]").unwrap(),
            vec![n("1"), n("2"), n("4"), n("8")]
        );
        assert_eq!(parse_sample("[5..]").unwrap(), vec![n("5")]);
    }

    #[test]
    fn test_mixed_values() {
        let values = parse_sample("[1/2, 3+2i, 0.5, -4, 1+(1/2)i]").unwrap();
        assert_eq!(values[0], n("1/2"));
        assert_eq!(values[1], n("3+2i"));
        assert!(!values[2].is_exact());
        assert_eq!(values[3], n("-4"));
        assert_eq!(values[4], n("1+1/2i"));
    }

    #[test]
    fn test_errors() {
        for bad in ["[1, 2", "1, 2]", "1,,2", "[1, 2.., 3]", "[1, x]", "[(1, 2]", "1)"] {
            let err = parse_sample(bad).unwrap_err();
            assert!(err.is(codes::PARSE_ERROR), "{}", bad);
        }
    }
}
