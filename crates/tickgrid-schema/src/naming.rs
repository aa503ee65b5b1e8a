#![deny(unsafe_code)]

//! Qualified field names.
//!
//! A field's stable identity is `schemaName,fieldName`. The comma is the
//! delimiter; a component that contains a comma or starts with a double
//! quote is wrapped in double quotes, with embedded quotes doubled. This is
//! the key format under which user column layouts are persisted, so the
//! encoding must stay stable.

use crate::error::SchemaError;

/// Joins a schema name and field name into one qualified name.
pub fn qualified_name(schema: &str, field: &str) -> String {
    let mut out = String::with_capacity(schema.len() + field.len() + 1);
    encode_component(schema, &mut out);
    out.push(',');
    encode_component(field, &mut out);
    out
}

/// Splits a qualified name back into its schema and field components.
/// Inverse of [`qualified_name`] for every input pair.
pub fn split_qualified(name: &str) -> Result<(String, String), SchemaError> {
    let chars: Vec<char> = name.chars().collect();
    let (schema, after_schema) = parse_component(name, &chars, 0)?;
    if after_schema >= chars.len() {
        return Err(SchemaError::MissingDelimiter {
            name: name.to_owned(),
        });
    }
    if chars[after_schema] != ',' {
        return Err(SchemaError::TrailingText {
            name: name.to_owned(),
        });
    }
    let (field, after_field) = parse_component(name, &chars, after_schema + 1)?;
    if after_field != chars.len() {
        return Err(SchemaError::TrailingText {
            name: name.to_owned(),
        });
    }
    Ok((schema, field))
}

fn encode_component(component: &str, out: &mut String) {
    let needs_quoting = component.contains(',') || component.starts_with('"');
    if !needs_quoting {
        out.push_str(component);
        return;
    }
    out.push('"');
    for ch in component.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Parses one component starting at `start`, returning it together with the
/// index of the first character after it (a delimiter or end of input).
fn parse_component(
    name: &str,
    chars: &[char],
    start: usize,
) -> Result<(String, usize), SchemaError> {
    if chars.get(start) != Some(&'"') {
        let end = chars[start..]
            .iter()
            .position(|&ch| ch == ',')
            .map_or(chars.len(), |offset| start + offset);
        return Ok((chars[start..end].iter().collect(), end));
    }

    let mut component = String::new();
    let mut pos = start + 1;
    while pos < chars.len() {
        if chars[pos] != '"' {
            component.push(chars[pos]);
            pos += 1;
            continue;
        }
        // A doubled quote is a literal quote; a lone quote closes.
        if chars.get(pos + 1) == Some(&'"') {
            component.push('"');
            pos += 2;
        } else {
            return Ok((component, pos + 1));
        }
    }
    Err(SchemaError::UnterminatedQuote {
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_components_pass_through() {
        assert_eq!(qualified_name("Holding", "Quantity"), "Holding,Quantity");
        let (schema, field) = split_qualified("Holding,Quantity").unwrap();
        assert_eq!((schema.as_str(), field.as_str()), ("Holding", "Quantity"));
    }

    #[test]
    fn test_component_with_delimiter_is_quoted() {
        let name = qualified_name("Order", "Filled, Remaining");
        assert_eq!(name, "Order,\"Filled, Remaining\"");
        let (schema, field) = split_qualified(&name).unwrap();
        assert_eq!(schema, "Order");
        assert_eq!(field, "Filled, Remaining");
    }

    #[test]
    fn test_leading_quote_is_quoted_and_doubled() {
        let name = qualified_name("\"Quoted\" Source", "Plain");
        assert_eq!(name, "\"\"\"Quoted\"\" Source\",Plain");
        let (schema, _) = split_qualified(&name).unwrap();
        assert_eq!(schema, "\"Quoted\" Source");
    }

    #[test]
    fn test_interior_quote_needs_no_quoting() {
        let name = qualified_name("Account", "Net \"Cleared\" Balance");
        assert_eq!(name, "Account,Net \"Cleared\" Balance");
        let (_, field) = split_qualified(&name).unwrap();
        assert_eq!(field, "Net \"Cleared\" Balance");
    }

    #[test]
    fn test_malformed_names_are_rejected() {
        assert!(matches!(
            split_qualified("NoDelimiter"),
            Err(SchemaError::MissingDelimiter { .. })
        ));
        assert!(matches!(
            split_qualified("\"Unterminated,Field"),
            Err(SchemaError::UnterminatedQuote { .. })
        ));
        assert!(matches!(
            split_qualified("\"Closed\"x,Field"),
            Err(SchemaError::TrailingText { .. })
        ));
        assert!(matches!(
            split_qualified("Schema,Field,Extra"),
            Err(SchemaError::TrailingText { .. })
        ));
    }

    #[test]
    fn test_empty_components_round_trip() {
        let name = qualified_name("", "");
        assert_eq!(name, ",");
        let (schema, field) = split_qualified(&name).unwrap();
        assert_eq!((schema.as_str(), field.as_str()), ("", ""));
    }

    proptest! {
        #[test]
        fn prop_round_trip_recovers_both_components(
            schema in ".*",
            field in ".*",
        ) {
            let name = qualified_name(&schema, &field);
            let (schema_back, field_back) = split_qualified(&name).unwrap();
            prop_assert_eq!(schema_back, schema);
            prop_assert_eq!(field_back, field);
        }
    }
}
