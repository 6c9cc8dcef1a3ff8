//! Parsers for the string-embedded micro-grammars.
//!
//! Several GFL fields embed tiny expressions inside plain strings:
//!
//! - `range(40, 65)` — a numeric search-space interval
//! - `choice([a, b, c])` — an enumerated search space
//! - `${geometry}` — a parameter injected at execution time
//! - `pathway(UreaCycle)` — a reference to a declared entity
//!
//! Each grammar has exactly one parser here returning a typed value.
//! Parsers are total over their input: trailing garbage fails the parse,
//! and callers treat a failed parse as "not this micro-grammar".

use winnow::ascii::{float, multispace0};
use winnow::combinator::{alt, delimited, preceded, separated, separated_pair};
use winnow::token::{one_of, take_while};
use winnow::{ModalResult, Parser};

/// A parsed `range(min, max)` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// A parsed `choice([...])` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub values: Vec<String>,
}

/// A parsed `${name}` parameter injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub name: String,
}

/// A parsed `kind(name)` entity reference.
///
/// The kind is syntactically any identifier; the entity registry decides
/// which kinds are meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: String,
    pub name: String,
}

/// Parse a `range(min, max)` expression.
///
/// Bound ordering is not checked here; the caller validates `min < max`
/// so its diagnostic can name the offending field.
pub fn range(input: &str) -> Option<Range> {
    range_expr.parse(input.trim()).ok()
}

/// Parse a `choice([...])` expression.
///
/// Emptiness is not checked here; the caller validates non-emptiness.
pub fn choice(input: &str) -> Option<Choice> {
    choice_expr.parse(input.trim()).ok()
}

/// Parse a `${name}` injection token.
pub fn injection(input: &str) -> Option<Injection> {
    injection_expr.parse(input.trim()).ok()
}

/// Whether a string is shaped like an injection attempt (`${...}`),
/// even if the inner name is not a valid identifier.
///
/// Used to distinguish "malformed injection" from "ordinary string".
pub fn looks_like_injection(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.starts_with("${") && trimmed.ends_with('}')
}

/// Parse a `kind(name)` entity reference.
pub fn entity_ref(input: &str) -> Option<EntityRef> {
    entity_ref_expr.parse(input.trim()).ok()
}

fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn range_expr(input: &mut &str) -> ModalResult<Range> {
    let (min, max) = preceded(
        ("range", multispace0),
        delimited(
            ('(', multispace0),
            separated_pair(float, (multispace0, ',', multispace0), float),
            (multispace0, ')'),
        ),
    )
    .parse_next(input)?;
    Ok(Range { min, max })
}

fn choice_item(input: &mut &str) -> ModalResult<String> {
    alt((
        delimited('"', take_while(0.., |c: char| c != '"'), '"').map(str::to_owned),
        delimited('\'', take_while(0.., |c: char| c != '\''), '\'').map(str::to_owned),
        take_while(1.., |c: char| {
            !matches!(c, ',' | '[' | ']' | '(' | ')') && !c.is_whitespace()
        })
        .map(str::to_owned),
    ))
    .parse_next(input)
}

fn choice_expr(input: &mut &str) -> ModalResult<Choice> {
    let values: Vec<String> = preceded(
        ("choice", multispace0),
        delimited(
            ('(', multispace0, '[', multispace0),
            separated(0.., choice_item, (multispace0, ',', multispace0)),
            (multispace0, ']', multispace0, ')'),
        ),
    )
    .parse_next(input)?;
    Ok(Choice { values })
}

fn injection_expr(input: &mut &str) -> ModalResult<Injection> {
    let name = preceded(
        '$',
        delimited(('{', multispace0), identifier, (multispace0, '}')),
    )
    .parse_next(input)?;
    Ok(Injection {
        name: name.to_owned(),
    })
}

fn entity_ref_expr(input: &mut &str) -> ModalResult<EntityRef> {
    let (kind, name) = (
        identifier,
        delimited(('(', multispace0), identifier, (multispace0, ')')),
    )
        .parse_next(input)?;
    Ok(EntityRef {
        kind: kind.to_owned(),
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_basic() {
        assert_eq!(range("range(40, 65)"), Some(Range { min: 40.0, max: 65.0 }));
        assert_eq!(range("range(0.1,0.9)"), Some(Range { min: 0.1, max: 0.9 }));
        assert_eq!(range("range( -5 , 5 )"), Some(Range { min: -5.0, max: 5.0 }));
    }

    #[test]
    fn test_range_does_not_check_ordering() {
        // Ordering is the caller's rule, not the grammar's.
        assert_eq!(range("range(65, 40)"), Some(Range { min: 65.0, max: 40.0 }));
    }

    #[test]
    fn test_range_rejects_garbage() {
        assert_eq!(range("range(40)"), None);
        assert_eq!(range("range(a, b)"), None);
        assert_eq!(range("range(40, 65) extra"), None);
        assert_eq!(range("rang(40, 65)"), None);
    }

    #[test]
    fn test_choice_basic() {
        assert_eq!(
            choice("choice([sgRNA_v1, sgRNA_v2])"),
            Some(Choice {
                values: vec!["sgRNA_v1".to_owned(), "sgRNA_v2".to_owned()]
            })
        );
        assert_eq!(
            choice("choice(['a', \"b\"])"),
            Some(Choice {
                values: vec!["a".to_owned(), "b".to_owned()]
            })
        );
    }

    #[test]
    fn test_choice_empty_parses() {
        // Non-emptiness is the caller's rule.
        assert_eq!(choice("choice([])"), Some(Choice { values: vec![] }));
    }

    #[test]
    fn test_choice_rejects_garbage() {
        assert_eq!(choice("choice(a, b)"), None);
        assert_eq!(choice("choice([a, b]) trailing"), None);
    }

    #[test]
    fn test_injection() {
        assert_eq!(
            injection("${geometry}"),
            Some(Injection {
                name: "geometry".to_owned()
            })
        );
        assert_eq!(injection("${_temp2}").map(|i| i.name), Some("_temp2".to_owned()));
        assert_eq!(injection("${2bad}"), None);
        assert_eq!(injection("${a b}"), None);
        assert_eq!(injection("$geometry"), None);
    }

    #[test]
    fn test_looks_like_injection() {
        assert!(looks_like_injection("${geometry}"));
        assert!(looks_like_injection("${2bad}"));
        assert!(!looks_like_injection("pathway(UreaCycle)"));
        assert!(!looks_like_injection("plain string"));
    }

    #[test]
    fn test_entity_ref() {
        assert_eq!(
            entity_ref("pathway(UreaCycle)"),
            Some(EntityRef {
                kind: "pathway".to_owned(),
                name: "UreaCycle".to_owned()
            })
        );
        assert_eq!(
            entity_ref("complex( RNA_Pol_II )").map(|r| r.name),
            Some("RNA_Pol_II".to_owned())
        );
        // Any identifier kind parses; the registry rejects unknown kinds.
        assert!(entity_ref("organelle(Mitochondrion)").is_some());
    }

    #[test]
    fn test_entity_ref_rejects_garbage() {
        assert_eq!(entity_ref("pathway()"), None);
        assert_eq!(entity_ref("pathway(Urea Cycle)"), None);
        assert_eq!(entity_ref("(UreaCycle)"), None);
        assert_eq!(entity_ref("pathway(UreaCycle) tail"), None);
        assert_eq!(entity_ref("${geometry}"), None);
    }
}
