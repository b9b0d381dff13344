//! Plural category selection for compact notation.
//!
//! Rule sets use the CLDR mini-language: `one: i = 1 and v = 0; few: n % 10
//! = 2..4` and so on, evaluated against the operands of the number being
//! formatted. Selection is first-match; anything unmatched falls back to
//! `other`.

use std::fmt;

use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, opt, preceded, separated};
use winnow::error::ErrMode;
use winnow::token::literal;
use winnow::{ModalResult, Parser};

/// A plural category keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralTag {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralTag::Zero => "zero",
            PluralTag::One => "one",
            PluralTag::Two => "two",
            PluralTag::Few => "few",
            PluralTag::Many => "many",
            PluralTag::Other => "other",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<PluralTag> {
        Some(match keyword {
            "zero" => PluralTag::Zero,
            "one" => PluralTag::One,
            "two" => PluralTag::Two,
            "few" => PluralTag::Few,
            "many" => PluralTag::Many,
            "other" => PluralTag::Other,
            _ => return None,
        })
    }
}

impl fmt::Display for PluralTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric facts a rule can test, derived from the formatted rendering
/// rather than the raw value so `1.0` and `1` can differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluralOperands {
    /// Absolute value.
    pub n: f64,
    /// Integer part.
    pub i: u64,
    /// Count of visible fraction digits, with trailing zeros.
    pub v: u32,
    /// Count of visible fraction digits, without trailing zeros.
    pub w: u32,
    /// Visible fraction digits as an integer, with trailing zeros.
    pub f: u64,
    /// Visible fraction digits as an integer, without trailing zeros.
    pub t: u64,
    /// Compact decimal exponent.
    pub e: i32,
}

impl PluralOperands {
    /// Build operands for a value shown with `fraction_digits` places.
    pub fn from_value(value: f64, fraction_digits: u32) -> PluralOperands {
        let n = value.abs();
        let i = if n.is_finite() && n < u64::MAX as f64 {
            n.trunc() as u64
        } else {
            0
        };
        let scale = 10f64.powi(fraction_digits.min(18) as i32);
        let f = ((n - n.trunc()) * scale).round() as u64;
        let mut t = f;
        let mut w = fraction_digits;
        while w > 0 && t % 10 == 0 {
            t /= 10;
            w -= 1;
        }
        PluralOperands {
            n,
            i,
            v: fraction_digits,
            w,
            f,
            t,
            e: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    N,
    I,
    F,
    T,
    V,
    W,
    E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprOp {
    Mod,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
struct Expr {
    operand: Operand,
    op: Option<(ExprOp, u64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueRange {
    low: u64,
    high: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct Relation {
    expr: Expr,
    negated: bool,
    ranges: Vec<ValueRange>,
}

/// Disjunctive normal form: `or` over the outer list, `and` within.
#[derive(Debug, Clone, PartialEq)]
struct Condition(Vec<Vec<Relation>>);

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    tag: PluralTag,
    condition: Condition,
}

/// A compiled rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct PluralRules {
    rules: Vec<Rule>,
}

/// Rejection of a rule-set string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRuleError;

impl fmt::Display for PluralRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed plural rule set")
    }
}

impl std::error::Error for PluralRuleError {}

fn parse_integer(input: &mut &str) -> ModalResult<u64> {
    digit1
        .try_map(str::parse)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

fn parse_range(input: &mut &str) -> ModalResult<ValueRange> {
    (parse_integer, opt(preceded("..", parse_integer)))
        .map(|(low, high)| ValueRange {
            low,
            high: high.unwrap_or(low),
        })
        .parse_next(input)
}

fn parse_operand(input: &mut &str) -> ModalResult<Operand> {
    alt((
        literal("n").value(Operand::N),
        literal("i").value(Operand::I),
        literal("f").value(Operand::F),
        literal("t").value(Operand::T),
        literal("v").value(Operand::V),
        literal("w").value(Operand::W),
        literal("e").value(Operand::E),
    ))
    .parse_next(input)
    .map_err(ErrMode::Backtrack)
}

fn parse_expr(input: &mut &str) -> ModalResult<Expr> {
    (
        parse_operand,
        opt((
            preceded(
                space0,
                alt((
                    literal("%").value(ExprOp::Mod),
                    literal("mod").value(ExprOp::Mod),
                    literal("/").value(ExprOp::Div),
                )),
            ),
            preceded(space0, parse_integer),
        )),
    )
        .map(|(operand, op)| Expr { operand, op })
        .parse_next(input)
}

fn parse_relation(input: &mut &str) -> ModalResult<Relation> {
    (
        parse_expr,
        preceded(space0, alt((literal("!=").value(true), literal("=").value(false)))),
        preceded(
            space0,
            separated(1.., parse_range, (space0, ',', space0)),
        ),
    )
        .map(|(expr, negated, ranges)| Relation {
            expr,
            negated,
            ranges,
        })
        .parse_next(input)
}

fn parse_and_condition(input: &mut &str) -> ModalResult<Vec<Relation>> {
    separated(1.., parse_relation, (space0, "and", space0)).parse_next(input)
}

fn parse_condition(input: &mut &str) -> ModalResult<Condition> {
    separated(1.., parse_and_condition, (space0, "or", space0))
        .map(Condition)
        .parse_next(input)
}

impl PluralRules {
    /// Compile a rule-set string. An empty string yields a set where
    /// everything selects `other`.
    pub fn parse(source: &str) -> Result<PluralRules, PluralRuleError> {
        let mut rules = Vec::new();
        for clause in source.split(';') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            let (keyword, condition) = clause.split_once(':').ok_or(PluralRuleError)?;
            let tag = PluralTag::from_keyword(keyword.trim()).ok_or(PluralRuleError)?;
            let condition = condition.trim();
            let condition = if condition.is_empty() {
                // A bare tag matches unconditionally.
                Condition(Vec::new())
            } else {
                let mut input = condition;
                let parsed = parse_condition(&mut input).map_err(|_| PluralRuleError)?;
                if !input.trim().is_empty() {
                    return Err(PluralRuleError);
                }
                parsed
            };
            rules.push(Rule { tag, condition });
        }
        Ok(PluralRules { rules })
    }

    /// Pick the first matching category; `other` when nothing matches.
    pub fn select(&self, operands: &PluralOperands) -> PluralTag {
        self.rules
            .iter()
            .find(|rule| eval_condition(&rule.condition, operands))
            .map(|rule| rule.tag)
            .unwrap_or(PluralTag::Other)
    }
}

fn eval_condition(condition: &Condition, operands: &PluralOperands) -> bool {
    if condition.0.is_empty() {
        return true;
    }
    condition
        .0
        .iter()
        .any(|clause| clause.iter().all(|rel| eval_relation(rel, operands)))
}

fn eval_relation(relation: &Relation, operands: &PluralOperands) -> bool {
    let mut value = match relation.expr.operand {
        Operand::N => operands.n,
        Operand::I => operands.i as f64,
        Operand::F => operands.f as f64,
        Operand::T => operands.t as f64,
        Operand::V => f64::from(operands.v),
        Operand::W => f64::from(operands.w),
        Operand::E => f64::from(operands.e),
    };
    match relation.expr.op {
        Some((ExprOp::Mod, m)) => value %= m as f64,
        // Division is integral.
        Some((ExprOp::Div, d)) => value = (value / d as f64).trunc(),
        None => {}
    }
    let matched = relation.ranges.iter().any(|range| {
        if range.low == range.high {
            value == range.low as f64
        } else {
            // Ranges only admit integers.
            value.fract() == 0.0 && value >= range.low as f64 && value <= range.high as f64
        }
    });
    matched != relation.negated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands(value: f64, fraction_digits: u32) -> PluralOperands {
        PluralOperands::from_value(value, fraction_digits)
    }

    #[test]
    fn english_cardinals() {
        let rules = PluralRules::parse("one: i = 1 and v = 0").unwrap();
        assert_eq!(rules.select(&operands(1.0, 0)), PluralTag::One);
        assert_eq!(rules.select(&operands(1.0, 1)), PluralTag::Other);
        assert_eq!(rules.select(&operands(2.0, 0)), PluralTag::Other);
    }

    #[test]
    fn modulus_and_ranges() {
        let rules = PluralRules::parse(
            "few: n % 10 = 2..4 and n % 100 != 12..14; many: n % 10 = 0 or n % 10 = 5..9",
        )
        .unwrap();
        assert_eq!(rules.select(&operands(3.0, 0)), PluralTag::Few);
        assert_eq!(rules.select(&operands(13.0, 0)), PluralTag::Other);
        assert_eq!(rules.select(&operands(25.0, 0)), PluralTag::Many);
        assert_eq!(rules.select(&operands(10.0, 0)), PluralTag::Many);
    }

    #[test]
    fn division_scales_the_operand() {
        let rules = PluralRules::parse("few: n / 10 = 2..4; one: n / 1000 = 1").unwrap();
        assert_eq!(rules.select(&operands(35.0, 0)), PluralTag::Few);
        assert_eq!(rules.select(&operands(1234.0, 0)), PluralTag::One);
        assert_eq!(rules.select(&operands(7.0, 0)), PluralTag::Other);
    }

    #[test]
    fn fraction_operands() {
        let ops = operands(1.30, 2);
        assert_eq!(ops.v, 2);
        assert_eq!(ops.f, 30);
        assert_eq!(ops.t, 3);
        assert_eq!(ops.w, 1);
    }

    #[test]
    fn malformed_rules_are_rejected() {
        assert!(PluralRules::parse("one i = 1").is_err());
        assert!(PluralRules::parse("some: n = 1").is_err());
        assert!(PluralRules::parse("one: q = 1").is_err());
    }

    #[test]
    fn bare_tag_matches_everything() {
        let rules = PluralRules::parse("many:").unwrap();
        assert_eq!(rules.select(&operands(7.0, 0)), PluralTag::Many);
    }
}
