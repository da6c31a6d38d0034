//! Step scripts: a proof written as `unit[0]; unit[1]; merge[0] at (0, 0, 0, 0)`.
//!
//! Steps are separated by `;` or newlines and use the same notation proofs print
//! with. `merge[p]` without coordinates merges at `(0, 0, 0, 0)`.

use anyhow::{bail, Context, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, one_of, space0},
    combinator::{all_consuming, map, map_res, opt},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use rbproof::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    Unit(usize),
    Merge(usize, MergeCoords),
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(space0, inner, space0)
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

/// `[p]`
fn index(input: &str) -> IResult<&str, usize> {
    delimited(pair(space0, char('[')), ws(number), char(']'))(input)
}

/// `at (i, j, k, l)`
fn coords(input: &str) -> IResult<&str, MergeCoords> {
    map(
        preceded(
            tuple((space0, tag("at"), space0)),
            delimited(
                char('('),
                tuple((
                    ws(number),
                    preceded(char(','), ws(number)),
                    preceded(char(','), ws(number)),
                    preceded(char(','), ws(number)),
                )),
                char(')'),
            ),
        ),
        |(i, j, k, l)| MergeCoords::new(i, j, k, l),
    )(input)
}

fn step(input: &str) -> IResult<&str, ScriptStep> {
    alt((
        map(preceded(tag("unit"), index), ScriptStep::Unit),
        map(
            pair(preceded(tag("merge"), index), opt(coords)),
            |(position, coords)| ScriptStep::Merge(position, coords.unwrap_or_default()),
        ),
    ))(input)
}

/// Steps separated by `;` or newlines; empty entries are skipped.
fn steps(input: &str) -> IResult<&str, Vec<Option<ScriptStep>>> {
    all_consuming(separated_list0(one_of(";\n"), ws(opt(step))))(input)
}

pub fn parse(script: &str) -> Result<Vec<ScriptStep>> {
    match steps(script) {
        Ok((_, parsed)) => Ok(parsed.into_iter().flatten().collect()),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
            let offset = script.len() - err.input.len();
            let entry = err.input.lines().next().unwrap_or_default();
            bail!("cannot parse step {entry:?} at offset {offset}")
        }
        Err(nom::Err::Incomplete(_)) => bail!("incomplete step script"),
    }
}

/// Build the proof a script describes over `hypotheses`, checking every step.
pub fn build(hypotheses: &[String], script: &str) -> Result<Proof> {
    let hypotheses = hypotheses
        .iter()
        .map(|h| h.parse::<Rbg>().with_context(|| format!("hypothesis {h:?}")))
        .collect::<Result<Vec<_>>>()?;
    let mut proof = Proof::new(hypotheses);
    for (idx, step) in parse(script)?.into_iter().enumerate() {
        let applied = match step {
            ScriptStep::Unit(position) => proof.try_unit(position),
            ScriptStep::Merge(position, coords) => proof.try_merge(position, coords),
        };
        applied.with_context(|| format!("step {idx}"))?;
    }
    Ok(proof)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_printed_steps() {
        let steps = parse("unit[0]; unit[1]\nmerge[0] at (0, 2, 1, 0); merge[3]").unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Unit(0),
                ScriptStep::Unit(1),
                ScriptStep::Merge(0, MergeCoords::new(0, 2, 1, 0)),
                ScriptStep::Merge(3, MergeCoords::default()),
            ]
        );
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_steps() {
        assert!(parse("unit 0").is_err());
        assert!(parse("merge[0] at (0, 0, 0)").is_err());
        assert!(parse("swap[1]").is_err());
        assert!(parse("unit[0] extra").is_err());
        assert!(parse("unit[99999999999999999999]").is_err());
        let err = parse("unit[0]; swap[1]").unwrap_err();
        assert!(err.to_string().contains("offset 9"));
    }

    #[test]
    fn parses_spacing_and_empty_entries() {
        let steps = parse("  unit [ 2 ] ;;\n merge[1]at(1,0 ,0, 3) ;").unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Unit(2),
                ScriptStep::Merge(1, MergeCoords::new(1, 0, 0, 3)),
            ]
        );
    }

    #[test]
    fn builds_and_round_trips_display() {
        let proof = build(&[], "unit[0]; unit[1]; merge[0] at (0, 0, 0, 0)").unwrap();
        assert_eq!(proof.conclusion()[0].to_string(), "B(R(b,b),r,r)");
        let script: Vec<String> = proof.steps().iter().map(|s| s.to_string()).collect();
        assert_eq!(build(&[], &script.join("; ")).unwrap(), proof);
    }

    #[test]
    fn build_reports_bad_steps() {
        let err = build(&["B(r)".to_string()], "merge[0]").unwrap_err();
        assert!(format!("{err:#}").contains("step 0"));
        assert!(build(&["B(b)".to_string()], "").is_err());
    }

    #[test]
    fn build_rejects_largest_merge_position() {
        let script = format!("unit[0]; merge[{}]", usize::MAX);
        assert_eq!(
            parse(&script).unwrap()[1],
            ScriptStep::Merge(usize::MAX, MergeCoords::default())
        );
        let err = build(&[], &script).unwrap_err();
        assert!(format!("{err:#}").contains("step 1"));
    }
}
