mod docs;
mod provenance;
mod script;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use rbproof::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

use docs::{ClassDoc, DerivationsDoc, PathDoc, ProofDoc};
use provenance::{current_git_rev, write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Red-blue proof enumeration and equivalence runner")]
struct Cmd {
    /// Optional run label; propagated to outputs and logs
    #[arg(long, global = true)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Tabulate every graph reachable within `depth` merges (.csv or .parquet)
    Enumerate {
        #[arg(long, default_value_t = 3)]
        depth: usize,
        #[arg(long)]
        out: String,
    },
    /// Write every derivation of a graph as JSON
    Derive {
        /// Graph notation, e.g. "B(R(b,b),r,r)"
        #[arg(long)]
        term: String,
        #[arg(long, default_value_t = 3)]
        depth: usize,
        #[arg(long, default_value_t = 64)]
        limit: usize,
        #[arg(long)]
        out: String,
    },
    /// Write a commutation path between two derivations of a graph as JSON
    Path {
        #[arg(long)]
        term: String,
        #[arg(long, default_value_t = 3)]
        depth: usize,
        #[arg(long, default_value_t = 0)]
        from: usize,
        #[arg(long, default_value_t = 1)]
        to: usize,
        #[arg(long)]
        out: String,
    },
    /// Explore the equivalence class of a scripted proof
    Class {
        /// Steps, e.g. "unit[0]; unit[1]; merge[0] at (0, 0, 0, 0)"
        #[arg(long)]
        script: String,
        /// Hypothesis graph (repeatable)
        #[arg(long = "hyp")]
        hypotheses: Vec<String>,
        #[arg(long, default_value_t = 10_000)]
        limit: usize,
        /// JSON output; prints a summary only when absent
        #[arg(long)]
        out: Option<String>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let tag = cmd.tag.as_deref();
    match cmd.action {
        Action::Enumerate { depth, out } => enumerate(depth, &out, tag),
        Action::Derive {
            term,
            depth,
            limit,
            out,
        } => derive(&term, depth, limit, &out, tag),
        Action::Path {
            term,
            depth,
            from,
            to,
            out,
        } => path(&term, depth, from, to, &out, tag),
        Action::Class {
            script,
            hypotheses,
            limit,
            out,
        } => class(&script, &hypotheses, limit, out.as_deref(), tag),
        Action::Report => report(tag),
    }
}

fn ensure_parent(out: &str) -> Result<()> {
    if let Some(parent) = Path::new(out).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(out: &str, doc: &T) -> Result<()> {
    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(doc)?).with_context(|| format!("writing {out}"))
}

fn parse_term(term: &str) -> Result<Rbg> {
    term.parse()
        .with_context(|| format!("parsing graph notation {term:?}"))
}

fn enumerate(depth: usize, out: &str, tag: Option<&str>) -> Result<()> {
    tracing::info!(depth, out, tag = ?tag, "enumerate");
    let extension = Path::new(out).extension().and_then(|e| e.to_str());
    if !matches!(extension, Some("csv" | "parquet")) {
        bail!("unsupported output {out:?}: expected .csv or .parquet");
    }

    let enumeration = Proof::enumerate(depth);
    let mut depths: Vec<u32> = Vec::new();
    let mut terms: Vec<String> = Vec::new();
    let mut sizes: Vec<u64> = Vec::new();
    let mut children: Vec<u64> = Vec::new();
    let mut multiplicities: Vec<u64> = Vec::new();
    let mut productions: Vec<u64> = Vec::new();
    for (m, layer) in enumeration.reachable.iter().enumerate() {
        let mut rows: Vec<(&Rbg, &u128)> = layer.iter().collect();
        rows.sort_by_cached_key(|(term, _)| (term.size(), term.to_string()));
        for (term, &ways) in rows {
            depths.push(m as u32);
            terms.push(term.to_string());
            sizes.push(term.size() as u64);
            children.push(term.len() as u64);
            multiplicities.push(u64::try_from(ways).unwrap_or(u64::MAX));
            productions.push(enumeration.derivations_of(term).len() as u64);
        }
    }
    let mut df = df!(
        "depth" => depths,
        "term" => terms,
        "size" => sizes,
        "children" => children,
        "multiplicity" => multiplicities,
        "productions" => productions
    )?;
    tracing::info!(rows = df.height(), cols = df.width(), "reachability_table");

    ensure_parent(out)?;
    let mut file = File::create(out).with_context(|| format!("creating {out}"))?;
    if extension == Some("csv") {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("writing {out}"))?;
    } else {
        ParquetWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("writing {out}"))?;
    }
    write_sidecar(
        out,
        Payload::new(json!({
            "command": "enumerate",
            "depth": depth,
            "rows": df.height()
        }))
        .tagged(tag),
    )?;
    Ok(())
}

/// Index of the first proof each proof is equivalent to.
fn classify(proofs: &[Proof]) -> Vec<usize> {
    (0..proofs.len())
        .map(|i| {
            (0..i)
                .find(|&j| proofs[j].equivalent(&proofs[i]))
                .unwrap_or(i)
        })
        .collect()
}

fn derive(term: &str, depth: usize, limit: usize, out: &str, tag: Option<&str>) -> Result<()> {
    tracing::info!(term, depth, limit, out, tag = ?tag, "derive");
    let target = parse_term(term)?;
    let enumeration = Proof::enumerate(depth);
    let proofs: Vec<Proof> = Proof::derivations(&target, &enumeration)
        .take(limit)
        .collect();
    if proofs.is_empty() {
        tracing::warn!(term, depth, "no derivation within depth");
    }
    let classes = classify(&proofs);
    let doc = DerivationsDoc {
        term: target.to_string(),
        depth: enumeration.depth_of(&target),
        multiplicity: enumeration.multiplicity(&target),
        proofs: proofs.iter().map(ProofDoc::from).collect(),
        classes,
    };
    write_json(out, &doc)?;
    write_sidecar(
        out,
        Payload::new(json!({
            "command": "derive",
            "term": term,
            "depth": depth,
            "limit": limit,
            "proofs": doc.proofs.len()
        }))
        .tagged(tag),
    )?;
    Ok(())
}

fn path(
    term: &str,
    depth: usize,
    from: usize,
    to: usize,
    out: &str,
    tag: Option<&str>,
) -> Result<()> {
    tracing::info!(term, depth, from, to, out, tag = ?tag, "path");
    let target = parse_term(term)?;
    let enumeration = Proof::enumerate(depth);
    let proofs: Vec<Proof> = Proof::derivations(&target, &enumeration)
        .take(from.max(to) + 1)
        .collect();
    let (Some(start), Some(end)) = (proofs.get(from), proofs.get(to)) else {
        bail!(
            "{term} has {} derivations within depth {depth}; cannot pick {from} and {to}",
            proofs.len()
        );
    };
    let found = end.equivalence_path(start);
    match &found {
        Some(steps) => tracing::info!(length = steps.len(), "path found"),
        None => tracing::info!("derivations are not equivalent"),
    }
    let doc = PathDoc {
        term: target.to_string(),
        from,
        to,
        path: found.map(|p| p.iter().map(ProofDoc::from).collect()),
    };
    write_json(out, &doc)?;
    write_sidecar(
        out,
        Payload::new(json!({
            "command": "path",
            "term": term,
            "depth": depth,
            "from": from,
            "to": to,
            "length": doc.path.as_ref().map(Vec::len)
        }))
        .tagged(tag),
    )?;
    Ok(())
}

fn class(
    script: &str,
    hypotheses: &[String],
    limit: usize,
    out: Option<&str>,
    tag: Option<&str>,
) -> Result<()> {
    tracing::info!(script, limit, out = ?out, tag = ?tag, "class");
    let proof = script::build(hypotheses, script)?;
    let mut members = proof.equivalence_class();
    let collected: Vec<Proof> = members.by_ref().take(limit).collect();
    let truncated = members.next().is_some();
    let without_units = proof.remove_unit_intros();
    tracing::info!(size = collected.len(), truncated, "class explored");

    let Some(out) = out else {
        println!("{proof}");
        println!(
            "class size: {}{}",
            collected.len(),
            if truncated { " (truncated)" } else { "" }
        );
        println!("without unit introductions:\n{without_units}");
        return Ok(());
    };
    let doc = ClassDoc {
        proof: ProofDoc::from(&proof),
        size: collected.len(),
        truncated,
        members: collected.iter().map(ProofDoc::from).collect(),
        without_units: ProofDoc::from(&without_units),
    };
    write_json(out, &doc)?;
    write_sidecar(
        out,
        Payload::new(json!({
            "command": "class",
            "script": script,
            "hypotheses": hypotheses,
            "limit": limit,
            "size": doc.size
        }))
        .tagged(tag),
    )?;
    Ok(())
}

fn report(tag: Option<&str>) -> Result<()> {
    let obj = json!({
        "code_rev": current_git_rev(),
        "rbproof": rbproof::VERSION,
        "tag": tag,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn enumerate_writes_csv_with_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("reach.csv");
        let out = out.to_str().unwrap();
        enumerate(2, out, Some("t")).unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("depth,term,size,children,multiplicity,productions")
        );
        assert_eq!(lines.next(), Some("0,B(r),2,1,1,0"));
        assert_eq!(lines.count(), 1 + 15);
        let sidecar = read_json(&dir.path().join("nested").join("reach.provenance.json"));
        assert_eq!(sidecar["params"]["rows"], 17);
        assert_eq!(sidecar["tag"], "t");
    }

    #[test]
    fn enumerate_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reach.txt");
        assert!(enumerate(1, out.to_str().unwrap(), None).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn derive_gadget_json() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("gadget.json");
        derive("B(R(b,b),r,r)", 1, 8, out.to_str().unwrap(), None).unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["depth"], 1);
        assert_eq!(doc["multiplicity"], 1);
        assert_eq!(doc["classes"], json!([0]));
        let steps = doc["proofs"][0]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2]["kind"], "merge");
        assert_eq!(steps[2]["coords"], json!([0, 0, 0, 0]));
        assert!(steps[0].get("coords").is_none());
    }

    #[test]
    fn path_needs_two_derivations() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("path.json");
        let err = path("B(R(b,b),r,r)", 1, 0, 1, out.to_str().unwrap(), None).unwrap_err();
        assert!(err.to_string().contains("1 derivations"));
        assert!(derive("B(", 1, 1, out.to_str().unwrap(), None).is_err());
    }

    #[test]
    fn class_of_independent_units() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("class.json");
        class(
            "unit[0]; unit[0]; unit[0]",
            &[],
            100,
            Some(out.to_str().unwrap()),
            None,
        )
        .unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["size"], 6);
        assert_eq!(doc["truncated"], false);
        assert_eq!(doc["without_units"]["steps"], json!([]));

        class("unit[0]; unit[0]; unit[0]", &[], 4, Some(out.to_str().unwrap()), None).unwrap();
        let doc = read_json(&out);
        assert_eq!(doc["size"], 4);
        assert_eq!(doc["truncated"], true);
    }
}
