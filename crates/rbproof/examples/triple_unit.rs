//! Derive the triple unit and compare its derivations.
//!
//! Usage:
//!   cargo run -p rbproof --example triple_unit -- [depth]
//!
//! Enumerates reachable graphs up to `depth` merges (default 3), prints every
//! derivation of the triple unit, then an equivalence path between the first two.

use rbproof::prelude::*;

fn main() {
    let depth = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3usize);
    let triple: Rbg = "B(R(B(R(b,b),r),b),r,R(b,B(r,r)))".parse().unwrap();

    let enumeration = Proof::enumerate(depth);
    for (m, layer) in enumeration.reachable.iter().enumerate() {
        println!("depth {m}: {} graphs", layer.len());
    }
    let proofs: Vec<Proof> = Proof::derivations(&triple, &enumeration).collect();
    println!("{} derivations of {triple}", proofs.len());
    for (idx, proof) in proofs.iter().enumerate() {
        println!("--- derivation {idx}\n{proof}");
    }
    if let [a, b, ..] = proofs.as_slice() {
        match a.equivalence_path(b) {
            Some(path) => {
                println!("equivalent, path of {} proofs", path.len());
                for proof in path {
                    let steps: Vec<String> = proof.steps().iter().map(|s| s.to_string()).collect();
                    println!("  {}", steps.join("; "));
                }
            }
            None => println!("not equivalent"),
        }
        let (sa, sb) = (a.remove_unit_intros(), b.remove_unit_intros());
        println!("without unit intros:\n{sa}\n{sb}");
    }
}
