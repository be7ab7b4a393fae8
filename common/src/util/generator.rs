use crate::db::design::{Component, Design, PinRef};
use rand::Rng;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;

// Part prefixes with their terminal counts; Q is the transistor-like
// 3-pin case.
const PART_KINDS: [(&str, u8); 5] = [("R", 2), ("C", 2), ("L", 2), ("D", 2), ("Q", 3)];

/// Builds a random well-formed design: `num_components` parts and up to
/// `num_nets` connections between different parts, no terminal used twice.
pub fn build_random_design(
    rng: &mut impl Rng,
    num_components: usize,
    num_nets: usize,
) -> Design {
    let mut design = Design::new();
    for i in 0..num_components {
        let (prefix, terminals) = PART_KINDS[rng.gen_range(0..PART_KINDS.len())];
        design.add_component(Component::new(
            i as u32,
            format!("{}{}", prefix, i + 1),
            terminals,
        ));
    }

    if num_components < 2 {
        return design;
    }

    let mut added = 0;
    let mut attempts = 0;
    let mut used: HashSet<PinRef> = HashSet::new();
    // Each terminal belongs to at most one net, so draws on an already
    // wired pin are discarded until the budget runs out.
    while added < num_nets && attempts < num_nets * 20 {
        attempts += 1;
        let ai = rng.gen_range(0..num_components);
        let bi = rng.gen_range(0..num_components);
        if ai == bi {
            continue;
        }
        let a = PinRef::new(
            design.components[ai].id,
            rng.gen_range(0..design.components[ai].terminals),
        );
        let b = PinRef::new(
            design.components[bi].id,
            rng.gen_range(0..design.components[bi].terminals),
        );
        if used.contains(&a) || used.contains(&b) {
            continue;
        }
        design.add_connection(a, b);
        used.insert(a);
        used.insert(b);
        added += 1;
    }
    design
}

/// Writes a random benchmark design as a JSON document.
pub fn generate_random_design(
    filename: &str,
    num_components: usize,
    num_nets: usize,
) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let design = build_random_design(&mut rng, num_components, num_nets);

    log::info!(
        "Generating Benchmark: {} components, {} nets requested ({} distinct)",
        num_components,
        num_nets,
        design.net_list().len()
    );

    let file = File::create(filename)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &design)?;
    Ok(())
}
