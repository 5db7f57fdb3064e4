use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use light_taproot_mast::{create_tapscript_control, TaprootScriptTree};
use light_taproot_primitives::Script;
use light_taproot_schnorr::{Privkey, SchnorrPubkey};

fn leaf_scripts(n: u8) -> Vec<Script> {
    (0..n)
        .map(|i| {
            let mut bytes = vec![0x20];
            bytes.extend_from_slice(&[i; 32]);
            bytes.push(0xac);
            Script::new(bytes)
        })
        .collect()
}

fn build_tree(scripts: &[Script]) -> TaprootScriptTree {
    let mut tree = TaprootScriptTree::from_script(scripts[0].clone());
    for script in &scripts[1..] {
        tree.add_branch(TaprootScriptTree::from_script(script.clone()))
            .unwrap();
    }
    tree
}

fn bench_build_tree(b: &mut Bencher) {
    let scripts = leaf_scripts(64);
    b.iter(|| build_tree(&scripts).current_branch_hash());
}

fn bench_tree_from_string(b: &mut Bencher) {
    let scripts = leaf_scripts(64);
    let text = build_tree(&scripts).to_string();
    let target = scripts[63].clone();
    b.iter(|| TaprootScriptTree::from_string(&text, &target, &[]).unwrap());
}

fn bench_tapscript_control(b: &mut Bencher) {
    let key = Privkey::from_hex("305e293b010d29bf3c888b617763a438fee9054c8cab66eb12ad078f819d9f27")
        .unwrap();
    let (internal_pubkey, _) = SchnorrPubkey::from_privkey(&key);
    let tree = build_tree(&leaf_scripts(16));
    b.iter(|| create_tapscript_control(&internal_pubkey, tree.as_branch()).unwrap());
}

fn bench_taptree(c: &mut Criterion) {
    c.bench_function("bench_build_tree", bench_build_tree);

    c.bench_function("bench_tree_from_string", bench_tree_from_string);

    c.bench_function("bench_tapscript_control", bench_tapscript_control);
}

criterion_group!(benches, bench_taptree);
criterion_main!(benches);
