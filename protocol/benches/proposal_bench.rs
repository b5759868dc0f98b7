// Proposal-path benchmarks for the Meridian protocol.
//
// Covers signing-hash construction, proposal signing and verification, and
// pool candidate selection at a few pool sizes.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use meridian_protocol::consensus::LedgerProposal;
use meridian_protocol::crypto::sha512_half;
use meridian_protocol::ledger::LedgerDirectory;
use meridian_protocol::mempool::{TxPool, TxPoolConfig};
use meridian_protocol::transaction::Transaction;

const SEED: [u8; 32] = [3u8; 32];

fn bench_signing_hash(c: &mut Criterion) {
    let proposal = LedgerProposal::from_seed(&SEED, sha512_half(b"prev"), sha512_half(b"pos"));

    c.bench_function("proposal/signing_hash", |b| {
        b.iter(|| proposal.signing_hash());
    });
}

fn bench_sign(c: &mut Criterion) {
    let proposal = LedgerProposal::from_seed(&SEED, sha512_half(b"prev"), sha512_half(b"pos"));

    c.bench_function("proposal/sign", |b| {
        b.iter(|| proposal.sign().unwrap());
    });
}

fn bench_check_sign(c: &mut Criterion) {
    let proposal = LedgerProposal::from_seed(&SEED, sha512_half(b"prev"), sha512_half(b"pos"));
    let signature = proposal.sign().unwrap();

    c.bench_function("proposal/check_sign", |b| {
        b.iter(|| proposal.check_sign(&signature));
    });
}

fn bench_top_transactions(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/top_transactions");

    for pool_size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(pool_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(pool_size),
            &pool_size,
            |b, &size| {
                let pool = TxPool::new(
                    TxPoolConfig { capacity: size },
                    Arc::new(LedgerDirectory::new()),
                );
                for n in 0..size {
                    pool.insert_tx(Transaction::new(format!("tx-{n}").into_bytes()), 1)
                        .unwrap();
                }
                // Selection marks candidates avoided, so measure the scan
                // over a fully avoided pool — the worst case.
                pool.top_transactions(size);
                b.iter(|| pool.top_transactions(256));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_signing_hash,
    bench_sign,
    bench_check_sign,
    bench_top_transactions
);
criterion_main!(benches);
