//! # Peerchain Benchmarks
//!
//! | Area | Operation | Expectation |
//! |------|-----------|-------------|
//! | pc-02 Chain Storage | append one block | constant in chain length |
//! | pc-02 Chain Storage | `contains_value` | linear walk from the head |
//! | pc-03 Gossip | rumor store + status vector | constant per rumor |
//! | pc-03 Gossip | status comparison | linear in known origins |
//! | shared-types | packet encode/decode | linear in payload |

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pc_02_chain_storage::{ChainStorageService, ChainStore, InMemoryKVStore};
use pc_03_gossip::{compare_status, RumorStore, SharedRumorStore};
use shared_types::codec::{decode_packet, encode_packet};
use shared_types::{
    Header, Message, Packet, PaxosAcceptMessage, PaxosValue, Rumor, RumorsMessage, StatusVector,
};

fn chain_of(length: u64) -> ChainStorageService<InMemoryKVStore> {
    let chain = ChainStorageService::new(InMemoryKVStore::new());
    for i in 0..length {
        let block = chain
            .mint_block(PaxosValue::with_id(format!("id-{}", i), format!("f{}", i), "m"))
            .unwrap();
        chain.add_block(block).unwrap();
    }
    chain
}

// ============================================================================
// PC-02: Chain Storage
// ============================================================================

fn bench_chain_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-02-chain-append");

    for length in [0u64, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("append_at", length), &length, |b, &len| {
            b.iter_batched(
                || chain_of(len),
                |chain| {
                    let block = chain.mint_block(PaxosValue::new("next", "m")).unwrap();
                    chain.add_block(black_box(block)).unwrap();
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_chain_contains_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-02-chain-contains-value");
    group.measurement_time(Duration::from_secs(5));

    for length in [10u64, 100, 1_000] {
        let chain = chain_of(length);
        group.throughput(Throughput::Elements(length));
        group.bench_with_input(BenchmarkId::new("genesis_lookup", length), &chain, |b, chain| {
            b.iter(|| black_box(chain.contains_value("id-0").unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("miss", length), &chain, |b, chain| {
            b.iter(|| black_box(chain.contains_value("absent").unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// PC-03: Gossip
// ============================================================================

fn bench_rumor_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-03-rumor-store");

    for origins in [1usize, 16, 128] {
        let per_origin = 1_000 / origins as u64;
        group.throughput(Throughput::Elements(per_origin * origins as u64));
        group.bench_with_input(BenchmarkId::new("store", origins), &origins, |b, &origins| {
            b.iter(|| {
                let store = SharedRumorStore::new();
                for seq in 1..=per_origin {
                    for o in 0..origins {
                        store
                            .store(Rumor {
                                origin: format!("n{}", o),
                                sequence: seq,
                                msg: Message::empty(),
                            })
                            .unwrap();
                    }
                }
                black_box(store.status_vector())
            })
        });
    }

    group.finish();
}

fn bench_status_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-03-status-comparison");

    for origins in [4usize, 64, 512] {
        let local: StatusVector = (0..origins).map(|o| (format!("n{}", o), 10)).collect();
        let mut remote = local.clone();
        let last = format!("n{}", origins - 1);
        remote.insert(last, 11);

        group.bench_with_input(
            BenchmarkId::new("last_origin_differs", origins),
            &(local, remote),
            |b, (local, remote)| b.iter(|| black_box(compare_status(local, remote))),
        );
    }

    group.finish();
}

// ============================================================================
// Wire codec
// ============================================================================

fn rumors_packet(count: usize) -> Packet {
    let rumors = (0..count)
        .map(|i| Rumor {
            origin: "n0".into(),
            sequence: i as u64 + 1,
            msg: Message::PaxosAccept(PaxosAcceptMessage {
                step: i as u64,
                id: 3,
                value: PaxosValue::with_id(format!("id-{}", i), "file.txt", "abcdef"),
            }),
        })
        .collect();
    Packet::new(
        Header::new("n0", "n0", "n1"),
        Message::Rumors(RumorsMessage { rumors }),
    )
}

fn bench_packet_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types-codec");

    for count in [1usize, 10, 100] {
        let packet = rumors_packet(count);
        let bytes = encode_packet(&packet).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", count), &packet, |b, packet| {
            b.iter(|| black_box(encode_packet(packet).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &bytes, |b, bytes| {
            b.iter(|| black_box(decode_packet(bytes).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chain_append,
    bench_chain_contains_value,
    bench_rumor_store,
    bench_status_comparison,
    bench_packet_codec,
);
criterion_main!(benches);
