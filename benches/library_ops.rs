//! Library operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mulligan_tool::decklist::parse_plain_text;
use mulligan_tool::{Card, DeckRng, Library, OPENING_HAND_SIZE};

fn commander_library() -> Library {
    Library::new(
        "Bench",
        None,
        (0..99).map(|i| Card::new(format!("Card {i}")).with_id(format!("c{i}"))),
    )
}

fn bench_library(c: &mut Criterion) {
    let library = commander_library();
    let counts = library.name_counts();

    c.bench_function("shuffle_99", |b| {
        let mut rng = DeckRng::new(1);
        b.iter(|| black_box(library.shuffled(&mut rng)))
    });

    c.bench_function("opening_hand_99", |b| {
        let mut rng = DeckRng::new(2);
        b.iter(|| black_box(library.draw_opening_hand(OPENING_HAND_SIZE, &mut rng)))
    });

    c.bench_function("opening_hand_checked_99", |b| {
        let mut rng = DeckRng::new(3);
        b.iter(|| black_box(library.draw_opening_hand_checked(OPENING_HAND_SIZE, &counts, &mut rng)))
    });

    c.bench_function("draw_random_99", |b| {
        let mut rng = DeckRng::new(4);
        b.iter(|| black_box(library.draw_random(&mut rng)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut text: String = (0..99).map(|i| format!("1 Card {i}\n")).collect();
    text.push_str("\nSIDEBOARD:\n1 Spare\n\n1 Tymna the Weaver\n");

    c.bench_function("parse_plain_text_100", |b| b.iter(|| black_box(parse_plain_text(black_box(&text)))));
}

criterion_group!(benches, bench_library, bench_parse);
criterion_main!(benches);
