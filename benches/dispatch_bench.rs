// ABOUTME: Benchmark suite for the protocol layer
// ABOUTME: Measures frame encode/parse, registry decode, and full dispatch round trips

use bytes::BytesMut;
use cmdgate::packets::{CurrencyBalance, InviteFightAck, QueryCurrency, Request, Response};
use cmdgate::{
    CommandRegistry, Dispatcher, Encodable, Frame, GameCommand, SessionContext,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::io::Cursor;
use std::sync::Arc;

fn query_frame() -> Frame {
    Frame::new(
        GameCommand::QueryCurrency,
        QueryCurrency { currency: 1 }.to_payload(),
    )
}

fn bench_frame_encode(c: &mut Criterion) {
    let frame = query_frame();
    c.bench_function("frame_encode", |b| {
        b.iter(|| {
            let mut buf = BytesMut::with_capacity(frame.encoded_len());
            black_box(&frame).encode(&mut buf);
            black_box(buf)
        })
    });
}

fn bench_frame_parse(c: &mut Criterion) {
    let bytes = query_frame().to_bytes();
    c.bench_function("frame_parse", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(bytes.as_ref()));
            Frame::parse(&mut cursor).unwrap()
        })
    });
}

fn bench_registry_decode(c: &mut Criterion) {
    let registry = CommandRegistry::standard().unwrap();
    let payload = QueryCurrency { currency: 1 }.to_payload();
    let entry = registry.lookup(GameCommand::QueryCurrency.into()).unwrap();
    c.bench_function("registry_decode", |b| {
        b.iter(|| entry.decode(black_box(&payload)).unwrap())
    });
}

fn bench_dispatch_round_trip(c: &mut Criterion) {
    let registry = Arc::new(CommandRegistry::standard().unwrap());
    let dispatcher = Dispatcher::builder(registry)
        .handle(GameCommand::InviteFight, |_request, _ctx| async move {
            Ok(Some(Response::InviteFightAck(InviteFightAck)))
        })
        .unwrap()
        .handle(GameCommand::QueryCurrency, |request, _ctx| async move {
            match request {
                Request::QueryCurrency(query) => {
                    Ok(Some(Response::CurrencyBalance(CurrencyBalance {
                        currency: query.currency,
                        balance: 42,
                    })))
                }
                _ => Err("unexpected request variant".into()),
            }
        })
        .unwrap()
        .build();

    let ctx = SessionContext::new(1, None);
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let empty = Frame::empty(GameCommand::InviteFight);
    c.bench_function("dispatch_empty_command", |b| {
        b.iter(|| {
            rt.block_on(dispatcher.dispatch(black_box(empty.clone()), &ctx))
                .unwrap()
        })
    });

    let query = query_frame();
    c.bench_function("dispatch_currency_query", |b| {
        b.iter(|| {
            rt.block_on(dispatcher.dispatch(black_box(query.clone()), &ctx))
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_frame_encode,
    bench_frame_parse,
    bench_registry_decode,
    bench_dispatch_round_trip
);
criterion_main!(benches);
