use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inmet_array::prelude::*;

#[inline(never)]
fn access_view_2d_index(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f64>::new([64, 64])?;
    let view = array.view_mut::<2>()?;

    c.bench_function("ArrayView<f64,2>_access_index", |b| {
        b.iter(|| view[black_box((12, 40))])
    });
    Ok(())
}

#[inline(never)]
fn access_view_2d_get(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f64>::new([64, 64])?;
    let view = array.view_mut::<2>()?;

    c.bench_function("ArrayView<f64,2>_access_get", |b| {
        b.iter(|| view.get(black_box([12, 40])).map(|x| *x))
    });
    Ok(())
}

#[inline(never)]
fn access_view_2d_unchecked(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f64>::new([64, 64])?;
    let view = array.view_mut::<2>()?;

    c.bench_function("ArrayView<f64,2>_access_unchecked", |b| {
        b.iter(|| unsafe { *view.get_unchecked(black_box((12, 40))) })
    });
    Ok(())
}

#[inline(never)]
fn set_view_2d_index(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f64>::new([64, 64])?;
    let mut view = array.view_mut::<2>()?;

    c.bench_function("ArrayView<f64,2>_set_index", |b| {
        b.iter(|| view[black_box((12, 40))] = 1.0)
    });
    Ok(())
}

#[inline(never)]
fn access_dyn_view_index(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f64>::new([16, 16, 16])?;
    let view = array.view_dyn_mut();

    c.bench_function("ArrayViewDyn<f64>_access_index", |b| {
        b.iter(|| view[black_box([3, 7, 11])])
    });
    Ok(())
}

#[inline(never)]
fn access_dyn_view_unchecked(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f64>::new([16, 16, 16])?;
    let view = array.view_dyn_mut();

    c.bench_function("ArrayViewDyn<f64>_access_unchecked", |b| {
        b.iter(|| unsafe { *view.get_unchecked(black_box([3, 7, 11])) })
    });
    Ok(())
}

#[inline(never)]
fn import_descriptor(c: &mut Criterion) -> ArrayResult<()> {
    let mut array = OwnedArray::<f32>::new([32, 32])?;

    c.bench_function("ArrayView<f32,2>_from_descriptor", |b| {
        b.iter(|| {
            let desc = array.descriptor();
            ArrayView::<f32, 2>::from_descriptor(black_box(desc)).map(|v| v.size())
        })
    });
    Ok(())
}

fn criterion_benchmark(c: &mut Criterion) {
    access_view_2d_index(c).unwrap();
    access_view_2d_get(c).unwrap();
    access_view_2d_unchecked(c).unwrap();
    set_view_2d_index(c).unwrap();
    access_dyn_view_index(c).unwrap();
    access_dyn_view_unchecked(c).unwrap();
    import_descriptor(c).unwrap();
}

criterion_group! {
    name = array_access;
    config = Criterion::default().sample_size(200);
    targets = criterion_benchmark
}
criterion_main!(array_access);
