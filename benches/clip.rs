//! View volume clipping benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};

use rasterpipe_core::geom::{vertex, Tri};
use rasterpipe_core::math::vec::vec4;
use rasterpipe_core::render::clip::{clip_volume, ClipVert};

fn tri(coords: [[f32; 3]; 3]) -> Tri<ClipVert<f32>> {
    Tri(coords.map(|[x, y, z]| {
        ClipVert::new(vertex(vec4(x, y, z, 1.0), 0.0))
    }))
}

fn clip_tris(c: &mut Criterion) {
    let visible = tri([[-0.5, -0.5, 0.2], [0.5, -0.5, 0.2], [0.0, 0.5, 0.8]]);
    let hidden = tri([[2.0, 2.0, 2.0], [3.0, 2.0, 2.0], [2.0, 3.0, 2.0]]);
    // Crosses several planes, yielding a many-sided polygon
    let straddling = tri([[-1.5, 0.0, -0.5], [1.5, 0.0, 1.5], [0.0, 1.5, 0.5]]);

    let mut group = c.benchmark_group("clip");
    for (name, tr) in [
        ("visible", visible),
        ("hidden", hidden),
        ("straddling", straddling),
    ] {
        let tris = vec![tr; 100];
        group.bench_function(name, |b| {
            let mut out = Vec::with_capacity(tris.len() * 4);
            b.iter(|| {
                out.clear();
                clip_volume::clip(&tris[..], &mut out);
                out.len()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, clip_tris);
criterion_main!(benches);
