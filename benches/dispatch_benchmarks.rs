use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use formstore_core::execution::InlineScheduler;
use formstore_core::interaction::{Interaction, InteractionData, NullResponder};
use formstore_core::registry::FormRegistry;
use formstore_core::ui::{ButtonSpec, Element, FormBuilder};

fn full_form(prefix: &str) -> Arc<formstore_core::Form> {
    (0..25)
        .fold(FormBuilder::new().no_timeout(), |builder, i| {
            let element = Element::button(ButtonSpec::new("b").custom_id(format!("{prefix}-{i}")))
                .expect("valid button");
            builder.passive(element)
        })
        .build()
        .expect("valid form")
}

fn benchmark_dispatch(c: &mut Criterion) {
    let registry = FormRegistry::new(Arc::new(InlineScheduler::new()));
    for form in 0..40 {
        registry
            .add_form(&full_form(&format!("f{form}")), None)
            .expect("unique keys");
    }

    c.bench_function("dispatch_hit", |b| {
        b.iter(|| {
            let interaction = Interaction::builder(InteractionData::button("f20-12"))
                .build(Arc::new(NullResponder));
            black_box(registry.dispatch_interaction(interaction))
        })
    });

    c.bench_function("dispatch_miss", |b| {
        b.iter(|| {
            let interaction = Interaction::builder(InteractionData::button("missing"))
                .build(Arc::new(NullResponder));
            black_box(registry.dispatch_interaction(interaction))
        })
    });
}

fn benchmark_layout(c: &mut Criterion) {
    let form = full_form("layout");
    c.bench_function("layout_25_elements", |b| b.iter(|| black_box(form.to_components())));
}

criterion_group!(benches, benchmark_dispatch, benchmark_layout);
criterion_main!(benches);
