use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use hunger_trends::analysis::{child_trend, prepare_child_weight, prepare_hunger_index, top_countries, trends_by_continent};
use hunger_trends::types::{DataType, Field, Schema, Table, Value};

const CONTINENTS: [&str; 5] = ["Africa", "Oceania", "Asia", "Americas", "Europe"];

fn continents(countries: usize) -> Table {
    let schema = Schema::new(vec![
        Field::new("code_3", DataType::Utf8),
        Field::new("continent", DataType::Utf8),
    ]);
    let rows = (0..countries)
        .map(|i| vec![Value::Utf8(format!("C{i:03}")), Value::text(CONTINENTS[i % CONTINENTS.len()])])
        .collect();
    Table::new(schema, rows)
}

fn hunger(countries: usize, years: i64) -> Table {
    let schema = Schema::new(vec![
        Field::new("Entity", DataType::Utf8),
        Field::new("Code", DataType::Utf8),
        Field::new("Year", DataType::Int64),
        Field::new("Global Hunger Index (2021)", DataType::Float64),
    ]);
    let mut rows = Vec::new();
    for i in 0..countries {
        for y in 0..years {
            let ghi = ((i * 7 + y as usize * 13) % 50) as f64;
            rows.push(vec![
                Value::Utf8(format!("Country {i}")),
                Value::Utf8(format!("C{i:03}")),
                Value::Int64(2000 + y),
                Value::Float64(ghi),
            ]);
        }
    }
    Table::new(schema, rows)
}

fn child_weight(countries: usize, years: i64) -> Table {
    let schema = Schema::new(vec![
        Field::new("Entity", DataType::Utf8),
        Field::new("Year", DataType::Int64),
        Field::new(
            "Prevalence of underweight, weight for age (% of children under 5)",
            DataType::Float64,
        ),
    ]);
    let mut rows = Vec::new();
    for i in 0..countries {
        for y in 0..years {
            rows.push(vec![
                Value::Utf8(format!("Country {i}")),
                Value::Int64(1983 + y),
                Value::Float64(((i + y as usize) % 40) as f64 + 0.5),
            ]);
        }
    }
    Table::new(schema, rows)
}

fn bench_pipeline(c: &mut Criterion) {
    let raw_hunger = hunger(200, 22);
    let raw_child = child_weight(200, 39);
    let mapping = continents(200);

    c.bench_function("prepare_hunger_index/200x22", |b| {
        b.iter(|| prepare_hunger_index(black_box(&raw_hunger), black_box(&mapping)).unwrap())
    });

    let prepared = prepare_hunger_index(&raw_hunger, &mapping).unwrap();
    c.bench_function("trends_by_continent/200x22", |b| {
        b.iter(|| trends_by_continent(black_box(&prepared)).unwrap())
    });
    c.bench_function("top_countries/200x22", |b| {
        b.iter(|| top_countries(black_box(&prepared), 2021, 10).unwrap())
    });

    c.bench_function("child_trend/200x39", |b| {
        b.iter_batched(
            || raw_child.clone(),
            |t| child_trend(&prepare_child_weight(&t).unwrap()).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
