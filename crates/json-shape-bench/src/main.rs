//! Benchmark for json-shape decoding and encoding using synthetic orders.
//!
//! Compares schema-driven decoding (with predicates and per-field
//! diagnostics) against plain `serde_json` deserialization of the same
//! documents.

use std::time::{Duration, Instant};

use json_shape::{Model, Registry, SchemaBuilder};
use serde::{Deserialize, Serialize};

// =============================================================================
// DATA MODEL
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Line {
    sku: String,
    quantity: u32,
    unit_price: f64,
    gift: bool,
}

impl Model for Line {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property_with("sku", |l| &l.sku, |l| &mut l.sku, |c| c.matches("[A-Z]{3}-[0-9]{4}"))
            .property_with("quantity", |l| &l.quantity, |l| &mut l.quantity, |c| c.range_eq(1, 99))
            .property_with("unit_price", |l| &l.unit_price, |l| &mut l.unit_price, |c| c.greater(0))
            .property("gift", |l| &l.gift, |l| &mut l.gift)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Address {
    street: String,
    city: String,
    postcode: Option<String>,
}

impl Model for Address {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property("street", |a| &a.street, |a| &mut a.street)
            .property("city", |a| &a.city, |a| &mut a.city)
            .property_with("postcode", |a| &a.postcode, |a| &mut a.postcode, |c| {
                c.matches("[0-9]{5}")
            })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: String,
    customer: String,
    lines: Vec<Line>,
    shipping: Address,
    coupon: Option<String>,
    tags: Vec<String>,
}

impl Model for Order {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property("id", |o| &o.id, |o| &mut o.id)
            .property_with("customer", |o| &o.customer, |o| &mut o.customer, |c| {
                c.matches(r"[^@\s]+@[^@\s]+")
            })
            .property("lines", |o| &o.lines, |o| &mut o.lines)
            .property("shipping", |o| &o.shipping, |o| &mut o.shipping)
            .property("coupon", |o| &o.coupon, |o| &mut o.coupon)
            .property("tags", |o| &o.tags, |o| &mut o.tags)
    }
}

// =============================================================================
// SYNTHETIC DATA
// =============================================================================

const CITIES: [&str; 6] = ["Lisbon", "Oslo", "Quito", "Osaka", "Lagos", "Perth"];
const TAGS: [&str; 5] = ["priority", "fragile", "wholesale", "return", "gift-wrap"];

/// Deterministic xorshift generator so runs are comparable.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

/// Roughly one order in `bad_every` carries an invalid field.
fn generate_orders(count: usize, bad_every: u64) -> Vec<Order> {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|i| {
            let line_count = 1 + rng.below(6) as usize;
            let lines = (0..line_count)
                .map(|_| Line {
                    sku: format!("ABC-{:04}", rng.below(10_000)),
                    quantity: 1 + rng.below(20) as u32,
                    unit_price: (rng.below(100_000) as f64) / 100.0 + 0.01,
                    gift: rng.below(4) == 0,
                })
                .collect();
            let tag_count = rng.below(3) as usize;
            let mut order = Order {
                id: format!("ord-{i:08}"),
                customer: format!("customer{}@example.com", rng.below(5_000)),
                lines,
                shipping: Address {
                    street: format!("{} Harbour Road", 1 + rng.below(400)),
                    city: CITIES[rng.below(CITIES.len() as u64) as usize].to_string(),
                    postcode: (rng.below(3) > 0).then(|| format!("{:05}", rng.below(100_000))),
                },
                coupon: (rng.below(5) == 0).then(|| "SPRING".to_string()),
                tags: (0..tag_count)
                    .map(|_| TAGS[rng.below(TAGS.len() as u64) as usize].to_string())
                    .collect(),
            };
            if rng.below(bad_every) == 0 {
                order.lines[0].quantity = 0;
                order.customer = "nobody".to_string();
            }
            order
        })
        .collect()
}

// =============================================================================
// TIMING
// =============================================================================

const WARMUP_ITERS: u32 = 3;
const ITERS: u32 = 10;

fn time_avg<F: FnMut()>(mut f: F) -> Duration {
    for _ in 0..WARMUP_ITERS {
        f();
    }
    let start = Instant::now();
    for _ in 0..ITERS {
        f();
    }
    start.elapsed() / ITERS
}

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
}

fn main() {
    let count = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(20_000usize);

    let registry = Registry::new()
        .with::<Line>()
        .and_then(|r| r.with::<Address>())
        .and_then(|r| r.with::<Order>())
        .expect("Failed to register schemas");

    let generate_start = Instant::now();
    let orders = generate_orders(count, 50);
    println!("Generated {} orders in {:?}", orders.len(), generate_start.elapsed());

    let documents: Vec<String> = orders
        .iter()
        .map(|order| serde_json::to_string(order).expect("Failed to serialize order"))
        .collect();
    let total_bytes: usize = documents.iter().map(String::len).sum();
    println!("  - {} bytes of JSON", total_bytes);

    // Baseline: serde_json typed deserialization, no validation
    let serde_time = time_avg(|| {
        for doc in &documents {
            let order: Order = serde_json::from_str(doc).expect("Failed to deserialize");
            std::hint::black_box(order);
        }
    });
    println!("\nserde_json decode: {:?} (avg of {} iterations)", serde_time, ITERS);
    println!("  Throughput: {:.2} MB/s", throughput(total_bytes, serde_time));

    // json-shape: parse, decode and validate every property
    let shape_time = time_avg(|| {
        for doc in &documents {
            let decoded = registry.from_json::<Order>(doc).expect("Failed to parse");
            std::hint::black_box(decoded);
        }
    });
    println!("\njson-shape decode: {:?} (avg of {} iterations)", shape_time, ITERS);
    println!("  Throughput: {:.2} MB/s", throughput(total_bytes, shape_time));
    println!(
        "  Overhead vs serde_json: {:.1}x",
        shape_time.as_secs_f64() / serde_time.as_secs_f64()
    );

    // Verify decoded instances and count diagnostics
    let mut invalid = 0;
    let mut errors = 0;
    for (doc, order) in documents.iter().zip(&orders) {
        let (decoded, state) = registry.from_json::<Order>(doc).expect("Failed to parse");
        assert_eq!(&decoded, order, "decoded order should match the source");
        if !state.is_valid() {
            invalid += 1;
            errors += state.error_count();
        }
    }
    println!("  - {} invalid orders, {} errors", invalid, errors);

    // Canonical encoding
    let mut encoded_bytes = 0;
    let encode_time = time_avg(|| {
        encoded_bytes = orders.iter().map(|order| registry.to_json(order).len()).sum();
    });
    println!("\njson-shape encode: {} bytes in {:?}", encoded_bytes, encode_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded_bytes, encode_time));

    let serde_encode_time = time_avg(|| {
        for order in &orders {
            std::hint::black_box(serde_json::to_string(order).expect("Failed to serialize"));
        }
    });
    println!("serde_json encode: {:?}", serde_encode_time);

    // Canonical output must be deterministic
    let first = registry.to_json(&orders[0]);
    assert_eq!(first, registry.to_json(&orders[0]), "Canonical encoding should be deterministic");
}
