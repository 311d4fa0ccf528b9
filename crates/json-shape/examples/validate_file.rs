//! Decodes a JSON file into a sample `Catalog` model and reports diagnostics.
//!
//! Run with `RUST_LOG=json_shape=trace` to see every recorded error.

use std::fs;
use std::process::ExitCode;

use json_shape::{Model, SchemaBuilder};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"{
    "name": "Spring catalog",
    "currency": "eur",
    "products": [
        {"sku": "TEA-0001", "title": "Green tea", "price": 4.5, "stock": 120},
        {"sku": "tea 2", "title": "Black tea", "price": -1, "stock": "many"},
        {"sku": "CUP-0010", "price": 9.99, "stock": 8, "tags": ["ceramic", 3]}
    ]
}"#;

#[derive(Debug, Default)]
struct Product {
    sku: String,
    title: String,
    price: f64,
    stock: u32,
    tags: Option<Vec<String>>,
}

impl Model for Product {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property_with("sku", |p| &p.sku, |p| &mut p.sku, |c| c.matches("[A-Z]{3}-[0-9]{4}"))
            .property("title", |p| &p.title, |p| &mut p.title)
            .property_with("price", |p| &p.price, |p| &mut p.price, |c| c.greater(0))
            .property_with("stock", |p| &p.stock, |p| &mut p.stock, |c| c.range_eq(0, 10_000))
            .property("tags", |p| &p.tags, |p| &mut p.tags)
    }
}

#[derive(Debug, Default)]
struct Catalog {
    name: String,
    currency: String,
    products: Vec<Product>,
}

impl Model for Catalog {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property("name", |c| &c.name, |c| &mut c.name)
            .property_with("currency", |c| &c.currency, |c| &mut c.currency, |c| {
                c.matches("[A-Z]{3}")
            })
            .property("products", |c| &c.products, |c| &mut c.products)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    json_shape::register::<Product>().expect("Failed to register Product");
    json_shape::register::<Catalog>().expect("Failed to register Catalog");

    let text = match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading: {}", path);
            fs::read_to_string(&path).expect("Failed to read file")
        }
        None => {
            println!("Reading: built-in sample");
            SAMPLE.to_string()
        }
    };
    println!("File size: {} bytes", text.len());

    let (catalog, state) = match json_shape::from_json::<Catalog>(&text) {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("Malformed JSON: {}", err);
            return ExitCode::FAILURE;
        }
    };

    println!("\n=== Catalog ===");
    println!("Name: {:?}", catalog.name);
    println!("Currency: {:?}", catalog.currency);
    println!("Products: {}", catalog.products.len());
    for (i, product) in catalog.products.iter().enumerate() {
        println!(
            "  [{}] {} {:?} price={} stock={} tags={:?}",
            i, product.sku, product.title, product.price, product.stock, product.tags
        );
    }

    println!("\n=== Canonical form ===");
    println!("{}", json_shape::to_json_pretty(&catalog));

    if state.is_valid() {
        println!("\nNo errors.");
        return ExitCode::SUCCESS;
    }

    println!(
        "\n=== Errors ({} in {} properties) ===",
        state.error_count(),
        state.len()
    );
    println!("{}", state);
    println!("\n=== Errors as JSON ===");
    println!("{}", json_shape::print_pretty(&state.to_value()));
    ExitCode::FAILURE
}
