use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (sku, name, category, list price)
const PRODUCTS: [(&str, &str, &str, f64); 5] = [
    ("SKU-001", "Galleta Chocolate 200g", "Galletas", 32.5),
    ("SKU-002", "Galleta Vainilla 200g", "Galletas", 29.0),
    ("SKU-003", "Chicle Menta x12", "Confitería", 18.0),
    ("SKU-004", "Chocolate Leche 90g", "Chocolates", 24.9),
    ("SKU-005", "Bebida Polvo 400g", "Bebidas", 54.0),
];

const ROUTES: [&str; 4] = ["R-NORTE", "R-SUR", "R-CENTRO", "R-BAJIO"];
const WEEKS: i64 = 12;

/// One sales row: (week, route, sku, units, amount)
type Sale = (i64, &'static str, &'static str, i64, f64);

fn generate_sales(rng: &mut SimpleRng) -> Vec<Sale> {
    let mut sales = Vec::new();
    for week in 1..=WEEKS {
        let seasonality = 1.0 + 0.15 * (week as f64 / WEEKS as f64 * std::f64::consts::TAU).sin();
        for route in ROUTES {
            for (sku, _, _, price) in PRODUCTS {
                let units = rng.gauss(120.0 * seasonality, 25.0).max(0.0).round() as i64;
                let amount = (units as f64 * price * 100.0).round() / 100.0;
                sales.push((week, route, sku, units, amount));
            }
        }
    }
    sales
}

fn write_sales_csv(path: &Path, sales: &[Sale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["semana", "ruta", "sku", "unidades", "venta"])?;
    for (week, route, sku, units, amount) in sales {
        writer.write_record([
            week.to_string(),
            route.to_string(),
            sku.to_string(),
            units.to_string(),
            amount.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_sales_parquet(path: &Path, sales: &[Sale]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("semana", DataType::Int64, false),
        Field::new("ruta", DataType::Utf8, false),
        Field::new("sku", DataType::Utf8, false),
        Field::new("unidades", DataType::Int64, false),
        Field::new("venta", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(sales.iter().map(|s| s.0))),
            Arc::new(StringArray::from_iter_values(sales.iter().map(|s| s.1))),
            Arc::new(StringArray::from_iter_values(sales.iter().map(|s| s.2))),
            Arc::new(Int64Array::from_iter_values(sales.iter().map(|s| s.3))),
            Arc::new(Float64Array::from_iter_values(sales.iter().map(|s| s.4))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_products_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["sku", "descripcion", "categoria"])?;
    for (sku, name, category, _) in PRODUCTS {
        writer.write_record([sku, name, category])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_prices_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["sku", "precio_lista", "activo"])?;
    for (sku, _, _, price) in PRODUCTS {
        writer.write_record([sku, price.to_string().as_str(), "true"])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let sales = generate_sales(&mut rng);

    write_sales_csv(&out_dir.join("ventas.csv"), &sales)?;
    write_sales_parquet(&out_dir.join("ventas.parquet"), &sales)?;
    write_products_csv(&out_dir.join("productos.csv"))?;
    write_prices_csv(&out_dir.join("precios.csv"))?;

    println!(
        "Wrote {} sales rows ({} weeks × {} routes × {} products) to {}",
        sales.len(),
        WEEKS,
        ROUTES.len(),
        PRODUCTS.len(),
        out_dir.display()
    );
    Ok(())
}
