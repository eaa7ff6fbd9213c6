use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn int(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

/// One CSV row; `None` cells are written empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SampleRow {
    #[serde(rename = "CustomerID")]
    customer_id: i64,
    age: Option<i64>,
    gender: Option<String>,
    income: Option<f64>,
    campaign_channel: String,
    campaign_type: String,
    ad_spend: f64,
    click_through_rate: f64,
    conversion_rate: f64,
    time_on_site: f64,
    social_shares: i64,
    previous_purchases: i64,
    loyalty_points: i64,
    advertising_platform: String,
    advertising_tool: String,
}

fn round(v: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (v * f).round() / f
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<SampleRow> {
    let channels = ["Social Media", "Email", "PPC", "Referral", "SEO"];
    let types = ["Awareness", "Consideration", "Conversion", "Retention"];
    let genders = ["Female", "Male"];

    let mut out = Vec::with_capacity(rows + rows / 50);
    for i in 0..rows {
        let mut row = SampleRow {
            customer_id: 8000 + i as i64,
            age: Some(rng.int(18, 69)),
            gender: Some(rng.pick(&genders).to_string()),
            income: Some(round(rng.uniform(20_000.0, 150_000.0), 0)),
            campaign_channel: rng.pick(&channels).to_string(),
            campaign_type: rng.pick(&types).to_string(),
            ad_spend: round(rng.uniform(100.0, 10_000.0), 2),
            click_through_rate: round(rng.uniform(0.01, 0.3), 4),
            conversion_rate: round(rng.uniform(0.01, 0.2), 4),
            time_on_site: round(rng.uniform(0.5, 15.0), 2),
            social_shares: rng.int(0, 99),
            previous_purchases: rng.int(0, 9),
            loyalty_points: rng.int(0, 4999),
            advertising_platform: "IsConfid".to_string(),
            advertising_tool: "ToolConfid".to_string(),
        };

        // Sprinkle in dirty rows so the cleaner has work to do.
        match i % 97 {
            13 => row.age = None,
            41 => row.gender = None,
            77 => row.income = None,
            _ => {}
        }
        let duplicate = i % 60 == 7;
        if duplicate {
            out.push(row.clone());
        }
        out.push(row);
    }
    out
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let text = |name: &str| Field::new(name, DataType::Utf8, true);
    let int = |name: &str| Field::new(name, DataType::Int64, true);
    let float = |name: &str| Field::new(name, DataType::Float64, true);

    let schema = Arc::new(Schema::new(vec![
        int("CustomerID"),
        int("Age"),
        text("Gender"),
        float("Income"),
        text("CampaignChannel"),
        text("CampaignType"),
        float("AdSpend"),
        float("ClickThroughRate"),
        float("ConversionRate"),
        float("TimeOnSite"),
        int("SocialShares"),
        int("PreviousPurchases"),
        int("LoyaltyPoints"),
        text("AdvertisingPlatform"),
        text("AdvertisingTool"),
    ]));

    let ints = |f: fn(&SampleRow) -> Option<i64>| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: fn(&SampleRow) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let texts = |f: fn(&SampleRow) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        ints(|r| Some(r.customer_id)),
        ints(|r| r.age),
        texts(|r| r.gender.as_deref()),
        floats(|r| r.income),
        texts(|r| Some(r.campaign_channel.as_str())),
        texts(|r| Some(r.campaign_type.as_str())),
        floats(|r| Some(r.ad_spend)),
        floats(|r| Some(r.click_through_rate)),
        floats(|r| Some(r.conversion_rate)),
        floats(|r| Some(r.time_on_site)),
        ints(|r| Some(r.social_shares)),
        ints(|r| Some(r.previous_purchases)),
        ints(|r| Some(r.loyalty_points)),
        texts(|r| Some(r.advertising_platform.as_str())),
        texts(|r| Some(r.advertising_tool.as_str())),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(1000, &mut rng);

    write_csv("sample_campaigns.csv", &rows)?;
    write_parquet("sample_campaigns.parquet", &rows)?;

    println!(
        "Wrote {} rows to sample_campaigns.csv and sample_campaigns.parquet",
        rows.len()
    );
    Ok(())
}
