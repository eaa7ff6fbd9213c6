use std::collections::BTreeSet;
use std::fmt;

use super::error::{DataError, Result};
use super::schema;

// ---------------------------------------------------------------------------
// Value – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Used as a `BTreeMap` / `HashSet` key downstream, so `Value` must be `Ord` and `Hash`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so floats get a total order consistent with Hash --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – loaded rows before they are typed into records
// ---------------------------------------------------------------------------

pub type Row = Vec<Value>;

/// Row-oriented table as produced by the loader and consumed by the cleaner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one campaign interaction
// ---------------------------------------------------------------------------

/// One campaign-interaction observation with the analysed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub age: i64,
    pub gender: String,
    pub income: f64,
    pub campaign_channel: String,
    pub campaign_type: String,
    pub click_through_rate: f64,
    pub conversion_rate: f64,
    pub ad_spend: f64,
    pub time_on_site: f64,
    pub social_shares: i64,
    pub previous_purchases: i64,
    pub loyalty_points: i64,
}

/// Names a [`Record`] field for aggregation and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    Income,
    CampaignChannel,
    CampaignType,
    ClickThroughRate,
    ConversionRate,
    AdSpend,
    TimeOnSite,
    SocialShares,
    PreviousPurchases,
    LoyaltyPoints,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Age,
        Field::Gender,
        Field::Income,
        Field::CampaignChannel,
        Field::CampaignType,
        Field::ClickThroughRate,
        Field::ConversionRate,
        Field::AdSpend,
        Field::TimeOnSite,
        Field::SocialShares,
        Field::PreviousPurchases,
        Field::LoyaltyPoints,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Field::Age => schema::AGE,
            Field::Gender => schema::GENDER,
            Field::Income => schema::INCOME,
            Field::CampaignChannel => schema::CAMPAIGN_CHANNEL,
            Field::CampaignType => schema::CAMPAIGN_TYPE,
            Field::ClickThroughRate => schema::CLICK_THROUGH_RATE,
            Field::ConversionRate => schema::CONVERSION_RATE,
            Field::AdSpend => schema::AD_SPEND,
            Field::TimeOnSite => schema::TIME_ON_SITE,
            Field::SocialShares => schema::SOCIAL_SHARES,
            Field::PreviousPurchases => schema::PREVIOUS_PURCHASES,
            Field::LoyaltyPoints => schema::LOYALTY_POINTS,
        }
    }

    /// The field's value as a grouping key.
    pub fn value(self, record: &Record) -> Value {
        match self {
            Field::Gender => Value::Text(record.gender.clone()),
            Field::CampaignChannel => Value::Text(record.campaign_channel.clone()),
            Field::CampaignType => Value::Text(record.campaign_type.clone()),
            Field::Age => Value::Integer(record.age),
            Field::SocialShares => Value::Integer(record.social_shares),
            Field::PreviousPurchases => Value::Integer(record.previous_purchases),
            Field::LoyaltyPoints => Value::Integer(record.loyalty_points),
            Field::Income => Value::Float(record.income),
            Field::ClickThroughRate => Value::Float(record.click_through_rate),
            Field::ConversionRate => Value::Float(record.conversion_rate),
            Field::AdSpend => Value::Float(record.ad_spend),
            Field::TimeOnSite => Value::Float(record.time_on_site),
        }
    }

    /// Numeric reading of the field; `None` for categorical fields.
    pub fn numeric(self, record: &Record) -> Option<f64> {
        match self {
            Field::Gender | Field::CampaignChannel | Field::CampaignType => None,
            numeric => numeric.value(record).as_f64(),
        }
    }
}

// ---------------------------------------------------------------------------
// CampaignDataset – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The typed, cleaned dataset plus the option sets the filter widgets offer.
#[derive(Debug, Clone, Default)]
pub struct CampaignDataset {
    pub records: Vec<Record>,
    pub channels: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    pub campaign_types: BTreeSet<String>,
}

impl CampaignDataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut channels = BTreeSet::new();
        let mut genders = BTreeSet::new();
        let mut campaign_types = BTreeSet::new();
        for r in &records {
            channels.insert(r.campaign_channel.clone());
            genders.insert(r.gender.clone());
            campaign_types.insert(r.campaign_type.clone());
        }
        CampaignDataset {
            records,
            channels,
            genders,
            campaign_types,
        }
    }

    /// Type the rows of a cleaned table. Cells must carry their declared kind.
    pub fn from_table(table: &Table) -> Result<Self> {
        let missing: Vec<String> = Field::ALL
            .iter()
            .map(|f| f.column_name())
            .filter(|name| table.column_index(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DataError::Schema { missing });
        }
        let idx = |name: &str| table.column_index(name).unwrap_or_default();

        let cols = RecordColumns {
            age: idx(schema::AGE),
            gender: idx(schema::GENDER),
            income: idx(schema::INCOME),
            channel: idx(schema::CAMPAIGN_CHANNEL),
            campaign_type: idx(schema::CAMPAIGN_TYPE),
            ctr: idx(schema::CLICK_THROUGH_RATE),
            conversion: idx(schema::CONVERSION_RATE),
            ad_spend: idx(schema::AD_SPEND),
            time_on_site: idx(schema::TIME_ON_SITE),
            social_shares: idx(schema::SOCIAL_SHARES),
            purchases: idx(schema::PREVIOUS_PURCHASES),
            loyalty: idx(schema::LOYALTY_POINTS),
        };

        let records = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_no, row)| cols.record(&table.columns, row, row_no))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed `(min, max)` age, `None` when empty.
    pub fn age_range(&self) -> Option<(i64, i64)> {
        let min = self.records.iter().map(|r| r.age).min()?;
        let max = self.records.iter().map(|r| r.age).max()?;
        Some((min, max))
    }

    /// Observed `(min, max)` income, `None` when empty.
    pub fn income_range(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.income).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Column positions of the record fields inside a [`Table`].
struct RecordColumns {
    age: usize,
    gender: usize,
    income: usize,
    channel: usize,
    campaign_type: usize,
    ctr: usize,
    conversion: usize,
    ad_spend: usize,
    time_on_site: usize,
    social_shares: usize,
    purchases: usize,
    loyalty: usize,
}

impl RecordColumns {
    fn record(&self, columns: &[String], row: &Row, row_no: usize) -> Result<Record> {
        let cell = TypedCells { columns, row, row_no };
        Ok(Record {
            age: cell.int(self.age)?,
            gender: cell.text(self.gender)?,
            income: cell.float(self.income)?,
            campaign_channel: cell.text(self.channel)?,
            campaign_type: cell.text(self.campaign_type)?,
            click_through_rate: cell.float(self.ctr)?,
            conversion_rate: cell.float(self.conversion)?,
            ad_spend: cell.float(self.ad_spend)?,
            time_on_site: cell.float(self.time_on_site)?,
            social_shares: cell.int(self.social_shares)?,
            previous_purchases: cell.int(self.purchases)?,
            loyalty_points: cell.int(self.loyalty)?,
        })
    }
}

/// Typed accessors over one table row.
struct TypedCells<'a> {
    columns: &'a [String],
    row: &'a Row,
    row_no: usize,
}

impl<'a> TypedCells<'a> {
    fn get(&self, i: usize) -> (&'a str, &'a Value) {
        (self.columns[i].as_str(), self.row.get(i).unwrap_or(&Value::Null))
    }

    fn mismatch(&self, column: &str, expected: &str, found: &Value) -> DataError {
        DataError::parse(self.row_no, column, format!("expected {expected}, found {found}"))
    }

    fn int(&self, i: usize) -> Result<i64> {
        match self.get(i) {
            (_, Value::Integer(v)) => Ok(*v),
            (name, other) => Err(self.mismatch(name, "integer", other)),
        }
    }

    fn float(&self, i: usize) -> Result<f64> {
        let (name, v) = self.get(i);
        v.as_f64().ok_or_else(|| self.mismatch(name, "number", v))
    }

    fn text(&self, i: usize) -> Result<String> {
        match self.get(i) {
            (_, Value::Text(s)) => Ok(s.clone()),
            (name, other) => Err(self.mismatch(name, "text", other)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A record with neutral defaults; tests override the fields they care about.
    pub(crate) fn record(age: i64, income: f64, conversion_rate: f64) -> Record {
        Record {
            age,
            gender: "Female".into(),
            income,
            campaign_channel: "Email".into(),
            campaign_type: "Awareness".into(),
            click_through_rate: 0.1,
            conversion_rate,
            ad_spend: 1000.0,
            time_on_site: 5.0,
            social_shares: 10,
            previous_purchases: 2,
            loyalty_points: 100,
        }
    }

    #[test]
    fn value_order_is_total() {
        let mut vals = vec![
            Value::Text("b".into()),
            Value::Float(2.5),
            Value::Null,
            Value::Integer(3),
            Value::Float(-1.0),
            Value::Text("a".into()),
        ];
        vals.sort();
        assert_eq!(
            vals,
            vec![
                Value::Null,
                Value::Integer(3),
                Value::Float(-1.0),
                Value::Float(2.5),
                Value::Text("a".into()),
                Value::Text("b".into()),
            ]
        );
    }

    #[test]
    fn dataset_collects_option_sets_and_ranges() {
        let mut a = record(20, 30_000.0, 0.1);
        a.campaign_channel = "SEO".into();
        let mut b = record(60, 90_000.0, 0.2);
        b.gender = "Male".into();
        let ds = CampaignDataset::from_records(vec![a, b]);

        assert_eq!(ds.channels.iter().cloned().collect::<Vec<_>>(), ["Email", "SEO"]);
        assert_eq!(ds.genders.len(), 2);
        assert_eq!(ds.age_range(), Some((20, 60)));
        assert_eq!(ds.income_range(), Some((30_000.0, 90_000.0)));
    }

    #[test]
    fn empty_dataset_has_no_ranges() {
        let ds = CampaignDataset::default();
        assert_eq!(ds.age_range(), None);
        assert_eq!(ds.income_range(), None);
    }

    #[test]
    fn from_table_rejects_wrong_cell_type() {
        let columns: Vec<String> = schema::REQUIRED_COLUMNS.iter().map(|(n, _)| n.to_string()).collect();
        let mut row: Row = schema::REQUIRED_COLUMNS
            .iter()
            .map(|(_, kind)| match kind {
                schema::ColumnKind::Integer => Value::Integer(1),
                schema::ColumnKind::Float => Value::Float(1.0),
                schema::ColumnKind::Text => Value::Text("x".into()),
            })
            .collect();
        let table = Table {
            columns: columns.clone(),
            rows: vec![row.clone()],
        };
        assert_eq!(CampaignDataset::from_table(&table).unwrap().len(), 1);

        row[0] = Value::Text("old".into());
        let table = Table {
            columns,
            rows: vec![row],
        };
        assert!(matches!(
            CampaignDataset::from_table(&table),
            Err(DataError::Parse { row: 0, .. })
        ));
    }
}
