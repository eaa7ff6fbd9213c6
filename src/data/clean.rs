use std::collections::HashSet;

use super::model::{Row, Table};
use super::schema::DROPPED_COLUMNS;

// ---------------------------------------------------------------------------
// Cleaner: nulls → duplicates → irrelevant columns
// ---------------------------------------------------------------------------

/// Clean a loaded table.
///
/// Steps, in order:
/// 1. drop rows holding any null cell (a row shorter than the header is
///    missing its trailing cells and counts as holding nulls),
/// 2. drop exact duplicate rows, keeping the first occurrence,
/// 3. drop [`DROPPED_COLUMNS`] (absent columns are ignored, so the
///    operation is idempotent).
pub fn clean(table: Table) -> Table {
    let Table { columns, rows } = table;
    let loaded = rows.len();
    let width = columns.len();

    let complete: Vec<Row> = rows
        .into_iter()
        .filter(|row| row.len() >= width && !row.iter().any(|v| v.is_null()))
        .collect();
    let after_nulls = complete.len();

    let mut seen: HashSet<Row> = HashSet::with_capacity(complete.len());
    let unique: Vec<Row> = complete
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();

    let keep: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, name)| !DROPPED_COLUMNS.contains(&name.as_str()))
        .map(|(i, _)| i)
        .collect();

    let columns: Vec<String> = keep.iter().map(|&i| columns[i].clone()).collect();
    let rows: Vec<Row> = unique
        .into_iter()
        .map(|row| keep.iter().filter_map(|&i| row.get(i).cloned()).collect())
        .collect();

    log::info!(
        "Cleaned {loaded} rows: {} with missing values, {} duplicates dropped, {} kept",
        loaded - after_nulls,
        after_nulls - rows.len(),
        rows.len()
    );

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn table(rows: Vec<Row>) -> Table {
        Table {
            columns: vec![
                "Age".into(),
                "AdvertisingPlatform".into(),
                "Gender".into(),
                "AdvertisingTool".into(),
            ],
            rows,
        }
    }

    fn row(age: i64, gender: &str) -> Row {
        vec![
            Value::Integer(age),
            Value::Text("IsConfid".into()),
            Value::Text(gender.into()),
            Value::Text("ToolConfid".into()),
        ]
    }

    #[test]
    fn drops_rows_with_any_null() {
        let mut partial = row(30, "Male");
        partial[1] = Value::Null;
        let cleaned = clean(table(vec![row(20, "Female"), partial]));
        assert_eq!(cleaned.rows, vec![vec![Value::Integer(20), Value::Text("Female".into())]]);
    }

    #[test]
    fn keeps_one_copy_of_a_duplicate_pair() {
        let cleaned = clean(table(vec![row(20, "Female"), row(41, "Male"), row(20, "Female")]));
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.rows[0][0], Value::Integer(20));
        assert_eq!(cleaned.rows[1][0], Value::Integer(41));
    }

    #[test]
    fn drops_irrelevant_columns_only() {
        let cleaned = clean(table(vec![row(20, "Female")]));
        assert_eq!(cleaned.columns, vec!["Age".to_string(), "Gender".to_string()]);
        assert_eq!(cleaned.rows[0].len(), 2);
    }

    #[test]
    fn is_idempotent() {
        let mut partial = row(33, "Male");
        partial[2] = Value::Null;
        let once = clean(table(vec![row(20, "Female"), partial, row(20, "Female"), row(50, "Male")]));
        let twice = clean(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn output_has_no_nulls_or_duplicates() {
        let mut rows = Vec::new();
        for i in 0..40 {
            let mut r = row(i % 7, if i % 2 == 0 { "Female" } else { "Male" });
            if i % 5 == 0 {
                r[2] = Value::Null;
            }
            rows.push(r);
        }
        let cleaned = clean(table(rows));
        assert!(cleaned.rows.iter().all(|r| r.iter().all(|v| !v.is_null())));
        let distinct: HashSet<&Row> = cleaned.rows.iter().collect();
        assert_eq!(distinct.len(), cleaned.len());
    }

    #[test]
    fn short_rows_count_as_missing_cells() {
        let mut short = row(30, "Male");
        short.truncate(2);
        let mut long = row(41, "Male");
        long.push(Value::Integer(7));
        let cleaned = clean(table(vec![short, row(20, "Female"), long]));
        assert_eq!(
            cleaned.rows,
            vec![
                vec![Value::Integer(20), Value::Text("Female".into())],
                vec![Value::Integer(41), Value::Text("Male".into())],
            ]
        );
    }

    #[test]
    fn signed_zero_floats_are_duplicates() {
        use crate::data::loader::read_csv;

        let header = "CustomerID,Age,Gender,Income,CampaignChannel,CampaignType,AdSpend,\
ClickThroughRate,ConversionRate,TimeOnSite,SocialShares,PreviousPurchases,LoyaltyPoints,\
AdvertisingPlatform,AdvertisingTool";
        let text = format!(
            "{header}\n\
8000,30,Male,50000,Email,Retention,0.0,0.1,0.2,3,1,2,3,IsConfid,ToolConfid\n\
8000,30,Male,50000,Email,Retention,-0.0,0.1,0.2,3,1,2,3,IsConfid,ToolConfid\n"
        );
        let cleaned = clean(read_csv(text.as_bytes()).unwrap());
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn empty_result_is_valid() {
        let mut r = row(20, "Female");
        r[0] = Value::Null;
        let cleaned = clean(table(vec![r]));
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.columns.len(), 2);
    }
}
