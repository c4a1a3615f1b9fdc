use anyhow::Result;
use comfy_table::Table as ComfyTable;

use athletica_core::{generate, GenerationParams};

use crate::args::PreviewArgs;
use crate::tables;

pub async fn run(args: &PreviewArgs) -> Result<()> {
    let table = tables::table_def(&args.table, args.rows)?;
    let params = GenerationParams::new(args.rows)
        .with_seed(args.seed)
        .with_variability(args.variability);

    let records = generate(&table, &params)?;

    println!("━━━ {} ({} rows) ━━━", table.full_name(), records.len());

    let mut t = ComfyTable::new();
    t.set_header(table.columns().iter().map(|c| c.as_str()).collect::<Vec<_>>());

    for record in &records {
        let values: Vec<String> = table
            .columns()
            .iter()
            .map(|col| {
                record
                    .get(col)
                    .map(|v| {
                        let s = v.to_string();
                        if s.chars().count() > 40 {
                            let cut: String = s.chars().take(37).collect();
                            format!("{}...", cut)
                        } else {
                            s
                        }
                    })
                    .unwrap_or_else(|| "NULL".to_string())
            })
            .collect();
        t.add_row(values);
    }

    println!("{}", t);
    Ok(())
}
